//! Alternate-style resolution for a single (node, slot) pair.
//!
//! Given the selector of the current selection root, the resolver reads the
//! style a node references in one slot, derives the name of its sibling in
//! the target theme variant, and swaps the reference when the registry has
//! that sibling and the constant policy allows it.

use tracing::trace;

use crate::diagnostic::{DiagnosticKind, Diagnostics};
use crate::error::{RethemeError, RethemeResult};
use crate::node::{NodeId, SlotState, StyleSlot, ThemeNode, slot_state};
use crate::path::{self, ThemeKind, ThemePath};
use crate::registry::{StyleId, StyleRegistry};

/// The parsed theme path of a selection root, fixed for its subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    /// Root name as written.
    pub source: String,
    /// Expanded path, with the name's `_suffix` stripped.
    pub path: ThemePath,
    /// Name segment with its `_suffix` kept. Only text styles use it.
    pub raw_name: String,
}

impl Selector {
    /// Validates, expands and parses a selection root name.
    ///
    /// # Errors
    /// [`RethemeError::InvalidSelector`] if the name is not a valid theme
    /// path, [`RethemeError::MalformedPath`] if its expansion still is not a
    /// four-segment path (possible when a parenthesised group is malformed).
    pub fn parse(node: &NodeId, name: &str) -> RethemeResult<Self> {
        if !path::is_valid(name) {
            return Err(RethemeError::InvalidSelector {
                node: node.clone(),
                path: name.to_string(),
            });
        }
        let expanded = path::expand(name);
        let parsed = path::parse(&expanded, false)?;
        let raw_name = path::parse(&expanded, true)?.name;
        Ok(Self {
            source: name.to_string(),
            path: parsed,
            raw_name,
        })
    }

    /// Kind tokens of the selector.
    pub fn types(&self) -> &[String] {
        &self.path.types
    }

    /// Name segment used to build the candidate for `kind`.
    ///
    /// Text styles may live in a secondary namespace: when the selector's
    /// raw name carries a `_suffix`, that name is used verbatim, otherwise
    /// the object's own name is kept. Other kinds always use the stripped
    /// selector name.
    fn candidate_name_segment<'a>(&'a self, kind: ThemeKind, object: &'a ThemePath) -> &'a str {
        match kind {
            ThemeKind::Text if path::has_name_suffix(&self.raw_name) => &self.raw_name,
            ThemeKind::Text => &object.name,
            ThemeKind::Color | ThemeKind::Effect => &self.path.name,
        }
    }
}

/// What happened to one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotOutcome {
    /// Nothing to do: the slot is empty.
    Untouched,
    /// The slot now references a different style.
    Replaced {
        /// Previous style id.
        from: StyleId,
        /// New style id.
        to: StyleId,
    },
    /// The slot was left alone and a diagnostic was recorded.
    Reported,
}

/// Resolves alternate styles against a registry.
#[derive(Debug, Clone, Copy)]
pub struct ThemeResolver<'r> {
    registry: &'r StyleRegistry,
}

impl<'r> ThemeResolver<'r> {
    /// Creates a resolver over `registry`.
    pub fn new(registry: &'r StyleRegistry) -> Self {
        Self { registry }
    }

    /// Name of the sibling style for an object style parsed as `object`.
    pub fn candidate_name(&self, selector: &Selector, kind: ThemeKind, object: &ThemePath) -> String {
        format!(
            "{}/{}/{}/{}",
            kind.as_str(),
            selector.candidate_name_segment(kind, object),
            selector.path.variant,
            object.constant
        )
    }

    /// Rethemes `slot` of `node` for `kind`.
    ///
    /// The only mutation performed is assigning the resolved style id to the
    /// slot. Every other outcome leaves the node untouched.
    pub fn resolve_slot<N: ThemeNode>(
        &self,
        selector: &Selector,
        kind: ThemeKind,
        slot: StyleSlot,
        node: &mut N,
        diagnostics: &mut Diagnostics,
    ) -> SlotOutcome {
        let style_id = match slot_state(node, slot) {
            SlotState::Empty => return SlotOutcome::Untouched,
            SlotState::Inline => {
                diagnostics.push(node, DiagnosticKind::PlainValue { slot });
                return SlotOutcome::Reported;
            }
            SlotState::Referenced(id) => id.clone(),
        };

        let Some(object_style) = self.registry.lookup_by_id(&style_id) else {
            diagnostics.push(node, DiagnosticKind::UnknownReference { slot, style_id });
            return SlotOutcome::Reported;
        };

        let keep_suffix = kind == ThemeKind::Text;
        let parsed = path::is_valid(&object_style.name)
            .then(|| path::parse(&path::normalize(&object_style.name), keep_suffix).ok())
            .flatten();
        let Some(object) = parsed else {
            diagnostics.push(
                node,
                DiagnosticKind::SkippingUnparseableName {
                    slot,
                    style_name: object_style.name.clone(),
                },
            );
            return SlotOutcome::Reported;
        };

        let candidate = self.candidate_name(selector, kind, &object);
        let Some(alternate) = self.registry.lookup_by_name(&candidate) else {
            diagnostics.push(node, DiagnosticKind::UnknownTheme { slot, candidate });
            return SlotOutcome::Reported;
        };

        if !selector.path.matches_any_constant() && selector.path.constant != object.constant {
            diagnostics.push(
                node,
                DiagnosticKind::IgnoringThemeConst {
                    slot,
                    object_const: object.constant,
                    selector_const: selector.path.constant.clone(),
                },
            );
            return SlotOutcome::Reported;
        }

        trace!(
            retheme.node = %node.node_id(),
            retheme.slot = %slot,
            retheme.from = %object_style.name,
            retheme.to = %alternate.name,
            "Style replaced"
        );
        let to = alternate.id.clone();
        node.set_style_ref(slot, to.clone());
        SlotOutcome::Replaced { from: style_id, to }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeCategory;
    use crate::registry::StyleRecord;

    #[derive(Debug)]
    struct Leaf {
        id: NodeId,
        name: String,
        category: NodeCategory,
        fill: Option<StyleId>,
        fills: usize,
        text: Option<StyleId>,
    }

    impl Leaf {
        fn rect(fill: Option<&str>) -> Self {
            Self {
                id: NodeId::from("2:1"),
                name: "Badge".into(),
                category: NodeCategory::Rectangle,
                fill: fill.map(StyleId::from),
                fills: usize::from(fill.is_some()),
                text: None,
            }
        }
    }

    impl ThemeNode for Leaf {
        fn node_id(&self) -> &NodeId {
            &self.id
        }
        fn name(&self) -> &str {
            &self.name
        }
        fn category(&self) -> NodeCategory {
            self.category
        }
        fn style_ref(&self, slot: StyleSlot) -> Option<&StyleId> {
            match slot {
                StyleSlot::Fill => self.fill.as_ref(),
                StyleSlot::Text => self.text.as_ref(),
                _ => None,
            }
        }
        fn set_style_ref(&mut self, slot: StyleSlot, id: StyleId) {
            match slot {
                StyleSlot::Fill => self.fill = Some(id),
                StyleSlot::Text => self.text = Some(id),
                _ => {}
            }
        }
        fn inline_value_count(&self, slot: StyleSlot) -> usize {
            match slot {
                StyleSlot::Fill => self.fills,
                _ => 0,
            }
        }
        fn children_mut(&mut self) -> Option<&mut [Self]> {
            None
        }
    }

    fn registry() -> StyleRegistry {
        StyleRegistry::build([
            StyleRecord::new("S:day-accent", "ColorTheme/Pro/Day/accent", "k1"),
            StyleRecord::new("S:night-accent", "ColorTheme/Pro/Night/accent", "k2"),
            StyleRecord::new("S:day-muted", "ColorTheme/Pro/Day/muted", "k3"),
            StyleRecord::new("S:night-muted", "ColorTheme/Pro/Night/muted", "k4"),
            StyleRecord::new("S:loose", "just a swatch", "k5"),
            StyleRecord::new("S:day-legacy", "ColorTheme/Pro/Day/accent (legacy)", "k6"),
            StyleRecord::new("S:night-legacy", "ColorTheme/Pro/Night/accent (legacy)", "k7"),
        ])
    }

    fn selector(name: &str) -> Selector {
        Selector::parse(&NodeId::from("1:1"), name).unwrap()
    }

    fn resolve(selector_name: &str, node: &mut Leaf) -> (SlotOutcome, Diagnostics) {
        let registry = registry();
        let resolver = ThemeResolver::new(&registry);
        let mut diagnostics = Diagnostics::new();
        let outcome = resolver.resolve_slot(
            &selector(selector_name),
            ThemeKind::Color,
            StyleSlot::Fill,
            node,
            &mut diagnostics,
        );
        (outcome, diagnostics)
    }

    #[test]
    fn selector_rejects_invalid_root_names() {
        let err = Selector::parse(&NodeId::from("1:1"), "Night").unwrap_err();
        assert!(matches!(err, RethemeError::InvalidSelector { .. }));
    }

    #[test]
    fn selector_keeps_raw_name() {
        let sel = selector("TextTheme/Pro_Large/Night/*");
        assert_eq!(sel.path.name, "Pro");
        assert_eq!(sel.raw_name, "Pro_Large");
        assert_eq!(sel.types(), ["TextTheme".to_string()]);
    }

    #[test]
    fn wildcard_constant_always_substitutes() {
        let mut node = Leaf::rect(Some("S:day-muted"));
        let (outcome, diagnostics) = resolve("Pro/Night", &mut node);
        assert_eq!(
            outcome,
            SlotOutcome::Replaced {
                from: StyleId::from("S:day-muted"),
                to: StyleId::from("S:night-muted"),
            }
        );
        assert!(diagnostics.is_empty());
        assert_eq!(node.fill, Some(StyleId::from("S:night-muted")));
    }

    #[test]
    fn explicit_constant_must_match() {
        let mut node = Leaf::rect(Some("S:day-accent"));
        let (outcome, diagnostics) = resolve("ColorTheme/Pro/Night/accent", &mut node);
        assert!(matches!(outcome, SlotOutcome::Replaced { .. }));
        assert!(diagnostics.is_empty());

        let mut node = Leaf::rect(Some("S:day-muted"));
        let (outcome, diagnostics) = resolve("ColorTheme/Pro/Night/accent", &mut node);
        assert_eq!(outcome, SlotOutcome::Reported);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.records()[0].code(), "ignoring-theme-const");
        assert_eq!(node.fill, Some(StyleId::from("S:day-muted")));
    }

    #[test]
    fn missing_alternate_reports_candidate() {
        let mut node = Leaf::rect(Some("S:day-accent"));
        let (outcome, diagnostics) = resolve("Pro/Dusk", &mut node);
        assert_eq!(outcome, SlotOutcome::Reported);
        assert_eq!(
            diagnostics.records()[0].kind,
            DiagnosticKind::UnknownTheme {
                slot: StyleSlot::Fill,
                candidate: "ColorTheme/Pro/Dusk/accent".into()
            }
        );
        assert_eq!(node.fill, Some(StyleId::from("S:day-accent")));
    }

    #[test]
    fn unknown_reference_and_unparseable_names() {
        let mut node = Leaf::rect(Some("S:gone"));
        let (_, diagnostics) = resolve("Pro/Night", &mut node);
        assert_eq!(diagnostics.records()[0].code(), "unknown-reference");

        let mut node = Leaf::rect(Some("S:loose"));
        let (_, diagnostics) = resolve("Pro/Night", &mut node);
        assert_eq!(diagnostics.records()[0].code(), "skipping-unparseable-name");
    }

    #[test]
    fn parenthesised_style_name_is_literal() {
        let mut node = Leaf::rect(Some("S:day-legacy"));
        let (outcome, diagnostics) = resolve("Pro/Night", &mut node);
        assert_eq!(
            outcome,
            SlotOutcome::Replaced {
                from: StyleId::from("S:day-legacy"),
                to: StyleId::from("S:night-legacy"),
            }
        );
        assert!(diagnostics.is_empty());
        assert_eq!(node.fill, Some(StyleId::from("S:night-legacy")));
    }

    #[test]
    fn empty_and_inline_slots() {
        let mut node = Leaf::rect(None);
        let (outcome, diagnostics) = resolve("Pro/Night", &mut node);
        assert_eq!(outcome, SlotOutcome::Untouched);
        assert!(diagnostics.is_empty());

        node.fills = 1;
        let (outcome, diagnostics) = resolve("Pro/Night", &mut node);
        assert_eq!(outcome, SlotOutcome::Reported);
        assert_eq!(diagnostics.records()[0].code(), "plain-value");
        assert!(node.fill.is_none());
    }

    #[test]
    fn text_candidate_uses_suffixed_selector_name() {
        let registry = StyleRegistry::default();
        let resolver = ThemeResolver::new(&registry);
        let object = path::parse("TextTheme/Pro_Compact/Day/title", true).unwrap();

        let suffixed = selector("TextTheme/Pro_Large/Night/*");
        assert_eq!(
            resolver.candidate_name(&suffixed, ThemeKind::Text, &object),
            "TextTheme/Pro_Large/Night/title"
        );

        let plain = selector("TextTheme/Pro/Night/*");
        assert_eq!(
            resolver.candidate_name(&plain, ThemeKind::Text, &object),
            "TextTheme/Pro_Compact/Night/title"
        );

        let color_object = path::parse("ColorTheme/Pro_Compact/Day/title", false).unwrap();
        assert_eq!(
            resolver.candidate_name(&suffixed, ThemeKind::Color, &color_object),
            "ColorTheme/Pro/Night/title"
        );
    }
}
