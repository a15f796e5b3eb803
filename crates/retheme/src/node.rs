//! Node capability interface and style slot adapter.
//!
//! The engine never sees a concrete design tree. It reads and writes nodes
//! through [`ThemeNode`], and decides which style kinds apply to a node with
//! the closed [`Capability`] classifier.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::path::ThemeKind;
use crate::registry::StyleId;

/// Identity of a node in the host document. Used to attribute diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Creates a node id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One of the four style-reference slots a node may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleSlot {
    /// Fill paint.
    Fill,
    /// Stroke paint.
    Stroke,
    /// Effect list.
    Effect,
    /// Text style.
    Text,
}

impl StyleSlot {
    /// Lowercase slot name used in messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fill => "fill",
            Self::Stroke => "stroke",
            Self::Effect => "effect",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for StyleSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape category of a node, as reported by the host tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeCategory {
    Frame,
    ComponentSet,
    Component,
    Instance,
    Text,
    Rectangle,
    Ellipse,
    Vector,
    BooleanOperation,
    Group,
    Line,
    Polygon,
    Star,
    Slice,
    Section,
    Page,
    #[serde(other)]
    Other,
}

/// What a node can be rethemed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Carries no themable style slots.
    None,
    /// Carries fill, stroke and effect slots.
    Paintable,
    /// Paintable, and also carries a text style slot.
    TextCapable,
}

impl Capability {
    /// Classifies a node category.
    pub fn classify(category: NodeCategory) -> Self {
        match category {
            NodeCategory::Text => Self::TextCapable,
            NodeCategory::Frame
            | NodeCategory::ComponentSet
            | NodeCategory::Component
            | NodeCategory::Instance
            | NodeCategory::Rectangle
            | NodeCategory::Ellipse
            | NodeCategory::Vector
            | NodeCategory::BooleanOperation => Self::Paintable,
            _ => Self::None,
        }
    }

    /// Whether styles of `kind` apply to a node with this capability.
    pub fn allows(self, kind: ThemeKind) -> bool {
        match kind {
            ThemeKind::Color | ThemeKind::Effect => self != Self::None,
            ThemeKind::Text => self == Self::TextCapable,
        }
    }
}

/// Capability interface the engine consumes from the host document.
pub trait ThemeNode {
    /// Stable identity of this node.
    fn node_id(&self) -> &NodeId;

    /// Display name. On selection roots this is the selector theme path.
    fn name(&self) -> &str;

    /// Shape category used for [`Capability`] classification.
    fn category(&self) -> NodeCategory;

    /// Style id assigned to `slot`, if any.
    fn style_ref(&self, slot: StyleSlot) -> Option<&StyleId>;

    /// Assigns a style id to `slot`.
    fn set_style_ref(&mut self, slot: StyleSlot, id: StyleId);

    /// Number of inline (unreferenced) values held in `slot`.
    fn inline_value_count(&self, slot: StyleSlot) -> usize;

    /// Children, or `None` for nodes that cannot have any.
    fn children_mut(&mut self) -> Option<&mut [Self]>
    where
        Self: Sized;
}

/// What a node holds in one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState<'a> {
    /// Nothing to retheme.
    Empty,
    /// A plain value with no style reference.
    Inline,
    /// A style reference (inline values, if any, are ignored).
    Referenced(&'a StyleId),
}

/// Reads the state of `slot` on `node`.
pub fn slot_state<N: ThemeNode>(node: &N, slot: StyleSlot) -> SlotState<'_> {
    match node.style_ref(slot) {
        Some(id) => SlotState::Referenced(id),
        None if node.inline_value_count(slot) > 0 => SlotState::Inline,
        None => SlotState::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_paintable_categories() {
        for category in [
            NodeCategory::Frame,
            NodeCategory::ComponentSet,
            NodeCategory::Component,
            NodeCategory::Instance,
            NodeCategory::Rectangle,
            NodeCategory::Ellipse,
            NodeCategory::Vector,
            NodeCategory::BooleanOperation,
        ] {
            assert_eq!(Capability::classify(category), Capability::Paintable);
        }
        assert_eq!(
            Capability::classify(NodeCategory::Text),
            Capability::TextCapable
        );
        for category in [
            NodeCategory::Group,
            NodeCategory::Line,
            NodeCategory::Page,
            NodeCategory::Other,
        ] {
            assert_eq!(Capability::classify(category), Capability::None);
        }
    }

    #[test]
    fn capability_allows_kinds() {
        assert!(Capability::Paintable.allows(ThemeKind::Color));
        assert!(Capability::Paintable.allows(ThemeKind::Effect));
        assert!(!Capability::Paintable.allows(ThemeKind::Text));
        assert!(Capability::TextCapable.allows(ThemeKind::Text));
        assert!(Capability::TextCapable.allows(ThemeKind::Color));
        assert!(!Capability::None.allows(ThemeKind::Color));
    }

    #[test]
    fn category_serde_uses_host_names() {
        let category: NodeCategory = serde_json::from_str("\"BOOLEAN_OPERATION\"").unwrap();
        assert_eq!(category, NodeCategory::BooleanOperation);
        let unknown: NodeCategory = serde_json::from_str("\"STICKY\"").unwrap();
        assert_eq!(unknown, NodeCategory::Other);
    }
}
