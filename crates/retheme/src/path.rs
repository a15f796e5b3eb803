//! Theme path grammar.
//!
//! A theme path is a `/`-delimited name with the shape
//! `{kinds}/{name}/{variant}/{const}`:
//!
//! - `kinds` is a comma-separated list of [`ThemeKind`] tokens, or `*`
//! - `name` is the theme family, optionally tagged with a `_suffix` namespace
//! - `variant` is the theme state (`Day`, `Night`, ...)
//! - `const` is the semantic constant (`accent`, ...) or `*`
//!
//! The same syntax names selection roots (selectors) and styles. A two
//! segment selector such as `Pro/Night` is shorthand for
//! `ColorTheme,EffectTheme,TextTheme/Pro/Night/*`.
//!
//! # Example
//!
//! ```rust
//! use retheme::path;
//!
//! assert!(path::is_valid("Pro/Night"));
//! assert_eq!(
//!     path::expand("Pro/Night"),
//!     "ColorTheme,EffectTheme,TextTheme/Pro/Night/*"
//! );
//!
//! let parsed = path::parse("ColorTheme/Pro_Text/Day/accent", false).unwrap();
//! assert_eq!(parsed.name, "Pro");
//! assert_eq!(parsed.constant, "accent");
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{RethemeError, RethemeResult};
use crate::node::StyleSlot;

/// Wildcard segment.
pub const WILDCARD: &str = "*";

/// Expansion of a wildcard or omitted kinds segment.
pub const ALL_KINDS: &str = "ColorTheme,EffectTheme,TextTheme";

/// First non-empty parenthesised group of a selector name.
static PAREN_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((.+?)\)").expect("paren group pattern is valid"));

/// A `_` and everything after it on the same line.
static NAME_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_.+").expect("name suffix pattern is valid"));

/// Kind of style a theme path governs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeKind {
    /// Fill and stroke paints.
    #[serde(rename = "ColorTheme")]
    Color,
    /// Shadows, blurs and other effects.
    #[serde(rename = "EffectTheme")]
    Effect,
    /// Typography.
    #[serde(rename = "TextTheme")]
    Text,
}

impl ThemeKind {
    /// All kinds, in expansion order.
    pub const ALL: [Self; 3] = [Self::Color, Self::Effect, Self::Text];

    /// The token used in theme paths.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Color => "ColorTheme",
            Self::Effect => "EffectTheme",
            Self::Text => "TextTheme",
        }
    }

    /// Parses a kinds-segment token. Tokens are case sensitive.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "ColorTheme" => Some(Self::Color),
            "EffectTheme" => Some(Self::Effect),
            "TextTheme" => Some(Self::Text),
            _ => None,
        }
    }

    /// Node slots driven by this kind, each resolved independently.
    pub fn slots(self) -> &'static [StyleSlot] {
        match self {
            Self::Color => &[StyleSlot::Fill, StyleSlot::Stroke],
            Self::Effect => &[StyleSlot::Effect],
            Self::Text => &[StyleSlot::Text],
        }
    }
}

impl fmt::Display for ThemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed, four-segment theme path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemePath {
    /// Kind tokens as written. Unrecognised tokens are kept so callers can
    /// report them.
    pub types: Vec<String>,
    /// Theme family, with or without its `_suffix` depending on how it was parsed.
    pub name: String,
    /// Variant identifier.
    pub variant: String,
    /// Constant identifier or `*`.
    pub constant: String,
}

impl ThemePath {
    /// Whether the constant segment is the wildcard.
    pub fn matches_any_constant(&self) -> bool {
        self.constant == WILDCARD
    }

    /// Recognised kinds, in the order they were written.
    pub fn kinds(&self) -> impl Iterator<Item = ThemeKind> + '_ {
        self.types.iter().filter_map(|t| ThemeKind::from_token(t))
    }
}

impl fmt::Display for ThemePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.types.join(","),
            self.name,
            self.variant,
            self.constant
        )
    }
}

/// Splits on `/`, trims each segment and drops empty ones.
pub fn parse_raw(text: &str) -> Vec<&str> {
    split_trimmed(text, '/')
}

/// True iff the path has exactly 2 or 4 non-empty segments.
pub fn is_valid(text: &str) -> bool {
    matches!(parse_raw(text).len(), 2 | 4)
}

/// Expands a selector name into the full four-segment form.
///
/// If the text contains a parenthesised group, only the group is used, so a
/// frame may be named `Checkout (Pro/Night)`. The path is then passed through
/// [`normalize`].
pub fn expand(text: &str) -> String {
    normalize(parenthesized(text).unwrap_or(text))
}

/// Rewrites shorthand and wildcard kinds into the full four-segment form.
///
/// Style names go through this directly: parentheses in a style name are
/// ordinary characters. Text that needs no rewriting is returned unchanged.
pub fn normalize(text: &str) -> String {
    match parse_raw(text).as_slice() {
        [name, variant] => format!("{ALL_KINDS}/{name}/{variant}/{WILDCARD}"),
        ["*", name, variant, constant] => format!("{ALL_KINDS}/{name}/{variant}/{constant}"),
        _ => text.to_string(),
    }
}

/// Parses an expanded four-segment path.
///
/// Unless `keep_suffix` is set, the `_suffix` namespace tag is stripped from
/// the name segment (see [`strip_name_suffix`]).
///
/// # Errors
/// Returns [`RethemeError::MalformedPath`] when the text does not have exactly
/// four segments. Callers validate with [`is_valid`] and [`expand`] first.
pub fn parse(text: &str, keep_suffix: bool) -> RethemeResult<ThemePath> {
    let parts = parse_raw(text);
    let [types, name, variant, constant] = parts.as_slice() else {
        return Err(RethemeError::MalformedPath {
            path: text.to_string(),
            segments: parts.len(),
        });
    };

    let name = if keep_suffix {
        Cow::Borrowed(*name)
    } else {
        strip_name_suffix(name)
    };

    Ok(ThemePath {
        types: split_trimmed(types, ',')
            .into_iter()
            .map(str::to_string)
            .collect(),
        name: name.into_owned(),
        variant: (*variant).to_string(),
        constant: (*constant).to_string(),
    })
}

/// Removes the first `_` that has at least one character after it, along
/// with the rest of that line. `Pro_Text` becomes `Pro`; `Pro_` is kept.
///
/// Only `\n` ends a line. `\r`, `\u{2028}` and `\u{2029}` are ordinary
/// characters and are removed with the suffix.
pub fn strip_name_suffix(name: &str) -> Cow<'_, str> {
    NAME_SUFFIX.replacen(name, 1, "")
}

/// Whether a name carries a `_suffix` namespace marker.
pub fn has_name_suffix(name: &str) -> bool {
    name.contains('_')
}

fn split_trimmed(text: &str, sep: char) -> Vec<&str> {
    text.split(sep)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Contents of the first `( ... )` group with at least one character inside.
///
/// The group may not span a `\n`; any other character, `\r` included, may
/// appear inside it.
fn parenthesized(text: &str) -> Option<&str> {
    PAREN_GROUP
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|group| group.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_raw_trims_and_drops_empty() {
        assert_eq!(parse_raw(" Pro / / Day/ "), vec!["Pro", "Day"]);
        assert!(parse_raw("").is_empty());
        assert!(parse_raw(" / / ").is_empty());
    }

    #[test]
    fn validity_by_segment_count() {
        assert!(is_valid("Pro/Day"));
        assert!(is_valid("ColorTheme/Pro/Day/accent"));
        assert!(is_valid("/Pro//Day/"));
        assert!(!is_valid("Pro"));
        assert!(!is_valid("a/b/c"));
        assert!(!is_valid("a/b/c/d/e"));
        assert!(!is_valid(""));
        assert!(!is_valid("///"));
    }

    #[test]
    fn expand_two_segments() {
        assert_eq!(
            expand("Pro/Day"),
            "ColorTheme,EffectTheme,TextTheme/Pro/Day/*"
        );
        assert_eq!(
            expand(" Pro / Day "),
            "ColorTheme,EffectTheme,TextTheme/Pro/Day/*"
        );
    }

    #[test]
    fn expand_wildcard_kinds() {
        assert_eq!(
            expand("*/Pro/Day/accent"),
            "ColorTheme,EffectTheme,TextTheme/Pro/Day/accent"
        );
    }

    #[test]
    fn expand_is_identity_on_full_paths() {
        assert_eq!(
            expand("ColorTheme/Pro/Day/accent"),
            "ColorTheme/Pro/Day/accent"
        );
        assert_eq!(expand("a/b/c"), "a/b/c");
    }

    #[test]
    fn expand_uses_parenthesized_group() {
        assert_eq!(
            expand("Checkout (Pro/Night)"),
            "ColorTheme,EffectTheme,TextTheme/Pro/Night/*"
        );
        assert_eq!(
            expand("Card (TextTheme/Pro_Large/Day/title) v2"),
            "TextTheme/Pro_Large/Day/title"
        );
        // An empty group is skipped and the whole text is expanded.
        assert_eq!(
            expand("() Pro/Day"),
            "ColorTheme,EffectTheme,TextTheme/() Pro/Day/*"
        );
    }

    #[test]
    fn normalize_keeps_parentheses() {
        assert_eq!(
            normalize("ColorTheme/Pro/Day/accent (legacy)"),
            "ColorTheme/Pro/Day/accent (legacy)"
        );
        assert_eq!(
            normalize("*/Pro/Day/accent (legacy)"),
            "ColorTheme,EffectTheme,TextTheme/Pro/Day/accent (legacy)"
        );
        assert_eq!(
            normalize("Checkout (Pro/Night)"),
            "ColorTheme,EffectTheme,TextTheme/Checkout (Pro/Night)/*"
        );
    }

    #[test]
    fn line_breaks_other_than_newline_are_ordinary() {
        assert_eq!(strip_name_suffix("Pro_\rX"), "Pro");
        assert_eq!(strip_name_suffix("Pro_X\u{2028}Y"), "Pro");
        assert_eq!(strip_name_suffix("Pro_X\nDay"), "Pro\nDay");
        assert_eq!(strip_name_suffix("Pro_\nDay"), "Pro_\nDay");
        assert_eq!(parenthesized("(Pro/\rNight)"), Some("Pro/\rNight"));
        assert_eq!(parenthesized("(Pro/\nNight) (Pro/Day)"), Some("Pro/Day"));
    }

    #[test]
    fn parse_splits_kinds() {
        let path = parse("ColorTheme, TextTheme/Pro/Day/accent", false).unwrap();
        assert_eq!(path.types, vec!["ColorTheme", "TextTheme"]);
        assert_eq!(
            path.kinds().collect::<Vec<_>>(),
            vec![ThemeKind::Color, ThemeKind::Text]
        );
        assert_eq!(path.variant, "Day");
        assert_eq!(path.constant, "accent");
        assert!(!path.matches_any_constant());
    }

    #[test]
    fn parse_strips_suffix_unless_kept() {
        let stripped = parse("TextTheme/Pro_Large/Day/title", false).unwrap();
        assert_eq!(stripped.name, "Pro");
        let kept = parse("TextTheme/Pro_Large/Day/title", true).unwrap();
        assert_eq!(kept.name, "Pro_Large");
    }

    #[test]
    fn parse_rejects_unexpanded_text() {
        let err = parse("Pro/Day", false).unwrap_err();
        assert_eq!(
            err,
            RethemeError::MalformedPath {
                path: "Pro/Day".into(),
                segments: 2
            }
        );
        assert!(parse("", false).is_err());
    }

    #[test]
    fn strip_suffix_edge_cases() {
        assert_eq!(strip_name_suffix("Pro_Text"), "Pro");
        assert_eq!(strip_name_suffix("Pro_Text_Big"), "Pro");
        assert_eq!(strip_name_suffix("Pro_"), "Pro_");
        assert_eq!(strip_name_suffix("Pro"), "Pro");
        assert_eq!(strip_name_suffix("_Pro"), "");
        assert_eq!(strip_name_suffix("Pro__x"), "Pro");
    }

    #[test]
    fn display_round_trips_full_path() {
        let path = parse("ColorTheme,EffectTheme/Pro/Night/*", false).unwrap();
        assert_eq!(path.to_string(), "ColorTheme,EffectTheme/Pro/Night/*");
        assert!(path.matches_any_constant());
    }

    #[test]
    fn kind_tokens() {
        for kind in ThemeKind::ALL {
            assert_eq!(ThemeKind::from_token(kind.as_str()), Some(kind));
        }
        assert_eq!(ThemeKind::from_token("colortheme"), None);
        assert_eq!(ThemeKind::Color.slots(), &[StyleSlot::Fill, StyleSlot::Stroke]);
        assert_eq!(ThemeKind::Text.slots(), &[StyleSlot::Text]);
    }
}
