//! Fatal run errors.
//!
//! Only structurally invalid input aborts a run. Everything a style library
//! can get wrong at runtime is reported through [`crate::diagnostic`] instead.

use thiserror::Error;

use crate::node::NodeId;

/// Error that aborts a whole retheme run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RethemeError {
    /// A selection root's name is not a usable theme path.
    #[error("Theme path is invalid: {path} (node {node})")]
    InvalidSelector {
        /// The selection root carrying the bad name.
        node: NodeId,
        /// The root name as written.
        path: String,
    },

    /// A theme path was parsed before being validated and expanded.
    #[error("Malformed theme path '{path}': expected 4 segments, found {segments}")]
    MalformedPath {
        /// The offending text.
        path: String,
        /// How many non-empty segments it has.
        segments: usize,
    },
}

/// Result alias for engine operations.
pub type RethemeResult<T> = Result<T, RethemeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_selector_display_names_path() {
        let err = RethemeError::InvalidSelector {
            node: NodeId::from("1:2"),
            path: "Pro".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Theme path is invalid: Pro"));
        assert!(msg.contains("1:2"));
    }

    #[test]
    fn malformed_path_display_counts_segments() {
        let err = RethemeError::MalformedPath {
            path: "Pro/Day".into(),
            segments: 2,
        };
        assert_eq!(
            err.to_string(),
            "Malformed theme path 'Pro/Day': expected 4 segments, found 2"
        );
    }
}
