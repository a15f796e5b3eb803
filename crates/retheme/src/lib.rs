#![forbid(unsafe_code)]
// Allow pedantic lints for API ergonomics.
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::collapsible_if)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

//! # Retheme
//!
//! Swaps the styles of a design tree from one theme variant to another.
//!
//! Styles are named with hierarchical theme paths such as
//! `ColorTheme/Pro/Day/accent`. A selection root named `Pro/Night` asks for
//! every style below it to be replaced by its `Night` sibling with the same
//! constant, here `ColorTheme/Pro/Night/accent`.
//!
//! ## Quick Start
//!
//! ```rust
//! use retheme::prelude::*;
//!
//! let mut doc = Document::default();
//! doc.styles.paint = vec![
//!     StyleRecord::new("S:1", "ColorTheme/Pro/Day/accent", "k1"),
//!     StyleRecord::new("S:2", "ColorTheme/Pro/Night/accent", "k2"),
//! ];
//! doc.nodes = vec![
//!     DocNode::new("1:0", "Pro/Night", NodeCategory::Frame).with_children(vec![
//!         DocNode::new("1:1", "Button", NodeCategory::Rectangle).with_style(StyleSlot::Fill, "S:1"),
//!     ]),
//! ];
//!
//! let registry = doc.registry();
//! let outcome = doc.apply_theme(&registry, &[NodeId::from("1:0")]).unwrap();
//! assert!(outcome.diagnostics.is_empty());
//! assert_eq!(
//!     doc.find(&NodeId::from("1:1")).unwrap().fill_style_id,
//!     Some(StyleId::from("S:2"))
//! );
//! ```
//!
//! ## Modules
//!
//! - [`path`]: theme path grammar
//! - [`registry`]: style records and the id/name registry
//! - [`node`]: the node capability interface engines run against
//! - [`resolver`]: per-slot substitution policy
//! - [`walker`]: selection traversal
//! - [`diagnostic`]: per-node diagnostics and the grouped report
//! - [`source`], [`store`]: restoring imported styles and persisting their keys
//! - [`document`]: a serde document model implementing [`ThemeNode`]

pub mod diagnostic;
pub mod document;
pub mod error;
pub mod node;
pub mod path;
pub mod registry;
pub mod resolver;
pub mod source;
pub mod store;
pub mod walker;

pub use diagnostic::{Diagnostic, DiagnosticKind, Diagnostics, Report, Severity};
pub use document::{DocNode, Document, DocumentError};
pub use error::{RethemeError, RethemeResult};
pub use node::{Capability, NodeCategory, NodeId, StyleSlot, ThemeNode};
pub use path::{ThemeKind, ThemePath};
pub use registry::{StyleId, StyleKey, StyleRecord, StyleRegistry};
pub use resolver::{Selector, SlotOutcome, ThemeResolver};
pub use source::{ImportError, LocalStyles, StyleImporter, restore_styles, sync_style_keys};
pub use store::{FileKeyStore, KeyStore, MemoryKeyStore, StoreError};
pub use walker::{RunOutcome, TreeWalker, WalkStats};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::diagnostic::{Diagnostic, Diagnostics, Report, Severity};
    pub use crate::document::{DocNode, Document};
    pub use crate::error::RethemeError;
    pub use crate::node::{NodeCategory, NodeId, StyleSlot, ThemeNode};
    pub use crate::registry::{StyleId, StyleKey, StyleRecord, StyleRegistry};
    pub use crate::source::{LocalStyles, StyleImporter, restore_styles, sync_style_keys};
    pub use crate::store::{FileKeyStore, KeyStore, MemoryKeyStore};
    pub use crate::walker::{RunOutcome, TreeWalker};
}
