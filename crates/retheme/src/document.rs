//! Serde-backed design document.
//!
//! A [`Document`] is a file-friendly stand-in for a host design tool: it
//! carries the local styles, the library styles that can be re-imported by
//! key, the current selection, and the node trees. [`DocNode`] implements
//! [`ThemeNode`], so the engine runs on it directly.
//!
//! ```json
//! {
//!   "styles": { "paint": [{ "id": "S:1", "name": "ColorTheme/Pro/Day/accent", "key": "k1" }] },
//!   "selection": ["1:0"],
//!   "nodes": [{ "id": "1:0", "name": "Pro/Night", "type": "FRAME", "children": [] }]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::error::RethemeError;
use crate::node::{NodeCategory, NodeId, StyleSlot, ThemeNode};
use crate::registry::{StyleId, StyleKey, StyleRecord, StyleRegistry};
use crate::source::{ImportError, LocalStyles, StyleImporter};
use crate::walker::{RunOutcome, TreeWalker};

/// Error loading, saving or rethemeing a document.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("No node with id '{0}' in the document")]
    UnknownNode(NodeId),
    #[error(transparent)]
    Retheme(#[from] RethemeError),
}

/// One node of a document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocNode {
    pub id: NodeId,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub category: NodeCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_style_id: Option<StyleId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_style_id: Option<StyleId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect_style_id: Option<StyleId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_style_id: Option<StyleId>,
    /// Inline fill paints. Opaque to the engine.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fills: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub strokes: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub text: Vec<serde_json::Value>,
    /// `None` for nodes that cannot have children.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<DocNode>>,
}

impl DocNode {
    /// Creates a childless node with no styles.
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: NodeCategory) -> Self {
        Self {
            id: NodeId::new(id),
            name: name.into(),
            category,
            fill_style_id: None,
            stroke_style_id: None,
            effect_style_id: None,
            text_style_id: None,
            fills: Vec::new(),
            strokes: Vec::new(),
            effects: Vec::new(),
            text: Vec::new(),
            children: None,
        }
    }

    /// Sets the style reference for `slot`.
    #[must_use]
    pub fn with_style(mut self, slot: StyleSlot, id: impl Into<String>) -> Self {
        self.set_style_ref(slot, StyleId::new(id));
        self
    }

    /// Adds children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<DocNode>) -> Self {
        self.children = Some(children);
        self
    }

    fn inline_values(&self, slot: StyleSlot) -> &[serde_json::Value] {
        match slot {
            StyleSlot::Fill => &self.fills,
            StyleSlot::Stroke => &self.strokes,
            StyleSlot::Effect => &self.effects,
            StyleSlot::Text => &self.text,
        }
    }

    fn slot_mut(&mut self, slot: StyleSlot) -> &mut Option<StyleId> {
        match slot {
            StyleSlot::Fill => &mut self.fill_style_id,
            StyleSlot::Stroke => &mut self.stroke_style_id,
            StyleSlot::Effect => &mut self.effect_style_id,
            StyleSlot::Text => &mut self.text_style_id,
        }
    }
}

impl ThemeNode for DocNode {
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
            StyleSlot::Fill => self.fill_style_id.as_ref(),
            StyleSlot::Stroke => self.stroke_style_id.as_ref(),
            StyleSlot::Effect => self.effect_style_id.as_ref(),
            StyleSlot::Text => self.text_style_id.as_ref(),
        }
    }

    fn set_style_ref(&mut self, slot: StyleSlot, id: StyleId) {
        *self.slot_mut(slot) = Some(id);
    }

    fn inline_value_count(&self, slot: StyleSlot) -> usize {
        self.inline_values(slot).len()
    }

    fn children_mut(&mut self) -> Option<&mut [Self]> {
        self.children.as_deref_mut()
    }
}

/// A design document: styles, selection and node trees.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    /// Styles defined in the document itself.
    pub styles: LocalStyles,
    /// Published styles available for import by key.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub library: Vec<StyleRecord>,
    /// Selected root node ids, in order.
    pub selection: Vec<NodeId>,
    /// Top-level node trees.
    pub nodes: Vec<DocNode>,
}

impl Document {
    /// Load a document from JSON text.
    ///
    /// # Errors
    /// Returns `DocumentError` if JSON parsing fails.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a document from TOML text.
    ///
    /// # Errors
    /// Returns `DocumentError` if TOML parsing fails.
    pub fn from_toml(toml: &str) -> Result<Self, DocumentError> {
        Ok(toml::from_str(toml)?)
    }

    /// Load a document from a file (format inferred by extension).
    ///
    /// # Errors
    /// Returns `DocumentError` if reading or parsing fails.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            Some("toml") => Self::from_toml(&content),
            Some(ext) => Err(DocumentError::UnsupportedFormat(ext.into())),
            None => Err(DocumentError::UnsupportedFormat("unknown".into())),
        }
    }

    /// Serialize this document to JSON.
    ///
    /// # Errors
    /// Returns `DocumentError` if serialization fails.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Serialize this document to TOML.
    ///
    /// # Errors
    /// Returns `DocumentError` if serialization fails.
    pub fn to_toml(&self) -> Result<String, DocumentError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save this document to a file (format inferred by extension).
    ///
    /// # Errors
    /// Returns `DocumentError` if serialization or writing fails.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let path = path.as_ref();
        let content = match path.extension().and_then(|e| e.to_str()) {
            Some("json") | None => self.to_json()?,
            Some("toml") => self.to_toml()?,
            Some(ext) => return Err(DocumentError::UnsupportedFormat(ext.into())),
        };
        fs::write(path, content)?;
        Ok(())
    }

    /// Node with the given id, searched depth-first.
    pub fn find(&self, id: &NodeId) -> Option<&DocNode> {
        find_node(&self.nodes, id)
    }

    /// Mutable node with the given id, searched depth-first.
    pub fn find_mut(&mut self, id: &NodeId) -> Option<&mut DocNode> {
        find_node_mut(&mut self.nodes, id)
    }

    /// Registry over the library styles and the local styles, local last.
    ///
    /// Unlike [`crate::source::restore_styles`] this includes every library
    /// style, not only the ones whose keys were synced.
    pub fn registry(&self) -> StyleRegistry {
        StyleRegistry::build(
            self.library
                .iter()
                .chain(self.styles.records())
                .cloned(),
        )
    }

    /// Rethemes every selected root in order.
    ///
    /// All ids are checked before anything is mutated. After that, roots are
    /// processed one by one and an invalid selector aborts the run with
    /// earlier roots already rethemed.
    ///
    /// # Errors
    /// Returns [`DocumentError::UnknownNode`] for an id not in the document,
    /// or [`DocumentError::Retheme`] for an invalid selector.
    pub fn apply_theme(
        &mut self,
        registry: &StyleRegistry,
        selection: &[NodeId],
    ) -> Result<RunOutcome, DocumentError> {
        if let Some(missing) = selection.iter().find(|id| self.find(id).is_none()) {
            return Err(DocumentError::UnknownNode(missing.clone()));
        }

        let mut walker = TreeWalker::new(registry);
        for id in selection {
            let root = self
                .find_mut(id)
                .ok_or_else(|| DocumentError::UnknownNode(id.clone()))?;
            walker.apply_root(root)?;
        }
        Ok(walker.finish())
    }
}

impl StyleImporter for Document {
    fn import_by_key(&self, key: &StyleKey) -> Result<StyleRecord, ImportError> {
        let found = self.library.iter().rev().find(|record| &record.key == key);
        debug!(style.key = %key, found = found.is_some(), "Library lookup");
        let record = found.ok_or_else(|| ImportError::UnknownKey(key.clone()))?;
        // Nodes reference styles by id, so an id-less record cannot be applied.
        if record.id.as_str().is_empty() {
            return Err(ImportError::Failed {
                key: key.clone(),
                reason: "library style has no id".into(),
            });
        }
        Ok(record.clone())
    }
}

fn find_node<'a>(nodes: &'a [DocNode], id: &NodeId) -> Option<&'a DocNode> {
    for node in nodes {
        if &node.id == id {
            return Some(node);
        }
        if let Some(found) = node.children.as_deref().and_then(|c| find_node(c, id)) {
            return Some(found);
        }
    }
    None
}

fn find_node_mut<'a>(nodes: &'a mut [DocNode], id: &NodeId) -> Option<&'a mut DocNode> {
    for node in nodes {
        if &node.id == id {
            return Some(node);
        }
        if let Some(children) = node.children.as_deref_mut() {
            if let Some(found) = find_node_mut(children, id) {
                return Some(found);
            }
        }
    }
    None
}
