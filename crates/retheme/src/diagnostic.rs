//! Per-node diagnostics collected during a run.
//!
//! Diagnostics are data, not logs. They are appended in visitation order,
//! never mutated, and handed back to the caller as one batch.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::node::{NodeId, StyleSlot, ThemeNode};
use crate::registry::StyleId;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presentation group a diagnostic is reported under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    /// Styles that could not be resolved.
    Resolution,
    /// Substitutions skipped because the constant did not match the selector.
    IgnoredConstant,
    /// Slots holding plain values instead of styles.
    PlainValue,
}

/// What went wrong for one (node, slot) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// The slot holds an inline value rather than a style.
    PlainValue { slot: StyleSlot },
    /// The slot references a style missing from the registry.
    UnknownReference { slot: StyleSlot, style_id: StyleId },
    /// The referenced style's name is not a theme path.
    SkippingUnparseableName { slot: StyleSlot, style_name: String },
    /// No style exists under the derived alternate name.
    UnknownTheme { slot: StyleSlot, candidate: String },
    /// The object's constant differs from the selector's explicit constant.
    IgnoringThemeConst {
        slot: StyleSlot,
        object_const: String,
        selector_const: String,
    },
    /// The selector names a kind that is not recognised.
    UnknownKind { token: String, selector: String },
}

impl DiagnosticKind {
    /// Stable kebab-case code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::PlainValue { .. } => "plain-value",
            Self::UnknownReference { .. } => "unknown-reference",
            Self::SkippingUnparseableName { .. } => "skipping-unparseable-name",
            Self::UnknownTheme { .. } => "unknown-theme",
            Self::IgnoringThemeConst { .. } => "ignoring-theme-const",
            Self::UnknownKind { .. } => "unknown-kind",
        }
    }

    /// Severity implied by the kind.
    pub fn severity(&self) -> Severity {
        match self {
            Self::UnknownReference { .. } | Self::UnknownTheme { .. } | Self::UnknownKind { .. } => {
                Severity::Error
            }
            Self::PlainValue { .. }
            | Self::SkippingUnparseableName { .. }
            | Self::IgnoringThemeConst { .. } => Severity::Warning,
        }
    }

    /// Presentation bucket.
    pub fn bucket(&self) -> Bucket {
        match self {
            Self::IgnoringThemeConst { .. } => Bucket::IgnoredConstant,
            Self::PlainValue { .. } => Bucket::PlainValue,
            _ => Bucket::Resolution,
        }
    }

    fn describe(&self, object: &str) -> String {
        match self {
            Self::PlainValue { slot } => {
                format!("Plain {slot} value used for object '{object}'")
            }
            Self::UnknownReference { slot, style_id } => format!(
                "Unknown {slot} style id '{style_id}' for object '{object}'. Probably imported from a deleted library"
            ),
            Self::SkippingUnparseableName { style_name, .. } => {
                format!("Skipping theme '{style_name}' for object '{object}'")
            }
            Self::UnknownTheme { candidate, .. } => {
                format!("Unknown theme '{candidate}' for object '{object}'")
            }
            Self::IgnoringThemeConst {
                object_const,
                selector_const,
                ..
            } => format!(
                "Ignoring theme const '{object_const}' for object '{object}', selector asks for '{selector_const}'"
            ),
            Self::UnknownKind { token, selector } => {
                format!("Unknown theme type '{token}' for theme path '{selector}'")
            }
        }
    }
}

/// A single diagnostic record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Node the diagnostic is about.
    pub node: NodeId,
    /// Node name at the time the diagnostic was raised.
    pub node_name: String,
    /// Severity.
    pub severity: Severity,
    /// Human readable message.
    pub message: String,
    /// Structured detail.
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    /// Creates a diagnostic for `node`.
    pub fn new(node: NodeId, node_name: impl Into<String>, kind: DiagnosticKind) -> Self {
        let node_name = node_name.into();
        Self {
            message: kind.describe(&node_name),
            severity: kind.severity(),
            node,
            node_name,
            kind,
        }
    }

    /// Stable kebab-case code.
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} [{}]", self.severity, self.message, self.node)
    }
}

/// Append-only collector for one run.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic about `node`.
    pub fn push<N: ThemeNode>(&mut self, node: &N, kind: DiagnosticKind) {
        self.records
            .push(Diagnostic::new(node.node_id().clone(), node.name(), kind));
    }

    /// Records in emission order.
    pub fn records(&self) -> &[Diagnostic] {
        &self.records
    }

    /// Iterates records in emission order.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.records.iter()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records with the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.records
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Whether any error-severity record exists.
    pub fn has_errors(&self) -> bool {
        self.count(Severity::Error) > 0
    }

    /// Groups the records for presentation.
    pub fn report(&self) -> Report {
        let mut report = Report::default();
        for record in &self.records {
            match record.kind.bucket() {
                Bucket::Resolution => report.resolution.push(record.clone()),
                Bucket::IgnoredConstant => report.ignored_constants.push(record.clone()),
                Bucket::PlainValue => report.plain_values.push(record.clone()),
            }
        }
        report
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Diagnostics grouped into presentation buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Unresolvable references, themes, names and kinds.
    pub resolution: Vec<Diagnostic>,
    /// Skipped substitutions due to constant mismatch.
    pub ignored_constants: Vec<Diagnostic>,
    /// Plain values without styles.
    pub plain_values: Vec<Diagnostic>,
}

impl Report {
    /// All records, bucket by bucket, emission order within each.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.resolution
            .iter()
            .chain(&self.ignored_constants)
            .chain(&self.plain_values)
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.resolution.len() + self.ignored_constants.len() + self.plain_values.len()
    }

    /// Whether the report is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
