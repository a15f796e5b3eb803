//! Style records and the two-index style registry.
//!
//! The registry is built once per run from an ordered sequence of records and
//! never mutated afterwards. Both indexes are last-write-wins, and the input
//! is ordered library styles first, local styles last, so a local style
//! overrides a library style with the same name.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Ephemeral identity of a loaded style. Only valid for one document load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleId(String);

impl StyleId {
    /// Creates a style id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StyleId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for StyleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Durable reference to a published style, stable across sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleKey(String);

impl StyleKey {
    /// Creates a style key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StyleKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl fmt::Display for StyleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named, identified, durably keyed style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRecord {
    /// Identity within the current load.
    pub id: StyleId,
    /// Theme-path shaped name, e.g. `ColorTheme/Pro/Day/accent`.
    pub name: String,
    /// Durable key used for re-import.
    pub key: StyleKey,
}

impl StyleRecord {
    /// Creates a style record.
    pub fn new(id: impl Into<String>, name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            id: StyleId::new(id),
            name: name.into(),
            key: StyleKey::new(key),
        }
    }
}

/// Immutable lookup of styles by id and by name.
#[derive(Debug, Clone, Default)]
pub struct StyleRegistry {
    records: Vec<StyleRecord>,
    by_id: HashMap<StyleId, usize>,
    by_name: HashMap<String, usize>,
}

impl StyleRegistry {
    /// Builds the registry from records ordered library-first, local-last.
    ///
    /// Later records win on both indexes.
    pub fn build(records: impl IntoIterator<Item = StyleRecord>) -> Self {
        let records: Vec<StyleRecord> = records.into_iter().collect();
        let mut by_id = HashMap::with_capacity(records.len());
        let mut by_name = HashMap::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            by_id.insert(record.id.clone(), index);
            by_name.insert(record.name.clone(), index);
        }

        debug!(
            registry.records = records.len(),
            registry.names = by_name.len(),
            "Style registry built"
        );

        Self {
            records,
            by_id,
            by_name,
        }
    }

    /// Style with the given id.
    pub fn lookup_by_id(&self, id: &StyleId) -> Option<&StyleRecord> {
        self.by_id.get(id).map(|&index| &self.records[index])
    }

    /// Style with the given name, local definitions taking precedence.
    pub fn lookup_by_name(&self, name: &str) -> Option<&StyleRecord> {
        self.by_name.get(name).map(|&index| &self.records[index])
    }

    /// Number of records the registry was built from.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the registry was built from no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<StyleRecord> for StyleRegistry {
    fn from_iter<I: IntoIterator<Item = StyleRecord>>(iter: I) -> Self {
        Self::build(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_id_and_name() {
        let registry = StyleRegistry::build([
            StyleRecord::new("S:1", "ColorTheme/Pro/Day/accent", "k1"),
            StyleRecord::new("S:2", "ColorTheme/Pro/Night/accent", "k2"),
        ]);
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.lookup_by_id(&StyleId::from("S:2")).unwrap().name,
            "ColorTheme/Pro/Night/accent"
        );
        assert_eq!(
            registry
                .lookup_by_name("ColorTheme/Pro/Day/accent")
                .unwrap()
                .id,
            StyleId::from("S:1")
        );
        assert!(registry.lookup_by_id(&StyleId::from("S:9")).is_none());
        assert!(registry.lookup_by_name("ColorTheme/Pro/Dusk/accent").is_none());
    }

    #[test]
    fn local_overrides_library_by_name() {
        let library = StyleRecord::new("L:1", "X", "lib-key");
        let local = StyleRecord::new("S:1", "X", "local-key");
        let registry = StyleRegistry::build([library, local]);

        let found = registry.lookup_by_name("X").unwrap();
        assert_eq!(found.id, StyleId::from("S:1"));
        // The shadowed record is still reachable by id.
        assert_eq!(
            registry.lookup_by_id(&StyleId::from("L:1")).unwrap().key,
            StyleKey::from("lib-key")
        );
    }

    #[test]
    fn empty_registry() {
        let registry: StyleRegistry = std::iter::empty::<StyleRecord>().collect();
        assert!(registry.is_empty());
        assert!(registry.lookup_by_name("anything").is_none());
    }

    #[test]
    fn record_serde_shape() {
        let record = StyleRecord::new("S:1", "ColorTheme/Pro/Day/accent", "abc");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"id":"S:1","name":"ColorTheme/Pro/Day/accent","key":"abc"}"#
        );
    }
}
