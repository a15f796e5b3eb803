//! Assembling the style sequence a registry is built from.
//!
//! Styles previously imported from libraries are restored from their durable
//! keys, then the document's own styles are appended. The order matters:
//! the registry is last-write-wins, so local styles shadow imported ones.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::registry::{StyleKey, StyleRecord};
use crate::store::{KeyStore, StoreError};

/// Failure to import a style by key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("No published style with key '{0}'")]
    UnknownKey(StyleKey),
    #[error("Import of '{key}' failed: {reason}")]
    Failed { key: StyleKey, reason: String },
}

/// Re-imports a published style from its durable key.
pub trait StyleImporter {
    /// Imports the style published under `key`.
    ///
    /// # Errors
    /// Returns `ImportError` if the style is unknown or cannot be imported.
    fn import_by_key(&self, key: &StyleKey) -> Result<StyleRecord, ImportError>;
}

/// The document's own styles, grouped the way the host lists them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalStyles {
    /// Color styles.
    pub paint: Vec<StyleRecord>,
    /// Shadow and blur styles.
    pub effect: Vec<StyleRecord>,
    /// Typography styles.
    pub text: Vec<StyleRecord>,
}

impl LocalStyles {
    /// All local records, paint then effect then text.
    pub fn records(&self) -> impl Iterator<Item = &StyleRecord> {
        self.paint.iter().chain(&self.effect).chain(&self.text)
    }

    /// Durable keys of all local records, in the same order.
    pub fn keys(&self) -> Vec<StyleKey> {
        self.records().map(|record| record.key.clone()).collect()
    }

    /// Number of local records.
    pub fn len(&self) -> usize {
        self.paint.len() + self.effect.len() + self.text.len()
    }

    /// Whether the document defines no styles.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builds the ordered record sequence for one run.
///
/// Every stored key is re-imported; keys that fail to import are skipped.
/// Local styles follow, so they take precedence by name.
///
/// # Errors
/// Returns `StoreError` if the stored keys cannot be loaded.
pub fn restore_styles<S, I>(
    local: &LocalStyles,
    store: &S,
    importer: &I,
) -> Result<Vec<StyleRecord>, StoreError>
where
    S: KeyStore + ?Sized,
    I: StyleImporter + ?Sized,
{
    let keys = store.load()?;
    let mut records = Vec::with_capacity(keys.len() + local.len());
    let mut skipped = 0usize;

    for key in &keys {
        match importer.import_by_key(key) {
            Ok(record) => records.push(record),
            Err(err) => {
                skipped += 1;
                debug!(style.key = %key, error = %err, "Skipping stored style key");
            }
        }
    }
    let imported = records.len();
    records.extend(local.records().cloned());

    debug!(
        styles.imported = imported,
        styles.skipped = skipped,
        styles.local = local.len(),
        "Styles restored"
    );
    Ok(records)
}

/// Replaces the stored keys with the keys of every local style.
///
/// Returns the number of keys written.
///
/// # Errors
/// Returns `StoreError` if the store cannot be written.
pub fn sync_style_keys<S>(local: &LocalStyles, store: &S) -> Result<usize, StoreError>
where
    S: KeyStore + ?Sized,
{
    let keys = local.keys();
    store.save(&keys)?;
    info!(styles.keys = keys.len(), "Style keys synced");
    Ok(keys.len())
}
