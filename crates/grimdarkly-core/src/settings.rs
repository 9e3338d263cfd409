// ── User preferences ──
//
// One persisted boolean: whether variant content (built-in sub-factions,
// sub-faction keyword tags) is shown. Read once when loaded, written
// through on every change.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::error::CoreError;

/// Fixed storage key of the variant-content toggle.
pub const SHOW_VARIANTS_KEY: &str = "grimdarkly.showVariants";

/// String key/value storage backing [`Preferences`].
pub trait PreferenceStore: Send + Sync {
    /// Stored value, or `None` when absent or unreadable.
    fn load(&self, key: &str) -> Option<String>;

    fn store(&self, key: &str, value: &str) -> Result<(), CoreError>;
}

/// In-process store for tests and sessions without a data directory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut values) = store.values.lock() {
            values.insert(key.to_owned(), value.to_owned());
        }
        store
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn store(&self, key: &str, value: &str) -> Result<(), CoreError> {
        self.values
            .lock()
            .map_err(|_| CoreError::Internal("preference store lock poisoned".into()))?
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Process-wide settings value.
pub struct Preferences<S: PreferenceStore> {
    store: S,
    show_variants: bool,
}

impl<S: PreferenceStore> Preferences<S> {
    /// Read the stored value once. Missing or unparsable values mean `true`.
    pub fn load(store: S) -> Self {
        let show_variants = match store.load(SHOW_VARIANTS_KEY) {
            Some(raw) => raw.trim().parse::<bool>().unwrap_or_else(|_| {
                warn!(value = %raw, "unparsable variant preference; using default");
                true
            }),
            None => true,
        };
        debug!(show_variants, "preferences loaded");
        Self {
            store,
            show_variants,
        }
    }

    pub fn show_variants(&self) -> bool {
        self.show_variants
    }

    /// Update and persist. The in-memory value changes even if the write
    /// fails; the error is returned for the caller to report.
    pub fn set_show_variants(&mut self, value: bool) -> Result<(), CoreError> {
        self.show_variants = value;
        self.store.store(SHOW_VARIANTS_KEY, &value.to_string())
    }

    /// Flip the toggle; returns the new value.
    pub fn toggle_variants(&mut self) -> Result<bool, CoreError> {
        let next = !self.show_variants;
        self.set_show_variants(next)?;
        Ok(next)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
