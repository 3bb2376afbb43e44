//! Durable state slot: one JSON document under a fixed key in a Sled DB.
//! Direct host filesystem; writes are flushed before returning.

use std::path::Path;

use crate::error::MindcopyResult;
use crate::policy;
use crate::state::{RawStateDocument, StateDocument};

pub const DEFAULT_STORE_PATH: &str = "./data/mind_state";
pub const DEFAULT_STATE_KEY: &str = "mind_state";

/// Sled-backed slot holding the state document.
pub struct StateStore {
    db: sled::Db,
    key: String,
}

impl StateStore {
    /// Open the slot at `path` (default `./data/mind_state`) under the default key.
    pub fn open(path: Option<impl AsRef<Path>>) -> MindcopyResult<Self> {
        let p = path
            .map(|x| x.as_ref().to_path_buf())
            .unwrap_or_else(|| Path::new(DEFAULT_STORE_PATH).to_path_buf());
        let db = sled::open(p)?;
        Ok(Self::with_db(db, DEFAULT_STATE_KEY))
    }

    /// Open the slot at `path` under a custom key.
    pub fn open_keyed(path: impl AsRef<Path>, key: &str) -> MindcopyResult<Self> {
        let db = sled::open(path)?;
        Ok(Self::with_db(db, key))
    }

    /// In-memory slot that disappears on drop. Used by tests.
    pub fn open_temporary() -> MindcopyResult<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self::with_db(db, DEFAULT_STATE_KEY))
    }

    pub fn with_db(db: sled::Db, key: impl Into<String>) -> Self {
        Self {
            db,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the slot. Absent, unreadable or unparsable content yields an empty document.
    pub fn load(&self) -> RawStateDocument {
        let bytes = match self.db.get(self.key.as_bytes()) {
            Ok(Some(v)) => v,
            Ok(None) => return RawStateDocument::default(),
            Err(e) => {
                tracing::warn!(
                    target: "mindcopy::store",
                    error = %e,
                    policy = %policy::STATE_READ,
                    "state slot read failed; starting from an empty document"
                );
                return RawStateDocument::default();
            }
        };
        match serde_json::from_slice::<RawStateDocument>(&bytes) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(
                    target: "mindcopy::store",
                    error = %e,
                    policy = %policy::STATE_READ,
                    "state slot unparsable; starting from an empty document"
                );
                RawStateDocument::default()
            }
        }
    }

    /// Load and fill missing top-level keys.
    pub fn load_filled(&self) -> StateDocument {
        self.load().fill_defaults()
    }

    pub fn save(&self, doc: &StateDocument) -> MindcopyResult<()> {
        let bytes = serde_json::to_vec(doc)?;
        self.write(&bytes)
    }

    /// Persist a document exactly as given, without filling defaults.
    pub fn save_raw(&self, raw: &RawStateDocument) -> MindcopyResult<()> {
        let bytes = serde_json::to_vec(raw)?;
        self.write(&bytes)
    }

    fn write(&self, bytes: &[u8]) -> MindcopyResult<()> {
        self.db.insert(self.key.as_bytes(), bytes)?;
        self.db.flush()?;
        tracing::debug!(
            target: "mindcopy::store",
            bytes = bytes.len(),
            "state slot written"
        );
        Ok(())
    }

    /// Write arbitrary bytes into the slot. Test helper for corrupt-slot scenarios.
    #[cfg(test)]
    pub(crate) fn write_bytes(&self, bytes: &[u8]) -> MindcopyResult<()> {
        self.write(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Modes, DEFAULT_NAME};

    #[test]
    fn missing_slot_loads_empty() {
        let store = StateStore::open_temporary().unwrap();
        assert!(store.load().is_empty());
        assert_eq!(store.load_filled().profile.name, DEFAULT_NAME);
    }

    #[test]
    fn unparsable_slot_loads_empty() {
        let store = StateStore::open_temporary().unwrap();
        store.write_bytes(b"{not json").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = StateStore::open_temporary().unwrap();
        let mut doc = StateDocument::default();
        doc.modes.elinor = 5;
        doc.profile.voice = "Quiet.".to_string();
        store.save(&doc).unwrap();
        assert_eq!(store.load_filled(), doc);
    }

    #[test]
    fn save_raw_keeps_absent_keys_absent() {
        let store = StateStore::open_temporary().unwrap();
        let raw = RawStateDocument {
            modes: Some(Modes::default()),
            ..Default::default()
        };
        store.save_raw(&raw).unwrap();
        let loaded = store.load();
        assert!(loaded.profile.is_none());
        assert_eq!(loaded.modes, Some(Modes::default()));
    }

    #[test]
    fn reopened_store_sees_saved_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mind_state");
        {
            let store = StateStore::open(Some(&path)).unwrap();
            let mut doc = StateDocument::default();
            doc.profile.name = "Second run".to_string();
            store.save(&doc).unwrap();
        }
        let store = StateStore::open(Some(&path)).unwrap();
        assert_eq!(store.load_filled().profile.name, "Second run");
    }
}
