//! Draft persistence for in-progress form input.
//!
//! A draft is a plain field-name-to-value map, overwritten on every change
//! and read back once when the form is (re)mounted. Autosave failures are
//! logged and swallowed; the in-memory fields remain authoritative.

use crate::storage::KeyValueStore;
use std::collections::BTreeMap;
use std::sync::Arc;

/// In-progress, unsubmitted form field values.
pub type DraftFormData = BTreeMap<String, String>;

/// Persists one form's draft under the key `form_<form-id>`.
pub struct DraftStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl DraftStore {
    /// Create a draft store bound to a form id.
    pub fn new(store: Arc<dyn KeyValueStore>, form_id: &str) -> Self {
        Self {
            store,
            key: format!("form_{}", form_id),
        }
    }

    /// Overwrite the persisted draft with the current fields.
    pub fn save(&self, fields: &DraftFormData) {
        let payload = match serde_json::to_string(fields) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Failed to serialize draft: {}", e);
                return;
            }
        };

        if let Err(e) = self.store.set(&self.key, &payload) {
            tracing::warn!("Failed to save draft (input will not survive reload): {}", e);
        }
    }

    /// Read the persisted draft, if any.
    ///
    /// A missing key, a storage failure, or a malformed payload all yield
    /// `None`; the caller simply starts with empty fields.
    pub fn load(&self) -> Option<DraftFormData> {
        let payload = match self.store.get(&self.key) {
            Ok(payload) => payload?,
            Err(e) => {
                tracing::warn!("Failed to read draft: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&payload) {
            Ok(fields) => Some(fields),
            Err(e) => {
                tracing::debug!("Discarding malformed draft payload: {}", e);
                None
            }
        }
    }

    /// Remove the persisted draft.
    pub fn clear(&self) {
        if let Err(e) = self.store.remove(&self.key) {
            tracing::warn!("Failed to clear draft: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn draft(fields: &[(&str, &str)]) -> DraftFormData {
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_save_and_load() {
        let store = Arc::new(MemoryStore::new());
        let drafts = DraftStore::new(store, "contact");

        assert_eq!(drafts.load(), None);

        let fields = draft(&[("name", "Ada"), ("email", "ada@example.com")]);
        drafts.save(&fields);
        assert_eq!(drafts.load(), Some(fields));
    }

    #[test]
    fn test_save_overwrites_previous_draft() {
        let store = Arc::new(MemoryStore::new());
        let drafts = DraftStore::new(store, "contact");

        drafts.save(&draft(&[("name", "Ada")]));
        drafts.save(&draft(&[("name", "Grace")]));

        assert_eq!(drafts.load(), Some(draft(&[("name", "Grace")])));
    }

    #[test]
    fn test_clear_removes_draft() {
        let store = Arc::new(MemoryStore::new());
        let drafts = DraftStore::new(store, "contact");

        drafts.save(&draft(&[("name", "Ada")]));
        drafts.clear();
        assert_eq!(drafts.load(), None);
    }

    #[test]
    fn test_malformed_draft_treated_as_absent() {
        let store = Arc::new(MemoryStore::new());
        store.set("form_contact", "{not json").unwrap();

        let drafts = DraftStore::new(store, "contact");
        assert_eq!(drafts.load(), None);
    }

    #[test]
    fn test_key_includes_form_id() {
        let store = Arc::new(MemoryStore::new());
        let drafts = DraftStore::new(store.clone(), "contact");

        drafts.save(&draft(&[("name", "Ada")]));
        assert!(store.get("form_contact").unwrap().is_some());

        let other = DraftStore::new(store, "newsletter");
        assert_eq!(other.load(), None);
    }
}
