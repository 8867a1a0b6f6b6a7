use std::sync::Arc;

use crate::domain::Report;

use super::{REPORTS_KEY, SENDER_NAME_KEY, Store};

/// Sole owner of all report instances. Ordered newest-first; every mutation
/// re-serializes the entire snapshot to the injected store. Expected volume is
/// a single user's archive, so full-snapshot writes are the contract.
pub struct ReportRepository {
    store: Arc<dyn Store>,
    reports: Vec<Report>,
}

impl ReportRepository {
    /// Loads the persisted sequence. Fails soft: a read or parse error is
    /// logged and the repository starts empty instead of crashing startup.
    pub fn load(store: Arc<dyn Store>) -> Self {
        let reports = match store.get(REPORTS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Report>>(&raw) {
                Ok(reports) => reports,
                Err(e) => {
                    tracing::error!(error = %e, "Discarding malformed report snapshot");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to read report snapshot");
                Vec::new()
            }
        };

        tracing::info!(count = reports.len(), "Report repository loaded");
        ReportRepository { store, reports }
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn get(&self, id: &str) -> Option<&Report> {
        self.reports.iter().find(|r| r.id == id)
    }

    /// Inserts at the front: the newest report is always index 0.
    pub fn add(&mut self, report: Report) {
        self.reports.insert(0, report);
        self.persist();
    }

    /// Removes the matching entry. A missing id is a no-op.
    pub fn remove(&mut self, id: &str) {
        self.reports.retain(|r| r.id != id);
        self.persist();
    }

    /// Swaps a report's content in place, preserving its id and position.
    /// Returns the stored result, or `None` when the id is unknown.
    pub fn replace(&mut self, id: &str, mut updated: Report) -> Option<Report> {
        let slot = self.reports.iter_mut().find(|r| r.id == id)?;
        updated.id = slot.id.clone();
        *slot = updated;
        let stored = slot.clone();
        self.persist();
        Some(stored)
    }

    pub fn sender_name(&self) -> Option<String> {
        match self.store.get(SENDER_NAME_KEY) {
            Ok(name) => name,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read sender name");
                None
            }
        }
    }

    pub fn remember_sender(&self, name: &str) {
        if let Err(e) = self.store.put(SENDER_NAME_KEY, name) {
            tracing::warn!(error = %e, "Failed to persist sender name");
        }
    }

    /// Writes follow the in-memory mutation they mirror; a backend error is
    /// logged and the in-memory state stays authoritative for the session.
    fn persist(&self) {
        match serde_json::to_string(&self.reports) {
            Ok(snapshot) => {
                if let Err(e) = self.store.put(REPORTS_KEY, &snapshot) {
                    tracing::warn!(error = %e, "Failed to persist report snapshot");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Failed to serialize report snapshot"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Language, ReportConfig, ReportType};
    use crate::store::MemoryStore;

    fn report(id: &str, title: &str) -> Report {
        Report {
            id: id.to_string(),
            title: title.to_string(),
            content: format!("content of {title}"),
            kind: ReportType::Formal,
            recipient: "Ministry".to_string(),
            sender_name: "Ali".to_string(),
            language: Language::Arabic,
            logo_url: None,
            created_at: 1_700_000_000_000,
        }
    }

    fn persisted(store: &MemoryStore) -> Vec<Report> {
        let raw = store.get(REPORTS_KEY).unwrap().unwrap_or_else(|| "[]".into());
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn test_load_empty_store() {
        let repo = ReportRepository::load(Arc::new(MemoryStore::new()));
        assert!(repo.reports().is_empty());
    }

    #[test]
    fn test_load_discards_malformed_snapshot() {
        let store = MemoryStore::with_entries([(REPORTS_KEY.to_string(), "{not json".to_string())]);
        let repo = ReportRepository::load(Arc::new(store));
        assert!(repo.reports().is_empty());
    }

    #[test]
    fn test_load_restores_persisted_order() {
        let reports = vec![report("2", "newer"), report("1", "older")];
        let store = MemoryStore::with_entries([(
            REPORTS_KEY.to_string(),
            serde_json::to_string(&reports).unwrap(),
        )]);
        let repo = ReportRepository::load(Arc::new(store));
        assert_eq!(repo.reports(), reports.as_slice());
    }

    #[test]
    fn test_add_places_newest_first_and_persists() {
        let store = Arc::new(MemoryStore::new());
        let mut repo = ReportRepository::load(store.clone());

        repo.add(report("1", "first"));
        repo.add(report("2", "second"));

        assert_eq!(repo.reports()[0].id, "2");
        assert_eq!(repo.reports()[1].id, "1");
        assert_eq!(persisted(&store), repo.reports());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let mut repo = ReportRepository::load(store.clone());
        repo.add(report("1", "only"));

        let before = persisted(&store);
        repo.remove("missing");
        assert_eq!(repo.reports().len(), 1);
        assert_eq!(persisted(&store), before);

        repo.remove("1");
        repo.remove("1");
        assert!(repo.reports().is_empty());
        assert!(persisted(&store).is_empty());
    }

    #[test]
    fn test_replace_preserves_position_and_id() {
        let store = Arc::new(MemoryStore::new());
        let mut repo = ReportRepository::load(store.clone());
        repo.add(report("1", "oldest"));
        repo.add(report("2", "middle"));
        repo.add(report("3", "newest"));

        let mut updated = report("999", "middle");
        updated.content = "rewritten".to_string();
        let stored = repo.replace("2", updated).unwrap();

        assert_eq!(stored.id, "2");
        assert_eq!(repo.reports()[1].id, "2");
        assert_eq!(repo.reports()[1].content, "rewritten");
        assert_eq!(persisted(&store), repo.reports());
    }

    #[test]
    fn test_replace_unknown_id_returns_none() {
        let mut repo = ReportRepository::load(Arc::new(MemoryStore::new()));
        assert!(repo.replace("missing", report("missing", "x")).is_none());
    }

    #[test]
    fn test_snapshot_round_trips_after_every_mutation() {
        let store = Arc::new(MemoryStore::new());
        let mut repo = ReportRepository::load(store.clone());

        repo.add(report("1", "a"));
        assert_eq!(persisted(&store), repo.reports());

        repo.add(report("2", "b"));
        assert_eq!(persisted(&store), repo.reports());

        repo.replace("1", report("1", "a2"));
        assert_eq!(persisted(&store), repo.reports());

        repo.remove("2");
        assert_eq!(persisted(&store), repo.reports());
    }

    #[test]
    fn test_sender_name_memory() {
        let store = Arc::new(MemoryStore::new());
        let repo = ReportRepository::load(store.clone());
        assert!(repo.sender_name().is_none());

        repo.remember_sender("A. Noor");
        assert_eq!(repo.sender_name().as_deref(), Some("A. Noor"));
    }

    #[test]
    fn test_add_from_config_round_trip() {
        let store = Arc::new(MemoryStore::new());
        let mut repo = ReportRepository::load(store.clone());
        let config = ReportConfig {
            topic: "Budget Review".to_string(),
            recipient: "Finance Dept".to_string(),
            sender_name: "A. Noor".to_string(),
            language: Language::English,
            logo_url: Some("data:image/png;base64,AAAA".to_string()),
            ..Default::default()
        };
        repo.add(Report::from_config(config, "Dear Sir...".to_string()));

        let reloaded = ReportRepository::load(store);
        assert_eq!(reloaded.reports(), repo.reports());
    }
}
