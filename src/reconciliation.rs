// ⚖️ Reconciliation Engine - keep the local collection in step with the server
//
// One-way pull: every server quote whose text is not already present
// locally is appended. One-way push: locally added quotes are posted.
//
// Identity is the quote text and nothing else. A server quote with the
// same text but another category is a duplicate; the local copy wins.

use crate::errors::Result;
use crate::quote::Quote;
use crate::remote::RemoteQuoteSource;
use crate::storage::KeyValueStore;
use crate::store::QuoteStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// SYNC OUTCOME
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncOutcome {
    /// Nothing new on the server; storage untouched
    UpToDate,

    /// New server quotes were appended and persisted
    Synced { added: Vec<Quote> },
}

impl SyncOutcome {
    pub fn is_synced(&self) -> bool {
        matches!(self, SyncOutcome::Synced { .. })
    }

    pub fn added_count(&self) -> usize {
        match self {
            SyncOutcome::UpToDate => 0,
            SyncOutcome::Synced { added } => added.len(),
        }
    }
}

// ============================================================================
// SYNC REPORT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    pub outcome: SyncOutcome,
    pub remote_count: usize,
    pub local_count: usize,
    pub reconciled_at: DateTime<Utc>,
}

impl SyncReport {
    pub fn is_synced(&self) -> bool {
        self.outcome.is_synced()
    }

    pub fn summary(&self) -> String {
        match &self.outcome {
            SyncOutcome::UpToDate => format!(
                "Up to date: {} server quotes, {} local quotes",
                self.remote_count, self.local_count
            ),
            SyncOutcome::Synced { added } => format!(
                "Synced {} new quote(s) from {} server quotes, {} local quotes",
                added.len(),
                self.remote_count,
                self.local_count
            ),
        }
    }
}

// ============================================================================
// RECONCILER
// ============================================================================

#[derive(Debug, Default, Clone, Copy)]
pub struct Reconciler;

impl Reconciler {
    pub fn new() -> Self {
        Reconciler
    }

    /// Fire-and-forget append to the server
    pub fn push_local<R: RemoteQuoteSource + ?Sized>(&self, remote: &mut R, quote: &Quote) {
        remote.post(quote.clone());
        log::info!("[REMOTE] Posted to server: {:?}", quote.text);
    }

    /// Pull every server quote with unseen text into the local store.
    ///
    /// Saves only when something was added. Calling it again with no new
    /// server data is a no-op.
    pub fn pull_remote<S, R>(&self, store: &mut QuoteStore<S>, remote: &R) -> Result<SyncReport>
    where
        S: KeyValueStore,
        R: RemoteQuoteSource + ?Sized,
    {
        log::debug!("[SYNC] Checking for server updates...");

        let server_quotes = remote.fetch();
        let remote_count = server_quotes.len();
        let mut added: Vec<Quote> = Vec::new();

        for server_quote in server_quotes {
            // A text repeated within one server batch lands only once
            let seen = store.contains_text(&server_quote.text)
                || added.iter().any(|q| q.text == server_quote.text);
            if !seen {
                added.push(server_quote);
            }
        }

        let outcome = if added.is_empty() {
            SyncOutcome::UpToDate
        } else {
            store.append_and_save(added.clone())?;
            log::info!("[SYNC] Merged {} new quote(s) from server", added.len());
            SyncOutcome::Synced { added }
        };

        Ok(SyncReport {
            outcome,
            remote_count,
            local_count: store.len(),
            reconciled_at: Utc::now(),
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::MockRemoteSource;
    use crate::storage::{MemoryStore, ReadOnlySwitch, QUOTES_KEY};

    fn local_store() -> QuoteStore<MemoryStore> {
        QuoteStore::load(MemoryStore::new()).unwrap()
    }

    #[test]
    fn test_pull_existing_text_is_noop() {
        let mut store = local_store();
        let writes = store.storage().write_count();
        let remote =
            MockRemoteSource::with_quotes(vec![Quote::new("Never stop learning.", "motivation").unwrap()]);

        let report = Reconciler::new().pull_remote(&mut store, &remote).unwrap();

        assert_eq!(report.outcome, SyncOutcome::UpToDate);
        assert!(!report.is_synced());
        assert_eq!(store.len(), 3);
        assert_eq!(store.storage().write_count(), writes);
    }

    #[test]
    fn test_pull_novel_text_is_merged() {
        let mut store = local_store();
        let writes = store.storage().write_count();
        let novel = Quote::new("Server wisdom prevails.", "server").unwrap();
        let remote = MockRemoteSource::with_quotes(vec![novel.clone()]);

        let report = Reconciler::new().pull_remote(&mut store, &remote).unwrap();

        assert!(report.is_synced());
        assert_eq!(report.outcome.added_count(), 1);
        assert_eq!(store.len(), 4);
        assert_eq!(store.quotes().last(), Some(&novel));
        assert_eq!(store.storage().write_count(), writes + 1);
    }

    #[test]
    fn test_category_difference_is_ignored() {
        let mut store = local_store();
        let remote =
            MockRemoteSource::with_quotes(vec![Quote::new("Believe in yourself.", "server").unwrap()]);

        let report = Reconciler::new().pull_remote(&mut store, &remote).unwrap();

        assert!(!report.is_synced());
        assert_eq!(store.quotes()[0].category, "inspiration");
    }

    #[test]
    fn test_pull_is_idempotent() {
        let mut store = local_store();
        let remote = MockRemoteSource::seeded();
        let reconciler = Reconciler::new();

        let first = reconciler.pull_remote(&mut store, &remote).unwrap();
        let writes = store.storage().write_count();
        let second = reconciler.pull_remote(&mut store, &remote).unwrap();

        assert_eq!(first.outcome.added_count(), 2);
        assert_eq!(second.outcome, SyncOutcome::UpToDate);
        assert_eq!(store.len(), 5);
        assert_eq!(store.storage().write_count(), writes);
    }

    #[test]
    fn test_duplicate_text_in_one_batch_lands_once() {
        let mut store = local_store();
        let remote = MockRemoteSource::with_quotes(vec![
            Quote::new("Twice told.", "echo").unwrap(),
            Quote::new("Twice told.", "echo").unwrap(),
        ]);

        let report = Reconciler::new().pull_remote(&mut store, &remote).unwrap();

        assert_eq!(report.outcome.added_count(), 1);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_push_then_pull_round_trip() {
        let mut store = local_store();
        let mut remote = MockRemoteSource::new();
        let reconciler = Reconciler::new();

        let quote = store.add("Hello", "Wisdom").unwrap();
        reconciler.push_local(&mut remote, &quote);

        assert_eq!(remote.fetch(), vec![quote]);
        // The server only holds what we already have
        let report = reconciler.pull_remote(&mut store, &remote).unwrap();
        assert!(!report.is_synced());
    }

    #[test]
    fn test_report_summary() {
        let mut store = local_store();
        let remote = MockRemoteSource::seeded();

        let report = Reconciler::new().pull_remote(&mut store, &remote).unwrap();

        assert_eq!(report.remote_count, 2);
        assert_eq!(report.local_count, 5);
        assert_eq!(
            report.summary(),
            "Synced 2 new quote(s) from 2 server quotes, 5 local quotes"
        );
    }

    #[test]
    fn test_failed_save_leaves_collection_untouched() {
        let mut store = QuoteStore::load(ReadOnlySwitch::default()).unwrap();
        store.storage_mut().read_only = true;
        let remote = MockRemoteSource::seeded();
        let reconciler = Reconciler::new();

        assert!(reconciler.pull_remote(&mut store, &remote).is_err());
        assert_eq!(store.len(), 3);
        let raw = store.storage().get(QUOTES_KEY).unwrap().unwrap();
        assert_eq!(crate::quote::decode_collection_str(&raw).unwrap().len(), 3);

        // The next pass after storage recovers merges everything
        store.storage_mut().read_only = false;
        let report = reconciler.pull_remote(&mut store, &remote).unwrap();
        assert_eq!(report.outcome.added_count(), 2);
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn test_report_serializes_for_json_output() {
        let mut store = local_store();
        let remote = MockRemoteSource::seeded();

        let report = Reconciler::new().pull_remote(&mut store, &remote).unwrap();
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["remote_count"], 2);
        assert_eq!(value["local_count"], 5);
        assert_eq!(value["outcome"]["Synced"]["added"].as_array().unwrap().len(), 2);
        assert!(value["reconciled_at"].is_string());
    }
}
