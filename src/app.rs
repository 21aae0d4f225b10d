// 🧭 Quote Session - the facade a front end drives
//
// Owns the store, the session slots, the server, the sync schedule and the
// notices, and wires them in the same order every time:
//   add    → save → refresh categories → post to server → notice
//   import → save → refresh categories → notice
//   sync   → merge → save → refresh categories → notice (only if changed)

use crate::categories::{CategoryFilter, CategoryIndex};
use crate::config::Config;
use crate::errors::{QuoteError, Result};
use crate::notice::{Notice, NoticeLevel, Notices};
use crate::quote::Quote;
use crate::reconciliation::{Reconciler, SyncReport};
use crate::remote::{MockRemoteSource, RemoteQuoteSource};
use crate::scheduler::SyncSchedule;
use crate::selection::{filter_by_category, last_quote, pick_random, remember_last_quote};
use crate::storage::{KeyValueStore, MemoryStore, SqliteStore};
use crate::store::QuoteStore;
use rand::Rng;
use std::path::Path;
use std::time::Instant;

pub const ADD_OK_MESSAGE: &str = "Quote added and synced!";
pub const ADD_INVALID_MESSAGE: &str = "Please fill both quote and category.";
pub const IMPORT_OK_MESSAGE: &str = "Quotes imported successfully!";
pub const IMPORT_FAILED_MESSAGE: &str = "Import failed: Invalid file.";
pub const SYNCED_MESSAGE: &str = "New quotes synced from server.";

/// Session backed by SQLite, in-memory session slots and the mock server
pub type DefaultSession = QuoteSession<SqliteStore, MemoryStore, MockRemoteSource>;

pub struct QuoteSession<P: KeyValueStore, S: KeyValueStore, R: RemoteQuoteSource> {
    store: QuoteStore<P>,
    session: S,
    remote: R,
    reconciler: Reconciler,
    schedule: SyncSchedule,
    notices: Notices,
    categories: Vec<String>,
    filter: CategoryFilter,
}

impl DefaultSession {
    /// Open the SQLite store from config and seed the mock server
    pub fn open(config: &Config) -> Result<Self> {
        let durable = SqliteStore::open(&config.db_path)?;
        Self::with_stores(
            durable,
            MemoryStore::new(),
            MockRemoteSource::seeded(),
            config,
            Instant::now(),
        )
    }
}

impl<P: KeyValueStore, S: KeyValueStore, R: RemoteQuoteSource> QuoteSession<P, S, R> {
    pub fn with_stores(
        durable: P,
        session: S,
        remote: R,
        config: &Config,
        now: Instant,
    ) -> Result<Self> {
        let store = QuoteStore::load(durable)?;

        let mut schedule = SyncSchedule::new(config.sync_interval);
        schedule.start(now);

        let mut app = QuoteSession {
            store,
            session,
            remote,
            reconciler: Reconciler::new(),
            schedule,
            notices: Notices::new(config.notice_ttl),
            categories: Vec::new(),
            filter: CategoryFilter::All,
        };
        app.refresh_categories()?;

        log::info!(
            "[SESSION] Ready with {} quotes in {} categories (filter: {})",
            app.store.len(),
            app.categories.len(),
            app.filter
        );
        Ok(app)
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn quotes(&self) -> &[Quote] {
        self.store.quotes()
    }

    pub fn store(&self) -> &QuoteStore<P> {
        &self.store
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    pub fn schedule(&self) -> &SyncSchedule {
        &self.schedule
    }

    pub fn current_notice(&self, now: Instant) -> Option<&Notice> {
        self.notices.current(now)
    }

    pub fn last_quote(&self) -> Result<Option<Quote>> {
        last_quote(&self.session)
    }

    // ========================================================================
    // OPERATIONS
    // ========================================================================

    /// Pick a random quote under the current filter and remember it for the
    /// session. `None` means the category is empty.
    pub fn show_random_quote<G: Rng + ?Sized>(&mut self, rng: &mut G) -> Result<Option<Quote>> {
        let picked = {
            let candidates = filter_by_category(self.store.quotes(), &self.filter);
            pick_random(&candidates, rng).quote().cloned()
        };

        if let Some(quote) = &picked {
            remember_last_quote(&mut self.session, quote)?;
        }
        Ok(picked)
    }

    pub fn add_quote(&mut self, text: &str, category: &str, now: Instant) -> Result<Quote> {
        let quote = match self.store.add(text, category) {
            Ok(quote) => quote,
            Err(e) => {
                if e.is_validation() {
                    self.notices.push(ADD_INVALID_MESSAGE, NoticeLevel::Error, now);
                }
                return Err(e);
            }
        };

        self.refresh_categories()?;
        self.reconciler.push_local(&mut self.remote, &quote);
        self.notices.push(ADD_OK_MESSAGE, NoticeLevel::Success, now);
        Ok(quote)
    }

    /// Apply and persist a filter choice ("all" or a category)
    pub fn set_filter(&mut self, value: &str) -> Result<&CategoryFilter> {
        let filter = CategoryFilter::parse(value);
        CategoryIndex::select(self.store.storage_mut(), &filter)?;
        self.filter = filter;
        Ok(&self.filter)
    }

    /// Step through "all" followed by each category, wrapping around
    pub fn cycle_filter(&mut self, forward: bool) -> Result<&CategoryFilter> {
        let mut options = vec![CategoryFilter::All];
        options.extend(
            self.categories
                .iter()
                .map(|c| CategoryFilter::Category(c.clone())),
        );

        let current = options.iter().position(|f| *f == self.filter).unwrap_or(0);
        let next = if forward {
            (current + 1) % options.len()
        } else {
            (current + options.len() - 1) % options.len()
        };

        let value = options[next].as_str().to_string();
        self.set_filter(&value)
    }

    pub fn export_to_file(&mut self, path: &Path, now: Instant) -> Result<usize> {
        let snapshot = self.store.export_snapshot()?;
        std::fs::write(path, snapshot)?;

        let count = self.store.len();
        log::info!("[SESSION] Exported {} quotes to {:?}", count, path);
        self.notices.push(
            format!("Exported {} quotes to {}", count, path.display()),
            NoticeLevel::Info,
            now,
        );
        Ok(count)
    }

    pub fn import_from_file(&mut self, path: &Path, now: Instant) -> Result<usize> {
        let imported = std::fs::read_to_string(path)
            .map_err(QuoteError::from)
            .and_then(|raw| self.store.import_json(&raw));

        match imported {
            Ok(count) => {
                self.refresh_categories()?;
                self.notices.push(IMPORT_OK_MESSAGE, NoticeLevel::Success, now);
                Ok(count)
            }
            Err(e) => {
                log::warn!("[SESSION] Import from {:?} failed: {}", path, e);
                self.notices.push(IMPORT_FAILED_MESSAGE, NoticeLevel::Error, now);
                Err(e)
            }
        }
    }

    /// Run one reconciliation pass right away
    pub fn sync_now(&mut self, now: Instant) -> Result<SyncReport> {
        let report = self.reconciler.pull_remote(&mut self.store, &self.remote)?;

        if report.is_synced() {
            self.refresh_categories()?;
            self.notices.push(SYNCED_MESSAGE, NoticeLevel::Info, now);
        }
        Ok(report)
    }

    /// Drive the periodic sync; returns a report only when a pass ran
    pub fn tick(&mut self, now: Instant) -> Result<Option<SyncReport>> {
        self.notices.prune(now);

        if self.schedule.poll(now) {
            return self.sync_now(now).map(Some);
        }
        Ok(None)
    }

    pub fn stop_sync(&mut self) {
        self.schedule.stop();
        log::info!("[SESSION] Periodic sync stopped");
    }

    pub fn start_sync(&mut self, now: Instant) {
        self.schedule.start(now);
    }

    /// Rebuild the category list and re-apply the persisted filter
    fn refresh_categories(&mut self) -> Result<()> {
        self.categories = CategoryIndex::recompute(self.store.quotes());
        let saved = CategoryIndex::selected(self.store.storage())?;
        self.filter = CategoryIndex::restore(saved, &self.categories);
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
