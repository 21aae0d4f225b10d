// Quote Keeper - Core Library
// Exposes all modules for use in the CLI, the terminal UI, and tests

pub mod errors;
pub mod quote;
pub mod storage;
pub mod store;
pub mod categories;
pub mod selection;
pub mod remote;
pub mod reconciliation;
pub mod scheduler;
pub mod notice;
pub mod config;
pub mod app;

// Re-export commonly used types
pub use errors::{QuoteError, Result};
pub use quote::{
    Quote, DecodeError,
    decode_collection, decode_collection_str, decode_quote, normalize_category,
};
pub use storage::{
    KeyValueStore, SqliteStore, MemoryStore,
    QUOTES_KEY, SELECTED_CATEGORY_KEY, LAST_QUOTE_KEY,
};
pub use store::{QuoteStore, DEFAULT_QUOTES, default_quotes};
pub use categories::{CategoryFilter, CategoryIndex, ALL_CATEGORIES, display_label};
pub use selection::{
    QuotePick, filter_by_category, pick_random, remember_last_quote, last_quote,
};
pub use remote::{RemoteQuoteSource, MockRemoteSource, SERVER_SEED_QUOTES};
pub use reconciliation::{Reconciler, SyncOutcome, SyncReport};
pub use scheduler::{SyncSchedule, DEFAULT_SYNC_INTERVAL};
pub use notice::{Notice, NoticeLevel, Notices, DEFAULT_NOTICE_TTL};
pub use config::{Config, EXPORT_FILE_NAME};
pub use app::{QuoteSession, DefaultSession};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
