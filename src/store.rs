// 📚 Quote Store - the in-memory collection mirrored to a storage slot
//
// Every append goes through `append_and_save`, which undoes the append when
// the save fails, so the persisted snapshot never drifts from memory. Load never fails on bad data: anything undecodable
// is replaced with the default set.

use crate::errors::{QuoteError, Result};
use crate::quote::{decode_collection, decode_collection_str, normalize_category, Quote};
use crate::storage::{KeyValueStore, QUOTES_KEY};
use serde_json::Value;

/// Installed when nothing usable is in storage
pub const DEFAULT_QUOTES: [(&str, &str); 3] = [
    ("Believe in yourself.", "inspiration"),
    ("Life is short. Enjoy it.", "life"),
    ("Never stop learning.", "motivation"),
];

pub fn default_quotes() -> Vec<Quote> {
    DEFAULT_QUOTES
        .iter()
        .map(|(text, category)| Quote {
            text: text.to_string(),
            category: category.to_string(),
        })
        .collect()
}

pub struct QuoteStore<S: KeyValueStore> {
    storage: S,
    quotes: Vec<Quote>,
}

impl<S: KeyValueStore> QuoteStore<S> {
    /// Read the persisted snapshot, falling back to defaults.
    ///
    /// Only storage I/O errors are returned; a missing, malformed or empty
    /// snapshot is recovered by installing `DEFAULT_QUOTES` and saving them.
    pub fn load(storage: S) -> Result<Self> {
        let stored = storage.get(QUOTES_KEY)?;

        let restored = match stored.as_deref().map(decode_collection_str) {
            Some(Ok(quotes)) if !quotes.is_empty() => Some(quotes),
            Some(Ok(_)) => {
                log::warn!("[STORE] Stored collection is empty, installing defaults");
                None
            }
            Some(Err(e)) => {
                log::warn!("[STORE] Stored collection unreadable ({}), installing defaults", e);
                None
            }
            None => None,
        };

        let mut store = QuoteStore {
            storage,
            quotes: Vec::new(),
        };

        match restored {
            Some(quotes) => {
                log::info!("[STORE] Loaded {} quotes", quotes.len());
                store.quotes = quotes;
            }
            None => {
                store.quotes = default_quotes();
                store.save()?;
                log::info!("[STORE] Installed {} default quotes", store.quotes.len());
            }
        }

        Ok(store)
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Exact text match, the identity used by reconciliation
    pub fn contains_text(&self, text: &str) -> bool {
        self.quotes.iter().any(|q| q.text == text)
    }

    /// Validate, normalize, append and persist a user-entered quote
    pub fn add(&mut self, text: &str, category: &str) -> Result<Quote> {
        let text = text.trim();
        if text.is_empty() {
            return Err(QuoteError::Validation { field: "text" });
        }
        let category = normalize_category(category);
        if category.is_empty() {
            return Err(QuoteError::Validation { field: "category" });
        }

        let quote = Quote {
            text: text.to_string(),
            category,
        };
        self.append_and_save(vec![quote.clone()])?;

        log::info!("[STORE] Added quote in '{}'", quote.category);
        Ok(quote)
    }

    /// Append every quote in a JSON array. Nothing changes unless the whole
    /// payload decodes.
    pub fn import_many(&mut self, payload: &Value) -> Result<usize> {
        let imported = decode_collection(payload)?;
        self.append_all(imported)
    }

    /// Same as `import_many`, starting from file text
    pub fn import_json(&mut self, raw: &str) -> Result<usize> {
        let imported = decode_collection_str(raw)?;
        self.append_all(imported)
    }

    fn append_all(&mut self, imported: Vec<Quote>) -> Result<usize> {
        let count = imported.len();
        self.append_and_save(imported)?;

        log::info!("[STORE] Imported {} quotes ({} total)", count, self.quotes.len());
        Ok(count)
    }

    /// Pretty-printed JSON array of the whole collection
    pub fn export_snapshot(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.quotes)?)
    }

    pub fn save(&mut self) -> Result<()> {
        let snapshot = serde_json::to_string(&self.quotes)?;
        self.storage.set(QUOTES_KEY, &snapshot)
    }

    /// Append and persist as one step. If the save fails the appended
    /// quotes are dropped again, so memory never runs ahead of storage.
    pub(crate) fn append_and_save(&mut self, added: Vec<Quote>) -> Result<()> {
        let before = self.quotes.len();
        self.quotes.extend(added);

        if let Err(e) = self.save() {
            self.quotes.truncate(before);
            log::error!("[STORE] Save failed, rolled back to {} quotes: {}", before, e);
            return Err(e);
        }
        Ok(())
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }
}

// ============================================================================
// TESTS
// ============================================================================
