// 🌐 Remote Quote Source - the "server" side of reconciliation
//
// There is no network here. `MockRemoteSource` is an in-memory list that
// behaves like an append-only server: fetch returns everything, post
// appends.

use crate::quote::Quote;

pub trait RemoteQuoteSource {
    /// Current server view, in server order
    fn fetch(&self) -> Vec<Quote>;

    /// Append a quote. No acknowledgement, no failure.
    fn post(&mut self, quote: Quote);
}

/// Seed content of the mock server
pub const SERVER_SEED_QUOTES: [(&str, &str); 2] = [
    ("Server wisdom prevails.", "server"),
    ("This is synced from the server.", "sync"),
];

#[derive(Debug, Clone, Default)]
pub struct MockRemoteSource {
    quotes: Vec<Quote>,
}

impl MockRemoteSource {
    /// Empty server
    pub fn new() -> Self {
        Self::default()
    }

    /// Server pre-loaded with `SERVER_SEED_QUOTES`
    pub fn seeded() -> Self {
        MockRemoteSource {
            quotes: SERVER_SEED_QUOTES
                .iter()
                .map(|(text, category)| Quote {
                    text: text.to_string(),
                    category: category.to_string(),
                })
                .collect(),
        }
    }

    pub fn with_quotes(quotes: Vec<Quote>) -> Self {
        MockRemoteSource { quotes }
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

impl RemoteQuoteSource for MockRemoteSource {
    fn fetch(&self) -> Vec<Quote> {
        self.quotes.clone()
    }

    fn post(&mut self, quote: Quote) {
        self.quotes.push(quote);
    }
}
