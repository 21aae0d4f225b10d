// 🎲 Selection & Filtering - which quote to show next

use crate::categories::CategoryFilter;
use crate::errors::Result;
use crate::quote::{decode_quote, Quote};
use crate::storage::{KeyValueStore, LAST_QUOTE_KEY};
use rand::Rng;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuotePick<'a> {
    Quote(&'a Quote),
    NoQuotesInCategory,
}

impl<'a> QuotePick<'a> {
    pub fn quote(&self) -> Option<&'a Quote> {
        match self {
            QuotePick::Quote(quote) => Some(*quote),
            QuotePick::NoQuotesInCategory => None,
        }
    }

    /// Text shown in the quote display area
    pub fn display(&self) -> String {
        match self {
            QuotePick::Quote(quote) => quote.display(),
            QuotePick::NoQuotesInCategory => "No quotes available for this category.".to_string(),
        }
    }
}

/// Subsequence matching the filter, in collection order
pub fn filter_by_category<'a>(quotes: &'a [Quote], filter: &CategoryFilter) -> Vec<&'a Quote> {
    quotes.iter().filter(|q| filter.matches(q)).collect()
}

/// Uniform pick over an already-filtered slice
pub fn pick_random<'a, R: Rng + ?Sized>(candidates: &[&'a Quote], rng: &mut R) -> QuotePick<'a> {
    if candidates.is_empty() {
        return QuotePick::NoQuotesInCategory;
    }
    QuotePick::Quote(candidates[rng.gen_range(0..candidates.len())])
}

// ============================================================================
// LAST QUOTE (session-scoped)
// ============================================================================

pub fn remember_last_quote<S: KeyValueStore>(session: &mut S, quote: &Quote) -> Result<()> {
    let raw = serde_json::to_string(quote)?;
    session.set(LAST_QUOTE_KEY, &raw)
}

/// Last quote shown this session; unreadable data reads as nothing
pub fn last_quote<S: KeyValueStore>(session: &S) -> Result<Option<Quote>> {
    let raw = match session.get(LAST_QUOTE_KEY)? {
        Some(raw) => raw,
        None => return Ok(None),
    };

    let quote = serde_json::from_str::<serde_json::Value>(&raw)
        .ok()
        .and_then(|value| decode_quote(&value).ok());
    Ok(quote)
}

// ============================================================================
// TESTS
// ============================================================================
