// 🏷️ Category Index - distinct labels and the remembered filter
//
// Categories are never stored on their own; they are recomputed from the
// collection. Only the user's filter choice is persisted.

use crate::errors::Result;
use crate::quote::{normalize_category, Quote};
use crate::storage::{KeyValueStore, SELECTED_CATEGORY_KEY};
use std::collections::HashSet;
use std::fmt;

/// Sentinel value meaning "no category filter"
pub const ALL_CATEGORIES: &str = "all";

// ============================================================================
// CATEGORY FILTER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    /// Parse a stored or user-supplied value; blank or "all" means no filter
    pub fn parse(value: &str) -> Self {
        let normalized = normalize_category(value);
        if normalized.is_empty() || normalized == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Category(normalized)
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Category(category) => category,
        }
    }

    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(category) => &quote.category == category,
        }
    }

    /// Dropdown-style label: "All Categories" or the category capitalized
    pub fn label(&self) -> String {
        match self {
            CategoryFilter::All => "All Categories".to_string(),
            CategoryFilter::Category(category) => display_label(category),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub fn display_label(category: &str) -> String {
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ============================================================================
// CATEGORY INDEX
// ============================================================================

pub struct CategoryIndex;

impl CategoryIndex {
    /// Distinct categories in order of first appearance
    pub fn recompute(quotes: &[Quote]) -> Vec<String> {
        let mut seen = HashSet::new();
        quotes
            .iter()
            .filter(|q| seen.insert(q.category.as_str()))
            .map(|q| q.category.clone())
            .collect()
    }

    /// The last persisted filter choice, if any
    pub fn selected<S: KeyValueStore>(storage: &S) -> Result<Option<CategoryFilter>> {
        Ok(storage
            .get(SELECTED_CATEGORY_KEY)?
            .map(|value| CategoryFilter::parse(&value)))
    }

    pub fn select<S: KeyValueStore>(storage: &mut S, filter: &CategoryFilter) -> Result<()> {
        storage.set(SELECTED_CATEGORY_KEY, filter.as_str())
    }

    /// Reapply a saved filter after the category list was rebuilt.
    ///
    /// A saved category that no longer exists degrades to `All`.
    pub fn restore(saved: Option<CategoryFilter>, categories: &[String]) -> CategoryFilter {
        match saved {
            Some(CategoryFilter::Category(category)) if categories.contains(&category) => {
                CategoryFilter::Category(category)
            }
            Some(CategoryFilter::Category(category)) => {
                log::debug!("[STORE] Saved category '{}' is gone, showing all", category);
                CategoryFilter::All
            }
            _ => CategoryFilter::All,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::store::default_quotes;

    fn quote(text: &str, category: &str) -> Quote {
        Quote::new(text, category).unwrap()
    }

    #[test]
    fn test_recompute_first_appearance_order() {
        let quotes = vec![
            quote("a", "life"),
            quote("b", "work"),
            quote("c", "life"),
            quote("d", "art"),
        ];

        assert_eq!(CategoryIndex::recompute(&quotes), vec!["life", "work", "art"]);
    }

    #[test]
    fn test_recompute_defaults() {
        assert_eq!(
            CategoryIndex::recompute(&default_quotes()),
            vec!["inspiration", "life", "motivation"]
        );
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!(CategoryFilter::parse("all"), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse(""), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::parse(" Life "),
            CategoryFilter::Category("life".into())
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(CategoryFilter::All.label(), "All Categories");
        assert_eq!(display_label("motivation"), "Motivation");
        assert_eq!(display_label(""), "");
    }

    #[test]
    fn test_selection_persists() {
        let mut storage = MemoryStore::new();
        assert_eq!(CategoryIndex::selected(&storage).unwrap(), None);

        let life = CategoryFilter::Category("life".into());
        CategoryIndex::select(&mut storage, &life).unwrap();

        assert_eq!(CategoryIndex::selected(&storage).unwrap(), Some(life));
        assert_eq!(
            storage.get(SELECTED_CATEGORY_KEY).unwrap().as_deref(),
            Some("life")
        );
    }

    #[test]
    fn test_restore_falls_back_to_all() {
        let categories = vec!["life".to_string(), "work".to_string()];

        let kept = CategoryIndex::restore(Some(CategoryFilter::Category("work".into())), &categories);
        assert_eq!(kept, CategoryFilter::Category("work".into()));

        let gone = CategoryIndex::restore(Some(CategoryFilter::Category("art".into())), &categories);
        assert_eq!(gone, CategoryFilter::All);

        assert_eq!(CategoryIndex::restore(None, &categories), CategoryFilter::All);
    }
}
