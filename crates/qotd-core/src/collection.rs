//! In-memory quote collection.
//!
//! The collection is the single source of truth presentation code reads
//! from. It is owned by the service layer and never exposed as a global.

use std::collections::BTreeMap;

use crate::models::{Quote, QuoteId};

/// Ordered in-memory sequence of quotes with lookup helpers
#[derive(Debug, Clone, Default)]
pub struct QuoteCollection {
    quotes: Vec<Quote>,
}

impl QuoteCollection {
    /// Wrap an already loaded sequence of quotes
    #[must_use]
    pub const fn new(quotes: Vec<Quote>) -> Self {
        Self { quotes }
    }

    /// Number of quotes held
    #[must_use]
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// True when no quotes are held
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Borrow the full sequence
    #[must_use]
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    /// Iterate over the quotes in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Quote> {
        self.quotes.iter()
    }

    /// Append a quote
    pub fn push(&mut self, quote: Quote) {
        self.quotes.push(quote);
    }

    /// Look up a quote by its local id
    #[must_use]
    pub fn quote_by_id(&self, id: &QuoteId) -> Option<&Quote> {
        self.quotes.iter().find(|quote| quote.id == *id)
    }

    /// Mutably look up a quote by its local id
    pub fn quote_by_id_mut(&mut self, id: &QuoteId) -> Option<&mut Quote> {
        self.quotes.iter_mut().find(|quote| quote.id == *id)
    }

    /// Mutably look up a quote by position
    pub fn quote_mut(&mut self, index: usize) -> Option<&mut Quote> {
        self.quotes.get_mut(index)
    }

    /// True when some quote already carries this remote identity
    #[must_use]
    pub fn contains_server_id(&self, server_id: &str) -> bool {
        self.quotes
            .iter()
            .any(|quote| quote.server_id.as_deref() == Some(server_id))
    }

    /// True when a quote with the same text and category already exists
    #[must_use]
    pub fn contains_pair(&self, text: &str, category: &str) -> bool {
        self.quotes
            .iter()
            .any(|quote| quote.text == text && quote.category == category)
    }

    /// Distinct categories, sorted
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .quotes
            .iter()
            .map(|quote| quote.category.clone())
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Distinct categories with quote counts, sorted by category
    #[must_use]
    pub fn category_counts(&self) -> Vec<(String, usize)> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for quote in &self.quotes {
            *counts.entry(quote.category.clone()).or_insert(0) += 1;
        }
        counts.into_iter().collect()
    }

    /// Quotes matching the category filter; `None` means all
    #[must_use]
    pub fn filtered(&self, category: Option<&str>) -> Vec<&Quote> {
        match category {
            None => self.quotes.iter().collect(),
            Some(category) => self
                .quotes
                .iter()
                .filter(|quote| quote.category == category)
                .collect(),
        }
    }

    /// Snapshot of all quotes with unpushed local changes
    #[must_use]
    pub fn dirty_quotes(&self) -> Vec<Quote> {
        self.quotes
            .iter()
            .filter(|quote| quote.dirty)
            .cloned()
            .collect()
    }
}

impl<'a> IntoIterator for &'a QuoteCollection {
    type Item = &'a Quote;
    type IntoIter = std::slice::Iter<'a, Quote>;

    fn into_iter(self) -> Self::IntoIter {
        self.quotes.iter()
    }
}

/// Built-in quotes seeded when the store is empty or unusable.
///
/// Seeded content is not an unpushed local change, so it starts clean.
#[must_use]
pub fn default_quotes() -> Vec<Quote> {
    [
        (
            "The best way to get started is to quit talking and begin doing.",
            "Motivation",
        ),
        ("Simplicity is the soul of efficiency.", "Programming"),
        (
            "First, solve the problem. Then, write the code.",
            "Programming",
        ),
        ("Well begun is half done.", "Life"),
        ("What we think, we become.", "Life"),
    ]
    .into_iter()
    .map(|(text, category)| {
        let mut quote = Quote::new(text, category);
        quote.dirty = false;
        quote
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> QuoteCollection {
        QuoteCollection::new(vec![
            Quote::new("Alpha", "Life"),
            Quote::new("Beta", "Work"),
            Quote::new("Gamma", "Life"),
        ])
    }

    #[test]
    fn categories_are_sorted_and_distinct() {
        let collection = sample();
        assert_eq!(collection.categories(), vec!["Life", "Work"]);
    }

    #[test]
    fn category_counts_tally_quotes() {
        let collection = sample();
        assert_eq!(
            collection.category_counts(),
            vec![("Life".to_string(), 2), ("Work".to_string(), 1)]
        );
    }

    #[test]
    fn filtered_respects_exact_category() {
        let collection = sample();
        assert_eq!(collection.filtered(None).len(), 3);

        let life = collection.filtered(Some("Life"));
        assert_eq!(life.len(), 2);
        assert!(life.iter().all(|quote| quote.category == "Life"));

        assert!(collection.filtered(Some("life")).is_empty());
    }

    #[test]
    fn contains_pair_matches_text_and_category() {
        let collection = sample();
        assert!(collection.contains_pair("Alpha", "Life"));
        assert!(!collection.contains_pair("Alpha", "Work"));
        assert!(!collection.contains_pair("Delta", "Life"));
    }

    #[test]
    fn contains_server_id_finds_claimed_identity() {
        let mut collection = sample();
        assert!(!collection.contains_server_id("7"));

        let mut quote = Quote::new("Remote", "Life");
        quote.server_id = Some("7".to_string());
        collection.push(quote);
        assert!(collection.contains_server_id("7"));
    }

    #[test]
    fn dirty_quotes_snapshot_only_dirty() {
        let mut collection = QuoteCollection::new(default_quotes());
        assert!(collection.dirty_quotes().is_empty());

        collection.push(Quote::new("Fresh", "Life"));
        let dirty = collection.dirty_quotes();
        assert_eq!(dirty.len(), 1);
        assert_eq!(dirty[0].text, "Fresh");
    }

    #[test]
    fn default_quotes_are_clean_and_non_empty() {
        let defaults = default_quotes();
        assert!(!defaults.is_empty());
        assert!(defaults.iter().all(|quote| !quote.dirty));
        assert!(defaults.iter().all(|quote| !quote.is_empty()));
        assert!(defaults.iter().all(|quote| quote.server_id.is_none()));
    }

    #[test]
    fn quote_by_id_round_trip() {
        let mut collection = sample();
        let id = collection.quotes()[1].id;

        assert_eq!(collection.quote_by_id(&id).unwrap().text, "Beta");

        collection.quote_by_id_mut(&id).unwrap().text = "Beta 2".to_string();
        assert_eq!(collection.quote_by_id(&id).unwrap().text, "Beta 2");
    }
}
