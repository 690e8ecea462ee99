//! Per-cluster sufficient statistics.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A document as distinct tokens with multiplicities, in first-seen order.
///
/// Order is fixed so that floating-point accumulation over a document is
/// reproducible under a seeded generator.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DocBag<'a> {
    pub(crate) words: Vec<(&'a str, usize)>,
    pub(crate) len: usize,
}

impl<'a> DocBag<'a> {
    pub(crate) fn new<S: AsRef<str>>(doc: &'a [S]) -> Self {
        let mut index: HashMap<&'a str, usize> = HashMap::with_capacity(doc.len());
        let mut words: Vec<(&'a str, usize)> = Vec::with_capacity(doc.len());
        for token in doc {
            let token = token.as_ref();
            match index.get(token) {
                Some(&slot) => words[slot].1 += 1,
                None => {
                    index.insert(token, words.len());
                    words.push((token, 1));
                }
            }
        }
        Self {
            words,
            len: doc.len(),
        }
    }
}

/// Counts for one mixture component.
///
/// `word_freq` is sparse: a token is present only while its count is
/// positive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterState {
    doc_count: usize,
    word_count: usize,
    word_freq: HashMap<String, usize>,
}

impl ClusterState {
    /// An empty cluster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Documents currently assigned here.
    pub fn doc_count(&self) -> usize {
        self.doc_count
    }

    /// Token occurrences across the assigned documents.
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    /// Occurrences of `token` in this cluster (0 if absent).
    pub fn freq(&self, token: &str) -> usize {
        self.word_freq.get(token).copied().unwrap_or(0)
    }

    /// The sparse token table.
    pub fn word_freq(&self) -> &HashMap<String, usize> {
        &self.word_freq
    }

    /// Number of distinct tokens with a positive count.
    pub fn distinct_words(&self) -> usize {
        self.word_freq.len()
    }

    /// True when no document is assigned.
    pub fn is_empty(&self) -> bool {
        self.doc_count == 0
    }

    pub(crate) fn add_document(&mut self, bag: &DocBag<'_>) {
        self.doc_count += 1;
        self.word_count += bag.len;
        for &(token, count) in &bag.words {
            match self.word_freq.get_mut(token) {
                Some(f) => *f += count,
                None => {
                    self.word_freq.insert(token.to_string(), count);
                }
            }
        }
    }

    /// Exact inverse of [`Self::add_document`]. The document must currently
    /// be counted in this cluster.
    pub(crate) fn remove_document(&mut self, bag: &DocBag<'_>) {
        debug_assert!(self.doc_count > 0);
        self.doc_count -= 1;
        self.word_count -= bag.len;
        for &(token, count) in &bag.words {
            if let Some(f) = self.word_freq.get_mut(token) {
                debug_assert!(*f >= count);
                *f -= count;
                if *f == 0 {
                    self.word_freq.remove(token);
                }
            }
        }
    }

    /// `word_count` equals the sum of the token table.
    pub fn is_consistent(&self) -> bool {
        self.word_count == self.word_freq.values().sum::<usize>()
            && self.word_freq.values().all(|&f| f > 0)
    }

    /// The `n` most frequent tokens with their share of `word_count`.
    ///
    /// Ties are broken by token so the listing is stable. A cluster without
    /// documents (or holding only empty documents) yields an empty list.
    pub fn top_words(&self, n: usize) -> Vec<(String, f64)> {
        if self.doc_count == 0 || self.word_count == 0 {
            return Vec::new();
        }
        let mut entries: Vec<(&String, &usize)> = self.word_freq.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        let total = self.word_count as f64;
        entries
            .into_iter()
            .take(n)
            .map(|(w, &f)| (w.clone(), f as f64 / total))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_bag_counts_in_first_seen_order() {
        let d = doc("cat dog cat bird");
        let bag = DocBag::new(&d);
        assert_eq!(bag.words, vec![("cat", 2), ("dog", 1), ("bird", 1)]);
        assert_eq!(bag.len, 4);
    }

    #[test]
    fn test_add_remove_inverse() {
        let a = doc("cat dog cat");
        let b = doc("cat bus");
        let (bag_a, bag_b) = (DocBag::new(&a), DocBag::new(&b));

        let mut c = ClusterState::new();
        c.add_document(&bag_a);
        let snapshot = c.clone();
        c.add_document(&bag_b);
        assert_eq!(c.doc_count(), 2);
        assert_eq!(c.word_count(), 5);
        assert_eq!(c.freq("cat"), 3);
        assert!(c.is_consistent());

        c.remove_document(&bag_b);
        assert_eq!(c, snapshot);
        assert_eq!(c.freq("bus"), 0);
        assert!(!c.word_freq().contains_key("bus"));
    }

    #[test]
    fn test_remove_last_document_evicts_everything() {
        let a = doc("x y y");
        let bag = DocBag::new(&a);
        let mut c = ClusterState::new();
        c.add_document(&bag);
        c.remove_document(&bag);
        assert!(c.is_empty());
        assert_eq!(c.word_count(), 0);
        assert_eq!(c.distinct_words(), 0);
        assert!(c.top_words(10).is_empty());
    }

    #[test]
    fn test_top_words_normalized() {
        let a = doc("cat dog cat cat");
        let mut c = ClusterState::new();
        c.add_document(&DocBag::new(&a));
        let top = c.top_words(1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].0, "cat");
        assert!((top[0].1 - 0.75).abs() < 1e-12);

        let all = c.top_words(10);
        let total: f64 = all.iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_documents_only_give_empty_topics() {
        let empty: Vec<String> = Vec::new();
        let mut c = ClusterState::new();
        c.add_document(&DocBag::new(&empty));
        assert_eq!(c.doc_count(), 1);
        assert_eq!(c.word_count(), 0);
        assert!(c.top_words(5).is_empty());
    }
}
