//! Tokenized corpora and their vocabulary.
//!
//! Documents are whitespace-tokenized lines of text, one document per line.
//! Preprocessing (stopwords, punctuation, lowercasing) is assumed to have
//! happened upstream; this module only splits.

use crate::error::{Error, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// An ordered, immutable collection of tokenized documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    docs: Vec<Vec<String>>,
}

impl Corpus {
    /// Build a corpus from already tokenized documents.
    pub fn new(docs: Vec<Vec<String>>) -> Self {
        Self { docs }
    }

    /// One document per line, split on whitespace.
    ///
    /// Blank lines become empty documents.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let docs = lines.into_iter().map(|l| tokenize(l.as_ref())).collect();
        Self { docs }
    }

    /// Read a corpus from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut docs = Vec::new();
        for line in reader.lines() {
            let line = line.map_err(|e| Error::Io {
                path: "<reader>".to_string(),
                message: e.to_string(),
            })?;
            docs.push(tokenize(&line));
        }
        Ok(Self { docs })
    }

    /// Read a corpus file (one document per line).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_reader(BufReader::new(file)).map_err(|e| match e {
            Error::Io { message, .. } => Error::Io {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// True if there are no documents.
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Total token occurrences across all documents.
    pub fn total_tokens(&self) -> usize {
        self.docs.iter().map(Vec::len).sum()
    }

    /// Document `i`, if present.
    pub fn get(&self, i: usize) -> Option<&[String]> {
        self.docs.get(i).map(Vec::as_slice)
    }

    /// Iterate documents in order.
    pub fn iter(&self) -> impl Iterator<Item = &[String]> {
        self.docs.iter().map(Vec::as_slice)
    }

    /// All documents.
    pub fn docs(&self) -> &[Vec<String>] {
        &self.docs
    }

    /// Distinct tokens of this corpus.
    pub fn vocabulary(&self) -> Vocabulary {
        Vocabulary::from_corpus(self)
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Vec<String>;
    type IntoIter = std::slice::Iter<'a, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.docs.iter()
    }
}

/// The set of distinct tokens observed in a training corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    tokens: HashSet<String>,
}

impl Vocabulary {
    /// Collect the distinct tokens of `corpus`.
    pub fn from_corpus(corpus: &Corpus) -> Self {
        let tokens = corpus.docs.iter().flatten().cloned().collect();
        Self { tokens }
    }

    /// `V`, the number of distinct tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True if no tokens were observed.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Whether `token` was seen during training.
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }
}

/// Split a raw document on whitespace.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// Tokenize `text` and keep at most the first `doc_len` tokens.
pub fn prefix(text: &str, doc_len: usize) -> Vec<String> {
    text.split_whitespace()
        .take(doc_len)
        .map(str::to_string)
        .collect()
}
