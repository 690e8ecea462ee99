//! Cluster descriptions.

use super::model::GsdmmModel;
use super::state::DmmState;
use crate::coherence::{coherence, Coherence, CoherenceMetric};
use crate::corpus::Corpus;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Default number of words listed per cluster.
pub const DEFAULT_TOP_WORDS: usize = 10;

/// The most frequent words of one cluster and their in-cluster share.
///
/// `words[i]` pairs with `weights[i]`. Both are empty for clusters without
/// documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    /// Words, most frequent first.
    pub words: Vec<String>,
    /// `freq(word) / word_count` for each word.
    pub weights: Vec<f64>,
}

impl Topic {
    /// True when the cluster had nothing to report.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl FromIterator<(String, f64)> for Topic {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let (words, weights) = iter.into_iter().unzip();
        Self { words, weights }
    }
}

impl DmmState {
    /// One [`Topic`] per cluster, aligned with cluster ids.
    pub fn topics(&self, top_words: usize) -> Vec<Topic> {
        self.clusters()
            .iter()
            .map(|c| c.top_words(top_words).into_iter().collect())
            .collect()
    }
}

impl GsdmmModel {
    /// One [`Topic`] per cluster, aligned with cluster ids.
    pub fn topics(&self, top_words: usize) -> Vec<Topic> {
        self.state().topics(top_words)
    }

    /// Coherence of the top [`DEFAULT_TOP_WORDS`] words of every cluster
    /// against `reference`.
    pub fn coherence(&self, reference: &Corpus, metric: CoherenceMetric) -> Result<Coherence> {
        coherence(&self.topics(DEFAULT_TOP_WORDS), reference, metric)
    }
}
