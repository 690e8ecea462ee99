//! Topic model traits.

use crate::coherence::{coherence, Coherence, CoherenceMetric};
use crate::config::PredictParams;
use crate::corpus::Corpus;
use crate::dmm::Topic;
use crate::error::Result;
use std::path::Path;

/// A cluster id paired with its score.
pub type TopicScore = (usize, f64);

/// The capability set every topic model exposes to a serving layer.
///
/// Implementations may be in-process (the GSDMM sampler) or wrappers around
/// external tools and libraries; callers dispatch through this trait without
/// knowing which.
pub trait TopicModel {
    /// Registry name, e.g. `"gsdmm"`.
    fn name(&self) -> &str;

    /// Train on a tokenized corpus, replacing any previous model.
    fn train(&mut self, corpus: &Corpus) -> Result<()>;

    /// Ranked topics for one raw document.
    fn predict(&self, text: &str, params: &PredictParams) -> Result<Vec<TopicScore>>;

    /// One description per topic, aligned with topic ids.
    fn topics(&self) -> Result<Vec<Topic>>;

    /// Ranked topics for every training document.
    fn corpus_predictions(&self, topn: usize) -> Result<Vec<Vec<TopicScore>>>;

    /// Train from a corpus file (one whitespace-tokenized document per line).
    fn train_from_path(&mut self, path: &Path) -> Result<()> {
        let corpus = Corpus::from_path(path)?;
        self.train(&corpus)
    }

    /// Coherence of [`TopicModel::topics`] against a reference corpus.
    fn coherence(&self, reference: &Corpus, metric: CoherenceMetric) -> Result<Coherence> {
        coherence(&self.topics()?, reference, metric)
    }

    /// Coherence against a reference corpus file (one document per line).
    fn coherence_from_path(&self, path: &Path, metric: CoherenceMetric) -> Result<Coherence> {
        let reference = Corpus::from_path(path)?;
        self.coherence(&reference, metric)
    }

    /// Ranked topics for every document of `corpus`.
    fn predict_corpus(
        &self,
        corpus: &Corpus,
        params: &PredictParams,
    ) -> Result<Vec<Vec<TopicScore>>> {
        corpus
            .iter()
            .map(|doc| self.predict(&doc.join(" "), params))
            .collect()
    }
}
