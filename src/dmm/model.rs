//! The trained GSDMM artifact.

use super::cluster::DocBag;
use super::sampler::FitReport;
use super::score::{rank, rescale_from_log};
use super::state::DmmState;
use crate::corpus::{prefix, Corpus};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Default number of ranked clusters returned by predictions.
pub const DEFAULT_TOPN: usize = 5;

/// Default number of leading tokens scored by [`GsdmmModel::predict`].
pub const DEFAULT_DOC_LEN: usize = 7;

/// A fitted mixture: final counts, assignment, cached training scores and
/// the sampler diagnostics.
///
/// Read-only after fitting; every method takes `&self`, so the model can be
/// shared across threads once training is done.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GsdmmModel {
    state: DmmState,
    /// `D × K` scores of the training documents against the final state.
    doc_scores: Array2<f64>,
    report: FitReport,
}

impl GsdmmModel {
    pub(crate) fn from_fit(state: DmmState, bags: &[DocBag<'_>], report: FitReport) -> Self {
        let doc_scores = score_bags(&state, bags);
        Self {
            state,
            doc_scores,
            report,
        }
    }

    /// The mixture state.
    pub fn state(&self) -> &DmmState {
        &self.state
    }

    /// Sampler diagnostics.
    pub fn report(&self) -> &FitReport {
        &self.report
    }

    /// Final cluster of each training document.
    pub fn labels(&self) -> &[usize] {
        self.state.assignment()
    }

    /// Cached score matrix of the training documents (`D × K`).
    pub fn doc_scores(&self) -> &Array2<f64> {
        &self.doc_scores
    }

    /// Unnormalized per-cluster scores of a tokenized document.
    pub fn score<S: AsRef<str>>(&self, doc: &[S]) -> Vec<f64> {
        self.state.score(doc)
    }

    /// Rank clusters for raw `text`, scoring only its first `doc_len`
    /// tokens and keeping the best `topn`.
    pub fn predict(&self, text: &str, topn: usize, doc_len: usize) -> Vec<(usize, f64)> {
        let doc = prefix(text, doc_len);
        rank(&self.state.score(&doc), topn)
    }

    /// Ranked training-document predictions, from the scores cached at fit
    /// time.
    pub fn corpus_predictions(&self, topn: usize) -> Vec<Vec<(usize, f64)>> {
        self.doc_scores
            .rows()
            .into_iter()
            .map(|row| rank(&row.to_vec(), topn))
            .collect()
    }

    /// Rank clusters for every document of a new corpus, scoring at most
    /// the first `doc_len` tokens of each.
    pub fn predict_corpus(
        &self,
        corpus: &Corpus,
        topn: usize,
        doc_len: usize,
    ) -> Vec<Vec<(usize, f64)>> {
        let rank_doc = |doc: &[String]| {
            let head = &doc[..doc.len().min(doc_len)];
            rank(&self.state.score(head), topn)
        };

        #[cfg(feature = "parallel")]
        {
            corpus
                .docs()
                .par_iter()
                .map(|doc| rank_doc(doc.as_slice()))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            corpus.iter().map(rank_doc).collect()
        }
    }
}

fn score_bags(state: &DmmState, bags: &[DocBag<'_>]) -> Array2<f64> {
    let k = state.n_clusters();
    let mut scores = Array2::zeros((bags.len(), k));

    #[cfg(feature = "parallel")]
    {
        let rows: Vec<Vec<f64>> = bags
            .par_iter()
            .map(|bag| bag_scores(state, bag))
            .collect();
        for (i, row) in rows.into_iter().enumerate() {
            for (z, s) in row.into_iter().enumerate() {
                scores[[i, z]] = s;
            }
        }
    }

    #[cfg(not(feature = "parallel"))]
    for (i, bag) in bags.iter().enumerate() {
        for (z, s) in bag_scores(state, bag).into_iter().enumerate() {
            scores[[i, z]] = s;
        }
    }

    scores
}

fn bag_scores(state: &DmmState, bag: &DocBag<'_>) -> Vec<f64> {
    let mut row = vec![0.0; state.n_clusters()];
    state.log_weights_into(bag, &mut row);
    if rescale_from_log(&mut row).is_none() {
        row.iter_mut().for_each(|s| *s = 0.0);
    }
    row
}
