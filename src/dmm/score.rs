//! Scoring documents against a trained mixture.
//!
//! All arithmetic happens in the log domain. For cluster `z` and a document
//! `d` with `c(w, d)` occurrences of token `w`:
//!
//! ```text
//! log p(z | d) ∝ ln(m_z + α) − ln(D − 1 + Kα)
//!              + Σ_w Σ_{j < c(w,d)} ln(n_zw + β + j)
//!              − Σ_{i < |d|}        ln(n_z + Vβ + i)
//! ```
//!
//! `m_z` is the cluster's document count, `n_z` its token count and `n_zw`
//! the count of `w` in it (zero for tokens never seen in training, which
//! leaves only the smoothing prior `β`).

use super::cluster::DocBag;
use super::state::DmmState;

impl DmmState {
    /// Write the per-cluster log weight of `bag` into `out` (length `K`).
    pub(crate) fn log_weights_into(&self, bag: &DocBag<'_>, out: &mut [f64]) {
        let alpha = self.alpha();
        let beta = self.beta();
        let k = self.n_clusters() as f64;
        let d = self.n_docs() as f64;
        let log_norm = (d - 1.0 + k * alpha).ln();
        let v_beta = self.vocab_size() as f64 * beta;

        for (slot, cluster) in out.iter_mut().zip(self.clusters()) {
            let mut lp = (cluster.doc_count() as f64 + alpha).ln() - log_norm;
            for &(token, count) in &bag.words {
                let n_zw = cluster.freq(token) as f64 + beta;
                for j in 0..count {
                    lp += (n_zw + j as f64).ln();
                }
            }
            let n_z = cluster.word_count() as f64 + v_beta;
            for i in 0..bag.len {
                lp -= (n_z + i as f64).ln();
            }
            *slot = lp;
        }
    }

    /// Log of the unnormalized cluster probability, one entry per cluster.
    ///
    /// Does not touch the counts; the document is treated as held out.
    pub fn log_score<S: AsRef<str>>(&self, doc: &[S]) -> Vec<f64> {
        let bag = DocBag::new(doc);
        let mut out = vec![0.0; self.n_clusters()];
        self.log_weights_into(&bag, &mut out);
        out
    }

    /// Unnormalized cluster probabilities, one entry per cluster.
    ///
    /// Values are scaled so the most likely cluster scores `1.0`; ratios
    /// between clusters are exactly those of the mixture posterior, and no
    /// entry underflows to zero just because the document is long.
    pub fn score<S: AsRef<str>>(&self, doc: &[S]) -> Vec<f64> {
        let mut out = self.log_score(doc);
        rescale_from_log(&mut out);
        out
    }

    /// Normalized posterior over clusters (sums to one).
    pub fn predict_proba<S: AsRef<str>>(&self, doc: &[S]) -> Vec<f64> {
        let mut out = self.score(doc);
        let total: f64 = out.iter().sum();
        if total > 0.0 && total.is_finite() {
            for p in &mut out {
                *p /= total;
            }
        } else {
            let uniform = 1.0 / out.len() as f64;
            out.iter_mut().for_each(|p| *p = uniform);
        }
        out
    }

    /// Most likely cluster for `doc` and its posterior probability.
    pub fn choose_best_label<S: AsRef<str>>(&self, doc: &[S]) -> (usize, f64) {
        self.predict_proba(doc)
            .into_iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (z, p)| {
                if p > best.1 {
                    (z, p)
                } else {
                    best
                }
            })
    }
}

/// Turn log weights into `exp(x - max)` in place, returning their sum.
///
/// Returns `None` when the weights are degenerate (empty, all `-inf`, or
/// containing NaN), leaving the slice unspecified.
pub(crate) fn rescale_from_log(weights: &mut [f64]) -> Option<f64> {
    if weights.iter().any(|w| w.is_nan()) {
        return None;
    }
    let max = weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return None;
    }
    let mut total = 0.0;
    for w in weights.iter_mut() {
        *w = (*w - max).exp();
        total += *w;
    }
    Some(total)
}

/// Pair scores with cluster ids, sort by descending score and keep `topn`.
///
/// Ties keep ascending cluster order.
pub fn rank(scores: &[f64], topn: usize) -> Vec<(usize, f64)> {
    let mut ranked: Vec<(usize, f64)> = scores.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(topn);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Corpus;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn state_for(lines: &[&str], k: usize, seed: u64) -> DmmState {
        let corpus = Corpus::from_lines(lines);
        let bags: Vec<DocBag<'_>> = corpus.iter().map(DocBag::new).collect();
        let v = corpus.vocabulary().len();
        let mut rng = StdRng::seed_from_u64(seed);
        DmmState::initialize(&bags, v, k, 0.1, 0.1, &mut rng)
    }

    #[test]
    fn test_log_score_matches_formula() {
        let state = state_for(&["a b", "a c"], 1, 0);
        // One cluster holding everything: m = 2, n = 4, n_a = 2, V = 3.
        let (alpha, beta): (f64, f64) = (0.1, 0.1);
        let expected = (2.0 + alpha).ln() - (2.0 - 1.0 + alpha).ln()
            + (2.0 + beta).ln()
            + (2.0 + beta + 1.0).ln()
            - (4.0 + 3.0 * beta).ln()
            - (4.0 + 3.0 * beta + 1.0).ln();
        let got = state.log_score(&["a", "a"]);
        assert!((got[0] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_score_is_idempotent_and_pure() {
        let state = state_for(&["cat dog", "car bus", "cat cat"], 3, 11);
        let before = state.clone();
        let first = state.score(&["cat", "dog"]);
        let second = state.score(&["cat", "dog"]);
        assert_eq!(first, second);
        assert_eq!(state, before);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_score_long_document_does_not_underflow() {
        let state = state_for(&["a b c", "d e f"], 2, 5);
        let long: Vec<&str> = std::iter::repeat("zzz").take(5_000).collect();
        let scores = state.score(&long);
        assert!(scores.iter().all(|s| s.is_finite() && *s >= 0.0));
        assert!(scores.iter().any(|&s| (s - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_predict_proba_sums_to_one() {
        let state = state_for(&["x y", "y z", "z x"], 4, 2);
        let probs = state.predict_proba(&["x", "q"]);
        let total: f64 = probs.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        let (best, p) = state.choose_best_label(&["x", "q"]);
        assert!(best < 4);
        assert!((p - probs[best]).abs() < 1e-15);
    }

    #[test]
    fn test_rank_orders_and_truncates() {
        let ranked = rank(&[0.2, 0.9, 0.2, 0.5], 3);
        assert_eq!(ranked, vec![(1, 0.9), (3, 0.5), (0, 0.2)]);
        assert!(rank(&[0.1], 0).is_empty());
    }

    #[test]
    fn test_rescale_degenerate() {
        assert_eq!(rescale_from_log(&mut []), None);
        assert_eq!(rescale_from_log(&mut [f64::NEG_INFINITY; 3]), None);
        assert_eq!(rescale_from_log(&mut [0.0, f64::NAN]), None);
        let mut w = [0.0, 0.0];
        assert_eq!(rescale_from_log(&mut w), Some(2.0));
    }
}
