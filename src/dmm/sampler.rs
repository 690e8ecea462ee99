//! Collapsed Gibbs sampler for the Dirichlet Multinomial Mixture.

use super::cluster::DocBag;
use super::model::GsdmmModel;
use super::score::rescale_from_log;
use super::state::DmmState;
use crate::corpus::Corpus;
use crate::error::{Error, Result};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// GSDMM hyperparameters and sampling budget.
///
/// `k` is an upper bound on the number of clusters: sampling typically
/// leaves some of them empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Gsdmm {
    /// Maximum number of clusters.
    k: usize,
    /// Dirichlet prior on cluster weights.
    alpha: f64,
    /// Dirichlet prior on per-cluster word distributions.
    beta: f64,
    /// Maximum number of full passes over the corpus.
    n_iters: usize,
    /// Random seed.
    seed: Option<u64>,
}

impl Gsdmm {
    /// Create a sampler with at most `k` clusters.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            alpha: 0.1,
            beta: 0.1,
            n_iters: 15,
            seed: None,
        }
    }

    /// Set the cluster-weight prior.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the word-distribution prior.
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Set the iteration budget.
    pub fn with_n_iters(mut self, n_iters: usize) -> Self {
        self.n_iters = n_iters;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Maximum number of clusters.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Cluster-weight prior.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Word-distribution prior.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Iteration budget.
    pub fn n_iters(&self) -> usize {
        self.n_iters
    }

    /// Seed, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Reject hyperparameters the model is undefined for.
    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(Error::InvalidParameter {
                name: "k",
                message: "must be > 0",
            });
        }
        if !(self.alpha > 0.0 && self.alpha.is_finite()) {
            return Err(Error::InvalidParameter {
                name: "alpha",
                message: "must be positive and finite",
            });
        }
        if !(self.beta > 0.0 && self.beta.is_finite()) {
            return Err(Error::InvalidParameter {
                name: "beta",
                message: "must be positive and finite",
            });
        }
        Ok(())
    }

    /// Fit on `corpus`, taking `V` from its distinct tokens.
    pub fn fit(&self, corpus: &Corpus) -> Result<GsdmmModel> {
        self.validate()?;
        let vocab_size = corpus.vocabulary().len();

        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };
        self.fit_with_rng(corpus, vocab_size, &mut rng)
    }

    /// Fit with an explicit vocabulary size and random source.
    ///
    /// The configured seed is ignored; `rng` drives both the initial
    /// assignment and every draw.
    pub fn fit_with_rng<R: Rng>(
        &self,
        corpus: &Corpus,
        vocab_size: usize,
        rng: &mut R,
    ) -> Result<GsdmmModel> {
        self.validate()?;
        if corpus.is_empty() {
            return Err(Error::EmptyInput);
        }
        if vocab_size == 0 {
            return Err(Error::InvalidParameter {
                name: "vocab_size",
                message: "must be > 0 (corpus has no tokens)",
            });
        }

        let bags: Vec<DocBag<'_>> = corpus.iter().map(DocBag::new).collect();
        let mut state =
            DmmState::initialize(&bags, vocab_size, self.k, self.alpha, self.beta, rng);

        log::info!(
            "fitting GSDMM on {} documents (V = {}, K = {}, alpha = {}, beta = {}, n_iters = {})",
            bags.len(),
            vocab_size,
            self.k,
            self.alpha,
            self.beta,
            self.n_iters
        );

        let mut report = FitReport::default();
        let mut weights = vec![0.0; self.k];

        for stage in 0..self.n_iters {
            let transferred = sweep(&mut state, &bags, &mut weights, rng, &mut report.fallbacks);
            let populated = state.populated_clusters();
            report.transfers.push(transferred);
            report.populated.push(populated);

            log::debug!(
                "stage {}: transferred {} documents with {} clusters populated",
                stage + 1,
                transferred,
                populated
            );

            if transferred == 0 {
                report.converged = true;
                break;
            }
        }
        report.iterations = report.transfers.len();

        if report.fallbacks > 0 {
            log::warn!(
                "{} draws fell back to uniform sampling over degenerate weights",
                report.fallbacks
            );
        }
        if report.converged {
            log::info!("GSDMM converged after {} iterations", report.iterations);
        } else {
            log::warn!(
                "GSDMM stopped at the iteration budget ({}) with {} clusters populated",
                report.iterations,
                state.populated_clusters()
            );
        }

        Ok(GsdmmModel::from_fit(state, &bags, report))
    }
}

impl Default for Gsdmm {
    fn default() -> Self {
        Self::new(35)
    }
}

/// Diagnostics from one call to [`Gsdmm::fit`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitReport {
    /// Full passes actually run.
    pub iterations: usize,
    /// Documents that changed cluster, per pass.
    pub transfers: Vec<usize>,
    /// Non-empty clusters after each pass.
    pub populated: Vec<usize>,
    /// A pass ended with zero transfers.
    pub converged: bool,
    /// Draws made uniformly because the weights were degenerate.
    pub fallbacks: usize,
}

impl FitReport {
    /// Transfers in the last completed pass.
    pub fn last_transfers(&self) -> Option<usize> {
        self.transfers.last().copied()
    }
}

/// One Gibbs pass over the corpus in document order. Returns the number of
/// documents whose cluster changed.
fn sweep<R: Rng>(
    state: &mut DmmState,
    bags: &[DocBag<'_>],
    weights: &mut [f64],
    rng: &mut R,
    fallbacks: &mut usize,
) -> usize {
    let mut transferred = 0;
    for (d, bag) in bags.iter().enumerate() {
        let z_old = state.remove(d, bag);
        state.log_weights_into(bag, weights);

        let z_new = match sample_from_log(weights, rng) {
            Some(z) => z,
            None => {
                *fallbacks += 1;
                rng.random_range(0..weights.len())
            }
        };

        state.insert(d, bag, z_new);
        if z_new != z_old {
            transferred += 1;
        }
    }
    transferred
}

/// Draw an index with probability proportional to `exp(weights[i])`.
///
/// Overwrites `weights`. Returns `None` if no valid distribution exists.
fn sample_from_log<R: Rng>(weights: &mut [f64], rng: &mut R) -> Option<usize> {
    let total = rescale_from_log(weights)?;
    if !(total > 0.0 && total.is_finite()) {
        return None;
    }

    let threshold = rng.random::<f64>() * total;
    let mut cumsum = 0.0;
    let mut last_positive = None;
    for (i, &w) in weights.iter().enumerate() {
        if w > 0.0 {
            last_positive = Some(i);
        }
        cumsum += w;
        if cumsum > threshold {
            return Some(i);
        }
    }
    // Rounding left cumsum just below threshold.
    last_positive
}
