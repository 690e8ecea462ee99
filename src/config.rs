//! Request-shaped training and prediction options.
//!
//! These mirror the JSON bodies a serving layer receives. Integer fields are
//! signed so that a negative value reaches validation and is reported as a
//! configuration error rather than a parse failure.

use crate::dmm::{Gsdmm, DEFAULT_DOC_LEN, DEFAULT_TOPN};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// GSDMM training hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainParams {
    /// Upper bound on the number of clusters (`K`).
    pub num_topics: i64,
    /// Dirichlet prior on cluster weights.
    pub alpha: f64,
    /// Dirichlet prior on word distributions.
    pub beta: f64,
    /// Sampling iteration budget.
    pub n_iter: i64,
    /// Optional seed for reproducible training.
    pub seed: Option<u64>,
}

impl Default for TrainParams {
    fn default() -> Self {
        Self {
            num_topics: 35,
            alpha: 0.1,
            beta: 0.1,
            n_iter: 15,
            seed: None,
        }
    }
}

impl TrainParams {
    /// Validate and convert into a sampler configuration.
    pub fn to_sampler(&self) -> Result<Gsdmm> {
        if self.num_topics <= 0 {
            return Err(Error::InvalidParameter {
                name: "num_topics",
                message: "must be > 0",
            });
        }
        if self.n_iter < 0 {
            return Err(Error::InvalidParameter {
                name: "n_iter",
                message: "must be >= 0",
            });
        }
        let k = usize::try_from(self.num_topics).map_err(|_| Error::InvalidParameter {
            name: "num_topics",
            message: "too large",
        })?;
        let n_iters = usize::try_from(self.n_iter).map_err(|_| Error::InvalidParameter {
            name: "n_iter",
            message: "too large",
        })?;

        let mut sampler = Gsdmm::new(k)
            .with_alpha(self.alpha)
            .with_beta(self.beta)
            .with_n_iters(n_iters);
        if let Some(seed) = self.seed {
            sampler = sampler.with_seed(seed);
        }
        sampler.validate()?;
        Ok(sampler)
    }
}

/// Options for ranking clusters of a single document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictParams {
    /// Number of ranked clusters to return.
    pub topn: usize,
    /// Leading tokens of the document to score.
    pub doc_len: usize,
}

impl Default for PredictParams {
    fn default() -> Self {
        Self {
            topn: DEFAULT_TOPN,
            doc_len: DEFAULT_DOC_LEN,
        }
    }
}

impl PredictParams {
    /// Set `topn`.
    pub fn with_topn(mut self, topn: usize) -> Self {
        self.topn = topn;
        self
    }

    /// Set `doc_len`.
    pub fn with_doc_len(mut self, doc_len: usize) -> Self {
        self.doc_len = doc_len;
        self
    }
}
