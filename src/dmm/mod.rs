//! GSDMM: Gibbs sampling for the Dirichlet Multinomial Mixture.
//!
//! Short texts (titles, tweets, subtitle snippets) are too sparse for
//! per-document topic mixtures like LDA. The DMM instead assumes each
//! document comes from exactly **one** of `K` latent clusters, each with its
//! own multinomial over words, and puts Dirichlet priors on both the cluster
//! weights (`α`) and the word distributions (`β`).
//!
//! # The Sampler ("Movie Group Process")
//!
//! Parameters are integrated out, leaving only the document → cluster
//! assignment to sample. One pass visits every document in order:
//!
//! 1. Remove the document from its cluster's counts
//! 2. Score every cluster with the collapsed conditional
//! 3. Draw the new cluster from the normalized scores
//! 4. Add the document back there
//!
//! The conditional for cluster `z` is
//!
//! ```text
//!            m_z + α        Π_w Π_{j<c(w,d)} (n_zw + β + j)
//! p(z|d) ∝ ─────────── × ──────────────────────────────────
//!          D − 1 + Kα         Π_{i<|d|} (n_z + Vβ + i)
//! ```
//!
//! The first factor prefers crowded clusters; the second prefers clusters
//! whose words already explain the document. `+j` and `+i` count repeated
//! tokens once per occurrence.
//!
//! `K` is only an upper bound: clusters that lose all their documents stay
//! empty, which is how the model chooses its own number of groups.
//!
//! # Convergence
//!
//! A pass with zero transfers is a fixed point and stops sampling early;
//! otherwise `n_iters` passes run. [`FitReport`] records transfers per pass.
//!
//! # Failure Modes
//!
//! - **Too small α**: clusters are hard to join; many near-singletons
//! - **Too large β**: word evidence is washed out; everything merges
//! - **Long documents**: products underflow, hence log-domain scoring
//!
//! # Usage
//!
//! ```rust
//! use shorttopic::corpus::Corpus;
//! use shorttopic::dmm::Gsdmm;
//!
//! let corpus = Corpus::from_lines(["cat dog cat", "car bus car", "cat cat dog"]);
//! let model = Gsdmm::new(2)
//!     .with_alpha(0.1)
//!     .with_beta(0.1)
//!     .with_n_iters(10)
//!     .with_seed(42)
//!     .fit(&corpus)
//!     .unwrap();
//!
//! let ranked = model.predict("cat dog", 2, 7);
//! assert_eq!(ranked.len(), 2);
//! ```
//!
//! # References
//!
//! Yin & Wang (2014). "A Dirichlet Multinomial Mixture Model-based Approach
//! for Short Text Clustering." KDD '14.

mod cluster;
mod model;
#[cfg(feature = "persist")]
mod persist;
mod sampler;
mod score;
mod state;
mod topics;

pub use cluster::ClusterState;
pub use model::{GsdmmModel, DEFAULT_DOC_LEN, DEFAULT_TOPN};
pub use sampler::{FitReport, Gsdmm};
pub use score::rank;
pub use state::DmmState;
pub use topics::{Topic, DEFAULT_TOP_WORDS};
