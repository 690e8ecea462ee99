//! # shorttopic
//!
//! Short-text topic clustering with a collapsed Gibbs sampler for the
//! Dirichlet Multinomial Mixture (GSDMM), exposed through a uniform
//! train / predict / topics interface that other topic models can share.
//!
//! **Default build** includes JSON persistence of trained models. Parallel
//! read-only scoring is opt-in via the `parallel` feature.
//!
//! ```rust
//! use shorttopic::{Corpus, Gsdmm};
//!
//! let corpus = Corpus::from_lines(["cat dog cat", "car bus car", "cat cat dog"]);
//! let model = Gsdmm::new(2).with_n_iters(10).with_seed(7).fit(&corpus).unwrap();
//!
//! for (z, topic) in model.topics(3).iter().enumerate() {
//!     println!("cluster {z}: {:?}", topic.words);
//! }
//! ```

pub mod coherence;
pub mod config;
pub mod corpus;
pub mod dmm;
/// Error types used across `shorttopic`.
pub mod error;
pub mod metrics;
pub mod model;

pub use coherence::{Coherence, CoherenceMetric};
pub use config::{PredictParams, TrainParams};
pub use corpus::{Corpus, Vocabulary};
pub use dmm::{ClusterState, DmmState, FitReport, Gsdmm, GsdmmModel, Topic};
pub use error::{Error, Result};
pub use metrics::{nmi, purity};
pub use model::{GsdmmTopicModel, ModelRegistry, TopicModel, TopicScore};
