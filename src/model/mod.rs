//! A uniform interface over topic models.
//!
//! A serving layer trains, queries and describes models by name without
//! knowing how each one works. The GSDMM sampler in [`crate::dmm`] is one
//! implementation; LDA, latent-feature or neural models backed by external
//! libraries or processes plug in by implementing [`TopicModel`].
//!
//! ```rust
//! use shorttopic::config::{PredictParams, TrainParams};
//! use shorttopic::corpus::Corpus;
//! use shorttopic::model::{GsdmmTopicModel, ModelRegistry, TopicModel};
//!
//! let mut registry = ModelRegistry::new()
//!     .with(Box::new(GsdmmTopicModel::new(TrainParams {
//!         num_topics: 4,
//!         seed: Some(1),
//!         ..TrainParams::default()
//!     })));
//!
//! let corpus = Corpus::from_lines(["goal match", "vote ballot", "match goal"]);
//! registry.get_mut("gsdmm").unwrap().train(&corpus).unwrap();
//!
//! let gsdmm = registry.get("gsdmm").unwrap();
//! let ranked = gsdmm.predict("goal", &PredictParams::default()).unwrap();
//! assert_eq!(ranked.len(), 4);
//! assert_eq!(gsdmm.topics().unwrap().len(), 4);
//! ```

mod gsdmm;
mod registry;
mod traits;

pub use gsdmm::GsdmmTopicModel;
pub use registry::{BoxedModel, ModelRegistry};
pub use traits::{TopicModel, TopicScore};
