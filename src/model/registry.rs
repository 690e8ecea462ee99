//! Name-based dispatch over topic models.

use super::traits::TopicModel;
use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// A boxed model that can be shared with request handlers.
pub type BoxedModel = Box<dyn TopicModel + Send + Sync>;

/// Topic models keyed by [`TopicModel::name`].
#[derive(Default)]
pub struct ModelRegistry {
    models: BTreeMap<String, BoxedModel>,
}

impl ModelRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a model under its own name, returning any model it replaces.
    pub fn register(&mut self, model: BoxedModel) -> Option<BoxedModel> {
        let name = model.name().to_string();
        self.models.insert(name, model)
    }

    /// Builder form of [`Self::register`].
    pub fn with(mut self, model: BoxedModel) -> Self {
        self.register(model);
        self
    }

    /// The model registered as `name`.
    pub fn get(&self, name: &str) -> Result<&(dyn TopicModel + Send + Sync)> {
        self.models
            .get(name)
            .map(|m| &**m)
            .ok_or_else(|| Error::UnknownModel(name.to_string()))
    }

    /// Mutable access, e.g. for training.
    pub fn get_mut(&mut self, name: &str) -> Result<&mut BoxedModel> {
        self.models
            .get_mut(name)
            .ok_or_else(|| Error::UnknownModel(name.to_string()))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    /// Number of registered models.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("models", &self.models.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coherence::CoherenceMetric;
    use crate::config::{PredictParams, TrainParams};
    use crate::corpus::Corpus;
    use crate::dmm::Topic;
    use crate::model::{GsdmmTopicModel, TopicScore};

    /// Stand-in for a model served by an external process.
    struct FixedModel {
        trained: bool,
    }

    impl TopicModel for FixedModel {
        fn name(&self) -> &str {
            "fixed"
        }

        fn train(&mut self, _corpus: &Corpus) -> Result<()> {
            self.trained = true;
            Ok(())
        }

        fn predict(&self, _text: &str, params: &PredictParams) -> Result<Vec<TopicScore>> {
            let mut out = vec![(1, 0.7), (0, 0.3)];
            out.truncate(params.topn);
            Ok(out)
        }

        fn topics(&self) -> Result<Vec<Topic>> {
            Ok(vec![Topic::default(); 2])
        }

        fn corpus_predictions(&self, _topn: usize) -> Result<Vec<Vec<TopicScore>>> {
            if self.trained {
                Ok(Vec::new())
            } else {
                Err(Error::NotTrained)
            }
        }
    }

    fn registry() -> ModelRegistry {
        ModelRegistry::new()
            .with(Box::new(FixedModel { trained: false }))
            .with(Box::new(GsdmmTopicModel::new(TrainParams {
                num_topics: 3,
                n_iter: 5,
                seed: Some(1),
                ..TrainParams::default()
            })))
    }

    #[test]
    fn test_dispatch_by_name() {
        let mut reg = registry();
        assert_eq!(reg.names().collect::<Vec<_>>(), vec!["fixed", "gsdmm"]);

        let corpus = Corpus::from_lines(["a b", "c d", "a b"]);
        for name in ["fixed", "gsdmm"] {
            reg.get_mut(name).unwrap().train(&corpus).unwrap();
            assert!(reg.get(name).unwrap().topics().is_ok());
            assert!(reg.get(name).unwrap().corpus_predictions(2).is_ok());
        }
    }

    #[test]
    fn test_default_predict_corpus() {
        let reg = registry();
        let corpus = Corpus::from_lines(["x", "y z"]);
        let preds = reg
            .get("fixed")
            .unwrap()
            .predict_corpus(&corpus, &PredictParams::default().with_topn(1))
            .unwrap();
        assert_eq!(preds, vec![vec![(1, 0.7)], vec![(1, 0.7)]]);
    }

    #[test]
    fn test_coherence_through_every_model() {
        let mut reg = registry();
        let corpus = Corpus::from_lines(["a b", "c d", "a b"]);
        reg.get_mut("gsdmm").unwrap().train(&corpus).unwrap();

        let fixed = reg
            .get("fixed")
            .unwrap()
            .coherence(&corpus, CoherenceMetric::default())
            .unwrap();
        assert_eq!(fixed.per_topic, vec![None, None]);
        assert_eq!(fixed.mean, None);

        let gsdmm = reg
            .get("gsdmm")
            .unwrap()
            .coherence(&corpus, CoherenceMetric::CNpmi)
            .unwrap();
        assert_eq!(gsdmm.per_topic.len(), 3);
        assert!(gsdmm.mean.is_some());
    }

    #[test]
    fn test_unknown_model() {
        let reg = registry();
        assert_eq!(
            reg.get("lda").err(),
            Some(Error::UnknownModel("lda".to_string()))
        );
    }

    #[test]
    fn test_register_replaces() {
        let mut reg = registry();
        let old = reg.register(Box::new(FixedModel { trained: true }));
        assert!(old.is_some());
        assert_eq!(reg.len(), 2);
    }
}
