//! [`TopicModel`] over the in-process GSDMM sampler.

use super::traits::{TopicModel, TopicScore};
use crate::config::{PredictParams, TrainParams};
use crate::corpus::Corpus;
use crate::dmm::{GsdmmModel, Topic, DEFAULT_TOP_WORDS};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// GSDMM behind the uniform model interface.
///
/// Optionally tied to an artifact path: training writes the model there and
/// [`GsdmmTopicModel::open`] reads it back.
#[derive(Debug, Clone)]
pub struct GsdmmTopicModel {
    params: TrainParams,
    top_words: usize,
    model_path: Option<PathBuf>,
    model: Option<GsdmmModel>,
}

impl GsdmmTopicModel {
    /// An untrained model with the given hyperparameters.
    pub fn new(params: TrainParams) -> Self {
        Self {
            params,
            top_words: DEFAULT_TOP_WORDS,
            model_path: None,
            model: None,
        }
    }

    /// Wrap an already fitted model.
    pub fn from_model(model: GsdmmModel) -> Self {
        Self {
            model: Some(model),
            ..Self::new(TrainParams::default())
        }
    }

    /// Load a saved artifact and remember its path.
    #[cfg(feature = "persist")]
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let model = GsdmmModel::load(&path)?;
        Ok(Self {
            model: Some(model),
            model_path: Some(path),
            ..Self::new(TrainParams::default())
        })
    }

    /// Save trained models to `path`.
    #[cfg(feature = "persist")]
    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = Some(path.into());
        self
    }

    /// Words listed per topic by [`TopicModel::topics`].
    pub fn with_top_words(mut self, n: usize) -> Self {
        self.top_words = n;
        self
    }

    /// Training hyperparameters.
    pub fn params(&self) -> &TrainParams {
        &self.params
    }

    /// Artifact path, if any.
    pub fn model_path(&self) -> Option<&Path> {
        self.model_path.as_deref()
    }

    /// The fitted model, if trained or loaded.
    pub fn model(&self) -> Option<&GsdmmModel> {
        self.model.as_ref()
    }

    fn fitted(&self) -> Result<&GsdmmModel> {
        self.model.as_ref().ok_or(Error::NotTrained)
    }
}

impl Default for GsdmmTopicModel {
    fn default() -> Self {
        Self::new(TrainParams::default())
    }
}

impl TopicModel for GsdmmTopicModel {
    fn name(&self) -> &str {
        "gsdmm"
    }

    fn train(&mut self, corpus: &Corpus) -> Result<()> {
        let sampler = self.params.to_sampler()?;
        log::debug!("start training GSDMM");
        let model = sampler.fit(corpus)?;
        log::debug!("end training GSDMM");

        #[cfg(feature = "persist")]
        if let Some(path) = &self.model_path {
            model.save(path)?;
        }

        self.model = Some(model);
        Ok(())
    }

    fn predict(&self, text: &str, params: &PredictParams) -> Result<Vec<TopicScore>> {
        Ok(self.fitted()?.predict(text, params.topn, params.doc_len))
    }

    fn topics(&self) -> Result<Vec<Topic>> {
        Ok(self.fitted()?.topics(self.top_words))
    }

    fn corpus_predictions(&self, topn: usize) -> Result<Vec<Vec<TopicScore>>> {
        Ok(self.fitted()?.corpus_predictions(topn))
    }

    fn predict_corpus(
        &self,
        corpus: &Corpus,
        params: &PredictParams,
    ) -> Result<Vec<Vec<TopicScore>>> {
        Ok(self
            .fitted()?
            .predict_corpus(corpus, params.topn, params.doc_len))
    }
}
