//! Saving and loading trained models as JSON.
//!
//! Writes go through a temporary file in the destination directory that is
//! renamed into place, so a crash never leaves a half-written artifact.

use super::model::GsdmmModel;
use crate::error::{Error, Result};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

impl GsdmmModel {
    /// Serialize the model to `path`, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let save_err = |message: String| Error::Save {
            path: path.display().to_string(),
            message,
        };

        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|e| save_err(e.to_string()))?;

        let temp = NamedTempFile::new_in(parent).map_err(|e| save_err(e.to_string()))?;
        {
            let mut writer = BufWriter::new(temp.as_file());
            serde_json::to_writer(&mut writer, self).map_err(|e| save_err(e.to_string()))?;
            writer.flush().map_err(|e| save_err(e.to_string()))?;
        }
        temp.persist(path).map_err(|e| save_err(e.to_string()))?;

        log::info!("saved GSDMM model to {}", path.display());
        Ok(())
    }

    /// Load a model written by [`GsdmmModel::save`].
    ///
    /// A missing file, malformed JSON or a state whose counts do not add up
    /// is an [`Error::Load`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let load_err = |message: String| Error::Load {
            path: path.display().to_string(),
            message,
        };

        let file = File::open(path).map_err(|e| load_err(e.to_string()))?;
        let model: GsdmmModel = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| load_err(e.to_string()))?;

        model.state().validate().map_err(|e| load_err(e.to_string()))?;
        let (rows, cols) = model.doc_scores().dim();
        if rows != model.state().n_docs() || cols != model.state().n_clusters() {
            return Err(load_err(format!(
                "score matrix is {rows}x{cols}, expected {}x{}",
                model.state().n_docs(),
                model.state().n_clusters()
            )));
        }

        log::info!(
            "loaded GSDMM model from {} ({} documents, {} clusters)",
            path.display(),
            model.state().n_docs(),
            model.state().n_clusters()
        );
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use crate::corpus::Corpus;
    use crate::dmm::{Gsdmm, GsdmmModel};

    fn model() -> GsdmmModel {
        let corpus = Corpus::from_lines(["cat dog cat", "car bus car", "cat cat dog", ""]);
        Gsdmm::new(3).with_n_iters(10).with_seed(21).fit(&corpus).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models").join("gsdmm.json");
        let model = model();
        model.save(&path).unwrap();

        let loaded = GsdmmModel::load(&path).unwrap();
        assert_eq!(loaded.state(), model.state());
        assert_eq!(loaded.report(), model.report());
        assert_eq!(loaded.topics(10), model.topics(10));
        assert_eq!(loaded.corpus_predictions(3), model.corpus_predictions(3));
        assert_eq!(loaded.score(&["cat", "dog"]), model.score(&["cat", "dog"]));
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GsdmmModel::load(dir.path().join("absent.json")).unwrap_err();
        assert!(err.is_load());
    }

    #[test]
    fn test_corrupt_file_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gsdmm.json");
        std::fs::write(&path, b"{\"state\": 12").unwrap();
        assert!(GsdmmModel::load(&path).unwrap_err().is_load());
    }

    #[test]
    fn test_inconsistent_counts_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gsdmm.json");
        let mut json = serde_json::to_value(model()).unwrap();
        json["state"]["assignment"][0] = serde_json::json!(2);
        json["state"]["assignment"][1] = serde_json::json!(2);
        json["state"]["assignment"][2] = serde_json::json!(2);
        json["state"]["assignment"][3] = serde_json::json!(2);
        json["state"]["clusters"][0]["doc_count"] = serde_json::json!(99);
        std::fs::write(&path, serde_json::to_vec(&json).unwrap()).unwrap();
        assert!(GsdmmModel::load(&path).unwrap_err().is_load());
    }
}
