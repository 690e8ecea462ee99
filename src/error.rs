use core::fmt;

/// Result alias for `shorttopic`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the sampler, the model interface and persistence.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Input was empty (no documents to sample over).
    EmptyInput,

    /// Invalid hyperparameter or option value.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// A cluster id outside `[0, K)` was referenced.
    ClusterOutOfRange {
        /// Requested cluster.
        cluster: usize,
        /// Number of clusters.
        k: usize,
    },

    /// The model has not been trained or loaded yet.
    NotTrained,

    /// No model is registered under this name.
    UnknownModel(String),

    /// Reading input failed.
    Io {
        /// Path (or source description).
        path: String,
        /// Underlying error.
        message: String,
    },

    /// A trained artifact could not be loaded.
    Load {
        /// Artifact path.
        path: String,
        /// What went wrong.
        message: String,
    },

    /// A trained artifact could not be written.
    Save {
        /// Artifact path.
        path: String,
        /// What went wrong.
        message: String,
    },

}

impl Error {
    /// True for hyperparameter/configuration errors.
    pub fn is_config(&self) -> bool {
        matches!(self, Error::InvalidParameter { .. })
    }

    /// True for errors caused by the supplied documents.
    pub fn is_input(&self) -> bool {
        matches!(self, Error::EmptyInput | Error::ClusterOutOfRange { .. })
    }

    /// True for artifact load failures.
    pub fn is_load(&self) -> bool {
        matches!(self, Error::Load { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput => write!(f, "empty input provided"),
            Error::InvalidParameter { name, message } => {
                write!(f, "invalid parameter '{name}': {message}")
            }
            Error::ClusterOutOfRange { cluster, k } => {
                write!(f, "cluster {cluster} out of range for {k} clusters")
            }
            Error::NotTrained => write!(f, "model has not been trained or loaded"),
            Error::UnknownModel(name) => write!(f, "no model registered as '{name}'"),
            Error::Io { path, message } => write!(f, "failed to read {path}: {message}"),
            Error::Load { path, message } => {
                write!(f, "failed to load model from {path}: {message}")
            }
            Error::Save { path, message } => {
                write!(f, "failed to save model to {path}: {message}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let cfg = Error::InvalidParameter {
            name: "alpha",
            message: "must be > 0",
        };
        assert!(cfg.is_config());
        assert!(!cfg.is_input());
        assert!(Error::EmptyInput.is_input());
        assert!(Error::Load {
            path: "m.json".into(),
            message: "missing".into()
        }
        .is_load());
    }

    #[test]
    fn test_error_display() {
        let e = Error::InvalidParameter {
            name: "beta",
            message: "must be > 0",
        };
        assert_eq!(e.to_string(), "invalid parameter 'beta': must be > 0");
        assert_eq!(
            Error::UnknownModel("lda".into()).to_string(),
            "no model registered as 'lda'"
        );
    }

    #[test]
    fn test_every_kind_is_classified_or_lifecycle() {
        let errors = [
            Error::EmptyInput,
            Error::InvalidParameter {
                name: "k",
                message: "must be > 0",
            },
            Error::ClusterOutOfRange { cluster: 3, k: 2 },
            Error::NotTrained,
            Error::UnknownModel("lftm".into()),
            Error::Io {
                path: "c.txt".into(),
                message: "missing".into(),
            },
            Error::Load {
                path: "m.json".into(),
                message: "bad".into(),
            },
            Error::Save {
                path: "m.json".into(),
                message: "denied".into(),
            },
        ];
        for e in &errors {
            assert!(!e.to_string().is_empty());
        }
        let classified = errors
            .iter()
            .filter(|e| e.is_config() || e.is_input() || e.is_load())
            .count();
        assert_eq!(classified, 4);
    }
}
