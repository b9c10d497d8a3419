//! Model file adapter: Implementation of `Classifier` backed by a JSON artifact.
//!
//! The artifact is produced by an export script next to the training
//! notebook. It comes in two shapes:
//!
//! - the estimator object itself (`{"kind": "...", ...}`), or
//! - a container holding the estimator under `"model"`, optionally with
//!   `feature_names` and free-form `metadata` alongside.
//!
//! Both are resolved once, at load time, into a single [`ModelHandle`].

mod estimators;

use std::path::{Path, PathBuf};

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::domain::{FEATURE_COUNT, FEATURE_NAMES};
use crate::ports::{Classifier, PredictError};

pub use estimators::{DecisionTree, Estimator, LogisticRegression, RandomForest, StandardScaler, TreeNode};

/// Key under which a container artifact stores the estimator.
const MODEL_KEY: &str = "model";

/// Errors raised while loading the model artifact.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("model file not found at {0:?}")]
    NotFound(PathBuf),

    #[error("cannot read model file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("model file is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid model: {0}")]
    InvalidModel(String),

    #[error("model was fit on features {found:?}, expected {expected:?}")]
    FeatureOrder {
        expected: Vec<String>,
        found: Vec<String>,
    },
}

/// Shape the artifact was stored in.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelArtifact {
    /// The document is the estimator itself.
    Direct(Estimator),
    /// The document is a container with the estimator under `"model"`.
    Wrapped(Estimator),
}

impl ModelArtifact {
    /// Parse an artifact from raw JSON bytes.
    ///
    /// # Errors
    /// Returns `LoadError` if the bytes are not JSON, the estimator is
    /// unknown or inconsistent, or a container declares a different
    /// feature order.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, LoadError> {
        let document: Value = serde_json::from_slice(bytes)?;

        let artifact = match document {
            Value::Object(mut map) if map.contains_key(MODEL_KEY) => {
                if let Some(names) = map.get("feature_names") {
                    check_feature_names(names)?;
                }
                let inner = map.remove(MODEL_KEY).unwrap_or(Value::Null);
                Self::Wrapped(serde_json::from_value(inner)?)
            }
            other => Self::Direct(serde_json::from_value(other)?),
        };

        artifact
            .estimator()
            .validate()
            .map_err(LoadError::InvalidModel)?;
        Ok(artifact)
    }

    /// The estimator regardless of shape.
    #[must_use]
    pub fn estimator(&self) -> &Estimator {
        match self {
            Self::Direct(e) | Self::Wrapped(e) => e,
        }
    }

    #[must_use]
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Direct(_) => "direct",
            Self::Wrapped(_) => "wrapped",
        }
    }

    fn into_estimator(self) -> Estimator {
        match self {
            Self::Direct(e) | Self::Wrapped(e) => e,
        }
    }
}

fn check_feature_names(names: &Value) -> Result<(), LoadError> {
    let found: Vec<String> = serde_json::from_value(names.clone())?;
    if found.iter().map(String::as_str).ne(FEATURE_NAMES.iter().copied()) {
        return Err(LoadError::FeatureOrder {
            expected: FEATURE_NAMES.iter().map(|s| (*s).to_string()).collect(),
            found,
        });
    }
    Ok(())
}

/// Loaded, immutable model.
///
/// Holds the estimator and where it came from. Read-only for the rest of
/// the process.
#[derive(Debug, Clone)]
pub struct ModelHandle {
    estimator: Estimator,
    source: PathBuf,
    sha256: String,
}

impl ModelHandle {
    /// Build a handle from an already-parsed artifact.
    #[must_use]
    pub fn from_artifact(artifact: ModelArtifact, source: impl Into<PathBuf>) -> Self {
        Self {
            estimator: artifact.into_estimator(),
            source: source.into(),
            sha256: String::new(),
        }
    }

    #[must_use]
    pub fn estimator(&self) -> &Estimator {
        &self.estimator
    }

    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Hex SHA-256 of the artifact bytes (empty when built in memory).
    #[must_use]
    pub fn sha256(&self) -> &str {
        &self.sha256
    }
}

/// Load the model artifact from `path`.
///
/// # Errors
/// Returns `LoadError` if the file is missing, unreadable or invalid.
pub fn load(path: &Path) -> Result<ModelHandle, LoadError> {
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound(path.to_path_buf())
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let artifact = ModelArtifact::from_slice(&bytes)?;
    let shape = artifact.shape();

    let mut handle = ModelHandle::from_artifact(artifact, path);
    handle.sha256 = sha256_hex_bytes(&bytes);

    tracing::info!(
        "Loaded model from {:?} (shape={}, kind={}, sha256={})",
        path,
        shape,
        handle.estimator.kind(),
        handle.sha256
    );

    Ok(handle)
}

fn sha256_hex_bytes(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

impl Classifier for ModelHandle {
    fn predict(&self, features: &[f64]) -> Result<Vec<i64>, PredictError> {
        if features.len() != FEATURE_COUNT {
            return Err(PredictError::FeatureCount {
                expected: FEATURE_COUNT,
                got: features.len(),
            });
        }
        Ok(vec![self.estimator.predict_row(features)])
    }

    fn describe(&self) -> String {
        let name = self
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "<memory>".to_string());
        format!("{} ({name})", self.estimator.kind())
    }
}
