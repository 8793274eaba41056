//! Unified error types for the augur-core public API.
//!
//! Every fallible public operation returns [`AugurResult`]. Internal modules
//! construct `AugurError` at the point of failure; the serving layer decides
//! which variants are safe to echo to a caller and which are logged and
//! replaced by a generic failure.
//!
//! # Error taxonomy
//!
//! ```text
//! AugurError
//! ├── ModelNotFound        -- named model absent on disk
//! ├── LabelsNotFound       -- label file absent for a model
//! ├── MalformedLabels      -- label file line missing its label token
//! ├── UnsupportedFileType  -- sniffed MIME not in the category allow-list
//! ├── Preprocessing        -- upload unreadable/corrupt for its category
//! ├── ShapeMismatch        -- model output width != label count
//! └── Internal             -- model invocation / orchestration failure
//! ```

use thiserror::Error;

use crate::category::ModelCategory;

/// The canonical error type for augur-core.
#[derive(Error, Debug)]
pub enum AugurError {
    /// Named model is absent under the configured model directory.
    #[error("model '{0}' not found")]
    ModelNotFound(String),

    /// The model exists but its sidecar label file does not.
    #[error("labels file for model '{0}' not found")]
    LabelsNotFound(String),

    /// A label file line did not carry a label token after the index.
    #[error("labels file for model '{model}' is malformed at line {line}")]
    MalformedLabels { model: String, line: usize },

    /// The sniffed MIME type is not allowed for the declared category.
    #[error(
        "unsupported file type '{}' for {} models, expected one of: {}",
        .detected,
        .category,
        .allowed.join(", ")
    )]
    UnsupportedFileType {
        detected: String,
        category: ModelCategory,
        allowed: Vec<&'static str>,
    },

    /// Upload content could not be decoded for its declared category.
    #[error("preprocessing failed: {0}")]
    Preprocessing(String),

    /// Model output width disagrees with the label count.
    #[error("prediction has {classes} classes but {labels} labels are defined")]
    ShapeMismatch { classes: usize, labels: usize },

    /// Model invocation or orchestration failure. Details are for server-side
    /// logs only; callers receive a generic failure.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for augur-core.
pub type AugurResult<T> = Result<T, AugurError>;

impl AugurError {
    /// Create a "model not found" error.
    pub fn model_not_found(name: impl Into<String>) -> Self {
        AugurError::ModelNotFound(name.into())
    }

    /// Create a "labels not found" error.
    pub fn labels_not_found(name: impl Into<String>) -> Self {
        AugurError::LabelsNotFound(name.into())
    }

    /// Create a preprocessing error.
    pub fn preprocessing(msg: impl Into<String>) -> Self {
        AugurError::Preprocessing(msg.into())
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        AugurError::Internal(msg.into())
    }

    /// Whether this error describes a defect in caller-supplied input
    /// (safe to echo back) rather than a server-side condition.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AugurError::ModelNotFound(_)
                | AugurError::LabelsNotFound(_)
                | AugurError::UnsupportedFileType { .. }
                | AugurError::Preprocessing(_)
        )
    }
}
