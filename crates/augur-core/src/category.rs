//! Model category tag.
//!
//! The category is supplied per request and selects both the preprocessing
//! transform and the MIME allow-list applied to the upload before the bytes
//! reach a decoder.

use serde::{Deserialize, Serialize};

/// Model family served by the API.
///
/// New categories extend this enum plus the dispatch in
/// [`crate::preprocess::preprocess`]; nothing else needs to know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelCategory {
    /// 224x224 RGB image classifiers.
    Image,
    /// MFCC-based audio classifiers.
    Audio,
}

impl ModelCategory {
    /// MIME types accepted for uploads in this category.
    ///
    /// The lists carry the alias spellings (`image/jpg`, `audio/mp3`) some
    /// sniffers report alongside the canonical types.
    pub fn allowed_mime_types(&self) -> &'static [&'static str] {
        match self {
            ModelCategory::Image => &["image/jpeg", "image/png", "image/jpg"],
            ModelCategory::Audio => &["audio/wav", "audio/mpeg", "audio/mp3"],
        }
    }

    /// Lowercase name, matching the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelCategory::Image => "image",
            ModelCategory::Audio => "audio",
        }
    }
}

impl std::fmt::Display for ModelCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
