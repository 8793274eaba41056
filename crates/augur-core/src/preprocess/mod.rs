//! Preprocessing transforms.
//!
//! Each [`ModelCategory`] carries one pure transform with the shared
//! signature `&[u8] -> ArrayD<f32>`; [`preprocess`] is the dispatcher that
//! routes an upload to the right one. Transforms hold no state across calls.
//!
//! | Category | Transform | Output shape |
//! |----------|-----------|--------------|
//! | Image    | [`image::preprocess`] | (1, 224, 224, 3) |
//! | Audio    | [`audio::preprocess`] | (1, 13, T) |

pub mod audio;
pub mod image;

use ndarray::ArrayD;

use crate::category::ModelCategory;
use crate::error::AugurResult;

/// Convert raw upload bytes into the model input tensor for `category`.
///
/// Fails with a preprocessing error when the bytes cannot be decoded for the
/// declared category. Callers run [`crate::filetype::validate`] first, so a
/// decode failure here means the content is corrupt, not merely mislabeled.
pub fn preprocess(category: ModelCategory, bytes: &[u8]) -> AugurResult<ArrayD<f32>> {
    match category {
        ModelCategory::Image => image::preprocess(bytes),
        ModelCategory::Audio => audio::preprocess(bytes),
    }
}
