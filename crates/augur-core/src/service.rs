//! Request orchestration.
//!
//! One linear pipeline per request: validate → load model → load labels →
//! preprocess → predict → map. Any stage failure short-circuits and the
//! request's prior work is discarded; requests share nothing but the
//! registry cache.

use indexmap::IndexMap;

use crate::category::ModelCategory;
use crate::error::AugurResult;
use crate::labels::LabelStore;
use crate::mapper;
use crate::model::ClassifierModel;
use crate::preprocess;
use crate::registry::ModelRegistry;

/// The inference pipeline behind the predict endpoint.
pub struct InferenceService {
    registry: ModelRegistry,
    labels: LabelStore,
}

impl InferenceService {
    /// Create a service over a model directory.
    ///
    /// The directory is taken as an explicit constructor argument; nothing
    /// in the pipeline reads ambient process state.
    pub fn new(model_dir: impl Into<std::path::PathBuf>) -> Self {
        let model_dir = model_dir.into();
        Self {
            registry: ModelRegistry::new(&model_dir),
            labels: LabelStore::new(model_dir),
        }
    }

    /// Run one prediction: uploaded bytes in, ordered label→probability map
    /// out.
    ///
    /// Validation precedes preprocessing unconditionally, so decoders only
    /// ever see content of an allowed type. No retries; one attempt per
    /// request.
    pub fn predict(
        &self,
        model_name: &str,
        category: ModelCategory,
        file: &[u8],
    ) -> AugurResult<IndexMap<String, f32>> {
        crate::filetype::validate(file, category)?;

        let model = self.registry.get_or_load(model_name)?;
        let labels = self.labels.load(model_name)?;

        let input = preprocess::preprocess(category, file)?;
        log::debug!(
            "running '{model_name}' ({category}) on input shape {:?}",
            input.shape()
        );

        let outputs = model.run(input)?;
        let raw = ClassifierModel::into_single_output(outputs)?;

        mapper::map_prediction(&raw, &labels)
    }

    /// The registry backing this service.
    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AugurError;
    use image::{ImageBuffer, Rgb};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn png_bytes() -> Vec<u8> {
        let img = ImageBuffer::from_pixel(32, 32, Rgb([128u8, 64, 32]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn wav_bytes() -> Vec<u8> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut bytes = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut bytes, spec).unwrap();
            for i in 0..16000 {
                let s = (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 16000.0).sin();
                writer.write_sample((s * 16000.0) as i16).unwrap();
            }
            writer.finalize().unwrap();
        }
        bytes.into_inner()
    }

    #[test]
    fn test_wav_upload_for_image_category_is_rejected_before_anything_else() {
        let dir = TempDir::new().unwrap();
        let service = InferenceService::new(dir.path());

        // No model exists either; the type check must fire first.
        let err = service
            .predict("cats_dogs", ModelCategory::Image, &wav_bytes())
            .unwrap_err();
        match err {
            AugurError::UnsupportedFileType { detected, .. } => {
                assert_eq!(detected, "audio/wav");
            }
            other => panic!("expected UnsupportedFileType, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_model_is_model_not_found() {
        let dir = TempDir::new().unwrap();
        let service = InferenceService::new(dir.path());
        let err = service
            .predict("cats_dogs", ModelCategory::Image, &png_bytes())
            .unwrap_err();
        assert!(matches!(err, AugurError::ModelNotFound(name) if name == "cats_dogs"));
    }

    #[test]
    fn test_audio_upload_passes_validation_then_fails_on_missing_model() {
        let dir = TempDir::new().unwrap();
        let service = InferenceService::new(dir.path());
        let err = service
            .predict("speech", ModelCategory::Audio, &wav_bytes())
            .unwrap_err();
        assert!(matches!(err, AugurError::ModelNotFound(_)));
    }
}
