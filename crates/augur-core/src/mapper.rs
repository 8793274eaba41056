//! Prediction-to-label mapping.
//!
//! Aligns a model's raw output row with the label list. The ordered map
//! keeps label-file order, which callers rely on when serializing.

use indexmap::IndexMap;
use ndarray::{ArrayD, Axis};

use crate::error::{AugurError, AugurResult};

/// Map a raw output of shape (1, N) onto `labels` (length N).
///
/// Fails with `ShapeMismatch` before producing any partial result when the
/// output is not rank-2 or its width disagrees with the label count. No
/// renormalization: probabilities pass through as the model produced them.
pub fn map_prediction(
    output: &ArrayD<f32>,
    labels: &[String],
) -> AugurResult<IndexMap<String, f32>> {
    let shape = output.shape();
    if shape.len() != 2 || shape[1] != labels.len() {
        return Err(AugurError::ShapeMismatch {
            classes: if shape.len() == 2 { shape[1] } else { 0 },
            labels: labels.len(),
        });
    }

    let row = output.index_axis(Axis(0), 0);
    Ok(labels
        .iter()
        .cloned()
        .zip(row.iter().copied())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::IxDyn;

    fn output(values: &[f32]) -> ArrayD<f32> {
        ArrayD::from_shape_vec(IxDyn(&[1, values.len()]), values.to_vec()).unwrap()
    }

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_map_aligns_labels_with_probabilities() {
        let mapped = map_prediction(&output(&[0.92, 0.08]), &labels(&["kedi", "kopek"])).unwrap();
        assert_eq!(mapped.len(), 2);
        assert_eq!(mapped["kedi"], 0.92);
        assert_eq!(mapped["kopek"], 0.08);
    }

    #[test]
    fn test_map_preserves_label_order() {
        let names = ["zebra", "aardvark", "mouse", "yak"];
        let mapped =
            map_prediction(&output(&[0.1, 0.2, 0.3, 0.4]), &labels(&names)).unwrap();
        let order: Vec<_> = mapped.keys().map(String::as_str).collect();
        assert_eq!(order, names);
    }

    #[test]
    fn test_map_preserves_total_mass() {
        let values = [0.05f32, 0.15, 0.25, 0.55];
        let mapped =
            map_prediction(&output(&values), &labels(&["a", "b", "c", "d"])).unwrap();
        let sum_in: f32 = values.iter().sum();
        let sum_out: f32 = mapped.values().sum();
        assert!((sum_in - sum_out).abs() < 1e-6);
    }

    #[test]
    fn test_width_mismatch_is_shape_mismatch() {
        let err = map_prediction(&output(&[0.5, 0.3, 0.2]), &labels(&["a", "b"])).unwrap_err();
        match err {
            AugurError::ShapeMismatch { classes, labels } => {
                assert_eq!(classes, 3);
                assert_eq!(labels, 2);
            }
            other => panic!("expected ShapeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_rank_is_shape_mismatch() {
        let flat = ArrayD::from_shape_vec(IxDyn(&[2]), vec![0.5, 0.5]).unwrap();
        let err = map_prediction(&flat, &labels(&["a", "b"])).unwrap_err();
        assert!(matches!(err, AugurError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_serializes_in_label_order() {
        let mapped = map_prediction(&output(&[0.92, 0.08]), &labels(&["kedi", "kopek"])).unwrap();
        let json = serde_json::to_string(&mapped).unwrap();
        assert_eq!(json, r#"{"kedi":0.92,"kopek":0.08}"#);
    }
}
