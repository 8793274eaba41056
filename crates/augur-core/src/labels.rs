//! Class label loading.
//!
//! Labels live in a sidecar text file next to the model:
//! `{model_dir}/{model_name}_labels.txt`, one `<index> <label>` pair per
//! line. Line order defines output-vector index order, so it is preserved
//! exactly. Files are small and re-read per request; no cache.

use std::path::PathBuf;

use crate::error::{AugurError, AugurResult};

/// Loads ordered class labels for named models.
#[derive(Debug, Clone)]
pub struct LabelStore {
    model_dir: PathBuf,
}

impl LabelStore {
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
        }
    }

    /// Path of the label file for `model_name`.
    pub fn labels_path(&self, model_name: &str) -> PathBuf {
        self.model_dir.join(format!("{model_name}_labels.txt"))
    }

    /// Load the label list for `model_name`, file order preserved.
    ///
    /// Only the label token (second whitespace-separated field) of each line
    /// is kept. Blank lines are skipped; a non-blank line without a label
    /// token is a malformed-labels error.
    pub fn load(&self, model_name: &str) -> AugurResult<Vec<String>> {
        let path = self.labels_path(model_name);
        if !path.exists() {
            return Err(AugurError::labels_not_found(model_name));
        }
        let content = std::fs::read_to_string(&path).map_err(|e| {
            AugurError::internal(format!(
                "failed reading labels file {}: {e}",
                path.display()
            ))
        })?;
        parse_labels(&content, model_name)
    }
}

fn parse_labels(content: &str, model_name: &str) -> AugurResult<Vec<String>> {
    let mut labels = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let _index = fields.next();
        match fields.next() {
            Some(label) => labels.push(label.to_string()),
            None => {
                return Err(AugurError::MalformedLabels {
                    model: model_name.to_string(),
                    line: line_no + 1,
                })
            }
        }
    }
    Ok(labels)
}
