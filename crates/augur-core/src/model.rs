//! ONNX classifier session wrapper.
//!
//! Wraps an ONNX Runtime session behind the callable contract the service
//! consumes: input tensor in, name-keyed output bundle out. The session's
//! input/output names are captured at load so inference never guesses graph
//! metadata.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use ndarray::ArrayD;
use ort::session::{builder::GraphOptimizationLevel, Session, SessionInputs};
use ort::value::Value;

use crate::error::{AugurError, AugurResult};

/// A loaded classification model.
///
/// The session is wrapped in a `Mutex` because ONNX Runtime's run call needs
/// exclusive access; concurrent requests against the same model serialize
/// here while distinct models run in parallel.
#[derive(Debug)]
pub struct ClassifierModel {
    session: Mutex<Session>,
    input_name: String,
    output_names: Vec<String>,
}

impl ClassifierModel {
    /// Load a model from an `.onnx` file.
    ///
    /// Classifiers served by this API take exactly one graph input; anything
    /// else is a deployment defect and fails here rather than at request
    /// time.
    pub fn load(model_path: &Path) -> AugurResult<Self> {
        // Safe to call repeatedly; the environment is a process singleton.
        let _ = ort::init().commit();

        let session = Session::builder()
            .map_err(|e| AugurError::internal(format!("failed to create session builder: {e}")))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| AugurError::internal(format!("failed to set optimization level: {e}")))?
            .commit_from_file(model_path)
            .map_err(|e| {
                AugurError::internal(format!(
                    "failed to load model {}: {e}",
                    model_path.display()
                ))
            })?;

        let input_names: Vec<String> = session
            .inputs()
            .iter()
            .map(|input| input.name().to_string())
            .collect();
        let output_names: Vec<String> = session
            .outputs()
            .iter()
            .map(|output| output.name().to_string())
            .collect();

        if input_names.len() != 1 {
            return Err(AugurError::internal(format!(
                "model {} declares {} inputs, expected exactly one",
                model_path.display(),
                input_names.len()
            )));
        }
        if output_names.is_empty() {
            return Err(AugurError::internal(format!(
                "model {} declares no outputs",
                model_path.display()
            )));
        }

        let input_name = input_names.into_iter().next().unwrap_or_default();
        log::debug!(
            "loaded session for {} (input '{}', outputs {:?})",
            model_path.display(),
            input_name,
            output_names
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_names,
        })
    }

    /// Run inference, returning the name-keyed output bundle.
    ///
    /// Integer outputs are widened to f32 so callers see one tensor type.
    pub fn run(&self, input: ArrayD<f32>) -> AugurResult<HashMap<String, ArrayD<f32>>> {
        let value = Value::from_array(input)
            .map_err(|e| AugurError::internal(format!("failed to convert input tensor: {e}")))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| AugurError::internal("model session lock poisoned"))?;

        let inputs: Vec<(Cow<'_, str>, ort::session::SessionInputValue<'_>)> =
            vec![(Cow::Borrowed(self.input_name.as_str()), value.into())];

        let outputs = session
            .run(SessionInputs::from(inputs))
            .map_err(|e| AugurError::internal(format!("model inference failed: {e}")))?;

        let mut result = HashMap::new();
        for name in &self.output_names {
            let output_value = &outputs[name.as_str()];
            let array = if let Ok(view) = output_value.try_extract_array::<f32>() {
                view.to_owned()
            } else if let Ok(view) = output_value.try_extract_array::<i64>() {
                view.map(|&v| v as f32)
            } else {
                return Err(AugurError::internal(format!(
                    "output '{name}' has an unsupported element type (expected f32 or i64)"
                )));
            };
            result.insert(name.clone(), array);
        }

        Ok(result)
    }

    /// Names of the model's graph outputs.
    pub fn output_names(&self) -> &[String] {
        &self.output_names
    }

    /// Extract the single relevant tensor from an output bundle.
    ///
    /// A classifier contract means exactly one output; zero or several is a
    /// broken model/deployment pairing and fails loudly rather than silently
    /// picking one.
    pub fn into_single_output(
        outputs: HashMap<String, ArrayD<f32>>,
    ) -> AugurResult<ArrayD<f32>> {
        let mut iter = outputs.into_iter();
        match (iter.next(), iter.next()) {
            (Some((_, tensor)), None) => Ok(tensor),
            (None, _) => Err(AugurError::internal("model produced no outputs")),
            (Some((first, _)), Some((second, _))) => {
                let mut names = vec![first, second];
                names.extend(iter.map(|(name, _)| name));
                names.sort();
                Err(AugurError::internal(format!(
                    "model produced {} outputs ({}), expected exactly one",
                    names.len(),
                    names.join(", ")
                )))
            }
        }
    }
}
