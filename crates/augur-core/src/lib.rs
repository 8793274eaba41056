//! augur-core - classification inference pipeline.
//!
//! Serves pre-trained image and audio classifiers: an uploaded file is
//! content-sniffed against the category's MIME allow-list, preprocessed into
//! the model's input tensor, run through a cached ONNX session, and mapped
//! back to labeled probabilities.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use augur_core::{InferenceService, ModelCategory};
//!
//! let service = InferenceService::new("models");
//! let prediction = service.predict("cats_dogs", ModelCategory::Image, &upload_bytes)?;
//! // {"kedi": 0.92, "kopek": 0.08}
//! ```
//!
//! ## Module organization
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`category`] | Model category tag and MIME allow-lists |
//! | [`filetype`] | Content-based upload validation |
//! | [`preprocess`] | Category-specific byte → tensor transforms |
//! | [`registry`] | Name-keyed cache of loaded ONNX sessions |
//! | [`labels`] | Sidecar label file loading |
//! | [`model`] | ONNX session wrapper and single-output accessor |
//! | [`mapper`] | Raw output → ordered label:probability map |
//! | [`service`] | Per-request orchestration |

pub mod category;
pub mod error;
pub mod filetype;
pub mod labels;
pub mod mapper;
pub mod model;
pub mod preprocess;
pub mod registry;
pub mod service;

pub use category::ModelCategory;
pub use error::{AugurError, AugurResult};
pub use labels::LabelStore;
pub use model::ClassifierModel;
pub use registry::ModelRegistry;
pub use service::InferenceService;
