//! HTTP routes: prediction endpoint and health check.

use axum::{
    extract::{Multipart, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use augur_core::ModelCategory;

use crate::error::ApiError;
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct PredictParams {
    pub model_name: String,
    pub model_category: ModelCategory,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction: IndexMap<String, f32>,
}

/// Run a prediction on an uploaded file.
///
/// Accepts `?model_name=...&model_category=image|audio` plus a multipart
/// body with a `file` field, and answers with labeled probabilities in
/// label-file order.
async fn predict(
    State(state): State<AppState>,
    Query(params): Query<PredictParams>,
    multipart: Multipart,
) -> Result<Json<PredictResponse>, ApiError> {
    let file = read_file_field(multipart).await?;
    info!(
        "predict request: model='{}' category={} payload={} bytes",
        params.model_name,
        params.model_category,
        file.len()
    );

    // The pipeline is CPU-bound (decode, resample, FFT, model run); keep it
    // off the async workers.
    let service = state.service.clone();
    let prediction = tokio::task::spawn_blocking(move || {
        service.predict(&params.model_name, params.model_category, &file)
    })
    .await
    .map_err(|e| {
        tracing::error!("prediction task panicked: {e}");
        ApiError::internal()
    })??;

    Ok(Json(PredictResponse { prediction }))
}

async fn health() -> &'static str {
    "ok"
}

/// Pull the uploaded bytes out of the multipart body's `file` field.
async fn read_file_field(mut multipart: Multipart) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart payload: {e}")))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("Failed reading 'file' field: {e}")))?;
            if bytes.is_empty() {
                return Err(ApiError::bad_request("Uploaded file is empty"));
            }
            return Ok(bytes.to_vec());
        }
    }
    Err(ApiError::bad_request(
        "Missing multipart 'file' field with the upload",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict_params_parse_categories() {
        let params: PredictParams =
            serde_json::from_str(r#"{"model_name":"cats_dogs","model_category":"image"}"#)
                .unwrap();
        assert_eq!(params.model_name, "cats_dogs");
        assert_eq!(params.model_category, ModelCategory::Image);

        let params: PredictParams =
            serde_json::from_str(r#"{"model_name":"speech","model_category":"audio"}"#).unwrap();
        assert_eq!(params.model_category, ModelCategory::Audio);
    }

    #[test]
    fn test_predict_response_serializes_in_order() {
        let mut prediction = IndexMap::new();
        prediction.insert("kedi".to_string(), 0.92f32);
        prediction.insert("kopek".to_string(), 0.08f32);
        let json = serde_json::to_string(&PredictResponse { prediction }).unwrap();
        assert_eq!(json, r#"{"prediction":{"kedi":0.92,"kopek":0.08}}"#);
    }
}
