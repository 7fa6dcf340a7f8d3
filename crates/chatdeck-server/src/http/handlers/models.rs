//! Model catalog handler.

use axum::Json;

use chatdeck_core::api::{ModelView, ModelsResponse};
use chatdeck_core::{DEFAULT_MODEL, MODELS};

/// List selectable models.
///
/// GET /v1/models
pub async fn list_models() -> Json<ModelsResponse> {
    Json(ModelsResponse {
        default_model: DEFAULT_MODEL.to_string(),
        models: MODELS.iter().map(ModelView::from).collect(),
    })
}
