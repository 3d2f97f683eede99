use axum::{extract::State, Json};

use crate::schemas::MessageResponse;
use crate::AppState;

#[utoipa::path(
    post,
    path = "/admin/cache/clear",
    responses(
        (status = 200, description = "Cache cleared", body = MessageResponse),
        (status = 401, description = "Missing or invalid admin credentials")
    ),
    security(("basic_auth" = [])),
    tag = "Admin"
)]
pub async fn clear_cache(State(state): State<AppState>) -> Json<MessageResponse> {
    tracing::info!("Received request to clear cache");
    state.payments.clear_cache().await;

    Json(MessageResponse {
        message: "Cache cleared successfully".to_string(),
    })
}
