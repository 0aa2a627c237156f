use axum::Json;
use serde::{Deserialize, Serialize};

use crate::services::error_messages::{classify_error, ErrorCategory};

#[derive(Deserialize, Debug)]
pub struct ClassifyRequest {
    pub message: String,
}

#[derive(Serialize, Debug)]
pub struct ClassifyResponse {
    pub category: ErrorCategory,
    pub message: &'static str,
}

/// Maps raw wallet/RPC error text to a user-facing message.
pub async fn classify(Json(payload): Json<ClassifyRequest>) -> Json<ClassifyResponse> {
    let category = classify_error(&payload.message);
    tracing::debug!("🏷️  Classified error as {:?}", category);

    Json(ClassifyResponse {
        category,
        message: category.user_message(),
    })
}
