use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::SharedState;
use crate::submission::{parser, pipeline};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub success: bool,
    pub message: &'static str,
    pub id: Uuid,
    pub email_sent: bool,
}

pub async fn submit(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<ContactResponse>), AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    let raw_data = parser::parse_body(content_type, &body).map_err(|e| {
        tracing::debug!("Rejected contact body: {e}");
        AppError::BadRequest("Invalid request body.".to_string())
    })?;

    let result = pipeline::run(&state, raw_data).await?;

    Ok((
        StatusCode::CREATED,
        Json(ContactResponse {
            success: true,
            message: result.notification.message(),
            id: result.submission.id,
            email_sent: result.notification.email_sent(),
        }),
    ))
}
