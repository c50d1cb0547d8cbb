use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dataup_core::errors::DataupError;

#[derive(Debug)]
pub struct DataupAxumError(pub anyhow::Error);

impl From<anyhow::Error> for DataupAxumError {
    fn from(e: anyhow::Error) -> Self {
        Self(e)
    }
}

impl From<DataupError> for DataupAxumError {
    fn from(e: DataupError) -> Self {
        Self(e.into_anyhow())
    }
}

impl IntoResponse for DataupAxumError {
    fn into_response(self) -> Response {
        // Look through anyhow contexts for the structured error
        let safe = match self.0.chain().find_map(|e| e.downcast_ref::<DataupError>()) {
            Some(err) => err.sanitize_for_client(),
            None => DataupError::general_error(self.0.to_string()),
        };

        if safe.code() >= 500 {
            tracing::error!(error = ?self.0, "Request failed");
        }

        let status =
            StatusCode::from_u16(safe.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(safe.to_json())).into_response()
    }
}
