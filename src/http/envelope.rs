//! Uniform response envelope of the request boundary

use crate::error::{GaiaError, StatusClass};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Error part of a failed envelope
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
    pub status_class: StatusClass,
}

impl ApiErrorBody {
    pub fn new(code: &str, message: impl Into<String>, status_class: StatusClass) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            status_class,
        }
    }
}

impl From<&GaiaError> for ApiErrorBody {
    fn from(err: &GaiaError) -> Self {
        Self::new(err.code(), err.public_message(), err.status_class())
    }
}

/// `{success: true, data}` or `{success: false, error}`
#[derive(Debug, Clone, PartialEq)]
pub enum ApiEnvelope<T> {
    Success(T),
    Failure(ApiErrorBody),
}

impl<T: Serialize> Serialize for ApiEnvelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ApiEnvelope", 2)?;
        match self {
            ApiEnvelope::Success(data) => {
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
            }
            ApiEnvelope::Failure(error) => {
                state.serialize_field("success", &false)?;
                state.serialize_field("error", error)?;
            }
        }
        state.end()
    }
}

/// Wrap a payload in a success envelope
pub fn ok<T: Serialize>(data: T) -> Json<ApiEnvelope<T>> {
    Json(ApiEnvelope::Success(data))
}

/// Failure envelope with an explicit HTTP status
pub fn failure(status: StatusCode, body: ApiErrorBody) -> Response {
    (status, Json(ApiEnvelope::<()>::Failure(body))).into_response()
}

impl IntoResponse for GaiaError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        failure(status, ApiErrorBody::from(&self))
    }
}
