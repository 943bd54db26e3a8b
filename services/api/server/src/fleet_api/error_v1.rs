use axum::http::StatusCode;
use chrono::Utc;
use serde::{Deserialize, Serialize};

pub(crate) const DOCUMENTATION_URL: &str = "https://doc.com/v1/api-reference";

#[derive(Serialize, Deserialize, Default)]
pub struct FleetV1Error {
    #[serde(skip)]
    pub(crate) status_code: StatusCode,
    pub(crate) message: String,
    pub(crate) details: Vec<FleetV1Detail>,
    pub(crate) timestamp: String,
    pub(crate) request_id: String,
}

impl FleetV1Error {
    fn new(
        status_code: StatusCode,
        message: String,
        details: Vec<FleetV1Detail>,
        request_id: String,
    ) -> Self {
        Self {
            status_code,
            message,
            details,
            timestamp: Utc::now().to_rfc3339(),
            request_id,
        }
    }

    pub fn bad_request(
        message: String,
        details: Vec<FleetV1Detail>,
        request_id: String,
    ) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, details, request_id)
    }

    pub fn unprocessable_entity(
        message: String,
        details: Vec<FleetV1Detail>,
        request_id: String,
    ) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message, details, request_id)
    }

    pub fn internal_server_error(
        message: String,
        details: Vec<FleetV1Detail>,
        request_id: String,
    ) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message,
            details,
            request_id,
        )
    }

    pub fn status_code(&self) -> StatusCode {
        self.status_code
    }
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct FleetV1Detail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) field: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub(crate) code: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub(crate) message: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub(crate) suggestion: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub(crate) documentation: String,
}

impl FleetV1Detail {
    pub fn new(
        field: Option<String>,
        code: impl Into<String>,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            field,
            code: code.into(),
            message: message.into(),
            suggestion: suggestion.into(),
            documentation: DOCUMENTATION_URL.to_string(),
        }
    }
}

impl axum::response::IntoResponse for FleetV1Error {
    fn into_response(self) -> axum::response::Response {
        if self.status_code.is_server_error() {
            sentry::Hub::with_active(|hub| hub.capture_error(&self));
        }

        (self.status_code, axum::Json(self)).into_response()
    }
}

impl std::fmt::Display for FleetV1Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}, {}, {}",
            self.status_code,
            self.message,
            self.request_id,
            self.details
                .iter()
                .map(|d| d.message.as_str())
                .collect::<Vec<&str>>()
                .join(", ")
        )
    }
}

impl std::fmt::Debug for FleetV1Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Error")
            .field("status_code", &self.status_code)
            .field("message", &self.message)
            .field("details", &self.details)
            .field("timestamp", &self.timestamp)
            .field("request_id", &self.request_id)
            .finish()
    }
}

impl std::error::Error for FleetV1Error {}
