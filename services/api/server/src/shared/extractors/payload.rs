use axum::extract::rejection::BytesRejection;
use axum::extract::{FromRequest, Request};
use axum::http::{HeaderMap, header};
use axum::response::Response;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

use crate::fleet_api::error_v1::{FleetV1Detail, FleetV1Error};

/// JSON body extractor that reports the failing field path on errors.
#[derive(Debug, Clone, Copy, Default)]
#[must_use]
pub struct Payload<T>(pub T);

impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(
        req: Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        if !json_content_type(req.headers()) {
            return Err(Error::MissingJsonContentType);
        }

        let bytes = Bytes::from_request(req, state).await?;
        let deserializer = &mut serde_json::Deserializer::from_slice(&bytes);
        let value: T = serde_path_to_error::deserialize(deserializer)?;

        Ok(Payload(value))
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Bytes(#[from] BytesRejection),

    #[error(transparent)]
    Json(#[from] serde_path_to_error::Error<serde_json::Error>),

    #[error("missing content-type header")]
    MissingJsonContentType,
}

impl Error {
    pub fn to_fleet_v1_error(&self, request_id: &Uuid) -> FleetV1Error {
        match self {
            Error::Json(serde_err) => {
                let path = serde_err.path().to_string();
                let inner = serde_err.inner().to_string();
                let missing = missing_field_name(&inner);

                let (field, code, message) = match (path.as_str(), missing) {
                    // serde reports the root as "."
                    ("" | ".", None) => (
                        "request".to_string(),
                        "invalid_json",
                        format!("Invalid JSON: {inner}"),
                    ),
                    ("" | ".", Some(name)) => (
                        name.clone(),
                        "invalid_field",
                        format!("Missing required field: {name}"),
                    ),
                    (path, Some(name)) => (
                        format!("{path}.{name}"),
                        "invalid_field",
                        format!("Missing required field: {name}"),
                    ),
                    (path, None) => (
                        path.to_string(),
                        "invalid_field",
                        format!("Invalid value for field '{path}': {inner}"),
                    ),
                };

                FleetV1Error::bad_request(
                    "Invalid request payload".to_string(),
                    vec![FleetV1Detail::new(
                        Some(field),
                        code,
                        message,
                        "Check the field value and format",
                    )],
                    request_id.to_string(),
                )
            }
            Error::MissingJsonContentType => FleetV1Error::bad_request(
                "Missing content-type header".to_string(),
                vec![FleetV1Detail::new(
                    Some("Content-Type".to_string()),
                    "missing_content_type",
                    "Content-Type header must be application/json",
                    "Set Content-Type header to application/json",
                )],
                request_id.to_string(),
            ),
            Error::Bytes(_) => FleetV1Error::bad_request(
                "Request body error".to_string(),
                vec![FleetV1Detail::new(
                    Some("request".to_string()),
                    "request_body_error",
                    "Unable to read request body",
                    "Check the request body and content length",
                )],
                request_id.to_string(),
            ),
        }
    }
}

impl axum::response::IntoResponse for Error {
    fn into_response(self) -> Response {
        self.to_fleet_v1_error(&Uuid::new_v4()).into_response()
    }
}

/// Field named by a serde "missing field" message.
///
/// "missing field `machine_id` at line 1 column 20" -> Some("machine_id")
pub(crate) fn missing_field_name(message: &str) -> Option<String> {
    let start = message.find("missing field")?;
    let rest = &message[start + "missing field".len()..];

    ['`', '"'].iter().find_map(|&quote| {
        let open = rest.find(quote)?;
        let close = rest[open + 1..].find(quote)?;
        Some(rest[open + 1..open + 1 + close].to_string())
    })
}

fn json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };

    let Ok(mime) = content_type.parse::<mime::Mime>() else {
        return false;
    };

    mime.type_() == "application"
        && (mime.subtype() == "json"
            || mime.suffix().is_some_and(|name| name == "json"))
}
