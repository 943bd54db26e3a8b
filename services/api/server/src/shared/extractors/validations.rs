use crate::fleet_api::error_v1::{FleetV1Detail, FleetV1Error};
use crate::shared::extractors::payload;
use crate::shared::extractors::payload::Payload;
use crate::shared::extractors::request_id::RequestId;
use axum::extract::{FromRequest, Request};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use uuid::Uuid;

/// Deserializes and validates a JSON body.
///
/// Consumes the request body, so it must be the last extractor of a handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedPayload<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedPayload<T>
where
    T: serde::de::DeserializeOwned + validator::Validate,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(
        req: Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        // Read before the body is consumed
        let RequestId(request_id) = RequestId::from_headers(req.headers());

        let Payload(value) = Payload::<T>::from_request(req, state)
            .await
            .map_err(|e| Error::Payload(e, request_id))?;

        value
            .validate()
            .map_err(|e| Error::Validation(e, request_id))?;

        Ok(ValidatedPayload(value))
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Validation failed")]
    Validation(validator::ValidationErrors, Uuid),

    #[error("Payload error")]
    Payload(payload::Error, Uuid),
}

impl Error {
    pub fn to_fleet_v1_error(&self) -> FleetV1Error {
        match self {
            Error::Validation(errors, request_id) => {
                tracing::info!(request_id = %request_id, "{:#?}", errors.errors());
                FleetV1Error::bad_request(
                    "Validation failed".to_string(),
                    validation_details(errors),
                    request_id.to_string(),
                )
            }
            Error::Payload(err, request_id) => err.to_fleet_v1_error(request_id),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        self.to_fleet_v1_error().into_response()
    }
}

/// One detail per failing field, addressed by its full path
/// (e.g. `data[3].fuel_level`).
pub(crate) fn validation_details(
    errors: &validator::ValidationErrors,
) -> Vec<FleetV1Detail> {
    let mut details = Vec::new();
    collect_details(errors, None, &mut details);

    if details.is_empty() {
        details.push(FleetV1Detail::new(
            Some("request".to_string()),
            "validation_failed",
            "Validation failed",
            "Check the request parameters and format of the request body",
        ));
    }

    details
}

fn collect_details(
    errors: &validator::ValidationErrors,
    parent_path: Option<&str>,
    output: &mut Vec<FleetV1Detail>,
) {
    for (field, kind) in errors.errors() {
        let current_path = match parent_path {
            Some(p) => format!("{p}.{field}"),
            None => field.to_string(),
        };

        match kind {
            validator::ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    // Struct-level validators report under `__all__`
                    let (field_name, message) = if *field == "__all__" {
                        (
                            error.code.to_string(),
                            error
                                .message
                                .as_deref()
                                .unwrap_or("validation failed")
                                .to_string(),
                        )
                    } else {
                        (
                            current_path.clone(),
                            error
                                .message
                                .as_deref()
                                .unwrap_or(&error.code)
                                .to_string(),
                        )
                    };

                    output.push(FleetV1Detail::new(
                        Some(field_name),
                        error.code.to_string(),
                        message,
                        "Check the field value and format",
                    ));
                }
            }
            validator::ValidationErrorsKind::Struct(struct_errors) => {
                collect_details(struct_errors, Some(&current_path), output);
            }
            validator::ValidationErrorsKind::List(list_errors) => {
                for (index, item_errors) in list_errors {
                    let item_path = format!("{current_path}[{index}]");
                    collect_details(item_errors, Some(&item_path), output);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(range(min = 0.0, max = 1.0, message = "level must be within [0, 1]"))]
        level: f64,
    }

    #[derive(Validate)]
    struct Batch {
        #[validate(nested)]
        samples: Vec<Sample>,
    }

    #[test]
    fn test_list_errors_are_addressed_by_index() {
        let batch = Batch {
            samples: vec![Sample { level: 0.5 }, Sample { level: 1.5 }],
        };

        let errors = batch.validate().unwrap_err();
        let details = validation_details(&errors);

        assert_eq!(details.len(), 1);
        assert_eq!(details[0].field.as_deref(), Some("samples[1].level"));
        assert_eq!(details[0].code, "range");
        assert_eq!(details[0].message, "level must be within [0, 1]");
    }

    #[test]
    fn test_empty_errors_produce_generic_detail() {
        let details = validation_details(&validator::ValidationErrors::new());

        assert_eq!(details.len(), 1);
        assert_eq!(details[0].code, "validation_failed");
    }
}
