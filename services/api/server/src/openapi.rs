// The OpenApi derive macro generates code using Iterator::for_each,
// which is disallowed by our clippy config. Allow it at module level.
#![allow(clippy::disallowed_methods)]

use utoipa::OpenApi;

/// OpenAPI documentation for the Fleet v1 API
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::fleet_api::core::v1::machines::analyze::handler::handler,
    ),
    info(
        title = "Fleet Telemetry Analysis API",
        version = "1.0.0",
        description = "Operating hours, energy consumption, peak days and efficiency ranking for a fleet of diesel and electric machines",
        license(name = "MIT")
    ),
    servers(
        (url = "/api/fleet/v1", description = "API v1")
    ),
    tags(
        (name = "machines", description = "Fleet telemetry analysis")
    )
)]
pub struct FleetV1ApiDoc;

impl FleetV1ApiDoc {
    pub fn openapi() -> utoipa::openapi::OpenApi {
        <FleetV1ApiDoc as utoipa::OpenApi>::openapi()
    }

    /// OpenAPI document rewritten for OpenAPI 3.0 clients:
    /// `type: [X, "null"]` becomes `type: X, nullable: true`.
    pub fn openapi_json() -> serde_json::Value {
        let mut json_value = match serde_json::to_value(Self::openapi()) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("could not serialize OpenAPI document: {e}");
                return serde_json::Value::Null;
            }
        };

        let fixed_count = fix_nullable_types(&mut json_value);
        if fixed_count > 0 {
            tracing::debug!(
                "Fixed {fixed_count} nullable type definitions in OpenAPI document"
            );
        }

        json_value
    }
}

fn fix_nullable_types(value: &mut serde_json::Value) -> usize {
    let mut fixed_count = 0;

    match value {
        serde_json::Value::Object(map) => {
            if let Some(serde_json::Value::Array(types)) = map.get("type")
                && types.len() == 2
                && types.iter().any(|v| v == "null")
                && let Some(concrete) =
                    types.iter().find(|v| *v != "null").cloned()
            {
                map.insert("type".to_string(), concrete);
                map.insert("nullable".to_string(), serde_json::Value::Bool(true));
                fixed_count += 1;
            }

            for val in map.values_mut() {
                fixed_count += fix_nullable_types(val);
            }
        }
        serde_json::Value::Array(items) => {
            for item in items.iter_mut() {
                fixed_count += fix_nullable_types(item);
            }
        }
        _ => {}
    }

    fixed_count
}
