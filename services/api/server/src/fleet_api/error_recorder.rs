use std::sync::Arc;

use telemetry::metrics::Telemetry;
use uuid::Uuid;

use crate::fleet_api::error_v1::FleetV1Error;
use crate::metrics::ServerMetrics;

/// Handler error types that can be rendered as a [`FleetV1Error`].
pub trait IntoFleetV1Error {
    fn into_fleet_v1_error(self, request_id: &Uuid) -> FleetV1Error;
}

/// Counts handler errors by code and converts them to [`FleetV1Error`].
pub struct ErrorRecorder<'a> {
    telemetry: &'a Arc<Telemetry<ServerMetrics>>,
    handler_name: &'a str,
    request_id: &'a Uuid,
}

impl<'a> ErrorRecorder<'a> {
    pub fn new(
        telemetry: &'a Arc<Telemetry<ServerMetrics>>,
        handler_name: &'a str,
        request_id: &'a Uuid,
    ) -> Self {
        Self {
            telemetry,
            handler_name,
            request_id,
        }
    }

    pub fn record<E: IntoFleetV1Error>(&self, code: &str, e: E) -> FleetV1Error {
        tracing::warn!(
            handler = self.handler_name,
            error_code = code,
            request_id = %self.request_id,
            "Request failed",
        );
        self.telemetry.maybe_use_metrics(|m| {
            m.record_error(self.handler_name, code);
        });
        e.into_fleet_v1_error(self.request_id)
    }
}
