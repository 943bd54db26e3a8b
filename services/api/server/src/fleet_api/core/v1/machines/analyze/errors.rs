use tokio::task::JoinError;
use uuid::Uuid;

use crate::fleet_api::error_v1::{FleetV1Detail, FleetV1Error};

pub type HandlerResult<T> = Result<T, FleetV1Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Request carries {count} readings, the limit is {max}")]
    TooManyReadings { count: usize, max: usize },

    #[error("Analysis task failed: {0}")]
    AnalysisTask(#[from] JoinError),
}

impl Error {
    pub fn code(&self) -> &'static str {
        match self {
            Error::TooManyReadings { .. } => "too_many_readings",
            Error::AnalysisTask(_) => "analysis_failed",
        }
    }

    pub fn to_fleet_v1_error(self, request_id: &Uuid) -> FleetV1Error {
        let code = self.code();
        match self {
            Error::TooManyReadings { count, max } => {
                FleetV1Error::unprocessable_entity(
                    "Too many readings".to_string(),
                    vec![FleetV1Detail::new(
                        Some("data".to_string()),
                        code,
                        format!(
                            "Request carries {count} readings, the limit is {max}"
                        ),
                        "Split the readings into smaller batches",
                    )],
                    request_id.to_string(),
                )
            }
            Error::AnalysisTask(e) => FleetV1Error::internal_server_error(
                "Analysis failed".to_string(),
                vec![FleetV1Detail::new(
                    None,
                    code,
                    format!("Analysis task failed: {e}"),
                    "Please try again later",
                )],
                request_id.to_string(),
            ),
        }
    }
}

impl crate::fleet_api::error_recorder::IntoFleetV1Error for Error {
    fn into_fleet_v1_error(self, request_id: &Uuid) -> FleetV1Error {
        self.to_fleet_v1_error(request_id)
    }
}
