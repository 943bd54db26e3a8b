use std::collections::HashMap;
use std::time::{Duration, Instant};

use axum::Json;
use axum::http::StatusCode;
use fleet_analysis::{FuelType, Machine, Reading};
use serde::Serialize;

use crate::AppState;

const ENGINE_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

// 2023-01-01T09:00:00Z
const PROBE_START_MS: i64 = 1_672_563_600_000;
const PROBE_HOURS: i64 = 2;
const PROBE_EXPECTED_CONSUMPTION: f64 = 40.0;

#[derive(Serialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Serialize, Debug)]
pub struct ComponentHealth {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub components: HashMap<String, ComponentHealth>,
}

pub async fn handler(state: AppState) -> (StatusCode, Json<HealthResponse>) {
    let mut components = HashMap::new();

    components.insert("analysis_engine".to_string(), check_engine().await);
    components.insert(
        "telemetry".to_string(),
        ComponentHealth {
            status: if state.telemetry.is_sampling() {
                HealthStatus::Healthy
            } else {
                HealthStatus::Degraded
            },
            latency_ms: None,
            error: None,
        },
    );

    let is_shutting_down = state.shutdown.is_shutting_down();
    components.insert(
        "shutdown".to_string(),
        ComponentHealth {
            status: if is_shutting_down {
                HealthStatus::Unhealthy
            } else {
                HealthStatus::Healthy
            },
            latency_ms: None,
            error: is_shutting_down.then(|| "shutting down".to_string()),
        },
    );

    let overall = overall_status(&components);

    let status_code = if overall == HealthStatus::Unhealthy {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    (
        status_code,
        Json(HealthResponse {
            status: overall,
            components,
        }),
    )
}

fn overall_status(components: &HashMap<String, ComponentHealth>) -> HealthStatus {
    if components
        .values()
        .any(|c| c.status == HealthStatus::Unhealthy)
    {
        HealthStatus::Unhealthy
    } else if components
        .values()
        .any(|c| c.status == HealthStatus::Degraded)
    {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    }
}

/// Runs a known single-machine scenario through the engine.
async fn check_engine() -> ComponentHealth {
    let start = Instant::now();
    let result = tokio::time::timeout(
        ENGINE_CHECK_TIMEOUT,
        tokio::task::spawn_blocking(run_engine_probe),
    )
    .await;

    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(Ok(Ok(()))) => ComponentHealth {
            status: HealthStatus::Healthy,
            latency_ms: Some(latency_ms),
            error: None,
        },
        Ok(Ok(Err(e))) => ComponentHealth {
            status: HealthStatus::Unhealthy,
            latency_ms: Some(latency_ms),
            error: Some(e),
        },
        Ok(Err(e)) => ComponentHealth {
            status: HealthStatus::Unhealthy,
            latency_ms: Some(latency_ms),
            error: Some(e.to_string()),
        },
        Err(_) => ComponentHealth {
            status: HealthStatus::Unhealthy,
            latency_ms: Some(latency_ms),
            error: Some("timeout".to_string()),
        },
    }
}

fn run_engine_probe() -> Result<(), String> {
    let machines = [Machine {
        id: "probe".to_string(),
        manufacturer: "probe".to_string(),
        machine_type: "probe".to_string(),
        fuel_type: FuelType::Electric,
        battery_size: Some(100.0),
        fuel_tank_size: None,
    }];
    let readings = [
        Reading {
            timestamp: PROBE_START_MS,
            machine_id: "probe".to_string(),
            fuel_level: None,
            battery_soc: Some(0.8),
        },
        Reading {
            timestamp: PROBE_START_MS + PROBE_HOURS * 3_600_000,
            machine_id: "probe".to_string(),
            fuel_level: None,
            battery_soc: Some(0.4),
        },
    ];

    let report = fleet_analysis::analyze(&machines, &readings);
    let metrics = report
        .machine_metrics
        .first()
        .ok_or_else(|| "probe produced no machine metrics".to_string())?;

    if metrics.consumption != PROBE_EXPECTED_CONSUMPTION
        || metrics.total_hours != PROBE_HOURS as f64
    {
        return Err(format!(
            "unexpected probe result: consumption={}, total_hours={}",
            metrics.consumption, metrics.total_hours
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn component(status: HealthStatus) -> ComponentHealth {
        ComponentHealth {
            status,
            latency_ms: None,
            error: None,
        }
    }

    #[test]
    fn test_engine_probe_passes() {
        assert_eq!(run_engine_probe(), Ok(()));
    }

    #[test]
    fn test_overall_status_takes_worst_component() {
        let mut components = HashMap::new();
        components.insert("a".to_string(), component(HealthStatus::Healthy));
        assert_eq!(overall_status(&components), HealthStatus::Healthy);

        components.insert("b".to_string(), component(HealthStatus::Degraded));
        assert_eq!(overall_status(&components), HealthStatus::Degraded);

        components.insert("c".to_string(), component(HealthStatus::Unhealthy));
        assert_eq!(overall_status(&components), HealthStatus::Unhealthy);
    }
}
