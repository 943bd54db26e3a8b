use fleet_analysis::{
    AnalysisReport, ConsumptionUnit, EfficiencyMetrics, FuelType, Machine,
    MachineMetrics, PeakConsumptionDays, Reading,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request payload for a fleet analysis
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AnalyzeRequest {
    /// Machine registry
    #[validate(nested)]
    pub machines: Vec<MachinePayload>,

    /// Telemetry readings, in any order
    #[validate(nested)]
    pub data: Vec<ReadingPayload>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MachinePayload {
    #[schema(example = "test1")]
    #[validate(length(min = 1, message = "machine id must not be empty"))]
    pub id: String,

    #[schema(example = "Volvo")]
    pub manufacturer: String,

    #[serde(rename = "type")]
    #[schema(example = "excavator")]
    pub machine_type: String,

    /// "diesel", "electric" or any other fuel class
    #[schema(example = "electric")]
    #[validate(length(min = 1, message = "fuel type must not be empty"))]
    pub fuel_type: String,

    /// Battery capacity in kWh
    #[serde(default)]
    #[schema(example = 100.0)]
    #[validate(range(min = 0.0, message = "battery size must not be negative"))]
    pub battery_size: Option<f64>,

    /// Fuel tank capacity in litres
    #[serde(default)]
    #[validate(range(
        min = 0.0,
        message = "fuel tank size must not be negative"
    ))]
    pub fuel_tank_size: Option<f64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReadingPayload {
    /// Milliseconds since the Unix epoch, UTC, up to the end of year 9999
    #[schema(example = 1672549200000_i64)]
    #[validate(range(
        min = 0,
        max = 253_402_300_799_999_i64,
        message = "timestamp must be a non-negative epoch in milliseconds"
    ))]
    pub timestamp: i64,

    #[schema(example = "test1")]
    #[validate(length(min = 1, message = "machine id must not be empty"))]
    pub machine_id: String,

    /// Fuel level as a fraction of the tank
    #[serde(default)]
    #[validate(range(
        min = 0.0,
        max = 1.0,
        message = "fuel level must be within [0, 1]"
    ))]
    pub fuel_level: Option<f64>,

    /// Battery state of charge as a fraction of capacity
    #[serde(default, rename = "battery_SoC")]
    #[schema(example = 0.8)]
    #[validate(range(
        min = 0.0,
        max = 1.0,
        message = "battery state of charge must be within [0, 1]"
    ))]
    pub battery_soc: Option<f64>,
}

impl From<MachinePayload> for Machine {
    fn from(payload: MachinePayload) -> Self {
        Machine {
            id: payload.id,
            manufacturer: payload.manufacturer,
            machine_type: payload.machine_type,
            fuel_type: FuelType::from(payload.fuel_type),
            battery_size: payload.battery_size,
            fuel_tank_size: payload.fuel_tank_size,
        }
    }
}

impl From<ReadingPayload> for Reading {
    fn from(payload: ReadingPayload) -> Self {
        Reading {
            timestamp: payload.timestamp,
            machine_id: payload.machine_id,
            fuel_level: payload.fuel_level,
            battery_soc: payload.battery_soc,
        }
    }
}

/// Per-machine operating metrics
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct MachineMetricsEntry {
    #[schema(example = "test1")]
    pub machine_id: String,

    /// Mean daily start time, UTC, truncated to the minute
    #[schema(example = "05:00:00")]
    pub average_start: Option<String>,

    /// Mean daily end time, UTC, truncated to the minute
    #[schema(example = "07:00:00")]
    pub average_end: Option<String>,

    #[schema(example = 2.0)]
    pub total_hours: f64,

    /// Estimated energy used, in `consumption_unit`
    #[schema(example = 40.0)]
    pub consumption: f64,

    /// "L" for fuel, "kWh" for batteries
    #[schema(example = "kWh")]
    pub consumption_unit: String,
}

/// Fleet-wide efficiency ranking
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct EfficiencyMetricsEntry {
    #[schema(example = "test1")]
    pub most_efficient: Option<String>,

    #[schema(example = "test1")]
    pub least_efficient: Option<String>,

    #[schema(example = 20.0)]
    pub avg_consumption_per_hour: f64,
}

/// Busiest UTC date ("YYYY-MM-DD") per fuel class. Non-electric fuel types
/// other than diesel count towards `diesel`.
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct PeakConsumptionDaysEntry {
    #[schema(example = "2023-01-02")]
    pub diesel: Option<String>,

    #[schema(example = "2023-01-01")]
    pub electric: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct AnalyzeResponse {
    pub machine_metrics: Vec<MachineMetricsEntry>,
    pub peak_consumption_days: PeakConsumptionDaysEntry,
    pub efficiency_metrics: EfficiencyMetricsEntry,
}

fn unit_label(unit: ConsumptionUnit) -> String {
    match unit {
        ConsumptionUnit::Liters => "L",
        ConsumptionUnit::KilowattHours => "kWh",
    }
    .to_string()
}

impl From<MachineMetrics> for MachineMetricsEntry {
    fn from(metrics: MachineMetrics) -> Self {
        MachineMetricsEntry {
            machine_id: metrics.machine_id,
            average_start: metrics
                .average_start
                .map(|t| t.format("%H:%M:%S").to_string()),
            average_end: metrics
                .average_end
                .map(|t| t.format("%H:%M:%S").to_string()),
            total_hours: metrics.total_hours,
            consumption: metrics.consumption,
            consumption_unit: unit_label(metrics.consumption_unit),
        }
    }
}

impl From<EfficiencyMetrics> for EfficiencyMetricsEntry {
    fn from(metrics: EfficiencyMetrics) -> Self {
        EfficiencyMetricsEntry {
            most_efficient: metrics.most_efficient_id,
            least_efficient: metrics.least_efficient_id,
            avg_consumption_per_hour: metrics.avg_consumption_per_hour,
        }
    }
}

impl From<PeakConsumptionDays> for PeakConsumptionDaysEntry {
    fn from(days: PeakConsumptionDays) -> Self {
        let format = |d: chrono::NaiveDate| d.format("%Y-%m-%d").to_string();

        PeakConsumptionDaysEntry {
            diesel: days.diesel.map(format),
            electric: days.electric.map(format),
        }
    }
}

impl From<AnalysisReport> for AnalyzeResponse {
    fn from(report: AnalysisReport) -> Self {
        AnalyzeResponse {
            machine_metrics: report
                .machine_metrics
                .into_iter()
                .map(MachineMetricsEntry::from)
                .collect(),
            peak_consumption_days: report.peak_consumption_days.into(),
            efficiency_metrics: report.efficiency_metrics.into(),
        }
    }
}
