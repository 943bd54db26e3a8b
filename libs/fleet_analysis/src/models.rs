use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Energy source of a machine.
///
/// The variant decides which level field of a [`Reading`] carries the
/// machine's remaining resource and which size field is its capacity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FuelType {
    Diesel,
    Electric,
    Other(String),
}

impl FuelType {
    pub fn as_str(&self) -> &str {
        match self {
            FuelType::Diesel => "diesel",
            FuelType::Electric => "electric",
            FuelType::Other(name) => name.as_str(),
        }
    }

    /// Level of `reading` that is meaningful for this fuel type.
    pub fn level(&self, reading: &Reading) -> Option<f64> {
        match self {
            FuelType::Electric => reading.battery_soc,
            FuelType::Diesel | FuelType::Other(_) => reading.fuel_level,
        }
    }

    pub fn unit(&self) -> ConsumptionUnit {
        match self {
            FuelType::Electric => ConsumptionUnit::KilowattHours,
            FuelType::Diesel | FuelType::Other(_) => ConsumptionUnit::Liters,
        }
    }
}

impl From<String> for FuelType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "diesel" => FuelType::Diesel,
            "electric" => FuelType::Electric,
            _ => FuelType::Other(value),
        }
    }
}

impl From<&str> for FuelType {
    fn from(value: &str) -> Self {
        FuelType::from(value.to_string())
    }
}

impl From<FuelType> for String {
    fn from(value: FuelType) -> Self {
        match value {
            FuelType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for FuelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsumptionUnit {
    #[serde(rename = "L")]
    Liters,
    #[serde(rename = "kWh")]
    KilowattHours,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    pub id: String,
    pub manufacturer: String,
    #[serde(rename = "type")]
    pub machine_type: String,
    pub fuel_type: FuelType,
    /// Battery capacity in kWh
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_size: Option<f64>,
    /// Tank capacity in liters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_tank_size: Option<f64>,
}

impl Machine {
    /// Maximum resource quantity used to turn level deltas into absolute
    /// consumption. Missing and negative sizes count as zero.
    pub fn capacity(&self) -> f64 {
        let size = match self.fuel_type {
            FuelType::Diesel => self.fuel_tank_size,
            FuelType::Electric => self.battery_size,
            FuelType::Other(_) => self.fuel_tank_size.or(self.battery_size),
        };
        size.unwrap_or(0.0).max(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Milliseconds since the Unix epoch, UTC
    pub timestamp: i64,
    pub machine_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_level: Option<f64>,
    #[serde(
        default,
        rename = "battery_SoC",
        skip_serializing_if = "Option::is_none"
    )]
    pub battery_soc: Option<f64>,
}

impl Reading {
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineMetrics {
    pub machine_id: String,
    pub average_start: Option<NaiveTime>,
    pub average_end: Option<NaiveTime>,
    pub total_hours: f64,
    pub consumption: f64,
    pub consumption_unit: ConsumptionUnit,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EfficiencyMetrics {
    #[serde(rename = "most_efficient")]
    pub most_efficient_id: Option<String>,
    #[serde(rename = "least_efficient")]
    pub least_efficient_id: Option<String>,
    pub avg_consumption_per_hour: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PeakConsumptionDays {
    /// Shared by diesel and every non-electric fuel class
    pub diesel: Option<NaiveDate>,
    pub electric: Option<NaiveDate>,
}

impl PeakConsumptionDays {
    pub fn get(&self, fuel_type: &FuelType) -> Option<NaiveDate> {
        match fuel_type {
            FuelType::Electric => self.electric,
            FuelType::Diesel | FuelType::Other(_) => self.diesel,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub machine_metrics: Vec<MachineMetrics>,
    pub peak_consumption_days: PeakConsumptionDays,
    pub efficiency_metrics: EfficiencyMetrics,
}

/// Rounds half away from zero to two decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn machine(fuel_type: &str) -> Machine {
        Machine {
            id: "m1".to_string(),
            manufacturer: "Acme".to_string(),
            machine_type: "excavator".to_string(),
            fuel_type: FuelType::from(fuel_type),
            battery_size: Some(100.0),
            fuel_tank_size: Some(50.0),
        }
    }

    #[test]
    fn test_capacity_follows_fuel_type() {
        assert_eq!(machine("diesel").capacity(), 50.0);
        assert_eq!(machine("electric").capacity(), 100.0);
        assert_eq!(machine("hydrogen").capacity(), 50.0);

        let mut bare = machine("electric");
        bare.battery_size = None;
        assert_eq!(bare.capacity(), 0.0);
    }

    #[test]
    fn test_negative_capacity_counts_as_zero() {
        let mut broken = machine("diesel");
        broken.fuel_tank_size = Some(-50.0);
        assert_eq!(broken.capacity(), 0.0);
    }

    #[test]
    fn test_level_selected_by_fuel_type() {
        let reading = Reading {
            timestamp: 0,
            machine_id: "m1".to_string(),
            fuel_level: Some(0.3),
            battery_soc: Some(0.7),
        };
        assert_eq!(FuelType::Electric.level(&reading), Some(0.7));
        assert_eq!(FuelType::Diesel.level(&reading), Some(0.3));
        assert_eq!(FuelType::from("lpg").level(&reading), Some(0.3));
    }

    #[test]
    fn test_machine_json_shape() {
        let machine: Machine = serde_json::from_value(serde_json::json!({
            "id": "e-1",
            "manufacturer": "Volvo",
            "type": "loader",
            "fuel_type": "electric",
            "battery_size": 264
        }))
        .unwrap();
        assert_eq!(machine.fuel_type, FuelType::Electric);
        assert_eq!(machine.machine_type, "loader");
        assert_eq!(machine.fuel_tank_size, None);

        let value = serde_json::to_value(&machine).unwrap();
        assert_eq!(value["fuel_type"], "electric");
        assert_eq!(value["type"], "loader");
    }

    #[test]
    fn test_reading_uses_soc_field_name() {
        let reading: Reading = serde_json::from_value(serde_json::json!({
            "timestamp": 1672549200000i64,
            "machine_id": "e-1",
            "battery_SoC": 0.8
        }))
        .unwrap();
        assert_eq!(reading.battery_soc, Some(0.8));
        assert_eq!(reading.fuel_level, None);
    }

    #[test]
    fn test_peak_days_json_shape() {
        let peak = PeakConsumptionDays {
            diesel: NaiveDate::from_ymd_opt(2024, 3, 1),
            electric: None,
        };
        assert_eq!(peak.get(&FuelType::from("hydrogen")), peak.diesel);

        let value = serde_json::to_value(&peak).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "diesel": "2024-03-01",
                "electric": null
            })
        );
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(54.999999), 55.0);
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(0.0), 0.0);
    }
}
