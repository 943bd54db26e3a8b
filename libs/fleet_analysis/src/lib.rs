//! # Fleet Analysis
//!
//! Pure computations over machine telemetry: operating windows, resource
//! consumption, efficiency ranking and fleet peak-consumption days.
//!
//! Nothing in this crate performs I/O or keeps state between calls.
pub mod analysis;
pub mod consumption;
pub mod daily;
pub mod efficiency;
pub mod grouping;
pub mod models;
pub mod peak;

#[cfg(test)]
mod tests;

pub use analysis::{AnalysisRun, analyze, machine_metrics, run_analysis};
pub use models::{
    AnalysisReport, ConsumptionUnit, EfficiencyMetrics, FuelType, Machine,
    MachineMetrics, PeakConsumptionDays, Reading,
};
