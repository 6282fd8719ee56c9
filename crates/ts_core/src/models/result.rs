use serde::{Deserialize, Serialize};

use super::{IntelligenceSnapshot, SystemState, Variable};

/// The unit of history: one step's state, snapshot, and the events the
/// handlers produced during that step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeStep {
    pub step: u32,
    pub state: SystemState,
    pub intelligence: IntelligenceSnapshot,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub events: Vec<String>,
}

/// Aggregated statistics for one run, always computed from the full realized
/// trajectory regardless of how much per-step history was retained.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_steps: u32,
    pub initial_intelligence: f64,
    pub final_intelligence: f64,
    pub max_intelligence: f64,
    pub min_intelligence: f64,
    pub avg_intelligence: f64,
    /// Relative growth `(final - initial) / initial`; +infinity when the
    /// initial score is exactly zero.
    pub growth_rate: f64,
}

/// The artifact of one completed run: ordered step records plus summary.
/// Read-only after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub run_id: String,
    pub steps: Vec<TimeStep>,
    pub summary: RunSummary,
}

impl SimulationResult {
    /// Recorded intelligence scores in step order.
    pub fn intelligence_history(&self) -> Vec<f64> {
        self.steps.iter().map(|ts| ts.intelligence.score).collect()
    }

    /// A single component's recorded values over time, by wire name
    /// (`"A"`, `"ABC"`, `"E_factor"`, ...).
    pub fn component_history(&self, component: &str) -> Vec<f64> {
        self.steps
            .iter()
            .filter_map(|ts| ts.intelligence.components.component(component))
            .collect()
    }

    /// A single input variable's recorded values over time.
    pub fn variable_history(&self, variable: Variable) -> Vec<f64> {
        self.steps.iter().map(|ts| ts.state.inputs.get(variable)).collect()
    }

    /// Total number of events emitted across all recorded steps.
    pub fn total_events(&self) -> usize {
        self.steps.iter().map(|ts| ts.events.len()).sum()
    }

    /// Plain-mapping projection for exporters and API responses. Only
    /// primitive values, lists, and nested mappings cross this boundary.
    pub fn to_value(&self) -> crate::Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}
