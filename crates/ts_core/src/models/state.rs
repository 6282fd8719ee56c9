use serde::{Deserialize, Serialize};

use crate::axiom::ScoreBreakdown;

use super::AxiomInputs;

/// Opaque key-value annotations carried unchanged through a run.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// One point in simulated time: a step index paired with the inputs that
/// were in force at that step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemState {
    pub step: u32,
    pub inputs: AxiomInputs,
    #[serde(skip_serializing_if = "serde_json::Map::is_empty", default)]
    pub metadata: Metadata,
}

impl SystemState {
    pub fn new(step: u32, inputs: AxiomInputs, metadata: Metadata) -> Self {
        Self { step, inputs, metadata }
    }

    /// Plain-mapping projection for exporters and API responses.
    pub fn to_value(&self) -> crate::Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// The computed score for one step plus the full component breakdown.
/// Derived from a state's inputs; never independently mutated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IntelligenceSnapshot {
    pub step: u32,
    pub score: f64,
    pub components: ScoreBreakdown,
}
