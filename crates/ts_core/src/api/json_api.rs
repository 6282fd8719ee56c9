//! String-in/string-out JSON API for running simulations, the boundary
//! consumed by web wrappers and host applications. The engine itself puts no
//! upper bound on step counts; this layer imposes the application limit.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::engine::{SimulateOptions, TimeSphere, TrendAnalyzer, TrendConfig, TrendReport};
use crate::error::{EngineError, Result};
use crate::models::{AxiomInputs, Metadata, RunSummary, TimeStep};

use super::presets;

pub const SCHEMA_VERSION: u8 = 1;

/// Application-level bounds on the requested step count.
pub const MIN_STEPS: u32 = 1;
pub const MAX_STEPS: u32 = 250;

#[derive(Debug, Deserialize)]
pub struct SimulationRequest {
    pub schema_version: u8,
    #[serde(flatten)]
    pub inputs: AxiomInputs,
    pub steps: u32,
    /// Optional named rule bundle; see [`presets::available`].
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default = "default_record_history")]
    pub record_history: bool,
    /// When present, a trend report is computed with these thresholds.
    #[serde(default)]
    pub trend: Option<TrendConfig>,
    #[serde(default)]
    pub metadata: Metadata,
}

fn default_record_history() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct SimulationResponse {
    pub schema_version: u8,
    pub run_id: String,
    pub summary: RunSummary,
    pub intelligence_history: Vec<f64>,
    pub steps: Vec<TimeStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<TrendReport>,
}

/// Run one simulation described by a JSON request string.
pub fn simulate_json(request_json: &str) -> Result<String> {
    let request: SimulationRequest = serde_json::from_str(request_json)?;
    let response = simulate_request(request)?;
    Ok(serde_json::to_string(&response)?)
}

/// Run one simulation from an already-parsed request.
pub fn simulate_request(request: SimulationRequest) -> Result<SimulationResponse> {
    if request.schema_version != SCHEMA_VERSION {
        warn!(found = request.schema_version, "rejected request with wrong schema version");
        return Err(EngineError::SchemaVersionMismatch {
            found: request.schema_version,
            expected: SCHEMA_VERSION,
        });
    }

    if !(MIN_STEPS..=MAX_STEPS).contains(&request.steps) {
        warn!(steps = request.steps, "rejected request with out-of-bounds step count");
        return Err(EngineError::InvalidStepCount { requested: request.steps, max: MAX_STEPS });
    }

    request.inputs.validate_bounds()?;

    let mut sphere = TimeSphere::with_metadata(request.inputs, request.metadata);
    if let Some(name) = request.preset.as_deref() {
        presets::apply(name, &mut sphere)?;
    }

    info!(
        steps = request.steps,
        preset = request.preset.as_deref().unwrap_or("none"),
        "api simulation requested"
    );

    let result = sphere.simulate_with(SimulateOptions {
        steps: request.steps,
        record_history: request.record_history,
    })?;

    let trend = request.trend.map(|config| TrendAnalyzer::with_config(config).analyze(&result));

    Ok(SimulationResponse {
        schema_version: SCHEMA_VERSION,
        run_id: result.run_id.clone(),
        summary: result.summary,
        intelligence_history: result.intelligence_history(),
        steps: result.steps,
        trend,
    })
}
