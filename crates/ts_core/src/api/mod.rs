pub mod json_api;
pub mod presets;

pub use json_api::{
    simulate_json, simulate_request, SimulationRequest, SimulationResponse, MAX_STEPS, MIN_STEPS,
};
