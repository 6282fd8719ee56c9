pub mod inputs;
pub mod result;
pub mod state;

pub use inputs::{AxiomInputs, Variable};
pub use result::{RunSummary, SimulationResult, TimeStep};
pub use state::{IntelligenceSnapshot, Metadata, SystemState};
