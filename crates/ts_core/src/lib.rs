//! # ts_core - Deterministic Intelligence Simulation Engine
//!
//! Models a scalar intelligence score as the product of eight weighted
//! factors and evolves it across discrete time steps under caller-supplied
//! update rules, with named event detection and trend statistics.
//!
//! ## Features
//! - Pure eight-factor score formula with independent validation and
//!   clamping toggles
//! - Single-pass, deterministic step loop (same configuration = same run)
//! - Per-variable update rules and ordered event handlers
//! - Extension registry with name and capability-kind indices
//! - Trend analysis, file exporters, and a JSON API boundary

pub mod api;
pub mod axiom;
pub mod engine;
pub mod error;
pub mod export;
pub mod extensions;
pub mod models;

pub use api::{simulate_json, SimulationRequest, SimulationResponse};
pub use axiom::{compute_score, intelligence, FormulaOptions, ScoreBreakdown};
pub use engine::{
    EventHandler, SimulateOptions, TimeSphere, TrendAnalyzer, TrendConfig, TrendDirection,
    TrendReport, UpdateRule,
};
pub use error::{EngineError, Result};
pub use extensions::{Extension, ExtensionKind, ExtensionRegistry};
pub use models::{
    AxiomInputs, IntelligenceSnapshot, Metadata, RunSummary, SimulationResult, SystemState,
    TimeStep, Variable,
};

/// Crate version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_basic_simulation_via_json_api() {
        let request = json!({
            "schema_version": 1,
            "A": 0.5, "B": 0.5, "C": 0.5,
            "X": 0.5, "Y": 0.5, "Z": 0.5,
            "E_n": 2.0, "F_n": 1.0,
            "steps": 5,
        });

        let result = simulate_json(&request.to_string());
        assert!(result.is_ok(), "simulation should succeed");

        let parsed: serde_json::Value = serde_json::from_str(&result.unwrap()).unwrap();
        assert_eq!(parsed["schema_version"], 1);
        assert!(parsed["summary"]["final_intelligence"].is_number());
        assert_eq!(parsed["steps"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn test_constant_inputs_repeat_score() {
        // E_n = 2, F_n = 1 and all unit-range factors at 0.5:
        // score = 2 * 2 * 0.125 * 0.125 once, repeated for every step.
        let inputs = AxiomInputs::new(0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 2.0, 1.0);
        let expected = 2.0 * 2.0 * (0.5 * 0.5 * 0.5) * (0.5 * 0.5 * 0.5);

        let mut sphere = TimeSphere::new(inputs);
        let result = sphere.simulate(1).unwrap();

        assert_eq!(result.steps[0].intelligence.score, expected);
        assert_eq!(result.steps[1].intelligence.score, expected);
    }

    #[test]
    fn test_registry_and_engine_compose() {
        let registry = ExtensionRegistry::new();
        registry.register(extensions::momentum_extension(Variable::A, 0.9, 0.1)).unwrap();
        registry
            .register(extensions::threshold_alert_extension(vec![2.0], vec![]))
            .unwrap();

        let mut sphere = TimeSphere::new(AxiomInputs::uniform(0.8));
        registry.install_rules("momentum_update_rule", &mut sphere).unwrap();
        registry.install_handlers("threshold_alert", &mut sphere).unwrap();

        let result = sphere.simulate(5).unwrap();
        assert_eq!(result.steps.len(), 6);
    }
}
