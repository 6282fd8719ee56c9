//! Named rule bundles installable by name through the API layer. Each preset
//! configures a scenario family: steady growth, corruption decay, or
//! innovation cycles.

use crate::engine::rules::{decay, e_sequence_rule, fibonacci_rule, linear_growth, oscillate};
use crate::engine::{ScoreThresholdHandler, TimeSphere};
use crate::error::{EngineError, Result};
use crate::models::{SystemState, Variable};

pub const BASIC_GROWTH: &str = "basic_growth";
pub const CORRUPTION_DECAY: &str = "corruption_decay";
pub const INNOVATION_CYCLES: &str = "innovation_cycles";

/// Names accepted by [`apply`].
pub fn available() -> &'static [&'static str] {
    &[BASIC_GROWTH, CORRUPTION_DECAY, INNOVATION_CYCLES]
}

/// Install a named preset's rules and handlers into an engine.
pub fn apply(name: &str, sphere: &mut TimeSphere) -> Result<()> {
    match name {
        BASIC_GROWTH => basic_growth(sphere),
        CORRUPTION_DECAY => corruption_decay(sphere),
        INNOVATION_CYCLES => innovation_cycles(sphere),
        other => return Err(EngineError::UnknownPreset(other.to_string())),
    }
    Ok(())
}

/// A learner's journey: foundations and output improve steadily, energy and
/// feedback compound.
fn basic_growth(sphere: &mut TimeSphere) {
    sphere.add_update_rule(Variable::A, linear_growth(Variable::A, 0.03, 1.0));
    sphere.add_update_rule(Variable::B, linear_growth(Variable::B, 0.05, 1.0));
    sphere.add_update_rule(Variable::C, linear_growth(Variable::C, 0.04, 1.0));
    sphere.add_update_rule(Variable::X, linear_growth(Variable::X, 0.01, 1.0));
    sphere.add_update_rule(Variable::Y, linear_growth(Variable::Y, 0.06, 1.0));
    sphere.add_update_rule(Variable::Z, linear_growth(Variable::Z, 0.04, 1.0));
    sphere.add_update_rule(Variable::En, e_sequence_rule(1.2, 0.5));
    sphere.add_update_rule(Variable::Fn, |_: &SystemState, step: u32| f64::from(step));

    sphere.add_event_handler(ScoreThresholdHandler::new(vec![1.0, 2.0, 5.0, 10.0]));
}

/// A previously strong system degrading: every factor decays toward a floor,
/// objectivity fastest of all.
fn corruption_decay(sphere: &mut TimeSphere) {
    sphere.add_update_rule(Variable::A, decay(Variable::A, 0.08, 0.1));
    sphere.add_update_rule(Variable::B, decay(Variable::B, 0.06, 0.2));
    sphere.add_update_rule(Variable::C, decay(Variable::C, 0.02, 0.5));
    sphere.add_update_rule(Variable::X, decay(Variable::X, 0.09, 0.1));
    sphere.add_update_rule(Variable::Y, decay(Variable::Y, 0.10, 0.1));
    sphere.add_update_rule(Variable::Z, decay(Variable::Z, 0.07, 0.3));
    sphere.add_update_rule(Variable::En, decay(Variable::En, 0.05, 1.0));
    sphere.add_update_rule(Variable::Fn, |s: &SystemState, _: u32| (s.inputs.f_n - 0.3).max(0.0));

    let mut warned = false;
    sphere.add_event_handler(move |s: &SystemState, step: u32| {
        if !warned && s.inputs.x <= 0.3 {
            warned = true;
            Some(format!("Objectivity degraded below 0.3 at step {step}"))
        } else {
            None
        }
    });
}

/// Experimentation-to-breakthrough cycles: foundations creep upward while
/// yield and accuracy oscillate, with compounding energy and feedback.
fn innovation_cycles(sphere: &mut TimeSphere) {
    sphere.add_update_rule(Variable::A, linear_growth(Variable::A, 0.04, 1.0));
    sphere.add_update_rule(Variable::B, linear_growth(Variable::B, 0.05, 1.0));
    sphere.add_update_rule(Variable::C, linear_growth(Variable::C, 0.03, 1.0));
    sphere.add_update_rule(Variable::X, linear_growth(Variable::X, 0.04, 1.0));
    sphere.add_update_rule(Variable::Y, oscillate(0.25, 6, 0.55));
    sphere.add_update_rule(Variable::Z, oscillate(0.2, 6, 0.6));
    sphere.add_update_rule(Variable::En, e_sequence_rule(1.15, 0.4));
    sphere.add_update_rule(Variable::Fn, fibonacci_rule());

    sphere.add_event_handler(|s: &SystemState, _: u32| {
        if s.inputs.y > 0.8 && s.inputs.x > 0.7 {
            Some("Breakthrough: high yield with clarity".to_string())
        } else if s.inputs.y < 0.4 {
            Some("Experimentation dip: learning from failures".to_string())
        } else {
            None
        }
    });
}
