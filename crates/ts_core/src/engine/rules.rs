//! Built-in update rules for common scenarios: constants, capped linear
//! growth, decay with a floor, oscillation, the E_n recurrence, Fibonacci
//! feedback, momentum, and a seeded random walk.
//!
//! Rules that need private state (momentum, RNG) are structs with explicit
//! fields and reset semantics rather than closures over free variables.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::axiom::sequences::{e_recurrence, fibonacci};
use crate::models::{SystemState, Variable};

use super::timesphere::UpdateRule;

/// Hold a variable at a fixed value.
pub fn constant(value: f64) -> impl UpdateRule {
    move |_state: &SystemState, _step: u32| value
}

/// Linear growth with a cap: `v' = min(max_value, v + rate)`, floored at 0.
pub fn linear_growth(variable: Variable, rate: f64, max_value: f64) -> impl UpdateRule {
    move |state: &SystemState, _step: u32| (state.inputs.get(variable) + rate).clamp(0.0, max_value)
}

/// Exponential decay with a floor: `v' = max(floor, v · (1 - rate))`.
pub fn decay(variable: Variable, rate: f64, floor: f64) -> impl UpdateRule {
    move |state: &SystemState, _step: u32| (state.inputs.get(variable) * (1.0 - rate)).max(floor)
}

/// Sinusoidal oscillation around a baseline, clamped to [0, 1] to match the
/// bounded input semantics.
pub fn oscillate(amplitude: f64, period: u32, baseline: f64) -> impl UpdateRule {
    move |_state: &SystemState, step: u32| {
        let phase = 2.0 * std::f64::consts::PI * f64::from(step) / f64::from(period.max(1));
        (baseline + amplitude * phase.sin()).clamp(0.0, 1.0)
    }
}

/// E_n recurrence: `E_n = a · E_{n-1} + b`.
pub fn e_sequence_rule(a: f64, b: f64) -> impl UpdateRule {
    move |state: &SystemState, _step: u32| e_recurrence(state.inputs.e_n, a, b)
}

/// F_n follows the Fibonacci sequence of the step index.
pub fn fibonacci_rule() -> impl UpdateRule {
    move |_state: &SystemState, step: u32| fibonacci(step) as f64
}

/// Momentum-based update: tracks the rate of change of one variable and
/// accelerates motion in the direction it is already moving.
pub struct MomentumRule {
    variable: Variable,
    momentum_factor: f64,
    acceleration: f64,
    min_value: f64,
    max_value: f64,
    previous: Option<f64>,
    velocity: f64,
}

impl MomentumRule {
    pub fn new(variable: Variable, momentum_factor: f64, acceleration: f64) -> Self {
        Self::with_bounds(variable, momentum_factor, acceleration, 0.0, 1.0)
    }

    pub fn with_bounds(
        variable: Variable,
        momentum_factor: f64,
        acceleration: f64,
        min_value: f64,
        max_value: f64,
    ) -> Self {
        Self {
            variable,
            momentum_factor,
            acceleration,
            min_value,
            max_value,
            previous: None,
            velocity: 0.0,
        }
    }

    pub fn variable(&self) -> Variable {
        self.variable
    }

    /// Clear the tracked velocity and previous value, as after a fresh start.
    pub fn reset(&mut self) {
        self.previous = None;
        self.velocity = 0.0;
    }
}

impl UpdateRule for MomentumRule {
    fn apply(&mut self, state: &SystemState, _step: u32) -> Result<f64, String> {
        let current = state.inputs.get(self.variable);

        let Some(previous) = self.previous else {
            // First observation establishes the baseline.
            self.previous = Some(current);
            return Ok(current);
        };

        let delta = current - previous;
        self.velocity = self.momentum_factor * self.velocity + delta;
        self.previous = Some(current);

        Ok((current + self.velocity * self.acceleration).clamp(self.min_value, self.max_value))
    }
}

/// Bounded random walk driven by a seeded ChaCha8 stream: the same seed
/// always reproduces the same trajectory.
pub struct RandomWalkRule {
    variable: Variable,
    step_size: f64,
    min_value: f64,
    max_value: f64,
    rng: ChaCha8Rng,
}

impl RandomWalkRule {
    pub fn new(variable: Variable, step_size: f64, seed: u64) -> Self {
        Self::with_bounds(variable, step_size, seed, 0.0, 1.0)
    }

    pub fn with_bounds(
        variable: Variable,
        step_size: f64,
        seed: u64,
        min_value: f64,
        max_value: f64,
    ) -> Self {
        Self { variable, step_size, min_value, max_value, rng: ChaCha8Rng::seed_from_u64(seed) }
    }
}

impl UpdateRule for RandomWalkRule {
    fn apply(&mut self, state: &SystemState, _step: u32) -> Result<f64, String> {
        let offset = self.rng.gen_range(-self.step_size..=self.step_size);
        let current = state.inputs.get(self.variable);
        Ok((current + offset).clamp(self.min_value, self.max_value))
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::TimeSphere;
    use crate::models::AxiomInputs;

    use super::*;

    fn base_inputs() -> AxiomInputs {
        AxiomInputs::new(0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 1.0, 0.0)
    }

    #[test]
    fn test_constant_holds_value() {
        let mut sphere = TimeSphere::new(base_inputs());
        sphere.add_update_rule(Variable::B, constant(0.25));

        let result = sphere.simulate(3).unwrap();
        assert_eq!(result.steps[3].state.inputs.b, 0.25);
    }

    #[test]
    fn test_linear_growth_caps_at_max() {
        let mut sphere = TimeSphere::new(base_inputs());
        sphere.add_update_rule(Variable::A, linear_growth(Variable::A, 0.2, 1.0));

        let result = sphere.simulate(5).unwrap();
        let a_values = result.variable_history(Variable::A);

        assert!((a_values[1] - 0.7).abs() < 1e-12);
        assert_eq!(a_values[5], 1.0);
    }

    #[test]
    fn test_decay_respects_floor() {
        let mut sphere = TimeSphere::new(base_inputs());
        sphere.add_update_rule(Variable::Y, decay(Variable::Y, 0.5, 0.2));

        let result = sphere.simulate(10).unwrap();
        assert_eq!(result.steps[10].state.inputs.y, 0.2);
    }

    #[test]
    fn test_oscillate_stays_in_unit_range() {
        let mut sphere = TimeSphere::new(base_inputs());
        sphere.add_update_rule(Variable::Z, oscillate(0.8, 6, 0.5));

        let result = sphere.simulate(12).unwrap();
        for value in result.variable_history(Variable::Z) {
            assert!((0.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn test_e_sequence_rule_matches_recurrence() {
        let mut sphere = TimeSphere::new(base_inputs());
        sphere.add_update_rule(Variable::En, e_sequence_rule(3.0, 2.0));

        let result = sphere.simulate(3).unwrap();
        assert_eq!(result.variable_history(Variable::En), vec![1.0, 5.0, 17.0, 53.0]);
    }

    #[test]
    fn test_fibonacci_rule_tracks_step_index() {
        let mut sphere = TimeSphere::new(base_inputs());
        sphere.add_update_rule(Variable::Fn, fibonacci_rule());

        let result = sphere.simulate(6).unwrap();
        assert_eq!(result.variable_history(Variable::Fn), vec![0.0, 1.0, 1.0, 2.0, 3.0, 5.0, 8.0]);
    }

    #[test]
    fn test_momentum_accelerates_growth() {
        // A grows linearly; momentum on B follows A's motion with lag.
        let mut sphere = TimeSphere::new(base_inputs());
        sphere.add_update_rule(Variable::A, linear_growth(Variable::A, 0.05, 1.0));
        sphere.add_update_rule(Variable::B, MomentumRule::new(Variable::B, 0.9, 0.5));

        let result = sphere.simulate(10).unwrap();
        // Momentum alone cannot move B: B never changes, so velocity stays 0.
        assert_eq!(result.steps[10].state.inputs.b, 0.5);
    }

    #[test]
    fn test_momentum_follows_external_motion() {
        let mut rule = MomentumRule::new(Variable::A, 0.9, 1.0);
        let s0 = SystemState::new(0, base_inputs().with(Variable::A, 0.2), Default::default());
        let s1 = SystemState::new(1, base_inputs().with(Variable::A, 0.4), Default::default());

        // First call only records the baseline.
        assert_eq!(rule.apply(&s0, 1).unwrap(), 0.2);
        // Second call sees delta 0.2 and pushes past the current value.
        let pushed = rule.apply(&s1, 2).unwrap();
        assert!(pushed > 0.4);

        rule.reset();
        assert_eq!(rule.apply(&s0, 1).unwrap(), 0.2);
    }

    #[test]
    fn test_random_walk_deterministic_per_seed() {
        let run = |seed: u64| {
            let mut sphere = TimeSphere::new(base_inputs());
            sphere.add_update_rule(Variable::X, RandomWalkRule::new(Variable::X, 0.1, seed));
            sphere.simulate(20).unwrap().variable_history(Variable::X)
        };

        assert_eq!(run(42), run(42));
        assert_ne!(run(42), run(43));
    }

    #[test]
    fn test_random_walk_stays_bounded() {
        let mut sphere = TimeSphere::new(base_inputs());
        sphere.add_update_rule(Variable::X, RandomWalkRule::new(Variable::X, 0.4, 7));

        let result = sphere.simulate(50).unwrap();
        for value in result.variable_history(Variable::X) {
            assert!((0.0..=1.0).contains(&value));
        }
    }
}
