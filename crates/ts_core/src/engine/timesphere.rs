//! TimeSphere: the discrete-time simulation engine.
//!
//! A sphere is configured with initial inputs, per-variable update rules,
//! and event handlers, then run for an explicit number of steps. Each step
//! evaluates every rule against the *previous* state (rules never observe
//! each other's same-step output), assembles the next inputs, scores them,
//! and runs the handlers in registration order. The run is single-threaded
//! and synchronous; one sphere per concurrent run.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::axiom::{compute_score, FormulaOptions};
use crate::error::{EngineError, Result};
use crate::models::{
    AxiomInputs, IntelligenceSnapshot, Metadata, RunSummary, SimulationResult, SystemState,
    TimeStep, Variable,
};

/// A per-variable update computation `(previous state, step) -> new value`.
///
/// Rules may carry private internal state (`&mut self`), e.g. momentum
/// counters, but must not mutate the state they are handed. Failures are
/// reported as messages; the engine attaches the variable and step.
pub trait UpdateRule: Send {
    fn apply(&mut self, state: &SystemState, step: u32) -> std::result::Result<f64, String>;
}

impl<F> UpdateRule for F
where
    F: FnMut(&SystemState, u32) -> f64 + Send,
{
    fn apply(&mut self, state: &SystemState, step: u32) -> std::result::Result<f64, String> {
        Ok(self(state, step))
    }
}

impl UpdateRule for Box<dyn UpdateRule> {
    fn apply(&mut self, state: &SystemState, step: u32) -> std::result::Result<f64, String> {
        (**self).apply(state, step)
    }
}

/// An observer of each newly produced state, optionally emitting an event
/// description. All handlers run every step, in registration order.
pub trait EventHandler: Send {
    fn observe(&mut self, state: &SystemState, step: u32)
        -> std::result::Result<Option<String>, String>;
}

impl<F> EventHandler for F
where
    F: FnMut(&SystemState, u32) -> Option<String> + Send,
{
    fn observe(
        &mut self,
        state: &SystemState,
        step: u32,
    ) -> std::result::Result<Option<String>, String> {
        Ok(self(state, step))
    }
}

impl EventHandler for Box<dyn EventHandler> {
    fn observe(
        &mut self,
        state: &SystemState,
        step: u32,
    ) -> std::result::Result<Option<String>, String> {
        (**self).observe(state, step)
    }
}

/// Options for one run.
#[derive(Debug, Clone, Copy)]
pub struct SimulateOptions {
    pub steps: u32,
    /// When false, only the first and last records are retained. Summary
    /// statistics are unaffected: they always come from the full trajectory.
    pub record_history: bool,
}

impl SimulateOptions {
    pub fn new(steps: u32) -> Self {
        Self { steps, record_history: true }
    }
}

/// Simulation engine for evolving the eight-factor system over time.
///
/// ```
/// use ts_core::engine::TimeSphere;
/// use ts_core::models::{AxiomInputs, Variable};
///
/// let mut sphere = TimeSphere::new(AxiomInputs::uniform(0.5));
/// sphere.add_update_rule(Variable::A, |s: &ts_core::models::SystemState, _step: u32| {
///     (s.inputs.a + 0.03).min(1.0)
/// });
/// let result = sphere.simulate(10).unwrap();
/// assert_eq!(result.steps.len(), 11);
/// ```
pub struct TimeSphere {
    initial_state: SystemState,
    update_rules: BTreeMap<Variable, Box<dyn UpdateRule>>,
    event_handlers: Vec<Box<dyn EventHandler>>,
}

impl TimeSphere {
    pub fn new(initial_inputs: AxiomInputs) -> Self {
        Self::with_metadata(initial_inputs, Metadata::new())
    }

    pub fn with_metadata(initial_inputs: AxiomInputs, metadata: Metadata) -> Self {
        Self {
            initial_state: SystemState::new(0, initial_inputs, metadata),
            update_rules: BTreeMap::new(),
            event_handlers: Vec::new(),
        }
    }

    pub fn initial_state(&self) -> &SystemState {
        &self.initial_state
    }

    /// Bind an update rule to a variable. A second registration for the same
    /// variable replaces the first; the return value reports whether a prior
    /// binding was displaced.
    pub fn add_update_rule<R>(&mut self, variable: Variable, rule: R) -> bool
    where
        R: UpdateRule + 'static,
    {
        let displaced = self.update_rules.insert(variable, Box::new(rule)).is_some();
        if displaced {
            warn!(variable = %variable, "update rule replaced by a later registration");
        }
        displaced
    }

    pub fn add_event_handler<H>(&mut self, handler: H)
    where
        H: EventHandler + 'static,
    {
        self.event_handlers.push(Box::new(handler));
    }

    pub fn rule_count(&self) -> usize {
        self.update_rules.len()
    }

    pub fn handler_count(&self) -> usize {
        self.event_handlers.len()
    }

    /// Run for `steps` steps, retaining full history.
    pub fn simulate(&mut self, steps: u32) -> Result<SimulationResult> {
        self.simulate_with(SimulateOptions::new(steps))
    }

    /// Run the simulation. The returned history always contains the step-0
    /// record; `steps = 0` is legal and yields exactly that one record.
    pub fn simulate_with(&mut self, options: SimulateOptions) -> Result<SimulationResult> {
        let run_id = Uuid::new_v4().to_string();
        let initial = self.score_initial()?;
        let mut tally = ScoreTally::new(initial.intelligence.score);

        let mut history = Vec::new();
        let mut current = initial.state.clone();
        history.push(initial);

        for step in 1..=options.steps {
            let record = self.advance(&current, step)?;
            tally.observe(record.intelligence.score);
            debug!(step, score = record.intelligence.score, events = record.events.len(), "step complete");

            current = record.state.clone();
            let is_last = step == options.steps;
            if options.record_history {
                history.push(record);
            } else if is_last {
                // History truncation keeps only the first and last records.
                history.push(record);
            }
        }

        let summary = tally.summarize(options.steps);
        info!(
            run_id = %run_id,
            steps = options.steps,
            final_intelligence = summary.final_intelligence,
            "simulation complete"
        );

        Ok(SimulationResult { run_id, steps: history, summary })
    }

    /// Produce the step-0 record from the unmodified initial inputs.
    fn score_initial(&self) -> Result<TimeStep> {
        let (score, components) =
            compute_score(&self.initial_state.inputs, FormulaOptions::lenient())?;
        Ok(TimeStep {
            step: 0,
            state: self.initial_state.clone(),
            intelligence: IntelligenceSnapshot { step: 0, score, components },
            events: vec!["Simulation started".to_string()],
        })
    }

    /// Execute one step: rules against the previous state, then scoring,
    /// then handlers against the new state.
    fn advance(&mut self, current: &SystemState, step: u32) -> Result<TimeStep> {
        let mut new_inputs = current.inputs;
        for (variable, rule) in &mut self.update_rules {
            let value = rule
                .apply(current, step)
                .map_err(|message| EngineError::RuleFault { variable: *variable, step, message })?;
            new_inputs = new_inputs.with(*variable, value);
        }

        let new_state = SystemState::new(step, new_inputs, current.metadata.clone());
        let (score, components) = compute_score(&new_inputs, FormulaOptions::lenient())?;

        let mut events = Vec::new();
        for handler in &mut self.event_handlers {
            match handler.observe(&new_state, step) {
                Ok(Some(event)) => events.push(event),
                Ok(None) => {}
                Err(message) => return Err(EngineError::HandlerFault { step, message }),
            }
        }

        Ok(TimeStep {
            step,
            state: new_state,
            intelligence: IntelligenceSnapshot { step, score, components },
            events,
        })
    }
}

/// Running score statistics over the realized trajectory, independent of
/// whether per-step records are retained.
struct ScoreTally {
    initial: f64,
    last: f64,
    min: f64,
    max: f64,
    sum: f64,
    count: u32,
}

impl ScoreTally {
    fn new(initial: f64) -> Self {
        Self { initial, last: initial, min: initial, max: initial, sum: initial, count: 1 }
    }

    fn observe(&mut self, score: f64) {
        self.last = score;
        self.min = self.min.min(score);
        self.max = self.max.max(score);
        self.sum += score;
        self.count += 1;
    }

    fn summarize(&self, total_steps: u32) -> RunSummary {
        RunSummary {
            total_steps,
            initial_intelligence: self.initial,
            final_intelligence: self.last,
            max_intelligence: self.max,
            min_intelligence: self.min,
            avg_intelligence: self.sum / f64::from(self.count),
            growth_rate: if self.initial != 0.0 {
                (self.last - self.initial) / self.initial
            } else {
                f64::INFINITY
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_inputs() -> AxiomInputs {
        AxiomInputs::new(1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0)
    }

    #[test]
    fn test_zero_steps_yields_single_record() {
        let mut sphere = TimeSphere::new(unit_inputs());
        let result = sphere.simulate(0).unwrap();

        assert_eq!(result.steps.len(), 1);
        assert_eq!(result.steps[0].step, 0);
        assert_eq!(result.summary.initial_intelligence, 1.0);
        assert_eq!(result.summary.final_intelligence, 1.0);
        assert_eq!(result.summary.max_intelligence, 1.0);
        assert_eq!(result.summary.min_intelligence, 1.0);
        assert_eq!(result.summary.growth_rate, 0.0);
    }

    #[test]
    fn test_history_is_gapless_and_ordered() {
        let mut sphere = TimeSphere::new(unit_inputs());
        let result = sphere.simulate(7).unwrap();

        assert_eq!(result.steps.len(), 8);
        for (i, record) in result.steps.iter().enumerate() {
            assert_eq!(record.step, i as u32);
            assert_eq!(record.state.step, i as u32);
        }
    }

    #[test]
    fn test_no_rules_means_constant_trajectory() {
        let initial = AxiomInputs::new(0.5, 0.6, 0.7, 0.8, 0.9, 0.85, 1.0, 1.0);
        let mut sphere = TimeSphere::new(initial);
        let result = sphere.simulate(5).unwrap();

        let first = result.steps[0].intelligence.score;
        for record in &result.steps {
            assert_eq!(record.state.inputs, initial);
            assert_eq!(record.intelligence.score, first);
        }
        assert_eq!(result.summary.growth_rate, 0.0);
    }

    #[test]
    fn test_rules_see_previous_state_only() {
        // Both rules read A from the previous step. If rule evaluation leaked
        // same-step outputs, B would see A already incremented.
        let mut sphere = TimeSphere::new(unit_inputs().with(Variable::A, 0.0).with(Variable::B, 0.0));
        sphere.add_update_rule(Variable::A, |s: &SystemState, _: u32| s.inputs.a + 0.1);
        sphere.add_update_rule(Variable::B, |s: &SystemState, _: u32| s.inputs.a);

        let result = sphere.simulate(2).unwrap();
        let b_values: Vec<f64> = result.steps.iter().map(|ts| ts.state.inputs.b).collect();

        // B lags A by one step.
        assert_eq!(b_values[0], 0.0);
        assert_eq!(b_values[1], 0.0);
        assert!((b_values[2] - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_unruled_variables_carry_over() {
        let initial = AxiomInputs::new(0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 2.0, 1.0);
        let mut sphere = TimeSphere::new(initial);
        sphere.add_update_rule(Variable::En, |s: &SystemState, _: u32| s.inputs.e_n * 2.0);

        let result = sphere.simulate(4).unwrap();
        for record in &result.steps {
            for variable in Variable::ALL {
                if variable != Variable::En {
                    assert_eq!(record.state.inputs.get(variable), initial.get(variable));
                }
            }
        }
        assert_eq!(result.steps[4].state.inputs.e_n, 32.0);
    }

    #[test]
    fn test_rule_replacement_is_observable() {
        let mut sphere = TimeSphere::new(unit_inputs());
        assert!(!sphere.add_update_rule(Variable::A, |_: &SystemState, _: u32| 0.5));
        assert!(sphere.add_update_rule(Variable::A, |_: &SystemState, _: u32| 0.9));
        assert_eq!(sphere.rule_count(), 1);

        let result = sphere.simulate(1).unwrap();
        assert_eq!(result.steps[1].state.inputs.a, 0.9);
    }

    #[test]
    fn test_event_handlers_fire_in_registration_order() {
        let mut sphere = TimeSphere::new(unit_inputs());
        sphere.add_event_handler(|_: &SystemState, step: u32| Some(format!("first:{step}")));
        sphere.add_event_handler(|_: &SystemState, _: u32| None);
        sphere.add_event_handler(|_: &SystemState, step: u32| Some(format!("third:{step}")));

        let result = sphere.simulate(1).unwrap();
        assert_eq!(result.steps[1].events, vec!["first:1".to_string(), "third:1".to_string()]);
    }

    #[test]
    fn test_initial_record_has_start_marker() {
        let mut sphere = TimeSphere::new(unit_inputs());
        let result = sphere.simulate(2).unwrap();
        assert_eq!(result.steps[0].events, vec!["Simulation started".to_string()]);
    }

    #[test]
    fn test_rule_fault_aborts_run_with_step() {
        struct FailingRule;
        impl UpdateRule for FailingRule {
            fn apply(&mut self, _: &SystemState, step: u32) -> std::result::Result<f64, String> {
                if step == 3 {
                    Err("boom".to_string())
                } else {
                    Ok(0.5)
                }
            }
        }

        let mut sphere = TimeSphere::new(unit_inputs());
        sphere.add_update_rule(Variable::A, FailingRule);
        let err = sphere.simulate(5).unwrap_err();

        match err {
            EngineError::RuleFault { variable, step, message } => {
                assert_eq!(variable, Variable::A);
                assert_eq!(step, 3);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_handler_fault_aborts_run() {
        struct FailingHandler;
        impl EventHandler for FailingHandler {
            fn observe(
                &mut self,
                _: &SystemState,
                _: u32,
            ) -> std::result::Result<Option<String>, String> {
                Err("observer failed".to_string())
            }
        }

        let mut sphere = TimeSphere::new(unit_inputs());
        sphere.add_event_handler(FailingHandler);
        let err = sphere.simulate(2).unwrap_err();
        assert!(matches!(err, EngineError::HandlerFault { step: 1, .. }));
    }

    #[test]
    fn test_truncated_history_keeps_first_and_last() {
        let mut sphere = TimeSphere::new(unit_inputs().with(Variable::En, 1.0));
        sphere.add_update_rule(Variable::En, |s: &SystemState, _: u32| s.inputs.e_n + 1.0);

        let result = sphere.simulate_with(SimulateOptions { steps: 5, record_history: false }).unwrap();

        assert_eq!(result.steps.len(), 2);
        assert_eq!(result.steps[0].step, 0);
        assert_eq!(result.steps[1].step, 5);
    }

    #[test]
    fn test_summary_unaffected_by_truncation() {
        let build = || {
            let mut sphere = TimeSphere::new(unit_inputs());
            sphere.add_update_rule(Variable::En, |s: &SystemState, _: u32| s.inputs.e_n * 2.0);
            sphere
        };

        let full = build().simulate_with(SimulateOptions { steps: 5, record_history: true }).unwrap();
        let truncated =
            build().simulate_with(SimulateOptions { steps: 5, record_history: false }).unwrap();

        assert_eq!(full.summary.final_intelligence, truncated.summary.final_intelligence);
        assert_eq!(full.summary.max_intelligence, truncated.summary.max_intelligence);
        assert_eq!(full.summary.min_intelligence, truncated.summary.min_intelligence);
        assert_eq!(full.summary.avg_intelligence, truncated.summary.avg_intelligence);
        assert_eq!(truncated.summary.final_intelligence, 32.0);
    }

    #[test]
    fn test_growth_rate_zero_initial_is_infinite() {
        let mut sphere = TimeSphere::new(unit_inputs().with(Variable::A, 0.0));
        sphere.add_update_rule(Variable::A, |_: &SystemState, _: u32| 1.0);

        let result = sphere.simulate(3).unwrap();
        assert_eq!(result.summary.initial_intelligence, 0.0);
        assert_eq!(result.summary.final_intelligence, 1.0);
        assert!(result.summary.growth_rate.is_infinite());
    }

    #[test]
    fn test_noop_rule_scenario() {
        // Identity rule on A: every score in a three-step run stays 1.0.
        let mut sphere = TimeSphere::new(unit_inputs());
        sphere.add_update_rule(Variable::A, |s: &SystemState, _: u32| (s.inputs.a + 0.0).min(1.0));

        let result = sphere.simulate(3).unwrap();
        assert_eq!(result.steps.len(), 4);
        for record in &result.steps {
            assert_eq!(record.intelligence.score, 1.0);
        }
        assert_eq!(result.summary.growth_rate, 0.0);
    }

    #[test]
    fn test_metadata_carried_through_run() {
        let mut metadata = Metadata::new();
        metadata.insert("scenario".into(), serde_json::Value::String("growth".into()));
        let mut sphere = TimeSphere::with_metadata(unit_inputs(), metadata);

        let result = sphere.simulate(3).unwrap();
        for record in &result.steps {
            assert_eq!(record.state.metadata["scenario"], "growth");
        }
    }
}
