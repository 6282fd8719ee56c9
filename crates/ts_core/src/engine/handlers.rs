//! Built-in event handlers: threshold alerts over the intelligence score or
//! a single input variable. Each threshold latches after it fires, so a
//! crossing is reported once per run; `reset()` re-arms every threshold.

use crate::axiom::intelligence;
use crate::models::{SystemState, Variable};

use super::timesphere::EventHandler;

/// Emits an event the first time the intelligence score reaches each of the
/// configured thresholds.
pub struct ScoreThresholdHandler {
    thresholds: Vec<f64>,
    triggered: Vec<bool>,
}

impl ScoreThresholdHandler {
    pub fn new(mut thresholds: Vec<f64>) -> Self {
        thresholds.sort_by(|a, b| a.total_cmp(b));
        let triggered = vec![false; thresholds.len()];
        Self { thresholds, triggered }
    }

    pub fn reset(&mut self) {
        self.triggered.fill(false);
    }
}

impl EventHandler for ScoreThresholdHandler {
    fn observe(&mut self, state: &SystemState, step: u32) -> Result<Option<String>, String> {
        let score = intelligence(&state.inputs);
        let mut crossed = Vec::new();
        for (i, &threshold) in self.thresholds.iter().enumerate() {
            if score >= threshold && !self.triggered[i] {
                self.triggered[i] = true;
                crossed.push(format!("{threshold}"));
            }
        }
        if crossed.is_empty() {
            Ok(None)
        } else {
            Ok(Some(format!(
                "Intelligence crossed {} at step {} (score {:.4})",
                crossed.join(", "),
                step,
                score
            )))
        }
    }
}

/// Emits an event the first time one input variable reaches each of the
/// configured thresholds.
pub struct VariableThresholdHandler {
    variable: Variable,
    thresholds: Vec<f64>,
    triggered: Vec<bool>,
}

impl VariableThresholdHandler {
    pub fn new(variable: Variable, mut thresholds: Vec<f64>) -> Self {
        thresholds.sort_by(|a, b| a.total_cmp(b));
        let triggered = vec![false; thresholds.len()];
        Self { variable, thresholds, triggered }
    }

    pub fn variable(&self) -> Variable {
        self.variable
    }

    pub fn reset(&mut self) {
        self.triggered.fill(false);
    }
}

impl EventHandler for VariableThresholdHandler {
    fn observe(&mut self, state: &SystemState, step: u32) -> Result<Option<String>, String> {
        let value = state.inputs.get(self.variable);
        let mut crossed = Vec::new();
        for (i, &threshold) in self.thresholds.iter().enumerate() {
            if value >= threshold && !self.triggered[i] {
                self.triggered[i] = true;
                crossed.push(format!("{threshold}"));
            }
        }
        if crossed.is_empty() {
            Ok(None)
        } else {
            Ok(Some(format!(
                "{} crossed {} at step {} (value {:.4})",
                self.variable,
                crossed.join(", "),
                step,
                value
            )))
        }
    }
}
