//! Core axiom: `I_n = E_n · (1 + F_n) · X · Y · Z · (A · B · C)`.
//!
//! The formula is stateless and safe to call from any number of threads.
//! Validation and clamping are independent, caller-selected toggles; both
//! default to on.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::AxiomInputs;

/// Toggles for [`compute_score`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormulaOptions {
    /// Reject non-finite factors with a fault naming the field.
    pub validate: bool,
    /// Clamp each factor into its semantic bounds before multiplying.
    /// With clamping off, out-of-range and non-finite values pass through
    /// arithmetically (NaN poisons the product, infinity saturates it).
    pub clamp: bool,
}

impl Default for FormulaOptions {
    fn default() -> Self {
        Self { validate: true, clamp: true }
    }
}

impl FormulaOptions {
    /// Clamp without rejecting non-finite values. Used inside the step loop,
    /// where out-of-range rule outputs are absorbed rather than faulted.
    pub fn lenient() -> Self {
        Self { validate: false, clamp: true }
    }
}

/// Intermediate products of one score evaluation, with the factor values
/// actually used (post-clamping when clamping is on).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    #[serde(rename = "A")]
    pub a: f64,
    #[serde(rename = "B")]
    pub b: f64,
    #[serde(rename = "C")]
    pub c: f64,
    #[serde(rename = "ABC")]
    pub abc: f64,
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "Y")]
    pub y: f64,
    #[serde(rename = "Z")]
    pub z: f64,
    #[serde(rename = "XYZ")]
    pub xyz: f64,
    #[serde(rename = "E_n")]
    pub e_n: f64,
    #[serde(rename = "F_n")]
    pub f_n: f64,
    #[serde(rename = "E_factor")]
    pub e_factor: f64,
}

impl ScoreBreakdown {
    /// Look up a component by its wire name (`"A"`, `"ABC"`, `"E_factor"`, ...).
    pub fn component(&self, name: &str) -> Option<f64> {
        match name {
            "A" => Some(self.a),
            "B" => Some(self.b),
            "C" => Some(self.c),
            "ABC" => Some(self.abc),
            "X" => Some(self.x),
            "Y" => Some(self.y),
            "Z" => Some(self.z),
            "XYZ" => Some(self.xyz),
            "E_n" => Some(self.e_n),
            "F_n" => Some(self.f_n),
            "E_factor" => Some(self.e_factor),
            _ => None,
        }
    }
}

/// Evaluate the core axiom, returning the score and its breakdown.
pub fn compute_score(inputs: &AxiomInputs, options: FormulaOptions) -> Result<(f64, ScoreBreakdown)> {
    if options.validate {
        inputs.validate_finite()?;
    }

    let used = if options.clamp { inputs.clamped() } else { *inputs };

    let abc = used.a * used.b * used.c;
    let xyz = used.x * used.y * used.z;
    let e_factor = used.e_n * (1.0 + used.f_n);
    let score = e_factor * xyz * abc;

    let breakdown = ScoreBreakdown {
        a: used.a,
        b: used.b,
        c: used.c,
        abc,
        x: used.x,
        y: used.y,
        z: used.z,
        xyz,
        e_n: used.e_n,
        f_n: used.f_n,
        e_factor,
    };

    Ok((score, breakdown))
}

/// Score with default clamping and no finite-check. Never fails; handy for
/// event handlers that only need the scalar.
pub fn intelligence(inputs: &AxiomInputs) -> f64 {
    match compute_score(inputs, FormulaOptions::lenient()) {
        Ok((score, _)) => score,
        Err(_) => unreachable!("lenient evaluation does not fault"),
    }
}
