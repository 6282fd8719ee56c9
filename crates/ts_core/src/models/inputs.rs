use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Identifier for one of the eight input factors.
///
/// The vocabulary is closed: anything outside these eight names is a
/// configuration fault at parse time, never at step time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
pub enum Variable {
    A,
    B,
    C,
    X,
    Y,
    Z,
    #[serde(rename = "E_n")]
    En,
    #[serde(rename = "F_n")]
    Fn,
}

impl Variable {
    pub const ALL: [Variable; 8] = [
        Variable::A,
        Variable::B,
        Variable::C,
        Variable::X,
        Variable::Y,
        Variable::Z,
        Variable::En,
        Variable::Fn,
    ];

    /// Wire name as it appears in serialized payloads.
    pub fn name(&self) -> &'static str {
        match self {
            Variable::A => "A",
            Variable::B => "B",
            Variable::C => "C",
            Variable::X => "X",
            Variable::Y => "Y",
            Variable::Z => "Z",
            Variable::En => "E_n",
            Variable::Fn => "F_n",
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variable {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Variable::A),
            "B" => Ok(Variable::B),
            "C" => Ok(Variable::C),
            "X" => Ok(Variable::X),
            "Y" => Ok(Variable::Y),
            "Z" => Ok(Variable::Z),
            "E_n" => Ok(Variable::En),
            "F_n" => Ok(Variable::Fn),
            other => Err(EngineError::UnknownVariable(other.to_string())),
        }
    }
}

/// The eight factors driving one step's intelligence score.
///
/// A/B/C/X/Y are semantically bounded to [0,1], Z and E_n to [0,∞),
/// F_n to [-1,∞) so the growth term (1 + F_n) never goes negative.
/// Values are immutable per step; forward state is derived with [`with`]
/// rather than mutated in place.
///
/// [`with`]: AxiomInputs::with
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxiomInputs {
    #[serde(rename = "A")]
    pub a: f64,
    #[serde(rename = "B")]
    pub b: f64,
    #[serde(rename = "C")]
    pub c: f64,
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "Y")]
    pub y: f64,
    #[serde(rename = "Z")]
    pub z: f64,
    #[serde(rename = "E_n")]
    pub e_n: f64,
    #[serde(rename = "F_n")]
    pub f_n: f64,
}

impl AxiomInputs {
    #[allow(clippy::too_many_arguments)]
    pub fn new(a: f64, b: f64, c: f64, x: f64, y: f64, z: f64, e_n: f64, f_n: f64) -> Self {
        Self { a, b, c, x, y, z, e_n, f_n }
    }

    /// All eight factors set to the same value, F_n set to 0.
    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value, value, value, value, 0.0)
    }

    pub fn get(&self, variable: Variable) -> f64 {
        match variable {
            Variable::A => self.a,
            Variable::B => self.b,
            Variable::C => self.c,
            Variable::X => self.x,
            Variable::Y => self.y,
            Variable::Z => self.z,
            Variable::En => self.e_n,
            Variable::Fn => self.f_n,
        }
    }

    /// Produce a new value set with one factor replaced.
    #[must_use]
    pub fn with(&self, variable: Variable, value: f64) -> Self {
        let mut next = *self;
        match variable {
            Variable::A => next.a = value,
            Variable::B => next.b = value,
            Variable::C => next.c = value,
            Variable::X => next.x = value,
            Variable::Y => next.y = value,
            Variable::Z => next.z = value,
            Variable::En => next.e_n = value,
            Variable::Fn => next.f_n = value,
        }
        next
    }

    /// Clamp every factor into its semantic bounds.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            a: self.a.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
            c: self.c.clamp(0.0, 1.0),
            x: self.x.clamp(0.0, 1.0),
            y: self.y.clamp(0.0, 1.0),
            z: self.z.max(0.0),
            e_n: self.e_n.max(0.0),
            f_n: self.f_n.max(-1.0),
        }
    }

    /// Check that every factor is a finite number.
    pub fn validate_finite(&self) -> crate::Result<()> {
        for (variable, value) in self.entries() {
            if !value.is_finite() {
                return Err(EngineError::NonFiniteInput { field: variable.name(), value });
            }
        }
        Ok(())
    }

    /// Check the semantic bounds of every factor. Used at API boundaries;
    /// the formula itself clamps instead of rejecting.
    pub fn validate_bounds(&self) -> crate::Result<()> {
        self.validate_finite()?;
        for (variable, value) in self.entries() {
            let in_range = match variable {
                Variable::A | Variable::B | Variable::C | Variable::X | Variable::Y => {
                    (0.0..=1.0).contains(&value)
                }
                Variable::Z | Variable::En => value >= 0.0,
                Variable::Fn => value >= -1.0,
            };
            if !in_range {
                return Err(EngineError::InputOutOfRange { field: variable.name(), value });
            }
        }
        Ok(())
    }

    /// Factor values in the fixed A..F_n order.
    pub fn entries(&self) -> [(Variable, f64); 8] {
        Variable::ALL.map(|v| (v, self.get(v)))
    }
}
