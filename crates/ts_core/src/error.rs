use std::fmt;

use crate::models::Variable;

/// Faults raised by the simulation engine, the score formula, and the
/// extension registry. Configuration and lookup faults are raised at
/// registration time; rule and handler faults abort the run that produced
/// them, with the offending step attached.
#[derive(Debug)]
pub enum EngineError {
    UnknownVariable(String),
    UnknownPreset(String),
    NonFiniteInput { field: &'static str, value: f64 },
    InputOutOfRange { field: &'static str, value: f64 },
    InvalidStepCount { requested: u32, max: u32 },
    SchemaVersionMismatch { found: u8, expected: u8 },
    DuplicateExtension(String),
    ExtensionNotFound(String),
    WrongExtensionKind { name: String, expected: &'static str, found: &'static str },
    ExtensionFault { name: String, message: String },
    RuleFault { variable: Variable, step: u32, message: String },
    HandlerFault { step: u32, message: String },
    SerializationError(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EngineError::UnknownVariable(name) => {
                write!(f, "Unknown variable '{}': expected one of A, B, C, X, Y, Z, E_n, F_n", name)
            }
            EngineError::UnknownPreset(name) => {
                write!(f, "Unknown preset: {}", name)
            }
            EngineError::NonFiniteInput { field, value } => {
                write!(f, "Input {} must be finite, got {}", field, value)
            }
            EngineError::InputOutOfRange { field, value } => {
                write!(f, "Input {} out of range: {}", field, value)
            }
            EngineError::InvalidStepCount { requested, max } => {
                write!(f, "Step count must be 1..={}, got {}", max, requested)
            }
            EngineError::SchemaVersionMismatch { found, expected } => {
                write!(f, "Schema version mismatch: found {}, expected {}", found, expected)
            }
            EngineError::DuplicateExtension(name) => {
                write!(f, "Extension '{}' is already registered", name)
            }
            EngineError::ExtensionNotFound(name) => {
                write!(f, "Extension '{}' not found in registry", name)
            }
            EngineError::WrongExtensionKind { name, expected, found } => {
                write!(f, "Extension '{}' is a {} extension, expected {}", name, found, expected)
            }
            EngineError::ExtensionFault { name, message } => {
                write!(f, "Extension '{}' failed: {}", name, message)
            }
            EngineError::RuleFault { variable, step, message } => {
                write!(f, "Update rule for {} failed at step {}: {}", variable, step, message)
            }
            EngineError::HandlerFault { step, message } => {
                write!(f, "Event handler failed at step {}: {}", step, message)
            }
            EngineError::SerializationError(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for EngineError {}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::SerializationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
