pub mod formula;
pub mod sequences;

pub use formula::{compute_score, intelligence, FormulaOptions, ScoreBreakdown};
pub use sequences::{e_recurrence, e_sequence, fibonacci, fibonacci_sequence};
