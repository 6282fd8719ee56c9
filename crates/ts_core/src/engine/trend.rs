//! Post-hoc trend analysis over a completed run's score sequence: direction
//! classification, inflection detection, and volatility.

use serde::{Deserialize, Serialize};

use crate::models::SimulationResult;

/// Thresholds for trend classification and inflection detection. Both are
/// heuristics; treat them as configuration, not constants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrendConfig {
    /// Relative half-over-half mean change that counts as growth or decline.
    /// The comparison is exclusive: a change of exactly this much is stable.
    #[serde(default = "TrendConfig::default_growth_threshold")]
    pub growth_threshold: f64,
    /// Scale factor for the second-derivative inflection test:
    /// `|delta_after - delta_before| > inflection_scale * score`.
    #[serde(default = "TrendConfig::default_inflection_scale")]
    pub inflection_scale: f64,
}

impl TrendConfig {
    fn default_growth_threshold() -> f64 {
        0.10
    }

    fn default_inflection_scale() -> f64 {
        0.10
    }
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            growth_threshold: Self::default_growth_threshold(),
            inflection_scale: Self::default_inflection_scale(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    /// Fewer than three recorded scores; no classification is attempted.
    InsufficientData,
    AcceleratingGrowth,
    Declining,
    Stable,
}

/// An interior step where the growth rate changed significantly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InflectionPoint {
    pub step: u32,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendReport {
    pub trend: TrendDirection,
    pub inflection_points: Vec<InflectionPoint>,
    pub total_events: usize,
    /// Range of the score sequence (max - min), not a variance measure.
    pub score_volatility: f64,
}

/// Derives trend information from a completed run's recorded scores.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrendAnalyzer {
    config: TrendConfig,
}

impl TrendAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TrendConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> TrendConfig {
        self.config
    }

    pub fn analyze(&self, result: &SimulationResult) -> TrendReport {
        let scores = result.intelligence_history();

        TrendReport {
            trend: self.classify(&scores),
            inflection_points: self.inflection_points(result, &scores),
            total_events: result.total_events(),
            score_volatility: volatility(&scores),
        }
    }

    /// Compare first-half and second-half means. The split is at n/2, with
    /// the larger half on the right for odd lengths.
    fn classify(&self, scores: &[f64]) -> TrendDirection {
        if scores.len() < 3 {
            return TrendDirection::InsufficientData;
        }

        let mid = scores.len() / 2;
        let first_half = mean(&scores[..mid]);
        let second_half = mean(&scores[mid..]);

        if second_half > first_half * (1.0 + self.config.growth_threshold) {
            TrendDirection::AcceleratingGrowth
        } else if second_half < first_half * (1.0 - self.config.growth_threshold) {
            TrendDirection::Declining
        } else {
            TrendDirection::Stable
        }
    }

    fn inflection_points(&self, result: &SimulationResult, scores: &[f64]) -> Vec<InflectionPoint> {
        let mut points = Vec::new();
        for i in 1..scores.len().saturating_sub(1) {
            let delta_before = scores[i] - scores[i - 1];
            let delta_after = scores[i + 1] - scores[i];
            if (delta_after - delta_before).abs() > self.config.inflection_scale * scores[i] {
                points.push(InflectionPoint { step: result.steps[i].step, score: scores[i] });
            }
        }
        points
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn volatility(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let min = scores.iter().cloned().fold(f64::INFINITY, f64::min);
    max - min
}

#[cfg(test)]
mod tests {
    use crate::engine::TimeSphere;
    use crate::models::{AxiomInputs, SystemState, Variable};

    use super::*;

    fn run_with_doubling(steps: u32) -> SimulationResult {
        let mut sphere = TimeSphere::new(AxiomInputs::uniform(1.0));
        sphere.add_update_rule(Variable::En, |s: &SystemState, _: u32| s.inputs.e_n * 2.0);
        sphere.simulate(steps).unwrap()
    }

    fn run_flat(steps: u32) -> SimulationResult {
        TimeSphere::new(AxiomInputs::uniform(1.0)).simulate(steps).unwrap()
    }

    #[test]
    fn test_insufficient_data_below_three_points() {
        let report = TrendAnalyzer::new().analyze(&run_flat(1));
        assert_eq!(report.trend, TrendDirection::InsufficientData);
    }

    #[test]
    fn test_doubling_sequence_is_accelerating() {
        let report = TrendAnalyzer::new().analyze(&run_with_doubling(4));
        assert_eq!(report.trend, TrendDirection::AcceleratingGrowth);
    }

    #[test]
    fn test_flat_sequence_is_stable() {
        let report = TrendAnalyzer::new().analyze(&run_flat(5));
        assert_eq!(report.trend, TrendDirection::Stable);
        assert_eq!(report.score_volatility, 0.0);
        assert!(report.inflection_points.is_empty());
    }

    #[test]
    fn test_decaying_sequence_declines() {
        let mut sphere = TimeSphere::new(AxiomInputs::uniform(1.0));
        sphere.add_update_rule(Variable::En, |s: &SystemState, _: u32| s.inputs.e_n * 0.5);
        let report = TrendAnalyzer::new().analyze(&sphere.simulate(6).unwrap());

        assert_eq!(report.trend, TrendDirection::Declining);
    }

    #[test]
    fn test_exact_threshold_counts_as_stable() {
        // Means: first half 1.0, second half 1.1 — exactly at the 10%
        // boundary, which is exclusive.
        let mut result = run_flat(3);
        result.steps[2].intelligence.score = 1.1;
        result.steps[3].intelligence.score = 1.1;
        result.steps[1].intelligence.score = 1.0;
        result.steps[0].intelligence.score = 1.0;

        let report = TrendAnalyzer::new().analyze(&result);
        assert_eq!(report.trend, TrendDirection::Stable);
    }

    #[test]
    fn test_inflection_detected_at_kink() {
        // Flat then doubling: the kink is a second-derivative spike.
        let mut result = run_flat(4);
        let scores = [1.0, 1.0, 1.0, 2.0, 4.0];
        for (record, &score) in result.steps.iter_mut().zip(scores.iter()) {
            record.intelligence.score = score;
        }

        let report = TrendAnalyzer::new().analyze(&result);
        let steps: Vec<u32> = report.inflection_points.iter().map(|p| p.step).collect();
        assert!(steps.contains(&2));
    }

    #[test]
    fn test_inflection_threshold_is_configurable() {
        let mut result = run_flat(4);
        let scores = [1.0, 1.0, 1.0, 1.05, 1.1];
        for (record, &score) in result.steps.iter_mut().zip(scores.iter()) {
            record.intelligence.score = score;
        }

        let strict = TrendAnalyzer::new().analyze(&result);
        assert!(strict.inflection_points.is_empty());

        let sensitive = TrendAnalyzer::with_config(TrendConfig {
            inflection_scale: 0.01,
            ..TrendConfig::default()
        })
        .analyze(&result);
        assert!(!sensitive.inflection_points.is_empty());
    }

    #[test]
    fn test_volatility_is_range() {
        let report = TrendAnalyzer::new().analyze(&run_with_doubling(3));
        // Scores 1, 2, 4, 8.
        assert_eq!(report.score_volatility, 7.0);
    }

    #[test]
    fn test_total_events_counts_start_marker() {
        let report = TrendAnalyzer::new().analyze(&run_flat(3));
        assert_eq!(report.total_events, 1);
    }
}
