//! Bundled demo scenarios: each builds an engine, evolves it, and prints the
//! trajectory with summary and trend information.

use anyhow::{bail, Result};

use ts_core::api::presets;
use ts_core::engine::TrendAnalyzer;
use ts_core::extensions::{momentum_extension, threshold_alert_extension};
use ts_core::models::{AxiomInputs, SimulationResult, Variable};
use ts_core::{ExtensionRegistry, TimeSphere, TrendReport};

pub fn run_all(only: Option<&str>) -> Result<()> {
    let scenarios: &[(&str, fn() -> Result<()>)] = &[
        ("basic_growth", basic_growth),
        ("corruption_decay", corruption_decay),
        ("innovation_cycles", innovation_cycles),
        ("momentum_extensions", momentum_extensions),
    ];

    match only {
        Some(name) => {
            let Some((_, scenario)) = scenarios.iter().find(|(n, _)| *n == name) else {
                bail!("unknown scenario '{name}'");
            };
            scenario()
        }
        None => {
            for (_, scenario) in scenarios {
                scenario()?;
                println!();
            }
            Ok(())
        }
    }
}

/// A learner's journey: steady improvement across every factor.
fn basic_growth() -> Result<()> {
    banner("Basic Growth - A Learner's Journey");

    let mut sphere = TimeSphere::new(AxiomInputs::new(0.6, 0.4, 0.5, 0.7, 0.3, 0.5, 2.0, 0.0));
    presets::apply(presets::BASIC_GROWTH, &mut sphere)?;

    let result = sphere.simulate(10)?;
    print_summary(&result);
    print_table(&result);
    print_trend(&TrendAnalyzer::new().analyze(&result));
    Ok(())
}

/// A previously strong system degrading over time.
fn corruption_decay() -> Result<()> {
    banner("Corruption Decay - A Degrading System");

    let mut sphere = TimeSphere::new(AxiomInputs::new(0.9, 0.8, 0.7, 0.8, 0.7, 0.8, 5.0, 3.0));
    presets::apply(presets::CORRUPTION_DECAY, &mut sphere)?;

    let result = sphere.simulate(15)?;
    print_summary(&result);
    print_table(&result);
    print_trend(&TrendAnalyzer::new().analyze(&result));
    Ok(())
}

/// Experimentation-to-breakthrough cycles.
fn innovation_cycles() -> Result<()> {
    banner("Innovation Cycles - Experimentation to Breakthrough");

    let mut sphere = TimeSphere::new(AxiomInputs::new(0.65, 0.55, 0.6, 0.5, 0.45, 0.5, 2.5, 0.5));
    presets::apply(presets::INNOVATION_CYCLES, &mut sphere)?;

    let result = sphere.simulate(12)?;
    print_summary(&result);
    print_table(&result);
    print_trend(&TrendAnalyzer::new().analyze(&result));
    Ok(())
}

/// Extension registry in action: momentum rules and threshold alerts are
/// registered once and installed into a fresh engine.
fn momentum_extensions() -> Result<()> {
    banner("Momentum Extensions - Registry-Managed Rules");

    let registry = ExtensionRegistry::new();
    registry.register(momentum_extension(Variable::A, 0.95, 0.3))?;
    registry.register(threshold_alert_extension(
        vec![1.0, 2.0, 5.0],
        vec![(Variable::En, vec![5.0])],
    ))?;

    for info in registry.list_enabled() {
        println!("registered: {} v{} ({})", info.name, info.version, info.kind);
    }

    let mut sphere = TimeSphere::new(AxiomInputs::new(0.8, 0.7, 0.7, 0.8, 0.8, 0.8, 2.0, 0.5));
    registry.install_rules("momentum_update_rule", &mut sphere)?;
    registry.install_handlers("threshold_alert", &mut sphere)?;
    // Energy compounds so the score thresholds have something to cross.
    sphere.add_update_rule(Variable::En, |s: &ts_core::SystemState, _: u32| s.inputs.e_n * 1.3);

    let result = sphere.simulate(10)?;
    print_summary(&result);
    print_table(&result);
    Ok(())
}

fn banner(title: &str) {
    println!("{}", "=".repeat(60));
    println!("SCENARIO: {title}");
    println!("{}", "=".repeat(60));
}

pub fn print_summary(result: &SimulationResult) {
    let s = &result.summary;
    println!("\nSimulation completed: {} steps", s.total_steps);
    println!("  Initial: {:.4}", s.initial_intelligence);
    println!("  Final:   {:.4}", s.final_intelligence);
    println!("  Peak:    {:.4}", s.max_intelligence);
    if s.growth_rate.is_finite() {
        println!("  Growth:  {:.1}%", s.growth_rate * 100.0);
    } else {
        println!("  Growth:  inf (started from zero)");
    }
}

pub fn print_table(result: &SimulationResult) {
    println!(
        "\n{:>4} | {:>10} | {:>6} | {:>6} | {:>8} | {:>6} | Events",
        "Step", "I_n", "ABC", "XYZ", "E_n", "F_n"
    );
    println!("{}", "-".repeat(80));

    for ts in &result.steps {
        let c = &ts.intelligence.components;
        let events = ts.events.join(" | ");
        println!(
            "{:>4} | {:>10.4} | {:>6.3} | {:>6.3} | {:>8.2} | {:>6.1} | {}",
            ts.step, ts.intelligence.score, c.abc, c.xyz, c.e_n, c.f_n, events
        );
    }
}

pub fn print_trend(report: &TrendReport) {
    println!("\nTrend: {:?}", report.trend);
    println!("  Volatility: {:.4}", report.score_volatility);
    println!("  Events:     {}", report.total_events);
    if !report.inflection_points.is_empty() {
        let steps: Vec<String> =
            report.inflection_points.iter().map(|p| p.step.to_string()).collect();
        println!("  Inflections at steps: {}", steps.join(", "));
    }
}
