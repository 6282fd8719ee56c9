//! File exporters for simulation results: JSON, CSV, and Markdown.
//!
//! These consume the plain-mapping projection of a result; none of them are
//! part of the engine's invariants.

use std::fs;
use std::io::Write as _;
use std::path::Path;

use chrono::Utc;
use serde_json::json;
use tracing::debug;

use crate::models::{SimulationResult, Variable};

use super::error::ExportError;

/// Write a result to `path` as pretty-printed JSON.
pub fn export_to_json(
    result: &SimulationResult,
    path: &Path,
    include_summary: bool,
) -> Result<(), ExportError> {
    let mut data = json!({
        "metadata": {
            "export_time": Utc::now().to_rfc3339(),
            "run_id": result.run_id,
            "total_steps": result.steps.len(),
        },
        "history": result.steps.iter().map(|ts| {
            json!({
                "step": ts.step,
                "intelligence": ts.intelligence.score,
                "inputs": ts.state.inputs,
                "events": ts.events,
            })
        }).collect::<Vec<_>>(),
    });

    if include_summary {
        data["summary"] = serde_json::to_value(result.summary)?;
    }

    fs::write(path, serde_json::to_string_pretty(&data)?)?;
    debug!(path = %path.display(), "result exported to JSON");
    Ok(())
}

/// Write a result to `path` as CSV, one row per recorded step.
pub fn export_to_csv(
    result: &SimulationResult,
    path: &Path,
    include_metadata: bool,
) -> Result<(), ExportError> {
    let mut writer = csv::WriterBuilder::new().flexible(true).from_path(path)?;

    if include_metadata {
        let export_time = Utc::now().to_rfc3339();
        let total_steps = result.steps.len().to_string();
        writer.write_record(["# TimeSphere Simulation Export"])?;
        writer.write_record(["# Export Time", export_time.as_str()])?;
        writer.write_record(["# Run", result.run_id.as_str()])?;
        writer.write_record(["# Total Steps", total_steps.as_str()])?;
    }

    let mut header = vec!["Step".to_string(), "Intelligence".to_string()];
    header.extend(Variable::ALL.iter().map(|v| v.name().to_string()));
    writer.write_record(&header)?;

    for ts in &result.steps {
        let mut row = vec![ts.step.to_string(), format!("{:.6}", ts.intelligence.score)];
        row.extend(Variable::ALL.iter().map(|&v| format!("{:.4}", ts.state.inputs.get(v))));
        writer.write_record(&row)?;
    }

    if include_metadata {
        let s = &result.summary;
        let summary_rows = [
            ("# initial_intelligence", s.initial_intelligence),
            ("# final_intelligence", s.final_intelligence),
            ("# max_intelligence", s.max_intelligence),
            ("# min_intelligence", s.min_intelligence),
            ("# avg_intelligence", s.avg_intelligence),
            ("# growth_rate", s.growth_rate),
        ];
        writer.write_record(["# Summary"])?;
        for (key, value) in summary_rows {
            let value = value.to_string();
            writer.write_record([key, value.as_str()])?;
        }
    }

    writer.flush()?;
    debug!(path = %path.display(), "result exported to CSV");
    Ok(())
}

/// Write a result to `path` as a Markdown document with a summary table and
/// a (possibly truncated) history table.
pub fn export_to_markdown(
    result: &SimulationResult,
    path: &Path,
    title: &str,
    max_rows: Option<usize>,
) -> Result<(), ExportError> {
    let mut out = fs::File::create(path)?;

    writeln!(out, "# {title}\n")?;
    writeln!(out, "**Export Time:** {}\n", Utc::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out, "**Total Steps:** {}\n", result.steps.len())?;

    writeln!(out, "## Summary Statistics\n")?;
    writeln!(out, "| Metric | Value |")?;
    writeln!(out, "|--------|-------|")?;
    let s = &result.summary;
    writeln!(out, "| Total Steps | {} |", s.total_steps)?;
    writeln!(out, "| Initial Intelligence | {:.4} |", s.initial_intelligence)?;
    writeln!(out, "| Final Intelligence | {:.4} |", s.final_intelligence)?;
    writeln!(out, "| Max Intelligence | {:.4} |", s.max_intelligence)?;
    writeln!(out, "| Min Intelligence | {:.4} |", s.min_intelligence)?;
    writeln!(out, "| Avg Intelligence | {:.4} |", s.avg_intelligence)?;
    writeln!(out, "| Growth Rate | {:.4} |", s.growth_rate)?;
    writeln!(out)?;

    writeln!(out, "## Simulation History\n")?;
    writeln!(out, "| Step | Intelligence | A | B | C | X | Y | Z | E_n | F_n |")?;
    writeln!(out, "|------|-------------|---|---|---|---|---|---|-----|-----|")?;

    let shown = max_rows.unwrap_or(result.steps.len()).min(result.steps.len());
    for ts in &result.steps[..shown] {
        let i = &ts.state.inputs;
        writeln!(
            out,
            "| {} | {:.4} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} |",
            ts.step, ts.intelligence.score, i.a, i.b, i.c, i.x, i.y, i.z, i.e_n, i.f_n
        )?;
    }

    if shown < result.steps.len() {
        writeln!(out, "\n*... {} more rows ...*", result.steps.len() - shown)?;
    }

    debug!(path = %path.display(), "result exported to Markdown");
    Ok(())
}
