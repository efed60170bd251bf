//! Report Rendering
//!
//! Turns a ranked result table into text for the terminal or JSON for
//! downstream tooling. The engine stays presentation-agnostic; everything
//! here works off `ParamSet::field_labels` / `field_values`.

use serde::Serialize;

use crate::domain::run_result::{ParamSet, RunResult};

const METRIC_LABELS: [&str; 4] = ["Final Return %", "Win Rate %", "Return/Trade %", "Trades"];

/// Render the ranked table as fixed-width text, one row per result,
/// parameters first then metrics.
pub fn render_table<P: ParamSet>(results: &[RunResult<P>]) -> String {
    let labels: Vec<&str> = P::field_labels()
        .iter()
        .copied()
        .chain(METRIC_LABELS)
        .collect();

    let rows: Vec<Vec<String>> = results
        .iter()
        .map(|result| {
            let mut cells: Vec<String> = result
                .params
                .field_values()
                .iter()
                .map(|v| format_number(*v))
                .collect();
            cells.push(format_number(result.metrics.final_return_pct));
            cells.push(format_number(result.metrics.win_rate_pct));
            cells.push(format_number(result.metrics.return_per_trade_pct));
            cells.push(result.metrics.trade_count.to_string());
            cells
        })
        .collect();

    let widths: Vec<usize> = labels
        .iter()
        .enumerate()
        .map(|(col, label)| {
            rows.iter()
                .map(|row| row[col].len())
                .chain(std::iter::once(label.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    render_row(&mut out, &labels.iter().map(|s| s.to_string()).collect::<Vec<_>>(), &widths);
    let rule_len = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
    out.push_str(&"-".repeat(rule_len));
    out.push('\n');
    for row in &rows {
        render_row(&mut out, row, &widths);
    }
    out
}

fn render_row(out: &mut String, cells: &[String], widths: &[usize]) {
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            out.push_str("  ");
        }
        out.push_str(&format!("{cell:>width$}"));
    }
    out.push('\n');
}

/// Trim trailing zeros so integer-valued parameters (windows) print clean.
fn format_number(value: f64) -> String {
    if value == value.trunc() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value:.4}")
    }
}

/// Render the ranked table as a JSON array.
pub fn render_json<P: ParamSet + Serialize>(
    results: &[RunResult<P>],
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(results)
}
