//! Optimizer Integration Tests
//!
//! End-to-end runs over a real (temporary) data directory: CSV fixtures ->
//! CsvBarProvider -> OptimizationSession -> ranked tables. All tests are
//! deterministic; the fixtures are small enough to verify by hand.

use std::io::Write;
use std::path::Path;

use approx::assert_relative_eq;

use spreadlab::adapters::csv_data::CsvBarProvider;
use spreadlab::adapters::report::{render_json, render_table};
use spreadlab::application::optimizer::OptimizationSession;
use spreadlab::config::loader::Config;

// ============================================================================
// Test Fixtures
// ============================================================================

/// Write `<instrument>_h1.csv` with closes compounded from per-bar returns,
/// starting at 100.0.
fn write_series(dir: &Path, instrument: &str, returns: &[f64]) {
    let mut closes = vec![100.0_f64];
    for r in returns {
        let last = *closes.last().unwrap();
        closes.push(last * (1.0 + r));
    }

    let path = dir.join(format!("{instrument}_h1.csv"));
    let mut file = std::fs::File::create(path).unwrap();
    writeln!(file, "time,close").unwrap();
    for (i, close) in closes.iter().enumerate() {
        writeln!(file, "{},{close}", 1_700_000_000 + i as i64 * 3600).unwrap();
    }
}

fn parse_config(csv_dir: &Path, body: &str) -> Config {
    let full = format!(
        r#"
        [data]
        csv_dir = "{}"
        timeframe = "h1"
        bar_count = 100
        {body}
        "#,
        csv_dir.display()
    );
    let config: Config = toml::from_str(&full).unwrap();
    config.validate().unwrap();
    config
}

// Alternating spread whose 2-bar z-scores are +-0.7071 on every defined bar.
const ALTERNATING: [f64; 6] = [0.01, -0.01, 0.02, -0.02, 0.01, -0.01];

// ============================================================================
// Pair sweep
// ============================================================================

#[tokio::test]
async fn test_pair_sweep_over_csv_fixtures() {
    let dir = tempfile::tempdir().unwrap();
    write_series(dir.path(), "alpha", &ALTERNATING);
    write_series(dir.path(), "beta", &[0.0; 6]);

    let config = parse_config(
        dir.path(),
        r#"
        [pair]
        instruments = ["alpha", "beta"]
        entry_z = { start = 0.5, stop = 0.6, step = 0.5 }
        exit_threshold = { start = 0.015, stop = 0.016, step = 0.01 }
        stop_loss = { start = 0.015, stop = 0.016, step = 0.01 }
        windows = [2]

        [pair.ranking]
        trade_floor = 0
        top_k = 10
        "#,
    );

    let provider = CsvBarProvider::new(dir.path());
    let session = OptimizationSession::new(provider, config);
    let ranked = session.run_pair().await.unwrap();

    // Single combination: two entries, one 2% winner, one discarded open
    // trade.
    assert_eq!(ranked.len(), 1);
    let row = &ranked[0];
    assert_eq!(row.metrics.trade_count, 2);
    assert_relative_eq!(row.metrics.final_return_pct, 2.0, epsilon = 1e-9);
    assert_relative_eq!(row.metrics.win_rate_pct, 50.0, epsilon = 1e-9);
    assert_relative_eq!(row.metrics.return_per_trade_pct, 1.0, epsilon = 1e-9);
}

#[tokio::test]
async fn test_pair_default_ranking_filters_thin_runs() {
    let dir = tempfile::tempdir().unwrap();
    write_series(dir.path(), "alpha", &ALTERNATING);
    write_series(dir.path(), "beta", &[0.0; 6]);

    // No [pair.ranking] table: the preset requires strictly more than 10
    // trades, which this tiny fixture cannot produce.
    let config = parse_config(
        dir.path(),
        r#"
        [pair]
        instruments = ["alpha", "beta"]
        entry_z = { start = 0.5, stop = 0.6, step = 0.5 }
        exit_threshold = { start = 0.015, stop = 0.016, step = 0.01 }
        stop_loss = { start = 0.015, stop = 0.016, step = 0.01 }
        windows = [2]
        "#,
    );

    let provider = CsvBarProvider::new(dir.path());
    let session = OptimizationSession::new(provider, config);
    let ranked = session.run_pair().await.unwrap();
    assert!(ranked.is_empty());
}

// ============================================================================
// Dual sweep
// ============================================================================

#[tokio::test]
async fn test_dual_sweep_conjunction_gate() {
    let dir = tempfile::tempdir().unwrap();
    // Flat spread until a final spike: near (window 2) z = 0.7071 and far
    // (window 3) z = 1.1547 at the last bar.
    write_series(dir.path(), "alpha", &[0.0, 0.0, 0.0, 0.05]);
    write_series(dir.path(), "beta", &[0.0; 4]);

    let config = parse_config(
        dir.path(),
        r#"
        [dual]
        instruments = ["alpha", "beta"]
        entry_z_near = { start = 0.6, stop = 0.7, step = 0.5 }
        entry_z_far = { start = 1.0, stop = 1.1, step = 0.5 }
        exit_threshold = { start = 0.015, stop = 0.016, step = 0.01 }
        stop_loss = { start = 0.015, stop = 0.016, step = 0.01 }
        windows_near = [2]
        windows_far = [3]

        [dual.ranking]
        trade_floor = 0
        top_k = 10
        "#,
    );

    let provider = CsvBarProvider::new(dir.path());
    let session = OptimizationSession::new(provider, config);
    let ranked = session.run_dual().await.unwrap();

    // Both gates fire at the last bar; the trade is discarded unrealized.
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].metrics.trade_count, 1);
    assert_eq!(ranked[0].metrics.final_return_pct, 0.0);
}

// ============================================================================
// Triangular sweep
// ============================================================================

#[tokio::test]
async fn test_triangular_sweep_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    // Bar 0 diverges (ranges 0.03 / 0.02 / 0.01, ratio 3); bar 1 closes the
    // bought-low / sold-high legs with a 2% gain.
    write_series(dir.path(), "alpha", &[0.02, 0.01]);
    write_series(dir.path(), "beta", &[-0.01, 0.03]);
    write_series(dir.path(), "gamma", &[0.0, 0.0]);

    let config = parse_config(
        dir.path(),
        r#"
        [triangular]
        instruments = ["alpha", "beta", "gamma"]
        exit_pct = { start = 1.5, stop = 1.6, step = 1.0 }
        stop_loss_pct = { start = 1.5, stop = 1.6, step = 1.0 }
        ratio = { start = 3.0, stop = 3.5, step = 1.0 }
        "#,
    );

    let provider = CsvBarProvider::new(dir.path());
    let session = OptimizationSession::new(provider, config);
    let ranked = session.run_triangular().await.unwrap();

    assert_eq!(ranked.len(), 1);
    let row = &ranked[0];
    assert_eq!(row.metrics.trade_count, 1);
    assert_relative_eq!(row.metrics.final_return_pct, 2.0, epsilon = 1e-9);
    assert_relative_eq!(row.metrics.win_rate_pct, 100.0, epsilon = 1e-9);
}

// ============================================================================
// Report rendering over real session output
// ============================================================================

#[tokio::test]
async fn test_report_renders_session_output() {
    let dir = tempfile::tempdir().unwrap();
    write_series(dir.path(), "alpha", &ALTERNATING);
    write_series(dir.path(), "beta", &[0.0; 6]);

    let config = parse_config(
        dir.path(),
        r#"
        [pair]
        instruments = ["alpha", "beta"]
        entry_z = { start = 0.5, stop = 0.6, step = 0.5 }
        exit_threshold = { start = 0.015, stop = 0.016, step = 0.01 }
        stop_loss = { start = 0.015, stop = 0.016, step = 0.01 }
        windows = [2]

        [pair.ranking]
        trade_floor = 0
        "#,
    );

    let provider = CsvBarProvider::new(dir.path());
    let session = OptimizationSession::new(provider, config);
    let ranked = session.run_pair().await.unwrap();

    let table = render_table(&ranked);
    assert!(table.contains("Entry - z"));
    assert!(table.contains("Final Return %"));

    let json: serde_json::Value = serde_json::from_str(&render_json(&ranked).unwrap()).unwrap();
    assert_eq!(json[0]["params"]["window"], 2);
    assert_eq!(json[0]["metrics"]["trade_count"], 2);
}
