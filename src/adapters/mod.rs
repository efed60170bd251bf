//! Adapters Layer - External System Implementations
//!
//! Implementations of the port traits and the presentation edges:
//! - CSV: historical bar files on disk
//! - CLI: command-line interface handlers
//! - Report: ranked-table rendering (text / JSON)

pub mod cli;
pub mod csv_data;
pub mod report;

pub use cli::CliApp;
pub use csv_data::CsvBarProvider;
