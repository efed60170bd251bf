//! Application layer: session orchestration over the ports and the engine.

pub mod optimizer;

pub use optimizer::{OptimizationSession, SessionError};
