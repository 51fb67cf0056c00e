//! Cycle day, phase and period prediction for the MyOvae wellness app.
//!
//! Everything here is a pure function of the cycle history and an explicit
//! reference date; callers bring their own notion of "now".

pub mod commands;
pub mod dates;
pub mod error;
pub mod history;
pub mod logging;
pub mod models;
pub mod phase;
pub mod prediction;
pub mod settings;
pub mod storage;

pub use error::CycleError;
pub use history::CycleHistory;
pub use models::{CyclePhase, CycleRecord, PhaseResult, PredictionResult};
pub use phase::compute_phase;
pub use prediction::predict;
pub use settings::Settings;
