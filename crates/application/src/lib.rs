//! Application layer - Use cases and orchestration
//!
//! Contains the analysis use case, its state machine, and the port
//! definitions that infrastructure adapters implement.

pub mod error;
pub mod flow;
pub mod ports;
pub mod services;

pub use error::{ApplicationError, FailureKind};
pub use flow::{AnalysisEvent, AnalysisFlow, AnalysisRequest, AnalysisState};
pub use ports::*;
pub use services::*;
