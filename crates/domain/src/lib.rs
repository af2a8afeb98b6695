//! Domain layer for Paradecast
//!
//! Contains the weather entities, value objects, the advisory classifier,
//! and domain errors. This layer performs no I/O.

pub mod classifier;
pub mod entities;
pub mod errors;
pub mod value_objects;

pub use classifier::{Classification, classify, thresholds};
pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
