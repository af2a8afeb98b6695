//! Value Objects - Immutable, identity-less domain primitives

mod geo_location;
mod severity;

pub use geo_location::{GeoLocation, InvalidCoordinates};
pub use severity::Severity;
