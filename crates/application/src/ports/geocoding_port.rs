//! Geocoding port
//!
//! Resolves a free-text place name to a single best match.

use async_trait::async_trait;
use domain::Place;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for place-name lookups
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeocodingPort: Send + Sync {
    /// Find the first-ranked place matching `query`
    ///
    /// Returns `Ok(None)` when the service answered but found nothing.
    async fn find_place(&self, query: &str) -> Result<Option<Place>, ApplicationError>;

    /// Check if the geocoding service is reachable
    async fn is_available(&self) -> bool;
}
