//! Routing provider client.
//!
//! This module wraps the external point-to-point routing service: one
//! HTTP GET per lookup, carrying `origin`, `destination`, the travel
//! mode, and an API key, answered with a JSON document whose first
//! route leg holds a duration in seconds.
//!
//! Consumers go through the [`DurationSource`] trait so recalculation
//! can be exercised against mock data.

mod client;
mod error;
mod mock;
mod types;

use async_trait::async_trait;

use crate::domain::LatLng;

pub use client::{RoutingClient, RoutingConfig};
pub use error::RoutingError;
pub use mock::MockRoutingClient;
pub use types::{DirectionsResponse, DurationValue, Route, RouteLeg};

/// Trait for resolving point-to-point travel durations.
///
/// This abstraction allows travel-time recalculation to be tested
/// without a live routing provider.
#[async_trait]
pub trait DurationSource: Send + Sync {
    /// Travel duration from `origin` to `destination`, in whole minutes.
    async fn travel_minutes(
        &self,
        origin: LatLng,
        destination: LatLng,
    ) -> Result<u32, RoutingError>;
}
