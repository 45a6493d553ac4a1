//! Routing provider response DTOs.
//!
//! These types map directly to the directions JSON API. `Option` and
//! defaults are used liberally because providers omit fields on
//! non-OK statuses rather than sending empty values.

use serde::Deserialize;

/// Top-level response from the directions endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    /// Provider status string ("OK" on success).
    pub status: String,

    /// Candidate routes, best first. Empty when no route exists.
    #[serde(default)]
    pub routes: Vec<Route>,

    /// Human-readable detail accompanying a non-OK status.
    pub error_message: Option<String>,
}

/// A single route alternative.
#[derive(Debug, Clone, Deserialize)]
pub struct Route {
    /// Legs of the route. One leg for a single origin/destination pair.
    #[serde(default)]
    pub legs: Vec<RouteLeg>,
}

/// One leg of a route.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteLeg {
    /// Travel duration for this leg.
    pub duration: Option<DurationValue>,
}

/// A duration as the provider reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct DurationValue {
    /// Duration in seconds.
    pub value: u64,

    /// Human-readable rendering (e.g. "23 mins").
    pub text: Option<String>,
}
