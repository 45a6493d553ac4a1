//! Web layer for the itinerary scheduler.
//!
//! Provides the JSON endpoints for trip and stop operations.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
