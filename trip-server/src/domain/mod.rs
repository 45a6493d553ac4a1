//! Domain types for the itinerary scheduler.
//!
//! This module contains the core model types. Validation happens at
//! construction or in explicit `validate` steps, so code that receives
//! these types can trust their invariants.

mod coords;
mod error;
mod stop;
mod trip;

pub use coords::{InvalidLatLng, LatLng};
pub use error::DomainError;
pub use stop::{
    Category, MAX_NAME_LEN, Stop, StopDraft, StopId, StopPatch, parse_estimated_cost,
};
pub use trip::{Trip, TripDraft, TripId, TripMember, TripRole, UserId};
