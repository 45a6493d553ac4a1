//! Store error types.

use crate::domain::{StopId, TripId};

/// Errors from the stop store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Trip does not exist
    #[error("trip {0} not found")]
    TripNotFound(TripId),

    /// Stop does not exist
    #[error("stop {0} not found")]
    StopNotFound(StopId),

    /// Stop exists but belongs to a different trip
    #[error("stop {stop} does not belong to trip {trip}")]
    StopNotInTrip { stop: StopId, trip: TripId },
}
