//! Trip access control.
//!
//! The scheduling operations consult an authorization boundary before
//! mutating anything. The stock policy mirrors the sharing model: the
//! trip owner and members holding the editor role may change the
//! itinerary; any member may view it.

use crate::domain::{Trip, TripRole, UserId};

/// Authorization boundary consulted by the schedule service.
pub trait AccessPolicy: Send + Sync {
    /// Whether `user` may modify the trip's itinerary.
    fn can_edit(&self, user: UserId, trip: &Trip) -> bool;

    /// Whether `user` may read the trip's itinerary.
    fn can_view(&self, user: UserId, trip: &Trip) -> bool;
}

/// Membership-based policy: ownership or an editor role grants edit
/// rights, any membership grants view rights.
#[derive(Debug, Clone, Copy, Default)]
pub struct MembershipPolicy;

impl AccessPolicy for MembershipPolicy {
    fn can_edit(&self, user: UserId, trip: &Trip) -> bool {
        trip.owner == user
            || trip
                .members
                .iter()
                .any(|m| m.user_id == user && m.role == TripRole::Editor)
    }

    fn can_view(&self, user: UserId, trip: &Trip) -> bool {
        trip.owner == user || trip.members.iter().any(|m| m.user_id == user)
    }
}
