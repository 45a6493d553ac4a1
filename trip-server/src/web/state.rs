//! Application state for the web layer.

use std::sync::Arc;

use crate::access::MembershipPolicy;
use crate::routing::RoutingClient;
use crate::schedule::ScheduleService;
use crate::store::MemoryStore;

/// Shared application state.
///
/// Contains the schedule service plus direct store access for the
/// trip-level glue endpoints.
#[derive(Clone)]
pub struct AppState {
    /// Sole mutation entry point for itinerary stops
    pub service: Arc<ScheduleService<RoutingClient, MembershipPolicy>>,

    /// Backing store, for trip create/delete
    pub store: MemoryStore,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        service: ScheduleService<RoutingClient, MembershipPolicy>,
        store: MemoryStore,
    ) -> Self {
        Self {
            service: Arc::new(service),
            store,
        }
    }
}
