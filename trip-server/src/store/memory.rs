//! In-memory stop store with transactional writes.
//!
//! All trip and stop records live in tables behind one `RwLock`. A
//! write transaction takes the write lock for its whole lifetime and
//! snapshots the tables up front: dropping the transaction without
//! committing restores the snapshot, so a failed operation leaves no
//! partial state behind. Holding the lock across the transaction is
//! also what gives each operation its single-writer atomicity.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, RwLockWriteGuard};

use crate::domain::{Stop, StopDraft, StopId, Trip, TripDraft, TripId, TripMember, TripRole, UserId};

use super::error::StoreError;

/// Backing tables for all persisted records.
#[derive(Debug, Clone, Default)]
struct Tables {
    trips: HashMap<TripId, Trip>,
    stops: HashMap<StopId, Stop>,
    next_trip_id: u64,
    next_stop_id: u64,
}

impl Tables {
    fn new() -> Self {
        Self {
            next_trip_id: 1,
            next_stop_id: 1,
            ..Self::default()
        }
    }

    fn day_stops(&self, trip: TripId, day: u32) -> Vec<Stop> {
        let mut stops: Vec<Stop> = self
            .stops
            .values()
            .filter(|s| s.trip_id == trip && s.day_number == day)
            .cloned()
            .collect();
        stops.sort_by_key(|s| s.position);
        stops
    }

    fn trip_stops(&self, trip: TripId) -> Vec<Stop> {
        let mut stops: Vec<Stop> = self
            .stops
            .values()
            .filter(|s| s.trip_id == trip)
            .cloned()
            .collect();
        stops.sort_by_key(|s| (s.day_number, s.position));
        stops
    }
}

/// Shared in-memory store for trips and stops.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Tables::new())),
        }
    }

    /// Begin a write transaction.
    ///
    /// The transaction holds the store's write lock until it is
    /// committed or dropped; concurrent operations queue behind it.
    pub async fn begin(&self) -> StoreTx<'_> {
        let guard = self.inner.write().await;
        let snapshot = Some(Box::new(Tables::clone(&guard)));
        StoreTx { guard, snapshot }
    }

    /// Create a trip from a validated draft.
    pub async fn create_trip(&self, draft: TripDraft) -> Trip {
        let mut tables = self.inner.write().await;
        let id = TripId(tables.next_trip_id);
        tables.next_trip_id += 1;

        let trip = Trip {
            id,
            title: draft.title,
            owner: draft.owner,
            start_date: draft.start_date,
            end_date: draft.end_date,
            members: Vec::new(),
        };
        tables.trips.insert(id, trip.clone());
        trip
    }

    /// Share a trip with another user.
    pub async fn add_member(
        &self,
        trip: TripId,
        user_id: UserId,
        role: TripRole,
    ) -> Result<(), StoreError> {
        let mut tables = self.inner.write().await;
        let record = tables
            .trips
            .get_mut(&trip)
            .ok_or(StoreError::TripNotFound(trip))?;

        record.members.retain(|m| m.user_id != user_id);
        record.members.push(TripMember { user_id, role });
        Ok(())
    }

    /// Remove a trip and every stop it owns.
    pub async fn remove_trip(&self, trip: TripId) -> Result<(), StoreError> {
        let mut tables = self.inner.write().await;
        tables
            .trips
            .remove(&trip)
            .ok_or(StoreError::TripNotFound(trip))?;
        tables.stops.retain(|_, s| s.trip_id != trip);
        Ok(())
    }

    /// Fetch a trip by id.
    pub async fn trip(&self, trip: TripId) -> Result<Trip, StoreError> {
        let tables = self.inner.read().await;
        tables
            .trips
            .get(&trip)
            .cloned()
            .ok_or(StoreError::TripNotFound(trip))
    }

    /// Stops of one day, ordered by position.
    pub async fn day_stops(&self, trip: TripId, day: u32) -> Result<Vec<Stop>, StoreError> {
        let tables = self.inner.read().await;
        if !tables.trips.contains_key(&trip) {
            return Err(StoreError::TripNotFound(trip));
        }
        Ok(tables.day_stops(trip, day))
    }

    /// All stops of a trip, ordered by day then position.
    pub async fn trip_stops(&self, trip: TripId) -> Result<Vec<Stop>, StoreError> {
        let tables = self.inner.read().await;
        if !tables.trips.contains_key(&trip) {
            return Err(StoreError::TripNotFound(trip));
        }
        Ok(tables.trip_stops(trip))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// A write transaction over the store.
///
/// Commit keeps the changes; dropping without commit restores the
/// snapshot taken at `begin`.
pub struct StoreTx<'a> {
    guard: RwLockWriteGuard<'a, Tables>,
    snapshot: Option<Box<Tables>>,
}

impl StoreTx<'_> {
    /// Make the transaction's changes permanent.
    pub fn commit(mut self) {
        self.snapshot = None;
    }

    /// Fetch a trip by id.
    pub fn trip(&self, trip: TripId) -> Result<Trip, StoreError> {
        self.guard
            .trips
            .get(&trip)
            .cloned()
            .ok_or(StoreError::TripNotFound(trip))
    }

    /// Fetch a stop by id.
    pub fn stop(&self, stop: StopId) -> Result<Stop, StoreError> {
        self.guard
            .stops
            .get(&stop)
            .cloned()
            .ok_or(StoreError::StopNotFound(stop))
    }

    /// Fetch a stop, verifying it belongs to the given trip.
    pub fn stop_in_trip(&self, trip: TripId, stop: StopId) -> Result<Stop, StoreError> {
        let record = self.stop(stop)?;
        if record.trip_id != trip {
            return Err(StoreError::StopNotInTrip { stop, trip });
        }
        Ok(record)
    }

    /// Stops of one day, ordered by position.
    pub fn day_stops(&self, trip: TripId, day: u32) -> Vec<Stop> {
        self.guard.day_stops(trip, day)
    }

    /// Number of stops in one day's partition.
    pub fn day_count(&self, trip: TripId, day: u32) -> u32 {
        self.guard
            .stops
            .values()
            .filter(|s| s.trip_id == trip && s.day_number == day)
            .count() as u32
    }

    /// Write a new stop record at the given day and position.
    ///
    /// The caller is responsible for having made room at that position.
    pub fn insert_stop(&mut self, trip: TripId, day: u32, position: u32, draft: StopDraft) -> Stop {
        let id = StopId(self.guard.next_stop_id);
        self.guard.next_stop_id += 1;

        let stop = Stop {
            id,
            trip_id: trip,
            day_number: day,
            position,
            name: draft.name,
            category: draft.category,
            latitude: draft.latitude,
            longitude: draft.longitude,
            travel_time_minutes: None,
            estimated_cost: draft.estimated_cost,
            duration_minutes: draft.duration_minutes,
            booking_url: draft.booking_url,
            reservation_required: draft.reservation_required,
        };
        self.guard.stops.insert(id, stop.clone());
        stop
    }

    /// Update a stop in place.
    pub fn update_stop(
        &mut self,
        stop: StopId,
        f: impl FnOnce(&mut Stop),
    ) -> Result<(), StoreError> {
        let record = self
            .guard
            .stops
            .get_mut(&stop)
            .ok_or(StoreError::StopNotFound(stop))?;
        f(record);
        Ok(())
    }

    /// Remove a stop, returning the removed record.
    pub fn remove_stop(&mut self, stop: StopId) -> Result<Stop, StoreError> {
        self.guard
            .stops
            .remove(&stop)
            .ok_or(StoreError::StopNotFound(stop))
    }
}

impl Drop for StoreTx<'_> {
    fn drop(&mut self) {
        // Uncommitted transaction: restore the snapshot
        if let Some(snapshot) = self.snapshot.take() {
            *self.guard = *snapshot;
        }
    }
}
