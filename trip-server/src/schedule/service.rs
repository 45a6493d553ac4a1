//! Schedule orchestration.
//!
//! `ScheduleService` is the sole mutation entry point for a trip's
//! stops. Every operation runs as: authorize, validate, mutate
//! positions, recompute the affected day(s), commit. All of it happens
//! inside one store transaction, so a structural failure anywhere
//! rolls the whole operation back, while routing failures only degrade
//! individual legs.

use crate::access::AccessPolicy;
use crate::domain::{DomainError, Stop, StopDraft, StopId, StopPatch, Trip, TripId, UserId};
use crate::routing::DurationSource;
use crate::store::{MemoryStore, StoreError};

use super::ordering;
use super::recalc;

/// Errors from schedule operations.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// Caller lacks the rights the operation requires
    #[error("you do not have permission to access this trip")]
    PermissionDenied,

    /// Input failed validation; nothing was changed
    #[error(transparent)]
    Validation(#[from] DomainError),

    /// Store failure; the operation was rolled back
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Orchestrates structural itinerary changes and their recalculation.
pub struct ScheduleService<R, A> {
    store: MemoryStore,
    routing: R,
    policy: A,
}

impl<R: DurationSource, A: AccessPolicy> ScheduleService<R, A> {
    /// Create a new service over the given store, routing source, and
    /// access policy.
    pub fn new(store: MemoryStore, routing: R, policy: A) -> Self {
        Self {
            store,
            routing,
            policy,
        }
    }

    /// Insert a new stop into a day at the requested position.
    ///
    /// The position is clamped into range. The day's travel times are
    /// recomputed before the transaction commits.
    pub async fn insert_stop(
        &self,
        user: UserId,
        trip_id: TripId,
        day: u32,
        requested_position: u32,
        draft: StopDraft,
    ) -> Result<Stop, ScheduleError> {
        draft.validate()?;

        let mut tx = self.store.begin().await;
        let trip = tx.trip(trip_id)?;
        if !self.policy.can_edit(user, &trip) {
            return Err(ScheduleError::PermissionDenied);
        }
        trip.check_day(day)?;

        let stop = ordering::insert_at(&mut tx, trip_id, day, requested_position, draft)?;
        recalc::recalculate_day(&mut tx, &self.routing, trip_id, day).await?;

        let stop = tx.stop(stop.id)?;
        tx.commit();
        Ok(stop)
    }

    /// Move a stop to a new day and/or position.
    ///
    /// Both the vacated and the target day are recomputed; for a
    /// same-day move they coincide and are recomputed once.
    pub async fn move_stop(
        &self,
        user: UserId,
        trip_id: TripId,
        stop_id: StopId,
        new_day: u32,
        requested_position: u32,
    ) -> Result<Stop, ScheduleError> {
        let mut tx = self.store.begin().await;
        let trip = tx.trip(trip_id)?;
        if !self.policy.can_edit(user, &trip) {
            return Err(ScheduleError::PermissionDenied);
        }
        trip.check_day(new_day)?;

        let stop = tx.stop_in_trip(trip_id, stop_id)?;
        let old_day = stop.day_number;

        let moved = ordering::move_stop(&mut tx, stop_id, new_day, requested_position)?;

        recalc::recalculate_day(&mut tx, &self.routing, trip_id, old_day).await?;
        if new_day != old_day {
            recalc::recalculate_day(&mut tx, &self.routing, trip_id, new_day).await?;
        }

        let moved = tx.stop(moved.id)?;
        tx.commit();
        Ok(moved)
    }

    /// Delete a stop and close the gap it leaves.
    pub async fn delete_stop(
        &self,
        user: UserId,
        trip_id: TripId,
        stop_id: StopId,
    ) -> Result<(), ScheduleError> {
        let mut tx = self.store.begin().await;
        let trip = tx.trip(trip_id)?;
        if !self.policy.can_edit(user, &trip) {
            return Err(ScheduleError::PermissionDenied);
        }

        tx.stop_in_trip(trip_id, stop_id)?;
        let removed = ordering::remove(&mut tx, stop_id)?;
        recalc::recalculate_day(&mut tx, &self.routing, trip_id, removed.day_number).await?;

        tx.commit();
        Ok(())
    }

    /// Edit a stop's non-structural fields.
    ///
    /// An edit that changes coordinates invalidates the day's legs, so
    /// the day is recomputed; other edits commit without lookups.
    pub async fn update_stop(
        &self,
        user: UserId,
        trip_id: TripId,
        stop_id: StopId,
        patch: StopPatch,
    ) -> Result<Stop, ScheduleError> {
        patch.validate()?;

        let mut tx = self.store.begin().await;
        let trip = tx.trip(trip_id)?;
        if !self.policy.can_edit(user, &trip) {
            return Err(ScheduleError::PermissionDenied);
        }

        let stop = tx.stop_in_trip(trip_id, stop_id)?;
        tx.update_stop(stop_id, |s| patch.apply(s))?;

        if patch.touches_coordinates() {
            recalc::recalculate_day(&mut tx, &self.routing, trip_id, stop.day_number).await?;
        }

        let updated = tx.stop(stop_id)?;
        tx.commit();
        Ok(updated)
    }

    /// Fetch a trip, view-checked.
    pub async fn trip(&self, user: UserId, trip_id: TripId) -> Result<Trip, ScheduleError> {
        let trip = self.store.trip(trip_id).await?;
        if !self.policy.can_view(user, &trip) {
            return Err(ScheduleError::PermissionDenied);
        }
        Ok(trip)
    }

    /// One day's stops in position order, view-checked.
    pub async fn day_schedule(
        &self,
        user: UserId,
        trip_id: TripId,
        day: u32,
    ) -> Result<Vec<Stop>, ScheduleError> {
        self.trip(user, trip_id).await?;
        Ok(self.store.day_stops(trip_id, day).await?)
    }

    /// All of a trip's stops ordered by day then position, view-checked.
    pub async fn trip_schedule(
        &self,
        user: UserId,
        trip_id: TripId,
    ) -> Result<Vec<Stop>, ScheduleError> {
        self.trip(user, trip_id).await?;
        Ok(self.store.trip_stops(trip_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::MembershipPolicy;
    use crate::domain::{LatLng, TripDraft, TripRole};
    use crate::routing::MockRoutingClient;
    use chrono::NaiveDate;

    const OWNER: UserId = UserId(1);
    const STRANGER: UserId = UserId(9);

    /// Policy that refuses everyone, for permission-path tests.
    struct DenyAll;

    impl AccessPolicy for DenyAll {
        fn can_edit(&self, _user: UserId, _trip: &Trip) -> bool {
            false
        }
        fn can_view(&self, _user: UserId, _trip: &Trip) -> bool {
            false
        }
    }

    async fn service() -> (
        ScheduleService<MockRoutingClient, MembershipPolicy>,
        MemoryStore,
        TripId,
    ) {
        let store = MemoryStore::new();
        let trip = store
            .create_trip(TripDraft {
                title: "Kyoto".to_string(),
                owner: OWNER,
                start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2026, 3, 3).unwrap(),
            })
            .await;
        let service = ScheduleService::new(store.clone(), MockRoutingClient::new(), MembershipPolicy);
        (service, store, trip.id)
    }

    fn located(name: &str, lat: f64, lng: f64) -> StopDraft {
        StopDraft {
            name: name.to_string(),
            latitude: Some(lat),
            longitude: Some(lng),
            ..StopDraft::default()
        }
    }

    fn point(lat: f64, lng: f64) -> LatLng {
        LatLng::new(lat, lng).unwrap()
    }

    #[tokio::test]
    async fn insert_recomputes_the_day() {
        let (service, _store, trip) = service().await;
        service
            .routing
            .set_duration(point(35.0, 135.0), point(35.1, 135.1), 21)
            .await;

        let a = service
            .insert_stop(OWNER, trip, 1, 1, located("A", 35.0, 135.0))
            .await
            .unwrap();
        assert_eq!(a.travel_time_minutes, None);

        let b = service
            .insert_stop(OWNER, trip, 1, 2, located("B", 35.1, 135.1))
            .await
            .unwrap();
        assert_eq!(b.position, 2);
        assert_eq!(b.travel_time_minutes, None);

        let day = service.day_schedule(OWNER, trip, 1).await.unwrap();
        assert_eq!(day[0].travel_time_minutes, Some(21));
        assert_eq!(day[1].travel_time_minutes, None);
    }

    #[tokio::test]
    async fn insert_rejects_days_outside_the_trip() {
        let (service, _store, trip) = service().await;

        let err = service
            .insert_stop(OWNER, trip, 4, 1, located("A", 35.0, 135.0))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::Validation(DomainError::DayOutOfRange { day: 4, span: 3 })
        ));

        let err = service
            .insert_stop(OWNER, trip, 0, 1, located("A", 35.0, 135.0))
            .await
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Validation(_)));
    }

    #[tokio::test]
    async fn insert_rejects_invalid_drafts_before_mutating() {
        let (service, _store, trip) = service().await;

        let err = service
            .insert_stop(OWNER, trip, 1, 1, StopDraft::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::Validation(DomainError::EmptyName)
        ));

        assert!(service.day_schedule(OWNER, trip, 1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn strangers_cannot_mutate() {
        let (service, _store, trip) = service().await;

        let err = service
            .insert_stop(STRANGER, trip, 1, 1, located("A", 35.0, 135.0))
            .await
            .unwrap_err();
        assert!(matches!(err, ScheduleError::PermissionDenied));
    }

    #[tokio::test]
    async fn editor_members_can_mutate() {
        let (service, store, trip) = service().await;
        store
            .add_member(trip, UserId(2), TripRole::Editor)
            .await
            .unwrap();

        assert!(service
            .insert_stop(UserId(2), trip, 1, 1, located("A", 35.0, 135.0))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn viewer_members_cannot_mutate_but_can_read() {
        let (service, store, trip) = service().await;
        store
            .add_member(trip, UserId(3), TripRole::Viewer)
            .await
            .unwrap();

        let err = service
            .insert_stop(UserId(3), trip, 1, 1, located("A", 35.0, 135.0))
            .await
            .unwrap_err();
        assert!(matches!(err, ScheduleError::PermissionDenied));

        assert!(service.day_schedule(UserId(3), trip, 1).await.is_ok());
    }

    #[tokio::test]
    async fn denied_operation_leaves_no_trace() {
        let store = MemoryStore::new();
        let trip = store
            .create_trip(TripDraft {
                title: "Locked".to_string(),
                owner: OWNER,
                start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            })
            .await;
        let service = ScheduleService::new(store.clone(), MockRoutingClient::new(), DenyAll);

        let err = service
            .insert_stop(OWNER, trip.id, 1, 1, located("A", 35.0, 135.0))
            .await
            .unwrap_err();
        assert!(matches!(err, ScheduleError::PermissionDenied));
        assert!(store.day_stops(trip.id, 1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn cross_day_move_recomputes_both_days() {
        // Day 1: A(1), B(2), C(3). Day 2: X(1).
        // Move A to day 2 position 1: day 1 closes to B(1), C(2);
        // day 2 becomes A(1), X(2); both days carry fresh legs.
        let (service, _store, trip) = service().await;
        let routing = &service.routing;
        routing
            .set_duration(point(35.0, 135.0), point(35.1, 135.1), 10)
            .await;
        routing
            .set_duration(point(35.1, 135.1), point(35.2, 135.2), 20)
            .await;
        routing
            .set_duration(point(35.0, 135.0), point(36.0, 136.0), 90)
            .await;

        let a = service
            .insert_stop(OWNER, trip, 1, 1, located("A", 35.0, 135.0))
            .await
            .unwrap();
        service
            .insert_stop(OWNER, trip, 1, 2, located("B", 35.1, 135.1))
            .await
            .unwrap();
        service
            .insert_stop(OWNER, trip, 1, 3, located("C", 35.2, 135.2))
            .await
            .unwrap();
        service
            .insert_stop(OWNER, trip, 2, 1, located("X", 36.0, 136.0))
            .await
            .unwrap();

        let moved = service.move_stop(OWNER, trip, a.id, 2, 1).await.unwrap();
        assert_eq!(moved.day_number, 2);
        assert_eq!(moved.position, 1);
        assert_eq!(moved.travel_time_minutes, Some(90));

        let day1 = service.day_schedule(OWNER, trip, 1).await.unwrap();
        let names: Vec<&str> = day1.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["B", "C"]);
        assert_eq!(day1[0].position, 1);
        assert_eq!(day1[0].travel_time_minutes, Some(20));
        assert_eq!(day1[1].travel_time_minutes, None);

        let day2 = service.day_schedule(OWNER, trip, 2).await.unwrap();
        let names: Vec<&str> = day2.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["A", "X"]);
        assert_eq!(day2[1].travel_time_minutes, None);
    }

    #[tokio::test]
    async fn move_rejects_stops_from_other_trips() {
        let (service, store, trip) = service().await;
        let other = store
            .create_trip(TripDraft {
                title: "Other".to_string(),
                owner: OWNER,
                start_date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(),
            })
            .await;
        let foreign = service
            .insert_stop(OWNER, other.id, 1, 1, located("Elsewhere", 35.0, 135.0))
            .await
            .unwrap();

        let err = service
            .move_stop(OWNER, trip, foreign.id, 1, 1)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::Store(StoreError::StopNotInTrip { .. })
        ));
    }

    #[tokio::test]
    async fn delete_renumbers_and_recomputes() {
        let (service, _store, trip) = service().await;
        let routing = &service.routing;
        routing
            .set_duration(point(35.0, 135.0), point(35.2, 135.2), 55)
            .await;

        service
            .insert_stop(OWNER, trip, 1, 1, located("A", 35.0, 135.0))
            .await
            .unwrap();
        let b = service
            .insert_stop(OWNER, trip, 1, 2, located("B", 35.1, 135.1))
            .await
            .unwrap();
        service
            .insert_stop(OWNER, trip, 1, 3, located("C", 35.2, 135.2))
            .await
            .unwrap();

        service.delete_stop(OWNER, trip, b.id).await.unwrap();

        let day = service.day_schedule(OWNER, trip, 1).await.unwrap();
        let names: Vec<&str> = day.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["A", "C"]);
        assert_eq!(day[0].position, 1);
        assert_eq!(day[1].position, 2);
        // the A->C leg replaced the stale A->B one
        assert_eq!(day[0].travel_time_minutes, Some(55));
    }

    #[tokio::test]
    async fn coordinate_edit_triggers_recalculation() {
        let (service, _store, trip) = service().await;
        let routing = &service.routing;
        routing
            .set_duration(point(35.0, 135.0), point(35.1, 135.1), 10)
            .await;
        routing
            .set_duration(point(35.0, 135.0), point(38.0, 138.0), 180)
            .await;

        service
            .insert_stop(OWNER, trip, 1, 1, located("A", 35.0, 135.0))
            .await
            .unwrap();
        let b = service
            .insert_stop(OWNER, trip, 1, 2, located("B", 35.1, 135.1))
            .await
            .unwrap();

        let patch = StopPatch {
            coordinates: Some(point(38.0, 138.0)),
            ..StopPatch::default()
        };
        service.update_stop(OWNER, trip, b.id, patch).await.unwrap();

        let day = service.day_schedule(OWNER, trip, 1).await.unwrap();
        assert_eq!(day[0].travel_time_minutes, Some(180));
    }

    #[tokio::test]
    async fn plain_edit_issues_no_lookup() {
        let (service, _store, trip) = service().await;
        let routing = &service.routing;

        let a = service
            .insert_stop(OWNER, trip, 1, 1, located("A", 35.0, 135.0))
            .await
            .unwrap();
        let calls_before = routing.call_count();

        let patch = StopPatch {
            name: Some("Renamed".to_string()),
            estimated_cost: Some(800),
            ..StopPatch::default()
        };
        let updated = service.update_stop(OWNER, trip, a.id, patch).await.unwrap();

        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.estimated_cost, Some(800));
        assert_eq!(routing.call_count(), calls_before);
    }

    #[tokio::test]
    async fn trip_schedule_groups_days_in_order() {
        let (service, _store, trip) = service().await;

        service
            .insert_stop(OWNER, trip, 2, 1, located("Late", 35.0, 135.0))
            .await
            .unwrap();
        service
            .insert_stop(OWNER, trip, 1, 1, located("Early", 35.1, 135.1))
            .await
            .unwrap();

        let stops = service.trip_schedule(OWNER, trip).await.unwrap();
        let names: Vec<&str> = stops.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Early", "Late"]);
    }

    #[tokio::test]
    async fn reads_are_view_checked() {
        let (service, _store, trip) = service().await;

        let err = service.trip_schedule(STRANGER, trip).await.unwrap_err();
        assert!(matches!(err, ScheduleError::PermissionDenied));
    }
}
