//! Travel-time recalculation.
//!
//! After a structural change to a day, the travel duration of every
//! leg in that day is recomputed in position order. Each stop carries
//! the duration to the *next* stop of its day; the final stop never
//! has an outgoing leg. Lookups run serially, one per consecutive
//! pair, and each result is written as soon as it is known.
//!
//! Lookup failures degrade, they do not abort: the affected leg is
//! left without a travel time, a diagnostic is logged, and the walk
//! continues with the next pair.

use crate::domain::TripId;
use crate::routing::DurationSource;
use crate::store::{StoreError, StoreTx};

/// Recompute every leg of one day's partition.
pub async fn recalculate_day<S: DurationSource>(
    tx: &mut StoreTx<'_>,
    routing: &S,
    trip: TripId,
    day: u32,
) -> Result<(), StoreError> {
    let stops = tx.day_stops(trip, day);

    let Some(last) = stops.last() else {
        return Ok(());
    };

    // The final stop has no next stop, unconditionally.
    tx.update_stop(last.id, |s| s.travel_time_minutes = None)?;

    for pair in stops.windows(2) {
        let (current, next) = (&pair[0], &pair[1]);

        let minutes = match (current.coords(), next.coords()) {
            (Some(origin), Some(destination)) => {
                match routing.travel_minutes(origin, destination).await {
                    Ok(minutes) => Some(minutes),
                    Err(err) => {
                        tracing::warn!(
                            stop = current.id.0,
                            day,
                            error = %err,
                            "travel time lookup failed, leaving leg unset"
                        );
                        None
                    }
                }
            }
            // An ungeocoded endpoint makes the leg uncomputable; no
            // lookup is issued.
            _ => None,
        };

        tx.update_stop(current.id, |s| s.travel_time_minutes = minutes)?;
    }

    Ok(())
}
