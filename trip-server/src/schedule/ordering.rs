//! Day-partition position maintenance.
//!
//! Within every `(trip, day)` partition, stop positions are contiguous
//! integers starting at 1. Every structural change goes through the
//! functions here, which shift neighbouring entries so that invariant
//! holds when the transaction commits.
//!
//! Requested positions are clamped into range rather than rejected: 0
//! becomes 1, anything past the end appends. When an insert or move
//! lands on an occupied slot, the arriving stop takes it and the
//! displaced entries shift later, never earlier.

use crate::domain::{Stop, StopDraft, StopId, TripId};
use crate::store::{StoreError, StoreTx};

/// Clamp a requested position into `[1, count + 1]`.
fn clamp_position(requested: u32, count: u32) -> u32 {
    requested.max(1).min(count + 1)
}

/// Insert a new stop at the requested position within a day.
///
/// Existing stops at or after the landing position shift up by one.
pub fn insert_at(
    tx: &mut StoreTx<'_>,
    trip: TripId,
    day: u32,
    requested: u32,
    draft: StopDraft,
) -> Result<Stop, StoreError> {
    let count = tx.day_count(trip, day);
    let position = clamp_position(requested, count);

    shift_up_from(tx, trip, day, position, None)?;
    Ok(tx.insert_stop(trip, day, position, draft))
}

/// Move a stop to a new day and/or position.
///
/// The vacated partition closes its gap; the target partition shifts
/// entries up to make room. Same-day moves are the degenerate case
/// where both partitions are one and the same.
pub fn move_stop(
    tx: &mut StoreTx<'_>,
    stop_id: StopId,
    new_day: u32,
    requested: u32,
) -> Result<Stop, StoreError> {
    let stop = tx.stop(stop_id)?;
    let trip = stop.trip_id;
    let old_day = stop.day_number;

    close_gap_above(tx, trip, old_day, stop.position)?;

    // Target count must not include the stop being moved.
    let mut count = tx.day_count(trip, new_day);
    if new_day == old_day {
        count -= 1;
    }
    let position = clamp_position(requested, count);

    shift_up_from(tx, trip, new_day, position, Some(stop_id))?;

    tx.update_stop(stop_id, |s| {
        s.day_number = new_day;
        s.position = position;
    })?;

    tx.stop(stop_id)
}

/// Delete a stop and close the gap it leaves.
pub fn remove(tx: &mut StoreTx<'_>, stop_id: StopId) -> Result<Stop, StoreError> {
    let stop = tx.remove_stop(stop_id)?;
    close_gap_above(tx, stop.trip_id, stop.day_number, stop.position)?;
    Ok(stop)
}

/// Shift every stop at `from_position` or later up by one.
///
/// Highest position first, so no two rows ever share a position
/// mid-shift. `exclude` skips the stop that is in flight during a move.
fn shift_up_from(
    tx: &mut StoreTx<'_>,
    trip: TripId,
    day: u32,
    from_position: u32,
    exclude: Option<StopId>,
) -> Result<(), StoreError> {
    let mut to_shift: Vec<(u32, StopId)> = tx
        .day_stops(trip, day)
        .iter()
        .filter(|s| s.position >= from_position && Some(s.id) != exclude)
        .map(|s| (s.position, s.id))
        .collect();
    to_shift.sort_by(|a, b| b.0.cmp(&a.0));

    for (_, id) in to_shift {
        tx.update_stop(id, |s| s.position += 1)?;
    }
    Ok(())
}

/// Decrement every stop above a vacated position, lowest first.
fn close_gap_above(
    tx: &mut StoreTx<'_>,
    trip: TripId,
    day: u32,
    vacated: u32,
) -> Result<(), StoreError> {
    let to_shift: Vec<StopId> = tx
        .day_stops(trip, day)
        .iter()
        .filter(|s| s.position > vacated)
        .map(|s| s.id)
        .collect();

    for id in to_shift {
        tx.update_stop(id, |s| s.position -= 1)?;
    }
    Ok(())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::{TripDraft, UserId};
    use crate::store::MemoryStore;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    const DAYS: u32 = 3;

    #[derive(Debug, Clone)]
    enum Op {
        Insert { day: u32, pos: u32 },
        Move { pick: usize, day: u32, pos: u32 },
        Delete { pick: usize },
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (1..=DAYS, 0u32..=8).prop_map(|(day, pos)| Op::Insert { day, pos }),
            (0usize..64, 1..=DAYS, 0u32..=8)
                .prop_map(|(pick, day, pos)| Op::Move { pick, day, pos }),
            (0usize..64).prop_map(|pick| Op::Delete { pick }),
        ]
    }

    proptest! {
        /// After any operation sequence, every day's positions are
        /// exactly 1..=n.
        #[test]
        fn positions_stay_contiguous(ops in proptest::collection::vec(op_strategy(), 1..40)) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();

            rt.block_on(async {
                let store = MemoryStore::new();
                let trip = store
                    .create_trip(TripDraft {
                        title: "Prop".to_string(),
                        owner: UserId(1),
                        start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
                        end_date: NaiveDate::from_ymd_opt(2026, 3, 3).unwrap(),
                    })
                    .await
                    .id;

                let mut tx = store.begin().await;
                let mut ids: Vec<StopId> = Vec::new();

                for op in ops {
                    match op {
                        Op::Insert { day, pos } => {
                            let stop = insert_at(
                                &mut tx,
                                trip,
                                day,
                                pos,
                                StopDraft {
                                    name: "stop".to_string(),
                                    ..StopDraft::default()
                                },
                            )
                            .unwrap();
                            ids.push(stop.id);
                        }
                        Op::Move { pick, day, pos } if !ids.is_empty() => {
                            let id = ids[pick % ids.len()];
                            move_stop(&mut tx, id, day, pos).unwrap();
                        }
                        Op::Delete { pick } if !ids.is_empty() => {
                            let id = ids.remove(pick % ids.len());
                            remove(&mut tx, id).unwrap();
                        }
                        _ => {}
                    }

                    for day in 1..=DAYS {
                        let positions: Vec<u32> =
                            tx.day_stops(trip, day).iter().map(|s| s.position).collect();
                        let expected: Vec<u32> = (1..=positions.len() as u32).collect();
                        assert_eq!(positions, expected, "day {day} lost contiguity");
                    }
                }
            });
        }
    }
}
