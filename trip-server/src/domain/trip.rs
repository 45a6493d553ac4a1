//! Trip records and day-span arithmetic.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Identifier of a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripId(pub u64);

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Permission level of a shared trip member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripRole {
    /// May read the itinerary but not change it.
    Viewer,
    /// May insert, move, edit, and delete stops.
    Editor,
}

/// A user the trip is shared with, and their permission level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripMember {
    pub user_id: UserId,
    pub role: TripRole,
}

/// A planning session bounded by a start and end date.
///
/// The date range defines which day numbers are valid for its stops:
/// day 1 is the start date, and the last valid day is
/// `(end_date - start_date) + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: TripId,
    pub title: String,
    pub owner: UserId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub members: Vec<TripMember>,
}

impl Trip {
    /// Number of days the trip spans, inclusive of both endpoints.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Whether `day` is a valid day number for this trip.
    pub fn contains_day(&self, day: u32) -> bool {
        day >= 1 && i64::from(day) <= self.duration_days()
    }

    /// Validate a day number against the trip span.
    pub fn check_day(&self, day: u32) -> Result<(), DomainError> {
        if self.contains_day(day) {
            Ok(())
        } else {
            Err(DomainError::DayOutOfRange {
                day,
                span: self.duration_days(),
            })
        }
    }
}

/// Fields needed to create a trip.
#[derive(Debug, Clone)]
pub struct TripDraft {
    pub title: String,
    pub owner: UserId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl TripDraft {
    /// Validate the draft before it is persisted.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.end_date < self.start_date {
            return Err(DomainError::InvalidDateRange);
        }
        Ok(())
    }
}
