//! Data transfer objects for web requests and responses.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Category, DomainError, LatLng, Stop, StopDraft, StopId, StopPatch, Trip, TripId, UserId,
    parse_estimated_cost,
};

/// Request to create a trip.
#[derive(Debug, Deserialize)]
pub struct CreateTripRequest {
    /// Trip title
    pub title: String,

    /// First day of the trip
    pub start_date: NaiveDate,

    /// Last day of the trip (inclusive)
    pub end_date: NaiveDate,
}

/// A trip in responses.
#[derive(Debug, Serialize)]
pub struct TripResponse {
    pub id: TripId,
    pub title: String,
    pub owner: UserId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    /// Number of days the trip spans
    pub duration_days: i64,
}

impl From<Trip> for TripResponse {
    fn from(trip: Trip) -> Self {
        let duration_days = trip.duration_days();
        Self {
            id: trip.id,
            title: trip.title,
            owner: trip.owner,
            start_date: trip.start_date,
            end_date: trip.end_date,
            duration_days,
        }
    }
}

/// Request to create a stop.
#[derive(Debug, Deserialize)]
pub struct CreateStopRequest {
    /// Stop name
    pub name: String,

    /// Which day of the trip the stop belongs to (1-based)
    pub day_number: u32,

    /// Requested position within the day; omitted means append.
    /// Out-of-range values are clamped, not rejected.
    pub position: Option<u32>,

    /// Visit category
    pub category: Option<Category>,

    /// Geocoded latitude
    pub latitude: Option<f64>,

    /// Geocoded longitude
    pub longitude: Option<f64>,

    /// Estimated cost as free text (e.g. "¥1,200")
    pub estimated_cost: Option<String>,

    /// Hours part of the planned stay
    pub duration_hours: Option<u32>,

    /// Minutes part of the planned stay
    pub duration_minutes: Option<u32>,

    /// Booking page for the stop, if any
    pub booking_url: Option<String>,

    /// Whether the stop needs a reservation
    pub reservation_required: Option<bool>,
}

impl CreateStopRequest {
    /// The position to request from the insert operation.
    ///
    /// A missing position appends: the engine clamps this to one past
    /// the current end of the day.
    pub fn requested_position(&self) -> u32 {
        self.position.unwrap_or(u32::MAX)
    }

    /// Convert into a stop draft, normalizing cost and stay duration.
    pub fn into_draft(self) -> StopDraft {
        StopDraft {
            name: self.name,
            category: self.category,
            latitude: self.latitude,
            longitude: self.longitude,
            estimated_cost: self
                .estimated_cost
                .as_deref()
                .and_then(parse_estimated_cost),
            duration_minutes: combine_duration(self.duration_hours, self.duration_minutes),
            booking_url: self.booking_url,
            reservation_required: self.reservation_required.unwrap_or(false),
        }
    }
}

/// Request to edit a stop's fields.
///
/// Day and position are not editable here; moving is its own endpoint.
#[derive(Debug, Deserialize)]
pub struct UpdateStopRequest {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub estimated_cost: Option<String>,
    pub duration_hours: Option<u32>,
    pub duration_minutes: Option<u32>,
    pub booking_url: Option<String>,
    pub reservation_required: Option<bool>,
}

impl UpdateStopRequest {
    /// Convert into a stop patch. Coordinates must arrive as a pair.
    pub fn into_patch(self) -> Result<StopPatch, DomainError> {
        let coordinates = match (self.latitude, self.longitude) {
            (None, None) => None,
            (Some(lat), Some(lng)) => Some(LatLng::new(lat, lng)?),
            _ => return Err(DomainError::IncompleteCoordinates),
        };

        Ok(StopPatch {
            name: self.name,
            category: self.category,
            coordinates,
            estimated_cost: self
                .estimated_cost
                .as_deref()
                .and_then(parse_estimated_cost),
            duration_minutes: combine_duration(self.duration_hours, self.duration_minutes),
            booking_url: self.booking_url,
            reservation_required: self.reservation_required,
        })
    }
}

/// Request to move a stop.
#[derive(Debug, Deserialize)]
pub struct MoveStopRequest {
    /// Target day (1-based)
    pub day_number: u32,

    /// Target position within the day; clamped into range
    pub position: u32,
}

/// Planned stay duration split for display.
#[derive(Debug, Serialize)]
pub struct DurationSplit {
    pub hours: u32,
    pub minutes: u32,
}

/// A stop in responses.
#[derive(Debug, Serialize)]
pub struct StopResponse {
    pub id: StopId,
    pub trip_id: TripId,
    pub day_number: u32,
    pub position: u32,
    pub name: String,
    pub category: Option<Category>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    /// Minutes of travel to the next stop of the day; absent for the
    /// last stop or when the leg could not be computed
    pub travel_time_minutes: Option<u32>,

    pub estimated_cost: Option<u32>,

    /// Total planned stay in minutes
    pub duration_minutes: Option<u32>,

    /// The stay split into hours and minutes
    pub duration_split: Option<DurationSplit>,

    pub booking_url: Option<String>,
    pub reservation_required: bool,
}

impl From<Stop> for StopResponse {
    fn from(stop: Stop) -> Self {
        let duration_split = stop.duration_minutes.map(|total| DurationSplit {
            hours: total / 60,
            minutes: total % 60,
        });

        Self {
            id: stop.id,
            trip_id: stop.trip_id,
            day_number: stop.day_number,
            position: stop.position,
            name: stop.name,
            category: stop.category,
            latitude: stop.latitude,
            longitude: stop.longitude,
            travel_time_minutes: stop.travel_time_minutes,
            estimated_cost: stop.estimated_cost,
            duration_minutes: stop.duration_minutes,
            duration_split,
            booking_url: stop.booking_url,
            reservation_required: stop.reservation_required,
        }
    }
}

/// One day of a trip's schedule.
#[derive(Debug, Serialize)]
pub struct DayScheduleResponse {
    pub day_number: u32,
    pub stops: Vec<StopResponse>,
}

/// A whole trip's schedule, grouped by day.
#[derive(Debug, Serialize)]
pub struct TripScheduleResponse {
    pub trip: TripResponse,
    pub days: Vec<DayScheduleResponse>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Combine an hours/minutes split into total minutes.
///
/// Returns `None` only when neither part was provided.
fn combine_duration(hours: Option<u32>, minutes: Option<u32>) -> Option<u32> {
    if hours.is_none() && minutes.is_none() {
        return None;
    }
    Some(hours.unwrap_or(0) * 60 + minutes.unwrap_or(0))
}
