//! Stops: the planned visits that make up an itinerary.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::coords::LatLng;
use super::error::DomainError;
use super::trip::TripId;

/// Maximum length of a stop name.
pub const MAX_NAME_LEN: usize = 50;

/// Identifier of a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopId(pub u64);

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What kind of visit a stop is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Sightseeing,
    Restaurant,
    Accommodation,
    Other,
}

/// A planned visit within a trip's itinerary.
///
/// `position` is 1-based and contiguous within the stop's
/// `(trip_id, day_number)` partition. `travel_time_minutes` is derived:
/// it holds the travel duration to the next stop of the same day, and
/// is never set directly by a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: StopId,
    pub trip_id: TripId,
    pub day_number: u32,
    pub position: u32,
    pub name: String,
    pub category: Option<Category>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub travel_time_minutes: Option<u32>,
    pub estimated_cost: Option<u32>,
    pub duration_minutes: Option<u32>,
    pub booking_url: Option<String>,
    pub reservation_required: bool,
}

impl Stop {
    /// The stop's coordinates, if it has been geocoded.
    pub fn coords(&self) -> Option<LatLng> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => LatLng::new(lat, lng).ok(),
            _ => None,
        }
    }
}

/// Fields a caller provides when creating a stop.
///
/// Position and day are not part of the draft; they are decided by the
/// insert operation.
#[derive(Debug, Clone, Default)]
pub struct StopDraft {
    pub name: String,
    pub category: Option<Category>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub estimated_cost: Option<u32>,
    pub duration_minutes: Option<u32>,
    pub booking_url: Option<String>,
    pub reservation_required: bool,
}

impl StopDraft {
    /// Validate the draft before any mutation happens.
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_name(&self.name)?;
        validate_coordinates(self.latitude, self.longitude)?;
        Ok(())
    }
}

/// A partial edit of a stop's non-structural fields.
///
/// Day and position are deliberately absent; structural changes go
/// through the move operation.
#[derive(Debug, Clone, Default)]
pub struct StopPatch {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub coordinates: Option<LatLng>,
    pub estimated_cost: Option<u32>,
    pub duration_minutes: Option<u32>,
    pub booking_url: Option<String>,
    pub reservation_required: Option<bool>,
}

impl StopPatch {
    /// Validate the patch before any mutation happens.
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        Ok(())
    }

    /// Whether applying this patch changes the stop's coordinates.
    pub fn touches_coordinates(&self) -> bool {
        self.coordinates.is_some()
    }

    /// Apply the patch to a stop in place.
    pub fn apply(&self, stop: &mut Stop) {
        if let Some(name) = &self.name {
            stop.name = name.clone();
        }
        if let Some(category) = self.category {
            stop.category = Some(category);
        }
        if let Some(coords) = self.coordinates {
            stop.latitude = Some(coords.latitude());
            stop.longitude = Some(coords.longitude());
        }
        if let Some(cost) = self.estimated_cost {
            stop.estimated_cost = Some(cost);
        }
        if let Some(duration) = self.duration_minutes {
            stop.duration_minutes = Some(duration);
        }
        if let Some(url) = &self.booking_url {
            stop.booking_url = Some(url.clone());
        }
        if let Some(required) = self.reservation_required {
            stop.reservation_required = required;
        }
    }
}

fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::EmptyName);
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::NameTooLong { max: MAX_NAME_LEN });
    }
    Ok(())
}

fn validate_coordinates(latitude: Option<f64>, longitude: Option<f64>) -> Result<(), DomainError> {
    match (latitude, longitude) {
        (None, None) => Ok(()),
        (Some(lat), Some(lng)) => {
            LatLng::new(lat, lng)?;
            Ok(())
        }
        _ => Err(DomainError::IncompleteCoordinates),
    }
}

/// Normalize a free-text cost into an integer amount.
///
/// Currency symbols and separators are stripped, so "¥1,200" and
/// "1200 yen" both become 1200. Returns `None` when no digits remain.
pub fn parse_estimated_cost(input: &str) -> Option<u32> {
    let cleaned: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<f64>().ok().map(|amount| amount.trunc() as u32)
}
