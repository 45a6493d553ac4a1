//! Geographic coordinate types.

use std::fmt;

/// Error returned when constructing an out-of-range coordinate pair.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid coordinates: {reason}")]
pub struct InvalidLatLng {
    reason: &'static str,
}

/// A validated latitude/longitude pair.
///
/// Latitude lies in `[-90, 90]` and longitude in `[-180, 180]`, both
/// finite. This type guarantees that any `LatLng` value is valid by
/// construction.
///
/// # Examples
///
/// ```
/// use trip_server::domain::LatLng;
///
/// let tokyo = LatLng::new(35.6812, 139.7671).unwrap();
/// assert_eq!(tokyo.to_string(), "35.6812,139.7671");
///
/// // Out-of-range latitude is rejected
/// assert!(LatLng::new(91.0, 0.0).is_err());
/// ```
#[derive(Clone, Copy, PartialEq)]
pub struct LatLng {
    latitude: f64,
    longitude: f64,
}

impl LatLng {
    /// Construct a coordinate pair, validating both components.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidLatLng> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(InvalidLatLng {
                reason: "coordinates must be finite numbers",
            });
        }

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(InvalidLatLng {
                reason: "latitude must be between -90 and 90",
            });
        }

        if !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidLatLng {
                reason: "longitude must be between -180 and 180",
            });
        }

        Ok(LatLng {
            latitude,
            longitude,
        })
    }

    /// Latitude in decimal degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Debug for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LatLng({},{})", self.latitude, self.longitude)
    }
}

/// Formats as `lat,lng`, the shape routing providers take as a query
/// parameter.
impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}
