// src/geopoint.rs

use serde::{Deserialize, Serialize};

/// Represents a geographical point. Field order follows the GeoJSON
/// convention of longitude first.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    /// Creates a new `GeoPoint`.
    ///
    /// # Panics
    /// Panics if longitude is not between -180 and 180, or latitude is not between -90 and 90.
    pub fn new(longitude: f64, latitude: f64) -> Self {
        if !(-180.0..=180.0).contains(&longitude) {
            panic!("Longitude must be between -180 and 180 degrees.");
        }
        if !(-90.0..=90.0).contains(&latitude) {
            panic!("Latitude must be between -90 and 90 degrees.");
        }
        GeoPoint {
            longitude,
            latitude,
        }
    }

    /// Returns `true` when both coordinates are inside the valid WGS84 ranges.
    ///
    /// Deserialized points bypass [`GeoPoint::new`], so anything arriving over
    /// the wire must be checked with this before it is trusted.
    pub fn in_bounds(&self) -> bool {
        (-180.0..=180.0).contains(&self.longitude) && (-90.0..=90.0).contains(&self.latitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic]
    fn new_rejects_out_of_range_longitude() {
        let _ = GeoPoint::new(181.0, 0.0);
    }

    #[test]
    #[should_panic]
    fn new_rejects_out_of_range_latitude() {
        let _ = GeoPoint::new(0.0, 90.5);
    }

    #[test]
    fn in_bounds_checks_both_axes() {
        assert!(GeoPoint::new(-74.006, 40.7128).in_bounds());
        let bad = GeoPoint {
            longitude: 200.0,
            latitude: 10.0,
        };
        assert!(!bad.in_bounds());
    }
}
