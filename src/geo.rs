// src/geo.rs

use serde_json::{json, Value};
use std::f64::consts::PI;

use crate::error::MapLlmError;
use crate::geopoint::GeoPoint;

/// Mean Earth radius in kilometers for the spherical model used throughout.
pub const EARTH_RADIUS_KM: f64 = 6378.1;

/// Default number of vertices used to approximate a circle.
pub const DEFAULT_VERTEX_COUNT: usize = 64;

/// Validated parameters for building a geodesic circle polygon.
///
/// The builder itself has no error path; a non-positive radius or a vertex
/// count below 3 produces degenerate output, so both are rejected here at
/// construction time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleRequest {
    center: GeoPoint,
    radius_km: f64,
    vertex_count: usize,
}

impl CircleRequest {
    /// Creates a circle request with the default vertex count.
    pub fn new(center: GeoPoint, radius_km: f64) -> Result<Self, MapLlmError> {
        Self::with_vertex_count(center, radius_km, DEFAULT_VERTEX_COUNT)
    }

    /// Creates a circle request with an explicit vertex count.
    pub fn with_vertex_count(
        center: GeoPoint,
        radius_km: f64,
        vertex_count: usize,
    ) -> Result<Self, MapLlmError> {
        if !(radius_km > 0.0) {
            return Err(MapLlmError::InvalidInput(format!(
                "Circle radius must be positive, got {} km.",
                radius_km
            )));
        }
        if vertex_count < 3 {
            return Err(MapLlmError::InvalidInput(format!(
                "A circle polygon needs at least 3 vertices, got {}.",
                vertex_count
            )));
        }
        Ok(CircleRequest {
            center,
            radius_km,
            vertex_count,
        })
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Builds the closed ring approximating this circle.
    pub fn build(&self) -> Polygon {
        circle_polygon(self.center, self.radius_km, self.vertex_count)
    }
}

/// A closed ring of points: the first and last point are identical, and a
/// ring built from `vertex_count` bearings holds `vertex_count + 1` points.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    points: Vec<GeoPoint>,
}

impl Polygon {
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Renders the ring as a GeoJSON `Feature` with a `Polygon` geometry,
    /// the shape a mapping library expects for a `geojson` source.
    pub fn to_geojson(&self) -> Value {
        let coordinates: Vec<Value> = self
            .points
            .iter()
            .map(|p| json!([p.longitude, p.latitude]))
            .collect();
        json!({
            "type": "Feature",
            "geometry": {
                "type": "Polygon",
                "coordinates": [coordinates],
            },
            "properties": {},
        })
    }
}

/// Builds a polygon approximating a circle of `radius_km` around `center` on
/// a spherical Earth, using the forward destination-point formula at
/// `vertex_count` evenly spaced bearings. The start bearing is repeated at
/// the end so the ring closes.
///
/// Inputs are assumed validated (see [`CircleRequest`]); a tiny radius yields
/// nearly coincident points rather than an error.
pub fn circle_polygon(center: GeoPoint, radius_km: f64, vertex_count: usize) -> Polygon {
    let lat = center.latitude.to_radians();
    let lon = center.longitude.to_radians();
    let d = radius_km / EARTH_RADIUS_KM;

    let mut points = Vec::with_capacity(vertex_count + 1);
    for i in 0..=vertex_count {
        let bearing = 2.0 * PI * i as f64 / vertex_count as f64;

        let lat2 = (lat.sin() * d.cos() + lat.cos() * d.sin() * bearing.cos()).asin();
        let lon2 = lon
            + (bearing.sin() * d.sin() * lat.cos()).atan2(d.cos() - lat.sin() * lat2.sin());

        // Built directly: a ring crossing the antimeridian may carry
        // longitudes outside [-180, 180], which mapping libraries accept.
        points.push(GeoPoint {
            longitude: lon2.to_degrees(),
            latitude: lat2.to_degrees(),
        });
    }

    Polygon { points }
}

/// Great-circle distance between two points in kilometers, on the same
/// spherical model as [`circle_polygon`].
pub fn great_circle_distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * h.sqrt().asin() * EARTH_RADIUS_KM
}
