// src/ops.rs

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::geo::{circle_polygon, DEFAULT_VERTEX_COUNT};
use crate::geopoint::GeoPoint;

// Defaults mirroring the fill/outline pair the original map used for circles.
const DEFAULT_CIRCLE_COLOR: &str = "#3887be";
const DEFAULT_FILL_OPACITY: f64 = 0.3;
const DEFAULT_LINE_WIDTH: f64 = 2.0;

const MAX_ZOOM: f64 = 24.0;

/// The operation payload could not be turned into a validated operation list.
#[derive(Error, Debug)]
pub enum OpError {
    #[error("Operation payload is not a JSON array of tagged operations: {0}")]
    InvalidPayload(#[source] serde_json::Error),

    #[error("Operation {index} ({op}) is invalid: {reason}")]
    InvalidOperation {
        index: usize,
        op: &'static str,
        reason: String,
    },
}

/// One instruction for the map rendering front end.
///
/// The set is closed: an unknown `op` tag fails deserialization, which is the
/// point of routing model output through this enum instead of executing it as
/// script. Every variant is schema-validated before it is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum MapOperation {
    /// Move the camera to a new center, optionally changing zoom.
    FlyTo {
        center: GeoPoint,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        zoom: Option<f64>,
    },
    /// Fit the camera to a bounding box given as its SW and NE corners.
    FitBounds { sw: GeoPoint, ne: GeoPoint },
    /// Drop a marker, optionally labeled and colored.
    #[serde(rename_all = "camelCase")]
    AddMarker {
        position: GeoPoint,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<String>,
    },
    /// Draw a geodesic circle as a filled polygon with an outline.
    #[serde(rename_all = "camelCase")]
    DrawCircle {
        center: GeoPoint,
        radius_km: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        vertex_count: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fill_color: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fill_opacity: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        line_color: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        line_width: Option<f64>,
    },
    /// Add an inline GeoJSON source under an explicit id.
    AddGeoJson { id: String, data: Value },
    /// Remove a previously added layer (and its source) by id.
    RemoveLayer { id: String },
}

impl MapOperation {
    /// The wire-format tag of this operation.
    pub fn name(&self) -> &'static str {
        match self {
            MapOperation::FlyTo { .. } => "flyTo",
            MapOperation::FitBounds { .. } => "fitBounds",
            MapOperation::AddMarker { .. } => "addMarker",
            MapOperation::DrawCircle { .. } => "drawCircle",
            MapOperation::AddGeoJson { .. } => "addGeoJson",
            MapOperation::RemoveLayer { .. } => "removeLayer",
        }
    }

    /// Validates the operation's arguments against its schema. Returns the
    /// reason on failure; the caller attaches position context.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            MapOperation::FlyTo { center, zoom } => {
                check_point("center", center)?;
                if let Some(zoom) = zoom {
                    if !(0.0..=MAX_ZOOM).contains(zoom) {
                        return Err(format!("zoom {} is outside [0, {}]", zoom, MAX_ZOOM));
                    }
                }
                Ok(())
            }
            MapOperation::FitBounds { sw, ne } => {
                check_point("sw", sw)?;
                check_point("ne", ne)?;
                if sw.latitude > ne.latitude {
                    return Err("sw latitude is north of ne latitude".to_string());
                }
                Ok(())
            }
            MapOperation::AddMarker { position, .. } => check_point("position", position),
            MapOperation::DrawCircle {
                center,
                radius_km,
                vertex_count,
                fill_opacity,
                ..
            } => {
                check_point("center", center)?;
                if !(*radius_km > 0.0) {
                    return Err(format!("radiusKm must be positive, got {}", radius_km));
                }
                if let Some(count) = vertex_count {
                    if *count < 3 {
                        return Err(format!("vertexCount must be at least 3, got {}", count));
                    }
                }
                if let Some(opacity) = fill_opacity {
                    if !(0.0..=1.0).contains(opacity) {
                        return Err(format!("fillOpacity {} is outside [0, 1]", opacity));
                    }
                }
                Ok(())
            }
            MapOperation::AddGeoJson { id, data } => {
                if id.trim().is_empty() {
                    return Err("id must not be empty".to_string());
                }
                if !data.is_object() {
                    return Err("data must be an inline GeoJSON object".to_string());
                }
                Ok(())
            }
            MapOperation::RemoveLayer { id } => {
                if id.trim().is_empty() {
                    return Err("id must not be empty".to_string());
                }
                Ok(())
            }
        }
    }
}

fn check_point(field: &str, point: &GeoPoint) -> Result<(), String> {
    if point.in_bounds() {
        Ok(())
    } else {
        Err(format!(
            "{} [{}, {}] is outside valid coordinate ranges",
            field, point.longitude, point.latitude
        ))
    }
}

/// Parses an interpreter `code` payload as a JSON array of tagged operations
/// and validates each one. Any unknown tag or out-of-range argument rejects
/// the whole payload.
pub fn parse_operations(code: &str) -> Result<Vec<MapOperation>, OpError> {
    let operations: Vec<MapOperation> =
        serde_json::from_str(code).map_err(OpError::InvalidPayload)?;

    for (index, op) in operations.iter().enumerate() {
        op.validate().map_err(|reason| OpError::InvalidOperation {
            index,
            op: op.name(),
            reason,
        })?;
    }

    Ok(operations)
}

/// The camera state left behind by the last navigation operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Camera {
    FlyTo {
        center: GeoPoint,
        #[serde(skip_serializing_if = "Option::is_none")]
        zoom: Option<f64>,
    },
    FitBounds { sw: GeoPoint, ne: GeoPoint },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub position: GeoPoint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A named GeoJSON source in the scene.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneSource {
    pub id: String,
    pub data: Value,
}

/// A rendering layer referring to a scene source. `spec` holds the
/// library-specific layer definition (type, paint, source id).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneLayer {
    pub id: String,
    pub spec: Value,
}

/// The in-memory result of applying a validated operation sequence: the
/// camera plus the sources, layers and markers a front end should render.
///
/// Re-using a source or layer id replaces the earlier entry, matching the
/// "check whether the id already exists" rule the original imposed on
/// generated code.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MapScene {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera: Option<Camera>,
    pub sources: Vec<SceneSource>,
    pub layers: Vec<SceneLayer>,
    pub markers: Vec<Marker>,
    #[serde(skip)]
    circle_count: usize,
}

impl MapScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a scene by applying every operation in order.
    pub fn from_operations(operations: &[MapOperation]) -> Self {
        let mut scene = Self::new();
        for op in operations {
            scene.apply(op);
        }
        scene
    }

    /// Applies one validated operation to the scene.
    pub fn apply(&mut self, operation: &MapOperation) {
        match operation {
            MapOperation::FlyTo { center, zoom } => {
                self.camera = Some(Camera::FlyTo {
                    center: *center,
                    zoom: *zoom,
                });
            }
            MapOperation::FitBounds { sw, ne } => {
                self.camera = Some(Camera::FitBounds { sw: *sw, ne: *ne });
            }
            MapOperation::AddMarker {
                position,
                label,
                color,
            } => {
                self.markers.push(Marker {
                    position: *position,
                    label: label.clone(),
                    color: color.clone(),
                });
            }
            MapOperation::DrawCircle {
                center,
                radius_km,
                vertex_count,
                fill_color,
                fill_opacity,
                line_color,
                line_width,
            } => {
                self.circle_count += 1;
                let n = self.circle_count;
                let source_id = format!("circle-{}-source", n);

                let ring = circle_polygon(
                    *center,
                    *radius_km,
                    vertex_count.unwrap_or(DEFAULT_VERTEX_COUNT),
                );
                self.upsert_source(SceneSource {
                    id: source_id.clone(),
                    data: ring.to_geojson(),
                });

                let fill = fill_color.as_deref().unwrap_or(DEFAULT_CIRCLE_COLOR);
                let line = line_color.as_deref().unwrap_or(DEFAULT_CIRCLE_COLOR);
                self.upsert_layer(SceneLayer {
                    id: format!("circle-{}-fill", n),
                    spec: json!({
                        "type": "fill",
                        "source": source_id,
                        "paint": {
                            "fill-color": fill,
                            "fill-opacity": fill_opacity.unwrap_or(DEFAULT_FILL_OPACITY),
                        },
                    }),
                });
                self.upsert_layer(SceneLayer {
                    id: format!("circle-{}-outline", n),
                    spec: json!({
                        "type": "line",
                        "source": source_id,
                        "paint": {
                            "line-color": line,
                            "line-width": line_width.unwrap_or(DEFAULT_LINE_WIDTH),
                        },
                    }),
                });
            }
            MapOperation::AddGeoJson { id, data } => {
                self.upsert_source(SceneSource {
                    id: id.clone(),
                    data: data.clone(),
                });
            }
            MapOperation::RemoveLayer { id } => {
                self.layers.retain(|layer| layer.id != *id);
                self.sources.retain(|source| source.id != *id);
            }
        }
    }

    /// Serializes the scene for whatever front end renders it.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    fn upsert_source(&mut self, source: SceneSource) {
        if let Some(existing) = self.sources.iter_mut().find(|s| s.id == source.id) {
            *existing = source;
        } else {
            self.sources.push(source);
        }
    }

    fn upsert_layer(&mut self, layer: SceneLayer) {
        if let Some(existing) = self.layers.iter_mut().find(|l| l.id == layer.id) {
            *existing = layer;
        } else {
            self.layers.push(layer);
        }
    }
}
