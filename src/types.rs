// src/types.rs

use serde::{Deserialize, Serialize};

use crate::ops::{parse_operations, MapOperation, OpError};

/// A longitude/latitude pair in the shape the mapping library reports it.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

/// The visible bounding box. The underscore field names are what the mapping
/// library serializes, so they are kept on the wire.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct MapBounds {
    #[serde(rename = "_sw")]
    pub sw: LngLat,
    #[serde(rename = "_ne")]
    pub ne: LngLat,
}

/// The map viewport the browser posts alongside the user's request: center,
/// zoom level and visible bounds.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct MapState {
    pub center: LngLat,
    pub zoom: f64,
    pub bounds: MapBounds,
}

/// Inbound request body for the map-command endpoint.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MapCommandRequest {
    pub prompt: String,
    pub map_state: MapState,
}

/// Successful reply: the validated operation payload plus an explanation for
/// the user. `code` parses as a JSON array of [`MapOperation`]s; thin front
/// ends may forward it unchanged.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MapCommandReply {
    pub code: String,
    pub explanation: String,
}

impl MapCommandReply {
    /// Re-parses the carried payload into typed operations.
    pub fn operations(&self) -> Result<Vec<MapOperation>, OpError> {
        parse_operations(&self.code)
    }
}

/// Error body shape for non-2xx replies.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ErrorReply {
    pub error: String,
}

impl ErrorReply {
    pub fn new(message: impl Into<String>) -> Self {
        ErrorReply {
            error: message.into(),
        }
    }
}
