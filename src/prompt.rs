// src/prompt.rs

use crate::types::MapState;

/// Fixed system instruction sent with every completion request.
///
/// It constrains the model to the strict two-field JSON envelope, with the
/// `code` payload being a JSON array of tagged map operations rather than
/// executable script. Data must be inline; the generated operations never
/// reference external URLs.
pub const SYSTEM_PROMPT: &str = r##"You are a map visualization planner. Translate the user's map request into a sequence of declarative map operations.

Your response must be ONLY valid JSON in exactly this format:
{
  "code": "<a JSON array of operation objects, encoded as a string>",
  "explanation": "Brief explanation of what the operations do"
}

The "code" string must itself parse as a JSON array. Each element is an object carrying an "op" tag plus that operation's arguments. Points are objects with "longitude" (in [-180, 180]) and "latitude" (in [-90, 90]). The supported operations are:
- {"op": "flyTo", "center": <point>, "zoom": <number, optional>}
- {"op": "fitBounds", "sw": <point>, "ne": <point>}
- {"op": "addMarker", "position": <point>, "label": <string, optional>, "color": <"#rrggbb", optional>}
- {"op": "drawCircle", "center": <point>, "radiusKm": <positive number>, "fillColor": <optional>, "fillOpacity": <optional, in [0, 1]>, "lineColor": <optional>, "lineWidth": <optional>}
- {"op": "addGeoJson", "id": <string>, "data": <inline GeoJSON object>}
- {"op": "removeLayer", "id": <string>}

Any operation not in this list is rejected. All data needed for the visualization must be included inline (GeoJSON objects, coordinate values); never reference external URLs. Operations are applied synchronously in order. You may re-use a source or layer id to replace it.

Do not include any text before or after the JSON. The JSON must be parseable as-is."##;

/// Builds the user message embedding the current viewport and the free-text
/// request, following the original template.
pub fn user_message(prompt: &str, map_state: &MapState) -> String {
    format!(
        "The current map state is:\n\
         Center: [{}, {}]\n\
         Zoom: {}\n\
         Bounds: SW [{}, {}], NE [{}, {}]\n\n\
         User request: \"{}\"\n\n\
         Generate the map operations to fulfill this request.",
        map_state.center.lng,
        map_state.center.lat,
        map_state.zoom,
        map_state.bounds.sw.lng,
        map_state.bounds.sw.lat,
        map_state.bounds.ne.lng,
        map_state.bounds.ne.lat,
        prompt,
    )
}
