//! Converts raw `GeoJSON` features into [`StreetSegment`] and
//! [`Intersection`] records.
//!
//! Uses the source's field mapping to read each record's properties,
//! regardless of the layer's property naming. Missing, null, blank, or
//! wrongly-typed properties become `None` rather than rejecting the
//! feature; only features that are not JSON objects are skipped.

use beavernet_streets_models::{
    Coordinates, Intersection, IntersectionFieldMapping, MAX_INTERSECTION_MEMBERS,
    StreetFieldMapping, StreetSegment,
};

/// Converts street-name index features into segments, in feature order.
#[must_use]
pub fn parse_segments(
    features: &[serde_json::Value],
    fields: &StreetFieldMapping,
) -> Vec<StreetSegment> {
    features
        .iter()
        .filter_map(|feature| parse_segment(feature, fields))
        .collect()
}

/// Converts road-intersection index features into intersections, in
/// feature order.
#[must_use]
pub fn parse_intersections(
    features: &[serde_json::Value],
    fields: &IntersectionFieldMapping,
) -> Vec<Intersection> {
    features
        .iter()
        .filter_map(|feature| parse_intersection(feature, fields))
        .collect()
}

fn parse_segment(
    feature: &serde_json::Value,
    fields: &StreetFieldMapping,
) -> Option<StreetSegment> {
    if !feature.is_object() {
        log::trace!("Skipping non-object street feature: {feature}");
        return None;
    }
    let props = &feature["properties"];

    Some(StreetSegment {
        object_id: int_prop(props, &fields.object_id),
        street: text_prop(props, &fields.street),
        street_behind: text_prop(props, &fields.street_behind),
        street_ahead: text_prop(props, &fields.street_ahead),
        status: text_prop(props, &fields.status),
        owner: text_prop(props, &fields.owner),
    })
}

fn parse_intersection(
    feature: &serde_json::Value,
    fields: &IntersectionFieldMapping,
) -> Option<Intersection> {
    if !feature.is_object() {
        log::trace!("Skipping non-object intersection feature: {feature}");
        return None;
    }
    let props = &feature["properties"];

    let members = fields
        .members
        .iter()
        .take(MAX_INTERSECTION_MEMBERS)
        .filter_map(|field| text_prop(props, field))
        .collect();

    Some(Intersection {
        object_id: int_prop(props, &fields.object_id),
        name: text_prop(props, &fields.name),
        members,
        coordinates: point_coordinates(&feature["geometry"]),
        junction_kind: text_prop(props, &fields.junction_kind),
    })
}

/// Reads a string property, treating blank values as absent.
fn text_prop(props: &serde_json::Value, key: &str) -> Option<String> {
    props
        .get(key)
        .and_then(serde_json::Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(ToString::to_string)
}

/// Reads an integer property. Some layers serialize ids as floats or
/// strings, so both are accepted when they hold a whole number.
#[allow(clippy::cast_possible_truncation)]
fn int_prop(props: &serde_json::Value, key: &str) -> Option<i64> {
    let value = props.get(key)?;
    value
        .as_i64()
        .or_else(|| {
            value
                .as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        })
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

/// Reads `geometry.coordinates` as `[longitude, latitude]`.
///
/// A `MultiPoint` geometry contributes its first point.
fn point_coordinates(geometry: &serde_json::Value) -> Option<Coordinates> {
    let coords = &geometry["coordinates"];
    let pair = if coords[0].is_array() {
        &coords[0]
    } else {
        coords
    };

    let coordinates = Coordinates {
        longitude: pair[0].as_f64()?,
        latitude: pair[1].as_f64()?,
    };

    coordinates.is_finite().then_some(coordinates)
}
