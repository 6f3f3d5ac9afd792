//! Address analysis: detected streets, intersection suggestions, and cross
//! street inference.
//!
//! Detection runs in the opposite direction from [`crate::matcher`]: a
//! known street name is detected when it occurs inside the address.
//!
//! Ties resolve by dataset load order. The first detected street is the
//! first matching name in [`StreetData::street_names`] order, and the
//! precise intersection is the first intersection in load order that
//! contains every detected street.

use std::collections::BTreeSet;

use beavernet_streets_models::{AddressAnalysis, Intersection};

use crate::store::StreetData;

/// Maximum number of suggested intersections.
pub const MAX_SUGGESTIONS: usize = 10;

/// Analyses a free-text address.
///
/// 1. Detects every known street name contained in the address
///    (case-insensitive), deduplicated in discovery order.
/// 2. Suggests up to [`MAX_SUGGESTIONS`] intersections having the first
///    detected street as a member (whole-string, case-insensitive).
/// 3. With two or more detected streets, looks for the first intersection
///    where every detected street occurs inside some member. If one
///    exists it becomes the only suggestion, and its first member that is
///    not the first detected street becomes the cross street.
///
/// Blank addresses and addresses with no known street return an empty
/// analysis.
#[must_use]
pub fn analyze_address(data: &StreetData, address: &str) -> AddressAnalysis {
    let normalized = address.trim().to_lowercase();
    if normalized.is_empty() {
        return AddressAnalysis::default();
    }

    let detected_streets = detect_streets(data, &normalized);
    let Some(primary) = detected_streets.first() else {
        return AddressAnalysis::default();
    };
    let primary = primary.trim().to_lowercase();

    if detected_streets.len() >= 2
        && let Some(precise) = find_precise_intersection(data, &detected_streets)
    {
        let cross_street = precise
            .members
            .iter()
            .find(|member| member.trim().to_lowercase() != primary)
            .cloned();

        log::debug!(
            "Address matched intersection {:?}, cross street {cross_street:?}",
            precise.name
        );

        return AddressAnalysis {
            detected_streets,
            suggested_intersections: vec![precise.clone()],
            cross_street,
        };
    }

    let suggested_intersections = data
        .intersections()
        .iter()
        .filter(|intersection| intersection.has_member(&primary))
        .take(MAX_SUGGESTIONS)
        .cloned()
        .collect();

    AddressAnalysis {
        detected_streets,
        suggested_intersections,
        cross_street: None,
    }
}

/// Returns every intersection with a member equal to `street_name`
/// (trimmed, case-insensitive, whole string), in load order.
#[must_use]
pub fn find_intersections_for_street(data: &StreetData, street_name: &str) -> Vec<Intersection> {
    let needle = street_name.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    data.intersections()
        .iter()
        .filter(|intersection| intersection.has_member(&needle))
        .cloned()
        .collect()
}

/// Known street names occurring inside `normalized_address`.
fn detect_streets(data: &StreetData, normalized_address: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut detected = Vec::new();

    for name in data.street_names() {
        if normalized_address.contains(&name.to_lowercase()) && seen.insert(name) {
            detected.push(name.to_string());
        }
    }

    detected
}

/// First intersection in which every detected street occurs inside at
/// least one member.
fn find_precise_intersection<'a>(
    data: &'a StreetData,
    detected_streets: &[String],
) -> Option<&'a Intersection> {
    let needles: Vec<String> = detected_streets
        .iter()
        .map(|street| street.to_lowercase())
        .collect();

    data.intersections().iter().find(|intersection| {
        let members: Vec<String> = intersection
            .members
            .iter()
            .map(|member| member.to_lowercase())
            .collect();

        needles
            .iter()
            .all(|needle| members.iter().any(|member| member.contains(needle.as_str())))
    })
}
