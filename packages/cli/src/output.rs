//! Human-readable and JSON rendering of resolver results.

use std::fmt::Write as _;

use beavernet_streets::StoreStats;
use beavernet_streets_models::{AddressAnalysis, Intersection};
use serde::Serialize;

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One-line description of an intersection: label, members, and location.
fn describe_intersection(intersection: &Intersection) -> String {
    let name = intersection.name.as_deref().unwrap_or("(unnamed)");
    let members = intersection.members.join(" / ");
    let location = intersection.coordinates.map_or_else(
        || "no location".to_string(),
        |c| format!("{:.6}, {:.6}", c.latitude, c.longitude),
    );

    format!("{name:<40} [{members}] ({location})")
}

#[must_use]
pub fn format_analysis(analysis: &AddressAnalysis) -> String {
    if analysis.detected_streets.is_empty() {
        return "No known streets found in address.\n".to_string();
    }

    let mut out = format!(
        "Detected streets: {}\n",
        analysis.detected_streets.join(", ")
    );
    if let Some(cross) = &analysis.cross_street {
        writeln!(out, "Cross street:     {cross}").unwrap();
    }

    if analysis.suggested_intersections.is_empty() {
        out.push_str("No matching intersections.\n");
    } else {
        out.push_str("Intersections:\n");
        for intersection in &analysis.suggested_intersections {
            writeln!(out, "  {}", describe_intersection(intersection)).unwrap();
        }
    }

    out
}

pub fn print_streets(streets: &[String], json: bool) -> Result<(), serde_json::Error> {
    if json {
        return print_json(streets);
    }
    if streets.is_empty() {
        println!("No matching streets.");
    }
    for street in streets {
        println!("{street}");
    }
    Ok(())
}

pub fn print_analysis(analysis: &AddressAnalysis, json: bool) -> Result<(), serde_json::Error> {
    if json {
        return print_json(analysis);
    }
    print!("{}", format_analysis(analysis));
    Ok(())
}

pub fn print_intersections(
    intersections: &[Intersection],
    json: bool,
) -> Result<(), serde_json::Error> {
    if json {
        return print_json(intersections);
    }
    if intersections.is_empty() {
        println!("No intersections found.");
        return Ok(());
    }
    for intersection in intersections {
        println!("{}", describe_intersection(intersection));
    }
    println!("\n{} intersection(s)", intersections.len());
    Ok(())
}

pub fn print_closest(closest: Option<&Intersection>, json: bool) -> Result<(), serde_json::Error> {
    if json {
        return print_json(&closest);
    }
    match closest {
        Some(intersection) => println!("{}", describe_intersection(intersection)),
        None => println!("No intersection within range."),
    }
    Ok(())
}

pub fn print_stats(stats: &StoreStats, json: bool) -> Result<(), serde_json::Error> {
    if json {
        return print_json(stats);
    }
    if !stats.loaded {
        println!("Datasets failed to load (see log output; set RUST_LOG=warn).");
        return Ok(());
    }
    println!("Street segments: {}", stats.segment_count);
    println!("Intersections:   {}", stats.intersection_count);
    Ok(())
}
