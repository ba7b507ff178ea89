//! Parsing of free-text distances returned by the provider.

use std::sync::LazyLock;

use regex::Regex;

static DISTANCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:~|approx\.?\s*)?(\d+(?:\.\d+)?)\s*(km|kms|kilometers?|kilometres?|m|meters?|metres?|mi|miles?)\b")
        .expect("valid distance regex")
});

const KM_PER_MILE: f64 = 1.609_344;

/// Parses strings like `"1.2 km"`, `"800 m"` or `"0.5 miles"` into kilometres.
///
/// Returns `None` when no leading number with a recognised unit is found.
#[must_use]
pub fn parse_distance_km(raw: &str) -> Option<f64> {
    let caps = DISTANCE_RE.captures(raw)?;
    let value: f64 = caps.get(1)?.as_str().parse().ok()?;
    let unit = caps.get(2)?.as_str().to_ascii_lowercase();
    let km = if unit.starts_with('k') {
        value
    } else if unit.starts_with("mi") {
        value * KM_PER_MILE
    } else {
        value / 1_000.0
    };
    Some(km)
}
