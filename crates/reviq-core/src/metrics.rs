//! Derived views over a [`MarketSnapshot`].
//!
//! Every function here is pure and borrows the snapshot read-only; callers
//! own the results. The randomised per-property trend lives in
//! [`crate::trend`] because it is the one non-deterministic view.

use serde::Serialize;

use crate::distance::parse_distance_km;
use crate::market::{
    Competitor, DemandEvent, HistoricalParityPoint, MarketSnapshot, SourceCitation, WebSource,
};

/// Number of events shown in the overview demand pulse.
pub const DEMAND_PREVIEW_LIMIT: usize = 8;

/// Number of grounding links shown under the market report.
pub const SOURCE_PREVIEW_LIMIT: usize = 3;

/// Competitors with at least one OTA quote outside the parity tolerance,
/// in their original order.
#[must_use]
pub fn violating_competitors(snapshot: &MarketSnapshot) -> Vec<&Competitor> {
    snapshot
        .competitors
        .iter()
        .filter(|c| c.is_parity_violator())
        .collect()
}

/// Number of parity violators ("leakage points").
#[must_use]
pub fn violation_count(snapshot: &MarketSnapshot) -> usize {
    snapshot
        .competitors
        .iter()
        .filter(|c| c.is_parity_violator())
        .count()
}

/// Index of the competitor highlighted by default: the first violator, else
/// the first competitor, else `None` for an empty compset.
#[must_use]
pub fn default_focus_index(snapshot: &MarketSnapshot) -> Option<usize> {
    snapshot
        .competitors
        .iter()
        .position(Competitor::is_parity_violator)
        .or_else(|| (!snapshot.competitors.is_empty()).then_some(0))
}

/// Competitor highlighted by default. See [`default_focus_index`].
#[must_use]
pub fn default_focus(snapshot: &MarketSnapshot) -> Option<&Competitor> {
    default_focus_index(snapshot).and_then(|i| snapshot.competitors.get(i))
}

/// Largest absolute parity gap across a competitor's quotes; `0.0` with none.
#[must_use]
pub fn max_variance(competitor: &Competitor) -> f64 {
    competitor
        .ota_data
        .iter()
        .map(|q| q.parity_gap.abs())
        .fold(0.0, f64::max)
}

/// Highest suggested uplift across events.
///
/// An empty event list means there is no uplift opportunity and yields `0.0`.
/// Negative uplifts are reported as-is when every event is negative.
#[must_use]
pub fn rollup_uplift(events: &[DemandEvent]) -> f64 {
    events
        .iter()
        .map(|e| e.suggested_uplift)
        .reduce(f64::max)
        .unwrap_or(0.0)
}

/// Mean parity gap per OTA channel over the trend window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ChannelAverages {
    pub booking: f64,
    pub mmt: f64,
    pub agoda: f64,
}

impl ChannelAverages {
    /// Mean of the absolute channel averages; the "market gap" headline.
    #[must_use]
    pub fn overall_abs(&self) -> f64 {
        (self.booking.abs() + self.mmt.abs() + self.agoda.abs()) / 3.0
    }
}

#[must_use]
pub fn channel_averages(trend: &[HistoricalParityPoint]) -> ChannelAverages {
    if trend.is_empty() {
        return ChannelAverages::default();
    }
    #[allow(clippy::cast_precision_loss)]
    let n = trend.len() as f64;
    let (booking, mmt, agoda) = trend.iter().fold((0.0, 0.0, 0.0), |acc, p| {
        (acc.0 + p.booking_gap, acc.1 + p.mmt_gap, acc.2 + p.agoda_gap)
    });
    ChannelAverages {
        booking: booking / n,
        mmt: mmt / n,
        agoda: agoda / n,
    }
}

/// One bar in the competitive rate map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatePoint {
    pub label: String,
    pub rate: f64,
}

/// Chart series of competitor rates, labelled with the first two words of
/// each name.
#[must_use]
pub fn rate_map_series(competitors: &[Competitor]) -> Vec<RatePoint> {
    competitors
        .iter()
        .map(|c| RatePoint {
            label: c
                .name
                .split_whitespace()
                .take(2)
                .collect::<Vec<_>>()
                .join(" "),
            rate: c.current_rate,
        })
        .collect()
}

#[must_use]
pub fn demand_preview(events: &[DemandEvent], limit: usize) -> &[DemandEvent] {
    &events[..events.len().min(limit)]
}

/// The first `limit` citations that carry a web reference.
#[must_use]
pub fn grounding_links(sources: &[SourceCitation], limit: usize) -> Vec<&WebSource> {
    sources
        .iter()
        .filter_map(|s| s.web.as_ref())
        .take(limit)
        .collect()
}

/// Keeps competitors whose stated distance is within `max_km`.
///
/// Distances that cannot be parsed are kept and logged.
#[must_use]
pub fn within_radius(competitors: Vec<Competitor>, max_km: f64) -> Vec<Competitor> {
    competitors
        .into_iter()
        .filter(|c| match parse_distance_km(&c.distance) {
            Some(km) if km > max_km => {
                tracing::info!(
                    competitor = %c.name,
                    distance = %c.distance,
                    max_km,
                    "dropping competitor outside configured radius"
                );
                false
            }
            Some(_) => true,
            None => {
                tracing::warn!(
                    competitor = %c.name,
                    distance = %c.distance,
                    "unparseable competitor distance; keeping"
                );
                true
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "metrics_test.rs"]
mod tests;
