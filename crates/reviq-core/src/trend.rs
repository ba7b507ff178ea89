//! Per-property parity trend synthesis.
//!
//! The provider only returns a market-average parity trend. To give the
//! focused competitor a visibly distinct line, each gap is jittered by an
//! independent uniform sample in `[-JITTER_PCT, +JITTER_PCT]`.
//!
//! The output is **non-deterministic** unless the caller passes a seeded RNG;
//! tests should assert bounds, not exact values.

use rand::Rng;

use crate::market::{Competitor, HistoricalParityPoint};

/// Maximum absolute perturbation applied to each gap, in percentage points.
pub const JITTER_PCT: f64 = 1.0;

/// Returns a jittered copy of `aggregate` for the focused competitor.
///
/// With no focus the aggregate is returned unchanged. Labels and length are
/// always preserved.
pub fn synthesize_focused_trend<R>(
    aggregate: &[HistoricalParityPoint],
    focus: Option<&Competitor>,
    rng: &mut R,
) -> Vec<HistoricalParityPoint>
where
    R: Rng + ?Sized,
{
    if focus.is_none() {
        return aggregate.to_vec();
    }

    aggregate
        .iter()
        .map(|p| HistoricalParityPoint {
            date: p.date.clone(),
            booking_gap: p.booking_gap + rng.random_range(-JITTER_PCT..=JITTER_PCT),
            mmt_gap: p.mmt_gap + rng.random_range(-JITTER_PCT..=JITTER_PCT),
            agoda_gap: p.agoda_gap + rng.random_range(-JITTER_PCT..=JITTER_PCT),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn trend() -> Vec<HistoricalParityPoint> {
        (0..7)
            .map(|i| HistoricalParityPoint {
                date: format!("Day {}", i + 1),
                booking_gap: f64::from(i) * 0.5,
                mmt_gap: -1.5,
                agoda_gap: 3.0 - f64::from(i),
            })
            .collect()
    }

    fn focus() -> Competitor {
        serde_json::from_value(serde_json::json!({
            "name": "Vivanta President",
            "distance": "1.5 km",
            "currentRate": 9900
        }))
        .unwrap()
    }

    #[test]
    fn output_stays_within_jitter_band() {
        let aggregate = trend();
        let focus = focus();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let out = synthesize_focused_trend(&aggregate, Some(&focus), &mut rng);
            assert_eq!(out.len(), aggregate.len());
            for (o, a) in out.iter().zip(&aggregate) {
                assert_eq!(o.date, a.date);
                assert!((o.booking_gap - a.booking_gap).abs() <= JITTER_PCT);
                assert!((o.mmt_gap - a.mmt_gap).abs() <= JITTER_PCT);
                assert!((o.agoda_gap - a.agoda_gap).abs() <= JITTER_PCT);
            }
        }
    }

    #[test]
    fn same_seed_reproduces_series() {
        let aggregate = trend();
        let focus = focus();
        let a = synthesize_focused_trend(&aggregate, Some(&focus), &mut StdRng::seed_from_u64(7));
        let b = synthesize_focused_trend(&aggregate, Some(&focus), &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn no_focus_returns_aggregate() {
        let aggregate = trend();
        let out = synthesize_focused_trend(&aggregate, None, &mut StdRng::seed_from_u64(1));
        assert_eq!(out, aggregate);
    }

    #[test]
    fn empty_trend_stays_empty() {
        let focus = focus();
        let out = synthesize_focused_trend(&[], Some(&focus), &mut StdRng::seed_from_u64(1));
        assert!(out.is_empty());
    }
}
