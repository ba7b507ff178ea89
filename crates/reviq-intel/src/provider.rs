use std::future::Future;

use reviq_core::{MarketQuery, MarketSnapshot};

use crate::error::IntelError;

/// Source of market snapshots and strategy summaries.
///
/// [`crate::IntelClient`] is the production implementation; the dashboard
/// controller is generic over this trait so tests can substitute stubs.
pub trait MarketIntelligence: Send + Sync {
    /// Fetches a structured snapshot for the query.
    fn fetch_market_intelligence(
        &self,
        query: &MarketQuery,
    ) -> impl Future<Output = Result<MarketSnapshot, IntelError>> + Send;

    /// Produces the free-text ACTION / TACTIC / YIELD summary for a snapshot.
    fn generate_pricing_report(
        &self,
        snapshot: &MarketSnapshot,
    ) -> impl Future<Output = Result<String, IntelError>> + Send;
}
