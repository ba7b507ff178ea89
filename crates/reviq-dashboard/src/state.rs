//! View state types for the dashboard lifecycle.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use reviq_core::metrics::{self, ChannelAverages};
use reviq_core::{Competitor, MarketQuery, MarketSnapshot, StrategyReport};
use reviq_intel::{FailureKind, IntelError};
use serde::Serialize;

/// Dismissible error shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureNotice {
    #[serde(serialize_with = "serialize_kind")]
    pub kind: FailureKind,
    pub message: String,
}

fn serialize_kind<S: serde::Serializer>(kind: &FailureKind, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(kind)
}

impl From<&IntelError> for FailureNotice {
    fn from(err: &IntelError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Outcome of the strategy-summary call for a loaded snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum SummaryState {
    Ready(StrategyReport),
    Unavailable(FailureNotice),
}

/// A fully fetched dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedDashboard {
    pub query: MarketQuery,
    pub snapshot: MarketSnapshot,
    /// Index into `snapshot.competitors`.
    pub focus: Option<usize>,
    pub summary: SummaryState,
    pub fetched_at: DateTime<Utc>,
}

impl LoadedDashboard {
    #[must_use]
    pub fn focused(&self) -> Option<&Competitor> {
        self.focus.and_then(|i| self.snapshot.competitors.get(i))
    }

    #[must_use]
    pub fn violations(&self) -> Vec<&Competitor> {
        metrics::violating_competitors(&self.snapshot)
    }

    #[must_use]
    pub fn max_uplift(&self) -> f64 {
        metrics::rollup_uplift(&self.snapshot.events)
    }

    #[must_use]
    pub fn channel_averages(&self) -> ChannelAverages {
        metrics::channel_averages(&self.snapshot.historical_parity)
    }

    #[must_use]
    pub fn report(&self) -> Option<&StrategyReport> {
        match &self.summary {
            SummaryState::Ready(report) => Some(report),
            SummaryState::Unavailable(_) => None,
        }
    }
}

/// Fetch lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewState {
    Idle,
    Loading {
        generation: u64,
        query: MarketQuery,
        stage: LoadingStage,
    },
    Loaded(LoadedDashboard),
    Failed {
        notice: FailureNotice,
        /// Last successful dashboard, kept so dismissing the error restores it.
        last_loaded: Option<LoadedDashboard>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadingStage {
    MarketData,
    Summary,
}

impl ViewState {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading { .. })
    }

    #[must_use]
    pub fn loaded(&self) -> Option<&LoadedDashboard> {
        match self {
            ViewState::Loaded(dashboard) => Some(dashboard),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardTab {
    #[default]
    Overview,
    Competitors,
    Pricing,
    Demand,
}

impl DashboardTab {
    pub const ALL: [DashboardTab; 4] = [
        DashboardTab::Overview,
        DashboardTab::Competitors,
        DashboardTab::Pricing,
        DashboardTab::Demand,
    ];

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            DashboardTab::Overview => "Overview",
            DashboardTab::Competitors => "Competitors",
            DashboardTab::Pricing => "Pricing",
            DashboardTab::Demand => "Demand",
        }
    }
}

/// UI-local state layered on top of the fetch lifecycle.
///
/// Nothing here triggers a fetch. Everything except the active tab is reset
/// when a new query starts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PresentationState {
    pub active_tab: DashboardTab,
    pub expanded_events: BTreeSet<usize>,
    /// Competitor index whose violation detail is open.
    pub violation_detail: Option<usize>,
    /// Operator-selected competitor; overrides the dashboard's default focus.
    pub manual_focus: Option<usize>,
}
