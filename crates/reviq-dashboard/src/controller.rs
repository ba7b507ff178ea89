//! Synchronous state machine behind [`crate::Dashboard`].
//!
//! Every transition is a plain method so the lifecycle can be driven and
//! tested without a runtime. The async driver only awaits the provider between
//! [`Controller::begin`], [`Controller::apply_snapshot`] and
//! [`Controller::apply_summary`].

use chrono::Utc;
use rand::Rng;
use reviq_core::metrics::{
    default_focus_index, demand_preview, within_radius, DEMAND_PREVIEW_LIMIT,
};
use reviq_core::{
    synthesize_focused_trend, Competitor, HistoricalParityPoint, MarketQuery, MarketSnapshot,
    StrategyReport,
};
use reviq_intel::{FailureKind, IntelError};

use crate::state::{
    DashboardTab, FailureNotice, LoadedDashboard, LoadingStage, PresentationState, SummaryState,
    ViewState,
};

/// Result of one submission as seen by the caller that started it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Snapshot and summary both arrived.
    Loaded,
    /// Snapshot arrived; the summary call failed.
    SummaryUnavailable,
    /// The submission ended in [`ViewState::Failed`].
    Failed(FailureKind),
    /// A newer submission was issued before this one finished.
    Superseded,
}

/// Handle for one in-flight submission.
#[derive(Debug, Clone)]
pub struct Ticket {
    generation: u64,
    query: MarketQuery,
}

impl Ticket {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn query(&self) -> &MarketQuery {
        &self.query
    }
}

/// Snapshot accepted for a ticket, waiting on its summary.
#[derive(Debug, Clone)]
pub struct PendingDashboard {
    pub snapshot: MarketSnapshot,
    pub focus: Option<usize>,
}

#[derive(Debug)]
pub struct Controller {
    view: ViewState,
    presentation: PresentationState,
    latest_generation: u64,
    last_loaded: Option<LoadedDashboard>,
    compset_max_distance_km: Option<f64>,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Controller {
    #[must_use]
    pub fn new(compset_max_distance_km: Option<f64>) -> Self {
        Self {
            view: ViewState::Idle,
            presentation: PresentationState::default(),
            latest_generation: 0,
            last_loaded: None,
            compset_max_distance_km,
        }
    }

    #[must_use]
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    #[must_use]
    pub fn presentation(&self) -> &PresentationState {
        &self.presentation
    }

    #[must_use]
    pub fn latest_generation(&self) -> u64 {
        self.latest_generation
    }

    /// Starts a submission.
    ///
    /// Every call issues a new generation, so a blank query also supersedes
    /// whatever is in flight.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitOutcome::Failed`] with [`FailureKind::EmptyInput`] when
    /// either field is blank. The view moves to `Failed` and the last loaded
    /// dashboard is kept.
    pub fn begin(&mut self, query: MarketQuery) -> Result<Ticket, SubmitOutcome> {
        self.latest_generation += 1;
        let generation = self.latest_generation;

        if let Some(field) = query.blank_field() {
            let err = IntelError::EmptyInput { field };
            tracing::info!(generation, field, "rejecting blank query");
            return Err(self.fail(&err));
        }

        tracing::info!(
            generation,
            hotel = %query.hotel_name,
            city = %query.city,
            "submitting market query"
        );

        let active_tab = self.presentation.active_tab;
        self.presentation = PresentationState {
            active_tab,
            ..PresentationState::default()
        };
        self.view = ViewState::Loading {
            generation,
            query: query.clone(),
            stage: LoadingStage::MarketData,
        };
        Ok(Ticket { generation, query })
    }

    #[must_use]
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        ticket.generation == self.latest_generation
    }

    /// Applies the structured response for `ticket`.
    ///
    /// On success the optional radius filter runs, the default focus is
    /// chosen, and the returned [`PendingDashboard`] should be passed to
    /// [`Controller::apply_summary`] once the summary call finishes.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitOutcome::Superseded`] for a stale ticket (the state is
    /// untouched), or [`SubmitOutcome::Failed`] when `result` is an error.
    pub fn apply_snapshot(
        &mut self,
        ticket: &Ticket,
        result: Result<MarketSnapshot, IntelError>,
    ) -> Result<PendingDashboard, SubmitOutcome> {
        if !self.is_current(ticket) {
            self.discard_stale(ticket, "market intelligence");
            return Err(SubmitOutcome::Superseded);
        }

        let mut snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(
                    generation = ticket.generation,
                    error = %e,
                    "market intelligence failed"
                );
                return Err(self.fail(&e));
            }
        };

        if let Some(max_km) = self.compset_max_distance_km {
            snapshot.competitors = within_radius(snapshot.competitors, max_km);
        }
        let focus = default_focus_index(&snapshot);

        self.view = ViewState::Loading {
            generation: ticket.generation,
            query: ticket.query.clone(),
            stage: LoadingStage::Summary,
        };
        Ok(PendingDashboard { snapshot, focus })
    }

    /// Applies the summary response and moves to `Loaded`.
    ///
    /// A failed summary still loads the snapshot, with the failure recorded in
    /// [`SummaryState::Unavailable`].
    pub fn apply_summary(
        &mut self,
        ticket: &Ticket,
        pending: PendingDashboard,
        result: Result<String, IntelError>,
    ) -> SubmitOutcome {
        if !self.is_current(ticket) {
            self.discard_stale(ticket, "pricing report");
            return SubmitOutcome::Superseded;
        }

        let (summary, outcome) = match result {
            Ok(raw) => (
                SummaryState::Ready(StrategyReport::parse(&raw)),
                SubmitOutcome::Loaded,
            ),
            Err(e) => {
                tracing::warn!(
                    generation = ticket.generation,
                    error = %e,
                    "pricing report failed"
                );
                (
                    SummaryState::Unavailable(FailureNotice::from(&e)),
                    SubmitOutcome::SummaryUnavailable,
                )
            }
        };

        let dashboard = LoadedDashboard {
            query: ticket.query.clone(),
            snapshot: pending.snapshot,
            focus: pending.focus,
            summary,
            fetched_at: Utc::now(),
        };
        tracing::info!(
            generation = ticket.generation,
            competitors = dashboard.snapshot.competitors.len(),
            violations = dashboard.violations().len(),
            "dashboard loaded"
        );
        self.last_loaded = Some(dashboard.clone());
        self.view = ViewState::Loaded(dashboard);
        outcome
    }

    /// Clears a `Failed` view, restoring the last dashboard or `Idle`.
    ///
    /// Returns `false` if there was no error to dismiss.
    pub fn dismiss_error(&mut self) -> bool {
        if !matches!(self.view, ViewState::Failed { .. }) {
            return false;
        }
        self.view = match &self.last_loaded {
            Some(dashboard) => ViewState::Loaded(dashboard.clone()),
            None => ViewState::Idle,
        };
        true
    }

    pub fn select_tab(&mut self, tab: DashboardTab) {
        self.presentation.active_tab = tab;
    }

    /// Expands or collapses the event at `index` within the demand preview.
    /// Returns the new expanded state, or `None` if the preview has no such
    /// event.
    pub fn toggle_event(&mut self, index: usize) -> Option<bool> {
        let events = &self.view.loaded()?.snapshot.events;
        let count = demand_preview(events, DEMAND_PREVIEW_LIMIT).len();
        if index >= count {
            return None;
        }
        let expanded = &mut self.presentation.expanded_events;
        if expanded.remove(&index) {
            Some(false)
        } else {
            expanded.insert(index);
            Some(true)
        }
    }

    /// Opens the violation detail for a violating competitor.
    pub fn open_violation_detail(&mut self, index: usize) -> bool {
        let is_violator = self
            .view
            .loaded()
            .and_then(|d| d.snapshot.competitors.get(index))
            .is_some_and(Competitor::is_parity_violator);
        if is_violator {
            self.presentation.violation_detail = Some(index);
        }
        is_violator
    }

    /// Closes the violation detail. Nothing else changes.
    pub fn acknowledge_violation(&mut self) {
        self.presentation.violation_detail = None;
    }

    /// Focuses the competitor at `index` if it exists in the loaded snapshot.
    pub fn select_focus(&mut self, index: usize) -> bool {
        let in_range = self
            .view
            .loaded()
            .is_some_and(|d| index < d.snapshot.competitors.len());
        if in_range {
            self.presentation.manual_focus = Some(index);
        }
        in_range
    }

    /// Manual focus if set, otherwise the dashboard's default focus.
    #[must_use]
    pub fn focused_competitor(&self) -> Option<&Competitor> {
        let dashboard = self.view.loaded()?;
        match self.presentation.manual_focus {
            Some(index) => dashboard.snapshot.competitors.get(index),
            None => dashboard.focused(),
        }
    }

    /// Parity trend for the focused competitor, or `None` when nothing is loaded.
    pub fn focused_trend<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Option<Vec<HistoricalParityPoint>> {
        let dashboard = self.view.loaded()?;
        Some(synthesize_focused_trend(
            &dashboard.snapshot.historical_parity,
            self.focused_competitor(),
            rng,
        ))
    }

    fn fail(&mut self, err: &IntelError) -> SubmitOutcome {
        let notice = FailureNotice::from(err);
        let kind = notice.kind;
        self.view = ViewState::Failed {
            notice,
            last_loaded: self.last_loaded.clone(),
        };
        SubmitOutcome::Failed(kind)
    }

    fn discard_stale(&self, ticket: &Ticket, stage: &str) {
        tracing::debug!(
            generation = ticket.generation,
            latest = self.latest_generation,
            stage,
            "discarding stale response"
        );
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
