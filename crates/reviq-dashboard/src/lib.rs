//! Fetch lifecycle and presentation state for the RevIQ dashboard.
//!
//! [`Controller`] is the synchronous state machine; [`Dashboard`] drives it
//! against a [`reviq_intel::MarketIntelligence`] provider with per-call
//! timeouts and generation fencing.

pub mod controller;
pub mod dashboard;
pub mod state;

pub use controller::{Controller, PendingDashboard, SubmitOutcome, Ticket};
pub use dashboard::{Dashboard, DashboardOptions};
pub use state::{
    DashboardTab, FailureNotice, LoadedDashboard, LoadingStage, PresentationState, SummaryState,
    ViewState,
};
