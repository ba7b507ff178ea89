//! Async driver that runs a submission against a [`MarketIntelligence`]
//! provider and feeds the results through the [`Controller`].

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use reviq_core::config::{DEFAULT_CITY, DEFAULT_HOTEL};
use reviq_core::{AppConfig, HistoricalParityPoint, MarketQuery};
use reviq_intel::{IntelError, MarketIntelligence};

use crate::controller::{Controller, SubmitOutcome};
use crate::state::{PresentationState, ViewState};

const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct DashboardOptions {
    /// Upper bound on each provider call.
    pub call_timeout: Duration,
    pub compset_max_distance_km: Option<f64>,
    /// Seed for the focused-trend RNG. `None` seeds from the OS.
    pub rng_seed: Option<u64>,
    /// Query submitted by [`Dashboard::mount`].
    pub default_query: MarketQuery,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            call_timeout: DEFAULT_CALL_TIMEOUT,
            compset_max_distance_km: None,
            rng_seed: None,
            default_query: MarketQuery::new(DEFAULT_HOTEL, DEFAULT_CITY),
        }
    }
}

impl DashboardOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            call_timeout: Duration::from_secs(config.request_timeout_secs),
            compset_max_distance_km: config.compset_max_distance_km,
            rng_seed: None,
            default_query: MarketQuery::new(&config.default_hotel, &config.default_city),
        }
    }

    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }
}

/// Market dashboard bound to one intelligence provider.
///
/// Methods take `&self`, so several submissions may run concurrently; the
/// controller's generation fencing decides which one lands. The controller
/// lock is never held across a provider call.
pub struct Dashboard<P> {
    provider: P,
    controller: Mutex<Controller>,
    rng: Mutex<StdRng>,
    call_timeout: Duration,
    default_query: MarketQuery,
}

impl<P: MarketIntelligence> Dashboard<P> {
    pub fn new(provider: P, options: DashboardOptions) -> Self {
        let rng = match options.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            provider,
            controller: Mutex::new(Controller::new(options.compset_max_distance_km)),
            rng: Mutex::new(rng),
            call_timeout: options.call_timeout,
            default_query: options.default_query,
        }
    }

    /// Submits the configured default query.
    pub async fn mount(&self) -> SubmitOutcome {
        self.submit(self.default_query.clone()).await
    }

    /// Runs one full submission: market snapshot, then strategy summary.
    pub async fn submit(&self, query: MarketQuery) -> SubmitOutcome {
        let begun = self.controller().begin(query);
        let ticket = match begun {
            Ok(ticket) => ticket,
            Err(outcome) => return outcome,
        };

        let fetched = self
            .bounded(
                "market intelligence",
                self.provider.fetch_market_intelligence(ticket.query()),
            )
            .await;
        let applied = self.controller().apply_snapshot(&ticket, fetched);
        let pending = match applied {
            Ok(pending) => pending,
            Err(outcome) => return outcome,
        };

        let summary = self
            .bounded(
                "pricing report",
                self.provider.generate_pricing_report(&pending.snapshot),
            )
            .await;
        self.controller().apply_summary(&ticket, pending, summary)
    }

    #[must_use]
    pub fn state(&self) -> ViewState {
        self.controller().view().clone()
    }

    #[must_use]
    pub fn presentation(&self) -> PresentationState {
        self.controller().presentation().clone()
    }

    /// Runs `f` against the controller for presentation-only changes.
    pub fn with_controller<R>(&self, f: impl FnOnce(&mut Controller) -> R) -> R {
        f(&mut self.controller())
    }

    /// Jittered parity trend for the focused competitor.
    #[must_use]
    pub fn focused_trend(&self) -> Option<Vec<HistoricalParityPoint>> {
        let controller = self.controller();
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        controller.focused_trend(&mut *rng)
    }

    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn controller(&self) -> MutexGuard<'_, Controller> {
        self.controller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    async fn bounded<T>(
        &self,
        context: &str,
        call: impl Future<Output = Result<T, IntelError>>,
    ) -> Result<T, IntelError> {
        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.call_timeout.as_secs(),
                    "{context} call timed out"
                );
                Err(IntelError::ProviderUnavailable {
                    reason: format!(
                        "{context}: no response within {}s",
                        self.call_timeout.as_secs()
                    ),
                })
            }
        }
    }
}
