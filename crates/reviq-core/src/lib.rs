//! Domain model, derived metrics and configuration for RevIQ.

pub mod app_config;
pub mod config;
pub mod distance;
pub mod market;
pub mod metrics;
pub mod report;
pub mod trend;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use market::{
    Competitor, DemandEvent, HistoricalParityPoint, Impact, MarketQuery, MarketSnapshot,
    OtaQuote, Positioning, PricingInsights, PricingStatus, SourceCitation, WebSource,
    PARITY_TOLERANCE_PCT,
};
pub use report::{StrategyKind, StrategyLine, StrategyReport};
pub use trend::synthesize_focused_trend;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
