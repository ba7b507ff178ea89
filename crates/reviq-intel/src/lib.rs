//! Intelligence client for RevIQ.
//!
//! Translates a [`reviq_core::MarketQuery`] into two calls against a hosted
//! generative model: a schema-constrained market snapshot and a free-text
//! strategy summary built from that snapshot.

pub mod client;
pub mod error;
pub mod parse;
pub mod prompt;
pub mod provider;
pub mod schema;

mod types;

pub use client::IntelClient;
pub use error::{FailureKind, IntelError};
pub use parse::{parse_snapshot, strip_code_fence};
pub use provider::MarketIntelligence;
pub use schema::market_response_schema;
