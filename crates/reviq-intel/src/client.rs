//! HTTP client for the generative provider's `generateContent` endpoint.
//!
//! Issues the two calls the dashboard needs: a schema-constrained market
//! snapshot and a free-text strategy summary. Neither call is retried; any
//! transport or status failure surfaces as [`IntelError::ProviderUnavailable`].

use std::time::Duration;

use reqwest::{Client, Url};
use reviq_core::config::{DEFAULT_PROVIDER_BASE_URL, DEFAULT_USER_AGENT};
use reviq_core::{AppConfig, MarketQuery, MarketSnapshot};

use crate::error::IntelError;
use crate::parse::parse_snapshot;
use crate::prompt::{market_prompt, report_prompt};
use crate::provider::MarketIntelligence;
use crate::schema::market_response_schema;
use crate::types::{
    ApiErrorEnvelope, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    GoogleSearch, Tool,
};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Client for the hosted generative model.
///
/// Use [`IntelClient::from_config`] in the binary, or
/// [`IntelClient::with_base_url`] to point at a mock server in tests.
pub struct IntelClient {
    client: Client,
    api_key: String,
    base_url: Url,
    model: String,
    grounding: bool,
}

impl IntelClient {
    /// Creates a client pointed at the production provider.
    ///
    /// # Errors
    ///
    /// Returns [`IntelError::Setup`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, IntelError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_PROVIDER_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`IntelError::Setup`] if the `reqwest::Client` cannot be built
    /// or `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, IntelError> {
        Self::build(api_key, model, timeout_secs, base_url, DEFAULT_USER_AGENT)
    }

    /// Creates a client from application config.
    ///
    /// # Errors
    ///
    /// Returns [`IntelError::Setup`] if the configured base URL is invalid or
    /// the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, IntelError> {
        Ok(Self::build(
            &config.provider_api_key,
            &config.model,
            config.request_timeout_secs,
            &config.provider_base_url,
            &config.user_agent,
        )?
        .with_grounding(config.grounding_enabled))
    }

    fn build(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
        user_agent: &str,
    ) -> Result<Self, IntelError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()
            .map_err(|e| IntelError::Setup(format!("failed to build HTTP client: {e}")))?;

        // Exactly one trailing slash so `Url::join` appends rather than
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| IntelError::Setup(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            model: model.to_owned(),
            grounding: true,
        })
    }

    /// Enables or disables the search-grounding tool on the market call.
    #[must_use]
    pub fn with_grounding(mut self, enabled: bool) -> Self {
        self.grounding = enabled;
        self
    }

    /// Fetches the structured market snapshot for `query`.
    ///
    /// # Errors
    ///
    /// - [`IntelError::EmptyInput`] if hotel name or city is blank; nothing is sent.
    /// - [`IntelError::ProviderUnavailable`] on network failure, timeout, or non-2xx status.
    /// - [`IntelError::MalformedResponse`] if the envelope or the snapshot
    ///   text does not parse.
    pub async fn fetch_market_intelligence(
        &self,
        query: &MarketQuery,
    ) -> Result<MarketSnapshot, IntelError> {
        if let Some(field) = query.blank_field() {
            return Err(IntelError::EmptyInput { field });
        }

        tracing::info!(
            hotel = %query.hotel_name,
            city = %query.city,
            model = %self.model,
            grounding = self.grounding,
            "requesting market intelligence"
        );

        let mut request = GenerateContentRequest::user_text(market_prompt(query));
        request.generation_config = Some(GenerationConfig {
            response_mime_type: "application/json",
            response_schema: market_response_schema(),
        });
        if self.grounding {
            request.tools.push(Tool {
                google_search: GoogleSearch {},
            });
        }

        let response = self.generate(&request, "market intelligence").await?;
        let text = response.text().unwrap_or_default();
        if text.is_empty() {
            tracing::warn!(
                finish_reason = response.finish_reason().unwrap_or("unknown"),
                "provider returned no text for market intelligence"
            );
        }
        let sources = response.into_grounding_chunks();
        let snapshot = parse_snapshot(&text, sources)?;

        tracing::info!(
            competitors = snapshot.competitors.len(),
            events = snapshot.events.len(),
            trend_points = snapshot.historical_parity.len(),
            sources = snapshot.sources.len(),
            "market intelligence parsed"
        );
        Ok(snapshot)
    }

    /// Requests the free-text strategy summary for `snapshot`.
    ///
    /// The returned text is unvalidated and may be empty.
    ///
    /// # Errors
    ///
    /// - [`IntelError::ProviderUnavailable`] on network failure, timeout, or non-2xx status.
    /// - [`IntelError::MalformedResponse`] if the envelope does not parse.
    pub async fn generate_pricing_report(
        &self,
        snapshot: &MarketSnapshot,
    ) -> Result<String, IntelError> {
        let snapshot_json =
            serde_json::to_string(snapshot).map_err(|e| IntelError::MalformedResponse {
                context: "snapshot serialization for report prompt".to_owned(),
                source: e,
            })?;
        let request = GenerateContentRequest::user_text(report_prompt(&snapshot_json));

        tracing::info!(model = %self.model, "requesting pricing report");
        let response = self.generate(&request, "pricing report").await?;
        Ok(response.text().unwrap_or_default())
    }

    /// `{base}/v1beta/models/{model}:generateContent`
    fn endpoint(&self) -> Result<Url, IntelError> {
        self.base_url
            .join(&format!("v1beta/models/{}:generateContent", self.model))
            .map_err(|e| IntelError::Setup(format!("invalid model '{}': {e}", self.model)))
    }

    /// POSTs `request`, asserts a 2xx status, and decodes the envelope.
    async fn generate(
        &self,
        request: &GenerateContentRequest,
        context: &str,
    ) -> Result<GenerateContentResponse, IntelError> {
        let url = self.endpoint()?;
        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| IntelError::transport(context, &e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| IntelError::transport(context, &e))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|env| match env.error.status {
                    Some(code) => format!("{code}: {}", env.error.message),
                    None => env.error.message,
                })
                .unwrap_or_else(|_| body.chars().take(200).collect());
            tracing::warn!(status = status.as_u16(), %detail, "{context} request rejected");
            return Err(IntelError::ProviderUnavailable {
                reason: format!("{context}: HTTP {}: {detail}", status.as_u16()),
            });
        }

        serde_json::from_str(&body).map_err(|e| IntelError::MalformedResponse {
            context: format!("{context} envelope"),
            source: e,
        })
    }
}

impl MarketIntelligence for IntelClient {
    async fn fetch_market_intelligence(
        &self,
        query: &MarketQuery,
    ) -> Result<MarketSnapshot, IntelError> {
        IntelClient::fetch_market_intelligence(self, query).await
    }

    async fn generate_pricing_report(
        &self,
        snapshot: &MarketSnapshot,
    ) -> Result<String, IntelError> {
        IntelClient::generate_pricing_report(self, snapshot).await
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
