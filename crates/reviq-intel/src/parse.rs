//! Decoding of the structured market-data response text.

use reviq_core::{MarketSnapshot, SourceCitation};

use crate::error::IntelError;

/// Removes a surrounding Markdown code fence (```` ```json ```` or ```` ``` ````).
#[must_use]
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let body = body.strip_suffix("```").unwrap_or(body);
    body.trim()
}

/// Parses provider text into a snapshot and attaches grounding citations.
///
/// Empty text is treated as `{}`, which fails on the missing top-level
/// fields.
///
/// # Errors
///
/// Returns [`IntelError::MalformedResponse`] if the text is not a JSON object
/// with `competitors`, `historicalParity`, `events` and `insights`.
pub fn parse_snapshot(
    text: &str,
    sources: Vec<SourceCitation>,
) -> Result<MarketSnapshot, IntelError> {
    let body = strip_code_fence(text);
    let body = if body.is_empty() { "{}" } else { body };
    let mut snapshot: MarketSnapshot =
        serde_json::from_str(body).map_err(|e| IntelError::MalformedResponse {
            context: "market snapshot".to_owned(),
            source: e,
        })?;
    snapshot.sources = sources;
    Ok(snapshot)
}
