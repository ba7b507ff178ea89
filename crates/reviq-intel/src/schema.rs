//! Response schema declared to the provider for the market-data call.
//!
//! Field names and required lists must stay in step with
//! [`reviq_core::MarketSnapshot`]; `sources` is not part of the schema since
//! it comes from grounding metadata.

use serde_json::{json, Value};

/// Builds the OpenAPI-style schema object for `generationConfig.responseSchema`.
#[must_use]
pub fn market_response_schema() -> Value {
    let ota_quote = json!({
        "type": "OBJECT",
        "properties": {
            "platform": { "type": "STRING" },
            "rate": { "type": "NUMBER" },
            "roomType": { "type": "STRING" },
            "cancellationPolicy": { "type": "STRING" },
            "breakfast": { "type": "BOOLEAN" },
            "visibilityScore": { "type": "NUMBER" },
            "parityGap": { "type": "NUMBER" }
        }
    });

    let competitor = json!({
        "type": "OBJECT",
        "properties": {
            "id": { "type": "STRING" },
            "name": { "type": "STRING" },
            "category": { "type": "STRING" },
            "starLevel": { "type": "NUMBER" },
            "distance": { "type": "STRING" },
            "currentRate": { "type": "NUMBER" },
            "rating": { "type": "NUMBER" },
            "reviewCount": { "type": "NUMBER" },
            "positioning": { "type": "STRING" },
            "otaData": { "type": "ARRAY", "items": ota_quote }
        },
        "required": ["name", "currentRate", "distance"]
    });

    let parity_point = json!({
        "type": "OBJECT",
        "properties": {
            "date": { "type": "STRING" },
            "bookingGap": { "type": "NUMBER" },
            "mmtGap": { "type": "NUMBER" },
            "agodaGap": { "type": "NUMBER" }
        },
        "required": ["date", "bookingGap", "mmtGap", "agodaGap"]
    });

    let event = json!({
        "type": "OBJECT",
        "properties": {
            "name": { "type": "STRING" },
            "date": { "type": "STRING" },
            "distance": { "type": "STRING" },
            "impact": { "type": "STRING" },
            "description": { "type": "STRING" },
            "suggestedUplift": { "type": "NUMBER" },
            "category": { "type": "STRING" },
            "recommendedStrategy": { "type": "STRING" }
        }
    });

    let insights = json!({
        "type": "OBJECT",
        "properties": {
            "recommendedBar": { "type": "NUMBER" },
            "cpi": { "type": "NUMBER" },
            "visibilityScore": { "type": "NUMBER" },
            "revenueOpportunity": { "type": "NUMBER" },
            "status": { "type": "STRING" },
            "summary": { "type": "STRING" }
        }
    });

    json!({
        "type": "OBJECT",
        "properties": {
            "competitors": { "type": "ARRAY", "items": competitor },
            "historicalParity": { "type": "ARRAY", "items": parity_point },
            "events": { "type": "ARRAY", "items": event },
            "insights": insights
        },
        "required": ["competitors", "historicalParity", "events", "insights"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required(v: &Value) -> Vec<&str> {
        v["required"]
            .as_array()
            .expect("required array")
            .iter()
            .filter_map(Value::as_str)
            .collect()
    }

    #[test]
    fn top_level_requires_four_fields() {
        let schema = market_response_schema();
        assert_eq!(
            required(&schema),
            ["competitors", "historicalParity", "events", "insights"]
        );
        assert!(schema["properties"].get("sources").is_none());
    }

    #[test]
    fn nested_required_fields_match_model() {
        let schema = market_response_schema();
        let props = &schema["properties"];
        assert_eq!(
            required(&props["competitors"]["items"]),
            ["name", "currentRate", "distance"]
        );
        assert_eq!(
            required(&props["historicalParity"]["items"]),
            ["date", "bookingGap", "mmtGap", "agodaGap"]
        );
        assert!(props["events"]["items"].get("required").is_none());
        assert_eq!(
            props["competitors"]["items"]["properties"]["otaData"]["items"]["properties"]
                ["parityGap"]["type"],
            "NUMBER"
        );
    }
}
