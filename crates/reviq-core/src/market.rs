//! Market snapshot data model.
//!
//! These types mirror the JSON object the intelligence provider is asked to
//! return. Wire names are camelCase. Only the fields the provider schema marks
//! as required are mandatory here; everything else falls back to a default,
//! whether the key is missing or explicitly `null`, so a sparse response still
//! yields a usable snapshot.

use serde::{Deserialize, Deserializer, Serialize};

/// A parity gap whose magnitude exceeds this percentage is a violation.
pub const PARITY_TOLERANCE_PCT: f64 = 2.0;

/// Reads an explicit JSON `null` the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Operator input: the subject property and its city.
///
/// Both strings are passed to the provider verbatim. No trimming or case
/// folding is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketQuery {
    pub hotel_name: String,
    pub city: String,
}

impl MarketQuery {
    #[must_use]
    pub fn new(hotel_name: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            hotel_name: hotel_name.into(),
            city: city.into(),
        }
    }

    /// Returns the name of the first field that is empty after trimming.
    #[must_use]
    pub fn blank_field(&self) -> Option<&'static str> {
        if self.hotel_name.trim().is_empty() {
            Some("hotel_name")
        } else if self.city.trim().is_empty() {
            Some("city")
        } else {
            None
        }
    }
}

/// Declares an enum that deserializes from a known set of labels and keeps
/// anything else as `Other(String)` instead of rejecting the snapshot.
macro_rules! labelled_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Other(String),
        }

        impl $name {
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $label,)+
                    Self::Other(raw) => raw,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::Other(String::new())
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                match raw.as_str() {
                    $($label => Self::$variant,)+
                    _ => Self::Other(raw),
                }
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $($name::$variant => $label.to_string(),)+
                    $name::Other(raw) => raw,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

labelled_enum! {
    /// Market tier of a competitor.
    Positioning {
        Luxury => "Luxury",
        Upscale => "Upscale",
        Midscale => "Midscale",
        Economy => "Economy",
    }
}

labelled_enum! {
    /// Expected demand impact of an event.
    Impact {
        High => "High",
        Medium => "Medium",
        Low => "Low",
    }
}

labelled_enum! {
    /// Overall pricing health of the subject property.
    PricingStatus {
        Critical => "Critical",
        Warning => "Warning",
        Optimal => "Optimal",
    }
}

/// One OTA listing for a competitor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtaQuote {
    #[serde(default, deserialize_with = "null_as_default")]
    pub platform: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rate: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub room_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cancellation_policy: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub breakfast: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub visibility_score: f64,
    /// Signed percentage: positive means the OTA sells above the reference rate.
    #[serde(default, deserialize_with = "null_as_default")]
    pub parity_gap: f64,
}

impl OtaQuote {
    #[must_use]
    pub fn is_violation(&self) -> bool {
        self.parity_gap.abs() > PARITY_TOLERANCE_PCT
    }
}

/// A hotel in the competitive set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competitor {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub positioning: Positioning,
    #[serde(default, deserialize_with = "null_as_default")]
    pub star_level: f64,
    /// Free text such as `"1.2 km"`; see [`crate::distance::parse_distance_km`].
    pub distance: String,
    pub current_rate: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rating: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub review_count: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ota_data: Vec<OtaQuote>,
}

impl Competitor {
    /// `true` if any OTA quote breaches the parity tolerance.
    #[must_use]
    pub fn is_parity_violator(&self) -> bool {
        self.ota_data.iter().any(OtaQuote::is_violation)
    }
}

/// Market-average parity gap per channel on one day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalParityPoint {
    /// Display label; ordering is array order, never parsed as a date.
    pub date: String,
    pub booking_gap: f64,
    pub mmt_gap: f64,
    pub agoda_gap: f64,
}

/// An upcoming demand driver near the property.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemandEvent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub distance: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub impact: Impact,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub suggested_uplift: f64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub recommended_strategy: Option<String>,
}

/// Headline pricing figures for the subject property.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingInsights {
    #[serde(default, deserialize_with = "null_as_default")]
    pub recommended_bar: f64,
    /// Competitor price index, as a percentage.
    #[serde(default, deserialize_with = "null_as_default")]
    pub cpi: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub visibility_score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub revenue_opportunity: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: PricingStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
}

/// Web reference attached to a grounding chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSource {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// A provider-supplied grounding reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCitation {
    #[serde(default)]
    pub web: Option<WebSource>,
}

/// Everything fetched for one query. Replaced wholesale on every submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub competitors: Vec<Competitor>,
    pub historical_parity: Vec<HistoricalParityPoint>,
    pub events: Vec<DemandEvent>,
    pub insights: PricingInsights,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sources: Vec<SourceCitation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(platform: &str, parity_gap: f64) -> OtaQuote {
        OtaQuote {
            platform: platform.to_string(),
            rate: 12_500.0,
            room_type: "Deluxe Room".to_string(),
            cancellation_policy: "Free cancellation".to_string(),
            breakfast: true,
            visibility_score: 82.0,
            parity_gap,
        }
    }

    #[test]
    fn explicit_nulls_in_optional_fields_read_as_defaults() {
        let competitor: Competitor = serde_json::from_str(
            r#"{"id":null,"name":"Trident","distance":"1 km","currentRate":9000,
                "positioning":null,"starLevel":null,"otaData":null}"#,
        )
        .unwrap();
        assert!(competitor.id.is_empty());
        assert_eq!(competitor.positioning, Positioning::default());
        assert!(competitor.ota_data.is_empty());

        let quote: OtaQuote =
            serde_json::from_str(r#"{"platform":"Agoda","parityGap":null,"breakfast":null}"#)
                .unwrap();
        assert!(quote.parity_gap.abs() < f64::EPSILON);
        assert!(!quote.breakfast);

        let event: DemandEvent = serde_json::from_str(
            r#"{"name":"Expo","impact":null,"suggestedUplift":null,"category":null}"#,
        )
        .unwrap();
        assert!(event.suggested_uplift.abs() < f64::EPSILON);
        assert!(event.category.is_none());

        let insights: PricingInsights =
            serde_json::from_str(r#"{"status":null,"summary":null,"cpi":null}"#).unwrap();
        assert_eq!(insights, PricingInsights::default());
    }

    #[test]
    fn required_competitor_fields_reject_null() {
        let result = serde_json::from_str::<Competitor>(
            r#"{"name":"Trident","distance":"1 km","currentRate":null}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn blank_field_reports_hotel_first() {
        assert_eq!(MarketQuery::new("  ", "").blank_field(), Some("hotel_name"));
        assert_eq!(MarketQuery::new("Taj", "\t").blank_field(), Some("city"));
        assert_eq!(MarketQuery::new("Taj", "Mumbai").blank_field(), None);
    }

    #[test]
    fn query_is_not_normalised() {
        let q = MarketQuery::new("  Taj Lands End ", "mumbai");
        assert_eq!(q.hotel_name, "  Taj Lands End ");
        assert_eq!(q.city, "mumbai");
    }

    #[test]
    fn violation_threshold_is_strict() {
        assert!(!quote("Agoda", 2.0).is_violation());
        assert!(!quote("Agoda", -2.0).is_violation());
        assert!(quote("Agoda", 2.01).is_violation());
        assert!(quote("Agoda", -3.5).is_violation());
    }

    #[test]
    fn competitor_requires_name_rate_and_distance() {
        let missing_rate = serde_json::json!({ "name": "Trident", "distance": "1 km" });
        assert!(serde_json::from_value::<Competitor>(missing_rate).is_err());

        let minimal = serde_json::json!({
            "name": "Trident",
            "distance": "1 km",
            "currentRate": 9800
        });
        let c: Competitor = serde_json::from_value(minimal).unwrap();
        assert!(c.ota_data.is_empty());
        assert_eq!(c.positioning, Positioning::default());
        assert!(!c.is_parity_violator());
    }

    #[test]
    fn unknown_labels_are_preserved() {
        let e: DemandEvent = serde_json::from_value(serde_json::json!({
            "name": "Lakme Fashion Week",
            "impact": "Very High"
        }))
        .unwrap();
        assert_eq!(e.impact, Impact::Other("Very High".to_string()));
        assert_eq!(e.impact.to_string(), "Very High");
        assert!(e.category.is_none());

        let p: Positioning = serde_json::from_value(serde_json::json!("Luxury")).unwrap();
        assert_eq!(p, Positioning::Luxury);
    }

    #[test]
    fn snapshot_requires_top_level_fields() {
        let empty = serde_json::json!({});
        assert!(serde_json::from_value::<MarketSnapshot>(empty).is_err());

        let bare = serde_json::json!({
            "competitors": [],
            "historicalParity": [],
            "events": [],
            "insights": {}
        });
        let s: MarketSnapshot = serde_json::from_value(bare).unwrap();
        assert!(s.sources.is_empty());
        assert_eq!(s.insights.status, PricingStatus::default());
    }

    #[test]
    fn snapshot_survives_json_round_trip() {
        let snapshot = MarketSnapshot {
            competitors: vec![Competitor {
                id: "c1".to_string(),
                name: "Vivanta President".to_string(),
                category: "Five Star".to_string(),
                positioning: Positioning::Upscale,
                star_level: 5.0,
                distance: "1.4 km".to_string(),
                current_rate: 11_200.0,
                rating: 4.4,
                review_count: 3_120.0,
                ota_data: vec![quote("Booking.com", 3.2), quote("MMT", -0.5)],
            }],
            historical_parity: vec![HistoricalParityPoint {
                date: "Mon".to_string(),
                booking_gap: 1.5,
                mmt_gap: -2.5,
                agoda_gap: 0.25,
            }],
            events: vec![DemandEvent {
                name: "Mumbai Marathon".to_string(),
                date: "2026-01-18".to_string(),
                distance: "4 km".to_string(),
                impact: Impact::High,
                description: "City-wide road closures".to_string(),
                suggested_uplift: 18.0,
                category: Some("Sports".to_string()),
                recommended_strategy: Some("Implement 2-night MLOS".to_string()),
            }],
            insights: PricingInsights {
                recommended_bar: 14_500.0,
                cpi: 104.0,
                visibility_score: 71.0,
                revenue_opportunity: 320_000.0,
                status: PricingStatus::Warning,
                summary: "Rates trail the compset on weekends.".to_string(),
            },
            sources: vec![
                SourceCitation {
                    web: Some(WebSource {
                        uri: Some("https://example.com/events".to_string()),
                        title: Some("Events".to_string()),
                    }),
                },
                SourceCitation { web: None },
            ],
        };

        let encoded = serde_json::to_string(&snapshot).unwrap();
        assert!(encoded.contains("\"historicalParity\""));
        assert!(encoded.contains("\"parityGap\""));
        let decoded: MarketSnapshot = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, snapshot);
    }
}
