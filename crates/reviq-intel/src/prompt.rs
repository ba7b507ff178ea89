//! Prompt templates sent to the provider.

use reviq_core::MarketQuery;

/// Instruction for the structured market-data call.
///
/// Hotel name and city are interpolated verbatim.
#[must_use]
pub fn market_prompt(query: &MarketQuery) -> String {
    let hotel = &query.hotel_name;
    let city = &query.city;
    format!(
        r#"Analyze the hotel market in {city} for a hotel named "{hotel}".
    1. Identify 5-7 major competitor hotels located within a strict 2km radius of "{hotel}" that are in the SAME CATEGORY (e.g., Luxury, Upscale, Midscale, Economy) as "{hotel}".
    2. Search for 6-10 major upcoming events (concerts, conferences, festivals, local holidays) in {city} for the next 45 days.
       For each event, provide a "category" (Music, Business, Holiday, Sports, Culture) and a "recommendedStrategy" (e.g., "Implement 2-night MLOS", "Close all discount channels", "Increase base rate by 15%").
    3. Provide current market rate trends and positioning for "{hotel}".
    4. For each competitor, simulate/find OTA parity data across Booking.com, MMT, and Agoda. Include parity gaps and specific room types (e.g., "Deluxe Room", "King Suite").
    5. Generate a 7-day historical trend of rate parity gaps (as percentages) for "{hotel}" across Booking.com, MakeMyTrip, and Agoda.
    Return the data as a clean JSON object."#
    )
}

/// Instruction for the strategy summary call, embedding the serialized snapshot.
#[must_use]
pub fn report_prompt(snapshot_json: &str) -> String {
    format!(
        "Based on this hotel data: {snapshot_json}, specifically the identified Demand Drivers and Parity Gaps, write an ultra-concise 40-word executive strategy report.
    Format as:
    1. ACTION: [Immediate Rate Parity fix]
    2. TACTIC: [Pricing for highest impact event]
    3. YIELD: [Constraint like MLOS or Overbooking]"
    )
}
