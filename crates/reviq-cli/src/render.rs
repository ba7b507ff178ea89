//! Plain-text rendering of the dashboard tabs.

use std::fmt::{self, Write};

use reviq_core::metrics::{
    self, channel_averages, demand_preview, grounding_links, max_variance, rate_map_series,
    DEMAND_PREVIEW_LIMIT, SOURCE_PREVIEW_LIMIT,
};
use reviq_core::{Competitor, HistoricalParityPoint, StrategyKind};
use reviq_dashboard::{
    DashboardTab, LoadedDashboard, LoadingStage, PresentationState, SummaryState, ViewState,
};

const DASH: &str = "\u{2014}";

pub(crate) struct DashboardView<'a> {
    pub state: &'a ViewState,
    pub presentation: &'a PresentationState,
    pub tabs: &'a [DashboardTab],
    pub focused: Option<&'a Competitor>,
    pub trend: Option<&'a [HistoricalParityPoint]>,
}

pub(crate) fn render_dashboard(out: &mut impl Write, view: &DashboardView<'_>) -> fmt::Result {
    match view.state {
        ViewState::Idle => writeln!(out, "no market loaded"),
        ViewState::Loading { query, stage, .. } => {
            let stage = match stage {
                LoadingStage::MarketData => "market data",
                LoadingStage::Summary => "strategy summary",
            };
            writeln!(
                out,
                "loading {stage} for {} ({})",
                query.hotel_name, query.city
            )
        }
        ViewState::Loaded(dashboard) => render_loaded(out, dashboard, view),
        ViewState::Failed {
            notice,
            last_loaded,
        } => {
            writeln!(out, "error ({}): {}", notice.kind, notice.message)?;
            match last_loaded {
                Some(dashboard) => {
                    writeln!(out, "showing last loaded market")?;
                    writeln!(out)?;
                    render_loaded(out, dashboard, view)
                }
                None => Ok(()),
            }
        }
    }
}

fn render_loaded(
    out: &mut impl Write,
    dashboard: &LoadedDashboard,
    view: &DashboardView<'_>,
) -> fmt::Result {
    writeln!(
        out,
        "# {} ({})",
        dashboard.query.hotel_name, dashboard.query.city
    )?;
    writeln!(
        out,
        "Fetched: {}",
        dashboard.fetched_at.format("%Y-%m-%d %H:%M UTC")
    )?;

    for tab in view.tabs {
        writeln!(out)?;
        writeln!(out, "## {}", tab.title())?;
        writeln!(out)?;
        match tab {
            DashboardTab::Overview => render_overview(out, dashboard)?,
            DashboardTab::Competitors => render_competitors(out, dashboard, view.presentation)?,
            DashboardTab::Pricing => render_pricing(out, dashboard, view.focused, view.trend)?,
            DashboardTab::Demand => render_demand(out, dashboard, view.presentation)?,
        }
    }
    Ok(())
}

fn render_overview(out: &mut impl Write, dashboard: &LoadedDashboard) -> fmt::Result {
    let insights = &dashboard.snapshot.insights;
    let leakage = metrics::violation_count(&dashboard.snapshot);

    writeln!(out, "Status:               {}", display_or_dash(insights.status.as_str()))?;
    writeln!(out, "Recommended BAR:      {:.0}", insights.recommended_bar)?;
    writeln!(out, "CPI:                  {:.0}%", insights.cpi)?;
    writeln!(out, "Visibility score:     {:.0}", insights.visibility_score)?;
    writeln!(out, "Revenue opportunity:  {:.0}", insights.revenue_opportunity)?;
    writeln!(out, "Parity leakage:       {leakage} competitor(s)")?;
    writeln!(out, "Max demand uplift:    {:+.0}%", dashboard.max_uplift())?;
    if !insights.summary.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", insights.summary)?;
    }

    let series = rate_map_series(&dashboard.snapshot.competitors);
    if !series.is_empty() {
        writeln!(out)?;
        writeln!(out, "Rate map")?;
        for point in &series {
            writeln!(out, "  {:<20}{:>10.0}", point.label, point.rate)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Strategy")?;
    match &dashboard.summary {
        SummaryState::Ready(report) if report.is_empty() => {
            writeln!(out, "  (no strategy returned)")?;
        }
        SummaryState::Ready(report) => {
            for line in &report.lines {
                let marker = match line.kind {
                    StrategyKind::Action => "!",
                    StrategyKind::Tactic => ">",
                    StrategyKind::Yield => "$",
                    StrategyKind::Note => "-",
                };
                writeln!(out, "  {marker} {}", line.text)?;
            }
        }
        SummaryState::Unavailable(notice) => {
            writeln!(out, "  unavailable ({}): {}", notice.kind, notice.message)?;
        }
    }

    let links = grounding_links(&dashboard.snapshot.sources, SOURCE_PREVIEW_LIMIT);
    if !links.is_empty() {
        writeln!(out)?;
        writeln!(out, "Sources")?;
        for link in links {
            let title = link.title.as_deref().unwrap_or("source");
            let uri = link.uri.as_deref().unwrap_or(DASH);
            writeln!(out, "  {title} <{uri}>")?;
        }
    }
    Ok(())
}

fn render_competitors(
    out: &mut impl Write,
    dashboard: &LoadedDashboard,
    presentation: &PresentationState,
) -> fmt::Result {
    let competitors = &dashboard.snapshot.competitors;
    let focus = presentation.manual_focus.or(dashboard.focus);
    if competitors.is_empty() {
        return writeln!(out, "no competitors returned");
    }

    writeln!(
        out,
        "{:<4}{:<28}{:<10}{:>10}{:>8}  {:<11}{:>8}",
        "#", "NAME", "DIST", "RATE", "RATING", "POSITION", "MAX GAP"
    )?;
    for (index, competitor) in competitors.iter().enumerate() {
        let flag = if competitor.is_parity_violator() { " !" } else { "" };
        let marker = if focus == Some(index) { "*" } else { " " };
        writeln!(
            out,
            "{marker}{index:<3}{:<28}{:<10}{:>10.0}{:>8.1}  {:<11}{:>7.1}%{flag}",
            truncate(&competitor.name, 26),
            competitor.distance,
            competitor.current_rate,
            competitor.rating,
            display_or_dash(competitor.positioning.as_str()),
            max_variance(competitor),
        )?;
    }

    if let Some(competitor) = presentation
        .violation_detail
        .and_then(|index| competitors.get(index))
    {
        writeln!(out)?;
        writeln!(out, "Parity violation: {}", competitor.name)?;
        writeln!(
            out,
            "  {:<16}{:>10}{:>8}  ROOM",
            "PLATFORM", "RATE", "GAP"
        )?;
        for quote in &competitor.ota_data {
            let flag = if quote.is_violation() { " !" } else { "" };
            writeln!(
                out,
                "  {:<16}{:>10.0}{:>7.1}%  {}{flag}",
                quote.platform,
                quote.rate,
                quote.parity_gap,
                display_or_dash(&quote.room_type),
            )?;
        }
    }
    Ok(())
}

fn render_pricing(
    out: &mut impl Write,
    dashboard: &LoadedDashboard,
    focused: Option<&Competitor>,
    trend: Option<&[HistoricalParityPoint]>,
) -> fmt::Result {
    let averages = channel_averages(&dashboard.snapshot.historical_parity);
    writeln!(out, "Average parity gap by channel")?;
    writeln!(out, "  Booking.com  {:>6.1}%", averages.booking)?;
    writeln!(out, "  MakeMyTrip   {:>6.1}%", averages.mmt)?;
    writeln!(out, "  Agoda        {:>6.1}%", averages.agoda)?;
    writeln!(out, "  Overall |x|  {:>6.1}%", averages.overall_abs())?;

    let points = trend.unwrap_or(&dashboard.snapshot.historical_parity);
    if points.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    match focused {
        Some(competitor) => writeln!(out, "Parity trend: {}", competitor.name)?,
        None => writeln!(out, "Parity trend: market average")?,
    }
    writeln!(
        out,
        "  {:<12}{:>9}{:>9}{:>9}",
        "DATE", "BOOKING", "MMT", "AGODA"
    )?;
    for point in points {
        writeln!(
            out,
            "  {:<12}{:>8.1}%{:>8.1}%{:>8.1}%",
            point.date, point.booking_gap, point.mmt_gap, point.agoda_gap
        )?;
    }
    Ok(())
}

fn render_demand(
    out: &mut impl Write,
    dashboard: &LoadedDashboard,
    presentation: &PresentationState,
) -> fmt::Result {
    let events = &dashboard.snapshot.events;
    if events.is_empty() {
        return writeln!(out, "no demand events found");
    }

    writeln!(out, "Max uplift: {:+.0}%", dashboard.max_uplift())?;
    writeln!(out)?;
    for (index, event) in demand_preview(events, DEMAND_PREVIEW_LIMIT)
        .iter()
        .enumerate()
    {
        writeln!(
            out,
            "{index:<3}{:<10}{:<32}{:<8}{:+.0}%  {}",
            display_or_dash(&event.date),
            truncate(&event.name, 30),
            display_or_dash(event.impact.as_str()),
            event.suggested_uplift,
            display_or_dash(&event.distance),
        )?;
        if presentation.expanded_events.contains(&index) {
            if let Some(category) = &event.category {
                writeln!(out, "     Category: {category}")?;
            }
            if !event.description.is_empty() {
                writeln!(out, "     {}", event.description)?;
            }
            if let Some(strategy) = &event.recommended_strategy {
                writeln!(out, "     Strategy: {strategy}")?;
            }
        }
    }
    if events.len() > DEMAND_PREVIEW_LIMIT {
        writeln!(
            out,
            "({} more not shown)",
            events.len() - DEMAND_PREVIEW_LIMIT
        )?;
    }
    Ok(())
}

fn display_or_dash(value: &str) -> &str {
    if value.is_empty() {
        DASH
    } else {
        value
    }
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() > max_chars {
        format!("{}...", value.chars().take(max_chars - 3).collect::<String>())
    } else {
        value.to_string()
    }
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
