mod render;

use clap::{Args, Parser, Subcommand, ValueEnum};
use reviq_core::{AppConfig, HistoricalParityPoint, MarketQuery};
use reviq_dashboard::{Dashboard, DashboardOptions, DashboardTab, PresentationState, ViewState};
use reviq_intel::IntelClient;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::render::DashboardView;

#[derive(Debug, Parser)]
#[command(name = "reviq-cli")]
#[command(about = "Hotel market intelligence dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch market intelligence for a hotel and print the dashboard
    Report(ReportArgs),
    /// Print the response schema sent to the provider
    Schema,
}

#[derive(Debug, Default, Args)]
struct ReportArgs {
    /// Hotel name (defaults to REVIQ_DEFAULT_HOTEL)
    #[arg(long)]
    hotel: Option<String>,
    /// City (defaults to REVIQ_DEFAULT_CITY)
    #[arg(long)]
    city: Option<String>,
    /// Dashboard tab to print
    #[arg(long, value_enum, default_value_t = TabArg::All)]
    tab: TabArg,
    /// Print the view state, presentation and focused trend as JSON
    #[arg(long)]
    json: bool,
    /// Seed for the focused-competitor trend
    #[arg(long)]
    seed: Option<u64>,
    /// Focus the competitor at this index instead of the default
    #[arg(long)]
    focus: Option<usize>,
    /// Show the OTA breakdown for the violating competitor at this index
    #[arg(long)]
    detail: Option<usize>,
    /// Expand the demand event at this index (repeatable)
    #[arg(long = "expand")]
    expand: Vec<usize>,
}

impl ReportArgs {
    /// Explicit query from the flags, or `None` to mount the configured default.
    fn query(&self, config: &AppConfig) -> Option<MarketQuery> {
        if self.hotel.is_none() && self.city.is_none() {
            return None;
        }
        Some(MarketQuery::new(
            self.hotel.as_deref().unwrap_or(&config.default_hotel),
            self.city.as_deref().unwrap_or(&config.default_city),
        ))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
enum TabArg {
    Overview,
    Competitors,
    Pricing,
    Demand,
    #[default]
    All,
}

impl TabArg {
    fn single(self) -> Option<DashboardTab> {
        match self {
            TabArg::Overview => Some(DashboardTab::Overview),
            TabArg::Competitors => Some(DashboardTab::Competitors),
            TabArg::Pricing => Some(DashboardTab::Pricing),
            TabArg::Demand => Some(DashboardTab::Demand),
            TabArg::All => None,
        }
    }
}

/// Machine-readable form of everything the text renderer shows.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    view: &'a ViewState,
    presentation: &'a PresentationState,
    focused_trend: Option<&'a [HistoricalParityPoint]>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Schema) => {
            let schema = reviq_intel::market_response_schema();
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
        Some(Commands::Report(args)) => run_report(args).await,
        None => run_report(ReportArgs::default()).await,
    }
}

fn init_tracing(config: &AppConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

async fn run_report(args: ReportArgs) -> anyhow::Result<()> {
    let config = reviq_core::load_app_config()?;
    init_tracing(&config)?;
    tracing::debug!(?config, "configuration loaded");

    let client = IntelClient::from_config(&config)?;
    let mut options = DashboardOptions::from_config(&config);
    if let Some(seed) = args.seed {
        options = options.with_rng_seed(seed);
    }
    let dashboard = Dashboard::new(client, options);

    let outcome = match args.query(&config) {
        Some(query) => dashboard.submit(query).await,
        None => dashboard.mount().await,
    };
    tracing::debug!(?outcome, "submission finished");

    dashboard.with_controller(|c| {
        if let Some(tab) = args.tab.single() {
            c.select_tab(tab);
        }
        if let Some(index) = args.focus {
            if !c.select_focus(index) {
                tracing::warn!(index, "no competitor at focus index");
            }
        }
        if let Some(index) = args.detail {
            if !c.open_violation_detail(index) {
                tracing::warn!(index, "competitor is not a parity violator");
            }
        }
        for &index in &args.expand {
            if c.toggle_event(index).is_none() {
                tracing::warn!(index, "no demand event at index");
            }
        }
    });

    let state = dashboard.state();
    let presentation = dashboard.presentation();
    let trend = dashboard.focused_trend();

    if args.json {
        let report = JsonReport {
            view: &state,
            presentation: &presentation,
            focused_trend: trend.as_deref(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let focused = dashboard.with_controller(|c| c.focused_competitor().cloned());
        let tabs = match args.tab.single() {
            Some(_) => vec![presentation.active_tab],
            None => DashboardTab::ALL.to_vec(),
        };

        let mut out = String::new();
        render::render_dashboard(
            &mut out,
            &DashboardView {
                state: &state,
                presentation: &presentation,
                tabs: &tabs,
                focused: focused.as_ref(),
                trend: trend.as_deref(),
            },
        )?;
        print!("{out}");
    }

    if let ViewState::Failed { notice, .. } = &state {
        anyhow::bail!("{}: {}", notice.kind, notice.message);
    }
    Ok(())
}
