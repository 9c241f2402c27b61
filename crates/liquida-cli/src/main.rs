mod commands;
mod logging;
mod output;

use clap::{Args, Parser, Subcommand};
use liquida_core::model::ZoneFilter;
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "liquida",
    version,
    about = "Technician production rankings and tiered commissions"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where the roster comes from and which settings to evaluate it with.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Bulk dataset export (.json or .json.gz)
    #[arg(short, long, value_name = "FILE")]
    pub bulk: Option<PathBuf>,

    /// Monthly workbook, optionally prefixed with its period (2026-02=path.xlsx)
    #[arg(short, long = "workbook", value_name = "[PERIOD=]FILE")]
    pub workbooks: Vec<String>,

    /// Supplementary per-period JSON feed
    #[arg(short, long = "feed", value_name = "FILE")]
    pub feeds: Vec<PathBuf>,

    /// Merge sources in the order given instead of feeds last
    #[arg(long)]
    pub as_listed: bool,

    /// Custom commission plan (JSON)
    #[arg(long, value_name = "FILE")]
    pub commission: Option<PathBuf>,

    /// Custom zone keyword table (JSON)
    #[arg(long, value_name = "FILE")]
    pub zones: Option<PathBuf>,

    /// Custom tipología discount table (JSON)
    #[arg(long, value_name = "FILE")]
    pub discounts: Option<PathBuf>,

    /// Override the monthly goal
    #[arg(long, value_name = "AMOUNT")]
    pub goal: Option<Decimal>,
}

fn parse_zone_filter(s: &str) -> Result<ZoneFilter, String> {
    ZoneFilter::from_str_loose(s).ok_or_else(|| {
        format!("unknown zone '{s}' (use 'all' or a zone code such as NOROCCIDENTE)")
    })
}

#[derive(Subcommand)]
enum Commands {
    /// List the periods present in the loaded data, most recent first
    Periods {
        #[command(flatten)]
        sources: SourceArgs,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Top ten technicians for a period
    Rank {
        #[command(flatten)]
        sources: SourceArgs,

        /// Period label (default: most recent)
        #[arg(short, long)]
        period: Option<String>,

        /// Zone filter: all (default) or a zone code
        #[arg(short, long, default_value = "all", value_parser = parse_zone_filter)]
        zone: ZoneFilter,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Monthly statement for one technician
    Tech {
        /// Technician name (case and spacing are ignored)
        name: String,

        #[command(flatten)]
        sources: SourceArgs,

        /// Period label (default: every month on record)
        #[arg(short, long)]
        period: Option<String>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Find technicians by name
    Search {
        query: String,

        #[command(flatten)]
        sources: SourceArgs,

        /// Period whose totals order the hits (default: most recent)
        #[arg(short, long)]
        period: Option<String>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Totals across the loaded roster
    Summary {
        #[command(flatten)]
        sources: SourceArgs,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Compute the commission for a net total
    Commission {
        /// Net total for the month
        net_total: Decimal,

        /// Days worked, for goal proration
        #[arg(short, long)]
        days: Option<u32>,

        /// Custom commission plan (JSON)
        #[arg(long, value_name = "FILE")]
        commission: Option<PathBuf>,

        /// Override the monthly goal
        #[arg(long, value_name = "AMOUNT")]
        goal: Option<Decimal>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Classify a location into its macro-zone
    Zone {
        #[arg(long, default_value = "")]
        warehouse: String,
        #[arg(long, default_value = "")]
        department: String,
        #[arg(long, default_value = "")]
        city: String,
        #[arg(long, default_value = "")]
        venue_city: String,

        /// Custom zone keyword table (JSON)
        #[arg(long, value_name = "FILE")]
        zones: Option<PathBuf>,
    },
    /// Inspect and validate settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the built-in commission plan, zone table and discounts
    Show,
    /// Validate custom settings files
    Validate {
        #[arg(long, value_name = "FILE")]
        commission: Option<PathBuf>,
        #[arg(long, value_name = "FILE")]
        zones: Option<PathBuf>,
        #[arg(long, value_name = "FILE")]
        discounts: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    logging::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Periods { sources, output } => commands::data::periods(&sources, &output).await,
        Commands::Rank {
            sources,
            period,
            zone,
            output,
        } => commands::data::rank(&sources, period, zone, &output).await,
        Commands::Tech {
            name,
            sources,
            period,
            output,
        } => commands::data::tech(&sources, &name, period, &output).await,
        Commands::Search {
            query,
            sources,
            period,
            output,
        } => commands::data::search(&sources, &query, period, &output).await,
        Commands::Summary { sources, output } => commands::data::summary(&sources, &output).await,
        Commands::Commission {
            net_total,
            days,
            commission,
            goal,
            output,
        } => commands::calc::commission(net_total, days, commission, goal, &output),
        Commands::Zone {
            warehouse,
            department,
            city,
            venue_city,
            zones,
        } => commands::calc::zone(&warehouse, &department, &city, &venue_city, zones),
        Commands::Settings { action } => match action {
            SettingsAction::Show => commands::settings::show(),
            SettingsAction::Validate {
                commission,
                zones,
                discounts,
            } => commands::settings::validate(commission, zones, discounts),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
