use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use engagement::config::{self, Config};
use engagement::input::load_raw_input;
use engagement::utils::{self, NumberFormatOptions};
use engagement::{
    AggregateMode, CategoryTotal, DateRange, DateWindow, Dataset, Index, Series, aggregate, build,
    derive_composite, report,
};

#[derive(Parser)]
#[command(name = "engagement")]
#[command(version)]
#[command(disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Use comma-separated number formatting
    #[arg(long, global = true)]
    number_comma: bool,

    /// Use human-readable number formatting (k, m, b, t)
    #[arg(short = 'H', long, global = true)]
    number_human: bool,

    /// Locale for number formatting (en, de, fr, es, it, ja, ko, zh)
    #[arg(long, global = true)]
    locale: Option<String>,

    /// Number of decimal places for totals
    #[arg(long, global = true)]
    decimal_places: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive spike-padded daily series for one or more engagement types
    Series(SeriesArgs),
    /// Aggregate per-category totals, zero-filling absent categories
    Totals(TotalsArgs),
    /// Manage configuration
    Config(ConfigArgs),
}

#[derive(Args)]
struct RangeArgs {
    /// First day to include (YYYY-MM-DD)
    #[arg(long)]
    start: Option<String>,

    /// Last day to include (YYYY-MM-DD), defaults to today
    #[arg(long)]
    end: Option<String>,
}

#[derive(Args)]
struct OutputArgs {
    /// Emit JSON instead of a text summary
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Pretty-print JSON instead of a single line
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

#[derive(Args)]
struct SeriesArgs {
    /// JSON file mapping each type to its list of {date, total} records
    input: PathBuf,

    /// Engagement type to chart (repeatable)
    #[arg(short = 't', long = "type", required = true)]
    types: Vec<String>,

    #[command(flatten)]
    range: RangeArgs,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct TotalsArgs {
    /// JSON file mapping each type to its list of {date, total} records
    input: PathBuf,

    /// Comma-separated category keys (defaults to the configured categories)
    #[arg(long, value_delimiter = ',')]
    keys: Vec<String>,

    /// Sum the `total` field or count records
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    #[command(flatten)]
    range: RangeArgs,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Sum,
    Count,
}

impl From<ModeArg> for AggregateMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Sum => AggregateMode::Sum,
            ModeArg::Count => AggregateMode::Count,
        }
    }
}

#[derive(Args)]
struct ConfigArgs {
    #[command(subcommand)]
    subcommand: ConfigSubcommands,
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Create default configuration file
    Init {
        #[arg(long, default_value_t = false)]
        overwrite: bool,
    },
    /// Show current configuration
    Show,
    /// Set configuration value
    Set {
        /// Configuration key (default-start, days-before, categories, mode, number-comma, number-human, locale, decimal-places)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[derive(Serialize)]
struct SeriesOutput {
    window: DateWindow,
    series: Vec<Series>,
}

#[derive(Serialize)]
struct TotalsOutput {
    window: DateWindow,
    mode: AggregateMode,
    totals: Vec<CategoryTotal>,
    total: f64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("ENGAGEMENT_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load config file to get defaults
    let config = Config::load().unwrap_or(None).unwrap_or_default();

    // Create format options merging config defaults with CLI overrides
    let format_options = NumberFormatOptions {
        use_comma: cli.number_comma || config.formatting.number_comma,
        use_human: cli.number_human || config.formatting.number_human,
        locale: cli.locale.unwrap_or(config.formatting.locale.clone()),
        decimal_places: cli
            .decimal_places
            .unwrap_or(config.formatting.decimal_places),
    };

    match cli.command {
        Commands::Series(args) => {
            if let Err(e) = run_series(args, &config, &format_options) {
                eprintln!("Error deriving series: {e:#}");
                std::process::exit(1);
            }
        }
        Commands::Totals(args) => {
            if let Err(e) = run_totals(args, &config, &format_options) {
                eprintln!("Error aggregating totals: {e:#}");
                std::process::exit(1);
            }
        }
        Commands::Config(config_args) => handle_config_subcommand(config_args),
    }
}

/// Load, build and trim the dataset to the requested window.
fn load_windowed(
    input: &Path,
    range: &RangeArgs,
    config: &Config,
) -> Result<(Dataset, DateWindow)> {
    let raw = load_raw_input(input)?;
    let dataset = build(&raw).context("Failed to build dataset")?;

    let range = DateRange::parse(range.start.as_deref(), range.end.as_deref())?;
    let window = range.resolve(utils::today(), &dataset, config.default_start()?)?;
    info!(%window, records = dataset.len(), "resolved date window");

    Ok((dataset.within(&window), window))
}

fn run_series(
    args: SeriesArgs,
    config: &Config,
    format_options: &NumberFormatOptions,
) -> Result<()> {
    let (dataset, window) = load_windowed(&args.input, &args.range, config)?;
    let index = Index::by_day(&dataset);
    let series = derive_composite(&index, args.types.as_slice());

    if args.output.json {
        print_json(&SeriesOutput { window, series }, args.output.pretty)?;
    } else {
        println!("{} to {}", window.start, window.end);
        println!("{}", report::format_series_summary(&series, format_options));
    }

    Ok(())
}

fn run_totals(
    args: TotalsArgs,
    config: &Config,
    format_options: &NumberFormatOptions,
) -> Result<()> {
    let (dataset, window) = load_windowed(&args.input, &args.range, config)?;
    let keys = if args.keys.is_empty() {
        config.totals.categories.clone()
    } else {
        args.keys
    };
    let mode = args.mode.map(AggregateMode::from).unwrap_or(config.totals.mode);

    let index = Index::by_type(&dataset);
    let totals = aggregate(&index, keys.as_slice(), mode);

    if args.output.json {
        let total = engagement::grand_total(&totals);
        print_json(
            &TotalsOutput {
                window,
                mode,
                totals,
                total,
            },
            args.output.pretty,
        )?;
    } else {
        println!(
            "{}",
            report::format_totals_table(&totals, Some(&window), format_options)
        );
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        simd_json::to_string_pretty(value)?
    } else {
        simd_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}

fn handle_config_subcommand(config_args: ConfigArgs) {
    match config_args.subcommand {
        ConfigSubcommands::Init { overwrite } => {
            if let Err(e) = config::create_default_config(overwrite) {
                eprintln!("Error creating config: {e}");
                std::process::exit(1);
            }
        }
        ConfigSubcommands::Show => {
            if let Err(e) = config::show_config() {
                eprintln!("Error showing config: {e}");
                std::process::exit(1);
            }
        }
        ConfigSubcommands::Set { key, value } => {
            if let Err(e) = config::set_config_value(&key, &value) {
                eprintln!("Error setting config: {e}");
                std::process::exit(1);
            }
        }
    }
}
