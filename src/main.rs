//! CLI entry point for the strike leverage toolkit.
//!
//! Provides subcommands for the year-over-year leverage table, industry
//! indicator aggregation, strike breakdowns, and macro context tables.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use strike_leverage::aggregate::{self, CountPivot, IndicatorFilter, IndustryBreakdown, StrikeCategory, StrikeFilter};
use strike_leverage::output::{print_json, write_csv, write_json, write_pivot_csv};
use strike_leverage::{CategoryNormalizer, LeverageComposer, LeverageConfig, StrikeRecord, TaxonomyTables, loader};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "strike_leverage")]
#[command(about = "Strike statistics and structural leverage of industries", long_about = None)]
struct Cli {
    /// JSON file with leverage calibration overrides
    #[arg(long, global = true, env = "LEVERAGE_CONFIG")]
    config: Option<PathBuf>,

    /// JSON file with industry normalization and sector remap tables
    #[arg(long, global = true, env = "LEVERAGE_TAXONOMY")]
    taxonomy: Option<PathBuf>,

    /// Format used when writing to --output
    #[arg(long, global = true, value_enum, default_value_t = Format::Csv)]
    format: Format,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

#[derive(Args)]
struct OutputArgs {
    /// File to write results to; results are logged as JSON when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two sector panels and score each sector's strike leverage
    Leverage {
        /// Sector panel CSV of the start year
        #[arg(long)]
        start: PathBuf,
        #[arg(long)]
        start_year: i32,

        /// Sector panel CSV of the end year
        #[arg(long)]
        end: PathBuf,
        #[arg(long)]
        end_year: i32,

        /// Center for the profit-per-worker score instead of the cross-sector median
        #[arg(long)]
        median_profit_base: Option<f64>,

        /// Fail when an end-year sector cannot be matched to the start year
        #[arg(long, default_value_t = false)]
        strict: bool,

        #[command(flatten)]
        out: OutputArgs,
    },
    /// Aggregate industry indicators by canonical industry and year
    Indicators {
        /// Industry indicator CSV
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Keep every year and industry instead of the default exclusions
        #[arg(long, default_value_t = false)]
        keep_all: bool,

        #[command(flatten)]
        out: OutputArgs,
    },
    /// Break strike records down by one report
    Strikes {
        /// Strike records JSON
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[arg(value_enum)]
        report: StrikeReport,

        #[command(flatten)]
        select: SelectArgs,

        /// Column for the year-category report
        #[arg(long, value_enum, default_value_t = CategoryArg::Industry)]
        category: CategoryArg,

        /// Threshold for reports that drop or bucket small groups
        #[arg(long)]
        min_count: Option<usize>,

        #[command(flatten)]
        out: OutputArgs,
    },
    /// GDP components as a share of GDP
    Gdp {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        out: OutputArgs,
    },
    /// Year-over-year average wage growth
    Wages {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        out: OutputArgs,
    },
}

#[derive(Args)]
struct SelectArgs {
    /// Only records from this state
    #[arg(long)]
    state: Option<String>,

    /// First start year to include
    #[arg(long)]
    from_year: Option<i32>,

    /// First start year to exclude. The window is half-open, so pass
    /// `end_year + 1` to include every record of `end_year`.
    #[arg(long)]
    until_year: Option<i32>,

    /// Substring required in the action type, e.g. "Strike"
    #[arg(long)]
    pattern: Option<String>,

    #[arg(long)]
    industry: Option<String>,

    #[arg(long)]
    sub_industry: Option<String>,
}

impl SelectArgs {
    fn filter(&self) -> StrikeFilter {
        let mut filter = StrikeFilter::new();
        filter.from = self.from_year.and_then(|y| chrono::NaiveDate::from_ymd_opt(y, 1, 1));
        filter.until = self.until_year.and_then(|y| chrono::NaiveDate::from_ymd_opt(y, 1, 1));
        if let Some(state) = &self.state {
            filter = filter.state(state);
        }
        if let Some(industry) = &self.industry {
            filter = filter.industry(industry);
        }
        if let Some(sub_industry) = &self.sub_industry {
            filter = filter.sub_industry(sub_industry);
        }
        if let Some(pattern) = &self.pattern {
            filter = filter.action_pattern(pattern);
        }
        filter
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum StrikeReport {
    PerYear,
    ActionTypes,
    Industries,
    YearCity,
    YearCategory,
    StateResponse,
    StateIndustry,
    StateDemand,
    StateAction,
    Size,
    Demands,
}

#[derive(Clone, Copy, ValueEnum)]
enum CategoryArg {
    State,
    City,
    Industry,
    SubIndustry,
    Demands,
    Response,
    ActionType,
    EmployeeRange,
}

impl From<CategoryArg> for StrikeCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::State => StrikeCategory::State,
            CategoryArg::City => StrikeCategory::City,
            CategoryArg::Industry => StrikeCategory::Industry,
            CategoryArg::SubIndustry => StrikeCategory::SubIndustry,
            CategoryArg::Demands => StrikeCategory::Demands,
            CategoryArg::Response => StrikeCategory::Response,
            CategoryArg::ActionType => StrikeCategory::ActionType,
            CategoryArg::EmployeeRange => StrikeCategory::EmployeeRange,
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/strike_leverage.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("strike_leverage.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => LeverageConfig::load(path)
            .with_context(|| format!("loading calibration from {}", path.display()))?,
        None => LeverageConfig::default(),
    };
    let tables = match &cli.taxonomy {
        Some(path) => TaxonomyTables::load(path)
            .with_context(|| format!("loading taxonomy tables from {}", path.display()))?,
        None => TaxonomyTables::default(),
    };
    let normalizer = CategoryNormalizer::new(tables);
    let format = cli.format;

    match cli.command {
        Commands::Leverage {
            start,
            start_year,
            end,
            end_year,
            median_profit_base,
            strict,
            out,
        } => {
            let config = if strict { config.strict() } else { config };
            let start_panel = loader::load_sector_panel(&start, start_year)?;
            let end_panel = loader::load_sector_panel(&end, end_year)?;

            let composer = LeverageComposer::new(config, normalizer);
            let rows = composer
                .compose(&start_panel, &end_panel, median_profit_base)
                .with_context(|| format!("scoring {start_year} -> {end_year}"))?;

            emit(&rows, &out, format)?;
        }
        Commands::Indicators {
            input,
            keep_all,
            out,
        } => {
            let records = loader::load_industry_records(&input)?;
            let filter = if keep_all {
                IndicatorFilter::none()
            } else {
                IndicatorFilter::default()
            };
            let rows = aggregate::economic_indicators(&records, &normalizer, &filter);
            emit(&rows, &out, format)?;
        }
        Commands::Strikes {
            input,
            report,
            select,
            category,
            min_count,
            out,
        } => {
            let records = loader::load_strikes(&input)?;
            let selected: Vec<StrikeRecord> = select
                .filter()
                .apply(&records)
                .into_iter()
                .cloned()
                .collect();
            info!(
                total = records.len(),
                selected = selected.len(),
                "Strike records selected"
            );

            run_strike_report(report, &selected, &select, category, min_count, &out, format)?;
        }
        Commands::Gdp { input, out } => {
            let records = loader::load_gdp(&input)?;
            emit(&aggregate::gdp_composition(&records), &out, format)?;
        }
        Commands::Wages { input, out } => {
            let records = loader::load_wages(&input)?;
            emit(&aggregate::wage_growth(&records), &out, format)?;
        }
    }

    Ok(())
}

fn run_strike_report(
    report: StrikeReport,
    records: &[StrikeRecord],
    select: &SelectArgs,
    category: CategoryArg,
    min_count: Option<usize>,
    out: &OutputArgs,
    format: Format,
) -> Result<()> {
    // records are already filtered
    let all = StrikeFilter::new();

    match report {
        StrikeReport::PerYear => emit(&aggregate::strikes_per_year(records, &all), out, format),
        StrikeReport::ActionTypes => {
            emit(&aggregate::action_type_counts(records, &all), out, format)
        }
        StrikeReport::Industries => {
            let counts = aggregate::industry_subindustry_counts(records, &all);
            let buckets = aggregate::bucket_subindustries(&counts, min_count.unwrap_or(3));
            emit(&IndustryBreakdown::flatten(&buckets), out, format)
        }
        StrikeReport::YearCity => {
            let state = select.state.as_deref().unwrap_or("Guangdong");
            emit_pivot(&aggregate::strikes_by_year_and_city(records, state), out, format)
        }
        StrikeReport::YearCategory => emit_pivot(
            &aggregate::strikes_by_year_and_category(records, category.into()),
            out,
            format,
        ),
        StrikeReport::StateResponse => {
            emit(&aggregate::strikes_by_state_and_response(records), out, format)
        }
        StrikeReport::StateIndustry => emit(
            &aggregate::strikes_by_state_and_industry(records, min_count.unwrap_or(5)),
            out,
            format,
        ),
        StrikeReport::StateDemand => emit(
            &aggregate::strikes_by_state_and_demand(records, min_count.unwrap_or(20)),
            out,
            format,
        ),
        StrikeReport::StateAction => emit(
            &aggregate::action_by_state_and_type(records, min_count.unwrap_or(5)),
            out,
            format,
        ),
        StrikeReport::Size => emit(
            &aggregate::strikes_by_size(records, select.state.as_deref()),
            out,
            format,
        ),
        StrikeReport::Demands => emit(&aggregate::demand_totals(records), out, format),
    }
}

/// Writes rows to `--output` in the chosen format, or logs them as JSON.
fn emit<T: Serialize>(rows: &[T], out: &OutputArgs, format: Format) -> Result<()> {
    match (&out.output, format) {
        (None, _) => print_json(rows),
        (Some(path), Format::Csv) => write_csv(path, rows),
        (Some(path), Format::Json) => write_json(path, rows),
    }
}

fn emit_pivot(pivot: &CountPivot, out: &OutputArgs, format: Format) -> Result<()> {
    match (&out.output, format) {
        (None, _) => print_json(std::slice::from_ref(pivot)),
        (Some(path), Format::Csv) => write_pivot_csv(path, pivot),
        (Some(path), Format::Json) => write_json(path, std::slice::from_ref(pivot)),
    }
}
