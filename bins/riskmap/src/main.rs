//! riskmap - Supplier risk map on the command line
//!
//! Lists distribution centers and supplier shops, resolves the nearest center
//! for a shop and exports the map around a center as GeoJSON.

mod commands;

use clap::{Args, Parser, Subcommand};
use riskmap_cli::output::Status;
use riskmap_core::config::Config;
use riskmap_core::error::exit_codes;
use riskmap_core::filter::RiskFilter;
use riskmap_core::repository::InMemoryRepository;
use riskmap_telemetry::{TelemetryConfig, Timer};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "riskmap")]
#[command(about = "Supplier risk map: nearest distribution centers and map export")]
#[command(version)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    /// Dataset file, overrides data.path from the configuration
    #[arg(long, global = true, env = "RISKMAP_DATA")]
    data: Option<String>,

    /// Debug logging and a metrics summary after the command
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Emit log lines as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Risk categories to hide
#[derive(Args, Debug, Clone, Copy, Default)]
struct FilterArgs {
    /// Hide high risk shops
    #[arg(long)]
    no_high: bool,

    /// Hide medium risk shops
    #[arg(long)]
    no_medium: bool,

    /// Hide low risk shops
    #[arg(long)]
    no_low: bool,
}

impl FilterArgs {
    fn to_filter(self) -> RiskFilter {
        RiskFilter::hiding(self.no_high, self.no_medium, self.no_low)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List distribution centers
    Centers,

    /// Show a center and the shops inside its coverage area
    Center {
        /// Center id
        id: i64,
    },

    /// List shops
    Shops {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show a shop with its nearest center
    Shop {
        /// Shop id
        id: i64,
    },

    /// Find the nearest center for a shop
    Nearest {
        /// Shop id
        shop_id: i64,

        /// List the N closest centers instead
        #[arg(long)]
        top: Option<usize>,
    },

    /// Find the nearest center for every visible shop
    NearestAll {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show the risk distribution and high-risk alert
    Stats {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Export the map around a center as GeoJSON
    Render {
        /// Center to focus the map on
        #[arg(long)]
        center: i64,

        /// Selected shop; draws the path to its nearest center
        #[arg(long)]
        shop: Option<i64>,

        #[command(flatten)]
        filter: FilterArgs,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check the configuration and dataset
    Validate,
}

fn main() {
    let cli = Cli::parse();
    let code = run(cli);
    std::process::exit(code);
}

/// Everything up to the exit code; returns so the log guard flushes first.
fn run(cli: Cli) -> i32 {
    let json = cli.json;
    let verbose = cli.verbose;

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => return report_error(&anyhow::Error::new(e), json),
    };
    let config = match cli.data {
        Some(path) => config.with_data_path(path),
        None => config,
    };

    let logging = &config.schema.logging;
    let telemetry = TelemetryConfig {
        log_level: if verbose {
            "debug".to_string()
        } else {
            logging.level.clone()
        },
        json: cli.log_json || logging.json,
        log_file: logging.file.as_ref().map(PathBuf::from),
        ..TelemetryConfig::default()
    };
    let _guard = match riskmap_telemetry::init_with_config(telemetry) {
        Ok(guard) => guard,
        Err(e) => {
            Status::warning(&format!("Logging disabled: {e}"));
            None
        }
    };

    let result = execute(cli.command, &config, json);

    let snapshot = riskmap_telemetry::metrics().snapshot();
    tracing::debug!(
        counters = ?snapshot.counters,
        uptime_ms = snapshot.uptime.as_millis(),
        "Run finished"
    );
    if verbose && !json && result.is_ok() {
        commands::print_metrics(&snapshot);
    }

    match result {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => report_error(&e, json),
    }
}

fn execute(command: Commands, config: &Config, json: bool) -> anyhow::Result<()> {
    let repository = {
        let _timer = Timer::start("dataset.load");
        InMemoryRepository::open(&config.schema.data.path)?
    };

    tracing::info!(
        path = %config.schema.data.path,
        centers = repository.centers().len(),
        shops = repository.shops().len(),
        "Dataset loaded"
    );

    let ctx = commands::Context {
        config,
        repository: &repository,
        json,
    };

    match command {
        Commands::Centers => commands::centers(&ctx),
        Commands::Center { id } => commands::center(&ctx, id),
        Commands::Shops { filter } => commands::shops(&ctx, &filter.to_filter()),
        Commands::Shop { id } => commands::shop(&ctx, id),
        Commands::Nearest { shop_id, top } => commands::nearest(&ctx, shop_id, top),
        Commands::NearestAll { filter } => commands::nearest_all(&ctx, &filter.to_filter()),
        Commands::Stats { filter } => commands::stats(&ctx, &filter.to_filter()),
        Commands::Render {
            center,
            shop,
            filter,
            output,
        } => commands::render(&ctx, center, shop, &filter.to_filter(), output.as_deref()),
        Commands::Validate => commands::validate(&ctx),
    }
}

/// Print the error and map it to an exit code
fn report_error(err: &anyhow::Error, json: bool) -> i32 {
    let structured = err.downcast_ref::<riskmap_core::Error>();
    let code = structured.map_or(exit_codes::FAILURE, |e| e.code.exit_code());

    match structured {
        Some(e) if json => match serde_json::to_string_pretty(&e.to_report()) {
            Ok(report) => eprintln!("{report}"),
            Err(_) => Status::error(&e.to_string()),
        },
        _ => Status::error(&format!("{err:#}")),
    }

    tracing::debug!(exit_code = code, "Command failed");
    code
}
