//! Congestion tax service CLI
//!
//! ```sh
//! # Run the HTTP server with the default config (~/.config/congestion-tax/config.toml)
//! congestion-tax
//!
//! # Custom config and port
//! congestion-tax --config /etc/congestion-tax/config.toml serve --port 9090
//!
//! # Price one day offline
//! congestion-tax calc --type Car --plate ABC123 2013-02-08T06:27:00+01:00 2013-02-08T15:29:00+01:00
//!
//! # Price random crossings
//! congestion-tax sample --count 20 --year 2013
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use validator::Validate;

use congestion_tax::application::{random_crossings, TaxOutcome, TaxRequest, TaxService};
use congestion_tax::config::{default_config_path, AppConfig};
use congestion_tax::domain::TaxRule;
use congestion_tax::infrastructure::FileCityRuleRepository;
use congestion_tax::server::{init_tracing, ServerHandle};

/// Daily congestion tax calculator and HTTP service.
#[derive(Parser, Debug)]
#[command(
    name = "congestion-tax",
    version,
    about = "Daily congestion tax calculator",
    long_about = "Congestion tax service: REST API and offline calculator for daily \
                  vehicle congestion tax.\n\n\
                  Default config: ~/.config/congestion-tax/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, global = true, env = "CONGESTION_TAX_CONFIG")]
    config: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve(ServeArgs),
    /// Validate the configuration file and exit.
    Check,
    /// Calculate one day of crossings offline.
    Calc(CalcArgs),
    /// Calculate random crossings within a year with the built-in rules.
    Sample(SampleArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the listen host.
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the city rule directory.
    #[arg(long)]
    cities_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CalcArgs {
    /// Vehicle type, e.g. Car, Bus, Motorbike.
    #[arg(short = 't', long = "type")]
    vehicle_type: String,

    #[arg(short, long)]
    plate: String,

    /// JSON rule set; the built-in rules apply when omitted.
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// RFC 3339 crossing timestamps.
    #[arg(value_parser = parse_timestamp)]
    timestamps: Vec<DateTime<FixedOffset>>,
}

#[derive(Args, Debug)]
struct SampleArgs {
    #[arg(short = 'n', long, default_value_t = 10)]
    count: usize,

    #[arg(short, long, default_value_t = 2013)]
    year: i32,

    #[arg(short = 't', long = "type", default_value = "Car")]
    vehicle_type: String,

    #[arg(short, long, default_value = "ABC123")]
    plate: String,
}

fn parse_timestamp(s: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(s).map_err(|e| format!("invalid RFC 3339 timestamp {s:?}: {e}"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);

    let mut config = match AppConfig::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", config_path.display(), e);
            eprintln!("Using default configuration.");
            AppConfig::default()
        }
    };
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config);

    match cli.command.unwrap_or(Command::Serve(ServeArgs::default())) {
        Command::Serve(args) => serve(config, args).await,
        Command::Check => {
            check(&config, &config_path);
            Ok(())
        }
        Command::Calc(args) => calc(&config, args),
        Command::Sample(args) => sample(&config, args),
    }
}

async fn serve(mut config: AppConfig, args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(host) = args.host {
        info!("CLI override: host = {}", host);
        config.server.host = host;
    }
    if let Some(port) = args.port {
        info!("CLI override: port = {}", port);
        config.server.port = port;
    }
    if let Some(dir) = args.cities_dir {
        info!("CLI override: cities_dir = {}", dir.display());
        config.rules.cities_dir = dir;
    }

    let handle = match ServerHandle::start(config).await {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start server: {}", e);
            return Err(e);
        }
    };
    handle.install_signal_handler();

    info!("🚀 Press Ctrl+C to shutdown gracefully.");
    handle.wait().await;

    Ok(())
}

fn check(config: &AppConfig, config_path: &Path) {
    println!("✅ Configuration is valid");
    println!("   Config file  : {}", config_path.display());
    println!("   API address  : {}", config.api_address());
    println!("   Cities dir   : {}", config.rules.cities_dir.display());
    println!("   Rule cache   : {}", config.rules.cache_enabled);
    println!("   Timeout      : {}s", config.server.request_timeout_secs);
    println!("   Log level    : {} ({})", config.logging.level, config.logging.format);
}

fn calc(config: &AppConfig, args: CalcArgs) -> Result<(), Box<dyn std::error::Error>> {
    let request = match args.rules {
        Some(path) => {
            let rules: TaxRule = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
            rules.validate()?;
            TaxRequest::custom(args.vehicle_type, args.plate, args.timestamps, rules)
        }
        None => TaxRequest::built_in(args.vehicle_type, args.plate, args.timestamps),
    };

    let outcome = offline_service(config).calculate(&request)?;
    print_outcome(&outcome);
    Ok(())
}

fn sample(config: &AppConfig, args: SampleArgs) -> Result<(), Box<dyn std::error::Error>> {
    let crossings = random_crossings(&mut rand::thread_rng(), args.count, args.year)?;
    let request = TaxRequest::built_in(args.vehicle_type, args.plate, crossings);

    let outcome = offline_service(config).calculate(&request)?;
    print_outcome(&outcome);
    Ok(())
}

/// Offline calculations never read city files, but the service needs a repository.
fn offline_service(config: &AppConfig) -> TaxService {
    TaxService::new(std::sync::Arc::new(FileCityRuleRepository::new(
        &config.rules.cities_dir,
    )))
}

fn print_outcome(outcome: &TaxOutcome) {
    let breakdown = &outcome.breakdown;
    println!(
        "{} {} ({} rules)",
        outcome.vehicle.kind(),
        outcome.vehicle.license_plate(),
        if outcome.custom_rules { "custom" } else { "built-in" }
    );
    for window in &breakdown.windows {
        println!(
            "   {}  {:>3} crossing(s)  {:>3}",
            window.start.to_rfc3339(),
            window.crossings,
            window.fee
        );
    }
    if breakdown.is_capped() {
        println!(
            "   capped {} -> {}",
            breakdown.uncapped_total, breakdown.max_daily_fee
        );
    }
    println!("Total: {}", breakdown.total);
}
