use clap::Parser;
use fact_search::config::{find_config_file, load_config, Overrides};
use fact_search::{
    build_query, run, AppError, RestService, RunSummary, SearchMode, PROGRAM_NAME, VERSION,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// FACT Search and Download - find and download files matching a query
#[derive(Parser, Debug)]
#[command(name = "fact-search")]
#[command(disable_version_flag = true)]
#[command(about = "This program finds and downloads files matching a specific query.", long_about = None)]
struct Cli {
    /// Change the host [default: http://localhost:5000]
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// A search query as a JSON string
    #[arg(short = 'q', long)]
    query: Option<String>,

    /// A search query in a .json file (takes precedence over --query)
    #[arg(short = 'Q', long)]
    queryfile: Option<PathBuf>,

    /// Download firmware including files matching the query
    #[arg(short = 'F', long)]
    firmware: bool,

    /// Store files in this folder [default: .]
    #[arg(short = 'D', long)]
    destination: Option<PathBuf>,

    /// Print debug messages
    #[arg(short = 'd', long)]
    debug: bool,

    /// Configuration file path
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Limit for each request in seconds [default: no limit]
    #[arg(long)]
    timeout: Option<u64>,

    /// Print version
    #[arg(short = 'V', long)]
    version: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            host: self.host.clone(),
            destination: self.destination.clone(),
            timeout_secs: self.timeout,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if cli.version {
        println!("{}", version_line());
        return ExitCode::SUCCESS;
    }

    let log_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("fact_search={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match execute(&cli).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn version_line() -> String {
    format!("{} {}", PROGRAM_NAME, VERSION)
}

async fn execute(cli: &Cli) -> Result<RunSummary, AppError> {
    tracing::debug!("{}", version_line());
    if cli.query.is_some() && cli.queryfile.is_some() {
        tracing::warn!("both --query and --queryfile given, using --queryfile");
    }
    let query = build_query(cli.query.as_deref(), cli.queryfile.as_deref())?;

    let config_path = cli.config.clone().or_else(find_config_file);
    if let Some(path) = &config_path {
        tracing::debug!("Using config file: {}", path.display());
    }
    let config = load_config(config_path.as_deref())?
        .with_overrides(cli.overrides())
        .validate()?;

    let service = RestService::from_config(&config)?;
    run(
        &service,
        &query,
        SearchMode::from_firmware_flag(cli.firmware),
        &config.destination,
    )
    .await
}
