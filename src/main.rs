//! Command line interface for bulk zone retrieval.

use clap::{Parser, Subcommand};
use reqwest_middleware::ClientWithMiddleware;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use zonepull::auth::{authenticate, DEFAULT_AUTH_URL};
use zonepull::downloader::DownloaderBuilder;
use zonepull::http::{create_http_client, HttpClientConfig};
use zonepull::listing::{
    single_zone_link, zone_links, DEFAULT_API_BASE_URL, DEFAULT_DOWNLOAD_BASE_URL,
};
use zonepull::pool::{Dispatcher, PoolConfig, RunOutcome, RunReport, Status, TransferJob};
use zonepull::progress::{ProgressDisplay, StyleOptions};
use zonepull::sink::{RetryPolicy, Sink};
use zonepull::{Error, Result};

#[derive(Parser, Debug)]
#[command(
    name = "zonepull",
    version,
    about = "Bulk DNS zone file retrieval from ICANN CZDS"
)]
struct Cli {
    /// ICANN account username.
    #[arg(short = 'u', long, env = "ICANN_USERNAME")]
    username: Option<String>,

    /// ICANN account password.
    #[arg(short = 'p', long, env = "ICANN_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Where zone files land: a directory or an s3://bucket[/prefix] root.
    #[arg(short = 'o', long, default_value = "./czds")]
    output: String,

    /// Number of pool workers.
    #[arg(short = 'w', long, default_value_t = 5)]
    workers: usize,

    /// Log debug details to stderr.
    #[arg(short = 'v', long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Download every zone the account may access.
    All,
    /// Download a single zone.
    One {
        /// Zone to download, e.g. "com".
        #[arg(long)]
        zone: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let username = require_credential(cli.username, "--username", "ICANN_USERNAME")?;
    let password = require_credential(cli.password, "--password", "ICANN_PASSWORD")?;
    let workers = cli.workers.max(1);

    let cancel = CancellationToken::new();
    spawn_signal_handler(cancel.clone());

    let api = create_http_client(HttpClientConfig::api())?;
    let auth_url = env_or("ICANN_AUTH_URL", DEFAULT_AUTH_URL);
    let token = authenticate(&api, &auth_url, &username, &password).await?;

    let transfer = create_http_client(HttpClientConfig::transfer(token.bearer_headers()?))?;
    let sink = Sink::for_root(&cli.output, RetryPolicy::default()).await?;

    let outcome = match cli.command {
        Commands::All => run_all(transfer, sink, &cli.output, workers, &cancel).await,
        Commands::One { zone } => {
            run_one(transfer, sink, &cli.output, workers, &zone, &cancel).await
        }
    };

    match outcome {
        // A shutdown request is an orderly exit, not an error.
        Err(e) if e.is_cancelled() => {
            info!("Cancelled before completion");
            Ok(())
        }
        other => other,
    }
}

async fn run_all(
    transfer: ClientWithMiddleware,
    sink: Sink,
    output: &str,
    workers: usize,
    cancel: &CancellationToken,
) -> Result<()> {
    let api_base = env_or("ICANN_CZDS_BASE_URL", DEFAULT_API_BASE_URL);
    // The link list needs the same bearer token as the downloads.
    let links = zone_links(&transfer, &api_base).await?;
    info!("Account may download {} zone(s)", links.len());

    let downloader = DownloaderBuilder::new()
        .chunk_count((workers / 2).max(1))
        .build();
    let config = PoolConfig {
        workers,
        style_options: StyleOptions::default(),
    };
    let dispatcher = Dispatcher::new(config, transfer, downloader, sink, output);

    let report = dispatcher.run(&links, cancel).await;
    report_run(&report);
    Ok(())
}

async fn run_one(
    transfer: ClientWithMiddleware,
    sink: Sink,
    output: &str,
    workers: usize,
    zone: &str,
    cancel: &CancellationToken,
) -> Result<()> {
    let download_base = env_or("ICANN_DOWNLOAD_BASE_URL", DEFAULT_DOWNLOAD_BASE_URL);
    let link = single_zone_link(&download_base, zone);
    let job = TransferJob::new(&link, output)?;

    let downloader = DownloaderBuilder::new().chunk_count(workers).build();
    let progress = ProgressDisplay::new(StyleOptions::default(), 1, true);

    let assembled = downloader
        .download(&transfer, &job.url, &progress, cancel)
        .await?;
    let size = sink.save(&job.target, &job.zone, assembled, cancel).await?;
    progress.finish();

    info!("Saved zone {} to {} ({size} bytes)", job.zone, job.target);
    Ok(())
}

fn report_run(report: &RunReport) {
    for summary in report.failures() {
        if let Status::Fail(msg) = summary.status() {
            warn!("Zone {} failed: {msg}", summary.job().zone);
        }
    }
    match report.outcome() {
        RunOutcome::Completed => info!(
            "Done: {} zone(s) saved, {} failed",
            report.succeeded(),
            report.failed()
        ),
        RunOutcome::Cancelled => info!(
            "Cancelled: {} zone(s) saved, {} failed, {} abandoned",
            report.succeeded(),
            report.failed(),
            report.cancelled()
        ),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info,zonepull=debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn require_credential(value: Option<String>, flag: &str, var: &str) -> Result<String> {
    value.ok_or_else(|| Error::AuthFailure(format!("missing credential: set {flag} or {var}")))
}

fn env_or(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.to_string())
}

fn spawn_signal_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutdown requested, finishing in-flight transfers");
        cancel.cancel();
    });
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(e) => {
            warn!("Cannot listen for SIGTERM: {e}");
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = sigterm.recv() => {}
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
