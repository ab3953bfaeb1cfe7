//! statgauge - Prometheus exporter for `/proc/stat`.
//!
//! Every scrape reads `/proc/stat` once, parses it into a fresh snapshot and
//! serves each per-core and scalar counter as a gauge.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod handlers;
mod state;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use clap::Parser;
use tower_http::compression::CompressionLayer;
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

#[cfg(not(target_os = "linux"))]
use statgauge_core::collector::MockFs;
#[cfg(target_os = "linux")]
use statgauge_core::collector::RealFs;
use statgauge_core::collector::{FileSystem, StatCollector};

use state::{AppState, HostCollector, SharedState};

const HEALTH_PATH: &str = "/api/v1/health";
const SNAPSHOT_PATH: &str = "/api/v1/snapshot";

// ============================================================
// CLI
// ============================================================

#[derive(Parser)]
#[command(name = "statgauge", about = "Prometheus exporter for /proc/stat", version = statgauge_core::VERSION)]
struct Args {
    /// Listen address.
    #[arg(long, default_value = "0.0.0.0:8080", env = "STATGAUGE_LISTEN")]
    listen: SocketAddr,

    /// Path to /proc filesystem; counters are read from `<PROC_PATH>/stat`.
    #[arg(long, default_value = "/proc", env = "STATGAUGE_PROC_PATH")]
    proc_path: PathBuf,

    /// Path under which metrics are exposed.
    #[arg(long, default_value = "/metrics", env = "STATGAUGE_TELEMETRY_PATH", value_parser = parse_route_path)]
    telemetry_path: String,

    /// Upper bound in milliseconds for reading and parsing the stat source
    /// during one scrape.
    #[arg(long, default_value = "5000", env = "STATGAUGE_SCRAPE_TIMEOUT_MS")]
    scrape_timeout_ms: u64,

    /// Value of the constant `domain` label on stat gauges. Empty disables the label.
    #[arg(long, default_value = "fs", env = "STATGAUGE_DOMAIN")]
    domain: String,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Validates the metrics route: absolute and not shadowing a built-in route.
fn parse_route_path(s: &str) -> Result<String, String> {
    let s = s.trim();
    if !s.starts_with('/') || s.len() < 2 {
        return Err(format!("invalid path '{}': must start with '/' and name a route", s));
    }
    if s == HEALTH_PATH || s == SNAPSHOT_PATH {
        return Err(format!("path '{}' is reserved", s));
    }
    Ok(s.to_string())
}

// ============================================================
// Main
// ============================================================

fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "failed to build tokio runtime");
            process::exit(1);
        }
    };

    runtime.block_on(async_main(args));
}

/// Initializes the tracing subscriber with the appropriate log level.
/// Default level is INFO. Use -q for quiet mode (errors only).
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    for target in ["statgauge", "statgauge_core"] {
        if let Ok(directive) = format!("{}={}", target, level).parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn async_main(args: Args) {
    info!(
        version = statgauge_core::VERSION,
        proc_path = %args.proc_path.display(),
        "starting"
    );

    let collector = Arc::new(create_collector(&args.proc_path));
    if !collector.source_exists() {
        warn!(
            path = %collector.stat_path().display(),
            "stat source not found, scrapes stay empty until it is readable"
        );
    }

    let domain = Some(args.domain.as_str()).filter(|d| !d.is_empty());
    let scrape_timeout = Duration::from_millis(args.scrape_timeout_ms);
    let state = match AppState::new(collector, domain, scrape_timeout) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            error!(error = %e, "failed to register metrics");
            process::exit(1);
        }
    };

    let app = build_router(state, &args.telemetry_path);

    let listener = match tokio::net::TcpListener::bind(args.listen).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %args.listen, error = %e, "failed to bind");
            process::exit(1);
        }
    };
    info!(addr = %args.listen, path = %args.telemetry_path, "listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "server error");
        process::exit(1);
    }
    info!("stopped");
}

fn create_collector(proc_path: &Path) -> HostCollector {
    #[cfg(target_os = "linux")]
    let fs: Box<dyn FileSystem> = Box::new(RealFs::new());
    #[cfg(not(target_os = "linux"))]
    let fs: Box<dyn FileSystem> = Box::new(MockFs::typical_system());

    StatCollector::new(fs, proc_path)
}

fn build_router(state: SharedState, telemetry_path: &str) -> Router {
    Router::new()
        .route(telemetry_path, get(handlers::handle_metrics))
        .route(HEALTH_PATH, get(handlers::handle_health))
        .route(SNAPSHOT_PATH, get(handlers::handle_snapshot))
        .with_state(state)
        .layer(CompressionLayer::new())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => {
            error!(error = %e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
