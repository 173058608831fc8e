//! CLI entry point for typed-routes.
//!
//! This binary writes `router.d.ts` for an `expo-router` app directory,
//! either once or continuously while files change.
//!
//! # Usage
//!
//! ```bash
//! typed-routes [OPTIONS] <COMMAND>
//!
//! # Write the declaration file once
//! typed-routes generate --root /path/to/app --output-dir /path/to/.expo/types
//!
//! # Keep it current while files change
//! typed-routes watch --root /path/to/app --debounce-ms 500
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::io::Write;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use color_eyre::eyre::{WrapErr, eyre};
use tr_core::Config;
use tr_scanner::SKIP_DIRECTORIES;
use tr_session::{RegenerationOutcome, SessionStats, WatchSession};
use tr_typegen::TypedRoutesGenerator;
use tr_watcher::{FileWatcher, SkipDirsFilter};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Generates typed `expo-router` hrefs for an app directory.
#[derive(Parser)]
#[command(name = "typed-routes", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration file.
    ///
    /// Flags override values from this file.
    #[arg(short, long, global = true, env = "TYPED_ROUTES_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Routes directory to index.
    #[arg(short, long, global = true, env = "TYPED_ROUTES_APP_ROOT")]
    root: Option<Utf8PathBuf>,

    /// Directory receiving `router.d.ts`.
    #[arg(short, long, global = true, env = "TYPED_ROUTES_OUTPUT_DIR")]
    output_dir: Option<Utf8PathBuf>,

    /// Quiescence interval before regenerating, in milliseconds.
    #[arg(long, global = true)]
    debounce_ms: Option<u64>,

    /// Allow any subset of group segments in typed hrefs.
    #[arg(long, global = true)]
    partial_typed_groups: bool,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Scan the routes directory and write the declaration file once.
    Generate,

    /// Write the declaration file, then keep it current as files change.
    Watch {
        /// Skip the initial write and only regenerate on changes.
        #[arg(long)]
        no_initial: bool,
    },
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise, uses
/// `debug` level if `--verbose` is set, or `info` level by default.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(format!("{level},notify=warn"))
    });

    // Check if colors should be disabled (flag or NO_COLOR env var)
    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_ansi(use_ansi))
        .with(filter)
        .init();
}

/// Builds a [`Config`] from the config file and CLI flags.
///
/// The app root is canonicalized so that watcher paths, which arrive
/// canonical, line up with it.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or the result fails
/// validation.
fn build_config(cli: &Cli) -> color_eyre::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_json_file(path)
            .wrap_err_with(|| format!("Failed to load config file: {path}"))?,
        None => Config::default(),
    };

    if let Some(root) = &cli.root {
        config.project.app_root = Some(root.clone());
    }
    if let Some(output_dir) = &cli.output_dir {
        config.typegen.output_dir.clone_from(output_dir);
    }
    if let Some(debounce_ms) = cli.debounce_ms {
        config.watch.debounce_ms = debounce_ms;
    }
    if cli.partial_typed_groups {
        config.typegen.partial_typed_groups = true;
    }

    if let Some(root) = &config.project.app_root {
        if root.exists() {
            config.project.app_root = Some(
                root.canonicalize_utf8()
                    .wrap_err_with(|| format!("Failed to resolve app root: {root}"))?,
            );
        }
    }

    config.validate()?;
    Ok(config)
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Writes the declaration file once.
///
/// # Errors
///
/// Returns an error if no app root is configured, the scan fails, or the
/// declaration cannot be generated or written.
fn run_generate(config: &Config) -> color_eyre::Result<()> {
    if config.project.app_root.is_none() {
        return Err(eyre!("No app root configured; pass --root or set project.app_root"));
    }

    let mut session = WatchSession::start(config, TypedRoutesGenerator)?;
    let outcome = session.regenerate_now();
    let stats = session.teardown();

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    match outcome {
        RegenerationOutcome::Written { path, bytes } => {
            writeln!(
                handle,
                "Wrote {path} ({bytes} bytes, {} routes)",
                stats.routes
            )?;
            Ok(())
        }
        RegenerationOutcome::Skipped => {
            writeln!(
                handle,
                "No route files found, {} left untouched",
                config.typegen.declaration_path()
            )?;
            Ok(())
        }
        RegenerationOutcome::Failed { error } => {
            Err(color_eyre::Report::new(error).wrap_err("Failed to generate route declarations"))
        }
    }
}

/// Runs a watch session until the event stream closes or a shutdown signal
/// arrives.
///
/// # Errors
///
/// Returns an error if the initial scan or the watcher fails to start.
async fn run_watch(config: Config, no_initial: bool) -> color_eyre::Result<()> {
    let mut session = WatchSession::start(&config, TypedRoutesGenerator)?;

    let Some(root) = config.project.app_root.clone() else {
        warn!("No app root configured, nothing to watch");
        log_stats(&session.teardown())?;
        return Ok(());
    };

    if !no_initial {
        session.regenerate_now();
    }

    let filter = SkipDirsFilter::new(SKIP_DIRECTORIES);
    let mut watcher = FileWatcher::new(&root, &config.watch, filter).await?;
    info!(path = %watcher.watch_path(), "Watching for changes");

    // Handle SIGTERM for graceful shutdown on Unix
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            () = session.run(watcher.events()) => {
                info!("Event stream closed");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl-C, shutting down");
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down");
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::select! {
            () = session.run(watcher.events()) => {
                info!("Event stream closed");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl-C, shutting down");
            }
        }
    }

    let stats = session.teardown();
    if let Err(e) = watcher.shutdown().await {
        warn!(error = %e, "File watcher did not stop cleanly");
    }
    log_stats(&stats)
}

/// Logs session counters as one JSON line.
fn log_stats(stats: &SessionStats) -> color_eyre::Result<()> {
    let json = serde_json::to_string(stats).wrap_err("Failed to serialize session stats")?;
    info!(stats = %json, "Session statistics");
    Ok(())
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    // 1. Install color-eyre FIRST (before any potential panics)
    color_eyre::install()?;

    // 2. Parse CLI arguments
    let cli = Cli::parse();

    // 3. Initialize tracing (handles --no-color for log output)
    init_tracing(cli.verbose, cli.no_color);

    // 4. Merge config file and flags
    let config = build_config(&cli)?;

    // 5. Route to appropriate command
    match &cli.command {
        Commands::Generate => run_generate(&config),
        Commands::Watch { no_initial } => run_watch(config, *no_initial).await,
    }
}
