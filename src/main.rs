//! SecureVault - Main Entry Point

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use securevault::api::commands;
use securevault::constants::{APP_NAME, APP_VERSION};
use securevault::logic::alert::AlertSink;
use securevault::logic::baseline::BaselineError;
use securevault::logic::config::Config;
use securevault::logic::monitor::{MonitorError, NotifyWatchSource, RealtimeMonitor};
use securevault::logic::process::SysinfoProcessSource;
use securevault::logic::runner::MonitorHandle;

#[derive(Parser)]
#[command(name = "securevault", version, about = "Ransomware behavior detection")]
struct Cli {
    /// Directory holding hash_db.json, the activity log and the honeypot
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Hash every file under ROOT and store the baseline
    Baseline {
        #[arg(default_value = ".")]
        root: PathBuf,
    },
    /// Compare the stored baseline against disk
    Scan,
    /// Create the decoy file if absent
    Honeypot,
    /// Watch ROOT for changes against the stored baseline
    Monitor {
        #[arg(default_value = ".")]
        root: PathBuf,
    },
    /// Flag processes holding high CPU
    CpuMonitor {
        /// CPU percent a sample must exceed
        #[arg(long)]
        threshold: Option<f32>,
        /// Window in seconds over which hits are counted
        #[arg(long)]
        window: Option<u64>,
        /// Hits within the window needed to alert
        #[arg(long)]
        repeat: Option<usize>,
        /// Seconds between sampling passes
        #[arg(long)]
        interval: Option<u64>,
    },
    /// Run the real-time and CPU monitors together
    Watch {
        #[arg(default_value = ".")]
        root: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env(),
    };
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    log::info!("Starting {} v{}", APP_NAME, APP_VERSION);

    match cli.command {
        Command::Baseline { root } => {
            let baseline = commands::build_baseline(&config, &root)?;
            println!(
                "Baseline created with {} files: {}",
                baseline.len(),
                config.store_path().display()
            );
        }
        Command::Scan => {
            let changes = commands::manual_scan(&config).map_err(missing_hint)?;
            if changes.is_empty() {
                println!("No changes detected.");
            } else {
                println!("ALERT! Modified or deleted files:");
                for change in &changes {
                    println!(" - {}", change);
                }
            }
        }
        Command::Honeypot => {
            let path = config.honeypot_path();
            if commands::create_honeypot(&config)? {
                println!("Honeypot created: {}", path.display());
            } else {
                println!("Honeypot already exists: {}", path.display());
            }
        }
        Command::Monitor { root } => {
            let sink = open_sink(&config)?;
            let monitor = start_realtime(&config, &root, sink)?;
            println!("Real-time monitoring {} (Ctrl-C to stop)", root.display());
            wait_for_shutdown().await?;
            monitor.stop().await;
        }
        Command::CpuMonitor {
            threshold,
            window,
            repeat,
            interval,
        } => {
            if let Some(v) = threshold {
                config.cpu.threshold = v;
            }
            if let Some(v) = window {
                config.cpu.window_secs = v;
            }
            if let Some(v) = repeat {
                config.cpu.repeat_limit = v;
            }
            if let Some(v) = interval {
                config.cpu.check_interval_secs = v;
            }

            let sink = open_sink(&config)?;
            let monitor = start_cpu(&config, sink);
            println!("CPU monitoring started (Ctrl-C to stop)");
            wait_for_shutdown().await?;
            monitor.stop().await;
        }
        Command::Watch { root } => {
            let sink = open_sink(&config)?;
            let realtime = start_realtime(&config, &root, sink.clone())?;
            let cpu = start_cpu(&config, sink);
            println!("Monitoring {} and process CPU (Ctrl-C to stop)", root.display());
            wait_for_shutdown().await?;
            tokio::join!(realtime.stop(), cpu.stop());
        }
    }

    Ok(())
}

fn open_sink(config: &Config) -> anyhow::Result<Arc<dyn AlertSink>> {
    commands::default_sink(config)
        .with_context(|| format!("opening activity log {}", config.log_path().display()))
}

fn start_realtime(
    config: &Config,
    root: &std::path::Path,
    sink: Arc<dyn AlertSink>,
) -> anyhow::Result<RealtimeMonitor> {
    commands::start_realtime_monitor(config, root, &mut NotifyWatchSource, sink).map_err(|e| match e {
        MonitorError::Baseline(e) => missing_hint(e),
        other => other.into(),
    })
}

fn start_cpu(config: &Config, sink: Arc<dyn AlertSink>) -> MonitorHandle {
    let source = SysinfoProcessSource::new(config.cpu.sample_slice());
    commands::start_cpu_monitor(config, source, sink)
}

fn missing_hint(e: BaselineError) -> anyhow::Error {
    match e {
        BaselineError::NotFound(path) => anyhow::anyhow!(
            "no baseline at {}, run `securevault baseline` first",
            path.display()
        ),
        other => other.into(),
    }
}

async fn wait_for_shutdown() -> anyhow::Result<()> {
    tokio::signal::ctrl_c().await.context("listening for Ctrl-C")?;
    log::info!("Shutdown requested");
    Ok(())
}
