// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

mod capture;
mod config;
mod receiver;
mod summary;
mod transport;

use std::path::PathBuf;

use clap::Parser;
use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};

use ulapi_app::{init_logging, ConfigFile};
use ulapi_core::DynResult;

use capture::SampleCapture;
use config::ReceiverConfig;
use receiver::ReceiveStats;
use summary::SlotSummary;
use transport::ZmqTransport;

const PKG_DESCRIPTION: &str = concat!(env!("CARGO_PKG_NAME"), " - uplink slot API subscriber");

#[derive(Debug, Parser)]
#[command(
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = PKG_DESCRIPTION,
)]
struct Cli {
    /// Path to configuration file
    #[arg(long = "config", short = 'C', value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print example configuration and exit
    #[arg(long = "print-config")]
    print_config: bool,
    /// Publisher endpoint (e.g. ipc:///tmp/sni5gect-ul-api.zmq)
    #[arg(short = 'e', long = "endpoint")]
    endpoint: Option<String>,
    /// PRB map capacity the producer was built with
    #[arg(long = "max-prb")]
    max_prb: Option<usize>,
    /// Directory for IQ capture files
    #[arg(long = "capture-dir", value_name = "DIR")]
    capture_dir: Option<String>,
    /// Do not write IQ captures
    #[arg(long = "no-capture")]
    no_capture: bool,
    /// Do not print slot summaries
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

/// CLI flags take precedence over the config file.
fn apply_cli(cli: &Cli, cfg: &mut ReceiverConfig) {
    if let Some(ref endpoint) = cli.endpoint {
        cfg.subscribe.endpoint = endpoint.clone();
    }
    if let Some(max_prb) = cli.max_prb {
        cfg.decoder.max_prb = max_prb;
    }
    if let Some(ref dir) = cli.capture_dir {
        cfg.capture.dir = dir.clone();
    }
    if cli.no_capture {
        cfg.capture.enabled = false;
    }
    if cli.quiet {
        cfg.output.print_summary = false;
    }
}

fn log_stats(stats: &ReceiveStats) {
    info!(
        "Receiver stopped: {} received, {} decoded, {} rejected",
        stats.received, stats.decoded, stats.rejected
    );
}

#[tokio::main]
async fn main() -> DynResult<()> {
    let cli = Cli::parse();

    if cli.print_config {
        println!("{}", ReceiverConfig::example_toml());
        return Ok(());
    }

    let (mut cfg, config_path) = if let Some(ref path) = cli.config {
        let cfg = ReceiverConfig::load_from_file(path)?;
        (cfg, Some(path.clone()))
    } else {
        ReceiverConfig::load_from_default_paths()?
    };
    apply_cli(&cli, &mut cfg);
    cfg.validate()
        .map_err(|e| format!("Invalid receiver configuration: {}", e))?;

    init_logging(cfg.general.log_level.as_deref());

    if let Some(ref path) = config_path {
        info!("Loaded configuration from {}", path.display());
    }

    let wire = cfg.decoder.wire_format();
    info!(
        "Starting ulapi-receiver (endpoint: {}, max_prb: {}, header: {} bytes)",
        cfg.subscribe.endpoint,
        wire.max_prb,
        wire.header_size()
    );

    let mut capture = SampleCapture::from_config(&cfg.capture)?;
    if capture.is_some() {
        info!("Capturing IQ samples to {}", cfg.capture.dir);
    }

    let mut transport = ZmqTransport::connect(&cfg.subscribe)?;
    let print_summary = cfg.output.print_summary;
    let sample_rate_hz = cfg.decoder.sample_rate_hz;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    info!("Listening for uplink API messages...");
    let mut worker = tokio::task::spawn_blocking(move || {
        receiver::run_receive_loop(&mut transport, &wire, &shutdown_rx, |msg| {
            if print_summary {
                println!("{}", SlotSummary::new(msg.header(), sample_rate_hz));
            }
            if let Some(capture) = capture.as_mut() {
                if let Err(e) = capture.write(&msg) {
                    warn!("IQ capture failed: {}", e);
                }
            }
        })
    });

    tokio::select! {
        res = &mut worker => {
            let stats = res??;
            log_stats(&stats);
            return Ok(());
        }
        res = signal::ctrl_c() => {
            res?;
            info!("Ctrl+C received, shutting down");
            let _ = shutdown_tx.send(true);
        }
    }

    let stats = worker.await??;
    log_stats(&stats);
    Ok(())
}
