//! YogaTrack - pose-tracked yoga session recorder
//!
//! Consumes a stream of body-landmark frames, classifies yoga poses per
//! frame, debounces held poses into recorded events, and aggregates them
//! into a session that can be exported locally and saved to a cloud store.
//!
//! Module structure:
//! - `domain/` - Core types (Landmark, PoseKind, Session)
//! - `io/` - External interfaces (Frames, Capture, Export, Cloud)
//! - `services/` - Business logic (Classifier, Hold, Engine)
//! - `infra/` - Infrastructure (Config, Metrics)

use clap::Parser;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, watch};
use tracing::{error, info};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;
use yogatrack::domain::session::{epoch_ms, format_mm_ss};
use yogatrack::infra::{Config, Metrics};
use yogatrack::io::{CloudClient, FrameFeed, SessionExport};
use yogatrack::services::SessionEngine;

/// YogaTrack - pose-tracked yoga session recorder
#[derive(Parser, Debug)]
#[command(name = "yogatrack", version, about)]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "config/dev.toml")]
    config: String,

    /// Landmark frame source (JSONL); overrides the configured input
    #[arg(short, long)]
    input: Option<String>,

    /// Save the finished session to the cloud store
    #[arg(long)]
    save: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured logging with configurable level via RUST_LOG env var
    // Default: INFO, use RUST_LOG=debug for full event visibility
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .init();

    info!("yogatrack starting");

    let args = Args::parse();
    let config = Config::load_from_path(&args.config);
    let input = args.input.unwrap_or_else(|| config.capture_input().to_string());

    info!(
        config_file = %config.config_file(),
        input = %input,
        detection_threshold = %config.detection_threshold(),
        sustain_ms = %config.sustain_ms(),
        frame_interval_ms = %config.frame_interval_ms(),
        export_file = %config.export_file(),
        cloud_enabled = %config.cloud_enabled(),
        "config_loaded"
    );

    let metrics = Arc::new(Metrics::new());

    // Frame channel (bounded for backpressure)
    let (frame_tx, mut frame_rx) = mpsc::channel(256);

    // Start the frame feed; a broken source means no session starts at all
    let feed = FrameFeed::new(config.frame_interval_ms());
    if let Err(e) = feed.start(&input, frame_tx).await {
        error!(error = %e, "capture_start_failed");
        return Ok(());
    }

    // Session engine with an observer logging each stats update
    let mut engine = SessionEngine::with_metrics(&config, metrics.clone()).with_observer(
        Box::new(|stats, poses| {
            if let Some(latest) = poses.last() {
                info!(
                    pose = %latest.name,
                    time = %latest.time,
                    count = %stats.count,
                    best_pose = %stats.best_pose.as_deref().unwrap_or("-"),
                    avg_confidence_pct = %stats.avg_confidence_pct(),
                    "session_stats"
                );
            }
        }),
    );
    engine.start(epoch_ms());

    // 1 Hz elapsed-time display; independent of frame processing
    let session_clock = Instant::now();
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(std::time::Duration::from_secs(1));
        loop {
            tick.tick().await;
            let elapsed_ms = session_clock.elapsed().as_millis() as u64;
            info!(elapsed = %format_mm_ss(elapsed_ms), "session_time");
        }
    });

    // Periodic metrics reporter
    let metrics_clone = metrics.clone();
    let metrics_interval = config.metrics_interval_secs();
    tokio::spawn(async move {
        let mut tick =
            tokio::time::interval(std::time::Duration::from_secs(metrics_interval));
        loop {
            tick.tick().await;
            metrics_clone.report().log();
        }
    });

    // Shutdown on Ctrl+C
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("shutdown_signal_received");
        let _ = shutdown_tx.send(true);
    });

    // Main loop - frames are processed strictly in arrival order
    loop {
        tokio::select! {
            frame = frame_rx.recv() => {
                match frame {
                    Some(frame) => {
                        let process_start = Instant::now();
                        let no_person = frame.landmarks.is_none();
                        engine.process_frame(frame.landmarks.as_ref(), frame.ts_ms);
                        let latency_us = process_start.elapsed().as_micros() as u64;
                        metrics.record_frame(no_person, latency_us);
                    }
                    None => break, // Source exhausted
                }
            }
            _ = shutdown_rx.changed() => break,
        }
    }

    feed.stop();

    let summary = engine.end(epoch_ms());
    metrics.record_session_completed();

    // Local history first so a failed cloud save loses nothing
    let export = SessionExport::new(config.export_file());
    export.write_session(&summary);

    if args.save || config.cloud_enabled() {
        let cloud = CloudClient::new(&config);
        match cloud.save_session(&summary).await {
            Ok(user_id) => {
                metrics.record_cloud_save(true);
                info!(sid = %summary.sid, user_id = %user_id, "session_saved");
            }
            Err(e) => {
                metrics.record_cloud_save(false);
                error!(sid = %summary.sid, error = %e, "cloud_save_failed");
            }
        }
    }

    metrics.report().log();
    info!("yogatrack shutdown complete");
    Ok(())
}
