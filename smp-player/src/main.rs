//! SMP demo player - main entry point
//!
//! Hosts the playback controller over the simulated backend: scans a
//! folder into a catalog, plays through it, and prints controller
//! events until interrupted.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::signal;
use tokio::sync::broadcast;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use smp_common::config::load_player_config;
use smp_common::human_time::format_track_time;
use smp_common::PlayerEvent;
use smp_player::{catalog, PlaybackController, SimulatedBackend};

/// Command-line arguments for smp-player
#[derive(Parser, Debug)]
#[command(name = "smp-player")]
#[command(about = "Simple media player demo over a simulated backend")]
#[command(version)]
struct Args {
    /// Folder containing music files
    #[arg(short, long, env = "SMP_MUSIC_FOLDER")]
    folder: PathBuf,

    /// Path to a TOML config file (defaults to the platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "smp_player=info,smp_common=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = load_player_config(args.config.as_deref())
        .context("Failed to load player configuration")?;

    let tracks = catalog::scan_folder(&args.folder)
        .with_context(|| format!("Failed to scan {}", args.folder.display()))?;
    if tracks.is_empty() {
        bail!("no audio files found under {}", args.folder.display());
    }
    for track in &tracks {
        info!(
            "  [{}] {} - {} ({})",
            track.id,
            track.artist,
            track.title,
            track.formatted_duration()
        );
    }

    let controller = PlaybackController::spawn(Box::new(SimulatedBackend::default()), config);
    let mut events = controller.subscribe_events();

    controller.set_catalog(tracks);
    controller.play_at(0);

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(PlayerEvent::TrackChanged { track }) => {
                    info!("now playing: {} - {}", track.artist, track.title);
                }
                Ok(PlayerEvent::PlaybackStateChanged { playing }) => {
                    info!("playback {}", if playing { "started" } else { "stopped" });
                }
                Ok(PlayerEvent::ProgressUpdated { position_ms, duration_ms }) => {
                    info!(
                        "position {} / {}",
                        format_track_time(position_ms),
                        format_track_time(duration_ms)
                    );
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    info!("event stream lagged, {} events missed", missed);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            _ = signal::ctrl_c() => {
                info!("interrupt received");
                break;
            }
        }
    }

    controller.shutdown().await;
    info!("shutdown complete");
    Ok(())
}
