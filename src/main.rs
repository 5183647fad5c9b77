//! Steedfield - gesture-driven particle morphing
//!
//! Main entry point for the CLI application.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{error, info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use steedfield::{
    config::{Config, DeviceTier, TrackingConfig},
    engine::{run_loop, Command, IntervalTicker, LoopInputs, Scene},
    gallery::PhotoAssets,
    output::headless::HeadlessSink,
    silhouette,
    tracking::{self, HandFrame},
    web::WebServer,
    ServiceHub,
};

/// Steedfield - particle steed and photo gallery driven by hand gestures
#[derive(Parser, Debug)]
#[command(name = "steedfield", version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Skip hand tracking and start in manual mode
    #[arg(long)]
    manual: bool,

    /// Device tier: desktop or constrained (overrides config)
    #[arg(long)]
    tier: Option<DeviceTier>,

    /// Particle count (overrides config)
    #[arg(long)]
    particles: Option<usize>,

    /// Photo directory (overrides config)
    #[arg(long)]
    photos: Option<PathBuf>,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// Disable HTTP server
    #[arg(long)]
    no_http: bool,

    /// HTTP server port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy(),
        )
        .init();

    info!("Starting {} v{}", steedfield::NAME, steedfield::VERSION);

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(run(args));

    // The console reader may still be parked on stdin
    runtime.shutdown_timeout(Duration::from_secs(1));

    info!("Steedfield stopped");
    result
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = if let Some(ref path) = args.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };

    // Apply CLI overrides
    if let Some(tier) = args.tier {
        config.device.tier = tier;
    }
    if let Some(count) = args.particles {
        config.particles.count = Some(count);
    }
    if let Some(ref dir) = args.photos {
        config.gallery.photo_dir = Some(dir.clone());
    }
    if args.manual {
        config.tracking.enabled = false;
    }
    if args.no_http {
        config.http.enabled = false;
    }
    if let Some(port) = args.port {
        config.http.port = port;
    }

    config.validate()?;
    Ok(config)
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = load_config(&args)?;

    info!("Device tier: {:?}", config.device.tier);
    info!("Hand tracking: {}", config.tracking.enabled);
    info!("HTTP server: {}", config.http.enabled);

    let silhouette = silhouette::load(&config)?;
    let mut scene = Scene::new(&config, silhouette);

    let (hub, commands) = ServiceHub::new(config.clone());

    // Console commands
    let console_hub = Arc::clone(&hub);
    tokio::spawn(async move {
        if let Err(e) = read_console(console_hub).await {
            error!("Console reader error: {}", e);
        }
    });

    spawn_photo_resolution(&hub, &config);

    let hands = if config.tracking.enabled {
        Some(spawn_hand_tracking(&hub, &config.tracking))
    } else {
        info!("Hand tracking disabled, manual mode only");
        hub.send_command(Command::TrackerFailed("hand tracking disabled".to_string()))
            .await;
        None
    };

    // Start HTTP server if enabled
    if config.http.enabled {
        let http_hub = Arc::clone(&hub);
        tokio::spawn(async move {
            if let Err(e) = run_http_server(http_hub).await {
                error!("HTTP server error: {}", e);
            }
        });
    }

    let mut ticker = IntervalTicker::new(config.animation.fps, args.frames);
    let mut sink = HeadlessSink::new(u64::from(config.animation.fps) * 5);
    let inputs = LoopInputs { commands, hands };

    tokio::select! {
        frames = run_loop(&mut scene, &mut ticker, &mut sink, inputs, Some(hub.as_ref())) => {
            info!("Tick loop finished after {} frames", frames);
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    hub.shutdown();

    // Give tasks a moment to clean up
    tokio::time::sleep(Duration::from_millis(500)).await;
    Ok(())
}

/// Resolve photo slots in the background and feed them to the tick loop
fn spawn_photo_resolution(hub: &Arc<ServiceHub>, config: &Config) {
    let (photo_tx, mut photo_rx) = mpsc::channel(32);
    let assets = PhotoAssets::new(&config.gallery);

    tokio::spawn(async move {
        let delivered = assets.resolve_all(photo_tx).await;
        info!("Resolved {} photos", delivered);
    });

    let photo_hub = Arc::clone(hub);
    tokio::spawn(async move {
        while let Some(photo) = photo_rx.recv().await {
            if !photo_hub.send_command(Command::PhotoResolved(photo)).await {
                break;
            }
        }
    });
}

/// Start the hand tracker and report its startup outcome as a command
fn spawn_hand_tracking(
    hub: &Arc<ServiceHub>,
    config: &TrackingConfig,
) -> watch::Receiver<HandFrame> {
    let (frames_tx, frames_rx) = watch::channel(HandFrame::default());
    let (ready_tx, ready_rx) = oneshot::channel();

    let tracking_config = config.clone();
    let shutdown_rx = hub.subscribe_shutdown();
    tokio::spawn(async move {
        if let Err(e) =
            tracking::run_hand_tracking(tracking_config, frames_tx, ready_tx, shutdown_rx).await
        {
            error!("Hand tracking error: {}", e);
        }
    });

    let ready_hub = Arc::clone(hub);
    tokio::spawn(async move {
        let command = match ready_rx.await {
            Ok(Ok(())) => {
                ready_hub.set_tracker_connected(true);
                Command::TrackerReady
            }
            Ok(Err(e)) => Command::TrackerFailed(e.to_string()),
            Err(_) => Command::TrackerFailed("hand tracker exited during startup".to_string()),
        };
        ready_hub.send_command(command).await;
    });

    frames_rx
}

async fn read_console(hub: Arc<ServiceHub>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut shutdown_rx = hub.subscribe_shutdown();

    info!("Console: t = toggle, p <x> <y> = pick, c = close, m = mute, q = quit");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    return Ok(());
                };
                match Command::from_console(&line) {
                    Some(command) => {
                        if !hub.send_command(command).await {
                            return Ok(());
                        }
                    }
                    None if line.trim().is_empty() => {}
                    None => warn!("Unknown command: {}", line.trim()),
                }
            }
            _ = shutdown_rx.recv() => return Ok(()),
        }
    }
}

async fn run_http_server(hub: Arc<ServiceHub>) -> anyhow::Result<()> {
    let config = hub.config.read().await;
    let http_config = config.http.clone();
    drop(config);

    let web_server = WebServer::new(Arc::clone(&hub), &http_config);

    let addr = format!("{}:{}", http_config.host, http_config.port);
    info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    let mut shutdown_rx = hub.subscribe_shutdown();

    axum::serve(listener, web_server.router())
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
        })
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
