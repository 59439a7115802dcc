//! Typewriter Demo - Terminal Surface for the Presenter Engine
//!
//! Reads one message per line from stdin and presents each on stdout with the
//! typewriter reveal. A new line arriving mid-reveal supersedes the running
//! one; Ctrl-C interrupts the running reveal, a second Ctrl-C while idle exits.
//!
//! # Usage
//!
//! ```bash
//! # Pipe a conversation through
//! printf 'Hello there!\nHow can I help?\n' | typewriter-demo
//!
//! # Faster typing, custom name
//! typewriter-demo --delay-ms 20 --name Yollayah
//!
//! # With beeps (build with `--features audio`)
//! typewriter-demo --config ~/.config/typewriter-presenter/presenter.toml
//!
//! # Watch the avatar frames
//! RUST_LOG=presenter_demo=debug typewriter-demo
//! ```

mod surface;

#[cfg(feature = "audio")]
mod audio;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use presenter_core::{
    load_config_from_path, AudioCapability, AudioError, AvatarAnimator, ConfigOverrides,
    PresentationController, PresenterConfig, ToneSynthesizer,
};

use surface::{FrameReporter, TerminalSink};

/// Typewriter Demo - reveal chat responses in the terminal
#[derive(Parser, Debug)]
#[command(name = "typewriter-demo")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, env = "PRESENTER_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Delay between characters in milliseconds
    #[arg(short = 'd', long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Mouth animation interval in milliseconds
    #[arg(short = 'm', long, value_name = "MS")]
    mouth_interval_ms: Option<u64>,

    /// Avatar name shown before each response
    #[arg(short = 'n', long)]
    name: Option<String>,

    /// Disable beeps even when audio is available
    #[arg(long)]
    silent: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, env = "PRESENTER_LOG_LEVEL", default_value = "warn")]
    log_level: String,
}

/// Initialize logging with the specified level
fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "presenter_demo={level},presenter_core={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn load_configuration(args: &Args) -> Result<PresenterConfig> {
    let path = args
        .config
        .clone()
        .or_else(presenter_core::default_config_path);
    let mut config = load_config_from_path(path).context("Failed to load configuration")?;

    let mut overrides = ConfigOverrides::new();
    if let Some(ms) = args.delay_ms {
        overrides = overrides.with_delay_ms(ms);
    }
    if let Some(ms) = args.mouth_interval_ms {
        overrides = overrides.with_mouth_interval_ms(ms);
    }
    if let Some(ref name) = args.name {
        overrides = overrides.with_avatar_name(name.clone());
    }
    overrides
        .apply(&mut config)
        .context("Invalid command-line override")?;

    info!(source = %config.source(), "Configuration loaded");
    Ok(config)
}

#[cfg(feature = "audio")]
fn open_audio() -> Result<Arc<dyn AudioCapability>, AudioError> {
    audio::RodioAudio::open().map(|a| Arc::new(a) as Arc<dyn AudioCapability>)
}

#[cfg(not(feature = "audio"))]
fn open_audio() -> Result<Arc<dyn AudioCapability>, AudioError> {
    Err(AudioError::Unavailable(
        "built without the `audio` feature".to_string(),
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let config = load_configuration(&args)?;
    let timing = config.timing;

    let tone = if args.silent {
        ToneSynthesizer::silent(timing.tone())
    } else {
        ToneSynthesizer::new(timing.tone(), open_audio)
    };
    info!(audio = tone.is_available(), "Tone synthesizer ready");

    let display = Arc::new(FrameReporter::new(config.avatar.clone()));
    let animator = AvatarAnimator::new(display, timing.mouth_toggle_interval);
    let controller = Arc::new(PresentationController::from_parts(&timing, animator, tone));

    let prompt = format!("{}> ", config.avatar.name);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut current: Option<JoinHandle<()>> = None;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                let text = line.trim().to_string();
                if text.is_empty() {
                    continue;
                }

                // Supersede the running reveal and let it close its line first
                if let Some(previous) = current.take() {
                    controller.interrupt();
                    if let Err(e) = previous.await {
                        warn!(error = %e, "Presentation task failed");
                    }
                }

                let controller = Arc::clone(&controller);
                let prompt = prompt.clone();
                current = Some(tokio::spawn(async move {
                    let sink = Arc::new(TerminalSink::start_line(&prompt));
                    let outcome = controller.present(&text, sink.clone()).await;
                    sink.finish_line(outcome);
                }));
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for Ctrl-C")?;
                if controller.interrupt() {
                    info!("Reveal interrupted");
                } else {
                    break;
                }
            }
        }
    }

    // Let the last message finish before exiting
    if let Some(handle) = current {
        if let Err(e) = handle.await {
            warn!(error = %e, "Presentation task failed");
        }
    }

    Ok(())
}
