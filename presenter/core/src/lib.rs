//! Presenter Core - Chat Response Presentation Timing for ai-way
//!
//! This crate paces how an AI response appears on a chat surface: the text is
//! revealed character by character, the avatar's mouth flaps while it is
//! being revealed, and every non-blank character triggers a short beep.
//!
//! # Architecture
//!
//! ```text
//! Chat flow
//!     │ present(text, sink)
//!     ▼
//! PresentationController ── at most one running reveal, last writer wins
//!     │
//!     ▼
//! TypewriterEngine ── one character per tick, cancellable sessions
//!     │
//!     ├─→ AvatarAnimator   (mouth open/closed toggle task)
//!     ├─→ ToneSynthesizer  (best-effort square-wave beep)
//!     └─→ RevealSink       (surface-owned text target)
//! ```
//!
//! # Key Types
//!
//! - [`PresentationController`]: entry point for the chat flow
//! - [`TypewriterEngine`]: paced reveal of one message
//! - [`AvatarAnimator`]: two-frame talking animation
//! - [`ToneSynthesizer`]: per-character beep over an [`AudioCapability`]
//! - [`RevealSession`]: progress and status of one reveal
//! - [`TimingConfig`]: delays and tone parameters
//!
//! # Module Overview
//!
//! - [`audio`]: tone parameters, audio capability, waveform rendering
//! - [`avatar`]: mouth state, avatar display, animator
//! - [`config`]: timing and avatar configuration, TOML/env loading
//! - [`controller`]: reveal serialization
//! - [`session`]: reveal session lifecycle
//! - [`sink`]: reveal sink capability and a buffer sink
//! - [`typewriter`]: the reveal engine
//!
//! # No UI Dependencies
//!
//! Surfaces plug in through [`RevealSink`], [`AvatarDisplay`] and
//! [`AudioCapability`]; this crate never touches a terminal, DOM or device.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod audio;
pub mod avatar;
pub mod config;
pub mod controller;
pub mod session;
pub mod sink;
pub mod typewriter;

// Re-exports for convenience
pub use audio::{AudioCapability, AudioError, ToneSpec, ToneSynthesizer, ToneWaveform};
pub use avatar::{AvatarAnimator, AvatarDisplay, AvatarPhase, MouthState};
pub use config::{
    default_config_path, load_config, load_config_from_path, AvatarConfig, ConfigError,
    ConfigOverrides, ConfigSource, PresenterConfig, PresenterToml, TimingConfig,
};
pub use controller::PresentationController;
pub use session::{RevealOutcome, RevealSession, RevealStatus, SessionId};
pub use sink::{RevealSink, TranscriptSink};
pub use typewriter::TypewriterEngine;
