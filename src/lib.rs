//! soundcue — procedural UI feedback sounds.
//!
//! Synthesizes short interface cues (clicks, hovers, chimes, sweeps)
//! entirely from oscillators, noise buffers, filters and gain envelopes;
//! no audio assets. The engine is cosmetic by contract: every public
//! method returns immediately and degrades to silence instead of
//! surfacing errors to the UI.
//!
//! ```no_run
//! use soundcue::{EngineConfig, PlayOptions, SoundEngine, SoundFeedback, SoundKind};
//!
//! let sounds = SoundEngine::new(EngineConfig::default());
//! sounds.play(SoundKind::Click, PlayOptions::default());
//! sounds.play(
//!     SoundKind::Hover,
//!     PlayOptions { rate: Some(2.0), ..Default::default() },
//! );
//! sounds.set_master_volume(0.3);
//! ```

pub mod config;
pub mod device;
pub mod dsp;
pub mod engine;
pub mod error;

pub use config::EngineConfig;
pub use device::{DeviceOutput, Output};
pub use dsp::builders::{PlayOptions, SoundKind};
pub use engine::{NullSoundEngine, SharedSounds, SoundEngine, SoundFeedback, null_sounds};
pub use error::EngineError;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
