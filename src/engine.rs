//! Public engine surface: `SoundFeedback`, `SoundEngine`, and the
//! inert `NullSoundEngine` fallback.
//!
//! Everything the host site touches goes through `SoundFeedback`. The
//! contract toward call sites is strict: no method ever panics, blocks,
//! or surfaces an error — a cue that cannot play degrades to silence.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::config::EngineConfig;
use crate::device::{DeviceOutput, Output};
use crate::dsp::builders::{self, PlayOptions, SoundKind};
use crate::error::EngineError;

/// The surface every UI call site programs against.
///
/// All methods take `&self` and return immediately; `play()` only
/// schedules work for the device's render thread.
pub trait SoundFeedback {
    /// Fire one feedback sound. A no-op when disabled, when the device
    /// context cannot be created, or for reserved kinds.
    fn play(&self, kind: SoundKind, options: PlayOptions);
    /// Global mute switch. Disabling only prevents new voices; anything
    /// already scheduled completes its envelope.
    fn set_enabled(&self, enabled: bool);
    fn is_enabled(&self) -> bool;
    /// Set master volume, silently clamped to [0, 1]. Heard immediately
    /// by in-flight voices.
    fn set_master_volume(&self, volume: f64);
    fn master_volume(&self) -> f64;
}

/// Shared handle UI code is composed with.
pub type SharedSounds = Rc<dyn SoundFeedback>;

/// Factory for the device seam; injected so lazy-init and failure-retry
/// behavior are testable without real hardware.
pub type OutputFactory = Box<dyn Fn(f64) -> Result<Box<dyn Output>, EngineError>>;

struct EngineState {
    enabled: bool,
    master_volume: f64,
    output: Option<Box<dyn Output>>,
}

/// The one sound engine instance for a process, constructed at startup
/// and passed by reference to call sites.
///
/// Deliberately single-threaded on the calling side: state lives in a
/// `RefCell` and only the mixer crosses to the render thread (behind its
/// own lock inside the `Output` implementation).
pub struct SoundEngine {
    state: RefCell<EngineState>,
    open_output: OutputFactory,
}

impl SoundEngine {
    /// Engine wired to the real device output.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_output_factory(
            config,
            Box::new(|gain| DeviceOutput::open(gain).map(|o| Box::new(o) as Box<dyn Output>)),
        )
    }

    /// Engine with an injected output factory (fakes in tests).
    pub fn with_output_factory(config: EngineConfig, open_output: OutputFactory) -> Self {
        let config = config.clamped();
        SoundEngine {
            state: RefCell::new(EngineState {
                enabled: config.enabled,
                master_volume: config.master_volume,
                output: None,
            }),
            open_output,
        }
    }

    /// Whether a device context has been created yet.
    pub fn has_context(&self) -> bool {
        self.state.borrow().output.is_some()
    }
}

impl SoundFeedback for SoundEngine {
    fn play(&self, kind: SoundKind, options: PlayOptions) {
        let state = &mut *self.state.borrow_mut();
        // Disabled costs nothing: no context, no graphs.
        if !state.enabled {
            return;
        }

        // Lazy construction; failure degrades this call only and is
        // retried from scratch next time.
        if state.output.is_none() {
            match (self.open_output)(state.master_volume) {
                Ok(output) => state.output = Some(output),
                Err(err) => {
                    debug!(%err, ?kind, "audio unavailable, dropping cue");
                    return;
                }
            }
        }
        let Some(output) = state.output.as_deref() else {
            return;
        };

        let voices = builders::build(kind, options, output.sample_rate());
        if !voices.is_empty() {
            output.submit(voices);
        }
    }

    fn set_enabled(&self, enabled: bool) {
        self.state.borrow_mut().enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.state.borrow().enabled
    }

    fn set_master_volume(&self, volume: f64) {
        // Non-finite input is ignored rather than propagated.
        if !volume.is_finite() {
            return;
        }
        let state = &mut *self.state.borrow_mut();
        state.master_volume = volume.clamp(0.0, 1.0);
        if let Some(output) = &state.output {
            output.set_master_gain(state.master_volume);
        }
    }

    fn master_volume(&self) -> f64 {
        self.state.borrow().master_volume
    }
}

/// Inert implementation handed to call sites when no engine has been
/// composed. Same shape, every method a true no-op.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSoundEngine;

impl SoundFeedback for NullSoundEngine {
    fn play(&self, _kind: SoundKind, _options: PlayOptions) {}

    fn set_enabled(&self, _enabled: bool) {}

    fn is_enabled(&self) -> bool {
        false
    }

    fn set_master_volume(&self, _volume: f64) {}

    fn master_volume(&self) -> f64 {
        0.0
    }
}

/// Default composition: a handle that safely does nothing.
pub fn null_sounds() -> SharedSounds {
    Rc::new(NullSoundEngine)
}
