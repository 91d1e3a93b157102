//! Device audio output using cpal.
//! Works with JACK, ALSA, CoreAudio, WASAPI, etc.
//!
//! The device context is opened lazily on the first enabled `play()`
//! call and lives for the process lifetime. Construction can fail
//! (no device, platform policy); the failure is returned, never cached,
//! so the next call retries from scratch.

use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use parking_lot::Mutex;
use tracing::{error, info};

use crate::dsp::mixer::Mixer;
use crate::dsp::voice::VoiceGraph;
use crate::error::EngineError;

/// Seam between engine state and the platform device. The engine only
/// ever issues "start these voices" and "retune the master gain";
/// rendering happens on a thread it does not control.
pub trait Output {
    /// Hand freshly built voices to the render side.
    fn submit(&self, voices: Vec<VoiceGraph>);
    /// Push a new master gain onto the shared mixer, affecting both
    /// future and in-flight voices.
    fn set_master_gain(&self, gain: f64);
    /// Sample rate voices must be built at.
    fn sample_rate(&self) -> f64;
}

/// Live device context: one cpal output stream pulling from the shared
/// mixer. Dropping it stops the stream.
pub struct DeviceOutput {
    mixer: Arc<Mutex<Mixer>>,
    sample_rate: f64,
    _stream: cpal::Stream,
}

impl DeviceOutput {
    /// Open the default output device and start a stream with the given
    /// initial master gain.
    pub fn open(master_gain: f64) -> Result<Self, EngineError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(EngineError::NoOutputDevice)?;
        let config = device.default_output_config()?;

        let sample_rate = config.sample_rate().0 as f64;
        let channels = config.channels() as usize;
        let mixer = Arc::new(Mutex::new(Mixer::new(master_gain)));

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => {
                build_stream::<f32>(&device, &config.into(), mixer.clone(), channels)
            }
            cpal::SampleFormat::I16 => {
                build_stream::<i16>(&device, &config.into(), mixer.clone(), channels)
            }
            cpal::SampleFormat::U16 => {
                build_stream::<u16>(&device, &config.into(), mixer.clone(), channels)
            }
            other => return Err(EngineError::UnsupportedSampleFormat(other)),
        }?;

        stream.play()?;
        info!(sample_rate, channels, "audio device context opened");

        Ok(DeviceOutput {
            mixer,
            sample_rate,
            _stream: stream,
        })
    }
}

impl Output for DeviceOutput {
    fn submit(&self, voices: Vec<VoiceGraph>) {
        self.mixer.lock().add_voices(voices);
    }

    fn set_master_gain(&self, gain: f64) {
        self.mixer.lock().set_master_gain(gain);
    }

    fn sample_rate(&self) -> f64 {
        self.sample_rate
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mixer: Arc<Mutex<Mixer>>,
    channels: usize,
) -> Result<cpal::Stream, EngineError>
where
    T: cpal::SizedSample + cpal::FromSample<f32>,
{
    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            let mut mixer = mixer.lock();
            for frame in data.chunks_mut(channels) {
                let mixed = mixer.next_sample() as f32;
                // Mono synthesis fanned out to every channel
                for channel in frame.iter_mut() {
                    *channel = T::from_sample(mixed);
                }
            }
        },
        |err| error!("audio stream error: {err}"),
        None,
    )?;

    Ok(stream)
}
