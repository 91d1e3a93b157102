//! VoiceGraph — one ephemeral synthesis voice for a single sound event.
//!
//! A voice is born fully scheduled: its frequency motion, filter sweep,
//! gain envelope, stagger delay and stop time are all baked in at build
//! time. The render side only ever reads them.

use super::envelope::ParamCurve;
use super::filter::{BiquadFilter, FilterType};
use super::oscillator::{Oscillator, Waveform};

/// Signal source of a voice.
#[derive(Debug, Clone)]
pub enum Source {
    /// Oscillator whose pitch follows an automation curve.
    Oscillator {
        oscillator: Oscillator,
        frequency: ParamCurve,
    },
    /// Pre-generated noise buffer played front to back.
    Noise { buffer: Vec<f64>, position: usize },
}

/// Optional filter stage with its own swept cutoff/center.
#[derive(Debug, Clone)]
pub struct FilterStage {
    pub filter: BiquadFilter,
    pub frequency: ParamCurve,
}

impl FilterStage {
    pub fn new(filter_type: FilterType, q: f64, frequency: ParamCurve, sample_rate: f64) -> Self {
        let mut filter = BiquadFilter::new(filter_type, sample_rate);
        filter.set_q(q);
        FilterStage { filter, frequency }
    }
}

/// One independent, self-terminating synthesis graph:
/// source → optional filter → gain envelope.
#[derive(Debug, Clone)]
pub struct VoiceGraph {
    source: Source,
    filter: Option<FilterStage>,
    gain: ParamCurve,
    /// Samples of silence before the voice's own t=0 (stagger offset).
    delay_samples: usize,
    /// Absolute sample count (delay included) after which the voice is done.
    stop_sample: usize,
    position: usize,
    sample_rate: f64,
}

impl VoiceGraph {
    /// Build a voice. `delay` staggers its start; `duration` is the
    /// envelope length from the voice's own t=0 to silence.
    pub fn new(
        source: Source,
        filter: Option<FilterStage>,
        gain: ParamCurve,
        delay: f64,
        duration: f64,
        sample_rate: f64,
    ) -> Self {
        let delay_samples = (delay * sample_rate) as usize;
        let duration_samples = (duration * sample_rate) as usize;
        VoiceGraph {
            source,
            filter,
            gain,
            delay_samples,
            stop_sample: delay_samples + duration_samples,
            position: 0,
            sample_rate,
        }
    }

    /// Generate the next sample.
    pub fn next_sample(&mut self) -> f64 {
        if self.position >= self.stop_sample {
            return 0.0;
        }
        if self.position < self.delay_samples {
            self.position += 1;
            return 0.0;
        }

        let t = (self.position - self.delay_samples) as f64 / self.sample_rate;
        self.position += 1;

        let raw = match &mut self.source {
            Source::Oscillator {
                oscillator,
                frequency,
            } => oscillator.next_sample(frequency.value_at(t)),
            Source::Noise { buffer, position } => {
                let s = buffer.get(*position).copied().unwrap_or(0.0);
                *position += 1;
                s
            }
        };

        let shaped = match &mut self.filter {
            Some(stage) => {
                stage.filter.set_frequency(stage.frequency.value_at(t));
                stage.filter.process(raw)
            }
            None => raw,
        };

        shaped * self.gain.value_at(t)
    }

    /// Has this voice passed its scheduled stop time?
    pub fn is_finished(&self) -> bool {
        self.position >= self.stop_sample
    }

    /// Peak of the gain envelope.
    pub fn peak_gain(&self) -> f64 {
        self.gain.peak()
    }

    /// Envelope gain at time `t` from the voice's own start.
    pub fn gain_at(&self, t: f64) -> f64 {
        self.gain.value_at(t)
    }

    /// Oscillator frequency at time `t` from the voice's own start;
    /// `None` for noise sources.
    pub fn frequency_at(&self, t: f64) -> Option<f64> {
        match &self.source {
            Source::Oscillator { frequency, .. } => Some(frequency.value_at(t)),
            Source::Noise { .. } => None,
        }
    }

    /// Filter cutoff/center at time `t`, if the voice has a filter stage.
    pub fn filter_frequency_at(&self, t: f64) -> Option<f64> {
        self.filter.as_ref().map(|s| s.frequency.value_at(t))
    }

    /// Oscillator waveform; `None` for noise sources.
    pub fn waveform(&self) -> Option<Waveform> {
        match &self.source {
            Source::Oscillator { oscillator, .. } => Some(oscillator.waveform),
            Source::Noise { .. } => None,
        }
    }

    pub fn is_noise(&self) -> bool {
        matches!(self.source, Source::Noise { .. })
    }

    /// Stagger delay in seconds.
    pub fn delay(&self) -> f64 {
        self.delay_samples as f64 / self.sample_rate
    }

    /// Absolute stop time in seconds (delay + envelope duration).
    pub fn stop_time(&self) -> f64 {
        self.stop_sample as f64 / self.sample_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::envelope::GAIN_FLOOR;

    const SR: f64 = 44100.0;

    fn sine_voice(peak: f64, delay: f64, duration: f64) -> VoiceGraph {
        let mut freq = ParamCurve::new();
        freq.set_value_at(0.0, 440.0);
        let mut gain = ParamCurve::new();
        gain.set_value_at(0.0, peak);
        gain.exponential_ramp_to(duration, GAIN_FLOOR);
        VoiceGraph::new(
            Source::Oscillator {
                oscillator: Oscillator::new(Waveform::Sine, SR),
                frequency: freq,
            },
            None,
            gain,
            delay,
            duration,
            SR,
        )
    }

    #[test]
    fn voice_produces_sound() {
        let mut v = sine_voice(0.5, 0.0, 0.1);
        let mut has_nonzero = false;
        for _ in 0..2000 {
            if v.next_sample().abs() > 0.001 {
                has_nonzero = true;
            }
        }
        assert!(has_nonzero, "Voice should produce non-zero output");
    }

    #[test]
    fn voice_finishes_at_stop_time() {
        let mut v = sine_voice(0.5, 0.0, 0.1);
        let stop = (0.1 * SR) as usize;
        for i in 0..stop {
            v.next_sample();
            assert!(!v.is_finished() || i == stop - 1, "finished early at {i}");
        }
        assert!(v.is_finished(), "Voice should be finished at its stop time");
        assert_eq!(v.next_sample(), 0.0);
    }

    #[test]
    fn staggered_voice_is_silent_during_delay() {
        let mut v = sine_voice(0.5, 0.08, 0.15);
        let delay = (0.08 * SR) as usize;
        for i in 0..delay {
            assert_eq!(v.next_sample(), 0.0, "should be silent at sample {i}");
        }
        let mut has_nonzero = false;
        for _ in 0..2000 {
            if v.next_sample().abs() > 0.001 {
                has_nonzero = true;
            }
        }
        assert!(has_nonzero, "voice should sound after its stagger delay");
        assert!((v.stop_time() - 0.23).abs() < 1e-6);
    }

    #[test]
    fn output_never_exceeds_envelope_peak() {
        let mut v = sine_voice(0.15, 0.0, 0.08);
        for _ in 0..(0.08 * SR) as usize {
            let s = v.next_sample();
            assert!(s.abs() <= 0.15 + 1e-9, "sample {s} above envelope peak");
        }
    }

    #[test]
    fn decays_below_floor_audibility_by_stop() {
        let mut v = sine_voice(0.2, 0.0, 0.1);
        let stop = (0.1 * SR) as usize;
        let mut tail_max = 0.0_f64;
        for i in 0..stop {
            let s = v.next_sample().abs();
            if i > stop - 10 {
                tail_max = tail_max.max(s);
            }
        }
        assert!(
            tail_max < 0.001,
            "voice should be negligible at its stop time, got {tail_max}"
        );
    }

    #[test]
    fn noise_source_plays_buffer() {
        let mut gain = ParamCurve::new();
        gain.set_value_at(0.0, 1.0);
        gain.exponential_ramp_to(0.01, GAIN_FLOOR);
        let mut v = VoiceGraph::new(
            Source::Noise {
                buffer: vec![0.5; 441],
                position: 0,
            },
            None,
            gain,
            0.0,
            0.01,
            SR,
        );
        assert!(v.is_noise());
        assert_eq!(v.waveform(), None);
        let first = v.next_sample();
        assert!((first - 0.5).abs() < 1e-9, "noise sample should pass gain=1");
    }
}
