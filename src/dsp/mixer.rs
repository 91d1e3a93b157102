//! Mixer — sums live voices with master gain and soft clipping.

use super::voice::VoiceGraph;

/// A summing mixer over the currently live voices.
///
/// The calling side appends voices; the render side pulls one mixed
/// sample at a time and drops voices as they finish. There is no voice
/// pool and no concurrency ceiling.
#[derive(Debug, Default)]
pub struct Mixer {
    voices: Vec<VoiceGraph>,
    master_gain: f64,
}

impl Mixer {
    pub fn new(master_gain: f64) -> Self {
        Mixer {
            voices: Vec::new(),
            master_gain,
        }
    }

    /// Append newly built voices to the live set.
    pub fn add_voices(&mut self, voices: Vec<VoiceGraph>) {
        self.voices.extend(voices);
    }

    /// Replace the master gain; heard by in-flight voices immediately.
    pub fn set_master_gain(&mut self, gain: f64) {
        self.master_gain = gain;
    }

    pub fn master_gain(&self) -> f64 {
        self.master_gain
    }

    /// Number of voices still live.
    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    /// Mix one output sample and retire finished voices.
    pub fn next_sample(&mut self) -> f64 {
        let mut mixed = 0.0;
        for voice in &mut self.voices {
            mixed += voice.next_sample();
        }
        self.voices.retain(|v| !v.is_finished());
        soft_clip(mixed * self.master_gain)
    }

    /// Render `frames` mono samples offline; used by tests and never by
    /// the device path, which pulls sample by sample.
    pub fn render(&mut self, frames: usize) -> Vec<f64> {
        (0..frames).map(|_| self.next_sample()).collect()
    }
}

/// Soft clipper using tanh to prevent harsh digital clipping.
fn soft_clip(x: f64) -> f64 {
    x.tanh()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::builders::{PlayOptions, SoundKind, build};

    const SR: f64 = 44100.0;

    #[test]
    fn silent_when_no_voices() {
        let mut m = Mixer::new(1.0);
        let out = m.render(128);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn master_gain_scales_output() {
        let mut loud = Mixer::new(1.0);
        let mut quiet = Mixer::new(0.25);
        loud.add_voices(build(SoundKind::Tick, PlayOptions::default(), SR));
        quiet.add_voices(build(SoundKind::Tick, PlayOptions::default(), SR));

        let a = loud.render(441);
        let b = quiet.render(441);
        let peak_a = a.iter().fold(0.0_f64, |m, s| m.max(s.abs()));
        let peak_b = b.iter().fold(0.0_f64, |m, s| m.max(s.abs()));
        assert!(peak_a > 0.0, "tick should be audible");
        // tanh is nearly linear at these levels
        assert!(
            (peak_b - peak_a * 0.25).abs() < 0.01,
            "quarter master gain should quarter the peak: {peak_a} vs {peak_b}"
        );
    }

    #[test]
    fn finished_voices_are_dropped() {
        let mut m = Mixer::new(1.0);
        m.add_voices(build(SoundKind::Tick, PlayOptions::default(), SR));
        assert_eq!(m.active_voices(), 1);
        // Tick lasts 20 ms
        m.render((0.025 * SR) as usize);
        assert_eq!(m.active_voices(), 0, "tick voice should retire after 20 ms");
    }

    #[test]
    fn overlapping_cues_mix_independently() {
        let mut m = Mixer::new(1.0);
        for _ in 0..10 {
            m.add_voices(build(SoundKind::Success, PlayOptions::default(), SR));
        }
        assert_eq!(m.active_voices(), 30, "ten triads should be thirty voices");
        let out = m.render((0.05 * SR) as usize);
        assert!(out.iter().all(|s| s.is_finite() && s.abs() <= 1.0));
        assert_eq!(m.active_voices(), 30, "all voices still live at 50 ms");
    }

    #[test]
    fn output_decays_below_floor_by_stop_time() {
        let mut m = Mixer::new(0.3);
        m.add_voices(build(SoundKind::Error, PlayOptions::default(), SR));
        let out = m.render((0.2 * SR) as usize);
        let tail = &out[out.len() - 16..];
        let tail_peak = tail.iter().fold(0.0_f64, |mx, s| mx.max(s.abs()));
        assert!(
            tail_peak < 0.001,
            "error cue should be inaudible by 200 ms, got {tail_peak}"
        );
        assert_eq!(m.active_voices(), 0);
    }
}
