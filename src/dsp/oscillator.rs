//! Anti-aliased oscillators using PolyBLEP.

use std::f64::consts::PI;

/// Waveform shapes the sound palette uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Sawtooth,
}

/// A band-limited oscillator whose frequency is supplied per sample,
/// so pitch sweeps baked into an automation curve track exactly.
#[derive(Debug, Clone)]
pub struct Oscillator {
    pub waveform: Waveform,
    phase: f64,
    sample_rate: f64,
}

impl Oscillator {
    pub fn new(waveform: Waveform, sample_rate: f64) -> Self {
        Oscillator {
            waveform,
            phase: 0.0,
            sample_rate,
        }
    }

    /// Generate the next sample at the given instantaneous frequency.
    pub fn next_sample(&mut self, frequency: f64) -> f64 {
        // Keep the increment below Nyquist even for hostile rate values.
        let inc = (frequency / self.sample_rate).clamp(0.0, 0.5);
        let sample = match self.waveform {
            Waveform::Sine => (2.0 * PI * self.phase).sin(),
            Waveform::Sawtooth => {
                // Naive ramp -1→+1; PolyBLEP corrects the wrap discontinuity.
                let naive = 2.0 * self.phase - 1.0;
                naive - poly_blep(self.phase, inc)
            }
        };

        self.phase += inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        sample
    }

    /// Reset oscillator phase.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

/// PolyBLEP (Polynomial Band-Limited Step) anti-aliasing correction.
///
/// `t` is the phase [0, 1), `dt` is the phase increment per sample.
/// Returns a correction to subtract from the naive waveform at
/// discontinuities.
fn poly_blep(t: f64, dt: f64) -> f64 {
    if dt <= 0.0 {
        0.0
    } else if t < dt {
        // Just after the discontinuity
        let t = t / dt;
        2.0 * t - t * t - 1.0
    } else if t > 1.0 - dt {
        // Just before the next discontinuity
        let t = (t - 1.0) / dt;
        t * t + 2.0 * t + 1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_zero_at_start() {
        let mut osc = Oscillator::new(Waveform::Sine, 44100.0);
        let sample = osc.next_sample(440.0);
        assert!(sample.abs() < 1e-10, "Sine should start near 0, got {sample}");
    }

    #[test]
    fn sine_range() {
        let mut osc = Oscillator::new(Waveform::Sine, 44100.0);
        for _ in 0..44100 {
            let s = osc.next_sample(1800.0);
            assert!((-1.0..=1.0).contains(&s), "Sine out of range: {s}");
        }
    }

    #[test]
    fn sawtooth_range() {
        let mut osc = Oscillator::new(Waveform::Sawtooth, 44100.0);
        for _ in 0..44100 {
            let s = osc.next_sample(200.0);
            assert!((-1.5..=1.5).contains(&s), "Saw out of range: {s}");
        }
    }

    #[test]
    fn sweeping_frequency_keeps_output_finite() {
        let mut osc = Oscillator::new(Waveform::Sawtooth, 44100.0);
        for i in 0..8820 {
            // 200 Hz down to 100 Hz, like the error cue
            let f = 200.0 * (0.5_f64).powf(i as f64 / 8820.0);
            let s = osc.next_sample(f);
            assert!(s.is_finite(), "saw output not finite at sample {i}");
        }
    }

    #[test]
    fn higher_frequency_advances_phase_faster() {
        let mut slow = Oscillator::new(Waveform::Sine, 44100.0);
        let mut fast = Oscillator::new(Waveform::Sine, 44100.0);
        // After a quarter cycle of the fast one, outputs must differ.
        for _ in 0..10 {
            slow.next_sample(1200.0);
            fast.next_sample(2400.0);
        }
        let s = slow.next_sample(1200.0);
        let f = fast.next_sample(2400.0);
        assert!((s - f).abs() > 1e-6, "doubled rate should change the waveform");
    }
}
