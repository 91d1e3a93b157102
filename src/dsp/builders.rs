//! Synthesis graph builders — one routine per sound kind.
//!
//! Each routine turns a `play()` call into fully scheduled voices:
//! frequencies, sweeps, stagger offsets, envelope peaks and stop times
//! all fixed at build time. `rate` multiplies every listed frequency;
//! per-call `volume` replaces the kind's default envelope peak. Master
//! volume is applied downstream at the mixer so it reaches in-flight
//! voices too.

use serde::{Deserialize, Serialize};

use super::envelope::{GAIN_FLOOR, ParamCurve};
use super::filter::FilterType;
use super::noise::noise_buffer;
use super::oscillator::{Oscillator, Waveform};
use super::voice::{FilterStage, Source, VoiceGraph};

/// The closed set of UI feedback sounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundKind {
    Click,
    Hover,
    Success,
    Error,
    Whoosh,
    Pop,
    Tick,
    Transition,
    Reveal,
    /// Reserved for a looping ambient bed; no synthesis routine yet.
    Ambient,
}

impl SoundKind {
    pub const ALL: [SoundKind; 10] = [
        SoundKind::Click,
        SoundKind::Hover,
        SoundKind::Success,
        SoundKind::Error,
        SoundKind::Whoosh,
        SoundKind::Pop,
        SoundKind::Tick,
        SoundKind::Transition,
        SoundKind::Reveal,
        SoundKind::Ambient,
    ];

    /// Default envelope peak when the caller supplies no volume.
    pub fn default_peak(self) -> f64 {
        match self {
            SoundKind::Click => 0.15,
            SoundKind::Hover => 0.05,
            SoundKind::Success => 0.12,
            SoundKind::Error => 0.1,
            SoundKind::Whoosh => 0.08,
            SoundKind::Pop => 0.2,
            SoundKind::Tick => 0.08,
            SoundKind::Transition => 0.06,
            SoundKind::Reveal => 0.04,
            SoundKind::Ambient => 0.0,
        }
    }
}

/// Per-call playback options. Absent or non-finite fields fall back to
/// the kind's defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayOptions {
    /// Envelope peak in [0, 1]; replaces the kind's default peak.
    pub volume: Option<f64>,
    /// Playback rate multiplying every base/target frequency.
    pub rate: Option<f64>,
}

/// Rate bounds: exponential ramps need strictly positive frequencies,
/// and ±3 octaves covers any plausible UI use.
const MIN_RATE: f64 = 0.125;
const MAX_RATE: f64 = 8.0;

/// Seed for the whoosh noise buffer; fixed so cues are repeatable.
const WHOOSH_SEED: u64 = 0x57_00_5e;

struct Params {
    peak: f64,
    rate: f64,
}

/// Defensive clamping per the invalid-parameter policy: out-of-range
/// values clamp, non-finite values fall back to defaults. Never errors.
fn resolve(kind: SoundKind, options: PlayOptions) -> Params {
    let peak = match options.volume {
        Some(v) if v.is_finite() => v.clamp(0.0, 1.0),
        _ => kind.default_peak(),
    };
    let rate = match options.rate {
        Some(r) if r.is_finite() => r.clamp(MIN_RATE, MAX_RATE),
        _ => 1.0,
    };
    Params { peak, rate }
}

/// Build the voices for one `play()` call. `Ambient` builds nothing.
pub fn build(kind: SoundKind, options: PlayOptions, sample_rate: f64) -> Vec<VoiceGraph> {
    let p = resolve(kind, options);
    match kind {
        SoundKind::Click => click(&p, sample_rate),
        SoundKind::Hover => hover(&p, sample_rate),
        SoundKind::Success => success(&p, sample_rate),
        SoundKind::Error => error(&p, sample_rate),
        SoundKind::Whoosh => whoosh(&p, sample_rate),
        SoundKind::Pop => pop(&p, sample_rate),
        SoundKind::Tick => tick(&p, sample_rate),
        SoundKind::Transition => transition(&p, sample_rate),
        SoundKind::Reveal => reveal(&p, sample_rate),
        SoundKind::Ambient => Vec::new(),
    }
}

// --- curve helpers -------------------------------------------------------

fn constant(value: f64) -> ParamCurve {
    let mut c = ParamCurve::new();
    c.set_value_at(0.0, value);
    c
}

/// Exponential sweep `from → to` over `over` seconds, holding `to` after.
fn sweep(from: f64, to: f64, over: f64) -> ParamCurve {
    let mut c = ParamCurve::new();
    c.set_value_at(0.0, from);
    c.exponential_ramp_to(over, to);
    c
}

/// Exponential sweep `lo → hi → lo`, turning at the halfway point.
fn sweep_up_down(lo: f64, hi: f64, duration: f64) -> ParamCurve {
    let mut c = ParamCurve::new();
    c.set_value_at(0.0, lo);
    c.exponential_ramp_to(duration / 2.0, hi);
    c.exponential_ramp_to(duration, lo);
    c
}

/// Instant attack to `peak`, exponential release to the gain floor.
fn pluck(peak: f64, duration: f64) -> ParamCurve {
    let mut c = ParamCurve::new();
    c.set_value_at(0.0, peak);
    c.exponential_ramp_to(duration, GAIN_FLOOR);
    c
}

/// Linear attack over `attack` seconds to `peak`, exponential release.
fn swell(attack: f64, peak: f64, duration: f64) -> ParamCurve {
    let mut c = ParamCurve::new();
    c.set_value_at(0.0, 0.0);
    c.linear_ramp_to(attack, peak.max(GAIN_FLOOR));
    c.exponential_ramp_to(duration, GAIN_FLOOR);
    c
}

fn osc(waveform: Waveform, frequency: ParamCurve, sample_rate: f64) -> Source {
    Source::Oscillator {
        oscillator: Oscillator::new(waveform, sample_rate),
        frequency,
    }
}

// --- per-kind routines ---------------------------------------------------

/// Tight sine blip, 2000→800 Hz through a lowpass. 80 ms.
fn click(p: &Params, sr: f64) -> Vec<VoiceGraph> {
    let freq = sweep(2000.0 * p.rate, 800.0 * p.rate, 0.05);
    let filter = FilterStage::new(FilterType::Lowpass, 0.707, constant(3000.0 * p.rate), sr);
    vec![VoiceGraph::new(
        osc(Waveform::Sine, freq, sr),
        Some(filter),
        pluck(p.peak, 0.08),
        0.0,
        0.08,
        sr,
    )]
}

/// Faint upward flick, 1200→1400 Hz. 40 ms.
fn hover(p: &Params, sr: f64) -> Vec<VoiceGraph> {
    let freq = sweep(1200.0 * p.rate, 1400.0 * p.rate, 0.03);
    vec![VoiceGraph::new(
        osc(Waveform::Sine, freq, sr),
        None,
        pluck(p.peak, 0.04),
        0.0,
        0.04,
        sr,
    )]
}

/// Ascending major triad (C5, E5, G5), one staggered voice per note.
fn success(p: &Params, sr: f64) -> Vec<VoiceGraph> {
    const TRIAD: [f64; 3] = [523.25, 659.25, 783.99];
    TRIAD
        .iter()
        .enumerate()
        .map(|(i, &f)| {
            VoiceGraph::new(
                osc(Waveform::Sine, constant(f * p.rate), sr),
                None,
                swell(0.02, p.peak, 0.15),
                i as f64 * 0.08,
                0.15,
                sr,
            )
        })
        .collect()
}

/// Falling sawtooth buzz, 200→100 Hz. 200 ms.
fn error(p: &Params, sr: f64) -> Vec<VoiceGraph> {
    let freq = sweep(200.0 * p.rate, 100.0 * p.rate, 0.2);
    vec![VoiceGraph::new(
        osc(Waveform::Sawtooth, freq, sr),
        None,
        pluck(p.peak, 0.2),
        0.0,
        0.2,
        sr,
    )]
}

/// Noise burst through a bandpass whose center sweeps 200→3000→200 Hz.
fn whoosh(p: &Params, sr: f64) -> Vec<VoiceGraph> {
    let source = Source::Noise {
        buffer: noise_buffer(0.3, sr, WHOOSH_SEED),
        position: 0,
    };
    let filter = FilterStage::new(
        FilterType::Bandpass,
        1.0,
        sweep_up_down(200.0 * p.rate, 3000.0 * p.rate, 0.3),
        sr,
    );
    vec![VoiceGraph::new(
        source,
        Some(filter),
        swell(0.05, p.peak, 0.3),
        0.0,
        0.3,
        sr,
    )]
}

/// Round downward blip, 400→150 Hz. 100 ms.
fn pop(p: &Params, sr: f64) -> Vec<VoiceGraph> {
    let freq = sweep(400.0 * p.rate, 150.0 * p.rate, 0.1);
    vec![VoiceGraph::new(
        osc(Waveform::Sine, freq, sr),
        None,
        pluck(p.peak, 0.1),
        0.0,
        0.1,
        sr,
    )]
}

/// Tiny fixed-pitch tick at 1800 Hz. 20 ms.
fn tick(p: &Params, sr: f64) -> Vec<VoiceGraph> {
    vec![VoiceGraph::new(
        osc(Waveform::Sine, constant(1800.0 * p.rate), sr),
        None,
        pluck(p.peak, 0.02),
        0.0,
        0.02,
        sr,
    )]
}

/// Layered octave rise: three voices at 200/400/600 Hz, each doubling
/// over 200 ms behind its own swept lowpass. 300 ms.
fn transition(p: &Params, sr: f64) -> Vec<VoiceGraph> {
    (0..3)
        .map(|i| {
            let base = 200.0 * (i + 1) as f64 * p.rate;
            let freq = sweep(base, base * 2.0, 0.2);
            let filter = FilterStage::new(
                FilterType::Lowpass,
                0.707,
                sweep_up_down(1000.0 * p.rate, 4000.0 * p.rate, 0.3),
                sr,
            );
            VoiceGraph::new(
                osc(Waveform::Sine, freq, sr),
                Some(filter),
                swell(0.05, p.peak / (i + 1) as f64, 0.3),
                0.0,
                0.3,
                sr,
            )
        })
        .collect()
}

/// Four staggered shimmering voices, each rising a fifth over 200 ms.
fn reveal(p: &Params, sr: f64) -> Vec<VoiceGraph> {
    const BASES: [f64; 4] = [800.0, 1000.0, 1200.0, 1500.0];
    BASES
        .iter()
        .enumerate()
        .map(|(i, &base)| {
            let freq = sweep(base * p.rate, base * 1.5 * p.rate, 0.2);
            VoiceGraph::new(
                osc(Waveform::Sine, freq, sr),
                None,
                swell(0.02, p.peak, 0.25),
                i as f64 * 0.03,
                0.25,
                sr,
            )
        })
        .collect()
}
