//! Scheduled parameter automation — gain envelopes and frequency sweeps.
//!
//! Every time-varying parameter in a voice (oscillator pitch, filter
//! cutoff, envelope gain) is a `ParamCurve`: a list of timed events baked
//! in when the voice is built, sampled read-only while it renders.

/// Near-zero level every gain envelope decays to. Releases always ramp
/// down to this floor instead of cutting to zero, which would click.
pub const GAIN_FLOOR: f64 = 1e-4;

/// How the curve approaches an event's value from the previous event.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Ramp {
    /// Jump to the value at the event time.
    Step,
    /// Straight-line interpolation from the previous value.
    Linear,
    /// Geometric interpolation: `v0 * (v1/v0)^u`. Perceptually linear
    /// for pitch and loudness. Endpoints must be strictly positive.
    Exponential,
}

#[derive(Debug, Clone, Copy)]
struct Event {
    time: f64,
    value: f64,
    ramp: Ramp,
}

/// A piecewise automation curve over one scalar parameter.
///
/// Events must be scheduled in non-decreasing time order. Before the
/// first event the curve holds the first value; after the last event it
/// holds the last value.
#[derive(Debug, Clone, Default)]
pub struct ParamCurve {
    events: Vec<Event>,
}

impl ParamCurve {
    pub fn new() -> Self {
        ParamCurve { events: Vec::new() }
    }

    /// Jump to `value` at time `time` (seconds).
    pub fn set_value_at(&mut self, time: f64, value: f64) {
        self.push(Event { time, value, ramp: Ramp::Step });
    }

    /// Ramp linearly from the previous event's value to `value` at `time`.
    pub fn linear_ramp_to(&mut self, time: f64, value: f64) {
        self.push(Event { time, value, ramp: Ramp::Linear });
    }

    /// Ramp exponentially from the previous event's value to `value` at
    /// `time`. Both endpoints must be strictly positive.
    pub fn exponential_ramp_to(&mut self, time: f64, value: f64) {
        debug_assert!(value > 0.0, "exponential ramp target must be positive");
        self.push(Event { time, value, ramp: Ramp::Exponential });
    }

    fn push(&mut self, event: Event) {
        debug_assert!(
            self.events.last().is_none_or(|prev| event.time >= prev.time),
            "automation events must be scheduled in time order"
        );
        self.events.push(event);
    }

    /// Sample the curve at time `t` (seconds).
    pub fn value_at(&self, t: f64) -> f64 {
        let Some(first) = self.events.first() else {
            return 0.0;
        };
        if t <= first.time {
            return first.value;
        }

        for pair in self.events.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            if t >= to.time {
                continue;
            }
            let span = to.time - from.time;
            if span <= 0.0 {
                return to.value;
            }
            let u = (t - from.time) / span;
            return match to.ramp {
                Ramp::Step => from.value,
                Ramp::Linear => from.value + (to.value - from.value) * u,
                Ramp::Exponential => {
                    if from.value <= 0.0 || to.value <= 0.0 {
                        // Degenerate schedule; fall back to linear.
                        from.value + (to.value - from.value) * u
                    } else {
                        from.value * (to.value / from.value).powf(u)
                    }
                }
            };
        }

        // Non-empty here, so the last event exists.
        self.events[self.events.len() - 1].value
    }

    /// Largest scheduled value — the envelope's peak.
    pub fn peak(&self) -> f64 {
        self.events.iter().map(|e| e.value).fold(0.0, f64::max)
    }

    /// Value the curve holds after its last event.
    pub fn end_value(&self) -> f64 {
        self.events.last().map_or(0.0, |e| e.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_curve_is_zero() {
        let curve = ParamCurve::new();
        assert_eq!(curve.value_at(0.0), 0.0);
        assert_eq!(curve.value_at(1.0), 0.0);
    }

    #[test]
    fn holds_before_first_and_after_last() {
        let mut curve = ParamCurve::new();
        curve.set_value_at(0.1, 3.0);
        curve.linear_ramp_to(0.2, 5.0);
        assert_eq!(curve.value_at(0.0), 3.0);
        assert_eq!(curve.value_at(9.0), 5.0);
    }

    #[test]
    fn linear_ramp_midpoint() {
        let mut curve = ParamCurve::new();
        curve.set_value_at(0.0, 0.0);
        curve.linear_ramp_to(0.1, 1.0);
        let mid = curve.value_at(0.05);
        assert!((mid - 0.5).abs() < 1e-12, "linear midpoint should be 0.5, got {mid}");
    }

    #[test]
    fn exponential_ramp_midpoint_is_geometric_mean() {
        let mut curve = ParamCurve::new();
        curve.set_value_at(0.0, 200.0);
        curve.exponential_ramp_to(1.0, 800.0);
        let mid = curve.value_at(0.5);
        assert!(
            (mid - 400.0).abs() < 1e-9,
            "exp midpoint of 200→800 should be 400, got {mid}"
        );
    }

    #[test]
    fn step_holds_previous_value_until_event() {
        let mut curve = ParamCurve::new();
        curve.set_value_at(0.0, 1.0);
        curve.set_value_at(0.5, 2.0);
        assert_eq!(curve.value_at(0.25), 1.0);
        assert_eq!(curve.value_at(0.5), 2.0);
        assert_eq!(curve.value_at(0.75), 2.0);
    }

    #[test]
    fn peak_reports_largest_scheduled_value() {
        let mut curve = ParamCurve::new();
        curve.set_value_at(0.0, 0.0);
        curve.linear_ramp_to(0.02, 0.12);
        curve.exponential_ramp_to(0.15, GAIN_FLOOR);
        assert_eq!(curve.peak(), 0.12);
        assert_eq!(curve.end_value(), GAIN_FLOOR);
    }

    #[test]
    fn release_decays_toward_floor_not_zero() {
        let mut curve = ParamCurve::new();
        curve.set_value_at(0.0, 0.15);
        curve.exponential_ramp_to(0.08, GAIN_FLOOR);
        let near_end = curve.value_at(0.079);
        assert!(near_end > 0.0, "release must stay above zero");
        assert!(near_end < 0.002, "release should be nearly silent at the end");
        assert_eq!(curve.value_at(0.08), GAIN_FLOOR);
    }
}
