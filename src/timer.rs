//! Dual-timer circuit model.
//!
//! The astable stage free-runs at a rate set by the first potentiometer. Its
//! falling edge releases the monostable stage, a one-shot whose pulse width is
//! set by the second potentiometer. The stages are coupled: once the
//! monostable pulse has expired, the output stays low until the next astable
//! falling edge retriggers it. Both stages are modelled as integer sample
//! counters, making the output waveform exactly reproducible at a given
//! sample rate.

#[allow(unused_imports)]
use num_traits::float::Float;

use crate::POT_MAX;

/// Pair of virtual potentiometer settings, in ohms.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PotPair {
    /// Astable potentiometer.
    pub a: i32,

    /// Monostable potentiometer.
    pub b: i32,
}

impl PotPair {
    /// Create a new pair, clamping both settings to the pot range.
    pub fn new(a: i32, b: i32) -> Self {
        Self {
            a: a.clamp(0, POT_MAX),
            b: b.clamp(0, POT_MAX),
        }
    }
}

/// Switching times of both timer stages, in samples, derived from a pot pair
/// at a given sample rate.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TimerTimings {
    /// Time the astable output stays high within one cycle.
    pub astable_high: i32,

    /// Time the astable output stays low within one cycle.
    pub astable_low: i32,

    /// Width of the monostable one-shot pulse.
    pub monostable_high: i32,
}

impl TimerTimings {
    /// Derive the switching times from the RC time constants.
    ///
    /// Timing capacitors are fixed at 0.01 µF for the astable stage and
    /// 0.1 µF for the monostable stage; the astable high time runs through
    /// an additional 1 kΩ series resistor.
    pub fn derive(pair: PotPair, sample_rate: u32) -> Self {
        let sr = sample_rate as f32;

        Self {
            astable_high: (0.693 * (pair.a as f32 + 1000.0) * 0.01e-6 * sr).round() as i32,
            astable_low: (0.693 * pair.a as f32 * 0.01e-6 * sr).round() as i32,
            monostable_high: (0.693 * pair.b as f32 * 0.1e-6 * sr).round() as i32,
        }
    }
}

/// Free-running state of the coupled timer stages.
#[derive(Debug, Clone)]
pub struct TimerCircuit {
    timings: TimerTimings,

    // Samples elapsed in the current astable cycle and since the last
    // monostable trigger.
    astable_run: i32,
    monostable_run: i32,

    output: bool,
}

impl TimerCircuit {
    pub fn new() -> Self {
        Self {
            timings: TimerTimings::default(),
            astable_run: 0,
            monostable_run: 0,
            output: true,
        }
    }

    pub fn init(&mut self) {
        self.astable_run = 0;
        self.monostable_run = 0;
        self.output = true;
    }

    /// Recompute the switching times for a new pot pair or sample rate.
    ///
    /// The phase counters keep running so that retuning never clicks the
    /// waveform back to its start.
    pub fn retune(&mut self, pair: PotPair, sample_rate: u32) {
        self.timings = TimerTimings::derive(pair, sample_rate);
    }

    /// Rescale both phase counters after a sample rate change, preserving
    /// the relative phase of the oscillator.
    pub fn rescale_phase(&mut self, slope: f32) {
        self.astable_run = (self.astable_run as f32 * slope).round() as i32;
        self.monostable_run = (self.monostable_run as f32 * slope).round() as i32;
    }

    /// Advance the circuit by one sample and return the output level.
    #[inline]
    pub fn tick(&mut self) -> bool {
        if self.astable_run >= self.timings.astable_high + self.timings.astable_low {
            self.astable_run = 0;
        }

        if self.monostable_run >= self.timings.monostable_high {
            self.output = false;

            // The expired one-shot is only released in sync with the astable
            // high-to-low edge.
            if self.astable_run == self.timings.astable_high {
                self.monostable_run = 0;
                self.output = true;
            }
        }

        self.astable_run += 1;
        self.monostable_run += 1;

        self.output
    }

    /// Currently active switching times.
    pub fn timings(&self) -> TimerTimings {
        self.timings
    }

    /// Current phase counters of both stages.
    pub fn run_times(&self) -> (i32, i32) {
        (self.astable_run, self.monostable_run)
    }
}

impl Default for TimerCircuit {
    fn default() -> Self {
        Self::new()
    }
}
