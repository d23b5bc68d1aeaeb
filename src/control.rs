//! Controls shared between the audio thread and a control surface.
//!
//! Every control is an independent atomic word accessed with relaxed
//! ordering. The pot pair carries no compound invariant: a surface update
//! racing a render block may be picked up one field at a time, which retunes
//! twice and settles within a block. Nothing on the audio thread blocks or
//! allocates for a control read.

use core::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, Ordering};

use crate::timer::PotPair;
use crate::{DEFAULT_POT_A, DEFAULT_POT_B, POT_MAX};

/// Shared control state of the console.
#[derive(Debug)]
pub struct Controls {
    pot_a: AtomicI32,
    pot_b: AtomicI32,
    gain: AtomicU32,
    gesture_active: AtomicBool,
}

impl Controls {
    pub fn new() -> Self {
        Self {
            pot_a: AtomicI32::new(DEFAULT_POT_A),
            pot_b: AtomicI32::new(DEFAULT_POT_B),
            gain: AtomicU32::new(1.0f32.to_bits()),
            gesture_active: AtomicBool::new(false),
        }
    }

    pub fn pot_a(&self) -> i32 {
        self.pot_a.load(Ordering::Relaxed)
    }

    pub fn pot_b(&self) -> i32 {
        self.pot_b.load(Ordering::Relaxed)
    }

    pub fn gain(&self) -> f32 {
        f32::from_bits(self.gain.load(Ordering::Relaxed))
    }

    pub fn gesture_active(&self) -> bool {
        self.gesture_active.load(Ordering::Relaxed)
    }

    /// Publish an engine-side retune so surfaces follow the played notes.
    pub(crate) fn store_pots(&self, pots: PotPair) {
        self.pot_a.store(pots.a, Ordering::Relaxed);
        self.pot_b.store(pots.b, Ordering::Relaxed);
    }
}

impl Default for Controls {
    fn default() -> Self {
        Self::new()
    }
}

/// Input contract of a control surface front-end.
///
/// Both an interactive panel and a headless daemon drive the console through
/// these four setters; the engine never depends on which variant is active.
pub trait ControlSurface {
    /// Set the astable potentiometer, clamped to the pot range.
    fn set_pot_a(&self, value: i32);

    /// Set the monostable potentiometer, clamped to the pot range.
    fn set_pot_b(&self, value: i32);

    /// Set the output gain, clamped to `0.0..=1.0`.
    fn set_gain(&self, value: f32);

    /// Gate the output open independently of any held note.
    fn set_gesture_active(&self, active: bool);
}

impl ControlSurface for Controls {
    fn set_pot_a(&self, value: i32) {
        self.pot_a.store(value.clamp(0, POT_MAX), Ordering::Relaxed);
    }

    fn set_pot_b(&self, value: i32) {
        self.pot_b.store(value.clamp(0, POT_MAX), Ordering::Relaxed);
    }

    fn set_gain(&self, value: f32) {
        self.gain.store(value.clamp(0.0, 1.0).to_bits(), Ordering::Relaxed);
    }

    fn set_gesture_active(&self, active: bool) {
        self.gesture_active.store(active, Ordering::Relaxed);
    }
}
