//! Rendering engine with sample-accurate MIDI dispatch.
//!
//! The engine owns all voice state and is driven from the host audio
//! callback: once per block with the block's ordered MIDI events, plus
//! sample rate notifications that may arrive between blocks. Control
//! surfaces reach it only through the shared [`Controls`] atomics.

use alloc::sync::Arc;

use crate::control::Controls;
use crate::midi::{MidiEvent, NOTE_OFF, NOTE_ON, PITCH_BEND};
use crate::notes::{note_params, NoteSet};
use crate::timer::{PotPair, TimerCircuit};
use crate::{DEFAULT_POT_A, DEFAULT_POT_B, POT_MAX};

/// Monophonic Atari Punk Console voice.
#[derive(Debug)]
pub struct PunkConsole {
    controls: Arc<Controls>,
    circuit: TimerCircuit,
    notes: NoteSet,
    pots: PotPair,
    sample_rate: u32,
}

impl PunkConsole {
    pub fn new(controls: Arc<Controls>) -> Self {
        Self {
            controls,
            circuit: TimerCircuit::new(),
            notes: NoteSet::new(),
            pots: PotPair::new(DEFAULT_POT_A, DEFAULT_POT_B),
            sample_rate: 0,
        }
    }

    pub fn init(&mut self) {
        // Force the tuning table to build here, outside the render path.
        let _ = note_params(0);

        self.circuit.init();
        self.notes = NoteSet::new();
    }

    /// Host notification of a new sample rate.
    ///
    /// Both phase counters are rescaled so the oscillator keeps its relative
    /// phase, then the switching times are recomputed for the unchanged pot
    /// pair. Safe to call before the first block is rendered.
    pub fn set_sample_rate(&mut self, new_rate: u32) {
        let slope = if self.sample_rate == 0 {
            1.0
        } else {
            new_rate as f32 / self.sample_rate as f32
        };

        self.sample_rate = new_rate;
        self.circuit.rescale_phase(slope);
        self.circuit.retune(self.pots, new_rate);
    }

    /// Render one block, dispatching `events` at their sample offsets.
    ///
    /// Events are expected in non-decreasing offset order; all events that
    /// share an offset are consumed in arrival order before that sample is
    /// rendered. The output is exact silence while no note is held and the
    /// gesture control is inactive, otherwise a full-scale square wave
    /// scaled by the gain control.
    #[inline]
    pub fn render(&mut self, events: &[MidiEvent], out: &mut [f32]) {
        // Pick up pot moves from the control surface since the last block.
        let panel = PotPair::new(self.controls.pot_a(), self.controls.pot_b());
        if panel != self.pots {
            self.pots = panel;
            self.circuit.retune(panel, self.sample_rate);
        }

        let mut next_event = 0;

        for (i, out_sample) in out.iter_mut().enumerate() {
            while next_event < events.len() && events[next_event].offset as usize <= i {
                let event = events[next_event];
                self.dispatch(&event);
                next_event += 1;
            }

            let level = self.circuit.tick();

            *out_sample = if self.controls.gesture_active() || !self.notes.is_empty() {
                (if level { 1.0 } else { -1.0 }) * self.controls.gain()
            } else {
                0.0
            };
        }
    }

    fn dispatch(&mut self, event: &MidiEvent) {
        match event.status_nibble() {
            NOTE_ON => {
                let note = event.data[0] & 0x7F;
                self.notes.set(note);
                self.retune(note_params(note).pots);
            }
            NOTE_OFF => {
                let note = event.data[0] & 0x7F;
                self.notes.clear(note);

                // Hand the tuning to the lowest note still held. When the
                // set empties, the circuit keeps its last timings and runs
                // on silently.
                if let Some(lowest) = self.notes.lowest_set_index() {
                    self.retune(note_params(lowest).pots);
                }
            }
            PITCH_BEND => {
                // Without a governing note there is no bend center; the
                // message is dropped.
                if let Some(governing) = self.notes.lowest_set_index() {
                    let bend = event.bend_value();
                    let center = note_params(governing).pots.b as f32;

                    // Bend up sweeps toward the low end of the pot, bend
                    // down toward the high end, each scaled to the
                    // available span.
                    let span = if bend >= 0 {
                        center
                    } else {
                        POT_MAX as f32 - center
                    };
                    let b = center - bend as f32 / 0x2000 as f32 * span;

                    self.retune(PotPair::new(self.pots.a, b as i32));
                }
            }
            _ => {}
        }
    }

    fn retune(&mut self, pots: PotPair) {
        self.pots = pots;
        self.controls.store_pots(pots);
        self.circuit.retune(pots, self.sample_rate);
    }

    /// Pot pair currently tuning the circuit.
    pub fn pots(&self) -> PotPair {
        self.pots
    }

    /// Timer circuit state, for inspection by tests and front-ends.
    pub fn circuit(&self) -> &TimerCircuit {
        &self.circuit
    }
}
