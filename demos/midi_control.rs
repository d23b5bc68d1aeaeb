//! Playable Atari Punk Console with MIDI note and pitch bend control.
//!
//! Control mapping:
//! - Notes: retune the oscillator, lowest held note governs
//! - Pitch bend: sweeps the monostable pot around the governing note
//! - CC 21: astable potentiometer
//! - CC 22: monostable potentiometer
//! - CC 23: gesture gate (values >= 64 hold the output open)
//! - CC 28: gain

use std::sync::Arc;

use audio_midi_shell::{AudioGenerator, AudioMidiShell};
use simple_logger::SimpleLogger;

use punk_console_dsp::control::{ControlSurface, Controls};
use punk_console_dsp::engine::PunkConsole;
use punk_console_dsp::midi::MidiEvent;
use punk_console_dsp::POT_MAX;

const SAMPLE_RATE: u32 = 48000;
const BLOCK_SIZE: usize = 32;

fn main() -> ! {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Debug)
        .init()
        .unwrap();

    AudioMidiShell::run_forever(SAMPLE_RATE, BLOCK_SIZE, App::new());
}

#[derive(Debug)]
struct App {
    console: PunkConsole,
    controls: Arc<Controls>,
    pending: Vec<MidiEvent>,
}

impl App {
    pub fn new() -> Self {
        let controls = Arc::new(Controls::new());

        Self {
            console: PunkConsole::new(controls.clone()),
            controls,
            pending: Vec::new(),
        }
    }
}

impl AudioGenerator for App {
    fn init(&mut self, _block_size: usize) {
        self.console.init();
        self.console.set_sample_rate(SAMPLE_RATE);
        self.controls.set_gain(0.5);
    }

    fn process(&mut self, samples_left: &mut [f32], samples_right: &mut [f32]) {
        let mut out = vec![0.0; BLOCK_SIZE];

        self.console.render(&self.pending, &mut out);
        self.pending.clear();

        samples_left.clone_from_slice(&out);
        samples_right.clone_from_slice(&out);
    }

    fn process_midi(&mut self, message: Vec<u8>) {
        match message[0] & 0xF0 {
            0x80 | 0x90 | 0xE0 => {
                // Voice messages are queued for the start of the next block.
                self.pending.push(MidiEvent::new(
                    0,
                    message[0],
                    message[1],
                    message.get(2).copied().unwrap_or(0),
                ));
                log::info!(
                    "Voice message: {:#04x} {} {}",
                    message[0],
                    message[1],
                    message.get(2).copied().unwrap_or(0)
                );
            }
            0xB0 => {
                // Control change
                let value = message[2] as f32 / 127.0;
                match message[1] {
                    21 => {
                        let pot = (value * POT_MAX as f32) as i32;
                        self.controls.set_pot_a(pot);
                        log::info!("Astable pot: {}", pot);
                    }
                    22 => {
                        let pot = (value * POT_MAX as f32) as i32;
                        self.controls.set_pot_b(pot);
                        log::info!("Monostable pot: {}", pot);
                    }
                    23 => {
                        let active = message[2] >= 64;
                        self.controls.set_gesture_active(active);
                        log::info!("Gesture: {}", active);
                    }
                    28 => {
                        self.controls.set_gain(value);
                        log::info!("Gain: {}", value);
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }
}
