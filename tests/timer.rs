//! Tests for the timer circuit model


use punk_console_dsp::timer::{PotPair, TimerCircuit, TimerTimings};

const SAMPLE_RATE: u32 = 48000;

#[test]
fn derive_timings() {
    let timings = TimerTimings::derive(PotPair::new(100_000, 80_000), SAMPLE_RATE);

    assert_eq!(timings.astable_high, 34);
    assert_eq!(timings.astable_low, 33);
    assert_eq!(timings.monostable_high, 266);
}

#[test]
fn derive_is_deterministic() {
    for (a, b) in [(0, 0), (1234, 98765), (100_000, 80_000), (470_000, 470_000)] {
        let pair = PotPair::new(a, b);

        for sample_rate in [22050, 44100, 48000, 96000, 192000] {
            let first = TimerTimings::derive(pair, sample_rate);
            let second = TimerTimings::derive(pair, sample_rate);
            assert_eq!(first, second);
        }
    }
}

#[test]
fn astable_high_exceeds_low() {
    // The extra 1 kΩ in the high path separates the two times by a full
    // sample once the rate is high enough.
    for a in (0..=470_000).step_by(1000) {
        let timings = TimerTimings::derive(PotPair::new(a, 0), 192000);
        assert!(
            timings.astable_high > timings.astable_low,
            "a = {}: {} <= {}",
            a,
            timings.astable_high,
            timings.astable_low
        );
    }

    // At lower rates the rounded times may collapse onto the same count,
    // but the high time never drops below the low time.
    for a in (0..=470_000).step_by(997) {
        let timings = TimerTimings::derive(PotPair::new(a, 0), SAMPLE_RATE);
        assert!(timings.astable_high >= timings.astable_low);
    }
}

#[test]
fn pot_pair_clamps() {
    let pair = PotPair::new(-5, 500_000);

    assert_eq!(pair.a, 0);
    assert_eq!(pair.b, 470_000);
}

#[test]
fn tick_waveform_structure() {
    let duration = 1.0;

    let pair = PotPair::new(100_000, 80_000);
    let timings = TimerTimings::derive(pair, SAMPLE_RATE);
    let period = timings.astable_high + timings.astable_low;

    let mut circuit = TimerCircuit::new();
    circuit.init();
    circuit.retune(pair, SAMPLE_RATE);

    let samples = (duration * SAMPLE_RATE as f32) as usize;
    let mut levels = Vec::with_capacity(samples);
    let mut wav_data = Vec::with_capacity(samples);

    for _ in 0..samples {
        let level = circuit.tick();
        levels.push(level);
        wav_data.push(if level { 1.0 } else { -1.0 });
    }

    // Every complete high run is one monostable pulse wide.
    let mut runs: Vec<(bool, i32)> = Vec::new();
    for level in &levels {
        match runs.last_mut() {
            Some((value, count)) if value == level => *count += 1,
            _ => runs.push((*level, 1)),
        }
    }
    let last = runs.len() - 1;
    for (n, (level, count)) in runs.iter().enumerate() {
        if *level && n != last {
            assert_eq!(*count, timings.monostable_high);
        }
        if !*level {
            // The gap to the next astable falling edge is below one cycle.
            assert!(*count < period);
        }
    }

    // Rising edges stay locked to the astable cycle.
    let edges: Vec<usize> = (1..levels.len())
        .filter(|&n| levels[n] && !levels[n - 1])
        .collect();
    assert!(edges.len() > 2);
    for window in edges.windows(2) {
        assert_eq!((window[1] - window[0]) % period as usize, 0);
    }

    wav_writer::write("timer/square.wav", SAMPLE_RATE, &wav_data).ok();
}

#[test]
fn rescale_phase_doubles_counters() {
    let pair = PotPair::new(100_000, 80_000);

    let mut circuit = TimerCircuit::new();
    circuit.init();
    circuit.retune(pair, SAMPLE_RATE);

    for _ in 0..500 {
        circuit.tick();
    }

    let (astable_run, monostable_run) = circuit.run_times();
    circuit.rescale_phase(2.0);
    let (astable_scaled, monostable_scaled) = circuit.run_times();

    assert!((astable_scaled - 2 * astable_run).abs() <= 1);
    assert!((monostable_scaled - 2 * monostable_run).abs() <= 1);
}

#[test]
fn retune_keeps_phase() {
    let mut circuit = TimerCircuit::new();
    circuit.init();
    circuit.retune(PotPair::new(100_000, 80_000), SAMPLE_RATE);

    for _ in 0..100 {
        circuit.tick();
    }

    let before = circuit.run_times();
    circuit.retune(PotPair::new(200_000, 40_000), SAMPLE_RATE);

    assert_eq!(circuit.run_times(), before);
    assert_eq!(
        circuit.timings(),
        TimerTimings::derive(PotPair::new(200_000, 40_000), SAMPLE_RATE)
    );
}
