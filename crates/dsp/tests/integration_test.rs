use autogain_dsp::*;
use std::f64::consts::PI;

const SAMPLE_RATE: f64 = 44100.0;

fn sine_chunk(start: usize, len: usize, frequency: f64, amplitude: f64) -> Vec<i16> {
    (0..len)
        .map(|i| {
            let t = (start + i) as f64 / SAMPLE_RATE;
            (amplitude * (2.0 * PI * frequency * t).sin()) as i16
        })
        .collect()
}

fn peak(samples: &[i16]) -> i32 {
    samples.iter().map(|&s| i32::from(s).abs()).max().unwrap_or(0)
}

#[test]
fn test_quiet_sine_levels_toward_target() {
    let mut leveler = Compressor::new(0);
    let chunk_len = BLOCK_SAMPLES;

    // A 440 Hz sine at ~3% of full scale, roughly 9 seconds of audio
    let mut last_peak = 0;
    for chunk in 0..800 {
        let mut samples = sine_chunk(chunk * chunk_len, chunk_len, 440.0, 1000.0);
        leveler.process(&mut samples);
        last_peak = peak(&samples);
    }

    // The output peak has climbed most of the way to the target level
    assert!(
        (15000..=16600).contains(&last_peak),
        "leveled peak was {}",
        last_peak
    );
    assert!(leveler.gain() >= UNITY_GAIN);
    assert!(!leveler.has_clipped());
}

#[test]
fn test_quiet_to_loud_transition_stays_in_range() {
    let mut leveler = Compressor::new(0);
    let chunk_len = BLOCK_SAMPLES;

    for chunk in 0..100 {
        let mut samples = sine_chunk(chunk * chunk_len, chunk_len, 330.0, 800.0);
        leveler.process(&mut samples);
    }
    assert!(leveler.gain() > UNITY_GAIN);

    // The transition block clamps at the old gain and gets counted
    let mut samples = sine_chunk(0, chunk_len, 330.0, 30000.0);
    leveler.process(&mut samples);
    assert!(leveler.has_clipped());

    // The gain falls all the way back to unity, after which the loud
    // passage passes through untouched
    for chunk in 1..80 {
        let mut samples = sine_chunk(chunk * chunk_len, chunk_len, 330.0, 30000.0);
        leveler.process(&mut samples);
    }
    assert_eq!(leveler.gain(), UNITY_GAIN);

    let original = sine_chunk(0, chunk_len, 330.0, 30000.0);
    let mut samples = original.clone();
    leveler.process(&mut samples);
    assert_eq!(samples, original);
}

#[test]
fn test_spike_mid_stream_forces_unity_and_exact_peak() {
    let mut leveler = Compressor::new(0);

    // Warm the gain up on quiet constant blocks
    for _ in 0..20 {
        let mut samples = vec![500i16; BLOCK_SAMPLES];
        leveler.process(&mut samples);
    }
    assert!(leveler.gain() > UNITY_GAIN);

    let mut samples = vec![0i16; BLOCK_SAMPLES];
    samples[137] = i16::MAX;
    leveler.process(&mut samples);

    // The guard recomputes (32767 << 10) / 32767, exactly unity
    assert_eq!(leveler.gain(), UNITY_GAIN);
    assert_eq!(samples[137], i16::MAX);
    assert!(samples
        .iter()
        .enumerate()
        .all(|(i, &s)| i == 137 || s == 0));
}

#[test]
fn test_resize_mid_stream_keeps_recent_peaks() {
    let mut leveler = Compressor::new(6);
    for amplitude in [1000i16, 2000, 3000, 4000, 5000, 6000] {
        let mut samples = vec![amplitude; BLOCK_SAMPLES];
        leveler.process(&mut samples);
    }
    assert_eq!(leveler.history().sustained_peak(), 6000);

    // The three most recent block peaks survive, in order
    leveler.set_history(3);
    assert_eq!(leveler.history().peaks(), vec![4000, 5000, 6000]);

    // Three quiet blocks age the loud peaks out completely
    for _ in 0..2 {
        let mut samples = vec![100i16; BLOCK_SAMPLES];
        leveler.process(&mut samples);
        assert_eq!(leveler.history().sustained_peak(), 6000);
    }
    let mut samples = vec![100i16; BLOCK_SAMPLES];
    leveler.process(&mut samples);
    assert_eq!(leveler.history().sustained_peak(), 100);
}

#[test]
fn test_floor_limits_boost_after_loud_session() {
    let mut leveler = Compressor::new(4);
    for _ in 0..8 {
        let mut samples = vec![25000i16; BLOCK_SAMPLES];
        leveler.process(&mut samples);
    }
    // The loud session pinned the floor at (16384 << 10) / 25000
    assert_eq!(leveler.min_gain(), Some(671));
    let ceiling = 671 + leveler.config().max_gain;

    // However long the quiet tail runs, the gain stays under floor + max_gain
    let mut final_peak = 0;
    for _ in 0..300 {
        let mut samples = vec![50i16; BLOCK_SAMPLES];
        leveler.process(&mut samples);
        assert!(leveler.gain() <= ceiling);
        final_peak = peak(&samples);
    }
    // 50 * ceiling >> 10 stays well below the target of 16384
    assert!(final_peak < 2000, "boosted quiet peak was {}", final_peak);
}

#[test]
fn test_randomized_input_never_leaves_range() {
    fastrand::seed(42);
    let mut leveler = Compressor::new(16);

    for round in 0..200 {
        if round % 25 == 0 {
            let config = leveler.config_mut();
            config.target = fastrand::u32(100..32767);
            config.max_gain = fastrand::u32(0..65536);
            config.smooth = fastrand::u32(0..10);
            config.smoothing = if fastrand::bool() {
                GainSmoothing::Exponential
            } else {
                GainSmoothing::Linear
            };
            config.silence_threshold = fastrand::i32(0..100);
        }

        // Mixed full-scale noise and chunk lengths exercise the guard,
        // floor, silence and partial-block paths; any intermediate overflow
        // would panic here under debug assertions
        let len = fastrand::usize(0..1500);
        let mut samples: Vec<i16> = (0..len).map(|_| fastrand::i16(..)).collect();
        leveler.process(&mut samples);

        assert!(leveler.gain() >= UNITY_GAIN);
    }
}
