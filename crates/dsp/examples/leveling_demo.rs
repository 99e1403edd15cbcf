/// Example: Level a synthetic quiet recording
///
/// Usage: cargo run -p autogain-dsp --example leveling_demo
///
/// Feeds a quiet sine wave through the leveler, trips the clip guard with a
/// full-scale spike, then shrinks the peak history so the gain recovers.
use anyhow::Result;
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

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== Automatic Gain Demo ===\n");

    let mut leveler = Compressor::new(0);
    println!("Config: {:?}", leveler.config());
    println!(
        "History: {} blocks of {} samples\n",
        leveler.history().capacity(),
        BLOCK_SAMPLES
    );

    // Phase 1: a quiet passage gets boosted toward the target
    println!("Quiet 220 Hz sine at ~2% of full scale:");
    let chunk_len = 4 * BLOCK_SAMPLES;
    for chunk in 0..40 {
        let mut samples = sine_chunk(chunk * chunk_len, chunk_len, 220.0, 800.0);
        let before = peak(&samples);
        leveler.process(&mut samples);
        if chunk % 8 == 0 {
            println!(
                "  chunk {:>2}: peak {:>5} -> {:>5}  gain {:>5.2}x ({:+.1} dB)",
                chunk,
                before,
                peak(&samples),
                gain_factor(leveler.gain()),
                gain_db(leveler.gain())
            );
        }
    }

    // Phase 2: a full-scale spike trips the clip guard
    println!("\nFull-scale spike:");
    let mut samples = vec![0i16; BLOCK_SAMPLES];
    samples[300] = i16::MAX;
    leveler.process(&mut samples);
    println!(
        "  gain {:.2}x, spike kept at {}, clipped magnitude {}",
        gain_factor(leveler.gain()),
        peak(&samples),
        leveler.last_clipped()
    );

    // Phase 3: shrink the history so the spike ages out quickly
    println!("\nAfter set_history(8), quiet material again:");
    leveler.set_history(8);
    for chunk in 0..30 {
        let mut samples = sine_chunk(chunk * chunk_len, chunk_len, 220.0, 800.0);
        leveler.process(&mut samples);
        if chunk % 6 == 0 {
            println!(
                "  chunk {:>2}: sustained {:>5}  gain {:>5.2}x",
                chunk,
                leveler.history().sustained_peak(),
                gain_factor(leveler.gain())
            );
        }
    }

    println!("\n✓ Demo complete");
    Ok(())
}
