//! Performance benchmarks for the transcription pipeline

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use strudel_dsp::{transcribe_audio, TranscriptionConfig};

/// 30 seconds of a 4-on-the-floor kick over a bass tone at 120 BPM
fn synthetic_track(duration: f32, sample_rate: f32) -> Vec<f32> {
    let n = (duration * sample_rate) as usize;
    let mut samples: Vec<f32> = (0..n)
        .map(|i| (2.0 * std::f32::consts::PI * 110.0 * i as f32 / sample_rate).sin() * 0.3)
        .collect();

    let beat = (0.5 * sample_rate) as usize;
    let burst_len = (0.08 * sample_rate) as usize;
    let mut pos = 0;
    while pos < n {
        for j in 0..burst_len.min(n - pos) {
            let t = j as f32 / sample_rate;
            samples[pos + j] +=
                (2.0 * std::f32::consts::PI * 100.0 * t).sin() * (-t * 40.0).exp() * 0.8;
        }
        pos += beat;
    }
    samples
}

fn bench_transcribe_audio(c: &mut Criterion) {
    let samples = synthetic_track(30.0, 22050.0);
    let config = TranscriptionConfig::default();

    c.bench_function("transcribe_audio_30s", |b| {
        b.iter(|| {
            let _ = transcribe_audio(
                black_box(&samples),
                black_box(22050),
                black_box(config.clone()),
            );
        });
    });
}

criterion_group!(benches, bench_transcribe_audio);
criterion_main!(benches);
