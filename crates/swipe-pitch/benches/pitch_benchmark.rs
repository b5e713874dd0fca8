use criterion::{black_box, criterion_group, criterion_main, Criterion};
use swipe_pitch::{estimate_pitch, SwipeConfig};

fn sine(freq: f64, sample_rate: f64, seconds: f64) -> Vec<f64> {
    let n = (sample_rate * seconds) as usize;
    (0..n)
        .map(|i| (2.0 * std::f64::consts::PI * freq * i as f64 / sample_rate).sin())
        .collect()
}

fn bench_estimate_pitch(c: &mut Criterion) {
    let sample_rate = 16000.0;
    let signal = sine(200.0, sample_rate, 1.0);
    let config = SwipeConfig::default();

    c.bench_function("estimate_pitch 1s @ 16kHz", |b| {
        b.iter(|| estimate_pitch(black_box(&signal), black_box(sample_rate), black_box(&config)))
    });
}

criterion_group!(benches, bench_estimate_pitch);
criterion_main!(benches);
