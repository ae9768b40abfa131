use canvas_color::{
    format::format, parse::parse, terminal, CanonicalColor, ColorInput, OutputFormat,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::time::Duration;

fn random_colors(size: usize) -> Vec<CanonicalColor> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..size)
        .map(|_| CanonicalColor::rgb(rng.gen(), rng.gen(), rng.gen()))
        .collect()
}

// One input of every shape, cycling through random channels
fn random_inputs(size: usize) -> Vec<ColorInput> {
    random_colors(size)
        .into_iter()
        .enumerate()
        .map(|(i, color)| {
            let (r, g, b) = color.rgb_components();
            match i % 6 {
                0 => ColorInput::from(color.to_hex()),
                1 => ColorInput::from(format!("rgb({}, {}, {})", r, g, b)),
                2 => ColorInput::from(format!("hsl({}, 50%, 50%)", i % 360)),
                3 => ColorInput::from(color.packed()),
                4 => ColorInput::from((r, g, b)),
                _ => ColorInput::from([r, g, b]),
            }
        })
        .collect()
}

pub fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    group.sample_size(100);
    group.measurement_time(Duration::from_secs(10));

    for size in [100, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::new("mixed_inputs", size), size, |b, &size| {
            let inputs = random_inputs(size);
            b.iter(|| {
                for input in &inputs {
                    let _ = black_box(parse(black_box(input)));
                }
            });
        });
    }

    group.bench_function("named_lookup", |b| {
        let input = ColorInput::from("rebeccapurple");
        b.iter(|| parse(black_box(&input)));
    });
    group.finish();
}

pub fn bench_format(c: &mut Criterion) {
    let mut group = c.benchmark_group("format");
    group.sample_size(100);
    group.measurement_time(Duration::from_secs(10));

    let colors = random_colors(1000);
    for output in OutputFormat::ALL {
        group.bench_with_input(
            BenchmarkId::new("tag", output.tag()),
            &output,
            |b, &output| {
                b.iter(|| {
                    for color in &colors {
                        black_box(format(black_box(color), output));
                    }
                });
            },
        );
    }
    group.finish();
}

pub fn bench_quantize(c: &mut Criterion) {
    let mut group = c.benchmark_group("quantize");
    group.sample_size(100);
    group.measurement_time(Duration::from_secs(10));

    for size in [100, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::new("ansi256", size), size, |b, &size| {
            let colors = random_colors(size);
            b.iter(|| {
                for color in &colors {
                    black_box(terminal::to_ansi256(black_box(color)));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("ansi16", size), size, |b, &size| {
            let colors = random_colors(size);
            b.iter(|| {
                for color in &colors {
                    black_box(terminal::to_ansi16(black_box(color)));
                }
            });
        });
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default()
        .sample_size(100)
        .measurement_time(Duration::from_secs(10));
    targets = bench_parse, bench_format, bench_quantize
);
criterion_main!(benches);
