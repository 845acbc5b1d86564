//! Benchmarks for the noise kernel and full texture generation.
//!
//! Run with: cargo bench --bench texture_benchmark

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use planet_forge::noise::{Fbm, noise2d};
use planet_forge::{GenerateOptions, TextureRequest, TextureType, generate_with};

fn benchmark_single_sample(c: &mut Criterion) {
    c.bench_function("noise2d_sample", |b| {
        let mut x = 0.0f64;
        b.iter(|| {
            x += 0.1;
            black_box(noise2d(black_box(x), black_box(x * 0.7)))
        });
    });
}

fn benchmark_fbm(c: &mut Criterion) {
    let raw = Fbm::default();
    let amplified = Fbm::new(5, 2.0, 0.5).amplified();

    c.bench_function("fbm_6_octaves", |b| {
        let mut x = 0.0f64;
        b.iter(|| {
            x += 0.1;
            black_box(raw.sample(black_box(x), black_box(x * 0.7)))
        });
    });

    c.bench_function("fbm_5_octaves_amplified", |b| {
        let mut x = 0.0f64;
        b.iter(|| {
            x += 0.1;
            black_box(amplified.sample(black_box(x), black_box(x * 0.7)))
        });
    });
}

fn benchmark_textures(c: &mut Criterion) {
    let resolution = 128;
    let cases = [
        (TextureType::GasGiant, "#D8CA9D", "#A89A6D"),
        (TextureType::IceGiant, "#D1E7E7", "#B0E0E0"),
        (TextureType::Terrestrial, "#2233FF", "#228833"),
        (TextureType::Cratered, "#A5A5A5", "#808080"),
        (TextureType::Volcanic, "#eebb44", "#aa4400"),
    ];

    let mut group = c.benchmark_group("texture_128");
    group.throughput(Throughput::Elements(resolution * resolution));
    group.sample_size(10);

    let options = GenerateOptions::default();
    for (texture, base, secondary) in cases {
        let request = match TextureRequest::new(texture, base, secondary, resolution as i64) {
            Ok(request) => request,
            Err(err) => panic!("Bad benchmark request for {}: {}", texture, err),
        };
        group.bench_with_input(BenchmarkId::from_parameter(texture), &request, |b, request| {
            b.iter(|| black_box(generate_with(request, &options)));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_single_sample, benchmark_fbm, benchmark_textures);
criterion_main!(benches);
