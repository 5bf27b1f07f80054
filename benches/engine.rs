//! Benchmarks for the Lenia engine.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use lenia::{
    compute::Lenia,
    schema::{ConvolutionBackend, KernelShape, SimulationConfig},
};

fn bench_engine_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_update");

    for size in [64, 128, 256, 512] {
        for backend in [ConvolutionBackend::Spatial, ConvolutionBackend::Spectral] {
            let config = SimulationConfig {
                grid_size: size,
                kernel_radius: 13,
                backend,
                seed: Some(42),
                ..Default::default()
            };
            let mut engine = Lenia::from_config(&config).unwrap();

            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", backend), format!("{}x{}", size, size)),
                &size,
                |b, _| {
                    b.iter(|| {
                        black_box(&mut engine).update();
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_kernel_radius(c: &mut Criterion) {
    let mut group = c.benchmark_group("kernel_radius");

    for radius in [2, 8, 20, 50] {
        for backend in [ConvolutionBackend::Spatial, ConvolutionBackend::Spectral] {
            let config = SimulationConfig {
                grid_size: 128,
                kernel_radius: radius,
                kernel_shape: KernelShape::Ring,
                backend,
                seed: Some(42),
                ..Default::default()
            };
            let mut engine = Lenia::from_config(&config).unwrap();

            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", backend), format!("r{}", radius)),
                &radius,
                |b, _| {
                    b.iter(|| {
                        black_box(&mut engine).update();
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_kernel_rebuild(c: &mut Criterion) {
    let config = SimulationConfig {
        grid_size: 256,
        seed: Some(42),
        ..Default::default()
    };
    let mut engine = Lenia::from_config(&config).unwrap();
    let mut radius = 10;

    c.bench_function("kernel_rebuild_spectral_256", |b| {
        b.iter(|| {
            radius = if radius == 10 { 11 } else { 10 };
            engine.set_kernel_radius(black_box(radius));
        });
    });
}

criterion_group!(
    benches,
    bench_engine_update,
    bench_kernel_radius,
    bench_kernel_rebuild
);
criterion_main!(benches);
