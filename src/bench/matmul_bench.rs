//! Benchmark of the two executors across task counts.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use matmul_tasks::{Matrix, Strategy, multiply, multiply_sequential};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn bench_executors(c: &mut Criterion) {
    let mut group = c.benchmark_group("executors");
    group.sample_size(20);

    let size = 90;
    let mut rng = StdRng::seed_from_u64(0);
    let a = Matrix::random(size, size, &mut rng);
    let b = Matrix::random(size, size, &mut rng);

    group.bench_function("sequential", |bench| {
        bench.iter(|| black_box(multiply_sequential(black_box(&a), black_box(&b))));
    });

    for tasks in [1, 4, 35, 128] {
        for strategy in Strategy::ALL {
            group.bench_with_input(
                BenchmarkId::new(strategy.to_string(), tasks),
                &tasks,
                |bench, &tasks| {
                    bench.iter(|| {
                        let mut out = Matrix::zeros(size, size);
                        multiply(strategy, black_box(&a), black_box(&b), &mut out, tasks)
                            .expect("benchmark inputs are well formed");
                        black_box(out);
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("sizes");
    group.sample_size(10);

    // Fixed task count, growing output: thread start-up cost vs. work.
    for size in [32, 128, 256] {
        let mut rng = StdRng::seed_from_u64(size as u64);
        let a = Matrix::random(size, size, &mut rng);
        let b = Matrix::random(size, size, &mut rng);

        for strategy in Strategy::ALL {
            group.bench_with_input(
                BenchmarkId::new(strategy.to_string(), size),
                &size,
                |bench, &size| {
                    bench.iter(|| {
                        let mut out = Matrix::zeros(size, size);
                        multiply(strategy, &a, &b, &mut out, 8)
                            .expect("benchmark inputs are well formed");
                        black_box(out);
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_executors, bench_sizes);
criterion_main!(benches);
