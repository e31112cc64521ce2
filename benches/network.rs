use criterion::{Criterion, black_box, criterion_group, criterion_main};

use tabmlp::{Activation, Loss, NetworkBuilder};

fn forward_batch_bench(c: &mut Criterion) {
    let net = NetworkBuilder::from_sizes(
        &[128, 256, 256, 10],
        &[Activation::ReLU, Activation::ReLU, Activation::Sigmoid],
    )
    .unwrap()
    .build_with_seed(0)
    .unwrap();

    let rows = 32;
    let mut scratch = net.batch_scratch(rows);
    let input = vec![0.1_f64; rows * net.input_dim()];

    c.bench_function("forward_batch_32x128_256_256_10", |b| {
        b.iter(|| {
            net.forward_batch(black_box(&input), rows, &mut scratch);
            black_box(scratch.output(rows));
        })
    });
}

fn backward_batch_bench(c: &mut Criterion) {
    let mut net = NetworkBuilder::from_sizes(
        &[128, 256, 256, 10],
        &[Activation::ReLU, Activation::ReLU, Activation::Sigmoid],
    )
    .unwrap()
    .build_with_seed(0)
    .unwrap();

    let rows = 32;
    let mut scratch = net.batch_scratch(rows);
    let mut deltas = net.deltas();
    let input = vec![0.1_f64; rows * net.input_dim()];
    let targets = vec![0.0_f64; rows * net.output_dim()];

    net.forward_batch(&input, rows, &mut scratch);

    c.bench_function("backward_batch_32x128_256_256_10", |b| {
        b.iter(|| {
            net.backward_batch(
                black_box(&input),
                black_box(&targets),
                rows,
                Loss::Square,
                &scratch,
                &mut deltas,
                1e-6,
            );
        })
    });
}

criterion_group!(benches, forward_batch_bench, backward_batch_bench);
criterion_main!(benches);
