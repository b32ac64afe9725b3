use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pallet_packer_core::{optimize, Algorithm, Options, PalletConfig, Product};
use rand::Rng;

fn generate_products(count: usize) -> Vec<Product> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| Product {
            id: i.to_string(),
            code: format!("SKU-{}", i % 8),
            length: rng.gen_range(10.0..60.0),
            width: rng.gen_range(10.0..60.0),
            height: rng.gen_range(10.0..60.0),
            weight: rng.gen_range(1.0..15.0),
            rotatable_horizontal: rng.gen_bool(0.5),
            strength: rng.gen_range(50.0..500.0),
        })
        .collect()
}

fn pallet() -> PalletConfig {
    PalletConfig {
        length: 120.0,
        width: 100.0,
        height: 150.0,
        max_weight: 800.0,
    }
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_throughput");

    for count in [50usize, 150, 300] {
        let products = generate_products(count);
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("greedy", count), &products, |b, products| {
            let options = Options::builder().algorithm(Algorithm::Greedy).build();
            b.iter(|| black_box(optimize(products, &pallet(), &options).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("genetic", count), &products, |b, products| {
            let options = Options::builder()
                .algorithm(Algorithm::Genetic)
                .population(30)
                .generations(20)
                .seed(Some(7))
                .build();
            b.iter(|| black_box(optimize(products, &pallet(), &options).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
