use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use hexknn::{Extent, HexGrid, LabeledPoint, recompute};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

fn penguin_like(n: usize) -> Vec<LabeledPoint<String, f64>> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
    let species = ["Adelie", "Chinstrap", "Gentoo"];
    (0..n)
        .map(|i| {
            LabeledPoint::new(
                rng.random_range(32.0..60.0),
                rng.random_range(13.0..22.0),
                species[i % species.len()].to_string(),
            )
        })
        .collect()
}

fn bench_recompute(c: &mut Criterion) {
    let points = penguin_like(344);
    let extent = Extent::from_points(&points, 1.0).unwrap();

    let mut group = c.benchmark_group("recompute");
    for radius in [0.5, 0.8, 1.5] {
        let grid = HexGrid::new(extent, radius).unwrap();
        group.bench_with_input(BenchmarkId::new("radius", radius), &grid, |b, grid| {
            b.iter(|| recompute(black_box(grid), black_box(&points), 100, 15).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_recompute);
criterion_main!(benches);
