use approx::assert_abs_diff_eq;
use hexknn::{
    DensityFieldBuilder, Extent, HexGrid, KnnError, LabeledPoint, PointSet, RawRecord,
    VisualizerError, classify, load_points, recompute,
};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

const SPECIES: [&str; 3] = ["Adelie", "Chinstrap", "Gentoo"];

/// Three loose clusters roughly where the penguin species sit.
fn synthetic_penguins(n: usize, seed: u64) -> Vec<LabeledPoint<String, f64>> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let centers = [(38.8, 18.3), (48.8, 18.4), (47.5, 15.0)];
    (0..n)
        .map(|i| {
            let s = i % SPECIES.len();
            let (cx, cy) = centers[s];
            LabeledPoint::new(
                cx + rng.random_range(-3.0..3.0),
                cy + rng.random_range(-1.5..1.5),
                SPECIES[s].to_string(),
            )
        })
        .collect()
}

fn bills() -> Vec<LabeledPoint<&'static str, f64>> {
    vec![
        LabeledPoint::new(40.0, 18.0, "A"),
        LabeledPoint::new(42.0, 17.0, "A"),
        LabeledPoint::new(50.0, 15.0, "B"),
    ]
}

#[test]
fn nearest_neighbor_votes_for_closest_species() {
    let points = PointSet::new(&bills());
    assert_eq!(classify((41.0, 17.5), &points, 1).unwrap(), "A");
    assert_eq!(classify((41.0, 17.5), &points, 3).unwrap(), "A");
    assert_eq!(classify((49.0, 15.0), &points, 1).unwrap(), "B");
}

#[test]
fn empty_point_set_is_reported_not_defaulted() {
    let points: PointSet<&str, f64> = PointSet::new(&[]);
    assert_eq!(
        classify((41.0, 17.5), &points, 1),
        Err(KnnError::InsufficientData)
    );
}

#[test]
fn small_square_grid_is_fixed() {
    let extent = Extent::new(0.0, 0.0, 10.0, 10.0).unwrap();
    let grid = HexGrid::new(extent, 5.0).unwrap();
    let centers: Vec<(f64, f64)> = grid
        .cells()
        .iter()
        .map(|c| (c.center_x, c.center_y))
        .collect();

    let dx = 5.0 * 3.0_f64.sqrt();
    let expected = [(0.0, 0.0), (dx, 0.0), (dx / 2.0, 7.5), (1.5 * dx, 7.5)];
    assert_eq!(centers.len(), expected.len());
    for ((x, y), (ex, ey)) in centers.iter().zip(expected) {
        assert_abs_diff_eq!(*x, ex, epsilon = 1e-9);
        assert_abs_diff_eq!(*y, ey, epsilon = 1e-9);
    }

    let again = HexGrid::new(extent, 5.0).unwrap();
    assert_eq!(grid, again);
}

#[test]
fn recompute_is_idempotent() {
    let points = synthetic_penguins(150, 42);
    let grid = HexGrid::new(Extent::from_points(&points, 1.0).unwrap(), 0.8).unwrap();

    for k in [1, 5, 30] {
        let first = recompute(&grid, &points, 100, k).unwrap();
        let second = recompute(&grid, &points, 100, k).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn fields_align_with_grid_and_points() {
    let points = synthetic_penguins(120, 9);
    let grid = HexGrid::new(Extent::from_points(&points, 1.0).unwrap(), 0.8).unwrap();
    let fields = recompute(&grid, &points, 80, 7).unwrap();

    assert_eq!(fields.decision.len(), grid.len());
    assert_eq!(fields.density.total_points(), 80);
    for entry in fields.density.iter() {
        assert!(entry.count > 0);
        assert!(entry.votes <= entry.count);
        assert_eq!(grid.cell(entry.cell.index), Some(&entry.cell));
    }

    // A cell without points has no density entry but still has a decision.
    let displayed = PointSet::truncated(&points, 80);
    let bins = grid.assign_bins(&displayed);
    for index in 0..grid.len() {
        assert!(fields.decision.get(index).is_some());
        assert_eq!(
            fields.density.get(index).is_some(),
            !bins.members(index).is_empty()
        );
    }
    assert_eq!(DensityFieldBuilder::build(&bins), fields.density);
}

#[test]
fn growing_k_to_everything_gives_the_global_majority() {
    let mut points = synthetic_penguins(30, 1);
    // Tip the balance towards Adelie.
    points.push(LabeledPoint::new(38.0, 18.0, "Adelie".to_string()));
    let grid = HexGrid::new(Extent::from_points(&points, 1.0).unwrap(), 1.0).unwrap();

    let fields = recompute(&grid, &points, points.len(), 100).unwrap();
    assert!(fields.decision.iter().all(|c| c.label == "Adelie"));
}

#[test]
fn clamped_k_matches_point_count() {
    let points = synthetic_penguins(12, 77);
    let grid = HexGrid::new(Extent::from_points(&points, 1.0).unwrap(), 1.0).unwrap();
    let exact = recompute(&grid, &points, 100, points.len()).unwrap();
    let clamped = recompute(&grid, &points, 100, 100).unwrap();
    assert_eq!(exact.decision.label_counts(), clamped.decision.label_counts());
}

#[test]
fn malformed_rows_never_reach_the_fields() {
    let records = vec![
        RawRecord {
            species: Some("Adelie".into()),
            bill_length_mm: Some(39.1),
            bill_depth_mm: Some(18.7),
        },
        RawRecord {
            species: Some("Adelie".into()),
            bill_length_mm: None,
            bill_depth_mm: None,
        },
        RawRecord {
            species: Some("Gentoo".into()),
            bill_length_mm: Some(46.1),
            bill_depth_mm: Some(13.2),
        },
    ];
    let (points, skipped) = load_points(records);
    assert_eq!(skipped, 1);

    let grid = HexGrid::new(Extent::from_points(&points, 1.0).unwrap(), 1.0).unwrap();
    let fields = recompute(&grid, &points, 100, 1).unwrap();
    assert_eq!(fields.density.total_points(), 2);
}

#[test]
fn zero_points_displayed_is_insufficient() {
    let points = bills();
    let grid = HexGrid::new(Extent::from_points(&points, 1.0).unwrap(), 1.0).unwrap();
    assert!(matches!(
        recompute(&grid, &points, 0, 3),
        Err(VisualizerError::Knn(KnnError::InsufficientData))
    ));
}
