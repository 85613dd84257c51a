//! Degenerate inputs that would exhaust the stack if tree depth were unbounded
//! or if walks over a deep tree recursed.
use planar_nn::{distance, Float, KdTree, Point, Scalar, VpTree};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn linear_scan<F: Scalar>(points: &[Point<F>], query: &Point<F>) -> F {
    points.iter().map(|p| distance(p, query)).fold(F::infinity(), Float::min)
}

/// Both trees must agree with a linear scan for every pivot seed.
fn check_exact<F: Scalar>(points: &[Point<F>], queries: &[Point<F>]) {
    let kd = KdTree::from_points(points).unwrap();
    for seed in 0..20 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let vp: VpTree<F, Point<F>> = VpTree::with_rng(points.to_vec(), &mut rng).unwrap();
        for q in queries {
            let expected = linear_scan(points, q);
            let found = vp.nearest(q).unwrap();
            assert_eq!(found.distance, expected, "seed {} query {}\n{}", seed, q, vp.dump());
            assert_eq!(kd.nearest(q).unwrap().distance, expected, "query {}", q);
        }
    }
}

#[test]
fn extreme_magnitudes_stay_exact() {
    let points = vec![Point::new(1e300, 0.0), Point::new(-1e300, 0.0), Point::new(-1e300, 1.0)];
    check_exact(&points, &points);

    // differences overflow here, so some distances are infinite
    let points = vec![Point::new(1.5e308, 0.0), Point::new(-1.5e308, 0.0), Point::new(-1.5e308, 1.0)];
    check_exact(&points, &points);

    let points = vec![Point::new(3e19f32, 0.0), Point::new(-3e19, 0.0), Point::new(-3e19, 1e19)];
    check_exact(&points, &points);
}

#[test]
fn extreme_magnitude_clouds() {
    let mut rng = ChaCha8Rng::seed_from_u64(300);

    let points: Vec<Point> = (0..200)
        .map(|_| Point::new(rng.gen_range(-1.0..1.0) * 1e300, rng.gen_range(-1.0..1.0) * 1e300))
        .collect();
    let mut queries: Vec<Point> = (0..20)
        .map(|_| Point::new(rng.gen_range(-1.0..1.0) * 1e300, rng.gen_range(-1.0..1.0) * 1e300))
        .collect();
    queries.extend_from_slice(&points[..20]);
    check_exact(&points, &queries);

    let points: Vec<Point<f32>> = (0..200)
        .map(|_| Point::new(rng.gen_range(-3e19f32..3e19), rng.gen_range(-3e19f32..3e19)))
        .collect();
    let mut queries: Vec<Point<f32>> = (0..20)
        .map(|_| Point::new(rng.gen_range(-3e19f32..3e19), rng.gen_range(-3e19f32..3e19)))
        .collect();
    queries.extend_from_slice(&points[..20]);
    check_exact(&points, &queries);
}

#[test]
fn kd_identical_points_stay_shallow() {
    init_tracing();
    let n = 100_000;
    let tree = KdTree::new(&vec![1.5; n], &vec![-2.0; n]).unwrap();

    // rank-based halving bounds the height by floor(log2 n) + 1
    assert!(tree.height() <= 17, "height {}", tree.height());
    assert_eq!(tree.traverse().count(), n);

    let found = tree.nearest(&Point::new(0.0, 0.0)).unwrap();
    assert_eq!(*found.item, Point::new(1.5, -2.0));
    assert_eq!(found.distance, 2.5);
}

#[test]
fn kd_collinear_points() {
    let n = 50_000;
    let xs: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let tree = KdTree::new(&xs, &vec![0.0; n]).unwrap();
    assert!(tree.height() <= 16);

    let found = tree.nearest(&Point::new(31_337.4, 3.0)).unwrap();
    assert_eq!(*found.item, Point::new(31_337.0, 0.0));
}

#[test]
fn vp_identical_points_form_a_chain() {
    init_tracing();
    let n = 10_000;
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let tree: VpTree<f64, Point> = VpTree::with_rng(vec![Point::new(3.0, 4.0); n], &mut rng).unwrap();

    // every distance ties at zero, so the whole range joins the inner side
    assert_eq!(tree.height(), n);
    assert_eq!(tree.traverse().count(), n);

    let found = tree.nearest(&Point::new(0.0, 0.0)).unwrap();
    assert_eq!(*found.item, Point::new(3.0, 4.0));
    assert_eq!(found.distance, 5.0);
    drop(tree);
}

#[test]
fn vp_two_clusters_of_duplicates() {
    let mut points = vec![Point::new(0.0, 0.0); 3_000];
    points.extend(vec![Point::new(1.0, 1.0); 3_000]);
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let tree: VpTree<f64, Point> = VpTree::with_rng(points, &mut rng).unwrap();

    assert_eq!(tree.len(), 6_000);
    assert_eq!(*tree.nearest(&Point::new(0.9, 0.8)).unwrap().item, Point::new(1.0, 1.0));
    assert_eq!(*tree.nearest(&Point::new(0.2, 0.1)).unwrap().item, Point::new(0.0, 0.0));
}

#[test]
fn vp_collinear_points() {
    let n = 50_000;
    let points: Vec<Point> = (0..n).map(|i| Point::new(i as f64, 0.0)).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let tree: VpTree<f64, Point> = VpTree::with_rng(points, &mut rng).unwrap();

    // mirrored distances can add one tied item to each inner side
    assert!(tree.height() <= 20, "height {}", tree.height());
    let found = tree.nearest(&Point::new(12_345.6, -1.0)).unwrap();
    assert_eq!(*found.item, Point::new(12_346.0, 0.0));
}

#[test]
fn nan_query_does_not_panic() {
    let kd = KdTree::new(&[0.0, 1.0, 2.0], &[0.0, 1.0, 2.0]).unwrap();
    assert!(kd.nearest(&Point::new(f64::NAN, 0.0)).is_ok());

    let vp: VpTree<f64, Point> = VpTree::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]).unwrap();
    assert!(vp.nearest(&Point::new(0.0, f64::NAN)).is_ok());
}
