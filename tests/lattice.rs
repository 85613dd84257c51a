use planar_nn::{distance, KdTree, Point, VpTree};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn lattice_points(n: usize) -> Vec<Point> {
    (0..n).flat_map(|i| {
        (0..n).map(move |j| {
            Point::new(i as f64, j as f64)
        })
    }).collect()
}

#[test]
fn point_check() {
    let a = Point::new(0.0, 0.0);
    let b = Point::new(1.0, 0.0);

    assert_eq!(distance(&a, &b), 1.0);
}

#[test]
fn lattice_kd() {
    let tree = KdTree::from_points(&lattice_points(20)).unwrap();
    assert_eq!(tree.len(), 400);

    let x = tree.nearest(&Point::new(4.46, 4.4)).unwrap();
    assert_eq!(*x.item, Point::new(4.0, 4.0));

    let x = tree.nearest(&Point::new(-3.0, 25.0)).unwrap();
    assert_eq!(*x.item, Point::new(0.0, 19.0));
}

#[test]
fn lattice_vp() {
    let mut rng = ChaCha8Rng::seed_from_u64(20);
    let tree: VpTree<f64, Point> = VpTree::with_rng(lattice_points(20), &mut rng).unwrap();

    let x = tree.nearest(&Point::new(4.46, 4.4)).unwrap();
    assert_eq!(*x.item, Point::new(4.0, 4.0));

    let x = tree.nearest(&Point::new(12.6, 7.3)).unwrap();
    assert_eq!(*x.item, Point::new(13.0, 7.0));
}

#[test]
fn lattice_points_find_themselves() {
    let points = lattice_points(12);
    let kd = KdTree::from_points(&points).unwrap();
    let vp: VpTree<f64, Point> = VpTree::new(points.clone()).unwrap();

    for p in &points {
        assert_eq!(kd.nearest(p).unwrap().item, p);
        assert_eq!(vp.nearest(p).unwrap().item, p);
    }
}
