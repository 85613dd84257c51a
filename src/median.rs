//! Order statistics used while building the trees.
use std::cmp::Ordering;

use crate::point::Scalar;

/// Total order for comparable scalars.
///
/// Incomparable values (NaN) compare equal; inputs are validated before
/// they reach any ordering.
pub fn cmp_scalar<F: PartialOrd>(x: &F, y: &F) -> Ordering {
    x.partial_cmp(y).unwrap_or(Ordering::Equal)
}

/// Unbiased sample variance. Fewer than two values have zero variance.
///
/// ```
/// use planar_nn::median::sample_variance;
/// assert_eq!(sample_variance([2.0].iter().copied()), 0.0);
/// assert_eq!(sample_variance([1.0, 3.0].iter().copied()), 2.0);
/// assert_eq!(sample_variance([5.0, 5.0, 5.0].iter().copied()), 0.0);
/// ```
pub fn sample_variance<F, I>(values: I) -> F
    where F: Scalar, I: Iterator<Item = F> + Clone {

    let (sum, count) = values.clone()
        .fold((F::zero(), F::zero()), |(s, c), v| (s + v, c + F::one()));
    if count <= F::one() {
        return F::zero();
    }
    let mean = sum / count;
    let squares = values.fold(F::zero(), |acc, v| acc + (v - mean) * (v - mean));
    squares / (count - F::one())
}

/// Indices `0..len` stably sorted by `key`.
///
/// Equal keys keep their input order, so repeated coordinates produce
/// a deterministic ordering.
pub fn stable_order<F, K>(len: usize, key: K) -> Vec<usize>
    where F: PartialOrd, K: Fn(usize) -> F {

    let mut order: Vec<usize> = (0..len).collect();
    order.sort_by(|&a, &b| cmp_scalar(&key(a), &key(b)));
    order
}

/// Split `secondary` into the members of `before` and the rest, skipping
/// `pivot`, without disturbing the relative order of `secondary`.
///
/// `marks` is scratch space indexed by item and must be all `false` on
/// entry; it is all `false` again on return.
pub fn split_order(secondary: &[usize], before: &[usize], pivot: usize,
                   marks: &mut [bool]) -> (Vec<usize>, Vec<usize>) {
    for &i in before {
        marks[i] = true;
    }

    let mut left = Vec::with_capacity(before.len());
    let mut right = Vec::with_capacity(secondary.len().saturating_sub(before.len() + 1));
    for &i in secondary {
        if i == pivot {
            continue;
        }
        if marks[i] {
            left.push(i);
        } else {
            right.push(i);
        }
    }

    for &i in before {
        marks[i] = false;
    }
    (left, right)
}

/// Partially order `work` by its distance keys so that the first `k`
/// entries are the `k` smallest, then pull every later entry whose
/// distance equals the k-th into the leading group.
///
/// Returns the k-th smallest distance and the size of the leading group.
/// Every entry past the group is strictly farther than the returned
/// distance. `k` must be in `1..=work.len()`.
pub fn select_inner<F: Scalar, T>(work: &mut [(F, T)], k: usize) -> (F, usize) {
    debug_assert!(k >= 1 && k <= work.len());

    let mu = order_stat::kth_by(work, k - 1, |a, b| cmp_scalar(&a.0, &b.0)).0;

    let mut boundary = k;
    for i in k..work.len() {
        if work[i].0 <= mu {
            work.swap(i, boundary);
            boundary += 1;
        }
    }
    (mu, boundary)
}
