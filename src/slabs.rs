//! Fork-join helpers over z-slices of a voxel buffer.
//!
//! Every within-scale stage is data-parallel over disjoint z-slices:
//! writers get exclusive `&mut` access to their slice, and reductions run a
//! per-worker fold followed by an associative merge. The merged accumulator is
//! only returned after every slice has been folded, so callers cannot observe
//! a partially reduced value.
//!
//! With the `parallel` feature the work is spread over the rayon pool;
//! without it the same closures run sequentially in slice order.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Run `f(z, slice)` for every contiguous slice of `slice_len` elements.
pub fn for_each_slice_mut<T, F>(data: &mut [T], slice_len: usize, f: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync + Send,
{
    if slice_len == 0 || data.is_empty() {
        return;
    }
    #[cfg(feature = "parallel")]
    data.par_chunks_mut(slice_len)
        .enumerate()
        .for_each(|(z, slice)| f(z, slice));
    #[cfg(not(feature = "parallel"))]
    data.chunks_mut(slice_len)
        .enumerate()
        .for_each(|(z, slice)| f(z, slice));
}

/// Two-phase reduction over the slices of `data`.
///
/// Phase 1 folds slices into worker-local accumulators created by `identity`;
/// phase 2 combines them with `merge`. `merge` must be associative and
/// commutative (up to floating-point reassociation) since the grouping of
/// slices into workers is unspecified.
pub fn map_reduce<T, A, I, F, M>(data: &[T], slice_len: usize, identity: I, fold: F, merge: M) -> A
where
    T: Sync,
    A: Send,
    I: Fn() -> A + Sync + Send,
    F: Fn(A, usize, &[T]) -> A + Sync + Send,
    M: Fn(A, A) -> A + Sync + Send,
{
    if slice_len == 0 || data.is_empty() {
        return identity();
    }
    #[cfg(feature = "parallel")]
    {
        data.par_chunks(slice_len)
            .enumerate()
            .fold(&identity, |acc, (z, slice)| fold(acc, z, slice))
            .reduce(&identity, &merge)
    }
    #[cfg(not(feature = "parallel"))]
    {
        data.chunks(slice_len)
            .enumerate()
            .map(|(z, slice)| fold(identity(), z, slice))
            .fold(identity(), &merge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_slice_is_visited_once() {
        let mut data = vec![0usize; 5 * 7];
        for_each_slice_mut(&mut data, 5, |z, slice| {
            for v in slice.iter_mut() {
                *v += z + 1;
            }
        });
        for (i, v) in data.iter().enumerate() {
            assert_eq!(*v, i / 5 + 1);
        }
    }

    #[test]
    fn map_reduce_matches_sequential_sum_and_count() {
        let data: Vec<f64> = (0..1000).map(|i| i as f64 * 0.5).collect();
        let (sum, count) = map_reduce(
            &data,
            37,
            || (0.0f64, 0usize),
            |(s, c), _, slice| (s + slice.iter().sum::<f64>(), c + slice.len()),
            |a, b| (a.0 + b.0, a.1 + b.1),
        );
        assert_eq!(count, 1000);
        assert!((sum - data.iter().sum::<f64>()).abs() < 1e-9);
    }

    #[test]
    fn empty_input_yields_identity() {
        let data: Vec<f32> = Vec::new();
        let out = map_reduce(&data, 4, || 42u32, |a, _, _| a + 1, |a, b| a.max(b));
        assert_eq!(out, 42);
    }
}
