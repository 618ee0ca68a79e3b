use rand::Rng;

/// Draw `count` distinct indices from `0..len`, excluding `exclude`.
///
/// Exclusion is index-based, so individuals that happen to share a value are
/// still treated as distinct peers. Returns fewer indices when the range is
/// too small.
pub(crate) fn distinct_indices<R: Rng + ?Sized>(
    exclude: usize,
    count: usize,
    len: usize,
    rng: &mut R,
) -> Vec<usize> {
    let mut pool: Vec<usize> = (0..len).filter(|&j| j != exclude).collect();
    let count = count.min(pool.len());

    let mut picked = Vec::with_capacity(count);
    for _ in 0..count {
        let k = rng.random_range(0..pool.len());
        picked.push(pool.swap_remove(k));
    }
    picked
}
