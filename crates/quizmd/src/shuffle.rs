//! Unbiased in-place shuffling of rendered children.

use rand::Rng;

/// Fisher–Yates shuffle: every permutation is equally likely.
///
/// Walks from the back, swapping each slot with a uniformly chosen slot at or
/// before it.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}
