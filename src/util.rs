use itertools::Itertools;
use rand::Rng;

/// In-place Fisher–Yates shuffle: for each index from the last down to 1,
/// swap it with a uniformly chosen index at or below it.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Whether `a` and `b` hold the same multiset of words
pub fn is_permutation(a: &[String], b: &[String]) -> bool {
    a.len() == b.len() && a.iter().counts() == b.iter().counts()
}
