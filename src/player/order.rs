//! Playlist stepping.
//!
//! Both functions depend only on their arguments (plus the random source when
//! shuffling), so they are tested exhaustively without a controller.

use rand::Rng;

/// Index that follows `current`.
///
/// Sequential mode wraps modulo `len`. Shuffle mode picks uniformly among the
/// other indices by rejection sampling; a one-track playlist returns `current`.
pub fn next_index<R: Rng + ?Sized>(current: usize, shuffle: bool, len: usize, rng: &mut R) -> usize {
    if len == 0 {
        return 0;
    }
    if shuffle {
        return random_other(current, len, rng);
    }
    (current + 1) % len
}

/// Index that precedes `current`, with the same shuffle rule as [`next_index`].
pub fn prev_index<R: Rng + ?Sized>(current: usize, shuffle: bool, len: usize, rng: &mut R) -> usize {
    if len == 0 {
        return 0;
    }
    if shuffle {
        return random_other(current, len, rng);
    }
    (current + len - 1) % len
}

// Expected retries stay below one for any len >= 2; unbounded only in theory.
fn random_other<R: Rng + ?Sized>(current: usize, len: usize, rng: &mut R) -> usize {
    if len <= 1 {
        return current;
    }
    loop {
        let pick = rng.random_range(0..len);
        if pick != current {
            return pick;
        }
    }
}
