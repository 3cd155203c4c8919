//! Ranking of partial permutations into a dense index.

use crate::FACT_UNTIL_20;

/// The number of ordered selections of `k` items out of `n`, n! / (n - k)!.
#[must_use]
pub const fn pick(n: usize, k: usize) -> u64 {
    FACT_UNTIL_20[n] / FACT_UNTIL_20[n - k]
}

/// Maps every ordered selection of `K` distinct symbols from `0..N` to a
/// unique rank in `0..N!/(N-K)!`. Ranks follow lexicographic order of the
/// selections, so the identity selection has rank zero.
#[derive(Debug, Clone, Copy)]
pub struct PermutationIndexer<const N: usize, const K: usize> {
    /// `weights[i]` is the number of ways to complete a selection once its
    /// first `i + 1` symbols are fixed.
    weights: [u64; K],
}

impl<const N: usize, const K: usize> Default for PermutationIndexer<N, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize, const K: usize> PermutationIndexer<N, K> {
    /// The number of distinct ranks.
    pub const SIZE: u64 = {
        assert!(K <= N, "cannot pick more symbols than there are");
        assert!(N <= 20, "ranks past 20! do not fit in a u64");
        pick(N, K)
    };

    #[must_use]
    pub const fn new() -> Self {
        let mut weights = [0; K];
        let mut i = 0;
        while i < K {
            weights[i] = pick(N - 1 - i, K - 1 - i);
            i += 1;
        }
        PermutationIndexer { weights }
    }

    /// Rank a selection with the Lehmer code: the digit of position `i` is
    /// the number of unused symbols smaller than `selection[i]`.
    ///
    /// # Panics
    ///
    /// Panics if a symbol is not in `0..N`. Repeated symbols are only caught
    /// in debug builds.
    #[must_use]
    pub fn rank(&self, selection: &[u8; K]) -> u64 {
        let mut seen: u32 = 0;
        let mut rank = 0;
        for (&symbol, &weight) in selection.iter().zip(&self.weights) {
            let symbol = u32::from(symbol);
            assert!(
                (symbol as usize) < N,
                "symbol {symbol} out of range for {N} symbols"
            );
            debug_assert!(seen & (1 << symbol) == 0, "symbol {symbol} repeated");
            let smaller_used = (seen & ((1 << symbol) - 1)).count_ones();
            rank += u64::from(symbol - smaller_used) * weight;
            seen |= 1 << symbol;
        }
        rank
    }
}
