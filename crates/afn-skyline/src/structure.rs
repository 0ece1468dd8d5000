//! Skyline profile derived from connectivity.

/// Column-height structure of a skyline matrix.
///
/// Column `j` stores the off-diagonal rows `top[j]..j`; a column whose top
/// equals its own index stores nothing above the diagonal. The profile is
/// symmetric (it comes from undirected link connectivity), so row `j` of the
/// lower triangle has the same extent as column `j` of the upper triangle.
///
/// Built once per topology and shared by every matrix over that topology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkylineStructure {
    n: usize,
    /// top[j] = lowest row index stored in column j (== j when empty).
    top: Vec<usize>,
    /// offset[j] = start of column j's packed entries; offset[n] = total nnz.
    offset: Vec<usize>,
}

impl SkylineStructure {
    /// Compute column heights from row pairs (one pair per link between two
    /// unknown rows). For every pair, the column of the higher-indexed row is
    /// extended down to the lower-indexed row if not already covered.
    pub fn from_pairs(n: usize, pairs: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut top: Vec<usize> = (0..n).collect();
        for (a, b) in pairs {
            debug_assert!(a < n && b < n);
            if a == b {
                continue;
            }
            let (lo, hi) = if a < b { (a, b) } else { (b, a) };
            if lo < top[hi] {
                top[hi] = lo;
            }
        }

        let mut offset = Vec::with_capacity(n + 1);
        offset.push(0);
        for j in 0..n {
            offset.push(offset[j] + (j - top[j]));
        }

        Self { n, top, offset }
    }

    /// Dense profile for a matrix with no sparsity (used in tests).
    pub fn dense(n: usize) -> Self {
        Self::from_pairs(n, (1..n).map(|j| (0, j)))
    }

    /// Matrix order.
    pub fn order(&self) -> usize {
        self.n
    }

    /// Total number of stored off-diagonal entries per triangle.
    pub fn nnz(&self) -> usize {
        self.offset[self.n]
    }

    /// Top (lowest stored row) of column j.
    pub fn top(&self, j: usize) -> usize {
        self.top[j]
    }

    /// Packed position of entry (i, j), i < j. Returns None outside profile.
    pub fn position(&self, i: usize, j: usize) -> Option<usize> {
        debug_assert!(i < j && j < self.n);
        if i < self.top[j] {
            return None;
        }
        Some(self.offset[j] + (i - self.top[j]))
    }
}
