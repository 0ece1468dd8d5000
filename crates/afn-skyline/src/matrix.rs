//! Skyline matrix storage, assembly, factorization and substitution.

use crate::error::{SkylineError, SkylineResult};
use crate::structure::SkylineStructure;

/// Pivot magnitudes below this are treated as a singular system.
const PIVOT_FLOOR: f64 = 1e-20;

/// A square matrix in skyline storage: main diagonal plus packed
/// variable-height upper column segments, with a mirrored lower array for the
/// non-symmetric case. Symmetric matrices store the upper triangle only.
///
/// The profile itself never changes after construction; `zero()` resets the
/// values so one allocation serves every assembly over the same topology.
#[derive(Debug, Clone)]
pub struct SkylineMatrix {
    structure: SkylineStructure,
    symmetric: bool,
    diag: Vec<f64>,
    /// Upper triangle, packed by column. Entry (i, j), i < j.
    upper: Vec<f64>,
    /// Lower triangle, packed to mirror `upper`: entry (j, i), i < j, lives at
    /// the same packed position as (i, j). Empty when symmetric.
    lower: Vec<f64>,
    factored: bool,
}

impl SkylineMatrix {
    /// Create a zeroed matrix over the given profile.
    pub fn new(structure: SkylineStructure, symmetric: bool) -> Self {
        let n = structure.order();
        let nnz = structure.nnz();
        Self {
            structure,
            symmetric,
            diag: vec![0.0; n],
            upper: vec![0.0; nnz],
            lower: if symmetric { Vec::new() } else { vec![0.0; nnz] },
            factored: false,
        }
    }

    /// Matrix order.
    pub fn order(&self) -> usize {
        self.structure.order()
    }

    /// Current diagonal entry (factor pivot once factorized).
    pub fn diag(&self, i: usize) -> f64 {
        self.diag[i]
    }

    /// Reset all values for a fresh assembly, keeping the profile.
    pub fn zero(&mut self) {
        self.diag.fill(0.0);
        self.upper.fill(0.0);
        self.lower.fill(0.0);
        self.factored = false;
    }

    /// Add `value` to entry (row, col). For a symmetric matrix, (row, col)
    /// and (col, row) address the same stored slot.
    pub fn add(&mut self, row: usize, col: usize, value: f64) -> SkylineResult<()> {
        self.factored = false;
        if row == col {
            self.diag[row] += value;
            return Ok(());
        }
        let (i, j) = if row < col { (row, col) } else { (col, row) };
        let pos = self
            .structure
            .position(i, j)
            .ok_or(SkylineError::OutsideProfile { row, col })?;
        if self.symmetric || row < col {
            self.upper[pos] += value;
        } else {
            self.lower[pos] += value;
        }
        Ok(())
    }

    /// Assemble a 2x2 element block. `rows[a]` is the solver row of the
    /// element's a-th node, or `None` when that node is a boundary node, in
    /// which case its equation and column are simply not emitted.
    ///
    /// `local[a][b]` is the coefficient of unknown `b` in equation `a`.
    pub fn add_block(&mut self, rows: [Option<usize>; 2], local: [[f64; 2]; 2]) -> SkylineResult<()> {
        for a in 0..2 {
            let Some(ra) = rows[a] else { continue };
            for b in 0..2 {
                let Some(rb) = rows[b] else { continue };
                // Symmetric storage keeps one slot per off-diagonal pair;
                // emit it from the upper side only.
                if self.symmetric && ra > rb {
                    continue;
                }
                self.add(ra, rb, local[a][b])?;
            }
        }
        Ok(())
    }

    /// In-place LU factorization without pivoting (LDL^T when symmetric).
    ///
    /// Fails with the offending row when a diagonal pivot degenerates, which
    /// signals a disconnected or locally rank-deficient unknown.
    pub fn factorize(&mut self) -> SkylineResult<()> {
        let n = self.structure.order();

        for j in 0..n {
            let tj = self.structure.top(j);

            // Upper column j: U(i,j) = A(i,j) - sum_k L(i,k) U(k,j)
            for i in tj..j {
                let pos_ij = self.structure.position(i, j).expect("inside profile");
                let mut sum = self.upper[pos_ij];
                let k0 = self.structure.top(i).max(tj);
                for k in k0..i {
                    let pos_ki = self.structure.position(k, i).expect("inside profile");
                    let pos_kj = self.structure.position(k, j).expect("inside profile");
                    let l_ik = if self.symmetric {
                        self.upper[pos_ki] / self.diag[k]
                    } else {
                        self.lower[pos_ki]
                    };
                    sum -= l_ik * self.upper[pos_kj];
                }
                self.upper[pos_ij] = sum;
            }

            // Lower row j (general case): L(j,i) = (A(j,i) - sum_k L(j,k) U(k,i)) / U(i,i)
            if !self.symmetric {
                for i in tj..j {
                    let pos_ij = self.structure.position(i, j).expect("inside profile");
                    let mut sum = self.lower[pos_ij];
                    let k0 = self.structure.top(i).max(tj);
                    for k in k0..i {
                        let pos_kj = self.structure.position(k, j).expect("inside profile");
                        let pos_ki = self.structure.position(k, i).expect("inside profile");
                        sum -= self.lower[pos_kj] * self.upper[pos_ki];
                    }
                    self.lower[pos_ij] = sum / self.diag[i];
                }
            }

            // Diagonal pivot: D(j) = A(j,j) - sum_k L(j,k) U(k,j)
            let mut d = self.diag[j];
            for k in tj..j {
                let pos_kj = self.structure.position(k, j).expect("inside profile");
                let l_jk = if self.symmetric {
                    self.upper[pos_kj] / self.diag[k]
                } else {
                    self.lower[pos_kj]
                };
                d -= l_jk * self.upper[pos_kj];
            }

            if !d.is_finite() || d.abs() < PIVOT_FLOOR {
                return Err(SkylineError::SingularPivot { row: j, value: d });
            }
            self.diag[j] = d;
        }

        self.factored = true;
        Ok(())
    }

    /// Solve the factored system in place: forward elimination through L,
    /// then back substitution through U.
    pub fn solve_in_place(&self, rhs: &mut [f64]) -> SkylineResult<()> {
        if !self.factored {
            return Err(SkylineError::NotFactored);
        }
        let n = self.structure.order();
        if rhs.len() != n {
            return Err(SkylineError::DimensionMismatch {
                expected: n,
                got: rhs.len(),
            });
        }

        // Forward: L y = b (unit diagonal), row-oriented
        for j in 1..n {
            let tj = self.structure.top(j);
            let mut sum = rhs[j];
            for k in tj..j {
                let pos_kj = self.structure.position(k, j).expect("inside profile");
                let l_jk = if self.symmetric {
                    self.upper[pos_kj] / self.diag[k]
                } else {
                    self.lower[pos_kj]
                };
                sum -= l_jk * rhs[k];
            }
            rhs[j] = sum;
        }

        // Backward: U x = y, column-oriented
        for j in (0..n).rev() {
            rhs[j] /= self.diag[j];
            let x = rhs[j];
            let tj = self.structure.top(j);
            for i in tj..j {
                let pos_ij = self.structure.position(i, j).expect("inside profile");
                rhs[i] -= self.upper[pos_ij] * x;
            }
        }

        Ok(())
    }

    /// Convenience: factored solve into a fresh vector.
    pub fn solve(&self, rhs: &[f64]) -> SkylineResult<Vec<f64>> {
        let mut x = rhs.to_vec();
        self.solve_in_place(&mut x)?;
        Ok(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assemble_dense(values: &[&[f64]], symmetric: bool) -> SkylineMatrix {
        let n = values.len();
        let mut m = SkylineMatrix::new(SkylineStructure::dense(n), symmetric);
        for (i, row) in values.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                if v != 0.0 && (!symmetric || i <= j) {
                    m.add(i, j, v).unwrap();
                }
            }
        }
        m
    }

    #[test]
    fn identity_returns_rhs() {
        let mut m = SkylineMatrix::new(SkylineStructure::from_pairs(3, std::iter::empty()), true);
        for i in 0..3 {
            m.add(i, i, 1.0).unwrap();
        }
        m.factorize().unwrap();
        let x = m.solve(&[3.0, -1.0, 0.5]).unwrap();
        assert_eq!(x, vec![3.0, -1.0, 0.5]);
    }

    #[test]
    fn symmetric_two_by_two() {
        // [[4, 1], [1, 3]] x = [1, 2] -> x = [1/11, 7/11]
        let mut m = assemble_dense(&[&[4.0, 1.0], &[0.0, 3.0]], true);
        m.factorize().unwrap();
        let x = m.solve(&[1.0, 2.0]).unwrap();
        assert!((x[0] - 1.0 / 11.0).abs() < 1e-14);
        assert!((x[1] - 7.0 / 11.0).abs() < 1e-14);
    }

    #[test]
    fn general_three_by_three() {
        // Non-symmetric system with known solution x = [1, -2, 3]
        let a = [
            [2.0, -1.0, 0.5],
            [1.0, 3.0, -1.0],
            [0.0, 0.5, 4.0],
        ];
        let x_true = [1.0, -2.0, 3.0];
        let mut rhs = [0.0; 3];
        for i in 0..3 {
            for j in 0..3 {
                rhs[i] += a[i][j] * x_true[j];
            }
        }

        let mut m = assemble_dense(&[&a[0], &a[1], &a[2]], false);
        m.factorize().unwrap();
        let x = m.solve(&rhs).unwrap();
        for i in 0..3 {
            assert!((x[i] - x_true[i]).abs() < 1e-12, "x[{i}] = {}", x[i]);
        }
    }

    #[test]
    fn singular_diagonal_reports_row() {
        let mut m = SkylineMatrix::new(SkylineStructure::from_pairs(2, [(0, 1)]), true);
        m.add(0, 0, 2.0).unwrap();
        // Row 1 left entirely zero
        let err = m.factorize().unwrap_err();
        assert_eq!(
            err,
            SkylineError::SingularPivot {
                row: 1,
                value: 0.0
            }
        );
    }

    #[test]
    fn rank_deficient_pivot_detected() {
        // Second pivot cancels exactly: [[1, 1], [1, 1]] -> D(1) = 1 - 1*1 = 0
        let mut m = assemble_dense(&[&[1.0, 1.0], &[0.0, 1.0]], true);
        assert!(matches!(
            m.factorize(),
            Err(SkylineError::SingularPivot { row: 1, .. })
        ));
    }

    #[test]
    fn add_block_skips_boundary_rows() {
        let mut m = SkylineMatrix::new(SkylineStructure::from_pairs(2, [(0, 1)]), true);
        // Link between unknown row 0 and a boundary node: only the (0,0)
        // entry may land.
        m.add_block([Some(0), None], [[2.5, -2.5], [-2.5, 2.5]])
            .unwrap();
        // Link between rows 0 and 1: full block.
        m.add_block([Some(0), Some(1)], [[1.0, -1.0], [-1.0, 1.0]])
            .unwrap();

        m.factorize().unwrap();
        // A = [[3.5, -1], [-1, 1]]; solve A x = [1, 0] -> x = [0.4, 0.4]
        let x = m.solve(&[1.0, 0.0]).unwrap();
        assert!((x[0] - 0.4).abs() < 1e-14);
        assert!((x[1] - 0.4).abs() < 1e-14);
    }

    #[test]
    fn solve_requires_factorization() {
        let m = SkylineMatrix::new(SkylineStructure::dense(2), true);
        assert!(matches!(m.solve(&[1.0, 1.0]), Err(SkylineError::NotFactored)));
    }

    #[test]
    fn zero_resets_for_reassembly() {
        let mut m = assemble_dense(&[&[2.0, 0.0], &[0.0, 2.0]], true);
        m.factorize().unwrap();
        m.zero();
        m.add(0, 0, 4.0).unwrap();
        m.add(1, 1, 4.0).unwrap();
        m.factorize().unwrap();
        let x = m.solve(&[8.0, 8.0]).unwrap();
        assert_eq!(x, vec![2.0, 2.0]);
    }
}
