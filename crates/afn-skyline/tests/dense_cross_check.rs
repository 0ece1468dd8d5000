//! Cross-check the skyline factorization against nalgebra's dense LU.

use afn_skyline::{SkylineMatrix, SkylineStructure};
use nalgebra::{DMatrix, DVector};
use proptest::prelude::*;

/// Build matching skyline and dense matrices from a banded symmetric
/// positive-definite pattern.
fn spd_banded(n: usize, seed: u64) -> (SkylineMatrix, DMatrix<f64>) {
    let structure = SkylineStructure::from_pairs(n, (1..n).map(|j| (j - 1, j)));
    let mut sky = SkylineMatrix::new(structure, true);
    let mut dense = DMatrix::zeros(n, n);

    // Deterministic pseudo-random off-diagonals, diagonally dominant
    let mut state = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15).max(1);
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state % 1000) as f64 / 1000.0 - 0.5
    };

    for j in 1..n {
        let v = next();
        sky.add(j - 1, j, v).unwrap();
        dense[(j - 1, j)] = v;
        dense[(j, j - 1)] = v;
    }
    for i in 0..n {
        let d = 2.0 + next().abs();
        sky.add(i, i, d).unwrap();
        dense[(i, i)] = d;
    }

    (sky, dense)
}

#[test]
fn tridiagonal_matches_dense_lu() {
    for seed in 1..6_u64 {
        let n = 8;
        let (mut sky, dense) = spd_banded(n, seed);
        sky.factorize().unwrap();

        let rhs: Vec<f64> = (0..n).map(|i| (i as f64) - 3.0).collect();
        let x_sky = sky.solve(&rhs).unwrap();

        let x_dense = dense
            .clone()
            .lu()
            .solve(&DVector::from_vec(rhs))
            .expect("dense solve");

        for i in 0..n {
            assert!(
                (x_sky[i] - x_dense[i]).abs() < 1e-10,
                "seed {seed} row {i}: {} vs {}",
                x_sky[i],
                x_dense[i]
            );
        }
    }
}

#[test]
fn general_unsymmetric_matches_dense_lu() {
    let n = 5;
    let structure = SkylineStructure::dense(n);
    let mut sky = SkylineMatrix::new(structure, false);
    let mut dense = DMatrix::zeros(n, n);

    // Diagonally dominant unsymmetric fill
    for i in 0..n {
        for j in 0..n {
            let v = if i == j {
                10.0 + i as f64
            } else {
                ((i * 7 + j * 3) % 5) as f64 * 0.3 - 0.6
            };
            if v != 0.0 {
                sky.add(i, j, v).unwrap();
                dense[(i, j)] = v;
            }
        }
    }

    sky.factorize().unwrap();
    let rhs = vec![1.0, -2.0, 0.5, 3.0, -1.5];
    let x_sky = sky.solve(&rhs).unwrap();
    let x_dense = dense.lu().solve(&DVector::from_vec(rhs)).unwrap();

    for i in 0..n {
        assert!((x_sky[i] - x_dense[i]).abs() < 1e-10);
    }
}

proptest! {
    #[test]
    fn round_trip_recovers_solution(seed in 1_u64..200, n in 2_usize..12) {
        let (mut sky, dense) = spd_banded(n, seed);
        sky.factorize().unwrap();

        // Pick a known x, form b = A x, solve and compare.
        let x_true: Vec<f64> = (0..n).map(|i| (i as f64 * 0.7) - 1.0).collect();
        let b = &dense * DVector::from_vec(x_true.clone());
        let x = sky.solve(b.as_slice()).unwrap();

        for i in 0..n {
            prop_assert!((x[i] - x_true[i]).abs() < 1e-9);
        }
    }
}
