use ndarray::{arr2, Array1, Array2, ArrayView2};

use crate::prelude::{NumericError, NumericResult};

const PIVOT_EPSILON: f64 = 1e-300;

pub struct MatrixHelper;

impl MatrixHelper {
    pub fn multiply(lhs: ArrayView2<f64>, rhs: ArrayView2<f64>) -> Array2<f64> {
        lhs.dot(&rhs)
    }

    /// Solve `A x = b` by Gaussian elimination with partial pivoting.
    pub fn solve(mut a: Array2<f64>, mut b: Array1<f64>) -> NumericResult<Array1<f64>> {
        let n = a.nrows();
        if a.ncols() != n || b.len() != n {
            return Err(NumericError::InvalidParameter(format!(
                "solve expects a square system, got {}x{} with rhs of {}",
                a.nrows(),
                a.ncols(),
                b.len()
            )));
        }

        for col in 0..n {
            let pivot_row = (col..n)
                .max_by(|&i, &j| a[[i, col]].abs().total_cmp(&a[[j, col]].abs()))
                .unwrap_or(col);
            if a[[pivot_row, col]].abs() < PIVOT_EPSILON {
                return Err(NumericError::Internal(format!(
                    "singular system at column {}",
                    col
                )));
            }
            if pivot_row != col {
                for k in 0..n {
                    a.swap([col, k], [pivot_row, k]);
                }
                b.swap(col, pivot_row);
            }

            for row in col + 1..n {
                let factor = a[[row, col]] / a[[col, col]];
                if factor == 0.0 {
                    continue;
                }
                for k in col..n {
                    a[[row, k]] -= factor * a[[col, k]];
                }
                b[row] -= factor * b[col];
            }
        }

        let mut x = Array1::<f64>::zeros(n);
        for row in (0..n).rev() {
            let tail: f64 = (row + 1..n).map(|k| a[[row, k]] * x[k]).sum();
            x[row] = (b[row] - tail) / a[[row, row]];
        }
        Ok(x)
    }

    /// Cross-product (skew-symmetric) matrix of a 3-vector.
    pub fn skew(k: [f64; 3]) -> Array2<f64> {
        arr2(&[
            [0.0, -k[2], k[1]],
            [k[2], 0.0, -k[0]],
            [-k[1], k[0], 0.0],
        ])
    }

    /// Rodrigues rotation matrix `I + sin(θ)K + (1 - cos θ)K²`.
    ///
    /// The axis is used as given; pass a unit vector for a proper rotation.
    pub fn rodrigues(axis: [f64; 3], angle: f64) -> Array2<f64> {
        let k = Self::skew(axis);
        let k2 = Self::multiply(k.view(), k.view());
        Array2::<f64>::eye(3) + k * angle.sin() + k2 * (1.0 - angle.cos())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, Array1};
    use std::f64::consts::FRAC_PI_2;

    fn close(lhs: f64, rhs: f64) -> bool {
        (lhs - rhs).abs() < 1e-12
    }

    #[test]
    fn solve_recovers_known_solution() {
        let a = arr2(&[[2.0, 1.0, -1.0], [-3.0, -1.0, 2.0], [-2.0, 1.0, 2.0]]);
        let b = arr1(&[8.0, -11.0, -3.0]);
        let x = MatrixHelper::solve(a, b).unwrap();
        assert!(close(x[0], 2.0));
        assert!(close(x[1], 3.0));
        assert!(close(x[2], -1.0));
    }

    #[test]
    fn solve_rejects_singular_system() {
        let a = arr2(&[[1.0, 2.0], [2.0, 4.0]]);
        let b = arr1(&[1.0, 2.0]);
        assert!(matches!(
            MatrixHelper::solve(a, b),
            Err(NumericError::Internal(_))
        ));
    }

    #[test]
    fn solve_rejects_mismatched_shapes() {
        let a = Array2::<f64>::eye(2);
        let b = Array1::<f64>::zeros(3);
        assert!(matches!(
            MatrixHelper::solve(a, b),
            Err(NumericError::InvalidParameter(_))
        ));
    }

    #[test]
    fn rodrigues_quarter_turn_about_z() {
        let r = MatrixHelper::rodrigues([0.0, 0.0, 1.0], FRAC_PI_2);
        let x_axis = arr1(&[1.0, 0.0, 0.0]);
        let rotated = r.dot(&x_axis);
        assert!(close(rotated[0], 0.0));
        assert!(close(rotated[1], 1.0));
        assert!(close(rotated[2], 0.0));
    }

    #[test]
    fn rodrigues_zero_angle_is_identity() {
        let r = MatrixHelper::rodrigues([0.3, -0.4, 0.5], 0.0);
        assert_eq!(r, Array2::<f64>::eye(3));
    }
}
