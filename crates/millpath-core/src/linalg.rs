//! Dense linear algebra primitives.
//!
//! [`Matrix`] wraps a heap-allocated `nalgebra::DMatrix<f64>` so that every
//! shape check happens up front and is reported as
//! [`NumericError::DimensionMismatch`] instead of a panic inside nalgebra.
//! All operations return fresh values; inputs are never mutated.
//!
//! Inversion and linear solves use explicit Gauss-Jordan / Gaussian
//! elimination with partial pivoting. The Riccati and Kalman consumers rely
//! on the pivot check to fail loudly on near-singular systems.

use crate::constants::{NORMALIZE_EPSILON, PIVOT_EPSILON};
use crate::error::{NumericError, Result};
use nalgebra::{DMatrix, DVector, Vector3};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Rectangular, non-empty dense matrix of `f64`
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: DMatrix<f64>,
}

impl Matrix {
    /// Builds a matrix from row vectors.
    ///
    /// Fails when `rows` is empty, a row is empty, or the rows differ in length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if rows.is_empty() || cols == 0 {
            return Err(NumericError::dimension(
                "from_rows",
                "non-empty matrix",
                format!("{}x{}", rows.len(), cols),
            ));
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(NumericError::dimension(
                "from_rows",
                format!("{cols} columns"),
                format!("{} columns in row {i}", row.len()),
            ));
        }
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        Ok(Self {
            data: DMatrix::from_row_slice(rows.len(), cols, &flat),
        })
    }

    /// Builds a `rows x cols` matrix from row-major data.
    pub fn from_row_slice(rows: usize, cols: usize, data: &[f64]) -> Result<Self> {
        if rows == 0 || cols == 0 || data.len() != rows * cols {
            return Err(NumericError::dimension(
                "from_row_slice",
                format!("{} values for {rows}x{cols}", rows * cols),
                format!("{} values", data.len()),
            ));
        }
        Ok(Self {
            data: DMatrix::from_row_slice(rows, cols, data),
        })
    }

    /// A `rows x cols` matrix of zeros.
    ///
    /// Fails when either dimension is zero.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        require_non_empty("zeros", rows, cols)?;
        Ok(Self {
            data: DMatrix::zeros(rows, cols),
        })
    }

    /// The `n x n` identity; fails for `n == 0`.
    pub fn identity(n: usize) -> Result<Self> {
        require_non_empty("identity", n, n)?;
        Ok(Self {
            data: DMatrix::identity(n, n),
        })
    }

    /// Square matrix with `values` on the diagonal.
    pub fn diagonal(values: &[f64]) -> Result<Self> {
        require_non_empty("diagonal", values.len(), values.len())?;
        Ok(Self {
            data: DMatrix::from_diagonal(&DVector::from_column_slice(values)),
        })
    }

    /// Single-column matrix holding `values`.
    pub fn column(values: &[f64]) -> Result<Self> {
        require_non_empty("column", values.len(), 1)?;
        Ok(Self {
            data: DMatrix::from_column_slice(values.len(), 1, values),
        })
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    pub fn is_square(&self) -> bool {
        self.rows() == self.cols()
    }

    /// Shape as `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        self.data.shape()
    }

    /// Copies row `r` out as a vector.
    pub fn row(&self, r: usize) -> Vec<f64> {
        self.data.row(r).iter().copied().collect()
    }

    /// Copies the matrix out as row vectors.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.rows()).map(|r| self.row(r)).collect()
    }

    /// Borrow the underlying nalgebra storage.
    pub fn as_dmatrix(&self) -> &DMatrix<f64> {
        &self.data
    }

    fn shape_label(&self) -> String {
        format!("{}x{}", self.rows(), self.cols())
    }
}

fn require_non_empty(operation: &'static str, rows: usize, cols: usize) -> Result<()> {
    if rows == 0 || cols == 0 {
        return Err(NumericError::dimension(
            operation,
            "non-empty matrix",
            format!("{rows}x{cols}"),
        ));
    }
    Ok(())
}

impl From<DMatrix<f64>> for Matrix {
    fn from(data: DMatrix<f64>) -> Self {
        Self { data }
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &f64 {
        &self.data[index]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut f64 {
        &mut self.data[index]
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows() {
            let row: Vec<String> = self.row(r).iter().map(|v| format!("{v:.6}")).collect();
            writeln!(f, "[{}]", row.join(", "))?;
        }
        Ok(())
    }
}

/// `A * B`; requires `A.cols == B.rows`.
pub fn mat_mul(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    if a.cols() != b.rows() {
        return Err(NumericError::dimension(
            "mat_mul",
            format!("{} rows in right operand", a.cols()),
            b.shape_label(),
        ));
    }
    Ok(Matrix::from(&a.data * &b.data))
}

/// `A * x` for a column vector `x`.
pub fn mat_vec(a: &Matrix, x: &[f64]) -> Result<Vec<f64>> {
    if a.cols() != x.len() {
        return Err(NumericError::dimension(
            "mat_vec",
            format!("vector of length {}", a.cols()),
            format!("length {}", x.len()),
        ));
    }
    let product = &a.data * DVector::from_column_slice(x);
    Ok(product.iter().copied().collect())
}

pub fn transpose(a: &Matrix) -> Matrix {
    Matrix::from(a.data.transpose())
}

pub fn identity(n: usize) -> Result<Matrix> {
    Matrix::identity(n)
}

/// Elementwise `A + B`.
pub fn add(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    if a.shape() != b.shape() {
        return Err(NumericError::dimension("add", a.shape_label(), b.shape_label()));
    }
    Ok(Matrix::from(&a.data + &b.data))
}

/// Elementwise `A - B`.
pub fn sub(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    if a.shape() != b.shape() {
        return Err(NumericError::dimension("sub", a.shape_label(), b.shape_label()));
    }
    Ok(Matrix::from(&a.data - &b.data))
}

pub fn scale(a: &Matrix, factor: f64) -> Matrix {
    Matrix::from(a.data.map(|v| v * factor))
}

/// Inverse by Gauss-Jordan elimination with partial pivoting.
///
/// In each column the row with the largest absolute value is swapped into
/// the pivot position; a pivot below [`PIVOT_EPSILON`] yields
/// [`NumericError::SingularMatrix`].
pub fn invert(a: &Matrix) -> Result<Matrix> {
    if !a.is_square() {
        return Err(NumericError::dimension(
            "invert",
            "square matrix",
            a.shape_label(),
        ));
    }

    let n = a.rows();
    let mut work = a.data.clone();
    let mut inverse = DMatrix::<f64>::identity(n, n);

    for col in 0..n {
        let (pivot_row, pivot_abs) = select_pivot(&work, col);
        if pivot_abs < PIVOT_EPSILON {
            return Err(NumericError::SingularMatrix {
                column: col,
                pivot: pivot_abs,
                epsilon: PIVOT_EPSILON,
            });
        }
        if pivot_row != col {
            work.swap_rows(col, pivot_row);
            inverse.swap_rows(col, pivot_row);
        }

        let pivot = work[(col, col)];
        for j in 0..n {
            work[(col, j)] /= pivot;
            inverse[(col, j)] /= pivot;
        }

        for r in 0..n {
            if r == col {
                continue;
            }
            let factor = work[(r, col)];
            if factor == 0.0 {
                continue;
            }
            for j in 0..n {
                let w = work[(col, j)];
                let v = inverse[(col, j)];
                work[(r, j)] -= factor * w;
                inverse[(r, j)] -= factor * v;
            }
        }
    }

    Ok(Matrix::from(inverse))
}

/// Solves `A x = b` by Gaussian elimination with partial pivoting.
///
/// Works on a local copy; shares the singular-pivot rule with [`invert`].
pub fn solve(a: &Matrix, b: &[f64]) -> Result<Vec<f64>> {
    if !a.is_square() {
        return Err(NumericError::dimension("solve", "square matrix", a.shape_label()));
    }
    let n = a.rows();
    if b.len() != n {
        return Err(NumericError::dimension(
            "solve",
            format!("right-hand side of length {n}"),
            format!("length {}", b.len()),
        ));
    }

    let mut work = a.data.clone();
    let mut rhs = b.to_vec();

    for col in 0..n {
        let (pivot_row, pivot_abs) = select_pivot(&work, col);
        if pivot_abs < PIVOT_EPSILON {
            return Err(NumericError::SingularMatrix {
                column: col,
                pivot: pivot_abs,
                epsilon: PIVOT_EPSILON,
            });
        }
        if pivot_row != col {
            work.swap_rows(col, pivot_row);
            rhs.swap(col, pivot_row);
        }
        for r in (col + 1)..n {
            let factor = work[(r, col)] / work[(col, col)];
            if factor == 0.0 {
                continue;
            }
            for j in col..n {
                let w = work[(col, j)];
                work[(r, j)] -= factor * w;
            }
            rhs[r] -= factor * rhs[col];
        }
    }

    let mut x = vec![0.0; n];
    for r in (0..n).rev() {
        let tail: f64 = ((r + 1)..n).map(|j| work[(r, j)] * x[j]).sum();
        x[r] = (rhs[r] - tail) / work[(r, r)];
    }
    Ok(x)
}

fn select_pivot(work: &DMatrix<f64>, col: usize) -> (usize, f64) {
    (col..work.nrows())
        .map(|r| (r, work[(r, col)].abs()))
        .fold((col, f64::NEG_INFINITY), |best, candidate| {
            if candidate.1 > best.1 {
                candidate
            } else {
                best
            }
        })
}

pub fn dot(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(NumericError::dimension(
            "dot",
            format!("length {}", a.len()),
            format!("length {}", b.len()),
        ));
    }
    Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
}

/// Cross product; both operands must be 3-vectors.
pub fn cross(a: &[f64], b: &[f64]) -> Result<[f64; 3]> {
    if a.len() != 3 || b.len() != 3 {
        return Err(NumericError::dimension(
            "cross",
            "two 3-vectors",
            format!("lengths {} and {}", a.len(), b.len()),
        ));
    }
    let c = Vector3::new(a[0], a[1], a[2]).cross(&Vector3::new(b[0], b[1], b[2]));
    Ok([c.x, c.y, c.z])
}

/// Euclidean norm.
pub fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Unit vector in the direction of `v`, or the zero vector when `v` is
/// shorter than [`NORMALIZE_EPSILON`].
pub fn normalize(v: &[f64]) -> Vec<f64> {
    let n = norm(v);
    if n < NORMALIZE_EPSILON {
        return vec![0.0; v.len()];
    }
    v.iter().map(|x| x / n).collect()
}

/// Sum of absolute elementwise differences.
pub fn sum_abs_diff(a: &Matrix, b: &Matrix) -> Result<f64> {
    if a.shape() != b.shape() {
        return Err(NumericError::dimension(
            "sum_abs_diff",
            a.shape_label(),
            b.shape_label(),
        ));
    }
    Ok((&a.data - &b.data).iter().map(|v| v.abs()).sum())
}

/// Largest absolute elementwise difference.
pub fn max_abs_diff(a: &Matrix, b: &Matrix) -> Result<f64> {
    if a.shape() != b.shape() {
        return Err(NumericError::dimension(
            "max_abs_diff",
            a.shape_label(),
            b.shape_label(),
        ));
    }
    Ok((&a.data - &b.data).iter().fold(0.0_f64, |m, v| m.max(v.abs())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: &[&[f64]]) -> Matrix {
        Matrix::from_rows(&rows.iter().map(|r| r.to_vec()).collect::<Vec<_>>()).unwrap()
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let err = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, NumericError::DimensionMismatch { .. }));
        assert!(Matrix::from_rows(&[]).is_err());
    }

    #[test]
    fn test_constructors_reject_empty_shapes() {
        for result in [
            Matrix::zeros(0, 3),
            Matrix::zeros(2, 0),
            Matrix::identity(0),
            Matrix::diagonal(&[]),
            Matrix::column(&[]),
            identity(0),
        ] {
            assert!(matches!(result, Err(NumericError::DimensionMismatch { .. })));
        }
        assert_eq!(Matrix::zeros(2, 3).unwrap().shape(), (2, 3));
        assert_eq!(Matrix::diagonal(&[1.0, 2.0]).unwrap()[(1, 1)], 2.0);
        assert_eq!(Matrix::column(&[4.0, 5.0]).unwrap().shape(), (2, 1));
    }

    #[test]
    fn test_mat_mul_known_product() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let b = m(&[&[5.0, 6.0], &[7.0, 8.0]]);
        let c = mat_mul(&a, &b).unwrap();
        assert_eq!(c.to_rows(), vec![vec![19.0, 22.0], vec![43.0, 50.0]]);
    }

    #[test]
    fn test_mat_mul_dimension_mismatch() {
        let a = m(&[&[1.0, 2.0, 3.0]]);
        let b = m(&[&[1.0, 2.0]]);
        assert!(matches!(
            mat_mul(&a, &b),
            Err(NumericError::DimensionMismatch { operation: "mat_mul", .. })
        ));
    }

    #[test]
    fn test_transpose_swaps_shape() {
        let a = m(&[&[1.0, 2.0, 3.0]]);
        let t = transpose(&a);
        assert_eq!(t.shape(), (3, 1));
        assert_eq!(t[(2, 0)], 3.0);
    }

    #[test]
    fn test_invert_requires_pivoting() {
        // Zero in the leading position forces a row swap.
        let a = m(&[&[0.0, 1.0], &[2.0, 3.0]]);
        let inv = invert(&a).unwrap();
        let product = mat_mul(&a, &inv).unwrap();
        assert!(max_abs_diff(&product, &identity(2).unwrap()).unwrap() < 1e-12);
    }

    #[test]
    fn test_invert_singular() {
        let a = m(&[&[1.0, 2.0], &[2.0, 4.0]]);
        assert!(matches!(
            invert(&a),
            Err(NumericError::SingularMatrix { column: 1, .. })
        ));
    }

    #[test]
    fn test_invert_non_square() {
        let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        assert!(matches!(
            invert(&a),
            Err(NumericError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_solve_three_by_three() {
        let a = m(&[&[2.0, 1.0, -1.0], &[-3.0, -1.0, 2.0], &[-2.0, 1.0, 2.0]]);
        let x = solve(&a, &[8.0, -11.0, -3.0]).unwrap();
        for (got, want) in x.iter().zip([2.0, 3.0, -1.0]) {
            assert!((got - want).abs() < 1e-12);
        }
    }

    #[test]
    fn test_cross_and_normalize() {
        assert_eq!(
            cross(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]).unwrap(),
            [0.0, 0.0, 1.0]
        );
        assert!(cross(&[1.0, 0.0], &[0.0, 1.0]).is_err());
        assert_eq!(normalize(&[0.0, 0.0, 0.0]), vec![0.0, 0.0, 0.0]);
        assert_eq!(normalize(&[3.0, 4.0]), vec![0.6, 0.8]);
    }

    #[test]
    fn test_dot_mismatch() {
        assert_eq!(dot(&[1.0, 2.0], &[3.0, 4.0]).unwrap(), 11.0);
        assert!(dot(&[1.0], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_mat_vec() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        assert_eq!(mat_vec(&a, &[1.0, 1.0]).unwrap(), vec![3.0, 7.0]);
        assert!(mat_vec(&a, &[1.0]).is_err());
    }
}
