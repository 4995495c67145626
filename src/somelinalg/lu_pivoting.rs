#![allow(non_snake_case)]
use crate::somelinalg::linear_sys_diagnostics::{
    LinearSystemError, PIVOT_TOLERANCE, check_square, check_system, singular,
};
use log::info;
use nalgebra::{DMatrix, DVector};

/// LU decomposition with partial (row) pivoting, P·A = L·U.
///
/// L is unit lower triangular, U upper triangular, P the permutation matrix built from
/// `piv`: row i of P·A is row `piv[i]` of A.
#[derive(Debug, Clone, PartialEq)]
pub struct LUFactors {
    p: DMatrix<f64>,
    l: DMatrix<f64>,
    u: DMatrix<f64>,
    piv: Vec<usize>,
}

impl LUFactors {
    pub fn p(&self) -> &DMatrix<f64> {
        &self.p
    }

    pub fn l(&self) -> &DMatrix<f64> {
        &self.l
    }

    pub fn u(&self) -> &DMatrix<f64> {
        &self.u
    }

    pub fn piv(&self) -> &[usize] {
        &self.piv
    }

    pub fn nrows(&self) -> usize {
        self.piv.len()
    }

    /// solves A·x = b with the stored factors
    pub fn solve(&self, b: &DVector<f64>) -> Result<DVector<f64>, LinearSystemError> {
        solve_LU(&self.p, &self.l, &self.u, b)
    }

    /// det(A) = sign(P)·Π U[i][i]
    pub fn determinant(&self) -> f64 {
        let mut sign = 1.0;
        let mut visited = vec![false; self.piv.len()];
        // every cycle of length m contributes m - 1 transpositions
        for start in 0..self.piv.len() {
            if visited[start] {
                continue;
            }
            let mut len = 0;
            let mut i = start;
            while !visited[i] {
                visited[i] = true;
                i = self.piv[i];
                len += 1;
            }
            if len % 2 == 0 {
                sign = -sign;
            }
        }
        sign * self.u.diagonal().product()
    }

    /// the product L·U, equal to P·A up to rounding
    pub fn reconstruct(&self) -> DMatrix<f64> {
        &self.l * &self.u
    }
}

/// permutation matrix with P[i][piv[i]] = 1
pub fn permutation_matrix(piv: &[usize]) -> DMatrix<f64> {
    let n = piv.len();
    let mut p = DMatrix::zeros(n, n);
    for (i, &j) in piv.iter().enumerate() {
        p[(i, j)] = 1.0;
    }
    p
}

/// Doolittle LU factorization with partial pivoting.
///
/// At stage k the pivot row is the one with the largest in-progress value
/// |A[i][k] - Σ_{t<k} L[i][t]·U[t][k]|, i ≥ k; these values are the candidates for U[k][k].
/// # Errors
/// `Dimension` for an empty or non-square matrix, `Singular` if the best candidate is below
/// the pivot threshold.
/// # Example
/// ```
/// use nalgebra::{DMatrix, DVector};
/// use RustedNumMethods::somelinalg::lu_pivoting::factorize_LU;
/// let A = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 3.0]);
/// let lu = factorize_LU(&A).unwrap();
/// let x = lu.solve(&DVector::from_vec(vec![3.0, 5.0])).unwrap();
/// assert!((x[0] - 0.8).abs() < 1e-12 && (x[1] - 1.4).abs() < 1e-12);
/// ```
pub fn factorize_LU(A: &DMatrix<f64>) -> Result<LUFactors, LinearSystemError> {
    let n = check_square(A)?;
    info!("LU factorization of a {}x{} matrix", n, n);
    let mut a = A.clone();
    let mut l: DMatrix<f64> = DMatrix::zeros(n, n);
    let mut u: DMatrix<f64> = DMatrix::zeros(n, n);
    let mut piv: Vec<usize> = (0..n).collect();

    for k in 0..n {
        let candidates = DVector::from_iterator(
            n - k,
            (k..n).map(|i| a[(i, k)] - (0..k).map(|t| l[(i, t)] * u[(t, k)]).sum::<f64>()),
        );
        let offset = candidates.icamax();
        let pivot = candidates[offset];
        if pivot.abs() < PIVOT_TOLERANCE || pivot.is_nan() {
            return Err(singular(k, pivot));
        }
        let p = k + offset;
        if p != k {
            a.swap_rows(k, p);
            piv.swap(k, p);
            // only the finished columns of L follow the swap
            l.columns_range_mut(0..k).swap_rows(k, p);
        }
        for j in k..n {
            let sum: f64 = (0..k).map(|t| l[(k, t)] * u[(t, j)]).sum();
            u[(k, j)] = a[(k, j)] - sum;
        }
        l[(k, k)] = 1.0;
        for i in k + 1..n {
            let sum: f64 = (0..k).map(|t| l[(i, t)] * u[(t, k)]).sum();
            l[(i, k)] = (a[(i, k)] - sum) / u[(k, k)];
        }
    }

    let p = permutation_matrix(&piv);
    info!("LU factorization done, row order {:?}", piv);
    Ok(LUFactors { p, l, u, piv })
}

/// Solves A·x = b from the factors of P·A = L·U:
/// L·y = P·b by forward substitution (unit diagonal), then U·x = y by back substitution.
pub fn solve_LU(
    p: &DMatrix<f64>,
    l: &DMatrix<f64>,
    u: &DMatrix<f64>,
    b: &DVector<f64>,
) -> Result<DVector<f64>, LinearSystemError> {
    let n = check_system(u, b)?;
    if p.shape() != (n, n) || l.shape() != (n, n) {
        return Err(LinearSystemError::Dimension(format!(
            "factors must all be {}x{}, got P {:?}, L {:?}",
            n,
            n,
            p.shape(),
            l.shape()
        )));
    }
    let pb = p * b;
    let mut y = DVector::zeros(n);
    for i in 0..n {
        let sum: f64 = (0..i).map(|j| l[(i, j)] * y[j]).sum();
        y[i] = pb[i] - sum;
    }
    let mut x = DVector::zeros(n);
    for i in (0..n).rev() {
        let diag = u[(i, i)];
        if diag.abs() < PIVOT_TOLERANCE || diag.is_nan() {
            return Err(singular(i, diag));
        }
        let sum: f64 = (i + 1..n).map(|j| u[(i, j)] * x[j]).sum();
        x[i] = (y[i] - sum) / diag;
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_relative_eq, relative_eq};

    #[test]
    fn test_factors_shape() {
        let A = DMatrix::from_row_slice(3, 3, &[1.0, 1.0, 1.0, 2.0, 3.0, 1.0, 4.0, 1.0, 2.0]);
        let lu = factorize_LU(&A).unwrap();
        let (l, u) = (lu.l(), lu.u());
        for i in 0..3 {
            assert_eq!(l[(i, i)], 1.0);
            for j in i + 1..3 {
                assert_eq!(l[(i, j)], 0.0);
                assert_eq!(u[(j, i)], 0.0);
            }
        }
        assert!(relative_eq!(lu.p() * &A, lu.reconstruct(), epsilon = 1e-12));
        // largest |a[i][0]| is in row 2
        assert_eq!(lu.piv()[0], 2);
        assert_eq!(lu.nrows(), 3);
    }

    #[test]
    fn test_permutation_matrix() {
        let p = permutation_matrix(&[2, 0, 1]);
        let expected = DMatrix::from_row_slice(3, 3, &[0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
        assert_eq!(p, expected);
    }

    #[test]
    fn test_solve() {
        let A = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 3.0]);
        let b = DVector::from_vec(vec![3.0, 5.0]);
        let lu = factorize_LU(&A).unwrap();
        let x = lu.solve(&b).unwrap();
        assert_relative_eq!(x, DVector::from_vec(vec![0.8, 1.4]), epsilon = 1e-12);
        let x2 = solve_LU(lu.p(), lu.l(), lu.u(), &b).unwrap();
        assert_eq!(x, x2);
    }

    #[test]
    fn test_zero_leading_entry() {
        let A = DMatrix::from_row_slice(3, 3, &[0.0, 2.0, 1.0, 1.0, 1.0, 1.0, 2.0, 1.0, 0.0]);
        let b = DVector::from_vec(vec![5.0, 4.0, 4.0]);
        let x = factorize_LU(&A).unwrap().solve(&b).unwrap();
        assert_relative_eq!(x, DVector::from_vec(vec![1.0, 2.0, 1.0]), epsilon = 1e-12);
    }

    #[test]
    fn test_singular() {
        let A = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        assert!(matches!(
            factorize_LU(&A),
            Err(LinearSystemError::Singular { stage: 1, .. })
        ));
        // first two rows proportional, the last pivot cancels exactly
        let A = DMatrix::from_row_slice(3, 3, &[1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 1.0, 0.0, 1.0]);
        assert!(matches!(
            factorize_LU(&A),
            Err(LinearSystemError::Singular { stage: 2, .. })
        ));
    }

    #[test]
    fn test_dimension_errors() {
        let A = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 3.0]);
        let lu = factorize_LU(&A).unwrap();
        assert!(matches!(
            lu.solve(&DVector::from_vec(vec![1.0, 2.0, 3.0])),
            Err(LinearSystemError::Dimension(_))
        ));
        let p3 = DMatrix::<f64>::identity(3, 3);
        assert!(matches!(
            solve_LU(&p3, lu.l(), lu.u(), &DVector::from_vec(vec![1.0, 2.0])),
            Err(LinearSystemError::Dimension(_))
        ));
        assert!(matches!(
            factorize_LU(&DMatrix::zeros(2, 3)),
            Err(LinearSystemError::Dimension(_))
        ));
    }

    #[test]
    fn test_determinant() {
        let A = DMatrix::from_row_slice(3, 3, &[0.0, 2.0, 1.0, 1.0, 1.0, 1.0, 2.0, 1.0, 0.0]);
        let lu = factorize_LU(&A).unwrap();
        assert_relative_eq!(lu.determinant(), A.determinant(), epsilon = 1e-12);
        let B = DMatrix::from_row_slice(2, 2, &[0.0, 1.0, 1.0, 0.0]);
        assert_relative_eq!(factorize_LU(&B).unwrap().determinant(), -1.0);
    }
}
