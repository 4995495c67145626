use log::warn;
use nalgebra::{DMatrix, DVector, stack};
use std::fmt;

/// pivot magnitudes below this value are treated as zero
pub const PIVOT_TOLERANCE: f64 = 1e-15;

/// Error types shared by the direct linear solvers
#[derive(Debug, Clone, PartialEq)]
pub enum LinearSystemError {
    /// matrix not square or empty, or right-hand side of the wrong length
    Dimension(String),
    /// no usable pivot at elimination stage `stage` (0-based); `pivot` is the best candidate found
    Singular { stage: usize, pivot: f64 },
}

impl fmt::Display for LinearSystemError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LinearSystemError::Dimension(msg) => write!(f, "Dimension mismatch: {}", msg),
            LinearSystemError::Singular { stage, pivot } => write!(
                f,
                "Matrix is singular or nearly singular: pivot {:e} at stage {}",
                pivot,
                stage + 1
            ),
        }
    }
}

impl std::error::Error for LinearSystemError {}

/// n for an n×n matrix, n ≥ 1
pub fn check_square(A: &DMatrix<f64>) -> Result<usize, LinearSystemError> {
    let (nrows, ncols) = A.shape();
    if nrows == 0 || ncols == 0 {
        return Err(LinearSystemError::Dimension("matrix is empty".to_string()));
    }
    if nrows != ncols {
        return Err(LinearSystemError::Dimension(format!(
            "matrix must be square, got {}x{}",
            nrows, ncols
        )));
    }
    Ok(nrows)
}

/// n for the system A·x = b with A n×n and b of length n
pub fn check_system(A: &DMatrix<f64>, b: &DVector<f64>) -> Result<usize, LinearSystemError> {
    let n = check_square(A)?;
    if b.len() != n {
        return Err(LinearSystemError::Dimension(format!(
            "right-hand side has {} entries, matrix is {}x{}",
            b.len(),
            n,
            n
        )));
    }
    Ok(n)
}

pub(crate) fn singular(stage: usize, pivot: f64) -> LinearSystemError {
    warn!(
        "Matrix is singular: pivot candidate {:e} at stage {} is below {:e}",
        pivot,
        stage + 1,
        PIVOT_TOLERANCE
    );
    LinearSystemError::Singular { stage, pivot }
}

/// what a singular system actually is, by the Rouché–Capelli theorem:
/// A·x = b has a solution if and only if rank(A) = rank([A b])
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingularSystemKind {
    /// rank(A) < rank([A b]): no solution
    Inconsistent { rank_A: usize, rank_Ab: usize },
    /// rank(A) = rank([A b]) < n: infinitely many solutions
    Underdetermined { rank_A: usize },
}

pub fn Rouche_Capelli_theorem(A: &DMatrix<f64>, b: &DVector<f64>) -> SingularSystemKind {
    let Ab: DMatrix<f64> = stack![A, b];
    let eps = 1e-10;
    let rank_A = A.rank(eps);
    let rank_Ab = Ab.rank(eps);
    if rank_A == rank_Ab {
        SingularSystemKind::Underdetermined { rank_A }
    } else {
        warn!(
            "The system has no solution. rank(A) = {} != rank([A b]) = {}",
            rank_A, rank_Ab
        );
        SingularSystemKind::Inconsistent { rank_A, rank_Ab }
    }
}

/// ratio of the largest to the smallest singular value; infinite for a singular matrix
pub fn condition_number(A: &DMatrix<f64>) -> f64 {
    let singular_values = A.singular_values();
    let max_sigma = singular_values.iter().cloned().fold(0.0, f64::max);
    let min_sigma = singular_values.iter().cloned().fold(f64::INFINITY, f64::min);
    if min_sigma == 0.0 {
        f64::INFINITY
    } else {
        max_sigma / min_sigma
    }
}

pub fn poorly_conditioned(A: &DMatrix<f64>, threshold: f64) -> bool {
    // the solution is sensitive to small changes of the data when cond(A) is large
    let condition_number = condition_number(A);
    let poorly_conditioned = condition_number > threshold;
    if poorly_conditioned {
        warn!(
            "The system of linear equations is poorly conditioned. Condition number = {:.2e}",
            condition_number
        );
    }
    poorly_conditioned
}

/// famous example of ill-conditioned matrix
pub fn hilbert_matrix(n: usize) -> DMatrix<f64> {
    DMatrix::from_fn(n, n, |i, j| 1.0 / (i as f64 + j as f64 + 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_system() {
        let A = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 3.0]);
        assert_eq!(check_system(&A, &DVector::from_vec(vec![3.0, 5.0])), Ok(2));
        assert!(matches!(
            check_system(&A, &DVector::from_vec(vec![3.0, 5.0, 1.0])),
            Err(LinearSystemError::Dimension(_))
        ));
        let rect = DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert!(matches!(
            check_square(&rect),
            Err(LinearSystemError::Dimension(_))
        ));
        assert!(check_square(&DMatrix::zeros(0, 0)).is_err());
    }

    #[test]
    fn test_Rouche_Capelli_theorem() {
        // example https://en.wikipedia.org/wiki/Rouché–Capelli_theorem
        let A = DMatrix::from_vec(3, 3, vec![1.0, 1.0, 2.0, 1.0, 1.0, 2.0, 2.0, 1.0, 2.0]);
        let b = DVector::from_vec(vec![3.0, 1.0, 5.0]);
        assert_eq!(
            Rouche_Capelli_theorem(&A, &b),
            SingularSystemKind::Inconsistent {
                rank_A: 2,
                rank_Ab: 3
            }
        );
        let A = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        let b = DVector::from_vec(vec![1.0, 2.0]);
        assert_eq!(
            Rouche_Capelli_theorem(&A, &b),
            SingularSystemKind::Underdetermined { rank_A: 1 }
        );
    }

    #[test]
    fn test_poorly_conditioned() {
        let A = DMatrix::from_vec(2, 2, vec![1.0, 1.0, 1.00001, 1.0]);
        assert!(poorly_conditioned(&A, 1e5));
        assert!(poorly_conditioned(&hilbert_matrix(6), 1e5));
        assert!(!poorly_conditioned(&DMatrix::identity(4, 4), 10.0));
    }

    #[test]
    fn test_condition_number() {
        let cond = condition_number(&DMatrix::from_diagonal(&DVector::from_vec(vec![4.0, 2.0, 1.0])));
        assert!((cond - 4.0).abs() < 1e-12);
        assert_eq!(condition_number(&DMatrix::zeros(2, 2)), f64::INFINITY);
    }

    #[test]
    fn test_error_display() {
        let err = LinearSystemError::Singular {
            stage: 1,
            pivot: 0.0,
        };
        assert!(err.to_string().contains("stage 2"));
    }
}
