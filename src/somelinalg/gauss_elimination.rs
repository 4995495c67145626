use crate::somelinalg::linear_sys_diagnostics::{
    LinearSystemError, PIVOT_TOLERANCE, check_system, singular,
};
use log::{debug, info};
use nalgebra::{DMatrix, DVector};

/// Snapshot of the augmented system [A | b] during forward elimination.
/// Stage 0 is the untouched system, stage k the system after column k-1 was eliminated.
#[derive(Debug, Clone, PartialEq)]
pub struct EliminationStage {
    pub stage: usize,
    /// row swapped into the pivot position at this stage, `None` for stage 0
    pub pivot_row: Option<usize>,
    pub matrix: DMatrix<f64>,
    pub rhs: DVector<f64>,
}

/// Gaussian elimination with partial pivoting.
///
/// Works on private copies, the caller's A and b are left untouched.
/// # Errors
/// `Dimension` if A is not square or b has the wrong length, `Singular` if a pivot column
/// has no entry above the pivot threshold.
/// # Example
/// ```
/// use nalgebra::{DMatrix, DVector};
/// use RustedNumMethods::somelinalg::gauss_elimination::solve_gauss;
/// let A = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 3.0]);
/// let b = DVector::from_vec(vec![3.0, 5.0]);
/// let x = solve_gauss(&A, &b).unwrap();
/// assert!((x[0] - 0.8).abs() < 1e-12 && (x[1] - 1.4).abs() < 1e-12);
/// ```
pub fn solve_gauss(A: &DMatrix<f64>, b: &DVector<f64>) -> Result<DVector<f64>, LinearSystemError> {
    let mut a = A.clone();
    let mut rhs = b.clone();
    forward_elimination(&mut a, &mut rhs, None)?;
    Ok(back_substitution(&a, &rhs))
}

/// same as [`solve_gauss`], and also returns the augmented system before elimination
/// and after every elimination stage
pub fn solve_gauss_with_stages(
    A: &DMatrix<f64>,
    b: &DVector<f64>,
) -> Result<(DVector<f64>, Vec<EliminationStage>), LinearSystemError> {
    let mut a = A.clone();
    let mut rhs = b.clone();
    let mut stages = Vec::new();
    forward_elimination(&mut a, &mut rhs, Some(&mut stages))?;
    Ok((back_substitution(&a, &rhs), stages))
}

/// reduces [a | rhs] in place to upper triangular form
fn forward_elimination(
    a: &mut DMatrix<f64>,
    rhs: &mut DVector<f64>,
    mut stages: Option<&mut Vec<EliminationStage>>,
) -> Result<(), LinearSystemError> {
    let n = check_system(a, rhs)?;
    info!("Gaussian elimination for a {}x{} system", n, n);
    if let Some(stages) = stages.as_mut() {
        stages.push(EliminationStage {
            stage: 0,
            pivot_row: None,
            matrix: a.clone(),
            rhs: rhs.clone(),
        });
    }
    for k in 0..n - 1 {
        // row with the largest |a[i][k]|, i >= k
        let p = a.view_range(k..n, k).icamax() + k;
        let pivot = a[(p, k)];
        if pivot.abs() < PIVOT_TOLERANCE || pivot.is_nan() {
            return Err(singular(k, pivot));
        }
        if p != k {
            debug!("stage {}: swapping rows {} and {}", k + 1, k, p);
            a.swap_rows(k, p);
            rhs.swap_rows(k, p);
        }
        for i in k + 1..n {
            let factor = a[(i, k)] / a[(k, k)];
            a[(i, k)] = 0.0;
            for j in k + 1..n {
                a[(i, j)] -= factor * a[(k, j)];
            }
            rhs[i] -= factor * rhs[k];
        }
        if let Some(stages) = stages.as_mut() {
            stages.push(EliminationStage {
                stage: k + 1,
                pivot_row: Some(p),
                matrix: a.clone(),
                rhs: rhs.clone(),
            });
        }
    }
    let last = a[(n - 1, n - 1)];
    if last.abs() < PIVOT_TOLERANCE || last.is_nan() {
        return Err(singular(n - 1, last));
    }
    Ok(())
}

/// x from an upper triangular system with a non-zero diagonal
fn back_substitution(u: &DMatrix<f64>, rhs: &DVector<f64>) -> DVector<f64> {
    let n = rhs.len();
    let mut x = DVector::zeros(n);
    for i in (0..n).rev() {
        let sum: f64 = (i + 1..n).map(|j| u[(i, j)] * x[j]).sum();
        x[i] = (rhs[i] - sum) / u[(i, i)];
    }
    x
}
