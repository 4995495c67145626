//! direct solvers for small dense linear systems A·x = b
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// Gaussian elimination with partial pivoting, optionally recording every elimination stage
pub mod gauss_elimination;
/// LU factorization P·A = L·U (Doolittle, partial pivoting) and the triangular solves
pub mod lu_pivoting;
/// diagnostics for linear systems and matrices: shape checks, singular pivots,
/// rank analysis of singular systems, condition number
pub mod linear_sys_diagnostics;
