//! root finding for real functions of one variable
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
///____________________________________________________________________________________________________________________________
/// # Bisection method
/// root of f(x) = 0 on an interval [a, b] with f(a)·f(b) < 0, together with the trace of every iteration
///# Example
/// ```
/// use RustedNumMethods::symbolic::compiler::compile;
/// use RustedNumMethods::numerical::bisection::bisect;
/// let f = compile("x^3 - 9x + 4").unwrap();
/// let result = bisect(&f, 0.0, 1.0, 1e-6, 100).unwrap();
/// for record in &result.trace {
///     println!("{} [{}, {}] m = {} f(m) = {}", record.index, record.left, record.right, record.midpoint, record.value);
/// }
/// assert!(result.residual.abs() < 1e-5);
/// ```
pub mod bisection;
///____________________________________________________________________________________________________________________________
/// # Root scanner
/// finds all roots on a wide interval: grid sampling, exact grid roots and bisection of every sign-change cell
///# Example
/// ```
/// use RustedNumMethods::symbolic::compiler::compile;
/// use RustedNumMethods::numerical::root_scan::{scan_roots, ScanConfig};
/// let f = compile("x^2 - 4").unwrap();
/// let roots = scan_roots(&f, &ScanConfig::default()).unwrap();
/// assert_eq!(roots.len(), 2);
/// ```
pub mod root_scan;
