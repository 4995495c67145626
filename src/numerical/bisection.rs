//! Root of a real function of one variable by interval bisection.
//!
//! The interval [a, b] must bracket a sign change: f(a) and f(b) finite with f(a)·f(b) < 0.
//! Every iteration halves the bracket and is recorded in the trace, so the caller can
//! print the whole history of the search.
use crate::symbolic::compiler::CompiledFunction;
use log::{debug, info, warn};
use std::fmt;

/// Error types for the bisection method
#[derive(Debug, Clone, PartialEq)]
pub enum RootFindingError {
    /// f(a) or f(b) is NaN or infinite
    Domain { a: f64, fa: f64, b: f64, fb: f64 },
    /// f(a)·f(b) is not strictly negative
    Interval { fa: f64, fb: f64 },
    InvalidInput(String),
}

impl fmt::Display for RootFindingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RootFindingError::Domain { a, fa, b, fb } => write!(
                f,
                "Function is undefined at the interval endpoints: f({}) = {}, f({}) = {}",
                a, fa, b, fb
            ),
            RootFindingError::Interval { fa, fb } => write!(
                f,
                "Invalid interval for bisection method: f(a) = {} and f(b) = {} must have opposite signs",
                fa, fb
            ),
            RootFindingError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for RootFindingError {}

/// Trait for representing a nonlinear equation f(x) = 0
pub trait NonlinearFunction {
    /// Evaluate the function at point x
    fn evaluate(&self, x: f64) -> f64;

    /// Get function name for debugging/logging
    fn name(&self) -> &str {
        "unnamed_function"
    }
}

/// Simple function wrapper for closures
pub struct ClosureFunction<F>
where
    F: Fn(f64) -> f64,
{
    func: F,
    name: String,
}

impl<F> ClosureFunction<F>
where
    F: Fn(f64) -> f64,
{
    pub fn new(func: F, name: &str) -> Self {
        Self {
            func,
            name: name.to_string(),
        }
    }
}

impl<F> NonlinearFunction for ClosureFunction<F>
where
    F: Fn(f64) -> f64,
{
    fn evaluate(&self, x: f64) -> f64 {
        (self.func)(x)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl NonlinearFunction for CompiledFunction {
    fn evaluate(&self, x: f64) -> f64 {
        self.call(x)
    }

    fn name(&self) -> &str {
        self.source()
    }
}

/// one step of the search: the bracket it started from, its midpoint and f(midpoint)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationRecord {
    /// 1-based
    pub index: usize,
    pub left: f64,
    pub right: f64,
    pub midpoint: f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BisectionResult {
    pub trace: Vec<IterationRecord>,
    pub root: f64,
    /// f(root)
    pub residual: f64,
    /// false when the iteration budget ran out before the tolerance was met
    pub converged: bool,
}

impl BisectionResult {
    pub fn iterations(&self) -> usize {
        self.trace.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BisectionConfig {
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for BisectionConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 100,
        }
    }
}

impl BisectionConfig {
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    pub fn validate(&self) -> Result<(), RootFindingError> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(RootFindingError::InvalidInput(format!(
                "tolerance must be a positive number, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(RootFindingError::InvalidInput(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// bisection with the settings taken from a config
pub fn bisect_with_config<F>(
    function: &F,
    a: f64,
    b: f64,
    config: &BisectionConfig,
) -> Result<BisectionResult, RootFindingError>
where
    F: NonlinearFunction + ?Sized,
{
    bisect(function, a, b, config.tolerance, config.max_iterations)
}

/// Bisection method.
///
/// Stops as soon as |f(m)| < tolerance or the half-width of the bracket drops below tolerance.
/// Running out of iterations is not an error: the last midpoint is returned with
/// `converged == false`. `a > b` is allowed.
/// # Example
/// ```
/// use RustedNumMethods::numerical::bisection::{bisect, ClosureFunction};
/// let f = ClosureFunction::new(|x: f64| x * x - 2.0, "x^2 - 2");
/// let result = bisect(&f, 0.0, 2.0, 1e-6, 100).unwrap();
/// assert!((result.root - 2f64.sqrt()).abs() < 1e-5);
/// assert!(result.converged);
/// ```
pub fn bisect<F>(
    function: &F,
    a: f64,
    b: f64,
    tolerance: f64,
    max_iterations: usize,
) -> Result<BisectionResult, RootFindingError>
where
    F: NonlinearFunction + ?Sized,
{
    BisectionConfig::new(tolerance, max_iterations).validate()?;
    if !a.is_finite() || !b.is_finite() {
        return Err(RootFindingError::InvalidInput(format!(
            "interval endpoints must be finite numbers, got [{}, {}]",
            a, b
        )));
    }
    if a == b {
        return Err(RootFindingError::InvalidInput(format!(
            "interval endpoints must differ, got [{}, {}]",
            a, b
        )));
    }

    let fa = function.evaluate(a);
    let fb = function.evaluate(b);
    if !fa.is_finite() || !fb.is_finite() {
        return Err(RootFindingError::Domain { a, fa, b, fb });
    }
    // strictly opposite signs, a root exactly at an endpoint is not a bracket
    if fa * fb >= 0.0 {
        return Err(RootFindingError::Interval { fa, fb });
    }
    info!(
        "bisection for {} on [{}, {}], tolerance {}, max iterations {}",
        function.name(),
        a,
        b,
        tolerance,
        max_iterations
    );

    let (mut left, mut right, mut f_left) = (a, b, fa);
    let mut trace = Vec::with_capacity(max_iterations.min(128));
    let mut root = (a + b) / 2.0;
    let mut residual = f64::NAN;
    let mut converged = false;
    for index in 1..=max_iterations {
        let midpoint = (left + right) / 2.0;
        let value = function.evaluate(midpoint);
        trace.push(IterationRecord {
            index,
            left,
            right,
            midpoint,
            value,
        });
        debug!(
            "iteration {}: [{}, {}], m = {}, f(m) = {}",
            index, left, right, midpoint, value
        );
        root = midpoint;
        residual = value;
        if value.abs() < tolerance || (right - left).abs() / 2.0 < tolerance {
            converged = true;
            break;
        }
        if f_left * value < 0.0 {
            right = midpoint;
        } else {
            left = midpoint;
            f_left = value;
        }
    }

    if converged {
        info!(
            "bisection converged after {} iterations: x = {}, f(x) = {}",
            trace.len(),
            root,
            residual
        );
    } else {
        warn!(
            "bisection stopped after {} iterations without reaching tolerance {}: x = {}, f(x) = {}",
            trace.len(),
            tolerance,
            root,
            residual
        );
    }
    Ok(BisectionResult {
        trace,
        root,
        residual,
        converged,
    })
}
