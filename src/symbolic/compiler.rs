//! Expression compiler: formula string -> validated callable function of `x`.
//!
//! The formula is tokenized, parsed into an [`Expr`] tree and sanity-checked by evaluating it
//! at the canonical test point x = 0. A NaN there rejects the formula; ±inf is accepted, so
//! `1/x` or `ln(x)` still compile. NaN or ±inf at any other point is a legitimate result of
//! calling the compiled function, not a compile error.
use crate::symbolic::symbolic_engine::Expr;
use log::{debug, info};
use std::fmt;

/// canonical test point of the compile-time sanity check
pub const TEST_POINT: f64 = 0.0;

/// Reasons a formula fails to compile
#[derive(Debug, Clone, PartialEq)]
pub enum CompileError {
    EmptyFormula,
    UnexpectedChar { ch: char, pos: usize },
    UnknownIdentifier { name: String, pos: usize },
    InvalidNumber { literal: String, pos: usize },
    UnexpectedToken { token: String, pos: usize },
    MissingClosingParen { pos: usize },
    UnexpectedEnd,
    TrailingInput { pos: usize },
    NotANumber { formula: String },
    /// brackets, signs or exponents nested deeper than the limit
    TooDeep { pos: usize, limit: usize },
    TooLong { tokens: usize, limit: usize },
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CompileError::EmptyFormula => write!(f, "Invalid expression: empty formula"),
            CompileError::UnexpectedChar { ch, pos } => {
                write!(f, "Invalid expression: unexpected character '{}' at {}", ch, pos)
            }
            CompileError::UnknownIdentifier { name, pos } => write!(
                f,
                "Invalid expression: unknown identifier '{}' at {} (use x, pi, e or func(...))",
                name, pos
            ),
            CompileError::InvalidNumber { literal, pos } => {
                write!(f, "Invalid expression: bad number '{}' at {}", literal, pos)
            }
            CompileError::UnexpectedToken { token, pos } => {
                write!(f, "Invalid expression: unexpected '{}' at {}", token, pos)
            }
            CompileError::MissingClosingParen { pos } => write!(
                f,
                "Invalid expression: missing ')' for '(' at {}",
                pos
            ),
            CompileError::UnexpectedEnd => {
                write!(f, "Invalid expression: formula ends unexpectedly")
            }
            CompileError::TrailingInput { pos } => {
                write!(f, "Invalid expression: unexpected input at {}", pos)
            }
            CompileError::TooDeep { pos, limit } => write!(
                f,
                "Invalid expression: nesting deeper than {} levels at {}",
                limit, pos
            ),
            CompileError::TooLong { tokens, limit } => write!(
                f,
                "Invalid expression: {} tokens, at most {} are allowed",
                tokens, limit
            ),
            CompileError::NotANumber { formula } => write!(
                f,
                "Invalid expression: '{}' evaluates to NaN at x = {}",
                formula, TEST_POINT
            ),
        }
    }
}

impl std::error::Error for CompileError {}

/// Compiled function of one variable.
///
/// Stateless: the tree is immutable, every call is a pure evaluation, so the function may be
/// cloned, shared between threads and invoked any number of times.
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledFunction {
    source: String,
    expr: Expr,
}

impl CompiledFunction {
    /// f(x)
    pub fn call(&self, x: f64) -> f64 {
        self.expr.eval(x)
    }

    /// the formula text the function was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn into_expr(self) -> Expr {
        self.expr
    }

    /// borrowing closure view, handy for APIs that take `Fn(f64) -> f64`
    pub fn as_fn(&self) -> impl Fn(f64) -> f64 + '_ {
        move |x| self.call(x)
    }

    /// evaluates the function on every point of the slice
    pub fn call_many(&self, x: &[f64]) -> Vec<f64> {
        self.expr.calc_vector_lambdified1D(x)
    }
}

impl fmt::Display for CompiledFunction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.expr)
    }
}

/// Compiles a formula in `x` into a callable function.
///
/// # Errors
/// `CompileError` if the text cannot be tokenized or parsed, or if the function is NaN at x = 0.
pub fn compile(formula: &str) -> Result<CompiledFunction, CompileError> {
    let expr = Expr::parse_expression(formula)?;
    debug!("formula '{}' parsed into {}", formula, expr);
    let test_value = expr.eval(TEST_POINT);
    if test_value.is_nan() {
        return Err(CompileError::NotANumber {
            formula: formula.to_string(),
        });
    }
    info!(
        "compiled '{}' ({} nodes), f({}) = {}",
        formula,
        expr.node_count(),
        TEST_POINT,
        test_value
    );
    Ok(CompiledFunction {
        source: formula.to_string(),
        expr,
    })
}
