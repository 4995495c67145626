//! # Symbolic Engine Module
//!
//! Expression tree for real functions of a single variable `x`. The tree is the compiled form of
//! a formula string: the parser in [`crate::symbolic::parse_expr`] builds it and the
//! [`crate::symbolic::compiler`] wraps it into a callable function.
//!
//! ## Main Structures and Methods
//!
//! ### `Expr` Enum
//! The closed node set of the engine:
//! - **Variable**: `Var` - the single free variable `x`
//! - **Constants**: `Const(f64)` - numerical constants (pi and e are stored by value)
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div`, `Pow` - binary arithmetic
//! - **Functions**: `Func(MathFunction, _)` - unary math functions
//!
//! ### Key Methods
//! - `eval(x)` - tree-walking evaluation
//! - `lambdify1D()` - convert to a boxed Rust closure
//! - `sym_to_str()` - human-readable string with the variable name
//!
//! Evaluation follows IEEE-754 semantics: domain errors (sqrt of a negative number, ln of zero,
//! division by zero) produce NaN or ±inf instead of failing.

#![allow(non_camel_case_types)]

use std::f64::consts::{E, PI};
use std::fmt;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// name of the single free variable of a formula
pub const VARIABLE: char = 'x';

/// Unary math functions recognised in formulas.
///
/// `ln` and `log` are synonyms, both mean the natural logarithm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum MathFunction {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sqrt,
    Abs,
    Exp,
    #[strum(to_string = "ln", serialize = "log")]
    Ln,
    Log10,
    Sign,
    Floor,
    Ceil,
}

impl MathFunction {
    /// every spelling accepted in a formula for this function
    pub fn spellings(self) -> Vec<&'static str> {
        match self {
            MathFunction::Ln => vec!["ln", "log"],
            other => vec![other.into()],
        }
    }

    pub fn apply(self, arg: f64) -> f64 {
        match self {
            MathFunction::Sin => arg.sin(),
            MathFunction::Cos => arg.cos(),
            MathFunction::Tan => arg.tan(),
            MathFunction::Asin => arg.asin(),
            MathFunction::Acos => arg.acos(),
            MathFunction::Atan => arg.atan(),
            MathFunction::Sqrt => arg.sqrt(),
            MathFunction::Abs => arg.abs(),
            MathFunction::Exp => arg.exp(),
            MathFunction::Ln => arg.ln(),
            MathFunction::Log10 => arg.log10(),
            // f64::signum(0.0) is 1.0, sign of zero must stay zero
            MathFunction::Sign => {
                if arg > 0.0 {
                    1.0
                } else if arg < 0.0 {
                    -1.0
                } else {
                    arg
                }
            }
            MathFunction::Floor => arg.floor(),
            MathFunction::Ceil => arg.ceil(),
        }
    }
}

/// Named constants that may appear in a formula.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum MathConstant {
    Pi,
    E,
}

impl MathConstant {
    pub fn value(self) -> f64 {
        match self {
            MathConstant::Pi => PI,
            MathConstant::E => E,
        }
    }
}

/// Core symbolic expression enum representing a function of `x` as an abstract syntax tree.
///
/// # Examples
/// ```rust, ignore
/// use symbolic_engine::Expr;
/// let expr = Expr::Add(Box::new(Expr::Var), Box::new(Expr::Const(2.0)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// the free variable `x`
    Var,
    /// Numerical constant value
    Const(f64),
    /// Addition operation: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction operation: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication operation: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division operation: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
    /// unary math function applied to an argument
    Func(MathFunction, Box<Expr>),
}

/// Converts expressions to human-readable notation, fully parenthesised.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Var => write!(f, "{}", VARIABLE),
            Expr::Const(val) => write!(f, "{}", val),
            Expr::Add(lhs, rhs) => write!(f, "({} + {})", lhs, rhs),
            Expr::Sub(lhs, rhs) => write!(f, "({} - {})", lhs, rhs),
            Expr::Mul(lhs, rhs) => write!(f, "({} * {})", lhs, rhs),
            Expr::Div(lhs, rhs) => write!(f, "({} / {})", lhs, rhs),
            Expr::Pow(base, exp) => write!(f, "({} ^ {})", base, exp),
            Expr::Func(func, arg) => write!(f, "{}({})", func, arg),
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(self))
    }
}

impl Expr {
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    pub fn pow(self, exponent: Expr) -> Expr {
        Expr::Pow(self.boxed(), exponent.boxed())
    }

    pub fn func(func: MathFunction, arg: Expr) -> Expr {
        Expr::Func(func, arg.boxed())
    }

    /// Evaluates the tree with the variable bound to `x`.
    pub fn eval(&self, x: f64) -> f64 {
        match self {
            Expr::Var => x,
            Expr::Const(val) => *val,
            Expr::Add(lhs, rhs) => lhs.eval(x) + rhs.eval(x),
            Expr::Sub(lhs, rhs) => lhs.eval(x) - rhs.eval(x),
            Expr::Mul(lhs, rhs) => lhs.eval(x) * rhs.eval(x),
            Expr::Div(lhs, rhs) => lhs.eval(x) / rhs.eval(x),
            Expr::Pow(base, exp) => base.eval(x).powf(exp.eval(x)),
            Expr::Func(func, arg) => func.apply(arg.eval(x)),
        }
    }

    /// turns the expression into a regular Rust function of one argument
    pub fn lambdify1D(&self) -> Box<dyn Fn(f64) -> f64 + Send + Sync> {
        let expr = self.clone();
        Box::new(move |x| expr.eval(x))
    }

    /// evaluates the expression on every point of the slice
    pub fn calc_vector_lambdified1D(&self, x: &[f64]) -> Vec<f64> {
        x.iter().map(|&xi| self.eval(xi)).collect()
    }

    /// true if the variable occurs anywhere in the tree
    pub fn contains_variable(&self) -> bool {
        match self {
            Expr::Var => true,
            Expr::Const(_) => false,
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => lhs.contains_variable() || rhs.contains_variable(),
            Expr::Func(_, arg) => arg.contains_variable(),
        }
    }

    /// number of nodes in the tree
    pub fn node_count(&self) -> usize {
        match self {
            Expr::Var | Expr::Const(_) => 1,
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => 1 + lhs.node_count() + rhs.node_count(),
            Expr::Func(_, arg) => 1 + arg.node_count(),
        }
    }

    /// pretty string where the variable is printed as `var` (e.g. "t" instead of "x")
    pub fn sym_to_str(&self, var: &str) -> String {
        match self {
            Expr::Var => var.to_string(),
            Expr::Const(val) => format!("{}", val),
            Expr::Add(lhs, rhs) => format!("({} + {})", lhs.sym_to_str(var), rhs.sym_to_str(var)),
            Expr::Sub(lhs, rhs) => format!("({} - {})", lhs.sym_to_str(var), rhs.sym_to_str(var)),
            Expr::Mul(lhs, rhs) => format!("({} * {})", lhs.sym_to_str(var), rhs.sym_to_str(var)),
            Expr::Div(lhs, rhs) => format!("({} / {})", lhs.sym_to_str(var), rhs.sym_to_str(var)),
            Expr::Pow(base, exp) => format!("({} ^ {})", base.sym_to_str(var), exp.sym_to_str(var)),
            Expr::Func(func, arg) => format!("{}({})", func, arg.sym_to_str(var)),
        }
    }
}
