#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// expression tree of a function of one variable `x`:
/// 1) constants, the variable, unary math functions and binary operators
/// 2) tree-walking evaluation
/// 3) turns the tree back into a string for printing and control results
///# Example
/// ```
/// use RustedNumMethods::symbolic::symbolic_engine::{Expr, MathFunction};
/// let expr = Expr::func(MathFunction::Sin, Expr::Var) + Expr::Const(1.0);
/// println!("{}", expr);
/// assert_eq!(expr.eval(0.0), 1.0);
/// ```
pub mod symbolic_engine;
///____________________________________________________________________________________________________________________________
/// turns a formula string into a token stream: normalization of the raw text (whitespace, case,
/// constants pi and e, function names) and insertion of implicit multiplication
pub mod tokenizer;
///____________________________________________________________________________________________________________________________
/// recursive descent parser: token stream -> symbolic expression
///# Example
/// ```
/// use RustedNumMethods::symbolic::symbolic_engine::Expr;
/// let parsed_expression = Expr::parse_expression("2x^2 - 3sin(x)").unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// assert_eq!(parsed_expression.eval(0.0), 0.0);
/// ```
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Expression compiler
/// formula string -> validated callable function of x
///# Example
/// ```
/// use RustedNumMethods::symbolic::compiler::compile;
/// let f = compile("x^2 - 4").unwrap();
/// assert_eq!(f.call(2.0), 0.0);
/// assert_eq!(f.call(0.0), -4.0);
/// assert_eq!(f.call(3.0), 5.0);
/// ```
pub mod compiler;
