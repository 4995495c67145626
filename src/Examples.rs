//! examples of usage of RustedNumMethods
/// bisection, root scan and linear systems examples
pub mod numerical_examples;
/// Symbolic operations examples
pub mod symbolic_examples;
/// task documents examples
pub mod utils_examples;
