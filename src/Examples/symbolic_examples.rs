// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
#![allow(non_snake_case)]

use crate::symbolic::compiler::compile;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::tokenizer::tokenize;
#[allow(dead_code)]
pub fn sym_examples(example: usize) {
    match example {
        0 => {
            //parse expression from string to symbolic expression
            let input = "2x^2 + 3sin(x) - e^x";
            let parsed_expression = Expr::parse_expression(input);
            match parsed_expression {
                Ok(expr) => {
                    // here you've got symbolic expression, printed with all brackets
                    println!("parsed_expression {}", expr);
                    println!("{}, sym to string: {}", input, expr.sym_to_str("x"));
                    println!("number of nodes {}", expr.node_count());
                    //convert symbolic expression to a Rust function and evaluate the function
                    let f = expr.lambdify1D();
                    println!("f(1) = {}", f(1.0));
                    let values = expr.calc_vector_lambdified1D(&[0.0, 0.5, 1.0]);
                    println!("f(0), f(0.5), f(1) = {:?}", values);
                }
                Err(e) => println!("{}", e),
            }
        }
        1 => {
            // the same formula in the notations people actually type
            for input in ["2x", "2*x", "x(x+1)", "(x+1)(x-1)", "sqrt x", "1,5x", "pi x", "X^2"] {
                match compile(input) {
                    Ok(f) => println!("{:>12} -> {:<30} f(2) = {}", input, f.expr(), f.call(2.0)),
                    Err(e) => println!("{:>12} -> {}", input, e),
                }
            }
        }
        2 => {
            // what the tokenizer sees, including implied multiplications
            let input = "3x sin(2x)";
            match tokenize(input) {
                Ok(lexemes) => {
                    for lexeme in lexemes {
                        println!("{:>3}: {:?}", lexeme.pos, lexeme.token);
                    }
                }
                Err(e) => println!("{}", e),
            }
        }
        3 => {
            // malformed formulas are rejected with the position of the problem
            for input in ["", "2 +* x", "sin(x", "x)", "foo(x)", "y + 1", "ln(x)", "1/0*0"] {
                match compile(input) {
                    Ok(f) => println!("{:>8} -> ok, f(1) = {}", input, f.call(1.0)),
                    Err(e) => println!("{:>8} -> {}", input, e),
                }
            }
        }
        _ => {
            println!("example {} does not exist", example);
        }
    }
}
