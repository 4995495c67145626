#![allow(non_snake_case)]
use crate::Utils::report::{augmented_table, matrix_table, roots_table, trace_table, vector_table};
use crate::numerical::bisection::{ClosureFunction, bisect};
use crate::numerical::root_scan::{ScanConfig, scan_roots, sign_changes};
use crate::somelinalg::gauss_elimination::solve_gauss_with_stages;
use crate::somelinalg::linear_sys_diagnostics::{
    Rouche_Capelli_theorem, condition_number, hilbert_matrix,
};
use crate::somelinalg::lu_pivoting::factorize_LU;
use crate::symbolic::compiler::compile;
use nalgebra::{DMatrix, DVector};

pub fn numerical_examples(example: usize) {
    match example {
        0 => {
            // BISECTION for a formula typed by a user
            let f = match compile("x^3 - 9x + 4") {
                Ok(f) => f,
                Err(e) => {
                    println!("{}", e);
                    return;
                }
            };
            match bisect(&f, 0.0, 1.0, 1e-6, 100) {
                Ok(result) => {
                    println!("{}", trace_table(&result));
                    println!(
                        "root = {}, f(root) = {}, iterations = {}",
                        result.root,
                        result.residual,
                        result.iterations()
                    );
                }
                Err(e) => println!("{}", e),
            }
            // no sign change on the interval
            if let Err(e) = bisect(&f, 4.0, 5.0, 1e-6, 100) {
                println!("{}", e);
            }
        }
        1 => {
            // BISECTION for a closure
            let f = ClosureFunction::new(|x: f64| x.cos() - x, "cos(x) - x");
            match bisect(&f, 0.0, 1.0, 1e-10, 200) {
                Ok(result) => println!("cos(x) = x at x = {}", result.root),
                Err(e) => println!("{}", e),
            }
        }
        2 => {
            // ROOT SCAN: all roots of a function on a wide interval
            let f = match compile("sin(x) - 0.5x") {
                Ok(f) => f,
                Err(e) => {
                    println!("{}", e);
                    return;
                }
            };
            let config = ScanConfig::with_interval(-10.0, 10.0);
            println!("sign changes with step 1: {:?}", sign_changes(&f, &config, 1.0));
            match scan_roots(&f, &config) {
                Ok(roots) => println!("{}", roots_table(&roots)),
                Err(e) => println!("{}", e),
            }
        }
        3 => {
            // GAUSS and LU for the same system
            let A = DMatrix::from_row_slice(3, 3, &[0.0, 2.0, 1.0, 1.0, 1.0, 1.0, 2.0, 1.0, 0.0]);
            let b = DVector::from_vec(vec![5.0, 4.0, 4.0]);
            match solve_gauss_with_stages(&A, &b) {
                Ok((x, stages)) => {
                    for stage in stages {
                        println!("stage {}", stage.stage);
                        println!("{}", augmented_table(&stage.matrix, &stage.rhs));
                    }
                    println!("{}", vector_table("x", &x));
                }
                Err(e) => println!("{}", e),
            }
            match factorize_LU(&A) {
                Ok(lu) => {
                    println!("P = \n{}", matrix_table(lu.p()));
                    println!("L = \n{}", matrix_table(lu.l()));
                    println!("U = \n{}", matrix_table(lu.u()));
                    match lu.solve(&b) {
                        Ok(x) => println!("{}", vector_table("x", &x)),
                        Err(e) => println!("{}", e),
                    }
                }
                Err(e) => println!("{}", e),
            }
        }
        4 => {
            // a badly conditioned system: Hilbert matrix
            for n in [4, 8, 12] {
                let H = hilbert_matrix(n);
                let x_true = DVector::from_element(n, 1.0);
                let b = &H * &x_true;
                match factorize_LU(&H).and_then(|lu| lu.solve(&b)) {
                    Ok(x) => println!(
                        "n = {}, cond = {:e}, |x - x_true| = {:e}",
                        n,
                        condition_number(&H),
                        (x - &x_true).norm()
                    ),
                    Err(e) => println!("n = {}: {}", n, e),
                }
            }
        }
        5 => {
            // singular systems
            let A = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
            for b in [
                DVector::from_vec(vec![1.0, 2.0]),
                DVector::from_vec(vec![1.0, 3.0]),
            ] {
                if let Err(e) = solve_gauss_with_stages(&A, &b) {
                    println!("{}: {:?}", e, Rouche_Capelli_theorem(&A, &b));
                }
            }
        }
        _ => {
            println!("example {} does not exist", example);
        }
    }
}
