use crate::Utils::report::render_outcome;
use crate::Utils::task_parser::parse_document;
use crate::Utils::task_runner::run_document;

/// a task document with one task of every kind
pub const DEMO_TASKS: &str = r#"
// values of a function
evaluate
function: x^2 - 4
points: -2; 0; 1,5; 3

// root of a cubic inside [0, 1]
bisection
function: x^3 - 9x + 4
interval: 0; 1
tolerance: 1e-8

// all roots of sin on [-10, 10]
scan
function: sin(x)
interval: -10; 10
steps: 1; 0,1

# a 3x3 system that needs row swaps
linear
method: both
matrix: 0; 2; 1 | 1; 1; 1 | 2; 1; 0
rhs: 5; 4; 4
"#;

pub fn utils_examples(example: usize) {
    match example {
        0 => {
            // raw sections of a document
            match parse_document(DEMO_TASKS) {
                Ok(sections) => {
                    for section in sections {
                        println!("{}", section.title);
                        for entry in section.entries {
                            println!("    {} = {}", entry.key, entry.value);
                        }
                    }
                }
                Err(e) => println!("{}", e),
            }
        }
        1 => {
            // run every task and print the reports
            match run_document(DEMO_TASKS) {
                Ok(results) => {
                    for (task, outcome) in results {
                        match outcome {
                            Ok(outcome) => println!("{}", render_outcome(&outcome)),
                            Err(e) => println!("{} task failed: {}", task.kind(), e),
                        }
                    }
                }
                Err(e) => println!("{}", e),
            }
        }
        2 => {
            // errors of a broken document, the remaining tasks still run
            let input = "evaluate\nfunction: x +* 1\npoints: 1\nbisection\nfunction: x^2+1\ninterval: -1; 1\nevaluate\nfunction: 2x\npoints: 1; 2";
            match run_document(input) {
                Ok(results) => {
                    for (task, outcome) in results {
                        match outcome {
                            Ok(outcome) => println!("{}", render_outcome(&outcome)),
                            Err(e) => println!("{} task failed: {}", task.kind(), e),
                        }
                    }
                }
                Err(e) => println!("{}", e),
            }
        }
        _ => {
            println!("example {} does not exist", example);
        }
    }
}
