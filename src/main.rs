#![allow(non_snake_case)]
use RustedNumMethods::Examples::numerical_examples::numerical_examples;
use RustedNumMethods::Examples::symbolic_examples::sym_examples;
use RustedNumMethods::Examples::utils_examples::utils_examples;
use RustedNumMethods::Utils::logger::{init_logger, parse_level};
use RustedNumMethods::Utils::report::render_outcome;
use RustedNumMethods::Utils::task_runner::run_task_file;
use log::{LevelFilter, error};
use std::path::Path;
use std::process::ExitCode;

/// cargo run                          -> example 0
/// cargo run -- 3                     -> numerical example 3
/// cargo run -- symbolic 1            -> symbolic example 1
/// cargo run -- tasks 1               -> task document example 1
/// cargo run -- tasks.txt [log level] -> every task of the document
fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let example_group = matches!(args.first().map(String::as_str), Some("symbolic" | "tasks"));
    let level = args
        .get(1)
        .filter(|_| !example_group)
        .and_then(|name| parse_level(name))
        .unwrap_or(LevelFilter::Info);
    if let Err(e) = init_logger(level, None) {
        eprintln!("cannot set up logging: {}", e);
    }

    let Some(arg) = args.first() else {
        numerical_examples(0);
        return ExitCode::SUCCESS;
    };
    if let Ok(example) = arg.parse::<usize>() {
        numerical_examples(example);
        return ExitCode::SUCCESS;
    }
    if example_group {
        let example = args.get(1).and_then(|n| n.parse::<usize>().ok()).unwrap_or(0);
        match arg.as_str() {
            "symbolic" => sym_examples(example),
            _ => utils_examples(example),
        }
        return ExitCode::SUCCESS;
    }

    let results = match run_task_file(Path::new(arg)) {
        Ok(results) => results,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let mut failed = 0;
    for (task, outcome) in results {
        match outcome {
            Ok(outcome) => println!("{}", render_outcome(&outcome)),
            Err(e) => {
                failed += 1;
                println!("{} task failed: {}\n", task.kind(), e);
            }
        }
    }
    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
