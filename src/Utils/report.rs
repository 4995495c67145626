//! Pretty printing of task outcomes as tables.
use crate::Utils::task_runner::{LinearReport, TaskOutcome};
use crate::numerical::bisection::BisectionResult;
use crate::numerical::root_scan::{RootEstimate, RootKind};
use nalgebra::{DMatrix, DVector};
use std::fmt::Write;
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// real number rounded to 12 significant digits, exponent form for very large and very small
/// magnitudes
pub fn fmt_real(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let rounded: f64 = format!("{:.11e}", x).parse().unwrap_or(x);
    let abs = rounded.abs();
    if abs >= 1e15 || (abs < 1e-6 && abs != 0.0) {
        format!("{:e}", rounded)
    } else {
        format!("{}", rounded)
    }
}

#[derive(Tabled)]
struct TraceRow {
    #[tabled(rename = "n")]
    index: usize,
    a: String,
    b: String,
    #[tabled(rename = "m = (a+b)/2")]
    midpoint: String,
    #[tabled(rename = "f(m)")]
    value: String,
}

#[derive(Tabled)]
struct RootRow {
    x: String,
    #[tabled(rename = "f(x)")]
    value: String,
    step: String,
    method: String,
}

#[derive(Tabled)]
struct ValueRow {
    x: String,
    #[tabled(rename = "f(x)")]
    value: String,
}

pub fn trace_table(result: &BisectionResult) -> Table {
    let rows: Vec<TraceRow> = result
        .trace
        .iter()
        .map(|record| TraceRow {
            index: record.index,
            a: fmt_real(record.left),
            b: fmt_real(record.right),
            midpoint: fmt_real(record.midpoint),
            value: fmt_real(record.value),
        })
        .collect();
    let mut table = Table::new(&rows);
    table.with(Style::modern_rounded());
    table
}

pub fn roots_table(roots: &[RootEstimate]) -> Table {
    let rows: Vec<RootRow> = roots
        .iter()
        .map(|root| RootRow {
            x: fmt_real(root.x),
            value: fmt_real(root.value),
            step: fmt_real(root.step),
            method: match root.kind {
                RootKind::Exact => "grid point".to_string(),
                RootKind::Bisection {
                    left,
                    right,
                    iterations,
                    converged,
                } => format!(
                    "bisection on [{}, {}], {} iterations{}",
                    fmt_real(left),
                    fmt_real(right),
                    iterations,
                    if converged { "" } else { ", not converged" }
                ),
            },
        })
        .collect();
    let mut table = Table::new(&rows);
    table.with(Style::modern_rounded());
    table
}

pub fn evaluation_table(values: &[(f64, f64)]) -> Table {
    let rows: Vec<ValueRow> = values
        .iter()
        .map(|&(x, value)| ValueRow {
            x: fmt_real(x),
            value: fmt_real(value),
        })
        .collect();
    let mut table = Table::new(&rows);
    table.with(Style::modern_rounded());
    table
}

pub fn matrix_table(matrix: &DMatrix<f64>) -> Table {
    let data: Vec<Vec<String>> = matrix
        .row_iter()
        .map(|row| row.iter().map(|&v| fmt_real(v)).collect())
        .collect();
    let mut table = Builder::from(data).build();
    table.with(Style::modern_rounded());
    table
}

/// [A | b] with a header x1 .. xn | b
pub fn augmented_table(matrix: &DMatrix<f64>, rhs: &DVector<f64>) -> Table {
    let mut builder = Builder::default();
    let mut header: Vec<String> = (1..=matrix.ncols()).map(|j| format!("x{}", j)).collect();
    header.push("b".to_string());
    builder.push_record(header);
    for (i, row) in matrix.row_iter().enumerate() {
        let mut record: Vec<String> = row.iter().map(|&v| fmt_real(v)).collect();
        record.push(rhs.get(i).map_or_else(String::new, |&v| fmt_real(v)));
        builder.push_record(record);
    }
    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table
}

/// x1 = .., x2 = .. as a two column table
pub fn vector_table(name: &str, vector: &DVector<f64>) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["i".to_string(), name.to_string()]);
    for (i, v) in vector.iter().enumerate() {
        builder.push_record([format!("{}{}", name, i + 1), fmt_real(*v)]);
    }
    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table
}

fn render_linear(report: &LinearReport, out: &mut String) -> std::fmt::Result {
    writeln!(out, "Linear system ({} method)", report.method)?;
    writeln!(out, "{}", augmented_table(&report.matrix, &report.rhs))?;
    if let Some((x, stages)) = &report.gauss {
        writeln!(out, "Gaussian elimination with partial pivoting")?;
        for stage in stages {
            match stage.pivot_row {
                None => writeln!(out, "stage {}: initial system", stage.stage)?,
                Some(row) => writeln!(
                    out,
                    "stage {}: pivot row {}",
                    stage.stage,
                    row + 1
                )?,
            }
            writeln!(out, "{}", augmented_table(&stage.matrix, &stage.rhs))?;
        }
        writeln!(out, "{}", vector_table("x", x))?;
    }
    if let Some((factors, x)) = &report.lu {
        writeln!(out, "LU factorization, P·A = L·U")?;
        writeln!(out, "P =\n{}", matrix_table(factors.p()))?;
        writeln!(out, "L =\n{}", matrix_table(factors.l()))?;
        writeln!(out, "U =\n{}", matrix_table(factors.u()))?;
        writeln!(out, "det(A) = {}", fmt_real(factors.determinant()))?;
        writeln!(out, "{}", vector_table("x", x))?;
    }
    writeln!(
        out,
        "condition number: {}",
        fmt_real(report.condition_number)
    )
}

fn render_into(outcome: &TaskOutcome, out: &mut String) -> std::fmt::Result {
    match outcome {
        TaskOutcome::Evaluated { function, values } => {
            writeln!(out, "f(x) = {}", function.source())?;
            writeln!(out, "{}", evaluation_table(values))
        }
        TaskOutcome::Bisection { function, result } => {
            writeln!(out, "Bisection for f(x) = {}", function.source())?;
            writeln!(out, "{}", trace_table(result))?;
            writeln!(
                out,
                "root x = {}, f(x) = {}, {} iterations{}",
                fmt_real(result.root),
                fmt_real(result.residual),
                result.iterations(),
                if result.converged {
                    ""
                } else {
                    " (iteration limit reached)"
                }
            )
        }
        TaskOutcome::Scan {
            function,
            config,
            roots,
        } => {
            writeln!(
                out,
                "Roots of f(x) = {} on [{}, {}]",
                function.source(),
                fmt_real(config.start),
                fmt_real(config.end)
            )?;
            if roots.is_empty() {
                writeln!(out, "no roots found")
            } else {
                writeln!(out, "{}", roots_table(roots))
            }
        }
        TaskOutcome::Linear(report) => render_linear(report, out),
    }
}

/// text report of one outcome
pub fn render_outcome(outcome: &TaskOutcome) -> String {
    let mut out = String::new();
    render_into(outcome, &mut out)
        .map(|_| out)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Utils::task_runner::{parse_tasks, run_task};

    #[test]
    fn test_fmt_real() {
        assert_eq!(fmt_real(0.1 + 0.2), "0.3");
        assert_eq!(fmt_real(2.0), "2");
        assert_eq!(fmt_real(-1.5), "-1.5");
        assert_eq!(fmt_real(0.0), "0");
        assert_eq!(fmt_real(1e-8), "1e-8");
        assert_eq!(fmt_real(2.5e20), "2.5e20");
        assert_eq!(fmt_real(1.0 / 3.0), "0.333333333333");
        assert_eq!(fmt_real(f64::NAN), "NaN");
        assert_eq!(fmt_real(f64::INFINITY), "inf");
        assert_eq!(fmt_real(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn test_tables() {
        let m = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 3.0]);
        let b = DVector::from_vec(vec![3.0, 5.0]);
        let text = augmented_table(&m, &b).to_string();
        assert!(text.contains("x1") && text.contains("x2"));
        assert!(text.contains('5'));
        let text = vector_table("x", &DVector::from_vec(vec![0.8, 1.4])).to_string();
        assert!(text.contains("x2") && text.contains("1.4"));
        let text = evaluation_table(&[(1.0, 0.25)]).to_string();
        assert!(text.contains("f(x)") && text.contains("0.25"));
    }

    #[test]
    fn test_render_outcomes() {
        let tasks = parse_tasks(
            "bisection\nfunction: x^2 - 2\ninterval: 0; 2\n\
             scan\nfunction: x^2 + 1\ninterval: -2; 2\n\
             linear\nmatrix: 2; 1 | 1; 3\nrhs: 3; 5",
        )
        .unwrap();
        let bisection = render_outcome(&run_task(&tasks[0]).unwrap());
        assert!(bisection.contains("f(m)"));
        assert!(bisection.contains("root x = 1.41421"));
        let scan = render_outcome(&run_task(&tasks[1]).unwrap());
        assert!(scan.contains("no roots found"));
        let linear = render_outcome(&run_task(&tasks[2]).unwrap());
        assert!(linear.contains("stage 1: pivot row 1"));
        assert!(linear.contains("L ="));
        assert!(linear.contains("0.8") && linear.contains("1.4"));
    }
}
