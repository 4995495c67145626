//! Turns parsed task sections into calls of the numerical routines.
use crate::Utils::task_parser::{Section, TaskError, parse_document, parse_task_file};
use crate::numerical::bisection::{
    BisectionConfig, BisectionResult, RootFindingError, bisect_with_config,
};
use crate::numerical::root_scan::{RootEstimate, ScanConfig, scan_roots};
use crate::somelinalg::gauss_elimination::{EliminationStage, solve_gauss_with_stages};
use crate::somelinalg::linear_sys_diagnostics::{
    LinearSystemError, Rouche_Capelli_theorem, condition_number,
};
use crate::somelinalg::lu_pivoting::{LUFactors, factorize_LU};
use crate::symbolic::compiler::{CompileError, CompiledFunction, compile};
use log::{info, warn};
use nalgebra::{DMatrix, DVector};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// section titles of a task document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum TaskKind {
    Evaluate,
    Bisection,
    Scan,
    Linear,
}

impl TaskKind {
    pub fn allowed_keys(self) -> &'static [&'static str] {
        match self {
            TaskKind::Evaluate => &["function", "points"],
            TaskKind::Bisection => &["function", "interval", "tolerance", "max_iterations"],
            TaskKind::Scan => &["function", "interval", "steps", "tolerance", "max_iterations"],
            TaskKind::Linear => &["method", "matrix", "rhs"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LinearMethod {
    Gauss,
    Lu,
    #[default]
    Both,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    Evaluate {
        function: String,
        points: Vec<f64>,
    },
    Bisection {
        function: String,
        a: f64,
        b: f64,
        config: BisectionConfig,
    },
    Scan {
        function: String,
        config: ScanConfig,
    },
    Linear {
        method: LinearMethod,
        matrix: DMatrix<f64>,
        rhs: DVector<f64>,
    },
}

fn interval(section: &Section) -> Result<Option<(f64, f64)>, TaskError> {
    match section.reals("interval")? {
        None => Ok(None),
        Some(ends) if ends.len() == 2 => Ok(Some((ends[0], ends[1]))),
        Some(_) => Err(section.invalid(
            "interval",
            section.get("interval").unwrap_or_default(),
            "two numbers 'a; b'",
        )),
    }
}

fn matrix_from_rows(section: &Section, rows: Vec<Vec<f64>>) -> Result<DMatrix<f64>, TaskError> {
    let ncols = rows.first().map_or(0, |row| row.len());
    if rows.iter().any(|row| row.len() != ncols) {
        return Err(section.invalid(
            "matrix",
            section.get("matrix").unwrap_or_default(),
            "rows of equal length",
        ));
    }
    Ok(DMatrix::from_fn(rows.len(), ncols, |i, j| rows[i][j]))
}

impl Task {
    pub fn kind(&self) -> TaskKind {
        match self {
            Task::Evaluate { .. } => TaskKind::Evaluate,
            Task::Bisection { .. } => TaskKind::Bisection,
            Task::Scan { .. } => TaskKind::Scan,
            Task::Linear { .. } => TaskKind::Linear,
        }
    }

    pub fn from_section(section: &Section) -> Result<Task, TaskError> {
        let kind = TaskKind::from_str(&section.title)
            .map_err(|_| TaskError::UnknownSection(section.title.clone()))?;
        section.check_keys(kind.allowed_keys())?;
        let task = match kind {
            TaskKind::Evaluate => {
                let function = section.require("function")?.to_string();
                section.require("points")?;
                Task::Evaluate {
                    function,
                    points: section.reals("points")?.unwrap_or_default(),
                }
            }
            TaskKind::Bisection => {
                let function = section.require("function")?.to_string();
                section.require("interval")?;
                let (a, b) = interval(section)?.unwrap_or((0.0, 0.0));
                let defaults = BisectionConfig::default();
                let config = BisectionConfig::new(
                    section.real("tolerance")?.unwrap_or(defaults.tolerance),
                    section
                        .count("max_iterations")?
                        .unwrap_or(defaults.max_iterations),
                );
                Task::Bisection {
                    function,
                    a,
                    b,
                    config,
                }
            }
            TaskKind::Scan => {
                let function = section.require("function")?.to_string();
                let mut config = ScanConfig::default();
                if let Some((start, end)) = interval(section)? {
                    config.start = start;
                    config.end = end;
                }
                if let Some(steps) = section.reals("steps")? {
                    config.steps = steps;
                }
                if let Some(tolerance) = section.real("tolerance")? {
                    config.tolerance = tolerance;
                }
                if let Some(max_iterations) = section.count("max_iterations")? {
                    config.max_iterations = max_iterations;
                }
                Task::Scan { function, config }
            }
            TaskKind::Linear => {
                let method = match section.get("method") {
                    None => LinearMethod::default(),
                    Some(name) => LinearMethod::from_str(name)
                        .map_err(|_| section.invalid("method", name, "gauss, lu or both"))?,
                };
                section.require("matrix")?;
                section.require("rhs")?;
                let rows = section.rows("matrix")?.unwrap_or_default();
                let rhs = section.reals("rhs")?.unwrap_or_default();
                Task::Linear {
                    method,
                    matrix: matrix_from_rows(section, rows)?,
                    rhs: DVector::from_vec(rhs),
                }
            }
        };
        Ok(task)
    }
}

/// every task of a document, in document order
pub fn parse_tasks(document: &str) -> Result<Vec<Task>, TaskError> {
    parse_document(document)?
        .iter()
        .map(Task::from_section)
        .collect()
}

/// Errors of running a task
#[derive(Debug, Clone, PartialEq)]
pub enum TaskRunError {
    Task(TaskError),
    Compile(CompileError),
    RootFinding(RootFindingError),
    Linear(LinearSystemError),
}

impl fmt::Display for TaskRunError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TaskRunError::Task(e) => write!(f, "{}", e),
            TaskRunError::Compile(e) => write!(f, "{}", e),
            TaskRunError::RootFinding(e) => write!(f, "{}", e),
            TaskRunError::Linear(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for TaskRunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TaskRunError::Task(e) => Some(e),
            TaskRunError::Compile(e) => Some(e),
            TaskRunError::RootFinding(e) => Some(e),
            TaskRunError::Linear(e) => Some(e),
        }
    }
}

impl From<TaskError> for TaskRunError {
    fn from(e: TaskError) -> Self {
        TaskRunError::Task(e)
    }
}

impl From<CompileError> for TaskRunError {
    fn from(e: CompileError) -> Self {
        TaskRunError::Compile(e)
    }
}

impl From<RootFindingError> for TaskRunError {
    fn from(e: RootFindingError) -> Self {
        TaskRunError::RootFinding(e)
    }
}

impl From<LinearSystemError> for TaskRunError {
    fn from(e: LinearSystemError) -> Self {
        TaskRunError::Linear(e)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearReport {
    pub method: LinearMethod,
    pub matrix: DMatrix<f64>,
    pub rhs: DVector<f64>,
    /// solution and elimination stages of the Gauss method
    pub gauss: Option<(DVector<f64>, Vec<EliminationStage>)>,
    /// factors and solution of the LU method
    pub lu: Option<(LUFactors, DVector<f64>)>,
    pub condition_number: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    Evaluated {
        function: CompiledFunction,
        values: Vec<(f64, f64)>,
    },
    Bisection {
        function: CompiledFunction,
        result: BisectionResult,
    },
    Scan {
        function: CompiledFunction,
        config: ScanConfig,
        roots: Vec<RootEstimate>,
    },
    Linear(LinearReport),
}

fn run_linear(
    method: LinearMethod,
    matrix: &DMatrix<f64>,
    rhs: &DVector<f64>,
) -> Result<LinearReport, LinearSystemError> {
    let gauss = match method {
        LinearMethod::Gauss | LinearMethod::Both => Some(solve_gauss_with_stages(matrix, rhs)?),
        LinearMethod::Lu => None,
    };
    let lu = match method {
        LinearMethod::Lu | LinearMethod::Both => {
            let factors = factorize_LU(matrix)?;
            let x = factors.solve(rhs)?;
            Some((factors, x))
        }
        LinearMethod::Gauss => None,
    };
    Ok(LinearReport {
        method,
        matrix: matrix.clone(),
        rhs: rhs.clone(),
        gauss,
        lu,
        condition_number: condition_number(matrix),
    })
}

pub fn run_task(task: &Task) -> Result<TaskOutcome, TaskRunError> {
    info!("running {} task", task.kind());
    let outcome = match task {
        Task::Evaluate { function, points } => {
            let function = compile(function)?;
            let values = points.iter().map(|&x| (x, function.call(x))).collect();
            TaskOutcome::Evaluated { function, values }
        }
        Task::Bisection {
            function,
            a,
            b,
            config,
        } => {
            let function = compile(function)?;
            let result = bisect_with_config(&function, *a, *b, config)?;
            TaskOutcome::Bisection { function, result }
        }
        Task::Scan { function, config } => {
            let function = compile(function)?;
            let roots = scan_roots(&function, config)?;
            TaskOutcome::Scan {
                function,
                config: config.clone(),
                roots,
            }
        }
        Task::Linear {
            method,
            matrix,
            rhs,
        } => match run_linear(*method, matrix, rhs) {
            Ok(report) => TaskOutcome::Linear(report),
            Err(err) => {
                if let LinearSystemError::Singular { .. } = err {
                    // tell an inconsistent system from one with infinitely many solutions
                    let kind = Rouche_Capelli_theorem(matrix, rhs);
                    warn!("singular system: {:?}", kind);
                }
                return Err(err.into());
            }
        },
    };
    Ok(outcome)
}

type TaskResults = Vec<(Task, Result<TaskOutcome, TaskRunError>)>;

/// a failing task does not stop the others
fn run_tasks(tasks: Vec<Task>) -> TaskResults {
    tasks
        .into_iter()
        .map(|task| {
            let outcome = run_task(&task);
            (task, outcome)
        })
        .collect()
}

/// parses a document and runs every task
pub fn run_document(document: &str) -> Result<TaskResults, TaskError> {
    Ok(run_tasks(parse_tasks(document)?))
}

/// reads a task file and runs every task
pub fn run_task_file(path: &Path) -> Result<TaskResults, TaskError> {
    let tasks = parse_task_file(path)?
        .iter()
        .map(Task::from_section)
        .collect::<Result<Vec<Task>, TaskError>>()?;
    info!("{} task(s) read from {}", tasks.len(), path.display());
    Ok(run_tasks(tasks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerical::root_scan::RootKind;
    use approx::assert_relative_eq;
    use strum::IntoEnumIterator;

    const DOCUMENT: &str = "\
// one task of every kind
evaluate
function: x^2 - 4
points: -2; 0; 2,5

bisection
function: x^3 - 9x + 4
interval: 0; 1
tolerance: 1e-8

scan
function: x^2 - 2
interval: -5; 5

linear
method: Both
matrix: 2; 1 | 1; 3
rhs: 3; 5
";

    #[test]
    fn test_parse_tasks() {
        let tasks = parse_tasks(DOCUMENT).unwrap();
        let kinds: Vec<TaskKind> = tasks.iter().map(Task::kind).collect();
        assert_eq!(kinds, TaskKind::iter().collect::<Vec<_>>());
        assert_eq!(
            tasks[0],
            Task::Evaluate {
                function: "x^2 - 4".to_string(),
                points: vec![-2.0, 0.0, 2.5]
            }
        );
        match &tasks[1] {
            Task::Bisection { a, b, config, .. } => {
                assert_eq!((*a, *b), (0.0, 1.0));
                assert_eq!(config.tolerance, 1e-8);
                assert_eq!(config.max_iterations, BisectionConfig::default().max_iterations);
            }
            other => panic!("unexpected task {:?}", other),
        }
        match &tasks[2] {
            Task::Scan { config, .. } => {
                assert_eq!((config.start, config.end), (-5.0, 5.0));
                assert_eq!(config.steps, ScanConfig::default().steps);
            }
            other => panic!("unexpected task {:?}", other),
        }
        match &tasks[3] {
            Task::Linear {
                method,
                matrix,
                rhs,
            } => {
                assert_eq!(*method, LinearMethod::Both);
                assert_eq!(*matrix, DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 3.0]));
                assert_eq!(*rhs, DVector::from_vec(vec![3.0, 5.0]));
            }
            other => panic!("unexpected task {:?}", other),
        }
    }

    #[test]
    fn test_section_errors() {
        assert_eq!(
            parse_tasks("integrate\nfunction: x"),
            Err(TaskError::UnknownSection("integrate".to_string()))
        );
        assert!(matches!(
            parse_tasks("bisection\nfunction: x"),
            Err(TaskError::MissingKey { key, .. }) if key == "interval"
        ));
        assert!(matches!(
            parse_tasks("bisection\nfunction: x\ninterval: 0; 1; 2"),
            Err(TaskError::InvalidValue { key, .. }) if key == "interval"
        ));
        assert!(matches!(
            parse_tasks("linear\nmatrix: 1; 2 | 3\nrhs: 1; 2"),
            Err(TaskError::InvalidValue { key, .. }) if key == "matrix"
        ));
        assert!(matches!(
            parse_tasks("linear\nmethod: cholesky\nmatrix: 1\nrhs: 1"),
            Err(TaskError::InvalidValue { key, .. }) if key == "method"
        ));
        assert!(matches!(
            parse_tasks("scan\nfunction: x\nmax_iterations: -3"),
            Err(TaskError::InvalidValue { key, .. }) if key == "max_iterations"
        ));
        assert!(matches!(
            parse_tasks("evaluate\nfunction: x\npoints: 1\nstep: 2"),
            Err(TaskError::UnknownKey { key, .. }) if key == "step"
        ));
    }

    #[test]
    fn test_linear_method_default() {
        let tasks = parse_tasks("linear\nmatrix: 4\nrhs: 2").unwrap();
        assert!(matches!(
            tasks[0],
            Task::Linear {
                method: LinearMethod::Both,
                ..
            }
        ));
        assert_eq!("lu".parse::<LinearMethod>().unwrap(), LinearMethod::Lu);
        assert_eq!(LinearMethod::Gauss.to_string(), "gauss");
    }

    #[test]
    fn test_run_document() {
        let results = run_document(DOCUMENT).unwrap();
        assert_eq!(results.len(), 4);
        match &results[0].1 {
            Ok(TaskOutcome::Evaluated { values, .. }) => {
                assert_eq!(values, &vec![(-2.0, 0.0), (0.0, -4.0), (2.5, 2.25)]);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        match &results[1].1 {
            Ok(TaskOutcome::Bisection { result, .. }) => {
                assert!(result.converged);
                assert_relative_eq!(result.root, 0.4549, epsilon = 1e-4);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        match &results[2].1 {
            Ok(TaskOutcome::Scan { roots, .. }) => {
                assert_eq!(roots.len(), 2);
                assert!(roots.iter().all(|r| matches!(r.kind, RootKind::Bisection { .. })));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        match &results[3].1 {
            Ok(TaskOutcome::Linear(report)) => {
                let expected = DVector::from_vec(vec![0.8, 1.4]);
                let (x_gauss, stages) = report.gauss.as_ref().unwrap();
                let (_, x_lu) = report.lu.as_ref().unwrap();
                assert_relative_eq!(*x_gauss, expected, epsilon = 1e-12);
                assert_relative_eq!(*x_lu, expected, epsilon = 1e-12);
                assert_eq!(stages.len(), 2);
                assert!(report.condition_number >= 1.0);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_failing_tasks_do_not_stop_others() {
        let document = "\
evaluate
function: x +* 2
points: 1

bisection
function: x^2 + 1
interval: -1; 1

linear
method: gauss
matrix: 1; 2 | 2; 4
rhs: 1; 2

evaluate
function: 2x
points: 3
";
        let results = run_document(document).unwrap();
        assert!(matches!(results[0].1, Err(TaskRunError::Compile(_))));
        assert!(matches!(
            results[1].1,
            Err(TaskRunError::RootFinding(RootFindingError::Interval { .. }))
        ));
        assert!(matches!(
            results[2].1,
            Err(TaskRunError::Linear(LinearSystemError::Singular { .. }))
        ));
        assert!(matches!(
            &results[3].1,
            Ok(TaskOutcome::Evaluated { values, .. }) if values == &vec![(3.0, 6.0)]
        ));
    }

    #[test]
    fn test_only_requested_method_runs() {
        let tasks = parse_tasks("linear\nmethod: lu\nmatrix: 2; 1 | 1; 3\nrhs: 3; 5").unwrap();
        match run_task(&tasks[0]).unwrap() {
            TaskOutcome::Linear(report) => {
                assert!(report.gauss.is_none());
                assert!(report.lu.is_some());
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_error_source() {
        use std::error::Error;
        let err: TaskRunError = TaskError::Empty.into();
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), TaskError::Empty.to_string());
    }

    #[test]
    fn test_run_task_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", DOCUMENT).unwrap();
        let results = run_task_file(file.path()).unwrap();
        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|(_, outcome)| outcome.is_ok()));

        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            run_task_file(&dir.path().join("no_such_tasks.txt")),
            Err(TaskError::Io(_))
        ));
    }

    #[test]
    fn test_too_fine_scan_step_is_an_error() {
        let results = run_document("scan\nfunction: x^2 - 2\nsteps: 1; 1e-300").unwrap();
        assert!(matches!(
            results[0].1,
            Err(TaskRunError::RootFinding(RootFindingError::InvalidInput(_)))
        ));
    }
}
