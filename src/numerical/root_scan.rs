//! Search for all roots of a function on a wide interval.
//!
//! The interval is sampled on a uniform grid. A grid point where |f| is below
//! `exact_threshold` is a root by itself; a cell whose finite endpoint values have opposite
//! signs is handed to [`bisect`]. The step sizes are tried in order, coarse first, and the
//! scan stops at the first step size that finds anything.
use crate::numerical::bisection::{BisectionConfig, NonlinearFunction, RootFindingError, bisect};
use itertools::Itertools;
use log::{debug, info};

/// most grid cells a single step size may produce
pub const MAX_GRID_CELLS: f64 = 1e7;

#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    pub start: f64,
    pub end: f64,
    /// grid steps, tried in this order
    pub steps: Vec<f64>,
    pub tolerance: f64,
    pub max_iterations: usize,
    pub exact_threshold: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            start: -100.0,
            end: 100.0,
            steps: vec![1.0, 0.1],
            tolerance: 1e-6,
            max_iterations: 1000,
            exact_threshold: 1e-12,
        }
    }
}

impl ScanConfig {
    pub fn with_interval(start: f64, end: f64) -> Self {
        Self {
            start,
            end,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), RootFindingError> {
        if !self.start.is_finite() || !self.end.is_finite() || self.start >= self.end {
            return Err(RootFindingError::InvalidInput(format!(
                "scan interval must be finite with start < end, got [{}, {}]",
                self.start, self.end
            )));
        }
        if self.steps.is_empty() {
            return Err(RootFindingError::InvalidInput(
                "at least one grid step is required".to_string(),
            ));
        }
        if let Some(step) = self
            .steps
            .iter()
            .find(|step| !step.is_finite() || **step <= 0.0)
        {
            return Err(RootFindingError::InvalidInput(format!(
                "grid step must be a positive number, got {}",
                step
            )));
        }
        if let Some(step) = self
            .steps
            .iter()
            .find(|step| (self.end - self.start) / **step > MAX_GRID_CELLS)
        {
            return Err(RootFindingError::InvalidInput(format!(
                "grid step {} gives more than {:e} cells on [{}, {}]",
                step, MAX_GRID_CELLS, self.start, self.end
            )));
        }
        if !self.exact_threshold.is_finite() || self.exact_threshold < 0.0 {
            return Err(RootFindingError::InvalidInput(format!(
                "exact root threshold must be a non-negative number, got {}",
                self.exact_threshold
            )));
        }
        // tolerance and max_iterations are checked by bisect itself, but fail before scanning
        BisectionConfig::new(self.tolerance, self.max_iterations).validate()
    }

    /// grid x_i = start + i*step, i = 0..=n, the last point not beyond `end`
    fn grid(&self, step: f64) -> Vec<f64> {
        let n = ((self.end - self.start) / step + 1e-9).floor() as usize;
        (0..=n).map(|i| self.start + i as f64 * step).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RootKind {
    /// a grid point where |f| fell below the exact threshold
    Exact,
    /// result of bisection on the grid cell [left, right]
    Bisection {
        left: f64,
        right: f64,
        iterations: usize,
        converged: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootEstimate {
    pub x: f64,
    pub value: f64,
    /// grid step the root was found with
    pub step: f64,
    pub kind: RootKind,
}

/// Scans `[config.start, config.end]` for roots, ordered by x.
/// An empty vector means no step size found a root.
pub fn scan_roots<F>(function: &F, config: &ScanConfig) -> Result<Vec<RootEstimate>, RootFindingError>
where
    F: NonlinearFunction + ?Sized,
{
    config.validate()?;
    for &step in &config.steps {
        let samples: Vec<(f64, f64)> = config
            .grid(step)
            .into_iter()
            .map(|x| (x, function.evaluate(x)))
            .collect();
        let is_exact = |value: f64| value.abs() < config.exact_threshold;
        let mut roots = Vec::new();
        for (i, &(x, value)) in samples.iter().enumerate() {
            if is_exact(value) {
                debug!("exact root at grid point {}: f = {}", x, value);
                roots.push(RootEstimate {
                    x,
                    value,
                    step,
                    kind: RootKind::Exact,
                });
            }
            // cell [x_i, x_i+1]; an exact endpoint was already recorded
            let Some(&(next_x, next_value)) = samples.get(i + 1) else {
                continue;
            };
            if !value.is_finite() || !next_value.is_finite() {
                continue;
            }
            if is_exact(value) || is_exact(next_value) || value * next_value >= 0.0 {
                continue;
            }
            let result = bisect(
                function,
                x,
                next_x,
                config.tolerance,
                config.max_iterations,
            )?;
            roots.push(RootEstimate {
                x: result.root,
                value: result.residual,
                step,
                kind: RootKind::Bisection {
                    left: x,
                    right: next_x,
                    iterations: result.iterations(),
                    converged: result.converged,
                },
            });
        }
        info!(
            "root scan of {} on [{}, {}] with step {}: {} root(s)",
            function.name(),
            config.start,
            config.end,
            step,
            roots.len()
        );
        if !roots.is_empty() {
            roots.sort_by(|r1, r2| r1.x.total_cmp(&r2.x));
            return Ok(roots);
        }
    }
    Ok(Vec::new())
}

/// sign changes of the sampled function: pairs of neighbouring grid points
pub fn sign_changes<F>(function: &F, config: &ScanConfig, step: f64) -> Vec<(f64, f64)>
where
    F: NonlinearFunction + ?Sized,
{
    config
        .grid(step)
        .into_iter()
        .map(|x| (x, function.evaluate(x)))
        .tuple_windows()
        .filter(|((_, f0), (_, f1))| f0.is_finite() && f1.is_finite() && f0 * f1 < 0.0)
        .map(|((x0, _), (x1, _))| (x0, x1))
        .collect()
}
