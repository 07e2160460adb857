//! Solver configuration.
//!
//! [`SolverConfig`] holds the limits and search options handed to a
//! [`CpSolver`](super::CpSolver).

/// Configuration for a solve call.
///
/// # Defaults
///
/// ```
/// use number_cross::cp::SolverConfig;
///
/// let config = SolverConfig::default();
/// assert_eq!(config.time_limit_ms, Some(60_000));
/// assert!(!config.enumerate_all);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use number_cross::cp::SolverConfig;
///
/// let config = SolverConfig::default()
///     .with_time_limit_ms(5_000)
///     .with_enumerate_all(true)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    /// Wall-clock limit in milliseconds. `None` searches until done.
    pub time_limit_ms: Option<u64>,

    /// Keep searching after the first solution of a satisfaction model and
    /// report every solution to the visitor.
    ///
    /// Ignored when the model has an objective: optimisation always continues
    /// until optimality is proven or a limit is hit.
    pub enumerate_all: bool,

    /// Stop after this many solutions have been reported.
    pub max_solutions: Option<usize>,

    /// Random seed for tie-breaking among equally constrained variables.
    ///
    /// `None` keeps declaration order, which makes the search deterministic.
    pub seed: Option<u64>,

    /// Emit periodic search statistics through `tracing`.
    pub log_search_progress: bool,

    /// Number of search nodes between two progress lines.
    pub progress_interval: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: Some(60_000),
            enumerate_all: false,
            max_solutions: None,
            seed: None,
            log_search_progress: false,
            progress_interval: 100_000,
        }
    }
}

impl SolverConfig {
    /// Sets the wall-clock time limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Removes the time limit.
    pub fn without_time_limit(mut self) -> Self {
        self.time_limit_ms = None;
        self
    }

    /// Enables or disables enumeration of all solutions.
    pub fn with_enumerate_all(mut self, enumerate_all: bool) -> Self {
        self.enumerate_all = enumerate_all;
        self
    }

    /// Caps the number of reported solutions.
    pub fn with_max_solutions(mut self, n: usize) -> Self {
        self.max_solutions = Some(n);
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables search progress logging.
    pub fn with_log_search_progress(mut self, on: bool) -> Self {
        self.log_search_progress = on;
        self
    }

    /// Sets the number of nodes between progress lines.
    pub fn with_progress_interval(mut self, nodes: u64) -> Self {
        self.progress_interval = nodes;
        self
    }

    /// Preset: stop at the first solution, one minute limit.
    pub fn first_solution() -> Self {
        Self::default()
    }

    /// Preset: report every solution, no time limit.
    pub fn exhaustive() -> Self {
        Self {
            time_limit_ms: None,
            enumerate_all: true,
            ..Self::default()
        }
    }

    /// Whether the search should stop once `found` solutions were reported.
    pub(crate) fn solution_cap_reached(&self, found: usize, has_objective: bool) -> bool {
        if let Some(cap) = self.max_solutions {
            if found >= cap {
                return true;
            }
        }
        !has_objective && !self.enumerate_all && found >= 1
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.time_limit_ms == Some(0) {
            return Err("time_limit_ms must be positive or None".into());
        }
        if self.max_solutions == Some(0) {
            return Err("max_solutions must be positive or None".into());
        }
        if self.progress_interval == 0 {
            return Err("progress_interval must be at least 1".into());
        }
        Ok(())
    }
}
