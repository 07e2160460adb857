//! CP solver interface and the bundled backtracking implementation.

use super::config::SolverConfig;
use super::expr::LinearExpr;
use super::model::CpModel;
use super::search::Search;
use super::variables::{BoolVar, IntVar, Literal};
use std::fmt;
use std::time::Instant;
use tracing::{info, warn};

/// Status of the solver after execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverStatus {
    /// Proven optimal solution found (any solution, for a model without objective).
    Optimal,
    /// Feasible (but not proven optimal) solution found.
    Feasible,
    /// No feasible solution exists.
    Infeasible,
    /// Model is invalid or malformed.
    ModelInvalid,
    /// A limit was reached before any solution or proof was found.
    Unknown,
}

impl SolverStatus {
    /// Upper-case status name, as conventionally printed by CP engines.
    pub fn name(self) -> &'static str {
        match self {
            SolverStatus::Optimal => "OPTIMAL",
            SolverStatus::Feasible => "FEASIBLE",
            SolverStatus::Infeasible => "INFEASIBLE",
            SolverStatus::ModelInvalid => "MODEL_INVALID",
            SolverStatus::Unknown => "UNKNOWN",
        }
    }

    /// Whether the status carries a solution.
    pub fn is_solution_found(self) -> bool {
        matches!(self, SolverStatus::Optimal | SolverStatus::Feasible)
    }
}

impl fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A complete assignment of every model variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    values: Vec<i64>,
}

impl Assignment {
    /// Wraps raw values indexed by variable handle.
    pub fn new(values: Vec<i64>) -> Self {
        Self { values }
    }

    /// Value of an integer (or boolean) variable.
    ///
    /// # Panics
    /// Panics if the handle does not belong to the solved model.
    pub fn value(&self, var: impl Into<IntVar>) -> i64 {
        self.values[var.into().index()]
    }

    /// Value of a boolean variable.
    pub fn bool_value(&self, var: BoolVar) -> bool {
        self.value(var) == 1
    }

    /// Truth value of a literal.
    pub fn literal_value(&self, lit: Literal) -> bool {
        self.value(lit.var) == lit.true_value()
    }

    /// Evaluates a linear expression.
    pub fn evaluate(&self, expr: &LinearExpr) -> i64 {
        expr.evaluate(|v| self.value(v))
    }

    /// Raw values indexed by variable handle.
    pub fn values(&self) -> &[i64] {
        &self.values
    }
}

/// Receives each solution as the search discovers it.
///
/// Called synchronously on the solving thread. Closures taking
/// `&Assignment` implement this trait.
pub trait SolutionVisitor {
    fn on_solution(&mut self, assignment: &Assignment);
}

impl<F> SolutionVisitor for F
where
    F: FnMut(&Assignment),
{
    fn on_solution(&mut self, assignment: &Assignment) {
        self(assignment)
    }
}

/// Counters collected during search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Branching decisions taken.
    pub nodes: u64,
    /// Constraint propagator invocations.
    pub propagations: u64,
    /// Dead ends encountered.
    pub conflicts: u64,
}

/// Solution from a CP solver.
#[derive(Debug, Clone)]
pub struct CpSolution {
    /// Solver status.
    pub status: SolverStatus,
    /// Objective value of the reported assignment (if the model has one).
    pub objective_value: Option<i64>,
    /// The last (best) assignment found.
    pub assignment: Option<Assignment>,
    /// Number of solutions reported to the visitor.
    pub solutions: usize,
    /// Search counters.
    pub stats: SearchStats,
    /// Solve time in milliseconds.
    pub solve_time_ms: u64,
}

impl CpSolution {
    /// Creates an empty solution with the given status.
    pub fn empty(status: SolverStatus) -> Self {
        Self {
            status,
            objective_value: None,
            assignment: None,
            solutions: 0,
            stats: SearchStats::default(),
            solve_time_ms: 0,
        }
    }

    /// Whether a feasible solution was found.
    pub fn is_solution_found(&self) -> bool {
        self.status.is_solution_found()
    }

    /// Value of a variable in the reported assignment.
    pub fn value(&self, var: impl Into<IntVar>) -> Option<i64> {
        self.assignment.as_ref().map(|a| a.value(var))
    }

    /// Value of a boolean variable in the reported assignment.
    pub fn bool_value(&self, var: BoolVar) -> Option<bool> {
        self.assignment.as_ref().map(|a| a.bool_value(var))
    }
}

/// Trait for CP solver implementations.
///
/// Implementors provide the actual constraint solving logic. This can wrap
/// an external engine or use the bundled [`BacktrackingSolver`]. Statuses are
/// reported as-is; no retry happens at this boundary.
pub trait CpSolver {
    /// Solves the model, calling `visitor` once per discovered solution.
    fn solve_with_visitor(
        &self,
        model: &CpModel,
        config: &SolverConfig,
        visitor: &mut dyn SolutionVisitor,
    ) -> CpSolution;

    /// Solves the model and returns the final solution only.
    fn solve(&self, model: &CpModel, config: &SolverConfig) -> CpSolution {
        self.solve_with_visitor(model, config, &mut |_: &Assignment| {})
    }
}

/// Depth-first search with bounds propagation.
///
/// Propagates every constraint to a fixpoint over interval domains, honours
/// enforcement literals in both directions, branches along the model's
/// decision strategies (then smallest domain first), tries hinted values
/// first, and runs branch-and-bound when the model has an objective.
///
/// # Limitations
///
/// - Domains are intervals: a value strictly inside a domain is only removed
///   once it becomes a bound
/// - No learning or restarts; performance depends on good decision strategies
#[derive(Debug, Clone, Copy, Default)]
pub struct BacktrackingSolver;

impl BacktrackingSolver {
    pub fn new() -> Self {
        Self
    }
}

impl CpSolver for BacktrackingSolver {
    fn solve_with_visitor(
        &self,
        model: &CpModel,
        config: &SolverConfig,
        visitor: &mut dyn SolutionVisitor,
    ) -> CpSolution {
        if let Err(e) = config.validate() {
            warn!(model = %model.name, error = %e, "invalid solver configuration");
            return CpSolution::empty(SolverStatus::ModelInvalid);
        }
        if let Err(e) = model.validate() {
            warn!(model = %model.name, error = %e, "invalid model");
            return CpSolution::empty(SolverStatus::ModelInvalid);
        }

        let start = Instant::now();
        let outcome = Search::new(model, config).run(visitor);
        let solve_time_ms = start.elapsed().as_millis() as u64;

        info!(
            model = %model.name,
            status = %outcome.status,
            solutions = outcome.solutions,
            nodes = outcome.stats.nodes,
            conflicts = outcome.stats.conflicts,
            solve_time_ms,
            "solve finished"
        );

        CpSolution {
            status: outcome.status,
            objective_value: outcome.objective_value,
            assignment: outcome.assignment,
            solutions: outcome.solutions,
            stats: outcome.stats,
            solve_time_ms,
        }
    }
}
