//! Constraint Programming (CP) framework.
//!
//! A small, domain-agnostic modeling layer over integer and boolean variables,
//! plus a bundled solver.
//!
//! # Key Components
//!
//! - **Variables**: [`IntVar`], [`BoolVar`], [`Literal`]: decision variables
//! - **Expressions**: [`LinearExpr`]: weighted sums with a constant
//! - **Constraints**: [`Constraint`]: linear relations, boolean clauses, modulo
//! - **Model**: [`CpModel`]: variables, constraints, objective, hints, strategies
//! - **Solver**: [`CpSolver`] trait, [`BacktrackingSolver`] implementation
//!
//! # Design
//!
//! Every constraint may carry enforcement literals ([`CpModel::only_enforce_if`]);
//! it then binds only while all of them are true. Builders keep handles into the
//! model and never own variables themselves.
//!
//! [`BacktrackingSolver`] runs bounds propagation and depth-first search. It is
//! complete on the bounded domains used here, but makes no attempt at the
//! clause learning of industrial engines; the [`CpSolver`] trait is the seam for
//! plugging one in.
//!
//! # References
//!
//! Rossi, van Beek & Walsh (2006), "Handbook of Constraint Programming"

mod config;
mod expr;
mod model;
mod search;
mod solver;
mod variables;

pub use config::SolverConfig;
pub use expr::LinearExpr;
pub use model::{
    Constraint, ConstraintId, CpModel, DecisionStrategy, Objective, Posted, Relation,
    ValueSelection, VariableSelection,
};
pub use solver::{
    Assignment, BacktrackingSolver, CpSolution, CpSolver, SearchStats, SolutionVisitor,
    SolverStatus,
};
pub use variables::{BoolVar, IntVar, Literal, Variable};
