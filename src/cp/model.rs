//! CP model definition.

use super::expr::LinearExpr;
use super::variables::{BoolVar, IntVar, Literal, Variable};
use crate::error::ModelError;

/// Comparison used by a linear constraint `expr <relation> rhs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// `expr == rhs`
    Eq,
    /// `expr != rhs`
    Ne,
    /// `expr <= rhs`
    Le,
    /// `expr >= rhs`
    Ge,
}

/// A constraint in the CP model.
///
/// Every variant can be reified through the enforcement literals of the
/// [`Posted`] entry that wraps it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Linear (in)equality: `expr <relation> rhs`.
    Linear {
        expr: LinearExpr,
        relation: Relation,
        rhs: i64,
    },

    /// At least one literal is true.
    ///
    /// An empty list is unsatisfiable whenever the constraint is enforced.
    BoolOr { literals: Vec<Literal> },

    /// Exactly one literal is true.
    ExactlyOne { literals: Vec<Literal> },

    /// At most one literal is true.
    AtMostOne { literals: Vec<Literal> },

    /// `target == var mod modulus` (Euclidean remainder, `modulus > 0`).
    Modulo {
        target: IntVar,
        var: IntVar,
        modulus: i64,
    },
}

impl Constraint {
    /// Variables read by the constraint body (enforcement excluded).
    pub fn vars(&self) -> Vec<IntVar> {
        match self {
            Constraint::Linear { expr, .. } => expr.vars().collect(),
            Constraint::BoolOr { literals }
            | Constraint::ExactlyOne { literals }
            | Constraint::AtMostOne { literals } => {
                literals.iter().map(|l| l.var.as_int()).collect()
            }
            Constraint::Modulo { target, var, .. } => vec![*target, *var],
        }
    }
}

/// A constraint together with the literals that must all hold for it to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posted {
    /// The constraint body.
    pub constraint: Constraint,
    /// Enforcement literals (empty = always enforced).
    pub enforcement: Vec<Literal>,
}

/// Handle to a posted constraint, used to attach enforcement literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstraintId(pub(crate) usize);

impl ConstraintId {
    /// Index of the constraint in the model.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Objective function for the CP model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Objective {
    /// Minimize a linear expression.
    Minimize(LinearExpr),
    /// Maximize a linear expression.
    Maximize(LinearExpr),
}

impl Objective {
    /// The expression, oriented so that smaller is better.
    pub fn as_minimization(&self) -> LinearExpr {
        match self {
            Objective::Minimize(e) => e.clone(),
            Objective::Maximize(e) => -e.clone(),
        }
    }
}

/// Order in which a decision strategy visits its variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableSelection {
    /// First unfixed variable in declaration order.
    First,
    /// Unfixed variable with the smallest domain, ties by declaration order.
    MinDomain,
}

/// Value tried first when branching on a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSelection {
    /// Try the lower bound first.
    Min,
    /// Try the upper bound first.
    Max,
}

/// A search directive: branch on `vars` before anything not yet covered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionStrategy {
    pub vars: Vec<IntVar>,
    pub variable_selection: VariableSelection,
    pub value_selection: ValueSelection,
}

/// A constraint programming model.
///
/// Owns every variable declaration and constraint. Components that build the
/// model keep handles ([`IntVar`], [`BoolVar`], [`ConstraintId`]) only.
///
/// # Examples
///
/// ```
/// use number_cross::cp::{CpModel, LinearExpr};
///
/// let mut model = CpModel::new("example");
/// let x = model.new_int_var(0, 9, "x");
/// let b = model.new_bool_var("b");
/// let c = model.add_eq(LinearExpr::from(x), 3);
/// model.only_enforce_if(c, &[b.lit()]);
/// model.add_bool_or(&[b.lit()]);
/// assert!(model.validate().is_ok());
/// assert_eq!(model.constraint_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct CpModel {
    /// Model name.
    pub name: String,
    /// Variable arena, indexed by handle.
    pub variables: Vec<Variable>,
    /// Posted constraints, indexed by [`ConstraintId`].
    pub constraints: Vec<Posted>,
    /// Objective function.
    pub objective: Option<Objective>,
    /// Preferred values tried first by the search.
    pub hints: Vec<(IntVar, i64)>,
    /// Ordered search directives.
    pub strategies: Vec<DecisionStrategy>,
    /// Handles passed to [`CpModel::only_enforce_if`] that match no constraint.
    unknown_enforced: Vec<usize>,
}

impl CpModel {
    /// Creates a new empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
            constraints: Vec::new(),
            objective: None,
            hints: Vec::new(),
            strategies: Vec::new(),
            unknown_enforced: Vec::new(),
        }
    }

    /// Adds an integer variable with domain `[min, max]`.
    pub fn new_int_var(&mut self, min: i64, max: i64, name: impl Into<String>) -> IntVar {
        self.variables.push(Variable::new(name, min, max));
        IntVar(self.variables.len() - 1)
    }

    /// Adds a boolean variable.
    pub fn new_bool_var(&mut self, name: impl Into<String>) -> BoolVar {
        self.variables.push(Variable::new(name, 0, 1));
        BoolVar(self.variables.len() - 1)
    }

    /// Declaration of a variable.
    pub fn variable(&self, var: IntVar) -> Option<&Variable> {
        self.variables.get(var.0)
    }

    /// Adds a constraint and returns its handle.
    pub fn add_constraint(&mut self, constraint: Constraint) -> ConstraintId {
        self.constraints.push(Posted {
            constraint,
            enforcement: Vec::new(),
        });
        ConstraintId(self.constraints.len() - 1)
    }

    /// Adds `expr <relation> rhs`.
    pub fn add_linear(
        &mut self,
        expr: impl Into<LinearExpr>,
        relation: Relation,
        rhs: i64,
    ) -> ConstraintId {
        self.add_constraint(Constraint::Linear {
            expr: expr.into(),
            relation,
            rhs,
        })
    }

    /// Convenience: `expr == rhs`.
    pub fn add_eq(&mut self, expr: impl Into<LinearExpr>, rhs: i64) -> ConstraintId {
        self.add_linear(expr, Relation::Eq, rhs)
    }

    /// Convenience: `expr != rhs`.
    pub fn add_ne(&mut self, expr: impl Into<LinearExpr>, rhs: i64) -> ConstraintId {
        self.add_linear(expr, Relation::Ne, rhs)
    }

    /// Convenience: `expr <= rhs`.
    pub fn add_le(&mut self, expr: impl Into<LinearExpr>, rhs: i64) -> ConstraintId {
        self.add_linear(expr, Relation::Le, rhs)
    }

    /// Convenience: `expr >= rhs`.
    pub fn add_ge(&mut self, expr: impl Into<LinearExpr>, rhs: i64) -> ConstraintId {
        self.add_linear(expr, Relation::Ge, rhs)
    }

    /// Convenience: `lhs == rhs` for two expressions.
    pub fn add_equality(
        &mut self,
        lhs: impl Into<LinearExpr>,
        rhs: impl Into<LinearExpr>,
    ) -> ConstraintId {
        let lhs: LinearExpr = lhs.into();
        let rhs: LinearExpr = rhs.into();
        self.add_eq(lhs - rhs, 0)
    }

    /// Convenience: `lhs != rhs` for two expressions.
    pub fn add_different(
        &mut self,
        lhs: impl Into<LinearExpr>,
        rhs: impl Into<LinearExpr>,
    ) -> ConstraintId {
        let lhs: LinearExpr = lhs.into();
        let rhs: LinearExpr = rhs.into();
        self.add_ne(lhs - rhs, 0)
    }

    /// At least one of `literals` holds.
    pub fn add_bool_or(&mut self, literals: &[Literal]) -> ConstraintId {
        self.add_constraint(Constraint::BoolOr {
            literals: literals.to_vec(),
        })
    }

    /// Exactly one of `literals` holds.
    pub fn add_exactly_one(&mut self, literals: &[Literal]) -> ConstraintId {
        self.add_constraint(Constraint::ExactlyOne {
            literals: literals.to_vec(),
        })
    }

    /// At most one of `literals` holds.
    pub fn add_at_most_one(&mut self, literals: &[Literal]) -> ConstraintId {
        self.add_constraint(Constraint::AtMostOne {
            literals: literals.to_vec(),
        })
    }

    /// `target == var mod modulus`.
    pub fn add_modulo_equality(
        &mut self,
        target: IntVar,
        var: IntVar,
        modulus: i64,
    ) -> ConstraintId {
        self.add_constraint(Constraint::Modulo {
            target,
            var,
            modulus,
        })
    }

    /// Makes `id` apply only while every literal in `literals` holds.
    ///
    /// Literals accumulate across calls. An unknown `id` is recorded and
    /// reported by [`CpModel::validate`].
    pub fn only_enforce_if(&mut self, id: ConstraintId, literals: &[Literal]) {
        match self.constraints.get_mut(id.0) {
            Some(posted) => posted.enforcement.extend_from_slice(literals),
            None => self.unknown_enforced.push(id.0),
        }
    }

    /// Sets the objective to minimize `expr`.
    pub fn minimize(&mut self, expr: impl Into<LinearExpr>) {
        self.objective = Some(Objective::Minimize(expr.into()));
    }

    /// Sets the objective to maximize `expr`.
    pub fn maximize(&mut self, expr: impl Into<LinearExpr>) {
        self.objective = Some(Objective::Maximize(expr.into()));
    }

    /// Sets the objective function.
    pub fn set_objective(&mut self, objective: Objective) {
        self.objective = Some(objective);
    }

    /// Suggests `value` for `var`; the search tries it first.
    pub fn add_hint(&mut self, var: impl Into<IntVar>, value: i64) {
        self.hints.push((var.into(), value));
    }

    /// Appends a decision strategy. Strategies are consulted in insertion order.
    pub fn add_decision_strategy(
        &mut self,
        vars: Vec<IntVar>,
        variable_selection: VariableSelection,
        value_selection: ValueSelection,
    ) {
        self.strategies.push(DecisionStrategy {
            vars,
            variable_selection,
            value_selection,
        });
    }

    /// Validates the model for consistency.
    ///
    /// Checks that every referenced variable exists, every domain is
    /// non-empty, literals refer to boolean variables, moduli are positive and
    /// hints lie inside their domains.
    pub fn validate(&self) -> Result<(), ModelError> {
        if let Some(&id) = self.unknown_enforced.first() {
            return Err(ModelError::UnknownConstraint(id));
        }
        for (index, var) in self.variables.iter().enumerate() {
            if var.min > var.max {
                return Err(ModelError::EmptyDomain {
                    index,
                    name: var.name.clone(),
                });
            }
        }

        let check_var = |v: IntVar| -> Result<(), ModelError> {
            if v.0 < self.variables.len() {
                Ok(())
            } else {
                Err(ModelError::UnknownVariable(v.0))
            }
        };
        let check_lit = |l: &Literal| -> Result<(), ModelError> {
            check_var(l.var.as_int())?;
            if self.variables[l.var.0].is_boolean() {
                Ok(())
            } else {
                Err(ModelError::NonBooleanLiteral(l.var.0))
            }
        };

        for posted in &self.constraints {
            for lit in &posted.enforcement {
                check_lit(lit)?;
            }
            match &posted.constraint {
                Constraint::Linear { expr, .. } => {
                    for v in expr.vars() {
                        check_var(v)?;
                    }
                }
                Constraint::BoolOr { literals }
                | Constraint::ExactlyOne { literals }
                | Constraint::AtMostOne { literals } => {
                    for lit in literals {
                        check_lit(lit)?;
                    }
                }
                Constraint::Modulo {
                    target,
                    var,
                    modulus,
                } => {
                    check_var(*target)?;
                    check_var(*var)?;
                    if *modulus <= 0 {
                        return Err(ModelError::NonPositiveModulus(*modulus));
                    }
                }
            }
        }

        if let Some(objective) = &self.objective {
            for v in objective.as_minimization().vars() {
                check_var(v)?;
            }
        }

        for &(var, value) in &self.hints {
            check_var(var)?;
            let decl = &self.variables[var.0];
            if value < decl.min || value > decl.max {
                return Err(ModelError::HintOutOfDomain {
                    name: decl.name.clone(),
                    value,
                });
            }
        }

        for strategy in &self.strategies {
            for &v in &strategy.vars {
                check_var(v)?;
            }
        }

        Ok(())
    }

    /// Returns the number of variables.
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Returns the number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }
}
