//! Run variables and the predicate trait.

use crate::cp::{BoolVar, ConstraintId, CpModel, IntVar, LinearExpr, Literal};

/// The model handles of one run, most significant digit first.
#[derive(Debug, Clone, Copy)]
pub struct RunVars<'a> {
    /// Digit value variables.
    pub digits: &'a [IntVar],
    /// `indicators[pos][k]` holds when digit `pos` equals `k`.
    pub indicators: &'a [[BoolVar; 10]],
}

impl<'a> RunVars<'a> {
    pub fn new(digits: &'a [IntVar], indicators: &'a [[BoolVar; 10]]) -> Self {
        debug_assert_eq!(digits.len(), indicators.len());
        Self { digits, indicators }
    }

    /// Number of digits.
    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// `Σ digit · 10^place`.
    pub fn number(&self) -> LinearExpr {
        LinearExpr::number(self.digits)
    }

    /// Literal "digit `pos` equals `k`".
    pub fn indicator(&self, pos: usize, k: usize) -> Literal {
        self.indicators[pos][k].lit()
    }
}

/// Translates an arithmetic property of a run into model constraints.
///
/// Implementations may declare auxiliary variables and post unconditional
/// helper constraints. The returned constraints are the ones that carry the
/// property; the caller reifies each of them under the tiling pattern that
/// creates the run, so nothing returned may be dropped or merged.
///
/// Closures of the matching shape implement the trait:
///
/// ```
/// use number_cross::cp::{BoolVar, CpModel};
/// use number_cross::predicate::{RunPredicate, RunVars};
///
/// let starts_with_seven = |model: &mut CpModel, run: RunVars<'_>| {
///     vec![model.add_eq(run.digits[0], 7)]
/// };
///
/// let mut model = CpModel::new("run");
/// let digits = [model.new_int_var(0, 9, "d0"), model.new_int_var(0, 9, "d1")];
/// let indicators: [[BoolVar; 10]; 2] = [
///     std::array::from_fn(|k| model.new_bool_var(format!("d0={k}"))),
///     std::array::from_fn(|k| model.new_bool_var(format!("d1={k}"))),
/// ];
/// let posted = starts_with_seven.post(&mut model, RunVars::new(&digits, &indicators));
/// assert_eq!(posted.len(), 1);
/// ```
pub trait RunPredicate {
    /// Posts the property for `run` and returns the constraints to reify.
    fn post(&self, model: &mut CpModel, run: RunVars<'_>) -> Vec<ConstraintId>;
}

impl<F> RunPredicate for F
where
    F: Fn(&mut CpModel, RunVars<'_>) -> Vec<ConstraintId>,
{
    fn post(&self, model: &mut CpModel, run: RunVars<'_>) -> Vec<ConstraintId> {
        self(model, run)
    }
}
