//! Linear expressions over model variables.

use super::variables::{BoolVar, IntVar};
use std::ops::{Add, Mul, Neg, Sub};

/// A linear expression `Σ coef·var + constant`.
///
/// # Examples
///
/// ```
/// use number_cross::cp::{CpModel, LinearExpr};
///
/// let mut model = CpModel::new("expr");
/// let x = model.new_int_var(0, 9, "x");
/// let y = model.new_int_var(0, 9, "y");
///
/// let e = LinearExpr::from(x) * 10 + y - 3;
/// assert_eq!(e.constant, -3);
/// assert_eq!(e.evaluate(|v| if v == x { 4 } else { 2 }), 39);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinearExpr {
    /// `(coefficient, variable)` pairs. A variable may appear more than once.
    pub terms: Vec<(i64, IntVar)>,
    /// Constant offset.
    pub constant: i64,
}

impl LinearExpr {
    /// The empty expression (evaluates to zero).
    pub fn new() -> Self {
        Self::default()
    }

    /// A constant expression.
    pub fn constant(value: i64) -> Self {
        Self {
            terms: Vec::new(),
            constant: value,
        }
    }

    /// A single weighted term.
    pub fn term(var: impl Into<IntVar>, coef: i64) -> Self {
        Self {
            terms: vec![(coef, var.into())],
            constant: 0,
        }
    }

    /// The plain sum of the given variables.
    pub fn sum<V, I>(vars: I) -> Self
    where
        V: Into<IntVar>,
        I: IntoIterator<Item = V>,
    {
        Self {
            terms: vars.into_iter().map(|v| (1, v.into())).collect(),
            constant: 0,
        }
    }

    /// `Σ coef·var` over the given pairs.
    pub fn weighted_sum<V, I>(pairs: I) -> Self
    where
        V: Into<IntVar>,
        I: IntoIterator<Item = (i64, V)>,
    {
        Self {
            terms: pairs.into_iter().map(|(c, v)| (c, v.into())).collect(),
            constant: 0,
        }
    }

    /// Big-endian decimal number formed by `digits`: the first variable
    /// carries place value `10^(n-1)`, the last carries `1`.
    pub fn number(digits: &[IntVar]) -> Self {
        let n = digits.len() as u32;
        Self::weighted_sum(
            digits
                .iter()
                .enumerate()
                .map(|(i, &d)| (10i64.pow(n - 1 - i as u32), d)),
        )
    }

    /// Appends a term in place.
    pub fn add_term(&mut self, var: impl Into<IntVar>, coef: i64) -> &mut Self {
        self.terms.push((coef, var.into()));
        self
    }

    /// Whether the expression has no variable terms.
    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }

    /// Evaluates the expression under an assignment.
    pub fn evaluate(&self, value: impl Fn(IntVar) -> i64) -> i64 {
        self.terms
            .iter()
            .fold(self.constant, |acc, &(c, v)| acc + c * value(v))
    }

    /// Iterates over the variables referenced by the expression.
    pub fn vars(&self) -> impl Iterator<Item = IntVar> + '_ {
        self.terms.iter().map(|&(_, v)| v)
    }
}

impl From<IntVar> for LinearExpr {
    fn from(v: IntVar) -> Self {
        Self::term(v, 1)
    }
}

impl From<BoolVar> for LinearExpr {
    fn from(b: BoolVar) -> Self {
        Self::term(b, 1)
    }
}

impl From<i64> for LinearExpr {
    fn from(c: i64) -> Self {
        Self::constant(c)
    }
}

impl Add for LinearExpr {
    type Output = LinearExpr;

    fn add(mut self, rhs: LinearExpr) -> LinearExpr {
        self.terms.extend(rhs.terms);
        self.constant += rhs.constant;
        self
    }
}

impl Add<IntVar> for LinearExpr {
    type Output = LinearExpr;

    fn add(mut self, rhs: IntVar) -> LinearExpr {
        self.terms.push((1, rhs));
        self
    }
}

impl Add<i64> for LinearExpr {
    type Output = LinearExpr;

    fn add(mut self, rhs: i64) -> LinearExpr {
        self.constant += rhs;
        self
    }
}

impl Sub for LinearExpr {
    type Output = LinearExpr;

    fn sub(self, rhs: LinearExpr) -> LinearExpr {
        self + (-rhs)
    }
}

impl Sub<IntVar> for LinearExpr {
    type Output = LinearExpr;

    fn sub(mut self, rhs: IntVar) -> LinearExpr {
        self.terms.push((-1, rhs));
        self
    }
}

impl Sub<i64> for LinearExpr {
    type Output = LinearExpr;

    fn sub(mut self, rhs: i64) -> LinearExpr {
        self.constant -= rhs;
        self
    }
}

impl Mul<i64> for LinearExpr {
    type Output = LinearExpr;

    fn mul(mut self, k: i64) -> LinearExpr {
        for term in &mut self.terms {
            term.0 *= k;
        }
        self.constant *= k;
        self
    }
}

impl Neg for LinearExpr {
    type Output = LinearExpr;

    fn neg(self) -> LinearExpr {
        self * -1
    }
}
