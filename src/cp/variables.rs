//! CP variable types.
//!
//! Variables are declared inside a [`CpModel`](super::CpModel), which owns the
//! arena of [`Variable`] declarations. Callers only ever hold the lightweight
//! `Copy` handles defined here.

/// Declaration of a model variable: a name and an inclusive domain `[min, max]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    /// Variable name (for debugging and logging only).
    pub name: String,
    /// Minimum value.
    pub min: i64,
    /// Maximum value.
    pub max: i64,
}

impl Variable {
    /// Creates a new variable declaration with the given bounds.
    pub fn new(name: impl Into<String>, min: i64, max: i64) -> Self {
        Self {
            name: name.into(),
            min,
            max,
        }
    }

    /// Whether this variable is fixed to a single value.
    pub fn is_fixed(&self) -> bool {
        self.min == self.max
    }

    /// Domain size (max - min + 1), zero for an empty domain.
    pub fn domain_size(&self) -> i64 {
        (self.max - self.min + 1).max(0)
    }

    /// Whether the domain is exactly `{0, 1}`.
    pub fn is_boolean(&self) -> bool {
        self.min == 0 && self.max == 1
    }
}

/// Handle to an integer variable in a [`CpModel`](super::CpModel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IntVar(pub(crate) usize);

impl IntVar {
    /// Index of the variable in the model arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle to a boolean variable (an integer variable with domain `{0, 1}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoolVar(pub(crate) usize);

impl BoolVar {
    /// Index of the variable in the model arena.
    pub fn index(self) -> usize {
        self.0
    }

    /// The positive literal of this variable.
    pub fn lit(self) -> Literal {
        Literal {
            var: self,
            negated: false,
        }
    }

    /// This variable viewed as a 0/1 integer.
    pub fn as_int(self) -> IntVar {
        IntVar(self.0)
    }
}

impl std::ops::Not for BoolVar {
    type Output = Literal;

    fn not(self) -> Literal {
        Literal {
            var: self,
            negated: true,
        }
    }
}

impl From<BoolVar> for IntVar {
    fn from(b: BoolVar) -> Self {
        b.as_int()
    }
}

/// A boolean variable or its negation.
///
/// Used as enforcement condition and as operand of boolean group constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Literal {
    /// Underlying variable.
    pub var: BoolVar,
    /// Whether the literal is the negation of `var`.
    pub negated: bool,
}

impl Literal {
    /// The opposite literal.
    pub fn negate(self) -> Self {
        Self {
            var: self.var,
            negated: !self.negated,
        }
    }

    /// The value the underlying variable takes when this literal is true.
    pub fn true_value(self) -> i64 {
        if self.negated {
            0
        } else {
            1
        }
    }
}

impl std::ops::Not for Literal {
    type Output = Literal;

    fn not(self) -> Literal {
        self.negate()
    }
}

impl From<BoolVar> for Literal {
    fn from(b: BoolVar) -> Self {
        b.lit()
    }
}
