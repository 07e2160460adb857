//! Error types.
//!
//! Construction-time problems are reported as errors. Anything the solver
//! decides (infeasibility, repeated numbers, unsatisfiable predicates) is a
//! solve status instead, never an error.

use thiserror::Error;

/// A malformed puzzle layout or an out-of-range reference into it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("grid has no cells")]
    EmptyGrid,

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error(
        "region grid is {}x{} but highlight grid is {}x{}",
        regions.0, regions.1, highlights.0, highlights.1
    )]
    DimensionMismatch {
        regions: (usize, usize),
        highlights: (usize, usize),
    },

    #[error("rows of {len} cells exceed the supported maximum of {max}")]
    RowTooLong { len: usize, max: usize },

    #[error("line {line}: unexpected token `{token}`")]
    Parse { line: usize, token: String },

    #[error("missing {0} block")]
    MissingBlock(&'static str),

    #[error("row {row} is outside a grid of {rows} rows")]
    RowOutOfRange { row: usize, rows: usize },

    #[error("cell ({row}, {col}) is outside the grid")]
    CellOutOfRange { row: usize, col: usize },

    #[error("{0} is not a decimal digit")]
    NotADigit(i64),
}

/// A structurally invalid CP model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("unknown variable handle #{0}")]
    UnknownVariable(usize),

    #[error("enforcement literals attached to unknown constraint #{0}")]
    UnknownConstraint(usize),

    #[error("variable `{name}` (#{index}) has an empty domain")]
    EmptyDomain { index: usize, name: String },

    #[error("literal over non-boolean variable #{0}")]
    NonBooleanLiteral(usize),

    #[error("modulus must be positive, got {0}")]
    NonPositiveModulus(i64),

    #[error("hint {value} lies outside the domain of `{name}`")]
    HintOutOfDomain { name: String, value: i64 },
}

/// A solved grid that breaks a puzzle rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    #[error("expected {expected} rows, found {found}")]
    RowCount { expected: usize, found: usize },

    #[error("row {row}: {number} does not satisfy {predicate}")]
    PredicateFailed {
        row: usize,
        number: u64,
        predicate: String,
    },

    #[error("{0} appears more than once")]
    Repeated(u64),

    #[error("row {row}: run of length 1 at column {col}")]
    ShortRun { row: usize, col: usize },

    #[error("row {row}: number does not fit in 64 bits")]
    NumberTooLarge { row: usize },
}
