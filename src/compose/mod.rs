//! Constraint Composer.
//!
//! [`PuzzleModel`] ties the grid rules, the per-row tiling choice, the row
//! predicates and the global uniqueness rule into one [`CpModel`], and turns
//! solver assignments back into [`PuzzleSolution`]s.
//!
//! Every row has one indicator per tiling pattern, exactly one of which
//! holds. Anything that depends on where the runs of a row are (predicates,
//! uniqueness) is enforced by those indicators, so it only binds under the
//! pattern actually chosen.
//!
//! [`CpModel`]: crate::cp::CpModel

mod puzzle;
mod solution;

pub use puzzle::{PuzzleModel, UniquenessStats};
pub use solution::PuzzleSolution;
