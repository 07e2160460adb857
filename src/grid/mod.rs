//! Grid layout, cell variables, region labels and the flow graph.
//!
//! # Key Types
//!
//! - [`GridLayout`]: validated region ids and highlight mask
//! - [`HintGrid`]: optional known digits
//! - [`CellGrid`]: per-cell tiled, value and digit variables
//! - [`RegionLabels`]: one label per region, touching regions differ
//! - [`FlowGraph`]: flow edges and the cell invariants built on them
//!
//! Components refer to cells by `(row, col)` and hold model handles only;
//! the [`CpModel`](crate::cp::CpModel) owns every variable.

mod cells;
mod flow;
mod labels;
mod layout;

pub use cells::{CellGrid, CellVars};
pub use flow::{FlowEdge, FlowGraph};
pub use labels::RegionLabels;
pub use layout::{GridLayout, HintGrid};
