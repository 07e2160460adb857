//! Tiling Enumerator.
//!
//! A row is tiled by blanking some of its cells. Tiles must be separated by
//! at least two digit cells, and every maximal digit stretch (a [`Run`]) must
//! hold at least two digits. [`enumerate`] lists every such pattern for a row
//! length; the result depends on the length alone, so [`TilingCache`] shares
//! it between rows and models.
//!
//! With the `parallel` feature, mask filtering runs on the rayon pool. The
//! output order does not change.

mod enumerate;
mod types;

pub use enumerate::{enumerate, TilingCache, MAX_ROW_LEN};
pub use types::{Run, TilingPattern};
