//! Shared value types for the tilescene workspace.
//!
//! # Invariants
//! - Grid layouts are row-major; a flat index maps to `(index / width, index % width)`.
//! - Values here carry no profile-specific meaning. A `TileId` is opaque until
//!   a tile table interprets it.
//! - `Num` renders identically through `Display` and `Serialize`.

mod num;
mod types;

pub use num::Num;
pub use types::{GridCoord, PlacementInfo, TileId};

pub fn crate_info() -> &'static str {
    "tilescene-common v0.1.0"
}
