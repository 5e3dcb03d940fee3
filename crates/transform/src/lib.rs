//! Grid-to-scene transformation.
//!
//! A [`GridTransformer`] turns a [`LevelDescriptor`](tilescene_level::LevelDescriptor)
//! into a [`SceneDocument`](tilescene_scene::SceneDocument) under one
//! [`VariantProfile`]. The pipeline runs in three passes:
//!
//! 1. **Classify**: walls next to open cells are re-tagged as wall-faces or
//!    half-walls ([`convert_wall_tiles`]).
//! 2. **Synthesize**: each cell becomes a positioned node in the `tiles`
//!    layer, with floor underlays where the tile shows the floor; spawn cells
//!    and enemy placements fill the `enemies` layer.
//! 3. **Decorate**: explicit decorations, or grass scattered with a seeded
//!    RNG when the profile asks for it.
//!
//! # Invariants
//! - Child keys are unique within each layer.
//! - Layer children follow row-major layout order, then placement order.
//! - With the same level, profile and seed the output is byte-identical.
//! - Every tile id reaching synthesis is in the profile's tile table; unknown
//!   ids are reported, never rendered as defaults.

mod classify;
mod decor;
mod profile;
mod synth;

pub use classify::convert_wall_tiles;
pub use decor::{Placement, scatter_grass, scatter_rng};
pub use profile::{
    GrassScatter, KeyScheme, NodeStyle, PlacementConvention, ProfileError, RetagSlot, TileKind,
    TileDef, TileTable, VariantProfile, VerticalConvention, WallRetag,
};
pub use synth::{GridTransformer, TransformError};

pub fn crate_info() -> &'static str {
    "tilescene-transform v0.1.0"
}
