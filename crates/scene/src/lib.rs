//! Scene graph output model.
//!
//! # Invariants
//! - Serialized field order is fixed: `comments`, `type`, `format`, `data`,
//!   `layout`, `children`.
//! - Children keep insertion order.
//! - Numbers print the way the engine's JSON tooling prints them: integral
//!   values carry no fractional part.

mod document;
mod node;

pub use document::{SceneDocument, SceneError};
pub use node::{Anchor, Children, Format, NodeData, NodeLayout, SceneNode, Variables};
pub use tilescene_common::Num;

pub fn crate_info() -> &'static str {
    "tilescene-scene v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("scene"));
    }
}
