//! Level descriptors: the JSON input of the converter.
//!
//! # Invariants
//! - A loaded descriptor always satisfies `layout.len() == width * height`.
//! - Descriptors are immutable once loaded; the transform only reads them.

mod descriptor;

pub use descriptor::{LevelDescriptor, LevelError, LevelId};

pub fn crate_info() -> &'static str {
    "tilescene-level v0.1.0"
}
