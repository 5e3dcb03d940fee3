use sha2::{Digest, Sha256};
use std::path::Path;

use crate::node::SceneNode;

/// Errors from rendering or writing a scene document.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A finished scene graph, ready to be written for the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDocument {
    root: SceneNode,
}

impl SceneDocument {
    pub fn new(root: SceneNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &SceneNode {
        &self.root
    }

    /// Two-space indented JSON without a trailing newline.
    pub fn to_pretty_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(&self.root)?)
    }

    /// Hex SHA-256 of the pretty-printed bytes.
    pub fn digest(&self) -> Result<String, SceneError> {
        let json = self.to_pretty_json()?;
        Ok(format!("{:x}", Sha256::digest(json.as_bytes())))
    }

    /// Write the document to `path`, replacing any existing file. Returns the
    /// number of bytes written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<usize, SceneError> {
        let path = path.as_ref();
        let json = self.to_pretty_json()?;
        std::fs::write(path, json.as_bytes())?;
        tracing::debug!(path = %path.display(), bytes = json.len(), "scene document written");
        Ok(json.len())
    }
}
