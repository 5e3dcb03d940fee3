use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tilescene_common::{GridCoord, Num, PlacementInfo, TileId};

/// Errors from loading a level descriptor.
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },
    #[error("grid {width}x{height} has more cells than can be addressed")]
    GridTooLarge { width: usize, height: usize },
    #[error("layout has {actual} tiles, expected width*height = {expected}")]
    LayoutSize { expected: usize, actual: usize },
}

/// Identifier of a level or room. Usually an integer, but authored files
/// sometimes carry a fractional number or a name instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LevelId {
    Number(i64),
    Fraction(f64),
    Name(String),
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelId::Number(n) => write!(f, "{n}"),
            LevelId::Fraction(v) => write!(f, "{}", Num(*v)),
            LevelId::Name(s) => f.write_str(s),
        }
    }
}

/// A rectangular tile grid plus optional enemy and decoration placements.
///
/// The identifier is read from either `level` or `room`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDescriptor {
    #[serde(alias = "room")]
    pub level: LevelId,
    pub width: usize,
    pub height: usize,
    pub layout: Vec<TileId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decorations: Option<Vec<PlacementInfo>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enemies: Option<Vec<PlacementInfo>>,
}

impl LevelDescriptor {
    /// Build a descriptor in code. Fails on the same conditions as loading.
    pub fn new(
        level: LevelId,
        width: usize,
        height: usize,
        layout: Vec<TileId>,
    ) -> Result<Self, LevelError> {
        let descriptor = Self {
            level,
            width,
            height,
            layout,
            decorations: None,
            enemies: None,
        };
        descriptor.validate()?;
        Ok(descriptor)
    }

    pub fn with_enemies(mut self, enemies: Vec<PlacementInfo>) -> Self {
        self.enemies = Some(enemies);
        self
    }

    pub fn with_decorations(mut self, decorations: Vec<PlacementInfo>) -> Self {
        self.decorations = Some(decorations);
        self
    }

    /// Parse and validate a descriptor from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, LevelError> {
        let descriptor: Self = serde_json::from_str(json)?;
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Load and validate a descriptor from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let descriptor = Self::from_json_str(&data)?;
        tracing::debug!(
            path = %path.display(),
            level = %descriptor.level,
            width = descriptor.width,
            height = descriptor.height,
            "loaded level descriptor"
        );
        Ok(descriptor)
    }

    /// Check the grid shape against the layout length.
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.width == 0 || self.height == 0 {
            return Err(LevelError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }
        let expected = self
            .width
            .checked_mul(self.height)
            .ok_or(LevelError::GridTooLarge {
                width: self.width,
                height: self.height,
            })?;
        if self.layout.len() != expected {
            return Err(LevelError::LayoutSize {
                expected,
                actual: self.layout.len(),
            });
        }
        Ok(())
    }

    /// Row/column of a flat layout index.
    pub fn coord(&self, index: usize) -> GridCoord {
        GridCoord::from_index(index, self.width)
    }

    pub fn enemies(&self) -> &[PlacementInfo] {
        self.enemies.as_deref().unwrap_or_default()
    }

    pub fn decorations(&self) -> Option<&[PlacementInfo]> {
        self.decorations.as_deref()
    }
}
