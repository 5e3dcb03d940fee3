//! Converter profiles: every difference between the level converters lives
//! here as data, so one pipeline serves all of them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tilescene_common::TileId;
use tilescene_scene::Variables;

/// Errors from building or loading a profile.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unknown built-in profile {0:?}")]
    UnknownBuiltin(String),
    #[error("tile {0} is listed more than once")]
    DuplicateTile(TileId),
    #[error("{role} tile {id} is not in the tile table")]
    MissingTile { role: &'static str, id: TileId },
    #[error("wall-face tile {0} shows floor and has a backing; both would use the -floor key")]
    FloorKeyCollision(TileId),
    #[error("grass probability {0} is outside [0, 1]")]
    Probability(f64),
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },
}

/// What a tile id means. Decides the engine node type and the widget
/// variables of the tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Floor,
    Wall,
    HalfWall,
    WallFace,
    Basic,
    Grass,
    Door,
    VerticalDoor,
    EnemySpawn,
}

impl TileKind {
    /// Engine class used for textured tiles.
    pub fn node_type(self) -> &'static str {
        match self {
            TileKind::Wall | TileKind::HalfWall | TileKind::WallFace => "Wall",
            TileKind::Door | TileKind::VerticalDoor => "Door",
            TileKind::Floor | TileKind::Basic | TileKind::Grass | TileKind::EnemySpawn => {
                "BasicTile"
            }
        }
    }

    /// Widget variables for a tile of this kind in layout row `row`.
    ///
    /// Door pillars sit one row above and below a vertical door, so their
    /// priorities are offset from the laser's.
    pub fn variables(self, row: usize) -> Variables {
        let row = row as i64;
        match self {
            TileKind::Floor => Variables::new(),
            TileKind::Door => Variables::new()
                .with("priority", row)
                .with("pillar-priority", row)
                .with("laser-priority", row),
            TileKind::VerticalDoor => Variables::new()
                .with("priority", row)
                .with("top-pillar-priority", row - 1)
                .with("bottom-pillar-priority", row + 1)
                .with("laser-priority", row),
            _ => Variables::new().with("priority", row),
        }
    }
}

/// One row of a tile table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TileDef {
    pub id: TileId,
    pub kind: TileKind,
    /// Render a floor underlay beneath this tile.
    #[serde(default)]
    pub shows_floor: bool,
    /// Vertical lift in unscaled pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_offset: Option<f64>,
}

impl TileDef {
    pub fn new(id: u32, kind: TileKind) -> Self {
        Self {
            id: TileId(id),
            kind,
            shows_floor: false,
            y_offset: None,
        }
    }

    pub fn showing_floor(mut self) -> Self {
        self.shows_floor = true;
        self
    }

    pub fn lifted(mut self, pixels: f64) -> Self {
        self.y_offset = Some(pixels);
        self
    }
}

/// Validated id → definition lookup.
#[derive(Debug, Clone, Default)]
pub struct TileTable {
    entries: BTreeMap<TileId, TileDef>,
}

impl TileTable {
    pub fn new(defs: &[TileDef]) -> Result<Self, ProfileError> {
        let mut entries = BTreeMap::new();
        for def in defs {
            if entries.insert(def.id, def.clone()).is_some() {
                return Err(ProfileError::DuplicateTile(def.id));
            }
        }
        Ok(Self { entries })
    }

    pub fn get(&self, id: TileId) -> Option<&TileDef> {
        self.entries.get(&id)
    }

    pub fn contains(&self, id: TileId) -> bool {
        self.entries.contains_key(&id)
    }

    fn require(&self, role: &'static str, id: TileId) -> Result<&TileDef, ProfileError> {
        self.get(id).ok_or(ProfileError::MissingTile { role, id })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Mapping from layout row to the engine's `y_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalConvention {
    /// `height - row`: row 0 lands on index `height`.
    HeightMinusRow,
    /// `height - row - 1`: rows map onto `0..height`.
    HeightMinusRowMinusOne,
}

impl VerticalConvention {
    pub fn y_index(self, row: usize, height: usize) -> i64 {
        let (row, height) = (row as i64, height as i64);
        match self {
            VerticalConvention::HeightMinusRow => height - row,
            VerticalConvention::HeightMinusRowMinusOne => height - row - 1,
        }
    }
}

/// Mapping from a placement's authored `y` to the engine's `y_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementConvention {
    HeightMinusY,
    Direct,
}

impl PlacementConvention {
    pub fn y_index(self, y: f64, height: usize) -> f64 {
        match self {
            PlacementConvention::HeightMinusY => height as f64 - y,
            PlacementConvention::Direct => y,
        }
    }
}

/// How per-cell child keys are spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyScheme {
    /// `tile-(row-col)`
    RowColumn,
    /// `tile-(col-y_index)`
    ColumnIndex,
}

/// Shape of the node emitted for a tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeStyle {
    /// A typed tile node carrying its own texture and priority.
    Textured { texture_prefix: String },
    /// A widget reference; the engine expands the widget with the variables.
    Widget { key_prefix: String },
}

/// Which slot receives a wall re-tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetagSlot {
    /// The wall cell itself.
    Current,
    /// The open cell that was inspected.
    Neighbor,
}

/// Wall-face / half-wall detection rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WallRetag {
    pub wall: TileId,
    pub wall_face: TileId,
    pub half_wall: TileId,
    pub slot: RetagSlot,
}

/// Random grass scattering used when a level lists no decorations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrassScatter {
    pub tile: TileId,
    pub probability: f64,
    #[serde(default = "default_grass_decoration")]
    pub decoration: String,
}

fn default_grass_decoration() -> String {
    "grass".into()
}

fn default_id_label() -> String {
    "level".into()
}

fn default_decoration_priority() -> f64 {
    0.5
}

/// Everything that distinguishes one converter from another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariantProfile {
    pub name: String,
    /// Word used for the level identifier in the root comment.
    #[serde(default = "default_id_label")]
    pub id_label: String,
    /// Pixel width and height of one cell.
    pub cell_size: [f64; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile_scale: Option<f64>,
    pub vertical: VerticalConvention,
    pub placement_vertical: PlacementConvention,
    pub keys: KeyScheme,
    pub style: NodeStyle,
    pub floor_tile: TileId,
    pub tiles: Vec<TileDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wall_retag: Option<WallRetag>,
    /// Tile drawn under a wall-face, keyed `-floor`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wall_face_backing: Option<TileId>,
    #[serde(default = "default_decoration_priority")]
    pub decoration_priority: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grass: Option<GrassScatter>,
}

impl VariantProfile {
    pub const BUILTIN_NAMES: [&'static str; 3] = ["anchored", "widget", "room"];

    /// Textured converter: 64px tiles at 0.6 scale, walls re-tagged in place.
    pub fn anchored() -> Self {
        const WALL_LIFT: f64 = 46.0;
        Self {
            name: "anchored".into(),
            id_label: "level".into(),
            cell_size: [64.0, 64.0],
            tile_scale: Some(0.6),
            vertical: VerticalConvention::HeightMinusRow,
            placement_vertical: PlacementConvention::HeightMinusY,
            keys: KeyScheme::RowColumn,
            style: NodeStyle::Textured {
                texture_prefix: "floor-tile-".into(),
            },
            floor_tile: TileId(0),
            tiles: vec![
                TileDef::new(0, TileKind::Floor),
                TileDef::new(1, TileKind::Wall).lifted(WALL_LIFT),
                TileDef::new(2, TileKind::Wall).showing_floor(),
                TileDef::new(3, TileKind::Wall).showing_floor(),
                TileDef::new(4, TileKind::Wall).showing_floor(),
                TileDef::new(5, TileKind::Basic),
                TileDef::new(6, TileKind::Basic),
                TileDef::new(7, TileKind::EnemySpawn).showing_floor(),
                TileDef::new(8, TileKind::Basic).showing_floor(),
                TileDef::new(9, TileKind::Basic).showing_floor(),
                TileDef::new(10, TileKind::HalfWall).lifted(WALL_LIFT),
                TileDef::new(11, TileKind::WallFace),
                TileDef::new(12, TileKind::Door),
            ],
            wall_retag: Some(WallRetag {
                wall: TileId(1),
                wall_face: TileId(11),
                half_wall: TileId(10),
                slot: RetagSlot::Current,
            }),
            wall_face_backing: Some(TileId(1)),
            decoration_priority: default_decoration_priority(),
            grass: None,
        }
    }

    /// Widget converter: 48px cells, enemies from placements, no re-tagging.
    ///
    /// Widget keys are expanded by the engine's templates, so the table only
    /// decides which ids get floor variables.
    pub fn widget() -> Self {
        let tiles = (0..=12)
            .map(|id| {
                let kind = if id == 1 {
                    TileKind::Floor
                } else {
                    TileKind::Basic
                };
                TileDef::new(id, kind)
            })
            .collect();
        Self {
            name: "widget".into(),
            id_label: "room".into(),
            cell_size: [48.0, 48.0],
            tile_scale: None,
            vertical: VerticalConvention::HeightMinusRow,
            placement_vertical: PlacementConvention::HeightMinusY,
            keys: KeyScheme::ColumnIndex,
            style: NodeStyle::Widget {
                key_prefix: "tile-".into(),
            },
            floor_tile: TileId(1),
            tiles,
            wall_retag: None,
            wall_face_backing: None,
            decoration_priority: default_decoration_priority(),
            grass: None,
        }
    }

    /// Room converter: widget tiles addressed as `tile-(row-col)`, doors,
    /// grass scattering and wall faces written into the open neighbor.
    pub fn room() -> Self {
        const WALL_LIFT: f64 = 24.0;
        Self {
            name: "room".into(),
            id_label: "room".into(),
            cell_size: [48.0, 48.0],
            tile_scale: None,
            vertical: VerticalConvention::HeightMinusRowMinusOne,
            placement_vertical: PlacementConvention::Direct,
            keys: KeyScheme::RowColumn,
            style: NodeStyle::Widget {
                key_prefix: "tile-".into(),
            },
            floor_tile: TileId(1),
            tiles: vec![
                TileDef::new(0, TileKind::Basic),
                TileDef::new(1, TileKind::Floor),
                TileDef::new(2, TileKind::Wall).lifted(WALL_LIFT),
                TileDef::new(3, TileKind::Grass),
                TileDef::new(4, TileKind::Door).showing_floor(),
                TileDef::new(5, TileKind::VerticalDoor).showing_floor(),
                TileDef::new(6, TileKind::HalfWall).lifted(WALL_LIFT),
                TileDef::new(7, TileKind::WallFace),
            ],
            wall_retag: Some(WallRetag {
                wall: TileId(2),
                wall_face: TileId(7),
                half_wall: TileId(6),
                slot: RetagSlot::Neighbor,
            }),
            wall_face_backing: Some(TileId(6)),
            decoration_priority: default_decoration_priority(),
            grass: Some(GrassScatter {
                tile: TileId(3),
                probability: 0.3,
                decoration: default_grass_decoration(),
            }),
        }
    }

    /// Look up a built-in profile by name.
    pub fn builtin(name: &str) -> Result<Self, ProfileError> {
        match name {
            "anchored" => Ok(Self::anchored()),
            "widget" => Ok(Self::widget()),
            "room" => Ok(Self::room()),
            other => Err(ProfileError::UnknownBuiltin(other.to_string())),
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ProfileError> {
        let profile: Self = serde_yaml::from_str(yaml)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Load and validate a profile from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let profile = Self::from_yaml_str(&data)?;
        tracing::debug!(path = %path.display(), name = %profile.name, "loaded profile");
        Ok(profile)
    }

    /// Multiplier applied to pixel values (1 when the profile has no scale).
    pub fn scale_factor(&self) -> f64 {
        self.tile_scale.unwrap_or(1.0)
    }

    /// Check internal consistency and build the tile table.
    pub fn validate(&self) -> Result<TileTable, ProfileError> {
        for (field, value) in [
            ("cell_size[0]", self.cell_size[0]),
            ("cell_size[1]", self.cell_size[1]),
            ("tile_scale", self.scale_factor()),
        ] {
            if value.is_nan() || value <= 0.0 {
                return Err(ProfileError::NonPositive { field, value });
            }
        }

        let table = TileTable::new(&self.tiles)?;
        table.require("floor", self.floor_tile)?;

        if let Some(retag) = &self.wall_retag {
            table.require("wall", retag.wall)?;
            table.require("half-wall", retag.half_wall)?;
            let face = table.require("wall-face", retag.wall_face)?;
            if face.shows_floor && self.wall_face_backing.is_some() {
                return Err(ProfileError::FloorKeyCollision(retag.wall_face));
            }
        }
        if let Some(backing) = self.wall_face_backing {
            table.require("wall-face backing", backing)?;
        }
        if let Some(grass) = &self.grass {
            table.require("grass", grass.tile)?;
            if !(0.0..=1.0).contains(&grass.probability) {
                return Err(ProfileError::Probability(grass.probability));
            }
        }
        Ok(table)
    }
}
