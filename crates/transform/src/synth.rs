use rand::Rng;
use tilescene_common::{GridCoord, TileId};
use tilescene_level::{LevelDescriptor, LevelError};
use tilescene_scene::{
    Anchor, Children, Format, NodeData, NodeLayout, Num, SceneDocument, SceneNode, Variables,
};

use crate::classify::convert_wall_tiles;
use crate::decor::{Placement, scatter_grass};
use crate::profile::{
    KeyScheme, NodeStyle, ProfileError, TileKind, TileDef, TileTable, VariantProfile,
};

/// Errors from transforming a level.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("invalid level: {0}")]
    Level(#[from] LevelError),
    #[error("tile {id} at layout index {index} is not in profile {profile:?}")]
    UnknownTile {
        id: TileId,
        index: usize,
        profile: String,
    },
}

/// Converts level descriptors into scene documents for one profile.
///
/// The transformer holds no per-level state; one instance converts any
/// number of levels.
#[derive(Debug, Clone)]
pub struct GridTransformer {
    profile: VariantProfile,
    table: TileTable,
}

impl GridTransformer {
    /// Validate `profile` and build a transformer for it.
    pub fn new(profile: VariantProfile) -> Result<Self, ProfileError> {
        let table = profile.validate()?;
        Ok(Self { profile, table })
    }

    pub fn profile(&self) -> &VariantProfile {
        &self.profile
    }

    /// The neighbor-classification pass: the layout with wall-faces and
    /// half-walls tagged, or the layout unchanged when the profile has no
    /// re-tag rule.
    pub fn classify(&self, level: &LevelDescriptor) -> Vec<TileId> {
        match &self.profile.wall_retag {
            Some(rule) => convert_wall_tiles(&level.layout, level.width, level.height, rule),
            None => level.layout.clone(),
        }
    }

    /// Build the scene document for `level`.
    ///
    /// `rng` is only consulted when the level has no decoration list and the
    /// profile scatters grass.
    pub fn transform<R: Rng + ?Sized>(
        &self,
        level: &LevelDescriptor,
        rng: &mut R,
    ) -> Result<SceneDocument, TransformError> {
        let _span = tracing::info_span!(
            "transform",
            profile = %self.profile.name,
            level = %level.level
        )
        .entered();

        level.validate()?;
        self.check_tiles(level)?;
        let derived = self.classify(level);

        let mut children = Children::new();
        let tiles = self.tiles_layer(level, &derived);
        let enemies = self.enemies_layer(level, &derived);
        tracing::debug!(tiles = tiles.len(), enemies = enemies.len(), "layers built");
        children.push("tiles", self.layer(level, tiles));
        children.push("enemies", self.layer(level, enemies));
        if let Some(decorations) = self.decorations_layer(level, &derived, rng) {
            tracing::debug!(decorations = decorations.len(), "decorations built");
            children.push("decorations", self.layer(level, decorations));
        }

        let root = SceneNode::new("Node")
            .with_comments(format!(
                "This is the root node for the world scene for {} {}.",
                self.profile.id_label, level.level
            ))
            .with_format(Format::Anchored)
            .with_layout(NodeLayout::anchored(Anchor::Left, Anchor::Bottom))
            .with_children(children);
        let document = SceneDocument::new(root);
        tracing::info!(nodes = document.root().node_count(), "level transformed");
        Ok(document)
    }

    fn check_tiles(&self, level: &LevelDescriptor) -> Result<(), TransformError> {
        match level
            .layout
            .iter()
            .position(|id| !self.table.contains(*id))
        {
            Some(index) => Err(TransformError::UnknownTile {
                id: level.layout[index],
                index,
                profile: self.profile.name.clone(),
            }),
            None => Ok(()),
        }
    }

    fn def(&self, id: TileId) -> &TileDef {
        // Layout ids are checked up front and derived ids during validation.
        self.table
            .get(id)
            .unwrap_or_else(|| unreachable!("tile {id} passed validation"))
    }

    fn tiles_layer(&self, level: &LevelDescriptor, derived: &[TileId]) -> Children {
        let floor = self.def(self.profile.floor_tile);
        let backing = self.profile.wall_face_backing.map(|id| self.def(id));
        let mut children = Children::new();

        for (index, &id) in derived.iter().enumerate() {
            let coord = level.coord(index);
            let def = self.def(id);
            let key = self.cell_key("tile", coord, level.height);

            if def.shows_floor {
                children.push(
                    format!("{key}-floor"),
                    self.cell_node(coord, level.height, self.tile_node(floor, 0)),
                );
                // Spawn points only need the floor; the enemy itself lives
                // in the enemies layer.
                if def.kind == TileKind::EnemySpawn || id == self.profile.floor_tile {
                    continue;
                }
            }

            if def.kind == TileKind::WallFace {
                if let Some(backing) = backing {
                    children.push(
                        format!("{key}-floor"),
                        self.cell_node(coord, level.height, self.tile_node(backing, coord.row)),
                    );
                }
            }

            children.push(
                key,
                self.cell_node(coord, level.height, self.tile_node(def, coord.row)),
            );
        }
        children
    }

    fn enemies_layer(&self, level: &LevelDescriptor, derived: &[TileId]) -> Children {
        let floor = self.def(self.profile.floor_tile);
        let mut children = Children::new();

        for (index, &id) in derived.iter().enumerate() {
            if self.def(id).kind != TileKind::EnemySpawn {
                continue;
            }
            let coord = level.coord(index);
            children.push(
                self.cell_key("enemy", coord, level.height),
                self.cell_node(coord, level.height, self.tile_node(floor, 0)),
            );
        }

        for (index, info) in level.enemies().iter().enumerate() {
            let placement = Placement::resolve(info, self.profile.placement_vertical, level.height);
            children.push(
                placement_key("enemy", &placement, index),
                SceneNode::new(placement.kind.as_str())
                    .with_layout(NodeLayout::cell(placement.x_index, placement.y_index)),
            );
        }
        children
    }

    fn decorations_layer<R: Rng + ?Sized>(
        &self,
        level: &LevelDescriptor,
        derived: &[TileId],
        rng: &mut R,
    ) -> Option<Children> {
        let placements: Vec<Placement> = match (level.decorations(), &self.profile.grass) {
            (Some(explicit), _) => explicit
                .iter()
                .map(|info| Placement::resolve(info, self.profile.placement_vertical, level.height))
                .collect(),
            (None, Some(rule)) => scatter_grass(
                derived,
                level.width,
                level.height,
                rule,
                self.profile.vertical,
                rng,
            ),
            (None, None) => return None,
        };

        let mut children = Children::new();
        for (index, placement) in placements.iter().enumerate() {
            children.push(
                placement_key("decoration", placement, index),
                self.decoration_node(placement),
            );
        }
        Some(children)
    }

    /// A grid layer holding one kind of child.
    fn layer(&self, level: &LevelDescriptor, children: Children) -> SceneNode {
        let [cell_w, cell_h] = self.profile.cell_size;
        let size = match self.profile.tile_scale {
            Some(scale) => [
                cell_w * level.width as f64 * scale,
                cell_h * level.height as f64 * scale,
            ],
            None => [cell_w * level.width as f64, cell_h * level.height as f64],
        };
        SceneNode::new("Node")
            .with_format(Format::Grid {
                width: level.width,
                height: level.height,
            })
            .with_data(NodeData {
                anchor: Some([Num(0.0), Num(0.0)]),
                size: Some(size.map(Num)),
                ..NodeData::default()
            })
            // The engine's grid layout reads these swapped.
            .with_layout(NodeLayout::anchored(Anchor::Bottom, Anchor::Left))
            .with_children(children)
    }

    fn cell_key(&self, prefix: &str, coord: GridCoord, height: usize) -> String {
        match self.profile.keys {
            KeyScheme::RowColumn => format!("{prefix}-({}-{})", coord.row, coord.col),
            KeyScheme::ColumnIndex => format!(
                "{prefix}-({}-{})",
                coord.col,
                self.profile.vertical.y_index(coord.row, height)
            ),
        }
    }

    /// Anchored wrapper positioning `tile` on its grid cell.
    fn cell_node(&self, coord: GridCoord, height: usize, tile: SceneNode) -> SceneNode {
        let y_index = self.profile.vertical.y_index(coord.row, height);
        let mut children = Children::new();
        children.push("tile", tile);
        SceneNode::new("Node")
            .with_format(Format::Anchored)
            .with_layout(NodeLayout::cell(coord.col, y_index))
            .with_children(children)
    }

    fn tile_node(&self, def: &TileDef, row: usize) -> SceneNode {
        let y_offset = def
            .y_offset
            .map(|pixels| Num(pixels * self.profile.scale_factor()));

        match &self.profile.style {
            NodeStyle::Textured { texture_prefix } => {
                let priority = if def.id == self.profile.floor_tile { 0 } else { row };
                SceneNode::new(def.kind.node_type())
                    .with_format(Format::Anchored)
                    .with_data(NodeData {
                        texture: Some(format!("{texture_prefix}{}", def.id)),
                        anchor: Some([Num(0.0), Num(0.0)]),
                        scale: self.profile.tile_scale.map(Num),
                        priority: Some(priority.into()),
                        ..NodeData::default()
                    })
                    .with_layout(NodeLayout {
                        absolute: Some(true),
                        y_offset,
                        ..NodeLayout::anchored(Anchor::Left, Anchor::Bottom)
                    })
            }
            NodeStyle::Widget { key_prefix } => {
                let node = SceneNode::new("Widget").with_data(NodeData {
                    key: Some(format!("{key_prefix}{}", def.id)),
                    variables: Some(def.kind.variables(row)),
                    ..NodeData::default()
                });
                match y_offset {
                    Some(y_offset) => node.with_layout(NodeLayout {
                        y_offset: Some(y_offset),
                        ..NodeLayout::default()
                    }),
                    None => node,
                }
            }
        }
    }

    fn decoration_node(&self, placement: &Placement) -> SceneNode {
        let priority = Num(self.profile.decoration_priority);
        let layout = NodeLayout::cell(placement.x_index, placement.y_index);
        match &self.profile.style {
            NodeStyle::Textured { .. } => SceneNode::new("Image")
                .with_data(NodeData {
                    texture: Some(format!("decoration-{}", placement.kind)),
                    anchor: Some([Num(0.0), Num(0.0)]),
                    scale: self.profile.tile_scale.map(Num),
                    priority: Some(priority),
                    ..NodeData::default()
                })
                .with_layout(layout),
            NodeStyle::Widget { .. } => SceneNode::new("Widget")
                .with_data(NodeData {
                    key: Some(format!("decoration-{}", placement.kind)),
                    variables: Some(Variables::new().with("priority", priority)),
                    ..NodeData::default()
                })
                .with_layout(layout),
        }
    }
}

/// `prefix-(x-y)-index`; the index keeps duplicate positions apart.
fn placement_key(prefix: &str, placement: &Placement, index: usize) -> String {
    format!(
        "{prefix}-({}-{})-{index}",
        Num(placement.x_index),
        Num(placement.y_index)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decor::scatter_rng;
    use serde_json::{Value, json};
    use std::collections::HashSet;
    use tilescene_common::PlacementInfo;
    use tilescene_level::LevelId;

    fn level(width: usize, height: usize, raw: &[u32]) -> LevelDescriptor {
        let layout = raw.iter().copied().map(TileId).collect();
        LevelDescriptor::new(LevelId::Number(1), width, height, layout).unwrap()
    }

    fn run(profile: VariantProfile, level: &LevelDescriptor) -> SceneDocument {
        GridTransformer::new(profile)
            .unwrap()
            .transform(level, &mut scatter_rng(Some(7)))
            .unwrap()
    }

    fn layer<'a>(doc: &'a SceneDocument, name: &str) -> &'a Children {
        doc.root()
            .child(name)
            .and_then(|l| l.children.as_ref())
            .unwrap()
    }

    fn value(node: &SceneNode) -> Value {
        serde_json::to_value(node).unwrap()
    }

    #[test]
    fn anchored_single_floor_matches_golden() {
        let doc = run(VariantProfile::anchored(), &level(1, 1, &[0]));
        let grid_header = r#"
      "type": "Node",
      "format": {
        "type": "Grid",
        "width": 1,
        "height": 1
      },
      "data": {
        "anchor": [
          0,
          0
        ],
        "size": [
          38.4,
          38.4
        ]
      },
      "layout": {
        "x_anchor": "bottom",
        "y_anchor": "left"
      },"#;
        let expected = format!(
            r#"{{
  "comments": "This is the root node for the world scene for level 1.",
  "type": "Node",
  "format": {{
    "type": "Anchored"
  }},
  "layout": {{
    "x_anchor": "left",
    "y_anchor": "bottom"
  }},
  "children": {{
    "tiles": {{{grid_header}
      "children": {{
        "tile-(0-0)": {{
          "type": "Node",
          "format": {{
            "type": "Anchored"
          }},
          "layout": {{
            "x_index": 0,
            "y_index": 1,
            "x_anchor": "left",
            "y_anchor": "bottom"
          }},
          "children": {{
            "tile": {{
              "type": "BasicTile",
              "format": {{
                "type": "Anchored"
              }},
              "data": {{
                "texture": "floor-tile-0",
                "anchor": [
                  0,
                  0
                ],
                "scale": 0.6,
                "priority": 0
              }},
              "layout": {{
                "x_anchor": "left",
                "y_anchor": "bottom",
                "absolute": true
              }}
            }}
          }}
        }}
      }}
    }},
    "enemies": {{{grid_header}
      "children": {{}}
    }}
  }}
}}"#
        );
        assert_eq!(doc.to_pretty_json().unwrap(), expected);
    }

    #[test]
    fn anchored_two_by_two_walls() {
        let level = level(2, 2, &[1, 0, 0, 1]);
        let transformer = GridTransformer::new(VariantProfile::anchored()).unwrap();
        assert_eq!(
            transformer.classify(&level),
            [TileId(11), TileId(0), TileId(0), TileId(10)]
        );

        let doc = transformer.transform(&level, &mut scatter_rng(Some(0))).unwrap();
        let tiles = layer(&doc, "tiles");
        let keys: Vec<_> = tiles.keys().collect();
        assert_eq!(
            keys,
            ["tile-(0-0)-floor", "tile-(0-0)", "tile-(0-1)", "tile-(1-0)", "tile-(1-1)"]
        );

        let backing = value(tiles.get("tile-(0-0)-floor").unwrap());
        assert_eq!(backing["layout"]["y_index"], json!(2));
        assert_eq!(backing["children"]["tile"]["type"], json!("Wall"));
        assert_eq!(backing["children"]["tile"]["data"]["texture"], json!("floor-tile-1"));
        assert_eq!(backing["children"]["tile"]["layout"]["y_offset"], json!(46.0 * 0.6));

        let face = value(tiles.get("tile-(0-0)").unwrap());
        assert_eq!(face["children"]["tile"]["data"]["texture"], json!("floor-tile-11"));
        assert!(face["children"]["tile"]["layout"].get("y_offset").is_none());

        let half = value(tiles.get("tile-(1-1)").unwrap());
        assert_eq!(half["layout"]["x_index"], json!(1));
        assert_eq!(half["layout"]["y_index"], json!(1));
        assert_eq!(half["children"]["tile"]["data"]["texture"], json!("floor-tile-10"));
        assert_eq!(half["children"]["tile"]["data"]["priority"], json!(1));

        let json = doc.to_pretty_json().unwrap();
        assert!(json.contains(r#""y_offset": 27.599999999999998"#));
        assert!(json.contains(r#""size": [
          76.8,
          76.8
        ]"#));
    }

    #[test]
    fn floor_underlays_and_spawn_markers() {
        let level = level(3, 2, &[2, 3, 7, 8, 9, 5]);
        let doc = run(VariantProfile::anchored(), &level);
        let tiles = layer(&doc, "tiles");

        let underlays: Vec<_> = tiles.keys().filter(|k| k.ends_with("-floor")).collect();
        assert_eq!(underlays.len(), 5);
        for key in &underlays {
            let node = value(tiles.get(key).unwrap());
            assert_eq!(node["children"]["tile"]["data"]["texture"], json!("floor-tile-0"));
            assert_eq!(node["children"]["tile"]["data"]["priority"], json!(0));
            let primary = key.trim_end_matches("-floor");
            if primary != "tile-(0-2)" {
                let sibling = value(tiles.get(primary).unwrap());
                assert_eq!(sibling["layout"], node["layout"]);
            }
        }
        // The spawn cell keeps only its floor.
        assert!(tiles.get("tile-(0-2)").is_none());
        assert_eq!(tiles.len(), 10);

        let enemies = layer(&doc, "enemies");
        let keys: Vec<_> = enemies.keys().collect();
        assert_eq!(keys, ["enemy-(0-2)"]);
        let marker = value(enemies.get("enemy-(0-2)").unwrap());
        assert_eq!(marker["layout"]["y_index"], json!(2));
        assert_eq!(marker["children"]["tile"]["type"], json!("BasicTile"));
    }

    #[test]
    fn widget_profile_keys_and_variables() {
        let doc = run(VariantProfile::widget(), &level(2, 2, &[1, 2, 3, 4]));
        let tiles = layer(&doc, "tiles");
        let keys: Vec<_> = tiles.keys().collect();
        assert_eq!(keys, ["tile-(0-2)", "tile-(1-2)", "tile-(0-1)", "tile-(1-1)"]);

        let floor = value(tiles.get("tile-(0-2)").unwrap());
        assert_eq!(
            floor["children"]["tile"],
            json!({"type": "Widget", "data": {"key": "tile-1", "variables": {}}})
        );
        let other = value(tiles.get("tile-(1-1)").unwrap());
        assert_eq!(other["children"]["tile"]["data"]["key"], json!("tile-4"));
        assert_eq!(other["children"]["tile"]["data"]["variables"], json!({"priority": 1}));

        let root = value(doc.root());
        assert_eq!(root["children"]["tiles"]["data"]["size"], json!([96, 96]));
        assert!(root["children"].get("decorations").is_none());
        assert_eq!(
            root["comments"],
            json!("This is the root node for the world scene for room 1.")
        );
    }

    #[test]
    fn enemy_placements_follow_vertical_convention() {
        let rat = vec![PlacementInfo::new("Rat", 1.0, 2.0)];

        let doc = run(VariantProfile::widget(), &level(3, 5, &[1; 15]).with_enemies(rat.clone()));
        let enemies = layer(&doc, "enemies");
        assert_eq!(enemies.len(), 1);
        assert_eq!(
            value(enemies.get("enemy-(1-3)-0").unwrap()),
            json!({"type": "Rat", "layout": {
                "x_index": 1, "y_index": 3, "x_anchor": "left", "y_anchor": "bottom"
            }})
        );

        let doc = run(VariantProfile::room(), &level(3, 5, &[1; 15]).with_enemies(rat));
        let enemies = layer(&doc, "enemies");
        let node = value(enemies.get("enemy-(1-2)-0").unwrap());
        assert_eq!(node["layout"]["y_index"], json!(2));
    }

    #[test]
    fn duplicate_placements_get_distinct_keys() {
        let crowd = vec![
            PlacementInfo::new("Grunt", 2.0, 1.0),
            PlacementInfo::new("Grunt", 2.0, 1.0),
            PlacementInfo::new("Tank", 0.5, 1.5),
        ];
        let doc = run(VariantProfile::room(), &level(3, 3, &[1; 9]).with_enemies(crowd));
        let keys: Vec<_> = layer(&doc, "enemies").keys().collect();
        assert_eq!(keys, ["enemy-(2-1)-0", "enemy-(2-1)-1", "enemy-(0.5-1.5)-2"]);
    }

    #[test]
    fn room_wall_face_lands_in_open_neighbor() {
        let level = level(1, 3, &[2, 1, 1]);
        let doc = run(VariantProfile::room(), &level);
        let tiles = layer(&doc, "tiles");
        let keys: Vec<_> = tiles.keys().collect();
        assert_eq!(keys, ["tile-(0-0)", "tile-(1-0)-floor", "tile-(1-0)", "tile-(2-0)"]);

        let wall = value(tiles.get("tile-(0-0)").unwrap());
        assert_eq!(wall["layout"]["y_index"], json!(2));
        assert_eq!(
            wall["children"]["tile"],
            json!({"type": "Widget",
                   "data": {"key": "tile-2", "variables": {"priority": 0}},
                   "layout": {"y_offset": 24}})
        );

        let backing = value(tiles.get("tile-(1-0)-floor").unwrap());
        assert_eq!(backing["children"]["tile"]["data"]["key"], json!("tile-6"));
        assert_eq!(backing["children"]["tile"]["data"]["variables"], json!({"priority": 1}));

        let face = value(tiles.get("tile-(1-0)").unwrap());
        assert_eq!(face["children"]["tile"]["data"]["key"], json!("tile-7"));
        assert_eq!(face["layout"]["y_index"], json!(1));
    }

    #[test]
    fn room_doors_carry_pillar_priorities() {
        let level = level(2, 2, &[4, 1, 1, 5]);
        let doc = run(VariantProfile::room(), &level);
        let tiles = layer(&doc, "tiles");

        let door = value(tiles.get("tile-(0-0)").unwrap());
        assert_eq!(
            door["children"]["tile"]["data"]["variables"],
            json!({"priority": 0, "pillar-priority": 0, "laser-priority": 0})
        );
        let vertical = value(tiles.get("tile-(1-1)").unwrap());
        assert_eq!(
            vertical["children"]["tile"]["data"]["variables"],
            json!({"priority": 1, "top-pillar-priority": 0,
                   "bottom-pillar-priority": 2, "laser-priority": 1})
        );
        // Doors show the floor underneath.
        let underlay = value(tiles.get("tile-(1-1)-floor").unwrap());
        assert_eq!(underlay["children"]["tile"]["data"]["key"], json!("tile-1"));
    }

    #[test]
    fn explicit_decorations_use_the_placement_convention() {
        let bones = vec![PlacementInfo::new("bones", 0.5, 1.25)];
        let doc = run(VariantProfile::anchored(), &level(2, 2, &[0; 4]).with_decorations(bones));
        let decorations = layer(&doc, "decorations");
        let node = value(decorations.get("decoration-(0.5-0.75)-0").unwrap());
        assert_eq!(node["type"], json!("Image"));
        assert_eq!(node["data"]["texture"], json!("decoration-bones"));
        assert_eq!(node["data"]["priority"], json!(0.5));
        assert_eq!(node["layout"]["x_index"], json!(0.5));
        assert_eq!(node["layout"]["y_index"], json!(0.75));
    }

    #[test]
    fn placement_keys_spell_numbers_like_the_layout() {
        let speck = vec![PlacementInfo::new("moss", 1e-7, 1.0)];
        let doc = run(VariantProfile::room(), &level(2, 2, &[1; 4]).with_decorations(speck));
        let (key, node) = layer(&doc, "decorations").iter().next().unwrap();
        let x_index = value(node)["layout"]["x_index"].to_string();
        assert_eq!(x_index, "1e-7");
        assert_eq!(key, format!("decoration-({x_index}-1)-0"));
    }

    #[test]
    fn grass_fallback_scatters_widgets() {
        let meadow = level(10, 10, &[3; 100]);
        let doc = run(VariantProfile::room(), &meadow);
        let decorations = layer(&doc, "decorations");
        assert!(!decorations.is_empty());
        for (key, node) in decorations.iter() {
            assert!(key.starts_with("decoration-("));
            let node = value(node);
            assert_eq!(node["type"], json!("Widget"));
            assert_eq!(node["data"]["key"], json!("decoration-grass"));
            assert_eq!(node["data"]["variables"], json!({"priority": 0.5}));
        }
    }

    #[test]
    fn explicit_decorations_disable_grass() {
        let meadow = level(4, 4, &[3; 16]).with_decorations(Vec::new());
        let doc = run(VariantProfile::room(), &meadow);
        assert!(layer(&doc, "decorations").is_empty());
    }

    #[test]
    fn output_is_reproducible() {
        let transformer = GridTransformer::new(VariantProfile::room()).unwrap();
        let mut raw = vec![3; 64];
        raw[9] = 2;
        raw[20] = 4;

        let explicit = level(8, 8, &raw).with_decorations(vec![PlacementInfo::new("moss", 1.0, 1.0)]);
        let a = transformer.transform(&explicit, &mut scatter_rng(Some(1))).unwrap();
        let b = transformer.transform(&explicit, &mut scatter_rng(Some(2))).unwrap();
        assert_eq!(a.digest().unwrap(), b.digest().unwrap());

        let scattered = level(8, 8, &raw);
        let a = transformer.transform(&scattered, &mut scatter_rng(Some(5))).unwrap();
        let b = transformer.transform(&scattered, &mut scatter_rng(Some(5))).unwrap();
        let c = transformer.transform(&scattered, &mut scatter_rng(Some(6))).unwrap();
        assert_eq!(a.to_pretty_json().unwrap(), b.to_pretty_json().unwrap());
        assert_ne!(a.digest().unwrap(), c.digest().unwrap());
    }

    #[test]
    fn keys_are_unique_in_every_layer() {
        let anchored_raw: Vec<u32> = (0..120).map(|i| (i * 7 + i / 5) % 13).collect();
        let room_raw: Vec<u32> = (0..120).map(|i| (i * 5 + i / 3) % 8).collect();
        let widget_raw: Vec<u32> = (0..120).map(|i| (i * 3) % 13).collect();
        for (profile, raw) in [
            (VariantProfile::anchored(), anchored_raw),
            (VariantProfile::room(), room_raw),
            (VariantProfile::widget(), widget_raw),
        ] {
            let enemies = vec![PlacementInfo::new("Grunt", 1.0, 1.0); 3];
            let doc = run(profile, &level(12, 10, &raw).with_enemies(enemies));
            for (_, node) in doc.root().children.as_ref().unwrap().iter() {
                let children = node.children.as_ref().unwrap();
                let unique: HashSet<_> = children.keys().collect();
                assert_eq!(unique.len(), children.len());
            }
        }
    }

    #[test]
    fn unknown_tiles_fail_loudly() {
        let transformer = GridTransformer::new(VariantProfile::anchored()).unwrap();
        let err = transformer
            .transform(&level(2, 1, &[0, 42]), &mut scatter_rng(Some(0)))
            .unwrap_err();
        assert!(matches!(
            err,
            TransformError::UnknownTile {
                id: TileId(42),
                index: 1,
                ..
            }
        ));
    }

    #[test]
    fn malformed_descriptor_is_rejected() {
        let mut bad = level(2, 2, &[0; 4]);
        bad.layout.pop();
        let transformer = GridTransformer::new(VariantProfile::anchored()).unwrap();
        let err = transformer.transform(&bad, &mut scatter_rng(None)).unwrap_err();
        assert!(matches!(err, TransformError::Level(LevelError::LayoutSize { .. })));
    }
}
