use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use tilescene_common::Num;

/// Anchor names understood by the engine's anchored and grid layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Left,
    Bottom,
}

/// Layout manager applied to a node's children.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Format {
    Anchored,
    Grid { width: usize, height: usize },
}

/// Node-specific payload. Which fields are set depends on the node type.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NodeData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<[Num; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<[Num; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<Num>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Num>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Variables>,
}

/// Placement of a node inside its parent's layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NodeLayout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_index: Option<Num>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_index: Option<Num>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_anchor: Option<Anchor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_anchor: Option<Anchor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub absolute: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_offset: Option<Num>,
}

impl NodeLayout {
    /// Anchors only, no grid index.
    pub fn anchored(x_anchor: Anchor, y_anchor: Anchor) -> Self {
        Self {
            x_anchor: Some(x_anchor),
            y_anchor: Some(y_anchor),
            ..Self::default()
        }
    }

    /// A grid cell anchored at its bottom-left corner.
    pub fn cell(x_index: impl Into<Num>, y_index: impl Into<Num>) -> Self {
        Self {
            x_index: Some(x_index.into()),
            y_index: Some(y_index.into()),
            ..Self::anchored(Anchor::Left, Anchor::Bottom)
        }
    }
}

/// Ordered name/value pairs handed to a widget template.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variables(Vec<(String, Num)>);

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Num>) -> Self {
        self.0.push((name.into(), value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<Num> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Variables {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Named child nodes in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Children(Vec<(String, SceneNode)>);

impl Children {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, node: SceneNode) {
        self.0.push((key.into(), node));
    }

    pub fn get(&self, key: &str) -> Option<&SceneNode> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, n)| n)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SceneNode)> {
        self.0.iter().map(|(k, n)| (k.as_str(), n))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Children {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, node) in &self.0 {
            map.serialize_entry(key, node)?;
        }
        map.end()
    }
}

/// One entry of the scene graph. `node_type` picks the engine class
/// (`Node`, `Wall`, `Widget`, an enemy name, ...); this crate does not
/// interpret it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<NodeData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<NodeLayout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Children>,
}

impl SceneNode {
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            comments: None,
            node_type: node_type.into(),
            format: None,
            data: None,
            layout: None,
            children: None,
        }
    }

    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = Some(comments.into());
        self
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_data(mut self, data: NodeData) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_layout(mut self, layout: NodeLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn with_children(mut self, children: Children) -> Self {
        self.children = Some(children);
        self
    }

    /// Look up a direct child by key.
    pub fn child(&self, key: &str) -> Option<&SceneNode> {
        self.children.as_ref().and_then(|c| c.get(key))
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .flat_map(|c| c.iter())
            .map(|(_, n)| n.node_count())
            .sum::<usize>()
    }
}
