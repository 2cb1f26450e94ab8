//! Scene graph : a z-ordered list of drawable nodes.
//!
//! Nodes are only ever added, so a `NodeId` stays valid for the lifetime of
//! the stage. Hiding a node is done through `visible` instead of removal.
use crate::engine::Point;

/// Asset path of a texture, doubles as the key into `engine::Textures`
pub type TextureKey = &'static str;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub texture: TextureKey,
    pub position: Point,
    /// radians, clockwise, around the top left corner
    pub rotation: f32,
    pub scale: f32,
}

impl Sprite {
    pub fn new(texture: TextureKey, position: Point) -> Self {
        Sprite {
            texture,
            position,
            rotation: 0.0,
            scale: 1.0,
        }
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}

/// A texture repeated over a fixed area, scrolled by moving `tile_offset`
#[derive(Debug, Clone, PartialEq)]
pub struct TilingSprite {
    pub texture: TextureKey,
    pub position: Point,
    pub width: f32,
    pub height: f32,
    pub tile_offset: Point,
}

impl TilingSprite {
    pub fn new(texture: TextureKey, width: f32, height: f32) -> Self {
        TilingSprite {
            texture,
            position: Point::default(),
            width,
            height,
            tile_offset: Point::default(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TextStyle {
    /// CSS font shorthand
    pub font: &'static str,
    pub fill: &'static str,
    /// canvas textAlign, "right" anchors `position` to the right edge
    pub align: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub content: String,
    pub position: Point,
    pub style: TextStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Drawable {
    Sprite(Sprite),
    Tiling(TilingSprite),
    Text(Text),
}

impl From<Sprite> for Drawable {
    fn from(sprite: Sprite) -> Self {
        Drawable::Sprite(sprite)
    }
}

impl From<TilingSprite> for Drawable {
    fn from(tiling: TilingSprite) -> Self {
        Drawable::Tiling(tiling)
    }
}

impl From<Text> for Drawable {
    fn from(text: Text) -> Self {
        Drawable::Text(text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub drawable: Drawable,
    pub visible: bool,
}

#[derive(Debug, Default)]
pub struct Stage {
    nodes: Vec<Node>,
}

impl Stage {
    pub fn new() -> Self {
        Stage::default()
    }

    /// Adds on top of everything added so far
    pub fn add(&mut self, drawable: impl Into<Drawable>) -> NodeId {
        self.push(drawable.into(), true)
    }

    pub fn add_hidden(&mut self, drawable: impl Into<Drawable>) -> NodeId {
        self.push(drawable.into(), false)
    }

    fn push(&mut self, drawable: Drawable, visible: bool) -> NodeId {
        self.nodes.push(Node { drawable, visible });
        NodeId(self.nodes.len() - 1)
    }

    /// Back to front
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.visible = visible;
        }
    }

    pub fn is_visible(&self, id: NodeId) -> bool {
        self.node(id).map_or(false, |node| node.visible)
    }

    pub fn sprite(&self, id: NodeId) -> Option<&Sprite> {
        match self.node(id).map(|node| &node.drawable) {
            Some(Drawable::Sprite(sprite)) => Some(sprite),
            _ => None,
        }
    }

    pub fn sprite_mut(&mut self, id: NodeId) -> Option<&mut Sprite> {
        match self.nodes.get_mut(id.0).map(|node| &mut node.drawable) {
            Some(Drawable::Sprite(sprite)) => Some(sprite),
            _ => None,
        }
    }

    pub fn tiling(&self, id: NodeId) -> Option<&TilingSprite> {
        match self.node(id).map(|node| &node.drawable) {
            Some(Drawable::Tiling(tiling)) => Some(tiling),
            _ => None,
        }
    }

    pub fn tiling_mut(&mut self, id: NodeId) -> Option<&mut TilingSprite> {
        match self.nodes.get_mut(id.0).map(|node| &mut node.drawable) {
            Some(Drawable::Tiling(tiling)) => Some(tiling),
            _ => None,
        }
    }

    pub fn text(&self, id: NodeId) -> Option<&Text> {
        match self.node(id).map(|node| &node.drawable) {
            Some(Drawable::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn text_mut(&mut self, id: NodeId) -> Option<&mut Text> {
        match self.nodes.get_mut(id.0).map(|node| &mut node.drawable) {
            Some(Drawable::Text(text)) => Some(text),
            _ => None,
        }
    }
}
