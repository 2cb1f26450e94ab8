use crate::engine::stage::{NodeId, Sprite, Stage, TextureKey, TilingSprite};
use crate::engine::ticker::Updatable;
use crate::engine::Point;
use crate::sprite::FLOOR_POSITION_Y;
use crate::state::World;

pub const BACKGROUND_URL: TextureKey = "sprites/bg.png";
pub const BACKGROUND_WIDTH: f32 = 800.0;
pub const BACKGROUND_HEIGHT: f32 = 600.0;
const BACKGROUND_SPEED_X: f32 = 2.0;

pub const SATURN_URL: TextureKey = "sprites/saturn.png";
pub const JUPITER_URL: TextureKey = "sprites/jupiter.png";
pub const CLOUDS_URL: TextureKey = "sprites/clouds.png";
pub const TRICERATOPS_URL: TextureKey = "sprites/triceratops.png";

/// Scrolling backdrop, the renderer wraps the offset so it may grow forever
pub struct Background {
    node: NodeId,
}

impl Background {
    pub fn spawn(stage: &mut Stage) -> Self {
        Background {
            node: stage.add(TilingSprite::new(
                BACKGROUND_URL,
                BACKGROUND_WIDTH,
                BACKGROUND_HEIGHT,
            )),
        }
    }
}

impl Updatable<World> for Background {
    fn update(&mut self, world: &mut World) {
        if let Some(tiling) = world.stage.tiling_mut(self.node) {
            tiling.tile_offset.x -= BACKGROUND_SPEED_X;
        }
    }
}

/// Decoration drifting left and jumping back to `reentry_x`
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Drift {
    pub texture: TextureKey,
    pub start: Point,
    pub scale: f32,
    pub speed: f32,
    pub threshold: f32,
    pub reentry_x: f32,
}

pub const CLOUDS: Drift = Drift {
    texture: CLOUDS_URL,
    start: Point { x: 900.0, y: 50.0 },
    scale: 1.0,
    speed: 0.3,
    threshold: -400.0,
    reentry_x: 1000.0,
};

// far away, so half size and slow
pub const TRICERATOPS: Drift = Drift {
    texture: TRICERATOPS_URL,
    start: Point {
        x: 900.0,
        y: FLOOR_POSITION_Y - 50.0,
    },
    scale: 0.5,
    speed: 1.0,
    threshold: -600.0,
    reentry_x: 1000.0,
};

pub struct Drifter {
    drift: Drift,
    node: NodeId,
}

impl Drifter {
    pub fn spawn(drift: Drift, stage: &mut Stage) -> Self {
        let node = stage.add(Sprite::new(drift.texture, drift.start).with_scale(drift.scale));
        Drifter { drift, node }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }
}

impl Updatable<World> for Drifter {
    fn update(&mut self, world: &mut World) {
        if let Some(sprite) = world.stage.sprite_mut(self.node) {
            sprite.position.x -= self.drift.speed;
            if sprite.position.x < self.drift.threshold {
                sprite.position.x = self.drift.reentry_x;
            }
        }
    }

    fn reset(&mut self, world: &mut World) {
        if let Some(sprite) = world.stage.sprite_mut(self.node) {
            sprite.position = self.drift.start;
        }
    }
}

/// Saturn and Jupiter never move, they are staged and then left alone
pub fn spawn_planets(stage: &mut Stage) {
    stage.add(Sprite::new(SATURN_URL, Point { x: 100.0, y: 60.0 }).with_rotation(0.3));
    stage.add(Sprite::new(JUPITER_URL, Point { x: 640.0, y: 30.0 }).with_rotation(0.1));
}
