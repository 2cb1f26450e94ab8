use crate::engine::stage::{NodeId, Sprite, Stage, TextureKey};
use crate::engine::ticker::Updatable;
use crate::engine::Point;
use crate::sprite::player;
use crate::sprite::FLOOR_POSITION_Y;
use crate::state::{GameState, World};

pub const ORANGE_VELOCIRAPTOR_URL: TextureKey = "sprites/velociraptor1.png";
pub const BLUE_VELOCIRAPTOR_URL: TextureKey = "sprites/velociraptor2.png";
pub const PTERODACTYLUS_URL: TextureKey = "sprites/pterodactylus.png";

// collision switches, handy when tuning the others by hand
const ORANGE_VELOCIRAPTOR_COLLISIONS: bool = true;
const BLUE_VELOCIRAPTOR_COLLISIONS: bool = true;
const PTERODACTYLUS_COLLISIONS: bool = true;

const VELOCIRAPTOR_HEIGHT: f32 = 82.0;
const VELOCIRAPTOR_WIDTH: f32 = 102.0;
const PTERODACTYLUS_WIDTH: f32 = 94.0;
const ORANGE_VELOCIRAPTOR_SPEED_X: f32 = 8.0;
const BLUE_VELOCIRAPTOR_SPEED_X: f32 = 9.0;

// hand tuned, not derived from the sprite art
const FRONT_MARGIN: f32 = 8.0;
const VELOCIRAPTOR_TAIL_MARGIN: f32 = 30.0;
const PTERODACTYLUS_TAIL_MARGIN: f32 = 140.0;

/// Where an obstacle comes back in after leaving on the left
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Reentry {
    /// uniform in `[min, max)`, a fresh draw every lap
    Between(f32, f32),
    At(f32),
}

impl Reentry {
    fn next_x(self, state: &mut GameState) -> f32 {
        match self {
            Reentry::Between(min, max) => state.random_between(min, max),
            Reentry::At(x) => x,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Hitbox {
    pub width: f32,
    pub tail_margin: f32,
    pub front_margin: f32,
    /// Aerial obstacles only test horizontal overlap, and miss a player who
    /// is ducked or double jumping
    pub aerial: bool,
}

/// Everything that tells one obstacle type from another
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Species {
    pub texture: TextureKey,
    pub speed: f32,
    pub y: f32,
    /// `[min, max)` for the first lap and after a restart
    pub spawn: (f32, f32),
    /// x below which the obstacle is off screen on the left
    pub threshold: f32,
    pub reentry: Reentry,
    pub hitbox: Hitbox,
    pub collisions: bool,
}

pub const ORANGE_VELOCIRAPTOR: Species = Species {
    texture: ORANGE_VELOCIRAPTOR_URL,
    speed: ORANGE_VELOCIRAPTOR_SPEED_X,
    y: FLOOR_POSITION_Y - VELOCIRAPTOR_HEIGHT,
    spawn: (1000.0, 3000.0),
    threshold: -200.0,
    reentry: Reentry::Between(1400.0, 1800.0),
    hitbox: Hitbox {
        width: VELOCIRAPTOR_WIDTH,
        tail_margin: VELOCIRAPTOR_TAIL_MARGIN,
        front_margin: FRONT_MARGIN,
        aerial: false,
    },
    collisions: ORANGE_VELOCIRAPTOR_COLLISIONS,
};

pub const BLUE_VELOCIRAPTOR: Species = Species {
    texture: BLUE_VELOCIRAPTOR_URL,
    speed: BLUE_VELOCIRAPTOR_SPEED_X,
    y: FLOOR_POSITION_Y - VELOCIRAPTOR_HEIGHT,
    spawn: (2000.0, 4000.0),
    threshold: -800.0,
    reentry: Reentry::Between(1800.0, 2000.0),
    hitbox: Hitbox {
        width: VELOCIRAPTOR_WIDTH,
        tail_margin: VELOCIRAPTOR_TAIL_MARGIN,
        front_margin: FRONT_MARGIN,
        aerial: false,
    },
    collisions: BLUE_VELOCIRAPTOR_COLLISIONS,
};

// flies as fast as the orange one
pub const PTERODACTYLUS: Species = Species {
    texture: PTERODACTYLUS_URL,
    speed: ORANGE_VELOCIRAPTOR_SPEED_X,
    y: FLOOR_POSITION_Y - 120.0,
    spawn: (3000.0, 5000.0),
    threshold: -1500.0,
    reentry: Reentry::At(2000.0),
    hitbox: Hitbox {
        width: PTERODACTYLUS_WIDTH,
        tail_margin: PTERODACTYLUS_TAIL_MARGIN,
        front_margin: FRONT_MARGIN,
        aerial: true,
    },
    collisions: PTERODACTYLUS_COLLISIONS,
};

/// Forgiving overlap test : the player's front is pulled back by
/// `front_margin` and its tail pushed forward by `tail_margin`.
/// All comparisons are strict, touching edges do not collide.
#[allow(clippy::too_many_arguments)]
pub fn collides(
    obstacle_left: f32,
    obstacle_right: f32,
    obstacle_top: f32,
    player_left: f32,
    player_right: f32,
    player_bottom: f32,
    tail_margin: f32,
    front_margin: f32,
) -> bool {
    obstacle_left < player_right - front_margin
        && obstacle_right > player_left + tail_margin
        && obstacle_top < player_bottom
}

pub struct Obstacle {
    species: Species,
    node: NodeId,
    player: NodeId,
}

impl Obstacle {
    pub fn spawn(species: Species, stage: &mut Stage, state: &mut GameState, player: NodeId) -> Self {
        let x = state.random_between(species.spawn.0, species.spawn.1);
        let node = stage.add(Sprite::new(species.texture, Point { x, y: species.y }));
        Obstacle {
            species,
            node,
            player,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    fn hits_player(&self, world: &World, x: f32, y: f32) -> bool {
        let hitbox = &self.species.hitbox;
        if hitbox.aerial && (world.state.is_ducked || world.state.is_double_jumping) {
            return false;
        }
        let Some(bounds) = player::bounds(&world.stage, self.player) else {
            return false;
        };
        let top = if hitbox.aerial { f32::NEG_INFINITY } else { y };
        collides(
            x,
            x + hitbox.width,
            top,
            bounds.tail,
            bounds.front,
            bounds.bottom,
            hitbox.tail_margin,
            hitbox.front_margin,
        )
    }
}

impl Updatable<World> for Obstacle {
    fn update(&mut self, world: &mut World) {
        let Some(sprite) = world.stage.sprite_mut(self.node) else {
            return;
        };
        sprite.position.x -= self.species.speed;
        let Point { x, y } = sprite.position;

        if self.species.collisions && self.hits_player(world, x, y) {
            world.trigger_game_over();
        }

        // loop the sprite again once it disappeared on the left side
        if x < self.species.threshold {
            let next_x = self.species.reentry.next_x(&mut world.state);
            if let Some(sprite) = world.stage.sprite_mut(self.node) {
                sprite.position.x = next_x;
            }
        }
    }

    fn reset(&mut self, world: &mut World) {
        let x = world
            .state
            .random_between(self.species.spawn.0, self.species.spawn.1);
        if let Some(sprite) = world.stage.sprite_mut(self.node) {
            sprite.position = Point {
                x,
                y: self.species.y,
            };
        }
    }
}
