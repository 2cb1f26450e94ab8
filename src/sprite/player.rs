use crate::engine::stage::{NodeId, Sprite, Stage, TextureKey};
use crate::engine::Point;
use crate::sprite::FLOOR_POSITION_Y;
use crate::state::World;

pub const PLAYER_URL: TextureKey = "sprites/brachiosaurus.png";
pub const PLAYER_DUCK_URL: TextureKey = "sprites/brachiosaurus-down.png";

pub const PLAYER_POSITION_X: f32 = 50.0;
pub const PLAYER_WIDTH: f32 = 164.0;
pub const PLAYER_HEIGHT: f32 = 144.0;

// y at or above this blocks another jump, allows exactly two stacked hops
const MAX_PLAYER_JUMP_HEIGHT: f32 = 226.0;
const PLAYER_JUMP_HEIGHT: f32 = 90.0;
/// How long a jump or a duck lasts, in milliseconds
pub const PLAYER_JUMP_DELAY: f64 = 500.0;

/// y of the player standing on the floor
pub const PLAYER_RESTING_Y: f32 = FLOOR_POSITION_Y - PLAYER_HEIGHT;

/// ┌──────────────── Jump / Duck Flow ────────────────────────────────┐
/// │  Input / Timeout   │  Guard              │  Effect                │
/// ├────────────────────┼─────────────────────┼────────────────────────┤
/// │  jump()            │  y > MAX_JUMP       │  y -= 90, (re)arm      │
/// │                    │                     │  jump timeout          │
/// │  jump() ducked     │  -                  │  stand up first        │
/// │  duck()            │  not jumping        │  duck texture, arm     │
/// │                    │                     │  duck timeout once     │
/// │  jump timeout      │  -                  │  land on the floor     │
/// │  duck timeout      │  -                  │  stand up              │
/// └──────────────────────────────────────────────────────────────────┘
/// The sprite (position, texture) lives on the stage, flags and timeouts
/// live in `GameState`.
#[derive(Debug, Copy, Clone)]
pub struct Player {
    node: NodeId,
}

impl Player {
    pub fn spawn(stage: &mut Stage) -> Self {
        let node = stage.add(Sprite::new(
            PLAYER_URL,
            Point {
                x: PLAYER_POSITION_X,
                y: PLAYER_RESTING_Y,
            },
        ));
        Player { node }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Returns `true` when the hop happened, so the caller plays the jump sound
    pub fn jump(&self, world: &mut World, now: f64) -> bool {
        let World { stage, state, .. } = world;
        let Some(sprite) = stage.sprite_mut(self.node) else {
            return false;
        };

        // cannot duck and jump at the same time
        if state.is_ducked {
            state.is_ducked = false;
            sprite.texture = PLAYER_URL;
        }

        if sprite.position.y <= MAX_PLAYER_JUMP_HEIGHT {
            return false;
        }

        if state.is_jumping {
            state.is_double_jumping = true;
        }
        state.is_jumping = true;
        sprite.position.y -= PLAYER_JUMP_HEIGHT;
        // restarts, measured from this press
        state.jump_timer.schedule(now, PLAYER_JUMP_DELAY);
        true
    }

    pub fn duck(&self, world: &mut World, now: f64) {
        let World { stage, state, .. } = world;
        if state.is_jumping {
            return;
        }
        let Some(sprite) = stage.sprite_mut(self.node) else {
            return;
        };

        state.is_ducked = true;
        sprite.texture = PLAYER_DUCK_URL;

        // holding the key does not extend the duck
        if state.duck_timer.is_pending() {
            return;
        }
        state.duck_timer.schedule(now, PLAYER_JUMP_DELAY);
    }

    /// Fires every timeout due by `now`, earliest deadline first
    pub fn run_timers(&self, world: &mut World, now: f64) {
        loop {
            let duck_first = matches!(
                (world.state.jump_timer.deadline(), world.state.duck_timer.deadline()),
                (Some(jump), Some(duck)) if duck < jump
            );
            if duck_first && world.state.duck_timer.fire_if_due(now) {
                self.stand(world);
            } else if world.state.jump_timer.fire_if_due(now) {
                self.land(world);
            } else if world.state.duck_timer.fire_if_due(now) {
                self.stand(world);
            } else {
                break;
            }
        }
    }

    fn land(&self, world: &mut World) {
        world.state.is_jumping = false;
        world.state.is_double_jumping = false;
        if let Some(sprite) = world.stage.sprite_mut(self.node) {
            sprite.position.y = PLAYER_RESTING_Y;
        }
    }

    fn stand(&self, world: &mut World) {
        if let Some(sprite) = world.stage.sprite_mut(self.node) {
            sprite.texture = PLAYER_URL;
        }
        world.state.is_ducked = false;
    }
}

/// The player's collision edges : x of tail and front, y of the feet
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PlayerBounds {
    pub tail: f32,
    pub front: f32,
    pub bottom: f32,
}

pub fn bounds(stage: &Stage, player: NodeId) -> Option<PlayerBounds> {
    stage.sprite(player).map(|sprite| PlayerBounds {
        tail: sprite.position.x,
        front: sprite.position.x + PLAYER_WIDTH,
        bottom: sprite.position.y + PLAYER_HEIGHT,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::GameState;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn setup() -> (World, Player) {
        let mut stage = Stage::new();
        let player = Player::spawn(&mut stage);
        let world = World::new(stage, GameState::new(SmallRng::seed_from_u64(3)));
        (world, player)
    }

    fn y(world: &World, player: &Player) -> f32 {
        world.stage.sprite(player.node()).unwrap().position.y
    }

    fn texture(world: &World, player: &Player) -> TextureKey {
        world.stage.sprite(player.node()).unwrap().texture
    }

    #[test]
    fn spawns_standing_on_the_floor() {
        let (world, player) = setup();
        assert_eq!(y(&world, &player), 406.0);
        assert_eq!(
            bounds(&world.stage, player.node()),
            Some(PlayerBounds {
                tail: 50.0,
                front: 214.0,
                bottom: 550.0
            })
        );
    }

    #[test]
    fn jump_hops_and_lands_after_the_delay() {
        let (mut world, player) = setup();

        assert!(player.jump(&mut world, 1_000.0));
        assert!(world.state.is_jumping);
        assert!(!world.state.is_double_jumping);
        assert_eq!(y(&world, &player), 316.0);

        player.run_timers(&mut world, 1_499.0);
        assert_eq!(y(&world, &player), 316.0);

        player.run_timers(&mut world, 1_500.0);
        assert!(!world.state.is_jumping);
        assert_eq!(y(&world, &player), PLAYER_RESTING_Y);
    }

    #[test]
    fn landing_uses_up_the_jump_timeout() {
        let (mut world, player) = setup();
        player.jump(&mut world, 0.0);
        player.run_timers(&mut world, 500.0);
        assert!(!world.state.jump_timer.is_pending());

        player.jump(&mut world, 600.0);
        player.run_timers(&mut world, 700.0);

        assert!(world.state.is_jumping);
        assert_eq!(y(&world, &player), 316.0);
    }

    #[test]
    fn second_jump_double_jumps_and_restarts_the_timeout() {
        let (mut world, player) = setup();

        player.jump(&mut world, 0.0);
        assert!(player.jump(&mut world, 300.0));
        assert!(world.state.is_double_jumping);
        assert_eq!(y(&world, &player), 226.0);

        // the first deadline is gone
        player.run_timers(&mut world, 500.0);
        assert!(world.state.is_jumping);

        player.run_timers(&mut world, 800.0);
        assert!(!world.state.is_jumping);
        assert!(!world.state.is_double_jumping);
        assert_eq!(y(&world, &player), PLAYER_RESTING_Y);
    }

    #[test]
    fn third_jump_at_max_height_changes_nothing() {
        let (mut world, player) = setup();
        player.jump(&mut world, 0.0);
        player.jump(&mut world, 100.0);
        let deadline = world.state.jump_timer.deadline();

        assert!(!player.jump(&mut world, 200.0));

        assert_eq!(y(&world, &player), 226.0);
        assert!(world.state.is_jumping);
        assert!(world.state.is_double_jumping);
        assert_eq!(world.state.jump_timer.deadline(), deadline);
    }

    #[test]
    fn duck_while_jumping_is_ignored() {
        let (mut world, player) = setup();
        player.jump(&mut world, 0.0);

        player.duck(&mut world, 10.0);

        assert!(!world.state.is_ducked);
        assert!(!world.state.duck_timer.is_pending());
        assert_eq!(texture(&world, &player), PLAYER_URL);
    }

    #[test]
    fn duck_swaps_texture_until_the_timeout() {
        let (mut world, player) = setup();

        player.duck(&mut world, 0.0);
        assert!(world.state.is_ducked);
        assert_eq!(texture(&world, &player), PLAYER_DUCK_URL);
        assert_eq!(y(&world, &player), PLAYER_RESTING_Y);

        player.run_timers(&mut world, 500.0);
        assert!(!world.state.is_ducked);
        assert!(!world.state.duck_timer.is_pending());
        assert_eq!(texture(&world, &player), PLAYER_URL);
    }

    #[test]
    fn repeated_duck_does_not_extend_the_timeout() {
        let (mut world, player) = setup();

        player.duck(&mut world, 0.0);
        player.duck(&mut world, 300.0);
        assert_eq!(world.state.duck_timer.deadline(), Some(500.0));

        player.run_timers(&mut world, 500.0);
        assert!(!world.state.is_ducked);
    }

    #[test]
    fn jump_while_ducked_stands_up_and_jumps() {
        let (mut world, player) = setup();
        player.duck(&mut world, 0.0);

        assert!(player.jump(&mut world, 100.0));

        assert!(!world.state.is_ducked);
        assert!(world.state.is_jumping);
        assert_eq!(texture(&world, &player), PLAYER_URL);
        assert_eq!(y(&world, &player), 316.0);
        // the duck timeout is left running and fires harmlessly
        assert!(world.state.duck_timer.is_pending());
        player.run_timers(&mut world, 500.0);
        assert!(!world.state.duck_timer.is_pending());
        assert!(world.state.is_jumping);
        assert_eq!(texture(&world, &player), PLAYER_URL);
    }

    #[test]
    fn timeouts_fire_in_deadline_order() {
        let (mut world, player) = setup();
        player.duck(&mut world, 0.0);
        player.jump(&mut world, 100.0);
        // duck deadline 500 comes before jump deadline 600
        player.run_timers(&mut world, 10_000.0);

        assert!(!world.state.is_ducked);
        assert!(!world.state.is_jumping);
        assert!(!world.state.jump_timer.is_pending());
        assert!(!world.state.duck_timer.is_pending());
        assert_eq!(y(&world, &player), PLAYER_RESTING_Y);
    }
}
