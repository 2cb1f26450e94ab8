// ┌──────────────────────────────────────────────────────────────────────────┐
// │                           sprite/ at a glance                            │
// ├────────────────┬──────────────────────────┬──────────────────────────────┤
// │ File           │ Controller               │ Moves by                     │
// ├────────────────┼──────────────────────────┼──────────────────────────────┤
// │ player.rs      │ Player (brachiosaurus)   │ key presses + timeouts       │
// │ obstacle.rs    │ Obstacle x3 + collides() │ fixed speed, wraps left      │
// │ scenery.rs     │ Background, Drifter,     │ fixed speed, wraps left      │
// │                │ planets                  │ (planets never move)         │
// │ score.rs       │ ScoreCounter             │ one increment per frame      │
// └────────────────┴──────────────────────────┴──────────────────────────────┘
// Everything except the player is an `Updatable<World>` registered with the
// ticker. The player has no per-frame work.
use crate::engine::stage::TextureKey;

pub mod obstacle;
pub mod player;
pub mod scenery;
pub mod score;

/// y of the ground line, sprites stand on it with their bottom edge
pub const FLOOR_POSITION_Y: f32 = 550.0;

/// Every image the game draws, loaded up front
pub const TEXTURES: &[TextureKey] = &[
    scenery::BACKGROUND_URL,
    scenery::SATURN_URL,
    scenery::JUPITER_URL,
    scenery::CLOUDS_URL,
    scenery::TRICERATOPS_URL,
    player::PLAYER_URL,
    player::PLAYER_DUCK_URL,
    obstacle::ORANGE_VELOCIRAPTOR_URL,
    obstacle::BLUE_VELOCIRAPTOR_URL,
    obstacle::PTERODACTYLUS_URL,
    crate::state::GAME_OVER_URL,
];
