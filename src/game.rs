use crate::engine::input::KeyPress;
use crate::engine::stage::Stage;
use crate::engine::ticker::Ticker;
use crate::engine::{Audio, Game, Rect, Renderer, Sound, Textures};
use crate::sprite::obstacle::{Obstacle, BLUE_VELOCIRAPTOR, ORANGE_VELOCIRAPTOR, PTERODACTYLUS};
use crate::sprite::player::Player;
use crate::sprite::scenery::{
    self, Background, Drifter, BACKGROUND_HEIGHT, BACKGROUND_WIDTH, CLOUDS, TRICERATOPS,
};
use crate::sprite::score::ScoreCounter;
use crate::sprite::TEXTURES;
use crate::state::{GameState, Score, World};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;

/// TABLE
/// ┌───────────────────────── Dino Run Overview ─────────────────────────────┐
/// │                                                                         │
/// │    ┌─────────────┐  key_down   ┌─────────────┐  jump/duck ┌──────────┐  │
/// │    │  GameLoop   ├────────────►│  Playfield  ├───────────►│  Player  │  │
/// │    │  (engine)   │  update     │             │            └──────────┘  │
/// │    │             ├────────────►│  Ticker ────┼──► Background, Clouds,   │
/// │    └─────────────┘             │             │    Score, Triceratops,   │
/// │                                │             │    Obstacle x3           │
/// │                                └──────┬──────┘                          │
/// │                                       │ World { stage, state }          │
/// ├───────────────────────────── States ──┴─────────────────────────────────┤
/// │                                                                         │
/// │   Running ──── obstacle hits player ────► GameOver (ticker stopped)     │
/// │   GameOver ─── Enter ───────────────────► Running (reset, restarted)    │
/// │   any other key in GameOver is dropped before it reaches the player     │
/// └─────────────────────────────────────────────────────────────────────────┘
pub enum DinoRun {
    /// Initialize state while resources are being loaded
    /// Transition to `Loaded` once initialization is complete
    Loading,

    /// Playing, textures and sounds are ready
    Loaded(Box<Level>),
}

pub struct Level {
    playfield: Playfield,
    textures: Textures,
    audio: Audio,
    jump_sound: Sound,
}

impl DinoRun {
    const JUMP_SOUND_PATH: &'static str = "jump.mp3";

    pub fn new() -> Self {
        DinoRun::Loading
    }

    async fn load_jump_sound(audio: &Audio) -> Result<Sound> {
        audio
            .load_sound(Self::JUMP_SOUND_PATH)
            .await
            .with_context(|| format!("Failed to load sound from : {}", Self::JUMP_SOUND_PATH))
    }
}

impl Default for DinoRun {
    fn default() -> Self {
        DinoRun::new()
    }
}

#[async_trait(?Send)]
impl Game for DinoRun {
    async fn initialize(&self) -> Result<Box<dyn Game>> {
        match self {
            DinoRun::Loading => {
                let audio = Audio::new()?;
                let (textures, jump_sound) =
                    futures::join!(Textures::load(TEXTURES), Self::load_jump_sound(&audio));
                let textures = textures?;
                let jump_sound = jump_sound?;
                log!("Loaded {} textures", TEXTURES.len());

                Ok(Box::new(DinoRun::Loaded(Box::new(Level {
                    playfield: Playfield::new(GameState::from_entropy()),
                    textures,
                    audio,
                    jump_sound,
                }))))
            }
            DinoRun::Loaded(_) => Err(anyhow!("Game is already initialized")),
        }
    }

    fn key_down(&mut self, press: &KeyPress) {
        if let DinoRun::Loaded(level) = self {
            let Some(key) = Key::from_code(&press.code) else {
                return;
            };
            if level.playfield.key_down(key, press.time) {
                if let Err(err) = level.audio.play_sound(&level.jump_sound) {
                    error!("Could not play jump sound : {:#?}", err);
                }
            }
        }
    }

    fn run_timers(&mut self, now: f64) {
        if let DinoRun::Loaded(level) = self {
            level.playfield.run_timers(now);
        }
    }

    fn is_running(&self) -> bool {
        match self {
            DinoRun::Loaded(level) => level.playfield.is_running(),
            DinoRun::Loading => false,
        }
    }

    fn update(&mut self) {
        if let DinoRun::Loaded(level) = self {
            level.playfield.update();
        }
    }

    fn draw(&self, renderer: &Renderer) {
        if let DinoRun::Loaded(level) = self {
            renderer.clear(&Rect {
                x: 0.0,
                y: 0.0,
                width: BACKGROUND_WIDTH,
                height: BACKGROUND_HEIGHT,
            });
            renderer.draw_stage(level.playfield.stage(), &level.textures);
        }
    }
}

/// The only keys the game reacts to
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Key {
    Jump,
    Duck,
    Restart,
}

impl Key {
    /// From `KeyboardEvent.code`
    pub fn from_code(code: &str) -> Option<Key> {
        match code {
            "ArrowUp" => Some(Key::Jump),
            "ArrowDown" => Some(Key::Duck),
            "Enter" => Some(Key::Restart),
            _ => None,
        }
    }
}

/// All game logic, free of browser resources
pub struct Playfield {
    world: World,
    ticker: Ticker<World>,
    player: Player,
}

impl Playfield {
    /// Stages everything back to front and registers the updatables in the
    /// order they tick
    pub fn new(mut state: GameState) -> Self {
        let mut stage = Stage::new();
        let mut ticker: Ticker<World> = Ticker::new();

        ticker.add(Background::spawn(&mut stage));
        scenery::spawn_planets(&mut stage);
        ticker.add(Drifter::spawn(CLOUDS, &mut stage));
        ticker.add(ScoreCounter::spawn(&mut stage));
        ticker.add(Drifter::spawn(TRICERATOPS, &mut stage));

        let player = Player::spawn(&mut stage);
        for species in [ORANGE_VELOCIRAPTOR, BLUE_VELOCIRAPTOR, PTERODACTYLUS] {
            ticker.add(Obstacle::spawn(
                species,
                &mut stage,
                &mut state,
                player.node(),
            ));
        }

        Playfield {
            world: World::new(stage, state),
            ticker,
            player,
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.world.stage
    }

    pub fn state(&self) -> &GameState {
        &self.world.state
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_started()
    }

    /// Returns `true` when the player jumped, i.e. the jump sound is due
    pub fn key_down(&mut self, key: Key, now: f64) -> bool {
        if self.world.state.is_game_over {
            if key == Key::Restart {
                self.restart();
            }
            return false;
        }

        match key {
            Key::Jump => self.player.jump(&mut self.world, now),
            Key::Duck => {
                self.player.duck(&mut self.world, now);
                false
            }
            Key::Restart => false,
        }
    }

    /// Timeouts keep firing while the ticker is stopped
    pub fn run_timers(&mut self, now: f64) {
        self.player.run_timers(&mut self.world, now);
    }

    pub fn update(&mut self) {
        self.ticker.tick(&mut self.world);
        if self.world.state.is_game_over {
            self.ticker.stop();
        }
    }

    // jump/duck flags are left as they were at the moment of the collision
    fn restart(&mut self) {
        self.world.state.is_game_over = false;
        self.world.stage.set_visible(self.world.end_screen, false);
        self.world.state.score = Score::started();
        self.ticker.reset_all(&mut self.world);
        self.ticker.start();
        log!("Restarting");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::stage::{NodeId, TextureKey};
    use crate::engine::Point;
    use crate::sprite::obstacle::{
        BLUE_VELOCIRAPTOR_URL, ORANGE_VELOCIRAPTOR_URL, PTERODACTYLUS_URL,
    };
    use crate::sprite::player::{PLAYER_DUCK_URL, PLAYER_URL};
    use crate::sprite::scenery::{CLOUDS_URL, TRICERATOPS_URL};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    const FAR_AWAY: f32 = 5_000.0;

    fn playfield() -> Playfield {
        Playfield::new(GameState::new(SmallRng::seed_from_u64(2024)))
    }

    fn find(playfield: &Playfield, texture: TextureKey) -> NodeId {
        playfield
            .stage()
            .nodes()
            .find(|(id, _)| {
                playfield
                    .stage()
                    .sprite(*id)
                    .map_or(false, |sprite| sprite.texture == texture)
            })
            .map(|(id, _)| id)
            .unwrap()
    }

    fn position(playfield: &Playfield, texture: TextureKey) -> Point {
        let id = find(playfield, texture);
        playfield.stage().sprite(id).unwrap().position
    }

    fn place(playfield: &mut Playfield, texture: TextureKey, x: f32) {
        let id = find(playfield, texture);
        playfield.world.stage.sprite_mut(id).unwrap().position.x = x;
    }

    /// Only `texture` is left near the player
    fn only(playfield: &mut Playfield, texture: TextureKey, x: f32) {
        for obstacle in [ORANGE_VELOCIRAPTOR_URL, BLUE_VELOCIRAPTOR_URL, PTERODACTYLUS_URL] {
            place(playfield, obstacle, FAR_AWAY);
        }
        place(playfield, texture, x);
    }

    fn score_text(playfield: &Playfield) -> String {
        playfield
            .stage()
            .nodes()
            .find_map(|(id, _)| playfield.stage().text(id))
            .map(|text| text.content.clone())
            .unwrap()
    }

    fn crash(playfield: &mut Playfield, obstacle: TextureKey) {
        // lands one pixel inside the front margin
        only(playfield, obstacle, 213.0);
        playfield.update();
        assert!(playfield.state().is_game_over);
    }

    #[test]
    fn keys_map_from_keyboard_codes() {
        assert_eq!(Key::from_code("ArrowUp"), Some(Key::Jump));
        assert_eq!(Key::from_code("ArrowDown"), Some(Key::Duck));
        assert_eq!(Key::from_code("Enter"), Some(Key::Restart));
        assert_eq!(Key::from_code("Space"), None);
    }

    #[test]
    fn stage_is_layered_back_to_front() {
        let playfield = playfield();
        let order: Vec<NodeId> = [
            CLOUDS_URL,
            TRICERATOPS_URL,
            PLAYER_URL,
            ORANGE_VELOCIRAPTOR_URL,
            BLUE_VELOCIRAPTOR_URL,
            PTERODACTYLUS_URL,
        ]
        .iter()
        .map(|&texture| find(&playfield, texture))
        .collect();

        let mut sorted = order.clone();
        sorted.sort_by_key(|id| {
            playfield
                .stage()
                .nodes()
                .position(|(node, _)| node == *id)
                .unwrap()
        });
        assert_eq!(order, sorted);

        let (last, _) = playfield.stage().nodes().last().unwrap();
        assert_eq!(last, playfield.world.end_screen);
        assert!(!playfield.stage().is_visible(last));
    }

    #[test]
    fn obstacles_start_off_screen_in_their_ranges() {
        let playfield = playfield();
        assert!((1000.0..3000.0).contains(&position(&playfield, ORANGE_VELOCIRAPTOR_URL).x));
        assert!((2000.0..4000.0).contains(&position(&playfield, BLUE_VELOCIRAPTOR_URL).x));
        assert!((3000.0..5000.0).contains(&position(&playfield, PTERODACTYLUS_URL).x));
    }

    #[test]
    fn score_counts_from_the_first_frame() {
        let mut playfield = playfield();
        only(&mut playfield, ORANGE_VELOCIRAPTOR_URL, FAR_AWAY);

        for _ in 0..9 {
            playfield.update();
        }
        assert_eq!(score_text(&playfield), "");

        for _ in 0..20 {
            playfield.update();
        }
        assert_eq!(score_text(&playfield), "000001");
    }

    #[test]
    fn collision_stops_the_clock_and_shows_the_end_screen() {
        let mut playfield = playfield();
        crash(&mut playfield, ORANGE_VELOCIRAPTOR_URL);

        assert!(!playfield.is_running());
        assert!(playfield.stage().is_visible(playfield.world.end_screen));

        // frames no longer advance anything
        let before = position(&playfield, CLOUDS_URL);
        playfield.update();
        assert_eq!(position(&playfield, CLOUDS_URL), before);
    }

    #[test]
    fn updates_after_the_collision_still_run_that_frame() {
        let mut playfield = playfield();
        crash(&mut playfield, ORANGE_VELOCIRAPTOR_URL);

        // both registered after the orange one
        assert_eq!(position(&playfield, BLUE_VELOCIRAPTOR_URL).x, FAR_AWAY - 9.0);
        assert_eq!(position(&playfield, PTERODACTYLUS_URL).x, FAR_AWAY - 8.0);
    }

    #[test]
    fn obstacle_on_the_margin_keeps_the_game_running() {
        let mut playfield = playfield();
        only(&mut playfield, ORANGE_VELOCIRAPTOR_URL, 214.0);

        playfield.update();

        assert!(!playfield.state().is_game_over);
        assert!(playfield.is_running());
    }

    #[test]
    fn only_enter_is_honored_after_game_over() {
        let mut playfield = playfield();
        crash(&mut playfield, ORANGE_VELOCIRAPTOR_URL);
        let player = position(&playfield, PLAYER_URL);

        assert!(!playfield.key_down(Key::Jump, 0.0));
        playfield.key_down(Key::Duck, 0.0);

        assert!(playfield.state().is_game_over);
        assert!(!playfield.state().is_jumping);
        assert!(!playfield.state().is_ducked);
        assert_eq!(position(&playfield, PLAYER_URL), player);
    }

    #[test]
    fn enter_while_running_changes_nothing() {
        let mut playfield = playfield();
        for _ in 0..15 {
            playfield.update();
        }
        let score = playfield.state().score;
        let orange = position(&playfield, ORANGE_VELOCIRAPTOR_URL);
        let clouds = position(&playfield, CLOUDS_URL);

        assert!(!playfield.key_down(Key::Restart, 0.0));

        assert_eq!(playfield.state().score, score);
        assert_eq!(position(&playfield, ORANGE_VELOCIRAPTOR_URL), orange);
        assert_eq!(position(&playfield, CLOUDS_URL), clouds);
        assert!(playfield.is_running());
    }

    #[test]
    fn enter_after_game_over_restarts() {
        let mut playfield = playfield();
        crash(&mut playfield, ORANGE_VELOCIRAPTOR_URL);

        playfield.key_down(Key::Restart, 0.0);

        assert!(!playfield.state().is_game_over);
        assert!(playfield.is_running());
        assert!(!playfield.stage().is_visible(playfield.world.end_screen));
        assert_eq!(playfield.state().score, Score::started());
        assert!((1000.0..3000.0).contains(&position(&playfield, ORANGE_VELOCIRAPTOR_URL).x));
        assert!((2000.0..4000.0).contains(&position(&playfield, BLUE_VELOCIRAPTOR_URL).x));
        assert!((3000.0..5000.0).contains(&position(&playfield, PTERODACTYLUS_URL).x));
        assert_eq!(position(&playfield, CLOUDS_URL), CLOUDS.start);
        assert_eq!(position(&playfield, TRICERATOPS_URL), TRICERATOPS.start);

        playfield.update();
        assert_eq!(score_text(&playfield), "000000");
    }

    #[test]
    fn restart_keeps_the_duck_flag() {
        let mut playfield = playfield();
        playfield.key_down(Key::Duck, 0.0);
        crash(&mut playfield, ORANGE_VELOCIRAPTOR_URL);

        playfield.key_down(Key::Restart, 100.0);

        assert!(playfield.state().is_ducked);
        assert_eq!(position(&playfield, PLAYER_DUCK_URL).x, 50.0);
    }

    #[test]
    fn jump_key_reports_the_sound_cue() {
        let mut playfield = playfield();

        assert!(playfield.key_down(Key::Jump, 0.0));
        assert!(playfield.key_down(Key::Jump, 10.0));
        assert!(!playfield.key_down(Key::Jump, 20.0));
        assert!(!playfield.key_down(Key::Duck, 30.0));
    }

    #[test]
    fn timeouts_fire_while_the_clock_is_stopped() {
        let mut playfield = playfield();
        playfield.key_down(Key::Jump, 0.0);
        // a single jump does not clear the pterodactylus
        crash(&mut playfield, PTERODACTYLUS_URL);

        playfield.run_timers(500.0);

        assert!(!playfield.state().is_jumping);
        assert_eq!(position(&playfield, PLAYER_URL).y, 406.0);
    }

    #[test]
    fn pterodactylus_misses_a_ducking_player() {
        let mut playfield = playfield();
        playfield.key_down(Key::Duck, 0.0);
        only(&mut playfield, PTERODACTYLUS_URL, 158.0);

        playfield.update();

        assert!(!playfield.state().is_game_over);
    }
}
