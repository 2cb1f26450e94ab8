use crate::engine::stage::{NodeId, Sprite, Stage, TextureKey};
use crate::engine::timer::Timeout;
use crate::engine::Point;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

pub const SCORE_INCREMENT: f64 = 0.1;
// below zero nothing is displayed, the first second of play is a lead-in
const SCORE_LEAD_IN: f64 = -1.0;
// the display is fixed width, higher scores roll over
const SCORE_DIGITS: usize = 6;
const SCORE_MODULUS: u64 = 1_000_000;

pub const GAME_OVER_URL: TextureKey = "sprites/gameover.png";

/// Score as origin + frames * increment
/// - computed from the frame count, so N frames from 0 are exactly
///   `N * SCORE_INCREMENT` with no accumulated float drift
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Score {
    origin: f64,
    frames: u64,
}

impl Score {
    /// Score of a freshly loaded page, counts up from -1
    pub fn lead_in() -> Self {
        Score {
            origin: SCORE_LEAD_IN,
            frames: 0,
        }
    }

    /// Score right after a restart
    pub fn started() -> Self {
        Score {
            origin: 0.0,
            frames: 0,
        }
    }

    pub fn advance(&mut self) {
        self.frames = self.frames.saturating_add(1);
    }

    pub fn value(&self) -> f64 {
        self.origin + self.frames as f64 * SCORE_INCREMENT
    }

    pub fn has_started(&self) -> bool {
        self.value() >= 0.0
    }

    /// `floor(score)` zero-padded to 6 digits, `None` during the lead-in
    pub fn display(&self) -> Option<String> {
        if !self.has_started() {
            return None;
        }
        let whole = self.value().floor() as u64 % SCORE_MODULUS;
        Some(format!("{:0width$}", whole, width = SCORE_DIGITS))
    }
}

/// Flags, timeouts and randomness shared by every controller
///
/// `is_double_jumping` implies `is_jumping`. Ducking and jumping exclude each
/// other only at the moment one of them starts (see `sprite::player`).
#[derive(Debug)]
pub struct GameState {
    pub score: Score,
    pub is_game_over: bool,
    pub is_jumping: bool,
    pub is_double_jumping: bool,
    pub is_ducked: bool,
    pub jump_timer: Timeout,
    pub duck_timer: Timeout,
    rng: SmallRng,
}

impl GameState {
    pub fn new(rng: SmallRng) -> Self {
        GameState {
            score: Score::lead_in(),
            is_game_over: false,
            is_jumping: false,
            is_double_jumping: false,
            is_ducked: false,
            jump_timer: Timeout::default(),
            duck_timer: Timeout::default(),
            rng,
        }
    }

    pub fn from_entropy() -> Self {
        GameState::new(SmallRng::from_entropy())
    }

    /// Uniform in `[min, max)`
    pub fn random_between(&mut self, min: f32, max: f32) -> f32 {
        self.rng.gen_range(min..max)
    }
}

/// What every `Updatable` gets handed each frame
pub struct World {
    pub stage: Stage,
    pub state: GameState,
    pub end_screen: NodeId,
}

impl World {
    /// Puts the (hidden) end screen on top of everything already staged
    pub fn new(mut stage: Stage, state: GameState) -> Self {
        let end_screen = stage.add_hidden(Sprite::new(GAME_OVER_URL, Point::default()));
        World {
            stage,
            state,
            end_screen,
        }
    }

    /// Safe to call more than once in a frame. Stopping the clock is left to
    /// whoever owns the `Ticker`, after the current frame is done.
    pub fn trigger_game_over(&mut self) {
        if !self.state.is_game_over {
            log!(
                "Game over with score {}",
                self.state.score.display().unwrap_or_default()
            );
        }
        self.state.is_game_over = true;
        self.stage.set_visible(self.end_screen, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn lead_in_shows_nothing_until_zero() {
        let mut score = Score::lead_in();
        for _ in 0..9 {
            score.advance();
            assert_eq!(score.display(), None);
        }
        score.advance();
        assert_eq!(score.display().as_deref(), Some("000000"));
    }

    #[test]
    fn display_is_floor_of_frames_times_increment() {
        for frames in [1_u64, 3, 9, 10, 29, 30, 70, 123, 9_999] {
            let mut score = Score::started();
            for _ in 0..frames {
                score.advance();
            }
            let expected = (frames as f64 * SCORE_INCREMENT).floor() as u64;
            assert_eq!(score.display(), Some(format!("{:06}", expected)));
        }
    }

    #[test]
    fn display_keeps_six_digits_past_a_million() {
        let score = Score {
            origin: 1_234_567.0,
            frames: 0,
        };
        assert_eq!(score.display().as_deref(), Some("234567"));
    }

    #[test]
    fn score_never_decreases() {
        let mut score = Score::lead_in();
        let mut last = score.value();
        for _ in 0..1_000 {
            score.advance();
            assert!(score.value() >= last);
            last = score.value();
        }
        assert_relative_eq!(last, 99.0, epsilon = 1e-9);
    }

    #[test]
    fn random_between_stays_in_range() {
        let mut state = GameState::new(SmallRng::seed_from_u64(11));
        for _ in 0..1_000 {
            let value = state.random_between(1400.0, 1800.0);
            assert!((1400.0..1800.0).contains(&value));
        }
    }

    #[test]
    fn game_over_shows_the_end_screen() {
        let mut world = World::new(Stage::new(), GameState::new(SmallRng::seed_from_u64(1)));
        assert!(!world.stage.is_visible(world.end_screen));

        world.trigger_game_over();
        world.trigger_game_over();

        assert!(world.state.is_game_over);
        assert!(world.stage.is_visible(world.end_screen));
    }
}
