use crate::browser;
use crate::sound;
use anyhow::{anyhow, Context, Error, Result};
// web assembly is a single threaded environment, so Rc RefCell > Mutex
use async_trait::async_trait;
use futures::channel::oneshot::channel;
use futures::future::try_join_all;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::{
    // unchecked_ref (unsafe) cast from Javascript type to Rust type
    // - because we control the closure creation and specify the expected type,
    // in principle this should be generally safe (unsafe) code
    JsCast,
    JsValue,
};
use web_sys::{AudioBuffer, AudioContext, CanvasRenderingContext2d, HtmlImageElement};

pub mod input;
pub mod stage;
pub mod ticker;
pub mod timer;

use self::input::KeyPress;
use self::stage::{Drawable, Sprite, Stage, Text, TextureKey, TilingSprite};

/// Everything the loop needs from a game, called in this order per frame :
/// 1. `run_timers` + `key_down` for every queued key press (oldest first)
/// 2. `run_timers` up to the frame timestamp
/// 3. `update` at a fixed 60Hz, only while `is_running`
/// 4. `draw`, always (a stopped game still shows its last frame)
#[async_trait(?Send)]
pub trait Game {
    async fn initialize(&self) -> Result<Box<dyn Game>>;
    fn key_down(&mut self, press: &KeyPress);
    fn run_timers(&mut self, now: f64);
    fn is_running(&self) -> bool;
    fn update(&mut self);
    fn draw(&self, renderer: &Renderer);
}

// length of a frame in milliseconds
const FRAME_SIZE: f32 = 1.0 / 60.0 * 1000.0;
// most time one animation frame may replay, a tab coming back from the
// background resumes where it paused
const MAX_ACCUMULATED_DELTA: f32 = FRAME_SIZE * 3.0;

pub struct GameLoop {
    last_frame: f64,
    accumulated_delta: f32,
}

type SharedLoopClosure = Rc<RefCell<Option<browser::LoopClosure>>>;

impl GameLoop {
    pub async fn start(game: impl Game + 'static) -> Result<()> {
        let mut game = game.initialize().await?;
        let mut keyevent_receiver = input::prepare_input()?;
        let mut game_loop = GameLoop {
            last_frame: browser::now()?,
            accumulated_delta: 0.0,
        };
        let renderer = Renderer {
            context: browser::context()?,
        };
        let f: SharedLoopClosure = Rc::new(RefCell::new(None));
        let g = f.clone();
        *g.borrow_mut() = Some(browser::create_raf_closure(move |perf: f64| {
            // timeouts that came due before a key press fire before it
            for press in input::drain(&mut keyevent_receiver) {
                game.run_timers(press.time);
                game.key_down(&press);
            }
            game.run_timers(perf);

            if game.is_running() {
                game_loop.accumulate(perf);
                while game.is_running() && game_loop.take_frame() {
                    game.update();
                }
            } else {
                game_loop.pause(perf);
            }
            game.draw(&renderer);

            if let Some(callback) = f.borrow().as_ref() {
                if let Err(err) = browser::request_animation_frame(callback) {
                    error!("GameLoop: {:#?}", err);
                }
            }
        }));

        browser::request_animation_frame(
            g.borrow()
                .as_ref()
                .ok_or_else(|| anyhow!("GameLoop: Loop is None"))?,
        )?;

        Ok(())
    }

    /// Banks the time since the last frame, capped at `MAX_ACCUMULATED_DELTA`
    fn accumulate(&mut self, perf: f64) {
        let delta = (perf - self.last_frame) as f32;
        self.accumulated_delta = (self.accumulated_delta + delta).min(MAX_ACCUMULATED_DELTA);
        self.last_frame = perf;
    }

    /// Spends one fixed step of the banked time, if there is one
    fn take_frame(&mut self) -> bool {
        if self.accumulated_delta > FRAME_SIZE {
            self.accumulated_delta -= FRAME_SIZE;
            true
        } else {
            false
        }
    }

    /// Stopped clock : the paused time is not banked for the restart
    fn pause(&mut self, perf: f64) {
        self.accumulated_delta = 0.0;
        self.last_frame = perf;
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

pub struct Renderer {
    context: CanvasRenderingContext2d,
}

impl Renderer {
    pub fn clear(&self, rect: &Rect) {
        self.context.clear_rect(
            rect.x.into(),
            rect.y.into(),
            rect.width.into(),
            rect.height.into(),
        );
    }

    /// Draws every visible node back to front
    /// - nodes whose texture is not in `textures` are skipped
    pub fn draw_stage(&self, stage: &Stage, textures: &Textures) {
        for (_, node) in stage.nodes().filter(|(_, node)| node.visible) {
            let drawn = match &node.drawable {
                Drawable::Sprite(sprite) => textures
                    .get(sprite.texture)
                    .map_or(Ok(()), |image| self.draw_sprite(image, sprite)),
                Drawable::Tiling(tiling) => textures
                    .get(tiling.texture)
                    .map_or(Ok(()), |image| self.draw_tiling(image, tiling)),
                Drawable::Text(text) => self.draw_text(text),
            };
            drawn.expect("Drawing is throwing exceptions! Unrecoverable error");
        }
    }

    fn draw_sprite(&self, image: &HtmlImageElement, sprite: &Sprite) -> Result<(), JsValue> {
        let scale = f64::from(sprite.scale);
        self.context.save();
        // rotation pivots around the top left corner
        self.context
            .translate(sprite.position.x.into(), sprite.position.y.into())?;
        self.context.rotate(sprite.rotation.into())?;
        self.context
            .draw_image_with_html_image_element_and_dw_and_dh(
                image,
                0.0,
                0.0,
                f64::from(image.width()) * scale,
                f64::from(image.height()) * scale,
            )?;
        self.context.restore();
        Ok(())
    }

    fn draw_tiling(&self, image: &HtmlImageElement, tiling: &TilingSprite) -> Result<(), JsValue> {
        let tile_width = f64::from(image.width());
        let tile_height = f64::from(image.height());
        // image not decoded yet
        if tile_width <= 0.0 || tile_height <= 0.0 {
            return Ok(());
        }
        let origin_x = f64::from(tiling.position.x);
        let origin_y = f64::from(tiling.position.y);
        let width = f64::from(tiling.width);
        let height = f64::from(tiling.height);

        self.context.save();
        self.context.begin_path();
        self.context.rect(origin_x, origin_y, width, height);
        self.context.clip();

        let mut y = f64::from(tiling.tile_offset.y).rem_euclid(tile_height) - tile_height;
        while y < height {
            let mut x = f64::from(tiling.tile_offset.x).rem_euclid(tile_width) - tile_width;
            while x < width {
                self.context
                    .draw_image_with_html_image_element(image, origin_x + x, origin_y + y)?;
                x += tile_width;
            }
            y += tile_height;
        }

        self.context.restore();
        Ok(())
    }

    fn draw_text(&self, text: &Text) -> Result<(), JsValue> {
        self.context.set_font(text.style.font);
        self.context.set_fill_style_str(text.style.fill);
        self.context.set_text_align(text.style.align);
        self.context.set_text_baseline("top");
        self.context.fill_text(
            &text.content,
            text.position.x.into(),
            text.position.y.into(),
        )
    }
}

/// Asynchronously load an image from a given source path
/// # Arguments
/// * `source` - string slice to path/url
/// # Returns
/// * `Ok(HtmlImageElement)` - on load success
/// * `Err` - on load fail
pub async fn load_image(source: &str) -> Result<HtmlImageElement> {
    let image = browser::new_image()?;
    let (tx, rx) = channel::<Result<(), Error>>();
    let success_tx = Rc::new(RefCell::new(Some(tx)));
    let error_tx = success_tx.clone();

    // the sender is taken on first use, so either callback reports at most once
    let success_callback = browser::closure_wrap(Box::new(move || {
        if let Some(tx) = success_tx.borrow_mut().take() {
            let _ = tx.send(Ok(()));
        }
    }) as Box<dyn FnMut()>);

    let error_callback = browser::closure_wrap(Box::new(move |err: JsValue| {
        if let Some(tx) = error_tx.borrow_mut().take() {
            let _ = tx.send(Err(anyhow!(
                "[engine::load_image] Error loading image: {:#?}",
                err
            )));
        }
    }) as Box<dyn FnMut(JsValue)>);

    image.set_onload(Some(success_callback.as_ref().unchecked_ref()));
    image.set_onerror(Some(error_callback.as_ref().unchecked_ref()));
    image.set_src(source);

    // keep callback alive until image is loaded or errors
    success_callback.forget();
    error_callback.forget();

    // ?? - Result<Result<(), Error>, oneshot::Canceled>
    // - first ? yields channel result : Result<(), Error>
    // - second ? yields image load result : () or propagating Error
    rx.await??;

    Ok(image)
}

/// Images keyed by the path they were loaded from, so a `Sprite` only has to
/// carry its `TextureKey`
#[derive(Default)]
pub struct Textures {
    images: HashMap<TextureKey, HtmlImageElement>,
}

impl Textures {
    /// Loads every path in parallel, total time is the slowest image
    pub async fn load(paths: &[TextureKey]) -> Result<Self> {
        let loaded = try_join_all(paths.iter().map(|&path| async move {
            load_image(path)
                .await
                .with_context(|| format!("Failed to load texture from : {}", path))
                .map(|image| (path, image))
        }))
        .await?;

        Ok(Textures {
            images: loaded.into_iter().collect(),
        })
    }

    pub fn get(&self, key: TextureKey) -> Option<&HtmlImageElement> {
        self.images.get(key)
    }
}

#[derive(Clone)]
pub struct Audio {
    context: AudioContext,
}

#[derive(Clone)]
pub struct Sound {
    buffer: AudioBuffer,
}

impl Audio {
    pub fn new() -> Result<Self> {
        Ok(Audio {
            context: sound::create_audio_context()?,
        })
    }

    pub async fn load_sound(&self, filename: &str) -> Result<Sound> {
        let array_buffer = browser::fetch_array_buffer(filename).await?;
        let audio_buffer = sound::decode_audio_data(&self.context, &array_buffer).await?;

        Ok(Sound {
            buffer: audio_buffer,
        })
    }

    /// Fire and forget, every call gets its own source node so plays overlap
    pub fn play_sound(&self, sound: &Sound) -> Result<()> {
        sound::play_sound(&self.context, &sound.buffer)
    }
}
