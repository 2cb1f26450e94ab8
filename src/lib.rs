// ==================== Imports ====================
use engine::GameLoop;
use game::DinoRun;
use wasm_bindgen::prelude::*;

#[macro_use]
pub mod browser;
pub mod engine;
pub mod game;
pub mod sound;
pub mod sprite;
pub mod state;

// ==================== Main Functions ====================
/// Main entry for Webassembly module
/// - readable panics in the console
/// - loads every asset, then hands the game to the loop
#[wasm_bindgen(start)]
pub fn main_js() -> Result<(), JsValue> {
    // setup better panic messages for debugging
    console_error_panic_hook::set_once();

    // spawns a new asynchronous task in local thread, for web assembly
    // environment, using wasm_bindgen_futures
    browser::spawn_local(async move {
        if let Err(err) = GameLoop::start(DinoRun::new()).await {
            error!("Could not start game loop : {:#?}", err);
        }
    });

    Ok(())
}
