use crate::browser;
use anyhow::Result;
use futures::channel::mpsc::{unbounded, UnboundedReceiver};
use wasm_bindgen::JsCast;

/// One keydown, in the order the browser delivered them
/// - `code` is `KeyboardEvent.code` ("ArrowUp", "Enter", ...)
/// - `time` is `Event.timeStamp`, same clock as `browser::now()`
#[derive(Debug, Clone, PartialEq)]
pub struct KeyPress {
    pub code: String,
    pub time: f64,
}

/// Listens for keydown on the whole window and queues every press
/// (key repeat included) until the game loop drains them
pub fn prepare_input() -> Result<UnboundedReceiver<KeyPress>> {
    let (keydown_sender, keydown_receiver) = unbounded();

    let onkeydown = browser::closure_wrap(Box::new(move |event: web_sys::KeyboardEvent| {
        let _ = keydown_sender.unbounded_send(KeyPress {
            code: event.code(),
            time: event.time_stamp(),
        });
    }) as Box<dyn FnMut(web_sys::KeyboardEvent)>);

    browser::window()?.set_onkeydown(Some(onkeydown.as_ref().unchecked_ref()));
    // lives as long as the page
    onkeydown.forget();

    Ok(keydown_receiver)
}

/// Everything queued so far, never waits
pub fn drain(receiver: &mut UnboundedReceiver<KeyPress>) -> Vec<KeyPress> {
    let mut presses = Vec::new();
    // Err : nothing queued right now, or the sender is gone
    while let Ok(press) = receiver.try_recv() {
        presses.push(press);
    }
    presses
}
