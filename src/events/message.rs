use super::Shell;
use crate::input;
use room_core::message::CrossMessage;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Messages from the page embedded on the TV.
pub fn wire_messages(shell: &Shell) {
    let shell = shell.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::MessageEvent| {
        let Some(text) = input::message_json(&ev) else {
            log::debug!("[message] ignored unserializable message");
            return;
        };
        match CrossMessage::from_json(&text) {
            Ok(msg) => {
                log::debug!("[message] {:?}", msg);
                shell.dispatch(|app| app.message(msg));
            }
            Err(e) => log::debug!("[message] {}", e),
        }
    }) as Box<dyn FnMut(_)>);
    if let Some(window) = web::window() {
        _ = window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
