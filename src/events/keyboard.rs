use super::Shell;
use room_core::constants::KEY_CANCEL;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn wire_keyboard(shell: &Shell) {
    let shell = shell.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        if ev.repeat() {
            return;
        }
        let code = ev.code();
        // keep Space from scrolling the page
        if code == KEY_CANCEL {
            ev.prevent_default();
        }
        shell.dispatch(|app| app.key(&code));
    }) as Box<dyn FnMut(_)>);
    if let Some(window) = web::window() {
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
