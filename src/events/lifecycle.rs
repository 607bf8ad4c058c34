use super::Shell;
use crate::constants::AUDIO_TOGGLE_ID;
use crate::dom;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Keep the canvas backing store and the app viewport in step with the
/// window.
pub fn wire_resize(shell: &Shell) {
    dom::sync_canvas_backing_size(&shell.canvas);
    let shell = shell.clone();
    let closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&shell.canvas);
        shell.app.borrow_mut().resize(dom::client_viewport());
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

pub fn wire_visibility(shell: &Shell) {
    let document = shell.document.clone();
    let shell = shell.clone();
    let closure = Closure::wrap(Box::new(move || {
        let visible = !shell.document.hidden();
        log::debug!("[audio] page visible={}", visible);
        shell.dispatch(|app| app.visibility(visible));
    }) as Box<dyn FnMut()>);
    _ = document
        .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
    closure.forget();
}

pub fn wire_audio_toggle(shell: &Shell) {
    let s = shell.clone();
    dom::add_click_listener(&shell.document, AUDIO_TOGGLE_ID, move || {
        s.dispatch(|app| app.toggle_mute());
        let muted = s.app.borrow().audio().is_manually_muted();
        dom::set_mute_button(&s.document, muted);
    });
}
