use super::Shell;
use crate::input;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn wire_pointer(shell: &Shell) {
    wire_click(shell);
    wire_mousemove(shell);
}

fn wire_click(shell: &Shell) {
    let shell = shell.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
        if !input::is_primary(&ev) {
            return;
        }
        let p = input::client_px(&ev);
        shell.dispatch(|app| app.click(p.x, p.y));
    }) as Box<dyn FnMut(_)>);
    if let Some(window) = web::window() {
        _ = window.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

fn wire_mousemove(shell: &Shell) {
    let shell = shell.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
        let p = input::client_px(&ev);
        shell.app.borrow_mut().pointer_move(p.x, p.y);
    }) as Box<dyn FnMut(_)>);
    if let Some(window) = web::window() {
        _ = window.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
