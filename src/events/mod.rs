mod keyboard;
mod lifecycle;
mod message;
mod pointer;

pub use keyboard::wire_keyboard;
pub use lifecycle::{wire_audio_toggle, wire_resize, wire_visibility};
pub use message::wire_messages;
pub use pointer::wire_pointer;

use crate::audio::AudioOut;
use crate::dom;
use crate::overlay::DomOverlays;
use room_core::{Effect, Effects, RoomApp};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

/// Handles shared by every listener and the frame loop.
#[derive(Clone)]
pub struct Shell {
    pub document: web::Document,
    pub canvas: web::HtmlCanvasElement,
    pub app: Rc<RefCell<RoomApp>>,
    pub overlays: Rc<RefCell<DomOverlays>>,
    /// `None` until the buffers are decoded; sounds requested before that
    /// are dropped.
    pub audio: Rc<RefCell<Option<AudioOut>>>,
}

impl Shell {
    /// Run a mutation on the app, then carry out what it asked for. The app
    /// borrow ends before any effect runs.
    pub fn dispatch(&self, f: impl FnOnce(&mut RoomApp) -> Effects) {
        let fx = f(&mut self.app.borrow_mut());
        self.apply(fx);
    }

    pub fn apply(&self, fx: Effects) {
        for effect in fx {
            match effect {
                Effect::PlaySound(req) => {
                    if let Some(a) = self.audio.borrow().as_ref() {
                        a.play(&req);
                    }
                }
                Effect::Fade(cmd) => {
                    if let Some(a) = self.audio.borrow().as_ref() {
                        a.fade(&cmd);
                    }
                }
                Effect::OpenUrl(url) => dom::open_url(&url),
                Effect::Routing(routing) => {
                    let app = self.app.borrow();
                    self.overlays
                        .borrow()
                        .apply_routing(&self.canvas, &app, routing);
                }
                Effect::GalleryOpened | Effect::GalleryClosed => {
                    let app = self.app.borrow();
                    let mut overlays = self.overlays.borrow_mut();
                    overlays.sync_elements(&self.document, &app);
                    // new cards need their routing too
                    overlays.apply_routing(&self.canvas, &app, app.routing());
                }
                Effect::FlipHint(visible) => dom::set_flip_instruction(&self.document, visible),
            }
        }
    }
}
