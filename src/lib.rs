#![cfg(target_arch = "wasm32")]
use crate::audio::AudioOut;
use crate::constants::CANVAS_ID;
use crate::events::Shell;
use crate::overlay::DomOverlays;
use instant::Instant;
use room_core::constants::LOADING_HIDE_DELAY_MS;
use room_core::{RoomApp, RoomConfig};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod audio;
mod constants;
mod dom;
mod events;
mod frame;
mod input;
mod loader;
mod overlay;
mod render;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("room-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas_el = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", CANVAS_ID))?;
    let canvas: web::HtmlCanvasElement = canvas_el
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    dom::create_flip_instruction(&document)?;

    let config = RoomConfig::default();
    let started = Instant::now();
    let progress_doc = document.clone();
    let scene = match loader::load_scene(&config.scene_url, move |p| {
        dom::set_loading_progress(&progress_doc, p.percent())
    })
    .await
    {
        Ok(scene) => scene,
        Err(e) => {
            // the loading screen stays up
            log::error!("[scene] {} failed: {}", config.scene_url, e);
            return Ok(());
        }
    };
    log::info!(
        "[scene] {} nodes in {:.0}ms",
        scene.len(),
        started.elapsed().as_secs_f64() * 1000.0
    );

    let app = RoomApp::new(config, scene, dom::client_viewport());
    let overlays = DomOverlays::new(&document, &canvas)?;
    let shell = Shell {
        document: document.clone(),
        canvas: canvas.clone(),
        app: Rc::new(RefCell::new(app)),
        overlays: Rc::new(RefCell::new(overlays)),
        audio: Rc::new(RefCell::new(None)),
    };
    {
        let app = shell.app.borrow();
        let mut overlays = shell.overlays.borrow_mut();
        overlays.sync_elements(&document, &app);
        overlays.apply_routing(&canvas, &app, app.routing());
    }

    events::wire_resize(&shell);
    events::wire_pointer(&shell);
    events::wire_keyboard(&shell);
    events::wire_messages(&shell);
    events::wire_visibility(&shell);
    events::wire_audio_toggle(&shell);

    let gpu = frame::init_gpu(&canvas).await;
    frame::start_loop(Rc::new(RefCell::new(frame::FrameContext::new(
        shell.clone(),
        gpu,
    ))));

    schedule_loading_done(shell);
    Ok(())
}

/// Hide the loading screen shortly after the first frame, then bring up
/// audio.
fn schedule_loading_done(shell: Shell) {
    let Some(window) = web::window() else {
        return;
    };
    let closure = Closure::wrap(Box::new(move || {
        dom::hide_loading_screen(&shell.document);
        spawn_local(init_audio(shell.clone()));
    }) as Box<dyn FnMut()>);
    _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        LOADING_HIDE_DELAY_MS as i32,
    );
    closure.forget();
}

async fn init_audio(shell: Shell) {
    if shell.audio.borrow().is_some() {
        return;
    }
    let mut out = match AudioOut::init().await {
        Ok(out) => out,
        Err(e) => {
            log::warn!("[audio] unavailable: {:?}", e);
            return;
        }
    };
    let (music, ambience) = shell.app.borrow().audio().initial_levels();
    match out.start_loops(music, ambience) {
        Ok(()) => {
            shell.app.borrow_mut().audio_ready();
        }
        Err(e) => log::warn!("[audio] loops failed: {:?}", e),
    }
    *shell.audio.borrow_mut() = Some(out);
    let muted = shell.app.borrow().audio().is_manually_muted();
    dom::set_mute_button(&shell.document, muted);
}
