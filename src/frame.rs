use crate::events::Shell;
use crate::render;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

// frames slower than this get a debug line
const SLOW_FRAME_SEC: f32 = 0.1;

pub struct FrameContext<'a> {
    pub shell: Shell,
    pub gpu: Option<render::GpuState<'a>>,
    pub last_instant: Instant,
}

impl<'a> FrameContext<'a> {
    pub fn new(shell: Shell, gpu: Option<render::GpuState<'a>>) -> Self {
        Self {
            shell,
            gpu,
            last_instant: Instant::now(),
        }
    }

    /// One animation frame: advance the camera, then sync the DOM layers
    /// and draw the scene from the same camera state.
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant).as_secs_f32();
        self.last_instant = now;
        if dt_sec > SLOW_FRAME_SEC {
            log::debug!("[frame] slow frame {:.0}ms", dt_sec * 1000.0);
        }

        if self.shell.app.borrow_mut().tick() {
            let app = self.shell.app.borrow();
            log::debug!("[focus] landed on {}", app.focus().state().label());
        }

        let app = self.shell.app.borrow();
        self.shell.overlays.borrow().apply(&app);

        if let Some(g) = &mut self.gpu {
            let w = self.shell.canvas.width();
            let h = self.shell.canvas.height();
            g.resize_if_needed(w, h);
            if let Err(e) = g.render(app.scene(), app.camera()) {
                log::error!("render error: {:?}", e);
            }
        }
    }
}

/// The scene still works without WebGPU: overlays and focus keep running,
/// only the meshes are missing.
pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
