use crate::constants::{
    ACTIVE_CLASS, AUDIO_TOGGLE_ID, FLIP_INSTRUCTION_ID, HIDDEN_CLASS, LOADING_PROGRESS_ID,
    LOADING_SCREEN_ID, LOADING_TEXT_ID, MUTED_CLASS,
};
use room_core::Viewport;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}

/// Window size in CSS pixels.
pub fn client_viewport() -> Viewport {
    let Some(w) = web::window() else {
        return Viewport::default();
    };
    let px = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(1.0) as f32
    };
    Viewport::new(px(w.inner_width()), px(w.inner_height()))
}

#[inline]
pub fn set_style(el: &web::HtmlElement, property: &str, value: &str) {
    _ = el.style().set_property(property, value);
}

#[inline]
pub fn set_pointer_events(el: &web::HtmlElement, enabled: bool) {
    set_style(el, "pointer-events", if enabled { "auto" } else { "none" });
}

pub fn create_div(document: &web::Document, class: Option<&str>) -> anyhow::Result<web::HtmlElement> {
    let el = document
        .create_element("div")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .dyn_into::<web::HtmlElement>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    if let Some(c) = class {
        el.set_class_name(c);
    }
    Ok(el)
}

pub fn append_to_body(document: &web::Document, el: &web::Element) -> anyhow::Result<()> {
    let body = document.body().ok_or_else(|| anyhow::anyhow!("no body"))?;
    body.append_child(el).map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(())
}

/// Minimal escaping for text interpolated into element markup.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn open_url(url: &str) {
    if let Some(w) = web::window() {
        if let Err(e) = w.open_with_url_and_target(url, "_blank") {
            log::warn!("[dom] could not open {}: {:?}", url, e);
        }
    }
}

// ---------------- Loading screen ----------------

pub fn set_loading_progress(document: &web::Document, percent: u32) {
    if let Some(bar) = document
        .get_element_by_id(LOADING_PROGRESS_ID)
        .and_then(|e| e.dyn_into::<web::HtmlElement>().ok())
    {
        set_style(&bar, "width", &format!("{}%", percent));
    }
    if let Some(label) = document.get_element_by_id(LOADING_TEXT_ID) {
        label.set_text_content(Some(&format!("LOADING {}%", percent)));
    }
}

pub fn hide_loading_screen(document: &web::Document) {
    if let Some(el) = document
        .get_element_by_id(LOADING_SCREEN_ID)
        .and_then(|e| e.dyn_into::<web::HtmlElement>().ok())
    {
        _ = el.class_list().add_1(HIDDEN_CLASS);
        set_pointer_events(&el, false);
    }
}

// ---------------- Flip instruction ----------------

pub fn create_flip_instruction(document: &web::Document) -> anyhow::Result<()> {
    if document.get_element_by_id(FLIP_INSTRUCTION_ID).is_some() {
        return Ok(());
    }
    let div = create_div(document, None)?;
    div.set_id(FLIP_INSTRUCTION_ID);
    div.set_inner_html("Click the card <br> to flip it");
    _ = div.set_attribute(
        "style",
        "position:fixed;top:50%;left:15%;transform:translateY(-50%);text-align:center;\
         color:rgba(255,255,255,0.6);font-family:'Segoe UI',sans-serif;font-size:12px;\
         font-weight:600;letter-spacing:3px;text-transform:uppercase;pointer-events:none;\
         opacity:0;transition:opacity 0.5s ease;z-index:1001;line-height:1.8",
    );
    append_to_body(document, &div)
}

pub fn set_flip_instruction(document: &web::Document, visible: bool) {
    if let Some(el) = document
        .get_element_by_id(FLIP_INSTRUCTION_ID)
        .and_then(|e| e.dyn_into::<web::HtmlElement>().ok())
    {
        let cl = el.class_list();
        if visible {
            _ = cl.add_1(ACTIVE_CLASS);
        } else {
            _ = cl.remove_1(ACTIVE_CLASS);
        }
        set_style(&el, "opacity", if visible { "1" } else { "0" });
    }
}

pub fn set_mute_button(document: &web::Document, muted: bool) {
    if let Some(el) = document.get_element_by_id(AUDIO_TOGGLE_ID) {
        let cl = el.class_list();
        if muted {
            _ = cl.add_1(MUTED_CLASS);
        } else {
            _ = cl.remove_1(MUTED_CLASS);
        }
    }
}
