//! The two CSS 3D layers and the DOM elements placed in them.
//!
//! Elements mirror the core overlay registry: `sync_elements` creates an
//! element for every new overlay and drops the ones whose overlay is gone,
//! `apply` writes camera, transforms, opacity and card styling each frame.

use crate::constants::{
    CSS_BACK_LAYER_ID, CSS_FRONT_LAYER_ID, HOLO_STYLE_ID, Z_BACK_LAYER, Z_CANVAS, Z_FRONT_LAYER,
};
use crate::dom;
use fnv::FnvHashMap;
use room_core::overlay::{css_camera, object_css_transform, CssCamera, Layer, OverlayId, OverlayKind};
use room_core::{PointerRouting, RoomApp, Viewport};
use wasm_bindgen::JsCast;
use web_sys as web;

const HOLO_CSS: &str = "
.card { width: 320px; height: 440px; position: relative; transform-style: preserve-3d; }
.card__front, .card__back {
  position: absolute; inset: 0; border-radius: 4.55% / 3.5%; overflow: hidden;
  backface-visibility: hidden; -webkit-backface-visibility: hidden;
  box-shadow: 0 0 12px rgba(0, 0, 0, 0.6);
}
.card__back {
  transform: rotateY(180deg); display: flex; flex-direction: column; padding: 24px;
  box-sizing: border-box; background: rgba(15, 15, 15, 0.98);
}
.card__shine, .card__glare {
  position: absolute; inset: 0; pointer-events: none; mix-blend-mode: color-dodge;
  opacity: var(--holo-opacity, 0); transition: opacity 0.3s ease;
}
.card__shine {
  background-image: repeating-linear-gradient(55deg, hsl(3, 95%, 85%) 0%, hsl(207, 100%, 84%) 12%,
    hsl(29, 100%, 85%) 24%, hsl(160, 100%, 86%) 36%, hsl(309, 94%, 87%) 48%, hsl(3, 95%, 85%) 60%);
  background-size: 400% 100%;
  background-position: calc(((var(--background-x) - 50%) * -2.5) + 50%)
    calc(((var(--background-y) - 50%) * -2.5) + 50%);
  filter: brightness(calc(0.6 + var(--hyp, 0) / 140)) contrast(1.4) saturate(0.8);
}
.card__glare {
  mix-blend-mode: overlay;
  background-image: radial-gradient(farthest-corner circle at var(--pointer-x) var(--pointer-y),
    hsla(0, 0%, 100%, 0.33) 0%, hsl(0, 0%, 25%) 110%);
}
.card__content { position: relative; height: 100%; }
";

struct CssLayer {
    root: web::HtmlElement,
    camera: web::HtmlElement,
}

impl CssLayer {
    fn new(document: &web::Document, id: &str, z_index: &str) -> anyhow::Result<Self> {
        let root = dom::create_div(document, None)?;
        root.set_id(id);
        _ = root.set_attribute(
            "style",
            &format!("position:absolute;top:0;left:0;overflow:hidden;z-index:{}", z_index),
        );
        let camera = dom::create_div(document, None)?;
        _ = camera.set_attribute("style", "transform-style:preserve-3d;pointer-events:none");
        root.append_child(&camera)
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        dom::append_to_body(document, &root)?;
        Ok(Self { root, camera })
    }

    fn apply_camera(&self, cam: &CssCamera, viewport: Viewport) {
        let w = format!("{}px", viewport.width);
        let h = format!("{}px", viewport.height);
        dom::set_style(&self.root, "width", &w);
        dom::set_style(&self.root, "height", &h);
        dom::set_style(&self.root, "perspective", &format!("{}px", cam.perspective_px));
        dom::set_style(&self.camera, "width", &w);
        dom::set_style(&self.camera, "height", &h);
        dom::set_style(&self.camera, "transform", &cam.transform);
    }

    fn add(&self, el: &web::HtmlElement) -> anyhow::Result<()> {
        self.camera
            .append_child(el)
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        Ok(())
    }
}

pub struct DomOverlays {
    back: CssLayer,
    front: CssLayer,
    elements: FnvHashMap<OverlayId, web::HtmlElement>,
}

fn inject_holo_styles(document: &web::Document) -> anyhow::Result<()> {
    if document.get_element_by_id(HOLO_STYLE_ID).is_some() {
        return Ok(());
    }
    let style = document
        .create_element("style")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    style.set_id(HOLO_STYLE_ID);
    style.set_text_content(Some(HOLO_CSS));
    let head = document.head().ok_or_else(|| anyhow::anyhow!("no head"))?;
    head.append_child(&style)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(())
}

fn tv_panel_element(
    document: &web::Document,
    src: &str,
    size: glam::Vec2,
) -> anyhow::Result<web::HtmlElement> {
    let div = dom::create_div(document, None)?;
    _ = div.set_attribute(
        "style",
        &format!(
            "position:absolute;width:{}px;height:{}px;background-color:#000",
            size.x, size.y
        ),
    );
    let iframe = document
        .create_element("iframe")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .dyn_into::<web::HtmlIFrameElement>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    _ = iframe.set_attribute("style", "width:100%;height:100%;border:0px");
    iframe.set_src(src);
    div.append_child(&iframe)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(div)
}

fn case_card_element(
    document: &web::Document,
    case: &room_core::config::CaseConfig,
) -> anyhow::Result<web::HtmlElement> {
    let div = dom::create_div(document, Some("game-info-card"))?;
    _ = div.set_attribute(
        "style",
        "position:absolute;width:380px;padding:25px;color:white;\
         background:rgba(15,15,15,0.98);border:1px solid rgba(255,255,255,0.1);\
         border-left:4px solid #fff;border-radius:4px;font-family:'Segoe UI',sans-serif;\
         opacity:0;transition:opacity 0.4s ease;pointer-events:auto;will-change:transform,opacity",
    );
    let e = dom::escape_html;
    div.set_inner_html(&format!(
        "<h1 style=\"margin:0;font-size:1.8em;text-transform:uppercase;letter-spacing:2px\">{}</h1>\
         <h3 style=\"margin:5px 0 15px 0;font-weight:300;color:#aaa;font-size:0.9em\">{}</h3>\
         <p style=\"line-height:1.5;color:#ddd;font-size:0.85em;margin-bottom:15px\">{}</p>\
         <hr style=\"border-color:rgba(255,255,255,0.1);margin:15px 0\"/>\
         <div style=\"display:grid;grid-template-columns:1fr 1fr 1fr;gap:8px;font-size:0.8em;margin-bottom:20px\">\
         <div><strong style=\"color:#888;font-size:0.7em\">GENRE</strong><br/>{}</div>\
         <div><strong style=\"color:#888;font-size:0.7em\">RELEASE</strong><br/>{}</div>\
         <div><strong style=\"color:#888;font-size:0.7em\">PLATFORM</strong><br/>{}</div></div>",
        e(&case.title),
        e(&case.subtitle),
        e(&case.description),
        e(&case.genre),
        e(&case.release),
        e(&case.platform),
    ));
    if let Some(url) = case.store_url.clone() {
        let button = document
            .create_element("button")
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        _ = button.set_attribute(
            "style",
            "width:100%;padding:12px;background:#fff;color:#000;border:none;border-radius:4px;\
             font-weight:bold;font-size:0.8em;text-transform:uppercase;letter-spacing:2px;\
             cursor:pointer;pointer-events:auto",
        );
        button.set_text_content(Some("VIEW ON STORE"));
        let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move || {
            dom::open_url(&url);
        }) as Box<dyn FnMut()>);
        _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
        div.append_child(&button)
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    }
    Ok(div)
}

fn team_card_element(
    document: &web::Document,
    member: &room_core::config::TeamMember,
) -> anyhow::Result<web::HtmlElement> {
    let div = dom::create_div(document, Some("card"))?;
    _ = div.set_attribute("data-rarity", "radiant rare");
    _ = div.set_attribute("style", "position:absolute;pointer-events:none;cursor:default");
    let e = dom::escape_html;
    div.set_inner_html(&format!(
        "<div class=\"card__front\" style=\"background-image:url('{}');background-size:cover;background-position:center\">\
           <div class=\"card__shine\"></div><div class=\"card__glare\"></div>\
           <div class=\"card__content\"><div style=\"height:100%;display:flex;flex-direction:column;justify-content:flex-end;padding:20px;box-sizing:border-box\">\
             <div style=\"background:rgba(0,0,0,0.7);padding:10px;border-radius:8px;text-align:center\">\
               <h2 style=\"margin:0;font-size:24px;color:white;font-family:sans-serif\">{}</h2>\
               <p style=\"margin:5px 0 0 0;font-size:14px;color:#ccc;font-family:sans-serif\">{}</p>\
             </div></div></div>\
         </div>\
         <div class=\"card__back\">\
           <h2 style=\"margin:0 0 10px 0;color:#fff;font-family:sans-serif;border-bottom:1px solid #555;padding-bottom:10px\">{}</h2>\
           <h4 style=\"margin:0 0 20px 0;color:#aaa;font-family:sans-serif\">{}</h4>\
           <p style=\"color:#ddd;line-height:1.6;font-family:sans-serif;font-size:16px\">{}</p>\
           <div style=\"margin-top:auto;font-size:12px;color:#666;text-align:center\">Click again to flip back</div>\
         </div>",
        e(&member.image),
        e(&member.name),
        e(&member.role),
        e(&member.name),
        e(&member.role),
        e(&member.description),
    ));
    Ok(div)
}

impl DomOverlays {
    pub fn new(document: &web::Document, canvas: &web::HtmlCanvasElement) -> anyhow::Result<Self> {
        inject_holo_styles(document)?;
        let back = CssLayer::new(document, CSS_BACK_LAYER_ID, Z_BACK_LAYER)?;
        let front = CssLayer::new(document, CSS_FRONT_LAYER_ID, Z_FRONT_LAYER)?;
        dom::set_style(canvas, "position", "absolute");
        dom::set_style(canvas, "z-index", Z_CANVAS);
        Ok(Self {
            back,
            front,
            elements: FnvHashMap::default(),
        })
    }

    fn layer(&self, layer: Layer) -> &CssLayer {
        match layer {
            Layer::Back => &self.back,
            Layer::Front => &self.front,
        }
    }

    /// Bring the element set in line with the registry.
    pub fn sync_elements(&mut self, document: &web::Document, app: &RoomApp) {
        let live: Vec<OverlayId> = app.overlays().iter().map(|e| e.id).collect();
        self.elements.retain(|id, el| {
            let keep = live.contains(id);
            if !keep {
                el.remove();
            }
            keep
        });

        for entry in app.overlays().iter() {
            if self.elements.contains_key(&entry.id) {
                continue;
            }
            let built = match entry.kind {
                OverlayKind::TvPanel => {
                    tv_panel_element(document, &app.config().tv_page_url, entry.size_px)
                }
                OverlayKind::CaseCard(case) => match app.showcase().get(case) {
                    Some(c) => case_card_element(document, &c.config),
                    None => continue,
                },
                OverlayKind::TeamCard(i) => match app.config().team.get(i) {
                    Some(m) => team_card_element(document, m),
                    None => continue,
                },
            };
            let el = match built {
                Ok(el) => el,
                Err(e) => {
                    log::warn!("[overlay] could not build {:?}: {:?}", entry.kind, e);
                    continue;
                }
            };
            if let Err(e) = self.layer(entry.layer).add(&el) {
                log::warn!("[overlay] could not attach {:?}: {:?}", entry.kind, e);
                continue;
            }
            self.elements.insert(entry.id, el);
        }
        log::debug!("[overlay] {} elements live", self.elements.len());
    }

    /// Write the current frame to the DOM. Runs after `RoomApp::tick`.
    pub fn apply(&self, app: &RoomApp) {
        let viewport = app.viewport();
        let cam = css_camera(app.camera(), viewport);
        self.back.apply_camera(&cam, viewport);
        self.front.apply_camera(&cam, viewport);

        for entry in app.overlays().iter() {
            let Some(el) = self.elements.get(&entry.id) else {
                continue;
            };
            dom::set_style(el, "transform", &object_css_transform(&entry.world));
            dom::set_style(el, "opacity", &entry.opacity.to_string());
            if let OverlayKind::TeamCard(i) = entry.kind {
                if let Some(card) = app.gallery().card(i) {
                    apply_holo(el, &card.holo);
                }
            }
        }
    }

    /// Route pointer events between the canvas, the two layers and the
    /// TV page.
    pub fn apply_routing(&self, canvas: &web::HtmlCanvasElement, app: &RoomApp, routing: PointerRouting) {
        dom::set_pointer_events(canvas, routing.canvas);
        dom::set_pointer_events(&self.back.root, routing.back_layer);
        dom::set_pointer_events(&self.front.root, routing.front_layer);
        if let Some(el) = app.tv_overlay().and_then(|id| self.elements.get(&id)) {
            dom::set_pointer_events(el, routing.tv_panel);
        }
        log::debug!("[overlay] routing {:?}", routing);
    }
}

fn apply_holo(el: &web::HtmlElement, holo: &room_core::gallery::HoloParams) {
    let style = el.style();
    if holo.opacity > 0.0 {
        _ = style.set_property("--pointer-x", &format!("{}%", holo.pointer.x));
        _ = style.set_property("--pointer-y", &format!("{}%", holo.pointer.y));
        _ = style.set_property("--background-x", &format!("{}%", holo.background.x));
        _ = style.set_property("--background-y", &format!("{}%", holo.background.y));
        _ = style.set_property("--hyp", &holo.hyp.to_string());
    }
    _ = style.set_property("--holo-opacity", &holo.opacity.to_string());
}
