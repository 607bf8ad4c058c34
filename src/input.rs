use glam::Vec2;
use web_sys as web;

/// Pointer position in client (CSS) pixels, the space `RoomApp` works in.
#[inline]
pub fn client_px(ev: &web::MouseEvent) -> Vec2 {
    Vec2::new(ev.client_x() as f32, ev.client_y() as f32)
}

/// Primary button only; secondary clicks never pick.
#[inline]
pub fn is_primary(ev: &web::MouseEvent) -> bool {
    ev.button() == 0
}

/// Text form of a posted message. Strings pass through as JSON strings so
/// that `"zoomOut"` and `{ type: ... }` decode the same way.
pub fn message_json(ev: &web::MessageEvent) -> Option<String> {
    js_sys::JSON::stringify(&ev.data()).ok().map(String::from)
}
