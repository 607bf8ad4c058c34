//! Overlay registry and CSS 3D transform math.
//!
//! An overlay is a DOM element placed in world space. Anchored overlays
//! derive their transform from a scene node every frame; free overlays are
//! posed directly (team cards) and everything else follows them.
//! `sync` must run after every pose-mutating update of the frame and before
//! the DOM layers are written.

use crate::camera::{Camera, Viewport};
use crate::focus::CaseId;
use crate::pose::Transform;
use crate::scene::{NodeId, SceneGraph};
use glam::{Mat4, Quat, Vec2, Vec3};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(pub usize);

/// Which DOM layer an overlay lives in. The back layer sits under the
/// canvas and shows through masked meshes; the front layer sits on top.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    Back,
    Front,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Follow {
    /// Position, orientation and scale of the anchor.
    Full,
    /// Position and orientation only.
    Rigid,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    Node { node: NodeId, follow: Follow },
    Free,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    TvPanel,
    CaseCard(CaseId),
    TeamCard(usize),
}

#[derive(Clone, Debug, PartialEq)]
pub struct OverlayEntry {
    pub id: OverlayId,
    pub kind: OverlayKind,
    pub layer: Layer,
    pub anchor: Anchor,
    /// Offset of the element inside its anchor frame.
    pub local: Transform,
    /// Anchor frame: written by `sync` for node anchors, authoritative for
    /// free overlays.
    pub frame: Transform,
    pub opacity: f32,
    /// CSS size of the element in pixels.
    pub size_px: Vec2,
    pub world: Mat4,
}

impl OverlayEntry {
    /// World-space corners of the element rectangle, clockwise from top-left.
    pub fn corners(&self) -> [Vec3; 4] {
        let hw = self.size_px.x * 0.5;
        let hh = self.size_px.y * 0.5;
        [
            Vec3::new(-hw, hh, 0.0),
            Vec3::new(hw, hh, 0.0),
            Vec3::new(hw, -hh, 0.0),
            Vec3::new(-hw, -hh, 0.0),
        ]
        .map(|c| self.world.transform_point3(c))
    }
}

#[derive(Clone, Debug, Default)]
pub struct OverlayRegistry {
    entries: Vec<OverlayEntry>,
    next_id: usize,
}

impl OverlayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        kind: OverlayKind,
        layer: Layer,
        anchor: Anchor,
        local: Transform,
        size_px: Vec2,
        opacity: f32,
    ) -> OverlayId {
        let id = OverlayId(self.next_id);
        self.next_id += 1;
        self.entries.push(OverlayEntry {
            id,
            kind,
            layer,
            anchor,
            local,
            frame: Transform::IDENTITY,
            opacity,
            size_px,
            world: local.matrix(),
        });
        id
    }

    pub fn remove(&mut self, id: OverlayId) -> Option<OverlayEntry> {
        let idx = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(idx))
    }

    pub fn get(&self, id: OverlayId) -> Option<&OverlayEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: OverlayId) -> Option<&mut OverlayEntry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    pub fn opacity(&self, id: OverlayId) -> Option<f32> {
        self.get(id).map(|e| e.opacity)
    }

    pub fn set_opacity(&mut self, id: OverlayId, opacity: f32) {
        if let Some(e) = self.get_mut(id) {
            e.opacity = opacity;
        }
    }

    /// Pose a free overlay. Ignored for anchored ones.
    pub fn set_frame(&mut self, id: OverlayId, frame: Transform) {
        if let Some(e) = self.get_mut(id) {
            if e.anchor == Anchor::Free {
                e.frame = frame;
                e.world = frame.matrix() * e.local.matrix();
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &OverlayEntry> {
        self.entries.iter()
    }

    pub fn in_layer(&self, layer: Layer) -> impl Iterator<Item = &OverlayEntry> {
        self.entries.iter().filter(move |e| e.layer == layer)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy each anchor's world transform onto its overlay. Overlays whose
    /// anchor node has gone keep their last transform.
    pub fn sync(&mut self, scene: &SceneGraph) {
        for e in &mut self.entries {
            if let Anchor::Node { node, follow } = e.anchor {
                if !scene.contains(node) {
                    continue;
                }
                let w = scene.world_transform(node);
                e.frame = match follow {
                    Follow::Full => w,
                    Follow::Rigid => Transform::from_parts(w.translation, w.rotation, Vec3::ONE),
                };
            }
            e.world = e.frame.matrix() * e.local.matrix();
        }
    }
}

#[inline]
fn epsilon(v: f32) -> f32 {
    if v.abs() < 1e-10 {
        0.0
    } else {
        v
    }
}

fn matrix3d(e: &[f32; 16]) -> String {
    let parts: Vec<String> = e.iter().map(|v| epsilon(*v).to_string()).collect();
    format!("matrix3d({})", parts.join(","))
}

/// CSS `transform` for an element whose world matrix is `world`. CSS has Y
/// pointing down, so the Y basis column is negated.
pub fn object_css_transform(world: &Mat4) -> String {
    let mut e = world.to_cols_array();
    for v in &mut e[4..8] {
        *v = -*v;
    }
    format!("translate(-50%,-50%){}", matrix3d(&e))
}

/// Perspective and transform for the camera element of a CSS 3D layer.
#[derive(Clone, Debug, PartialEq)]
pub struct CssCamera {
    pub perspective_px: f32,
    pub transform: String,
}

pub fn css_camera(camera: &Camera, viewport: Viewport) -> CssCamera {
    let half_w = viewport.width * 0.5;
    let half_h = viewport.height * 0.5;
    let fov_px = camera.projection_matrix().y_axis.y * half_h;
    let mut e = camera.view_matrix().to_cols_array();
    for i in [1, 5, 9, 13] {
        e[i] = -e[i];
    }
    CssCamera {
        perspective_px: fov_px,
        transform: format!(
            "translateZ({}px){}translate({}px,{}px)",
            fov_px,
            matrix3d(&e),
            half_w,
            half_h
        ),
    }
}

/// Screen-space bounding rectangle `(min, max)` of an overlay in client
/// pixels, or `None` if any corner is behind the camera.
pub fn screen_rect(entry: &OverlayEntry, camera: &Camera, viewport: Viewport) -> Option<(Vec2, Vec2)> {
    let mut min = Vec2::splat(f32::INFINITY);
    let mut max = Vec2::splat(f32::NEG_INFINITY);
    for c in entry.corners() {
        let p = camera.project_to_screen(c, viewport)?;
        min = min.min(p);
        max = max.max(p);
    }
    Some((min, max))
}

/// Local offset for an overlay with a uniform CSS-pixel-to-world scale.
pub fn local_offset(position: Vec3, rotation: Quat, scale: f32) -> Transform {
    Transform::from_parts(position, rotation, Vec3::splat(scale))
}
