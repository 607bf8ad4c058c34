//! Team gallery: a grid of flippable member cards in the front layer.
//!
//! Opening builds every card overlay and its hitbox quad from scratch;
//! closing tears all of them down again. Hover, flip and inspect state
//! therefore never survive a close.

use crate::camera::{Camera, Viewport};
use crate::config::GridConfig;
use crate::constants::{
    CARD_DIMMED_OPACITY, CARD_POSITION_LERP, CARD_RETURN_SLERP, CARD_SCALE_LERP, CARD_SIZE_PX,
    CARD_TILT_X_LERP, CARD_TILT_Y_LERP, HOVER_TILT_PER_PERCENT,
};
use crate::overlay::{screen_rect, Anchor, Layer, OverlayId, OverlayKind, OverlayRegistry};
use crate::pose::{euler_xyz_from_quat, lerp_f32, quat_from_euler_xyz, Transform};
use crate::scene::{Material, Mesh, Node, NodeId, SceneGraph};
use glam::{Vec2, Vec3};
use std::f32::consts::PI;

/// Values fed to the holographic card styling.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HoloParams {
    /// Pointer position inside the card, in percent.
    pub pointer: Vec2,
    /// Background position, in percent.
    pub background: Vec2,
    /// Distance of the pointer from the card center, in percent.
    pub hyp: f32,
    pub opacity: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TeamCard {
    pub index: usize,
    pub overlay: OverlayId,
    pub hitbox: NodeId,
    /// Grid slot.
    pub original: Transform,
    pub current: Transform,
    /// `XYZ` Euler view of `current.rotation`, eased directly while
    /// inspecting.
    euler: Vec3,
    pub inspecting: bool,
    pub flipped: bool,
    /// `(x, y)` tilt in degrees.
    pub hover_tilt: Vec2,
    pub holo: HoloParams,
}

impl TeamCard {
    pub fn euler(&self) -> Vec3 {
        self.euler
    }
}

/// What a click inside the open gallery did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GalleryClick {
    Flipped { index: usize, flipped: bool },
    Inspected(usize),
    ClosedInspection,
    /// Nothing hit and nothing inspected: the gallery should close.
    Dismissed,
}

/// World position of grid slot `index` out of `count` cards. Rows are
/// centered horizontally and the whole grid vertically on the anchor.
pub fn grid_slot(grid: &GridConfig, index: usize, count: usize) -> Vec3 {
    let columns = grid.columns.max(1);
    let row = index / columns;
    let col = index % columns;
    let in_row = columns.min(count.saturating_sub(row * columns));
    let row_width = in_row.saturating_sub(1) as f32 * grid.spacing.x;
    let total_rows = count.div_ceil(columns);
    let total_height = total_rows.saturating_sub(1) as f32 * grid.spacing.y;
    let x = col as f32 * grid.spacing.x - row_width / 2.0;
    let y = -(row as f32 * grid.spacing.y) + total_height / 2.0;

    let q = quat_from_euler_xyz(grid.rotation);
    grid.position + q * Vec3::X * x + q * Vec3::Y * y
}

/// Holo parameters for a pointer at `pointer` over a card whose screen
/// rectangle is `(min, max)`. Returns the tilt alongside.
pub fn hover_params(pointer: Vec2, min: Vec2, max: Vec2) -> (HoloParams, Vec2) {
    let size = (max - min).max(Vec2::splat(1e-6));
    let percent = ((pointer - min) / size * 100.0).round();
    let center = percent - Vec2::splat(50.0);
    let tilt = Vec2::new(
        center.y * HOVER_TILT_PER_PERCENT,
        -center.x * HOVER_TILT_PER_PERCENT,
    );
    (
        HoloParams {
            pointer: percent,
            background: Vec2::splat(50.0) - center,
            hyp: center.length(),
            opacity: 1.0,
        },
        tilt,
    )
}

fn contains(min: Vec2, max: Vec2, p: Vec2) -> bool {
    p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
}

#[derive(Clone, Debug)]
pub struct TeamGallery {
    grid: GridConfig,
    cards: Vec<TeamCard>,
    active: Option<usize>,
    open: bool,
}

impl TeamGallery {
    pub fn new(grid: GridConfig) -> Self {
        Self {
            grid,
            cards: Vec::new(),
            active: None,
            open: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn cards(&self) -> &[TeamCard] {
        &self.cards
    }

    pub fn card(&self, index: usize) -> Option<&TeamCard> {
        self.cards.get(index)
    }

    /// Index of the inspected card.
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn hitboxes(&self) -> Vec<NodeId> {
        self.cards.iter().map(|c| c.hitbox).collect()
    }

    pub fn index_of_hitbox(&self, node: NodeId) -> Option<usize> {
        self.cards.iter().position(|c| c.hitbox == node)
    }

    /// Build `count` cards and their hitboxes. No-op when already open.
    pub fn open(&mut self, count: usize, scene: &mut SceneGraph, overlays: &mut OverlayRegistry) {
        if self.open {
            return;
        }
        let rotation = quat_from_euler_xyz(self.grid.rotation);
        let size = Vec2::from_array(CARD_SIZE_PX);
        for index in 0..count {
            let slot = Transform::from_parts(
                grid_slot(&self.grid, index, count),
                rotation,
                Vec3::splat(self.grid.scale),
            );
            let overlay = overlays.register(
                OverlayKind::TeamCard(index),
                Layer::Front,
                Anchor::Free,
                Transform::IDENTITY,
                size,
                1.0,
            );
            overlays.set_frame(overlay, slot);
            let hitbox = scene.add(
                Node::named(format!("TeamHitbox{index}"))
                    .with_transform(slot)
                    .with_mesh(
                        Mesh::Quad {
                            width: size.x,
                            height: size.y,
                        },
                        Material {
                            visible: false,
                            ..Material::default()
                        },
                    ),
                None,
            );
            self.cards.push(TeamCard {
                index,
                overlay,
                hitbox,
                original: slot,
                current: slot,
                euler: self.grid.rotation,
                inspecting: false,
                flipped: false,
                hover_tilt: Vec2::ZERO,
                holo: HoloParams::default(),
            });
        }
        self.open = true;
        log::info!("[gallery] opened with {} cards", count);
    }

    /// Remove every card overlay and hitbox. No-op when closed.
    pub fn close(&mut self, scene: &mut SceneGraph, overlays: &mut OverlayRegistry) {
        if !self.open {
            return;
        }
        for card in self.cards.drain(..) {
            overlays.remove(card.overlay);
            scene.remove(card.hitbox);
        }
        self.active = None;
        self.open = false;
        log::info!("[gallery] closed");
    }

    /// Pull card `index` out of the grid, dimming every other card.
    pub fn inspect(&mut self, index: usize, overlays: &mut OverlayRegistry) -> bool {
        if index >= self.cards.len() {
            return false;
        }
        self.close_inspection(overlays);
        for card in &mut self.cards {
            if card.index == index {
                card.inspecting = true;
                card.flipped = false;
            } else {
                overlays.set_opacity(card.overlay, CARD_DIMMED_OPACITY);
            }
        }
        self.active = Some(index);
        log::debug!("[gallery] inspecting card {}", index);
        true
    }

    /// Send the inspected card back to the grid. Returns `false` when
    /// nothing was inspected.
    pub fn close_inspection(&mut self, overlays: &mut OverlayRegistry) -> bool {
        let Some(index) = self.active.take() else {
            return false;
        };
        if let Some(card) = self.cards.get_mut(index) {
            card.inspecting = false;
            card.flipped = false;
        }
        for card in &self.cards {
            overlays.set_opacity(card.overlay, 1.0);
        }
        true
    }

    /// Handle a click while open; `hit` is the card whose hitbox was hit.
    pub fn click(&mut self, hit: Option<usize>, overlays: &mut OverlayRegistry) -> GalleryClick {
        match hit {
            Some(index) if self.active == Some(index) => {
                let flipped = match self.cards.get_mut(index) {
                    Some(card) => {
                        card.flipped = !card.flipped;
                        card.flipped
                    }
                    None => false,
                };
                GalleryClick::Flipped { index, flipped }
            }
            Some(index) => {
                self.inspect(index, overlays);
                GalleryClick::Inspected(index)
            }
            None if self.close_inspection(overlays) => GalleryClick::ClosedInspection,
            None => GalleryClick::Dismissed,
        }
    }

    /// Per-frame update while open: hover parameters from the raw pointer,
    /// card pose easing, then hitboxes and overlays follow the cards.
    pub fn update(
        &mut self,
        pointer: Option<Vec2>,
        camera: &Camera,
        viewport: Viewport,
        scene: &mut SceneGraph,
        overlays: &mut OverlayRegistry,
    ) {
        if !self.open {
            return;
        }
        for card in &mut self.cards {
            let rect = overlays
                .get(card.overlay)
                .and_then(|e| screen_rect(e, camera, viewport));
            let hovered = match (pointer, rect) {
                (Some(p), Some((min, max))) if contains(min, max, p) => Some((p, min, max)),
                _ => None,
            };
            match hovered {
                Some((p, min, max)) if !card.flipped => {
                    let (holo, tilt) = hover_params(p, min, max);
                    card.holo = holo;
                    card.hover_tilt = tilt;
                }
                _ => {
                    card.hover_tilt = Vec2::ZERO;
                    card.holo.opacity = 0.0;
                }
            }

            if card.inspecting {
                ease_inspect(card, &self.grid);
            } else {
                ease_return(card);
            }

            scene.set_local(card.hitbox, card.current);
            overlays.set_frame(card.overlay, card.current);
        }
    }
}

fn ease_inspect(card: &mut TeamCard, grid: &GridConfig) {
    let t = &mut card.current;
    t.translation = t.translation.lerp(grid.inspect_position, CARD_POSITION_LERP);
    let s = lerp_f32(t.scale.x, grid.inspect_scale, CARD_SCALE_LERP);
    t.scale = Vec3::splat(s);

    let base = grid.inspect_rotation;
    let flip = if card.flipped { PI } else { 0.0 };
    card.euler.x = lerp_f32(
        card.euler.x,
        base.x + card.hover_tilt.x.to_radians(),
        CARD_TILT_X_LERP,
    );
    card.euler.y = lerp_f32(
        card.euler.y,
        base.y + card.hover_tilt.y.to_radians() + flip,
        CARD_TILT_Y_LERP,
    );
    card.euler.z = base.z;
    t.rotation = quat_from_euler_xyz(card.euler);
}

fn ease_return(card: &mut TeamCard) {
    let t = &mut card.current;
    t.translation = t.translation.lerp(card.original.translation, CARD_POSITION_LERP);
    t.rotation = t
        .rotation
        .slerp(card.original.rotation, CARD_RETURN_SLERP)
        .normalize();
    let s = lerp_f32(t.scale.x, card.original.scale.x, CARD_SCALE_LERP);
    t.scale = Vec3::splat(s);
    card.euler = euler_xyz_from_quat(t.rotation);
}
