//! Application state owned by the frame loop.
//!
//! Every input entry point mutates the state synchronously and returns the
//! side effects the browser shell has to carry out. `tick` advances the
//! animation by one frame and leaves the overlay registry ready to be
//! written to the DOM.

use crate::audio::{AudioMix, FadeCommand, SoundRequest};
use crate::camera::{Camera, Viewport};
use crate::config::RoomConfig;
use crate::constants::{
    DEFAULT_CAMERA_FOV, DEFAULT_CAMERA_POSITION, KEY_CANCEL, KEY_TOGGLE_TEAM, TV_PANEL_OFFSET,
    TV_PANEL_ROTATION, TV_PANEL_SCALE, TV_PANEL_SIZE_PX,
};
use crate::focus::{FocusMachine, FocusOutcome, FocusTarget, IgnoreReason, PointerRouting};
use crate::gallery::{GalleryClick, TeamGallery};
use crate::message::CrossMessage;
use crate::overlay::{local_offset, Anchor, Follow, Layer, OverlayId, OverlayKind, OverlayRegistry};
use crate::picking::{resolve_hit, BehaviorTable, Pick};
use crate::pose::{quat_from_euler_xyz, CameraPose};
use crate::scene::SceneGraph;
use crate::showcase::Showcase;
use glam::{Quat, Vec2, Vec3};
use rand::prelude::*;
use smallvec::SmallVec;

/// Work for the browser shell.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    PlaySound(SoundRequest),
    Fade(FadeCommand),
    /// Open a link in a new tab.
    OpenUrl(String),
    Routing(PointerRouting),
    GalleryOpened,
    GalleryClosed,
    /// Show or hide the "click to flip" hint.
    FlipHint(bool),
}

pub type Effects = SmallVec<[Effect; 4]>;

pub struct RoomApp {
    config: RoomConfig,
    scene: SceneGraph,
    camera: Camera,
    viewport: Viewport,
    focus: FocusMachine,
    showcase: Showcase,
    gallery: TeamGallery,
    overlays: OverlayRegistry,
    behaviors: BehaviorTable,
    routing: PointerRouting,
    audio: AudioMix,
    tv_overlay: Option<OverlayId>,
    /// Last pointer position in client pixels.
    pointer_px: Option<Vec2>,
    rng: StdRng,
}

/// Initial camera: the first camera node of the scene, else a default.
fn discover_camera(scene: &SceneGraph) -> CameraPose {
    let found = scene.first_camera().and_then(|id| {
        let fov = scene.get(id)?.camera_fov?;
        let w = scene.world_transform(id);
        Some(CameraPose::new(w.translation, w.rotation, fov))
    });
    found.unwrap_or_else(|| {
        log::info!("[scene] no camera in scene, using default");
        CameraPose::new(
            Vec3::from_array(DEFAULT_CAMERA_POSITION),
            Quat::IDENTITY,
            DEFAULT_CAMERA_FOV,
        )
    })
}

impl RoomApp {
    /// Set up everything that depends on the loaded scene. Named nodes that
    /// are missing only disable their feature.
    pub fn new(config: RoomConfig, mut scene: SceneGraph, viewport: Viewport) -> Self {
        let pose = discover_camera(&scene);
        let mut camera = Camera::new(pose, viewport.aspect());
        camera.set_aspect(viewport);

        let mut overlays = OverlayRegistry::new();
        let tv_overlay = match scene.find_by_name(&config.names.tv_screen) {
            Some(node) => {
                if let Some(mesh) = scene.get_mut(node).and_then(|n| n.mesh.as_mut()) {
                    mesh.material.mask = true;
                }
                Some(overlays.register(
                    OverlayKind::TvPanel,
                    Layer::Back,
                    Anchor::Node {
                        node,
                        follow: Follow::Full,
                    },
                    local_offset(
                        Vec3::from_array(TV_PANEL_OFFSET),
                        quat_from_euler_xyz(Vec3::from_array(TV_PANEL_ROTATION)),
                        TV_PANEL_SCALE,
                    ),
                    Vec2::from_array(TV_PANEL_SIZE_PX),
                    1.0,
                ))
            }
            None => {
                log::warn!("[scene] no TV screen '{}', panel disabled", config.names.tv_screen);
                None
            }
        };

        let showcase = Showcase::setup(&scene, &mut overlays, &config);
        let behaviors = BehaviorTable::build(&scene, &config.names, &showcase);
        let mut focus = FocusMachine::new(pose, config.targets);
        focus.set_cases(showcase.focus_poses());
        overlays.sync(&scene);

        Self {
            gallery: TeamGallery::new(config.grid),
            config,
            scene,
            camera,
            viewport,
            focus,
            showcase,
            overlays,
            behaviors,
            routing: PointerRouting::default(),
            audio: AudioMix::new(),
            tv_overlay,
            pointer_px: None,
            rng: StdRng::from_entropy(),
        }
    }

    /// Replace the random source, for reproducible sound parameters.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn focus(&self) -> &FocusMachine {
        &self.focus
    }

    pub fn showcase(&self) -> &Showcase {
        &self.showcase
    }

    pub fn gallery(&self) -> &TeamGallery {
        &self.gallery
    }

    pub fn overlays(&self) -> &OverlayRegistry {
        &self.overlays
    }

    pub fn behaviors(&self) -> &BehaviorTable {
        &self.behaviors
    }

    pub fn routing(&self) -> PointerRouting {
        self.routing
    }

    pub fn audio(&self) -> &AudioMix {
        &self.audio
    }

    pub fn tv_overlay(&self) -> Option<OverlayId> {
        self.tv_overlay
    }

    /// Ask for a new focus target, applying card visibility and pointer
    /// routing when the move is accepted.
    pub fn request_focus(&mut self, target: FocusTarget, fx: &mut Effects) -> FocusOutcome {
        let outcome = self.focus.request_focus(target, &self.camera.pose);
        if outcome.started() {
            self.after_focus_change(fx);
        }
        outcome
    }

    fn after_focus_change(&mut self, fx: &mut Effects) {
        self.showcase.apply_focus(self.focus.state(), &mut self.overlays);
        self.routing.apply_focus(self.focus.overlay_pointer());
        fx.push(Effect::Routing(self.routing));
    }

    /// Back to IDLE, cutting a running transition short if needed. The
    /// gallery is laid out for the IDLE view.
    fn return_to_idle(&mut self, fx: &mut Effects) {
        if let FocusOutcome::Ignored(IgnoreReason::InFlight) =
            self.request_focus(FocusTarget::Idle, fx)
        {
            if self
                .focus
                .force_focus(FocusTarget::Idle, &self.camera.pose)
                .started()
            {
                self.after_focus_change(fx);
            }
        }
    }

    pub fn open_gallery(&mut self, fx: &mut Effects) {
        if self.gallery.is_open() {
            return;
        }
        self.return_to_idle(fx);
        self.gallery
            .open(self.config.team.len(), &mut self.scene, &mut self.overlays);
        self.routing.gallery_opened();
        fx.push(Effect::Routing(self.routing));
        fx.push(Effect::GalleryOpened);
    }

    pub fn close_gallery(&mut self, fx: &mut Effects) {
        if !self.gallery.is_open() {
            return;
        }
        if self.gallery.active().is_some() {
            fx.push(Effect::FlipHint(false));
        }
        self.gallery.close(&mut self.scene, &mut self.overlays);
        self.return_to_idle(fx);
        self.routing.gallery_closed();
        fx.push(Effect::Routing(self.routing));
        fx.push(Effect::GalleryClosed);
    }

    pub fn toggle_gallery(&mut self, fx: &mut Effects) {
        if self.gallery.is_open() {
            self.close_gallery(fx);
        } else {
            self.open_gallery(fx);
        }
    }

    /// Primary click at client pixel coordinates.
    pub fn click(&mut self, x: f32, y: f32) -> Effects {
        let mut fx = Effects::new();
        fx.push(Effect::PlaySound(SoundRequest::click(&mut self.rng)));
        let ray = self.camera.ray_from_ndc(self.viewport.to_ndc(x, y));

        if self.gallery.is_open() {
            let hit = self
                .scene
                .raycast_nodes(&ray, &self.gallery.hitboxes())
                .first()
                .and_then(|h| self.gallery.index_of_hitbox(h.node));
            match self.gallery.click(hit, &mut self.overlays) {
                GalleryClick::Inspected(_) => fx.push(Effect::FlipHint(true)),
                GalleryClick::ClosedInspection => fx.push(Effect::FlipHint(false)),
                GalleryClick::Flipped { .. } => {}
                GalleryClick::Dismissed => self.close_gallery(&mut fx),
            }
            return fx;
        }

        let resolution = match self.scene.raycast(&ray).first() {
            Some(hit) => resolve_hit(&self.behaviors, &self.scene, hit.node),
            None => Default::default(),
        };
        if resolution.easter_egg {
            fx.push(Effect::PlaySound(SoundRequest::easter_egg()));
        }
        match resolution.target {
            Some(Pick::TeamTrigger) => self.toggle_gallery(&mut fx),
            Some(Pick::Tv) => {
                self.request_focus(FocusTarget::Tv, &mut fx);
            }
            Some(Pick::Case(case)) => {
                if let FocusOutcome::Confirm(c) = self.request_focus(FocusTarget::Game(case), &mut fx) {
                    let url = self.showcase.get(c).and_then(|s| s.config.store_url.clone());
                    if let Some(url) = url {
                        log::info!("[pick] opening store page {}", url);
                        fx.push(Effect::OpenUrl(url));
                    }
                }
            }
            None => self.click_away(&mut fx),
        }
        fx
    }

    fn click_away(&mut self, fx: &mut Effects) {
        let target = match self.focus.state() {
            FocusTarget::Game(_) => FocusTarget::Shelf,
            _ => FocusTarget::Idle,
        };
        self.request_focus(target, fx);
    }

    /// Pointer moved to client pixel coordinates.
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        let ndc = self.viewport.to_ndc(x, y);
        self.focus.parallax.aim(ndc.x, -ndc.y);
        self.pointer_px = Some(Vec2::new(x, y));
    }

    /// Key press identified by its `KeyboardEvent.code`.
    pub fn key(&mut self, code: &str) -> Effects {
        let mut fx = Effects::new();
        match code {
            KEY_CANCEL => {
                if self.gallery.close_inspection(&mut self.overlays) {
                    fx.push(Effect::FlipHint(false));
                } else {
                    self.request_focus(FocusTarget::Idle, &mut fx);
                    self.close_gallery(&mut fx);
                }
            }
            KEY_TOGGLE_TEAM => {
                self.toggle_gallery(&mut fx);
                fx.push(Effect::PlaySound(SoundRequest::click(&mut self.rng)));
            }
            _ => {}
        }
        fx
    }

    pub fn message(&mut self, msg: CrossMessage) -> Effects {
        let mut fx = Effects::new();
        match msg {
            CrossMessage::ZoomOut => {
                if self.focus.state() == FocusTarget::Tv {
                    self.request_focus(FocusTarget::Idle, &mut fx);
                }
            }
            CrossMessage::ToggleTeam => self.open_gallery(&mut fx),
            CrossMessage::CameraMove(detail) => {
                self.focus.force_pose(detail.camera_pose(), &self.camera.pose);
                self.after_focus_change(&mut fx);
            }
        }
        fx
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.camera.set_aspect(viewport);
    }

    /// Page visibility changed.
    pub fn visibility(&mut self, visible: bool) -> Effects {
        let fade = if visible {
            self.audio.focus_gained()
        } else {
            self.audio.focus_lost()
        };
        fade.map(Effect::Fade).into_iter().collect()
    }

    /// Audio buffers are decoded; returns the starting bus volumes.
    pub fn audio_ready(&mut self) -> (f32, f32) {
        self.audio.mark_initialized();
        self.audio.initial_levels()
    }

    /// The mute button.
    pub fn toggle_mute(&mut self) -> Effects {
        let mut fx = Effects::new();
        if let Some(fade) = self.audio.toggle_manual() {
            fx.push(Effect::Fade(fade));
        }
        fx.push(Effect::PlaySound(SoundRequest::click(&mut self.rng)));
        fx
    }

    /// Advance one frame. Returns `true` when a camera transition landed.
    pub fn tick(&mut self) -> bool {
        let landed = self.focus.tick(&mut self.camera.pose);
        self.showcase.animate(self.focus.state(), &mut self.scene);
        self.gallery.update(
            self.pointer_px,
            &self.camera,
            self.viewport,
            &mut self.scene,
            &mut self.overlays,
        );
        self.overlays.sync(&self.scene);
        landed
    }
}
