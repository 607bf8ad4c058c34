//! Showcase cases on the shelf.
//!
//! Each configured case whose node exists in the loaded scene gets an info
//! card overlay in the front layer. The case mesh is animated directly and
//! is authoritative; its card follows through the overlay registry.

use crate::config::{CaseConfig, InspectPose, RoomConfig, TargetPose};
use crate::constants::{CASE_ANIM_SPEED, CASE_CARD_OFFSET, CASE_CARD_SCALE};
use crate::focus::{CaseId, FocusTarget};
use crate::overlay::{local_offset, Anchor, Follow, Layer, OverlayId, OverlayKind, OverlayRegistry};
use crate::pose::{quat_from_euler_yxz, Transform};
use crate::scene::{NodeId, SceneGraph};
use glam::{Quat, Vec2, Vec3};

/// CSS size of an info card: 380px content plus 25px padding per side.
const CASE_CARD_SIZE_PX: Vec2 = Vec2::new(430.0, 420.0);

#[derive(Clone, Debug)]
pub struct ShowcaseCase {
    pub id: CaseId,
    pub node: NodeId,
    pub config: CaseConfig,
    /// Local transform of the node when the scene finished loading.
    pub original: Transform,
    pub overlay: OverlayId,
}

impl ShowcaseCase {
    fn inspect_target(&self, inspect: &InspectPose) -> (Vec3, Quat) {
        let e = inspect.rotation + self.config.offset_rotation;
        (
            inspect.position + self.config.offset_position,
            quat_from_euler_yxz(e.x, e.y, e.z),
        )
    }
}

#[derive(Clone, Debug, Default)]
pub struct Showcase {
    cases: Vec<ShowcaseCase>,
    inspect: Option<InspectPose>,
}

impl Showcase {
    /// Build cases for every configured name present in `scene`. Missing
    /// nodes are skipped.
    pub fn setup(scene: &SceneGraph, overlays: &mut OverlayRegistry, config: &RoomConfig) -> Self {
        let mut cases = Vec::new();
        for cfg in &config.cases {
            let Some(node) = scene.find_by_name(&cfg.mesh_name) else {
                log::warn!("[showcase] no node named '{}', skipping", cfg.mesh_name);
                continue;
            };
            let Some(original) = scene.get(node).map(|n| n.local) else {
                continue;
            };
            let id = CaseId(cases.len());
            let overlay = overlays.register(
                OverlayKind::CaseCard(id),
                Layer::Front,
                Anchor::Node {
                    node,
                    follow: Follow::Rigid,
                },
                local_offset(Vec3::from_array(CASE_CARD_OFFSET), Quat::IDENTITY, CASE_CARD_SCALE),
                CASE_CARD_SIZE_PX,
                0.0,
            );
            cases.push(ShowcaseCase {
                id,
                node,
                config: cfg.clone(),
                original,
                overlay,
            });
        }
        log::info!("[showcase] {} cases ready", cases.len());
        Self {
            cases,
            inspect: Some(config.case_inspect),
        }
    }

    pub fn get(&self, id: CaseId) -> Option<&ShowcaseCase> {
        self.cases.get(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShowcaseCase> {
        self.cases.iter()
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Camera pose overrides in `CaseId` order, for the focus machine.
    pub fn focus_poses(&self) -> Vec<Option<TargetPose>> {
        self.cases.iter().map(|c| c.config.focus_pose).collect()
    }

    /// Show the info card of the focused case and hide all others.
    pub fn apply_focus(&self, focus: FocusTarget, overlays: &mut OverlayRegistry) {
        let active = focus.case();
        for c in &self.cases {
            let opacity = if active == Some(c.id) { 1.0 } else { 0.0 };
            overlays.set_opacity(c.overlay, opacity);
        }
    }

    /// Ease the focused case toward its inspect pose and all others back to
    /// where they started.
    pub fn animate(&self, focus: FocusTarget, scene: &mut SceneGraph) {
        let Some(inspect) = self.inspect else {
            return;
        };
        let active = focus.case();
        for c in &self.cases {
            let Some(node) = scene.get_mut(c.node) else {
                continue;
            };
            let (pos, rot) = if active == Some(c.id) {
                c.inspect_target(&inspect)
            } else {
                (c.original.translation, c.original.rotation)
            };
            node.local.translation = node.local.translation.lerp(pos, CASE_ANIM_SPEED);
            node.local.rotation = node.local.rotation.slerp(rot, CASE_ANIM_SPEED).normalize();
        }
    }
}
