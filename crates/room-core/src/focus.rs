//! Camera focus state machine.
//!
//! The machine owns the logical focus target and at most one in-flight
//! transition. Requests that arrive while a transition runs are dropped,
//! not queued. Between transitions the camera follows an ambient mouse
//! parallax layered on top of a base orientation that is re-anchored every
//! time a transition lands.

use crate::config::{FocusPoses, TargetPose};
use crate::constants::{PARALLAX_MAX_ROTATION, PARALLAX_SMOOTH, TRANSITION_SPEED};
use crate::pose::{ease_out_cubic, quat_from_euler_yxz, CameraPose};
use glam::{Quat, Vec2};

/// Index of a showcase case, assigned in setup order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CaseId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FocusTarget {
    Idle,
    Tv,
    Game(CaseId),
    Shelf,
}

impl FocusTarget {
    pub fn label(&self) -> &'static str {
        match self {
            FocusTarget::Idle => "IDLE",
            FocusTarget::Tv => "TV",
            FocusTarget::Game(_) => "GAME",
            FocusTarget::Shelf => "SHELF",
        }
    }

    pub fn case(&self) -> Option<CaseId> {
        match self {
            FocusTarget::Game(c) => Some(*c),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Already focused on this target.
    AlreadyFocused,
    /// Another transition is still running.
    InFlight,
    /// The referenced showcase case was never set up.
    UnknownCase,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusOutcome {
    Started { from: FocusTarget, to: FocusTarget },
    /// The already-focused case was requested again.
    Confirm(CaseId),
    Ignored(IgnoreReason),
}

impl FocusOutcome {
    pub fn started(&self) -> bool {
        matches!(self, FocusOutcome::Started { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    pub start: CameraPose,
    pub end: CameraPose,
    pub progress: f32,
    pub speed: f32,
}

impl Transition {
    pub fn new(start: CameraPose, end: CameraPose, speed: f32) -> Self {
        Self {
            start,
            end,
            progress: 0.0,
            speed,
        }
    }

    /// Advance one tick. Returns the pose to apply and whether the
    /// transition has landed; a landed transition yields exactly `end`.
    pub fn advance(&mut self) -> (CameraPose, bool) {
        self.progress += self.speed;
        // accumulated f32 steps may stop just short of 1
        if self.progress >= 1.0 - 1e-5 {
            self.progress = 1.0;
            return (self.end, true);
        }
        (
            self.start.interpolate(&self.end, ease_out_cubic(self.progress)),
            false,
        )
    }
}

/// Smoothed mouse-driven look offset, as `(pitch, yaw)` radians.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Parallax {
    pub target: Vec2,
    pub current: Vec2,
}

impl Parallax {
    /// `ndc_x` grows to the right, `ndc_y_down` grows downward.
    pub fn aim(&mut self, ndc_x: f32, ndc_y_down: f32) {
        self.target = Vec2::new(
            ndc_y_down * PARALLAX_MAX_ROTATION,
            ndc_x * PARALLAX_MAX_ROTATION,
        );
    }

    pub fn step(&mut self) {
        self.current += (self.target - self.current) * PARALLAX_SMOOTH;
    }

    pub fn offset(&self) -> Quat {
        quat_from_euler_yxz(self.current.x, self.current.y, 0.0)
    }
}

/// Which surfaces accept pointer events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointerRouting {
    pub canvas: bool,
    pub back_layer: bool,
    pub front_layer: bool,
    pub tv_panel: bool,
}

impl Default for PointerRouting {
    fn default() -> Self {
        Self {
            canvas: true,
            back_layer: true,
            front_layer: false,
            tv_panel: true,
        }
    }
}

impl PointerRouting {
    /// A focus change hands the pointer either to the back layer (the TV
    /// page) or to the canvas.
    pub fn apply_focus(&mut self, overlay_pointer: bool) {
        self.canvas = !overlay_pointer;
        self.back_layer = overlay_pointer;
    }

    /// Cards are picked through their hitboxes on the canvas.
    pub fn gallery_opened(&mut self) {
        self.tv_panel = false;
        self.back_layer = false;
        self.canvas = true;
        self.front_layer = false;
    }

    pub fn gallery_closed(&mut self) {
        self.canvas = true;
        self.tv_panel = true;
        self.back_layer = true;
        self.front_layer = false;
    }
}

pub struct FocusMachine {
    state: FocusTarget,
    idle: CameraPose,
    targets: FocusPoses,
    case_poses: Vec<Option<TargetPose>>,
    transition: Option<Transition>,
    base_orientation: Quat,
    pub parallax: Parallax,
    speed: f32,
}

impl FocusMachine {
    /// `initial` is the camera pose at startup and becomes the IDLE pose.
    pub fn new(initial: CameraPose, targets: FocusPoses) -> Self {
        Self {
            state: FocusTarget::Idle,
            idle: initial,
            targets,
            case_poses: Vec::new(),
            transition: None,
            base_orientation: initial.orientation,
            parallax: Parallax::default(),
            speed: TRANSITION_SPEED,
        }
    }

    /// Declare the showcase cases that GAME may refer to, in `CaseId` order.
    pub fn set_cases(&mut self, poses: Vec<Option<TargetPose>>) {
        self.case_poses = poses;
    }

    pub fn state(&self) -> FocusTarget {
        self.state
    }

    pub fn idle_pose(&self) -> CameraPose {
        self.idle
    }

    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    pub fn base_orientation(&self) -> Quat {
        self.base_orientation
    }

    pub fn active_case(&self) -> Option<CaseId> {
        self.state.case()
    }

    /// Whether the back DOM overlay should take pointer events instead of
    /// the canvas.
    pub fn overlay_pointer(&self) -> bool {
        match self.state {
            FocusTarget::Idle => false,
            other => self.target_pose(other).is_some_and(|t| t.overlay_pointer),
        }
    }

    fn target_pose(&self, target: FocusTarget) -> Option<TargetPose> {
        match target {
            FocusTarget::Idle => None,
            FocusTarget::Tv => Some(self.targets.tv),
            FocusTarget::Shelf => Some(self.targets.shelf),
            FocusTarget::Game(c) => self
                .case_poses
                .get(c.0)
                .map(|custom| custom.unwrap_or(self.targets.game)),
        }
    }

    fn end_pose(&self, target: FocusTarget) -> Option<CameraPose> {
        match target {
            FocusTarget::Idle => Some(self.idle),
            other => self.target_pose(other).map(|t| t.camera_pose()),
        }
    }

    /// Ask the camera to move to `target`, starting from `camera`.
    pub fn request_focus(&mut self, target: FocusTarget, camera: &CameraPose) -> FocusOutcome {
        let Some(end) = self.end_pose(target) else {
            log::warn!("[focus] unknown case in {:?}", target);
            return FocusOutcome::Ignored(IgnoreReason::UnknownCase);
        };
        if let (FocusTarget::Game(want), FocusTarget::Game(have)) = (target, self.state) {
            if want == have {
                return FocusOutcome::Confirm(want);
            }
        }
        if target == self.state {
            return FocusOutcome::Ignored(IgnoreReason::AlreadyFocused);
        }
        if self.transition.is_some() {
            log::debug!("[focus] dropped {} while moving", target.label());
            return FocusOutcome::Ignored(IgnoreReason::InFlight);
        }
        self.begin(target, *camera, end)
    }

    /// Move to `target` even while another transition runs, replacing it
    /// from the current camera pose.
    pub fn force_focus(&mut self, target: FocusTarget, camera: &CameraPose) -> FocusOutcome {
        let Some(end) = self.end_pose(target) else {
            log::warn!("[focus] unknown case in {:?}", target);
            return FocusOutcome::Ignored(IgnoreReason::UnknownCase);
        };
        if target == self.state && self.transition.is_none() {
            return FocusOutcome::Ignored(IgnoreReason::AlreadyFocused);
        }
        if self.transition.is_some() {
            log::debug!("[focus] {} replaces running transition", target.label());
        }
        self.begin(target, *camera, end)
    }

    /// Start a transition to an arbitrary pose, replacing any in-flight one.
    /// Focus becomes TV so pointer routing matches the embedded page.
    pub fn force_pose(&mut self, end: CameraPose, camera: &CameraPose) -> FocusOutcome {
        if self.transition.is_some() {
            log::debug!("[focus] custom move replaces running transition");
        }
        self.begin(FocusTarget::Tv, *camera, end)
    }

    fn begin(&mut self, target: FocusTarget, start: CameraPose, end: CameraPose) -> FocusOutcome {
        let from = self.state;
        self.state = target;
        self.transition = Some(Transition::new(start, end, self.speed));
        log::info!("[focus] {} -> {}", from.label(), target.label());
        FocusOutcome::Started { from, to: target }
    }

    /// Advance parallax and any running transition by one tick, writing the
    /// result into `camera`. Returns `true` on the tick a transition lands.
    pub fn tick(&mut self, camera: &mut CameraPose) -> bool {
        self.parallax.step();
        let Some(tr) = self.transition.as_mut() else {
            camera.orientation = (self.base_orientation * self.parallax.offset()).normalize();
            return false;
        };
        let (pose, done) = tr.advance();
        *camera = pose;
        if done {
            self.transition = None;
            self.base_orientation =
                (camera.orientation * self.parallax.offset().inverse()).normalize();
        }
        done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn transition_lands_exactly_on_end() {
        let start = CameraPose::new(Vec3::ZERO, Quat::IDENTITY, 75.0);
        let end = CameraPose::new(Vec3::new(1.0, 2.0, 3.0), Quat::from_rotation_y(1.0), 40.0);
        let mut tr = Transition::new(start, end, 0.3);
        let mut last = 0.0;
        loop {
            let (pose, done) = tr.advance();
            let d = pose.position.distance(start.position);
            assert!(d >= last - 1e-6);
            last = d;
            if done {
                assert_eq!(pose, end);
                break;
            }
        }
        assert_eq!(tr.progress, 1.0);
    }

    #[test]
    fn parallax_approaches_target() {
        let mut p = Parallax::default();
        p.aim(1.0, -1.0);
        assert!((p.target.x - 0.1).abs() < 1e-6);
        assert!((p.target.y + 0.1).abs() < 1e-6);
        p.step();
        assert!((p.current.x - 0.001).abs() < 1e-6);
    }

    #[test]
    fn routing_follows_focus() {
        let mut r = PointerRouting::default();
        r.apply_focus(true);
        assert!(!r.canvas && r.back_layer);
        r.apply_focus(false);
        assert!(r.canvas && !r.back_layer);
        r.gallery_opened();
        assert!(!r.tv_panel && !r.back_layer && r.canvas && !r.front_layer);
        r.gallery_closed();
        assert_eq!(r, PointerRouting::default());
    }
}
