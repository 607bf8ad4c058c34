// Host-side tests for the camera focus state machine, driven both directly
// and through the room's click handling.

mod common;

use common::*;
use glam::{Quat, Vec3};
use room_core::config::RoomConfig;
use room_core::focus::{FocusMachine, FocusOutcome, FocusTarget, IgnoreReason};
use room_core::pose::CameraPose;
use room_core::{CaseId, Effect};

fn machine() -> (FocusMachine, CameraPose) {
    let start = CameraPose::new(Vec3::new(0.0, 1.6, 3.0), Quat::IDENTITY, 60.0);
    let mut m = FocusMachine::new(start, RoomConfig::default().targets);
    m.set_cases(vec![None, None]);
    (m, start)
}

fn run_to_rest(m: &mut FocusMachine, cam: &mut CameraPose) -> usize {
    let mut ticks = 0;
    while m.is_transitioning() {
        m.tick(cam);
        ticks += 1;
        assert!(ticks < 1000);
    }
    ticks
}

#[test]
fn request_while_moving_is_dropped() {
    let (mut m, mut cam) = machine();
    assert!(m.request_focus(FocusTarget::Tv, &cam).started());
    for _ in 0..5 {
        m.tick(&mut cam);
    }
    let before = *m.transition().unwrap();
    let out = m.request_focus(FocusTarget::Shelf, &cam);
    assert_eq!(out, FocusOutcome::Ignored(IgnoreReason::InFlight));
    assert_eq!(m.state(), FocusTarget::Tv);
    assert_eq!(*m.transition().unwrap(), before);
}

#[test]
fn forced_focus_replaces_running_transition() {
    let (mut m, mut cam) = machine();
    m.request_focus(FocusTarget::Game(CaseId(0)), &cam);
    for _ in 0..5 {
        m.tick(&mut cam);
    }
    let out = m.force_focus(FocusTarget::Idle, &cam);
    assert_eq!(
        out,
        FocusOutcome::Started {
            from: FocusTarget::Game(CaseId(0)),
            to: FocusTarget::Idle
        }
    );
    run_to_rest(&mut m, &mut cam);
    assert_eq!(m.state(), FocusTarget::Idle);
    assert!((cam.position - m.idle_pose().position).length() < 1e-5);
    assert_eq!(
        m.force_focus(FocusTarget::Idle, &cam),
        FocusOutcome::Ignored(IgnoreReason::AlreadyFocused)
    );
}

#[test]
fn transition_takes_fifty_ticks_and_lands_exactly() {
    let (mut m, mut cam) = machine();
    m.request_focus(FocusTarget::Shelf, &cam);
    let ticks = run_to_rest(&mut m, &mut cam);
    assert_eq!(ticks, 50);

    let end = RoomConfig::default().targets.shelf;
    assert!((cam.position - end.position).length() < 1e-5);
    assert!(cam.orientation.dot(end.orientation).abs() > 1.0 - 1e-5);
    assert!((cam.fov_deg - end.fov_deg).abs() < 1e-5);
}

#[test]
fn interpolation_is_monotonic() {
    let (mut m, mut cam) = machine();
    let start = cam;
    m.request_focus(FocusTarget::Tv, &cam);
    let mut last_dist = 0.0;
    let mut last_fov_delta = 0.0;
    while m.is_transitioning() {
        m.tick(&mut cam);
        let d = cam.position.distance(start.position);
        let f = (cam.fov_deg - start.fov_deg).abs();
        assert!(d + 1e-5 >= last_dist);
        assert!(f + 1e-4 >= last_fov_delta);
        assert!((cam.orientation.length() - 1.0).abs() < 1e-4);
        last_dist = d;
        last_fov_delta = f;
    }
}

#[test]
fn same_target_is_a_noop() {
    let (mut m, mut cam) = machine();
    m.request_focus(FocusTarget::Tv, &cam);
    run_to_rest(&mut m, &mut cam);
    assert_eq!(
        m.request_focus(FocusTarget::Tv, &cam),
        FocusOutcome::Ignored(IgnoreReason::AlreadyFocused)
    );
    assert!(!m.is_transitioning());
}

#[test]
fn same_case_confirms_other_case_moves() {
    let (mut m, mut cam) = machine();
    m.request_focus(FocusTarget::Game(CaseId(0)), &cam);
    run_to_rest(&mut m, &mut cam);
    assert_eq!(
        m.request_focus(FocusTarget::Game(CaseId(0)), &cam),
        FocusOutcome::Confirm(CaseId(0))
    );
    assert!(!m.is_transitioning());
    assert!(m.request_focus(FocusTarget::Game(CaseId(1)), &cam).started());
}

#[test]
fn unknown_case_is_rejected() {
    let (mut m, cam) = machine();
    assert_eq!(
        m.request_focus(FocusTarget::Game(CaseId(9)), &cam),
        FocusOutcome::Ignored(IgnoreReason::UnknownCase)
    );
    assert_eq!(m.state(), FocusTarget::Idle);
}

#[test]
fn idle_returns_to_startup_pose() {
    let (mut m, mut cam) = machine();
    let start = cam;
    m.request_focus(FocusTarget::Tv, &cam);
    run_to_rest(&mut m, &mut cam);
    m.request_focus(FocusTarget::Idle, &cam);
    run_to_rest(&mut m, &mut cam);
    assert!((cam.position - start.position).length() < 1e-5);
    assert_eq!(m.idle_pose(), start);
}

#[test]
fn landing_reanchors_base_under_parallax() {
    let (mut m, mut cam) = machine();
    m.parallax.aim(1.0, 1.0);
    for _ in 0..30 {
        m.tick(&mut cam);
    }
    m.request_focus(FocusTarget::Shelf, &cam);
    run_to_rest(&mut m, &mut cam);
    let landed = cam.orientation;
    // Next idle tick composes base with the slightly larger offset, so the
    // camera barely moves instead of snapping by the full offset.
    m.tick(&mut cam);
    assert!(cam.orientation.dot(landed).abs() > 1.0 - 1e-5);
    let expected = (m.base_orientation() * m.parallax.offset()).normalize();
    assert!(cam.orientation.dot(expected).abs() > 1.0 - 1e-6);
}

#[test]
fn forced_pose_replaces_running_move() {
    let (mut m, mut cam) = machine();
    m.request_focus(FocusTarget::Shelf, &cam);
    m.tick(&mut cam);
    let end = CameraPose::new(Vec3::new(1.0, 2.0, 3.0), Quat::IDENTITY, 60.0);
    assert!(m.force_pose(end, &cam).started());
    assert_eq!(m.state(), FocusTarget::Tv);
    assert_eq!(m.transition().unwrap().end, end);
    assert_eq!(m.transition().unwrap().progress, 0.0);
}

#[test]
fn click_case_from_idle_focuses_it_and_shows_its_card() {
    let mut app = room_app();
    let (x, y) = pixel_of(&app, "GameCoverVC");
    app.click(x, y);
    assert_eq!(app.focus().state(), FocusTarget::Game(CaseId(1)));
    for case in app.showcase().iter() {
        let want = if case.id == CaseId(1) { 1.0 } else { 0.0 };
        assert_eq!(app.overlays().opacity(case.overlay), Some(want));
    }
}

#[test]
fn click_same_case_again_opens_store_without_moving() {
    let mut app = room_app();
    let (x, y) = pixel_of(&app, "GameCase");
    app.click(x, y);
    settle(&mut app);
    let (x, y) = pixel_of(&app, "GameCase");
    let fx = app.click(x, y);
    assert!(!app.focus().is_transitioning());
    let url = app.showcase().get(CaseId(0)).unwrap().config.store_url.clone().unwrap();
    assert!(fx.contains(&Effect::OpenUrl(url)));
}

#[test]
fn click_away_from_game_goes_to_shelf() {
    let mut app = room_app();
    let (x, y) = pixel_of(&app, "GameCase");
    app.click(x, y);
    settle(&mut app);
    let (x, y) = empty_pixel(&app);
    app.click(x, y);
    assert_eq!(app.focus().state(), FocusTarget::Shelf);
}

#[test]
fn click_away_from_tv_goes_idle() {
    let mut app = room_app();
    let (x, y) = pixel_of(&app, "ClickTarget");
    app.click(x, y);
    assert_eq!(app.focus().state(), FocusTarget::Tv);
    settle(&mut app);
    let (x, y) = empty_pixel(&app);
    app.click(x, y);
    assert_eq!(app.focus().state(), FocusTarget::Idle);
}

#[test]
fn tv_focus_routes_pointer_to_page() {
    let mut app = room_app();
    let (x, y) = pixel_of(&app, "ClickTarget");
    app.click(x, y);
    let r = app.routing();
    assert!(!r.canvas);
    assert!(r.back_layer);
    settle(&mut app);
    app.key("Space");
    assert!(app.routing().canvas);
    assert!(!app.routing().back_layer);
}

#[test]
fn click_during_transition_changes_nothing() {
    let mut app = room_app();
    let (cx, cy) = pixel_of(&app, "GameCase");
    let (tx, ty) = pixel_of(&app, "ClickTarget");
    app.click(cx, cy);
    app.tick();
    let before = *app.focus().transition().unwrap();
    app.click(tx, ty);
    assert_eq!(app.focus().state(), FocusTarget::Game(CaseId(0)));
    assert_eq!(*app.focus().transition().unwrap(), before);
}

#[test]
fn focused_case_eases_toward_inspect_pose() {
    let mut app = room_app();
    let id = app.scene().find_by_name("GameCase").unwrap();
    let start = app.scene().get(id).unwrap().local.translation;
    let (x, y) = pixel_of(&app, "GameCase");
    app.click(x, y);
    app.tick();
    let target = app.config().case_inspect.position;
    let after = app.scene().get(id).unwrap().local.translation;
    let expected = start.lerp(target, 0.05);
    assert!((after - expected).length() < 1e-4);
}
