// Host-side tests for messages posted by the embedded TV page.

mod common;

use common::*;
use glam::{Quat, Vec3};
use room_core::message::CrossMessage;
use room_core::{CaseId, FocusTarget, MessageError};

#[test]
fn parses_plain_zoom_out() {
    assert_eq!(CrossMessage::from_json("\"zoomOut\"").unwrap(), CrossMessage::ZoomOut);
}

#[test]
fn parses_toggle_team() {
    assert_eq!(
        CrossMessage::from_json(r#"{"type":"toggleTeam"}"#).unwrap(),
        CrossMessage::ToggleTeam
    );
}

#[test]
fn camera_move_fov_defaults_to_fifty() {
    let text = r#"{"type":"cameraMove","detail":{"position":{"x":1,"y":2,"z":3},"rotation":{"x":0,"y":0,"z":0}}}"#;
    let CrossMessage::CameraMove(detail) = CrossMessage::from_json(text).unwrap() else {
        panic!("expected cameraMove");
    };
    assert_eq!(detail.camera_pose().fov_deg, 50.0);

    let zero = r#"{"type":"cameraMove","detail":{"position":{"x":0,"y":0,"z":0},"rotation":{"x":0,"y":0,"z":0},"fov":0}}"#;
    let CrossMessage::CameraMove(detail) = CrossMessage::from_json(zero).unwrap() else {
        panic!("expected cameraMove");
    };
    assert_eq!(detail.camera_pose().fov_deg, 50.0);
}

#[test]
fn rejects_unknown_and_malformed() {
    assert!(matches!(
        CrossMessage::from_json(r#"{"type":"dance"}"#),
        Err(MessageError::Unknown(_))
    ));
    assert!(matches!(
        CrossMessage::from_json("\"zoomIn\""),
        Err(MessageError::Unknown(_))
    ));
    assert!(matches!(
        CrossMessage::from_json("{not json"),
        Err(MessageError::NotJson(_))
    ));
}

#[test]
fn camera_move_starts_custom_transition() {
    let mut app = room_app();
    let text = r#"{"type":"cameraMove","detail":{"position":{"x":1,"y":2,"z":3},"rotation":{"x":0,"y":90,"z":0},"fov":60}}"#;
    app.message(CrossMessage::from_json(text).unwrap());

    assert_eq!(app.focus().state(), FocusTarget::Tv);
    let tr = app.focus().transition().expect("transition running");
    assert_eq!(tr.progress, 0.0);
    assert!((tr.end.position - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-5);
    assert!((tr.end.fov_deg - 60.0).abs() < 1e-5);
    let yaw = Quat::from_rotation_y(90f32.to_radians());
    assert!(tr.end.orientation.dot(yaw).abs() > 1.0 - 1e-5);
    assert!(!app.routing().canvas);
    assert!(app.routing().back_layer);
}

#[test]
fn camera_move_overrides_running_transition() {
    let mut app = room_app();
    let (x, y) = pixel_of(&app, "GameCase");
    app.click(x, y);
    app.tick();
    assert_eq!(app.focus().state(), FocusTarget::Game(CaseId(0)));
    let text = r#"{"type":"cameraMove","detail":{"position":{"x":0,"y":1,"z":0},"rotation":{"x":0,"y":0,"z":0},"fov":45}}"#;
    app.message(CrossMessage::from_json(text).unwrap());
    assert_eq!(app.focus().state(), FocusTarget::Tv);
    assert_eq!(app.focus().transition().unwrap().end.fov_deg, 45.0);
    // the case card hides again
    let case = app.showcase().get(CaseId(0)).unwrap();
    assert_eq!(app.overlays().opacity(case.overlay), Some(0.0));
}

#[test]
fn zoom_out_only_leaves_tv() {
    let mut app = room_app();
    app.message(CrossMessage::ZoomOut);
    assert!(!app.focus().is_transitioning());

    let (x, y) = pixel_of(&app, "ClickTarget");
    app.click(x, y);
    settle(&mut app);
    app.message(CrossMessage::ZoomOut);
    assert_eq!(app.focus().state(), FocusTarget::Idle);
    assert!(app.focus().is_transitioning());
}
