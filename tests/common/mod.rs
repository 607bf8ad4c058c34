// Shared fixtures for the host-side tests: a small room with a camera, the
// TV screen, three showcase cases and the team trigger.

#![allow(dead_code)]

use glam::Vec3;
use room_core::scene_file::{SceneFile, SceneProvider};
use room_core::{RoomApp, RoomConfig, SceneGraph, Viewport};

pub const ROOM_JSON: &str = r#"{
  "nodes": [
    { "name": "Camera", "position": [0, 1.6, 3], "camera": { "fov": 60 } },
    { "name": "ClickTarget", "position": [0, 1.6, -3],
      "mesh": { "shape": "box", "size": [1.0, 0.6, 0.05] } },
    { "name": "Pooey", "parent": "ClickTarget", "position": [0.7, 0, 0],
      "mesh": { "shape": "box", "size": [0.2, 0.2, 0.2] } },
    { "name": "GameCase", "position": [1.6, 1.6, -3],
      "mesh": { "shape": "box", "size": [0.3, 0.4, 0.1] } },
    { "name": "GameCoverVC", "position": [-1.6, 1.6, -3] },
    { "name": "CoverVCMesh", "parent": "GameCoverVC",
      "mesh": { "shape": "box", "size": [0.3, 0.4, 0.1] } },
    { "name": "GameCoverLabworks", "position": [-1.6, 0.9, -3],
      "mesh": { "shape": "box", "size": [0.3, 0.4, 0.1] } },
    { "name": "TeamTrigger", "position": [1.6, 0.9, -3],
      "mesh": { "shape": "box", "size": [0.3, 0.3, 0.3], "color": [0.2, 0.4, 0.9, 1.0] } }
  ]
}"#;

pub fn viewport() -> Viewport {
    Viewport::new(1280.0, 720.0)
}

pub fn room_scene() -> SceneGraph {
    let file = SceneFile::from_json(ROOM_JSON).expect("fixture parses");
    let mut scene = SceneGraph::new();
    file.populate(&mut scene, &mut |_| {})
        .expect("fixture populates");
    scene
}

/// Shipped config with the case inspect spot moved in front of the GAME
/// camera of the fixture room.
pub fn room_config() -> RoomConfig {
    let mut config = RoomConfig::default();
    config.case_inspect.position = Vec3::new(0.8, 1.1, -0.5);
    config
}

pub fn room_app() -> RoomApp {
    RoomApp::new(room_config(), room_scene(), viewport())
}

/// Client pixel over the world-space origin of the named node.
pub fn pixel_of(app: &RoomApp, name: &str) -> (f32, f32) {
    let id = app.scene().find_by_name(name).expect("node exists");
    let world = app.scene().world_transform(id).translation;
    let p = app
        .camera()
        .project_to_screen(world, app.viewport())
        .expect("node in front of camera");
    (p.x, p.y)
}

/// Some pixel whose picking ray hits nothing.
pub fn empty_pixel(app: &RoomApp) -> (f32, f32) {
    let vp = app.viewport();
    for iy in 0..8 {
        for ix in 0..8 {
            let x = 5.0 + ix as f32 * (vp.width - 10.0) / 7.0;
            let y = 5.0 + iy as f32 * (vp.height - 10.0) / 7.0;
            let ray = app.camera().ray_from_ndc(vp.to_ndc(x, y));
            if app.scene().raycast(&ray).is_empty() {
                return (x, y);
            }
        }
    }
    panic!("no empty pixel on screen");
}

/// Tick until no transition is running.
pub fn settle(app: &mut RoomApp) {
    for _ in 0..200 {
        if !app.focus().is_transitioning() {
            return;
        }
        app.tick();
    }
    panic!("transition never landed");
}
