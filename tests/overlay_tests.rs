// Host-side tests for the overlay registry and the CSS 3D transform math.

mod common;

use common::*;
use glam::{Quat, Vec2, Vec3};
use room_core::camera::{Camera, Viewport};
use room_core::overlay::{
    css_camera, local_offset, object_css_transform, screen_rect, Anchor, Follow, Layer,
    OverlayKind, OverlayRegistry,
};
use room_core::pose::{CameraPose, Transform};
use room_core::scene::{Node, SceneGraph};
use room_core::CaseId;

fn anchored(follow: Follow) -> (SceneGraph, OverlayRegistry, room_core::NodeId, room_core::overlay::OverlayId) {
    let mut scene = SceneGraph::new();
    let parent = scene.add(
        Node::named("Shelf").with_transform(Transform::from_translation(Vec3::new(1.0, 0.0, 0.0))),
        None,
    );
    let child = scene.add(
        Node::named("Case").with_transform(Transform::from_parts(
            Vec3::new(0.0, 2.0, 0.0),
            Quat::from_rotation_y(0.5),
            Vec3::splat(2.0),
        )),
        Some(parent),
    );
    let mut overlays = OverlayRegistry::new();
    let id = overlays.register(
        OverlayKind::CaseCard(CaseId(0)),
        Layer::Front,
        Anchor::Node { node: child, follow },
        local_offset(Vec3::new(0.35, 0.0, 0.0), Quat::IDENTITY, 0.001),
        Vec2::new(400.0, 300.0),
        0.0,
    );
    overlays.sync(&scene);
    (scene, overlays, parent, id)
}

#[test]
fn full_follow_copies_anchor_world_transform() {
    let (scene, overlays, _, id) = anchored(Follow::Full);
    let e = overlays.get(id).unwrap();
    assert!((e.frame.translation - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-5);
    assert!((e.frame.scale - Vec3::splat(2.0)).length() < 1e-5);
    let case = scene.find_by_name("Case").unwrap();
    let expected = scene.world_matrix(case) * e.local.matrix();
    assert!(e.world.abs_diff_eq(expected, 1e-5));
}

#[test]
fn rigid_follow_ignores_anchor_scale() {
    let (_, overlays, _, id) = anchored(Follow::Rigid);
    let e = overlays.get(id).unwrap();
    assert!((e.frame.scale - Vec3::ONE).length() < 1e-5);
    assert!(e.frame.rotation.dot(Quat::from_rotation_y(0.5)).abs() > 1.0 - 1e-5);
}

#[test]
fn moving_the_parent_moves_the_overlay() {
    let (mut scene, mut overlays, parent, id) = anchored(Follow::Full);
    scene.set_local(parent, Transform::from_translation(Vec3::new(-3.0, 0.0, 0.0)));
    overlays.sync(&scene);
    let e = overlays.get(id).unwrap();
    assert!((e.frame.translation - Vec3::new(-3.0, 2.0, 0.0)).length() < 1e-5);
}

#[test]
fn removed_anchor_keeps_last_transform() {
    let (mut scene, mut overlays, parent, id) = anchored(Follow::Full);
    let before = overlays.get(id).unwrap().world;
    scene.remove(parent);
    overlays.sync(&scene);
    assert_eq!(overlays.get(id).unwrap().world, before);
}

#[test]
fn free_overlays_are_posed_directly() {
    let (_, mut overlays, _, anchored_id) = anchored(Follow::Full);
    let free = overlays.register(
        OverlayKind::TeamCard(0),
        Layer::Front,
        Anchor::Free,
        Transform::IDENTITY,
        Vec2::new(320.0, 440.0),
        1.0,
    );
    let pose = Transform::from_translation(Vec3::new(0.0, 0.0, -4.0)).with_uniform_scale(0.01);
    overlays.set_frame(free, pose);
    assert_eq!(overlays.get(free).unwrap().world, pose.matrix());

    let before = overlays.get(anchored_id).unwrap().clone();
    overlays.set_frame(anchored_id, pose);
    assert_eq!(overlays.get(anchored_id).unwrap(), &before);
}

#[test]
fn layers_partition_overlays() {
    let app = room_app();
    let back: Vec<_> = app.overlays().in_layer(Layer::Back).collect();
    assert_eq!(back.len(), 1);
    assert_eq!(back[0].kind, OverlayKind::TvPanel);
    assert_eq!(app.overlays().in_layer(Layer::Front).count(), 3);
}

#[test]
fn tv_panel_tracks_screen_node() {
    let app = room_app();
    let tv = app.tv_overlay().unwrap();
    let e = app.overlays().get(tv).unwrap();
    let screen = app.scene().find_by_name("ClickTarget").unwrap();
    assert!((e.frame.translation - Vec3::new(0.0, 1.6, -3.0)).length() < 1e-5);
    assert!(app.scene().get(screen).unwrap().mesh.as_ref().unwrap().material.mask);
}

#[test]
fn identity_object_flips_y_column() {
    let css = object_css_transform(&glam::Mat4::IDENTITY);
    assert_eq!(
        css,
        "translate(-50%,-50%)matrix3d(1,0,0,0,0,-1,0,0,0,0,1,0,0,0,0,1)"
    );
}

#[test]
fn css_camera_perspective_matches_fov() {
    let cam = Camera::new(CameraPose::new(Vec3::ZERO, Quat::IDENTITY, 90.0), 1.0);
    let c = css_camera(&cam, Viewport::new(720.0, 720.0));
    assert!((c.perspective_px - 360.0).abs() < 1e-2);
    assert!(c.transform.starts_with("translateZ(360"));
    assert!(c.transform.ends_with("translate(360px,360px)"));
}

#[test]
fn screen_rect_of_facing_panel() {
    let cam = Camera::new(CameraPose::new(Vec3::ZERO, Quat::IDENTITY, 90.0), 1.0);
    let vp = Viewport::new(720.0, 720.0);
    let mut overlays = OverlayRegistry::new();
    let id = overlays.register(
        OverlayKind::TeamCard(0),
        Layer::Front,
        Anchor::Free,
        Transform::IDENTITY,
        Vec2::new(200.0, 100.0),
        1.0,
    );
    overlays.set_frame(
        id,
        Transform::from_translation(Vec3::new(0.0, 0.0, -1.0)).with_uniform_scale(0.001),
    );
    let (min, max) = screen_rect(overlays.get(id).unwrap(), &cam, vp).unwrap();
    assert!((max.x - min.x - 72.0).abs() < 1e-2);
    assert!((max.y - min.y - 36.0).abs() < 1e-2);
    assert!(((min + max) * 0.5 - Vec2::splat(360.0)).length() < 1e-2);
}

#[test]
fn panel_behind_camera_has_no_rect() {
    let cam = Camera::new(CameraPose::new(Vec3::ZERO, Quat::IDENTITY, 90.0), 1.0);
    let mut overlays = OverlayRegistry::new();
    let id = overlays.register(
        OverlayKind::TvPanel,
        Layer::Back,
        Anchor::Free,
        Transform::IDENTITY,
        Vec2::new(100.0, 100.0),
        1.0,
    );
    overlays.set_frame(id, Transform::from_translation(Vec3::new(0.0, 0.0, 5.0)));
    assert!(screen_rect(overlays.get(id).unwrap(), &cam, Viewport::new(720.0, 720.0)).is_none());
}
