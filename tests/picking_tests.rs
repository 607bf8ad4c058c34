// Host-side tests for hit resolution: the behaviour table, the ancestor
// walk and the click effects it produces.

mod common;

use common::*;
use room_core::audio::Sound;
use room_core::overlay::OverlayRegistry;
use room_core::picking::{resolve_hit, Behavior, BehaviorTable, Pick};
use room_core::scene::{Node, SceneGraph};
use room_core::showcase::Showcase;
use room_core::{CaseId, Effect, FocusTarget};

fn table_for(scene: &SceneGraph) -> BehaviorTable {
    let config = room_config();
    let mut overlays = OverlayRegistry::new();
    let showcase = Showcase::setup(scene, &mut overlays, &config);
    BehaviorTable::build(scene, &config.names, &showcase)
}

#[test]
fn table_is_built_from_named_nodes() {
    let scene = room_scene();
    let table = table_for(&scene);
    // easter egg, trigger, tv and three cases
    assert_eq!(table.len(), 6);
    let tv = scene.find_by_name("ClickTarget").unwrap();
    assert_eq!(table.get(tv), Some(Behavior::Tv));
    let vc = scene.find_by_name("GameCoverVC").unwrap();
    assert_eq!(table.get(vc), Some(Behavior::Case(CaseId(1))));
    assert_eq!(table.node_for(Behavior::TeamTrigger), scene.find_by_name("TeamTrigger"));
}

#[test]
fn every_node_sharing_a_special_name_is_tagged() {
    let mut scene = room_scene();
    let shelf = scene.add(Node::named("Shelf"), None);
    let egg2 = scene.add(Node::named("Pooey"), Some(shelf));
    let trigger2 = scene.add(Node::named("TeamTrigger"), None);
    let table = table_for(&scene);
    assert_eq!(table.len(), 8);
    assert_eq!(table.get(egg2), Some(Behavior::EasterEgg));
    assert_eq!(table.get(trigger2), Some(Behavior::TeamTrigger));

    let res = resolve_hit(&table, &scene, egg2);
    assert!(res.easter_egg);
    assert_eq!(res.target, None);
    let res = resolve_hit(&table, &scene, trigger2);
    assert_eq!(res.target, Some(Pick::TeamTrigger));
}

#[test]
fn case_mesh_below_registered_node_resolves_to_case() {
    let scene = room_scene();
    let table = table_for(&scene);
    let mesh = scene.find_by_name("CoverVCMesh").unwrap();
    let res = resolve_hit(&table, &scene, mesh);
    assert_eq!(res.target, Some(Pick::Case(CaseId(1))));
    assert!(!res.easter_egg);
}

#[test]
fn easter_egg_does_not_stop_the_walk() {
    let scene = room_scene();
    let table = table_for(&scene);
    let egg = scene.find_by_name("Pooey").unwrap();
    let res = resolve_hit(&table, &scene, egg);
    assert!(res.easter_egg);
    assert_eq!(res.target, Some(Pick::Tv));
}

#[test]
fn nearest_match_while_ascending_wins() {
    let mut scene = room_scene();
    let tv = scene.find_by_name("ClickTarget").unwrap();
    // a case nested below the TV screen
    let case_root = scene.find_by_name("GameCase").unwrap();
    let inner = scene.add(Node::named("Inner"), Some(tv));
    let mut table = table_for(&scene);
    table.insert(inner, Behavior::Case(CaseId(0)));
    let leaf = scene.add(Node::named("Leaf"), Some(inner));
    assert_eq!(resolve_hit(&table, &scene, leaf).target, Some(Pick::Case(CaseId(0))));
    assert_eq!(resolve_hit(&table, &scene, tv).target, Some(Pick::Tv));
    assert_eq!(resolve_hit(&table, &scene, case_root).target, Some(Pick::Case(CaseId(0))));
}

#[test]
fn unnamed_node_resolves_to_nothing() {
    let mut scene = room_scene();
    let table = table_for(&scene);
    let loose = scene.add(Node::named("Lamp"), None);
    assert_eq!(resolve_hit(&table, &scene, loose), Default::default());
}

#[test]
fn missing_named_nodes_are_skipped() {
    let mut scene = SceneGraph::new();
    scene.add(Node::named("Floor"), None);
    let table = table_for(&scene);
    assert!(table.is_empty());
}

#[test]
fn every_click_plays_the_click_sound() {
    let mut app = room_app();
    let (x, y) = empty_pixel(&app);
    let fx = app.click(x, y);
    let clicks: Vec<_> = fx
        .iter()
        .filter_map(|e| match e {
            Effect::PlaySound(s) if s.sound == Sound::Click => Some(*s),
            _ => None,
        })
        .collect();
    assert_eq!(clicks.len(), 1);
    assert!((0.95..1.05).contains(&clicks[0].rate));
    assert!((1.0..1.2).contains(&clicks[0].gain));
}

#[test]
fn clicking_easter_egg_plays_sound_and_focuses_tv() {
    let mut app = room_app();
    let (x, y) = pixel_of(&app, "Pooey");
    let fx = app.click(x, y);
    assert!(fx
        .iter()
        .any(|e| matches!(e, Effect::PlaySound(s) if s.sound == Sound::EasterEgg)));
    assert_eq!(app.focus().state(), FocusTarget::Tv);
}

#[test]
fn team_trigger_opens_gallery_without_focusing() {
    let mut app = room_app();
    let (x, y) = pixel_of(&app, "TeamTrigger");
    let fx = app.click(x, y);
    assert!(app.gallery().is_open());
    assert!(fx.contains(&Effect::GalleryOpened));
    assert_eq!(app.focus().state(), FocusTarget::Idle);
}
