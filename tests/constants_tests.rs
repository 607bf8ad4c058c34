// Host-side checks on tuning constants and the shipped room configuration.

#![allow(clippy::assertions_on_constants)]

mod web_constants {
    include!("../src/constants.rs");
}

use room_core::config::RoomConfig;
use room_core::constants::*;
use web_constants::*;

#[test]
fn transition_speed_gives_whole_tick_count() {
    let ticks = 1.0 / TRANSITION_SPEED;
    assert!((ticks - ticks.round()).abs() < 1e-3);
    assert!(ticks >= 10.0);
}

#[test]
fn smoothing_factors_are_fractions() {
    for f in [
        PARALLAX_SMOOTH,
        CASE_ANIM_SPEED,
        CARD_POSITION_LERP,
        CARD_SCALE_LERP,
        CARD_RETURN_SLERP,
        CARD_TILT_X_LERP,
        CARD_TILT_Y_LERP,
    ] {
        assert!(f > 0.0 && f <= 1.0);
    }
}

#[test]
fn audio_levels_and_random_ranges() {
    assert!(MUSIC_VOLUME > AMBIENCE_VOLUME);
    assert!(FADE_FLOOR > 0.0 && FADE_FLOOR < AMBIENCE_VOLUME);
    assert!(CLICK_RATE_MIN + CLICK_RATE_SPAN > 1.0);
    assert!(CLICK_RATE_MIN < 1.0);
    assert!(CLICK_GAIN_MIN >= 1.0);
}

#[test]
fn dimmed_cards_stay_visible() {
    assert!(CARD_DIMMED_OPACITY > 0.0 && CARD_DIMMED_OPACITY < 1.0);
}

#[test]
fn shipped_config_matches_scene_names() {
    let c = RoomConfig::default();
    assert_eq!(c.cases.len(), 3);
    assert_eq!(c.team.len(), 7);
    assert_eq!(c.grid.columns, 4);
    assert!(c.targets.tv.overlay_pointer);
    assert!(!c.targets.game.overlay_pointer);
    assert!(!c.targets.shelf.overlay_pointer);
    assert!(c.case("GameCoverVC").is_some());
    assert!(c.cases.iter().all(|k| k.store_url.is_some()));
}

#[test]
fn target_orientations_are_unit() {
    let t = RoomConfig::default().targets;
    for pose in [t.tv, t.game, t.shelf] {
        assert!((pose.orientation.length() - 1.0).abs() < 1e-5);
        assert!(pose.fov_deg > 0.0 && pose.fov_deg < 180.0);
    }
}

#[test]
fn web_timing_constants() {
    assert!(LOADING_HIDE_DELAY_MS > 0);
    assert!(!SOUND_CLICK_URL.is_empty());
    assert!(!CANVAS_ID.is_empty());
}
