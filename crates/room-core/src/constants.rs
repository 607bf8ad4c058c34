// Shared tuning constants for the room. All rates are per frame tick.

use std::f32::consts::{FRAC_PI_2, PI};

// Focus transitions
pub const TRANSITION_SPEED: f32 = 0.02; // progress added per tick (50 ticks per move)
pub const CUSTOM_MOVE_DEFAULT_FOV: f32 = 50.0; // used when a cameraMove omits fov

// Idle parallax
pub const PARALLAX_SMOOTH: f32 = 0.01; // fraction of the remaining offset covered per tick
pub const PARALLAX_MAX_ROTATION: f32 = -0.1; // radians at the viewport edge

// Default camera when the scene has none
pub const DEFAULT_CAMERA_POSITION: [f32; 3] = [0.0, 1.6, 3.0];
pub const DEFAULT_CAMERA_FOV: f32 = 75.0;

// Showcase cases
pub const CASE_ANIM_SPEED: f32 = 0.05; // pose easing toward inspect/original
pub const CASE_CARD_SCALE: f32 = 0.0005; // info card CSS px -> world
pub const CASE_CARD_OFFSET: [f32; 3] = [0.35, 0.0, 0.0]; // info card beside the case

// TV panel
pub const TV_PANEL_SCALE: f32 = 0.0006;
pub const TV_PANEL_OFFSET: [f32; 3] = [-0.5, -0.12, -0.04];
pub const TV_PANEL_SIZE_PX: [f32; 2] = [1920.0, 1500.0];
pub const TV_PANEL_ROTATION: [f32; 3] = [-FRAC_PI_2, FRAC_PI_2, PI]; // XYZ radians

// Team cards
pub const CARD_SIZE_PX: [f32; 2] = [320.0, 440.0]; // card element and hitbox quad
pub const CARD_POSITION_LERP: f32 = 0.1;
pub const CARD_SCALE_LERP: f32 = 0.1;
pub const CARD_RETURN_SLERP: f32 = 0.1;
pub const CARD_TILT_X_LERP: f32 = 0.2;
pub const CARD_TILT_Y_LERP: f32 = 0.15;
pub const CARD_DIMMED_OPACITY: f32 = 0.1; // other cards while one is inspected
pub const HOVER_TILT_PER_PERCENT: f32 = 0.05; // degrees of tilt per percent off-center

// Audio
pub const MUSIC_VOLUME: f32 = 0.6;
pub const AMBIENCE_VOLUME: f32 = 0.2;
pub const FADE_TIME_SEC: f64 = 0.7;
pub const FOCUS_LOSS_FADE_SEC: f64 = 0.5;
pub const MANUAL_MUTE_FADE_SEC: f64 = 0.3;
pub const MANUAL_UNMUTE_FADE_SEC: f64 = 0.5;
pub const FADE_FLOOR: f32 = 0.0001; // exponential ramps cannot reach zero
pub const CLICK_RATE_MIN: f32 = 0.95;
pub const CLICK_RATE_SPAN: f32 = 0.1;
pub const CLICK_GAIN_MIN: f32 = 1.0;
pub const CLICK_GAIN_SPAN: f32 = 0.2;

// Keyboard
pub const KEY_CANCEL: &str = "Space";
pub const KEY_TOGGLE_TEAM: &str = "KeyT";

// Loading screen
pub const LOADING_HIDE_DELAY_MS: u64 = 500;
