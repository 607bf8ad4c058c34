// Page structure, asset locations and renderer tuning for the browser shell.
// Room behaviour tuning lives in `room_core::constants`.

// Elements provided by index.html
pub const CANVAS_ID: &str = "background";
pub const LOADING_SCREEN_ID: &str = "loading-screen";
pub const LOADING_PROGRESS_ID: &str = "loading-progress";
pub const LOADING_TEXT_ID: &str = "loading-text";
pub const AUDIO_TOGGLE_ID: &str = "audio-toggle";

// Elements created at startup
pub const FLIP_INSTRUCTION_ID: &str = "flip-instruction";
pub const CSS_BACK_LAYER_ID: &str = "css-back";
pub const CSS_FRONT_LAYER_ID: &str = "css-front";
pub const HOLO_STYLE_ID: &str = "holo-styles";

// Classes toggled by the shell
pub const HIDDEN_CLASS: &str = "hidden";
pub const MUTED_CLASS: &str = "muted";
pub const ACTIVE_CLASS: &str = "active";

// Stacking: back layer under the canvas, front layer above it
pub const Z_BACK_LAYER: &str = "0";
pub const Z_CANVAS: &str = "1";
pub const Z_FRONT_LAYER: &str = "100";

// Sounds
pub const SOUND_CLICK_URL: &str = "/sounds/click.mp3";
pub const SOUND_MUSIC_URL: &str = "/sounds/music.mp3";
pub const SOUND_AMBIENCE_URL: &str = "/sounds/ambience.mp3";
pub const SOUND_EASTER_EGG_URL: &str = "/sounds/PooeyHappy.mp3";

// Renderer
pub const LIGHT_DIR: [f32; 3] = [0.35, 0.9, 0.45]; // towards the key light
pub const AMBIENT_LIGHT: f32 = 0.35;
pub const INITIAL_INSTANCE_CAPACITY: usize = 64;
