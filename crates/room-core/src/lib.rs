pub mod app;
pub mod audio;
pub mod camera;
pub mod config;
pub mod constants;
pub mod error;
pub mod focus;
pub mod gallery;
pub mod message;
pub mod overlay;
pub mod picking;
pub mod pose;
pub mod scene;
pub mod scene_file;
pub mod showcase;

pub use app::{Effect, Effects, RoomApp};
pub use camera::{Camera, Ray, Viewport};
pub use config::RoomConfig;
pub use error::{LoadError, MessageError};
pub use focus::{CaseId, FocusMachine, FocusOutcome, FocusTarget, PointerRouting};
pub use pose::{CameraPose, Transform};
pub use scene::{NodeId, SceneGraph};
