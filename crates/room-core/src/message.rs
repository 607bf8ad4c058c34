//! Messages posted by the page embedded on the TV.

use crate::constants::CUSTOM_MOVE_DEFAULT_FOV;
use crate::error::MessageError;
use crate::pose::{quat_from_euler_yxz_deg, CameraPose};
use glam::Vec3;
use serde::Deserialize;
use serde_json::Value;

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
pub struct XyzDesc {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl From<XyzDesc> for Vec3 {
    fn from(v: XyzDesc) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct CameraMoveDetail {
    pub position: XyzDesc,
    /// `YXZ` Euler angles in degrees.
    #[serde(default)]
    pub rotation: XyzDesc,
    #[serde(default)]
    pub fov: Option<f32>,
}

impl CameraMoveDetail {
    pub fn camera_pose(&self) -> CameraPose {
        let r = self.rotation;
        let fov = match self.fov {
            Some(f) if f != 0.0 => f,
            _ => CUSTOM_MOVE_DEFAULT_FOV,
        };
        CameraPose::new(self.position.into(), quat_from_euler_yxz_deg(r.x, r.y, r.z), fov)
    }
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum TaggedMessage {
    ToggleTeam,
    CameraMove { detail: CameraMoveDetail },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CrossMessage {
    ZoomOut,
    ToggleTeam,
    CameraMove(CameraMoveDetail),
}

impl CrossMessage {
    pub fn from_value(value: &Value) -> Result<Self, MessageError> {
        if value.as_str() == Some("zoomOut") {
            return Ok(CrossMessage::ZoomOut);
        }
        match TaggedMessage::deserialize(value) {
            Ok(TaggedMessage::ToggleTeam) => Ok(CrossMessage::ToggleTeam),
            Ok(TaggedMessage::CameraMove { detail }) => Ok(CrossMessage::CameraMove(detail)),
            Err(_) => Err(MessageError::Unknown(value.to_string())),
        }
    }

    /// Decode a message from its JSON text.
    pub fn from_json(text: &str) -> Result<Self, MessageError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| MessageError::NotJson(e.to_string()))?;
        Self::from_value(&value)
    }
}
