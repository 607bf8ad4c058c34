//! Static content and layout tables for the room.
//!
//! `RoomConfig::default()` describes the shipped site; tests build smaller
//! configs by hand.

use crate::pose::{quat_from_euler_yxz_deg, CameraPose};
use glam::{Quat, Vec2, Vec3};

/// A fixed camera destination.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetPose {
    pub position: Vec3,
    pub orientation: Quat,
    pub fov_deg: f32,
    /// Whether the back overlay (rather than the canvas) receives pointer
    /// events while focused here.
    pub overlay_pointer: bool,
}

impl TargetPose {
    /// Build from a position and `YXZ` Euler angles in degrees.
    pub fn from_euler_deg(position: Vec3, euler_deg: Vec3, fov_deg: f32, overlay_pointer: bool) -> Self {
        Self {
            position,
            orientation: quat_from_euler_yxz_deg(euler_deg.x, euler_deg.y, euler_deg.z),
            fov_deg,
            overlay_pointer,
        }
    }

    pub fn camera_pose(&self) -> CameraPose {
        CameraPose::new(self.position, self.orientation, self.fov_deg)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FocusPoses {
    pub tv: TargetPose,
    pub game: TargetPose,
    pub shelf: TargetPose,
}

/// Names of scene nodes with special behaviour.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneNames {
    pub tv_screen: String,
    pub team_trigger: String,
    pub easter_egg: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CaseConfig {
    /// Name of the scene node the case is attached to.
    pub mesh_name: String,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub genre: String,
    pub release: String,
    pub platform: String,
    pub store_url: Option<String>,
    pub offset_position: Vec3,
    /// `YXZ` Euler offset in radians added to the inspect rotation.
    pub offset_rotation: Vec3,
    /// Camera pose for this case; the shared GAME pose when `None`.
    pub focus_pose: Option<TargetPose>,
}

/// Where a focused case is pulled to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InspectPose {
    pub position: Vec3,
    /// `YXZ` Euler angles in radians.
    pub rotation: Vec3,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TeamMember {
    pub name: String,
    pub role: String,
    pub description: String,
    pub image: String,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridConfig {
    pub columns: usize,
    pub spacing: Vec2,
    pub scale: f32,
    pub position: Vec3,
    /// `XYZ` Euler angles in radians.
    pub rotation: Vec3,
    pub inspect_position: Vec3,
    /// `XYZ` Euler angles in radians.
    pub inspect_rotation: Vec3,
    pub inspect_scale: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RoomConfig {
    pub names: SceneNames,
    pub targets: FocusPoses,
    pub case_inspect: InspectPose,
    pub cases: Vec<CaseConfig>,
    pub team: Vec<TeamMember>,
    pub grid: GridConfig,
    pub tv_page_url: String,
    pub scene_url: String,
}

impl RoomConfig {
    pub fn case(&self, mesh_name: &str) -> Option<&CaseConfig> {
        self.cases.iter().find(|c| c.mesh_name == mesh_name)
    }
}

#[allow(clippy::too_many_arguments)]
fn case(
    mesh_name: &str,
    title: &str,
    subtitle: &str,
    description: &str,
    genre: &str,
    release: &str,
    platform: &str,
    store_url: &str,
    offset_position: Vec3,
) -> CaseConfig {
    CaseConfig {
        mesh_name: mesh_name.into(),
        title: title.into(),
        subtitle: subtitle.into(),
        description: description.into(),
        genre: genre.into(),
        release: release.into(),
        platform: platform.into(),
        store_url: Some(store_url.into()),
        offset_position,
        offset_rotation: Vec3::ZERO,
        focus_pose: None,
    }
}

fn member(name: &str, role: &str, description: &str, image: &str) -> TeamMember {
    TeamMember {
        name: name.into(),
        role: role.into(),
        description: description.into(),
        image: image.into(),
    }
}

impl Default for RoomConfig {
    fn default() -> Self {
        let card_rotation = Vec3::new(
            90f32.to_radians(),
            180f32.to_radians(),
            180f32.to_radians(),
        );
        Self {
            names: SceneNames {
                tv_screen: "ClickTarget".into(),
                team_trigger: "TeamTrigger".into(),
                easter_egg: "Pooey".into(),
            },
            targets: FocusPoses {
                tv: TargetPose::from_euler_deg(
                    Vec3::new(-0.840, 1.260, -0.840),
                    Vec3::new(0.0, 46.0, 0.0),
                    50.0,
                    true,
                ),
                game: TargetPose::from_euler_deg(
                    Vec3::new(0.5, 1.1, 0.5),
                    Vec3::new(0.0, -20.0, 0.0),
                    40.0,
                    false,
                ),
                shelf: TargetPose::from_euler_deg(
                    Vec3::new(0.680, 1.620, -0.040),
                    Vec3::new(-4.0, 0.0, 0.0),
                    20.0,
                    false,
                ),
            },
            case_inspect: InspectPose {
                position: Vec3::new(14.850, -0.550, 5.775),
                rotation: Vec3::ZERO,
            },
            cases: vec![
                case(
                    "GameCase",
                    "Version Control",
                    "The Sequel",
                    "The sequel to the award-winning 2024 BONEJAM mod of the same name, Version Control returns with a new storyline set in the same universe, expanding on its experimental physics, narrative focus, and self-aware comedic narration.",
                    "Narrative Adventure",
                    "Coming Soon",
                    "Steam / Meta Quest",
                    "https://store.steampowered.com/app/4187070/Version_Control/",
                    Vec3::ZERO,
                ),
                case(
                    "GameCoverVC",
                    "Version Control",
                    "The Mod",
                    "Version Control is a Stanley Parable-inspired short map made for BONEJAM. Filled with multiple jokes and references, Version Control has you playing as a playtester through an unfinished map, being shown along the way by the narrator developer. The less you know the better!",
                    "Narrative Adventure",
                    "September 2024",
                    "Bonelab",
                    "https://mod.io/g/bonelab/m/version-control",
                    Vec3::new(-1.6, 0.0, 2.3),
                ),
                case(
                    "GameCoverLabworks",
                    "Labworks",
                    "Boneworks Port",
                    "Labworks is a mod for the game Bonelab that ports Boneworks (Previously a PC-exclusive), running natively on Quest 2.",
                    "Action Adventure",
                    "October 2022",
                    "Bonelab",
                    "https://mod.io/g/bonelab/m/boneworks",
                    Vec3::new(0.0, -2.4, 0.0),
                ),
            ],
            team: vec![
                member("Volx64", "Lead Developer", "Lead Developer across all Labworks Games projects. He has been the driving force behind the original Labworks mod and both iterations of the Version Control series.", "/images/team/volx.jpg"),
                member("Evro", "Technical Developer", "Technical Developer specializing in the inner workings for Labworks Games. He has played a key role in the Labworks mod and the development of both Version Control projects.", "/images/team/evro.jpg"),
                member("Garebeu", "Lead Art Director", "Art Director, 3D Modeler, and responsible on the story Version Control (The Game) and Version Control (The Mod). Also made this website \u{1F44D}", "/images/team/Garebeu.png"),
                member("Jerbinstein", "Level Designer", "Level Designer and Narrative Developer for Version Control (The Game), and was the original voice behind the Developer in the first Version Control mod.", "/images/team/jerb.jpg"),
                member("SegaTitan", "Voice Actor", "The primary voice actor for the Version Control game, bringing the Developer character to life for this standalone experience.", "/images/team/segatitan.gif"),
                member("KadenZombie8", "Composer", "Composer and Developer who created the BIMOS Interaction System. Currently crafting the original soundtrack for Version Control.", "/images/team/Pooey.png"),
                member("Zaxoosh", "Community Manager", "Community Manager and Developer who helped manage the Labworks community after its release.", "/images/team/zax.jpg"),
            ],
            grid: GridConfig {
                columns: 4,
                spacing: Vec2::new(0.5, 0.6),
                scale: 0.0013,
                position: Vec3::new(0.6, 0.2, 0.0),
                rotation: card_rotation,
                inspect_position: Vec3::new(0.6, 0.4, 0.0),
                inspect_rotation: card_rotation,
                inspect_scale: 0.002,
            },
            tv_page_url: "/html/tv_interface.html".into(),
            scene_url: "/models/scene.json".into(),
        }
    }
}
