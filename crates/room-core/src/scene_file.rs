//! Scene provider contract and the JSON scene description it reads.
//!
//! A provider populates an empty [`SceneGraph`] and reports progress as it
//! goes. Nothing else in the app touches the graph until the provider has
//! returned `Ok`.

use crate::error::LoadError;
use crate::pose::Transform;
use crate::scene::{Material, Mesh, Node, SceneGraph};
use fnv::FnvHashMap;
use glam::{Quat, Vec3};
use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadProgress {
    pub loaded: usize,
    pub total: usize,
}

impl LoadProgress {
    /// Rounded percentage, 100 for an empty load.
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 100;
        }
        ((self.loaded as f64 / self.total as f64) * 100.0).round() as u32
    }

    pub fn is_complete(&self) -> bool {
        self.loaded >= self.total
    }
}

pub trait SceneProvider {
    fn populate(
        &self,
        root: &mut SceneGraph,
        progress: &mut dyn FnMut(LoadProgress),
    ) -> Result<(), LoadError>;
}

#[derive(Clone, Debug, Deserialize)]
pub struct SceneFile {
    pub nodes: Vec<NodeDesc>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NodeDesc {
    pub name: String,
    /// Name of a node declared earlier in the file.
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub position: [f32; 3],
    /// Quaternion as `[x, y, z, w]`.
    #[serde(default = "identity_rotation")]
    pub rotation: [f32; 4],
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
    #[serde(default)]
    pub mesh: Option<MeshDesc>,
    #[serde(default)]
    pub camera: Option<CameraDesc>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum ShapeDesc {
    Box { size: [f32; 3] },
    Quad { width: f32, height: f32 },
}

#[derive(Clone, Debug, Deserialize)]
pub struct MeshDesc {
    #[serde(flatten)]
    pub shape: ShapeDesc,
    #[serde(default = "default_color")]
    pub color: [f32; 4],
    #[serde(default)]
    pub mask: bool,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CameraDesc {
    #[serde(default = "default_fov")]
    pub fov: f32,
}

fn identity_rotation() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn default_color() -> [f32; 4] {
    [0.8, 0.8, 0.8, 1.0]
}

fn default_visible() -> bool {
    true
}

fn default_fov() -> f32 {
    75.0
}

impl SceneFile {
    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        serde_json::from_str(text).map_err(|e| LoadError::Parse(e.to_string()))
    }
}

impl NodeDesc {
    fn to_node(&self) -> Result<Node, LoadError> {
        let q = Quat::from_array(self.rotation);
        if !q.is_finite() || q.length_squared() < 1e-12 {
            return Err(LoadError::Invalid(format!(
                "node '{}' has a degenerate rotation",
                self.name
            )));
        }
        let mut node = Node::named(self.name.clone()).with_transform(Transform::from_parts(
            Vec3::from_array(self.position),
            q.normalize(),
            Vec3::from_array(self.scale),
        ));
        if let Some(m) = &self.mesh {
            let mesh = match m.shape {
                ShapeDesc::Box { size } => Mesh::Box {
                    half_extents: Vec3::from_array(size) * 0.5,
                },
                ShapeDesc::Quad { width, height } => Mesh::Quad { width, height },
            };
            node = node.with_mesh(
                mesh,
                Material {
                    color: m.color,
                    mask: m.mask,
                    visible: m.visible,
                },
            );
        }
        if let Some(c) = &self.camera {
            node = node.with_camera(c.fov);
        }
        Ok(node)
    }
}

impl SceneProvider for SceneFile {
    fn populate(
        &self,
        root: &mut SceneGraph,
        progress: &mut dyn FnMut(LoadProgress),
    ) -> Result<(), LoadError> {
        let total = self.nodes.len();
        let mut by_name = FnvHashMap::default();
        for (i, desc) in self.nodes.iter().enumerate() {
            let parent = match &desc.parent {
                Some(p) => Some(*by_name.get(p.as_str()).ok_or_else(|| {
                    LoadError::Invalid(format!(
                        "node '{}' references unknown parent '{}'",
                        desc.name, p
                    ))
                })?),
                None => None,
            };
            let id = root.add(desc.to_node()?, parent);
            by_name.entry(desc.name.as_str()).or_insert(id);
            progress(LoadProgress {
                loaded: i + 1,
                total,
            });
        }
        log::info!("[scene] populated {} nodes", total);
        Ok(())
    }
}
