//! Arena-backed scene graph with name lookup and ray casting.
//!
//! Freed slots are reused, but every `NodeId` carries the generation of its
//! slot, so an id held by a showcase case or a gallery hitbox either resolves
//! to the node it was created for or to nothing.

use crate::camera::Ray;
use crate::pose::Transform;
use fnv::FnvHashMap;
use glam::{Mat4, Vec3};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// Arena slot of the node. Slots are shared across generations.
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Mesh {
    /// Axis-aligned box in node space.
    Box { half_extents: Vec3 },
    /// Double-sided rectangle in the node's XY plane, centered on the origin.
    Quad { width: f32, height: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub color: [f32; 4],
    /// Draws fully transparent, punching a hole through to the DOM layer
    /// underneath the canvas.
    pub mask: bool,
    /// Invisible meshes are skipped by the renderer but still pickable.
    pub visible: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: [0.8, 0.8, 0.8, 1.0],
            mask: false,
            visible: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MeshInstance {
    pub mesh: Mesh,
    pub material: Material,
}

#[derive(Clone, Debug, Default)]
pub struct Node {
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub local: Transform,
    pub mesh: Option<MeshInstance>,
    /// Vertical fov in degrees when this node is a camera.
    pub camera_fov: Option<f32>,
}

impl Node {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_transform(mut self, local: Transform) -> Self {
        self.local = local;
        self
    }

    pub fn with_mesh(mut self, mesh: Mesh, material: Material) -> Self {
        self.mesh = Some(MeshInstance { mesh, material });
        self
    }

    pub fn with_camera(mut self, fov_deg: f32) -> Self {
        self.camera_fov = Some(fov_deg);
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub node: NodeId,
    pub distance: f32,
    pub point: Vec3,
}

#[derive(Clone, Debug, Default)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

#[derive(Clone, Debug, Default)]
pub struct SceneGraph {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
    roots: Vec<NodeId>,
    names: FnvHashMap<String, NodeId>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, mut node: Node, parent: Option<NodeId>) -> NodeId {
        let parent = parent.filter(|p| self.get(*p).is_some());
        node.parent = parent;
        node.children.clear();
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.generation = slot.generation.wrapping_add(1);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot::default());
                NodeId {
                    index: (self.slots.len() - 1) as u32,
                    generation: 0,
                }
            }
        };
        if !node.name.is_empty() {
            self.names.entry(node.name.clone()).or_insert(id);
        }
        self.slots[id.index()].node = Some(node);
        self.live += 1;
        match parent {
            Some(p) => {
                if let Some(pn) = self.get_mut(p) {
                    pn.children.push(id);
                }
            }
            None => self.roots.push(id),
        }
        id
    }

    /// Remove a node and its whole subtree.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        let slot = self
            .slots
            .get_mut(id.index())
            .filter(|s| s.generation == id.generation)?;
        let node = slot.node.take()?;
        self.free.push(id.index);
        self.live -= 1;
        match node.parent {
            Some(p) => {
                if let Some(pn) = self.get_mut(p) {
                    pn.children.retain(|c| *c != id);
                }
            }
            None => self.roots.retain(|r| *r != id),
        }
        if self.names.get(&node.name) == Some(&id) {
            self.names.remove(&node.name);
            // fall back to another node of the same name
            let other = self.iter().find(|(_, n)| n.name == node.name).map(|(id, _)| id);
            if let Some(other) = other {
                self.names.insert(node.name.clone(), other);
            }
        }
        for child in node.children.clone() {
            self.remove(child);
        }
        Some(node)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index())
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index())
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_mut())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            let id = NodeId {
                index: i as u32,
                generation: s.generation,
            };
            s.node.as_ref().map(|n| (id, n))
        })
    }

    /// Depth-first traversal order starting from the roots.
    pub fn traverse(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.live);
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if let Some(n) = self.get(id) {
                out.push(id);
                stack.extend(n.children.iter().rev().copied());
            }
        }
        out
    }

    pub fn first_camera(&self) -> Option<NodeId> {
        self.traverse()
            .into_iter()
            .find(|id| self.get(*id).is_some_and(|n| n.camera_fov.is_some()))
    }

    /// The node itself followed by each of its ancestors up to the root.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            graph: self,
            next: self.get(id).map(|_| id),
        }
    }

    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut m = Mat4::IDENTITY;
        for a in self.ancestors(id) {
            if let Some(n) = self.get(a) {
                m = n.local.matrix() * m;
            }
        }
        m
    }

    pub fn world_transform(&self, id: NodeId) -> Transform {
        Transform::from_matrix(&self.world_matrix(id))
    }

    pub fn set_local(&mut self, id: NodeId, local: Transform) {
        if let Some(n) = self.get_mut(id) {
            n.local = local;
        }
    }

    /// Intersect every mesh in the graph, nearest first.
    pub fn raycast(&self, ray: &Ray) -> Vec<Hit> {
        let ids = self.traverse();
        self.raycast_nodes(ray, &ids)
    }

    /// Intersect only the given nodes, nearest first. Ids that no longer
    /// resolve are ignored.
    pub fn raycast_nodes(&self, ray: &Ray, ids: &[NodeId]) -> Vec<Hit> {
        let mut hits: Vec<Hit> = ids
            .iter()
            .filter_map(|id| {
                let mesh = self.get(*id)?.mesh.as_ref()?;
                let world = self.world_matrix(*id);
                intersect_mesh(ray, &mesh.mesh, &world).map(|distance| Hit {
                    node: *id,
                    distance,
                    point: ray.at(distance),
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

pub struct Ancestors<'a> {
    graph: &'a SceneGraph,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let cur = self.next?;
        self.next = self.graph.get(cur).and_then(|n| n.parent);
        Some(cur)
    }
}

/// Ray parameter of the nearest intersection in world units, if any.
fn intersect_mesh(ray: &Ray, mesh: &Mesh, world: &Mat4) -> Option<f32> {
    if world.determinant().abs() < 1e-12 {
        return None;
    }
    let inv = world.inverse();
    // Affine map keeps the ray parameter identical in both spaces.
    let o = inv.transform_point3(ray.origin);
    let d = inv.transform_vector3(ray.dir);
    let t = match *mesh {
        Mesh::Box { half_extents } => ray_aabb(o, d, -half_extents, half_extents)?,
        Mesh::Quad { width, height } => {
            if d.z.abs() < 1e-9 {
                return None;
            }
            let t = -o.z / d.z;
            let p = o + d * t;
            if p.x.abs() > width * 0.5 || p.y.abs() > height * 0.5 {
                return None;
            }
            t
        }
    };
    (t >= 0.0).then_some(t)
}

fn ray_aabb(o: Vec3, d: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;
    for axis in 0..3 {
        let (oa, da, lo, hi) = (o[axis], d[axis], min[axis], max[axis]);
        if da.abs() < 1e-12 {
            if oa < lo || oa > hi {
                return None;
            }
            continue;
        }
        let inv = 1.0 / da;
        let (mut t0, mut t1) = ((lo - oa) * inv, (hi - oa) * inv);
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_min = t_min.max(t0);
        t_max = t_max.min(t1);
        if t_min > t_max {
            return None;
        }
    }
    if t_max < 0.0 {
        return None;
    }
    Some(if t_min >= 0.0 { t_min } else { t_max })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn freed_slots_are_reused_without_reviving_old_ids() {
        let mut g = SceneGraph::new();
        let root = g.add(Node::named("root"), None);
        let mut old = Vec::new();
        for round in 0..10 {
            let ids: Vec<NodeId> = (0..7)
                .map(|i| g.add(Node::named(format!("card{}", i)), Some(root)))
                .collect();
            assert_eq!(g.len(), 8);
            assert!(old.iter().all(|id| !g.contains(*id)), "round {}", round);
            for id in &ids {
                assert!(g.remove(*id).is_some());
            }
            assert!(g.remove(ids[0]).is_none());
            old.extend(ids);
        }
        assert_eq!(g.len(), 1);
        assert_eq!(g.slots.len(), 8);
        assert!(g.get(root).unwrap().children.is_empty());
        assert_eq!(g.traverse(), vec![root]);
    }

    #[test]
    fn name_lookup_falls_back_to_a_live_duplicate() {
        let mut g = SceneGraph::new();
        let first = g.add(Node::named("Pooey"), None);
        let second = g.add(Node::named("Pooey"), None);
        assert_eq!(g.find_by_name("Pooey"), Some(first));
        g.remove(first);
        assert_eq!(g.find_by_name("Pooey"), Some(second));
        g.remove(second);
        assert_eq!(g.find_by_name("Pooey"), None);
    }

    #[test]
    fn box_hit_from_outside_and_inside() {
        let o = Vec3::new(0.0, 0.0, 5.0);
        let d = Vec3::NEG_Z;
        let t = ray_aabb(o, d, Vec3::splat(-1.0), Vec3::splat(1.0)).unwrap();
        assert!((t - 4.0).abs() < 1e-5);
        let t_in = ray_aabb(Vec3::ZERO, d, Vec3::splat(-1.0), Vec3::splat(1.0)).unwrap();
        assert!((t_in - 1.0).abs() < 1e-5);
        assert!(ray_aabb(Vec3::new(3.0, 0.0, 5.0), d, Vec3::splat(-1.0), Vec3::splat(1.0)).is_none());
    }

    #[test]
    fn quad_respects_scale_and_rotation() {
        let world = Transform::from_parts(
            Vec3::new(0.0, 0.0, -2.0),
            Quat::from_rotation_y(std::f32::consts::PI),
            Vec3::splat(0.01),
        )
        .matrix();
        let quad = Mesh::Quad { width: 100.0, height: 50.0 };
        let ray = Ray::new(Vec3::new(0.4, 0.2, 0.0), Vec3::NEG_Z);
        let t = intersect_mesh(&ray, &quad, &world).unwrap();
        assert!((t - 2.0).abs() < 1e-4);
        let miss = Ray::new(Vec3::new(0.6, 0.0, 0.0), Vec3::NEG_Z);
        assert!(intersect_mesh(&miss, &quad, &world).is_none());
    }

    #[test]
    fn remove_drops_subtree_and_name() {
        let mut g = SceneGraph::new();
        let a = g.add(Node::named("a"), None);
        let b = g.add(Node::named("b"), Some(a));
        assert_eq!(g.find_by_name("b"), Some(b));
        g.remove(a);
        assert!(g.get(b).is_none());
        assert!(g.find_by_name("a").is_none());
        assert!(g.is_empty());
    }
}
