use glam::{Mat3, Mat4, Vec3};
use room_core::scene::Mesh;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct Vertex {
    pub(crate) position: [f32; 3],
    pub(crate) normal: [f32; 3],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Per-instance model matrix, normal matrix and color.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct InstanceRaw {
    model: [[f32; 4]; 4],
    normal: [[f32; 4]; 3],
    color: [f32; 4],
}

impl InstanceRaw {
    const ATTRS: [wgpu::VertexAttribute; 8] = wgpu::vertex_attr_array![
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4,
        7 => Float32x4,
        8 => Float32x4,
        9 => Float32x4,
    ];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }

    /// `world` is the node's world matrix; the unit shape is scaled to the
    /// mesh dimensions first.
    pub(crate) fn new(world: Mat4, mesh: &Mesh, color: [f32; 4]) -> Self {
        let size = match *mesh {
            Mesh::Box { half_extents } => half_extents * 2.0,
            Mesh::Quad { width, height } => Vec3::new(width, height, 1.0),
        };
        let model = world * Mat4::from_scale(size);
        let m3 = Mat3::from_mat4(model);
        let n = if m3.determinant().abs() > 1e-12 {
            m3.inverse().transpose()
        } else {
            m3
        };
        Self {
            model: model.to_cols_array_2d(),
            normal: [
                n.x_axis.extend(0.0).to_array(),
                n.y_axis.extend(0.0).to_array(),
                n.z_axis.extend(0.0).to_array(),
            ],
            color,
        }
    }
}

fn push_face(out: &mut Vec<Vertex>, n: Vec3, u: Vec3, v: Vec3, offset: f32) {
    let c = n * offset;
    let corners = [
        c - u * 0.5 - v * 0.5,
        c + u * 0.5 - v * 0.5,
        c + u * 0.5 + v * 0.5,
        c - u * 0.5 + v * 0.5,
    ];
    for i in [0, 1, 2, 0, 2, 3] {
        out.push(Vertex {
            position: corners[i].to_array(),
            normal: n.to_array(),
        });
    }
}

/// Unit cube centered on the origin, counter-clockwise outward faces.
pub(crate) fn cube_vertices() -> Vec<Vertex> {
    let mut out = Vec::with_capacity(36);
    for (n, u, v) in [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ] {
        push_face(&mut out, n, u, v, 0.5);
    }
    out
}

/// Unit square in the XY plane facing +Z.
pub(crate) fn quad_vertices() -> Vec<Vertex> {
    let mut out = Vec::with_capacity(6);
    push_face(&mut out, Vec3::Z, Vec3::X, Vec3::Y, 0.0);
    out
}
