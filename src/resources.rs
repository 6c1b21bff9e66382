use std::collections::HashSet;

use glam::Vec3;
use wgpu::util::DeviceExt;

use crate::uniforms::LineVertex;

/// Edge-only geometry: vertex positions and index pairs for a line list.
#[derive(Debug, Clone, PartialEq)]
pub struct WireMesh {
    pub positions: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl WireMesh {
    /// Keeps every distinct triangle edge once, which is what a wireframe
    /// material draws for a triangulated surface.
    pub fn from_triangles(positions: Vec<[f32; 3]>, triangles: &[u32]) -> Self {
        let mut seen = HashSet::new();
        let mut indices = Vec::new();
        for tri in triangles.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                if a != b && seen.insert((a.min(b), a.max(b))) {
                    indices.push(a);
                    indices.push(b);
                }
            }
        }
        Self { positions, indices }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn edge_count(&self) -> usize {
        self.indices.len() / 2
    }

    pub fn bounding_radius(&self) -> f32 {
        self.positions
            .iter()
            .map(|p| Vec3::from(*p).length())
            .fold(0.0, f32::max)
    }
}

fn projected(corners: &[[f32; 3]], radius: f32) -> Vec<[f32; 3]> {
    corners
        .iter()
        .map(|c| (Vec3::from(*c).normalize() * radius).to_array())
        .collect()
}

pub fn tetrahedron(radius: f32) -> WireMesh {
    let corners = [[1.0, 1.0, 1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, -1.0], [1.0, -1.0, -1.0]];
    WireMesh::from_triangles(
        projected(&corners, radius),
        &[2, 1, 0, 0, 3, 2, 1, 3, 0, 2, 3, 1],
    )
}

pub fn octahedron(radius: f32) -> WireMesh {
    let corners = [
        [1.0, 0.0, 0.0],
        [-1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
    ];
    WireMesh::from_triangles(
        projected(&corners, radius),
        &[
            0, 2, 4, 0, 4, 3, 0, 3, 5, 0, 5, 2, 1, 2, 5, 1, 5, 3, 1, 3, 4, 1, 4, 2,
        ],
    )
}

const ICOSAHEDRON_FACES: [u32; 60] = [
    0, 11, 5, 0, 5, 1, 0, 1, 7, 0, 7, 10, 0, 10, 11, 1, 5, 9, 5, 11, 4, 11, 10, 2, 10, 7, 6, 7, 1,
    8, 3, 9, 4, 3, 4, 2, 3, 2, 6, 3, 6, 8, 3, 8, 9, 4, 9, 5, 2, 4, 11, 6, 2, 10, 8, 6, 7, 9, 8, 1,
];

fn icosahedron_corners() -> [[f32; 3]; 12] {
    let t = (1.0 + 5f32.sqrt()) / 2.0;
    [
        [-1.0, t, 0.0],
        [1.0, t, 0.0],
        [-1.0, -t, 0.0],
        [1.0, -t, 0.0],
        [0.0, -1.0, t],
        [0.0, 1.0, t],
        [0.0, -1.0, -t],
        [0.0, 1.0, -t],
        [t, 0.0, -1.0],
        [t, 0.0, 1.0],
        [-t, 0.0, -1.0],
        [-t, 0.0, 1.0],
    ]
}

pub fn icosahedron(radius: f32) -> WireMesh {
    WireMesh::from_triangles(projected(&icosahedron_corners(), radius), &ICOSAHEDRON_FACES)
}

/// Built as the dual of the icosahedron: one vertex per icosahedron face,
/// one pentagon (fan-triangulated) per icosahedron vertex.
pub fn dodecahedron(radius: f32) -> WireMesh {
    let ico: Vec<Vec3> = icosahedron_corners().iter().map(|c| Vec3::from(*c).normalize()).collect();
    let faces: Vec<[usize; 3]> = ICOSAHEDRON_FACES
        .chunks_exact(3)
        .map(|f| [f[0] as usize, f[1] as usize, f[2] as usize])
        .collect();
    let centers: Vec<Vec3> = faces
        .iter()
        .map(|f| (ico[f[0]] + ico[f[1]] + ico[f[2]]).normalize())
        .collect();

    let mut triangles = Vec::with_capacity(12 * 9);
    for (vertex, axis) in ico.iter().enumerate() {
        let u = axis.any_orthonormal_vector();
        let v = axis.cross(u);
        let mut ring: Vec<(f32, u32)> = faces
            .iter()
            .enumerate()
            .filter(|(_, f)| f.contains(&vertex))
            .map(|(i, _)| (centers[i].dot(v).atan2(centers[i].dot(u)), i as u32))
            .collect();
        ring.sort_by(|a, b| a.0.total_cmp(&b.0));
        for k in 1..ring.len().saturating_sub(1) {
            triangles.extend_from_slice(&[ring[0].1, ring[k].1, ring[k + 1].1]);
        }
    }

    let positions = centers.iter().map(|c| (*c * radius).to_array()).collect();
    WireMesh::from_triangles(positions, &triangles)
}

/// Ring of `tubular` segments around the main circle, each a circle of
/// `radial` segments; seams carry duplicate vertices.
pub fn torus(radius: f32, tube: f32, radial: u32, tubular: u32) -> WireMesh {
    use std::f32::consts::TAU;

    let mut positions = Vec::with_capacity(((radial + 1) * (tubular + 1)) as usize);
    for j in 0..=radial {
        let v = j as f32 / radial as f32 * TAU;
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * TAU;
            let ring = radius + tube * v.cos();
            positions.push([ring * u.cos(), ring * u.sin(), tube * v.sin()]);
        }
    }

    let mut triangles = Vec::with_capacity((radial * tubular * 6) as usize);
    for j in 1..=radial {
        for i in 1..=tubular {
            let a = (tubular + 1) * j + i - 1;
            let b = (tubular + 1) * (j - 1) + i - 1;
            let c = (tubular + 1) * (j - 1) + i;
            let d = (tubular + 1) * j + i;
            triangles.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    WireMesh::from_triangles(positions, &triangles)
}

/// Latitude/longitude sphere; the degenerate triangles at the poles are skipped.
pub fn sphere(radius: f32, segments: u32) -> WireMesh {
    use std::f32::consts::PI;

    let mut positions = Vec::new();
    for i in 0..=segments {
        let theta = (i as f32 / segments as f32) * PI;
        for j in 0..=segments {
            let phi = (j as f32 / segments as f32) * 2.0 * PI;
            positions.push([
                radius * phi.cos() * theta.sin(),
                radius * theta.cos(),
                radius * phi.sin() * theta.sin(),
            ]);
        }
    }

    let mut triangles = Vec::new();
    for i in 0..segments {
        for j in 0..segments {
            let first = i * (segments + 1) + j;
            let second = first + segments + 1;
            if i != 0 {
                triangles.extend_from_slice(&[first, second, first + 1]);
            }
            if i != segments - 1 {
                triangles.extend_from_slice(&[second, second + 1, first + 1]);
            }
        }
    }
    WireMesh::from_triangles(positions, &triangles)
}

/// A [`WireMesh`] uploaded to the GPU.
pub struct LineMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_indices: u32,
}

impl LineMesh {
    pub fn upload(device: &wgpu::Device, mesh: &WireMesh) -> Self {
        let vertices: Vec<LineVertex> = mesh
            .positions
            .iter()
            .map(|&position| LineVertex { position })
            .collect();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Wireframe Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Wireframe Index Buffer"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            num_indices: mesh.indices.len() as u32,
        }
    }

    pub fn destroy(&self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
    }
}
