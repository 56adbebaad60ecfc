#![forbid(unsafe_code)]

//! Indexed triangle meshes, materials and object transforms.

use glam::{EulerRot, Mat4, Vec3};
use ofx_render::PackedRgba;

/// Surface appearance of a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Material {
    pub color: PackedRgba,
    /// 0 = dielectric, 1 = metal. Scales the highlight strength.
    pub metalness: f32,
    /// 0 = mirror-sharp highlight, 1 = no highlight.
    pub roughness: f32,
    /// Shade back faces instead of culling them.
    pub double_sided: bool,
}

impl Material {
    pub const fn new(color: PackedRgba) -> Self {
        Self {
            color,
            metalness: 0.0,
            roughness: 1.0,
            double_sided: false,
        }
    }

    #[must_use]
    pub const fn metalness(mut self, metalness: f32) -> Self {
        self.metalness = metalness;
        self
    }

    #[must_use]
    pub const fn roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }

    #[must_use]
    pub const fn double_sided(mut self) -> Self {
        self.double_sided = true;
        self
    }
}

/// Object rotation as XYZ Euler angles in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    pub rotation: Vec3,
}

impl Transform {
    /// Model matrix (rotation only; every object sits at the origin).
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }
}

/// Indexed triangle list with per-vertex normals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
}

impl Mesh {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Corner positions of triangle `tri`.
    #[inline]
    pub fn corners(&self, tri: [u32; 3]) -> [Vec3; 3] {
        tri.map(|i| self.positions[i as usize])
    }

    /// Average of the corner normals, or the geometric normal when the
    /// corners cancel out.
    pub fn face_normal(&self, tri: [u32; 3]) -> Vec3 {
        let summed: Vec3 = tri.iter().map(|&i| self.normals[i as usize]).sum();
        summed.try_normalize().unwrap_or_else(|| {
            let [a, b, c] = self.corners(tri);
            (b - a).cross(c - a).normalize_or_zero()
        })
    }

    /// Recompute smooth vertex normals from the triangle list.
    ///
    /// Face normals are area weighted and follow counter-clockwise winding.
    pub fn recompute_normals(&mut self) {
        self.normals.clear();
        self.normals.resize(self.positions.len(), Vec3::ZERO);
        for &tri in &self.triangles {
            let [a, b, c] = self.corners(tri);
            let n = (b - a).cross(c - a);
            for i in tri {
                self.normals[i as usize] += n;
            }
        }
        for n in &mut self.normals {
            *n = n.normalize_or_zero();
        }
    }
}

/// Flat `width`×`height` plane in the XY plane facing +Z, subdivided into a
/// grid of `(segments_x + 1) × (segments_y + 1)` vertices.
///
/// Vertices are stored row by row from the top edge (`y = +height/2`) down,
/// left to right within a row.
pub fn plane(width: f32, height: f32, segments_x: u32, segments_y: u32) -> Mesh {
    let sx = segments_x.max(1);
    let sy = segments_y.max(1);
    let cols = sx + 1;
    let seg_w = width / sx as f32;
    let seg_h = height / sy as f32;

    let mut positions = Vec::with_capacity((cols * (sy + 1)) as usize);
    for iy in 0..=sy {
        let y = height / 2.0 - iy as f32 * seg_h;
        for ix in 0..=sx {
            positions.push(Vec3::new(ix as f32 * seg_w - width / 2.0, y, 0.0));
        }
    }

    let mut triangles = Vec::with_capacity((sx * sy * 2) as usize);
    for iy in 0..sy {
        for ix in 0..sx {
            let a = ix + cols * iy;
            let b = ix + cols * (iy + 1);
            let c = (ix + 1) + cols * (iy + 1);
            let d = (ix + 1) + cols * iy;
            triangles.push([a, b, d]);
            triangles.push([b, c, d]);
        }
    }

    let normals = vec![Vec3::Z; positions.len()];
    Mesh {
        positions,
        normals,
        triangles,
    }
}
