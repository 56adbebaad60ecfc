#![forbid(unsafe_code)]

//! Procedurally displaced plane.
//!
//! Each vertex keeps its rest position; every update writes
//!
//! ```text
//! z = sin(0.5x + t)·0.3 + cos(0.5y + 1.2t)·0.3 + sin(0.3(x + y) + 0.8t)·0.5
//! ```
//!
//! from the rest `x`, `y` only, so the surface never drifts.

use glam::{Vec2, Vec3};
use ofx_render::PackedRgba;

use super::mesh::{self, Material, Mesh, Transform};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WaveParams {
    pub size: f32,
    pub segments: u32,
    pub material: Material,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            size: 8.0,
            segments: 50,
            material: Material::new(PackedRgba::hex(0xf5f5f5))
                .metalness(0.2)
                .roughness(0.4)
                .double_sided(),
        }
    }
}

/// Displacement at rest position `(x, y)` and time `t`.
#[inline]
pub fn wave_height(x: f32, y: f32, t: f32) -> f32 {
    let wave_x = (x * 0.5 + t).sin() * 0.3;
    let wave_y = (y * 0.5 + t * 1.2).cos() * 0.3;
    let wave_xy = ((x + y) * 0.3 + t * 0.8).sin() * 0.5;
    wave_xy + wave_x + wave_y
}

#[derive(Debug, Clone)]
pub struct WaveMesh {
    mesh: Mesh,
    rest: Box<[Vec2]>,
    material: Material,
    transform: Transform,
    version: u64,
}

impl WaveMesh {
    pub fn new(params: &WaveParams) -> Self {
        let mesh = mesh::plane(params.size, params.size, params.segments, params.segments);
        let rest = mesh.positions.iter().map(|p| p.truncate()).collect();
        Self {
            mesh,
            rest,
            material: params.material,
            transform: Transform::default(),
            version: 0,
        }
    }

    /// Displace every vertex for time `t`, refresh normals and apply the
    /// time-driven tilt and spin.
    pub fn update(&mut self, t: f32) {
        for (pos, rest) in self.mesh.positions.iter_mut().zip(self.rest.iter()) {
            *pos = Vec3::new(rest.x, rest.y, wave_height(rest.x, rest.y, t));
        }
        self.mesh.recompute_normals();
        self.version = self.version.wrapping_add(1);
        self.transform.rotation.x = (t * 0.3).sin() * 0.1;
        self.transform.rotation.y = t * 0.1;
    }

    #[inline]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Rest positions captured at construction.
    #[inline]
    pub fn rest_positions(&self) -> &[Vec2] {
        &self.rest
    }

    #[inline]
    pub fn material(&self) -> &Material {
        &self.material
    }

    #[inline]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Bumped on every geometry change.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }
}
