#![forbid(unsafe_code)]

//! Drifting point cloud inside a reflecting cube.

use glam::Vec3;
use ofx_core::noise::NoiseSource;
use ofx_render::PackedRgba;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParticleParams {
    pub count: usize,
    /// Half edge of the reflecting cube.
    pub bound: f32,
    /// Velocity components are drawn from `[-max_speed, max_speed)`.
    pub max_speed: f32,
    /// Cloud spin about Y per step, radians.
    pub spin: f32,
    pub color: PackedRgba,
    /// World-space point size.
    pub size: f32,
    pub opacity: f32,
}

impl Default for ParticleParams {
    fn default() -> Self {
        Self {
            count: 1000,
            bound: 5.0,
            max_speed: 0.01,
            spin: 0.001,
            color: PackedRgba::hex(0x1a1a1a),
            size: 0.05,
            opacity: 0.6,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParticleCloud {
    positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
    bound: f32,
    spin: f32,
    rotation_y: f32,
}

impl ParticleCloud {
    /// Scatter `params.count` particles uniformly in the cube.
    pub fn new(params: &ParticleParams, noise: &mut dyn NoiseSource) -> Self {
        let mut sample = |half: f32| {
            Vec3::new(
                noise.next_range(-half, half),
                noise.next_range(-half, half),
                noise.next_range(-half, half),
            )
        };
        let mut positions = Vec::with_capacity(params.count);
        let mut velocities = Vec::with_capacity(params.count);
        for _ in 0..params.count {
            positions.push(sample(params.bound));
            velocities.push(sample(params.max_speed));
        }
        Self {
            positions,
            velocities,
            bound: params.bound,
            spin: params.spin,
            rotation_y: 0.0,
        }
    }

    /// Move every particle one step, then flip any velocity component whose
    /// coordinate is now past the bound. A particle can overshoot by up to one
    /// step before the flip brings it back.
    pub fn step(&mut self) {
        let bound = self.bound;
        for (pos, vel) in self.positions.iter_mut().zip(self.velocities.iter_mut()) {
            *pos += *vel;
            if pos.x.abs() > bound {
                vel.x = -vel.x;
            }
            if pos.y.abs() > bound {
                vel.y = -vel.y;
            }
            if pos.z.abs() > bound {
                vel.z = -vel.z;
            }
        }
        self.rotation_y += self.spin;
    }

    #[inline]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    #[inline]
    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn bound(&self) -> f32 {
        self.bound
    }

    /// Accumulated spin of the whole cloud about Y.
    #[inline]
    pub fn rotation_y(&self) -> f32 {
        self.rotation_y
    }
}
