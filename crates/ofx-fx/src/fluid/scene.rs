#![forbid(unsafe_code)]

//! Per-mount animation context.

use glam::{Vec2, Vec3};
use ofx_core::noise::{NoiseSource, XorShift32};
use ofx_render::PackedRgba;

use super::FluidParams;
use super::camera::Camera;
use super::particles::{ParticleCloud, ParticleParams};
use super::ribbon::Ribbon;
use super::wave::WaveMesh;

/// Ambient term plus one white point light.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Lights {
    pub ambient: f32,
    pub point_position: Vec3,
    pub point_intensity: f32,
}

impl Default for Lights {
    fn default() -> Self {
        Self {
            ambient: 0.5,
            point_position: Vec3::new(5.0, 5.0, 5.0),
            point_intensity: 1.0,
        }
    }
}

/// Everything one mounted fluid interface animates: camera, lights, wave,
/// particles, ribbon and the time accumulator.
///
/// Built on mount and dropped on teardown; nothing outlives it.
#[derive(Debug, Clone)]
pub struct FluidScene {
    time: f32,
    time_step: f32,
    background: PackedRgba,
    lights: Lights,
    camera: Camera,
    wave: WaveMesh,
    particles: ParticleCloud,
    particle_style: ParticleParams,
    ribbon: Ribbon,
}

impl FluidScene {
    pub fn new(params: &FluidParams, aspect: f32, noise: &mut dyn NoiseSource) -> Self {
        Self {
            time: 0.0,
            time_step: params.time_step,
            background: params.background,
            lights: params.lights,
            camera: Camera::new(&params.camera, aspect),
            wave: WaveMesh::new(&params.wave),
            particles: ParticleCloud::new(&params.particles, noise),
            particle_style: params.particles.clone(),
            ribbon: Ribbon::new(&params.ribbon),
        }
    }

    /// Build with a seeded [`XorShift32`] for particle placement.
    pub fn with_seed(params: &FluidParams, aspect: f32, seed: u32) -> Self {
        Self::new(params, aspect, &mut XorShift32::new(seed))
    }

    /// Run one frame of animation against the latest pointer position.
    pub fn advance(&mut self, pointer: Vec2) {
        self.time += self.time_step;
        let t = self.time;
        self.wave.update(t);
        self.particles.step();
        self.ribbon.update(t);
        self.camera.follow_pointer(pointer);
    }

    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[inline]
    pub fn background(&self) -> PackedRgba {
        self.background
    }

    #[inline]
    pub fn lights(&self) -> &Lights {
        &self.lights
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    #[inline]
    pub fn wave(&self) -> &WaveMesh {
        &self.wave
    }

    #[inline]
    pub fn particles(&self) -> &ParticleCloud {
        &self.particles
    }

    /// Draw parameters of the particle cloud.
    #[inline]
    pub fn particle_style(&self) -> &ParticleParams {
        &self.particle_style
    }

    #[inline]
    pub fn ribbon(&self) -> &Ribbon {
        &self.ribbon
    }
}
