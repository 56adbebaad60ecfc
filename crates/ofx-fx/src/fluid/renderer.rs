#![forbid(unsafe_code)]

//! Software renderer for a [`FluidScene`].
//!
//! Opaque meshes are drawn first as flat-shaded triangles with depth testing,
//! then the particle cloud as translucent screen-aligned squares that test
//! against depth but do not write it.
//!
//! Shading is per face: ambient plus a Lambert term for the point light and a
//! Blinn-Phong highlight whose strength and tightness follow the material's
//! metalness and roughness. Single-sided materials cull faces pointing away
//! from the eye; double-sided ones flip the normal instead.

use glam::{Mat4, Vec3, Vec4};
use ofx_render::{PackedRgba, Raster, ScreenVertex};

use super::camera::Camera;
use super::mesh::{Material, Mesh, Transform};
use super::particles::ParticleCloud;
use super::scene::{FluidScene, Lights};

/// Counters from one [`SoftwareRenderer::render`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    /// Triangles that survived clipping and culling.
    pub triangles: u32,
    /// Pixels written by triangles.
    pub pixels: u32,
    /// Particles inside the view volume.
    pub points: u32,
}

/// Owns the color + depth surface the scene is drawn into.
#[derive(Debug)]
pub struct SoftwareRenderer {
    surface: Raster,
}

impl SoftwareRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            surface: Raster::with_depth(width, height),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface.resize(width, height);
    }

    #[inline]
    pub fn surface(&self) -> &Raster {
        &self.surface
    }

    #[inline]
    pub fn surface_mut(&mut self) -> &mut Raster {
        &mut self.surface
    }

    /// Release the renderer, handing back its surface.
    pub fn into_surface(self) -> Raster {
        self.surface
    }

    pub fn render(&mut self, scene: &FluidScene) -> RenderStats {
        let mut stats = RenderStats::default();
        if self.surface.is_empty() {
            return stats;
        }
        self.surface.clear(scene.background());

        let camera = scene.camera();
        let view_proj = camera.view_projection();
        let lights = scene.lights();

        let wave = scene.wave();
        self.draw_mesh(
            wave.mesh(),
            wave.transform(),
            wave.material(),
            camera,
            &view_proj,
            lights,
            &mut stats,
        );
        let ribbon = scene.ribbon();
        self.draw_mesh(
            ribbon.mesh(),
            ribbon.transform(),
            ribbon.material(),
            camera,
            &view_proj,
            lights,
            &mut stats,
        );
        self.draw_particles(scene, camera, &view_proj, &mut stats);

        tracing::trace!(
            triangles = stats.triangles,
            pixels = stats.pixels,
            points = stats.points,
            "fluid frame rendered"
        );
        stats
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_mesh(
        &mut self,
        mesh: &Mesh,
        transform: &Transform,
        material: &Material,
        camera: &Camera,
        view_proj: &Mat4,
        lights: &Lights,
        stats: &mut RenderStats,
    ) {
        let model = transform.matrix();
        let eye = camera.position();
        let near = camera.near();
        let (width, height) = self.surface.size();

        for &tri in &mesh.triangles {
            let world = mesh.corners(tri).map(|p| model.transform_point3(p));
            let clip = world.map(|p| *view_proj * p.extend(1.0));
            // No near-plane clipping: triangles touching it are dropped.
            if clip.iter().any(|c| c.w <= near) {
                continue;
            }

            let center = (world[0] + world[1] + world[2]) / 3.0;
            let to_eye = (eye - center).normalize_or_zero();
            let mut normal = model.transform_vector3(mesh.face_normal(tri)).normalize_or_zero();
            if normal.dot(to_eye) < 0.0 {
                if !material.double_sided {
                    continue;
                }
                normal = -normal;
            }

            let color = shade(material, normal, center, to_eye, lights);
            let screen = clip.map(|c| to_screen(c, width, height));
            stats.triangles += 1;
            stats.pixels += self.surface.fill_triangle(screen, color);
        }
    }

    fn draw_particles(
        &mut self,
        scene: &FluidScene,
        camera: &Camera,
        view_proj: &Mat4,
        stats: &mut RenderStats,
    ) {
        let params = scene.particle_style();
        let cloud: &ParticleCloud = scene.particles();
        let model = Mat4::from_rotation_y(cloud.rotation_y());
        let mvp = *view_proj * model;
        let color = params.color.with_opacity(params.opacity);
        let near = camera.near();
        let (width, height) = self.surface.size();
        let half_height = height as f32 / 2.0;

        for p in cloud.positions() {
            let clip = mvp * p.extend(1.0);
            if clip.w <= near {
                continue;
            }
            let v = to_screen(clip, width, height);
            if !(-1.0..=1.0).contains(&v.depth) {
                continue;
            }
            // Perspective size attenuation: world size over view depth.
            let size = (params.size * half_height / clip.w).max(1.0);
            let x0 = (v.x - size / 2.0).round() as i64;
            let y0 = (v.y - size / 2.0).round() as i64;
            let side = size.round().max(1.0) as i64;
            let mut any = false;
            for y in y0.max(0)..(y0 + side).min(height as i64) {
                for x in x0.max(0)..(x0 + side).min(width as i64) {
                    any |= self.surface.blend_pixel_depth(x as u32, y as u32, v.depth, color);
                }
            }
            stats.points += any as u32;
        }
    }
}

/// Clip space to pixel coordinates; depth is NDC z.
#[inline]
fn to_screen(clip: Vec4, width: u32, height: u32) -> ScreenVertex {
    let ndc = clip.truncate() / clip.w;
    ScreenVertex::new(
        (ndc.x * 0.5 + 0.5) * width as f32,
        (0.5 - ndc.y * 0.5) * height as f32,
        ndc.z,
    )
}

fn shade(material: &Material, normal: Vec3, point: Vec3, to_eye: Vec3, lights: &Lights) -> PackedRgba {
    let to_light = (lights.point_position - point).normalize_or_zero();
    let diffuse = normal.dot(to_light).max(0.0) * lights.point_intensity;

    let half = (to_light + to_eye).normalize_or_zero();
    let smooth = 1.0 - material.roughness.clamp(0.0, 1.0);
    let shininess = 2.0 + smooth * smooth * 126.0;
    let strength = smooth * (0.04 + 0.96 * material.metalness.clamp(0.0, 1.0));
    let highlight = normal.dot(half).max(0.0).powf(shininess) * strength * lights.point_intensity;

    // Metals reflect less diffuse light.
    let light = lights.ambient + diffuse * (1.0 - 0.5 * material.metalness);
    material
        .color
        .shade(light)
        .lerp(PackedRgba::WHITE, highlight.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_mapping() {
        let v = to_screen(Vec4::new(0.0, 0.0, 0.5, 1.0), 100, 50);
        assert_eq!((v.x, v.y, v.depth), (50.0, 25.0, 0.5));
        let top_left = to_screen(Vec4::new(-2.0, 2.0, 0.0, 2.0), 100, 50);
        assert_eq!((top_left.x, top_left.y), (0.0, 0.0));
    }

    #[test]
    fn shade_ambient_only_when_facing_away() {
        let lights = Lights::default();
        let material = Material::new(PackedRgba::rgb(200, 100, 50));
        let c = shade(&material, Vec3::NEG_Y, Vec3::ZERO, Vec3::Z, &lights);
        assert_eq!(c, PackedRgba::rgb(100, 50, 25));
    }

    #[test]
    fn shade_brighter_toward_light() {
        let lights = Lights::default();
        let material = Material::new(PackedRgba::rgb(100, 100, 100));
        let lit = shade(&material, Vec3::ONE.normalize(), Vec3::ZERO, Vec3::Z, &lights);
        let dark = shade(&material, -Vec3::ONE.normalize(), Vec3::ZERO, Vec3::Z, &lights);
        assert!(lit.r() > dark.r());
    }

    #[test]
    fn empty_surface_renders_nothing() {
        let scene = FluidScene::with_seed(&Default::default(), 1.0, 1);
        let mut renderer = SoftwareRenderer::new(0, 0);
        assert_eq!(renderer.render(&scene), RenderStats::default());
    }

    #[test]
    fn renders_visible_geometry() {
        let mut scene = FluidScene::with_seed(&Default::default(), 4.0 / 3.0, 1);
        scene.advance(glam::Vec2::ZERO);
        let mut renderer = SoftwareRenderer::new(160, 120);
        let stats = renderer.render(&scene);
        assert!(stats.triangles > 0);
        assert!(stats.pixels > 0);
        assert!(stats.points > 0);
        let background = scene.background();
        assert!(renderer.surface().pixels().iter().any(|p| *p != background));
    }
}
