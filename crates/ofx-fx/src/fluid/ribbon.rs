#![forbid(unsafe_code)]

//! Tube swept along a centripetal Catmull-Rom curve.
//!
//! The curve is open: the segments before the first and after the last
//! control point use mirrored phantom points (`2·P0 − P1`, `2·Pn − Pn−1`).
//! Knot spacing follows the centripetal variant (`|ΔP|^0.5`), which avoids
//! cusps and self-intersections between closely spaced points.
//!
//! The tube samples the curve at equal arc-length steps and orients each ring
//! with a rotation-minimizing frame, so the surface does not twist.

use glam::Vec3;
use ofx_render::PackedRgba;

use super::mesh::{Material, Mesh, Transform};

/// Arc-length table resolution.
const ARC_DIVISIONS: usize = 200;
/// Parameter offset for numeric tangents.
const TANGENT_DELTA: f32 = 1e-4;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RibbonParams {
    pub control_points: Vec<Vec3>,
    pub tubular_segments: u32,
    pub radius: f32,
    pub radial_segments: u32,
    pub material: Material,
}

impl Default for RibbonParams {
    fn default() -> Self {
        Self {
            control_points: vec![
                Vec3::new(-3.0, -2.0, 0.0),
                Vec3::new(-1.0, 0.0, 1.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(3.0, -1.0, -1.0),
            ],
            tubular_segments: 64,
            radius: 0.3,
            radial_segments: 8,
            material: Material::new(PackedRgba::hex(0x2a2a2a))
                .metalness(0.7)
                .roughness(0.2),
        }
    }
}

/// Cubic `c0 + c1·t + c2·t² + c3·t³` for one axis of one segment.
#[derive(Debug, Clone, Copy)]
struct Cubic {
    c0: f32,
    c1: f32,
    c2: f32,
    c3: f32,
}

impl Cubic {
    /// Hermite form from end values and end tangents.
    fn hermite(x0: f32, x1: f32, t0: f32, t1: f32) -> Self {
        Self {
            c0: x0,
            c1: t0,
            c2: -3.0 * x0 + 3.0 * x1 - 2.0 * t0 - t1,
            c3: 2.0 * x0 - 2.0 * x1 + t0 + t1,
        }
    }

    /// Non-uniform Catmull-Rom through `x1..x2` with knot gaps `dt0..dt2`.
    fn catmull_rom(x: [f32; 4], dt0: f32, dt1: f32, dt2: f32) -> Self {
        let [x0, x1, x2, x3] = x;
        let t1 = ((x1 - x0) / dt0 - (x2 - x0) / (dt0 + dt1) + (x2 - x1) / dt1) * dt1;
        let t2 = ((x2 - x1) / dt1 - (x3 - x1) / (dt1 + dt2) + (x3 - x2) / dt2) * dt1;
        Self::hermite(x1, x2, t1, t2)
    }

    #[inline]
    fn eval(&self, t: f32) -> f32 {
        let t2 = t * t;
        self.c0 + self.c1 * t + self.c2 * t2 + self.c3 * t2 * t
    }
}

/// Open centripetal Catmull-Rom curve.
#[derive(Debug, Clone, PartialEq)]
pub struct CatmullRomCurve {
    points: Vec<Vec3>,
}

impl CatmullRomCurve {
    /// Returns `None` for fewer than two control points.
    pub fn new(points: Vec<Vec3>) -> Option<Self> {
        (points.len() >= 2).then_some(Self { points })
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Point at curve parameter `t ∈ [0, 1]` (uniform in segment index).
    pub fn point(&self, t: f32) -> Vec3 {
        let pts = &self.points;
        let n = pts.len();
        let p = (n - 1) as f32 * t.clamp(0.0, 1.0);
        let mut seg = p.floor() as usize;
        let mut weight = p - seg as f32;
        if seg >= n - 1 {
            seg = n - 2;
            weight = 1.0;
        }

        let p0 = if seg > 0 {
            pts[seg - 1]
        } else {
            2.0 * pts[0] - pts[1]
        };
        let p1 = pts[seg];
        let p2 = pts[seg + 1];
        let p3 = if seg + 2 < n {
            pts[seg + 2]
        } else {
            2.0 * pts[n - 1] - pts[n - 2]
        };

        let mut dt0 = p0.distance_squared(p1).powf(0.25);
        let mut dt1 = p1.distance_squared(p2).powf(0.25);
        let mut dt2 = p2.distance_squared(p3).powf(0.25);
        // Coincident points would divide by zero.
        if dt1 < 1e-4 {
            dt1 = 1.0;
        }
        if dt0 < 1e-4 {
            dt0 = dt1;
        }
        if dt2 < 1e-4 {
            dt2 = dt1;
        }

        let axis = |f: fn(Vec3) -> f32| {
            Cubic::catmull_rom([f(p0), f(p1), f(p2), f(p3)], dt0, dt1, dt2).eval(weight)
        };
        Vec3::new(axis(|v| v.x), axis(|v| v.y), axis(|v| v.z))
    }

    /// Cumulative chord lengths over `divisions` equal parameter steps.
    fn arc_lengths(&self, divisions: usize) -> Vec<f32> {
        let mut lengths = Vec::with_capacity(divisions + 1);
        let mut last = self.point(0.0);
        let mut sum = 0.0;
        lengths.push(0.0);
        for i in 1..=divisions {
            let current = self.point(i as f32 / divisions as f32);
            sum += current.distance(last);
            lengths.push(sum);
            last = current;
        }
        lengths
    }

    /// Approximate total length.
    pub fn length(&self) -> f32 {
        self.arc_lengths(ARC_DIVISIONS).last().copied().unwrap_or(0.0)
    }

    /// Sample `segments + 1` points and unit tangents at equal arc-length
    /// spacing from start to end.
    pub fn sample_uniform(&self, segments: u32) -> Vec<(Vec3, Vec3)> {
        let lengths = self.arc_lengths(ARC_DIVISIONS);
        let total = lengths.last().copied().unwrap_or(0.0);
        (0..=segments)
            .map(|i| {
                let u = i as f32 / segments.max(1) as f32;
                let t = param_at_length(&lengths, u * total);
                (self.point(t), self.tangent(t))
            })
            .collect()
    }

    /// Unit tangent at parameter `t`, by central difference.
    pub fn tangent(&self, t: f32) -> Vec3 {
        let t0 = (t - TANGENT_DELTA).max(0.0);
        let t1 = (t + TANGENT_DELTA).min(1.0);
        (self.point(t1) - self.point(t0)).normalize_or_zero()
    }
}

/// Invert a cumulative length table: curve parameter at arc length `target`.
fn param_at_length(lengths: &[f32], target: f32) -> f32 {
    let divisions = lengths.len().saturating_sub(1);
    if divisions == 0 {
        return 0.0;
    }
    let i = lengths.partition_point(|&l| l < target).clamp(1, divisions);
    let before = lengths[i - 1];
    let span = lengths[i] - before;
    let frac = if span > 0.0 {
        ((target - before) / span).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (i as f32 - 1.0 + frac) / divisions as f32
}

/// Normal for the first ring: perpendicular to the tangent, seeded from the
/// axis the tangent is least aligned with.
fn initial_normal(tangent: Vec3) -> Vec3 {
    let a = tangent.abs();
    let axis = if a.x <= a.y && a.x <= a.z {
        Vec3::X
    } else if a.y <= a.z {
        Vec3::Y
    } else {
        Vec3::Z
    };
    tangent.cross(axis).cross(tangent).normalize_or_zero()
}

/// Sweep a circle of `radius` along `curve`. Ends are left open.
///
/// Produces `(tubular + 1) × (radial + 1)` vertices; the seam column is
/// duplicated so every ring is a closed strip.
pub fn tube(curve: &CatmullRomCurve, tubular: u32, radius: f32, radial: u32) -> Mesh {
    let tubular = tubular.max(1);
    let radial = radial.max(3);
    let samples = curve.sample_uniform(tubular);

    let mut positions = Vec::with_capacity(samples.len() * (radial as usize + 1));
    let mut normals = Vec::with_capacity(positions.capacity());
    let mut normal = Vec3::ZERO;
    for (k, &(center, tangent)) in samples.iter().enumerate() {
        // Project the previous normal onto the new ring plane.
        normal = if k == 0 {
            initial_normal(tangent)
        } else {
            (normal - tangent * normal.dot(tangent))
                .try_normalize()
                .unwrap_or_else(|| initial_normal(tangent))
        };
        let binormal = tangent.cross(normal);
        for j in 0..=radial {
            let v = j as f32 / radial as f32 * std::f32::consts::TAU;
            let (sin, cos) = v.sin_cos();
            let n = (normal * -cos + binormal * sin).normalize_or_zero();
            normals.push(n);
            positions.push(center + n * radius);
        }
    }

    let stride = radial + 1;
    let mut triangles = Vec::with_capacity((tubular * radial * 2) as usize);
    for i in 1..=tubular {
        for j in 1..=radial {
            let a = stride * (i - 1) + (j - 1);
            let b = stride * i + (j - 1);
            let c = stride * i + j;
            let d = stride * (i - 1) + j;
            triangles.push([a, b, d]);
            triangles.push([b, c, d]);
        }
    }

    Mesh {
        positions,
        normals,
        triangles,
    }
}

/// The decorative ribbon: a tube mesh plus its animated rotation.
#[derive(Debug, Clone)]
pub struct Ribbon {
    mesh: Mesh,
    material: Material,
    transform: Transform,
}

impl Ribbon {
    /// Build the tube. Falls back to an empty mesh for fewer than two
    /// control points.
    pub fn new(params: &RibbonParams) -> Self {
        let mesh = match CatmullRomCurve::new(params.control_points.clone()) {
            Some(curve) => tube(
                &curve,
                params.tubular_segments,
                params.radius,
                params.radial_segments,
            ),
            None => {
                tracing::debug!(
                    points = params.control_points.len(),
                    "ribbon needs two control points; skipping tube"
                );
                Mesh::default()
            }
        };
        Self {
            mesh,
            material: params.material,
            transform: Transform::default(),
        }
    }

    pub fn update(&mut self, t: f32) {
        self.transform.rotation.y = t * 0.2;
        self.transform.rotation.z = (t * 0.5).sin() * 0.2;
    }

    #[inline]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    #[inline]
    pub fn material(&self) -> &Material {
        &self.material
    }

    #[inline]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_curve() -> CatmullRomCurve {
        CatmullRomCurve::new(RibbonParams::default().control_points).expect("four points")
    }

    #[test]
    fn passes_through_control_points() {
        let curve = default_curve();
        for (i, p) in curve.points().iter().enumerate() {
            let t = i as f32 / 3.0;
            assert!(curve.point(t).distance(*p) < 1e-4, "point {i}");
        }
    }

    #[test]
    fn needs_two_points() {
        assert!(CatmullRomCurve::new(vec![Vec3::ZERO]).is_none());
        let line = CatmullRomCurve::new(vec![Vec3::ZERO, Vec3::X]).expect("two points");
        assert!(line.point(0.5).distance(Vec3::new(0.5, 0.0, 0.0)) < 1e-5);
    }

    #[test]
    fn length_exceeds_chord() {
        let curve = default_curve();
        let chord: f32 = curve
            .points()
            .windows(2)
            .map(|w| w[0].distance(w[1]))
            .sum();
        assert!(curve.length() >= chord - 1e-3);
    }

    #[test]
    fn uniform_samples_are_evenly_spaced() {
        let curve = default_curve();
        let samples = curve.sample_uniform(64);
        assert_eq!(samples.len(), 65);
        let step = curve.length() / 64.0;
        for w in samples.windows(2) {
            let d = w[0].0.distance(w[1].0);
            assert!((d - step).abs() < step * 0.1, "step {d} vs {step}");
        }
    }

    #[test]
    fn tube_layout() {
        let mesh = tube(&default_curve(), 64, 0.3, 8);
        assert_eq!(mesh.vertex_count(), 65 * 9);
        assert_eq!(mesh.triangle_count(), 64 * 8 * 2);
        assert_eq!(mesh.normals.len(), mesh.vertex_count());
    }

    #[test]
    fn tube_vertices_sit_on_radius() {
        let curve = default_curve();
        let samples = curve.sample_uniform(16);
        let mesh = tube(&curve, 16, 0.3, 8);
        for (i, (center, tangent)) in samples.iter().enumerate() {
            for j in 0..9 {
                let v = mesh.positions[i * 9 + j];
                let offset = v - *center;
                assert!((offset.length() - 0.3).abs() < 1e-4);
                assert!(offset.dot(*tangent).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn ribbon_rotation() {
        let mut ribbon = Ribbon::new(&RibbonParams::default());
        ribbon.update(1.0);
        let rot = ribbon.transform().rotation;
        assert!((rot.y - 0.2).abs() < 1e-6);
        assert!((rot.z - (0.5f32).sin() * 0.2).abs() < 1e-6);
        assert_eq!(rot.x, 0.0);
    }
}
