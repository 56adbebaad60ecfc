#![forbid(unsafe_code)]

//! RGBA raster surface with optional depth buffer.
//!
//! A [`Raster`] is the drawing surface handed to components by the host. 2D
//! effects use it as a plain bitmap (draw, read back, redraw); 3D scenes
//! allocate it with a depth buffer and rasterize projected triangles into it.
//!
//! All drawing is clipped to the surface: out-of-range coordinates are
//! silently ignored and zero-sized surfaces never panic.

use ofx_core::geometry::Rect;

use crate::color::PackedRgba;

/// A projected vertex in surface space.
///
/// `depth` is any monotonic depth value (smaller = nearer); the 3D pipeline
/// passes normalized device depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenVertex {
    pub x: f32,
    pub y: f32,
    pub depth: f32,
}

impl ScreenVertex {
    #[inline]
    pub const fn new(x: f32, y: f32, depth: f32) -> Self {
        Self { x, y, depth }
    }
}

/// Row-major RGBA surface.
#[derive(Debug, Clone)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<PackedRgba>,
    /// Per-pixel depth (larger = farther). `None` for 2D surfaces.
    depth: Option<Vec<f32>>,
}

impl Raster {
    /// Create a 2D surface cleared to black.
    pub fn new(width: u32, height: u32) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: vec![PackedRgba::BLACK; size],
            depth: None,
        }
    }

    /// Create a surface with a depth buffer.
    pub fn with_depth(width: u32, height: u32) -> Self {
        let size = width as usize * height as usize;
        Self {
            depth: Some(vec![f32::MAX; size]),
            ..Self::new(width, height)
        }
    }

    #[inline]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` in pixels.
    #[inline]
    pub const fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn has_depth(&self) -> bool {
        self.depth.is_some()
    }

    /// Row-major pixel slice.
    #[inline]
    pub fn pixels(&self) -> &[PackedRgba] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [PackedRgba] {
        &mut self.pixels
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    /// Fill every pixel with `color` and reset the depth buffer.
    pub fn clear(&mut self, color: PackedRgba) {
        self.pixels.fill(color);
        if let Some(depth) = &mut self.depth {
            depth.fill(f32::MAX);
        }
    }

    /// Resize the surface, clearing contents to black.
    pub fn resize(&mut self, width: u32, height: u32) {
        let size = width as usize * height as usize;
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(size, PackedRgba::BLACK);
        if let Some(depth) = &mut self.depth {
            depth.clear();
            depth.resize(size, f32::MAX);
        }
    }

    /// Get a pixel at (x, y). Out-of-bounds reads return black.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> PackedRgba {
        self.index(x, y)
            .map_or(PackedRgba::BLACK, |idx| self.pixels[idx])
    }

    /// Set a pixel at (x, y) unconditionally.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: PackedRgba) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx] = color;
        }
    }

    /// Composite `color` over the pixel at (x, y).
    #[inline]
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: PackedRgba) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx] = color.over(self.pixels[idx]);
        }
    }

    /// Depth-tested write. Returns true if the pixel was written.
    ///
    /// Surfaces without a depth buffer always write.
    #[inline]
    pub fn set_pixel_depth(&mut self, x: u32, y: u32, z: f32, color: PackedRgba) -> bool {
        let Some(idx) = self.index(x, y) else {
            return false;
        };
        match &mut self.depth {
            Some(depth) if z >= depth[idx] => false,
            Some(depth) => {
                depth[idx] = z;
                self.pixels[idx] = color;
                true
            }
            None => {
                self.pixels[idx] = color;
                true
            }
        }
    }

    /// Depth-tested blend that does not write depth (for translucent points).
    #[inline]
    pub fn blend_pixel_depth(&mut self, x: u32, y: u32, z: f32, color: PackedRgba) -> bool {
        let Some(idx) = self.index(x, y) else {
            return false;
        };
        if let Some(depth) = &self.depth
            && z >= depth[idx]
        {
            return false;
        }
        self.pixels[idx] = color.over(self.pixels[idx]);
        true
    }

    /// Fill a rectangle given in signed coordinates, clipped to the surface.
    ///
    /// Opaque colors overwrite; translucent colors are composited.
    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: PackedRgba) {
        let x0 = x.max(0) as i64;
        let y0 = y.max(0) as i64;
        let x1 = (x as i64 + width as i64).min(self.width as i64);
        let y1 = (y as i64 + height as i64).min(self.height as i64);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let stride = self.width as usize;
        let opaque = color.a() == 255;
        for row in y0 as usize..y1 as usize {
            let start = row * stride + x0 as usize;
            let end = row * stride + x1 as usize;
            let span = &mut self.pixels[start..end];
            if opaque {
                span.fill(color);
            } else {
                for px in span {
                    *px = color.over(*px);
                }
            }
        }
    }

    /// Fill a layout rectangle.
    #[inline]
    pub fn fill_area(&mut self, area: Rect, color: PackedRgba) {
        self.fill_rect(
            area.x as i32,
            area.y as i32,
            area.width as u32,
            area.height as u32,
            color,
        );
    }

    /// Rasterize a flat-colored triangle with depth testing.
    ///
    /// Uses edge functions over the clipped bounding box and sample points at
    /// pixel centers. Winding is irrelevant; degenerate triangles are skipped.
    /// Returns the number of pixels written.
    pub fn fill_triangle(&mut self, v: [ScreenVertex; 3], color: PackedRgba) -> u32 {
        if self.is_empty() {
            return 0;
        }
        let [s0, s1, s2] = v;

        let min_x = s0.x.min(s1.x).min(s2.x).floor().max(0.0);
        let max_x = s0.x.max(s1.x).max(s2.x).ceil().min(self.width as f32 - 1.0);
        let min_y = s0.y.min(s1.y).min(s2.y).floor().max(0.0);
        let max_y = s0.y.max(s1.y).max(s2.y).ceil().min(self.height as f32 - 1.0);
        if !(min_x <= max_x && min_y <= max_y) {
            return 0;
        }

        let area = edge_function(s0, s1, s2.x, s2.y);
        if area.abs() < 1e-6 {
            return 0;
        }
        let inv_area = 1.0 / area;

        #[cfg(feature = "tracing")]
        let _span = tracing::trace_span!("fill_triangle", area).entered();

        let mut written = 0;
        for py in min_y as u32..=max_y as u32 {
            let fy = py as f32 + 0.5;
            for px in min_x as u32..=max_x as u32 {
                let fx = px as f32 + 0.5;
                let w0 = edge_function(s1, s2, fx, fy) * inv_area;
                let w1 = edge_function(s2, s0, fx, fy) * inv_area;
                let w2 = 1.0 - w0 - w1;
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }
                let z = w0 * s0.depth + w1 * s1.depth + w2 * s2.depth;
                if self.set_pixel_depth(px, py, z, color) {
                    written += 1;
                }
            }
        }
        written
    }
}

/// Twice the signed area of triangle (a, b, p).
#[inline]
fn edge_function(a: ScreenVertex, b: ScreenVertex, px: f32, py: f32) -> f32 {
    (b.x - a.x) * (py - a.y) - (b.y - a.y) * (px - a.x)
}
