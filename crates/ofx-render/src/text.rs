#![forbid(unsafe_code)]

//! Scaled monospace text on a [`Raster`].
//!
//! Glyphs come from the `embedded-graphics` ASCII mono fonts. A nominal pixel
//! size picks the face whose integer multiple lands closest to that size, and
//! every lit font pixel is expanded to a `scale`×`scale` square through
//! [`ScaledTarget`], an embedded-graphics [`DrawTarget`] over the raster.
//!
//! Placement follows canvas conventions: the anchor point is interpreted
//! through [`TextAlign`] horizontally and [`TextBaseline`] vertically.
//! Characters outside printable ASCII render as the font's replacement glyph.

use std::convert::Infallible;

use embedded_graphics::mono_font::ascii::{
    FONT_6X13, FONT_6X13_BOLD, FONT_9X15, FONT_9X15_BOLD, FONT_9X18, FONT_9X18_BOLD,
};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};

use crate::color::PackedRgba;
use crate::raster::Raster;

/// Regular and bold variants sharing one cell size, smallest first.
const FACES: [(&MonoFont<'static>, &MonoFont<'static>); 3] = [
    (&FONT_6X13, &FONT_6X13_BOLD),
    (&FONT_9X15, &FONT_9X15_BOLD),
    (&FONT_9X18, &FONT_9X18_BOLD),
];

/// Horizontal placement relative to the anchor x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical placement relative to the anchor y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    /// Anchor is the top of the text box.
    #[default]
    Top,
    /// Anchor is the vertical middle of the text box.
    Middle,
    /// Anchor is the bottom of the text box.
    Bottom,
}

/// Font size and placement options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Nominal font size in pixels.
    pub size_px: f32,
    /// Use the bold face.
    pub bold: bool,
    pub align: TextAlign,
    pub baseline: TextBaseline,
}

impl TextStyle {
    pub const fn new(size_px: f32) -> Self {
        Self {
            size_px,
            bold: false,
            align: TextAlign::Left,
            baseline: TextBaseline::Top,
        }
    }

    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    #[must_use]
    pub const fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    #[must_use]
    pub const fn baseline(mut self, baseline: TextBaseline) -> Self {
        self.baseline = baseline;
        self
    }

    /// Font face and integer scale for this size.
    ///
    /// Ties go to the smaller face. Non-finite or tiny sizes fall back to
    /// the smallest face at scale 1.
    pub fn face(&self) -> (&'static MonoFont<'static>, u32) {
        let size = if self.size_px.is_finite() {
            self.size_px.max(1.0)
        } else {
            1.0
        };
        let mut best = (FACES[0], 1u32, f32::INFINITY);
        for face in FACES {
            let cell = face.0.character_size.height as f32;
            let scale = (size / cell).round().clamp(1.0, u16::MAX as f32);
            let err = (scale * cell - size).abs();
            if err < best.2 {
                best = (face, scale as u32, err);
            }
        }
        let ((regular, bold), scale, _) = best;
        (if self.bold { bold } else { regular }, scale)
    }

    /// Raster pixels per font pixel.
    #[inline]
    pub fn scale(&self) -> u32 {
        self.face().1
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(12.0)
    }
}

/// embedded-graphics target that draws each font pixel as a filled square.
///
/// Font coordinates are relative to `origin`; only [`BinaryColor::On`]
/// pixels are painted, so the raster shows through the glyph background.
pub struct ScaledTarget<'a> {
    raster: &'a mut Raster,
    origin: (i32, i32),
    scale: u32,
    color: PackedRgba,
}

impl<'a> ScaledTarget<'a> {
    pub fn new(raster: &'a mut Raster, origin: (i32, i32), scale: u32, color: PackedRgba) -> Self {
        Self {
            raster,
            origin,
            scale: scale.max(1),
            color,
        }
    }
}

impl OriginDimensions for ScaledTarget<'_> {
    fn size(&self) -> Size {
        let (w, h) = self.raster.size();
        Size::new(w.div_ceil(self.scale), h.div_ceil(self.scale))
    }
}

impl DrawTarget for ScaledTarget<'_> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let step = self.scale as i32;
        for Pixel(point, color) in pixels {
            if color.is_on() {
                self.raster.fill_rect(
                    self.origin.0.saturating_add(point.x.saturating_mul(step)),
                    self.origin.1.saturating_add(point.y.saturating_mul(step)),
                    self.scale,
                    self.scale,
                    self.color,
                );
            }
        }
        Ok(())
    }
}

/// Size of the text box of `text` in pixels.
pub fn measure(text: &str, style: &TextStyle) -> (u32, u32) {
    let count = text.chars().count() as u32;
    if count == 0 {
        return (0, 0);
    }
    let (font, scale) = style.face();
    let cell = font.character_size;
    let units = count
        .saturating_mul(cell.width + font.character_spacing)
        .saturating_sub(font.character_spacing);
    (units.saturating_mul(scale), cell.height.saturating_mul(scale))
}

/// Draw `text` anchored at (x, y). Pixels outside the raster are clipped.
pub fn fill_text(
    raster: &mut Raster,
    text: &str,
    x: f32,
    y: f32,
    style: &TextStyle,
    color: PackedRgba,
) {
    let (width, height) = measure(text, style);
    if width == 0 {
        return;
    }

    let left = match style.align {
        TextAlign::Left => x,
        TextAlign::Center => x - width as f32 / 2.0,
        TextAlign::Right => x - width as f32,
    }
    .round() as i32;
    let top = match style.baseline {
        TextBaseline::Top => y,
        TextBaseline::Middle => y - height as f32 / 2.0,
        TextBaseline::Bottom => y - height as f32,
    }
    .round() as i32;

    let (font, scale) = style.face();
    let mut target = ScaledTarget::new(raster, (left, top), scale, color);
    let glyphs = MonoTextStyle::new(font, BinaryColor::On);
    let Ok(_) = Text::with_baseline(text, Point::zero(), glyphs, Baseline::Top).draw(&mut target);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(raster: &Raster) -> usize {
        raster
            .pixels()
            .iter()
            .filter(|p| **p == PackedRgba::WHITE)
            .count()
    }

    #[test]
    fn face_tracks_size() {
        let (font, scale) = TextStyle::new(120.0).bold().face();
        assert_eq!(font.character_size, Size::new(9, 15));
        assert_eq!(scale, 8);
        assert_eq!(TextStyle::new(12.0).face().0.character_size.height, 13);
        assert_eq!(TextStyle::new(20.0).face().0.character_size.height, 18);
        assert_eq!(TextStyle::new(1.0).scale(), 1);
        assert_eq!(TextStyle::new(f32::NAN).scale(), 1);
    }

    #[test]
    fn measure_empty_is_zero() {
        assert_eq!(measure("", &TextStyle::new(12.0)), (0, 0));
    }

    #[test]
    fn measure_counts_cells() {
        let style = TextStyle::new(13.0);
        assert_eq!(style.scale(), 1);
        assert_eq!(measure("AB", &style), (12, 13));
        assert_eq!(measure("PROTOTYPE", &TextStyle::new(120.0).bold()), (648, 120));
    }

    #[test]
    fn huge_size_saturates() {
        let (w, h) = measure("PROTOTYPE", &TextStyle::new(f32::MAX));
        assert!(w > 0 && h > 0);
    }

    #[test]
    fn space_draws_nothing() {
        let mut r = Raster::new(64, 16);
        fill_text(&mut r, "   ", 0.0, 0.0, &TextStyle::new(12.0), PackedRgba::WHITE);
        assert_eq!(lit(&r), 0);
    }

    #[test]
    fn scaled_pixels_are_square_blocks() {
        let style = TextStyle::new(26.0);
        assert_eq!(style.scale(), 2);
        let mut r = Raster::new(40, 40);
        fill_text(&mut r, "I", 0.0, 0.0, &style, PackedRgba::WHITE);
        assert!(lit(&r) > 0);
        assert_eq!(lit(&r) % 4, 0);
    }

    #[test]
    fn centered_text_is_centered() {
        let style = TextStyle::new(120.0)
            .bold()
            .align(TextAlign::Center)
            .baseline(TextBaseline::Middle);
        let mut r = Raster::new(1000, 400);
        fill_text(&mut r, "PROTOTYPE", 500.0, 200.0, &style, PackedRgba::WHITE);

        let (w, h) = measure("PROTOTYPE", &style);
        let left = (500.0 - w as f32 / 2.0).round() as u32;
        let top = (200.0 - h as f32 / 2.0).round() as u32;
        for y in 0..400 {
            for x in 0..1000 {
                if r.get_pixel(x, y) == PackedRgba::WHITE {
                    assert!(x >= left && x < left + w, "x={x}");
                    assert!(y >= top && y < top + h, "y={y}");
                }
            }
        }
        assert!(lit(&r) > 10_000);
    }

    #[test]
    fn bold_adds_ink() {
        let mut plain = Raster::new(200, 40);
        let mut bold = Raster::new(200, 40);
        let style = TextStyle::new(15.0);
        fill_text(&mut plain, "HOME", 0.0, 0.0, &style, PackedRgba::WHITE);
        fill_text(&mut bold, "HOME", 0.0, 0.0, &style.bold(), PackedRgba::WHITE);
        assert!(lit(&bold) > lit(&plain));
    }

    #[test]
    fn clipped_text_does_not_panic() {
        let mut r = Raster::new(10, 10);
        fill_text(&mut r, "WIDE TEXT", -50.0, -3.0, &TextStyle::new(40.0), PackedRgba::WHITE);
    }
}
