#![forbid(unsafe_code)]

//! Surface color.
//!
//! Every [`Raster`](crate::Raster) pixel is one [`PackedRgba`]. Effects clear
//! their surface to an opaque background, so translucent writes (particles,
//! HUD panels) always land on opaque pixels; `over` still handles a
//! translucent destination for completeness.

/// `0xRRGGBBAA`, alpha not premultiplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct PackedRgba(pub u32);

impl PackedRgba {
    pub const TRANSPARENT: Self = Self(0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(u32::from_be_bytes([r, g, b, a]))
    }

    /// Opaque color from a `0xRRGGBB` literal, as written in style sheets.
    #[inline]
    pub const fn hex(rgb: u32) -> Self {
        Self((rgb << 8) | 0xFF)
    }

    #[inline]
    pub const fn r(self) -> u8 {
        self.0.to_be_bytes()[0]
    }

    #[inline]
    pub const fn g(self) -> u8 {
        self.0.to_be_bytes()[1]
    }

    #[inline]
    pub const fn b(self) -> u8 {
        self.0.to_be_bytes()[2]
    }

    #[inline]
    pub const fn a(self) -> u8 {
        self.0.to_be_bytes()[3]
    }

    /// Composite `self` on top of `dst`.
    ///
    /// Opaque sources replace the destination and fully transparent sources
    /// leave it untouched.
    #[inline]
    pub fn over(self, dst: Self) -> Self {
        match self.a() {
            255 => return self,
            0 => return dst,
            _ => {}
        }
        let src_a = f32::from(self.a()) / 255.0;
        let dst_a = f32::from(dst.a()) / 255.0 * (1.0 - src_a);
        let out_a = src_a + dst_a;
        let blend = |s: u8, d: u8| {
            ((f32::from(s) * src_a + f32::from(d) * dst_a) / out_a)
                .round()
                .min(255.0) as u8
        };
        Self::rgba(
            blend(self.r(), dst.r()),
            blend(self.g(), dst.g()),
            blend(self.b(), dst.b()),
            (out_a * 255.0).round().min(255.0) as u8,
        )
    }

    /// Apply uniform opacity in `[0.0, 1.0]` by scaling alpha.
    #[inline]
    pub fn with_opacity(self, opacity: f32) -> Self {
        let opacity = opacity.clamp(0.0, 1.0);
        let a = ((self.a() as f32) * opacity).round().clamp(0.0, 255.0) as u8;
        Self::rgba(self.r(), self.g(), self.b(), a)
    }

    /// Multiply RGB by a light factor (alpha preserved, channels saturate).
    #[inline]
    pub fn shade(self, light: f32) -> Self {
        let light = light.max(0.0);
        let scale = |c: u8| (c as f32 * light).round().min(255.0) as u8;
        Self::rgba(scale(self.r()), scale(self.g()), scale(self.b()), self.a())
    }

    /// Linear interpolation between two colors (all four channels).
    #[inline]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self::rgba(
            mix(self.r(), other.r()),
            mix(self.g(), other.g()),
            mix(self.b(), other.b()),
            mix(self.a(), other.a()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_round_trip() {
        let c = PackedRgba::rgba(1, 2, 3, 4);
        assert_eq!((c.r(), c.g(), c.b(), c.a()), (1, 2, 3, 4));
    }

    #[test]
    fn hex_matches_rgb() {
        assert_eq!(PackedRgba::hex(0xe8e4dd), PackedRgba::rgb(0xe8, 0xe4, 0xdd));
        assert_eq!(PackedRgba::hex(0xffffff), PackedRgba::WHITE);
    }

    #[test]
    fn over_opaque_and_transparent_shortcuts() {
        let src = PackedRgba::rgb(10, 20, 30);
        assert_eq!(src.over(PackedRgba::WHITE), src);
        assert_eq!(PackedRgba::TRANSPARENT.over(src), src);
    }

    #[test]
    fn over_translucent_on_translucent() {
        let src = PackedRgba::rgba(255, 0, 0, 128);
        let dst = PackedRgba::rgba(0, 0, 255, 128);
        let out = src.over(dst);
        assert_eq!(out.a(), 192);
        assert!(out.r() > out.b());
    }

    #[test]
    fn over_half_alpha_on_black() {
        let src = PackedRgba::rgba(255, 255, 255, 128);
        let out = src.over(PackedRgba::BLACK);
        assert_eq!(out.a(), 255);
        assert!((127..=129).contains(&out.r()));
    }

    #[test]
    fn with_opacity_scales_alpha() {
        assert_eq!(PackedRgba::WHITE.with_opacity(0.0).a(), 0);
        assert_eq!(PackedRgba::WHITE.with_opacity(0.6).a(), 153);
        assert_eq!(PackedRgba::WHITE.with_opacity(2.0).a(), 255);
    }

    #[test]
    fn shade_saturates() {
        let c = PackedRgba::rgb(200, 100, 0).shade(2.0);
        assert_eq!((c.r(), c.g(), c.b()), (255, 200, 0));
        assert_eq!(PackedRgba::WHITE.shade(-1.0), PackedRgba::BLACK);
    }

    #[test]
    fn lerp_endpoints() {
        let a = PackedRgba::BLACK;
        let b = PackedRgba::WHITE;
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
    }
}
