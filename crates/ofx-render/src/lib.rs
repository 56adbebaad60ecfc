#![forbid(unsafe_code)]

//! Render: packed colors, raster surfaces, scaled mono-font text.
//!
//! This crate is the software drawing kernel shared by every effect. It has
//! no notion of scenes or animation; effects own that and draw through the
//! primitives here.

pub mod color;
pub mod raster;
pub mod text;

pub use color::PackedRgba;
pub use raster::{Raster, ScreenVertex};
