#![forbid(unsafe_code)]

//! Visual effect components built on `ofx-core` and `ofx-render`.
//!
//! # Components
//!
//! | Module | Component | Description |
//! |--------|-----------|-------------|
//! | [`dither`] | [`DitherReveal`] | Text dissolving through a noisy block threshold |
//! | [`fluid`] | [`FluidInterface`] | Animated 3D scene (wave, particles, ribbon) with a HUD |
//!
//! # How it fits in the system
//! Components never run their own loops. The host owns a
//! [`FrameQueue`](ofx_core::frame::FrameQueue) and a
//! [`Clock`](ofx_core::clock::Clock), forwards input as
//! [`Event`](ofx_core::event::Event)s, and calls
//! [`FrameQueue::run_frame`](ofx_core::frame::FrameQueue::run_frame) once per
//! display refresh with every component as a
//! [`FrameClient`](ofx_core::frame::FrameClient).
//!
//! Randomness is injected through [`NoiseSource`](ofx_core::noise::NoiseSource)
//! so tests can seed it; by default components seed from the wall clock.

pub mod dither;
pub mod fluid;

pub use dither::{DitherParams, DitherPhase, DitherReveal};
pub use fluid::{FluidError, FluidInterface, FluidParams};
