#![forbid(unsafe_code)]

//! Core: geometry, host events, clocks, frame scheduling and seeded noise.
//!
//! Everything in this crate is single-threaded and host-driven. The host
//! pushes events, owns the clock, and dispatches frames through a
//! [`frame::FrameQueue`]; components never spin their own loops.

pub mod clock;
pub mod event;
pub mod frame;
pub mod geometry;
pub mod noise;
