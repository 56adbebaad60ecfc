#![forbid(unsafe_code)]

//! Dither reveal: text dissolving through a noisy block threshold.
//!
//! Every redraw paints the target text onto a solid background, reads the
//! bitmap back, and replaces each `block_size`×`block_size` block with either
//! the revealed or the hidden color:
//!
//! ```text
//! threshold = max_intensity * (1 - progress)
//! revealed  = sample > threshold - noise      noise ∈ [0, noise_amplitude)
//! ```
//!
//! `sample` is the red channel of the block's top-left pixel. Noise is drawn
//! per block per redraw, so two renders at the same progress differ unless
//! the noise source is re-seeded.
//!
//! # Animation
//!
//! [`DitherReveal::start`] records a start timestamp and requests one frame
//! from the [`FrameQueue`]. Each delivered frame sets
//! `progress = min(elapsed / duration, 1)` and requests the next frame only
//! while progress is below 1. [`DitherReveal::reset`] cancels the pending
//! request, so a tick already dispatched for it is never delivered.
//!
//! # Usage
//!
//! ```ignore
//! let frames = FrameQueue::new();
//! let mut reveal = DitherReveal::new(&frames);
//! reveal.attach_surface(Raster::new(1000, 400));
//! reveal.start(clock.now());
//!
//! // host loop, once per display refresh:
//! frames.run_frame(clock.now(), &mut [&mut reveal]);
//! ```

pub mod page;

use std::time::Duration;

use ofx_core::frame::{FrameClient, FrameQueue, FrameRequest, FrameTick};
use ofx_core::noise::{NoiseSource, XorShift32};
use ofx_render::text::{TextAlign, TextBaseline, TextStyle, fill_text};
use ofx_render::{PackedRgba, Raster};

pub use page::DitherPage;

/// Tuning parameters for [`DitherReveal`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DitherParams {
    /// Text to reveal.
    pub text: String,
    /// Nominal font size in pixels.
    pub font_size_px: f32,
    pub bold: bool,
    /// Edge length of a dither block in pixels.
    pub block_size: u32,
    /// Intensity that maps to "fully hidden" at progress 0.
    pub max_intensity: f32,
    /// Upper bound (exclusive) of the per-block threshold jitter.
    pub noise_amplitude: f32,
    /// Time for progress to go from 0 to 1.
    pub duration: Duration,
    pub background: PackedRgba,
    pub text_color: PackedRgba,
    pub revealed_color: PackedRgba,
    pub hidden_color: PackedRgba,
    /// Default surface size used by [`DitherReveal::attach_default_surface`].
    pub surface_width: u32,
    pub surface_height: u32,
}

impl Default for DitherParams {
    fn default() -> Self {
        Self {
            text: "PROTOTYPE".to_string(),
            font_size_px: 120.0,
            bold: true,
            block_size: 4,
            max_intensity: 255.0,
            noise_amplitude: 50.0,
            duration: Duration::from_millis(3000),
            background: PackedRgba::BLACK,
            text_color: PackedRgba::WHITE,
            revealed_color: PackedRgba::WHITE,
            hidden_color: PackedRgba::BLACK,
            surface_width: 1000,
            surface_height: 400,
        }
    }
}

impl DitherParams {
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    #[must_use]
    pub fn with_block_size(mut self, block_size: u32) -> Self {
        self.block_size = block_size.max(1);
        self
    }

    #[must_use]
    pub fn with_noise_amplitude(mut self, amplitude: f32) -> Self {
        self.noise_amplitude = amplitude.max(0.0);
        self
    }

    fn text_style(&self) -> TextStyle {
        let style = TextStyle::new(self.font_size_px)
            .align(TextAlign::Center)
            .baseline(TextBaseline::Middle);
        if self.bold { style.bold() } else { style }
    }
}

/// Brightness cutoff for a progress value (clamped to `[0, 1]`).
#[inline]
pub fn threshold(progress: f32, max_intensity: f32) -> f32 {
    max_intensity * (1.0 - progress.clamp(0.0, 1.0))
}

/// Block visibility rule.
#[inline]
pub fn block_revealed(sample: u8, threshold: f32, noise: f32) -> bool {
    sample as f32 > threshold - noise
}

/// Normalized progress after `elapsed`, clamped at 1.
///
/// A zero duration completes immediately.
#[inline]
pub fn progress_at(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / duration.as_secs_f64()).min(1.0) as f32
}

/// Animation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DitherPhase {
    #[default]
    Idle,
    Animating,
}

/// Block counts from the most recent redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DitherStats {
    pub blocks: usize,
    pub revealed: usize,
}

/// The dither reveal component.
pub struct DitherReveal {
    params: DitherParams,
    noise: Box<dyn NoiseSource>,
    surface: Option<Raster>,
    frames: FrameQueue,
    pending: Option<FrameRequest>,
    phase: DitherPhase,
    progress: f32,
    started_at: Duration,
    stats: DitherStats,
}

impl DitherReveal {
    /// Create an idle component with default parameters and entropy-seeded noise.
    pub fn new(frames: &FrameQueue) -> Self {
        Self::with_params(frames, DitherParams::default())
    }

    /// Create an idle component with explicit parameters.
    pub fn with_params(frames: &FrameQueue, params: DitherParams) -> Self {
        Self {
            params,
            noise: Box::new(XorShift32::from_entropy()),
            surface: None,
            frames: frames.clone(),
            pending: None,
            phase: DitherPhase::Idle,
            progress: 0.0,
            started_at: Duration::ZERO,
            stats: DitherStats::default(),
        }
    }

    /// Replace the noise source.
    #[must_use]
    pub fn with_noise(mut self, noise: impl NoiseSource + 'static) -> Self {
        self.noise = Box::new(noise);
        self
    }

    /// Shorthand for a seeded [`XorShift32`] noise source.
    #[must_use]
    pub fn with_seed(self, seed: u32) -> Self {
        self.with_noise(XorShift32::new(seed))
    }

    #[inline]
    pub fn params(&self) -> &DitherParams {
        &self.params
    }

    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    #[inline]
    pub fn phase(&self) -> DitherPhase {
        self.phase
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.phase == DitherPhase::Animating
    }

    /// Returns true while a frame request is outstanding.
    #[inline]
    pub fn has_pending_frame(&self) -> bool {
        self.pending.as_ref().is_some_and(FrameRequest::is_pending)
    }

    #[inline]
    pub fn stats(&self) -> DitherStats {
        self.stats
    }

    #[inline]
    pub fn surface(&self) -> Option<&Raster> {
        self.surface.as_ref()
    }

    /// Attach the drawing surface and draw the current progress.
    pub fn attach_surface(&mut self, surface: Raster) {
        tracing::debug!(
            width = surface.width(),
            height = surface.height(),
            "dither surface attached"
        );
        self.surface = Some(surface);
        self.redraw();
    }

    /// Attach a surface of the configured default size.
    pub fn attach_default_surface(&mut self) {
        let surface = Raster::new(self.params.surface_width, self.params.surface_height);
        self.attach_surface(surface);
    }

    /// Detach and return the drawing surface.
    pub fn detach_surface(&mut self) -> Option<Raster> {
        self.surface.take()
    }

    /// Set progress (clamped to `[0, 1]`) and redraw.
    pub fn set_progress(&mut self, progress: f32) {
        self.progress = progress.clamp(0.0, 1.0);
        self.redraw();
    }

    /// Begin an animation run at host time `now`.
    ///
    /// Ignored while already animating. Returns true if a run started.
    pub fn start(&mut self, now: Duration) -> bool {
        if self.is_animating() {
            tracing::trace!("dither start ignored while animating");
            return false;
        }
        self.phase = DitherPhase::Animating;
        self.started_at = now;
        self.set_progress(0.0);
        self.pending = Some(self.frames.request());
        tracing::debug!(
            started_at_ms = now.as_millis() as u64,
            duration_ms = self.params.duration.as_millis() as u64,
            "dither animation started"
        );
        true
    }

    /// Cancel any pending frame, return to idle at progress 0 and redraw.
    pub fn reset(&mut self) {
        if let Some(request) = self.pending.take() {
            request.cancel();
        }
        self.phase = DitherPhase::Idle;
        self.set_progress(0.0);
        tracing::debug!("dither animation reset");
    }

    /// Redraw the surface at the current progress. No-op without a surface.
    pub fn redraw(&mut self) {
        let Self {
            params,
            noise,
            surface,
            progress,
            stats,
            ..
        } = self;
        let Some(surface) = surface.as_mut() else {
            tracing::trace!("dither redraw skipped: no surface");
            return;
        };
        *stats = render_dither(surface, params, *progress, noise.as_mut());
        tracing::trace!(
            progress = *progress,
            revealed = stats.revealed,
            blocks = stats.blocks,
            "dither redraw"
        );
    }
}

impl FrameClient for DitherReveal {
    fn on_frame(&mut self, tick: FrameTick) {
        if !self.pending.as_ref().is_some_and(|req| req.owns(&tick)) {
            return;
        }
        self.pending = None;

        let elapsed = tick.now.saturating_sub(self.started_at);
        let progress = progress_at(elapsed, self.params.duration).max(self.progress);
        self.set_progress(progress);

        if progress < 1.0 {
            self.pending = Some(self.frames.request());
        } else {
            self.phase = DitherPhase::Idle;
            tracing::debug!(frame = tick.frame, "dither animation complete");
        }
    }
}

impl std::fmt::Debug for DitherReveal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DitherReveal")
            .field("phase", &self.phase)
            .field("progress", &self.progress)
            .field("has_surface", &self.surface.is_some())
            .field("pending", &self.pending)
            .finish()
    }
}

/// Draw text and apply the block threshold in place.
///
/// Blocks are visited row-major; partial blocks at the right and bottom edges
/// are clipped to the surface.
pub fn render_dither(
    surface: &mut Raster,
    params: &DitherParams,
    progress: f32,
    noise: &mut dyn NoiseSource,
) -> DitherStats {
    let (width, height) = surface.size();
    surface.clear(params.background);
    fill_text(
        surface,
        &params.text,
        width as f32 / 2.0,
        height as f32 / 2.0,
        &params.text_style(),
        params.text_color,
    );

    let block = params.block_size.max(1);
    let cutoff = threshold(progress, params.max_intensity);
    let mut stats = DitherStats::default();

    // Blocks never overlap, so each block's origin pixel is still the text
    // render when it is sampled.
    for y in (0..height).step_by(block as usize) {
        for x in (0..width).step_by(block as usize) {
            let sample = surface.get_pixel(x, y).r();
            let jitter = noise.next_range(0.0, params.noise_amplitude);
            let shown = block_revealed(sample, cutoff, jitter);
            let color = if shown {
                params.revealed_color
            } else {
                params.hidden_color
            };
            surface.fill_rect(x as i32, y as i32, block, block, color);
            stats.blocks += 1;
            stats.revealed += shown as usize;
        }
    }
    stats
}
