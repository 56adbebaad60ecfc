#![forbid(unsafe_code)]

//! View model for the card that hosts a [`DitherReveal`].
//!
//! The page owns no state of its own: it is rebuilt from the component after
//! every change and tells the host what to show (labels, enabled states,
//! progress readout). [`draw_progress_bar`] renders the bar into a raster.

use ofx_core::geometry::Rect;
use ofx_render::{PackedRgba, Raster};

use super::DitherReveal;

pub const TITLE: &str = "Prototype";
pub const INDEX_LABEL: &str = "02";
pub const HEADING: &str = "Test ideas. Validate impact.";
pub const TAGLINE: &str = "Experimentation. Proof of value.";
pub const BODY: &str = "Turn insight to action. By starting small and proving value early, \
we build confidence feedback and lay the groundwork for scalable deployment.";

pub const PLAY_LABEL: &str = "Play Animation";
pub const PLAY_BUSY_LABEL: &str = "Animating...";
pub const RESET_LABEL: &str = "Reset";

/// Track color of the progress bar.
pub const BAR_TRACK: PackedRgba = PackedRgba::hex(0xe5e7eb);
/// Fill color of the progress bar.
pub const BAR_FILL: PackedRgba = PackedRgba::BLACK;

/// A button as the page presents it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonState {
    pub label: &'static str,
    pub enabled: bool,
}

/// Snapshot of everything the page shows besides the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct DitherPage {
    pub play: ButtonState,
    pub reset: ButtonState,
    pub progress: f32,
    pub progress_label: String,
}

impl DitherPage {
    /// Build the page for the component's current state.
    pub fn from_reveal(reveal: &DitherReveal) -> Self {
        Self::new(reveal.progress(), reveal.is_animating())
    }

    pub fn new(progress: f32, animating: bool) -> Self {
        let progress = progress.clamp(0.0, 1.0);
        Self {
            play: play_button(animating),
            reset: ButtonState {
                label: RESET_LABEL,
                enabled: true,
            },
            progress,
            progress_label: progress_label(progress),
        }
    }

    /// Filled width of a progress bar `track_width` pixels wide.
    #[inline]
    pub fn bar_fill(&self, track_width: u32) -> u32 {
        progress_fill(self.progress, track_width)
    }
}

/// The play button is disabled and relabelled while a run is in progress.
pub fn play_button(animating: bool) -> ButtonState {
    if animating {
        ButtonState {
            label: PLAY_BUSY_LABEL,
            enabled: false,
        }
    } else {
        ButtonState {
            label: PLAY_LABEL,
            enabled: true,
        }
    }
}

/// Whole-percent readout, e.g. `"42%"`.
pub fn progress_label(progress: f32) -> String {
    format!("{}%", (progress.clamp(0.0, 1.0) * 100.0).round() as u32)
}

/// `round(track_width * progress)`, never wider than the track.
#[inline]
pub fn progress_fill(progress: f32, track_width: u32) -> u32 {
    ((track_width as f32 * progress.clamp(0.0, 1.0)).round() as u32).min(track_width)
}

/// Draw the track and the filled part of a progress bar.
pub fn draw_progress_bar(raster: &mut Raster, area: Rect, progress: f32) {
    if area.is_empty() {
        return;
    }
    raster.fill_area(area, BAR_TRACK);
    let filled = progress_fill(progress, u32::from(area.width));
    if filled > 0 {
        raster.fill_rect(
            i32::from(area.x),
            i32::from(area.y),
            filled,
            u32::from(area.height),
            BAR_FILL,
        );
    }
}
