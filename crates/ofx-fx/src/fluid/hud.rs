#![forbid(unsafe_code)]

//! Fixed overlay drawn over the 3D frame: title badge, mode buttons, status
//! panel and footer.
//!
//! Layout is recomputed from the container size; all rectangles are in
//! container-local pixels. The overlay has a single piece of state, the
//! active mode, which only changes how the buttons and status panel look.

use ofx_core::geometry::Rect;
use ofx_render::text::{TextAlign, TextBaseline, TextStyle, fill_text, measure};
use ofx_render::{PackedRgba, Raster};

pub const TITLE: &str = "FLUID INTERFACE";
pub const FOOTER: &str = "ORGANIC 3D EXPERIENCE";
pub const STATUS_HEADING: &str = "FLOW STATE";

const MARGIN: u16 = 32;
const PAD_X: u16 = 24;
const PAD_Y: u16 = 12;
const BUTTON_WIDTH: u16 = 192;
const BUTTON_HEIGHT: u16 = 44;
const BUTTON_GAP: u16 = 12;
const STATUS_WIDTH: u16 = 240;
const STATUS_PAD: u16 = 24;
const STATUS_HEADER: u16 = 20;
const STATUS_ROW: u16 = 16;
const STATUS_ROW_GAP: u16 = 8;
const STATUS_SECTION_GAP: u16 = 16;
const DOT_SIZE: u32 = 8;

const PANEL_BG: PackedRgba = PackedRgba::rgba(255, 255, 255, 204);
const BUTTON_BG: PackedRgba = PackedRgba::rgba(255, 255, 255, 153);
const SELECTED_BG: PackedRgba = PackedRgba::hex(0x171717);
const INK_STRONG: PackedRgba = PackedRgba::hex(0x262626);
const INK: PackedRgba = PackedRgba::hex(0x404040);
const INK_SOFT: PackedRgba = PackedRgba::hex(0x525252);
const INK_MUTED: PackedRgba = PackedRgba::hex(0x737373);
const INDICATOR: PackedRgba = PackedRgba::hex(0x22c55e);

/// Selected interface mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActivePanel {
    #[default]
    Home,
    Explore,
    Settings,
}

impl ActivePanel {
    /// Button order, top to bottom.
    pub const ALL: [Self; 3] = [Self::Home, Self::Explore, Self::Settings];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Home => "HOME",
            Self::Explore => "EXPLORE",
            Self::Settings => "SETTINGS",
        }
    }
}

/// Rectangles of every overlay element for one container size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HudLayout {
    pub title: Rect,
    pub buttons: [Rect; 3],
    pub status: Rect,
    pub footer: Rect,
}

impl HudLayout {
    pub fn compute(width: u16, height: u16) -> Self {
        let title_style = title_style();
        let (title_w, title_h) = measure(TITLE, &title_style);
        let title = Rect::new(
            MARGIN,
            MARGIN,
            clamp_u16(title_w + 2 * PAD_X as u32),
            clamp_u16(title_h + 2 * PAD_Y as u32),
        );

        let stack = 3 * BUTTON_HEIGHT + 2 * BUTTON_GAP;
        let stack_top = height.saturating_sub(MARGIN + stack);
        let buttons = [0u16, 1, 2].map(|i| {
            Rect::new(
                MARGIN,
                stack_top + i * (BUTTON_HEIGHT + BUTTON_GAP),
                BUTTON_WIDTH,
                BUTTON_HEIGHT,
            )
        });

        let status_h = 2 * STATUS_PAD
            + STATUS_HEADER
            + STATUS_SECTION_GAP
            + 3 * STATUS_ROW
            + 2 * STATUS_ROW_GAP;
        let status = Rect::new(
            width.saturating_sub(MARGIN + STATUS_WIDTH),
            MARGIN,
            STATUS_WIDTH,
            status_h,
        );

        let (footer_w, footer_h) = measure(FOOTER, &small_style());
        let footer_w = clamp_u16(footer_w);
        let footer_h = clamp_u16(footer_h);
        let footer = Rect::new(
            width.saturating_sub(MARGIN + footer_w),
            height.saturating_sub(MARGIN + footer_h),
            footer_w,
            footer_h,
        );

        Self {
            title,
            buttons,
            status,
            footer,
        }
    }

    /// Mode button under a container-local point.
    pub fn button_at(&self, x: f32, y: f32) -> Option<ActivePanel> {
        self.buttons
            .iter()
            .zip(ActivePanel::ALL)
            .find_map(|(rect, panel)| rect.contains_point(x, y).then_some(panel))
    }
}

/// Overlay state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hud {
    active: ActivePanel,
    particle_count: usize,
}

impl Hud {
    pub fn new(particle_count: usize) -> Self {
        Self {
            active: ActivePanel::default(),
            particle_count,
        }
    }

    #[inline]
    pub fn active(&self) -> ActivePanel {
        self.active
    }

    pub fn select(&mut self, panel: ActivePanel) {
        if self.active != panel {
            tracing::debug!(panel = panel.label(), "active panel changed");
        }
        self.active = panel;
    }

    /// Select the button under a pointer press. Returns the pressed panel.
    pub fn press(&mut self, layout: &HudLayout, x: f32, y: f32) -> Option<ActivePanel> {
        let panel = layout.button_at(x, y)?;
        self.select(panel);
        Some(panel)
    }

    /// Label/value rows of the status panel.
    pub fn status_rows(&self) -> [(&'static str, String); 3] {
        [
            ("PARTICLES", self.particle_count.to_string()),
            ("MODE", self.active.label().to_string()),
            ("DYNAMICS", "ACTIVE".to_string()),
        ]
    }

    /// Composite the overlay onto `raster`.
    pub fn draw(&self, raster: &mut Raster, layout: &HudLayout) {
        self.draw_title(raster, layout.title);
        self.draw_buttons(raster, &layout.buttons);
        self.draw_status(raster, layout.status);
        fill_text(
            raster,
            FOOTER,
            f32::from(layout.footer.right()),
            f32::from(layout.footer.bottom()),
            &small_style().align(TextAlign::Right).baseline(TextBaseline::Bottom),
            INK_MUTED,
        );
    }

    fn draw_title(&self, raster: &mut Raster, rect: Rect) {
        raster.fill_area(rect, PANEL_BG);
        fill_text(
            raster,
            TITLE,
            f32::from(rect.x + PAD_X),
            mid_y(rect),
            &title_style().baseline(TextBaseline::Middle),
            INK_STRONG,
        );
    }

    fn draw_buttons(&self, raster: &mut Raster, rects: &[Rect; 3]) {
        for (rect, panel) in rects.iter().zip(ActivePanel::ALL) {
            let selected = panel == self.active;
            let (bg, ink) = if selected {
                (SELECTED_BG, PackedRgba::WHITE)
            } else {
                (BUTTON_BG, INK)
            };
            raster.fill_area(*rect, bg);
            fill_text(
                raster,
                panel.label(),
                f32::from(rect.x + PAD_X),
                mid_y(*rect),
                &label_style().baseline(TextBaseline::Middle),
                ink,
            );
        }
    }

    fn draw_status(&self, raster: &mut Raster, rect: Rect) {
        raster.fill_area(rect, PANEL_BG);
        let left = f32::from(rect.x + STATUS_PAD);
        let right = f32::from(rect.right().saturating_sub(STATUS_PAD));
        let mut y = rect.y + STATUS_PAD;

        let header_mid = f32::from(y) + f32::from(STATUS_HEADER) / 2.0;
        fill_text(
            raster,
            STATUS_HEADING,
            left,
            header_mid,
            &label_style().baseline(TextBaseline::Middle),
            INK_SOFT,
        );
        raster.fill_rect(
            right as i32 - DOT_SIZE as i32,
            header_mid as i32 - DOT_SIZE as i32 / 2,
            DOT_SIZE,
            DOT_SIZE,
            INDICATOR,
        );
        y += STATUS_HEADER + STATUS_SECTION_GAP;

        let row_style = small_style().baseline(TextBaseline::Middle);
        for (label, value) in self.status_rows() {
            let mid = f32::from(y) + f32::from(STATUS_ROW) / 2.0;
            fill_text(raster, label, left, mid, &row_style, INK_MUTED);
            fill_text(
                raster,
                &value,
                right,
                mid,
                &row_style.bold().align(TextAlign::Right),
                INK_STRONG,
            );
            y += STATUS_ROW + STATUS_ROW_GAP;
        }
    }
}

fn title_style() -> TextStyle {
    TextStyle::new(20.0)
}

fn label_style() -> TextStyle {
    TextStyle::new(14.0)
}

fn small_style() -> TextStyle {
    TextStyle::new(12.0)
}

#[inline]
fn mid_y(rect: Rect) -> f32 {
    f32::from(rect.y) + f32::from(rect.height) / 2.0
}

#[inline]
fn clamp_u16(v: u32) -> u16 {
    v.min(u16::MAX as u32) as u16
}
