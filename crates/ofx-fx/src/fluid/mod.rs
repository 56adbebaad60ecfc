#![forbid(unsafe_code)]

//! Fluid interface: a continuously animated 3D scene with a HUD overlay.
//!
//! # Lifecycle
//!
//! ```text
//! new ──mount──▶ running ──teardown──▶ unmounted
//!                  │  ▲
//!                  └──┘ on_frame / handle_event
//! ```
//!
//! [`FluidInterface::mount`] builds a [`FluidScene`], a renderer sized to the
//! container, and subscribes to the [`FrameQueue`]. Every delivered frame
//! advances the scene with the latest pointer position, renders it and
//! composites the [`Hud`]. [`FluidInterface::teardown`] drops the
//! subscription and the scene and hands back the surface; it is idempotent
//! and safe before mount.
//!
//! Pointer coordinates arrive in viewport pixels and are normalized to
//! `[-1, 1]` across the container's bounding box, `(-1, -1)` at top-left.
//! Moves outside the container are dropped.

pub mod camera;
pub mod hud;
pub mod mesh;
pub mod particles;
pub mod renderer;
pub mod ribbon;
pub mod scene;
pub mod wave;

use std::fmt;

use glam::Vec2;
use ofx_core::event::{Event, PointerEvent, PointerEventKind};
use ofx_core::frame::{FrameClient, FrameQueue, FrameSubscription, FrameTick};
use ofx_core::geometry::Rect;
use ofx_core::noise::{NoiseSource, XorShift32};
use ofx_render::{PackedRgba, Raster};

pub use camera::{Camera, CameraParams};
pub use hud::{ActivePanel, Hud, HudLayout};
pub use particles::ParticleParams;
pub use renderer::{RenderStats, SoftwareRenderer};
pub use ribbon::RibbonParams;
pub use scene::{FluidScene, Lights};
pub use wave::WaveParams;

/// Misuse of the [`FluidInterface`] lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FluidError {
    /// The container has zero width or height.
    EmptyContainer { width: u16, height: u16 },
    /// `mount` was called while already mounted.
    AlreadyMounted,
}

impl fmt::Display for FluidError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyContainer { width, height } => {
                write!(f, "cannot mount into an empty container ({width}x{height})")
            }
            Self::AlreadyMounted => write!(f, "fluid interface is already mounted"),
        }
    }
}

impl std::error::Error for FluidError {}

/// Scene configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FluidParams {
    pub background: PackedRgba,
    /// Time accumulator increment per frame.
    pub time_step: f32,
    pub lights: Lights,
    pub camera: CameraParams,
    pub wave: WaveParams,
    pub particles: ParticleParams,
    pub ribbon: RibbonParams,
    /// Composite the HUD over each frame.
    pub show_hud: bool,
}

impl Default for FluidParams {
    fn default() -> Self {
        Self {
            background: PackedRgba::hex(0xe8e4dd),
            time_step: 0.01,
            lights: Lights::default(),
            camera: CameraParams::default(),
            wave: WaveParams::default(),
            particles: ParticleParams::default(),
            ribbon: RibbonParams::default(),
            show_hud: true,
        }
    }
}

impl FluidParams {
    #[must_use]
    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.particles.count = count;
        self
    }

    #[must_use]
    pub fn with_hud(mut self, show: bool) -> Self {
        self.show_hud = show;
        self
    }
}

/// State that exists only between mount and teardown.
struct Mounted {
    container: Rect,
    scene: FluidScene,
    renderer: SoftwareRenderer,
    layout: HudLayout,
    subscription: FrameSubscription,
    last_stats: RenderStats,
}

/// The fluid interface component.
pub struct FluidInterface {
    params: FluidParams,
    noise: Box<dyn NoiseSource>,
    mounted: Option<Mounted>,
    pointer: Vec2,
    hud: Hud,
}

impl FluidInterface {
    pub fn new(params: FluidParams) -> Self {
        let hud = Hud::new(params.particles.count);
        Self {
            params,
            noise: Box::new(XorShift32::from_entropy()),
            mounted: None,
            pointer: Vec2::ZERO,
            hud,
        }
    }

    /// Replace the noise source used to scatter particles on mount.
    #[must_use]
    pub fn with_noise(mut self, noise: impl NoiseSource + 'static) -> Self {
        self.noise = Box::new(noise);
        self
    }

    #[must_use]
    pub fn with_seed(self, seed: u32) -> Self {
        self.with_noise(XorShift32::new(seed))
    }

    /// Build the scene inside `container` and subscribe to `frames`.
    pub fn mount(&mut self, container: Rect, frames: &FrameQueue) -> Result<(), FluidError> {
        if self.mounted.is_some() {
            return Err(FluidError::AlreadyMounted);
        }
        let Some(aspect) = container.aspect_ratio() else {
            return Err(FluidError::EmptyContainer {
                width: container.width,
                height: container.height,
            });
        };

        let scene = FluidScene::new(&self.params, aspect, self.noise.as_mut());
        let renderer = SoftwareRenderer::new(u32::from(container.width), u32::from(container.height));
        let subscription = frames.subscribe();
        tracing::debug!(
            width = container.width,
            height = container.height,
            particles = scene.particles().len(),
            frame_id = subscription.id().get(),
            "fluid interface mounted"
        );
        self.pointer = Vec2::ZERO;
        self.mounted = Some(Mounted {
            container,
            scene,
            renderer,
            layout: HudLayout::compute(container.width, container.height),
            subscription,
            last_stats: RenderStats::default(),
        });
        Ok(())
    }

    /// Stop animating and release the scene. Returns the render surface if
    /// one was attached.
    pub fn teardown(&mut self) -> Option<Raster> {
        let mounted = self.mounted.take()?;
        mounted.subscription.cancel();
        tracing::debug!(time = mounted.scene.time(), "fluid interface torn down");
        Some(mounted.renderer.into_surface())
    }

    /// Route a host event. Events before mount are ignored.
    pub fn handle_event(&mut self, event: &Event) {
        match *event {
            Event::Pointer(pointer) => self.handle_pointer(pointer),
            Event::Resize { width, height } => self.resize(width, height),
        }
    }

    fn handle_pointer(&mut self, event: PointerEvent) {
        let Some(mounted) = &self.mounted else {
            return;
        };
        let container = mounted.container;
        match event.kind {
            // Moves outside the container (edges included) keep the last position.
            PointerEventKind::Moved => {
                let over = container
                    .normalize(event.x, event.y)
                    .map(|(x, y)| Vec2::new(x, y))
                    .filter(|p| p.abs().max_element() <= 1.0);
                if let Some(pointer) = over {
                    self.pointer = pointer;
                }
            }
            PointerEventKind::Down => {
                let local_x = event.x - f32::from(container.x);
                let local_y = event.y - f32::from(container.y);
                self.hud.press(&mounted.layout, local_x, local_y);
            }
        }
    }

    /// Track a new container size. Zero-sized sizes are ignored.
    pub fn resize(&mut self, width: u16, height: u16) {
        let Some(mounted) = &mut self.mounted else {
            return;
        };
        if width == 0 || height == 0 {
            tracing::trace!(width, height, "ignoring empty resize");
            return;
        }
        mounted.container.width = width;
        mounted.container.height = height;
        mounted
            .scene
            .camera_mut()
            .set_aspect(f32::from(width) / f32::from(height));
        mounted.renderer.resize(u32::from(width), u32::from(height));
        mounted.layout = HudLayout::compute(width, height);
        tracing::debug!(width, height, "fluid interface resized");
    }

    #[inline]
    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// Latest normalized pointer position.
    #[inline]
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    #[inline]
    pub fn active_panel(&self) -> ActivePanel {
        self.hud.active()
    }

    #[inline]
    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    #[inline]
    pub fn params(&self) -> &FluidParams {
        &self.params
    }

    pub fn scene(&self) -> Option<&FluidScene> {
        self.mounted.as_ref().map(|m| &m.scene)
    }

    pub fn surface(&self) -> Option<&Raster> {
        self.mounted.as_ref().map(|m| m.renderer.surface())
    }

    pub fn container(&self) -> Option<Rect> {
        self.mounted.as_ref().map(|m| m.container)
    }

    pub fn hud_layout(&self) -> Option<&HudLayout> {
        self.mounted.as_ref().map(|m| &m.layout)
    }

    /// Counters from the most recent frame.
    pub fn last_render_stats(&self) -> Option<RenderStats> {
        self.mounted.as_ref().map(|m| m.last_stats)
    }
}

impl FrameClient for FluidInterface {
    fn on_frame(&mut self, tick: FrameTick) {
        let Some(mounted) = &mut self.mounted else {
            return;
        };
        if !mounted.subscription.owns(&tick) {
            return;
        }
        mounted.scene.advance(self.pointer);
        mounted.last_stats = mounted.renderer.render(&mounted.scene);
        if self.params.show_hud {
            self.hud.draw(mounted.renderer.surface_mut(), &mounted.layout);
        }
        tracing::trace!(frame = tick.frame, time = mounted.scene.time(), "fluid frame");
    }
}

impl fmt::Debug for FluidInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FluidInterface")
            .field("mounted", &self.is_mounted())
            .field("pointer", &self.pointer)
            .field("active_panel", &self.hud.active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn small() -> FluidInterface {
        FluidInterface::new(FluidParams::default().with_particle_count(50)).with_seed(1)
    }

    #[test]
    fn mount_rejects_empty_container() {
        let frames = FrameQueue::new();
        let mut fluid = small();
        assert_eq!(
            fluid.mount(Rect::new(0, 0, 0, 10), &frames),
            Err(FluidError::EmptyContainer { width: 0, height: 10 })
        );
        assert!(!fluid.is_mounted());
        assert_eq!(frames.active_subscriptions(), 0);
    }

    #[test]
    fn double_mount_is_an_error() {
        let frames = FrameQueue::new();
        let mut fluid = small();
        fluid.mount(Rect::from_size(64, 48), &frames).expect("mount");
        assert_eq!(
            fluid.mount(Rect::from_size(64, 48), &frames),
            Err(FluidError::AlreadyMounted)
        );
        assert_eq!(frames.active_subscriptions(), 1);
    }

    #[test]
    fn teardown_is_idempotent() {
        let frames = FrameQueue::new();
        let mut fluid = small();
        assert!(fluid.teardown().is_none());
        fluid.mount(Rect::from_size(64, 48), &frames).expect("mount");
        let surface = fluid.teardown().expect("surface");
        assert_eq!(surface.size(), (64, 48));
        assert!(fluid.teardown().is_none());
        assert_eq!(frames.active_subscriptions(), 0);
    }

    #[test]
    fn pointer_ignored_before_mount() {
        let mut fluid = small();
        fluid.handle_event(&Event::Pointer(PointerEvent::moved(10.0, 10.0)));
        assert_eq!(fluid.pointer(), Vec2::ZERO);
    }

    #[test]
    fn pointer_normalized_to_container() {
        let frames = FrameQueue::new();
        let mut fluid = small();
        fluid.mount(Rect::new(100, 50, 200, 100), &frames).expect("mount");
        fluid.handle_event(&Event::Pointer(PointerEvent::moved(300.0, 50.0)));
        assert_eq!(fluid.pointer(), Vec2::new(1.0, -1.0));
        fluid.handle_event(&Event::Pointer(PointerEvent::moved(200.0, 100.0)));
        assert_eq!(fluid.pointer(), Vec2::ZERO);
    }

    #[test]
    fn resize_updates_aspect_and_surface() {
        let frames = FrameQueue::new();
        let mut fluid = small();
        fluid.mount(Rect::from_size(64, 48), &frames).expect("mount");
        fluid.handle_event(&Event::Resize { width: 100, height: 50 });
        assert_eq!(fluid.surface().map(Raster::size), Some((100, 50)));
        let aspect = fluid.scene().map(|s| s.camera().aspect());
        assert_eq!(aspect, Some(2.0));

        fluid.resize(0, 50);
        assert_eq!(fluid.surface().map(Raster::size), Some((100, 50)));
    }

    #[test]
    fn frame_advances_scene() {
        let frames = FrameQueue::new();
        let mut fluid = small();
        fluid.mount(Rect::from_size(64, 48), &frames).expect("mount");
        frames.run_frame(Duration::from_millis(16), &mut [&mut fluid]);
        frames.run_frame(Duration::from_millis(32), &mut [&mut fluid]);
        let time = fluid.scene().map(FluidScene::time).unwrap_or_default();
        assert!((time - 0.02).abs() < 1e-6);
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            FluidError::EmptyContainer { width: 0, height: 3 }.to_string(),
            "cannot mount into an empty container (0x3)"
        );
        assert_eq!(
            FluidError::AlreadyMounted.to_string(),
            "fluid interface is already mounted"
        );
    }
}
