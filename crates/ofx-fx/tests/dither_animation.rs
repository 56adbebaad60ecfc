//! Dither reveal driven end to end through a manual clock and frame queue.

use std::time::Duration;

use ofx_core::clock::{Clock, ManualClock};
use ofx_core::frame::FrameQueue;
use ofx_fx::dither::{DitherPage, DitherParams, DitherPhase, DitherReveal};
use ofx_render::{PackedRgba, Raster};

const FRAME: Duration = Duration::from_millis(16);

fn setup() -> (ManualClock, FrameQueue, DitherReveal) {
    let clock = ManualClock::new();
    let frames = FrameQueue::new();
    let mut reveal = DitherReveal::new(&frames).with_seed(0x5EED);
    reveal.attach_default_surface();
    (clock, frames, reveal)
}

#[test]
fn full_duration_completes_and_goes_idle() {
    let (clock, frames, mut reveal) = setup();
    assert!(reveal.start(clock.now()));

    clock.advance(Duration::from_millis(3000));
    frames.run_frame(clock.now(), &mut [&mut reveal]);

    assert_eq!(reveal.progress(), 1.0);
    assert!(!reveal.is_animating());
    assert_eq!(reveal.phase(), DitherPhase::Idle);
    assert!(!frames.has_pending());
    assert!(!reveal.has_pending_frame());

    // Nothing left to deliver.
    assert_eq!(frames.run_frame(clock.now() + FRAME, &mut [&mut reveal]), 0);
}

#[test]
fn progress_is_monotonic_within_a_run() {
    let (clock, frames, mut reveal) = setup();
    reveal.start(clock.now());
    let mut last = reveal.progress();
    let mut steps = 0;
    while reveal.is_animating() {
        clock.advance(FRAME);
        frames.run_frame(clock.now(), &mut [&mut reveal]);
        let p = reveal.progress();
        assert!(p >= last, "{p} < {last}");
        assert!((0.0..=1.0).contains(&p));
        last = p;
        steps += 1;
        assert!(steps < 1000, "animation never finished");
    }
    assert_eq!(last, 1.0);
    // ceil(3000 / 16)
    assert_eq!(steps, 188);
}

#[test]
fn overshoot_is_clamped() {
    let (clock, frames, mut reveal) = setup();
    reveal.start(clock.now());
    clock.advance(Duration::from_secs(10));
    frames.run_frame(clock.now(), &mut [&mut reveal]);
    assert_eq!(reveal.progress(), 1.0);
    assert!(!frames.has_pending());
}

#[test]
fn reset_blocks_dispatched_frame() {
    let (clock, frames, mut reveal) = setup();
    reveal.start(clock.now());
    clock.advance(Duration::from_millis(1500));

    // The host has already collected this frame's ticks when reset lands.
    let ticks = frames.dispatch(clock.now());
    assert_eq!(ticks.len(), 1);
    reveal.reset();
    for tick in ticks {
        if frames.is_live(tick.id) {
            ofx_core::frame::FrameClient::on_frame(&mut reveal, tick);
        }
    }

    assert_eq!(reveal.progress(), 0.0);
    assert!(!reveal.is_animating());
    assert!(!frames.has_pending());
}

#[test]
fn restart_after_completion() {
    let (clock, frames, mut reveal) = setup();
    reveal.start(clock.now());
    clock.advance(Duration::from_millis(3000));
    frames.run_frame(clock.now(), &mut [&mut reveal]);
    assert!(!reveal.is_animating());

    assert!(reveal.start(clock.now()));
    assert_eq!(reveal.progress(), 0.0);
    clock.advance(Duration::from_millis(750));
    frames.run_frame(clock.now(), &mut [&mut reveal]);
    assert!((reveal.progress() - 0.25).abs() < 1e-6);
    assert!(reveal.is_animating());
}

#[test]
fn page_follows_component() {
    let (clock, frames, mut reveal) = setup();
    assert_eq!(DitherPage::from_reveal(&reveal).play.label, "Play Animation");

    reveal.start(clock.now());
    clock.advance(Duration::from_millis(1500));
    frames.run_frame(clock.now(), &mut [&mut reveal]);
    let page = DitherPage::from_reveal(&reveal);
    assert!(!page.play.enabled);
    assert_eq!(page.progress_label, "50%");
    assert_eq!(page.bar_fill(200), 100);
}

#[test]
fn animation_without_surface_still_tracks_progress() {
    let clock = ManualClock::new();
    let frames = FrameQueue::new();
    let mut reveal = DitherReveal::new(&frames).with_seed(1);
    reveal.start(clock.now());
    clock.advance(Duration::from_millis(1500));
    frames.run_frame(clock.now(), &mut [&mut reveal]);
    assert_eq!(reveal.progress(), 0.5);
    assert!(reveal.surface().is_none());
}

#[test]
fn custom_surface_and_text() {
    let frames = FrameQueue::new();
    let params = DitherParams::default()
        .with_text("OK")
        .with_noise_amplitude(0.0);
    let mut reveal = DitherReveal::with_params(&frames, params).with_seed(2);
    reveal.attach_surface(Raster::new(400, 200));
    reveal.set_progress(1.0);

    // Zero jitter at full progress: text blocks show, background stays dark.
    let surface = reveal.surface().expect("attached");
    assert_eq!(surface.get_pixel(0, 0), PackedRgba::BLACK);
    assert!(surface.pixels().contains(&PackedRgba::WHITE));

    let detached = reveal.detach_surface().expect("surface");
    assert_eq!(detached.size(), (400, 200));
    assert!(reveal.surface().is_none());
}
