//! Lifecycle transitions are reported as `debug` tracing events.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use ofx_core::frame::FrameQueue;
use ofx_core::geometry::Rect;
use ofx_fx::dither::DitherReveal;
use ofx_fx::fluid::{FluidInterface, FluidParams};
use tracing::field::{Field, Visit};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

// ---------------------------------------------------------------------------
// Tracing helpers
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
struct MessageLog {
    messages: Arc<Mutex<Vec<String>>>,
}

#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        }
    }
}

impl<S> Layer<S> for MessageLog
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() != tracing::Level::DEBUG {
            return;
        }
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        if let Some(message) = visitor.message {
            self.messages.lock().unwrap().push(message);
        }
    }
}

fn capture() -> (tracing::dispatcher::DefaultGuard, Arc<Mutex<Vec<String>>>) {
    let log = MessageLog::default();
    let messages = log.messages.clone();
    let subscriber = tracing_subscriber::registry().with(log);
    let guard = tracing::subscriber::set_default(subscriber);
    tracing::callsite::rebuild_interest_cache();
    (guard, messages)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn dither_logs_start_complete_and_reset() {
    let (_guard, messages) = capture();
    let frames = FrameQueue::new();
    let mut reveal = DitherReveal::new(&frames).with_seed(4);

    reveal.start(Duration::ZERO);
    frames.run_frame(Duration::from_secs(5), &mut [&mut reveal]);
    reveal.reset();

    let messages = messages.lock().unwrap().clone();
    assert_eq!(
        messages,
        vec![
            "dither animation started".to_string(),
            "dither animation complete".to_string(),
            "dither animation reset".to_string(),
        ]
    );
}

#[test]
fn fluid_logs_mount_resize_and_teardown() {
    let (_guard, messages) = capture();
    let frames = FrameQueue::new();
    let mut fluid =
        FluidInterface::new(FluidParams::default().with_particle_count(8)).with_seed(4);

    fluid.mount(Rect::from_size(32, 32), &frames).expect("mount");
    fluid.resize(48, 32);
    fluid.teardown();
    // Second teardown is silent.
    fluid.teardown();

    let messages = messages.lock().unwrap().clone();
    assert_eq!(
        messages,
        vec![
            "fluid interface mounted".to_string(),
            "fluid interface resized".to_string(),
            "fluid interface torn down".to_string(),
        ]
    );
}
