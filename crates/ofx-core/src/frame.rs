#![forbid(unsafe_code)]

//! Host-driven frame scheduling.
//!
//! [`FrameQueue`] models the host's "request one frame / cancel pending
//! frame" facility. Components hold scoped handles instead of registering
//! self-rescheduling callbacks:
//!
//! - [`FrameRequest`]: one-shot, fires on the next dispatch only.
//! - [`FrameSubscription`]: continuous, fires on every dispatch.
//!
//! Dropping either handle cancels it, so a component that is torn down can
//! never receive another frame.
//!
//! # How it works
//!
//! 1. A component calls [`FrameQueue::request`] or [`FrameQueue::subscribe`].
//! 2. Once per display refresh the host calls [`FrameQueue::run_frame`] (or
//!    [`FrameQueue::dispatch`] and routes ticks itself).
//! 3. Each due handle yields one [`FrameTick`]; clients check ownership with
//!    [`FrameRequest::owns`] / [`FrameSubscription::owns`] and ignore the rest.
//!
//! A tick cancelled after dispatch but before delivery is dropped, which is
//! what makes "reset while a frame is in flight" safe.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::{Rc, Weak};
use std::time::Duration;

/// Identifies one request or subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(u64);

impl FrameId {
    /// Raw identifier value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A frame delivered to a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTick {
    /// The request or subscription this tick belongs to.
    pub id: FrameId,
    /// Host timestamp for this frame.
    pub now: Duration,
    /// Monotonically increasing dispatch counter (1 for the first frame).
    pub frame: u64,
}

/// Receives dispatched frames.
pub trait FrameClient {
    /// Called for every live tick of a dispatch, in id order.
    ///
    /// Implementations must ignore ticks they do not own.
    fn on_frame(&mut self, tick: FrameTick);
}

#[derive(Debug, Default)]
struct QueueState {
    next_id: u64,
    frame: u64,
    requests: BTreeSet<FrameId>,
    subscriptions: BTreeSet<FrameId>,
    in_flight: BTreeSet<FrameId>,
}

impl QueueState {
    fn alloc(&mut self) -> FrameId {
        self.next_id += 1;
        FrameId(self.next_id)
    }

    fn cancel(&mut self, id: FrameId) -> bool {
        let pending = self.requests.remove(&id);
        let subscribed = self.subscriptions.remove(&id);
        let in_flight = self.in_flight.remove(&id);
        pending || subscribed || in_flight
    }
}

fn cancel_in(queue: &Weak<RefCell<QueueState>>, id: FrameId) -> bool {
    match queue.upgrade() {
        Some(state) => {
            let cancelled = state.borrow_mut().cancel(id);
            if cancelled {
                tracing::trace!(id = id.0, "frame handle cancelled");
            }
            cancelled
        }
        None => false,
    }
}

/// The host frame-callback facility.
///
/// Cloning yields another handle to the same queue.
#[derive(Debug, Clone, Default)]
pub struct FrameQueue {
    state: Rc<RefCell<QueueState>>,
}

impl FrameQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a single frame.
    #[must_use = "dropping the request cancels it"]
    pub fn request(&self) -> FrameRequest {
        let mut state = self.state.borrow_mut();
        let id = state.alloc();
        state.requests.insert(id);
        FrameRequest {
            id,
            queue: Rc::downgrade(&self.state),
        }
    }

    /// Subscribe to every frame until the subscription is dropped.
    #[must_use = "dropping the subscription cancels it"]
    pub fn subscribe(&self) -> FrameSubscription {
        let mut state = self.state.borrow_mut();
        let id = state.alloc();
        state.subscriptions.insert(id);
        FrameSubscription {
            id,
            queue: Rc::downgrade(&self.state),
        }
    }

    /// Number of one-shot requests waiting for the next dispatch.
    #[inline]
    pub fn pending_requests(&self) -> usize {
        self.state.borrow().requests.len()
    }

    /// Number of live subscriptions.
    #[inline]
    pub fn active_subscriptions(&self) -> usize {
        self.state.borrow().subscriptions.len()
    }

    /// Returns true if the next dispatch would produce at least one tick.
    #[inline]
    pub fn has_pending(&self) -> bool {
        let state = self.state.borrow();
        !state.requests.is_empty() || !state.subscriptions.is_empty()
    }

    /// Number of dispatches performed so far.
    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.state.borrow().frame
    }

    /// Returns true if a dispatched tick may still be delivered.
    #[inline]
    pub fn is_live(&self, id: FrameId) -> bool {
        self.state.borrow().in_flight.contains(&id)
    }

    /// Advance one frame: drain due requests and snapshot live subscriptions.
    ///
    /// One-shot requests are consumed by this call; a client that wants
    /// another frame must request again while handling its tick. Ticks are
    /// ordered by id (oldest handle first).
    pub fn dispatch(&self, now: Duration) -> Vec<FrameTick> {
        let mut state = self.state.borrow_mut();
        state.frame += 1;
        let frame = state.frame;

        let requests = std::mem::take(&mut state.requests);
        let mut due: BTreeSet<FrameId> = requests;
        due.extend(state.subscriptions.iter().copied());
        state.in_flight = due.clone();

        tracing::trace!(frame, due = due.len(), "frame dispatch");
        due.into_iter()
            .map(|id| FrameTick { id, now, frame })
            .collect()
    }

    /// Dispatch one frame and deliver every live tick to `clients`.
    ///
    /// A tick cancelled by an earlier client callback in the same frame is
    /// skipped. Returns the number of ticks delivered.
    pub fn run_frame(&self, now: Duration, clients: &mut [&mut dyn FrameClient]) -> usize {
        let ticks = self.dispatch(now);
        let mut delivered = 0;
        for tick in ticks {
            if !self.is_live(tick.id) {
                continue;
            }
            for client in clients.iter_mut() {
                if !self.is_live(tick.id) {
                    break;
                }
                client.on_frame(tick);
            }
            delivered += 1;
        }
        self.state.borrow_mut().in_flight.clear();
        delivered
    }
}

/// Scoped one-shot frame request. Cancelled on drop.
#[derive(Debug)]
pub struct FrameRequest {
    id: FrameId,
    queue: Weak<RefCell<QueueState>>,
}

impl FrameRequest {
    /// Identifier of this request.
    #[inline]
    pub fn id(&self) -> FrameId {
        self.id
    }

    /// Returns true if `tick` was produced for this request.
    #[inline]
    pub fn owns(&self, tick: &FrameTick) -> bool {
        tick.id == self.id
    }

    /// Returns true while the request waits for the next dispatch.
    pub fn is_pending(&self) -> bool {
        self.queue
            .upgrade()
            .is_some_and(|state| state.borrow().requests.contains(&self.id))
    }

    /// Cancel the request (and its tick, if already dispatched).
    ///
    /// Returns true if anything was cancelled. Idempotent.
    pub fn cancel(&self) -> bool {
        cancel_in(&self.queue, self.id)
    }
}

impl Drop for FrameRequest {
    fn drop(&mut self) {
        cancel_in(&self.queue, self.id);
    }
}

/// Scoped continuous frame subscription. Cancelled on drop.
#[derive(Debug)]
pub struct FrameSubscription {
    id: FrameId,
    queue: Weak<RefCell<QueueState>>,
}

impl FrameSubscription {
    /// Identifier of this subscription.
    #[inline]
    pub fn id(&self) -> FrameId {
        self.id
    }

    /// Returns true if `tick` was produced for this subscription.
    #[inline]
    pub fn owns(&self, tick: &FrameTick) -> bool {
        tick.id == self.id
    }

    /// Returns true while the subscription is registered with a live queue.
    pub fn is_active(&self) -> bool {
        self.queue
            .upgrade()
            .is_some_and(|state| state.borrow().subscriptions.contains(&self.id))
    }

    /// Unsubscribe. Idempotent.
    pub fn cancel(&self) -> bool {
        cancel_in(&self.queue, self.id)
    }
}

impl Drop for FrameSubscription {
    fn drop(&mut self) {
        cancel_in(&self.queue, self.id);
    }
}
