//! Property-based invariant tests for core primitives.
//!
//! 1. Noise values stay in `[0, 1)` and ranged values in `[lo, hi)`.
//! 2. Same seed yields the same sequence.
//! 3. Rect normalization maps interior points into `[-1, 1]`.
//! 4. A frame queue never delivers a cancelled handle.

use std::time::Duration;

use ofx_core::frame::FrameQueue;
use ofx_core::geometry::Rect;
use ofx_core::noise::{NoiseSource, XorShift32};
use proptest::prelude::*;

proptest! {
    #[test]
    fn unit_noise_in_range(seed in any::<u32>(), draws in 1usize..256) {
        let mut rng = XorShift32::new(seed);
        for _ in 0..draws {
            let v = rng.next_unit();
            prop_assert!((0.0..1.0).contains(&v), "unit noise out of range: {}", v);
        }
    }
}

proptest! {
    #[test]
    fn ranged_noise_in_range(seed in any::<u32>(), lo in -100.0f32..100.0, span in 0.001f32..100.0) {
        let hi = lo + span;
        let mut rng = XorShift32::new(seed);
        for _ in 0..64 {
            let v = rng.next_range(lo, hi);
            prop_assert!(v >= lo && v <= hi, "{} not in [{}, {}]", v, lo, hi);
        }
    }
}

proptest! {
    #[test]
    fn seeded_sequences_repeat(seed in any::<u32>()) {
        let mut a = XorShift32::new(seed);
        let mut b = XorShift32::new(seed);
        for _ in 0..32 {
            prop_assert_eq!(a.next_u32(), b.next_u32());
        }
    }
}

proptest! {
    #[test]
    fn normalize_interior_in_unit_square(
        x in 0u16..1000, y in 0u16..1000, w in 1u16..1000, h in 1u16..1000,
        fx in 0.0f32..1.0, fy in 0.0f32..1.0,
    ) {
        let rect = Rect::new(x, y, w, h);
        let px = x as f32 + fx * w as f32;
        let py = y as f32 + fy * h as f32;
        let (nx, ny) = rect.normalize(px, py).expect("non-empty rect");
        prop_assert!((-1.0..=1.0).contains(&nx), "nx={}", nx);
        prop_assert!((-1.0..=1.0).contains(&ny), "ny={}", ny);
    }
}

proptest! {
    #[test]
    fn cancelled_handles_never_fire(cancel_mask in prop::collection::vec(any::<bool>(), 1..16)) {
        let queue = FrameQueue::new();
        let handles: Vec<_> = cancel_mask.iter().map(|_| queue.request()).collect();
        for (handle, cancel) in handles.iter().zip(&cancel_mask) {
            if *cancel {
                handle.cancel();
            }
        }
        let ticks = queue.dispatch(Duration::ZERO);
        let expected = cancel_mask.iter().filter(|c| !**c).count();
        prop_assert_eq!(ticks.len(), expected);
        for (handle, cancel) in handles.iter().zip(&cancel_mask) {
            let fired = ticks.iter().any(|t| handle.owns(t));
            prop_assert_eq!(fired, !*cancel);
        }
    }
}
