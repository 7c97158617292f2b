//! Deterministic frame selection for cyclic surface animation.

use std::time::Duration;

use web_time::Instant;

use crate::error::LayerError;

use super::AnimationFrame;

/// The animation state at one sampled instant: the frame pair to blend
/// between and the blend fraction in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSample<'a> {
    pub current: &'a AnimationFrame,
    pub next: &'a AnimationFrame,
    pub blend: f32,
}

/// Maps elapsed time onto the cyclic frame sequence.
///
/// The animator holds no history: every sample is a pure function of
/// the elapsed duration, so repeated, skipped, or out-of-order render
/// calls cannot accumulate drift.
#[derive(Debug, Clone)]
pub struct SurfaceAnimator {
    frames: Vec<AnimationFrame>,
    cycle_period: Duration,
}

impl SurfaceAnimator {
    /// Creates an animator over a fixed frame table.
    ///
    /// An empty table or zero period is a configuration error caught
    /// here rather than surfacing as a divide-by-zero mid-render.
    pub fn new(frames: Vec<AnimationFrame>, cycle_period: Duration) -> Result<Self, LayerError> {
        if frames.is_empty() {
            return Err(LayerError::Config(
                "surface animator needs at least one frame".to_string(),
            ));
        }
        if cycle_period.is_zero() {
            return Err(LayerError::Config(
                "surface animator cycle period must be non-zero".to_string(),
            ));
        }
        Ok(Self {
            frames,
            cycle_period,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frames(&self) -> &[AnimationFrame] {
        &self.frames
    }

    /// Samples the animation at the given elapsed time.
    ///
    /// `current = floor(elapsed / period) mod n`, `next` is its cyclic
    /// successor, and `blend` is the fraction of the way through the
    /// current period.
    pub fn sample(&self, elapsed: Duration) -> FrameSample<'_> {
        let n = self.frames.len();
        // Nanosecond arithmetic: any non-zero period accepted by `new`
        // is a non-zero divisor here, including sub-millisecond ones.
        let period_ns = self.cycle_period.as_nanos();
        let elapsed_ns = elapsed.as_nanos();

        let current = ((elapsed_ns / period_ns) as usize) % n;
        let next = (current + 1) % n;
        let blend = ((elapsed_ns % period_ns) as f64 / period_ns as f64) as f32;

        FrameSample {
            current: &self.frames[current],
            next: &self.frames[next],
            blend,
        }
    }
}

/// Wall-clock source for animation sampling.
///
/// The start instant is captured on the first call and never advanced
/// incrementally afterwards, so elapsed time is always measured against
/// one fixed origin.
#[derive(Debug, Default)]
pub struct AnimationClock {
    start: Option<Instant>,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed time since the first call; zero on that first call.
    pub fn elapsed(&mut self) -> Duration {
        let start = *self.start.get_or_insert_with(Instant::now);
        start.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Range;

    fn frame(index: usize) -> AnimationFrame {
        AnimationFrame {
            index,
            raster_path: format!("huv/huv_{}.png", index),
            height: Range::new(0.0, 10.0 + index as f32),
            velocity_u: Range::new(-1.0, 1.0),
            velocity_v: Range::new(-2.0, 2.0),
        }
    }

    fn animator(frame_count: usize, period_ms: u64) -> SurfaceAnimator {
        SurfaceAnimator::new(
            (0..frame_count).map(frame).collect(),
            Duration::from_millis(period_ms),
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_empty_frame_table() {
        assert!(matches!(
            SurfaceAnimator::new(vec![], Duration::from_millis(2000)),
            Err(LayerError::Config(_))
        ));
    }

    #[test]
    fn test_rejects_zero_period() {
        assert!(matches!(
            SurfaceAnimator::new(vec![frame(0)], Duration::ZERO),
            Err(LayerError::Config(_))
        ));
    }

    #[test]
    fn test_sample_mid_cycle() {
        // frame_count=3, period=2000ms, elapsed=2500ms
        // -> current 1, next 2, blend 0.25.
        let animator = animator(3, 2000);
        let sample = animator.sample(Duration::from_millis(2500));

        assert_eq!(sample.current.index, 1);
        assert_eq!(sample.next.index, 2);
        assert!((sample.blend - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_sample_wraps_around_cycle() {
        let animator = animator(3, 2000);
        let sample = animator.sample(Duration::from_millis(5500));

        // floor(5500 / 2000) = 2, so next wraps back to frame 0.
        assert_eq!(sample.current.index, 2);
        assert_eq!(sample.next.index, 0);
        assert!((sample.blend - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_sample_handles_submillisecond_period() {
        let animator = SurfaceAnimator::new(
            (0..3).map(frame).collect(),
            Duration::from_micros(500),
        )
        .unwrap();

        let sample = animator.sample(Duration::from_micros(1125));
        assert_eq!(sample.current.index, 2);
        assert_eq!(sample.next.index, 0);
        assert!((sample.blend - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_sample_is_idempotent() {
        let animator = animator(3, 2000);
        let elapsed = Duration::from_millis(3210);
        assert_eq!(animator.sample(elapsed), animator.sample(elapsed));
    }

    #[test]
    fn test_sample_is_periodic_over_full_cycle() {
        let animator = animator(3, 2000);
        let elapsed = Duration::from_millis(700);
        let full_cycle = Duration::from_millis(2000 * 3);
        assert_eq!(animator.sample(elapsed), animator.sample(elapsed + full_cycle));
    }

    #[test]
    fn test_blend_stays_below_one() {
        let animator = animator(2, 1000);
        for ms in [0u64, 999, 1000, 1999, 12345] {
            let sample = animator.sample(Duration::from_millis(ms));
            assert!((0.0..1.0).contains(&sample.blend), "elapsed {}ms", ms);
        }
    }

    #[test]
    fn test_single_frame_blends_with_itself() {
        let animator = animator(1, 2000);
        let sample = animator.sample(Duration::from_millis(500));
        assert_eq!(sample.current.index, 0);
        assert_eq!(sample.next.index, 0);
    }

    #[test]
    fn test_clock_starts_at_zero() {
        let mut clock = AnimationClock::new();
        let first = clock.elapsed();
        assert!(first < Duration::from_millis(50));
        // Monotonic against the captured origin.
        assert!(clock.elapsed() >= first);
    }

    #[test]
    fn test_sample_carries_frame_ranges() {
        let animator = animator(3, 2000);
        let sample = animator.sample(Duration::from_millis(2500));
        assert_eq!(sample.current.height, Range::new(0.0, 11.0));
        assert_eq!(sample.next.height, Range::new(0.0, 12.0));
    }
}
