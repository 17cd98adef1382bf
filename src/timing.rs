//! Measure the time between frames.

use std::time::Duration;

use web_time::Instant;

/// How fast old FPS values decay in the smoothed average.
const FPS_SMOOTHED_AVERAGE_ALPHA: f32 = 0.8;

/// Convert the refresh rate of a monitor to the time a single frame should take.
///
/// # Arguments
///
/// * `refresh_rate_millihertz` - Refresh rate as reported by the monitor, `60_000` for a 60Hz monitor.
///
/// # Returns
///
/// - `None` when the refresh rate is zero.
#[inline]
#[must_use]
pub fn frame_time_from_refresh_rate(refresh_rate_millihertz: u32) -> Option<Duration> {
    (refresh_rate_millihertz > 0)
        .then(|| Duration::from_secs_f64(1000.0 / f64::from(refresh_rate_millihertz)))
}

/// Clock keeping track of the frame timings.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Moment the previous frame started.
    last_time: Instant,
    /// Smoothed frames per second.
    frames_per_second: f32,
    /// Minimum time between frames, `None` if the presentation already paces the loop.
    target_frame_time: Option<Duration>,
    /// Upper bound of the reported frame time in seconds, `None` to report the real elapsed time.
    max_frame_time_secs: Option<f32>,
}

impl FrameClock {
    /// Start the clock.
    ///
    /// # Arguments
    ///
    /// * `target_frame_time` - Minimum time between frames, `None` to run as fast as the presentation allows.
    #[inline]
    #[must_use]
    pub fn new(target_frame_time: Option<Duration>) -> Self {
        Self {
            last_time: Instant::now(),
            frames_per_second: 0.0,
            target_frame_time,
            max_frame_time_secs: None,
        }
    }

    /// Cap the frame time reported by [`Self::tick`].
    ///
    /// The frames per second are still measured with the real elapsed time.
    #[inline]
    #[must_use]
    pub const fn with_max_frame_time_secs(mut self, max_frame_time_secs: Option<f32>) -> Self {
        self.max_frame_time_secs = max_frame_time_secs;

        self
    }

    /// Mark the start of a new frame.
    ///
    /// # Returns
    ///
    /// - Seconds since the previous frame, capped when a maximum frame time is set.
    #[inline]
    pub fn tick(&mut self) -> f32 {
        let current_time = Instant::now();
        let frame_time = (current_time - self.last_time).as_secs_f32();
        self.last_time = current_time;

        self.record_frame_time(frame_time)
    }

    /// Smoothed amount of frames drawn in a second.
    #[inline]
    #[must_use]
    pub const fn frames_per_second(&self) -> f32 {
        self.frames_per_second
    }

    /// Moment the next frame should start, `None` when it can start immediately.
    #[inline]
    #[must_use]
    pub fn next_frame_deadline(&self) -> Option<Instant> {
        self.target_frame_time
            .map(|target_frame_time| self.last_time + target_frame_time)
    }

    /// Register the duration of a frame and update the FPS average.
    fn record_frame_time(&mut self, frame_time: f32) -> f32 {
        let frame_time = frame_time.max(0.0);

        // Two frames in the same instant tell nothing about the rate
        if frame_time > 0.0 {
            self.frames_per_second = FPS_SMOOTHED_AVERAGE_ALPHA.mul_add(
                self.frames_per_second,
                (1.0 - FPS_SMOOTHED_AVERAGE_ALPHA) * frame_time.recip(),
            );
        }

        self.max_frame_time_secs
            .map_or(frame_time, |max_frame_time_secs| frame_time.min(max_frame_time_secs))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{frame_time_from_refresh_rate, FrameClock};
    use crate::{display::Display, input::Input, scene::Scene, Config};

    #[test]
    fn refresh_rate_to_frame_time() {
        let frame_time = frame_time_from_refresh_rate(60_000).unwrap();
        assert!((frame_time.as_secs_f64() - 1.0 / 60.0).abs() < 1e-9);

        let frame_time = frame_time_from_refresh_rate(143_998).unwrap();
        assert!(frame_time < Duration::from_millis(7));

        assert_eq!(frame_time_from_refresh_rate(0), None);
    }

    #[test]
    fn fps_converges() {
        let mut clock = FrameClock::new(None);

        for _ in 0..200 {
            clock.record_frame_time(1.0 / 60.0);
        }

        assert!((clock.frames_per_second() - 60.0).abs() < 0.01);
    }

    #[test]
    fn frame_time_is_not_capped_by_default() {
        let mut clock = FrameClock::new(None);

        assert_eq!(clock.record_frame_time(3.0), 3.0);
        assert_eq!(clock.record_frame_time(-1.0), 0.0);
    }

    #[test]
    fn long_frame_moves_by_full_time() {
        let config = Config::default();
        let mut display = Display::new(&config, None);
        let mut scene = Scene::new(&config);
        let mut clock = FrameClock::new(None);

        let delta_time = clock.record_frame_time(1.0);
        scene.step(&mut display, &Input::new(), delta_time);

        assert_eq!(scene.rectangle.x, 50.0);
    }

    #[test]
    fn frame_time_is_capped_when_configured() {
        let mut clock = FrameClock::new(None).with_max_frame_time_secs(Some(0.25));

        assert_eq!(clock.record_frame_time(3.0), 0.25);
        assert_eq!(clock.record_frame_time(0.1), 0.1);
    }

    #[test]
    fn stalls_lower_the_fps() {
        let mut clock = FrameClock::new(None).with_max_frame_time_secs(Some(0.25));

        // Stalls of two seconds a frame
        for _ in 0..200 {
            clock.record_frame_time(2.0);
        }

        assert!((clock.frames_per_second() - 0.5).abs() < 0.01);
    }

    #[test]
    fn deadline_follows_target() {
        let clock = FrameClock::new(None);
        assert!(clock.next_frame_deadline().is_none());

        let clock = FrameClock::new(Some(Duration::from_millis(16)));
        assert!(clock.next_frame_deadline().is_some());
    }
}
