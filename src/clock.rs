/*
 * Session Clock Module
 *
 * Elapsed session time, owned by the frame loop and sampled once per frame.
 * The sampled value is handed down through `DrawContext` so every keyframe
 * track of a frame sees the same instant.
 */

use std::time::{Duration, Instant};

pub struct SessionClock {
    started: Instant,
    paused_for: Duration,
    paused_at: Option<Instant>,
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionClock {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            paused_for: Duration::ZERO,
            paused_at: None,
        }
    }

    // Seconds since the session began, excluding paused intervals
    pub fn sample(&self) -> f32 {
        let now = self.paused_at.unwrap_or_else(Instant::now);
        now.duration_since(self.started)
            .saturating_sub(self.paused_for)
            .as_secs_f32()
    }

    pub fn pause(&mut self) {
        if self.paused_at.is_none() {
            self.paused_at = Some(Instant::now());
        }
    }

    pub fn resume(&mut self) {
        if let Some(paused_at) = self.paused_at.take() {
            self.paused_for += paused_at.elapsed();
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_is_monotonic() {
        let clock = SessionClock::new();
        let a = clock.sample();
        let b = clock.sample();
        assert!(b >= a);
    }

    #[test]
    fn paused_clock_stands_still() {
        let mut clock = SessionClock::new();
        clock.pause();
        let a = clock.sample();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(clock.sample(), a);
        clock.resume();
        assert!(!clock.is_paused());
        assert!(clock.sample() >= a);
    }
}
