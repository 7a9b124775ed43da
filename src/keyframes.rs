/*
 * Keyframes Module
 *
 * Looping animation curves made of `(time, value)` keys.
 *
 * Sampling rules:
 * - before the first key the first value holds
 * - between two keys the value is interpolated (lerp for vectors, slerp for
 *   rotations)
 * - past the last key time wraps modulo the last key time, so each track
 *   loops on its own period
 * - a track with a single key is constant, an empty track has no value
 */

use glam::{Quat, Vec3};

use crate::errors::{Result, SceneError};

pub trait Interpolatable: Copy {
    fn interpolate(start: Self, end: Self, t: f32) -> Self;
}

impl Interpolatable for f32 {
    fn interpolate(start: Self, end: Self, t: f32) -> Self {
        start + (end - start) * t
    }
}

impl Interpolatable for Vec3 {
    fn interpolate(start: Self, end: Self, t: f32) -> Self {
        start + (end - start) * t
    }
}

impl Interpolatable for Quat {
    fn interpolate(start: Self, end: Self, t: f32) -> Self {
        start.slerp(end, t)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct KeyFrames<T> {
    times: Vec<f32>,
    values: Vec<T>,
}

impl<T> Default for KeyFrames<T> {
    fn default() -> Self {
        Self {
            times: Vec::new(),
            values: Vec::new(),
        }
    }
}

impl<T: Interpolatable> KeyFrames<T> {
    // Build a track, rejecting keys whose times are not strictly increasing.
    // `track` names the track in the error.
    pub fn new(track: &'static str, keys: impl IntoIterator<Item = (f32, T)>) -> Result<Self> {
        let (times, values): (Vec<f32>, Vec<T>) = keys.into_iter().unzip();

        for (index, pair) in times.windows(2).enumerate() {
            if !(pair[1] > pair[0]) {
                return Err(SceneError::NonIncreasingKeyTimes {
                    track,
                    index: index + 1,
                    previous: pair[0],
                    current: pair[1],
                });
            }
        }
        if let Some(&time) = times.iter().find(|t| !t.is_finite()) {
            return Err(SceneError::InvalidParameter { name: "keyframe time", value: time });
        }

        Ok(Self { times, values })
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    // Loop period: the time of the last key
    pub fn duration(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    pub fn value(&self, time: f32) -> Option<T> {
        let first = *self.values.first()?;
        let last = *self.values.last()?;
        if self.values.len() == 1 || !time.is_finite() {
            return Some(first);
        }

        let duration = self.duration();
        let time = if time > duration {
            if duration <= 0.0 {
                return Some(last);
            }
            time % duration
        } else {
            time
        };

        if time <= self.times[0] {
            return Some(first);
        }

        // First key strictly after `time`
        let next = self.times.partition_point(|&t| t <= time);
        if next >= self.times.len() {
            return Some(last);
        }

        let (t0, t1) = (self.times[next - 1], self.times[next]);
        let fraction = (time - t0) / (t1 - t0);
        Some(T::interpolate(self.values[next - 1], self.values[next], fraction))
    }
}
