use super::interpolation_ops;
use super::{BufferState, InterpolationMode, Keyframe, KeyframeUpdate};
use nalgebra::{UnitQuaternion, Vector3};
use std::collections::VecDeque;
use uom::si::f64::Time;
use uom::si::ratio::ratio;
use uom::si::time::{millisecond, second};

/// smooths irregularly arriving keyframes of one animated entity into a
/// continuously queryable value.
///
/// playback runs `buffer_time` behind the buffer's own clock. that delay
/// absorbs jitter in keyframe arrival: by the time playback reaches a moment,
/// the keyframe after it has usually arrived.
///
/// queued keyframes are never mutated except when an append lands on the
/// timestamp of the newest one, which coalesces the two. the frame playback
/// is blending away from lives in its own `origin` slot.
#[derive(Debug, Clone)]
pub struct InterpolationBuffer {
    mode: InterpolationMode,
    buffer_time: Time,
    state: BufferState,
    clock: Time,
    mark: Option<Time>,
    queue: VecDeque<Keyframe>,
    origin: Keyframe,
    position: Vector3<f64>,
    orientation: UnitQuaternion<f64>,
    scale: Vector3<f64>,
}

impl InterpolationBuffer {
    pub const DEFAULT_BUFFER_TIME_MS: f64 = 150.0;

    pub fn new(mode: InterpolationMode, buffer_time: Time) -> Self {
        let origin = Keyframe::identity(Time::new::<second>(0.0));
        Self {
            mode,
            buffer_time,
            state: BufferState::Initializing,
            clock: Time::new::<second>(0.0),
            mark: None,
            queue: VecDeque::new(),
            position: origin.position,
            orientation: origin.orientation,
            scale: origin.scale,
            origin,
        }
    }

    /// returns the buffer to `Initializing`, dropping every keyframe
    pub fn reset(&mut self) {
        *self = Self::new(self.mode, self.buffer_time);
    }

    /// appends a keyframe stamped with the buffer's current clock.
    pub fn append_keyframe(&mut self, update: KeyframeUpdate) {
        self.append_keyframe_at(self.clock, update);
    }

    /// appends a keyframe stamped with `timestamp`.
    ///
    /// if the newest queued keyframe carries the same timestamp, only the
    /// supplied components of `update` are written into it. otherwise a new
    /// keyframe is queued whose missing components are copied from its
    /// predecessor (the newest queued keyframe, or the origin when the queue
    /// is empty).
    pub fn append_keyframe_at(&mut self, timestamp: Time, update: KeyframeUpdate) {
        match self.queue.back_mut() {
            Some(tail) if tail.timestamp == timestamp => tail.merge(&update),
            Some(tail) => {
                let next = tail.successor(&update, timestamp);
                self.queue.push_back(next);
            }
            None => {
                let next = self.origin.successor(&update, timestamp);
                self.queue.push_back(next);
            }
        }
    }

    /// advances the clock by `delta` and recomputes the current value.
    /// expected to be called on a steady cadence, e.g. once per rendered frame.
    pub fn update(&mut self, delta: Time) {
        if self.state == BufferState::Initializing {
            if let Some(first) = self.queue.pop_front() {
                self.position = first.position;
                self.orientation = first.orientation;
                self.scale = first.scale;
                self.origin = first;
                self.state = BufferState::Buffering;
            }
        }

        if self.state == BufferState::Buffering
            && !self.queue.is_empty()
            && self.clock > self.buffer_time
        {
            self.state = BufferState::Playing;
        }

        if self.state == BufferState::Playing {
            let mark = self.clock - self.buffer_time;
            self.expire(mark, delta);
            self.blend(mark);
            self.mark = Some(mark);
        }

        if self.state != BufferState::Initializing {
            self.clock += delta;
        }
    }

    /// drops keyframes that playback has moved past. the last keyframe is
    /// never dropped: it becomes the origin and is re-queued one step ahead,
    /// so playback holds the last known value until new keyframes arrive.
    fn expire(&mut self, mark: Time, delta: Time) {
        while let Some(front) = self.queue.front() {
            if mark <= front.timestamp {
                break;
            }
            if self.queue.len() > 1 {
                if let Some(expired) = self.queue.pop_front() {
                    self.origin = expired;
                }
            } else {
                let mut held = front.clone();
                self.origin = front.clone();
                held.timestamp = self.clock + delta;
                self.queue[0] = held;
                break;
            }
        }
    }

    fn blend(&mut self, mark: Time) {
        let Some(target) = self.queue.front() else {
            return;
        };
        if target.timestamp.get::<second>() <= 0.0 {
            return;
        }
        let span = target.timestamp - self.origin.timestamp;
        let alpha = if span.get::<second>() > 0.0 {
            ((mark - self.origin.timestamp) / span)
                .get::<ratio>()
                .clamp(0.0, 1.0)
        } else {
            1.0
        };

        self.position = match self.mode {
            InterpolationMode::Lerp => {
                interpolation_ops::lerp(&self.origin.position, &target.position, alpha)
            }
            InterpolationMode::Hermite => {
                let dt = span.get::<second>();
                interpolation_ops::hermite(
                    &self.origin.position,
                    &target.position,
                    &(self.origin.velocity * dt),
                    &(target.velocity * dt),
                    alpha,
                )
            }
        };
        self.orientation =
            interpolation_ops::slerp(&self.origin.orientation, &target.orientation, alpha);
        self.scale = interpolation_ops::lerp(&self.origin.scale, &target.scale, alpha);
    }

    pub fn current_position(&self) -> Vector3<f64> {
        self.position
    }

    pub fn current_orientation(&self) -> UnitQuaternion<f64> {
        self.orientation
    }

    pub fn current_scale(&self) -> Vector3<f64> {
        self.scale
    }

    pub fn state(&self) -> BufferState {
        self.state
    }

    pub fn mode(&self) -> InterpolationMode {
        self.mode
    }

    pub fn clock(&self) -> Time {
        self.clock
    }

    /// the playback time used by the most recent `update`, once playing
    pub fn playback_mark(&self) -> Option<Time> {
        self.mark
    }

    /// keyframes queued ahead of the origin
    pub fn queued(&self) -> usize {
        self.queue.len()
    }
}

impl Default for InterpolationBuffer {
    fn default() -> Self {
        Self::new(
            InterpolationMode::default(),
            Time::new::<millisecond>(Self::DEFAULT_BUFFER_TIME_MS),
        )
    }
}
