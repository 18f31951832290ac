/* Two clocks, one gain line
   =========================

   The scheduler runs on the wall clock and commits events stamped with
   playback-clock seconds; the render loop runs on the playback clock and
   consumes them. A gain line is the meeting point: an ordered queue of
   "be at this level at this time" events, evaluated per sample.

   A scheduled note is four events on its slot's line (d = note seconds):

   1.0        __________
             /          \
   0.0  ____/            \____
            ^ ^         ^ ^
        start +0.2d +0.5d +d

   Set events jump at their deadline. Ramp events slide linearly from
   wherever the line last was, reaching the target at the deadline.
*/

use std::collections::VecDeque;

const EVENT_CAPACITY: usize = 64;

/// Levels at or below this count as silence.
pub const SILENCE_FLOOR: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
struct GainEvent {
    at: f64,
    level: f32,
    ramp: bool,
}

/// Timestamped gain automation for one generator.
///
/// Events must be pushed in non-decreasing time order; the scheduler walks
/// each track strictly forward, so that holds by construction. Evaluation
/// is destructive: [`GainLine::level_at`] consumes events as the clock
/// passes them.
#[derive(Debug)]
pub struct GainLine {
    events: VecDeque<GainEvent>,
    anchor_level: f32,
    anchor_time: f64,
}

impl Default for GainLine {
    fn default() -> Self {
        Self::new()
    }
}

impl GainLine {
    pub fn new() -> Self {
        Self {
            events: VecDeque::with_capacity(EVENT_CAPACITY),
            anchor_level: 0.0,
            anchor_time: 0.0,
        }
    }

    /// Jump to `level` once the clock reaches `at`.
    pub fn set_at(&mut self, level: f32, at: f64) {
        self.push(GainEvent {
            at,
            level,
            ramp: false,
        });
    }

    /// Slide linearly to `level`, arriving when the clock reaches `at`.
    /// The slide starts from the previous event's time and level.
    pub fn ramp_to(&mut self, level: f32, at: f64) {
        self.push(GainEvent {
            at,
            level,
            ramp: true,
        });
    }

    fn push(&mut self, event: GainEvent) {
        debug_assert!(
            self.events.back().map_or(true, |last| event.at >= last.at),
            "gain events pushed out of time order"
        );
        self.events.push_back(event);
    }

    /// Drop every pending event and go silent now.
    pub fn cancel(&mut self) {
        self.events.clear();
        self.anchor_level = 0.0;
    }

    /// True when nothing is pending and the level has settled at silence.
    pub fn is_silent(&self) -> bool {
        self.events.is_empty() && self.anchor_level <= SILENCE_FLOOR
    }

    /// The gain at playback time `t`, consuming every event `t` has passed.
    ///
    /// Call with non-decreasing `t` only; going backwards cannot revive a
    /// consumed event.
    pub fn level_at(&mut self, t: f64) -> f32 {
        while let Some(event) = self.events.front() {
            if event.at > t {
                break;
            }
            self.anchor_time = event.at;
            self.anchor_level = event.level;
            self.events.pop_front();
        }

        match self.events.front() {
            Some(next) if next.ramp => {
                let span = next.at - self.anchor_time;
                let progress = ((t - self.anchor_time) / span).clamp(0.0, 1.0) as f32;
                self.anchor_level + (next.level - self.anchor_level) * progress
            }
            _ => self.anchor_level,
        }
    }
}
