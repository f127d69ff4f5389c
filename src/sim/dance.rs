//! Scripted waypoint paths ("dances") for enemies and debris
//!
//! A dance is a queue of eased segments. Each tick the path is advanced by the
//! elapsed time; leftover time carries into the next segment so long frames
//! never stall a path. Once the final waypoint is reached the path reports
//! `Exhausted` and the owning entity is expected to leave the world.

use std::collections::VecDeque;
use std::f32::consts::PI;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Interpolation curve applied to a segment's normalized time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    Linear,
    QuadInOut,
    #[default]
    SineInOut,
}

impl Easing {
    /// Map `t` in [0, 1] to eased progress in [0, 1]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
        }
    }
}

/// One leg of a dance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub target: Vec2,
    /// Seconds to travel from the previous waypoint
    pub duration: f32,
    pub easing: Easing,
}

/// Result of advancing a path
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathStatus {
    /// Still travelling; carries the new position
    Moving(Vec2),
    /// Final waypoint reached; carries the resting position
    Exhausted(Vec2),
}

impl PathStatus {
    pub fn position(&self) -> Vec2 {
        match *self {
            PathStatus::Moving(pos) | PathStatus::Exhausted(pos) => pos,
        }
    }
}

/// A queued multi-waypoint trajectory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DancePath {
    /// Start of the current segment
    origin: Vec2,
    waypoints: VecDeque<Waypoint>,
    /// Seconds spent in the current segment
    elapsed: f32,
}

impl DancePath {
    pub fn new(start: Vec2) -> Self {
        Self {
            origin: start,
            waypoints: VecDeque::new(),
            elapsed: 0.0,
        }
    }

    /// Append a waypoint (builder style)
    pub fn then(mut self, target: Vec2, duration: f32, easing: Easing) -> Self {
        self.push(Waypoint {
            target,
            duration: duration.max(0.0),
            easing,
        });
        self
    }

    pub fn push(&mut self, waypoint: Waypoint) {
        self.waypoints.push_back(waypoint);
    }

    /// Waypoints not yet reached
    pub fn remaining(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Waypoints not yet reached, in travel order
    pub fn waypoints(&self) -> impl Iterator<Item = &Waypoint> {
        self.waypoints.iter()
    }

    /// The waypoint currently being travelled towards
    pub fn current_target(&self) -> Option<Vec2> {
        self.waypoints.front().map(|w| w.target)
    }

    /// Advance the path by `dt` seconds
    pub fn advance(&mut self, dt: f32) -> PathStatus {
        let mut dt = dt.max(0.0);

        while let Some(segment) = self.waypoints.front().copied() {
            let left = (segment.duration - self.elapsed).max(0.0);
            if dt < left {
                self.elapsed += dt;
                let t = self.elapsed / segment.duration;
                let eased = segment.easing.apply(t);
                return PathStatus::Moving(self.origin.lerp(segment.target, eased));
            }

            // Segment complete; carry leftover time into the next one
            dt -= left;
            self.origin = segment.target;
            self.elapsed = 0.0;
            self.waypoints.pop_front();
        }

        PathStatus::Exhausted(self.origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in [Easing::Linear, Easing::QuadInOut, Easing::SineInOut] {
            assert!(easing.apply(0.0).abs() < 1e-6, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{easing:?} at 1");
            assert!((easing.apply(0.5) - 0.5).abs() < 1e-6, "{easing:?} at 0.5");
        }
        // Out-of-range input clamps
        assert_eq!(Easing::Linear.apply(2.0), 1.0);
        assert_eq!(Easing::Linear.apply(-1.0), 0.0);
    }

    #[test]
    fn test_ease_in_out_is_slow_at_edges() {
        let early = Easing::SineInOut.apply(0.1);
        assert!(early < 0.1);
        let late = Easing::QuadInOut.apply(0.9);
        assert!(late > 0.9);
    }

    #[test]
    fn test_linear_segment_interpolates() {
        let mut path = DancePath::new(Vec2::ZERO).then(Vec2::new(100.0, 0.0), 1.0, Easing::Linear);
        let status = path.advance(0.25);
        assert!(matches!(status, PathStatus::Moving(_)));
        assert!(approx(status.position(), Vec2::new(25.0, 0.0)));
    }

    #[test]
    fn test_leftover_time_carries_into_next_segment() {
        let mut path = DancePath::new(Vec2::ZERO)
            .then(Vec2::new(10.0, 0.0), 1.0, Easing::Linear)
            .then(Vec2::new(10.0, 10.0), 1.0, Easing::Linear);

        let status = path.advance(1.5);
        assert!(approx(status.position(), Vec2::new(10.0, 5.0)));
        assert_eq!(path.remaining(), 1);
    }

    #[test]
    fn test_exhausted_after_final_waypoint() {
        let mut path = DancePath::new(Vec2::ZERO)
            .then(Vec2::new(0.0, 50.0), 0.5, Easing::SineInOut);

        assert!(matches!(path.advance(0.49), PathStatus::Moving(_)));
        let status = path.advance(0.02);
        assert_eq!(status, PathStatus::Exhausted(Vec2::new(0.0, 50.0)));
        assert!(path.is_exhausted());

        // Further advances keep reporting the resting position
        assert_eq!(path.advance(1.0), PathStatus::Exhausted(Vec2::new(0.0, 50.0)));
    }

    #[test]
    fn test_zero_duration_segment_completes_immediately() {
        let mut path = DancePath::new(Vec2::ZERO).then(Vec2::new(3.0, 4.0), 0.0, Easing::Linear);
        assert_eq!(path.advance(0.0), PathStatus::Exhausted(Vec2::new(3.0, 4.0)));
    }

    #[test]
    fn test_empty_path_is_exhausted() {
        let mut path = DancePath::new(Vec2::new(1.0, 2.0));
        assert_eq!(path.advance(0.016), PathStatus::Exhausted(Vec2::new(1.0, 2.0)));
    }
}
