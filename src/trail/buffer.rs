//! Pointer Trail Buffer
//!
//! Bounded ring buffer of the most recent pointer samples.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

pub const DEFAULT_TRAIL_CAPACITY: usize = 80;

/// A position in device pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Most recent pointer samples, oldest first
#[derive(Debug, Clone)]
pub struct PointerTrail {
    points: VecDeque<Point>,
    capacity: usize,
}

impl Default for PointerTrail {
    fn default() -> Self {
        Self::new(DEFAULT_TRAIL_CAPACITY)
    }
}

impl PointerTrail {
    /// Capacity is at least one sample
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest once full
    pub fn push(&mut self, point: Point) {
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Copy of the samples, oldest first
    pub fn snapshot(&self) -> Vec<Point> {
        self.points.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_oldest() {
        let mut trail = PointerTrail::new(3);
        for i in 0..5 {
            trail.push(Point::new(i as f64, 0.0));
        }

        assert_eq!(trail.len(), 3);
        let xs: Vec<f64> = trail.snapshot().iter().map(|p| p.x).collect();
        assert_eq!(xs, [2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_zero_capacity_holds_one() {
        let mut trail = PointerTrail::new(0);
        trail.push(Point::new(1.0, 1.0));
        trail.push(Point::new(2.0, 2.0));
        assert_eq!(trail.capacity(), 1);
        assert_eq!(trail.snapshot(), [Point::new(2.0, 2.0)]);
    }

    #[test]
    fn test_default_capacity() {
        let mut trail = PointerTrail::default();
        for i in 0..200 {
            trail.push(Point::new(i as f64, i as f64));
        }
        assert_eq!(trail.len(), DEFAULT_TRAIL_CAPACITY);
        trail.clear();
        assert!(trail.is_empty());
    }
}
