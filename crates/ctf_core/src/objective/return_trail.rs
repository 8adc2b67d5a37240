//! Return trail: positions visited while away from home, newest last.
//!
//! Gradual return walks this list backwards, one sample per step.

use crate::types::Position;

#[derive(Debug, Clone)]
pub struct ReturnTrailTracker {
    samples: Vec<Position>,
    min_dist: f32,
    capacity: usize,
}

impl ReturnTrailTracker {
    pub fn new(min_dist: f32, capacity: usize) -> Self {
        Self {
            samples: Vec::new(),
            min_dist,
            capacity: capacity.max(1),
        }
    }

    pub fn min_dist(&self) -> f32 {
        self.min_dist
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Oldest first
    pub fn samples(&self) -> &[Position] {
        &self.samples
    }

    /// Append a sample, evicting the oldest when full, then prune.
    ///
    /// Returns false when the sample collapsed into its predecessor.
    pub fn record(&mut self, sample: Position) -> bool {
        self.samples.push(sample);
        if self.samples.len() > self.capacity {
            self.samples.remove(0);
        }
        let before = self.samples.len();
        self.prune();
        self.samples.len() == before
    }

    /// Drop the newest sample while it sits within `min_dist` of the one before it
    pub fn prune(&mut self) {
        while self.samples.len() >= 2 {
            let n = self.samples.len();
            if (self.samples[n - 1] - self.samples[n - 2]).norm() < self.min_dist {
                self.samples.pop();
            } else {
                break;
            }
        }
    }

    /// Drop the newest sample if `location` is already within `min_dist` of it
    pub fn discard_if_near(&mut self, location: &Position) -> bool {
        match self.samples.last() {
            Some(last) if (location - last).norm() < self.min_dist => {
                self.samples.pop();
                true
            }
            _ => false,
        }
    }

    pub fn peek_nearest(&self) -> Option<&Position> {
        self.samples.last()
    }

    /// Remove and return the newest sample
    pub fn pop_nearest(&mut self) -> Option<Position> {
        self.samples.pop()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
