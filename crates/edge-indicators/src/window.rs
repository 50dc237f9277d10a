//! Fixed-capacity ring buffer for rolling windows.

use std::collections::VecDeque;

/// A bounded window over the most recent values.
///
/// Pushing into a full buffer evicts and returns the oldest value.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    values: VecDeque<T>,
    capacity: usize,
}

impl<T: Copy> RingBuffer<T> {
    /// Create an empty buffer holding at most `capacity` values.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than 0");
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a new value, returning the evicted one if the buffer was full.
    pub fn push(&mut self, value: T) -> Option<T> {
        let evicted = if self.values.len() == self.capacity {
            self.values.pop_front()
        } else {
            None
        };
        self.values.push_back(value);
        evicted
    }

    /// Value `n` steps back from the newest (0 = newest).
    pub fn back(&self, n: usize) -> Option<T> {
        let len = self.values.len();
        if n >= len {
            return None;
        }
        self.values.get(len - 1 - n).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check if the window holds `capacity` values.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.values.len() == self.capacity
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl RingBuffer<f64> {
    /// Highest value in the window.
    pub fn max(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::max)
    }

    /// Lowest value in the window.
    pub fn min(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::min)
    }
}
