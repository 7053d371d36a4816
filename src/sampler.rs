//! Proportional sampling without replacement over a binary weight heap.
//!
//! Layout: `heap[i]` holds the total weight of the subtree rooted at item `i` (1-based
//! implicit tree: children of `i` are `2i` and `2i + 1`). Sampling walks down from the root,
//! subtracting item and left-subtree weights from the draw, then zeroes the chosen item and
//! propagates the decrement back up to the root.

use rand::Rng;

/// Totals at or below this are treated as an exhausted sampler.
const EXHAUSTED: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq)]
pub struct WeightedSampler {
    weights: Vec<f64>,
    heap: Vec<f64>,
}

impl WeightedSampler {
    pub fn new(weights: &[f64]) -> Self {
        let mut s = Self { weights: weights.to_vec(), heap: vec![0.0; weights.len()] };
        s.rebuild();
        s
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Remaining (not yet taken) weight mass.
    pub fn total(&self) -> f64 {
        self.heap.first().copied().unwrap_or(0.0)
    }

    pub fn weight(&self, idx: usize) -> f64 {
        self.weights[idx]
    }

    /// Draw an index with probability proportional to its remaining weight, then set that
    /// weight to zero. Returns `None` once the remaining mass is exhausted.
    pub fn take<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<usize> {
        let n = self.weights.len();
        if n == 0 || self.total().abs() <= EXHAUSTED {
            return None;
        }

        let mut r = self.total() * rng.random::<f64>();
        let mut i = 1usize;
        let mut last = 0usize;
        let mut budget = n;
        loop {
            let w = self.weights[i - 1];
            r -= w;
            // A draw of exactly zero must not land on an already-taken item.
            if r < 0.0 || (r == 0.0 && w > 0.0) {
                break;
            }
            i <<= 1;
            if i > n {
                // Drift pushed the draw past the last leaf.
                return None;
            }
            let left = self.heap[i - 1];
            if r > left {
                r -= left;
                i += 1;
                if i > n {
                    return None;
                }
            }
            if i == last || budget == 0 {
                return None;
            }
            last = i;
            budget -= 1;
        }

        let idx = i - 1;
        let w = self.weights[idx];
        self.weights[idx] = 0.0;
        while i > 0 {
            self.heap[i - 1] -= w;
            if self.heap[i - 1] < 0.0 {
                self.rebuild();
                return Some(idx);
            }
            i >>= 1;
        }
        Some(idx)
    }

    /// Set the weight of `idx`, adjusting every ancestor total.
    pub fn reweight(&mut self, idx: usize, w: f64) {
        let delta = self.weights[idx] - w;
        self.weights[idx] = w;
        let mut i = idx + 1;
        while i > 0 {
            self.heap[i - 1] -= delta;
            i >>= 1;
        }
    }

    #[cfg(test)]
    fn set_heap_entry(&mut self, i: usize, v: f64) {
        self.heap[i] = v;
    }

    fn rebuild(&mut self) {
        self.heap.copy_from_slice(&self.weights);
        for i in (1..self.heap.len()).rev() {
            let parent = ((i + 1) >> 1) - 1;
            self.heap[parent] += self.heap[i];
        }
    }
}
