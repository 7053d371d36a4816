//! Comparator-driven binary heap with in-place priority updates.
//!
//! Entries live in an arena and are addressed by [`Handle`]s that stay valid while the
//! entry is queued; the heap itself stores arena slots, and `pos` maps each slot back to
//! its heap position so [`PriorityQueue::update`] can re-sift in `O(log n)`.

/// Stable reference to a queued entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(usize);

const DETACHED: usize = usize::MAX;

pub struct PriorityQueue<T, F> {
    slots: Vec<Option<T>>,
    pos: Vec<usize>,
    heap: Vec<usize>,
    before: F,
}

impl<T, F> PriorityQueue<T, F>
where
    F: Fn(&T, &T) -> bool,
{
    /// `before(a, b)` returns `true` when `a` must be popped ahead of `b`.
    pub fn new(before: F) -> Self {
        Self { slots: Vec::new(), pos: Vec::new(), heap: Vec::new(), before }
    }

    pub fn with_capacity(capacity: usize, before: F) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            pos: Vec::with_capacity(capacity),
            heap: Vec::with_capacity(capacity),
            before,
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn push(&mut self, value: T) -> Handle {
        let slot = self.slots.len();
        self.slots.push(Some(value));
        self.pos.push(self.heap.len());
        self.heap.push(slot);
        self.sift_up(self.heap.len() - 1);
        Handle(slot)
    }

    pub fn peek(&self) -> Option<&T> {
        self.heap.first().and_then(|&slot| self.slots[slot].as_ref())
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.swap(0, last);
        let slot = self.heap.pop()?;
        self.pos[slot] = DETACHED;
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        self.slots[slot].take()
    }

    /// Current value of a queued entry; `None` once it has been popped.
    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.slots.get(handle.0).and_then(Option::as_ref)
    }

    /// Replace a queued entry's value and restore heap order. Returns `false` if the entry
    /// is no longer queued.
    pub fn update(&mut self, handle: Handle, value: T) -> bool {
        let Some(&i) = self.pos.get(handle.0) else {
            return false;
        };
        if i == DETACHED {
            return false;
        }
        self.slots[handle.0] = Some(value);
        self.sift_up(i);
        self.sift_down(self.pos[handle.0]);
        true
    }

    fn precedes(&self, i: usize, j: usize) -> bool {
        match (&self.slots[self.heap[i]], &self.slots[self.heap[j]]) {
            (Some(a), Some(b)) => (self.before)(a, b),
            _ => false,
        }
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.heap.swap(i, j);
        self.pos[self.heap[i]] = i;
        self.pos[self.heap[j]] = j;
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if !self.precedes(i, parent) {
                break;
            }
            self.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.heap.len();
        loop {
            let l = 2 * i + 1;
            if l >= n {
                break;
            }
            let r = l + 1;
            let mut best = l;
            if r < n && self.precedes(r, l) {
                best = r;
            }
            if !self.precedes(best, i) {
                break;
            }
            self.swap(i, best);
            i = best;
        }
    }
}
