//! Indexed binary min-heap with decrease-key.
//!
//! Entries are keyed by a slotmap key and ordered by [`Priority`]: shortest
//! distance first, and among equal distances the entry whose oldest road is
//! newest. A `SecondaryMap` tracks each key's heap position so priorities can
//! be lowered in place.

use slotmap::{Key, SecondaryMap};
use std::cmp::Ordering;

/// Search priority of a city: total distance from the source and the
/// minimum road year along the best path found so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Priority {
    pub distance: u64,
    pub year: i32,
}

impl Priority {
    /// The source of a search: zero distance, no road (and so no age) yet.
    pub const SOURCE: Self = Self {
        distance: 0,
        year: i32::MAX,
    };

    /// A city no path has reached yet.
    pub const UNREACHED: Self = Self {
        distance: u64::MAX,
        year: i32::MIN,
    };

    pub fn is_reached(&self) -> bool {
        self.distance != u64::MAX
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .cmp(&other.distance)
            .then_with(|| other.year.cmp(&self.year))
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A min-heap of keys supporting decrease-key.
#[derive(Debug, Clone)]
pub struct PriorityQueue<K: Key> {
    heap: Vec<(Priority, K)>,
    positions: SecondaryMap<K, usize>,
}

impl<K: Key> Default for PriorityQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Key> PriorityQueue<K> {
    pub fn new() -> Self {
        Self {
            heap: Vec::new(),
            positions: SecondaryMap::new(),
        }
    }

    /// Create a queue holding a single source key at [`Priority::SOURCE`].
    pub fn seeded(source: K) -> Self {
        let mut queue = Self::new();
        queue.push(source, Priority::SOURCE);
        queue
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, key: K) -> bool {
        self.positions.contains_key(key)
    }

    /// Current priority of a queued key.
    pub fn priority(&self, key: K) -> Option<Priority> {
        self.positions.get(key).map(|&pos| self.heap[pos].0)
    }

    /// Insert a key. Returns false (and changes nothing) if it is already
    /// queued.
    pub fn push(&mut self, key: K, priority: Priority) -> bool {
        if self.contains(key) {
            return false;
        }
        let pos = self.heap.len();
        self.heap.push((priority, key));
        self.positions.insert(key, pos);
        self.sift_up(pos);
        true
    }

    /// Insert every key not already queued at [`Priority::UNREACHED`].
    pub fn extend_unreached(&mut self, keys: impl IntoIterator<Item = K>) {
        for key in keys {
            if self.contains(key) {
                continue;
            }
            let pos = self.heap.len();
            self.heap.push((Priority::UNREACHED, key));
            self.positions.insert(key, pos);
            self.sift_up(pos);
        }
    }

    /// Remove and return the minimum entry.
    pub fn pop(&mut self) -> Option<(K, Priority)> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.swap(0, last);
        let (priority, key) = self.heap.pop()?;
        self.positions.remove(key);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some((key, priority))
    }

    /// Lower the priority of a queued key.
    ///
    /// Returns false if the key is not queued or `priority` is not lower
    /// than or equal to its current one.
    pub fn decrease(&mut self, key: K, priority: Priority) -> bool {
        let Some(&pos) = self.positions.get(key) else {
            return false;
        };
        if priority > self.heap[pos].0 {
            return false;
        }
        self.heap[pos].0 = priority;
        self.sift_up(pos);
        true
    }

    // -----------------------------------------------------------------------
    // Heap maintenance
    // -----------------------------------------------------------------------

    fn swap(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        self.heap.swap(i, j);
        self.positions.insert(self.heap[i].1, i);
        self.positions.insert(self.heap[j].1, j);
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if self.heap[pos].0 >= self.heap[parent].0 {
                break;
            }
            self.swap(pos, parent);
            pos = parent;
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * pos + 1;
            let right = left + 1;
            let mut smallest = pos;
            if left < len && self.heap[left].0 < self.heap[smallest].0 {
                smallest = left;
            }
            if right < len && self.heap[right].0 < self.heap[smallest].0 {
                smallest = right;
            }
            if smallest == pos {
                break;
            }
            self.swap(pos, smallest);
            pos = smallest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::CityId;
    use slotmap::SlotMap;

    fn keys(n: usize) -> Vec<CityId> {
        let mut sm = SlotMap::<CityId, ()>::with_key();
        (0..n).map(|_| sm.insert(())).collect()
    }

    fn p(distance: u64, year: i32) -> Priority {
        Priority { distance, year }
    }

    #[test]
    fn priority_ordering() {
        assert!(p(1, 0) < p(2, 0));
        // Equal distance: newer minimum year ranks first.
        assert!(p(5, 2010) < p(5, 2000));
        assert!(Priority::SOURCE < p(1, i32::MAX));
        assert!(p(u64::MAX - 1, i32::MIN) < Priority::UNREACHED);
        assert!(!Priority::UNREACHED.is_reached());
    }

    #[test]
    fn pops_in_priority_order() {
        let k = keys(5);
        let mut queue = PriorityQueue::new();
        queue.push(k[0], p(30, 0));
        queue.push(k[1], p(10, 0));
        queue.push(k[2], p(20, 5));
        queue.push(k[3], p(20, 9));
        queue.push(k[4], p(5, 0));

        let order: Vec<CityId> = std::iter::from_fn(|| queue.pop().map(|(key, _)| key)).collect();
        assert_eq!(order, vec![k[4], k[1], k[3], k[2], k[0]]);
        assert!(queue.is_empty());
    }

    #[test]
    fn seeded_then_unreached() {
        let k = keys(4);
        let mut queue = PriorityQueue::seeded(k[0]);
        queue.extend_unreached(k.iter().copied());
        assert_eq!(queue.len(), 4);
        assert_eq!(queue.priority(k[0]), Some(Priority::SOURCE));
        assert_eq!(queue.priority(k[2]), Some(Priority::UNREACHED));

        let (first, priority) = queue.pop().unwrap();
        assert_eq!(first, k[0]);
        assert_eq!(priority, Priority::SOURCE);
        assert!(!queue.contains(k[0]));
    }

    #[test]
    fn decrease_key_reorders() {
        let k = keys(3);
        let mut queue = PriorityQueue::seeded(k[0]);
        queue.extend_unreached([k[1], k[2]]);
        queue.pop();

        assert!(queue.decrease(k[2], p(7, 2000)));
        assert!(queue.decrease(k[1], p(9, 2000)));
        assert_eq!(queue.pop().map(|(key, _)| key), Some(k[2]));

        // Same distance, newer year counts as a decrease.
        assert!(queue.decrease(k[1], p(9, 2010)));
        // Larger priority is refused.
        assert!(!queue.decrease(k[1], p(9, 1990)));
        assert_eq!(queue.priority(k[1]), Some(p(9, 2010)));
    }

    #[test]
    fn decrease_missing_key() {
        let k = keys(2);
        let mut queue = PriorityQueue::seeded(k[0]);
        assert!(!queue.decrease(k[1], p(1, 1)));
        assert!(!queue.push(k[0], p(3, 3)));
    }

    #[test]
    fn many_decreases_keep_heap_valid() {
        let k = keys(64);
        let mut queue = PriorityQueue::new();
        queue.extend_unreached(k.iter().copied());
        for (i, &key) in k.iter().enumerate() {
            let distance = ((i * 37) % 64) as u64;
            assert!(queue.decrease(key, p(distance, 0)));
        }
        let mut last = 0;
        while let Some((_, priority)) = queue.pop() {
            assert!(priority.distance >= last);
            last = priority.distance;
        }
    }
}
