//! An array-backed binary min-heap whose items can be looked up and re-prioritised in place.
//!
//! [std::collections::BinaryHeap] cannot tell whether an item is queued, nor lower the priority
//! of a queued item, so an A* built on it has to push duplicates and skip stale entries when
//! popping. [IndexedBinaryHeap] instead keeps a map from each resident item's identity to its
//! current slot in the array, which makes [contains](IndexedBinaryHeap::contains) a lookup and
//! [update_item](IndexedBinaryHeap::update_item) a single sift-up.
use fxhash::FxHashMap;
use std::hash::Hash;

#[derive(Clone, Debug)]
pub struct IndexedBinaryHeap<I, K> {
    items: Vec<(I, K)>,
    slots: FxHashMap<I, usize>,
}

impl<I, K> Default for IndexedBinaryHeap<I, K> {
    fn default() -> Self {
        IndexedBinaryHeap {
            items: Vec::new(),
            slots: FxHashMap::default(),
        }
    }
}

impl<I, K> IndexedBinaryHeap<I, K>
where
    I: Copy + Eq + Hash,
    K: Ord,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        IndexedBinaryHeap {
            items: Vec::with_capacity(capacity),
            slots: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.slots.clear();
    }

    /// Whether `id` is currently in the heap.
    pub fn contains(&self, id: &I) -> bool {
        match self.slots.get(id) {
            Some(&slot) => {
                debug_assert!(slot < self.items.len() && self.items[slot].0 == *id);
                true
            }
            None => false,
        }
    }

    /// Current key of a resident item.
    pub fn key_of(&self, id: &I) -> Option<&K> {
        self.slots.get(id).map(|&slot| &self.items[slot].1)
    }

    /// The item with the smallest key, without removing it.
    pub fn peek(&self) -> Option<(&I, &K)> {
        self.items.first().map(|(id, key)| (id, key))
    }

    /// Inserts a new item.
    ///
    /// # Panics
    /// If `id` is already in the heap.
    pub fn add(&mut self, id: I, key: K) {
        let slot = self.items.len();
        let previous = self.slots.insert(id, slot);
        assert!(previous.is_none(), "item added to heap twice");
        self.items.push((id, key));
        self.sift_up(slot);
    }

    /// Removes and returns the item with the smallest key.
    ///
    /// # Panics
    /// If the heap is empty; check [is_empty](Self::is_empty) first.
    pub fn remove_first(&mut self) -> (I, K) {
        assert!(!self.items.is_empty(), "remove_first called on an empty heap");
        let first = self.items.swap_remove(0);
        self.slots.remove(&first.0);
        if !self.items.is_empty() {
            self.slots.insert(self.items[0].0, 0);
            self.sift_down(0);
        }
        first
    }

    /// Lowers the key of a resident item and restores heap order.
    ///
    /// # Panics
    /// If `id` is not in the heap or `key` is larger than its current key.
    pub fn update_item(&mut self, id: I, key: K) {
        let slot = match self.slots.get(&id) {
            Some(&slot) => slot,
            None => panic!("update_item called for an item that is not in the heap"),
        };
        assert!(
            key <= self.items[slot].1,
            "update_item may only decrease the key of an item"
        );
        self.items[slot].1 = key;
        self.sift_up(slot);
    }

    /// Moves the item at `slot` up while its key is strictly smaller than its parent's.
    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if self.items[slot].1 < self.items[parent].1 {
                self.swap(slot, parent);
                slot = parent;
            } else {
                break;
            }
        }
    }

    /// Moves the item at `slot` down below any child with a strictly smaller key. When both
    /// children have equal keys the left one is chosen.
    fn sift_down(&mut self, mut slot: usize) {
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;
            if left >= self.items.len() {
                break;
            }
            let child = if right < self.items.len() && self.items[right].1 < self.items[left].1 {
                right
            } else {
                left
            };
            if self.items[child].1 < self.items[slot].1 {
                self.swap(slot, child);
                slot = child;
            } else {
                break;
            }
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.items.swap(a, b);
        self.slots.insert(self.items[a].0, a);
        self.slots.insert(self.items[b].0, b);
    }

    /// Checks that every slot entry points at its item and that no child is smaller than its parent.
    #[cfg(test)]
    fn assert_invariants(&self) {
        assert_eq!(self.slots.len(), self.items.len());
        for (slot, (id, key)) in self.items.iter().enumerate() {
            assert_eq!(self.slots[id], slot);
            if slot > 0 {
                assert!(self.items[(slot - 1) / 2].1 <= *key);
            }
        }
    }
}
