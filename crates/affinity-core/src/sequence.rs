// crates/affinity-core/src/sequence.rs
//
// Auto-growing, index-addressable sparse sequence.
//
// Writing past the end fills the intervening slots with gaps instead of
// failing, so a ledger can be indexed directly by entity id without
// allocating a dense id-by-id matrix up front. There is no removal.

use crate::error::AffinityError;

/// A growable sequence of optional cells addressed by index.
///
/// Two sizes are tracked separately:
/// - `len`: one past the highest index holding a value (0 when empty).
/// - `occupied`: how many indices hold a value.
///
/// `occupied <= len <= slots.len()` holds after every operation.
/// The `Option` tag on each slot is the presence marker; a gap is `None`.
#[derive(Debug, Clone)]
pub struct SparseSequence<T> {
    slots: Vec<Option<T>>,
    len: usize,
    occupied: usize,
    /// Bumped on every structural change (length or occupied count).
    generation: u64,
    /// Fallback for `get_or_default`, fixed at construction.
    default: Option<T>,
}

impl<T> SparseSequence<T> {
    /// Create an empty sequence with no default value.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            len: 0,
            occupied: 0,
            generation: 0,
            default: None,
        }
    }

    /// Create an empty sequence whose `get_or_default` falls back to `default`.
    pub fn with_default(default: T) -> Self {
        Self {
            default: Some(default),
            ..Self::new()
        }
    }

    /// The value at `index`, or `None` for gaps and out-of-range indices.
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.len {
            self.slots[index].as_ref()
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index < self.len {
            self.slots[index].as_mut()
        } else {
            None
        }
    }

    /// Borrow two cells mutably at once, in argument order.
    ///
    /// When `a == b` the cell is returned once, in the first position.
    pub fn get_pair_mut(&mut self, a: usize, b: usize) -> (Option<&mut T>, Option<&mut T>) {
        if a == b {
            return (self.get_mut(a), None);
        }
        let (lo, hi) = (a.min(b), a.max(b));
        if lo >= self.len {
            return (None, None);
        }
        if hi >= self.len {
            let low = self.slots[lo].as_mut();
            return if a < b { (low, None) } else { (None, low) };
        }
        let (left, right) = self.slots.split_at_mut(hi);
        let low = left[lo].as_mut();
        let high = right[0].as_mut();
        if a < b {
            (low, high)
        } else {
            (high, low)
        }
    }

    /// The value at `index`, else the configured default.
    ///
    /// Fails with `AffinityError::Configuration` when neither exists.
    pub fn get_or_default(&self, index: usize) -> Result<&T, AffinityError> {
        self.get(index).or(self.default.as_ref()).ok_or_else(|| {
            AffinityError::Configuration(format!(
                "no value at index {} and no default configured",
                index
            ))
        })
    }

    /// Write `value` at `index`, growing with gaps as needed.
    ///
    /// `None` is a no-op: cells cannot be cleared through `set`.
    /// Returns the value previously held at `index`.
    pub fn set(&mut self, index: usize, value: Option<T>) -> Option<T> {
        match value {
            Some(value) => self.insert(index, value),
            None => None,
        }
    }

    /// Write a present value at `index`. Returns the previous value.
    pub fn insert(&mut self, index: usize, value: T) -> Option<T> {
        if self.slots.len() <= index {
            self.slots.resize_with(index + 1, || None);
        }
        let previous = self.slots[index].replace(value);
        let new_cell = previous.is_none();
        if new_cell {
            self.occupied += 1;
        }
        self.update_len(new_cell);
        previous
    }

    /// The value at `index`, inserting `f()` first if the slot is a gap.
    pub fn get_or_insert_with<F>(&mut self, index: usize, f: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        if self.slots.len() <= index {
            self.slots.resize_with(index + 1, || None);
        }
        if self.slots[index].is_none() {
            self.occupied += 1;
            self.len = self.len.max(index + 1);
            self.generation += 1;
        }
        self.slots[index].get_or_insert_with(f)
    }

    /// Append after the last backing slot and return the new index.
    pub fn add(&mut self, value: T) -> usize {
        self.slots.push(Some(value));
        self.occupied += 1;
        self.update_len(true);
        self.slots.len() - 1
    }

    fn update_len(&mut self, new_cell: bool) {
        let old_len = self.len;
        self.len = self.slots.len();
        while self.len > 0 && self.slots[self.len - 1].is_none() {
            self.len -= 1;
        }
        if new_cell || old_len != self.len {
            self.generation += 1;
        }
    }

    /// Whether `index` holds a value.
    pub fn has(&self, index: usize) -> bool {
        index < self.len && self.slots[index].is_some()
    }

    /// Logical length: one past the highest occupied index.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of indices holding a value.
    pub fn occupied(&self) -> usize {
        self.occupied
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocated backing capacity.
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Reserve backing space for at least `capacity` slots.
    ///
    /// Does not create cells or change `len`/`occupied`.
    pub fn ensure_capacity(&mut self, capacity: usize) {
        if capacity > self.slots.len() {
            self.slots.reserve(capacity - self.slots.len());
        }
    }

    /// Drop every cell and reset length, occupied count and generation.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.len = 0;
        self.occupied = 0;
        self.generation = 0;
    }

    /// Structural modification counter.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Present cells in index order, paired with their index.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        self.slots[..self.len]
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|v| (i, v)))
    }

    /// Present values in index order.
    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Every backing slot, gaps included.
    pub fn slots(&self) -> impl Iterator<Item = Option<&T>> + '_ {
        self.slots.iter().map(Option::as_ref)
    }

    /// A detached cursor that fails once this sequence changes structure.
    pub fn cursor(&self) -> SequenceCursor {
        SequenceCursor {
            position: 0,
            end: self.len,
            expected: self.generation,
        }
    }
}

impl<T: PartialEq> SparseSequence<T> {
    pub fn contains(&self, value: &T) -> bool {
        self.values().any(|v| v == value)
    }
}

impl<T> Default for SparseSequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Extend<T> for SparseSequence<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

impl<T> FromIterator<T> for SparseSequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut seq = Self::new();
        seq.extend(iter);
        seq
    }
}

/// Iteration state held apart from the sequence it walks.
///
/// Captures the sequence's generation and length at creation. Each step
/// re-checks the generation and yields `AffinityError::ConcurrentMutation`
/// if the sequence changed structure in between.
#[derive(Debug, Clone)]
pub struct SequenceCursor {
    position: usize,
    end: usize,
    expected: u64,
}

impl SequenceCursor {
    fn check<T>(&self, seq: &SparseSequence<T>) -> Result<(), AffinityError> {
        if seq.generation != self.expected {
            return Err(AffinityError::ConcurrentMutation {
                expected: self.expected,
                found: seq.generation,
            });
        }
        Ok(())
    }

    /// Advance to the next present cell.
    pub fn next_in<'a, T>(
        &mut self,
        seq: &'a SparseSequence<T>,
    ) -> Option<Result<(usize, &'a T), AffinityError>> {
        if let Err(e) = self.check(seq) {
            return Some(Err(e));
        }
        while self.position < self.end {
            let index = self.position;
            self.position += 1;
            if let Some(value) = seq.get(index) {
                return Some(Ok((index, value)));
            }
        }
        None
    }

    /// Visit every remaining present cell, then leave the cursor exhausted.
    pub fn for_each_remaining<T, F>(
        &mut self,
        seq: &SparseSequence<T>,
        mut f: F,
    ) -> Result<(), AffinityError>
    where
        F: FnMut(usize, &T),
    {
        self.check(seq)?;
        for index in self.position..self.end {
            if let Some(value) = seq.get(index) {
                f(index, value);
            }
        }
        self.position = self.end;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_grows_with_gaps() {
        let mut seq = SparseSequence::new();
        seq.set(5, Some(50));
        assert_eq!(seq.len(), 6);
        assert_eq!(seq.occupied(), 1);
        for i in 0..5 {
            assert_eq!(seq.get(i), None);
            assert!(!seq.has(i));
        }
        assert_eq!(seq.get(5), Some(&50));
        assert!(seq.has(5));
    }

    #[test]
    fn growth_invariant_holds_for_arbitrary_writes() {
        let mut seq = SparseSequence::new();
        let mut highest = 0;
        for &i in &[3usize, 0, 17, 4, 17, 9, 2, 40, 1] {
            seq.set(i, Some(i as u32));
            highest = highest.max(i);
            assert!(seq.occupied() <= seq.len());
            assert_eq!(seq.len() - 1, highest);
            assert!(seq.len() <= seq.slots().count());
        }
        assert_eq!(seq.occupied(), 8);
    }

    #[test]
    fn out_of_range_get_is_none() {
        let seq: SparseSequence<u8> = SparseSequence::new();
        assert_eq!(seq.get(0), None);
        assert_eq!(seq.get(usize::MAX), None);
        assert!(!seq.has(1000));
    }

    #[test]
    fn set_none_is_noop() {
        let mut seq = SparseSequence::new();
        seq.set(2, Some('a'));
        let generation = seq.generation();
        assert_eq!(seq.set(2, None), None);
        assert_eq!(seq.set(10, None), None);
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.occupied(), 1);
        assert_eq!(seq.get(2), Some(&'a'));
        assert_eq!(seq.generation(), generation);
    }

    #[test]
    fn overwrite_keeps_counts() {
        let mut seq = SparseSequence::new();
        seq.insert(1, 10);
        let generation = seq.generation();
        assert_eq!(seq.insert(1, 11), Some(10));
        assert_eq!(seq.occupied(), 1);
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.generation(), generation);
    }

    #[test]
    fn get_or_insert_with_fills_gap_once() {
        let mut seq = SparseSequence::new();
        seq.insert(0, 1);
        *seq.get_or_insert_with(4, || 40) += 1;
        assert_eq!(seq.get(4), Some(&41));
        assert_eq!(seq.len(), 5);
        assert_eq!(seq.occupied(), 2);
        let generation = seq.generation();
        assert_eq!(*seq.get_or_insert_with(4, || 0), 41);
        assert_eq!(seq.generation(), generation);
        assert_eq!(seq.occupied(), 2);
    }

    #[test]
    fn add_appends_after_backing_end() {
        let mut seq = SparseSequence::new();
        seq.insert(3, "x");
        assert_eq!(seq.add("y"), 4);
        assert_eq!(seq.add("z"), 5);
        assert_eq!(seq.len(), 6);
        assert_eq!(seq.occupied(), 3);
        let values: Vec<_> = seq.values().copied().collect();
        assert_eq!(values, vec!["x", "y", "z"]);
    }

    #[test]
    fn get_or_default_falls_back() {
        let mut seq = SparseSequence::with_default(7);
        seq.insert(1, 3);
        assert_eq!(seq.get_or_default(1), Ok(&3));
        assert_eq!(seq.get_or_default(0), Ok(&7));
        assert_eq!(seq.get_or_default(99), Ok(&7));
    }

    #[test]
    fn get_or_default_without_default_is_configuration_error() {
        let seq: SparseSequence<i32> = SparseSequence::new();
        assert!(matches!(
            seq.get_or_default(0),
            Err(AffinityError::Configuration(_))
        ));
    }

    #[test]
    fn clear_resets_everything() {
        let mut seq = SparseSequence::with_default(0);
        seq.insert(4, 1);
        seq.add(2);
        seq.clear();
        assert_eq!(seq.len(), 0);
        assert_eq!(seq.occupied(), 0);
        assert_eq!(seq.generation(), 0);
        assert!(seq.is_empty());
        assert_eq!(seq.get(4), None);
        assert_eq!(seq.get_or_default(4), Ok(&0));
    }

    #[test]
    fn ensure_capacity_creates_no_cells() {
        let mut seq: SparseSequence<u64> = SparseSequence::new();
        seq.ensure_capacity(512);
        assert!(seq.capacity() >= 512);
        assert_eq!(seq.len(), 0);
        assert_eq!(seq.occupied(), 0);
        assert_eq!(seq.slots().count(), 0);
    }

    #[test]
    fn iter_skips_gaps_in_index_order() {
        let mut seq = SparseSequence::new();
        seq.insert(6, 'c');
        seq.insert(0, 'a');
        seq.insert(3, 'b');
        let items: Vec<_> = seq.iter().map(|(i, v)| (i, *v)).collect();
        assert_eq!(items, vec![(0, 'a'), (3, 'b'), (6, 'c')]);
        // Each call starts fresh.
        assert_eq!(seq.iter().count(), 3);
    }

    #[test]
    fn cursor_walks_present_cells() {
        let mut seq = SparseSequence::new();
        seq.insert(1, 10);
        seq.insert(4, 40);
        let mut cursor = seq.cursor();
        assert_eq!(cursor.next_in(&seq), Some(Ok((1, &10))));
        assert_eq!(cursor.next_in(&seq), Some(Ok((4, &40))));
        assert_eq!(cursor.next_in(&seq), None);
    }

    #[test]
    fn cursor_fails_after_structural_change() {
        let mut seq = SparseSequence::new();
        seq.insert(0, 1);
        seq.insert(2, 3);
        let mut cursor = seq.cursor();
        assert_eq!(cursor.next_in(&seq), Some(Ok((0, &1))));
        seq.insert(5, 6);
        assert!(matches!(
            cursor.next_in(&seq),
            Some(Err(AffinityError::ConcurrentMutation { .. }))
        ));
    }

    #[test]
    fn cursor_tolerates_value_overwrite() {
        let mut seq = SparseSequence::new();
        seq.insert(0, 1);
        seq.insert(1, 2);
        let mut cursor = seq.cursor();
        seq.insert(1, 20);
        assert_eq!(cursor.next_in(&seq), Some(Ok((0, &1))));
        assert_eq!(cursor.next_in(&seq), Some(Ok((1, &20))));
    }

    #[test]
    fn for_each_remaining_visits_rest() {
        let mut seq = SparseSequence::new();
        seq.insert(0, 1);
        seq.insert(2, 3);
        seq.insert(3, 4);
        let mut cursor = seq.cursor();
        cursor.next_in(&seq);
        let mut seen = Vec::new();
        cursor
            .for_each_remaining(&seq, |i, v| seen.push((i, *v)))
            .unwrap();
        assert_eq!(seen, vec![(2, 3), (3, 4)]);
        assert_eq!(cursor.next_in(&seq), None);
    }

    #[test]
    fn for_each_remaining_fails_after_structural_change() {
        let mut seq = SparseSequence::new();
        seq.insert(0, 1);
        let mut cursor = seq.cursor();
        seq.add(2);
        let result = cursor.for_each_remaining(&seq, |_, _| {});
        assert_eq!(
            result,
            Err(AffinityError::ConcurrentMutation { expected: 1, found: 2 })
        );
    }

    #[test]
    fn get_pair_mut_borrows_both_orders() {
        let mut seq = SparseSequence::new();
        seq.insert(1, 10);
        seq.insert(5, 50);
        {
            let (a, b) = seq.get_pair_mut(5, 1);
            *a.unwrap() += 1;
            *b.unwrap() += 2;
        }
        assert_eq!(seq.get(5), Some(&51));
        assert_eq!(seq.get(1), Some(&12));

        let (a, b) = seq.get_pair_mut(1, 1);
        assert_eq!(a, Some(&mut 12));
        assert_eq!(b, None);
    }

    #[test]
    fn get_pair_mut_handles_missing_cells() {
        let mut seq = SparseSequence::new();
        seq.insert(2, 'x');
        let (a, b) = seq.get_pair_mut(9, 2);
        assert_eq!(a, None);
        assert_eq!(b, Some(&mut 'x'));
        let (a, b) = seq.get_pair_mut(0, 2);
        assert_eq!(a, None);
        assert_eq!(b, Some(&mut 'x'));
    }

    #[test]
    fn contains_ignores_gaps() {
        let seq: SparseSequence<i32> = vec![4, 5].into_iter().collect();
        assert!(seq.contains(&5));
        assert!(!seq.contains(&6));
        assert_eq!(seq.len(), 2);
    }
}
