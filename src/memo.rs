use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::hash::Hash;

/// Memo table for a pure function.
///
/// Unlike a lossy computed table, entries are never evicted: a key is
/// computed at most once for the lifetime of the table. The borrow is released
/// while the value is computed, so the function may re-enter other memo tables
/// (compositions call into the tables of their operands).
pub struct Memo<K, V> {
    data: RefCell<HashMap<K, V>>,
    hits: Cell<usize>,
    misses: Cell<usize>,
}

impl<K, V> Memo<K, V> {
    pub fn new() -> Self {
        Self {
            data: RefCell::new(HashMap::new()),
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    /// Get the number of cache hits.
    pub fn hits(&self) -> usize {
        self.hits.get()
    }
    /// Get the number of cache misses.
    pub fn misses(&self) -> usize {
        self.misses.get()
    }

    /// Number of memoized entries.
    pub fn len(&self) -> usize {
        self.data.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.borrow().is_empty()
    }
}

impl<K, V> Memo<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Get the memoized value for `key`, computing it with `f` on the first request.
    pub fn get_or_insert_with(&self, key: K, f: impl FnOnce(&K) -> V) -> V {
        if let Some(value) = self.data.borrow().get(&key) {
            self.hits.set(self.hits.get() + 1);
            return value.clone();
        }
        self.misses.set(self.misses.get() + 1);
        let value = f(&key);
        // A re-entrant call may have filled the slot meanwhile; the first value wins.
        self.data.borrow_mut().entry(key).or_insert(value).clone()
    }
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memo() {
        let calls = Cell::new(0);
        let memo = Memo::<(u64, u64), u64>::new();
        let add = |&(a, b): &(u64, u64)| {
            calls.set(calls.get() + 1);
            a + b
        };

        assert_eq!(memo.get_or_insert_with((1, 2), add), 3);
        assert_eq!(memo.get_or_insert_with((2, 3), add), 5);
        assert_eq!(memo.get_or_insert_with((1, 2), add), 3);
        assert_eq!(memo.get_or_insert_with((1, 2), add), 3);

        assert_eq!(calls.get(), 2);
        assert_eq!(memo.len(), 2);
        assert_eq!(memo.hits(), 2);
        assert_eq!(memo.misses(), 2);
    }

    #[test]
    fn test_memo_reentrant() {
        let memo = Memo::<u64, u64>::new();
        let value = memo.get_or_insert_with(10, |&n| memo.get_or_insert_with(n + 1, |&m| m * 2) + 1);
        assert_eq!(value, 23);
        assert_eq!(memo.get_or_insert_with(11, |_| unreachable!()), 22);
        assert!(!memo.is_empty());
    }
}
