//! Capacity-bounded read-through LRU cache
//!
//! Entries live in an arena; the recency order is an index-linked list so
//! lookup, touch and eviction are all O(1).

use std::collections::HashMap;

struct Entry<V> {
    key: String,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// String-keyed LRU cache that loads missing values on demand
pub struct LruCache<V> {
    capacity: usize,
    map: HashMap<String, usize>,
    entries: Vec<Entry<V>>,
    free: Vec<usize>,
    // head = least recently used, tail = most recently used
    head: Option<usize>,
    tail: Option<usize>,
}

impl<V> LruCache<V> {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "cache capacity must be positive");
        Self {
            capacity,
            map: HashMap::with_capacity(capacity),
            entries: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Cached value for `key`, touching it as most recently used.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let idx = *self.map.get(key)?;
        self.touch(idx);
        Some(&self.entries[idx].value)
    }

    /// Cached value for `key`, or the result of `load`, inserted after
    /// evicting the least recently used entry at capacity.
    pub fn get_or_load(&mut self, key: &str, load: impl FnOnce(&str) -> V) -> &V {
        if let Some(&idx) = self.map.get(key) {
            self.touch(idx);
            return &self.entries[idx].value;
        }

        if self.map.len() >= self.capacity {
            self.evict_oldest();
        }

        let value = load(key);
        let entry = Entry {
            key: key.to_string(),
            value,
            prev: None,
            next: None,
        };
        let idx = match self.free.pop() {
            Some(slot) => {
                self.entries[slot] = entry;
                slot
            }
            None => {
                self.entries.push(entry);
                self.entries.len() - 1
            }
        };
        self.attach_tail(idx);
        self.map.insert(key.to_string(), idx);
        &self.entries[idx].value
    }

    fn touch(&mut self, idx: usize) {
        self.detach(idx);
        self.attach_tail(idx);
    }

    fn detach(&mut self, idx: usize) {
        let (prev, next) = (self.entries[idx].prev, self.entries[idx].next);
        match prev {
            Some(p) => self.entries[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.entries[n].prev = prev,
            None => self.tail = prev,
        }
        self.entries[idx].prev = None;
        self.entries[idx].next = None;
    }

    fn attach_tail(&mut self, idx: usize) {
        self.entries[idx].prev = self.tail;
        self.entries[idx].next = None;
        match self.tail {
            Some(t) => self.entries[t].next = Some(idx),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
    }

    fn evict_oldest(&mut self) {
        let Some(idx) = self.head else { return };
        self.detach(idx);
        self.map.remove(&self.entries[idx].key);
        self.free.push(idx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[test]
    fn read_through_and_eviction() {
        let loads: RefCell<HashMap<String, usize>> = RefCell::new(HashMap::new());
        let loader = |key: &str| {
            *loads.borrow_mut().entry(key.to_string()).or_insert(0) += 1;
            format!("{key}-value")
        };

        let mut cache = LruCache::new(3);
        for key in ["123", "124", "123", "125", "124", "126", "123"] {
            assert_eq!(cache.get_or_load(key, loader), &format!("{key}-value"));
        }

        // 126 evicted 123 (the least recently used), forcing a reload
        assert_eq!(loads.borrow()["123"], 2);
        assert_eq!(loads.borrow()["124"], 1);
        assert_eq!(loads.borrow()["125"], 1);
        assert_eq!(loads.borrow()["126"], 1);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn get_does_not_load() {
        let mut cache: LruCache<String> = LruCache::new(2);
        assert!(cache.get("missing").is_none());
        cache.get_or_load("a", |k| k.to_string());
        assert_eq!(cache.get("a"), Some(&"a".to_string()));
    }
}
