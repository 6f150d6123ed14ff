/// Newest-first sequence holding at most `capacity` entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentList<T> {
    entries: Vec<T>,
    capacity: usize,
}

impl<T> RecentList<T> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        RecentList {
            entries: Vec::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Build from entries already ordered newest-first, keeping the first
    /// `capacity` of them.
    pub fn from_newest_first(entries: impl IntoIterator<Item = T>, capacity: usize) -> Self {
        let mut list = Self::new(capacity);
        list.entries.extend(entries.into_iter().take(list.capacity));
        list
    }

    /// Insert at the front and return whatever fell off the back.
    pub fn push_front(&mut self, entry: T) -> Vec<T> {
        self.entries.insert(0, entry);
        if self.entries.len() > self.capacity {
            self.entries.split_off(self.capacity)
        } else {
            Vec::new()
        }
    }

    /// Remove the first entry matching `predicate`.
    pub fn remove_first<F>(&mut self, predicate: F) -> Option<T>
    where
        F: Fn(&T) -> bool,
    {
        let index = self.entries.iter().position(predicate)?;
        Some(self.entries.remove(index))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn as_slice(&self) -> &[T] {
        &self.entries
    }
}
