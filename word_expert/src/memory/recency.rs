use serde::{Deserialize, Serialize};

/// Most-recently-used ordering. The front is the latest item touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecencyList<T> {
    items: Vec<T>,
    capacity: Option<usize>,
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            capacity: None,
        }
    }
}

impl<T: PartialEq> RecencyList<T> {
    /// An unbounded list.
    pub fn new() -> Self {
        Self::default()
    }

    /// A list that forgets its oldest items beyond `capacity`.
    pub fn bounded(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity: Some(capacity),
        }
    }

    /// Move `item` to the front, inserting it if absent.
    pub fn touch(&mut self, item: T) {
        if let Some(pos) = self.position(&item) {
            self.items.remove(pos);
        }
        self.items.insert(0, item);
        if let Some(capacity) = self.capacity {
            self.items.truncate(capacity);
        }
    }

    pub fn front(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn position(&self, item: &T) -> Option<usize> {
        self.items.iter().position(|i| i == item)
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    /// Items from most to least recent.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_is_front() {
        let mut list = RecencyList::new();
        for i in 0..5 {
            list.touch(i);
            assert_eq!(list.front(), Some(&i));
        }
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_touch_promotes_existing() {
        let mut list = RecencyList::new();
        list.touch("a");
        list.touch("b");
        list.touch("c");
        list.touch("a");

        assert_eq!(list.position(&"a"), Some(0));
        assert_eq!(list.position(&"c"), Some(1));
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_bounded_forgets_oldest() {
        let mut list = RecencyList::bounded(2);
        list.touch(1);
        list.touch(2);
        list.touch(3);

        assert_eq!(list.len(), 2);
        assert!(!list.contains(&1));
        assert_eq!(list.front(), Some(&3));
    }
}
