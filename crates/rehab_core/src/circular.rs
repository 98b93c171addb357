//! Sequence with wrap-around indexing

use std::ops::Index;

/// A plain sequence whose index wraps in both directions
///
/// Index `len` is the first element again, `-1` is the last one. Any `isize`
/// maps onto an element as long as the list is not empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CircularList<T> {
    items: Vec<T>,
}

impl<T> CircularList<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Map any index onto `0..len`, `None` when empty
    #[inline]
    pub fn wrap(&self, index: isize) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }
        Some(index.rem_euclid(self.items.len() as isize) as usize)
    }

    /// Element at the wrapped index, `None` only when the list is empty
    pub fn get(&self, index: isize) -> Option<&T> {
        self.wrap(index).map(|i| &self.items[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> From<Vec<T>> for CircularList<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> FromIterator<T> for CircularList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> Index<isize> for CircularList<T> {
    type Output = T;

    /// Panics when the list is empty
    fn index(&self, index: isize) -> &T {
        match self.get(index) {
            Some(item) => item,
            None => panic!("index {} into empty CircularList", index),
        }
    }
}
