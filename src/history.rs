//! Navigation history for in-page "back".

use std::collections::VecDeque;

use crate::navigator::LoadOptions;

/// Default number of entries kept before the oldest is dropped.
pub const DEFAULT_CAPACITY: usize = 64;

/// A replayable navigation: loading `page` again with the same options
/// reproduces the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub page: String,
    pub options: LoadOptions,
}

impl NavEntry {
    pub fn new(page: impl Into<String>, options: LoadOptions) -> Self {
        Self {
            page: page.into(),
            options,
        }
    }
}

/// Bounded stack of navigation entries.
///
/// Pushing onto a full history drops the oldest entry. Popping an empty
/// history yields `None`.
#[derive(Debug, Clone)]
pub struct NavigationHistory {
    entries: VecDeque<NavEntry>,
    capacity: usize,
}

impl NavigationHistory {
    /// Create a history holding at most `capacity` entries (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            capacity,
        }
    }

    pub fn push(&mut self, entry: NavEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn pop(&mut self) -> Option<NavEntry> {
        self.entries.pop_back()
    }

    /// Forget every entry, e.g. once the page holding them is gone.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The entry for the current view.
    pub fn current(&self) -> Option<&NavEntry> {
        self.entries.back()
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

    /// Entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &NavEntry> {
        self.entries.iter()
    }
}

impl Default for NavigationHistory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
