//! Address-bar history with back/forward navigation.

use storedir_core::Location;

#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Location>,
    index: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(Location::new())
    }
}

impl History {
    #[must_use]
    pub fn new(initial: Location) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
        }
    }

    #[must_use]
    pub fn current(&self) -> &Location {
        &self.entries[self.index]
    }

    /// Navigates to `location`, dropping any forward entries.
    ///
    /// Returns `false` and records nothing when `location` is already current.
    pub fn push(&mut self, location: Location) -> bool {
        if *self.current() == location {
            return false;
        }
        self.entries.truncate(self.index + 1);
        self.entries.push(location);
        self.index += 1;
        true
    }

    /// Replaces the current entry without adding history.
    pub fn replace(&mut self, location: Location) {
        self.entries[self.index] = location;
    }

    pub fn back(&mut self) -> Option<&Location> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(self.current())
    }

    pub fn forward(&mut self) -> Option<&Location> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(self.current())
    }

    #[must_use]
    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    #[must_use]
    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }
}
