//! Back/forward navigation over player snapshots.

/// What back/forward restores: the track and whether the queue panel was open.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct NavigationSnapshot {
    pub index: usize,
    pub queue_open: bool,
}

/// Bounded navigation history.
///
/// `replace` seeds the first entry, `push` records a user transition and
/// clears the forward stack, `back`/`forward` move the cursor and return the
/// snapshot to restore. Restoring never pushes.
#[derive(Debug, Clone)]
pub struct History {
    back: Vec<NavigationSnapshot>,
    current: Option<NavigationSnapshot>,
    forward: Vec<NavigationSnapshot>,
    max_len: usize,
}

impl History {
    pub fn new(max_len: usize) -> Self {
        Self {
            back: Vec::new(),
            current: None,
            forward: Vec::new(),
            max_len: max_len.max(1),
        }
    }

    pub fn current(&self) -> Option<NavigationSnapshot> {
        self.current
    }

    pub fn replace(&mut self, snapshot: NavigationSnapshot) {
        self.current = Some(snapshot);
    }

    pub fn push(&mut self, snapshot: NavigationSnapshot) {
        if self.current == Some(snapshot) {
            return;
        }
        if let Some(prev) = self.current.replace(snapshot) {
            self.back.push(prev);
            if self.back.len() > self.max_len {
                self.back.remove(0);
            }
        }
        self.forward.clear();
    }

    pub fn back(&mut self) -> Option<NavigationSnapshot> {
        let prev = self.back.pop()?;
        if let Some(cur) = self.current.replace(prev) {
            self.forward.push(cur);
        }
        Some(prev)
    }

    pub fn forward(&mut self) -> Option<NavigationSnapshot> {
        let next = self.forward.pop()?;
        if let Some(cur) = self.current.replace(next) {
            self.back.push(cur);
        }
        Some(next)
    }

    #[cfg(test)]
    pub fn can_go_back(&self) -> bool {
        !self.back.is_empty()
    }

    #[cfg(test)]
    pub fn can_go_forward(&self) -> bool {
        !self.forward.is_empty()
    }
}
