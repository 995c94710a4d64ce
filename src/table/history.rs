/// Where the table mirrors its state as a query string (without `?`).
pub trait UrlNavigator: Send {
    fn current(&self) -> String;

    /// Record a new history entry.
    fn push(&mut self, query: String);

    /// Overwrite the current entry.
    fn replace(&mut self, query: String);

    fn back(&mut self) -> bool {
        false
    }

    fn forward(&mut self) -> bool {
        false
    }
}

/// Back/forward history kept in memory.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<String>,
    index: usize,
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("")
    }
}

impl MemoryHistory {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
            index: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl UrlNavigator for MemoryHistory {
    fn current(&self) -> String {
        self.entries.get(self.index).cloned().unwrap_or_default()
    }

    fn push(&mut self, query: String) {
        if self.current() == query {
            return;
        }
        self.entries.truncate(self.index + 1);
        self.entries.push(query);
        self.index = self.entries.len() - 1;
    }

    fn replace(&mut self, query: String) {
        match self.entries.get_mut(self.index) {
            Some(entry) => *entry = query,
            None => self.entries.push(query),
        }
    }

    fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_after_back_drops_forward_entries() {
        let mut history = MemoryHistory::default();
        history.push("page=2".into());
        history.push("page=3".into());
        assert!(history.back());
        assert_eq!(history.current(), "page=2");
        history.push("page=5".into());
        assert!(!history.forward());
        assert_eq!(history.len(), 3);
    }
}
