use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

/// ExpansionState
///
/// The set of navigation groups the user has opened during the current view session.
/// Keys are stable `NavEntry` ids, so two branches that reuse a display name keep
/// independent state. Only explicit toggles change it; the active route never does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    open: HashSet<String>,
}

/// ExpansionHandle
///
/// The per-session expansion state as stored in the application state.
pub type ExpansionHandle = Arc<Mutex<ExpansionState>>;

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// toggle
    ///
    /// Opens a closed id or closes an open one, and returns the new state. Ids that
    /// belong to no tree are accepted like any other.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.open.remove(id) {
            false
        } else {
            self.open.insert(id.to_string());
            true
        }
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.open.contains(id)
    }

    /// Open ids in sorted order.
    pub fn open_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.open.iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Collapses everything. Used when the view session is torn down.
    pub fn clear(&mut self) {
        self.open.clear();
    }
}
