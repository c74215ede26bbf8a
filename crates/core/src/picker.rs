//! Cascading definition -> step -> role/transition selection.
//!
//! Each level filters the options of the next one. Changing a selection
//! clears every selection below it; re-selecting the current value is a
//! no-op.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// Current picker selections, top to bottom.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadingSelection {
    pub definition_id: Option<DbId>,
    pub step_id: Option<DbId>,
    pub role_name: Option<String>,
    pub transition_id: Option<DbId>,
}

impl CascadingSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a definition; clears step, role and transition when it changes.
    pub fn select_definition(&mut self, definition_id: Option<DbId>) {
        if self.definition_id != definition_id {
            self.definition_id = definition_id;
            self.clear_step();
        }
    }

    /// Select a step; clears role and transition when it changes.
    ///
    /// Ignored while no definition is selected.
    pub fn select_step(&mut self, step_id: Option<DbId>) {
        if self.definition_id.is_none() {
            return;
        }
        if self.step_id != step_id {
            self.step_id = step_id;
            self.role_name = None;
            self.transition_id = None;
        }
    }

    /// Select a role for the current step. Ignored while no step is selected.
    pub fn select_role(&mut self, role_name: Option<String>) {
        if self.step_id.is_some() {
            self.role_name = role_name;
        }
    }

    /// Select a transition leaving the current step. Ignored while no step
    /// is selected.
    pub fn select_transition(&mut self, transition_id: Option<DbId>) {
        if self.step_id.is_some() {
            self.transition_id = transition_id;
        }
    }

    fn clear_step(&mut self) {
        self.step_id = None;
        self.role_name = None;
        self.transition_id = None;
    }

    /// Drop selections that are inconsistent with the available options.
    ///
    /// `step_ok` reports whether the selected step belongs to the selected
    /// definition, `role_ok` and `transition_ok` whether the role and
    /// transition are among the options for the selected step.
    pub fn retain_consistent(
        &mut self,
        definition_ok: bool,
        step_ok: impl FnOnce(DbId) -> bool,
        role_ok: impl FnOnce(&str) -> bool,
        transition_ok: impl FnOnce(DbId) -> bool,
    ) {
        if !definition_ok {
            self.definition_id = None;
            self.clear_step();
            return;
        }
        match self.step_id {
            Some(step_id) if step_ok(step_id) => {}
            _ => {
                self.clear_step();
                return;
            }
        }
        if let Some(role) = self.role_name.as_deref() {
            if !role_ok(role) {
                self.role_name = None;
            }
        }
        if let Some(transition_id) = self.transition_id {
            if !transition_ok(transition_id) {
                self.transition_id = None;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn fully_selected() -> CascadingSelection {
        let mut s = CascadingSelection::new();
        s.select_definition(Some(1));
        s.select_step(Some(10));
        s.select_role(Some("Validateur BN".to_string()));
        s.select_transition(Some(100));
        s
    }

    #[test]
    fn new_definition_clears_everything_below() {
        let mut s = fully_selected();
        s.select_definition(Some(2));
        assert_eq!(
            s,
            CascadingSelection {
                definition_id: Some(2),
                ..Default::default()
            }
        );
    }

    #[test]
    fn reselecting_same_definition_keeps_downstream() {
        let mut s = fully_selected();
        s.select_definition(Some(1));
        assert_eq!(s, fully_selected());
    }

    #[test]
    fn new_step_clears_role_and_transition() {
        let mut s = fully_selected();
        s.select_step(Some(11));
        assert_eq!(s.definition_id, Some(1));
        assert_eq!(s.step_id, Some(11));
        assert_eq!(s.role_name, None);
        assert_eq!(s.transition_id, None);
    }

    #[test]
    fn downstream_selection_requires_parent() {
        let mut s = CascadingSelection::new();
        s.select_step(Some(10));
        s.select_role(Some("Catalogueur".to_string()));
        s.select_transition(Some(5));
        assert_eq!(s, CascadingSelection::new());
    }

    #[test]
    fn retain_drops_step_from_other_definition() {
        let mut s = fully_selected();
        s.retain_consistent(true, |_| false, |_| true, |_| true);
        assert_eq!(s.definition_id, Some(1));
        assert_eq!(s.step_id, None);
        assert_eq!(s.role_name, None);
    }

    #[test]
    fn retain_drops_only_invalid_leaves() {
        let mut s = fully_selected();
        s.retain_consistent(true, |_| true, |r| r == "Validateur BN", |_| false);
        assert_eq!(s.role_name.as_deref(), Some("Validateur BN"));
        assert_eq!(s.transition_id, None);
    }

    #[test]
    fn retain_drops_unknown_definition() {
        let mut s = fully_selected();
        s.retain_consistent(false, |_| true, |_| true, |_| true);
        assert_eq!(s, CascadingSelection::new());
    }
}
