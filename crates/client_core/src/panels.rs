use shared::domain::{PanelName, WorkflowVariant};
use tracing::debug;

use crate::error::PanelError;

/// Snapshot of one wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelState {
    pub name: PanelName,
    pub is_open: bool,
    pub confirmed: bool,
    pub editable: bool,
}

impl PanelState {
    fn closed(name: PanelName) -> Self {
        Self {
            name,
            is_open: false,
            confirmed: false,
            editable: false,
        }
    }
}

/// Ordered confirm/edit state for the panels of one workflow variant.
///
/// State only changes through [`confirm_panel`](Self::confirm_panel),
/// [`edit_panel`](Self::edit_panel) and [`reset`](Self::reset). A panel can
/// be editable only while its predecessor is confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelStateMachine {
    variant: WorkflowVariant,
    panels: Vec<PanelState>,
}

impl PanelStateMachine {
    pub fn new(variant: WorkflowVariant) -> Self {
        let mut machine = Self {
            variant,
            panels: Vec::new(),
        };
        machine.reset();
        machine
    }

    pub fn variant(&self) -> WorkflowVariant {
        self.variant
    }

    pub fn panels(&self) -> &[PanelState] {
        &self.panels
    }

    pub fn panel(&self, name: PanelName) -> Option<PanelState> {
        self.panels.iter().copied().find(|panel| panel.name == name)
    }

    /// True once every panel in the order is confirmed.
    pub fn is_ready_to_submit(&self) -> bool {
        self.panels.iter().all(|panel| panel.confirmed)
    }

    /// Back to the initial layout: first panel open and editable, the rest closed.
    pub fn reset(&mut self) {
        self.panels = self
            .variant
            .panel_order()
            .iter()
            .map(|name| PanelState::closed(*name))
            .collect();
        if let Some(first) = self.panels.first_mut() {
            first.is_open = true;
            first.editable = true;
        }
    }

    fn index_of(&self, name: PanelName) -> Result<usize, PanelError> {
        self.panels
            .iter()
            .position(|panel| panel.name == name)
            .ok_or(PanelError::UnknownPanel(name))
    }

    fn require_predecessor_confirmed(&self, index: usize) -> Result<(), PanelError> {
        if index == 0 {
            return Ok(());
        }
        let predecessor = self.panels[index - 1];
        if predecessor.confirmed {
            Ok(())
        } else {
            Err(PanelError::PredecessorUnconfirmed {
                panel: self.panels[index].name,
                predecessor: predecessor.name,
            })
        }
    }

    pub fn confirm_panel(&mut self, name: PanelName) -> Result<(), PanelError> {
        let index = self.index_of(name)?;
        self.require_predecessor_confirmed(index)?;
        if !self.panels[index].editable {
            return Err(PanelError::NotEditable(name));
        }

        let panel = &mut self.panels[index];
        panel.confirmed = true;
        panel.editable = false;

        if let Some(next) = self.panels.get_mut(index + 1) {
            next.is_open = true;
            next.editable = true;
        }
        debug!(panel = %name, ready = self.is_ready_to_submit(), "panel confirmed");
        Ok(())
    }

    /// Reopens `name` for editing and invalidates every panel after it.
    pub fn edit_panel(&mut self, name: PanelName) -> Result<(), PanelError> {
        let index = self.index_of(name)?;
        self.require_predecessor_confirmed(index)?;

        let panel = &mut self.panels[index];
        panel.is_open = true;
        panel.confirmed = false;
        panel.editable = true;

        for successor in &mut self.panels[index + 1..] {
            successor.is_open = false;
            successor.confirmed = false;
            successor.editable = false;
        }
        debug!(panel = %name, "panel reopened for editing");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/panels_tests.rs"]
mod tests;
