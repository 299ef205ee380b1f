//! UI events and the focused-control edit buffer.
//!
//! Text inputs report every keystroke as [`UiEvent::Input`] but only send
//! anything to the host on commit (change or blur). Until then the typed
//! value lives in [`ControlState`], never in the store.

#[cfg(test)]
#[path = "controls_test.rs"]
mod controls_test;

use serde_json::Value;

use crate::layer::LayerId;

/// Identifies one control: a root field, or a field on one layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ControlId {
    pub field: String,
    pub layer: Option<LayerId>,
}

impl ControlId {
    #[must_use]
    pub fn root(field: impl Into<String>) -> Self {
        Self { field: field.into(), layer: None }
    }

    #[must_use]
    pub fn layer(field: impl Into<String>, layer: LayerId) -> Self {
        Self { field: field.into(), layer: Some(layer) }
    }
}

/// Interaction reported by the rendering layer.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// A control gained focus.
    Focus(ControlId),
    /// A keystroke changed a control's displayed value. Buffered only.
    Input { control: ControlId, value: Value },
    /// A change event: the control's current value is committed.
    Commit(ControlId),
    /// A select picked a value; committed immediately.
    Change { control: ControlId, value: Value },
    /// A checkbox or switch flipped.
    Toggle { control: ControlId, checked: bool },
    /// The control lost focus. Commits only if there is a pending edit.
    Blur(ControlId),
    /// One slot of a grouped control (e.g. the cluster color triple) changed.
    GroupCommit { control: ControlId, slot: usize, value: Value },
    /// A notebook secret was picked for a credential field.
    SecretSelected { field: String, secret: String },
    AddLayer,
    RemoveLayer(LayerId),
    /// Drag-and-drop finished.
    Drop { removed_index: usize, added_index: usize },
}

/// Which control has focus and what it holds that the host has not seen.
#[derive(Debug, Clone, Default)]
pub struct ControlState {
    focused: Option<ControlId>,
    pending: Option<Value>,
}

impl ControlState {
    #[must_use]
    pub fn focused(&self) -> Option<&ControlId> {
        self.focused.as_ref()
    }

    /// Uncommitted value of the focused control, if it differs from the store.
    #[must_use]
    pub fn pending(&self) -> Option<&Value> {
        self.pending.as_ref()
    }

    /// Move focus. Any pending edit on the previous control is dropped; the
    /// caller commits it first if needed.
    pub fn focus(&mut self, control: ControlId) {
        if self.focused.as_ref() != Some(&control) {
            self.pending = None;
        }
        self.focused = Some(control);
    }

    /// Buffer a keystroke. Typing into an unfocused control focuses it.
    pub fn input(&mut self, control: ControlId, value: Value) {
        self.focus(control);
        self.pending = Some(value);
    }

    /// Take the pending edit if `control` is the focused one.
    pub fn take_pending(&mut self, control: &ControlId) -> Option<Value> {
        if self.focused.as_ref() == Some(control) {
            self.pending.take()
        } else {
            None
        }
    }

    /// Clear focus if `control` holds it.
    pub fn blur(&mut self, control: &ControlId) {
        if self.focused.as_ref() == Some(control) {
            self.focused = None;
            self.pending = None;
        }
    }

    /// A host patch overwrote `field` on `layer`. A controlled input shows
    /// the host value from now on, so the buffered edit is discarded.
    pub fn discard_if_touched(&mut self, layer: Option<&LayerId>, fields: &crate::Data) {
        let Some(focused) = &self.focused else {
            return;
        };
        if focused.layer.as_ref() == layer && fields.contains_key(&focused.field) {
            self.pending = None;
        }
    }

    /// Drop focus when its layer no longer exists.
    pub fn retain_layers(&mut self, exists: impl Fn(&LayerId) -> bool) {
        let stale = self
            .focused
            .as_ref()
            .and_then(|c| c.layer.as_ref())
            .is_some_and(|id| !exists(id));
        if stale {
            self.focused = None;
            self.pending = None;
        }
    }
}
