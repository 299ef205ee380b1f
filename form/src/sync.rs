//! Sync channel: the two-way contract between the form UI and the host.
//!
//! DESIGN
//! ======
//! `SyncChannel` is a pure state machine. UI events and host messages go in,
//! [`Effect`]s come out; the caller performs them (sending frames, running
//! lookups) and feeds lookup results back through
//! [`SyncChannel::finish_center_lookup`]. Nothing here does I/O, so the
//! ordering rules can be tested without a transport.
//!
//! Ordering: effects are returned in the order the triggering events were
//! handled, and inbound messages are applied one at a time in delivery order.
//!
//! Center lookups carry a token. Only the most recent lookup may complete;
//! a result for an older token is dropped.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use frames::{ErrorCode, Frame};
use serde_json::Value;

use crate::center::{CENTER_FIELD, Place, format_place, needs_lookup};
use crate::consts::CLUSTER_COLOR_SLOTS;
use crate::controls::{ControlId, ControlState, UiEvent};
use crate::layer::LayerId;
use crate::messages::{Inbound, Outbound};
use crate::store::{FormStore, LayerRef};

// =============================================================================
// TYPES
// =============================================================================

/// Side effect requested by the channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Send a message to the host.
    Send(Outbound),
    /// Resolve a free-text place name, then call
    /// [`SyncChannel::finish_center_lookup`] with the same token.
    LookupCenter(CenterLookup),
}

/// An in-flight center lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CenterLookup {
    pub token: u64,
    pub query: String,
}

// =============================================================================
// CHANNEL
// =============================================================================

/// Owns the store and the control state for one form session.
#[derive(Debug)]
pub struct SyncChannel {
    store: FormStore,
    controls: ControlState,
    next_token: u64,
    in_flight: Option<CenterLookup>,
}

impl SyncChannel {
    #[must_use]
    pub fn new(store: FormStore) -> Self {
        Self { store, controls: ControlState::default(), next_token: 1, in_flight: None }
    }

    #[must_use]
    pub fn store(&self) -> &FormStore {
        &self.store
    }

    #[must_use]
    pub fn controls(&self) -> &ControlState {
        &self.controls
    }

    /// The value a control should display: its pending edit while focused,
    /// otherwise the stored value.
    #[must_use]
    pub fn display_value(&self, control: &ControlId) -> Option<&Value> {
        if self.controls.focused() == Some(control)
            && let Some(pending) = self.controls.pending()
        {
            return Some(pending);
        }
        self.store.field_value(&control.field, control.layer.as_ref())
    }

    // --- UI side ---

    /// Handle one UI interaction.
    pub fn handle_ui(&mut self, event: UiEvent) -> Vec<Effect> {
        match event {
            UiEvent::Focus(control) => {
                let effects = self.leave_focused(&control);
                self.controls.focus(control);
                effects
            }
            UiEvent::Input { control, value } => {
                let effects = self.leave_focused(&control);
                self.controls.input(control, value);
                effects
            }
            UiEvent::Commit(control) => match self.controls.take_pending(&control) {
                Some(value) => self.commit(&control, value),
                None => Vec::new(),
            },
            UiEvent::Blur(control) => {
                let effects = match self.controls.take_pending(&control) {
                    Some(value) => self.commit(&control, value),
                    None => Vec::new(),
                };
                self.controls.blur(&control);
                effects
            }
            UiEvent::Change { control, value } => {
                self.controls.take_pending(&control);
                self.commit(&control, value)
            }
            UiEvent::Toggle { control, checked } => self.commit(&control, Value::Bool(checked)),
            UiEvent::GroupCommit { control, slot, value } => self.commit_group(&control, slot, value),
            UiEvent::SecretSelected { field, secret } => {
                self.commit(&ControlId::root(field), Value::String(secret))
            }
            UiEvent::AddLayer => self.add_layer(),
            UiEvent::RemoveLayer(id) => self.remove_layer(&id),
            UiEvent::Drop { removed_index, added_index } => self.move_layer(removed_index, added_index),
        }
    }

    /// Complete a center lookup started by [`Effect::LookupCenter`].
    /// `place` is `None` when the lookup found nothing or failed; the
    /// original text is forwarded in that case.
    pub fn finish_center_lookup(&mut self, token: u64, place: Option<Place>) -> Vec<Effect> {
        let Some(lookup) = self.in_flight.take_if(|l| l.token == token) else {
            tracing::debug!(token, "discarding stale center lookup result");
            return Vec::new();
        };
        let value = match place {
            Some(place) => format_place(place),
            None => {
                tracing::debug!(query = %lookup.query, "center lookup found nothing; forwarding text");
                lookup.query
            }
        };
        vec![Effect::Send(root_update(CENTER_FIELD, Value::String(value)))]
    }

    // --- Host side ---

    /// Parse and apply one host frame. Unknown or malformed frames are
    /// logged and ignored.
    pub fn handle_frame(&mut self, frame: &Frame) -> Vec<Effect> {
        match Inbound::from_frame(frame) {
            Ok(message) => self.handle_inbound(message),
            Err(e) => {
                tracing::warn!(code = e.error_code(), error = %e, event = %frame.event, "ignoring host frame");
                Vec::new()
            }
        }
    }

    /// Apply one host message. Only [`Inbound::Sync`] produces effects.
    pub fn handle_inbound(&mut self, message: Inbound) -> Vec<Effect> {
        match message {
            Inbound::UpdateRoot { fields } => {
                self.controls.discard_if_touched(None, &fields);
                self.store.apply_root_patch(&fields);
            }
            Inbound::UpdateLayer { target, fields } => {
                let id = self.store.layer(&target).map(|l| l.id.clone());
                match self.store.apply_layer_patch(&target, &fields) {
                    Ok(()) => self.controls.discard_if_touched(id.as_ref(), &fields),
                    Err(e) => tracing::warn!(code = e.error_code(), error = %e, "dropping layer patch"),
                }
            }
            Inbound::SetLayers { layers } => {
                self.store.replace_layers(layers);
                let store = &self.store;
                self.controls.retain_layers(|id| store.layers().iter().any(|l| &l.id == id));
            }
            Inbound::SetSourceVariables { source_variables, fields } => {
                let first = self.store.layers().first().map(|l| l.id.clone());
                self.store.replace_source_variables(source_variables, &fields);
                self.controls.discard_if_touched(first.as_ref(), &fields);
            }
            Inbound::MissingDep { dep } => self.store.set_missing_dep(dep),
            Inbound::Sync => return self.barrier(),
        }
        Vec::new()
    }

    /// Force the focused control to commit. Uses the pending edit when there
    /// is one and the stored value otherwise, so the host always receives
    /// exactly one message for the focused control.
    fn barrier(&mut self) -> Vec<Effect> {
        let Some(control) = self.controls.focused().cloned() else {
            return Vec::new();
        };
        let value = match self.controls.take_pending(&control) {
            Some(value) => value,
            None => match self.store.field_value(&control.field, control.layer.as_ref()) {
                Some(stored) => stored.clone(),
                None => return Vec::new(),
            },
        };
        self.commit(&control, value)
    }

    // --- Commits ---

    /// Commit whatever the previously focused control holds when focus
    /// moves to `next`.
    fn leave_focused(&mut self, next: &ControlId) -> Vec<Effect> {
        let Some(previous) = self.controls.focused().cloned() else {
            return Vec::new();
        };
        if &previous == next {
            return Vec::new();
        }
        match self.controls.take_pending(&previous) {
            Some(value) => self.commit(&previous, value),
            None => Vec::new(),
        }
    }

    fn commit(&mut self, control: &ControlId, value: Value) -> Vec<Effect> {
        if !self.store.features().allows_field(&control.field) {
            tracing::debug!(field = %control.field, "field disabled by form features");
            return Vec::new();
        }
        let Some(layer_id) = &control.layer else {
            return self.commit_root(&control.field, value);
        };
        let Some(idx) = self.store.position(&LayerRef::Id(layer_id.clone())) else {
            tracing::warn!(field = %control.field, layer = %layer_id, "commit for unknown layer");
            return Vec::new();
        };
        vec![Effect::Send(Outbound::UpdateField {
            field: control.field.clone(),
            value,
            idx: Some(idx),
            layer_id: Some(layer_id.clone()),
        })]
    }

    fn commit_root(&mut self, field: &str, value: Value) -> Vec<Effect> {
        if field == CENTER_FIELD
            && let Value::String(text) = &value
            && needs_lookup(text)
        {
            let lookup = CenterLookup { token: self.next_token, query: text.clone() };
            self.next_token += 1;
            if let Some(previous) = self.in_flight.replace(lookup.clone()) {
                tracing::debug!(token = previous.token, "superseding center lookup");
            }
            return vec![Effect::LookupCenter(lookup)];
        }
        if field == CENTER_FIELD
            && let Some(previous) = self.in_flight.take()
        {
            tracing::debug!(token = previous.token, "center set directly; dropping pending lookup");
        }
        vec![Effect::Send(root_update(field, value))]
    }

    /// Replace one slot of a grouped control and send the whole group.
    fn commit_group(&mut self, control: &ControlId, slot: usize, value: Value) -> Vec<Effect> {
        if slot >= CLUSTER_COLOR_SLOTS {
            tracing::warn!(field = %control.field, slot, "group slot out of range");
            return Vec::new();
        }
        let mut group = match self.store.field_value(&control.field, control.layer.as_ref()) {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        };
        if group.len() <= slot {
            group.resize(slot + 1, Value::String(String::new()));
        }
        group[slot] = value;
        self.commit(control, Value::Array(group))
    }

    // --- Layer list ---

    fn add_layer(&self) -> Vec<Effect> {
        if !self.store.controls_enabled() {
            tracing::debug!("add_layer ignored: no source variable");
            return Vec::new();
        }
        vec![Effect::Send(Outbound::AddLayer)]
    }

    fn remove_layer(&self, id: &LayerId) -> Vec<Effect> {
        if !self.store.controls_enabled() || !self.store.has_layers() {
            tracing::debug!(layer = %id, "remove_layer ignored");
            return Vec::new();
        }
        match self.store.position(&LayerRef::Id(id.clone())) {
            Some(layer) => vec![Effect::Send(Outbound::RemoveLayer { layer, layer_id: id.clone() })],
            None => {
                tracing::warn!(layer = %id, "remove_layer for unknown layer");
                Vec::new()
            }
        }
    }

    fn move_layer(&self, removed_index: usize, added_index: usize) -> Vec<Effect> {
        if !self.store.features().reorder {
            tracing::debug!("layer reordering disabled by form features");
            return Vec::new();
        }
        if removed_index == added_index {
            return Vec::new();
        }
        let len = self.store.layers().len();
        if removed_index >= len || added_index >= len {
            tracing::warn!(removed_index, added_index, len, "move_layer out of range");
            return Vec::new();
        }
        vec![Effect::Send(Outbound::MoveLayer { removed_index, added_index })]
    }
}

fn root_update(field: &str, value: Value) -> Outbound {
    Outbound::UpdateField { field: field.to_owned(), value, idx: None, layer_id: None }
}
