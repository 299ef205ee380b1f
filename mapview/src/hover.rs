//! Hover highlighting for one layer.
//!
//! At most one feature is highlighted at a time. A move onto a new feature
//! clears the previous highlight before setting the next one.

#[cfg(test)]
#[path = "hover_test.rs"]
mod hover_test;

use crate::engine::{Feature, FeatureId};

/// A feature-state change to apply to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoverChange {
    Highlight(FeatureId),
    Clear(FeatureId),
}

#[derive(Debug, Clone)]
pub struct HoverTracker {
    source: String,
    hovered: Option<FeatureId>,
}

impl HoverTracker {
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self { source: source.into(), hovered: None }
    }

    /// Source whose feature state is toggled.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn hovered(&self) -> Option<&FeatureId> {
        self.hovered.as_ref()
    }

    /// Pointer moved over `features`; the first one with an id wins.
    pub fn on_move(&mut self, features: &[Feature]) -> Vec<HoverChange> {
        let Some(next) = features.iter().find_map(|f| f.id.clone()) else {
            return Vec::new();
        };
        if self.hovered.as_ref() == Some(&next) {
            return Vec::new();
        }
        let mut changes = Vec::with_capacity(2);
        if let Some(previous) = self.hovered.take() {
            changes.push(HoverChange::Clear(previous));
        }
        self.hovered = Some(next.clone());
        changes.push(HoverChange::Highlight(next));
        changes
    }

    /// Pointer left the layer.
    pub fn on_leave(&mut self) -> Vec<HoverChange> {
        self.hovered.take().map(HoverChange::Clear).into_iter().collect()
    }
}
