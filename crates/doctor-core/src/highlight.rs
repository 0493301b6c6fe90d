//! Projection of session state onto a visual-emphasis directive for the scene.
//!
//! The tint is chosen from an explicit classification set, **not** from the
//! record's [`RiskLevel`](crate::knowledge::RiskLevel): `ram` is a Critical
//! fault but still gets the default tint unless it is added to the set.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::knowledge::{ComponentId, Selection};
use crate::session::Phase;

/// Colour class the scene applies to the emphasis effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tint {
    CriticalTint,
    DefaultTint,
}

impl Tint {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CriticalTint => "critical-tint",
            Self::DefaultTint => "default-tint",
        }
    }
}

impl std::fmt::Display for Tint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which resolved components are rendered with the critical tint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightPolicy {
    thermal: BTreeSet<ComponentId>,
}

impl Default for HighlightPolicy {
    /// Thermal set of exactly `{heat}`.
    fn default() -> Self {
        Self::new([ComponentId::Heat])
    }
}

impl HighlightPolicy {
    pub fn new(thermal: impl IntoIterator<Item = ComponentId>) -> Self {
        Self {
            thermal: thermal.into_iter().collect(),
        }
    }

    pub fn with_thermal(mut self, id: ComponentId) -> Self {
        self.thermal.insert(id);
        self
    }

    pub fn thermal_components(&self) -> &BTreeSet<ComponentId> {
        &self.thermal
    }

    pub fn classify(&self, selection: &Selection) -> Tint {
        match selection.component() {
            Some(id) if self.thermal.contains(&id) => Tint::CriticalTint,
            _ => Tint::DefaultTint,
        }
    }
}

/// Instruction for the scene collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum HighlightDirective {
    None,
    Emphasize {
        component_id: Selection,
        color_class: Tint,
    },
}

impl HighlightDirective {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Pure projection: only a resolved session is emphasized.
pub fn project(phase: &Phase, policy: &HighlightPolicy) -> HighlightDirective {
    match phase.resolved() {
        Some(selection) => HighlightDirective::Emphasize {
            component_id: selection.clone(),
            color_class: policy.classify(selection),
        },
        None => HighlightDirective::None,
    }
}
