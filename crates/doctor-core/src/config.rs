//! Runtime configuration for a diagnostic session.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{DoctorError, Result};
use crate::highlight::HighlightPolicy;
use crate::knowledge::{ComponentId, FaultKnowledgeBase};

/// Simulated scan length used when nothing else is configured.
pub const DEFAULT_SCAN_DELAY: Duration = Duration::from_millis(1500);

/// Longest scan delay accepted by [`DoctorConfig::validate`].
pub const MAX_SCAN_DELAY: Duration = Duration::from_secs(60);

/// Configuration surface of the diagnostic engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorConfig {
    /// How long a scan takes before its report resolves.
    pub scan_delay: Duration,
    /// Components highlighted with the critical tint when resolved.
    pub thermal_components: BTreeSet<ComponentId>,
    /// Alternate knowledge-base file. `None` uses the embedded data set.
    pub knowledge_base: Option<PathBuf>,
}

impl Default for DoctorConfig {
    fn default() -> Self {
        Self {
            scan_delay: DEFAULT_SCAN_DELAY,
            thermal_components: BTreeSet::from([ComponentId::Heat]),
            knowledge_base: None,
        }
    }
}

impl DoctorConfig {
    pub fn with_scan_delay(mut self, delay: Duration) -> Self {
        self.scan_delay = delay;
        self
    }

    /// Replace the thermal classification set.
    pub fn with_thermal_components(mut self, ids: impl IntoIterator<Item = ComponentId>) -> Self {
        self.thermal_components = ids.into_iter().collect();
        self
    }

    pub fn with_knowledge_base(mut self, path: impl Into<PathBuf>) -> Self {
        self.knowledge_base = Some(path.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.scan_delay > MAX_SCAN_DELAY {
            return Err(DoctorError::InvalidConfig(format!(
                "scan delay {}ms exceeds maximum of {}ms",
                self.scan_delay.as_millis(),
                MAX_SCAN_DELAY.as_millis()
            )));
        }
        if self
            .knowledge_base
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            return Err(DoctorError::InvalidConfig(
                "knowledge base path must not be empty".into(),
            ));
        }
        Ok(())
    }

    pub fn highlight_policy(&self) -> HighlightPolicy {
        HighlightPolicy::new(self.thermal_components.iter().copied())
    }

    /// Load the configured knowledge base, falling back to the embedded one.
    pub fn load_knowledge_base(&self) -> Result<FaultKnowledgeBase> {
        match &self.knowledge_base {
            Some(path) => FaultKnowledgeBase::from_path(path),
            None => FaultKnowledgeBase::builtin(),
        }
    }
}
