//! Fault knowledge base.
//!
//! - [`ComponentId`] / [`Selection`]: the closed component set and raw user selections
//! - [`FaultRecord`]: immutable description of a simulated failure mode
//! - [`FaultKnowledgeBase`]: ordered, validated lookup table loaded once at startup

pub mod base;
pub mod component;
pub mod record;

pub use base::FaultKnowledgeBase;
pub use component::{ComponentId, Selection};
pub use record::{FaultRecord, Percent, RiskLevel};
