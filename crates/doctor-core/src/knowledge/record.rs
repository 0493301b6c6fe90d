//! Fault records and their value types.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use super::component::ComponentId;
use crate::error::DoctorError;

/// Severity attached to a fault record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Nothing detected. The standby record uses this level.
    Safe,
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Whether the report should render this level with alert styling.
    ///
    /// This is unrelated to the highlight classification, which is driven
    /// by [`crate::highlight::HighlightPolicy`].
    pub fn is_critical(self) -> bool {
        matches!(self, Self::Critical)
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Safe => write!(f, "Safe"),
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
            Self::Critical => write!(f, "Critical"),
        }
    }
}

/// A whole-number percentage in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "PercentRepr", into = "u8")]
pub struct Percent(u8);

impl Percent {
    pub fn new(value: u8) -> Result<Self, DoctorError> {
        if value > 100 {
            return Err(DoctorError::PercentOutOfRange(value.to_string()));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl From<Percent> for u8 {
    fn from(p: Percent) -> Self {
        p.0
    }
}

impl std::fmt::Display for Percent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Percentages arrive as numbers (`92`, `15.0`) or strings (`"92%"`, `"90.5%"`).
///
/// Fractional values are rounded to the nearest whole percent.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PercentRepr {
    Number(u64),
    Float(f64),
    Text(String),
}

impl Percent {
    fn from_f64(value: f64, raw: impl Into<String>) -> Result<Self, DoctorError> {
        if !value.is_finite() || !(0.0..=100.0).contains(&value) {
            return Err(DoctorError::PercentOutOfRange(raw.into()));
        }
        Ok(Self(value.round() as u8))
    }
}

impl TryFrom<PercentRepr> for Percent {
    type Error = DoctorError;

    fn try_from(repr: PercentRepr) -> Result<Self, Self::Error> {
        match repr {
            PercentRepr::Number(n) => u8::try_from(n)
                .map_err(|_| DoctorError::PercentOutOfRange(n.to_string()))
                .and_then(Percent::new),
            PercentRepr::Float(f) => Percent::from_f64(f, f.to_string()),
            PercentRepr::Text(raw) => {
                let digits = raw.trim().trim_end_matches('%').trim();
                match digits.parse::<f64>() {
                    Ok(value) => Percent::from_f64(value, raw),
                    Err(_) => Err(DoctorError::PercentOutOfRange(raw)),
                }
            }
        }
    }
}

/// Static description of a simulated hardware failure mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultRecord {
    /// Component this record describes. `None` only for the standby record.
    pub id: Option<ComponentId>,
    pub title: String,
    pub location: String,
    pub risk: RiskLevel,
    pub explanation: String,
    /// Remediation steps, in the order they should be attempted.
    pub solutions: Vec<String>,
    pub fatigue: Percent,
    pub performance: Percent,
}

impl FaultRecord {
    /// The placeholder shown when nothing is resolved or a selection is unknown.
    ///
    /// Always returns the same instance.
    pub fn standby() -> &'static FaultRecord {
        static STANDBY: OnceLock<FaultRecord> = OnceLock::new();
        STANDBY.get_or_init(|| FaultRecord {
            id: None,
            title: "System Standby".to_string(),
            location: "---".to_string(),
            risk: RiskLevel::Safe,
            explanation: "Select a component to start deep hardware diagnostic.".to_string(),
            solutions: vec![
                "Connect Power Adapter".to_string(),
                "Run Full Scan".to_string(),
            ],
            fatigue: Percent(0),
            performance: Percent(100),
        })
    }

    pub fn is_standby(&self) -> bool {
        self.id.is_none()
    }
}
