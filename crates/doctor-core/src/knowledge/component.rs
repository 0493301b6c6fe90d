//! Component identifiers and user selections.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DoctorError;

/// Closed set of laptop components the diagnostic engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentId {
    Usb,
    Screen,
    Heat,
    Battery,
    Ram,
    Disk,
    Wifi,
}

impl ComponentId {
    pub const ALL: [ComponentId; 7] = [
        Self::Usb,
        Self::Screen,
        Self::Heat,
        Self::Battery,
        Self::Ram,
        Self::Disk,
        Self::Wifi,
    ];

    /// Wire form used by the data source and the scene collaborator.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Usb => "usb",
            Self::Screen => "screen",
            Self::Heat => "heat",
            Self::Battery => "battery",
            Self::Ram => "ram",
            Self::Disk => "disk",
            Self::Wifi => "wifi",
        }
    }
}

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentId {
    type Err = DoctorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DoctorError::UnknownComponent(s.to_string()))
    }
}

/// A component selection as received from the presentation layer.
///
/// Unparsable input is kept verbatim as `Unrecognized` and resolves to the
/// standby record instead of being rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Selection {
    Known(ComponentId),
    Unrecognized(String),
}

impl Selection {
    pub fn component(&self) -> Option<ComponentId> {
        match self {
            Self::Known(id) => Some(*id),
            Self::Unrecognized(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(id) => id.as_str(),
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl From<ComponentId> for Selection {
    fn from(id: ComponentId) -> Self {
        Self::Known(id)
    }
}

impl From<&str> for Selection {
    fn from(raw: &str) -> Self {
        match raw.parse::<ComponentId>() {
            Ok(id) => Self::Known(id),
            Err(_) => Self::Unrecognized(raw.to_string()),
        }
    }
}

impl From<String> for Selection {
    fn from(raw: String) -> Self {
        match raw.parse::<ComponentId>() {
            Ok(id) => Self::Known(id),
            Err(_) => Self::Unrecognized(raw),
        }
    }
}

impl From<Selection> for String {
    fn from(selection: Selection) -> Self {
        match selection {
            Selection::Known(id) => id.as_str().to_string(),
            Selection::Unrecognized(raw) => raw,
        }
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
