//! Immutable component → fault record lookup table.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use sha2::{Digest, Sha256};

use super::component::{ComponentId, Selection};
use super::record::{FaultRecord, Percent, PercentRepr, RiskLevel};
use crate::error::{DoctorError, Result};
use crate::obs::emit_kb_loaded;

const BUILTIN_FAULTS: &str = include_str!("../../data/faults.json");

/// Record shape of the structured data source, before validation.
#[derive(Debug, Deserialize)]
struct RawFaultRecord {
    id: String,
    title: String,
    location: String,
    risk: RiskLevel,
    explanation: String,
    solutions: Vec<String>,
    fatigue: PercentRepr,
    performance: PercentRepr,
}

impl RawFaultRecord {
    fn into_record(self) -> Result<FaultRecord> {
        let id: ComponentId = self.id.parse()?;
        Ok(FaultRecord {
            id: Some(id),
            title: self.title,
            location: self.location,
            risk: self.risk,
            explanation: self.explanation,
            solutions: self.solutions,
            fatigue: Percent::try_from(self.fatigue)?,
            performance: Percent::try_from(self.performance)?,
        })
    }
}

/// Immutable mapping of component identifiers to fault records.
///
/// Definition order is preserved and drives the selection menu.
#[derive(Debug, Clone)]
pub struct FaultKnowledgeBase {
    records: Vec<FaultRecord>,
    index: HashMap<ComponentId, usize>,
    digest: String,
}

impl FaultKnowledgeBase {
    /// The reference data set embedded in the library.
    pub fn builtin() -> Result<Self> {
        let kb = Self::from_json_str(BUILTIN_FAULTS)?;
        emit_kb_loaded("builtin", kb.len(), kb.digest());
        Ok(kb)
    }

    /// Load an ordered JSON array of fault records from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let kb = Self::from_json_str(&text)?;
        emit_kb_loaded(&path.display().to_string(), kb.len(), kb.digest());
        Ok(kb)
    }

    /// Parse and validate an ordered JSON array of fault records.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let raw: Vec<RawFaultRecord> = serde_json::from_str(text)?;
        let records = raw
            .into_iter()
            .map(RawFaultRecord::into_record)
            .collect::<Result<Vec<_>>>()?;
        Self::from_records(records)
    }

    /// Build from already-typed records, applying the same validation as loading.
    pub fn from_records(records: Vec<FaultRecord>) -> Result<Self> {
        let mut index = HashMap::with_capacity(records.len());
        for (pos, record) in records.iter().enumerate() {
            let id = record.id.ok_or_else(|| DoctorError::EmptyField {
                id: record.title.clone(),
                field: "id",
            })?;
            if record.title.trim().is_empty() {
                return Err(DoctorError::EmptyField {
                    id: id.to_string(),
                    field: "title",
                });
            }
            if record.solutions.is_empty() {
                return Err(DoctorError::NoSolutions(id.to_string()));
            }
            if index.insert(id, pos).is_some() {
                return Err(DoctorError::DuplicateComponent(id.to_string()));
            }
        }

        let canonical = serde_json::to_vec(&records)?;
        let digest = hex::encode(Sha256::digest(&canonical));

        Ok(Self {
            records,
            index,
            digest,
        })
    }

    /// Resolve a selection to its record, or to the standby record on a miss.
    pub fn lookup(&self, selection: &Selection) -> &FaultRecord {
        selection
            .component()
            .and_then(|id| self.get(id))
            .unwrap_or_else(|| FaultRecord::standby())
    }

    /// Raw lookup that reports a miss as `None`.
    pub fn get(&self, id: ComponentId) -> Option<&FaultRecord> {
        self.index.get(&id).map(|&pos| &self.records[pos])
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.index.contains_key(&id)
    }

    /// Component ids in definition order.
    pub fn list_component_ids(&self) -> Vec<ComponentId> {
        self.records.iter().filter_map(|r| r.id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FaultRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Hex SHA-256 of the canonical JSON form of the records.
    pub fn digest(&self) -> &str {
        &self.digest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: ComponentId, title: &str) -> FaultRecord {
        FaultRecord {
            id: Some(id),
            title: title.to_string(),
            location: "Board".to_string(),
            risk: RiskLevel::Low,
            explanation: "test".to_string(),
            solutions: vec!["step".to_string()],
            fatigue: Percent::new(1).unwrap(),
            performance: Percent::new(99).unwrap(),
        }
    }

    #[test]
    fn test_builtin_loads_seven_records_in_order() {
        let kb = FaultKnowledgeBase::builtin().unwrap();
        assert_eq!(
            kb.list_component_ids(),
            vec![
                ComponentId::Usb,
                ComponentId::Screen,
                ComponentId::Heat,
                ComponentId::Battery,
                ComponentId::Ram,
                ComponentId::Disk,
                ComponentId::Wifi,
            ]
        );
        assert_eq!(kb.list_component_ids(), kb.list_component_ids());
    }

    #[test]
    fn test_lookup_known_and_unknown() {
        let kb = FaultKnowledgeBase::builtin().unwrap();
        let ram = kb.lookup(&Selection::from("ram"));
        assert_eq!(ram.title, "Memory Module Error");
        assert_eq!(ram.fatigue.value(), 70);

        let miss = kb.lookup(&Selection::from("unknown-id"));
        assert!(std::ptr::eq(miss, FaultRecord::standby()));
    }

    #[test]
    fn test_lookup_missing_known_component_is_standby() {
        let kb = FaultKnowledgeBase::from_records(vec![record(ComponentId::Ram, "RAM")]).unwrap();
        assert!(kb.get(ComponentId::Wifi).is_none());
        assert!(kb.lookup(&ComponentId::Wifi.into()).is_standby());
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let err = FaultKnowledgeBase::from_records(vec![
            record(ComponentId::Ram, "a"),
            record(ComponentId::Ram, "b"),
        ])
        .unwrap_err();
        assert!(matches!(err, DoctorError::DuplicateComponent(ref id) if id == "ram"));
    }

    #[test]
    fn test_rejects_empty_title_and_solutions() {
        let err = FaultKnowledgeBase::from_records(vec![record(ComponentId::Usb, "  ")])
            .unwrap_err();
        assert!(matches!(err, DoctorError::EmptyField { field: "title", .. }));

        let mut bare = record(ComponentId::Usb, "USB");
        bare.solutions.clear();
        let err = FaultKnowledgeBase::from_records(vec![bare]).unwrap_err();
        assert!(matches!(err, DoctorError::NoSolutions(_)));
    }

    #[test]
    fn test_rejects_unknown_component_in_json() {
        let json = r#"[{"id":"gpu","title":"GPU","location":"x","risk":"Low",
            "explanation":"x","solutions":["a"],"fatigue":1,"performance":2}]"#;
        let err = FaultKnowledgeBase::from_json_str(json).unwrap_err();
        assert!(matches!(err, DoctorError::UnknownComponent(ref id) if id == "gpu"));
    }

    #[test]
    fn test_rejects_out_of_range_percent_in_json() {
        let json = r#"[{"id":"usb","title":"USB","location":"x","risk":"Low",
            "explanation":"x","solutions":["a"],"fatigue":"150%","performance":2}]"#;
        let err = FaultKnowledgeBase::from_json_str(json).unwrap_err();
        assert!(matches!(err, DoctorError::PercentOutOfRange(_)));
    }

    #[test]
    fn test_digest_is_stable_and_content_sensitive() {
        let a = FaultKnowledgeBase::builtin().unwrap();
        let b = FaultKnowledgeBase::builtin().unwrap();
        assert_eq!(a.digest(), b.digest());
        assert_eq!(a.digest().len(), 64);

        let c = FaultKnowledgeBase::from_records(vec![record(ComponentId::Ram, "RAM")]).unwrap();
        assert_ne!(a.digest(), c.digest());
    }
}
