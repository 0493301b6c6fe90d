//! Report panel and selection menu projections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::knowledge::{ComponentId, FaultKnowledgeBase, FaultRecord, Percent, RiskLevel};
use crate::session::Phase;

/// Displayable fields of the current diagnostic report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportView {
    pub status: String,
    pub title: String,
    pub location: String,
    pub risk: RiskLevel,
    /// Render the risk with alert styling.
    pub critical: bool,
    pub explanation: String,
    pub solutions: Vec<String>,
    pub fatigue: Percent,
    pub performance: Percent,
}

impl ReportView {
    /// Standby while idle or scanning, the resolved record otherwise.
    pub fn project(phase: &Phase, kb: &FaultKnowledgeBase) -> Self {
        let record = match phase.resolved() {
            Some(selection) => kb.lookup(selection),
            None => FaultRecord::standby(),
        };
        Self::from_record(record, phase.label())
    }

    pub fn from_record(record: &FaultRecord, status: &str) -> Self {
        Self {
            status: status.to_string(),
            title: record.title.clone(),
            location: record.location.clone(),
            risk: record.risk,
            critical: record.risk.is_critical(),
            explanation: record.explanation.clone(),
            solutions: record.solutions.clone(),
            fatigue: record.fatigue,
            performance: record.performance,
        }
    }

    /// Plain-text panel for terminals.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Status: {}\n", self.status));
        out.push_str("DIAGNOSTIC REPORT\n");
        out.push_str(&format!("  Issue Detected: {}\n", self.title));
        out.push_str(&format!("  Location:       {}\n", self.location));
        let risk = if self.critical {
            format!("{} (!)", self.risk.to_string().to_uppercase())
        } else {
            self.risk.to_string().to_uppercase()
        };
        out.push_str(&format!("  Risk Level:     {}\n", risk));
        out.push_str(&format!("  Fatigue:        {}\n", self.fatigue));
        out.push_str(&format!("  Performance:    {}\n", self.performance));
        out.push_str(&format!("  \"{}\"\n", self.explanation));
        out.push_str("RECOVERY STEPS\n");
        for step in &self.solutions {
            out.push_str(&format!("  [x] {}\n", step));
        }
        out
    }

    /// Markdown document handed to the export collaborator.
    pub fn render_markdown(&self, generated_at: DateTime<Utc>) -> String {
        let mut out = String::new();
        out.push_str("# Diagnostic Report\n\n");
        out.push_str(&format!("_Generated {}_\n\n", generated_at.to_rfc3339()));
        out.push_str(&format!(
            "- issue: **{}**\n- location: {}\n- risk: {}\n- fatigue: {}\n- performance: {}\n\n",
            self.title, self.location, self.risk, self.fatigue, self.performance
        ));
        out.push_str("## Technical Explanation\n");
        out.push_str(&format!("> {}\n\n", self.explanation));
        out.push_str("## Recovery Steps\n");
        for (i, step) in self.solutions.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, step));
        }
        out
    }
}

/// One button of the component selection menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub id: ComponentId,
    pub label: String,
    /// Set only for the component whose report is currently shown.
    pub active: bool,
}

/// Menu entries in knowledge-base definition order.
pub fn menu_entries(kb: &FaultKnowledgeBase, phase: &Phase) -> Vec<MenuEntry> {
    let active = phase.resolved().and_then(|s| s.component());
    kb.list_component_ids()
        .into_iter()
        .map(|id| MenuEntry {
            id,
            label: format!("{} Diagnostic", id.as_str().to_uppercase()),
            active: active == Some(id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::Selection;
    use crate::session::ScanToken;

    fn kb() -> FaultKnowledgeBase {
        FaultKnowledgeBase::builtin().unwrap()
    }

    fn resolved(selection: &str) -> Phase {
        Phase::Resolved {
            selection: Selection::from(selection),
            token: ScanToken::ZERO,
        }
    }

    #[test]
    fn test_idle_projects_standby() {
        let view = ReportView::project(&Phase::Idle, &kb());
        assert_eq!(view.title, "System Standby");
        assert_eq!(view.risk, RiskLevel::Safe);
        assert_eq!(view.status, "Idle");
        assert!(!view.critical);
    }

    #[test]
    fn test_scanning_projects_standby() {
        let phase = Phase::Scanning {
            selection: Selection::from("ram"),
            token: ScanToken::ZERO,
        };
        let view = ReportView::project(&phase, &kb());
        assert_eq!(view.title, "System Standby");
        assert_eq!(view.status, "Scanning...");
    }

    #[test]
    fn test_resolved_projects_record() {
        let view = ReportView::project(&resolved("ram"), &kb());
        assert_eq!(view.title, "Memory Module Error");
        assert_eq!(view.solutions.len(), 3);
        assert!(view.critical);
        assert_eq!(view.solutions[0], "Clean RAM gold contacts");
    }

    #[test]
    fn test_render_text_lists_steps_in_order() {
        let text = ReportView::project(&resolved("heat"), &kb()).render_text();
        let first = text.find("Deep clean fans").unwrap();
        let last = text.find("Undervolt CPU").unwrap();
        assert!(first < last);
        assert!(text.contains("CRITICAL (!)"));
    }

    #[test]
    fn test_render_markdown_has_numbered_steps() {
        let at = DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .expect("parse RFC3339")
            .with_timezone(&Utc);
        let md = ReportView::project(&resolved("usb"), &kb()).render_markdown(at);
        assert!(md.starts_with("# Diagnostic Report"));
        assert!(md.contains("2026-01-01T00:00:00+00:00"));
        assert!(md.contains("1. Clean ports with isopropanol"));
        assert!(md.contains("3. Check for physical bent pins"));
    }

    #[test]
    fn test_menu_marks_only_resolved_component() {
        let kb = kb();
        let idle = menu_entries(&kb, &Phase::Idle);
        assert_eq!(idle.len(), 7);
        assert!(idle.iter().all(|e| !e.active));
        assert_eq!(idle[0].label, "USB Diagnostic");

        let entries = menu_entries(&kb, &resolved("disk"));
        let active: Vec<_> = entries.iter().filter(|e| e.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, ComponentId::Disk);
    }
}
