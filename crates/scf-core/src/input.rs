//! The SCF configuration document accepted by the bootstrap endpoint.
//!
//! The document is a snapshot of a control selection made in the SCF
//! explorer: the controls with their domain and catalog cross-references, a
//! rollout timeline, and the assessment-objective and evidence-request items
//! the controls point at. It is consumed once and never stored as-is.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Version string every accepted document must declare.
pub const SCF_CONFIG_VERSION: &str = "scf_config.v1";

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ScfConfigV1 {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub generated_at: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub project_name: String,
    /// Must match the organization in the request path when non-empty.
    #[serde(default)]
    pub organization_id: String,
    /// Explicit project description. Synthesized from the selection when blank.
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub controls: Vec<ControlSelection>,
    #[serde(default)]
    pub timeline: Timeline,
    #[serde(default)]
    pub assessment_objectives: AssessmentObjectiveSection,
    #[serde(default)]
    pub evidence_requests: EvidenceRequestSection,
}

/// One control entry in the configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ControlSelection {
    pub object_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub cadence: String,
    #[serde(default)]
    pub weight: f64,
    /// Framework name → whether this control covers it.
    #[serde(default)]
    pub coverage: BTreeMap<String, bool>,
    /// Framework name → whether this control is core for it.
    #[serde(default)]
    pub core: BTreeMap<String, bool>,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub priority: bool,
    #[serde(default)]
    pub control_description: String,
    #[serde(default)]
    pub risk_ids: Vec<String>,
    #[serde(default)]
    pub threat_ids: Vec<String>,
    #[serde(default)]
    pub assessment_objective_ids: Vec<String>,
    #[serde(default)]
    pub evidence_request_ids: Vec<String>,
}

impl ControlSelection {
    /// Sorted framework names flagged `true` in `coverage`.
    #[must_use]
    pub fn coverage_frameworks(&self) -> Vec<String> {
        flagged_keys(&self.coverage)
    }

    /// Sorted framework names flagged `true` in `core`.
    #[must_use]
    pub fn core_frameworks(&self) -> Vec<String> {
        flagged_keys(&self.core)
    }
}

fn flagged_keys(map: &BTreeMap<String, bool>) -> Vec<String> {
    map.iter()
        .filter(|(_, on)| **on)
        .map(|(k, _)| k.clone())
        .collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TimelineWindow {
    #[serde(default)]
    pub goal: String,
    #[serde(default)]
    pub start_month: u32,
    #[serde(default)]
    pub end_month: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Timeline {
    #[serde(default)]
    pub windows: Vec<TimelineWindow>,
    #[serde(default)]
    pub max_months: u32,
    #[serde(default)]
    pub total_unique_controls: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AssessmentObjectiveItem {
    pub object_id: String,
    #[serde(default)]
    pub control_mappings: String,
    #[serde(default)]
    pub statement: String,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub is_scf_baseline: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AssessmentObjectiveSection {
    #[serde(default)]
    pub items: Vec<AssessmentObjectiveItem>,
    #[serde(default)]
    pub controls_by_ao_id: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct EvidenceRequestItem {
    pub object_id: String,
    #[serde(default)]
    pub area_of_focus: String,
    #[serde(default)]
    pub artifact: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct EvidenceRequestSection {
    #[serde(default)]
    pub items: Vec<EvidenceRequestItem>,
    #[serde(default)]
    pub controls_by_evidence_id: BTreeMap<String, Vec<String>>,
}

impl ScfConfigV1 {
    /// Controls flagged `selected`, in document order.
    #[must_use]
    pub fn selected_controls(&self) -> Vec<&ControlSelection> {
        self.controls.iter().filter(|c| c.selected).collect()
    }

    /// Check the document against the request it arrived with.
    ///
    /// An empty `organization_id` inherits the path organization.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for an unsupported version, a blank
    /// project name, an empty or fully unselected control list, or an
    /// organization that differs from `path_org_id`.
    pub fn validate(&self, path_org_id: &str, required_version: &str) -> Result<(), CoreError> {
        if self.version != required_version {
            return Err(CoreError::Validation(format!(
                "unsupported config version '{}' (expected '{required_version}')",
                self.version
            )));
        }
        if self.project_name.trim().is_empty() {
            return Err(CoreError::Validation("project_name is required".into()));
        }
        if self.controls.is_empty() {
            return Err(CoreError::Validation("controls are required".into()));
        }
        if !self.organization_id.is_empty() && self.organization_id != path_org_id {
            return Err(CoreError::Validation(
                "organization_id in config does not match path".into(),
            ));
        }
        if self.controls.iter().any(|c| c.object_id.trim().is_empty()) {
            return Err(CoreError::Validation("every control needs an object_id".into()));
        }
        if !self.controls.iter().any(|c| c.selected) {
            return Err(CoreError::Validation("no selected controls in config".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn control(id: &str, selected: bool) -> ControlSelection {
        ControlSelection {
            object_id: id.into(),
            selected,
            ..Default::default()
        }
    }

    fn config() -> ScfConfigV1 {
        ScfConfigV1 {
            version: SCF_CONFIG_VERSION.into(),
            project_name: "Test".into(),
            organization_id: "org-1".into(),
            controls: vec![control("GOV-01", true)],
            ..Default::default()
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(config().validate("org-1", SCF_CONFIG_VERSION).is_ok());
    }

    #[test]
    fn empty_organization_inherits_path() {
        let mut cfg = config();
        cfg.organization_id.clear();
        assert!(cfg.validate("org-anything", SCF_CONFIG_VERSION).is_ok());
    }

    #[test]
    fn organization_mismatch_rejected() {
        let err = config().validate("org-2", SCF_CONFIG_VERSION).unwrap_err();
        assert!(matches!(err, CoreError::Validation(m) if m.contains("organization_id")));
    }

    #[test]
    fn wrong_version_rejected() {
        let mut cfg = config();
        cfg.version = "scf_config.v0".into();
        assert!(cfg.validate("org-1", SCF_CONFIG_VERSION).is_err());
    }

    #[test]
    fn blank_project_name_rejected() {
        let mut cfg = config();
        cfg.project_name = "   ".into();
        assert!(cfg.validate("org-1", SCF_CONFIG_VERSION).is_err());
    }

    #[test]
    fn nothing_selected_rejected() {
        let mut cfg = config();
        cfg.controls = vec![control("GOV-01", false)];
        assert!(cfg.validate("org-1", SCF_CONFIG_VERSION).is_err());
    }

    #[test]
    fn selected_controls_keep_input_order() {
        let mut cfg = config();
        cfg.controls = vec![control("B", true), control("A", false), control("C", true)];
        let ids: Vec<_> = cfg.selected_controls().iter().map(|c| c.object_id.as_str()).collect();
        assert_eq!(ids, vec!["B", "C"]);
    }

    #[test]
    fn flagged_frameworks_are_sorted_and_filtered() {
        let mut c = control("X", true);
        c.coverage.insert("soc2".into(), true);
        c.coverage.insert("iso27001".into(), true);
        c.coverage.insert("hipaa".into(), false);
        assert_eq!(c.coverage_frameworks(), vec!["iso27001", "soc2"]);
        assert!(c.core_frameworks().is_empty());
    }

    #[test]
    fn deserializes_wire_document() {
        let json = serde_json::json!({
            "version": "scf_config.v1",
            "project_name": "P",
            "organization_id": "org-1",
            "controls": [{
                "object_id": "SCF-AC-1",
                "title": "Access",
                "domain": "Access Control",
                "coverage": {"SOC2": true},
                "selected": true,
                "risk_ids": ["R-1"]
            }],
            "timeline": {"windows": [{"goal": "g", "start_month": 1, "end_month": 3}], "max_months": 6},
            "evidence_requests": {"items": [{"object_id": "EV-1", "artifact": "Matrix"}]}
        });
        let cfg: ScfConfigV1 = serde_json::from_value(json).unwrap();
        assert_eq!(cfg.controls[0].risk_ids, vec!["R-1"]);
        assert_eq!(cfg.timeline.max_months, 6);
        assert_eq!(cfg.evidence_requests.items[0].artifact, "Matrix");
        assert!(cfg.assessment_objectives.items.is_empty());
    }
}
