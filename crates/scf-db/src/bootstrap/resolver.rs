//! Resolve a control's references against the catalog and the document's
//! own item lists.
//!
//! Unknown ids are skipped with a warning rather than failing the import,
//! so a partially catalogued configuration still produces a usable graph.

use std::collections::{HashMap, HashSet};

use scf_core::entities::{ScfRisk, ScfThreat};
use scf_core::input::{
    AssessmentObjectiveItem, ControlSelection, EvidenceRequestItem, ScfConfigV1,
};

use crate::error::DatabaseError;
use crate::repos::Repo;

/// One selected control with every reference that resolved.
#[derive(Debug, Clone)]
pub struct ResolvedControl<'a> {
    pub control: &'a ControlSelection,
    /// Catalog risk ids, de-duplicated, in the control's order.
    pub risk_ids: Vec<String>,
    pub threat_ids: Vec<String>,
    pub objectives: Vec<&'a AssessmentObjectiveItem>,
    pub evidence: Vec<&'a EvidenceRequestItem>,
}

/// Every selected control, plus the distinct catalog rows they point at.
#[derive(Debug, Clone, Default)]
pub struct ResolvedSelection<'a> {
    /// Selected controls in document order.
    pub controls: Vec<ResolvedControl<'a>>,
    /// Distinct resolved risks, first-seen order across `controls`.
    pub risks: Vec<ScfRisk>,
    pub threats: Vec<ScfThreat>,
    /// References that did not resolve, for the summary log.
    pub skipped: usize,
}

impl<'a> ResolvedSelection<'a> {
    #[must_use]
    pub fn control(&self, control_id: &str) -> Option<&ResolvedControl<'a>> {
        self.controls
            .iter()
            .find(|rc| rc.control.object_id.trim() == control_id)
    }

    /// Distinct (control, risk) pairs.
    #[must_use]
    pub fn risk_pairs(&self) -> usize {
        distinct_pairs(self.controls.iter().map(|rc| (rc.control, &rc.risk_ids)))
    }

    /// Distinct (control, threat) pairs.
    #[must_use]
    pub fn threat_pairs(&self) -> usize {
        distinct_pairs(self.controls.iter().map(|rc| (rc.control, &rc.threat_ids)))
    }
}

fn distinct_pairs<'x>(
    iter: impl Iterator<Item = (&'x ControlSelection, &'x Vec<String>)>,
) -> usize {
    let mut pairs = HashSet::new();
    for (control, ids) in iter {
        for id in ids {
            pairs.insert((control.object_id.as_str(), id.as_str()));
        }
    }
    pairs.len()
}

/// Read-only resolver. Catalog lookups are cached for the call.
pub struct CatalogResolver<'a, 'c> {
    repo: Repo<'c>,
    objectives: HashMap<&'a str, &'a AssessmentObjectiveItem>,
    evidence: HashMap<&'a str, &'a EvidenceRequestItem>,
    risks: HashMap<String, Option<ScfRisk>>,
    threats: HashMap<String, Option<ScfThreat>>,
    skipped: usize,
}

impl<'a, 'c> CatalogResolver<'a, 'c> {
    #[must_use]
    pub fn new(repo: Repo<'c>, config: &'a ScfConfigV1) -> Self {
        let objectives = config
            .assessment_objectives
            .items
            .iter()
            .filter(|item| !item.object_id.is_empty())
            .map(|item| (item.object_id.as_str(), item))
            .collect();
        let evidence = config
            .evidence_requests
            .items
            .iter()
            .filter(|item| !item.object_id.is_empty())
            .map(|item| (item.object_id.as_str(), item))
            .collect();
        Self {
            repo,
            objectives,
            evidence,
            risks: HashMap::new(),
            threats: HashMap::new(),
            skipped: 0,
        }
    }

    /// Resolve every control in `selected`, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a catalog query fails. Missing ids are not
    /// errors.
    pub async fn resolve_all(
        mut self,
        selected: &[&'a ControlSelection],
    ) -> Result<ResolvedSelection<'a>, DatabaseError> {
        let mut resolved = ResolvedSelection::default();
        let mut seen_risks = HashSet::new();
        let mut seen_threats = HashSet::new();

        for control in selected {
            let rc = self.resolve_control(control).await?;
            for id in &rc.risk_ids {
                if seen_risks.insert(id.clone()) {
                    if let Some(Some(risk)) = self.risks.get(id) {
                        resolved.risks.push(risk.clone());
                    }
                }
            }
            for id in &rc.threat_ids {
                if seen_threats.insert(id.clone()) {
                    if let Some(Some(threat)) = self.threats.get(id) {
                        resolved.threats.push(threat.clone());
                    }
                }
            }
            resolved.controls.push(rc);
        }

        resolved.skipped = self.skipped;
        Ok(resolved)
    }

    /// Resolve one control's risk, threat, objective and evidence ids.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a catalog query fails.
    pub async fn resolve_control(
        &mut self,
        control: &'a ControlSelection,
    ) -> Result<ResolvedControl<'a>, DatabaseError> {
        let control_id = control.object_id.as_str();

        let mut risk_ids = Vec::new();
        for id in unique_ids(&control.risk_ids) {
            if self.risk(id).await?.is_some() {
                risk_ids.push(id.to_string());
            } else {
                self.skipped += 1;
                tracing::warn!(control_id, risk_id = id, "risk not in catalog; skipping");
            }
        }

        let mut threat_ids = Vec::new();
        for id in unique_ids(&control.threat_ids) {
            if self.threat(id).await?.is_some() {
                threat_ids.push(id.to_string());
            } else {
                self.skipped += 1;
                tracing::warn!(control_id, threat_id = id, "threat not in catalog; skipping");
            }
        }

        let mut objectives = Vec::new();
        for id in unique_ids(&control.assessment_objective_ids) {
            match self.objectives.get(id) {
                Some(item) => objectives.push(*item),
                None => {
                    self.skipped += 1;
                    tracing::warn!(
                        control_id,
                        assessment_objective_id = id,
                        "assessment objective not in config; skipping"
                    );
                }
            }
        }

        let mut evidence = Vec::new();
        for id in unique_ids(&control.evidence_request_ids) {
            match self.evidence.get(id) {
                Some(item) => evidence.push(*item),
                None => {
                    self.skipped += 1;
                    tracing::warn!(
                        control_id,
                        evidence_id = id,
                        "evidence request not in config; skipping"
                    );
                }
            }
        }

        Ok(ResolvedControl {
            control,
            risk_ids,
            threat_ids,
            objectives,
            evidence,
        })
    }

    async fn risk(&mut self, id: &str) -> Result<Option<&ScfRisk>, DatabaseError> {
        if !self.risks.contains_key(id) {
            let row = self.repo.get_risk(id).await?;
            self.risks.insert(id.to_string(), row);
        }
        Ok(self.risks.get(id).and_then(Option::as_ref))
    }

    async fn threat(&mut self, id: &str) -> Result<Option<&ScfThreat>, DatabaseError> {
        if !self.threats.contains_key(id) {
            let row = self.repo.get_threat(id).await?;
            self.threats.insert(id.to_string(), row);
        }
        Ok(self.threats.get(id).and_then(Option::as_ref))
    }
}

/// Non-empty, trimmed ids with duplicates removed, first occurrence kept.
fn unique_ids(ids: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    ids.iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty() && seen.insert(*id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{config, control, test_db};
    use pretty_assertions::assert_eq;
    use scf_core::input::{AssessmentObjectiveSection, EvidenceRequestSection};

    async fn seed(repo: &Repo<'_>) {
        for id in ["R-1", "R-2"] {
            repo.upsert_risk(&ScfRisk {
                object_id: id.into(),
                title: format!("{id} title"),
                description: String::new(),
            })
            .await
            .unwrap();
        }
        repo.upsert_threat(&ScfThreat {
            object_id: "T-1".into(),
            title: "Threat".into(),
            description: String::new(),
        })
        .await
        .unwrap();
    }

    #[test]
    fn unique_ids_trims_and_dedups() {
        let ids = vec![" R-1".to_string(), "R-1".into(), String::new(), "R-2".into()];
        assert_eq!(unique_ids(&ids), vec!["R-1", "R-2"]);
    }

    #[tokio::test]
    async fn skips_unknown_references() {
        let db = test_db().await;
        let repo = Repo::new(db.conn());
        seed(&repo).await;

        let mut c = control("SCF-AC-1", "Access Control");
        c.risk_ids = vec!["R-1".into(), "R-missing".into()];
        c.threat_ids = vec!["T-missing".into(), "T-1".into()];
        c.assessment_objective_ids = vec!["AO-1".into(), "AO-missing".into()];
        c.evidence_request_ids = vec!["EV-missing".into()];

        let mut cfg = config("org-1", vec![c]);
        cfg.assessment_objectives = AssessmentObjectiveSection {
            items: vec![AssessmentObjectiveItem {
                object_id: "AO-1".into(),
                statement: "s".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        cfg.evidence_requests = EvidenceRequestSection::default();

        let selected = cfg.selected_controls();
        let resolved = CatalogResolver::new(repo, &cfg)
            .resolve_all(&selected)
            .await
            .unwrap();

        let rc = &resolved.controls[0];
        assert_eq!(rc.risk_ids, vec!["R-1"]);
        assert_eq!(rc.threat_ids, vec!["T-1"]);
        assert_eq!(rc.objectives.len(), 1);
        assert!(rc.evidence.is_empty());
        assert_eq!(resolved.skipped, 4);
    }

    #[tokio::test]
    async fn shared_risk_resolves_once_in_first_seen_order() {
        let db = test_db().await;
        let repo = Repo::new(db.conn());
        seed(&repo).await;

        let mut a = control("A", "D");
        a.risk_ids = vec!["R-2".into(), "R-1".into()];
        let mut b = control("B", "D");
        b.risk_ids = vec!["R-1".into()];
        let cfg = config("org-1", vec![a, b]);

        let selected = cfg.selected_controls();
        let resolved = CatalogResolver::new(repo, &cfg)
            .resolve_all(&selected)
            .await
            .unwrap();

        let ids: Vec<_> = resolved.risks.iter().map(|r| r.object_id.as_str()).collect();
        assert_eq!(ids, vec!["R-2", "R-1"]);
        assert_eq!(resolved.risk_pairs(), 3);
        assert_eq!(resolved.threat_pairs(), 0);
        assert!(resolved.control("B").is_some());
    }
}
