//! Control ↔ risk/threat edges.

use scf_core::enums::RelationType;

use super::graph::DocumentGraph;
use super::resolver::ResolvedSelection;
use crate::error::DatabaseError;
use crate::repos::Repo;

pub struct RelationLinker<'c, 'g> {
    repo: Repo<'c>,
    project_id: &'g str,
}

impl<'c, 'g> RelationLinker<'c, 'g> {
    #[must_use]
    pub const fn new(repo: Repo<'c>, project_id: &'g str) -> Self {
        Self { repo, project_id }
    }

    /// Link every resolved (control, risk) and (control, threat) pair as a
    /// reciprocal pair of rows. Returns the number of rows written; pairs
    /// already present from an earlier run write nothing.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if an insert fails.
    pub async fn link(
        &self,
        resolved: &ResolvedSelection<'_>,
        graph: &DocumentGraph,
    ) -> Result<u32, DatabaseError> {
        let mut written = 0;
        for rc in &resolved.controls {
            let Some(control_page) = graph.control_pages.get(rc.control.object_id.trim()) else {
                continue;
            };
            for risk_id in &rc.risk_ids {
                if let Some(risk_page) = graph.risk_pages.get(risk_id) {
                    written += self
                        .repo
                        .link_pages(
                            self.project_id,
                            &control_page.object_id,
                            &risk_page.object_id,
                            RelationType::ControlToRisk,
                        )
                        .await?;
                }
            }
            for threat_id in &rc.threat_ids {
                if let Some(threat_page) = graph.threat_pages.get(threat_id) {
                    written += self
                        .repo
                        .link_pages(
                            self.project_id,
                            &control_page.object_id,
                            &threat_page.object_id,
                            RelationType::ControlToThreat,
                        )
                        .await?;
                }
            }
        }
        Ok(written)
    }
}
