//! Compile an SCF configuration document into a project's page graph.
//!
//! The pipeline runs resolver → graph builder → relation linker → artifact
//! generator inside one libSQL transaction. Validation and the organization
//! lookup happen before the transaction opens; any later failure rolls the
//! whole call back.

pub mod artifacts;
pub mod graph;
pub mod relations;
pub mod resolver;

use scf_core::input::ScfConfigV1;
use scf_core::responses::{BootstrapResponse, BootstrapStats};

use crate::error::{BootstrapError, DatabaseError};
use crate::repos::Repo;
use crate::service::ScfService;

use artifacts::{DerivedArtifactGenerator, describe_project};
use graph::{DocumentGraphBuilder, GraphContext};
use relations::RelationLinker;
use resolver::CatalogResolver;

/// Totals across found and created rows, logged after commit next to the
/// created counts in `BootstrapStats`.
#[derive(Debug, Default)]
struct RunSummary {
    project_created: bool,
    pages_in_graph: u32,
    relations_written: u32,
    evidence_total: u32,
    skipped_references: usize,
}

impl ScfService {
    /// Bootstrap (or re-bootstrap) a project from `config` under the
    /// organization `path_org_id`.
    ///
    /// # Errors
    ///
    /// - `BootstrapError::Validation` if the document is rejected; nothing is
    ///   written.
    /// - `BootstrapError::OrganizationNotFound` if the organization does not
    ///   exist.
    /// - `BootstrapError::Database` on any storage failure; the transaction
    ///   is rolled back.
    pub async fn bootstrap_project(
        &self,
        path_org_id: &str,
        config: &ScfConfigV1,
    ) -> Result<BootstrapResponse, BootstrapError> {
        config.validate(path_org_id, &self.options().required_version)?;

        let _guard = self.lock().await;
        if self.repo().get_organization(path_org_id).await?.is_none() {
            return Err(BootstrapError::OrganizationNotFound(path_org_id.to_string()));
        }

        let tx = self.db().conn().transaction().await.map_err(DatabaseError::from)?;
        let result = self.run_pipeline(Repo::new(&tx), path_org_id, config).await;

        match result {
            Ok((response, summary)) => {
                tx.commit().await.map_err(DatabaseError::from)?;
                tracing::info!(
                    project_id = %response.project.object_id,
                    project_created = summary.project_created,
                    controls = response.stats.controls,
                    pages_created = response.stats.documents,
                    pages_in_graph = summary.pages_in_graph,
                    relations_written = summary.relations_written,
                    evidence_created = response.stats.evidence_requests,
                    evidence_total = summary.evidence_total,
                    auditor_created = response.stats.auditors == 1,
                    skipped_references = summary.skipped_references,
                    "project bootstrapped from SCF config"
                );
                Ok(response)
            }
            Err(error) => {
                if let Err(rollback) = tx.rollback().await {
                    tracing::warn!(error = %rollback, "bootstrap rollback failed");
                }
                tracing::error!(%error, organization_id = path_org_id, "bootstrap failed; rolled back");
                Err(error.into())
            }
        }
    }

    async fn run_pipeline(
        &self,
        repo: Repo<'_>,
        organization_id: &str,
        config: &ScfConfigV1,
    ) -> Result<(BootstrapResponse, RunSummary), DatabaseError> {
        let selected = config.selected_controls();
        let description = describe_project(config, &selected);
        let (mut project, project_created) = repo
            .find_or_create_project(organization_id, config.project_name.trim(), &description)
            .await?;
        if !project_created {
            repo.set_project_description(&mut project, &description).await?;
        }

        let resolved = CatalogResolver::new(repo, config).resolve_all(&selected).await?;

        let ctx = GraphContext {
            organization_id,
            project_id: &project.object_id,
            default_domain: &self.options().default_domain,
        };
        let graph = DocumentGraphBuilder::new(repo, ctx).build(config, &resolved).await?;
        let relations_written = RelationLinker::new(repo, &project.object_id)
            .link(&resolved, &graph)
            .await?;

        let generator = DerivedArtifactGenerator::new(repo, ctx);
        let evidence = generator.evidence_requests(&resolved, &graph).await?;
        let (_, auditor_created) = generator.auditor(&resolved, &graph).await?;

        let stats = BootstrapStats {
            controls: to_u32(graph.control_order.len())?,
            documents: graph.pages_created,
            evidence_requests: evidence.created,
            auditors: u32::from(auditor_created),
        };
        let summary = RunSummary {
            project_created,
            pages_in_graph: to_u32(graph.page_count())?,
            relations_written,
            evidence_total: evidence.total,
            skipped_references: resolved.skipped,
        };

        Ok((
            BootstrapResponse {
                project: project.into(),
                stats,
            },
            summary,
        ))
    }
}

fn to_u32(n: usize) -> Result<u32, DatabaseError> {
    u32::try_from(n).map_err(|_| DatabaseError::InvalidState(format!("count out of range: {n}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{config, control, test_service};

    #[tokio::test]
    async fn validation_runs_before_organization_lookup() {
        let svc = test_service().await;
        let mut cfg = config("", vec![control("A", "D")]);
        cfg.version = "scf_config.v0".into();

        let err = svc.bootstrap_project("org-missing", &cfg).await.unwrap_err();
        assert!(matches!(err, BootstrapError::Validation(_)), "{err:?}");
    }

    #[tokio::test]
    async fn empty_project_name_rejected() {
        let svc = test_service().await;
        let org = svc.create_organization("Acme").await.unwrap();
        let mut cfg = config(&org.object_id, vec![control("A", "D")]);
        cfg.project_name = " ".into();

        let err = svc.bootstrap_project(&org.object_id, &cfg).await.unwrap_err();
        assert!(matches!(err, BootstrapError::Validation(_)), "{err:?}");
        let projects = svc.repo().count("SELECT COUNT(*) FROM projects", ()).await.unwrap();
        assert_eq!(projects, 0);
    }
}
