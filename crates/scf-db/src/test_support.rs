//! Shared test utilities for scf-db unit tests.

pub(crate) mod helpers {
    use scf_core::input::{ControlSelection, ScfConfigV1, SCF_CONFIG_VERSION};

    use crate::ScfDb;
    use crate::repos::Repo;
    use crate::service::{BootstrapOptions, ScfService};

    pub async fn test_db() -> ScfDb {
        ScfDb::open_local(":memory:").await.unwrap()
    }

    pub async fn test_service() -> ScfService {
        ScfService::from_db(test_db().await, BootstrapOptions::default())
    }

    /// Create an organization and return its id.
    pub async fn seed_org(repo: &Repo<'_>) -> String {
        repo.create_organization("Acme").await.unwrap().object_id
    }

    /// Create an organization and a project, returning both ids.
    pub async fn seed_project(repo: &Repo<'_>) -> (String, String) {
        let org = seed_org(repo).await;
        let (project, _) = repo
            .find_or_create_project(&org, "Test project", "")
            .await
            .unwrap();
        (org, project.object_id)
    }

    pub fn control(id: &str, domain: &str) -> ControlSelection {
        ControlSelection {
            object_id: id.into(),
            title: format!("{id} title"),
            domain: domain.into(),
            selected: true,
            ..Default::default()
        }
    }

    pub fn config(org_id: &str, controls: Vec<ControlSelection>) -> ScfConfigV1 {
        ScfConfigV1 {
            version: SCF_CONFIG_VERSION.into(),
            project_name: "Test project".into(),
            organization_id: org_id.into(),
            controls,
            ..Default::default()
        }
    }
}
