//! Service layer shared by the bootstrap pipeline and the read paths.
//!
//! `ScfService` wraps `ScfDb` together with the import options and a gate
//! that serializes access to the single connection. A bootstrap holds the
//! gate for its whole transaction, so readers never observe a partial graph.

use scf_config::BootstrapConfig;
use tokio::sync::{Mutex, MutexGuard};

use crate::ScfDb;
use crate::error::DatabaseError;
use crate::repos::Repo;

/// Import settings resolved from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapOptions {
    pub required_version: String,
    pub default_domain: String,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self::from(&BootstrapConfig::default())
    }
}

impl From<&BootstrapConfig> for BootstrapOptions {
    fn from(config: &BootstrapConfig) -> Self {
        Self {
            required_version: config.require_config_version.clone(),
            default_domain: config.default_domain.clone(),
        }
    }
}

pub struct ScfService {
    db: ScfDb,
    gate: Mutex<()>,
    options: BootstrapOptions,
}

impl ScfService {
    /// Open a local database and wrap it.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or migrated.
    pub async fn new_local(path: &str, options: BootstrapOptions) -> Result<Self, DatabaseError> {
        let db = ScfDb::open_local(path).await?;
        Ok(Self::from_db(db, options))
    }

    #[must_use]
    pub fn from_db(db: ScfDb, options: BootstrapOptions) -> Self {
        Self {
            db,
            gate: Mutex::new(()),
            options,
        }
    }

    #[must_use]
    pub const fn db(&self) -> &ScfDb {
        &self.db
    }

    #[must_use]
    pub const fn options(&self) -> &BootstrapOptions {
        &self.options
    }

    /// A repo over the shared connection. Callers hold the gate.
    pub(crate) const fn repo(&self) -> Repo<'_> {
        Repo::new(self.db.conn())
    }

    pub(crate) async fn lock(&self) -> MutexGuard<'_, ()> {
        self.gate.lock().await
    }

    /// Database liveness check for the health endpoint.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the probe query fails.
    pub async fn health(&self) -> Result<(), DatabaseError> {
        let _guard = self.lock().await;
        self.db.ping().await
    }

    /// Seed an organization. Organizations belong to the external CRUD layer;
    /// this exists for the import job and tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on insert failure.
    pub async fn create_organization(
        &self,
        name: &str,
    ) -> Result<scf_core::entities::Organization, DatabaseError> {
        let _guard = self.lock().await;
        self.repo().create_organization(name).await
    }

    /// Seed catalog rows in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on insert failure; nothing is written then.
    pub async fn seed_catalog(&self, catalog: &CatalogSeed) -> Result<(), DatabaseError> {
        let _guard = self.lock().await;
        let tx = self.db.conn().transaction().await?;
        let repo = Repo::new(&tx);
        let result = async {
            for risk in &catalog.risks {
                repo.upsert_risk(risk).await?;
            }
            for threat in &catalog.threats {
                repo.upsert_threat(threat).await?;
            }
            for mapping in &catalog.framework_mappings {
                repo.insert_framework_mapping(mapping).await?;
            }
            Ok::<(), DatabaseError>(())
        }
        .await;
        match result {
            Ok(()) => {
                tx.commit().await?;
                Ok(())
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    tracing::warn!(error = %rollback, "catalog seed rollback failed");
                }
                Err(e)
            }
        }
    }
}

/// Catalog rows to import.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct CatalogSeed {
    #[serde(default)]
    pub risks: Vec<scf_core::entities::ScfRisk>,
    #[serde(default)]
    pub threats: Vec<scf_core::entities::ScfThreat>,
    #[serde(default)]
    pub framework_mappings: Vec<scf_core::entities::FrameworkMapping>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use scf_core::entities::{FrameworkMapping, ScfRisk};

    #[test]
    fn options_follow_config() {
        let config = BootstrapConfig {
            require_config_version: "v9".into(),
            default_domain: "Misc".into(),
        };
        let options = BootstrapOptions::from(&config);
        assert_eq!(options.required_version, "v9");
        assert_eq!(options.default_domain, "Misc");
        assert_eq!(BootstrapOptions::default().default_domain, "Uncategorized");
    }

    #[tokio::test]
    async fn seed_catalog_is_all_or_nothing() {
        let svc = ScfService::new_local(":memory:", BootstrapOptions::default())
            .await
            .unwrap();

        svc.db()
            .conn()
            .execute_batch(
                "CREATE TRIGGER reject_maps BEFORE INSERT ON scf_framework_maps
                 BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
            )
            .await
            .unwrap();

        let seed = CatalogSeed {
            risks: vec![ScfRisk {
                object_id: "R-1".into(),
                title: "Risk".into(),
                description: String::new(),
            }],
            framework_mappings: vec![FrameworkMapping {
                scf_object_id: "A".into(),
                framework: "SOC2".into(),
                external_id: "CC1".into(),
            }],
            ..Default::default()
        };
        assert!(svc.seed_catalog(&seed).await.is_err());
        assert!(svc.repo().get_risk("R-1").await.unwrap().is_none());
    }
}
