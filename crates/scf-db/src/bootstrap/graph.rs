//! Page tree construction.
//!
//! Every page is found or created by its stable key, so building the same
//! selection twice against one project lands on the same rows.

use std::collections::{BTreeMap, HashMap, HashSet};

use scf_core::describe::{
    control_markdown, control_title, domain_content, domain_name, overview_markdown,
};
use scf_core::entities::Page;
use scf_core::enums::{PageKind, PageStatus};
use scf_core::input::{ControlSelection, ScfConfigV1};
use scf_core::keys::{
    CONTROLS_OVERVIEW_KEY, CONTROLS_OVERVIEW_TITLE, RISKS_OVERVIEW_KEY, RISKS_OVERVIEW_TITLE,
    THREATS_OVERVIEW_KEY, THREATS_OVERVIEW_TITLE, control_key, domain_key, risk_key, threat_key,
};

use super::resolver::ResolvedSelection;
use crate::error::DatabaseError;
use crate::repos::Repo;
use crate::repos::page::NewPage;

const RISKS_ROOT_CONTENT: &str = "Risks relevant to this project derived from selected SCF controls.";
const THREATS_ROOT_CONTENT: &str =
    "Threats relevant to this project derived from selected SCF controls.";

/// Where the graph is written.
#[derive(Debug, Clone, Copy)]
pub struct GraphContext<'g> {
    pub organization_id: &'g str,
    pub project_id: &'g str,
    pub default_domain: &'g str,
}

/// Pages making up one project's graph after a build.
#[derive(Debug, Default)]
pub struct DocumentGraph {
    /// Control id → control page.
    pub control_pages: HashMap<String, Page>,
    /// Control ids in processing order (domain name, then control id).
    pub control_order: Vec<String>,
    pub risk_pages: HashMap<String, Page>,
    pub threat_pages: HashMap<String, Page>,
    /// Object ids of every page in the graph, found or created.
    pub page_ids: HashSet<String>,
    /// Pages this build inserted.
    pub pages_created: u32,
}

impl DocumentGraph {
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Control pages in processing order, paired with their control id.
    pub fn controls_in_order(&self) -> impl Iterator<Item = (&str, &Page)> {
        self.control_order
            .iter()
            .filter_map(|id| self.control_pages.get(id).map(|page| (id.as_str(), page)))
    }
}

pub struct DocumentGraphBuilder<'c, 'g> {
    repo: Repo<'c>,
    ctx: GraphContext<'g>,
    graph: DocumentGraph,
    next_root: i64,
}

impl<'c, 'g> DocumentGraphBuilder<'c, 'g> {
    #[must_use]
    pub fn new(repo: Repo<'c>, ctx: GraphContext<'g>) -> Self {
        Self {
            repo,
            ctx,
            graph: DocumentGraph::default(),
            next_root: 0,
        }
    }

    /// Build the overview, domain and control pages, then the risk and
    /// threat branches for whatever resolved.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on any failed read or insert.
    pub async fn build(
        mut self,
        config: &ScfConfigV1,
        resolved: &ResolvedSelection<'_>,
    ) -> Result<DocumentGraph, DatabaseError> {
        let selected: Vec<&ControlSelection> =
            resolved.controls.iter().map(|rc| rc.control).collect();

        if !selected.is_empty() {
            self.build_controls(config, &selected).await?;
        }

        if !resolved.risks.is_empty() {
            let root = self
                .root(RISKS_OVERVIEW_KEY, RISKS_OVERVIEW_TITLE, RISKS_ROOT_CONTENT)
                .await?;
            for (i, risk) in resolved.risks.iter().enumerate() {
                let page = self
                    .put(
                        NewPage::new(
                            risk_key(&risk.object_id),
                            format!("{} - {}", risk.object_id, risk.title),
                            PageKind::Risk,
                        )
                        .parent(&root.object_id)
                        .content(risk.description.clone())
                        .sort_order(ordinal(i)),
                    )
                    .await?;
                self.graph.risk_pages.insert(risk.object_id.clone(), page);
            }
        }

        if !resolved.threats.is_empty() {
            let root = self
                .root(THREATS_OVERVIEW_KEY, THREATS_OVERVIEW_TITLE, THREATS_ROOT_CONTENT)
                .await?;
            for (i, threat) in resolved.threats.iter().enumerate() {
                let page = self
                    .put(
                        NewPage::new(
                            threat_key(&threat.object_id),
                            format!("{} - {}", threat.object_id, threat.title),
                            PageKind::Threat,
                        )
                        .parent(&root.object_id)
                        .content(threat.description.clone())
                        .sort_order(ordinal(i)),
                    )
                    .await?;
                self.graph.threat_pages.insert(threat.object_id.clone(), page);
            }
        }

        Ok(self.graph)
    }

    async fn build_controls(
        &mut self,
        config: &ScfConfigV1,
        selected: &[&ControlSelection],
    ) -> Result<(), DatabaseError> {
        let default_domain = self.ctx.default_domain;
        let content = overview_markdown(
            &config.project_name,
            selected,
            &config.timeline,
            default_domain,
        );
        let overview = self
            .root(CONTROLS_OVERVIEW_KEY, CONTROLS_OVERVIEW_TITLE, &content)
            .await?;

        for (d, (key, (domain, mut controls))) in group_by_domain(selected, default_domain)
            .into_iter()
            .enumerate()
        {
            let domain_page = self
                .put(
                    NewPage::new(key, domain, PageKind::Domain)
                        .parent(&overview.object_id)
                        .content(domain_content(domain))
                        .sort_order(ordinal(d)),
                )
                .await?;

            controls.sort_by(|a, b| a.object_id.cmp(&b.object_id));
            for (c, control) in controls.into_iter().enumerate() {
                let control_id = control.object_id.trim();
                if self.graph.control_pages.contains_key(control_id) {
                    tracing::warn!(control_id, "control selected twice; keeping first");
                    continue;
                }
                let page = self
                    .put(
                        NewPage::new(control_key(control_id), control_title(control), PageKind::Control)
                            .parent(&domain_page.object_id)
                            .content(control_markdown(control))
                            .status(PageStatus::InProgress)
                            .control(control_id, control.coverage_frameworks())
                            .sort_order(ordinal(c)),
                    )
                    .await?;
                self.graph.control_order.push(control_id.to_string());
                self.graph.control_pages.insert(control_id.to_string(), page);
            }
        }
        Ok(())
    }

    async fn root(&mut self, key: &str, title: &str, content: &str) -> Result<Page, DatabaseError> {
        let order = self.next_root;
        self.next_root += 1;
        self.put(NewPage::new(key, title, PageKind::Overview).content(content).sort_order(order))
            .await
    }

    async fn put(&mut self, new: NewPage) -> Result<Page, DatabaseError> {
        let (page, created) = self
            .repo
            .find_or_create_page(self.ctx.organization_id, self.ctx.project_id, new)
            .await?;
        if created {
            self.graph.pages_created += 1;
        }
        self.graph.page_ids.insert(page.object_id.clone());
        Ok(page)
    }
}

/// Selected controls grouped by domain page key, sorted by key. A group is
/// titled with the first spelling of the domain seen in the input.
fn group_by_domain<'a>(
    selected: &[&'a ControlSelection],
    default_domain: &'a str,
) -> BTreeMap<String, (&'a str, Vec<&'a ControlSelection>)> {
    let mut groups: BTreeMap<String, (&str, Vec<&ControlSelection>)> = BTreeMap::new();
    for control in selected {
        let name = domain_name(control, default_domain);
        groups
            .entry(domain_key(name))
            .or_insert_with(|| (name, Vec::new()))
            .1
            .push(control);
    }
    groups
}

/// 1-based sibling position.
fn ordinal(index: usize) -> i64 {
    i64::try_from(index).map_or(i64::MAX, |i| i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::resolver::CatalogResolver;
    use crate::test_support::helpers::{config, control, seed_project, test_db};
    use pretty_assertions::assert_eq;
    use scf_core::entities::ScfRisk;

    #[test]
    fn blank_domains_group_under_default() {
        let a = control("B-1", "Zeta");
        let b = control("A-1", "  ");
        let c = control("A-2", "Zeta");
        let groups = group_by_domain(&[&a, &b, &c], "Uncategorized");
        let names: Vec<_> = groups.values().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["Uncategorized", "Zeta"]);
        assert_eq!(groups["domain-zeta"].1.len(), 2);
    }

    #[test]
    fn domain_spellings_share_one_group() {
        let a = control("A-2", "access control");
        let b = control("A-1", "Access Control");
        let groups = group_by_domain(&[&a, &b], "Uncategorized");
        assert_eq!(groups.len(), 1);
        let (name, controls) = &groups["domain-access-control"];
        assert_eq!(*name, "access control");
        assert_eq!(controls.len(), 2);
    }

    #[tokio::test]
    async fn domain_spellings_get_distinct_positions() {
        let db = test_db().await;
        let repo = Repo::new(db.conn());
        let (org, project) = seed_project(&repo).await;

        let cfg = config(
            &org,
            vec![control("SCF-2", "Access Control"), control("SCF-1", "access control")],
        );
        let selected = cfg.selected_controls();
        let resolved = CatalogResolver::new(repo, &cfg).resolve_all(&selected).await.unwrap();
        let ctx = GraphContext {
            organization_id: &org,
            project_id: &project,
            default_domain: "Uncategorized",
        };
        let graph = DocumentGraphBuilder::new(repo, ctx).build(&cfg, &resolved).await.unwrap();

        // overview + 1 domain + 2 controls
        assert_eq!(graph.page_count(), 4);
        let one = &graph.control_pages["SCF-1"];
        let two = &graph.control_pages["SCF-2"];
        assert_eq!(one.parent_id, two.parent_id);
        assert_eq!((one.sort_order, two.sort_order), (1, 2));
    }

    #[tokio::test]
    async fn controls_sorted_by_domain_then_id() {
        let db = test_db().await;
        let repo = Repo::new(db.conn());
        let (org, project) = seed_project(&repo).await;

        let cfg = config(
            &org,
            vec![
                control("SCF-B-2", "Beta"),
                control("SCF-A-1", "Alpha"),
                control("SCF-B-1", "Beta"),
            ],
        );
        let selected = cfg.selected_controls();
        let resolved = CatalogResolver::new(repo, &cfg).resolve_all(&selected).await.unwrap();

        let ctx = GraphContext {
            organization_id: &org,
            project_id: &project,
            default_domain: "Uncategorized",
        };
        let graph = DocumentGraphBuilder::new(repo, ctx)
            .build(&cfg, &resolved)
            .await
            .unwrap();

        assert_eq!(graph.control_order, vec!["SCF-A-1", "SCF-B-1", "SCF-B-2"]);
        // overview + 2 domains + 3 controls
        assert_eq!(graph.page_count(), 6);
        assert_eq!(graph.pages_created, 6);

        let b1 = &graph.control_pages["SCF-B-1"];
        assert_eq!(b1.sort_order, 1);
        assert_eq!(b1.status, PageStatus::InProgress);
        assert_eq!(b1.template_page_id, "control-SCF-B-1");
        assert_eq!(graph.control_pages["SCF-B-2"].sort_order, 2);
    }

    #[tokio::test]
    async fn rebuild_reuses_every_page() {
        let db = test_db().await;
        let repo = Repo::new(db.conn());
        let (org, project) = seed_project(&repo).await;
        repo.upsert_risk(&ScfRisk {
            object_id: "R-1".into(),
            title: "Unauthorized access".into(),
            description: "desc".into(),
        })
        .await
        .unwrap();

        let mut c = control("SCF-AC-1", "Access Control");
        c.risk_ids = vec!["R-1".into()];
        let cfg = config(&org, vec![c]);
        let selected = cfg.selected_controls();
        let ctx = GraphContext {
            organization_id: &org,
            project_id: &project,
            default_domain: "Uncategorized",
        };

        let resolved = CatalogResolver::new(repo, &cfg).resolve_all(&selected).await.unwrap();
        let first = DocumentGraphBuilder::new(repo, ctx).build(&cfg, &resolved).await.unwrap();
        let second = DocumentGraphBuilder::new(repo, ctx).build(&cfg, &resolved).await.unwrap();

        assert_eq!(first.pages_created, 5);
        assert_eq!(second.pages_created, 0);
        assert_eq!(second.page_count(), 5);
        assert_eq!(
            first.risk_pages["R-1"].object_id,
            second.risk_pages["R-1"].object_id
        );
        assert_eq!(second.risk_pages["R-1"].title, "R-1 - Unauthorized access");

        let roots = repo.list_child_pages(&project, None).await.unwrap();
        let keys: Vec<_> = roots.iter().map(|p| p.template_page_id.as_str()).collect();
        assert_eq!(keys, vec!["controls-overview", "risks-overview"]);
    }
}
