//! Read side: full documents with related pages, and the project page tree.
//!
//! Both reads take the service gate, so they never observe a bootstrap that
//! has not committed.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use scf_core::entities::{FrameworkMapping, Page};
use scf_core::responses::{
    DocumentFull, DocumentFullResponse, DocumentTreeNode, DocumentTreeResponse,
    FrameworkMappingGroup, RelatedPage,
};

use crate::error::BootstrapError;
use crate::repos::Repo;
use crate::service::ScfService;

/// Group mapping rows by framework. Groups and the ids inside each are
/// sorted ascending; blank ids are dropped and duplicates collapsed.
#[must_use]
pub fn group_framework_mappings(mappings: Vec<FrameworkMapping>) -> Vec<FrameworkMappingGroup> {
    let mut groups: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for mapping in mappings {
        let external_id = mapping.external_id.trim();
        if external_id.is_empty() {
            continue;
        }
        groups
            .entry(mapping.framework)
            .or_default()
            .insert(external_id.to_string());
    }
    groups
        .into_iter()
        .map(|(framework, ids)| FrameworkMappingGroup {
            framework,
            external_ids: ids.into_iter().collect(),
        })
        .collect()
}

impl ScfService {
    /// Load one page with its decoded control metadata, its evidence
    /// requests, and the pages it links to.
    ///
    /// # Errors
    ///
    /// `ProjectNotFound` when the project is not in the organization,
    /// `DocumentNotFound` when the page is not in the project, `Database`
    /// on query failure.
    pub async fn document_full(
        &self,
        organization_id: &str,
        project_id: &str,
        document_id: &str,
    ) -> Result<DocumentFullResponse, BootstrapError> {
        let _guard = self.lock().await;
        let repo = self.repo();
        ensure_project(repo, organization_id, project_id).await?;

        let page = repo
            .get_page(project_id, document_id)
            .await?
            .ok_or_else(|| BootstrapError::DocumentNotFound(document_id.to_string()))?;

        let scf_id = page.scf_id();
        let framework_mappings = match scf_id.as_deref() {
            Some(id) => group_framework_mappings(repo.list_framework_mappings(id).await?),
            None => Vec::new(),
        };
        let evidence_requests = repo.list_evidence_requests_for_page(&page.object_id).await?;

        let mut related_pages = Vec::new();
        for relation in repo.list_relations_from(&page.object_id).await? {
            match repo.get_page(project_id, &relation.to_page_id).await? {
                Some(target) => related_pages.push(RelatedPage::new(&target, relation.relation_type)),
                None => tracing::warn!(
                    relation_id = %relation.object_id,
                    to_page_id = %relation.to_page_id,
                    "relation target missing; skipping"
                ),
            }
        }

        Ok(DocumentFullResponse {
            document: DocumentFull {
                page_kind: page.kind(),
                is_control: page.is_control(),
                frameworks: page.framework_keys(),
                scf_id,
                framework_mappings,
                evidence_requests,
                object_id: page.object_id,
                template_page_id: page.template_page_id,
                title: page.title,
                content: page.content,
                status: page.status,
                parent_id: page.parent_id,
                sort_order: page.sort_order,
            },
            related_pages,
        })
    }

    /// The project's page forest: roots first, children by `sort_order`.
    ///
    /// # Errors
    ///
    /// `ProjectNotFound` when the project is not in the organization,
    /// `Database` on query failure.
    pub async fn document_tree(
        &self,
        organization_id: &str,
        project_id: &str,
    ) -> Result<DocumentTreeResponse, BootstrapError> {
        let _guard = self.lock().await;
        let repo = self.repo();
        ensure_project(repo, organization_id, project_id).await?;

        // Level by level over parent-id queries.
        let mut children: HashMap<Option<String>, Vec<Page>> = HashMap::new();
        let mut frontier: Vec<Option<String>> = vec![None];
        let mut visited: HashSet<String> = HashSet::new();
        while let Some(parent) = frontier.pop() {
            let pages = repo.list_child_pages(project_id, parent.as_deref()).await?;
            for page in &pages {
                if visited.insert(page.object_id.clone()) {
                    frontier.push(Some(page.object_id.clone()));
                }
            }
            children.insert(parent, pages);
        }

        let mut placed = HashSet::new();
        let roots = assemble(None, &mut children, &mut placed);
        Ok(DocumentTreeResponse {
            project_id: project_id.to_string(),
            roots,
        })
    }
}

async fn ensure_project(
    repo: Repo<'_>,
    organization_id: &str,
    project_id: &str,
) -> Result<(), BootstrapError> {
    match repo.get_project(organization_id, project_id).await? {
        Some(_) => Ok(()),
        None => Err(BootstrapError::ProjectNotFound(project_id.to_string())),
    }
}

fn assemble(
    parent: Option<String>,
    children: &mut HashMap<Option<String>, Vec<Page>>,
    placed: &mut HashSet<String>,
) -> Vec<DocumentTreeNode> {
    let Some(pages) = children.remove(&parent) else {
        return Vec::new();
    };
    let mut nodes = Vec::with_capacity(pages.len());
    for page in pages {
        if !placed.insert(page.object_id.clone()) {
            continue;
        }
        let mut node = DocumentTreeNode::leaf(&page);
        node.children = assemble(Some(page.object_id), children, placed);
        nodes.push(node);
    }
    nodes
}
