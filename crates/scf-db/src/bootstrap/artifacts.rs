//! Evidence requests, the project description, and the project auditor.

use std::collections::HashMap;

use scf_core::describe::{DescriptionInputs, project_description, truncate};
use scf_core::entities::{
    AuditRequirement, AuditTarget, Auditor, AuditorInstructions, SuggestedSource,
};
use scf_core::enums::EvidencePriority;
use scf_core::input::{ControlSelection, ScfConfigV1};

use super::graph::{DocumentGraph, GraphContext};
use super::resolver::ResolvedSelection;
use crate::error::DatabaseError;
use crate::repos::Repo;
use crate::repos::evidence_request::NewEvidenceRequest;

pub const AUDITOR_NAME: &str = "SCF Controls Auditor";
pub const EVIDENCE_CREATED_BY: &str = "system:scf_config";
pub const PASSING_SCORE: u32 = 80;
pub const REQUIREMENT_WEIGHT: u32 = 100;

const MAX_PROJECT_DESCRIPTION: usize = 2000;
const MAX_AUDITOR_DESCRIPTION: usize = 500;

const EVALUATION_INSTRUCTIONS: &str = "Review this control and its associated evidence to determine if the assessment objectives are met.";
const SUCCESS_CRITERIA: [&str; 2] = [
    "Controls are implemented as described and operating effectively.",
    "Evidence provided is complete, relevant, and recent.",
];
const FAILURE_CRITERIA: [&str; 2] = [
    "Key controls are missing or not fully implemented.",
    "Evidence is missing, outdated, or does not cover the scope.",
];

/// The caller's description if given, otherwise one synthesized from the
/// selection.
#[must_use]
pub fn describe_project(config: &ScfConfigV1, selected: &[&ControlSelection]) -> String {
    let explicit = config.description.trim();
    let text = if explicit.is_empty() {
        project_description(&DescriptionInputs::from_selection(selected, &config.timeline))
    } else {
        explicit.to_string()
    };
    truncate(&text, MAX_PROJECT_DESCRIPTION)
}

/// Auditor instructions for the graph: one target per control page in
/// processing order and one requirement per distinct assessment objective.
#[must_use]
pub fn build_auditor_instructions(
    resolved: &ResolvedSelection<'_>,
    graph: &DocumentGraph,
) -> AuditorInstructions {
    let mut targets = Vec::with_capacity(graph.control_order.len());
    let mut objectives: Vec<ObjectiveRefs<'_>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for (control_id, page) in graph.controls_in_order() {
        targets.push(AuditTarget {
            control_id: control_id.to_string(),
            document_object_id: page.object_id.clone(),
        });

        let Some(rc) = resolved.control(control_id) else {
            continue;
        };
        for ao in &rc.objectives {
            let slot = *index.entry(ao.object_id.as_str()).or_insert_with(|| {
                objectives.push(ObjectiveRefs {
                    id: ao.object_id.as_str(),
                    statement: ao.statement.as_str(),
                    controls: Vec::new(),
                    evidence_ids: Vec::new(),
                });
                objectives.len() - 1
            });
            let refs = &mut objectives[slot];
            push_unique(&mut refs.controls, control_id);
            for id in &rc.control.evidence_request_ids {
                let id = id.trim();
                if !id.is_empty() {
                    push_unique(&mut refs.evidence_ids, id);
                }
            }
        }
    }

    AuditorInstructions {
        requirements: objectives.iter().map(ObjectiveRefs::requirement).collect(),
        passing_score: PASSING_SCORE,
        evaluation_instructions: EVALUATION_INSTRUCTIONS.to_string(),
        targets,
    }
}

struct ObjectiveRefs<'a> {
    id: &'a str,
    statement: &'a str,
    controls: Vec<&'a str>,
    evidence_ids: Vec<&'a str>,
}

impl ObjectiveRefs<'_> {
    fn requirement(&self) -> AuditRequirement {
        let mut context = format!("Control: {}", self.controls.join(", "));
        if !self.evidence_ids.is_empty() {
            context.push_str("\nSCF evidence IDs: ");
            context.push_str(&self.evidence_ids.join(", "));
        }
        AuditRequirement {
            id: format!("req-{}", self.id),
            title: self.statement.to_string(),
            description: format!("Assessment objective {}: {}", self.id, self.statement),
            context,
            success_criteria: SUCCESS_CRITERIA.iter().map(ToString::to_string).collect(),
            failure_criteria: FAILURE_CRITERIA.iter().map(ToString::to_string).collect(),
            weight: REQUIREMENT_WEIGHT,
        }
    }
}

fn push_unique<'a>(list: &mut Vec<&'a str>, item: &'a str) {
    if !list.contains(&item) {
        list.push(item);
    }
}

/// Counts from one artifact pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArtifactCounts {
    /// Rows in the graph after the pass, found or created.
    pub total: u32,
    pub created: u32,
}

pub struct DerivedArtifactGenerator<'c, 'g> {
    repo: Repo<'c>,
    ctx: GraphContext<'g>,
}

impl<'c, 'g> DerivedArtifactGenerator<'c, 'g> {
    #[must_use]
    pub const fn new(repo: Repo<'c>, ctx: GraphContext<'g>) -> Self {
        Self { repo, ctx }
    }

    /// One evidence request per resolved evidence item of each control,
    /// attached to the control's page.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a read or insert fails.
    pub async fn evidence_requests(
        &self,
        resolved: &ResolvedSelection<'_>,
        graph: &DocumentGraph,
    ) -> Result<ArtifactCounts, DatabaseError> {
        let mut counts = ArtifactCounts::default();
        for (control_id, page) in graph.controls_in_order() {
            let Some(rc) = resolved.control(control_id) else {
                continue;
            };
            for item in &rc.evidence {
                let title = if item.artifact.is_empty() {
                    item.object_id.clone()
                } else {
                    format!("{} - {}", item.object_id, item.artifact)
                };
                let new = NewEvidenceRequest {
                    page_id: page.object_id.clone(),
                    evidence_id: item.object_id.clone(),
                    title,
                    description: item.description.clone(),
                    required_type: "any".to_string(),
                    suggested_sources: vec![SuggestedSource {
                        source_type: "scf".to_string(),
                        evidence_id: item.object_id.clone(),
                        area_of_focus: item.area_of_focus.clone(),
                        artifact: item.artifact.clone(),
                        control_ids: vec![control_id.to_string()],
                    }],
                    acceptance_criteria: format!(
                        "Evidence must demonstrate that control {control_id} is implemented and maintained using artifact '{}'.",
                        item.artifact
                    ),
                    priority: EvidencePriority::for_control(rc.control.priority),
                    created_by: EVIDENCE_CREATED_BY.to_string(),
                };
                let (_, created) = self
                    .repo
                    .find_or_create_evidence_request(self.ctx.project_id, new)
                    .await?;
                counts.total += 1;
                if created {
                    counts.created += 1;
                }
            }
        }
        Ok(counts)
    }

    /// Create the project's auditor, or rewrite an existing one's targets,
    /// requirements and description to match `graph`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a read or write fails.
    pub async fn auditor(
        &self,
        resolved: &ResolvedSelection<'_>,
        graph: &DocumentGraph,
    ) -> Result<(Auditor, bool), DatabaseError> {
        let instructions = build_auditor_instructions(resolved, graph);
        let objective_ids: Vec<&str> = instructions
            .requirements
            .iter()
            .map(|r| r.id.trim_start_matches("req-"))
            .collect();
        let mut description = format!(
            "Automated assessment of {} SCF control(s)",
            instructions.targets.len()
        );
        if !objective_ids.is_empty() {
            description.push_str(" covering assessment objectives ");
            description.push_str(&objective_ids.join(", "));
        }
        let description = truncate(&description, MAX_AUDITOR_DESCRIPTION);

        self.repo
            .upsert_auditor(
                self.ctx.organization_id,
                self.ctx.project_id,
                AUDITOR_NAME,
                &description,
                instructions,
            )
            .await
    }
}
