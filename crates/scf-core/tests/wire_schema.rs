//! Serde roundtrip and JsonSchema validation tests for wire and entity types.

use chrono::Utc;
use schemars::schema_for;
use scf_core::entities::*;
use scf_core::enums::*;
use scf_core::input::*;
use scf_core::responses::*;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn control_page() -> Page {
    let now = Utc::now();
    Page {
        object_id: "doc-0a1b2c3d4e5f6071".into(),
        organization_id: "org-0a1b2c3d4e5f6071".into(),
        project_id: "prj-0a1b2c3d4e5f6071".into(),
        parent_id: Some("doc-1111111111111111".into()),
        template_page_id: "control-SCF-AC-1".into(),
        title: "SCF-AC-1 - Access control baseline".into(),
        content: "# SCF-AC-1 - Access control baseline\n".into(),
        status: PageStatus::InProgress,
        page_kind: Some(PageKind::Control),
        scf_control_id: Some("SCF-AC-1".into()),
        frameworks: Some(r#"["SOC2"]"#.into()),
        sort_order: 1,
        created_at: now,
        updated_at: now,
    }
}

fn evidence_request() -> EvidenceRequest {
    EvidenceRequest {
        object_id: "evr-0a1b2c3d4e5f6071".into(),
        project_id: "prj-0a1b2c3d4e5f6071".into(),
        page_id: "doc-0a1b2c3d4e5f6071".into(),
        evidence_id: "E-GOV-01".into(),
        title: "E-GOV-01 - Access matrix".into(),
        description: "Who can access what".into(),
        required_type: "any".into(),
        suggested_sources: vec![SuggestedSource {
            source_type: "scf".into(),
            evidence_id: "E-GOV-01".into(),
            area_of_focus: "Access".into(),
            artifact: "Access matrix".into(),
            control_ids: vec!["SCF-AC-1".into()],
        }],
        acceptance_criteria: "Evidence must demonstrate ...".into(),
        priority: EvidencePriority::High,
        status: EvidenceStatus::Pending,
        created_by: "system:scf_config".into(),
        created_at: Utc::now(),
    }
}

roundtrip_and_validate!(
    config_roundtrip,
    ScfConfigV1,
    ScfConfigV1 {
        version: SCF_CONFIG_VERSION.into(),
        project_name: "SOC2 readiness".into(),
        organization_id: "org-1".into(),
        controls: vec![ControlSelection {
            object_id: "SCF-AC-1".into(),
            title: "Access control baseline".into(),
            domain: "Access Control".into(),
            weight: 2.5,
            coverage: [("SOC2".to_string(), true)].into(),
            selected: true,
            risk_ids: vec!["R-1".into()],
            ..Default::default()
        }],
        timeline: Timeline {
            windows: vec![TimelineWindow {
                goal: "Foundations".into(),
                start_month: 1,
                end_month: 3,
            }],
            max_months: 3,
            total_unique_controls: 1,
        },
        evidence_requests: EvidenceRequestSection {
            items: vec![EvidenceRequestItem {
                object_id: "E-GOV-01".into(),
                artifact: "Access matrix".into(),
                ..Default::default()
            }],
            controls_by_evidence_id: [("E-GOV-01".to_string(), vec!["SCF-AC-1".to_string()])]
                .into(),
        },
        ..Default::default()
    }
);

roundtrip_and_validate!(page_roundtrip, Page, control_page());

roundtrip_and_validate!(
    relation_roundtrip,
    PageRelation,
    PageRelation {
        object_id: "rel-0a1b2c3d4e5f6071".into(),
        project_id: "prj-0a1b2c3d4e5f6071".into(),
        from_page_id: "doc-1".into(),
        to_page_id: "doc-2".into(),
        relation_type: RelationType::ControlToRisk,
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(evidence_request_roundtrip, EvidenceRequest, evidence_request());

roundtrip_and_validate!(
    auditor_roundtrip,
    Auditor,
    Auditor {
        object_id: "aud-0a1b2c3d4e5f6071".into(),
        organization_id: "org-1".into(),
        project_id: "prj-1".into(),
        name: "SCF Controls Auditor".into(),
        description: "Automated assessment".into(),
        schedule: String::new(),
        is_active: true,
        instructions: AuditorInstructions {
            requirements: vec![AuditRequirement {
                id: "req-AO-1".into(),
                title: "Access is reviewed".into(),
                description: "Assessment objective AO-1: Access is reviewed".into(),
                context: "Control: SCF-AC-1".into(),
                success_criteria: vec!["ok".into()],
                failure_criteria: vec!["not ok".into()],
                weight: 100,
            }],
            passing_score: 80,
            evaluation_instructions: "Evaluate".into(),
            targets: vec![AuditTarget {
                control_id: "SCF-AC-1".into(),
                document_object_id: "doc-1".into(),
            }],
        },
        last_run_at: None,
        run_count: 0,
        last_status: String::new(),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    bootstrap_response_roundtrip,
    BootstrapResponse,
    BootstrapResponse {
        project: ProjectSummary {
            object_id: "prj-1".into(),
            name: "SOC2 readiness".into(),
            description: "SCF project with 1 selected control.".into(),
            status: ProjectStatus::Active,
            compliance_score: 0.0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        },
        stats: BootstrapStats {
            controls: 1,
            documents: 7,
            evidence_requests: 1,
            auditors: 1,
        },
    }
);

roundtrip_and_validate!(
    document_full_roundtrip,
    DocumentFullResponse,
    DocumentFullResponse {
        document: DocumentFull {
            object_id: "doc-1".into(),
            template_page_id: "control-SCF-AC-1".into(),
            title: "SCF-AC-1 - Access control baseline".into(),
            content: String::new(),
            status: PageStatus::InProgress,
            page_kind: PageKind::Control,
            is_control: true,
            parent_id: Some("doc-0".into()),
            sort_order: 1,
            frameworks: vec!["SOC2".into()],
            scf_id: Some("SCF-AC-1".into()),
            framework_mappings: vec![FrameworkMappingGroup {
                framework: "ISO27001".into(),
                external_ids: vec!["A.5.1".into(), "A.5.2".into()],
            }],
            evidence_requests: vec![evidence_request()],
        },
        related_pages: vec![RelatedPage {
            object_id: "doc-2".into(),
            template_page_id: "risk-R-1".into(),
            title: "R-1 - Unauthorized access".into(),
            status: PageStatus::Draft,
            page_kind: PageKind::Risk,
            is_control: false,
            relation_type: RelationType::ControlToRisk,
        }],
    }
);

roundtrip_and_validate!(
    document_tree_roundtrip,
    DocumentTreeResponse,
    DocumentTreeResponse {
        project_id: "prj-1".into(),
        roots: vec![DocumentTreeNode {
            children: vec![DocumentTreeNode::leaf(&control_page())],
            ..DocumentTreeNode::leaf(&control_page())
        }],
    }
);

#[test]
fn related_page_derives_kind_and_control_flag() {
    let mut page = control_page();
    page.page_kind = None;
    let related = RelatedPage::new(&page, RelationType::RiskToControl);
    assert_eq!(related.page_kind, PageKind::Control);
    assert!(related.is_control);
    assert_eq!(related.relation_type, RelationType::RiskToControl);
}

#[test]
fn suggested_source_serializes_type_field() {
    let json = serde_json::to_value(&evidence_request().suggested_sources[0]).unwrap();
    assert_eq!(json["type"], "scf");
    assert!(json.get("source_type").is_none());
}

#[test]
fn tree_node_count_includes_descendants() {
    let leaf = DocumentTreeNode::leaf(&control_page());
    let root = DocumentTreeNode {
        children: vec![leaf.clone(), leaf],
        ..DocumentTreeNode::leaf(&control_page())
    };
    assert_eq!(root.node_count(), 3);
}
