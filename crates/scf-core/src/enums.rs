//! Page kinds, statuses, relation types, and evidence enums.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`
//! and expose `as_str()` returning the exact string stored in SQL.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// PageKind
// ---------------------------------------------------------------------------

/// Kind of a generated page in the project document hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    Overview,
    Domain,
    Control,
    Risk,
    Threat,
    /// Pages created outside of SCF bootstrapping.
    Other,
}

impl PageKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Domain => "domain",
            Self::Control => "control",
            Self::Risk => "risk",
            Self::Threat => "threat",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PageStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a page.
///
/// ```text
/// draft → in_progress → complete
///                     → needs_review → in_progress
/// ```
///
/// Bootstrapping only ever writes `draft` (structural pages) and
/// `in_progress` (control pages); later transitions belong to page editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PageStatus {
    Draft,
    InProgress,
    Complete,
    NeedsReview,
}

impl PageStatus {
    #[must_use]
    #[allow(clippy::match_same_arms)]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Draft => &[Self::InProgress],
            Self::InProgress => &[Self::Complete, Self::NeedsReview],
            Self::NeedsReview => &[Self::InProgress],
            Self::Complete => &[Self::NeedsReview],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::InProgress => "in_progress",
            Self::Complete => "complete",
            Self::NeedsReview => "needs_review",
        }
    }
}

impl fmt::Display for PageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RelationType
// ---------------------------------------------------------------------------

/// Directed relation between two pages. Always written in reciprocal pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    ControlToRisk,
    RiskToControl,
    ControlToThreat,
    ThreatToControl,
}

impl RelationType {
    /// The relation stored on the reciprocal row.
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::ControlToRisk => Self::RiskToControl,
            Self::RiskToControl => Self::ControlToRisk,
            Self::ControlToThreat => Self::ThreatToControl,
            Self::ThreatToControl => Self::ControlToThreat,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ControlToRisk => "control_to_risk",
            Self::RiskToControl => "risk_to_control",
            Self::ControlToThreat => "control_to_threat",
            Self::ThreatToControl => "threat_to_control",
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ProjectStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    Archived,
}

impl ProjectStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EvidencePriority
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EvidencePriority {
    Low,
    Medium,
    High,
    Critical,
}

impl EvidencePriority {
    /// Priority assigned to evidence requested for a control.
    #[must_use]
    pub const fn for_control(priority_control: bool) -> Self {
        if priority_control { Self::High } else { Self::Medium }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for EvidencePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EvidenceStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceStatus {
    Pending,
    InProgress,
    Fulfilled,
    Rejected,
    Cancelled,
}

impl EvidenceStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Fulfilled => "fulfilled",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for EvidenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_serde_roundtrip {
        ($name:ident, $ty:ty, $variant:expr, $expected:expr) => {
            #[test]
            fn $name() {
                let json = serde_json::to_string(&$variant).unwrap();
                assert_eq!(json, format!("\"{}\"", $expected));
                let back: $ty = serde_json::from_str(&json).unwrap();
                assert_eq!(back, $variant);
                assert_eq!($variant.as_str(), $expected);
            }
        };
    }

    test_serde_roundtrip!(page_kind_overview, PageKind, PageKind::Overview, "overview");
    test_serde_roundtrip!(page_kind_control, PageKind, PageKind::Control, "control");
    test_serde_roundtrip!(page_status_in_progress, PageStatus, PageStatus::InProgress, "in_progress");
    test_serde_roundtrip!(page_status_needs_review, PageStatus, PageStatus::NeedsReview, "needs_review");
    test_serde_roundtrip!(
        relation_control_to_risk,
        RelationType,
        RelationType::ControlToRisk,
        "control_to_risk"
    );
    test_serde_roundtrip!(
        relation_threat_to_control,
        RelationType,
        RelationType::ThreatToControl,
        "threat_to_control"
    );
    test_serde_roundtrip!(priority_high, EvidencePriority, EvidencePriority::High, "high");
    test_serde_roundtrip!(evidence_pending, EvidenceStatus, EvidenceStatus::Pending, "pending");

    #[test]
    fn relation_inverse_is_involution() {
        for rel in [
            RelationType::ControlToRisk,
            RelationType::RiskToControl,
            RelationType::ControlToThreat,
            RelationType::ThreatToControl,
        ] {
            assert_ne!(rel.inverse(), rel);
            assert_eq!(rel.inverse().inverse(), rel);
        }
    }

    #[test]
    fn page_status_transitions() {
        assert!(PageStatus::Draft.can_transition_to(PageStatus::InProgress));
        assert!(PageStatus::InProgress.can_transition_to(PageStatus::Complete));
        assert!(!PageStatus::Draft.can_transition_to(PageStatus::Complete));
        assert!(!PageStatus::Complete.can_transition_to(PageStatus::Draft));
    }

    #[test]
    fn evidence_priority_follows_control_flag() {
        assert_eq!(EvidencePriority::for_control(true), EvidencePriority::High);
        assert_eq!(EvidencePriority::for_control(false), EvidencePriority::Medium);
    }
}
