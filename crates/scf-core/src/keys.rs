//! Stable page keys.
//!
//! A page's stable key (`template_page_id`) is unique per project and is what
//! find-or-create matches on, so the same configuration always maps onto the
//! same pages.

use crate::enums::PageKind;

pub const CONTROLS_OVERVIEW_KEY: &str = "controls-overview";
pub const RISKS_OVERVIEW_KEY: &str = "risks-overview";
pub const THREATS_OVERVIEW_KEY: &str = "threats-overview";

pub const CONTROLS_OVERVIEW_TITLE: &str = "Controls Overview";
pub const RISKS_OVERVIEW_TITLE: &str = "Risks";
pub const THREATS_OVERVIEW_TITLE: &str = "Threats";

/// Lower-case, trim, and hyphenate spaces.
#[must_use]
pub fn slugify(input: &str) -> String {
    input.trim().to_lowercase().replace(' ', "-")
}

#[must_use]
pub fn domain_key(domain: &str) -> String {
    format!("domain-{}", slugify(domain))
}

#[must_use]
pub fn control_key(control_id: &str) -> String {
    format!("control-{control_id}")
}

#[must_use]
pub fn risk_key(risk_id: &str) -> String {
    format!("risk-{risk_id}")
}

#[must_use]
pub fn threat_key(threat_id: &str) -> String {
    format!("threat-{threat_id}")
}

/// Infer a page kind from its stable key, for rows written without one.
#[must_use]
pub fn infer_page_kind(key: &str) -> PageKind {
    let id = key.trim().to_lowercase();
    match id.as_str() {
        CONTROLS_OVERVIEW_KEY | RISKS_OVERVIEW_KEY | THREATS_OVERVIEW_KEY => PageKind::Overview,
        _ if id.starts_with("domain-") => PageKind::Domain,
        _ if id.starts_with("control-") => PageKind::Control,
        _ if id.starts_with("risk-") => PageKind::Risk,
        _ if id.starts_with("threat-") => PageKind::Threat,
        _ => PageKind::Other,
    }
}
