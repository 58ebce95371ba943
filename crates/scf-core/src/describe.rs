//! Derived text: project descriptions and generated page content.
//!
//! Everything here is a pure function of its arguments so it can be tested
//! without a database.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use crate::input::{ControlSelection, Timeline};
use crate::keys::domain_key;

/// Facts a synthesized project description is built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptionInputs {
    pub selected_count: usize,
    pub coverage: BTreeSet<String>,
    pub core: BTreeSet<String>,
    pub max_months: u32,
    pub priority_count: usize,
}

impl DescriptionInputs {
    #[must_use]
    pub fn from_selection(selected: &[&ControlSelection], timeline: &Timeline) -> Self {
        let mut inputs = Self {
            selected_count: selected.len(),
            max_months: timeline.max_months,
            ..Self::default()
        };
        for control in selected {
            inputs.coverage.extend(control.coverage_frameworks());
            inputs.core.extend(control.core_frameworks());
            if control.priority {
                inputs.priority_count += 1;
            }
        }
        inputs
    }
}

/// Summarize a selection as a one-sentence project description.
///
/// ```
/// use scf_core::describe::{project_description, DescriptionInputs};
///
/// let text = project_description(&DescriptionInputs {
///     selected_count: 1,
///     coverage: ["SOC2".to_string()].into(),
///     core: ["SOC2".to_string()].into(),
///     max_months: 6,
///     priority_count: 1,
/// });
/// assert_eq!(
///     text,
///     "SCF project with 1 selected control, covering SOC2, core: SOC2, over 6 months, all marked as priority."
/// );
/// ```
#[must_use]
pub fn project_description(inputs: &DescriptionInputs) -> String {
    let n = inputs.selected_count;
    if n == 0 {
        return "SCF project with 0 selected controls.".to_string();
    }

    let mut parts = Vec::with_capacity(5);
    if n == 1 {
        parts.push("SCF project with 1 selected control".to_string());
    } else {
        parts.push(format!("SCF project with {n} selected controls"));
    }
    if !inputs.coverage.is_empty() {
        parts.push(format!("covering {}", join(&inputs.coverage)));
    }
    if !inputs.core.is_empty() {
        parts.push(format!("core: {}", join(&inputs.core)));
    }
    if inputs.max_months > 0 {
        parts.push(format!("over {} months", inputs.max_months));
    }
    match inputs.priority_count {
        0 => {}
        p if p == n => parts.push("all marked as priority".to_string()),
        p => parts.push(format!("{p} marked as priority")),
    }

    format!("{}.", parts.join(", "))
}

fn join(set: &BTreeSet<String>) -> String {
    set.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// Domain name a control is grouped under; blank domains use `fallback`.
#[must_use]
pub fn domain_name<'a>(control: &'a ControlSelection, fallback: &'a str) -> &'a str {
    let trimmed = control.domain.trim();
    if trimmed.is_empty() { fallback } else { trimmed }
}

/// Markdown for the root Controls Overview page.
#[must_use]
pub fn overview_markdown(
    project_name: &str,
    selected: &[&ControlSelection],
    timeline: &Timeline,
    default_domain: &str,
) -> String {
    let mut domains: BTreeMap<String, &str> = BTreeMap::new();
    for control in selected {
        let name = domain_name(control, default_domain);
        domains.entry(domain_key(name)).or_insert(name);
    }

    let mut b = String::new();
    let _ = writeln!(b, "# {project_name}\n");
    b.push_str("This project was created from an SCF configuration document.\n\n");
    let _ = writeln!(b, "- **Total selected controls:** {}", selected.len());
    if timeline.max_months > 0 {
        let _ = writeln!(b, "- **Planned duration:** {} months", timeline.max_months);
    }
    if !domains.is_empty() {
        let _ = writeln!(
            b,
            "- **Domains covered:** {}",
            domains.into_values().collect::<Vec<_>>().join(", ")
        );
    }
    if !timeline.windows.is_empty() {
        b.push_str("\n## Timeline windows\n\n");
        for w in &timeline.windows {
            let _ = writeln!(b, "- {} (months {}–{})", w.goal, w.start_month, w.end_month);
        }
    }
    b
}

#[must_use]
pub fn domain_content(domain: &str) -> String {
    format!("Controls in the {domain} domain.")
}

/// Markdown for a single control page.
///
/// Assessment objectives and evidence are served by their own artifacts and
/// related pages, so they are not rendered here.
#[must_use]
pub fn control_markdown(control: &ControlSelection) -> String {
    let mut b = String::new();
    let _ = writeln!(b, "# {} - {}\n", control.object_id, control.title);
    b.push_str("## Control intent\n\n");
    if !control.control_description.is_empty() {
        b.push_str(&control.control_description);
        b.push_str("\n\n");
    }
    let _ = writeln!(b, "- **Domain:** {}", control.domain);
    if !control.cadence.is_empty() {
        let _ = writeln!(b, "- **Cadence:** {}", control.cadence);
    }
    if control.weight != 0.0 {
        let _ = writeln!(b, "- **Weight:** {:.2}", control.weight);
    }
    let coverage = control.coverage_frameworks();
    if !coverage.is_empty() {
        let _ = writeln!(b, "- **Framework coverage:** {}", coverage.join(", "));
    }
    let core = control.core_frameworks();
    if !core.is_empty() {
        let _ = writeln!(b, "- **Core:** {}", core.join(", "));
    }
    b
}

/// Page title for a control: `"<id> - <title>"`.
#[must_use]
pub fn control_title(control: &ControlSelection) -> String {
    format!("{} - {}", control.object_id, control.title)
}

/// Trim to `max` bytes on a char boundary, ending in `...` when cut.
#[must_use]
pub fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let budget = max.saturating_sub(3);
    let mut end = budget;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}
