//! Issue classification
//!
//! Partitions the flat audit output into the six categories the front-end
//! displays: contrast, alt text, structural elements, navigation, forms,
//! and everything else.

use serde::Serialize;

use crate::audit::Issue;

/// Grouped audit findings for one site
///
/// `siteName` echoes the requested URL verbatim (no normalization).
/// Built fresh per request, never persisted.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedResult {
    pub site_name: String,
    pub contrast_issues: Vec<Issue>,
    pub alt_issues: Vec<Issue>,
    pub element_issues: Vec<Issue>,
    pub navigation_issues: Vec<Issue>,
    pub form_issues: Vec<Issue>,
    pub other_issues: Vec<Issue>,
}

impl GroupedResult {
    /// Total number of issues across all buckets
    pub fn len(&self) -> usize {
        self.contrast_issues.len()
            + self.alt_issues.len()
            + self.element_issues.len()
            + self.navigation_issues.len()
            + self.form_issues.len()
            + self.other_issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partition issues into display categories.
///
/// Predicates run in fixed priority order and the first match wins, so every
/// issue lands in exactly one bucket; anything matching no predicate falls
/// through to `otherIssues`. Contrast is checked before the generic element
/// predicate: contrast rule messages routinely mention "element" and must not
/// be misfiled. All matching is case-insensitive substring containment, and
/// relative input order is preserved within each bucket.
///
/// Total function: an empty input yields all-empty buckets.
pub fn classify(site_name: impl Into<String>, issues: Vec<Issue>) -> GroupedResult {
    let mut grouped = GroupedResult {
        site_name: site_name.into(),
        ..GroupedResult::default()
    };

    for issue in issues {
        let code = issue.code.to_lowercase();
        let message = issue.message.to_lowercase();

        let bucket = if code.contains("1_4_3") || code.contains("contrast") || message.contains("contrast") {
            &mut grouped.contrast_issues
        } else if code.contains("image-alt") || message.contains("alt attribute") {
            &mut grouped.alt_issues
        } else if message.contains("element") || code.contains("heading-order") {
            &mut grouped.element_issues
        } else if message.contains("keyboard") || code.contains("focusable") {
            &mut grouped.navigation_issues
        } else if message.contains("form") || code.contains("label") {
            &mut grouped.form_issues
        } else {
            &mut grouped.other_issues
        };
        bucket.push(issue);
    }

    grouped
}
