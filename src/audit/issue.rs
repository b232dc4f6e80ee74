//! Issue records produced by the in-page audit script

use serde::{Deserialize, Serialize};

/// One reported finding: a rule identifier plus a human-readable message.
///
/// Only `code` and `message` are inspected by the classifier; the remaining
/// fields pass through to the client untouched. Absent fields deserialize to
/// empty strings so one sparse record cannot fail the whole audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Rule identifier, e.g. "WCAG2AA.Principle1.Guideline1_4.1_4_3.G18"
    #[serde(default)]
    pub code: String,

    /// Human-readable description of the finding
    #[serde(default)]
    pub message: String,

    /// Severity: "error", "warning" or "notice"
    #[serde(rename = "type", default)]
    pub issue_type: String,

    /// CSS selector of the offending node
    #[serde(default)]
    pub selector: String,

    /// Outer HTML snippet of the offending node
    #[serde(default)]
    pub context: String,
}

impl Issue {
    /// True when the record carries neither a code nor a message.
    ///
    /// Such records are kept (they classify as "other") but noted at debug
    /// level by the runner.
    pub fn is_blank(&self) -> bool {
        self.code.is_empty() && self.message.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_record_deserializes_with_empty_fields() {
        let issue: Issue = serde_json::from_str(r#"{"message": "Something is off"}"#).unwrap();
        assert_eq!(issue.code, "");
        assert_eq!(issue.message, "Something is off");
        assert_eq!(issue.issue_type, "");
        assert!(!issue.is_blank());
    }

    #[test]
    fn type_field_round_trips_under_wire_name() {
        let issue: Issue = serde_json::from_str(
            r#"{"code": "X", "message": "m", "type": "warning", "selector": "img", "context": "<img>"}"#,
        )
        .unwrap();
        assert_eq!(issue.issue_type, "warning");

        let wire = serde_json::to_value(&issue).unwrap();
        assert_eq!(wire["type"], "warning");
        assert!(wire.get("issue_type").is_none());
    }
}
