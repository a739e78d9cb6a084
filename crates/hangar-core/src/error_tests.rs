// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn validation_issue_pointer_format() {
    let issue = ValidationIssue::new(["options", "opt_b", "0"], "got string, want integer");
    assert_eq!(issue.pointer(), "[options, opt_b, 0]");
}

#[test]
fn validation_error_message_joins_issues() {
    let err = ValidationError {
        issues: vec![
            ValidationIssue::new(["arguments"], "missing property 'a'"),
            ValidationIssue::new(["options", "b"], "got string, want integer"),
        ],
    };
    let msg = err.to_string();
    assert!(msg.contains("missing property 'a'"));
    assert!(msg.contains("got string, want integer"));
}
