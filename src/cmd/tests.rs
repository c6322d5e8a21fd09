// amandus: Browser-Based Git Workspace Service
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use serde_json::json;

use super::write_json;
use crate::sync::{CommitOutcome, SaveReport};

#[test]
fn test_write_json_pretty_with_newline() {
    let mut out = Vec::new();
    write_json(&mut out, &json!({ "branch": "feature-x" })).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.ends_with("}\n"));
    insta::assert_snapshot!(text.trim_end(), @r#"
    {
      "branch": "feature-x"
    }
    "#);
}

#[test]
fn test_save_report_shape() {
    let report = SaveReport {
        file: "example.com/team/repo/a.txt".to_string(),
        branch: "feature-x".to_string(),
        message: "User alice modified file a.txt".to_string(),
        outcome: CommitOutcome::Committed,
        pushed: true,
    };
    let mut out = Vec::new();
    write_json(&mut out, &report).unwrap();
    insta::assert_snapshot!(String::from_utf8(out).unwrap().trim_end(), @r#"
    {
      "file": "example.com/team/repo/a.txt",
      "branch": "feature-x",
      "message": "User alice modified file a.txt",
      "outcome": "committed",
      "pushed": true
    }
    "#);
}
