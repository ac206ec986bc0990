//! Deterministic review rules.
//!
//! Pure functions over PR data so every rule is unit-testable without a
//! GitHub client. The review agent fetches commits, changed files, and test
//! file contents, then feeds them through these checks.

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::review::ReviewFinding;
use crate::github::types::{CommitEntry, PrFile};

/// Maximum commit subject length.
const MAX_SUBJECT_LEN: usize = 72;

/// Maximum length of an added source line.
const MAX_LINE_LEN: usize = 88;

fn conventional_commit_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(feat|fix|docs|style|refactor|test|chore)(\(.+\))?: .+")
            .expect("conventional commit regex is valid")
    })
}

fn fn_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"fn\s+(\w+)").expect("fn name regex is valid"))
}

fn short_sha(sha: &str) -> &str {
    &sha[..sha.len().min(7)]
}

/// Commit message format and length checks. All findings are blocking.
pub fn check_commit_messages(commits: &[CommitEntry]) -> Vec<ReviewFinding> {
    let mut findings = Vec::new();
    for commit in commits {
        let message = &commit.commit.message;
        let subject = message.lines().next().unwrap_or_default();

        if !conventional_commit_re().is_match(message) {
            findings.push(ReviewFinding::blocking(format!(
                "Commit `{}` doesn't follow conventional commit format",
                short_sha(&commit.sha)
            )));
        }
        if subject.len() > MAX_SUBJECT_LEN {
            findings.push(ReviewFinding::blocking(format!(
                "Commit `{}` has too long subject line (>{MAX_SUBJECT_LEN} chars)",
                short_sha(&commit.sha)
            )));
        }
    }
    findings
}

/// Patch hygiene checks on changed Rust files.
pub fn check_patch_hygiene(files: &[PrFile]) -> Vec<ReviewFinding> {
    let mut findings = Vec::new();
    for file in files {
        if !file.filename.ends_with(".rs") {
            continue;
        }
        let added = file.added_lines();

        if added
            .iter()
            .any(|l| l.trim_start().starts_with("use ") && l.contains("::*"))
        {
            findings.push(ReviewFinding::warning(format!(
                "Avoid glob imports in `{}`",
                file.filename
            )));
        }

        let introduces_items = added
            .iter()
            .any(|l| l.trim_start().starts_with("pub fn ") || l.trim_start().starts_with("pub struct "));
        let has_docs = added.iter().any(|l| l.trim_start().starts_with("///"));
        if introduces_items && !has_docs {
            findings.push(ReviewFinding::warning(format!(
                "Missing doc comments on new public items in `{}`",
                file.filename
            )));
        }

        if added.iter().any(|l| l.len() > MAX_LINE_LEN) {
            findings.push(ReviewFinding::warning(format!(
                "Lines too long in `{}` (>{MAX_LINE_LEN} chars)",
                file.filename
            )));
        }

        // Panicking calls are only blocked in non-test sources.
        if file.filename.starts_with("src/")
            && added
                .iter()
                .any(|l| l.contains(".unwrap(") || l.contains(".expect("))
        {
            findings.push(ReviewFinding::blocking(format!(
                "Panicking call found in `{}`. Propagate errors instead.",
                file.filename
            )));
        }
    }
    findings
}

/// Test coverage pairing and test quality checks.
///
/// `test_contents` maps each test file path in the PR to its content at the
/// PR head.
pub fn check_tests(files: &[PrFile], test_contents: &[(String, String)]) -> Vec<ReviewFinding> {
    let mut findings = Vec::new();

    let test_paths: Vec<&str> = files
        .iter()
        .filter(|f| f.filename.starts_with("tests/") && f.filename.ends_with(".rs"))
        .map(|f| f.filename.as_str())
        .collect();

    for file in files {
        if !file.filename.starts_with("src/") || !file.filename.ends_with(".rs") {
            continue;
        }
        if file.status == "removed" {
            continue;
        }
        let expected = format!("tests/{}", &file.filename[4..]);
        if !test_paths.contains(&expected.as_str()) {
            findings.push(ReviewFinding::blocking(format!(
                "Missing tests for `{}`",
                file.filename
            )));
        }
    }

    for (path, content) in test_contents {
        if !content.contains("assert") {
            findings.push(ReviewFinding::blocking(format!(
                "No assertions found in `{path}`"
            )));
        }
        if !content.contains("#[test]") && !content.contains("#[tokio::test]") {
            findings.push(ReviewFinding::warning(format!(
                "No `#[test]` functions found in `{path}`"
            )));
        }
        let test_count = content.matches("#[test]").count();
        let has_helper = fn_name_re()
            .captures_iter(content)
            .any(|c| !c[1].starts_with("test_"));
        if test_count >= 3 && !has_helper {
            findings.push(ReviewFinding::suggestion(format!(
                "Consider extracting shared setup in `{path}` into helper functions"
            )));
        }
    }

    findings
}
