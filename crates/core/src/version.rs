// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Branch-aware artifact versions (`<base>-<branch>`).

/// Branch prefixes dropped to keep versions short.
const BRANCH_PREFIXES: &[&str] = &["feature/", "bugfix/", "hotfix/", "release/", "develop/"];

const MAX_BRANCH_LEN: usize = 30;

/// Branch assumed when none is known.
pub const DEFAULT_BRANCH: &str = "main";

/// Combine a base version with a sanitized branch suffix.
///
/// An empty branch is treated as [`DEFAULT_BRANCH`].
pub fn version_with_branch(base: &str, branch: &str) -> String {
    let branch = if branch.is_empty() { DEFAULT_BRANCH } else { branch };
    format!("{}-{}", base, sanitize_branch(branch))
}

/// Reduce a branch name to characters that are legal in a version suffix.
pub fn sanitize_branch(branch: &str) -> String {
    let stripped = BRANCH_PREFIXES
        .iter()
        .find_map(|p| branch.strip_prefix(p))
        .unwrap_or(branch);

    let mut out = String::with_capacity(stripped.len());
    for c in stripped.chars() {
        let c = if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
            c
        } else {
            '-'
        };
        if c == '-' && (out.is_empty() || out.ends_with('-')) {
            continue;
        }
        out.push(c);
    }
    let mut out = out.trim_end_matches('-').to_string();

    if out.len() > MAX_BRANCH_LEN {
        out.truncate(MAX_BRANCH_LEN);
        out = out.trim_end_matches('-').to_string();
    }
    if out.is_empty() {
        return "unknown".to_string();
    }
    out.to_ascii_lowercase()
}

/// The portion before the branch suffix, when the remainder looks like a
/// dotted version. Otherwise the input is returned unchanged.
pub fn extract_base_version(version: &str) -> &str {
    match version.rfind('-') {
        Some(i) if i > 0 && version[..i].contains('.') => &version[..i],
        _ => version,
    }
}

/// The branch suffix of a branch-aware version, if any.
pub fn extract_branch(version: &str) -> Option<&str> {
    match version.rfind('-') {
        Some(i) if i > 0 && i < version.len() - 1 && version[..i].contains('.') => {
            Some(&version[i + 1..])
        }
        _ => None,
    }
}

/// `MAJOR.MINOR.PATCH` with an optional `-suffix` of `[a-zA-Z0-9._-]`.
pub fn is_valid_version(version: &str) -> bool {
    let (core, suffix) = match version.split_once('-') {
        Some((core, suffix)) => (core, Some(suffix)),
        None => (version, None),
    };
    let numeric = core.split('.').collect::<Vec<_>>();
    if numeric.len() != 3
        || numeric
            .iter()
            .any(|part| part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()))
    {
        return false;
    }
    match suffix {
        None => true,
        Some(s) => {
            !s.is_empty()
                && s
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        }
    }
}

#[cfg(test)]
#[path = "version_tests.rs"]
mod tests;
