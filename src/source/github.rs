//! GitHub URL grammar
//!
//! Recipes reference GitHub sources in two shapes:
//! - generated archives: `https://github.com/<owner>/<project>/archive/<commit>.zip`
//! - SSH remotes pinned to a commit: `git@github.com:<owner>/<project>.git#<commit>`
//!
//! GitHub archives unpack into a single top-level directory named
//! `<project>-<commit>`, which recipes record as `subPath`.

use crate::error::{Result, malformed_git_remote};

/// Prefix of every GitHub web URL
pub const GITHUB_URL_PREFIX: &str = "https://github.com/";

/// Prefix of a GitHub SSH remote
pub const GIT_REMOTE_PREFIX: &str = "git@github.com:";

/// Check if a URL points at github.com over HTTPS
pub fn is_github_url(url: &str) -> bool {
    url.starts_with(GITHUB_URL_PREFIX)
}

/// Check if a string looks like a GitHub SSH remote
///
/// Only the host is checked here; [`zip_url_from_git_remote`] validates the rest.
pub fn is_git_remote(input: &str) -> bool {
    input.starts_with("git@github.com")
}

/// Archive URL GitHub serves for a commit
pub fn archive_url(owner: &str, project: &str, commit: &str) -> String {
    format!("{GITHUB_URL_PREFIX}{owner}/{project}/archive/{commit}.zip")
}

/// Top-level directory inside a GitHub archive
///
/// Splitting `https://github.com/acme/widget/archive/abc123.zip` on `/` gives
/// `["https:", "", "github.com", "acme", "widget", "archive", "abc123.zip"]`:
/// the project is segment 4 and the commit is the last segment without `.zip`.
/// Returns `None` for non-GitHub URLs and URLs too short to carry a project.
pub fn sub_path_from_url(url: &str) -> Option<String> {
    if !is_github_url(url) {
        return None;
    }

    let segments: Vec<&str> = url.split('/').collect();
    if segments.len() < 5 {
        return None;
    }

    let project = segments[4];
    let last = segments.last().copied().unwrap_or_default();
    let commit = last.strip_suffix(".zip").unwrap_or(last);
    if project.is_empty() || commit.is_empty() {
        return None;
    }

    Some(format!("{project}-{commit}"))
}

/// Parse `git@github.com:<owner>/<project>.git#<commit>` into its parts
///
/// Returns `(owner, project, commit)`, with a trailing `.git` stripped from
/// the project.
pub fn parse_git_remote(remote: &str) -> Result<(&str, &str, &str)> {
    let rest = remote
        .strip_prefix(GIT_REMOTE_PREFIX)
        .ok_or_else(|| malformed_git_remote(remote, "expected prefix 'git@github.com:'"))?;

    let (path, commit) = rest
        .split_once('#')
        .ok_or_else(|| malformed_git_remote(remote, "missing '#<commit>'"))?;
    if commit.is_empty() {
        return Err(malformed_git_remote(remote, "empty commit after '#'"));
    }

    let (owner, project) = path
        .split_once('/')
        .ok_or_else(|| malformed_git_remote(remote, "expected '<owner>/<project>.git'"))?;
    let project = project.strip_suffix(".git").unwrap_or(project);
    if owner.is_empty() || project.is_empty() || project.contains('/') {
        return Err(malformed_git_remote(
            remote,
            "expected '<owner>/<project>.git'",
        ));
    }

    Ok((owner, project, commit))
}

/// Archive URL for a pinned GitHub SSH remote
pub fn zip_url_from_git_remote(remote: &str) -> Result<String> {
    let (owner, project, commit) = parse_git_remote(remote)?;
    Ok(archive_url(owner, project, commit))
}
