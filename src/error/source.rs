//! Source reference errors

use super::CookbookError;

/// Creates a malformed git remote error for `input`
pub fn malformed_git_remote(input: impl Into<String>, reason: impl Into<String>) -> CookbookError {
    CookbookError::MalformedGitRemote {
        input: input.into(),
        reason: reason.into(),
    }
}
