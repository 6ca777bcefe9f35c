//! Transport errors

use super::CookbookError;

/// Creates a fetch failure for `url`
pub fn failed(url: impl Into<String>, reason: impl ToString) -> CookbookError {
    CookbookError::FetchFailed {
        url: url.into(),
        reason: reason.to_string(),
    }
}
