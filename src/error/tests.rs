//! Error type tests
//!
//! Tests for CookbookError and its conversions.

use super::*;
use miette::Diagnostic;

macro_rules! test_error_contains {
    ($test_name:ident, $err:expr, $($contains:expr),+ $(,)?) => {
        #[test]
        fn $test_name() {
            let err = $err;
            let error_string = err.to_string();
            $(
                assert!(error_string.contains($contains),
                    "Error message should contain '{}', got: {}",
                    $contains,
                    error_string
                );
            )+
        }
    };
}

#[test]
fn test_error_display() {
    let err = fetch_failed("https://example.com/a.zip", "status code 404");
    assert_eq!(
        err.to_string(),
        "Failed to fetch https://example.com/a.zip: status code 404"
    );
}

#[test]
fn test_error_code() {
    let err = malformed_git_remote("git@github.com:acme/widget", "missing '#<commit>'");
    assert_eq!(
        err.code().map(|c| c.to_string()),
        Some("cookbook::source::malformed_git_remote".to_string())
    );
}

#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: CookbookError = io_err.into();
    assert!(matches!(err, CookbookError::IoError { .. }));
}

#[test]
fn test_json_error_conversion() {
    let parse_result: std::result::Result<serde_json::Value, _> =
        serde_json::from_str("{ not json");
    let err: CookbookError = parse_result.unwrap_err().into();
    assert!(matches!(err, CookbookError::DocumentParseFailed { .. }));
}

test_error_contains!(
    test_worker_pool_error_mentions_reason,
    CookbookError::WorkerPoolFailed {
        reason: "resource temporarily unavailable".to_string(),
    },
    "worker threads",
    "resource temporarily unavailable"
);

test_error_contains!(
    test_parse_error_mentions_path,
    CookbookError::DocumentParseFailed {
        path: "recipes/zlib/zlib.json".to_string(),
        reason: "expected value".to_string(),
    },
    "recipes/zlib/zlib.json",
    "expected value"
);

test_error_contains!(
    test_write_error_mentions_path,
    CookbookError::DocumentWriteFailed {
        path: "recipes/zlib/zlib.json".to_string(),
        reason: "permission denied".to_string(),
    },
    "Failed to write recipe",
    "permission denied"
);

test_error_contains!(
    test_invalid_pattern_error,
    CookbookError::InvalidPattern {
        pattern: "recipes/[".to_string(),
        reason: "unclosed class".to_string(),
    },
    "recipes/["
);
