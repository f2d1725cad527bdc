//! Unified error handling for `report-core`.
//!
//! A single top-level [`ReportCoreError`] wraps the domain enums below. Most of
//! them never reach a caller of the view: collaborator failures are turned into
//! user-visible state at the point of the asynchronous call, and rejected
//! submissions are reported back as values so the UI can decide what to show.
//!
//! All messages carry the `[Report Core]` marker to simplify attribution in logs.

use reqwest::StatusCode;
use thiserror::Error;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the crate.
pub type Result<T> = std::result::Result<T, ReportCoreError>;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `report-core` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ReportCoreError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Vocabulary(#[from] VocabularyError),

    #[error(transparent)]
    Explain(#[from] ExplainError),

    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Errors raised while reading client configuration from the environment.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A number failed to parse.
    #[error("[Report Core] invalid number in {var}: {reason}")]
    InvalidNumber {
        var: &'static str,
        reason: &'static str,
    },

    /// Value had the wrong format (e.g. a base URL without a scheme).
    #[error("[Report Core] invalid format in {var}: {reason}")]
    InvalidFormat {
        var: &'static str,
        reason: &'static str,
    },
}

/* ------------------------------------------------------------------------- */
/* Vocabulary errors                                                         */
/* ------------------------------------------------------------------------- */

#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VocabularyError {
    #[error("[Report Core] vocabulary must contain at least one term")]
    Empty,

    #[error("[Report Core] vocabulary term at position {0} is empty")]
    EmptyTerm(usize),
}

/* ------------------------------------------------------------------------- */
/* Overlay / chat rejections                                                 */
/* ------------------------------------------------------------------------- */

#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExplainError {
    #[error("[Report Core] cannot explain an empty term")]
    EmptyTerm,
}

/// Why a chat question was not accepted.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("[Report Core] question must not be empty")]
    EmptyQuestion,

    /// A previous question is still outstanding for this session.
    #[error("[Report Core] a reply is still pending; wait before asking again")]
    AwaitingReply,

    /// The session is bound to an error report, an empty report or nothing at all.
    #[error("[Report Core] no analysed report is available to ask about")]
    ReportUnavailable,
}

/* ------------------------------------------------------------------------- */
/* Collaborator errors                                                       */
/* ------------------------------------------------------------------------- */

/// Failures reaching the external Q&A collaborator.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CollaboratorError {
    /// Connection, timeout or body-read failure.
    #[error("[Report Core] transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-successful HTTP status whose body is not a reply envelope.
    #[error("[Report Core] HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        status: StatusCode,
        url: String,
        snippet: String,
    },

    /// The body could not be decoded as a reply envelope.
    #[error("[Report Core] decode error: {0}")]
    Decode(String),
}

/// Returns a short, single-line snippet of a response body for diagnostics.
pub fn make_snippet(body: &str) -> String {
    body.chars()
        .take(240)
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_is_single_line_and_bounded() {
        let body = format!("line one\nline two\t{}", "x".repeat(500));
        let s = make_snippet(&body);
        assert!(!s.contains('\n'));
        assert!(s.chars().count() <= 240);
        assert!(s.starts_with("line one line two"));
    }

    #[test]
    fn nested_errors_keep_their_message() {
        let err: ReportCoreError = SubmitError::AwaitingReply.into();
        assert!(err.to_string().contains("still pending"));
    }

    #[test]
    fn client_setup_errors_lift_into_the_crate_error() {
        fn setup(timeout: &str) -> Result<u64> {
            let secs = timeout.parse::<u64>().map_err(|_| ConfigError::InvalidNumber {
                var: "REPORT_API_TIMEOUT_SECS",
                reason: "expected u64",
            })?;
            Ok(secs)
        }

        assert_eq!(setup("30").ok(), Some(30));
        let err = setup("soon").expect_err("not a number");
        assert!(matches!(err, ReportCoreError::Config(ConfigError::InvalidNumber { .. })));
        assert!(err.to_string().contains("REPORT_API_TIMEOUT_SECS"));
    }
}
