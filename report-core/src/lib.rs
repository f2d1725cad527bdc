//! Interactive layer for AI vehicle-inspection reports.
//!
//! - [`term_scanner`] splits report prose into plain and explainable spans
//! - [`explanation`] drives the single explanation overlay of a view
//! - [`chat`] keeps an ordered Q&A log bound to one report
//! - [`view`] ties the three together behind a [`QaCollaborator`]
//!
//! [`HttpCollaborator`] talks to the Q&A backend over HTTP.

pub mod chat;
pub mod collaborator;
pub mod config;
pub mod error_handler;
pub mod explanation;
pub mod http_collaborator;
pub mod report;
pub mod term_scanner;
pub mod view;
pub mod vocabulary;

pub use chat::{ANSWER_APOLOGY, ChatMessage, ChatSession, PendingQuestion, Role, SessionId};
pub use collaborator::{
    AskReportRequest, COMMUNICATION_FAILURE, ExplainTermRequest, QaCollaborator, ReplyEnvelope,
    ReplyStatus,
};
pub use config::CollaboratorConfig;
pub use error_handler::{
    CollaboratorError, ConfigError, ExplainError, ReportCoreError, Result, SubmitError,
    VocabularyError,
};
pub use explanation::{EXPLANATION_UNAVAILABLE, ExplanationResolver, ExplanationTicket, OverlayState};
pub use http_collaborator::HttpCollaborator;
pub use report::{ErrorReport, Report, ReportSource, RiskBand};
pub use term_scanner::{AnnotatedSpan, annotate};
pub use view::{Element, ReportLayout, ReportView, ViewEvent};
pub use vocabulary::{DEFAULT_TERMS, Vocabulary};
