//! Report-bound conversation.
//!
//! A [`ChatSession`] keeps an append-only, gaplessly numbered message log for
//! exactly one report. At most one question is outstanding at a time: the
//! `awaiting_reply` gate, not the network, serialises the conversation.
//! Every session carries a process-unique id; replies are matched against it
//! so a reply addressed to a discarded session is ignored.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tracing::{debug, info};

use crate::collaborator::ReplyEnvelope;
use crate::error_handler::{CollaboratorError, SubmitError};
use crate::report::{Report, ReportSource};

/// Assistant text when an answer could not be obtained.
pub const ANSWER_APOLOGY: &str = "죄송합니다. 답변을 가져오는 중 오류가 발생했습니다.";

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SessionId(u64);

impl SessionId {
    fn next() -> Self {
        SessionId(NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    /// Strictly increasing and gapless within a session, starting at 1.
    pub sequence: u64,
}

/// A question that has been appended and must now be sent.
#[derive(Debug, Clone)]
pub struct PendingQuestion {
    session: SessionId,
    question: String,
    report: Arc<Report>,
}

impl PendingQuestion {
    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    /// Report context to send along with the question.
    pub fn report(&self) -> &Arc<Report> {
        &self.report
    }
}

/// Ordered conversation about one report.
#[derive(Debug)]
pub struct ChatSession {
    id: SessionId,
    report: Option<Arc<Report>>,
    messages: Vec<ChatMessage>,
    awaiting_reply: bool,
}

impl ChatSession {
    /// Starts a fresh session bound to `source`.
    ///
    /// Only an analysed, non-empty report accepts questions; any other source
    /// yields a session that rejects every submission.
    pub fn new(source: &ReportSource) -> Self {
        Self {
            id: SessionId::next(),
            report: source.askable().cloned(),
            messages: Vec::new(),
            awaiting_reply: false,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    /// Whether this session can take questions at all.
    pub fn accepts_questions(&self) -> bool {
        self.report.is_some()
    }

    /// Rebinds to another report, discarding the log and any outstanding question.
    ///
    /// The session gets a new id, so a reply still in flight for the old one
    /// is ignored when it arrives.
    pub fn replace_report(&mut self, source: &ReportSource) {
        let previous = self.id;
        *self = Self::new(source);
        debug!(?previous, session = ?self.id, "chat session reset");
    }

    /// Appends the user's question and closes the gate.
    ///
    /// # Errors
    /// - [`SubmitError::ReportUnavailable`] when bound to no askable report
    /// - [`SubmitError::AwaitingReply`] while a question is outstanding
    /// - [`SubmitError::EmptyQuestion`] for a blank question
    pub fn submit(&mut self, question: &str) -> Result<PendingQuestion, SubmitError> {
        let Some(report) = self.report.clone() else {
            return Err(SubmitError::ReportUnavailable);
        };
        if self.awaiting_reply {
            return Err(SubmitError::AwaitingReply);
        }
        if question.trim().is_empty() {
            return Err(SubmitError::EmptyQuestion);
        }

        self.push(Role::User, question.to_string());
        self.awaiting_reply = true;
        info!(session = ?self.id, sequence = self.last_sequence(), "question submitted");

        Ok(PendingQuestion {
            session: self.id,
            question: question.to_string(),
            report,
        })
    }

    /// Appends the assistant reply for an outstanding question and reopens the gate.
    ///
    /// Returns `false` (and changes nothing) when the reply belongs to another
    /// session or nothing is outstanding.
    pub fn receive(
        &mut self,
        session: SessionId,
        outcome: Result<ReplyEnvelope, CollaboratorError>,
    ) -> bool {
        if session != self.id || !self.awaiting_reply {
            debug!(reply_for = ?session, current = ?self.id, "dropping stale chat reply");
            return false;
        }

        let text = match outcome {
            Ok(reply) => reply.text_or(ANSWER_APOLOGY),
            Err(e) => {
                info!(session = ?self.id, error = %e, "question failed");
                ANSWER_APOLOGY.to_string()
            }
        };

        self.push(Role::Assistant, text);
        self.awaiting_reply = false;
        true
    }

    fn last_sequence(&self) -> u64 {
        self.messages.last().map_or(0, |m| m.sequence)
    }

    fn push(&mut self, role: Role, text: String) {
        let sequence = self.last_sequence() + 1;
        self.messages.push(ChatMessage {
            role,
            text,
            sequence,
        });
    }
}
