//! Term explanation overlay.
//!
//! One overlay per view, driven as a state machine:
//!
//! ```text
//! Closed --request(term)--> Loading(term) --resolve--> Shown(term, text)
//! Loading | Shown --close--> Closed
//! ```
//!
//! There is no cancellation channel. Every lookup gets a ticket with a fresh
//! id; a result is applied only if its ticket is the one the overlay is still
//! waiting on. Closing or retargeting the overlay, or applying a result,
//! retires the outstanding ticket.

use tracing::{debug, info};

use crate::collaborator::ReplyEnvelope;
use crate::error_handler::{CollaboratorError, ExplainError};

/// Shown when the backend answers without text.
pub const EXPLANATION_UNAVAILABLE: &str = "설명을 가져오는 데 실패했습니다.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OverlayState {
    #[default]
    Closed,
    Loading {
        term: String,
    },
    Shown {
        term: String,
        explanation: String,
    },
}

impl OverlayState {
    /// The term the overlay is open for, if any.
    pub fn term(&self) -> Option<&str> {
        match self {
            OverlayState::Closed => None,
            OverlayState::Loading { term } | OverlayState::Shown { term, .. } => Some(term),
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, OverlayState::Closed)
    }
}

/// Handle for one issued lookup; hand it back with the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplanationTicket {
    id: u64,
    term: String,
}

impl ExplanationTicket {
    pub fn term(&self) -> &str {
        &self.term
    }
}

/// Owns the overlay state of a single report view.
#[derive(Debug, Default)]
pub struct ExplanationResolver {
    state: OverlayState,
    next_id: u64,
    /// Ticket the overlay is waiting on, if any.
    pending: Option<u64>,
}

impl ExplanationResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    /// Opens the overlay in the loading state for `term`.
    ///
    /// The caller performs the lookup and passes the ticket to [`Self::resolve`].
    ///
    /// # Errors
    /// [`ExplainError::EmptyTerm`] if `term` is empty; the state is unchanged.
    pub fn request(&mut self, term: &str) -> Result<ExplanationTicket, ExplainError> {
        if term.is_empty() {
            return Err(ExplainError::EmptyTerm);
        }
        if let Some(previous) = self.state.term().filter(|t| *t != term) {
            debug!(%previous, %term, "overlay retargeted; earlier lookup will be discarded");
        }
        self.next_id += 1;
        self.pending = Some(self.next_id);
        self.state = OverlayState::Loading {
            term: term.to_string(),
        };
        Ok(ExplanationTicket {
            id: self.next_id,
            term: term.to_string(),
        })
    }

    /// Applies a finished lookup.
    ///
    /// A transport failure becomes the synthetic communication-failure reply,
    /// so the overlay always ends up showing something. Returns `false` when
    /// the result was stale and dropped.
    pub fn resolve(
        &mut self,
        ticket: ExplanationTicket,
        outcome: Result<ReplyEnvelope, CollaboratorError>,
    ) -> bool {
        if self.pending != Some(ticket.id) {
            debug!(
                term = %ticket.term,
                ticket = ticket.id,
                pending = ?self.pending,
                "dropping stale explanation"
            );
            return false;
        }
        self.pending = None;

        let reply = outcome.unwrap_or_else(|e| {
            info!(term = %ticket.term, error = %e, "explanation lookup failed");
            ReplyEnvelope::transport_failure()
        });

        self.state = OverlayState::Shown {
            explanation: reply.text_or(EXPLANATION_UNAVAILABLE),
            term: ticket.term,
        };
        true
    }

    /// Closes the overlay from any state; in-flight results will be dropped.
    pub fn close(&mut self) {
        self.pending = None;
        self.state = OverlayState::Closed;
    }
}
