//! Report view: layout, explanation overlay and chat bound to one report.
//!
//! Collaborator calls run as detached Tokio tasks. Their results come back as
//! [`ViewEvent`]s on an internal channel and are applied on the caller's task
//! via [`ReportView::apply`], so all state mutation stays single-threaded.
//! Every event is stamped with the view generation it was issued under;
//! [`ReportView::load`] bumps the generation, which drops results that were
//! still in flight for the previous report.

pub mod layout;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::chat::{ChatSession, SessionId};
use crate::collaborator::{QaCollaborator, ReplyEnvelope};
use crate::error_handler::{CollaboratorError, ExplainError, SubmitError};
use crate::explanation::{ExplanationResolver, ExplanationTicket, OverlayState};
use crate::report::ReportSource;
use crate::vocabulary::Vocabulary;

pub use layout::{Element, GroupKind, ReportLayout, SectionKind, compose, term_at};

/// Completion of a collaborator call issued by a view.
#[derive(Debug)]
pub enum ViewEvent {
    Explanation {
        generation: u64,
        ticket: ExplanationTicket,
        outcome: Result<ReplyEnvelope, CollaboratorError>,
    },
    Answer {
        generation: u64,
        session: SessionId,
        outcome: Result<ReplyEnvelope, CollaboratorError>,
    },
}

impl ViewEvent {
    pub fn generation(&self) -> u64 {
        match self {
            ViewEvent::Explanation { generation, .. } | ViewEvent::Answer { generation, .. } => {
                *generation
            }
        }
    }
}

/// One displayed report with its overlay and conversation.
///
/// Methods that issue collaborator calls spawn onto the current Tokio runtime
/// and must be called from within one.
pub struct ReportView<C: QaCollaborator> {
    collaborator: Arc<C>,
    vocabulary: Vocabulary,
    source: ReportSource,
    layout: ReportLayout,
    overlay: ExplanationResolver,
    chat: ChatSession,
    generation: u64,
    in_flight: usize,
    events_tx: mpsc::UnboundedSender<ViewEvent>,
    events_rx: mpsc::UnboundedReceiver<ViewEvent>,
}

impl<C: QaCollaborator> ReportView<C> {
    /// Creates a view showing no data.
    pub fn new(collaborator: Arc<C>, vocabulary: Vocabulary) -> Self {
        let source = ReportSource::Missing;
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            collaborator,
            layout: compose(&source, &vocabulary),
            chat: ChatSession::new(&source),
            vocabulary,
            source,
            overlay: ExplanationResolver::new(),
            generation: 0,
            in_flight: 0,
            events_tx,
            events_rx,
        }
    }

    /// Shows `source`, resetting the overlay and starting a fresh chat session.
    pub fn load(&mut self, source: ReportSource) {
        self.generation += 1;
        self.layout = compose(&source, &self.vocabulary);
        self.overlay.close();
        self.chat.replace_report(&source);
        self.source = source;
        info!(
            generation = self.generation,
            askable = self.source.askable().is_some(),
            "report loaded"
        );
    }

    pub fn source(&self) -> &ReportSource {
        &self.source
    }

    pub fn layout(&self) -> &ReportLayout {
        &self.layout
    }

    pub fn overlay(&self) -> &OverlayState {
        self.overlay.state()
    }

    /// The chat surface; absent unless the report can be asked about.
    pub fn chat(&self) -> Option<&ChatSession> {
        self.source.askable().map(|_| &self.chat)
    }

    /// Number of collaborator calls whose events have not been applied yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Handles a click at `path` in the section tree.
    ///
    /// A click anywhere inside an explainable term (including its hint marker)
    /// opens the overlay for that term. Returns the term, or `None` when the
    /// click hit no term.
    pub fn click(&mut self, path: &[usize]) -> Option<String> {
        let ReportLayout::Sections(roots) = &self.layout else {
            return None;
        };
        let term = term_at(roots, path)?.to_string();
        match self.request_explanation(&term) {
            Ok(()) => Some(term),
            Err(e) => {
                debug!(error = %e, "click ignored");
                None
            }
        }
    }

    /// Opens the overlay in the loading state and starts the lookup.
    ///
    /// # Errors
    /// [`ExplainError::EmptyTerm`] for an empty term; nothing is issued.
    pub fn request_explanation(&mut self, term: &str) -> Result<(), ExplainError> {
        let ticket = self.overlay.request(term)?;
        let generation = self.generation;
        let collaborator = Arc::clone(&self.collaborator);
        let tx = self.events_tx.clone();

        self.in_flight += 1;
        tokio::spawn(async move {
            let outcome = collaborator.explain_term(ticket.term()).await;
            if let Err(e) = &outcome {
                warn!(term = %ticket.term(), error = %e, "explain-term call failed");
            }
            let _ = tx.send(ViewEvent::Explanation {
                generation,
                ticket,
                outcome,
            });
        });
        Ok(())
    }

    pub fn close_overlay(&mut self) {
        self.overlay.close();
    }

    /// Appends the question to the chat and sends it with the report context.
    ///
    /// # Errors
    /// See [`ChatSession::submit`]; on error nothing is appended or sent.
    pub fn ask(&mut self, question: &str) -> Result<(), SubmitError> {
        let pending = self.chat.submit(question)?;
        let generation = self.generation;
        let collaborator = Arc::clone(&self.collaborator);
        let tx = self.events_tx.clone();

        self.in_flight += 1;
        tokio::spawn(async move {
            let outcome = collaborator
                .ask_about_report(pending.report(), pending.question())
                .await;
            if let Err(e) = &outcome {
                warn!(error = %e, "ask-report call failed");
            }
            let _ = tx.send(ViewEvent::Answer {
                generation,
                session: pending.session(),
                outcome,
            });
        });
        Ok(())
    }

    /// Waits for the next completion; `None` once nothing is in flight.
    pub async fn next_event(&mut self) -> Option<ViewEvent> {
        if self.in_flight == 0 {
            return None;
        }
        self.events_rx.recv().await
    }

    /// Applies a completion. Returns `false` when it was stale and dropped.
    pub fn apply(&mut self, event: ViewEvent) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        if event.generation() != self.generation {
            debug!(
                event_generation = event.generation(),
                current = self.generation,
                "dropping result for a previous report"
            );
            return false;
        }
        match event {
            ViewEvent::Explanation {
                ticket, outcome, ..
            } => self.overlay.resolve(ticket, outcome),
            ViewEvent::Answer {
                session, outcome, ..
            } => self.chat.receive(session, outcome),
        }
    }

    /// Applies every completion that is already available without waiting.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Waits until every issued call has completed and been applied.
    pub async fn settle(&mut self) {
        while let Some(event) = self.next_event().await {
            self.apply(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborator::COMMUNICATION_FAILURE;
    use crate::report::{ErrorReport, Report};
    use serde_json::json;

    /// Answers instantly with a canned text derived from the input.
    struct Echo;

    impl QaCollaborator for Echo {
        async fn explain_term(&self, term: &str) -> Result<ReplyEnvelope, CollaboratorError> {
            if term == "부식" {
                return Err(CollaboratorError::Decode("offline".into()));
            }
            Ok(ReplyEnvelope::success(format!("{term}: 설명")))
        }

        async fn ask_about_report(
            &self,
            report: &Report,
            question: &str,
        ) -> Result<ReplyEnvelope, CollaboratorError> {
            let model = report
                .basic_info
                .as_ref()
                .and_then(|b| b.model_name.clone())
                .unwrap_or_default();
            Ok(ReplyEnvelope::success(format!("{model}: {question}")))
        }
    }

    fn view() -> ReportView<Echo> {
        ReportView::new(Arc::new(Echo), Vocabulary::default())
    }

    fn sample() -> ReportSource {
        ReportSource::from_value(Some(json!({
            "basicInfo": { "modelName": "쏘렌토" },
            "accidentHistory": { "summary": "DPF 교환 이력" }
        })))
    }

    #[tokio::test]
    async fn starts_without_data_or_chat() {
        let v = view();
        assert!(matches!(v.layout(), ReportLayout::NoData { .. }));
        assert!(v.chat().is_none());
        assert_eq!(v.overlay(), &OverlayState::Closed);
        assert_eq!(v.in_flight(), 0);
    }

    #[tokio::test]
    async fn click_on_term_opens_overlay_then_shows_explanation() {
        let mut v = view();
        v.load(sample());

        // section(1) = accident history > paragraph(1) > term(0) > hint(1)
        assert_eq!(v.click(&[1, 1, 0, 1]).as_deref(), Some("DPF"));
        assert_eq!(v.overlay(), &OverlayState::Loading { term: "DPF".into() });

        v.settle().await;
        assert_eq!(
            v.overlay(),
            &OverlayState::Shown {
                term: "DPF".into(),
                explanation: "DPF: 설명".into()
            }
        );
    }

    #[tokio::test]
    async fn click_off_term_does_nothing() {
        let mut v = view();
        v.load(sample());
        assert_eq!(v.click(&[0, 1]), None);
        assert_eq!(v.overlay(), &OverlayState::Closed);
        assert_eq!(v.in_flight(), 0);
    }

    #[tokio::test]
    async fn transport_failure_shows_communication_notice() {
        let mut v = view();
        v.request_explanation("부식").expect("issued");
        v.settle().await;
        assert_eq!(
            v.overlay(),
            &OverlayState::Shown {
                term: "부식".into(),
                explanation: COMMUNICATION_FAILURE.into()
            }
        );
    }

    #[tokio::test]
    async fn ask_round_trip_appends_answer() {
        let mut v = view();
        v.load(sample());
        v.ask("보험 이력은?").expect("accepted");
        assert!(v.chat().is_some_and(|c| c.is_awaiting_reply()));

        v.settle().await;
        let texts: Vec<_> = v
            .chat()
            .map(|c| c.messages().iter().map(|m| m.text.clone()).collect())
            .unwrap_or_default();
        assert_eq!(texts, vec!["보험 이력은?", "쏘렌토: 보험 이력은?"]);
    }

    #[tokio::test]
    async fn reload_drops_results_for_previous_report() {
        let mut v = view();
        v.load(sample());
        v.request_explanation("DPF").expect("issued");
        v.ask("Q").expect("accepted");

        v.load(ReportSource::from(ErrorReport {
            error: "실패".into(),
            raw_text: None,
        }));
        v.settle().await;

        assert_eq!(v.in_flight(), 0);
        assert_eq!(v.overlay(), &OverlayState::Closed);
        assert!(v.chat().is_none());
        assert_eq!(v.ask("Q2"), Err(SubmitError::ReportUnavailable));
    }
}
