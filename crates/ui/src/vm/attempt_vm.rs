use quiz_core::model::{BearerToken, QuizId, ReviewEntry};
use services::{AttemptFlowService, AttemptPhase, AttemptSession, SubmitStatus};

use crate::views::ViewError;

/// View-model for the attempt view.
///
/// Wraps the attempt state machine and exposes exactly what the view
/// renders; all transitions go through `AttemptFlowService` so answer
/// persistence and the at-most-once submission guard stay in one place.
pub struct AttemptVm {
    session: AttemptSession,
}

impl AttemptVm {
    #[must_use]
    pub fn new(session: AttemptSession) -> Self {
        Self { session }
    }

    #[must_use]
    pub fn phase(&self) -> AttemptPhase {
        self.session.phase()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.session.is_complete()
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.session.quiz().title
    }

    #[must_use]
    pub fn question_text(&self) -> &str {
        &self.session.current_question().text
    }

    #[must_use]
    pub fn question_key(&self) -> String {
        self.session.current_question().id.to_string()
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.session.current_question().options
    }

    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.session.current_selection()
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.session.current_index()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.session.total_questions()
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.index() + 1 == self.total()
    }

    /// Percent of the quiz the cursor has reached, for the progress bar.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress_percent(&self) -> f64 {
        ((self.index() + 1) as f64 / self.total() as f64) * 100.0
    }

    #[must_use]
    pub fn has_deadline(&self) -> bool {
        self.session.deadline().is_some()
    }

    /// Remaining seconds at the flow's current clock reading.
    #[must_use]
    pub fn remaining_seconds(&self, flow: &AttemptFlowService) -> Option<u64> {
        self.session.remaining_seconds(flow.clock().now())
    }

    #[must_use]
    pub fn score(&self) -> Option<u32> {
        self.session.outcome().map(|outcome| outcome.score)
    }

    #[must_use]
    pub fn review(&self) -> &[ReviewEntry] {
        self.session
            .outcome()
            .map_or(&[], |outcome| outcome.review.as_slice())
    }

    pub fn next(&mut self) {
        self.session.next_question();
    }

    pub fn previous(&mut self) {
        self.session.previous_question();
    }

    /// Record a selection for the current question and persist the draft.
    ///
    /// # Errors
    ///
    /// Returns `ViewError` for storage failures or when the attempt is no
    /// longer active.
    pub async fn select(
        &mut self,
        flow: &AttemptFlowService,
        option: &str,
    ) -> Result<(), ViewError> {
        let question_id = self.session.current_question().id.clone();
        flow.record_answer(&mut self.session, question_id, option)
            .await
            .map_err(ViewError::from)
    }

    /// Submit for grading. Safe to call redundantly: the flow ignores
    /// anything after the first submission wins.
    ///
    /// # Errors
    ///
    /// Returns `ViewError` for API failures; the attempt stays active for a
    /// retry.
    pub async fn submit(
        &mut self,
        flow: &AttemptFlowService,
        token: Option<&BearerToken>,
    ) -> Result<SubmitStatus, ViewError> {
        flow.submit(&mut self.session, token)
            .await
            .map_err(ViewError::from)
    }

    /// One countdown tick; returns the remaining seconds for display.
    ///
    /// # Errors
    ///
    /// Returns `ViewError` if a deadline-forced submission fails.
    pub async fn tick(
        &mut self,
        flow: &AttemptFlowService,
        token: Option<&BearerToken>,
    ) -> Result<Option<u64>, ViewError> {
        let outcome = flow
            .tick(&mut self.session, token)
            .await
            .map_err(ViewError::from)?;
        Ok(outcome.remaining_seconds)
    }
}

/// # Errors
///
/// Returns `ViewError::EmptyQuiz` when the quiz has no questions, and
/// `ViewError::Unavailable`/`Unknown` for other failures.
pub async fn start_attempt(
    flow: &AttemptFlowService,
    quiz_id: &QuizId,
) -> Result<AttemptVm, ViewError> {
    let session = flow.start(quiz_id).await.map_err(ViewError::from)?;
    Ok(AttemptVm::new(session))
}
