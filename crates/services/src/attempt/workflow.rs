use std::sync::Arc;

use rand::rng;
use rand::seq::SliceRandom;
use tracing::{debug, warn};

use quiz_core::Clock;
use quiz_core::model::{BearerToken, QuestionId, QuizId};
use storage::repository::AttemptDraftRepository;

use super::service::AttemptSession;
use crate::api::{AttemptApi, QuizApi};
use crate::error::AttemptError;

/// What a submit request actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStatus {
    /// The attempt was graded; the session is now `Completed`.
    Completed,
    /// Another submission already won the at-most-once guard; nothing was
    /// sent.
    Ignored,
}

/// Result of one timer tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub remaining_seconds: Option<u64>,
    /// Set when this tick crossed the deadline and forced a submission.
    pub submitted: Option<SubmitStatus>,
}

/// Orchestrates attempt start, draft persistence, and submission.
///
/// The pure transition rules live in `AttemptSession`; this service adds
/// the I/O around them: quiz fetch, answer-draft persistence after every
/// change, and the grading POST.
#[derive(Clone)]
pub struct AttemptFlowService {
    clock: Clock,
    quizzes: Arc<dyn QuizApi>,
    attempts: Arc<dyn AttemptApi>,
    drafts: Arc<dyn AttemptDraftRepository>,
}

impl AttemptFlowService {
    #[must_use]
    pub fn new(
        clock: Clock,
        quizzes: Arc<dyn QuizApi>,
        attempts: Arc<dyn AttemptApi>,
        drafts: Arc<dyn AttemptDraftRepository>,
    ) -> Self {
        Self {
            clock,
            quizzes,
            attempts,
            drafts,
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// The `Loading → Active` transition: fetch the quiz, restore any
    /// persisted draft, and shuffle the question order.
    ///
    /// The shuffle happens exactly once per transition; reloading the view
    /// produces a fresh permutation.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Empty` for quizzes without questions, and
    /// propagates API/storage failures.
    pub async fn start(&self, quiz_id: &QuizId) -> Result<AttemptSession, AttemptError> {
        let mut quiz = self.quizzes.get_quiz(quiz_id).await?;
        quiz.questions.shuffle(&mut rng());

        let restored = self.drafts.load_draft(quiz_id).await?;
        if restored.is_some() {
            debug!(%quiz_id, "resuming attempt from persisted draft");
        }

        AttemptSession::new(quiz, restored, self.clock.now())
    }

    /// Record a selection and persist the draft so a reload can resume.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::NotActive` once submission has begun, and
    /// propagates storage failures.
    pub async fn record_answer(
        &self,
        session: &mut AttemptSession,
        question_id: QuestionId,
        option: &str,
    ) -> Result<(), AttemptError> {
        session.select(question_id, option)?;
        self.drafts
            .save_draft(session.quiz_id(), session.answers())
            .await?;
        Ok(())
    }

    /// Submit the answer map for grading.
    ///
    /// At-most-once: if a submission is already in flight or the attempt
    /// completed, this returns `SubmitStatus::Ignored` without touching the
    /// network. On success the persisted draft is cleared and the session
    /// completes; on failure the session returns to `Active` so the user
    /// can retry.
    ///
    /// # Errors
    ///
    /// Propagates API failures (after restoring the `Active` phase).
    pub async fn submit(
        &self,
        session: &mut AttemptSession,
        token: Option<&BearerToken>,
    ) -> Result<SubmitStatus, AttemptError> {
        match session.begin_submission() {
            Ok(()) => {}
            Err(AttemptError::SubmissionInFlight | AttemptError::AlreadySubmitted) => {
                return Ok(SubmitStatus::Ignored);
            }
            Err(other) => return Err(other),
        }

        match self
            .attempts
            .submit_attempt(token, session.quiz_id(), session.answers())
            .await
        {
            Ok(outcome) => {
                if let Err(err) = self.drafts.clear_draft(session.quiz_id()).await {
                    // The submission itself succeeded; a stale draft is
                    // dropped on the next start() for this quiz.
                    warn!(error = %err, "submitted, but could not clear the persisted draft");
                }
                session.complete(outcome);
                Ok(SubmitStatus::Completed)
            }
            Err(err) => {
                session.fail_submission();
                Err(err.into())
            }
        }
    }

    /// One timer tick: recompute remaining time from the wall-clock
    /// deadline and force submission when it has passed.
    ///
    /// The timer fires at most once per attempt. If the forced submission
    /// fails, the error propagates and the attempt stays active for a
    /// manual retry; the timer does not re-fire.
    ///
    /// # Errors
    ///
    /// Propagates failures from the forced submission.
    pub async fn tick(
        &self,
        session: &mut AttemptSession,
        token: Option<&BearerToken>,
    ) -> Result<TickOutcome, AttemptError> {
        let now = self.clock.now();
        let remaining_seconds = session.remaining_seconds(now);

        if session.deadline_reached(now) && !session.timer_fired() {
            session.mark_timer_fired();
            debug!(quiz = %session.quiz_id(), "time limit reached, auto-submitting");
            let status = self.submit(session, token).await?;
            return Ok(TickOutcome {
                remaining_seconds: Some(0),
                submitted: Some(status),
            });
        }

        Ok(TickOutcome {
            remaining_seconds,
            submitted: None,
        })
    }
}
