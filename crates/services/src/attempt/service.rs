use chrono::{DateTime, Utc};
use std::fmt;

use quiz_core::Deadline;
use quiz_core::model::{AnswerMap, AttemptOutcome, Question, QuestionId, Quiz, QuizId};

use super::progress::AttemptProgress;
use crate::error::AttemptError;

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Lifecycle of one attempt instance.
///
/// The loading phase lives outside this type: an `AttemptSession` is only
/// constructed once the quiz fetch has resolved, so construction *is* the
/// `Loading → Active` transition. `Submitting` is entered at most once;
/// while in it, further submit requests and timer ticks are no-ops.
/// `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptPhase {
    Active,
    Submitting,
    Completed,
}

//
// ─── ATTEMPT SESSION ───────────────────────────────────────────────────────────
//

/// In-memory state machine for one run through a quiz.
///
/// Holds the shuffled questions, the answer map, the cursor, and the
/// optional wall-clock deadline. All I/O (draft persistence, submission)
/// is orchestrated by `AttemptFlowService`; this type only enforces the
/// transition rules.
pub struct AttemptSession {
    quiz: Quiz,
    answers: AnswerMap,
    current: usize,
    deadline: Option<Deadline>,
    phase: AttemptPhase,
    outcome: Option<AttemptOutcome>,
    started_at: DateTime<Utc>,
    timer_fired: bool,
}

impl AttemptSession {
    /// Create a session from an already-shuffled quiz and an optional
    /// restored draft.
    ///
    /// Restored answers for question ids no longer in the quiz are dropped.
    /// `started_at` should come from the services layer clock; the deadline
    /// is anchored to it.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Empty` if the quiz has no questions.
    pub fn new(
        quiz: Quiz,
        restored: Option<AnswerMap>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, AttemptError> {
        if quiz.questions.is_empty() {
            return Err(AttemptError::Empty);
        }

        let mut answers = restored.unwrap_or_default();
        answers.retain_questions(&quiz.question_ids());

        let deadline = quiz
            .time_limit_minutes
            .map(|minutes| Deadline::after_minutes(started_at, minutes));

        Ok(Self {
            quiz,
            answers,
            current: 0,
            deadline,
            phase: AttemptPhase::Active,
            outcome: None,
            started_at,
            timer_fired: false,
        })
    }

    #[must_use]
    pub fn quiz_id(&self) -> &QuizId {
        &self.quiz.id
    }

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    #[must_use]
    pub fn phase(&self) -> AttemptPhase {
        self.phase
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Deadline> {
        self.deadline
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&AttemptOutcome> {
        self.outcome.as_ref()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == AttemptPhase::Completed
    }

    /// Total number of questions in this attempt.
    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.quiz.questions.len()
    }

    /// Zero-based cursor; always within `[0, total_questions - 1]`.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        // The constructor rejects empty quizzes and navigation clamps, so
        // the cursor is always valid.
        &self.quiz.questions[self.current]
    }

    /// The answer recorded for the current question, if any.
    #[must_use]
    pub fn current_selection(&self) -> Option<&str> {
        self.answers.selected(&self.current_question().id)
    }

    /// Seconds left before auto-submission, recomputed from the wall-clock
    /// deadline. `None` when the quiz has no time limit.
    #[must_use]
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> Option<u64> {
        self.deadline.map(|deadline| deadline.remaining_seconds(now))
    }

    /// True when a deadline exists and has passed while the attempt is
    /// still active.
    #[must_use]
    pub fn deadline_reached(&self, now: DateTime<Utc>) -> bool {
        self.phase == AttemptPhase::Active
            && self.deadline.is_some_and(|deadline| deadline.is_expired(now))
    }

    /// Returns a summary of the current attempt progress.
    #[must_use]
    pub fn progress(&self) -> AttemptProgress {
        AttemptProgress {
            total: self.total_questions(),
            answered: self.answers.len(),
            current: self.current,
            is_complete: self.is_complete(),
        }
    }

    /// Move the cursor forward, clamping at the last question.
    pub fn next_question(&mut self) {
        self.current = (self.current + 1).min(self.total_questions() - 1);
    }

    /// Move the cursor back, clamping at the first question.
    pub fn previous_question(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    /// Record a selection for a question (last-write-wins).
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::NotActive` once submission has begun.
    pub fn select(
        &mut self,
        question_id: QuestionId,
        option: impl Into<String>,
    ) -> Result<(), AttemptError> {
        if self.phase != AttemptPhase::Active {
            return Err(AttemptError::NotActive);
        }
        self.answers.select(question_id, option);
        Ok(())
    }

    /// True once the countdown has forced a submission. The timer fires at
    /// most once per attempt, even if that submission fails.
    #[must_use]
    pub fn timer_fired(&self) -> bool {
        self.timer_fired
    }

    pub(crate) fn mark_timer_fired(&mut self) {
        self.timer_fired = true;
    }

    /// Transition `Active → Submitting`. This is the at-most-once guard:
    /// exactly one caller wins; everyone else gets an error they should
    /// treat as "nothing to do".
    ///
    /// # Errors
    ///
    /// `AttemptError::SubmissionInFlight` if a submission is already under
    /// way; `AttemptError::AlreadySubmitted` if the attempt completed.
    pub(crate) fn begin_submission(&mut self) -> Result<(), AttemptError> {
        match self.phase {
            AttemptPhase::Active => {
                self.phase = AttemptPhase::Submitting;
                Ok(())
            }
            AttemptPhase::Submitting => Err(AttemptError::SubmissionInFlight),
            AttemptPhase::Completed => Err(AttemptError::AlreadySubmitted),
        }
    }

    /// Transition `Submitting → Completed` with the graded outcome.
    pub(crate) fn complete(&mut self, outcome: AttemptOutcome) {
        self.outcome = Some(outcome);
        self.phase = AttemptPhase::Completed;
    }

    /// Transition `Submitting → Active` after a failed submission, so the
    /// user can retry.
    pub(crate) fn fail_submission(&mut self) {
        if self.phase == AttemptPhase::Submitting {
            self.phase = AttemptPhase::Active;
        }
    }
}

impl fmt::Debug for AttemptSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttemptSession")
            .field("quiz_id", &self.quiz.id)
            .field("questions", &self.quiz.questions.len())
            .field("current", &self.current)
            .field("answered", &self.answers.len())
            .field("phase", &self.phase)
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuizId;
    use quiz_core::time::fixed_now;

    fn question(id: &str) -> Question {
        Question {
            id: QuestionId::new(id),
            text: format!("What is {id}?"),
            options: vec!["A".into(), "B".into(), "C".into()],
        }
    }

    fn quiz(question_count: usize, time_limit: Option<u32>) -> Quiz {
        Quiz {
            id: QuizId::new("quiz-1"),
            title: "Test".into(),
            description: String::new(),
            total_marks: 10,
            time_limit_minutes: time_limit,
            is_public: true,
            questions: (0..question_count)
                .map(|i| question(&format!("q{i}")))
                .collect(),
        }
    }

    #[test]
    fn empty_quiz_is_rejected() {
        let err = AttemptSession::new(quiz(0, None), None, fixed_now()).unwrap_err();
        assert!(matches!(err, AttemptError::Empty));
    }

    #[test]
    fn cursor_clamps_at_both_ends() {
        let mut session = AttemptSession::new(quiz(3, None), None, fixed_now()).unwrap();

        session.previous_question();
        assert_eq!(session.current_index(), 0);

        for _ in 0..10 {
            session.next_question();
        }
        assert_eq!(session.current_index(), 2);
    }

    #[test]
    fn selection_overwrites_and_counts_once() {
        let mut session = AttemptSession::new(quiz(2, None), None, fixed_now()).unwrap();
        session.select(QuestionId::new("q0"), "A").unwrap();
        session.select(QuestionId::new("q0"), "B").unwrap();

        assert_eq!(session.answers().selected(&QuestionId::new("q0")), Some("B"));
        assert_eq!(session.progress().answered, 1);
    }

    #[test]
    fn restored_draft_drops_stale_question_ids() {
        let mut restored = AnswerMap::new();
        restored.select(QuestionId::new("q0"), "A");
        restored.select(QuestionId::new("deleted"), "B");

        let session = AttemptSession::new(quiz(2, None), Some(restored), fixed_now()).unwrap();
        assert_eq!(session.answers().len(), 1);
        assert_eq!(session.answers().selected(&QuestionId::new("q0")), Some("A"));
    }

    #[test]
    fn begin_submission_wins_exactly_once() {
        let mut session = AttemptSession::new(quiz(1, None), None, fixed_now()).unwrap();

        session.begin_submission().unwrap();
        assert!(matches!(
            session.begin_submission().unwrap_err(),
            AttemptError::SubmissionInFlight
        ));

        session.complete(AttemptOutcome {
            score: 1,
            review: Vec::new(),
        });
        assert!(matches!(
            session.begin_submission().unwrap_err(),
            AttemptError::AlreadySubmitted
        ));
    }

    #[test]
    fn failed_submission_returns_to_active() {
        let mut session = AttemptSession::new(quiz(1, None), None, fixed_now()).unwrap();
        session.begin_submission().unwrap();
        session.fail_submission();

        assert_eq!(session.phase(), AttemptPhase::Active);
        // Retry is possible.
        session.begin_submission().unwrap();
    }

    #[test]
    fn no_selection_once_submission_begins() {
        let mut session = AttemptSession::new(quiz(1, None), None, fixed_now()).unwrap();
        session.begin_submission().unwrap();
        assert!(matches!(
            session.select(QuestionId::new("q0"), "A").unwrap_err(),
            AttemptError::NotActive
        ));
    }

    #[test]
    fn deadline_is_anchored_to_start() {
        let start = fixed_now();
        let session = AttemptSession::new(quiz(1, Some(5)), None, start).unwrap();

        assert_eq!(session.remaining_seconds(start), Some(300));
        assert!(!session.deadline_reached(start));
        assert!(session.deadline_reached(start + chrono::Duration::seconds(300)));
    }

    #[test]
    fn untimed_quiz_has_no_deadline() {
        let session = AttemptSession::new(quiz(1, None), None, fixed_now()).unwrap();
        assert_eq!(session.remaining_seconds(fixed_now()), None);
        assert!(!session.deadline_reached(fixed_now()));
    }
}
