//! In-memory fakes for the API traits, shared by the integration suites.
#![allow(dead_code)]
//!
//! The fakes speak the same contracts as the HTTP client but keep all state
//! behind mutexes, so flows can be exercised without a network. Transient
//! failures are scripted as 5xx responses, which the client treats the same
//! as transport failures.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use quiz_core::model::{
    AnswerMap, AttemptOutcome, BearerToken, Question, QuestionId, Quiz, QuizForm, QuizId,
    QuizSummary, UserId, UserSummary,
};
use services::{ApiError, AttemptApi, AuthApi, AuthGrant, QuizApi, QuizSourceFile, QuizUpdate};

pub fn sample_user() -> UserSummary {
    UserSummary {
        id: UserId::new("u1"),
        username: "casey".into(),
        email: "casey@example.com".into(),
    }
}

pub fn sample_quiz(id: &str, question_count: usize, time_limit: Option<u32>) -> Quiz {
    Quiz {
        id: QuizId::new(id),
        title: format!("Quiz {id}"),
        description: "A sample quiz".into(),
        total_marks: 10,
        time_limit_minutes: time_limit,
        is_public: true,
        questions: (0..question_count)
            .map(|i| Question {
                id: QuestionId::new(format!("{id}-q{i}")),
                text: format!("Question {i}"),
                options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            })
            .collect(),
    }
}

fn server_error() -> ApiError {
    ApiError::Server {
        status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// ─── Auth ──────────────────────────────────────────────────────────────────────

/// How the fake "who am I" endpoint should behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhoAmIMode {
    Normal,
    Unauthorized,
    Unavailable,
}

pub struct FakeAuthApi {
    accounts: Mutex<HashMap<String, (String, UserSummary)>>,
    tokens: Mutex<HashMap<String, UserSummary>>,
    whoami_mode: Mutex<WhoAmIMode>,
}

impl FakeAuthApi {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            tokens: Mutex::new(HashMap::new()),
            whoami_mode: Mutex::new(WhoAmIMode::Normal),
        }
    }

    pub fn with_account(self, email: &str, password: &str, user: UserSummary) -> Self {
        self.accounts
            .lock()
            .unwrap()
            .insert(email.to_owned(), (password.to_owned(), user));
        self
    }

    pub fn set_whoami_mode(&self, mode: WhoAmIMode) {
        *self.whoami_mode.lock().unwrap() = mode;
    }

    /// Register a token out of band, as if granted in an earlier run.
    pub fn seed_token(&self, token: &str, user: UserSummary) {
        self.tokens.lock().unwrap().insert(token.to_owned(), user);
    }

    fn grant(&self, user: UserSummary) -> AuthGrant {
        let token = format!("token-{}", user.id);
        self.tokens
            .lock()
            .unwrap()
            .insert(token.clone(), user.clone());
        AuthGrant {
            token: BearerToken::new(token),
            user: Some(user),
        }
    }
}

#[async_trait]
impl AuthApi for FakeAuthApi {
    async fn login(&self, email: &str, password: &str) -> Result<AuthGrant, ApiError> {
        let account = self.accounts.lock().unwrap().get(email).cloned();
        match account {
            Some((expected, user)) if expected == password => Ok(self.grant(user)),
            _ => Err(ApiError::Unauthorized),
        }
    }

    async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthGrant, ApiError> {
        let user = UserSummary {
            id: UserId::new(format!("u-{username}")),
            username: username.to_owned(),
            email: email.to_owned(),
        };
        self.accounts
            .lock()
            .unwrap()
            .insert(email.to_owned(), (password.to_owned(), user.clone()));
        Ok(self.grant(user))
    }

    async fn current_user(&self, token: &BearerToken) -> Result<UserSummary, ApiError> {
        match *self.whoami_mode.lock().unwrap() {
            WhoAmIMode::Unauthorized => Err(ApiError::Unauthorized),
            WhoAmIMode::Unavailable => Err(server_error()),
            WhoAmIMode::Normal => self
                .tokens
                .lock()
                .unwrap()
                .get(token.as_str())
                .cloned()
                .ok_or(ApiError::Unauthorized),
        }
    }
}

// ─── Quizzes ───────────────────────────────────────────────────────────────────

pub struct FakeQuizApi {
    quizzes: Mutex<Vec<Quiz>>,
    next_id: AtomicUsize,
}

impl FakeQuizApi {
    pub fn new() -> Self {
        Self {
            quizzes: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(1),
        }
    }

    pub fn with_quiz(self, quiz: Quiz) -> Self {
        self.quizzes.lock().unwrap().push(quiz);
        self
    }
}

#[async_trait]
impl QuizApi for FakeQuizApi {
    async fn list_public(&self) -> Result<Vec<QuizSummary>, ApiError> {
        Ok(self
            .quizzes
            .lock()
            .unwrap()
            .iter()
            .filter(|quiz| quiz.is_public)
            .map(Quiz::summary)
            .collect())
    }

    async fn list_all(&self, _token: &BearerToken) -> Result<Vec<QuizSummary>, ApiError> {
        Ok(self.quizzes.lock().unwrap().iter().map(Quiz::summary).collect())
    }

    async fn list_mine(&self, _token: &BearerToken) -> Result<Vec<QuizSummary>, ApiError> {
        // The fake has a single owner; "mine" is everything.
        Ok(self.quizzes.lock().unwrap().iter().map(Quiz::summary).collect())
    }

    async fn get_quiz(&self, id: &QuizId) -> Result<Quiz, ApiError> {
        self.quizzes
            .lock()
            .unwrap()
            .iter()
            .find(|quiz| &quiz.id == id)
            .cloned()
            .ok_or_else(|| ApiError::Validation {
                status: reqwest::StatusCode::NOT_FOUND,
                message: "quiz not found".into(),
            })
    }

    async fn create_quiz(
        &self,
        _token: &BearerToken,
        quiz: &QuizForm,
        _source: QuizSourceFile,
    ) -> Result<(), ApiError> {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let id = format!("generated-{n}");
        let created = Quiz {
            id: QuizId::new(id.clone()),
            title: quiz.title().to_owned(),
            description: quiz.description().to_owned(),
            total_marks: quiz.total_marks(),
            time_limit_minutes: quiz.time_limit_minutes(),
            is_public: false,
            // The real server generates questions from the uploaded file.
            questions: vec![
                Question {
                    id: QuestionId::new(format!("{id}-q0")),
                    text: "Generated question".into(),
                    options: vec!["A".into(), "B".into()],
                },
            ],
        };
        self.quizzes.lock().unwrap().push(created);
        Ok(())
    }

    async fn update_quiz(
        &self,
        _token: &BearerToken,
        id: &QuizId,
        update: &QuizUpdate,
    ) -> Result<(), ApiError> {
        let mut quizzes = self.quizzes.lock().unwrap();
        let Some(quiz) = quizzes.iter_mut().find(|quiz| &quiz.id == id) else {
            return Err(ApiError::Validation {
                status: reqwest::StatusCode::NOT_FOUND,
                message: "quiz not found".into(),
            });
        };
        quiz.title = update.title.clone();
        quiz.description = update.description.clone();
        quiz.total_marks = update.total_marks;
        quiz.time_limit_minutes = update.time_limit_minutes;
        quiz.is_public = update.is_public;
        Ok(())
    }

    async fn delete_quiz(&self, _token: &BearerToken, id: &QuizId) -> Result<(), ApiError> {
        self.quizzes.lock().unwrap().retain(|quiz| &quiz.id != id);
        Ok(())
    }

    async fn delete_question(
        &self,
        _token: &BearerToken,
        id: &QuestionId,
    ) -> Result<(), ApiError> {
        for quiz in self.quizzes.lock().unwrap().iter_mut() {
            quiz.questions.retain(|question| &question.id != id);
        }
        Ok(())
    }
}

// ─── Attempts ──────────────────────────────────────────────────────────────────

pub struct FakeAttemptApi {
    posts: AtomicUsize,
    fail_next: AtomicBool,
}

impl FakeAttemptApi {
    pub fn new() -> Self {
        Self {
            posts: AtomicUsize::new(0),
            fail_next: AtomicBool::new(false),
        }
    }

    /// Number of grading POSTs the fake has received.
    pub fn posts(&self) -> usize {
        self.posts.load(Ordering::SeqCst)
    }

    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl AttemptApi for FakeAttemptApi {
    async fn submit_attempt(
        &self,
        _token: Option<&BearerToken>,
        _quiz_id: &QuizId,
        answers: &AnswerMap,
    ) -> Result<AttemptOutcome, ApiError> {
        self.posts.fetch_add(1, Ordering::SeqCst);
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(server_error());
        }
        // One mark per answered question; review omitted.
        Ok(AttemptOutcome {
            score: u32::try_from(answers.len()).unwrap_or(u32::MAX),
            review: Vec::new(),
        })
    }
}
