use dioxus::prelude::*;
use dioxus_router::Link;

use services::QuizScope;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};

/// Public landing page: browse public quizzes without signing in.
#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let quizzes = ctx.quizzes();

    let resource = use_resource(move || {
        let quizzes = quizzes.clone();
        async move {
            quizzes
                .list(QuizScope::Public, None)
                .await
                .map_err(ViewError::from)
        }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            h2 { "Public quizzes" }
            p { class: "muted", "Pick a quiz to attempt, or sign in to create your own." }
            {match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading quizzes…" }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                },
                ViewState::Ready(items) => rsx! {
                    if items.is_empty() {
                        p { "No public quizzes yet." }
                    } else {
                        div { class: "quiz-grid",
                            for quiz in items {
                                div { class: "quiz-card", key: "{quiz.id}",
                                    h3 { "{quiz.title}" }
                                    p { "{quiz.description}" }
                                    p { class: "muted", "Marks: {quiz.total_marks}" }
                                    if let Some(minutes) = quiz.time_limit_minutes {
                                        p { class: "muted", "Time limit: {minutes} min" }
                                    }
                                    Link {
                                        to: Route::Attempt { quiz_id: quiz.id.to_string() },
                                        "Attempt"
                                    }
                                }
                            }
                        }
                    }
                },
            }}
        }
    }
}
