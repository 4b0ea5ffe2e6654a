use dioxus::prelude::*;
use dioxus_router::Link;

use services::QuizScope;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};

/// The signed-in landing view: All/Mine tabs over the quiz catalogue.
///
/// No optimistic state lives here: switching tabs or returning to the
/// dashboard re-fetches, so the grid always shows server truth.
#[component]
pub fn DashboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let session = ctx.session().snapshot();
    let greeting = session
        .user()
        .map_or_else(|| "Guest".to_owned(), |user| user.display_name().to_owned());
    let token = session.token().cloned();
    let quizzes = ctx.quizzes();

    let mut tab = use_signal(|| QuizScope::All);

    let resource = use_resource(move || {
        let quizzes = quizzes.clone();
        let token = token.clone();
        let scope = tab();
        async move {
            quizzes
                .list(scope, token.as_ref())
                .await
                .map_err(ViewError::from)
        }
    });
    let state = view_state_from_resource(&resource);
    let active = tab();

    rsx! {
        div { class: "page",
            h2 { "Hi, {greeting}!" }
            p {
                Link { to: Route::CreateQuiz {}, "➕ Create quiz" }
            }
            div { class: "tabs row",
                button {
                    class: if active == QuizScope::All { "active" } else { "" },
                    onclick: move |_| tab.set(QuizScope::All),
                    "All quizzes"
                }
                button {
                    class: if active == QuizScope::Mine { "active" } else { "" },
                    onclick: move |_| tab.set(QuizScope::Mine),
                    "My quizzes"
                }
            }
            {match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading quizzes…" }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                },
                ViewState::Ready(items) => rsx! {
                    if items.is_empty() {
                        p { "No quizzes found. Create one for yourself!" }
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
                                    p { class: "muted",
                                        if quiz.is_public { "Public" } else { "Private" }
                                    }
                                    div { class: "row",
                                        Link {
                                            to: Route::Attempt { quiz_id: quiz.id.to_string() },
                                            "▶ Attempt"
                                        }
                                        Link {
                                            to: Route::QuizDetail { quiz_id: quiz.id.to_string() },
                                            "Manage"
                                        }
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
