use dioxus::prelude::*;
use dioxus_router::use_navigator;

use quiz_core::model::{QuestionId, Quiz, QuizId};
use services::QuizUpdate;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::QuizFormVm;

/// Manage one quiz: edit metadata, toggle visibility, prune questions,
/// or delete the whole thing.
#[component]
pub fn QuizDetailView(quiz_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let quiz_id = QuizId::new(quiz_id);

    let mut quiz = use_signal(|| None::<Quiz>);
    let mut form = use_signal(QuizFormVm::default);
    let mut is_public = use_signal(|| false);
    let mut error = use_signal(|| None::<ViewError>);
    let mut busy = use_signal(|| false);
    let mut confirm_delete = use_signal(|| false);

    let quizzes_for_fetch = ctx.quizzes();
    let quiz_id_for_fetch = quiz_id.clone();
    let resource = use_resource(move || {
        let quizzes = quizzes_for_fetch.clone();
        let quiz_id = quiz_id_for_fetch.clone();
        async move {
            let fetched = quizzes.get(&quiz_id).await.map_err(ViewError::from)?;
            form.set(QuizFormVm::from_quiz(&fetched));
            is_public.set(fetched.is_public);
            quiz.set(Some(fetched));
            Ok::<_, ViewError>(())
        }
    });
    let state = view_state_from_resource(&resource);

    let ctx_for_save = ctx.clone();
    let quiz_id_for_save = quiz_id.clone();
    let on_save = move |evt: FormEvent| {
        evt.prevent_default();
        if busy() {
            return;
        }
        let quizzes = ctx_for_save.quizzes();
        let token = ctx_for_save.session().snapshot().token().cloned();
        let quiz_id = quiz_id_for_save.clone();
        let current = form();
        let visibility = is_public();
        spawn(async move {
            busy.set(true);
            error.set(None);
            let result = async {
                let token = token.ok_or(ViewError::NotSignedIn)?;
                let draft = current.to_draft()?;
                let questions = quiz().map(|q| q.questions).unwrap_or_default();
                let update = QuizUpdate {
                    title: draft.title,
                    description: draft.description,
                    total_marks: draft.total_marks,
                    time_limit_minutes: draft.time_limit_minutes,
                    is_public: visibility,
                    questions,
                };
                quizzes
                    .update(&token, &quiz_id, &update)
                    .await
                    .map_err(ViewError::from)?;
                // The list comes back refreshed; this view re-fetches its
                // own quiz instead.
                quizzes.get(&quiz_id).await.map_err(ViewError::from)
            }
            .await;
            busy.set(false);
            match result {
                Ok(updated) => {
                    is_public.set(updated.is_public);
                    form.set(QuizFormVm::from_quiz(&updated));
                    quiz.set(Some(updated));
                }
                Err(err) => error.set(Some(err)),
            }
        });
    };

    let ctx_for_delete = ctx.clone();
    let quiz_id_for_delete = quiz_id.clone();
    let on_delete = move |_: MouseEvent| {
        if !confirm_delete() {
            confirm_delete.set(true);
            return;
        }
        let quizzes = ctx_for_delete.quizzes();
        let token = ctx_for_delete.session().snapshot().token().cloned();
        let quiz_id = quiz_id_for_delete.clone();
        spawn(async move {
            let result = async {
                let token = token.ok_or(ViewError::NotSignedIn)?;
                quizzes
                    .delete(&token, &quiz_id)
                    .await
                    .map_err(ViewError::from)
            }
            .await;
            match result {
                Ok(_) => {
                    navigator.push(Route::Dashboard {});
                }
                Err(err) => error.set(Some(err)),
            }
        });
    };

    let ctx_for_question = ctx.clone();
    let quiz_id_for_question = quiz_id.clone();
    let on_delete_question = move |question_id: QuestionId| {
        let quizzes = ctx_for_question.quizzes();
        let token = ctx_for_question.session().snapshot().token().cloned();
        let quiz_id = quiz_id_for_question.clone();
        spawn(async move {
            let result = async {
                let token = token.ok_or(ViewError::NotSignedIn)?;
                quizzes
                    .delete_question(&token, &quiz_id, &question_id)
                    .await
                    .map_err(ViewError::from)
            }
            .await;
            match result {
                Ok(updated) => quiz.set(Some(updated)),
                Err(err) => error.set(Some(err)),
            }
        });
    };

    let questions: Vec<(QuestionId, String)> = quiz()
        .map(|q| {
            q.questions
                .iter()
                .map(|question| (question.id.clone(), question.text.clone()))
                .collect()
        })
        .unwrap_or_default();

    rsx! {
        div { class: "page",
            {match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading quiz…" }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                },
                ViewState::Ready(()) => rsx! {
                    h2 { "Edit quiz" }
                    form { class: "stack", onsubmit: on_save,
                        input {
                            placeholder: "Quiz title",
                            value: "{form().title}",
                            oninput: move |evt| form.with_mut(|f| f.title = evt.value()),
                        }
                        textarea {
                            placeholder: "Description",
                            value: "{form().description}",
                            oninput: move |evt| form.with_mut(|f| f.description = evt.value()),
                        }
                        input {
                            r#type: "number",
                            placeholder: "Total marks",
                            value: "{form().total_marks}",
                            oninput: move |evt| form.with_mut(|f| f.total_marks = evt.value()),
                        }
                        input {
                            r#type: "number",
                            placeholder: "Time limit (minutes, optional)",
                            value: "{form().time_limit_minutes}",
                            oninput: move |evt| form.with_mut(|f| f.time_limit_minutes = evt.value()),
                        }
                        label { class: "row",
                            input {
                                r#type: "checkbox",
                                checked: is_public(),
                                onchange: move |evt| is_public.set(evt.checked()),
                            }
                            "Public"
                        }
                        button { r#type: "submit", disabled: busy(),
                            if busy() { "Saving…" } else { "Save changes" }
                        }
                    }

                    h3 { "Questions" }
                    if questions.is_empty() {
                        p { class: "muted", "No questions yet." }
                    } else {
                        ul {
                            for (question_id, text) in questions {
                                li { key: "{question_id}", class: "row",
                                    span { "{text}" }
                                    button {
                                        onclick: {
                                            let on_delete_question = on_delete_question.clone();
                                            let question_id = question_id.clone();
                                            move |_| on_delete_question(question_id.clone())
                                        },
                                        "Delete"
                                    }
                                }
                            }
                        }
                    }

                    button { class: "error", onclick: on_delete,
                        if confirm_delete() { "Really delete this quiz?" } else { "Delete quiz" }
                    }
                },
            }}
            if let Some(err) = error() {
                p { class: "error", "{err.message()}" }
            }
        }
    }
}
