use dioxus::prelude::*;
use dioxus_router::use_navigator;

use quiz_core::model::{QuizId, ReviewEntry};
use services::AttemptPhase;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{AttemptVm, format_timer, start_attempt};

/// One run through a quiz: shuffled questions, answer persistence after
/// every change, and a wall-clock countdown that submits on expiry.
///
/// All async work here is spawned in component scope, so unmounting the
/// view cancels the countdown and any pending loads, so a stale response
/// never touches a torn-down view's state.
#[component]
pub fn AttemptView(quiz_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let flow = ctx.attempt_flow();
    let quiz_id = QuizId::new(quiz_id);
    let token = ctx.session().snapshot().token().cloned();

    let mut vm = use_signal(|| None::<AttemptVm>);
    let mut error = use_signal(|| None::<ViewError>);
    let mut remaining = use_signal(|| None::<u64>);

    // Loading → Active: fetch, restore the draft, shuffle.
    let flow_for_start = flow.clone();
    let quiz_id_for_start = quiz_id.clone();
    let resource = use_resource(move || {
        let flow = flow_for_start.clone();
        let quiz_id = quiz_id_for_start.clone();
        async move {
            let started = start_attempt(&flow, &quiz_id).await?;
            remaining.set(started.remaining_seconds(&flow));
            vm.set(Some(started));
            error.set(None);
            Ok::<_, ViewError>(())
        }
    });
    let state = view_state_from_resource(&resource);

    // Countdown tick, once per second. The remaining time is recomputed
    // from the deadline each tick, and expiry forces submission through the
    // same at-most-once guard as the submit button.
    let flow_for_timer = flow.clone();
    let token_for_timer = token.clone();
    use_future(move || {
        let flow = flow_for_timer.clone();
        let token = token_for_timer.clone();
        async move {
            loop {
                tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                let Some(mut current) = vm.with_mut(|slot| slot.take()) else {
                    continue;
                };
                if !current.has_deadline() || current.is_complete() {
                    vm.set(Some(current));
                    continue;
                }
                match current.tick(&flow, token.as_ref()).await {
                    Ok(left) => remaining.set(left),
                    Err(err) => error.set(Some(err)),
                }
                vm.set(Some(current));
            }
        }
    });

    let flow_for_select = flow.clone();
    let on_select = move |option: String| {
        let flow = flow_for_select.clone();
        spawn(async move {
            let Some(mut current) = vm.with_mut(|slot| slot.take()) else {
                return;
            };
            match current.select(&flow, &option).await {
                Ok(()) => error.set(None),
                Err(err) => error.set(Some(err)),
            }
            vm.set(Some(current));
        });
    };

    let flow_for_submit = flow.clone();
    let token_for_submit = token.clone();
    let on_submit = move |_: MouseEvent| {
        let flow = flow_for_submit.clone();
        let token = token_for_submit.clone();
        spawn(async move {
            let Some(mut current) = vm.with_mut(|slot| slot.take()) else {
                return;
            };
            match current.submit(&flow, token.as_ref()).await {
                Ok(_) => error.set(None),
                Err(err) => error.set(Some(err)),
            }
            vm.set(Some(current));
        });
    };

    let body = match state {
        ViewState::Idle | ViewState::Loading => rsx! {
            p { "Loading quiz…" }
        },
        ViewState::Error(err) => rsx! {
            p { class: "error", "{err.message()}" }
        },
        ViewState::Ready(()) => {
            let guard = vm.read();
            match guard.as_ref() {
                None => rsx! {
                    p { "Preparing attempt…" }
                },
                Some(current) if current.is_complete() => {
                    let score = current.score().unwrap_or(0);
                    let total = current.total();
                    let review: Vec<ReviewEntry> = current.review().to_vec();
                    rsx! {
                        h2 { "Quiz completed!" }
                        p { "Your score: {score} / {total}" }
                        if !review.is_empty() {
                            h3 { "Review" }
                            ul {
                                for entry in review {
                                    li { key: "{entry.question_id}",
                                        if let Some(text) = &entry.text {
                                            p { "{text}" }
                                        }
                                        if let Some(selected) = &entry.selected {
                                            p { class: "muted", "Your answer: {selected}" }
                                        }
                                        if let Some(correct) = &entry.correct {
                                            p { class: "muted", "Correct answer: {correct}" }
                                        }
                                    }
                                }
                            }
                        }
                        button {
                            onclick: move |_| {
                                navigator.push(Route::Dashboard {});
                            },
                            "Back to dashboard"
                        }
                    }
                }
                Some(current) => {
                    let title = current.title().to_owned();
                    let question = current.question_text().to_owned();
                    let question_key = current.question_key();
                    let options: Vec<(String, bool)> = current
                        .options()
                        .iter()
                        .map(|option| {
                            (
                                option.clone(),
                                current.selected() == Some(option.as_str()),
                            )
                        })
                        .collect();
                    let position = current.index() + 1;
                    let total = current.total();
                    let percent = current.progress_percent();
                    let is_last = current.is_last_question();
                    let submitting = current.phase() == AttemptPhase::Submitting;
                    let left = remaining();

                    rsx! {
                        h2 { "{title}" }
                        if let Some(seconds) = left {
                            p { class: "timer", "Time left: {format_timer(seconds)}" }
                        }
                        progress { value: "{percent}", max: "100" }
                        p { class: "muted", "Question {position} of {total}" }
                        div { class: "quiz-card",
                            p { "{question}" }
                            for (option, checked) in options {
                                label { class: "row", key: "{option}",
                                    input {
                                        r#type: "radio",
                                        name: "{question_key}",
                                        value: "{option}",
                                        checked,
                                        onchange: {
                                            let on_select = on_select.clone();
                                            let option = option.clone();
                                            move |_| on_select(option.clone())
                                        },
                                    }
                                    "{option}"
                                }
                            }
                            div { class: "row",
                                button {
                                    disabled: position == 1,
                                    onclick: move |_| {
                                        let Some(mut current) = vm.with_mut(|slot| slot.take()) else { return };
                                        current.previous();
                                        vm.set(Some(current));
                                    },
                                    "Previous"
                                }
                                if is_last {
                                    button {
                                        disabled: submitting,
                                        onclick: on_submit.clone(),
                                        if submitting { "Submitting…" } else { "Submit quiz" }
                                    }
                                } else {
                                    button {
                                        onclick: move |_| {
                                            let Some(mut current) = vm.with_mut(|slot| slot.take()) else { return };
                                            current.next();
                                            vm.set(Some(current));
                                        },
                                        "Next"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    rsx! {
        div { class: "page",
            {body}
            if let Some(err) = error() {
                p { class: "error", "{err.message()}" }
            }
        }
    }
}
