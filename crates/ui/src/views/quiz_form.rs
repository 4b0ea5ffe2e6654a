use dioxus::prelude::*;
use dioxus_router::use_navigator;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::ViewError;
use crate::vm::QuizFormVm;

/// Create a quiz: metadata plus a source document the server turns into
/// questions.
#[component]
pub fn QuizFormView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();

    let mut form = use_signal(QuizFormVm::default);
    let mut error = use_signal(|| None::<ViewError>);
    let mut busy = use_signal(|| false);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if busy() {
            return;
        }
        let quizzes = ctx.quizzes();
        let token = ctx.session().snapshot().token().cloned();
        let current = form();
        spawn(async move {
            busy.set(true);
            error.set(None);
            let result = async {
                let token = token.ok_or(ViewError::NotSignedIn)?;
                let draft = current.to_draft()?;
                let source = current.load_source().await?;
                quizzes
                    .create(&token, draft, source)
                    .await
                    .map_err(ViewError::from)
            }
            .await;
            busy.set(false);
            match result {
                // The refreshed list is re-fetched by the dashboard itself.
                Ok(_) => {
                    navigator.push(Route::Dashboard {});
                }
                Err(err) => error.set(Some(err)),
            }
        });
    };

    rsx! {
        form { class: "stack", onsubmit: on_submit,
            h2 { "Create a quiz" }
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
            input {
                placeholder: "Path to source document (PDF)",
                value: "{form().source_path}",
                oninput: move |evt| form.with_mut(|f| f.source_path = evt.value()),
            }
            if let Some(err) = error() {
                p { class: "error", "{err.message()}" }
            }
            button { r#type: "submit", disabled: busy(),
                if busy() { "Uploading…" } else { "Create quiz" }
            }
        }
    }
}
