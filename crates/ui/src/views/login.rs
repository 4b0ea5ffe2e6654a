use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use services::LoginOutcome;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::ViewError;

#[component]
pub fn LoginView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let session = ctx.session();

    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<ViewError>);
    let mut busy = use_signal(|| false);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if busy() {
            return;
        }
        let session = session.clone();
        spawn(async move {
            busy.set(true);
            error.set(None);
            match session.login(&email(), &password()).await {
                Ok(LoginOutcome::Authenticated(_)) => {
                    navigator.push(Route::Dashboard {});
                }
                Ok(LoginOutcome::Rejected { message }) => {
                    error.set(Some(ViewError::Validation(message)));
                }
                Err(err) => error.set(Some(err.into())),
            }
            busy.set(false);
        });
    };

    rsx! {
        form { class: "stack", onsubmit: on_submit,
            h2 { "Login" }
            input {
                r#type: "email",
                placeholder: "Email",
                value: "{email}",
                oninput: move |evt| email.set(evt.value()),
            }
            input {
                r#type: "password",
                placeholder: "Password",
                value: "{password}",
                oninput: move |evt| password.set(evt.value()),
            }
            if let Some(err) = error() {
                p { class: "error", "{err.message()}" }
            }
            button { r#type: "submit", disabled: busy(),
                if busy() { "Signing in…" } else { "Login" }
            }
            p {
                Link { to: Route::Signup {}, "Need an account? Sign up" }
            }
        }
    }
}
