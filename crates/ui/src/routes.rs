use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable, use_navigator, use_route};

use services::{GateDecision, RouteClass};

use crate::context::AppContext;
use crate::views::{
    AttemptView, DashboardView, HomeView, LoginView, QuizDetailView, QuizFormView, SignupView,
};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/login", LoginView)] Login {},
        #[route("/signup", SignupView)] Signup {},
        #[route("/dashboard", DashboardView)] Dashboard {},
        #[route("/create-quiz", QuizFormView)] CreateQuiz {},
        #[route("/quiz/:quiz_id", QuizDetailView)] QuizDetail { quiz_id: String },
        #[route("/quiz/:quiz_id/attempt", AttemptView)] Attempt { quiz_id: String },
}

/// Classify a route for the auth gate.
#[must_use]
pub fn route_class(route: &Route) -> RouteClass {
    match route {
        Route::Home {} => RouteClass::Public,
        Route::Login {} | Route::Signup {} => RouteClass::Auth,
        Route::Dashboard {} | Route::CreateQuiz {} | Route::QuizDetail { .. } => {
            RouteClass::Protected
        }
        Route::Attempt { .. } => RouteClass::Attempt,
    }
}

/// The gate wraps route resolution for every navigable view: the decision
/// is evaluated on each render of the layout, i.e. on each navigation.
#[component]
fn Layout() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let route = use_route::<Route>();

    let decision = ctx
        .auth_gate()
        .decide(ctx.session().is_authenticated(), route_class(&route));

    match decision {
        GateDecision::RedirectToLogin => {
            navigator.replace(Route::Login {});
            return rsx! {};
        }
        GateDecision::RedirectToDashboard => {
            navigator.replace(Route::Dashboard {});
            return rsx! {};
        }
        GateDecision::Allow => {}
    }

    rsx! {
        div { class: "app",
            Navbar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Navbar() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let session = ctx.session().snapshot();

    rsx! {
        nav { class: "topbar",
            h1 { "Quizdesk" }
            Link { to: Route::Home {}, "Home" }
            if session.is_authenticated() {
                Link { to: Route::Dashboard {}, "Dashboard" }
                Link { to: Route::CreateQuiz {}, "Create" }
            }
            div { class: "spacer" }
            if let Some(user) = session.user() {
                span { class: "muted", "Hi, {user.display_name()}" }
                button {
                    onclick: move |_| {
                        let session = ctx.session();
                        let navigator = navigator;
                        spawn(async move {
                            // Logout always succeeds locally; a storage
                            // hiccup is not worth keeping the user signed in.
                            let _ = session.logout().await;
                            navigator.push(Route::Login {});
                        });
                    },
                    "Logout"
                }
            } else {
                Link { to: Route::Login {}, "Login" }
                Link { to: Route::Signup {}, "Signup" }
            }
        }
    }
}
