use askama::Template;
use axum::Form;
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use serde::Deserialize;

use crate::flow::{FlowState, LocalApi, WaitlistFlow};
use crate::state::SharedState;

#[derive(Template)]
#[template(path = "index.html")]
struct LandingTemplate {
    submitted: bool,
    error: Option<String>,
    email: String,
}

#[derive(Deserialize)]
pub struct JoinForm {
    #[serde(default)]
    pub email: String,
}

pub async fn index() -> impl IntoResponse {
    let template = LandingTemplate {
        submitted: false,
        error: None,
        email: String::new(),
    };
    Html(template.render().unwrap_or_default())
}

/// Plain form fallback: runs the whole signup flow server-side and renders the outcome.
pub async fn join(State(state): State<SharedState>, Form(form): Form<JoinForm>) -> impl IntoResponse {
    let mut flow = WaitlistFlow::new(LocalApi::new(state.clone()), state.mailer.clone());

    let template = match flow.submit(&form.email).await {
        FlowState::Submitted => LandingTemplate {
            submitted: true,
            error: None,
            email: String::new(),
        },
        other => LandingTemplate {
            submitted: false,
            error: other.error_message().map(|m| m.to_string()),
            email: form.email,
        },
    };

    Html(template.render().unwrap_or_default())
}
