use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Form, Router};
use minijinja::context;
use serde::Deserialize;

use crate::api::helpers::render_page;
use crate::audit::{AuditEntry, write_audit};
use crate::auth::middleware::CurrentSession;
use crate::error::{ApiError, redirect};
use crate::store::AppState;

#[derive(Debug, Deserialize)]
pub struct SignInForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/signin", get(sign_in_form).post(sign_in))
        .route("/signout", post(sign_out))
}

async fn home(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Response, ApiError> {
    let mut data = session.lock().await;
    render_page(&state, &mut data, StatusCode::OK, "home.html", context! {})
}

async fn sign_in_form(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Response, ApiError> {
    let mut data = session.lock().await;
    render_page(
        &state,
        &mut data,
        StatusCode::OK,
        "signin.html",
        context! { entered_username => "" },
    )
}

#[tracing::instrument(skip_all, fields(username = %form.username), err)]
async fn sign_in(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Form(form): Form<SignInForm>,
) -> Result<Response, ApiError> {
    let mut data = session.lock().await;

    if state.credentials.verify(&form.username, &form.password) {
        data.username = Some(form.username.clone());
        data.flash(format!("Welcome {}!", form.username));

        write_audit(&AuditEntry {
            actor_name: &form.username,
            action: "auth.signin",
            resource: "session",
            detail: None,
        });
        return Ok(redirect("/"));
    }

    tracing::info!("sign-in rejected");
    data.flash("Invalid Credentials");
    render_page(
        &state,
        &mut data,
        StatusCode::UNPROCESSABLE_ENTITY,
        "signin.html",
        context! { entered_username => form.username },
    )
}

#[tracing::instrument(skip_all, err)]
async fn sign_out(CurrentSession(session): CurrentSession) -> Result<Response, ApiError> {
    let mut data = session.lock().await;

    if let Some(username) = data.username.take() {
        write_audit(&AuditEntry {
            actor_name: &username,
            action: "auth.signout",
            resource: "session",
            detail: None,
        });
    }
    data.flash("You have been signed out.");
    Ok(redirect("/"))
}
