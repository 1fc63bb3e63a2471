use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use minijinja::context;
use serde::Serialize;

use crate::contacts::Category;
use crate::error::ApiError;
use crate::store::{AppState, SessionData};

#[derive(Debug, Serialize)]
pub struct CategoryOption {
    pub value: &'static str,
    pub title: &'static str,
}

pub fn category_options() -> Vec<CategoryOption> {
    Category::ALL
        .iter()
        .map(|c| CategoryOption {
            value: c.as_str(),
            title: c.title(),
        })
        .collect()
}

/// Render a page inside the layout. The pending flash message is consumed:
/// it shows on this page and no other.
pub fn render_page(
    state: &AppState,
    session: &mut SessionData,
    status: StatusCode,
    template: &str,
    page: minijinja::Value,
) -> Result<Response, ApiError> {
    let flash = session.take_message();
    let username = session.username.clone();

    let body = state.templates.render(
        template,
        context! {
            username => username,
            flash => flash,
            ..page
        },
    )?;
    Ok((status, Html(body)).into_response())
}

/// Category segment of a contact URL. Anything outside the fixed set is a 404.
pub fn path_category(raw: &str) -> Result<Category, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound("category"))
}
