use axum::http::StatusCode;
use axum::http::header::LOCATION;
use axum::response::{Html, IntoResponse, Response};

/// Failures a handler can end with. Form validation failures are not here:
/// they re-render the originating form and never leave the handler as errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The session is anonymous. The guard has already queued the flash
    /// message; the response is a redirect home.
    #[error("authentication required")]
    AuthenticationRequired,

    #[error("not found: {0}")]
    NotFound(&'static str),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// 302 to `location`.
pub fn redirect(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_owned())]).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::AuthenticationRequired => redirect("/"),
            Self::NotFound(what) => (
                StatusCode::NOT_FOUND,
                Html(format!(
                    "<h3>Not found</h3><p>That {what} does not exist.</p><a href=\"/index\">Back to contacts</a>"
                )),
            )
                .into_response(),
            Self::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html("<h3>Something went wrong</h3>".to_owned()),
                )
                    .into_response()
            }
        }
    }
}

impl From<minijinja::Error> for ApiError {
    fn from(err: minijinja::Error) -> Self {
        Self::Internal(anyhow::Error::new(err).context("template rendering failed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_required_redirects_home() {
        let resp = ApiError::AuthenticationRequired.into_response();
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.headers()[LOCATION], "/");
    }

    #[test]
    fn not_found_is_404() {
        let resp = ApiError::NotFound("contact").into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_is_500() {
        let resp = ApiError::Internal(anyhow::anyhow!("boom")).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn redirect_sets_location() {
        let resp = redirect("/index");
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.headers()[LOCATION], "/index");
    }
}
