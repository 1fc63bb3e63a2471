use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;

use tokio::sync::OwnedMutexGuard;

use crate::error::ApiError;
use crate::store::{AppState, SessionData, SessionHandle};

pub const SESSION_COOKIE: &str = "contacts_session";
pub const SIGN_IN_REQUIRED: &str = "You must be signed in to do that.";

/// The session attached to the current request by [`session_layer`].
/// Anonymous clients get one too.
#[derive(Clone)]
pub struct CurrentSession(pub SessionHandle);

/// A request whose session is signed in. Extracting it is the sign-in
/// guard: an anonymous session gets the sign-in flash message queued and the
/// request ends in a redirect home before the handler runs.
///
/// The session stays locked from the check until the handler drops `data`,
/// so a concurrent sign-out cannot land between the two.
pub struct SignedIn {
    pub username: String,
    pub data: OwnedMutexGuard<SessionData>,
}

/// Attach a session to every request, starting a new one (and setting its
/// cookie) when the client has none or its session has expired. A session
/// that is signed in once the handler finishes moves to the full TTL.
pub async fn session_layer(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let existing = extract_session_cookie(req.headers())
        .and_then(|raw| state.sessions.get(&raw).map(|session| (raw, session)));

    let (raw, session, is_new) = match existing {
        Some((raw, session)) => (raw, session, false),
        None => {
            let (raw, session) = state.sessions.create();
            (raw, session, true)
        }
    };
    req.extensions_mut().insert(CurrentSession(session.clone()));

    let mut response = next.run(req).await;

    // Busy means another request owns the session; it gets promoted then.
    if session.try_lock().is_ok_and(|data| data.username.is_some()) {
        state.sessions.promote(&raw);
    }

    if is_new {
        let cookie = session_cookie(
            &raw,
            state.config.session_ttl_secs,
            state.config.secure_cookies,
        );
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => tracing::error!(error = %e, "session cookie not representable"),
        }
    }
    response
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("session layer not installed")))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for SignedIn {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentSession(session) = CurrentSession::from_request_parts(parts, state).await?;

        let mut data = session.lock_owned().await;
        let Some(username) = data.username.clone() else {
            data.flash(SIGN_IN_REQUIRED);
            tracing::debug!(path = %parts.uri.path(), "anonymous request redirected");
            return Err(ApiError::AuthenticationRequired);
        };

        Ok(Self { username, data })
    }
}

fn session_cookie(raw_token: &str, max_age_secs: i64, secure: bool) -> String {
    let secure_flag = if secure { "; Secure" } else { "" };
    format!(
        "{SESSION_COOKIE}={raw_token}; Path=/; HttpOnly; SameSite=Strict; Max-Age={max_age_secs}{secure_flag}"
    )
}

fn extract_session_cookie(headers: &HeaderMap) -> Option<String> {
    let prefix = format!("{SESSION_COOKIE}=");
    for header in headers.get_all(COOKIE) {
        let Ok(cookies) = header.to_str() else {
            continue;
        };
        for cookie in cookies.split(';') {
            if let Some(value) = cookie.trim().strip_prefix(&prefix)
                && !value.is_empty()
            {
                return Some(value.to_owned());
            }
        }
    }
    None
}
