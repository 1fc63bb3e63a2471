#![allow(dead_code)]

use std::io::Write;

use axum::Router;
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{HeaderValue, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use contacts::auth::credentials::CredentialStore;
use contacts::auth::password;
use contacts::config::Config;
use contacts::contacts::{Category, Contact};
use contacts::store::{AppState, SessionHandle};

pub const ADMIN_PASSWORD: &str = "adminsecret";

/// Build a test `AppState`.
///
/// - Writes a credentials file with `admin` / `adminsecret` and loads it
///   through the real loader
/// - Sessions live for an hour
pub fn test_state() -> AppState {
    test_state_with_anonymous_ttl(3600)
}

/// Like [`test_state`], but sessions that never sign in expire after
/// `anonymous_ttl_secs`.
pub fn test_state_with_anonymous_ttl(anonymous_ttl_secs: i64) -> AppState {
    let hash = password::hash_password(ADMIN_PASSWORD).expect("hash failed");
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    writeln!(file, "admin: \"{hash}\"").expect("write credentials");

    let credentials = CredentialStore::load(file.path()).expect("credentials load failed");
    let config = Config {
        listen: "127.0.0.1:0".into(),
        credentials_path: file.path().to_path_buf(),
        session_ttl_secs: 3600,
        anonymous_ttl_secs,
        secure_cookies: false,
    };
    AppState::new(config, credentials).expect("state build failed")
}

#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub content_type: Option<String>,
    pub set_cookie: Option<String>,
    pub body: String,
}

/// Drives the full app in-process and carries the session cookie between
/// requests, like a browser would.
pub struct TestClient {
    pub app: Router,
    pub state: AppState,
    token: Option<String>,
}

impl TestClient {
    pub fn new(state: AppState) -> Self {
        Self {
            app: contacts::api::app(state.clone()),
            state,
            token: None,
        }
    }

    pub async fn get(&mut self, path: &str) -> TestResponse {
        let req = self.request("GET", path).body(Body::empty()).unwrap();
        self.send(req).await
    }

    /// POST an urlencoded form.
    pub async fn post(&mut self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let req = self.form_request(path, fields);
        self.send(req).await
    }

    /// An urlencoded POST carrying this client's session cookie, for driving
    /// the app directly (e.g. from a spawned task).
    pub fn form_request(&self, path: &str, fields: &[(&str, &str)]) -> Request<Body> {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        self.request("POST", path)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    /// Follow the `Location` of a redirect response.
    pub async fn follow(&mut self, resp: &TestResponse) -> TestResponse {
        let location = resp.location.clone().expect("response is not a redirect");
        self.get(&location).await
    }

    fn request(&self, method: &str, path: &str) -> axum::http::request::Builder {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = &self.token {
            builder = builder.header(COOKIE, format!("contacts_session={token}"));
        }
        builder
    }

    async fn send(&mut self, req: Request<Body>) -> TestResponse {
        let resp = self.app.clone().oneshot(req).await.unwrap();

        let header = |value: Option<&HeaderValue>| value.map(|v| v.to_str().unwrap().to_owned());
        let location = header(resp.headers().get(LOCATION));
        let content_type = header(resp.headers().get(CONTENT_TYPE));
        let set_cookie = header(resp.headers().get(SET_COOKIE));

        if let Some(cookie) = &set_cookie {
            let pair = cookie.split(';').next().unwrap();
            let token = pair.strip_prefix("contacts_session=").unwrap();
            self.token = Some(token.to_owned());
        }

        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        TestResponse {
            status,
            location,
            content_type,
            set_cookie,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    /// The server-side session this client is bound to.
    pub fn session(&self) -> SessionHandle {
        let token = self.token.as_deref().expect("client has no session yet");
        self.state.sessions.get(token).expect("session not found")
    }

    pub async fn message(&self) -> Option<String> {
        self.session().lock().await.message.clone()
    }

    pub async fn username(&self) -> Option<String> {
        self.session().lock().await.username.clone()
    }

    pub async fn contact(&self, category: Category, name: &str) -> Option<Contact> {
        self.session()
            .lock()
            .await
            .contact_list
            .read(category, name)
            .cloned()
    }

    pub async fn sign_in(&mut self) {
        let resp = self
            .post(
                "/signin",
                &[("username", "admin"), ("password", ADMIN_PASSWORD)],
            )
            .await;
        assert_eq!(resp.status, StatusCode::FOUND, "admin sign-in failed");
    }

    /// Put jill (friends) and john (work) into the session.
    pub async fn seed_contacts(&self) {
        let session = self.session();
        let mut data = session.lock().await;
        data.contact_list.create(
            Category::Friends,
            "jill",
            Contact {
                phone: "772-889-9005".into(),
                email: "jill@hotmail.com".into(),
            },
        );
        data.contact_list.create(
            Category::Work,
            "john",
            Contact {
                phone: "484-383-9028".into(),
                email: "john@gmail.com".into(),
            },
        );
    }
}

/// A signed-in admin session holding jill and john, with no pending flash
/// message.
pub async fn admin_client() -> TestClient {
    let mut client = TestClient::new(test_state());
    client.sign_in().await;
    client.seed_contacts().await;
    client.session().lock().await.message = None;
    client
}
