//! In-process fake device for protocol tests.
//!
//! Emulates the relevant slice of a Ricoh-class embedded web server: the
//! login challenge, the rotating one-time `wimToken`, the session cookie,
//! and the busy/timeout answers of the set-user endpoint. Tokens are
//! enforced the way real devices enforce them: every state-changing request
//! must carry the most recently issued token.

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use printfleet::types::{FunctionSet, SmbFolder, UserPayload};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

/// Administrator account the fake device accepts.
pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASSWORD: &str = "secret";

const SESSION_COOKIE: &str = "wimsesid=314159265";

#[derive(Default)]
struct Inner {
    require_auth: bool,
    token_counter: u64,
    current_token: Option<String>,
    session_live: bool,
    busy_responses: u32,
    timeout_responses: u32,
    hits: HashMap<&'static str, usize>,
    submissions: Vec<Vec<(String, String)>>,
}

impl Inner {
    fn issue_token(&mut self) -> String {
        self.token_counter += 1;
        let token = (1_700_000_000 + self.token_counter).to_string();
        self.current_token = Some(token.clone());
        token
    }

    fn token_is_current(&self, submitted: Option<&str>) -> bool {
        match (&self.current_token, submitted) {
            (Some(current), Some(submitted)) => current.as_str() == submitted,
            _ => false,
        }
    }
}

/// Handle to a running fake device.
pub struct FakeDevice {
    pub addr: SocketAddr,
    state: Arc<Mutex<Inner>>,
}

impl FakeDevice {
    /// Start a fake device on an ephemeral port.
    pub async fn spawn(require_auth: bool) -> Self {
        let state = Arc::new(Mutex::new(Inner {
            require_auth,
            ..Inner::default()
        }));

        let app = Router::new()
            .route("/", get(landing))
            .route("/web/guest/es/websys/webArch/authForm.cgi", get(auth_form))
            .route("/web/guest/es/websys/webArch/login.cgi", post(login))
            .route("/web/entry/es/address/adrsList.cgi", get(address_list))
            .route("/web/entry/es/address/adrsGetUser.cgi", post(add_user_form))
            .route("/web/entry/es/address/adrsSetUser.cgi", post(set_user))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Answer the next `n` submissions with the busy marker.
    pub fn set_busy_responses(&self, n: u32) {
        self.state.lock().unwrap().busy_responses = n;
    }

    /// Answer the next `n` submissions with the session-timeout marker and
    /// kill the session cookie, as a real device does.
    pub fn set_timeout_responses(&self, n: u32) {
        self.state.lock().unwrap().timeout_responses = n;
    }

    /// How many times an endpoint was hit.
    pub fn hits(&self, endpoint: &str) -> usize {
        *self.state.lock().unwrap().hits.get(endpoint).unwrap_or(&0)
    }

    /// Recorded accepted submissions, oldest first.
    pub fn submissions(&self) -> Vec<Vec<(String, String)>> {
        self.state.lock().unwrap().submissions.clone()
    }
}

/// A baseline user payload for tests.
pub fn payload() -> UserPayload {
    UserPayload {
        display_name: "Jane Doe".to_string(),
        user_code: "54321".to_string(),
        folder_username: "jdoe".to_string(),
        folder_password: String::new(),
        functions: FunctionSet {
            copier: true,
            scanner: true,
            printer: true,
            document_server: false,
            fax: false,
            browser: false,
        },
        smb_folder: SmbFolder {
            server: "files.corp".to_string(),
            port: 445,
            path: r"\\files.corp\scans\jdoe".to_string(),
        },
    }
}

/// Fetch a form field's values from a recorded submission.
pub fn field_values<'a>(submission: &'a [(String, String)], name: &str) -> Vec<&'a str> {
    submission
        .iter()
        .filter(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
        .collect()
}

fn page_with_token(token: &str) -> String {
    format!(
        r#"<html><body><form><input type="hidden" name="wimToken" value="{token}"></form></body></html>"#
    )
}

fn session_ok(inner: &Inner, headers: &HeaderMap) -> bool {
    if !inner.require_auth {
        return true;
    }
    if !inner.session_live {
        return false;
    }
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|cookies| cookies.contains(SESSION_COOKIE))
}

fn record_hit(inner: &mut Inner, endpoint: &'static str) {
    *inner.hits.entry(endpoint).or_insert(0) += 1;
}

async fn landing() -> Html<String> {
    Html("<html><body>Web Image Monitor</body></html>".to_string())
}

async fn auth_form(State(state): State<Arc<Mutex<Inner>>>) -> Html<String> {
    let mut inner = state.lock().unwrap();
    record_hit(&mut inner, "authForm");
    let token = inner.issue_token();
    Html(page_with_token(&token))
}

async fn login(State(state): State<Arc<Mutex<Inner>>>, body: String) -> Response {
    let mut inner = state.lock().unwrap();
    record_hit(&mut inner, "login");

    let form = parse_form(&body);
    let token = field_values(&form, "wimToken").first().copied();
    let userid = field_values(&form, "userid").first().copied().unwrap_or("");
    let password = field_values(&form, "password").first().copied().unwrap_or("");

    let creds_ok = BASE64.decode(userid).ok().as_deref() == Some(ADMIN_USER.as_bytes())
        && BASE64.decode(password).ok().as_deref() == Some(ADMIN_PASSWORD.as_bytes());

    if inner.token_is_current(token) && creds_ok {
        inner.session_live = true;
        Response::builder()
            .status(StatusCode::FOUND)
            .header(header::SET_COOKIE, format!("{SESSION_COOKIE}; path=/"))
            .header(header::LOCATION, "/web/entry/es/address/adrsList.cgi")
            .body("".into())
            .unwrap()
    } else {
        Html("<html><body>Login incorrecto</body></html>".to_string()).into_response()
    }
}

async fn address_list(State(state): State<Arc<Mutex<Inner>>>, headers: HeaderMap) -> Html<String> {
    let mut inner = state.lock().unwrap();
    record_hit(&mut inner, "adrsList");

    if !session_ok(&inner, &headers) {
        return Html("<html><body>Inicio de sesi\u{f3}n requerido</body></html>".to_string());
    }

    let token = inner.issue_token();
    Html(page_with_token(&token))
}

async fn add_user_form(
    State(state): State<Arc<Mutex<Inner>>>,
    headers: HeaderMap,
    body: String,
) -> Html<String> {
    let mut inner = state.lock().unwrap();
    record_hit(&mut inner, "adrsGetUser");

    let form = parse_form(&body);
    let token = field_values(&form, "wimToken").first().copied();

    if !session_ok(&inner, &headers) || !inner.token_is_current(token) {
        return Html("<html><body>Solicitud rechazada</body></html>".to_string());
    }

    let token = inner.issue_token();
    Html(format!(
        r#"<html><body><form><input type="hidden" name="wimToken" value="{token}"><input type="hidden" name="entryIndexIn" value="00007"></form></body></html>"#
    ))
}

async fn set_user(
    State(state): State<Arc<Mutex<Inner>>>,
    headers: HeaderMap,
    body: String,
) -> Html<String> {
    let mut inner = state.lock().unwrap();
    record_hit(&mut inner, "adrsSetUser");

    let form = parse_form(&body);
    let token = field_values(&form, "wimToken").first().copied();

    // Stale tokens and dead sessions both surface as a timed-out session
    if !session_ok(&inner, &headers) || !inner.token_is_current(token) {
        return Html("<html><body>Tiempo de sesi\u{f3}n agotado</body></html>".to_string());
    }

    if inner.timeout_responses > 0 {
        inner.timeout_responses -= 1;
        inner.session_live = false;
        return Html("<html><body>Tiempo de sesi\u{f3}n agotado</body></html>".to_string());
    }

    if inner.busy_responses > 0 {
        inner.busy_responses -= 1;
        return Html(
            "<html><body>El dispositivo est\u{e1} siendo utilizado (BUSY)</body></html>"
                .to_string(),
        );
    }

    inner.submissions.push(form);
    Html("<html><body>OK</body></html>".to_string())
}

/// Parse an urlencoded form body, preserving order and duplicates.
fn parse_form(body: &str) -> Vec<(String, String)> {
    body.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (percent_decode(key), percent_decode(value))
        })
        .collect()
}

fn percent_decode(s: &str) -> String {
    let s = s.replace('+', " ");
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(byte) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
