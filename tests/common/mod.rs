#![allow(dead_code)]

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Form, Json, Router,
};
use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

pub const GOOD_PASSWORD: &str = "secret";
pub const GOOD_TOKEN: &str = "good-token";
pub const GOOD_CSRF: &str = "csrf-ok";

#[derive(Default)]
pub struct MockState {
    pub entries: Mutex<Vec<Value>>,
    pub surveys: Mutex<Vec<Value>>,
    pub password_changes: Mutex<Vec<Value>>,
    /// When set, the listing endpoint fails while creation keeps working.
    pub listing_down: AtomicBool,
}

impl MockState {
    pub fn set_listing_down(&self, down: bool) {
        self.listing_down.store(down, Ordering::SeqCst);
    }
}

pub struct MockBackend {
    pub base_url: String,
    pub state: Arc<MockState>,
}

/// Backend stand-in running on its own runtime so it outlives individual tests.
pub static BACKEND: Lazy<MockBackend> = Lazy::new(start_backend);

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

type Reply = (StatusCode, Json<Value>);

fn detail(status: StatusCode, message: &str) -> Reply {
    (status, Json(json!({ "detail": message })))
}

fn bearer_ok(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == format!("Bearer {GOOD_TOKEN}"))
}

async fn login(Form(form): Form<LoginForm>) -> Reply {
    if form.password != GOOD_PASSWORD {
        return detail(StatusCode::UNAUTHORIZED, "Incorrect email or password");
    }
    (
        StatusCode::OK,
        Json(json!({ "access_token": format!("token-for-{}", form.username), "token_type": "bearer" })),
    )
}

async fn register(Json(body): Json<Value>) -> Reply {
    if body["username"] == "taken" {
        return detail(StatusCode::BAD_REQUEST, "Username already taken");
    }
    (StatusCode::CREATED, Json(json!({ "id": 1, "email": body["email"] })))
}

async fn change_password(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    if !bearer_ok(&headers) {
        return detail(StatusCode::UNAUTHORIZED, "Could not validate credentials");
    }
    if body["current_password"] != "old-secret" {
        return detail(StatusCode::BAD_REQUEST, "Incorrect password");
    }
    state.password_changes.lock().await.push(body);
    (StatusCode::OK, Json(json!({ "message": "Password updated" })))
}

async fn list_entries(State(state): State<Arc<MockState>>) -> Reply {
    if state.listing_down.load(Ordering::SeqCst) {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "Listing unavailable");
    }
    (
        StatusCode::OK,
        Json(Value::Array(state.entries.lock().await.clone())),
    )
}

async fn create_entry(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Reply {
    let csrf = headers.get("x-csrftoken").and_then(|value| value.to_str().ok());
    if csrf != Some(GOOD_CSRF) {
        return detail(StatusCode::FORBIDDEN, "CSRF token missing or incorrect");
    }
    let mut entries = state.entries.lock().await;
    body["id"] = json!(entries.len() + 1);
    entries.push(body.clone());
    (StatusCode::CREATED, Json(body))
}

async fn submit_survey(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    if !bearer_ok(&headers) {
        return detail(StatusCode::UNAUTHORIZED, "Could not validate credentials");
    }
    state.surveys.lock().await.push(body);
    (StatusCode::OK, Json(json!({ "status": "saved" })))
}

fn mock_router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/auth/change-password", post(change_password))
        .route("/api/exercise-logs", get(list_entries))
        .route("/api/exercise-log", post(create_entry))
        .route("/api/v1/survey", post(submit_survey))
        .with_state(state)
}

fn start_backend() -> MockBackend {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind mock backend");
    listener
        .set_nonblocking(true)
        .expect("nonblocking mock listener");
    let addr = listener.local_addr().expect("mock backend address");
    let state = Arc::new(MockState::default());
    let app = mock_router(Arc::clone(&state));

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("mock backend runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).expect("mock listener");
            axum::serve(listener, app).await.expect("mock backend stopped");
        });
    });

    MockBackend {
        base_url: format!("http://{addr}"),
        state,
    }
}

pub fn entry_json(date: &str, exercise_type: &str, duration: f64, intensity: &str) -> Value {
    json!({
        "date": date,
        "exercise_type": exercise_type,
        "duration": duration,
        "intensity": intensity,
    })
}
