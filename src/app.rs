use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/login", get(handlers::login_page).post(handlers::login))
        .route("/register", get(handlers::register_page).post(handlers::register))
        .route(
            "/change-password",
            get(handlers::change_password_page).post(handlers::change_password),
        )
        .route(
            "/exercise-log",
            get(handlers::exercise_log_page).post(handlers::log_exercise),
        )
        .route("/survey", get(handlers::survey_page).post(handlers::survey))
        .with_state(state)
}
