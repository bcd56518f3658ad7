use crate::auth::{PASSWORD_CHANGED_MESSAGE, PASSWORD_MISMATCH_MESSAGE, REGISTERED_MESSAGE};
use crate::errors::AppError;
use crate::exercise_log::{EntryModal, ExerciseLogTable, LOG_FAILED_MESSAGE};
use crate::models::{
    ChangePasswordFormInput, ExerciseDraft, ExerciseLogQuery, LoginFormInput, RegisterFormInput,
};
use crate::state::AppState;
use crate::storage::CookieJar;
use crate::survey::{SurveyAction, SurveyState};
use crate::ui::{self, Alert};
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use tracing::warn;

pub const AFTER_LOGIN_PATH: &str = "/exercise-log";
pub const SURVEY_SAVED_MESSAGE: &str = "Survey saved successfully!";

pub async fn index() -> Redirect {
    Redirect::to("/login")
}

pub async fn login_page() -> Html<String> {
    Html(ui::render_login(&[], ""))
}

pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(input): Form<LoginFormInput>,
) -> Response {
    let jar = CookieJar::from_headers(&headers);
    match state.auth.login(&jar, &input.email, &input.password).await {
        Ok(_) => {
            let mut response = Redirect::to(AFTER_LOGIN_PATH).into_response();
            if let Some(cookie) = jar.set_cookie_header() {
                match HeaderValue::from_str(&cookie) {
                    Ok(value) => {
                        response.headers_mut().append(header::SET_COOKIE, value);
                    }
                    Err(err) => warn!("access token is not a valid cookie value: {err}"),
                }
            }
            response
        }
        Err(err) => {
            let alerts = [Alert::error(err.alert_message())];
            Html(ui::render_login(&alerts, &input.email)).into_response()
        }
    }
}

pub async fn register_page() -> Html<String> {
    Html(ui::render_register(&[], "", ""))
}

pub async fn register(
    State(state): State<AppState>,
    Form(input): Form<RegisterFormInput>,
) -> Html<String> {
    match state
        .auth
        .register(&input.email, &input.username, &input.password)
        .await
    {
        Ok(()) => Html(ui::render_login(&[Alert::success(REGISTERED_MESSAGE)], &input.email)),
        Err(err) => {
            let alerts = [Alert::error(err.alert_message())];
            Html(ui::render_register(&alerts, &input.email, &input.username))
        }
    }
}

pub async fn change_password_page() -> Html<String> {
    Html(ui::render_change_password(&[]))
}

pub async fn change_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(input): Form<ChangePasswordFormInput>,
) -> Html<String> {
    if input.new_password != input.confirm_password {
        return Html(ui::render_change_password(&[Alert::error(PASSWORD_MISMATCH_MESSAGE)]));
    }

    let jar = CookieJar::from_headers(&headers);
    let alert = match state
        .auth
        .change_password(&jar, &input.current_password, &input.new_password)
        .await
    {
        Ok(()) => Alert::success(PASSWORD_CHANGED_MESSAGE),
        Err(err) => Alert::error(err.alert_message()),
    };
    Html(ui::render_change_password(&[alert]))
}

async fn load_table(state: &AppState) -> ExerciseLogTable {
    match state.exercise_log.list().await {
        Ok(entries) => ExerciseLogTable::from_entries(entries),
        Err(err) => {
            warn!("failed to fetch exercise logs: {err}");
            ExerciseLogTable::default()
        }
    }
}

pub async fn exercise_log_page(
    State(state): State<AppState>,
    Query(query): Query<ExerciseLogQuery>,
) -> Html<String> {
    let table = load_table(&state).await;
    let modal = EntryModal {
        open: query.modal.as_deref() == Some("open"),
        ..EntryModal::closed()
    };
    Html(ui::render_exercise_log(&table, &modal, &[]))
}

pub async fn log_exercise(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(draft): Form<ExerciseDraft>,
) -> Html<String> {
    let alert = match draft.to_entry() {
        Ok(entry) => {
            let jar = CookieJar::from_headers(&headers);
            let credentials = jar.csrf(&state.config.csrf_cookie);
            match state.exercise_log.create(&credentials, &entry).await {
                Ok(created) => {
                    let mut table = load_table(&state).await;
                    table.include_created(created);
                    return Html(ui::render_exercise_log(&table, &EntryModal::closed(), &[]));
                }
                Err(_) => Alert::error(LOG_FAILED_MESSAGE),
            }
        }
        Err(message) => Alert::error(message),
    };

    let table = load_table(&state).await;
    let modal = EntryModal::reopened_with(draft);
    Html(ui::render_exercise_log(&table, &modal, &[alert]))
}

pub async fn survey_page() -> Html<String> {
    Html(ui::render_survey(&SurveyState::default(), &[]))
}

pub async fn survey(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Html<String>, AppError> {
    let action = pairs
        .iter()
        .find(|(key, _)| key == "action")
        .map(|(_, value)| value.parse::<SurveyAction>())
        .transpose()
        .map_err(AppError::bad_request)?
        .unwrap_or(SurveyAction::Refresh);

    let mut survey = SurveyState::from_form(&pairs);
    let ready = survey.apply(&action);

    let mut alerts = Vec::new();
    if action == SurveyAction::Submit && ready {
        match survey.to_submission() {
            Ok(submission) => {
                let jar = CookieJar::from_headers(&headers);
                match state.survey.submit(&jar, &submission).await {
                    Ok(()) => alerts.push(Alert::success(SURVEY_SAVED_MESSAGE)),
                    Err(err) => alerts.push(Alert::error(err.alert_message())),
                }
            }
            Err(message) => alerts.push(Alert::error(message)),
        }
    }

    Ok(Html(ui::render_survey(&survey, &alerts)))
}
