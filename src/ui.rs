use crate::exercise_log::{EntryModal, ExerciseLogTable};
use crate::models::{ExerciseLogEntry, ExerciseType, Intensity};
use crate::sections::RepeatableSection;
use crate::survey::{self, FieldSpec, InputKind, StepSpec, SurveyState};
use crate::wizard::TOTAL_STEPS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Error,
}

impl AlertKind {
    fn css_class(self) -> &'static str {
        match self {
            AlertKind::Success => "alert-success",
            AlertKind::Error => "alert-error",
        }
    }
}

/// Transient message shown above the page content; fades out after five seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Error,
            message: message.into(),
        }
    }
}

pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn render_page(title: &str, alerts: &[Alert], content: &str) -> String {
    let alerts: String = alerts
        .iter()
        .map(|alert| {
            format!(
                r#"<div class="alert {}" role="alert">{}</div>"#,
                alert.kind.css_class(),
                escape(&alert.message)
            )
        })
        .collect();

    LAYOUT_HTML
        .replace("{{TITLE}}", &escape(title))
        .replace("{{ALERTS}}", &alerts)
        .replace("{{CONTENT}}", content)
}

fn hidden_class(visible: bool) -> &'static str {
    if visible { "" } else { " hidden" }
}

fn options_html(options: &[(&str, &str)], selected: &str) -> String {
    let mut html = String::from(r#"<option value="">Select...</option>"#);
    for (value, label) in options {
        let marker = if *value == selected { " selected" } else { "" };
        html.push_str(&format!(
            r#"<option value="{}"{marker}>{}</option>"#,
            escape(value),
            escape(label)
        ));
    }
    html
}

fn error_html(message: Option<&str>) -> String {
    message
        .map(|message| format!(r#"<div class="error-message">{}</div>"#, escape(message)))
        .unwrap_or_default()
}

pub fn render_login(alerts: &[Alert], email: &str) -> String {
    let content = format!(
        r#"<h1>Log in</h1>
<form id="login-form" method="post" action="/login">
  <label for="email">Email</label>
  <input id="email" name="email" type="text" value="{}" required />
  <label for="password">Password</label>
  <input id="password" name="password" type="password" required />
  <button type="submit" class="primary">Log in</button>
</form>
<p class="switch">No account yet? <a href="/register">Register</a></p>"#,
        escape(email)
    );
    render_page("Log in", alerts, &content)
}

pub fn render_register(alerts: &[Alert], email: &str, username: &str) -> String {
    let content = format!(
        r#"<h1>Create an account</h1>
<form id="register-form" method="post" action="/register">
  <label for="email">Email</label>
  <input id="email" name="email" type="email" value="{}" required />
  <label for="username">Username</label>
  <input id="username" name="username" type="text" value="{}" required />
  <label for="password">Password</label>
  <input id="password" name="password" type="password" required />
  <button type="submit" class="primary">Register</button>
</form>
<p class="switch">Already registered? <a href="/login">Log in</a></p>"#,
        escape(email),
        escape(username)
    );
    render_page("Register", alerts, &content)
}

pub fn render_change_password(alerts: &[Alert]) -> String {
    let content = r#"<h1>Change password</h1>
<form id="change-password-form" method="post" action="/change-password">
  <label for="currentPassword">Current password</label>
  <input id="currentPassword" name="currentPassword" type="password" required />
  <label for="newPassword">New password</label>
  <input id="newPassword" name="newPassword" type="password" required />
  <label for="confirmPassword">Confirm new password</label>
  <input id="confirmPassword" name="confirmPassword" type="password" required />
  <button type="submit" class="primary">Change password</button>
</form>"#;
    render_page("Change password", alerts, content)
}

fn render_log_row(entry: &ExerciseLogEntry) -> String {
    format!(
        r#"<tr>
  <td>{}</td>
  <td>{}</td>
  <td>{}</td>
  <td>{}</td>
  <td><button type="button" class="link">Edit</button> <button type="button" class="link danger">Delete</button></td>
</tr>"#,
        escape(&entry.display_date()),
        entry.exercise_type.as_str(),
        escape(&entry.display_duration()),
        entry.intensity.as_str()
    )
}

pub fn render_exercise_log(table: &ExerciseLogTable, modal: &EntryModal, alerts: &[Alert]) -> String {
    let rows: String = if table.is_empty() {
        EMPTY_LOG_ROW.to_string()
    } else {
        table.rows().iter().map(render_log_row).collect()
    };

    let type_options: Vec<(&str, &str)> = ExerciseType::ALL
        .iter()
        .map(|kind| (kind.as_str(), kind.as_str()))
        .collect();
    let intensity_options: Vec<(&str, &str)> = Intensity::ALL
        .iter()
        .map(|level| (level.as_str(), level.as_str()))
        .collect();
    let draft = &modal.draft;

    let content = format!(
        r#"<h1>Exercise log</h1>
<p><a id="add-exercise-btn" class="button primary" href="/exercise-log?modal=open">Add exercise</a></p>
<table>
  <thead><tr><th>Date</th><th>Type</th><th>Duration</th><th>Intensity</th><th>Actions</th></tr></thead>
  <tbody id="exercise-log-body">{rows}</tbody>
</table>
<div id="exercise-modal" class="modal{modal_class}">
  <form id="exercise-form" method="post" action="/exercise-log">
    <h2>Log exercise</h2>
    <label for="date">Date</label>
    <input id="date" name="date" type="date" value="{date}" required />
    <label for="exercise_type">Exercise type</label>
    <select id="exercise_type" name="exercise_type" required>{types}</select>
    <label for="duration">Duration (minutes)</label>
    <input id="duration" name="duration" type="number" min="1" value="{duration}" required />
    <label for="intensity">Intensity</label>
    <select id="intensity" name="intensity" required>{intensities}</select>
    <button type="submit" class="primary">Save</button>
    <a id="close-modal" class="button" href="/exercise-log">Close</a>
  </form>
</div>"#,
        modal_class = hidden_class(modal.open),
        date = escape(&draft.date),
        types = options_html(&type_options, draft.exercise_type.trim()),
        duration = escape(&draft.duration),
        intensities = options_html(&intensity_options, draft.intensity.trim()),
    );
    render_page("Exercise log", alerts, &content)
}

const EMPTY_LOG_ROW: &str = r#"<tr class="empty"><td colspan="5">No exercises logged yet</td></tr>"#;

fn render_field(state: &SurveyState, field: &FieldSpec) -> String {
    let value = state.value(field.id);
    let error = state.errors.get(field.id);
    let class = if error.is_some() { " class=\"error\"" } else { "" };
    let required = if field.required { " required" } else { "" };

    let input = match field.kind {
        InputKind::Number { step } => format!(
            r#"<input id="{id}" name="{id}" type="number" step="{step}" value="{value}"{class}{required} />"#,
            id = field.id,
            value = escape(value),
        ),
        InputKind::Select(options) => format!(
            r#"<select id="{id}" name="{id}"{class}{required}>{options}</select>"#,
            id = field.id,
            options = options_html(options, value.trim()),
        ),
        InputKind::Text => format!(
            r#"<textarea id="{id}" name="{id}"{class}{required}>{value}</textarea>"#,
            id = field.id,
            value = escape(value),
        ),
    };

    format!(
        r#"<div class="field"><label for="{id}">{label}</label>{input}{error}</div>"#,
        id = field.id,
        label = escape(field.label),
        error = error_html(error),
    )
}

fn render_section(state: &SurveyState, section: &RepeatableSection) -> String {
    let kind = section.kind();
    let mut html = format!(
        r#"<div id="{}" class="repeatable"><h3>{}</h3>"#,
        kind.container_id,
        escape(kind.label)
    );

    for (index, entry) in section.entries().iter().enumerate() {
        let entry_id = survey::entry_field_id(kind.container_id, index);
        let detail_id = survey::detail_field_id(kind.container_id, index);
        let detail_error = state.errors.get(&detail_id);
        let detail_class = if detail_error.is_some() { " class=\"error\"" } else { "" };
        let detail_required = if section.detail_required(index) { " required" } else { "" };
        let remove = if section.has_remove_control(index) {
            format!(
                r#"<button type="submit" name="action" value="remove:{}:{index}" class="link danger">- Remove</button>"#,
                kind.container_id
            )
        } else {
            String::new()
        };

        html.push_str(&format!(
            r#"<div class="entry">
  <select name="{entry_id}">{options}</select>
  <div id="{panel}-{index}" class="details{panel_class}">
    <input name="{detail_id}" type="text" placeholder="Please specify" value="{detail}"{detail_class}{detail_required} />{error}
  </div>
  {remove}
</div>"#,
            options = options_html(kind.options, &entry.value),
            panel = kind.detail_panel_id,
            panel_class = hidden_class(section.detail_visible(index)),
            detail = escape(&entry.detail),
            error = error_html(detail_error),
        ));
    }

    html.push_str(&format!(
        r#"<button type="submit" name="action" value="add:{}" class="link add-item{}">+ Add another</button></div>"#,
        kind.container_id,
        hidden_class(section.add_control_visible())
    ));
    html
}

fn render_step(state: &SurveyState, spec: &StepSpec) -> String {
    let mut body = String::new();
    for field in spec.fields {
        body.push_str(&render_field(state, field));
    }
    for kind in spec.sections {
        if let Some(section) = state.section(kind.container_id) {
            body.push_str(&render_section(state, section));
        }
    }

    if spec.number == crate::wizard::NUTRITION_STEP {
        let bmi = state
            .metrics()
            .map(|metrics| metrics.bmi.to_string())
            .unwrap_or_else(|| "-".to_string());
        body.push_str(&format!(
            r#"<p class="bmi">Your BMI: <span id="bmi-display">{bmi}</span></p>"#
        ));
    }

    let mut buttons = String::new();
    if spec.number > 1 {
        buttons.push_str(r#"<button type="submit" name="action" value="previous">Previous</button>"#);
    }
    if !spec.sections.is_empty() {
        buttons.push_str(r#"<button type="submit" name="action" value="refresh">Update</button>"#);
    }
    if spec.number < TOTAL_STEPS {
        buttons.push_str(r#"<button type="submit" name="action" value="next" class="primary">Next</button>"#);
    } else {
        buttons.push_str(r#"<button type="submit" name="action" value="submit" class="primary">Submit</button>"#);
    }

    format!(
        r#"<section id="step{number}" class="step-content{hidden}">
<h2>{title}</h2>
{body}
<div class="nav">{buttons}</div>
</section>"#,
        number = spec.number,
        hidden = hidden_class(state.wizard.is_visible(spec.number)),
        title = escape(spec.title),
    )
}

pub fn render_survey(state: &SurveyState, alerts: &[Alert]) -> String {
    let indicators: String = state
        .wizard
        .indicators()
        .into_iter()
        .enumerate()
        .map(|(index, status)| {
            format!(
                r#"<div class="step-circle {}">{}</div>"#,
                status.css_class(),
                index + 1
            )
        })
        .collect();
    let steps: String = survey::STEPS
        .iter()
        .map(|spec| render_step(state, spec))
        .collect();

    let content = format!(
        r#"<h1>Health &amp; fitness survey</h1>
<div class="steps">{indicators}</div>
<div class="step-progress"><div class="step-progress-bar" style="width: {progress}%"></div></div>
<form id="survey-form" method="post" action="/survey" novalidate>
<input type="hidden" name="step" value="{step}" />
<input type="hidden" name="metrics_basis" value="{basis}" />
{steps}
</form>"#,
        progress = state.wizard.progress_percent(),
        step = state.wizard.step(),
        basis = escape(state.metrics_basis()),
    );
    render_page("Survey", alerts, &content)
}

const LAYOUT_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <style>
    :root {
      --ink: #1f2a30;
      --muted: #6b7a83;
      --accent: #2f8f6b;
      --danger: #c2413b;
      --card: #ffffff;
      --bg: #eef3f1;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
    }

    nav {
      display: flex;
      gap: 18px;
      padding: 14px 28px;
      background: var(--ink);
    }

    nav a {
      color: white;
      text-decoration: none;
    }

    .container {
      width: min(860px, 100%);
      margin: 28px auto;
      padding: 28px;
      background: var(--card);
      border-radius: 16px;
    }

    label {
      display: block;
      margin-top: 12px;
      font-size: 0.9rem;
      color: var(--muted);
    }

    input, select, textarea {
      width: 100%;
      padding: 8px 10px;
      border: 1px solid #c9d3d8;
      border-radius: 8px;
      font: inherit;
    }

    .error {
      border-color: var(--danger);
    }

    .error-message {
      color: var(--danger);
      font-size: 0.85rem;
      margin-top: 4px;
    }

    .hidden {
      display: none !important;
    }

    button, .button {
      display: inline-block;
      margin-top: 14px;
      padding: 9px 18px;
      border: none;
      border-radius: 999px;
      background: #dfe7e4;
      color: var(--ink);
      font: inherit;
      cursor: pointer;
      text-decoration: none;
    }

    .primary {
      background: var(--accent);
      color: white;
    }

    .link {
      background: none;
      padding: 4px 6px;
      color: var(--accent);
    }

    .danger {
      color: var(--danger);
    }

    .alert {
      padding: 12px 16px;
      border-radius: 10px;
      margin-bottom: 16px;
      animation: dismiss 5s forwards;
    }

    .alert-success {
      background: #dff3e8;
    }

    .alert-error {
      background: #f9e1df;
    }

    @keyframes dismiss {
      0%, 90% { opacity: 1; }
      100% { opacity: 0; visibility: hidden; height: 0; margin: 0; padding: 0; }
    }

    .steps {
      display: flex;
      justify-content: space-between;
    }

    .step-circle {
      width: 34px;
      height: 34px;
      border-radius: 50%;
      display: grid;
      place-items: center;
      background: #dfe7e4;
    }

    .step-circle.active {
      background: var(--accent);
      color: white;
    }

    .step-circle.complete {
      background: #9fd3bd;
    }

    .step-progress {
      height: 6px;
      margin: 12px 0 20px;
      background: #dfe7e4;
      border-radius: 999px;
    }

    .step-progress-bar {
      height: 100%;
      background: var(--accent);
      border-radius: 999px;
    }

    .repeatable {
      margin-top: 18px;
    }

    .entry {
      margin-top: 8px;
    }

    .details {
      margin-top: 6px;
    }

    table {
      width: 100%;
      border-collapse: collapse;
      margin-top: 18px;
    }

    th, td {
      text-align: left;
      padding: 10px 12px;
      border-bottom: 1px solid #e2e8ea;
    }

    .modal {
      position: fixed;
      inset: 0;
      display: grid;
      place-items: center;
      background: rgba(31, 42, 48, 0.45);
    }

    .modal form {
      width: min(420px, 92%);
      padding: 24px;
      background: var(--card);
      border-radius: 16px;
    }
  </style>
</head>
<body>
  <nav>
    <a href="/survey">Survey</a>
    <a href="/exercise-log">Exercise log</a>
    <a href="/change-password">Change password</a>
    <a href="/login">Log in</a>
  </nav>
  <main class="container">
    {{ALERTS}}
    {{CONTENT}}
  </main>
</body>
</html>
"#;
