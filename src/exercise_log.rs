use crate::api::ApiClient;
use crate::errors::ApiError;
use crate::models::{ExerciseDraft, ExerciseLogEntry};
use crate::storage::CredentialProvider;
use tracing::{info, warn};

pub const LIST_PATH: &str = "/api/exercise-logs";
pub const CREATE_PATH: &str = "/api/exercise-log";
pub const CSRF_HEADER: &str = "X-CSRFToken";

pub const LOG_FAILED_MESSAGE: &str = "Failed to log exercise. Please try again.";

#[derive(Clone, Debug)]
pub struct ExerciseLogClient {
    api: ApiClient,
}

impl ExerciseLogClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<ExerciseLogEntry>, ApiError> {
        self.api.send_json(self.api.get(LIST_PATH)).await
    }

    /// Posts a new entry and returns the backend's echo of it.
    pub async fn create(
        &self,
        credentials: &dyn CredentialProvider,
        entry: &ExerciseLogEntry,
    ) -> Result<ExerciseLogEntry, ApiError> {
        let csrf = credentials.csrf_token().unwrap_or_default();
        let request = self.api.post(CREATE_PATH).header(CSRF_HEADER, csrf).json(entry);

        match self.api.send_json::<ExerciseLogEntry>(request).await {
            Ok(created) => {
                info!(
                    exercise_type = created.exercise_type.as_str(),
                    duration = created.duration,
                    "exercise logged"
                );
                Ok(created)
            }
            Err(err) => {
                warn!("failed to log exercise: {err}");
                Err(err)
            }
        }
    }
}

/// Rows of the exercise-log table, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExerciseLogTable {
    rows: Vec<ExerciseLogEntry>,
}

impl ExerciseLogTable {
    /// Each entry is prepended in response order, so the last one ends up on top.
    pub fn from_entries(entries: impl IntoIterator<Item = ExerciseLogEntry>) -> Self {
        let mut table = Self::default();
        for entry in entries {
            table.prepend(entry);
        }
        table
    }

    pub fn prepend(&mut self, entry: ExerciseLogEntry) {
        self.rows.insert(0, entry);
    }

    /// Puts a freshly created entry on top unless the listing already has it.
    pub fn include_created(&mut self, entry: ExerciseLogEntry) {
        if !self.rows.contains(&entry) {
            self.prepend(entry);
        }
    }

    pub fn rows(&self) -> &[ExerciseLogEntry] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The "add exercise" modal. Input survives a failed submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryModal {
    pub open: bool,
    pub draft: ExerciseDraft,
}

impl EntryModal {
    pub fn closed() -> Self {
        Self::default()
    }

    pub fn reopened_with(draft: ExerciseDraft) -> Self {
        Self { open: true, draft }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExerciseType, Intensity};

    fn entry(date: &str) -> ExerciseLogEntry {
        ExerciseLogEntry {
            date: date.to_string(),
            exercise_type: ExerciseType::Strength,
            duration: 20.0,
            intensity: Intensity::Low,
        }
    }

    #[test]
    fn loading_prepends_in_response_order() {
        let table = ExerciseLogTable::from_entries(vec![
            entry("2024-12-01"),
            entry("2024-12-02"),
            entry("2024-12-03"),
        ]);
        let dates: Vec<&str> = table.rows().iter().map(|row| row.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-12-03", "2024-12-02", "2024-12-01"]);
    }

    #[test]
    fn new_entries_go_on_top() {
        let mut table = ExerciseLogTable::from_entries(vec![entry("2024-12-01")]);
        table.prepend(entry("2024-12-09"));
        assert_eq!(table.rows()[0].date, "2024-12-09");
        assert_eq!(table.rows().len(), 2);
    }

    #[test]
    fn created_entry_survives_a_stale_listing() {
        let mut table = ExerciseLogTable::from_entries(vec![entry("2024-12-01")]);
        table.include_created(entry("2024-12-09"));
        assert_eq!(table.rows()[0].date, "2024-12-09");

        table.include_created(entry("2024-12-01"));
        assert_eq!(table.rows().len(), 2);

        let mut empty = ExerciseLogTable::default();
        assert!(empty.is_empty());
        empty.include_created(entry("2024-12-09"));
        assert!(!empty.is_empty());
    }

    #[test]
    fn reopened_modal_keeps_draft() {
        let draft = ExerciseDraft {
            date: "2024-12-07".to_string(),
            duration: "abc".to_string(),
            ..ExerciseDraft::default()
        };
        let modal = EntryModal::reopened_with(draft.clone());
        assert!(modal.open);
        assert_eq!(modal.draft, draft);
        assert!(!EntryModal::closed().open);
    }
}
