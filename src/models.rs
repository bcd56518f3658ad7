use crate::calculations::{ActivityLevel, FitnessGoal, Gender};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

#[derive(Debug, Serialize)]
pub struct LoginForm<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ChangePasswordRequest<'a> {
    pub current_password: &'a str,
    pub new_password: &'a str,
}

/// Error body returned by the backend. `detail` is usually a string but may be
/// a structured validation report.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub detail: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseType {
    Strength,
    Cardio,
    Flexibility,
    Hiit,
}

impl ExerciseType {
    pub const ALL: [ExerciseType; 4] = [
        ExerciseType::Strength,
        ExerciseType::Cardio,
        ExerciseType::Flexibility,
        ExerciseType::Hiit,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ExerciseType::Strength => "strength",
            ExerciseType::Cardio => "cardio",
            ExerciseType::Flexibility => "flexibility",
            ExerciseType::Hiit => "hiit",
        }
    }
}

impl FromStr for ExerciseType {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    Medium,
    High,
}

impl Intensity {
    pub const ALL: [Intensity; 3] = [Intensity::Low, Intensity::Medium, Intensity::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Intensity::Low => "low",
            Intensity::Medium => "medium",
            Intensity::High => "high",
        }
    }
}

impl FromStr for Intensity {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == value)
            .ok_or(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseLogEntry {
    pub date: String,
    pub exercise_type: ExerciseType,
    /// Minutes.
    pub duration: f64,
    pub intensity: Intensity,
}

impl ExerciseLogEntry {
    /// Date as shown in the log table; falls back to the raw value.
    pub fn display_date(&self) -> String {
        let raw = self.date.trim();
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|value| value.date())
            })
            .or_else(|| {
                chrono::DateTime::parse_from_rfc3339(raw)
                    .ok()
                    .map(|value| value.date_naive())
            });
        match date {
            Some(date) => date.format("%m/%d/%Y").to_string(),
            None => raw.to_string(),
        }
    }

    pub fn display_duration(&self) -> String {
        format!("{} mins", self.duration)
    }
}

/// Raw values typed into the "add exercise" modal.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExerciseDraft {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub exercise_type: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub intensity: String,
}

impl ExerciseDraft {
    pub fn to_entry(&self) -> Result<ExerciseLogEntry, String> {
        let date = self.date.trim();
        NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| "Please enter a valid date")?;
        let duration = self
            .duration
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|minutes| minutes.is_finite() && *minutes > 0.0)
            .ok_or("Please enter a valid duration")?;

        Ok(ExerciseLogEntry {
            date: date.to_string(),
            exercise_type: self
                .exercise_type
                .trim()
                .parse()
                .map_err(|_| "Please choose an exercise type")?,
            duration,
            intensity: self
                .intensity
                .trim()
                .parse()
                .map_err(|_| "Please choose an intensity")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveySubmission {
    pub age: u32,
    pub gender: Gender,
    pub height: f64,
    pub weight: f64,
    pub target_weight: f64,
    pub medical_conditions: Vec<String>,
    pub medications: Vec<String>,
    pub allergies: Vec<String>,
    pub past_injuries: Vec<String>,
    pub fitness_goal: FitnessGoal,
    pub activity_level: ActivityLevel,
    pub time_preference: String,
    pub exercise_types: Vec<String>,
    pub preferred_sports: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercise_notes: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub other_details: BTreeMap<String, Vec<String>>,
    pub daily_calorie_goal: u32,
    pub protein_goal: u32,
    pub carbs_goal: u32,
    pub fat_goal: u32,
    pub water_goal: f64,
    pub sleep_hours: f64,
    pub stress_level: u8,
    pub meal_frequency: u8,
}

#[derive(Debug, Deserialize)]
pub struct LoginFormInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterFormInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordFormInput {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct ExerciseLogQuery {
    pub modal: Option<String>,
}
