use crate::calculations::{DerivedMetrics, MetricInputs};
use crate::models::SurveySubmission;
use crate::sections::{self, RepeatableSection, SectionKind};
use crate::validation::{check_macro_ratios, number_or_zero, FieldErrors};
use crate::wizard::{WizardState, NUTRITION_STEP, TOTAL_STEPS};
use std::collections::BTreeMap;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Number { step: &'static str },
    Select(&'static [(&'static str, &'static str)]),
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: InputKind,
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSpec {
    pub number: u8,
    pub title: &'static str,
    pub fields: &'static [FieldSpec],
    pub sections: &'static [SectionKind],
}

const fn number(id: &'static str, label: &'static str, step: &'static str) -> FieldSpec {
    FieldSpec {
        id,
        label,
        kind: InputKind::Number { step },
        required: true,
    }
}

const fn select(
    id: &'static str,
    label: &'static str,
    options: &'static [(&'static str, &'static str)],
) -> FieldSpec {
    FieldSpec {
        id,
        label,
        kind: InputKind::Select(options),
        required: true,
    }
}

const GENDER_OPTIONS: &[(&str, &str)] = &[("male", "Male"), ("female", "Female"), ("other", "Other")];

const GOAL_OPTIONS: &[(&str, &str)] = &[
    ("weight_loss", "Weight loss"),
    ("muscle_gain", "Muscle gain"),
    ("maintenance", "Maintenance"),
    ("general_fitness", "General fitness"),
    ("athletic_performance", "Athletic performance"),
];

const ACTIVITY_OPTIONS: &[(&str, &str)] = &[
    ("sedentary", "Sedentary"),
    ("lightly_active", "Lightly active"),
    ("moderately_active", "Moderately active"),
    ("very_active", "Very active"),
    ("extremely_active", "Extremely active"),
];

const TIME_OPTIONS: &[(&str, &str)] = &[
    ("morning", "Morning"),
    ("afternoon", "Afternoon"),
    ("evening", "Evening"),
    ("flexible", "Flexible"),
];

pub const STEPS: [StepSpec; TOTAL_STEPS as usize] = [
    StepSpec {
        number: 1,
        title: "Basic Information",
        fields: &[
            number("age", "Age", "1"),
            select("gender", "Gender", GENDER_OPTIONS),
            number("height", "Height (cm)", "0.1"),
            number("weight", "Weight (kg)", "0.1"),
            number("target_weight", "Target weight (kg)", "0.1"),
        ],
        sections: &[],
    },
    StepSpec {
        number: 2,
        title: "Medical Information",
        fields: &[],
        sections: &[
            sections::MEDICAL_CONDITIONS,
            sections::MEDICATIONS,
            sections::ALLERGIES,
            sections::PAST_INJURIES,
        ],
    },
    StepSpec {
        number: 3,
        title: "Activity",
        fields: &[
            select("fitness_goal", "Fitness goal", GOAL_OPTIONS),
            select("activity_level", "Activity level", ACTIVITY_OPTIONS),
            select("time_preference", "Preferred workout time", TIME_OPTIONS),
            FieldSpec {
                id: "exercise_notes",
                label: "Notes",
                kind: InputKind::Text,
                required: false,
            },
        ],
        sections: &[sections::EXERCISE_TYPES, sections::PREFERRED_SPORTS],
    },
    StepSpec {
        number: NUTRITION_STEP,
        title: "Nutrition Goals",
        fields: &[
            number("daily_calorie_goal", "Daily calories", "1"),
            number("protein_goal", "Protein (g)", "1"),
            number("carbs_goal", "Carbs (g)", "1"),
            number("fat_goal", "Fat (g)", "1"),
            number("water_goal", "Water (L)", "0.1"),
        ],
        sections: &[],
    },
    StepSpec {
        number: 5,
        title: "Lifestyle",
        fields: &[
            number("sleep_hours", "Sleep (hours)", "0.5"),
            number("stress_level", "Stress level (1-5)", "1"),
            number("meal_frequency", "Meals per day", "1"),
        ],
        sections: &[],
    },
];

pub fn step_spec(step: u8) -> &'static StepSpec {
    let index = usize::from(step.clamp(1, TOTAL_STEPS) - 1);
    &STEPS[index]
}

pub fn field_spec(id: &str) -> Option<&'static FieldSpec> {
    STEPS
        .iter()
        .flat_map(|step| step.fields.iter())
        .find(|field| field.id == id)
}

pub fn detail_field_id(container_id: &str, index: usize) -> String {
    format!("{container_id}.{index}.detail")
}

pub fn entry_field_id(container_id: &str, index: usize) -> String {
    format!("{container_id}.{index}")
}

/// Fields whose change triggers a recomputation of the nutrition targets.
const METRIC_FIELDS: [&str; 6] = [
    "weight",
    "height",
    "age",
    "gender",
    "activity_level",
    "fitness_goal",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurveyAction {
    Next,
    Previous,
    Refresh,
    Submit,
    AddItem(String),
    RemoveItem(String, usize),
}

impl FromStr for SurveyAction {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("unknown survey action '{value}'");
        match value {
            "next" => return Ok(SurveyAction::Next),
            "previous" => return Ok(SurveyAction::Previous),
            "refresh" => return Ok(SurveyAction::Refresh),
            "submit" => return Ok(SurveyAction::Submit),
            _ => {}
        }

        if let Some(container) = value.strip_prefix("add:") {
            sections::section_kind(container).ok_or_else(invalid)?;
            return Ok(SurveyAction::AddItem(container.to_string()));
        }

        if let Some(rest) = value.strip_prefix("remove:") {
            let (container, index) = rest.rsplit_once(':').ok_or_else(invalid)?;
            sections::section_kind(container).ok_or_else(invalid)?;
            let index = index.parse().map_err(|_| invalid())?;
            return Ok(SurveyAction::RemoveItem(container.to_string(), index));
        }

        Err(invalid())
    }
}

/// Full state of the survey page; rebuilt from every form post.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyState {
    pub wizard: WizardState,
    pub errors: FieldErrors,
    values: BTreeMap<&'static str, String>,
    sections: Vec<RepeatableSection>,
    metrics_basis: String,
    metrics: Option<DerivedMetrics>,
}

impl Default for SurveyState {
    fn default() -> Self {
        Self {
            wizard: WizardState::default(),
            errors: FieldErrors::default(),
            values: BTreeMap::new(),
            sections: sections::ALL_SECTIONS
                .into_iter()
                .map(RepeatableSection::new)
                .collect(),
            metrics_basis: String::new(),
            metrics: None,
        }
    }
}

impl SurveyState {
    pub fn from_form(pairs: &[(String, String)]) -> Self {
        let mut state = Self::default();
        let mut submitted: BTreeMap<&str, BTreeMap<usize, (String, String)>> = BTreeMap::new();

        for (key, value) in pairs {
            match key.as_str() {
                "step" => {
                    if let Ok(step) = value.trim().parse::<u8>() {
                        state.wizard = WizardState::go_to_step(step);
                    }
                }
                "metrics_basis" => state.metrics_basis = value.clone(),
                _ => {
                    if let Some(field) = field_spec(key) {
                        state.values.insert(field.id, value.clone());
                    } else if let Some((container, index, is_detail)) = parse_entry_key(key) {
                        let entry = submitted
                            .entry(container.container_id)
                            .or_default()
                            .entry(index)
                            .or_default();
                        if is_detail {
                            entry.1 = value.clone();
                        } else {
                            entry.0 = value.clone();
                        }
                    }
                }
            }
        }

        for section in &mut state.sections {
            if let Some(entries) = submitted.get(section.kind().container_id) {
                let entries: Vec<(String, String)> = entries.values().cloned().collect();
                *section = RepeatableSection::from_submitted(section.kind(), &entries);
            }
        }

        state.refresh_metrics();
        state
    }

    pub fn value(&self, id: &str) -> &str {
        self.values.get(id).map(String::as_str).unwrap_or("")
    }

    pub fn set_value(&mut self, id: &str, value: impl Into<String>) {
        if let Some(field) = field_spec(id) {
            self.values.insert(field.id, value.into());
        }
    }

    pub fn sections(&self) -> &[RepeatableSection] {
        &self.sections
    }

    pub fn section(&self, container_id: &str) -> Option<&RepeatableSection> {
        self.sections
            .iter()
            .find(|section| section.kind().container_id == container_id)
    }

    pub fn section_mut(&mut self, container_id: &str) -> Option<&mut RepeatableSection> {
        self.sections
            .iter_mut()
            .find(|section| section.kind().container_id == container_id)
    }

    pub fn metrics(&self) -> Option<&DerivedMetrics> {
        self.metrics.as_ref()
    }

    pub fn metrics_basis(&self) -> &str {
        &self.metrics_basis
    }

    /// Recomputes BMI and, when a metric input changed, overwrites the nutrition targets.
    pub fn refresh_metrics(&mut self) {
        let inputs = MetricInputs::parse(
            self.value("weight"),
            self.value("height"),
            self.value("age"),
            self.value("gender"),
            self.value("activity_level"),
            self.value("fitness_goal"),
        );
        let Some(inputs) = inputs else {
            self.metrics = None;
            return;
        };

        let metrics = DerivedMetrics::compute(&inputs);
        let basis = METRIC_FIELDS
            .iter()
            .map(|id| self.value(id).trim())
            .collect::<Vec<_>>()
            .join("|");

        if basis != self.metrics_basis {
            self.set_value("daily_calorie_goal", metrics.tdee.to_string());
            self.set_value("protein_goal", metrics.macros.protein.to_string());
            self.set_value("carbs_goal", metrics.macros.carbs.to_string());
            self.set_value("fat_goal", metrics.macros.fat.to_string());
            self.set_value("water_goal", metrics.water_liters.to_string());
            self.metrics_basis = basis;
        }
        self.metrics = Some(metrics);
    }

    /// Validates every required input of `step`, replacing earlier inline errors.
    pub fn validate_step(&mut self, step: u8) -> bool {
        self.errors.clear();
        let spec = step_spec(step);
        let mut valid = true;

        for field in spec.fields.iter().filter(|field| field.required) {
            let value = self.value(field.id).to_string();
            if !self.errors.check(field.id, &value, true) {
                valid = false;
            }
        }

        for kind in spec.sections {
            let Some(section) = self.section(kind.container_id) else {
                continue;
            };
            let required: Vec<(String, String)> = (0..section.entries().len())
                .filter(|index| section.detail_required(*index))
                .map(|index| {
                    (
                        detail_field_id(kind.container_id, index),
                        section.entries()[index].detail.clone(),
                    )
                })
                .collect();
            for (id, detail) in required {
                if !self.errors.check(&id, &detail, true) {
                    valid = false;
                }
            }
        }

        if step == NUTRITION_STEP && valid {
            valid = self.check_macros();
        }

        valid
    }

    fn check_macros(&mut self) -> bool {
        let result = check_macro_ratios(
            number_or_zero(self.value("protein_goal")),
            number_or_zero(self.value("carbs_goal")),
            number_or_zero(self.value("fat_goal")),
            number_or_zero(self.value("daily_calorie_goal")),
        );
        match result {
            Ok(()) => true,
            Err(mismatch) => {
                self.errors.attach("protein_goal", mismatch.message());
                false
            }
        }
    }

    /// Applies a navigation or section action. `Submit` validates all steps and
    /// jumps back to the first invalid one; the caller sends the submission
    /// when this returns `true`.
    pub fn apply(&mut self, action: &SurveyAction) -> bool {
        match action {
            SurveyAction::Next => {
                let current = self.wizard;
                let next = current.advance(|step| self.validate_step(step));
                self.wizard = next;
                next != current
            }
            SurveyAction::Previous => {
                self.errors.clear();
                self.wizard = self.wizard.retreat();
                true
            }
            SurveyAction::Refresh => true,
            SurveyAction::Submit => {
                if !self.wizard.is_last() {
                    return false;
                }
                // The posted step is client-supplied; every step is checked again.
                match (1..=TOTAL_STEPS).find(|step| !self.validate_step(*step)) {
                    Some(failing) => {
                        self.wizard = WizardState::go_to_step(failing);
                        false
                    }
                    None => true,
                }
            }
            SurveyAction::AddItem(container) => self
                .section_mut(container)
                .is_some_and(RepeatableSection::add_item),
            SurveyAction::RemoveItem(container, index) => self
                .section_mut(container)
                .is_some_and(|section| section.remove_item(*index)),
        }
    }

    pub fn to_submission(&self) -> Result<SurveySubmission, String> {
        let list = |id: &str| {
            self.section(id)
                .map(RepeatableSection::selected_values)
                .unwrap_or_default()
        };
        let other_details = self
            .sections
            .iter()
            .map(|section| (section.kind().container_id.to_string(), section.other_details()))
            .filter(|(_, details)| !details.is_empty())
            .collect();
        let notes = self.value("exercise_notes").trim();

        Ok(SurveySubmission {
            age: self.whole("age")?,
            gender: self.parsed("gender")?,
            height: self.decimal("height")?,
            weight: self.decimal("weight")?,
            target_weight: self.decimal("target_weight")?,
            medical_conditions: list(sections::MEDICAL_CONDITIONS.container_id),
            medications: list(sections::MEDICATIONS.container_id),
            allergies: list(sections::ALLERGIES.container_id),
            past_injuries: list(sections::PAST_INJURIES.container_id),
            fitness_goal: self.parsed("fitness_goal")?,
            activity_level: self.parsed("activity_level")?,
            time_preference: self.choice("time_preference")?,
            exercise_types: list(sections::EXERCISE_TYPES.container_id),
            preferred_sports: list(sections::PREFERRED_SPORTS.container_id),
            exercise_notes: (!notes.is_empty()).then(|| notes.to_string()),
            other_details,
            daily_calorie_goal: self.whole("daily_calorie_goal")?,
            protein_goal: self.whole("protein_goal")?,
            carbs_goal: self.whole("carbs_goal")?,
            fat_goal: self.whole("fat_goal")?,
            water_goal: self.decimal("water_goal")?,
            sleep_hours: self.decimal("sleep_hours")?,
            stress_level: self.whole("stress_level")?,
            meal_frequency: self.whole("meal_frequency")?,
        })
    }

    fn invalid(&self, id: &str) -> String {
        let label = field_spec(id).map(|field| field.label).unwrap_or(id);
        format!("Please review the value for {label}")
    }

    fn decimal(&self, id: &str) -> Result<f64, String> {
        self.value(id)
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| self.invalid(id))
    }

    fn whole<T: TryFrom<i64>>(&self, id: &str) -> Result<T, String> {
        let value = self.decimal(id)?;
        T::try_from(value.round() as i64).map_err(|_| self.invalid(id))
    }

    fn parsed<T: FromStr>(&self, id: &str) -> Result<T, String> {
        self.value(id).trim().parse().map_err(|_| self.invalid(id))
    }

    fn choice(&self, id: &str) -> Result<String, String> {
        let value = self.value(id).trim();
        match field_spec(id).map(|field| field.kind) {
            Some(InputKind::Select(options)) if options.iter().any(|(key, _)| *key == value) => {
                Ok(value.to_string())
            }
            _ => Err(self.invalid(id)),
        }
    }
}

fn parse_entry_key(key: &str) -> Option<(SectionKind, usize, bool)> {
    let (container, rest) = key.split_once('.')?;
    let kind = sections::section_kind(container)?;
    match rest.split_once('.') {
        Some((index, "detail")) => Some((kind, index.parse().ok()?, true)),
        Some(_) => None,
        None => Some((kind, rest.parse().ok()?, false)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{ActivityLevel, FitnessGoal, Gender};
    use crate::validation::REQUIRED_MESSAGE;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    fn basic_info() -> Vec<(&'static str, &'static str)> {
        vec![
            ("age", "30"),
            ("gender", "male"),
            ("height", "175"),
            ("weight", "70"),
            ("target_weight", "68"),
        ]
    }

    fn complete_survey() -> Vec<(&'static str, &'static str)> {
        let mut items = basic_info();
        items.extend([
            ("medical_conditions.0", "NONE"),
            ("fitness_goal", "maintenance"),
            ("activity_level", "sedentary"),
            ("time_preference", "morning"),
            ("exercise_types.0", "CARDIO"),
            ("exercise_types.1", "OTHER"),
            ("exercise_types.1.detail", "climbing"),
            ("preferred_sports.0", "RUNNING"),
            ("sleep_hours", "8"),
            ("stress_level", "2"),
            ("meal_frequency", "3"),
        ]);
        items
    }

    #[test]
    fn next_is_blocked_by_missing_fields() {
        let mut state = SurveyState::from_form(&pairs(&[("step", "1"), ("age", "30")]));
        assert!(!state.apply(&SurveyAction::Next));
        assert_eq!(state.wizard.step(), 1);
        assert_eq!(state.errors.get("gender"), Some(REQUIRED_MESSAGE));
        assert_eq!(state.errors.get("age"), None);
    }

    #[test]
    fn next_moves_forward_once_step_is_valid() {
        let mut items = basic_info();
        items.push(("step", "1"));
        let mut state = SurveyState::from_form(&pairs(&items));
        assert!(state.apply(&SurveyAction::Next));
        assert_eq!(state.wizard.step(), 2);
        assert!(state.errors.is_empty());
    }

    #[test]
    fn previous_clears_errors() {
        let mut state = SurveyState::from_form(&pairs(&[("step", "3")]));
        assert!(!state.apply(&SurveyAction::Next));
        assert!(!state.errors.is_empty());
        state.apply(&SurveyAction::Previous);
        assert_eq!(state.wizard.step(), 2);
        assert!(state.errors.is_empty());
    }

    #[test]
    fn other_exercise_type_requires_detail() {
        let mut state = SurveyState::from_form(&pairs(&[
            ("step", "3"),
            ("fitness_goal", "maintenance"),
            ("activity_level", "sedentary"),
            ("time_preference", "evening"),
            ("exercise_types.0", "OTHER"),
        ]));
        assert!(!state.apply(&SurveyAction::Next));
        assert_eq!(state.errors.get("exercise_types.0.detail"), Some(REQUIRED_MESSAGE));
    }

    #[test]
    fn metrics_fill_nutrition_targets() {
        let mut items = basic_info();
        items.extend([("fitness_goal", "maintenance"), ("activity_level", "sedentary")]);
        let state = SurveyState::from_form(&pairs(&items));
        let metrics = state.metrics().expect("metrics computed");
        assert_eq!(metrics.bmi, 22.9);
        assert_eq!(state.value("daily_calorie_goal"), metrics.tdee.to_string());
        assert_eq!(state.value("protein_goal"), metrics.macros.protein.to_string());
        assert_eq!(state.value("water_goal"), "2.3");
        assert!(!state.metrics_basis().is_empty());
    }

    #[test]
    fn metrics_stay_unset_until_inputs_complete() {
        let state = SurveyState::from_form(&pairs(&basic_info()));
        assert!(state.metrics().is_none());
        assert_eq!(state.value("daily_calorie_goal"), "");
    }

    #[test]
    fn unchanged_inputs_keep_manual_targets() {
        let mut items = basic_info();
        items.extend([("fitness_goal", "maintenance"), ("activity_level", "sedentary")]);
        let first = SurveyState::from_form(&pairs(&items));

        let basis = first.metrics_basis().to_string();
        let mut resubmitted = pairs(&items);
        resubmitted.push(("metrics_basis".to_string(), basis));
        resubmitted.push(("protein_goal".to_string(), "180".to_string()));
        let second = SurveyState::from_form(&resubmitted);
        assert_eq!(second.value("protein_goal"), "180");
    }

    #[test]
    fn nutrition_step_checks_macro_calories() {
        let mut state = SurveyState::from_form(&pairs(&[
            ("step", "4"),
            ("daily_calorie_goal", "2000"),
            ("protein_goal", "50"),
            ("carbs_goal", "50"),
            ("fat_goal", "10"),
            ("water_goal", "2"),
        ]));
        assert!(!state.apply(&SurveyAction::Next));
        assert_eq!(state.wizard.step(), 4);
        let message = state.errors.get("protein_goal").unwrap();
        assert!(message.starts_with("Total calories from macros (490)"));
    }

    #[test]
    fn section_actions_parse_and_apply() {
        let mut state = SurveyState::default();
        let add: SurveyAction = "add:allergies".parse().unwrap();
        assert!(state.apply(&add));
        assert_eq!(state.section("allergies").unwrap().entries().len(), 2);

        let remove: SurveyAction = "remove:allergies:1".parse().unwrap();
        assert!(state.apply(&remove));
        assert_eq!(state.section("allergies").unwrap().entries().len(), 1);

        assert!("add:unknown".parse::<SurveyAction>().is_err());
        assert!("remove:allergies:x".parse::<SurveyAction>().is_err());
        assert!("jump".parse::<SurveyAction>().is_err());
    }

    #[test]
    fn submit_builds_typed_payload() {
        let mut items = complete_survey();
        items.push(("step", "5"));
        let mut state = SurveyState::from_form(&pairs(&items));
        assert!(state.apply(&SurveyAction::Submit));

        let submission = state.to_submission().unwrap();
        assert_eq!(submission.age, 30);
        assert_eq!(submission.gender, Gender::Male);
        assert_eq!(submission.fitness_goal, FitnessGoal::Maintenance);
        assert_eq!(submission.activity_level, ActivityLevel::Sedentary);
        assert!(submission.medical_conditions.is_empty());
        assert_eq!(submission.exercise_types, vec!["CARDIO", "OTHER"]);
        assert_eq!(
            submission.other_details.get("exercise_types"),
            Some(&vec!["climbing".to_string()])
        );
        assert_eq!(submission.daily_calorie_goal, 1979);
        assert_eq!(submission.meal_frequency, 3);
    }

    #[test]
    fn submit_rechecks_earlier_steps() {
        let mut items: Vec<_> = complete_survey()
            .into_iter()
            .filter(|(key, _)| *key != "age")
            .collect();
        items.extend([("step", "5"), ("age", "5")]);
        let mut state = SurveyState::from_form(&pairs(&items));

        assert!(!state.apply(&SurveyAction::Submit));
        assert_eq!(state.wizard.step(), 1);
        assert_eq!(state.errors.get("age"), Some("Value must be at least 13"));
    }

    #[test]
    fn submit_rechecks_macro_reconciliation() {
        let mut items = complete_survey();
        items.extend([
            ("step", "5"),
            ("metrics_basis", "70|175|30|male|sedentary|maintenance"),
            ("daily_calorie_goal", "1979"),
            ("protein_goal", "160"),
            ("carbs_goal", "300"),
            ("fat_goal", "80"),
            ("water_goal", "2.3"),
        ]);
        let mut state = SurveyState::from_form(&pairs(&items));

        assert_eq!(state.value("protein_goal"), "160");
        assert!(!state.apply(&SurveyAction::Submit));
        assert_eq!(state.wizard.step(), NUTRITION_STEP);
        assert!(state.errors.get("protein_goal").is_some());
    }

    #[test]
    fn submit_is_refused_before_last_step() {
        let mut items = complete_survey();
        items.push(("step", "2"));
        let mut state = SurveyState::from_form(&pairs(&items));
        assert!(!state.apply(&SurveyAction::Submit));
    }
}
