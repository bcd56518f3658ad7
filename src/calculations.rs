use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl FromStr for Gender {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|gender| gender.as_str() == value)
            .ok_or(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
    ExtremelyActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
        ActivityLevel::ExtremelyActive,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::LightlyActive => "lightly_active",
            ActivityLevel::ModeratelyActive => "moderately_active",
            ActivityLevel::VeryActive => "very_active",
            ActivityLevel::ExtremelyActive => "extremely_active",
        }
    }

    /// Factor applied to BMR to estimate daily expenditure.
    pub fn energy_multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtremelyActive => 1.9,
        }
    }

    /// Factor applied to the base water recommendation.
    pub fn water_multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.0,
            ActivityLevel::LightlyActive => 1.1,
            ActivityLevel::ModeratelyActive => 1.2,
            ActivityLevel::VeryActive => 1.3,
            ActivityLevel::ExtremelyActive => 1.4,
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == value)
            .ok_or(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessGoal {
    WeightLoss,
    MuscleGain,
    Maintenance,
    GeneralFitness,
    AthleticPerformance,
}

impl FitnessGoal {
    pub const ALL: [FitnessGoal; 5] = [
        FitnessGoal::WeightLoss,
        FitnessGoal::MuscleGain,
        FitnessGoal::Maintenance,
        FitnessGoal::GeneralFitness,
        FitnessGoal::AthleticPerformance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FitnessGoal::WeightLoss => "weight_loss",
            FitnessGoal::MuscleGain => "muscle_gain",
            FitnessGoal::Maintenance => "maintenance",
            FitnessGoal::GeneralFitness => "general_fitness",
            FitnessGoal::AthleticPerformance => "athletic_performance",
        }
    }

    pub fn macro_ratios(self) -> MacroRatios {
        let (protein, fat, carbs) = match self {
            FitnessGoal::WeightLoss => (0.40, 0.35, 0.25),
            FitnessGoal::MuscleGain => (0.30, 0.20, 0.50),
            FitnessGoal::Maintenance => (0.30, 0.30, 0.40),
            FitnessGoal::GeneralFitness => (0.25, 0.25, 0.50),
            FitnessGoal::AthleticPerformance => (0.30, 0.20, 0.50),
        };
        MacroRatios { protein, fat, carbs }
    }
}

impl FromStr for FitnessGoal {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|goal| goal.as_str() == value)
            .ok_or(())
    }
}

/// Share of daily calories assigned to each macronutrient. Shares sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacroRatios {
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MacroGrams {
    pub protein: i64,
    pub carbs: i64,
    pub fat: i64,
}

pub const PROTEIN_KCAL_PER_GRAM: f64 = 4.0;
pub const CARBS_KCAL_PER_GRAM: f64 = 4.0;
pub const FAT_KCAL_PER_GRAM: f64 = 9.0;

const WATER_LITERS_PER_KG: f64 = 0.033;

pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    round_to_tenth(weight_kg / (height_m * height_m))
}

/// Mifflin-St Jeor basal metabolic rate.
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age: f64, gender: Gender) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age;
    match gender {
        Gender::Male => base + 5.0,
        _ => base - 161.0,
    }
}

pub fn calculate_tdee(
    weight_kg: f64,
    height_cm: f64,
    age: f64,
    gender: Gender,
    activity: ActivityLevel,
) -> i64 {
    round_half_up(calculate_bmr(weight_kg, height_cm, age, gender) * activity.energy_multiplier())
}

pub fn calculate_macros(calories: f64, goal: FitnessGoal) -> MacroGrams {
    let ratios = goal.macro_ratios();
    MacroGrams {
        protein: round_half_up(calories * ratios.protein / PROTEIN_KCAL_PER_GRAM),
        carbs: round_half_up(calories * ratios.carbs / CARBS_KCAL_PER_GRAM),
        fat: round_half_up(calories * ratios.fat / FAT_KCAL_PER_GRAM),
    }
}

pub fn calculate_water_goal(weight_kg: f64, activity: ActivityLevel) -> f64 {
    round_to_tenth(weight_kg * WATER_LITERS_PER_KG * activity.water_multiplier())
}

/// Calories implied by a macro split in grams.
pub fn macro_calories(protein_g: f64, carbs_g: f64, fat_g: f64) -> f64 {
    protein_g * PROTEIN_KCAL_PER_GRAM + carbs_g * CARBS_KCAL_PER_GRAM + fat_g * FAT_KCAL_PER_GRAM
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricInputs {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age: f64,
    pub gender: Gender,
    pub activity: ActivityLevel,
    pub goal: FitnessGoal,
}

impl MetricInputs {
    /// Builds inputs from raw form values; `None` unless every value is present and parses.
    pub fn parse(
        weight: &str,
        height: &str,
        age: &str,
        gender: &str,
        activity: &str,
        goal: &str,
    ) -> Option<Self> {
        let weight_kg = parse_positive(weight)?;
        let height_cm = parse_positive(height)?;
        let age = parse_positive(age)?.trunc();
        Some(Self {
            weight_kg,
            height_cm,
            age,
            gender: gender.trim().parse().ok()?,
            activity: activity.trim().parse().ok()?,
            goal: goal.trim().parse().ok()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedMetrics {
    pub bmi: f64,
    pub tdee: i64,
    pub macros: MacroGrams,
    pub water_liters: f64,
}

impl DerivedMetrics {
    pub fn compute(inputs: &MetricInputs) -> Self {
        let tdee = calculate_tdee(
            inputs.weight_kg,
            inputs.height_cm,
            inputs.age,
            inputs.gender,
            inputs.activity,
        );
        Self {
            bmi: calculate_bmi(inputs.weight_kg, inputs.height_cm),
            tdee,
            macros: calculate_macros(tdee as f64, inputs.goal),
            water_liters: calculate_water_goal(inputs.weight_kg, inputs.activity),
        }
    }
}

fn parse_positive(value: &str) -> Option<f64> {
    let number = value.trim().parse::<f64>().ok()?;
    (number.is_finite() && number > 0.0).then_some(number)
}

// Half-way cases round toward positive infinity, like browser rounding.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

fn round_to_tenth(value: f64) -> f64 {
    round_half_up(value * 10.0) as f64 / 10.0
}
