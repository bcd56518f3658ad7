use crate::calculations::macro_calories;
use std::collections::BTreeMap;

/// Numeric bounds for a form field. Both ends are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationRule {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ValidationRule {
    const fn range(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    fn is_numeric(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }
}

const RULES: &[(&str, ValidationRule)] = &[
    ("age", ValidationRule::range(13.0, 120.0)),
    ("height", ValidationRule::range(100.0, 250.0)),
    ("weight", ValidationRule::range(30.0, 300.0)),
    ("target_weight", ValidationRule::range(30.0, 300.0)),
    ("daily_calorie_goal", ValidationRule::range(1200.0, 8000.0)),
    ("protein_goal", ValidationRule::range(0.0, 400.0)),
    ("carbs_goal", ValidationRule::range(0.0, 600.0)),
    ("fat_goal", ValidationRule::range(0.0, 200.0)),
    ("water_goal", ValidationRule::range(1.0, 10.0)),
    ("sleep_hours", ValidationRule::range(4.0, 12.0)),
    ("stress_level", ValidationRule::range(1.0, 5.0)),
    ("meal_frequency", ValidationRule::range(2.0, 8.0)),
];

pub fn rule_for(field_id: &str) -> Option<ValidationRule> {
    RULES
        .iter()
        .find(|(id, _)| *id == field_id)
        .map(|(_, rule)| *rule)
}

pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const NOT_A_NUMBER_MESSAGE: &str = "Please enter a valid number";

pub fn validate_field(
    value: &str,
    required: bool,
    rule: Option<&ValidationRule>,
) -> Result<(), String> {
    let value = value.trim();
    if required && value.is_empty() {
        return Err(REQUIRED_MESSAGE.to_string());
    }

    let Some(rule) = rule.filter(|rule| rule.is_numeric()) else {
        return Ok(());
    };

    let number = match value.parse::<f64>() {
        Ok(number) if number.is_finite() => number,
        _ => return Err(NOT_A_NUMBER_MESSAGE.to_string()),
    };

    if let Some(min) = rule.min {
        if number < min {
            return Err(format!("Value must be at least {min}"));
        }
    }
    if let Some(max) = rule.max {
        if number > max {
            return Err(format!("Value must be no more than {max}"));
        }
    }

    Ok(())
}

/// Inline error messages keyed by field id, at most one per field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors {
    errors: BTreeMap<String, String>,
}

impl FieldErrors {
    /// Replaces any previous error on the field.
    pub fn attach(&mut self, field_id: &str, message: impl Into<String>) {
        self.errors.insert(field_id.to_string(), message.into());
    }

    pub fn clear_field(&mut self, field_id: &str) {
        self.errors.remove(field_id);
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    pub fn get(&self, field_id: &str) -> Option<&str> {
        self.errors.get(field_id).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Validates one field, clearing its previous error first.
    pub fn check(&mut self, field_id: &str, value: &str, required: bool) -> bool {
        self.clear_field(field_id);
        match validate_field(value, required, rule_for(field_id).as_ref()) {
            Ok(()) => true,
            Err(message) => {
                self.attach(field_id, message);
                false
            }
        }
    }
}

pub const MACRO_MARGIN: f64 = 0.10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacroMismatch {
    pub calories: f64,
    pub target: f64,
}

impl MacroMismatch {
    pub fn message(&self) -> String {
        format!(
            "Total calories from macros ({:.0}) should be close to your daily goal ({})",
            self.calories, self.target
        )
    }
}

pub fn check_macro_ratios(
    protein_g: f64,
    carbs_g: f64,
    fat_g: f64,
    target_calories: f64,
) -> Result<(), MacroMismatch> {
    let calories = macro_calories(protein_g, carbs_g, fat_g);
    if (calories - target_calories).abs() > target_calories * MACRO_MARGIN {
        return Err(MacroMismatch {
            calories,
            target: target_calories,
        });
    }
    Ok(())
}

/// Lenient parse for the macro check: anything unreadable counts as zero.
pub fn number_or_zero(value: &str) -> f64 {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .unwrap_or(0.0)
}
