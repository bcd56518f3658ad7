//! Repeatable form sub-sections ("add another" lists).
//!
//! Every section starts with one template entry. Further entries are clones
//! with a remove control. `NONE` can be configured as an exclusive choice and
//! `OTHER` reveals a free-text detail input.

pub const NONE_VALUE: &str = "NONE";
pub const OTHER_VALUE: &str = "OTHER";

/// Static description of one repeatable section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionKind {
    pub container_id: &'static str,
    pub detail_panel_id: &'static str,
    pub label: &'static str,
    pub options: &'static [(&'static str, &'static str)],
    /// `NONE` removes the other entries and hides the add control.
    pub exclusive_none: bool,
    /// The `OTHER` detail input must be filled in before the step can advance.
    pub other_detail_required: bool,
}

pub const MEDICAL_CONDITIONS: SectionKind = SectionKind {
    container_id: "medical_conditions",
    detail_panel_id: "condition-details",
    label: "Medical condition",
    options: &[
        ("NONE", "None"),
        ("DIABETES", "Diabetes"),
        ("HYPERTENSION", "Hypertension"),
        ("ASTHMA", "Asthma"),
        ("HEART_DISEASE", "Heart disease"),
        ("ARTHRITIS", "Arthritis"),
        ("OTHER", "Other"),
    ],
    exclusive_none: true,
    other_detail_required: false,
};

pub const MEDICATIONS: SectionKind = SectionKind {
    container_id: "medications",
    detail_panel_id: "medication-details",
    label: "Medication",
    options: &[
        ("NONE", "None"),
        ("BLOOD_PRESSURE", "Blood pressure medication"),
        ("INSULIN", "Insulin"),
        ("ANTIDEPRESSANTS", "Antidepressants"),
        ("PAIN_RELIEVERS", "Pain relievers"),
        ("OTHER", "Other"),
    ],
    exclusive_none: true,
    other_detail_required: false,
};

pub const ALLERGIES: SectionKind = SectionKind {
    container_id: "allergies",
    detail_panel_id: "allergy-details",
    label: "Allergy",
    options: &[
        ("NONE", "None"),
        ("PEANUTS", "Peanuts"),
        ("DAIRY", "Dairy"),
        ("GLUTEN", "Gluten"),
        ("SHELLFISH", "Shellfish"),
        ("OTHER", "Other"),
    ],
    exclusive_none: true,
    other_detail_required: false,
};

pub const PAST_INJURIES: SectionKind = SectionKind {
    container_id: "past_injuries",
    detail_panel_id: "injury-details",
    label: "Past injury",
    options: &[
        ("NONE", "None"),
        ("KNEE", "Knee"),
        ("BACK", "Back"),
        ("SHOULDER", "Shoulder"),
        ("ANKLE", "Ankle"),
        ("OTHER", "Other"),
    ],
    exclusive_none: true,
    other_detail_required: false,
};

pub const EXERCISE_TYPES: SectionKind = SectionKind {
    container_id: "exercise_types",
    detail_panel_id: "exercise-type-details",
    label: "Exercise type",
    options: &[
        ("CARDIO", "Cardio"),
        ("STRENGTH", "Strength training"),
        ("FLEXIBILITY", "Flexibility"),
        ("HIIT", "HIIT"),
        ("OTHER", "Other"),
    ],
    exclusive_none: false,
    other_detail_required: true,
};

pub const PREFERRED_SPORTS: SectionKind = SectionKind {
    container_id: "preferred_sports",
    detail_panel_id: "sport-details",
    label: "Preferred sport",
    options: &[
        ("RUNNING", "Running"),
        ("CYCLING", "Cycling"),
        ("SWIMMING", "Swimming"),
        ("TENNIS", "Tennis"),
        ("BASKETBALL", "Basketball"),
        ("OTHER", "Other"),
    ],
    exclusive_none: false,
    other_detail_required: true,
};

pub const ALL_SECTIONS: [SectionKind; 6] = [
    MEDICAL_CONDITIONS,
    MEDICATIONS,
    ALLERGIES,
    PAST_INJURIES,
    EXERCISE_TYPES,
    PREFERRED_SPORTS,
];

pub fn section_kind(container_id: &str) -> Option<SectionKind> {
    ALL_SECTIONS
        .into_iter()
        .find(|kind| kind.container_id == container_id)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionEntry {
    pub value: String,
    pub detail: String,
}

impl SectionEntry {
    pub fn detail_visible(&self) -> bool {
        self.value == OTHER_VALUE
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatableSection {
    kind: SectionKind,
    entries: Vec<SectionEntry>,
    add_hidden: bool,
}

impl RepeatableSection {
    pub fn new(kind: SectionKind) -> Self {
        Self {
            kind,
            entries: vec![SectionEntry::default()],
            add_hidden: false,
        }
    }

    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    pub fn entries(&self) -> &[SectionEntry] {
        &self.entries
    }

    pub fn add_control_visible(&self) -> bool {
        !self.add_hidden
    }

    /// Only clones carry a remove control; the template entry stays.
    pub fn has_remove_control(&self, index: usize) -> bool {
        index > 0 && index < self.entries.len()
    }

    pub fn detail_visible(&self, index: usize) -> bool {
        self.entries
            .get(index)
            .is_some_and(SectionEntry::detail_visible)
    }

    pub fn detail_required(&self, index: usize) -> bool {
        self.kind.other_detail_required && self.detail_visible(index)
    }

    /// Appends a reset clone of the template entry. Returns `false` when refused.
    pub fn add_item(&mut self) -> bool {
        let first_is_none = self
            .entries
            .first()
            .is_some_and(|entry| entry.value == NONE_VALUE);
        if self.add_hidden || (self.kind.exclusive_none && first_is_none) {
            return false;
        }
        self.entries.push(SectionEntry::default());
        true
    }

    pub fn remove_item(&mut self, index: usize) -> bool {
        if !self.has_remove_control(index) {
            return false;
        }
        self.entries.remove(index);
        true
    }

    pub fn select(&mut self, index: usize, value: &str) {
        let Some(entry) = self.entries.get_mut(index) else {
            return;
        };
        entry.value = value.to_string();
        if !entry.detail_visible() {
            entry.detail.clear();
        }

        if self.kind.exclusive_none && value == NONE_VALUE {
            self.add_hidden = true;
            self.entries.truncate(1);
        } else {
            self.add_hidden = false;
        }
    }

    pub fn set_detail(&mut self, index: usize, detail: &str) {
        if let Some(entry) = self.entries.get_mut(index) {
            if entry.detail_visible() {
                entry.detail = detail.to_string();
            }
        }
    }

    /// Rebuilds the section from submitted `(value, detail)` pairs, replaying
    /// each selection in order.
    pub fn from_submitted(kind: SectionKind, submitted: &[(String, String)]) -> Self {
        let mut section = Self::new(kind);
        while section.entries.len() < submitted.len() {
            section.entries.push(SectionEntry::default());
        }
        for (index, (value, detail)) in submitted.iter().enumerate() {
            // An exclusive NONE truncates the list mid-replay.
            if index >= section.entries.len() {
                break;
            }
            section.select(index, value);
            section.set_detail(index, detail);
        }
        section
    }

    /// Selected values, without empty selections or `NONE`.
    pub fn selected_values(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| entry.value.as_str())
            .filter(|value| !value.is_empty() && *value != NONE_VALUE)
            .map(str::to_string)
            .collect()
    }

    /// Free-text details entered for `OTHER` selections.
    pub fn other_details(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| entry.detail_visible() && !entry.detail.trim().is_empty())
            .map(|entry| entry.detail.trim().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(kind: SectionKind, values: &[&str]) -> RepeatableSection {
        let mut section = RepeatableSection::new(kind);
        for (index, value) in values.iter().enumerate() {
            if index > 0 {
                assert!(section.add_item());
            }
            section.select(index, value);
        }
        section
    }

    #[test]
    fn none_on_first_entry_collapses_section() {
        let mut section = filled(MEDICAL_CONDITIONS, &["ASTHMA", "DIABETES", "OTHER"]);
        assert_eq!(section.entries().len(), 3);

        section.select(0, NONE_VALUE);
        assert_eq!(section.entries().len(), 1);
        assert!(!section.add_control_visible());
        assert!(!section.detail_visible(0));
        assert!(!section.add_item());

        section.select(0, "ASTHMA");
        assert!(section.add_control_visible());
        assert!(section.add_item());
    }

    #[test]
    fn none_on_later_entry_removes_everything_after_first() {
        let mut section = filled(ALLERGIES, &["DAIRY", "GLUTEN", "PEANUTS"]);
        section.select(2, NONE_VALUE);
        assert_eq!(section.entries().len(), 1);
        assert_eq!(section.entries()[0].value, "DAIRY");
        assert!(!section.add_control_visible());
    }

    #[test]
    fn other_reveals_detail_panel() {
        let mut section = filled(MEDICATIONS, &["OTHER"]);
        assert!(section.detail_visible(0));
        assert!(!section.detail_required(0));
        section.set_detail(0, "vitamin D");

        section.select(0, "INSULIN");
        assert!(!section.detail_visible(0));
        assert_eq!(section.entries()[0].detail, "");
    }

    #[test]
    fn activity_sections_require_other_detail() {
        let section = filled(EXERCISE_TYPES, &["CARDIO", "OTHER"]);
        assert!(!section.detail_required(0));
        assert!(section.detail_required(1));
    }

    #[test]
    fn activity_sections_ignore_none() {
        let mut section = filled(PREFERRED_SPORTS, &["RUNNING", "CYCLING"]);
        section.select(0, NONE_VALUE);
        assert_eq!(section.entries().len(), 2);
        assert!(section.add_control_visible());
    }

    #[test]
    fn template_entry_cannot_be_removed() {
        let mut section = filled(PAST_INJURIES, &["KNEE", "BACK"]);
        assert!(!section.remove_item(0));
        assert!(section.remove_item(1));
        assert_eq!(section.entries().len(), 1);
        assert!(!section.remove_item(1));
    }

    #[test]
    fn added_entries_start_blank() {
        let mut section = filled(MEDICAL_CONDITIONS, &["OTHER"]);
        section.set_detail(0, "migraine");
        assert!(section.add_item());
        assert_eq!(section.entries()[1], SectionEntry::default());
    }

    #[test]
    fn submitted_entries_are_replayed_in_order() {
        let submitted = vec![
            ("ASTHMA".to_string(), String::new()),
            ("OTHER".to_string(), "migraine".to_string()),
        ];
        let section = RepeatableSection::from_submitted(MEDICAL_CONDITIONS, &submitted);
        assert_eq!(section.selected_values(), vec!["ASTHMA", "OTHER"]);
        assert_eq!(section.other_details(), vec!["migraine"]);

        let collapsed = vec![
            ("NONE".to_string(), String::new()),
            ("ASTHMA".to_string(), String::new()),
        ];
        let section = RepeatableSection::from_submitted(MEDICAL_CONDITIONS, &collapsed);
        assert_eq!(section.entries().len(), 1);
        assert!(section.selected_values().is_empty());
        assert!(!section.add_control_visible());
    }
}
