pub const TOTAL_STEPS: u8 = 5;
pub const NUTRITION_STEP: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Complete,
    Active,
    Pending,
}

impl StepStatus {
    pub fn css_class(self) -> &'static str {
        match self {
            StepStatus::Complete => "complete",
            StepStatus::Active => "active",
            StepStatus::Pending => "",
        }
    }
}

/// Position of the survey wizard. Always within `1..=TOTAL_STEPS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WizardState {
    step: u8,
}

impl Default for WizardState {
    fn default() -> Self {
        Self { step: 1 }
    }
}

impl WizardState {
    /// Out-of-range steps are clamped into `1..=TOTAL_STEPS`.
    pub fn go_to_step(step: u8) -> Self {
        Self {
            step: step.clamp(1, TOTAL_STEPS),
        }
    }

    pub fn step(self) -> u8 {
        self.step
    }

    pub fn is_first(self) -> bool {
        self.step == 1
    }

    pub fn is_last(self) -> bool {
        self.step == TOTAL_STEPS
    }

    /// Moves forward only when `validate` accepts the current step.
    pub fn advance(self, validate: impl FnOnce(u8) -> bool) -> Self {
        if self.is_last() || !validate(self.step) {
            return self;
        }
        Self::go_to_step(self.step + 1)
    }

    pub fn retreat(self) -> Self {
        if self.is_first() {
            return self;
        }
        Self::go_to_step(self.step - 1)
    }

    pub fn progress_percent(self) -> f64 {
        f64::from(self.step - 1) / f64::from(TOTAL_STEPS - 1) * 100.0
    }

    pub fn is_visible(self, step: u8) -> bool {
        self.step == step
    }

    pub fn indicator(self, step: u8) -> StepStatus {
        if step < self.step {
            StepStatus::Complete
        } else if step == self.step {
            StepStatus::Active
        } else {
            StepStatus::Pending
        }
    }

    pub fn indicators(self) -> Vec<StepStatus> {
        (1..=TOTAL_STEPS).map(|step| self.indicator(step)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_step_is_visible() {
        for step in 1..=TOTAL_STEPS {
            let state = WizardState::go_to_step(step);
            let visible = (1..=TOTAL_STEPS).filter(|s| state.is_visible(*s)).count();
            assert_eq!(visible, 1);
            assert!(state.is_visible(step));
            let expected = f64::from(step - 1) / 4.0 * 100.0;
            assert_eq!(state.progress_percent(), expected);
        }
    }

    #[test]
    fn indicators_split_around_current_step() {
        let state = WizardState::go_to_step(3);
        assert_eq!(
            state.indicators(),
            vec![
                StepStatus::Complete,
                StepStatus::Complete,
                StepStatus::Active,
                StepStatus::Pending,
                StepStatus::Pending,
            ]
        );
    }

    #[test]
    fn advance_requires_validation() {
        let state = WizardState::go_to_step(2);
        assert_eq!(state.advance(|_| false).step(), 2);
        assert_eq!(state.advance(|step| step == 2).step(), 3);
    }

    #[test]
    fn navigation_does_not_wrap() {
        assert_eq!(WizardState::default().retreat().step(), 1);
        let last = WizardState::go_to_step(TOTAL_STEPS);
        assert_eq!(last.advance(|_| true).step(), TOTAL_STEPS);
        assert_eq!(last.retreat().step(), TOTAL_STEPS - 1);
    }

    #[test]
    fn out_of_range_steps_are_clamped() {
        assert_eq!(WizardState::go_to_step(0).step(), 1);
        assert_eq!(WizardState::go_to_step(9).step(), TOTAL_STEPS);
    }
}
