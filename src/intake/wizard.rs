//! Step flow for the five-step career profile form.
//!
//! The wizard only decides whether the visitor may move between steps. Field
//! values live in the caller's `RawProfileSubmission`; final acceptance is
//! always the full profile validator.

use serde::Serialize;
use thiserror::Error;

use super::{validate_profile, RawProfileSubmission, ValidationFailed};
use crate::records::ProfileInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Basic,
    Education,
    CareerGoals,
    SkillsInterests,
    FinalDetails,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        Self::Basic,
        Self::Education,
        Self::CareerGoals,
        Self::SkillsInterests,
        Self::FinalDetails,
    ];

    pub fn index(&self) -> usize {
        match self {
            Self::Basic => 0,
            Self::Education => 1,
            Self::CareerGoals => 2,
            Self::SkillsInterests => 3,
            Self::FinalDetails => 4,
        }
    }

    pub fn next(&self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn previous(&self) -> Option<Self> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    /// Fields that must be non-blank before leaving this step.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Basic => &["full_name", "email", "phone", "location"],
            Self::Education => &["education_level"],
            Self::CareerGoals => &["career_stage", "target_role", "career_goals"],
            Self::SkillsInterests => &["interests"],
            Self::FinalDetails => &[
                "preferred_learning_style",
                "why_digital_marketing",
                "availability",
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    Step(WizardStep),
    Submitted,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("step {step:?} is missing: {}", missing.join(", "))]
    Incomplete {
        step: WizardStep,
        missing: Vec<&'static str>,
    },

    #[error("the profile can only be submitted from the final step")]
    NotAtFinalStep,

    #[error("the profile was already submitted")]
    AlreadySubmitted,

    #[error(transparent)]
    Invalid(#[from] ValidationFailed),
}

#[derive(Debug, Clone)]
pub struct ProfileWizard {
    state: WizardState,
}

impl Default for ProfileWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileWizard {
    pub fn new() -> Self {
        Self {
            state: WizardState::Step(WizardStep::Basic),
        }
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    /// Required fields of the current step that are still blank.
    pub fn missing(&self, form: &RawProfileSubmission) -> Vec<&'static str> {
        match self.state {
            WizardState::Step(step) => step
                .required_fields()
                .iter()
                .copied()
                .filter(|field| !form.is_filled(field))
                .collect(),
            WizardState::Submitted => Vec::new(),
        }
    }

    pub fn can_proceed(&self, form: &RawProfileSubmission) -> bool {
        matches!(self.state, WizardState::Step(_)) && self.missing(form).is_empty()
    }

    pub fn advance(&mut self, form: &RawProfileSubmission) -> Result<WizardStep, WizardError> {
        let WizardState::Step(step) = self.state else {
            return Err(WizardError::AlreadySubmitted);
        };
        let missing = self.missing(form);
        if !missing.is_empty() {
            return Err(WizardError::Incomplete { step, missing });
        }
        let Some(next) = step.next() else {
            return Ok(step);
        };
        self.state = WizardState::Step(next);
        Ok(next)
    }

    pub fn back(&mut self) -> WizardState {
        if let WizardState::Step(step) = self.state {
            if let Some(previous) = step.previous() {
                self.state = WizardState::Step(previous);
            }
        }
        self.state
    }

    /// Runs the full validator from the last step and closes the wizard.
    pub fn submit(&mut self, form: &RawProfileSubmission) -> Result<ProfileInput, WizardError> {
        match self.state {
            WizardState::Submitted => Err(WizardError::AlreadySubmitted),
            WizardState::Step(WizardStep::FinalDetails) => {
                let input = validate_profile(form)?;
                self.state = WizardState::Submitted;
                Ok(input)
            }
            WizardState::Step(_) => Err(WizardError::NotAtFinalStep),
        }
    }
}
