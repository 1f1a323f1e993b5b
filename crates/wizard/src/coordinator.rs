//! Wizard coordinator: sequences steps by the signals they emit.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use common::Identified;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WizardError};
use crate::signal::{StepMessage, StepSignal};

/// What the wizard knows about a step's selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum StepValidity {
    /// The step has not signalled yet.
    #[default]
    Unknown,
    Valid,
    Invalid,
}

impl StepValidity {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepValidity::Unknown => "unknown",
            StepValidity::Valid => "valid",
            StepValidity::Invalid => "invalid",
        }
    }
}

impl std::fmt::Display for StepValidity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The confirmed output of a finished step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepCompletion {
    pub step: String,
    pub item_id: String,
    pub completed_at: DateTime<Utc>,
}

/// Sequences named steps.
///
/// Validity follows the latest `IsValid`/`IsInvalid` signal of each step;
/// repeated signals change nothing. A `Done` signal records the step's
/// output and, when it comes from the current step, moves to the next one.
#[derive(Debug, Clone)]
pub struct WizardCoordinator {
    steps: Vec<String>,
    current: usize,
    validity: HashMap<String, StepValidity>,
    completions: HashMap<String, StepCompletion>,
}

impl WizardCoordinator {
    /// Creates a wizard positioned on the first of `steps`.
    pub fn new<I, N>(steps: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let steps: Vec<String> = steps.into_iter().map(Into::into).collect();
        let validity = steps
            .iter()
            .map(|step| (step.clone(), StepValidity::Unknown))
            .collect();
        Self {
            steps,
            current: 0,
            validity,
            completions: HashMap::new(),
        }
    }

    /// Returns the step the wizard is on, or `None` once every step is done.
    pub fn current_step(&self) -> Option<&str> {
        self.steps.get(self.current).map(String::as_str)
    }

    pub fn is_complete(&self) -> bool {
        self.current >= self.steps.len()
    }

    pub fn validity(&self, step: &str) -> Option<StepValidity> {
        self.validity.get(step).copied()
    }

    pub fn completion(&self, step: &str) -> Option<&StepCompletion> {
        self.completions.get(step)
    }

    /// Applies a step's signal.
    ///
    /// Returns the completion recorded for a `Done` signal.
    #[tracing::instrument(skip(self, signal), fields(signal = signal.signal_type()))]
    pub fn handle_signal<T: Identified>(
        &mut self,
        step: &str,
        signal: &StepSignal<T>,
    ) -> Result<Option<StepCompletion>> {
        let validity = self
            .validity
            .get_mut(step)
            .ok_or_else(|| WizardError::UnknownStep(step.to_string()))?;

        match signal {
            StepSignal::IsValid => *validity = StepValidity::Valid,
            StepSignal::IsInvalid => *validity = StepValidity::Invalid,
            StepSignal::Done(item) => {
                *validity = StepValidity::Valid;
                let completion = StepCompletion {
                    step: step.to_string(),
                    item_id: item.id().to_string(),
                    completed_at: Utc::now(),
                };
                self.completions.insert(step.to_string(), completion.clone());
                metrics::counter!("wizard_steps_completed_total").increment(1);
                tracing::info!(item_id = %completion.item_id, "step completed");

                if self.current_step() == Some(step) {
                    self.current += 1;
                }
                return Ok(Some(completion));
            }
        }

        Ok(None)
    }

    /// Applies a message received from a step runtime.
    pub fn handle_message<T: Identified>(
        &mut self,
        message: &StepMessage<T>,
    ) -> Result<Option<StepCompletion>> {
        self.handle_signal(message.step, &message.signal)
    }

    /// True if the current step reported a valid selection.
    pub fn can_advance(&self) -> bool {
        self.current_step()
            .and_then(|step| self.validity(step))
            .is_some_and(|validity| validity == StepValidity::Valid)
    }

    /// Moves to the next step.
    ///
    /// Returns the new current step, or `None` if the step just left was the
    /// last one and the wizard is now complete.
    pub fn advance(&mut self) -> Result<Option<&str>> {
        let step = self.current_step().ok_or(WizardError::WizardComplete)?;
        if !self.can_advance() {
            return Err(WizardError::StepInvalid {
                step: step.to_string(),
            });
        }
        self.current += 1;
        tracing::debug!(position = self.current, "wizard advanced");
        Ok(self.current_step())
    }

    /// Returns to the previous step. Stays on the first step.
    pub fn back(&mut self) -> Option<&str> {
        self.current = self.current.saturating_sub(1);
        self.current_step()
    }
}
