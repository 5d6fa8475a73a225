use thiserror::Error;

use crate::advice::AdviceResult;
use crate::chat::ChatSession;
use crate::concern::Concern;
use crate::selection::{Selection, AGE_RANGE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Concern,
    Age,
    Result,
    Chat,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("cannot {action} from the {from:?} step")]
    InvalidTransition {
        from: WizardStep,
        action: &'static str,
    },
    #[error("select at least one concern")]
    NoConcerns,
    #[error("age must be between {min} and {max}, got {age}", min = AGE_RANGE.start(), max = AGE_RANGE.end())]
    AgeOutOfRange { age: u32 },
    #[error("a request is already in flight")]
    Busy,
}

/// Client-held wizard: concern → age → result, with an optional chat step.
#[derive(Debug, Clone)]
pub struct Wizard {
    step: WizardStep,
    selection: Selection,
    result: Option<AdviceResult>,
    chat: Option<ChatSession>,
    busy: bool,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::Concern,
            selection: Selection::default(),
            result: None,
            chat: None,
            busy: false,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn result(&self) -> Option<&AdviceResult> {
        self.result.as_ref()
    }

    pub fn chat(&self) -> Option<&ChatSession> {
        self.chat.as_ref()
    }

    pub fn chat_mut(&mut self) -> Option<&mut ChatSession> {
        self.chat.as_mut()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    fn expect_step(&self, expected: WizardStep, action: &'static str) -> Result<(), WizardError> {
        if self.step != expected {
            return Err(WizardError::InvalidTransition {
                from: self.step,
                action,
            });
        }
        Ok(())
    }

    pub fn toggle_concern(&mut self, concern: Concern) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Concern, "toggle a concern")?;
        self.selection.toggle(concern);
        Ok(())
    }

    /// Concern → Age.
    pub fn proceed(&mut self) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Concern, "proceed to age")?;
        if self.selection.is_empty() {
            return Err(WizardError::NoConcerns);
        }
        self.step = WizardStep::Age;
        Ok(())
    }

    /// Age → Concern.
    pub fn back(&mut self) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Age, "go back")?;
        if self.busy {
            return Err(WizardError::Busy);
        }
        self.step = WizardStep::Concern;
        Ok(())
    }

    /// Records the age and marks an advice request as outstanding.
    pub fn begin_submit(&mut self, age: u32) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Age, "submit an age")?;
        if self.busy {
            return Err(WizardError::Busy);
        }
        if !AGE_RANGE.contains(&age) {
            return Err(WizardError::AgeOutOfRange { age });
        }
        self.selection.set_age(age);
        self.busy = true;
        Ok(())
    }

    /// Age → Result once the advice (or its fallback) is available.
    pub fn complete(&mut self, result: AdviceResult) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Age, "show a result")?;
        self.busy = false;
        self.result = Some(result);
        self.step = WizardStep::Result;
        Ok(())
    }

    /// Result → Chat with a fresh session.
    pub fn open_chat(&mut self) -> Result<&mut ChatSession, WizardError> {
        self.expect_step(WizardStep::Result, "open the chat")?;
        self.step = WizardStep::Chat;
        Ok(self.chat.insert(ChatSession::new(&self.selection)))
    }

    /// Chat → Result; the conversation is discarded.
    pub fn close_chat(&mut self) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Chat, "close the chat")?;
        self.chat = None;
        self.step = WizardStep::Result;
        Ok(())
    }

    /// Result → Concern with everything cleared.
    pub fn restart(&mut self) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Result, "restart")?;
        *self = Self::new();
        Ok(())
    }
}
