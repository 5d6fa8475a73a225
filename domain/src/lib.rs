pub mod advice;
pub mod catalog;
pub mod chat;
pub mod concern;
pub mod random;
pub mod selection;
pub mod wizard;

pub use advice::{AdviceCategory, AdviceResult, CONCERN_SEPARATOR};
pub use catalog::{AdviceCatalog, CatalogError, ConcernAdvice};
pub use chat::{ChatMessage, ChatSession, ChatTurn, Role, CHAT_APOLOGY};
pub use concern::{Concern, ConcernInfo, CONCERNS};
pub use random::{FixedIndex, RandomSource, SequenceIndex};
pub use selection::Selection;
pub use wizard::{Wizard, WizardError, WizardStep};
