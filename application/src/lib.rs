pub mod advice_service;
pub mod chat_service;
pub mod error;

pub use advice_service::AdviceService;
pub use chat_service::ChatService;
pub use error::ServiceError;
