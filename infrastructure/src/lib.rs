pub mod catalog_loader;
pub mod config;
pub mod gemini_client;
pub mod json_extract;
pub mod thread_random;
