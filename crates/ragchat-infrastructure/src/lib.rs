pub mod config_service;
pub mod document_loader;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::document_loader::load_document;
pub use crate::paths::RagChatPaths;
pub use crate::storage::{FileCredentialStorage, LocalStore};
