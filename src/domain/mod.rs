pub mod chat;
pub mod citation;
pub mod error;
pub mod generation;
pub mod orchestrator;
pub mod prompt;
pub mod retrieval;
pub mod session;
pub mod storage;
