pub mod generation;
pub mod logging;
pub mod retrieval;
pub mod storage;
