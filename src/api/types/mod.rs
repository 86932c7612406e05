mod error;
mod json;

pub use error::{ApiError, ErrorBody};
pub use json::Json;
