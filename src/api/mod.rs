pub mod ask;
pub mod documents;
pub mod health;
pub mod router;
pub mod state;
pub mod types;
