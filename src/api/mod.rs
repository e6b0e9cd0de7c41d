mod client;
mod error;
mod types;

pub use client::PlannerClient;
pub use error::ApiError;
pub use types::{ActivePlanner, HistoryEntry, HistorySnapshot, SaveResponse};
