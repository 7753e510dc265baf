pub mod advisor;
pub mod carbon;
pub mod config;
pub mod fields;
pub mod history;
pub mod paths;
pub mod service;

// Re-export commonly used types
pub use advisor::{Advice, Advisor, AdvisorError};
pub use config::Config;
pub use history::{HistoryStore, Recommendation, StorageBackend};
pub use service::Client;
