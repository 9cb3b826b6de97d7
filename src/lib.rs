pub mod blogs;
pub mod chat;
pub mod config;
pub mod course_catalog;
pub mod enrichment;
pub mod http;
pub mod intake;
pub mod pipeline;
pub mod records;
pub mod sharing;
pub mod telemetry;

// Re-export commonly used types for convenience.
pub use config::AppConfig;
pub use http::{router, AppState};
pub use pipeline::{IntakePipeline, ProfileCreated};
pub use records::{Lead, Profile, RecordStore};
