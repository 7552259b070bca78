pub mod http;
pub mod orchestrator;
pub mod status;

pub use http::{HttpSyncClient, SyncApi};
pub use orchestrator::SyncOrchestrator;
pub use status::SyncStatus;
