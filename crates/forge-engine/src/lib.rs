//! forge-engine: provider fallback orchestration and stream relay.

pub mod config;
mod error;
pub mod orchestrator;
pub mod prompts;
pub mod relay;
pub mod request;
pub mod session;

pub use config::{Config, ConfigStore};
pub use error::EngineError;
pub use orchestrator::{Orchestrator, GRACE_WINDOW, PROVIDER_TIMEOUT};
pub use relay::{StreamRelay, TERMINAL_SENTINEL};
pub use request::{ChatTurn, GenerationRequest, HISTORY_WINDOW};
pub use session::StreamSession;
