//! forge-provider: LLM provider abstraction and implementations.

mod error;
pub mod providers;
pub mod traits;
pub mod types;
pub mod wire;

pub use error::ProviderError;
pub use providers::{OpenAiCompatConfig, OpenAiCompatProvider};
pub use traits::Provider;
pub use types::{ChatMessage, ChatRole, ModelDescriptor, ProviderEvent, Request};
pub use wire::SseDecoder;
