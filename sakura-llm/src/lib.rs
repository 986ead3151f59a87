pub mod client;
pub mod error;
pub mod message;
mod ollama;
mod openai;
pub mod prompt;
pub mod retry;
pub mod stats;

pub use client::{ChatCompleter, LlmProvider, LlmService};
pub use error::{ErrorKind, LlmError};
pub use message::{ChatMessage, ChatRequest, ChatRole};
pub use retry::RetryPolicy;
pub use stats::{LlmStats, LlmStatsSnapshot};
