pub mod database;
pub mod impls;
pub mod model;

pub use database::{Database, MIGRATOR};
pub use model::chatbot_config::GuildChatbotConfig;
pub use model::llm_chat::{ChatHistoryRole, LlmChatEntry};
pub use model::translation_config::{GreetingChannel, GuildTranslationConfig};
