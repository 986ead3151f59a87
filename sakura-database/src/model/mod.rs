pub mod chatbot_config;
pub mod llm_chat;
pub mod translation_config;
