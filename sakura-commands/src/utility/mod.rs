pub mod embeds;
pub mod help;
pub mod llmstats;
pub mod ping;
pub mod usage;
