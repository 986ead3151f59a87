pub mod batch_jobs;
pub mod chatbot;

use std::sync::Arc;

use sakura_database::{Database, impls::translation_config::get_guild_language};
use sakura_llm::LlmService;
use sakura_translate::Translator;
use sakura_utils::batch::BatchOptions;

pub use batch_jobs::{BatchGuard, BatchJobs};
pub use chatbot::ChatbotOptions;

pub type Error = anyhow::Error;

#[derive(Clone, Debug)]
pub struct Data {
    pub db: Database,
    pub llm: Option<LlmService>,
    pub translator: Arc<Translator>,
    pub batch: BatchOptions,
    pub batch_jobs: BatchJobs,
    pub chatbot: ChatbotOptions,
    /// Join-time auto-translation when a guild has not chosen either way.
    pub auto_translate_default: bool,
}

impl Data {
    /// The guild's configured target language, or the deployment default.
    pub async fn guild_language(&self, guild_id: u64) -> anyhow::Result<String> {
        let language = get_guild_language(&self.db, guild_id).await?;
        Ok(language.unwrap_or_else(|| self.translator.default_language().to_owned()))
    }
}

pub type Context<'a> = poise::Context<'a, Data, Error>;
