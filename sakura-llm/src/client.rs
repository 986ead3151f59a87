use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, bail};
use async_trait::async_trait;
use sakura_utils::env::{env_bool, env_secs, env_string};
use tracing::{debug, warn};

use crate::error::LlmError;
use crate::message::ChatRequest;
use crate::ollama::OllamaBackend;
use crate::openai::OpenAiBackend;
use crate::stats::{LlmStats, LlmStatsSnapshot};

const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";
const DEFAULT_OPENAI_MODEL: &str = "llama-3.3-70b-versatile";
const DEFAULT_OLLAMA_HOST: &str = "http://127.0.0.1";
const DEFAULT_OLLAMA_PORT: u16 = 11434;
const DEFAULT_OLLAMA_MODEL: &str = "llama3.1:8b";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Anything that can turn a chat request into a single completion string.
#[async_trait]
pub trait ChatCompleter: Send + Sync + fmt::Debug {
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LlmProvider {
    OpenAi,
    Ollama,
}

impl LlmProvider {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "openai" | "groq" | "openai-compatible" => Some(Self::OpenAi),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Ollama => "ollama",
        }
    }
}

#[derive(Clone, Debug)]
enum LlmBackend {
    OpenAi(OpenAiBackend),
    Ollama(OllamaBackend),
}

#[derive(Clone, Debug)]
pub struct LlmService {
    backend: LlmBackend,
    model: String,
    timeout: Duration,
    stats: Arc<LlmStats>,
}

impl LlmService {
    /// Build the service from the environment, or `None` when no provider is
    /// configured or `LLM_ENABLED` is off.
    pub fn from_env_optional() -> anyhow::Result<Option<Self>> {
        if !env_bool("LLM_ENABLED", true) {
            return Ok(None);
        }

        match provider_from_env()? {
            LlmProvider::OpenAi => {
                if env_string("LLM_API_KEY").is_none() {
                    return Ok(None);
                }
            }
            LlmProvider::Ollama => {
                let host = env_string("OLLAMA_HOST");
                let port = env_string("OLLAMA_PORT");
                let model = env_string("OLLAMA_MODEL");
                if host.is_none() && port.is_none() && model.is_none() {
                    return Ok(None);
                }
            }
        }

        Ok(Some(Self::from_env()?))
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let timeout = env_secs("LLM_REQUEST_TIMEOUT_SECONDS", DEFAULT_REQUEST_TIMEOUT);

        let (backend, model) = match provider_from_env()? {
            LlmProvider::OpenAi => {
                let api_key = env_string("LLM_API_KEY").context("missing LLM_API_KEY")?;
                let api_base =
                    env_string("LLM_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_owned());
                let model =
                    env_string("LLM_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_owned());
                (
                    LlmBackend::OpenAi(OpenAiBackend::new(&api_base, api_key, timeout)?),
                    model,
                )
            }
            LlmProvider::Ollama => {
                let host =
                    env_string("OLLAMA_HOST").unwrap_or_else(|| DEFAULT_OLLAMA_HOST.to_owned());
                let port = env_string("OLLAMA_PORT")
                    .and_then(|value| value.parse::<u16>().ok())
                    .unwrap_or(DEFAULT_OLLAMA_PORT);
                let model =
                    env_string("OLLAMA_MODEL").unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_owned());
                (LlmBackend::Ollama(OllamaBackend::new(host, port)), model)
            }
        };

        Ok(Self {
            backend,
            model,
            timeout,
            stats: Arc::new(LlmStats::default()),
        })
    }

    pub fn provider(&self) -> LlmProvider {
        match self.backend {
            LlmBackend::OpenAi(_) => LlmProvider::OpenAi,
            LlmBackend::Ollama(_) => LlmProvider::Ollama,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn stats(&self) -> LlmStatsSnapshot {
        self.stats.snapshot()
    }

    async fn dispatch(&self, request: &ChatRequest) -> Result<String, LlmError> {
        match &self.backend {
            LlmBackend::OpenAi(backend) => backend.complete(&self.model, request, self.timeout).await,
            LlmBackend::Ollama(backend) => backend.complete(&self.model, request, self.timeout).await,
        }
    }
}

#[async_trait]
impl ChatCompleter for LlmService {
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError> {
        self.stats.record_request();

        let result = match tokio::time::timeout(self.timeout, self.dispatch(request)).await {
            Ok(result) => result,
            Err(_) => Err(LlmError::Timeout(self.timeout)),
        };

        let result = result.and_then(|content| {
            let trimmed = content.trim();
            if trimmed.is_empty() {
                Err(LlmError::EmptyResponse)
            } else {
                Ok(trimmed.to_owned())
            }
        });

        match &result {
            Ok(content) => {
                self.stats.record_success();
                debug!(
                    provider = self.provider().as_str(),
                    chars = content.chars().count(),
                    "llm completion succeeded"
                );
            }
            Err(source) => {
                self.stats.record_failure(source);
                warn!(
                    provider = self.provider().as_str(),
                    kind = ?source.kind(),
                    error = %source,
                    "llm completion failed"
                );
            }
        }

        result
    }
}

fn provider_from_env() -> anyhow::Result<LlmProvider> {
    let Some(raw) = env_string("LLM_PROVIDER") else {
        return Ok(LlmProvider::OpenAi);
    };

    match LlmProvider::parse(&raw) {
        Some(provider) => Ok(provider),
        None => bail!("unsupported LLM_PROVIDER `{raw}` (expected openai or ollama)"),
    }
}

#[cfg(test)]
mod tests {
    use super::LlmProvider;

    #[test]
    fn provider_names_parse() {
        assert_eq!(LlmProvider::parse("OpenAI"), Some(LlmProvider::OpenAi));
        assert_eq!(LlmProvider::parse(" groq "), Some(LlmProvider::OpenAi));
        assert_eq!(LlmProvider::parse("ollama"), Some(LlmProvider::Ollama));
        assert_eq!(LlmProvider::parse("bard"), None);
    }
}
