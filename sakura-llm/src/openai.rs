use std::time::Duration;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::error::LlmError;
use crate::message::ChatRequest;

/// Client for any OpenAI-compatible `/chat/completions` endpoint (Groq, OpenAI, ...).
#[derive(Clone, Debug)]
pub(crate) struct OpenAiBackend {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
}

#[derive(Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAiBackend {
    pub(crate) fn new(api_base: &str, api_key: String, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build LLM HTTP client")?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_owned(),
            api_key,
        })
    }

    pub(crate) async fn complete(
        &self,
        model: &str,
        request: &ChatRequest,
        timeout: Duration,
    ) -> Result<String, LlmError> {
        let body = CompletionBody {
            model,
            messages: request
                .messages
                .iter()
                .map(|message| WireMessage {
                    role: message.role.as_str(),
                    content: &message.content,
                })
                .collect(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|source| LlmError::from_reqwest(&source, timeout))?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(Duration::from_secs);

        let text = response
            .text()
            .await
            .map_err(|source| LlmError::from_reqwest(&source, timeout))?;

        if !status.is_success() {
            return Err(LlmError::from_status(status.as_u16(), &text, retry_after));
        }

        parse_completion(&text)
    }
}

fn parse_completion(body: &str) -> Result<String, LlmError> {
    let parsed: CompletionResponse = serde_json::from_str(body)
        .map_err(|source| LlmError::MalformedResponse(source.to_string()))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(LlmError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::parse_completion;
    use crate::error::LlmError;

    #[test]
    fn extracts_first_choice_content() {
        let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"アリス"}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "アリス");
    }

    #[test]
    fn missing_choices_is_empty_response() {
        assert!(matches!(
            parse_completion(r#"{"choices":[]}"#),
            Err(LlmError::EmptyResponse)
        ));
        assert!(matches!(
            parse_completion(r#"{"choices":[{"message":{"content":null}}]}"#),
            Err(LlmError::EmptyResponse)
        ));
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            parse_completion("<html>bad gateway</html>"),
            Err(LlmError::MalformedResponse(_))
        ));
    }
}
