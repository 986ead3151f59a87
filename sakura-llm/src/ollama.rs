use std::error::Error as StdError;
use std::time::Duration;

use ollama_rs::{
    Ollama,
    generation::chat::{ChatMessage as OllamaMessage, request::ChatMessageRequest},
    models::ModelOptions,
};

use crate::error::LlmError;
use crate::message::{ChatRequest, ChatRole};

#[derive(Clone, Debug)]
pub(crate) struct OllamaBackend {
    client: Ollama,
}

impl OllamaBackend {
    pub(crate) fn new(host: String, port: u16) -> Self {
        Self {
            client: Ollama::new(host, port),
        }
    }

    pub(crate) async fn complete(
        &self,
        model: &str,
        request: &ChatRequest,
        timeout: Duration,
    ) -> Result<String, LlmError> {
        let messages = request
            .messages
            .iter()
            .map(|message| match message.role {
                ChatRole::System => OllamaMessage::system(message.content.clone()),
                ChatRole::User => OllamaMessage::user(message.content.clone()),
                ChatRole::Assistant => OllamaMessage::assistant(message.content.clone()),
            })
            .collect();

        let mut options = ModelOptions::default()
            .num_predict(i32::try_from(request.max_tokens).unwrap_or(i32::MAX));
        if let Some(temperature) = request.temperature {
            options = options.temperature(temperature);
        }

        let chat = ChatMessageRequest::new(model.to_owned(), messages).options(options);
        let response = self
            .client
            .send_chat_messages(chat)
            .await
            .map_err(|source| classify_error(&source, timeout))?;

        Ok(response.message.content)
    }
}

/// Map an ollama-rs failure onto the shared taxonomy by looking for the
/// underlying transport error in its source chain.
fn classify_error(source: &(dyn StdError + 'static), timeout: Duration) -> LlmError {
    let mut current = Some(source);
    while let Some(error) = current {
        if let Some(transport) = error.downcast_ref::<reqwest::Error>() {
            return LlmError::from_reqwest(transport, timeout);
        }
        current = error.source();
    }

    LlmError::Provider(source.to_string())
}
