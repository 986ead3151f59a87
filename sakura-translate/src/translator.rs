use std::sync::Arc;

use sakura_llm::{
    ChatCompleter, ChatRequest, ErrorKind, RetryPolicy,
    prompt::{name_translation_request, text_translation_request},
};
use sakura_utils::formatting::truncate_chars;
use tracing::{debug, error, info, warn};

use crate::cache::TranslationCache;
use crate::config::TranslatorConfig;
use crate::language::Language;
use crate::romanize::romanize_to_kana;
use crate::script::is_japanese;
use crate::throttle::{Admission, RequestThrottle};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TranslationSource {
    Cache,
    Llm,
    /// Local kana approximation after the LLM path failed or was refused.
    Fallback,
    /// Returned as given: empty, already in the target script, or no
    /// translation could be produced.
    Unchanged,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Translation {
    pub text: String,
    pub source: TranslationSource,
}

impl Translation {
    fn new(text: impl Into<String>, source: TranslationSource) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }
}

/// Cached, throttled, retrying front end to the LLM for names and short text.
#[derive(Debug)]
pub struct Translator {
    client: Option<Arc<dyn ChatCompleter>>,
    cache: TranslationCache,
    throttle: RequestThrottle,
    retry: RetryPolicy,
    default_language: String,
    max_text_chars: usize,
    max_free_text_chars: usize,
    romanization_fallback: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum InputKind {
    Name,
    FreeText,
}

impl Translator {
    pub fn new(client: Option<Arc<dyn ChatCompleter>>, config: TranslatorConfig) -> Self {
        Self {
            client,
            cache: TranslationCache::new(config.cache_size),
            throttle: RequestThrottle::new(config.throttle),
            retry: config.retry,
            default_language: config.default_language,
            max_text_chars: config.max_text_chars.max(1),
            max_free_text_chars: config.max_free_text_chars.max(1),
            romanization_fallback: config.romanization_fallback,
        }
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    /// Free text longer than this is cut before `translate_text` sends it.
    pub fn free_text_limit(&self) -> usize {
        self.max_free_text_chars
    }

    pub async fn to_japanese(&self, text: &str) -> Translation {
        self.translate(text, "ja").await
    }

    /// Translate a display name. Never fails: when the LLM path is
    /// unavailable the result degrades to the kana table or the input.
    pub async fn translate(&self, text: &str, language: &str) -> Translation {
        let language = Language::resolve(language);
        let Some(text) = self.prepare(text, &language, InputKind::Name) else {
            return Translation::new(text, TranslationSource::Unchanged);
        };

        let key = cache_key(&language.tag, &text);
        if let Some(hit) = self.cache.get(&key) {
            debug!(key = %key, "translation cache hit");
            return Translation::new(hit, TranslationSource::Cache);
        }

        if let Some(client) = &self.client {
            let request = name_translation_request(&text, &language.name);
            if let Some(raw) = self.complete(client.as_ref(), &request).await {
                match clean_name_response(&raw) {
                    Some(translated) => {
                        info!(
                            source = %text,
                            translated = %translated,
                            language = %language.tag,
                            "translated name"
                        );
                        self.cache.put(key, translated.clone());
                        return Translation::new(translated, TranslationSource::Llm);
                    }
                    None => error!(raw = %raw, "llm returned no usable name"),
                }
            }
        }

        self.fallback(text, &language)
    }

    /// Translate free text. Cached separately from names.
    pub async fn translate_text(&self, text: &str, language: &str) -> Translation {
        let language = Language::resolve(language);
        let Some(text) = self.prepare(text, &language, InputKind::FreeText) else {
            return Translation::new(text, TranslationSource::Unchanged);
        };

        let key = format!("text:{}", cache_key(&language.tag, &text));
        if let Some(hit) = self.cache.get(&key) {
            return Translation::new(hit, TranslationSource::Cache);
        }

        if let Some(client) = &self.client {
            let request = text_translation_request(&text, &language.name);
            if let Some(translated) = self.complete(client.as_ref(), &request).await {
                self.cache.put(key, translated.clone());
                return Translation::new(translated, TranslationSource::Llm);
            }
        }

        self.fallback(text, &language)
    }

    /// Run an arbitrary uncached request through the throttle and retry
    /// path, e.g. for welcome messages.
    pub async fn generate(&self, request: &ChatRequest) -> Option<String> {
        let client = self.client.as_ref()?;
        self.complete(client.as_ref(), request).await
    }

    fn prepare(&self, text: &str, language: &Language, kind: InputKind) -> Option<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        let limit = match kind {
            InputKind::Name => {
                // A single kana or kanji marks a name as already Japanese.
                if language.is_japanese() && is_japanese(trimmed) {
                    debug!(text = %trimmed, "already japanese, skipping translation");
                    return None;
                }
                self.max_text_chars
            }
            InputKind::FreeText => self.max_free_text_chars,
        };

        Some(truncate_chars(trimmed, limit))
    }

    fn fallback(&self, text: String, language: &Language) -> Translation {
        if language.is_japanese() && self.romanization_fallback {
            let kana = romanize_to_kana(&text);
            warn!(source = %text, fallback = %kana, "using kana fallback");
            return Translation::new(kana, TranslationSource::Fallback);
        }

        Translation::new(text, TranslationSource::Unchanged)
    }

    async fn complete(&self, client: &dyn ChatCompleter, request: &ChatRequest) -> Option<String> {
        let mut attempt = 1;
        loop {
            if self.throttle.acquire().await == Admission::Denied {
                return None;
            }

            let source = match client.complete(request).await {
                Ok(content) => return Some(content),
                Err(source) => source,
            };

            let kind = source.kind();
            if !self.retry.should_retry(kind, attempt) {
                if kind == ErrorKind::Terminal {
                    error!(attempt, error = %source, "llm request failed permanently");
                } else {
                    warn!(attempt, error = %source, "llm retries exhausted");
                }
                return None;
            }

            let delay = self.retry.backoff(attempt, source.retry_after());
            warn!(
                attempt,
                kind = ?kind,
                wait_ms = delay.as_millis() as u64,
                error = %source,
                "llm request failed, retrying"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

/// Cache key for a translation: `"{tag}:{normalized text}"`.
pub fn cache_key(tag: &str, text: &str) -> String {
    format!("{tag}:{}", normalize(text))
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

const WRAPPING_QUOTES: &[(char, char)] = &[
    ('"', '"'),
    ('\'', '\''),
    ('`', '`'),
    ('「', '」'),
    ('“', '”'),
];

/// Reduce a chatty LLM reply to just the name.
fn clean_name_response(raw: &str) -> Option<String> {
    let line = raw.lines().map(str::trim).find(|line| !line.is_empty())?;

    let mut name = ["Translation:", "translation:", "Name:"]
        .iter()
        .find_map(|label| line.strip_prefix(label))
        .unwrap_or(line)
        .trim();

    while let Some(inner) = WRAPPING_QUOTES.iter().find_map(|(open, close)| {
        name.strip_prefix(*open)
            .and_then(|rest| rest.strip_suffix(*close))
    }) {
        name = inner.trim();
    }

    (!name.is_empty()).then(|| name.to_owned())
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use sakura_llm::{ChatCompleter, ChatMessage, ChatRequest, LlmError, RetryPolicy};
    use tokio::time::Instant;

    use super::{TranslationSource, Translator, cache_key, clean_name_response};
    use crate::config::TranslatorConfig;
    use crate::throttle::{ThrottleConfig, ThrottlePolicy};

    #[derive(Debug)]
    struct ScriptedCompleter {
        replies: Mutex<VecDeque<Result<String, LlmError>>>,
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedCompleter {
        fn new(replies: Vec<Result<String, LlmError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn last_prompt(&self) -> Option<String> {
            self.prompts.lock().last().cloned()
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChatCompleter for ScriptedCompleter {
        async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(last) = request.messages.last() {
                self.prompts.lock().push(last.content.clone());
            }
            self.replies
                .lock()
                .pop_front()
                .unwrap_or(Err(LlmError::EmptyResponse))
        }
    }

    fn config(cache_size: usize) -> TranslatorConfig {
        TranslatorConfig {
            cache_size,
            throttle: ThrottleConfig {
                window: Duration::from_secs(60),
                min_spacing: Duration::from_secs(1),
                max_calls_per_window: 50,
                policy: ThrottlePolicy::Wait,
            },
            retry: RetryPolicy {
                max_attempts: 3,
                base_delay: Duration::from_secs(1),
                max_delay: Duration::from_secs(8),
                jitter: Duration::ZERO,
            },
            ..TranslatorConfig::default()
        }
    }

    fn translator(client: &Arc<ScriptedCompleter>, config: TranslatorConfig) -> Translator {
        let client: Arc<dyn ChatCompleter> = client.clone();
        Translator::new(Some(client), config)
    }

    #[tokio::test(start_paused = true)]
    async fn second_lookup_is_served_from_cache() {
        let client = ScriptedCompleter::new(vec![Ok("アリス".into())]);
        let translator = translator(&client, config(2));

        let first = translator.to_japanese("Alice").await;
        assert_eq!(first.text, "アリス");
        assert_eq!(first.source, TranslationSource::Llm);
        assert_eq!(translator.cache().get("ja:alice").as_deref(), Some("アリス"));

        let second = translator.to_japanese("Alice").await;
        assert_eq!(second.text, "アリス");
        assert_eq!(second.source, TranslationSource::Cache);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cache_hits_skip_the_throttle() {
        let client = ScriptedCompleter::new(vec![Ok("アリス".into())]);
        let translator = translator(&client, config(2));
        translator.to_japanese("Alice").await;

        let before = Instant::now();
        translator.to_japanese("  ALICE ").await;
        assert_eq!(Instant::now() - before, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn terminal_error_falls_back_without_retry() {
        let client = ScriptedCompleter::new(vec![Err(LlmError::from_status(401, "bad key", None))]);
        let translator = translator(&client, config(10));

        let result = translator.to_japanese("Alice").await;
        assert_eq!(result.text, "ありせ");
        assert_eq!(result.source, TranslationSource::Fallback);
        assert_eq!(client.calls(), 1);
        assert!(translator.cache().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn transient_error_is_retried_after_backoff() {
        let client = ScriptedCompleter::new(vec![
            Err(LlmError::Timeout(Duration::from_secs(10))),
            Ok("ミカ".into()),
        ]);
        let translator = translator(&client, config(10));

        let start = Instant::now();
        let result = translator.to_japanese("Mika").await;

        assert_eq!(result.text, "ミカ");
        assert_eq!(result.source, TranslationSource::Llm);
        assert_eq!(client.calls(), 2);
        assert!(Instant::now() - start >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_retries_fall_back() {
        let client = ScriptedCompleter::new(vec![
            Err(LlmError::from_status(503, "", None)),
            Err(LlmError::RateLimited { retry_after: None }),
            Err(LlmError::Connection("reset".into())),
            Ok("never".into()),
        ]);
        let translator = translator(&client, config(10));

        let result = translator.to_japanese("ken").await;
        assert_eq!(result.text, "けん");
        assert_eq!(result.source, TranslationSource::Fallback);
        assert_eq!(client.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn refused_admission_uses_fallback() {
        let client = ScriptedCompleter::new(vec![Ok("ナミ".into()), Ok("unused".into())]);
        let mut config = config(10);
        config.throttle.max_calls_per_window = 1;
        config.throttle.policy = ThrottlePolicy::Fallback;
        let translator = translator(&client, config);

        assert_eq!(translator.to_japanese("Nami").await.source, TranslationSource::Llm);

        let second = translator.to_japanese("Shin").await;
        assert_eq!(second.text, "しん");
        assert_eq!(second.source, TranslationSource::Fallback);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn without_client_only_japanese_gets_a_fallback() {
        let translator = Translator::new(None, config(10));

        let japanese = translator.translate("mika", "Japanese").await;
        assert_eq!(japanese.text, "みか");
        assert_eq!(japanese.source, TranslationSource::Fallback);

        let spanish = translator.translate("mika", "Spanish").await;
        assert_eq!(spanish.text, "mika");
        assert_eq!(spanish.source, TranslationSource::Unchanged);
    }

    #[tokio::test(start_paused = true)]
    async fn japanese_input_is_left_alone() {
        let client = ScriptedCompleter::new(vec![]);
        let translator = translator(&client, config(10));

        let result = translator.to_japanese("さくら").await;
        assert_eq!(result.text, "さくら");
        assert_eq!(result.source, TranslationSource::Unchanged);
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn long_input_is_truncated_before_translation() {
        let client = ScriptedCompleter::new(vec![Ok("x".into())]);
        let mut config = config(10);
        config.max_text_chars = 5;
        let translator = translator(&client, config);

        translator.translate("abcdefghij", "French").await;
        assert_eq!(translator.cache().get("fr:abcde").as_deref(), Some("x"));
    }

    #[tokio::test(start_paused = true)]
    async fn generated_text_is_not_cached() {
        let client = ScriptedCompleter::new(vec![Ok("Welcome aboard!".into())]);
        let translator = translator(&client, config(10));

        let request = ChatRequest::new(vec![ChatMessage::user("greet")], 150);
        assert_eq!(translator.generate(&request).await.as_deref(), Some("Welcome aboard!"));
        assert!(translator.cache().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn free_text_is_sent_whole_and_cached_apart_from_names() {
        let client = ScriptedCompleter::new(vec![Ok("beaucoup de mots".into())]);
        let translator = translator(&client, config(10));
        let text = format!("{} TAILMARKER", "word ".repeat(40));

        let first = translator.translate_text(&text, "French").await;
        assert_eq!(first.text, "beaucoup de mots");
        assert_eq!(first.source, TranslationSource::Llm);
        assert!(client.last_prompt().is_some_and(|prompt| prompt.ends_with("TAILMARKER")));

        let key = format!("text:{}", cache_key("fr", &text));
        assert_eq!(translator.cache().get(&key).as_deref(), Some("beaucoup de mots"));
        assert_eq!(translator.cache().get(&cache_key("fr", &text)), None);

        let second = translator.translate_text(&text, "French").await;
        assert_eq!(second.source, TranslationSource::Cache);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn free_text_over_its_limit_is_cut() {
        let client = ScriptedCompleter::new(vec![Ok("court".into())]);
        let mut config = config(10);
        config.max_free_text_chars = 8;
        let translator = translator(&client, config);
        assert_eq!(translator.free_text_limit(), 8);

        translator.translate_text("abcdefghijkl", "French").await;
        assert_eq!(client.last_prompt().as_deref(), Some("abcdefgh"));
    }

    #[tokio::test(start_paused = true)]
    async fn mixed_script_free_text_is_still_translated() {
        let client = ScriptedCompleter::new(vec![Ok("こんにちはさん、お元気ですか".into())]);
        let translator = translator(&client, config(10));

        let result = translator
            .translate_text("Hello さん, how are you", "Japanese")
            .await;
        assert_eq!(result.source, TranslationSource::Llm);
        assert_eq!(client.calls(), 1);
    }

    #[test]
    fn keys_are_normalized() {
        assert_eq!(cache_key("ja", "  Alice   Smith "), "ja:alice smith");
    }

    #[test]
    fn name_responses_are_cleaned() {
        assert_eq!(clean_name_response("\"アリス\"").as_deref(), Some("アリス"));
        assert_eq!(
            clean_name_response("\n  Translation: `ミカ`\nThis is a phonetic rendering.").as_deref(),
            Some("ミカ")
        );
        assert_eq!(clean_name_response("  \n \"\" "), None);
        assert_eq!(clean_name_response("「さくら」").as_deref(), Some("さくら"));
    }

    #[test]
    fn inner_apostrophes_survive_cleaning() {
        assert_eq!(clean_name_response("O'Brien").as_deref(), Some("O'Brien"));
        assert_eq!(clean_name_response("'D'Arcy'").as_deref(), Some("D'Arcy"));
        assert_eq!(
            clean_name_response("Translation: \"Jean-Luc\"").as_deref(),
            Some("Jean-Luc")
        );
    }
}
