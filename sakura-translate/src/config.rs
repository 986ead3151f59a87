use sakura_llm::RetryPolicy;
use sakura_utils::env::{env_bool, env_string, env_usize};

use crate::throttle::ThrottleConfig;

pub const DEFAULT_LANGUAGE: &str = "Japanese";
pub const DEFAULT_CACHE_SIZE: usize = 100;
pub const DEFAULT_MAX_TEXT_CHARS: usize = 100;
pub const DEFAULT_MAX_FREE_TEXT_CHARS: usize = 1000;

#[derive(Clone, Debug)]
pub struct TranslatorConfig {
    pub default_language: String,
    pub cache_size: usize,
    /// Longer names are cut to this many characters before translation.
    pub max_text_chars: usize,
    /// Same limit for free text, e.g. `translatetext`.
    pub max_free_text_chars: usize,
    /// Use the kana table when a Japanese translation cannot be obtained.
    pub romanization_fallback: bool,
    pub throttle: ThrottleConfig,
    pub retry: RetryPolicy,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            default_language: DEFAULT_LANGUAGE.to_owned(),
            cache_size: DEFAULT_CACHE_SIZE,
            max_text_chars: DEFAULT_MAX_TEXT_CHARS,
            max_free_text_chars: DEFAULT_MAX_FREE_TEXT_CHARS,
            romanization_fallback: true,
            throttle: ThrottleConfig::default(),
            retry: RetryPolicy::default(),
        }
    }
}

impl TranslatorConfig {
    pub fn from_env() -> Self {
        Self {
            default_language: env_string("DEFAULT_TRANSLATION_LANGUAGE")
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_owned()),
            cache_size: env_usize("TRANSLATION_CACHE_SIZE", DEFAULT_CACHE_SIZE),
            max_text_chars: env_usize("MAX_TRANSLATION_LENGTH", DEFAULT_MAX_TEXT_CHARS).max(1),
            max_free_text_chars: env_usize(
                "MAX_TEXT_TRANSLATION_LENGTH",
                DEFAULT_MAX_FREE_TEXT_CHARS,
            )
            .max(1),
            romanization_fallback: env_bool("USE_ROMANIZATION_FALLBACK", true),
            throttle: ThrottleConfig::from_env(),
            retry: RetryPolicy::from_env(),
        }
    }
}
