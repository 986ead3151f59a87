use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::nickname::embeds::usage_message;
use sakura_core::{Context, Error};
use sakura_translate::{Language, TranslationSource};
use sakura_utils::embed::{DEFAULT_EMBED_COLOR, requested_by_footer};
use sakura_utils::formatting::{escape_mentions, truncate_chars};

pub const META: CommandMeta = CommandMeta {
    name: "translatetext",
    desc: "Translate a piece of text.",
    category: "nickname",
    usage: "!translatetext <language> <text>",
};

const EMBED_FIELD_MAX_CHARS: usize = 1024;

#[poise::command(prefix_command, slash_command, category = "Nickname", aliases("tt"))]
pub async fn translatetext(
    ctx: Context<'_>,
    #[description = "Target language"] language: Option<String>,
    #[description = "Text to translate"]
    #[rest]
    text: Option<String>,
) -> Result<(), Error> {
    let (Some(language), Some(text)) = (
        language,
        text.filter(|text| !text.trim().is_empty()),
    ) else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    ctx.defer().await?;

    let translator = &ctx.data().translator;
    let target = Language::resolve(&language);
    let translation = translator.translate_text(&text, &language).await;

    let mut notes = Vec::new();
    if let Some(note) = source_note(translation.source) {
        notes.push(note.to_owned());
    }
    if let Some(note) = cut_note(&text, translator.free_text_limit()) {
        notes.push(note);
    }

    let mut embed = serenity::CreateEmbed::new()
        .title(format!("Translation to {}", target.name))
        .color(DEFAULT_EMBED_COLOR)
        .field(
            "Original",
            escape_mentions(&truncate_chars(&text, EMBED_FIELD_MAX_CHARS)),
            false,
        )
        .field(
            "Translated",
            escape_mentions(&truncate_chars(&translation.text, EMBED_FIELD_MAX_CHARS)),
            false,
        )
        .footer(requested_by_footer(ctx.author()));

    if !notes.is_empty() {
        embed = embed.description(format!("*{}*", notes.join(" · ")));
    }

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

fn source_note(source: TranslationSource) -> Option<&'static str> {
    match source {
        TranslationSource::Llm => None,
        TranslationSource::Cache => Some("cached"),
        TranslationSource::Fallback => Some("approximate, translation service unavailable"),
        TranslationSource::Unchanged => Some("unchanged"),
    }
}

/// Tell the user when only the start of their text was translated.
fn cut_note(text: &str, limit: usize) -> Option<String> {
    (text.trim().chars().count() > limit)
        .then(|| format!("only the first {limit} characters were translated"))
}

#[cfg(test)]
mod tests {
    use super::cut_note;

    #[test]
    fn long_text_gets_a_cut_note() {
        assert_eq!(cut_note("  short  ", 5), None);
        assert_eq!(
            cut_note("abcdefgh", 5).as_deref(),
            Some("only the first 5 characters were translated")
        );
    }
}
