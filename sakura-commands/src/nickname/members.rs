use poise::serenity_prelude as serenity;
use tracing::{info, warn};

use sakura_translate::{Translation, TranslationSource, Translator};
use sakura_utils::batch::ItemOutcome;
use sakura_utils::formatting::truncate_nickname;
use sakura_utils::permissions::{RoleHierarchy, is_missing_permissions};

const MEMBER_PAGE_SIZE: u64 = 1000;

/// Page through every member of a guild via REST.
pub async fn fetch_all_members(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
) -> anyhow::Result<Vec<serenity::Member>> {
    let mut members = Vec::new();
    let mut after = None;

    loop {
        let page = guild_id.members(http, Some(MEMBER_PAGE_SIZE), after).await?;
        let page_len = page.len();
        after = page.last().map(|member| member.user.id);
        members.extend(page);

        if (page_len as u64) < MEMBER_PAGE_SIZE {
            break;
        }
    }

    Ok(members)
}

/// The nickname to apply for a translation, or `None` when nothing would change.
pub fn planned_nickname(current: &str, translation: &Translation) -> Option<String> {
    if translation.source == TranslationSource::Unchanged {
        return None;
    }

    let nickname = truncate_nickname(&translation.text);
    (!nickname.is_empty() && nickname != current).then_some(nickname)
}

/// Translate one member's display name and apply it as their nickname.
pub async fn translate_member(
    http: &serenity::Http,
    translator: &Translator,
    hierarchy: &RoleHierarchy,
    guild_id: serenity::GuildId,
    member: &serenity::Member,
    language: &str,
) -> anyhow::Result<ItemOutcome> {
    let current = member.display_name().to_owned();

    if member.user.bot {
        return Ok(ItemOutcome::skipped(format!("Skipped bot {current}")));
    }

    if !hierarchy.can_manage(member.user.id, &member.roles) {
        return Ok(ItemOutcome::skipped(format!(
            "Cannot modify {current} (higher role)"
        )));
    }

    let translation = translator.translate(&current, language).await;
    let Some(nickname) = planned_nickname(&current, &translation) else {
        return Ok(ItemOutcome::skipped(format!(
            "No translation needed for {current}"
        )));
    };

    let edit = serenity::EditMember::new().nickname(&nickname);
    match guild_id.edit_member(http, member.user.id, edit).await {
        Ok(_) => {
            info!(
                guild_id = guild_id.get(),
                user_id = member.user.id.get(),
                from = %current,
                to = %nickname,
                source = ?translation.source,
                "nickname translated"
            );
            Ok(ItemOutcome::success(format!("Changed {current} → {nickname}")))
        }
        Err(source) if is_missing_permissions(&source) => {
            warn!(user_id = member.user.id.get(), "missing permission to rename member");
            Ok(ItemOutcome::failed(format!(
                "Missing permissions to change {current}'s nickname"
            )))
        }
        Err(source) => Err(source.into()),
    }
}

/// Clear one member's nickname.
pub async fn reset_member(
    http: &serenity::Http,
    hierarchy: &RoleHierarchy,
    guild_id: serenity::GuildId,
    member: &serenity::Member,
) -> anyhow::Result<ItemOutcome> {
    let Some(nickname) = member.nick.as_deref() else {
        return Ok(ItemOutcome::skipped(format!(
            "No nickname to reset for {}",
            member.user.name
        )));
    };

    if !hierarchy.can_manage(member.user.id, &member.roles) {
        return Ok(ItemOutcome::skipped(format!(
            "Cannot modify {nickname} (higher role)"
        )));
    }

    let edit = serenity::EditMember::new().nickname("");
    match guild_id.edit_member(http, member.user.id, edit).await {
        Ok(_) => {
            info!(
                guild_id = guild_id.get(),
                user_id = member.user.id.get(),
                from = %nickname,
                "nickname reset"
            );
            Ok(ItemOutcome::success(format!(
                "Reset {nickname} → {}",
                member.user.name
            )))
        }
        Err(source) if is_missing_permissions(&source) => Ok(ItemOutcome::failed(format!(
            "Missing permissions to reset {nickname}'s nickname"
        ))),
        Err(source) => Err(source.into()),
    }
}

#[cfg(test)]
mod tests {
    use sakura_translate::{Translation, TranslationSource};

    use super::planned_nickname;

    fn translation(text: &str, source: TranslationSource) -> Translation {
        Translation {
            text: text.to_owned(),
            source,
        }
    }

    #[test]
    fn applies_new_names() {
        assert_eq!(
            planned_nickname("Alice", &translation("アリス", TranslationSource::Llm)),
            Some("アリス".to_owned())
        );
        assert_eq!(
            planned_nickname("ken", &translation("けん", TranslationSource::Fallback)),
            Some("けん".to_owned())
        );
    }

    #[test]
    fn skips_unchanged_results() {
        assert_eq!(
            planned_nickname("さくら", &translation("さくら", TranslationSource::Unchanged)),
            None
        );
        assert_eq!(
            planned_nickname("アリス", &translation("アリス", TranslationSource::Cache)),
            None
        );
        assert_eq!(planned_nickname("x", &translation("  ", TranslationSource::Llm)), None);
    }

    #[test]
    fn long_results_are_truncated() {
        let long = "ア".repeat(40);
        let planned = planned_nickname("Alice", &translation(&long, TranslationSource::Llm));
        assert_eq!(planned.map(|name| name.chars().count()), Some(32));
    }
}
