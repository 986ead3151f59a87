use poise::serenity_prelude as serenity;
use tracing::{debug, error, info, warn};

use sakura_core::Data;
use sakura_database::{GreetingChannel, GuildTranslationConfig};
use sakura_database::impls::translation_config::get_translation_config;
use sakura_translate::TranslationSource;
use sakura_utils::formatting::truncate_nickname;
use sakura_utils::permissions::{RoleHierarchy, is_missing_permissions};

use crate::events::welcome::send_welcome;

pub async fn handle_member_join(ctx: &serenity::Context, data: &Data, member: &serenity::Member) {
    if member.user.bot {
        return;
    }

    let guild_id = member.guild_id;
    info!(
        guild_id = guild_id.get(),
        user_id = member.user.id.get(),
        name = %member.user.name,
        "member joined"
    );

    let config = match get_translation_config(&data.db, guild_id.get()).await {
        Ok(config) => config,
        Err(source) => {
            error!(?source, guild_id = guild_id.get(), "failed to load translation config");
            GuildTranslationConfig::default()
        }
    };
    let language = config
        .language_or(data.translator.default_language())
        .to_owned();

    let translated = if config.auto_translate_or(data.auto_translate_default) {
        auto_translate(ctx, data, member, &language).await
    } else {
        debug!(guild_id = guild_id.get(), "auto-translation disabled for guild");
        None
    };

    if let Some(channel_id) = config.channel_for(GreetingChannel::Welcome) {
        send_welcome(ctx, data, member, channel_id, translated.as_deref(), &language).await;
    }
}

/// Translate and apply the new member's nickname. Returns the applied name.
async fn auto_translate(
    ctx: &serenity::Context,
    data: &Data,
    member: &serenity::Member,
    language: &str,
) -> Option<String> {
    let guild_id = member.guild_id;
    let user_id = member.user.id;
    let current = member.display_name().to_owned();

    let bot_id = ctx.cache.current_user().id;
    let hierarchy = match RoleHierarchy::fetch(&ctx.http, guild_id, bot_id).await {
        Ok(hierarchy) => hierarchy,
        Err(source) => {
            warn!(?source, guild_id = guild_id.get(), "failed to load role hierarchy");
            return None;
        }
    };

    if !hierarchy.can_manage(user_id, &member.roles) {
        info!(user_id = user_id.get(), "skipping auto-translation, member outranks bot");
        return None;
    }

    let translation = data.translator.translate(&current, language).await;
    if translation.source == TranslationSource::Unchanged {
        debug!(user_id = user_id.get(), name = %current, "name left unchanged");
        return None;
    }

    let nickname = truncate_nickname(&translation.text);
    if nickname.is_empty() || nickname == current {
        return None;
    }

    let edit = serenity::EditMember::new().nickname(&nickname);
    match guild_id.edit_member(&ctx.http, user_id, edit).await {
        Ok(_) => {
            info!(
                guild_id = guild_id.get(),
                user_id = user_id.get(),
                from = %current,
                to = %nickname,
                source = ?translation.source,
                "auto-translated nickname"
            );
            Some(nickname)
        }
        Err(source) if is_missing_permissions(&source) => {
            warn!(user_id = user_id.get(), "no permission to change nickname");
            None
        }
        Err(source) => {
            error!(?source, user_id = user_id.get(), "failed to change nickname");
            None
        }
    }
}
