use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::nickname::embeds::{guild_only_message, missing_permission_message, usage_message};
use sakura_core::{Context, Error};
use sakura_database::impls::translation_config::{get_translation_config, set_auto_translate};
use sakura_utils::parse::parse_toggle;
use sakura_utils::permissions::has_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "autotranslate",
    desc: "Enable or disable translating new members' names when they join.",
    category: "settings",
    usage: "!autotranslate <on|off|status>",
};

#[poise::command(prefix_command, slash_command, category = "Settings")]
pub async fn autotranslate(
    ctx: Context<'_>,
    #[description = "Desired state: on, off, or status"] state: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !has_user_permission(
        ctx.http(),
        guild_id,
        ctx.author().id,
        serenity::Permissions::MANAGE_GUILD,
    )
    .await?
    {
        ctx.say(missing_permission_message("Manage Server")).await?;
        return Ok(());
    }

    let Some(raw_state) = state.as_deref().map(str::trim) else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let data = ctx.data();

    if raw_state.eq_ignore_ascii_case("status") {
        let config = get_translation_config(&data.db, guild_id.get()).await?;
        let enabled = config.auto_translate_or(data.auto_translate_default);
        ctx.say(format!(
            "Auto-translation for new members is currently **{}** (language: **{}**).",
            if enabled { "enabled" } else { "disabled" },
            config.language_or(data.translator.default_language())
        ))
        .await?;
        return Ok(());
    }

    let Some(new_state) = parse_toggle(raw_state) else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    set_auto_translate(&data.db, guild_id.get(), new_state).await?;
    ctx.say(format!(
        "Auto-translation for new members is now **{}**.",
        if new_state { "enabled" } else { "disabled" }
    ))
    .await?;

    Ok(())
}
