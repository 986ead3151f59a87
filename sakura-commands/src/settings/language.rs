use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::nickname::embeds::{guild_only_message, missing_permission_message};
use sakura_core::{Context, Error};
use sakura_database::impls::translation_config::set_guild_language;
use sakura_translate::Language;
use sakura_utils::embed::{DEFAULT_EMBED_COLOR, SUCCESS_EMBED_COLOR, requested_by_footer};
use sakura_utils::permissions::has_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "language",
    desc: "View or change the server's translation language.",
    category: "settings",
    usage: "!language [new_language]",
};

#[poise::command(prefix_command, slash_command, category = "Settings")]
pub async fn language(
    ctx: Context<'_>,
    #[description = "New default language"] new_language: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let data = ctx.data();

    let Some(new_language) = new_language
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
    else {
        let current = data.guild_language(guild_id.get()).await?;
        let embed = serenity::CreateEmbed::new()
            .title("Translation Language")
            .description(format!(
                "The current translation language is **{current}**.\n\
                 Use `!language <language>` to change it."
            ))
            .color(DEFAULT_EMBED_COLOR);
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
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

    let resolved = Language::resolve(new_language);
    set_guild_language(&data.db, guild_id.get(), &resolved.name).await?;

    let embed = serenity::CreateEmbed::new()
        .title("Translation Language Updated")
        .description(format!(
            "Nicknames will now be translated to **{}**.",
            resolved.name
        ))
        .color(SUCCESS_EMBED_COLOR)
        .footer(requested_by_footer(ctx.author()));
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
