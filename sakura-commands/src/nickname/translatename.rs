use std::borrow::Cow;

use poise::serenity_prelude as serenity;
use tracing::error;

use crate::CommandMeta;
use crate::nickname::embeds::{guild_only_message, higher_role_message, missing_permission_message};
use crate::nickname::members::translate_member;
use sakura_core::{Context, Error};
use sakura_translate::{Language, script::is_japanese};
use sakura_utils::batch::ItemOutcome;
use sakura_utils::permissions::{RoleHierarchy, has_user_permission};

pub const META: CommandMeta = CommandMeta {
    name: "translatename",
    desc: "Translate a member's name and set it as their nickname.",
    category: "nickname",
    usage: "!translatename [member] [language]",
};

#[poise::command(
    prefix_command,
    slash_command,
    category = "Nickname",
    aliases("tn"),
    user_cooldown = 5
)]
pub async fn translatename(
    ctx: Context<'_>,
    #[description = "Member to rename (defaults to you)"] member: Option<serenity::Member>,
    #[description = "Target language"] language: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !has_user_permission(
        ctx.http(),
        guild_id,
        ctx.author().id,
        serenity::Permissions::MANAGE_NICKNAMES,
    )
    .await?
    {
        ctx.say(missing_permission_message("Manage Nicknames")).await?;
        return Ok(());
    }

    let target = match member {
        Some(member) => member,
        None => match ctx.author_member().await {
            Some(member) => Cow::into_owned(member),
            None => {
                ctx.say("I couldn't look up your server profile.").await?;
                return Ok(());
            }
        },
    };

    if target.user.bot {
        ctx.say("I don't translate bot names.").await?;
        return Ok(());
    }

    let data = ctx.data();
    let language = match language {
        Some(language) => language,
        None => data.guild_language(guild_id.get()).await?,
    };

    let current = target.display_name().to_owned();
    if Language::resolve(&language).is_japanese() && is_japanese(&current) {
        ctx.say(format!("{current}'s name is already in Japanese."))
            .await?;
        return Ok(());
    }

    let hierarchy = RoleHierarchy::fetch(ctx.http(), guild_id, ctx.framework().bot_id).await?;
    if !hierarchy.can_manage(target.user.id, &target.roles) {
        ctx.say(higher_role_message(&format!("<@{}>", target.user.id)))
            .await?;
        return Ok(());
    }

    let status = ctx.say(format!("Translating {current}'s name...")).await?;

    let outcome = translate_member(
        ctx.http(),
        &data.translator,
        &hierarchy,
        guild_id,
        &target,
        &language,
    )
    .await
    .unwrap_or_else(|source| {
        error!(?source, "failed to translate member name");
        ItemOutcome::failed(format!("Error changing {current}'s nickname: {source:#}"))
    });

    status
        .edit(ctx, poise::CreateReply::default().content(outcome.message))
        .await?;

    Ok(())
}
