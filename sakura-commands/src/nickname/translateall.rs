use std::time::Duration;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::nickname::bulk::run_member_batch;
use crate::nickname::embeds::{
    bulk_confirmation_embed, guild_only_message, job_running_message, missing_permission_message,
};
use crate::nickname::members::{fetch_all_members, translate_member};
use sakura_core::{Context, Error};
use sakura_utils::confirmation::{CONFIRMATION_TIMEOUT, Confirmation, confirm_bulk_action};
use sakura_utils::permissions::{RoleHierarchy, has_user_permission};

pub const META: CommandMeta = CommandMeta {
    name: "translateall",
    desc: "Translate every member's name in the server.",
    category: "nickname",
    usage: "!translateall [chunk_size] [delay_seconds] [language]",
};

const MAX_CHUNK_DELAY_SECS: f64 = 60.0;

#[poise::command(
    prefix_command,
    slash_command,
    category = "Nickname",
    aliases("tall"),
    guild_cooldown = 30
)]
pub async fn translateall(
    ctx: Context<'_>,
    #[description = "Members per chunk"] chunk_size: Option<usize>,
    #[description = "Seconds to wait between chunks"] delay: Option<f64>,
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
        serenity::Permissions::ADMINISTRATOR,
    )
    .await?
    {
        ctx.say(missing_permission_message("Administrator")).await?;
        return Ok(());
    }

    let data = ctx.data();
    let language = match language {
        Some(language) => language,
        None => data.guild_language(guild_id.get()).await?,
    };

    let mut options = data.batch.clone();
    if let Some(chunk_size) = chunk_size {
        options = options.with_chunk_size(chunk_size);
    }
    if let Some(delay) = delay.filter(|secs| secs.is_finite() && *secs >= 0.0) {
        options = options.with_chunk_delay(Duration::from_secs_f64(delay.min(MAX_CHUNK_DELAY_SECS)));
    }

    let Some(guard) = data.batch_jobs.start(guild_id.get()) else {
        ctx.say(job_running_message()).await?;
        return Ok(());
    };

    let members = fetch_all_members(ctx.http(), guild_id)
        .await?
        .into_iter()
        .filter(|member| !member.user.bot)
        .collect::<Vec<_>>();

    let prompt = bulk_confirmation_embed(
        &format!("translate nicknames to **{language}**"),
        members.len(),
    );
    let Confirmation::Confirmed(message) =
        confirm_bulk_action(ctx, prompt, CONFIRMATION_TIMEOUT).await?
    else {
        return Ok(());
    };

    let hierarchy = RoleHierarchy::fetch(ctx.http(), guild_id, ctx.framework().bot_id).await?;
    let http = ctx.http();
    let translator = data.translator.as_ref();
    let hierarchy = &hierarchy;
    let language = language.as_str();

    run_member_batch(
        ctx,
        &guard,
        message,
        members,
        &options,
        "Nickname translation",
        move |member| async move {
            translate_member(http, translator, hierarchy, guild_id, &member, language).await
        },
    )
    .await
}
