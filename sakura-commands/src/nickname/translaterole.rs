use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::nickname::bulk::run_member_batch;
use crate::nickname::embeds::{
    guild_only_message, job_running_message, missing_permission_message, usage_message,
};
use crate::nickname::members::{fetch_all_members, translate_member};
use sakura_core::{Context, Error};
use sakura_utils::parse::{extract_language_option, extract_quoted_text};
use sakura_utils::permissions::{RoleHierarchy, has_user_permission};

pub const META: CommandMeta = CommandMeta {
    name: "translaterole",
    desc: "Translate the names of every member holding a role.",
    category: "nickname",
    usage: "!translaterole <\"Role Name\"|@role> [language=Language]",
};

#[poise::command(prefix_command, slash_command, category = "Nickname", guild_cooldown = 30)]
pub async fn translaterole(
    ctx: Context<'_>,
    #[description = "Role name or mention, optionally followed by language=<Language>"]
    #[rest]
    args: Option<String>,
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

    let Some((role_query, language)) = args.as_deref().and_then(parse_role_args) else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let guild = guild_id.to_partial_guild(ctx.http()).await?;
    let Some(role) = find_role(&guild, &role_query) else {
        ctx.say(format!("Role '{role_query}' not found.")).await?;
        return Ok(());
    };
    let role_id = role.id;
    let role_name = role.name.clone();

    let data = ctx.data();
    let language = match language {
        Some(language) => language,
        None => data.guild_language(guild_id.get()).await?,
    };

    let Some(guard) = data.batch_jobs.start(guild_id.get()) else {
        ctx.say(job_running_message()).await?;
        return Ok(());
    };

    let members = fetch_all_members(ctx.http(), guild_id)
        .await?
        .into_iter()
        .filter(|member| !member.user.bot && member.roles.contains(&role_id))
        .collect::<Vec<_>>();

    if members.is_empty() {
        ctx.say(format!("No members found with the role '{role_name}'."))
            .await?;
        return Ok(());
    }

    let message = ctx
        .say(format!(
            "🔄 Processing {} members with role '{role_name}'...",
            members.len()
        ))
        .await?
        .into_message()
        .await?;

    let hierarchy = RoleHierarchy::fetch(ctx.http(), guild_id, ctx.framework().bot_id).await?;
    let http = ctx.http();
    let translator = data.translator.as_ref();
    let hierarchy = &hierarchy;
    let language = language.as_str();
    let title = format!("Role: {role_name}");

    run_member_batch(
        ctx,
        &guard,
        message,
        members,
        &data.batch,
        &title,
        move |member| async move {
            translate_member(http, translator, hierarchy, guild_id, &member, language).await
        },
    )
    .await
}

/// Split `"Role Name" language=Spanish` style arguments into the role query
/// and optional language.
fn parse_role_args(args: &str) -> Option<(String, Option<String>)> {
    let language = extract_language_option(args);

    let role = match extract_quoted_text(args) {
        Some(quoted) => quoted.trim(),
        None => args.split("language=").next().unwrap_or_default().trim(),
    };

    (!role.is_empty()).then(|| (role.to_owned(), language))
}

fn find_role<'a>(guild: &'a serenity::PartialGuild, query: &str) -> Option<&'a serenity::Role> {
    let mention_id = query
        .strip_prefix("<@&")
        .and_then(|rest| rest.strip_suffix('>'))
        .unwrap_or(query)
        .parse::<u64>()
        .ok()
        .filter(|id| *id != 0);

    mention_id
        .and_then(|id| guild.roles.get(&serenity::RoleId::new(id)))
        .or_else(|| {
            guild
                .roles
                .values()
                .find(|role| role.name.eq_ignore_ascii_case(query))
        })
}

#[cfg(test)]
mod tests {
    use super::parse_role_args;

    #[test]
    fn quoted_role_with_language() {
        assert_eq!(
            parse_role_args("\"New Members\" language=Spanish"),
            Some(("New Members".to_owned(), Some("Spanish".to_owned())))
        );
    }

    #[test]
    fn unquoted_role_stops_at_language() {
        assert_eq!(
            parse_role_args("Regulars language=Korean"),
            Some(("Regulars".to_owned(), Some("Korean".to_owned())))
        );
        assert_eq!(parse_role_args("<@&42>"), Some(("<@&42>".to_owned(), None)));
    }

    #[test]
    fn missing_role_is_rejected() {
        assert_eq!(parse_role_args("language=Korean"), None);
        assert_eq!(parse_role_args("   "), None);
    }
}
