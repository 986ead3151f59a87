mod events;

use std::env;
use std::sync::Arc;

use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use tracing::{debug, error, info};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use rustls::crypto::ring::default_provider;

use sakura_core::{BatchJobs, ChatbotOptions, Data, Error};
use sakura_database::Database;
use sakura_llm::{ChatCompleter, LlmService};
use sakura_translate::{Translator, TranslatorConfig};
use sakura_utils::batch::BatchOptions;
use sakura_utils::env::{env_bool, env_string};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(filter_fn(|metadata| {
        let target = metadata.target();

        let within_info_level = *metadata.level() <= tracing::Level::INFO;
        if !within_info_level {
            return false;
        }

        !(target.starts_with("serenity::gateway::bridge::shard_manager")
            || target.starts_with("serenity::gateway::bridge::shard_runner"))
    }));

    tracing_subscriber::registry().with(fmt_layer).init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    dotenvy::dotenv().ok();

    let token = env::var("DISCORD_TOKEN").context("missing DISCORD_TOKEN")?;
    let database_url = env::var("DATABASE_URL").context("missing DATABASE_URL")?;
    let guild_id = env_string("DISCORD_GUILD_ID")
        .map(|raw| raw.parse::<u64>())
        .transpose()
        .context("DISCORD_GUILD_ID must be a numeric guild id")?;

    let db = Database::connect(&database_url).await?;

    if env_bool("AUTO_RUN_MIGRATIONS", true) {
        db.run_migrations().await?;
    } else {
        info!("Auto migrations disabled (set AUTO_RUN_MIGRATIONS=true to run at startup).");
    }

    let llm = LlmService::from_env_optional()?;
    match &llm {
        Some(service) => info!(
            provider = service.provider().as_str(),
            model = service.model(),
            "LLM integration enabled."
        ),
        None => info!(
            "LLM integration disabled (no provider configured or LLM_ENABLED=false); using romanization fallback."
        ),
    }

    let client = llm
        .clone()
        .map(|service| Arc::new(service) as Arc<dyn ChatCompleter>);
    let translator_config = TranslatorConfig::from_env();
    info!(
        default_language = %translator_config.default_language,
        cache_size = translator_config.cache_size,
        max_calls_per_window = translator_config.throttle.max_calls_per_window,
        policy = ?translator_config.throttle.policy,
        "Translator configured."
    );
    let translator = Arc::new(Translator::new(client, translator_config));

    let batch = BatchOptions::from_env();
    let auto_translate_default = env_bool("FEATURE_AUTO_TRANSLATION", true);
    let chatbot = ChatbotOptions::from_env();

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: sakura_commands::commands(),
            event_handler: |ctx, event, framework, data| {
                Box::pin(handle_event(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(sakura_utils::COMMAND_PREFIX.to_string()),
                mention_as_prefix: false,
                ..Default::default()
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                info!("Sakura is ready!");

                match guild_id {
                    Some(guild_id) => {
                        poise::builtins::register_in_guild(
                            ctx,
                            &framework.options().commands,
                            serenity::GuildId::new(guild_id),
                        )
                        .await?;
                        info!(guild_id, "Slash commands registered in guild.");
                    }
                    None => {
                        poise::builtins::register_globally(ctx, &framework.options().commands)
                            .await?;
                        info!("Slash commands registered globally.");
                    }
                }

                Ok(Data {
                    db,
                    llm,
                    translator,
                    batch,
                    batch_jobs: BatchJobs::default(),
                    chatbot,
                    auto_translate_default,
                })
            })
        })
        .build();

    info!("Sakura is connecting...");

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    client.start().await?;
    Ok(())
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(?error, command = %ctx.command().qualified_name, "command error");

            let embed = serenity::CreateEmbed::new()
                .title("Command Error")
                .description("Something went wrong while running this command.")
                .color(sakura_utils::embed::DEFAULT_EMBED_COLOR);

            let _ = ctx
                .send(poise::CreateReply::default().ephemeral(true).embed(embed))
                .await;
        }
        poise::FrameworkError::ArgumentParse { ctx, input, .. } => {
            let usage = format!("Usage: `!{}`", ctx.command().qualified_name);
            let description = if let Some(input) = input {
                format!("Invalid argument: `{}`\n{}", input, usage)
            } else {
                format!("Missing required argument.\n{}", usage)
            };

            let _ = ctx.say(description).await;
        }
        poise::FrameworkError::CooldownHit {
            remaining_cooldown,
            ctx,
            ..
        } => {
            let _ = ctx
                .send(
                    poise::CreateReply::default()
                        .ephemeral(true)
                        .content(format!(
                            "This command is on cooldown. Try again in {:.1}s.",
                            remaining_cooldown.as_secs_f32()
                        )),
                )
                .await;
        }
        poise::FrameworkError::UnknownCommand { .. } => {
            debug!("unknown command invocation");
        }
        other => {
            error!(?other, "framework error");
        }
    }
}

async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::GuildMemberAddition { new_member } => {
            events::member_join::handle_member_join(ctx, data, new_member).await;
        }
        serenity::FullEvent::GuildMemberRemoval {
            guild_id,
            user,
            member_data_if_available,
        } => {
            events::goodbye::handle_member_leave(
                ctx,
                data,
                *guild_id,
                user,
                member_data_if_available.as_ref(),
            )
            .await;
        }
        serenity::FullEvent::Message { new_message } => {
            events::chatbot::handle_message(ctx, data, new_message).await;
        }
        _ => {}
    }

    Ok(())
}
