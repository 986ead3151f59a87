use std::time::Duration;

use poise::serenity_prelude as serenity;

/// How long a bulk-operation prompt waits for the invoker to press a button.
pub const CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(30);

pub enum Confirmation {
    /// The prompt message, stripped of its buttons, ready to be reused as a
    /// status message.
    Confirmed(serenity::Message),
    Declined,
    TimedOut,
}

/// Ask the invoking user to confirm a bulk operation with Confirm/Decline buttons.
pub async fn confirm_bulk_action<U, E>(
    ctx: poise::Context<'_, U, E>,
    embed: serenity::CreateEmbed,
    timeout: Duration,
) -> Result<Confirmation, serenity::Error>
where
    U: Send + Sync,
    E: Send + Sync,
{
    let ctx_id = ctx.id();
    let confirm_id = format!("{}_confirm", ctx_id);
    let decline_id = format!("{}_decline", ctx_id);

    let reply = ctx
        .send(
            poise::CreateReply::default()
                .embed(embed)
                .components(vec![serenity::CreateActionRow::Buttons(vec![
                    serenity::CreateButton::new(&confirm_id)
                        .label("Confirm")
                        .style(serenity::ButtonStyle::Danger),
                    serenity::CreateButton::new(&decline_id)
                        .label("Decline")
                        .style(serenity::ButtonStyle::Secondary),
                ])]),
        )
        .await?;

    let mut message = reply.message().await?.into_owned();
    let interaction = message
        .await_component_interaction(ctx)
        .author_id(ctx.author().id)
        .timeout(timeout)
        .await;

    let Some(interaction) = interaction else {
        close_prompt(ctx.http(), &mut message, "Timed out waiting for confirmation.").await?;
        return Ok(Confirmation::TimedOut);
    };

    interaction
        .create_response(ctx.http(), serenity::CreateInteractionResponse::Acknowledge)
        .await?;

    if interaction.data.custom_id == decline_id {
        close_prompt(ctx.http(), &mut message, "Cancelled.").await?;
        return Ok(Confirmation::Declined);
    }

    message
        .edit(
            ctx.http(),
            serenity::EditMessage::new()
                .content("Starting...")
                .components(vec![]),
        )
        .await?;

    Ok(Confirmation::Confirmed(message))
}

async fn close_prompt(
    http: &serenity::Http,
    message: &mut serenity::Message,
    text: &str,
) -> Result<(), serenity::Error> {
    message
        .edit(
            http,
            serenity::EditMessage::new()
                .content(text)
                .embeds(vec![])
                .components(vec![]),
        )
        .await
}
