use poise::serenity_prelude as serenity;

/// Default embed color used across the bot UI.
pub const DEFAULT_EMBED_COLOR: u32 = 0x5C_DB_F0;
/// Color for completed operations.
pub const SUCCESS_EMBED_COLOR: u32 = 0x2E_CC_71;
/// Color for cancelled or partially failed operations.
pub const WARNING_EMBED_COLOR: u32 = 0xE6_7E_22;

/// Build a titled embed with the default styling.
pub fn titled_embed(title: impl Into<String>, description: impl Into<String>) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(title)
        .color(DEFAULT_EMBED_COLOR)
        .description(description)
}

/// Footer crediting the invoking user.
pub fn requested_by_footer(user: &serenity::User) -> serenity::CreateEmbedFooter {
    serenity::CreateEmbedFooter::new(format!("Requested by {}", user.name)).icon_url(user.face())
}
