use twilight_model::channel::message::embed::Embed;
use twilight_util::builder::embed::{EmbedBuilder, EmbedFooterBuilder};

/// Default embed color used across the bot UI.
pub const DEFAULT_EMBED_COLOR: u32 = 0x4E_6E_8C;

/// Build a standard embed with consistent styling.
pub fn build_basic_embed(title: &str, description: impl Into<String>) -> anyhow::Result<Embed> {
    let embed = EmbedBuilder::new()
        .title(title)
        .color(DEFAULT_EMBED_COLOR)
        .description(description)
        .validate()?
        .build();

    Ok(embed)
}

/// Build a standard embed with a `Page x/y` footer.
///
/// `page` is 0-based; the footer renders it 1-based. An optional note is
/// appended after the page indicator.
pub fn build_page_embed(
    title: &str,
    description: impl Into<String>,
    page: usize,
    total_pages: usize,
    footer_note: Option<&str>,
) -> anyhow::Result<Embed> {
    let total_pages = total_pages.max(1);
    let footer_text = match footer_note {
        Some(note) if !note.is_empty() => {
            format!("Page {}/{} • {}", page + 1, total_pages, note)
        }
        _ => format!("Page {}/{}", page + 1, total_pages),
    };

    let embed = EmbedBuilder::new()
        .title(title)
        .color(DEFAULT_EMBED_COLOR)
        .description(description)
        .footer(EmbedFooterBuilder::new(footer_text).build())
        .validate()?
        .build();

    Ok(embed)
}
