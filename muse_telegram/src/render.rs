use std::path::Path;

use muse_dialog::{Menu, Reply};
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, InputFile, ParseMode};
use tracing::{debug, warn};

use crate::Result;

const MAX_MESSAGE_CHARS: usize = 4096;
const MAX_CAPTION_CHARS: usize = 1024;

pub fn keyboard(menu: &Menu) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(menu.rows.iter().map(|row| {
        row.iter()
            .map(|button| {
                InlineKeyboardButton::callback(button.label.clone(), button.token.to_string())
            })
            .collect::<Vec<_>>()
    }))
}

/// Split text into chunks Telegram accepts, preferring line breaks.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let mut rest = line;
        loop {
            let room = limit - current_len;
            let rest_len = rest.chars().count();
            if rest_len <= room {
                current.push_str(rest);
                current_len += rest_len;
                break;
            }
            if current_len > 0 {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
                continue;
            }
            let split_at = rest
                .char_indices()
                .nth(limit)
                .map_or(rest.len(), |(index, _)| index);
            chunks.push(rest[..split_at].to_string());
            rest = &rest[split_at..];
        }
    }

    if !current.is_empty() || chunks.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Render generated text as Telegram HTML: `**bold**` spans become `<b>`,
/// everything else is escaped. An unpaired `**` is kept literally.
pub fn to_html(text: &str) -> String {
    let segments: Vec<&str> = text.split("**").collect();
    let paired = segments.len() % 2 == 1;
    let last = segments.len() - 1;

    let mut html = String::with_capacity(text.len());
    for (index, segment) in segments.iter().enumerate() {
        let escaped = escape_html(segment);
        if index % 2 == 0 {
            html.push_str(&escaped);
        } else if paired || index < last {
            html.push_str("<b>");
            html.push_str(&escaped);
            html.push_str("</b>");
        } else {
            html.push_str("**");
            html.push_str(&escaped);
        }
    }
    html
}

/// A local image file for the reply, if it exists.
fn photo_file(reference: &str) -> Option<&Path> {
    let path = Path::new(reference);
    if path.is_file() {
        Some(path)
    } else {
        debug!("Image {reference} not found, sending text only");
        None
    }
}

async fn send_text(bot: &Bot, chat_id: ChatId, text: &str, menu: Option<&Menu>) -> Result<()> {
    let chunks = split_message(text, MAX_MESSAGE_CHARS);
    let last = chunks.len().saturating_sub(1);

    for (index, chunk) in chunks.into_iter().enumerate() {
        let markup = menu.filter(|_| index == last).map(keyboard);

        let mut request = bot
            .send_message(chat_id, to_html(&chunk))
            .parse_mode(ParseMode::Html);
        if let Some(markup) = markup.clone() {
            request = request.reply_markup(markup);
        }
        if let Err(e) = request.await {
            warn!("Formatted message rejected, resending as plain text: {e}");
            let mut request = bot.send_message(chat_id, chunk);
            if let Some(markup) = markup {
                request = request.reply_markup(markup);
            }
            request.await?;
        }
    }
    Ok(())
}

/// Send one reply. A photo that cannot be sent falls back to plain text.
pub async fn send_reply(bot: &Bot, chat_id: ChatId, reply: &Reply) -> Result<()> {
    let photo = reply
        .photo
        .as_deref()
        .and_then(photo_file)
        .filter(|_| reply.text.chars().count() <= MAX_CAPTION_CHARS);

    if let Some(path) = photo {
        let mut request = bot
            .send_photo(chat_id, InputFile::file(path))
            .caption(to_html(&reply.text))
            .parse_mode(ParseMode::Html);
        if let Some(menu) = &reply.menu {
            request = request.reply_markup(keyboard(menu));
        }
        match request.await {
            Ok(_) => return Ok(()),
            Err(e) => warn!("Failed to send image {}: {e}", path.display()),
        }
    }

    send_text(bot, chat_id, &reply.text, reply.menu.as_ref()).await
}

pub async fn send_replies(bot: &Bot, chat_id: ChatId, replies: &[Reply]) -> Result<()> {
    for reply in replies {
        send_reply(bot, chat_id, reply).await?;
    }
    Ok(())
}
