use muse_dialog::{EventKind, InboundEvent};
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, ChatAction, Message, User};
use tracing::{debug, error, info, warn};

use crate::render::send_replies;
use crate::{Error, Result, TelegramBot};

fn user_id(user: &User) -> Result<i64> {
    i64::try_from(user.id.0).map_err(|_| Error::InvalidUserId(user.id.0))
}

fn username(user: &User) -> &str {
    user.username.as_deref().unwrap_or("unknown")
}

/// Route one event and deliver its replies. A failed event is logged and
/// the user gets no reply for it.
async fn dispatch(bot: &TelegramBot, chat_id: ChatId, event: InboundEvent) -> Result<()> {
    match bot.router.handle(event).await {
        Ok(replies) => send_replies(&bot.bot, chat_id, &replies).await,
        Err(e) => {
            error!("Event in chat {chat_id} aborted: {e}");
            Err(e.into())
        }
    }
}

async fn show_typing(bot: &TelegramBot, chat_id: ChatId) {
    if let Err(e) = bot.bot.send_chat_action(chat_id, ChatAction::Typing).await {
        debug!("Failed to send typing action: {e}");
    }
}

/// Handle a command or a free-text message.
pub async fn handle_message(bot: TelegramBot, msg: Message) -> Result<()> {
    let chat_id = msg.chat.id;
    if !bot.is_allowed(chat_id.0) {
        warn!("Ignoring message from unauthorized chat {chat_id}");
        return Ok(());
    }

    let (Some(user), Some(text)) = (msg.from.as_ref(), msg.text()) else {
        debug!("Ignoring non-text message in chat {chat_id}");
        return Ok(());
    };

    let kind = EventKind::from_message(text, bot.username.as_deref());
    match &kind {
        EventKind::Command(command) => {
            info!("[@{}] Command: /{}", username(user), command.name());
        }
        EventKind::UnknownCommand(word) => {
            debug!("[@{}] Ignoring command {word}", username(user));
            return Ok(());
        }
        _ => {
            info!("[@{}] Message: {text}", username(user));
            show_typing(&bot, chat_id).await;
        }
    }

    let event = InboundEvent::new(user_id(user)?, kind).with_display_name(user.first_name.clone());
    dispatch(&bot, chat_id, event).await
}

/// Handle an inline button press.
pub async fn handle_callback(bot: TelegramBot, query: CallbackQuery) -> Result<()> {
    if let Err(e) = bot.bot.answer_callback_query(query.id.clone()).await {
        debug!("Failed to answer callback query: {e}");
    }

    let chat_id = query
        .regular_message()
        .map_or_else(|| ChatId::from(query.from.id), |message| message.chat.id);
    if !bot.is_allowed(chat_id.0) {
        warn!("Ignoring button from unauthorized chat {chat_id}");
        return Ok(());
    }

    let Some(data) = query.data.clone() else {
        return Ok(());
    };

    info!("[@{}] Button: {data}", username(&query.from));
    show_typing(&bot, chat_id).await;

    let event = InboundEvent::new(user_id(&query.from)?, EventKind::ButtonPress(data))
        .with_display_name(query.from.first_name.clone());
    dispatch(&bot, chat_id, event).await
}
