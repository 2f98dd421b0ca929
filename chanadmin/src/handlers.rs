use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{
        CallbackQuery, ChatAction, FileId, InlineKeyboardMarkup, InputFile, ParseMode, Recipient,
        User,
    },
    utils::command::BotCommands,
};
use yoroolbot::{
    keyboard::{CallbackDataStorageTrait, pack_keyboard, unpack_callback_data},
    markdown::{MarkdownString, MarkdownStringMessage},
};

use crate::{
    commands::Command,
    conversation::{
        CallbackToken, ConversationMachine, Destination, Event, OutgoingMessage, Reply, Sender,
    },
    storages::PostMedia,
};

/// Telegram limit for media captions
const TELEGRAM_MAX_CAPTION_LENGTH: usize = 1024;

fn sender_of(user: &User) -> Sender {
    Sender {
        id: user.id.0,
        username: user.username.clone(),
        first_name: user.first_name.clone(),
    }
}

/// Largest photo size, video or document of a message
fn message_media(msg: &Message) -> Option<PostMedia> {
    if let Some(photo) = msg.photo().and_then(|sizes| sizes.last()) {
        return Some(PostMedia::Photo {
            file_id: photo.file.id.0.clone(),
        });
    }
    if let Some(video) = msg.video() {
        return Some(PostMedia::Video {
            file_id: video.file.id.0.clone(),
        });
    }
    msg.document().map(|document| PostMedia::Document {
        file_id: document.file.id.0.clone(),
    })
}

/// Handle commands, text and media messages
pub async fn handle_message(
    bot: Bot,
    msg: Message,
    machine: Arc<ConversationMachine>,
) -> ResponseResult<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let sender = sender_of(user);

    let event = if let Some(text) = msg.text() {
        // Get bot username for command filtering
        let bot_name = bot.get_me().await.ok().map(|me| me.username().to_string());
        match Command::parse(text, bot_name.as_deref().unwrap_or_default()) {
            Ok(Command::Start) => Event::Start,
            Ok(Command::Cancel) => Event::Cancel,
            Ok(Command::Help) => {
                let help = MarkdownString::escape(Command::descriptions().to_string());
                if let Err(e) = bot.send_markdown_message(msg.chat.id, help).await {
                    log::error!("Failed to send help to chat {}: {}", msg.chat.id, e);
                }
                return Ok(());
            }
            Err(_) => Event::Text(text.to_string()),
        }
    } else if let Some(media) = message_media(&msg) {
        Event::Media {
            media,
            caption: msg.caption().map(str::to_string),
        }
    } else {
        return Ok(());
    };

    log::info!("Chat {}: {:?} from user {}", msg.chat.id, event, sender.id);
    let replies = machine.handle(msg.chat.id, &sender, event).await;
    deliver(&bot, &machine.storage().callback_data(), msg.chat.id, replies).await;
    Ok(())
}

/// Handle callback queries from inline keyboard buttons
pub async fn handle_callback_query(
    bot: Bot,
    q: CallbackQuery,
    machine: Arc<ConversationMachine>,
) -> ResponseResult<()> {
    // Answer the callback query to remove the loading state
    if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
        log::error!("Failed to answer callback query: {}", e);
    }

    let Some(chat_id) = q.message.as_ref().map(|message| message.chat().id) else {
        return Ok(());
    };
    let Some(data) = &q.data else {
        return Ok(());
    };

    let callback_data = machine.storage().callback_data();
    let unpacked = unpack_callback_data(&callback_data, data).await;
    let token = match unpacked.parse::<CallbackToken>() {
        Ok(token) => token,
        Err(e) => {
            log::warn!("Chat {}: {}", chat_id, e);
            return Ok(());
        }
    };

    log::info!("Chat {}: callback {} from user {}", chat_id, token, q.from.id);
    let replies = machine
        .handle(chat_id, &sender_of(&q.from), Event::Callback(token))
        .await;
    deliver(&bot, &callback_data, chat_id, replies).await;
    Ok(())
}

/// Send replies in order; failures are logged and the remaining replies still go out
async fn deliver(
    bot: &Bot,
    callback_data: &Arc<dyn CallbackDataStorageTrait>,
    chat_id: ChatId,
    replies: Vec<Reply>,
) {
    for reply in replies {
        let result = match reply {
            Reply::Message(message) => send_outgoing(bot, callback_data, chat_id, message)
                .await
                .map(|_| ()),
            Reply::Animation { frames, last } => {
                animate(bot, callback_data, chat_id, frames, last).await
            }
        };
        if let Err(e) = result {
            log::error!("Failed to deliver a reply for chat {}: {}", chat_id, e);
        }
    }
}

async fn typing(bot: &Bot, chat_id: ChatId) {
    if let Err(e) = bot.send_chat_action(chat_id, ChatAction::Typing).await {
        log::warn!("Failed to send typing action to chat {}: {}", chat_id, e);
    }
}

/// One message edited through every frame, ending as `last` with its keyboard
async fn animate(
    bot: &Bot,
    callback_data: &Arc<dyn CallbackDataStorageTrait>,
    chat_id: ChatId,
    frames: Vec<MarkdownString>,
    last: OutgoingMessage,
) -> ResponseResult<()> {
    typing(bot, chat_id).await;
    let mut frames = frames.into_iter();
    let Some(first) = frames.next() else {
        return send_outgoing(bot, callback_data, chat_id, last).await.map(|_| ());
    };

    let sent = bot.send_markdown_message(chat_id, first).await?;
    for frame in frames {
        bot.edit_markdown_message_text(chat_id, sent.id, frame).await?;
        typing(bot, chat_id).await;
    }

    let mut edit = bot.edit_markdown_message_text(chat_id, sent.id, last.text);
    if let Some(keyboard) = last.keyboard {
        edit = edit.reply_markup(pack_keyboard(callback_data, chat_id, keyboard).await);
    }
    edit.await?;
    Ok(())
}

/// Send a message, with its media and keyboard, to wherever it is addressed.
///
/// `chat_id` is the chat the message originates from: the default destination and the scope of
/// stored callback data.
pub async fn send_outgoing(
    bot: &Bot,
    callback_data: &Arc<dyn CallbackDataStorageTrait>,
    chat_id: ChatId,
    message: OutgoingMessage,
) -> ResponseResult<Message> {
    let recipient = match message.destination {
        Destination::CurrentChat => Recipient::Id(chat_id),
        Destination::Recipient(recipient) => recipient,
    };
    let markup: Option<InlineKeyboardMarkup> = match message.keyboard {
        Some(keyboard) => Some(pack_keyboard(callback_data, chat_id, keyboard).await),
        None => None,
    };

    let Some(media) = message.media else {
        let mut request = bot
            .send_markdown_message(recipient, message.text)
            .disable_notification(message.silent);
        if let Some(markup) = markup {
            request = request.reply_markup(markup);
        }
        return request.await;
    };

    let caption = message.text.truncated(TELEGRAM_MAX_CAPTION_LENGTH);
    match media {
        PostMedia::Photo { file_id } => {
            let mut request = bot
                .send_photo(recipient, InputFile::file_id(FileId(file_id)))
                .disable_notification(message.silent);
            if !caption.is_empty() {
                request = request.caption(caption).parse_mode(ParseMode::MarkdownV2);
            }
            if let Some(markup) = markup {
                request = request.reply_markup(markup);
            }
            request.await
        }
        PostMedia::Video { file_id } => {
            let mut request = bot
                .send_video(recipient, InputFile::file_id(FileId(file_id)))
                .disable_notification(message.silent);
            if !caption.is_empty() {
                request = request.caption(caption).parse_mode(ParseMode::MarkdownV2);
            }
            if let Some(markup) = markup {
                request = request.reply_markup(markup);
            }
            request.await
        }
        PostMedia::Document { file_id } => {
            let mut request = bot
                .send_document(recipient, InputFile::file_id(FileId(file_id)))
                .disable_notification(message.silent);
            if !caption.is_empty() {
                request = request.caption(caption).parse_mode(ParseMode::MarkdownV2);
            }
            if let Some(markup) = markup {
                request = request.reply_markup(markup);
            }
            request.await
        }
    }
}
