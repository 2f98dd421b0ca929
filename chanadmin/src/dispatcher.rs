use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use teloxide::{
    prelude::*,
    types::{ChatId, Recipient},
};
use tokio::time::MissedTickBehavior;
use yoroolbot::{keyboard::CallbackDataStorageTrait, markdown::MarkdownString};

use crate::{
    conversation::{Destination, OutgoingMessage},
    handlers::send_outgoing,
    storages::{ScheduledPost, Storage, channel_recipient},
    utils::buttons::post_keyboard,
};

/// Delivers a scheduled post to its channel
#[async_trait::async_trait]
pub trait PostPublisher: Send + Sync {
    async fn publish(&self, post: &ScheduledPost, silent: bool) -> ResponseResult<()>;
}

/// Publishes posts through the Telegram Bot API
pub struct BotPublisher {
    bot: Bot,
    callback_data: Arc<dyn CallbackDataStorageTrait>,
}

impl BotPublisher {
    pub fn new(bot: Bot, callback_data: Arc<dyn CallbackDataStorageTrait>) -> Self {
        Self { bot, callback_data }
    }
}

/// Channel post as it goes out: escaped text, media, buttons
pub fn post_message(post: &ScheduledPost, silent: bool) -> OutgoingMessage {
    let mut message = OutgoingMessage::new(MarkdownString::escape(&post.text))
        .to(channel_recipient(&post.channel_id))
        .media(post.media.clone())
        .silent(silent);
    if !post.buttons.is_empty() {
        message = message.keyboard(post_keyboard(&post.buttons));
    }
    message
}

#[async_trait::async_trait]
impl PostPublisher for BotPublisher {
    async fn publish(&self, post: &ScheduledPost, silent: bool) -> ResponseResult<()> {
        let message = post_message(post, silent);
        // Callback data of channel buttons is scoped to the numeric channel id when there is one
        let scope = match &message.destination {
            Destination::Recipient(Recipient::Id(chat_id)) => *chat_id,
            _ => ChatId(0),
        };
        send_outgoing(&self.bot, &self.callback_data, scope, message).await?;
        Ok(())
    }
}

/// Publish every post that is due and remove it from the store.
///
/// A post whose delivery fails is logged and removed as well; there are no retries.
/// Returns how many posts were delivered.
pub async fn dispatch_due_posts(
    publisher: &dyn PostPublisher,
    storage: &Storage,
    now: DateTime<Utc>,
) -> usize {
    let due = storage.posts().due_posts(now).await;
    if due.is_empty() {
        return 0;
    }
    let silent = storage.settings().get_settings().await.silent_posts;

    let mut handled = Vec::with_capacity(due.len());
    let mut delivered = 0;
    for post in due {
        match publisher.publish(&post, silent).await {
            Ok(()) => {
                log::info!("Published post {} to {}", post.id, post.channel_id);
                delivered += 1;
            }
            Err(e) => {
                log::error!(
                    "Failed to publish post {} to {}: {}",
                    post.id,
                    post.channel_id,
                    e
                );
            }
        }
        handled.push(post.id);
    }
    storage.posts().remove_posts(&handled).await;
    delivered
}

/// Check for due posts every `interval`, forever
pub async fn run_dispatcher(publisher: Arc<dyn PostPublisher>, storage: Storage, interval: Duration) {
    log::info!("Scheduled post dispatcher running every {:?}", interval);
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        dispatch_due_posts(publisher.as_ref(), &storage, Utc::now()).await;
    }
}
