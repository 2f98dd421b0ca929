use std::sync::Arc;

use chrono::{DateTime, Utc};
use teloxide::types::ChatId;
use yoroolbot::{markdown::MarkdownString, markdown_string};

use crate::{
    config::Config,
    conversation::{
        Sender,
        event::Event,
        reply::{OutgoingMessage, Reply, Transition},
        router::{Action, route},
        state::{Session, State},
    },
    menus::{
        MenuContext, broadcast, channels, favorites, main_menu, posts, settings, users, welcome,
    },
    storages::Storage,
};

/// Drives admin conversations: keeps one session per chat and feeds events through the routing
/// table into the menu handlers
pub struct ConversationMachine {
    storage: Storage,
    config: Arc<Config>,
}

impl ConversationMachine {
    pub fn new(storage: Storage, config: Arc<Config>) -> Self {
        Self { storage, config }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Handle one event and return what has to be sent back
    pub async fn handle(&self, chat_id: ChatId, sender: &Sender, event: Event) -> Vec<Reply> {
        self.handle_at(chat_id, sender, event, Utc::now()).await
    }

    async fn handle_at(
        &self,
        chat_id: ChatId,
        sender: &Sender,
        event: Event,
        now: DateTime<Utc>,
    ) -> Vec<Reply> {
        match event {
            Event::Start => self.start(chat_id, sender).await,
            Event::Cancel => self.cancel(chat_id, sender).await,
            event => self.advance(chat_id, sender, event, now).await,
        }
    }

    async fn start(&self, chat_id: ChatId, sender: &Sender) -> Vec<Reply> {
        let users = self.storage.users(self.config.admin_id);
        users
            .register(sender.id, sender.username.as_deref(), &sender.first_name)
            .await;

        if !users.is_admin(sender.id).await {
            log::warn!("Unauthorized /start from user {} in chat {}", sender.id, chat_id);
            let mut replies = Vec::new();
            if let Some(welcome) = self.storage.settings().get_settings().await.welcome_message {
                replies.push(OutgoingMessage::new(MarkdownString::escape(welcome)).into());
            }
            replies.push(
                OutgoingMessage::new(markdown_string!(
                    "🚫 *Unauthorized Access*\n\n\
                     This bot is for administrative use only\\.\n\
                     If you believe this is an error, please contact the bot owner\\."
                ))
                .into(),
            );
            return replies;
        }

        self.storage
            .conversations()
            .set_session(chat_id, Session::new(State::MainMenu))
            .await;
        log::info!("Admin {} opened the main menu in chat {}", sender.id, chat_id);
        vec![main_menu::start_screen(&sender.first_name)]
    }

    async fn cancel(&self, chat_id: ChatId, sender: &Sender) -> Vec<Reply> {
        if !self.storage.users(self.config.admin_id).is_admin(sender.id).await {
            log::warn!("Ignoring /cancel from non-admin user {} in chat {}", sender.id, chat_id);
            return Vec::new();
        }
        match self.storage.conversations().remove_session(chat_id).await {
            Some(session) => {
                log::info!("Chat {}: {:?} -> cancelled", chat_id, session.state);
                vec![
                    OutgoingMessage::new(markdown_string!(
                        "❌ Operation cancelled\\. Send /start to open the menu again\\."
                    ))
                    .into(),
                ]
            }
            None => {
                log::debug!("Ignoring /cancel in chat {} without a conversation", chat_id);
                Vec::new()
            }
        }
    }

    async fn advance(
        &self,
        chat_id: ChatId,
        sender: &Sender,
        event: Event,
        now: DateTime<Utc>,
    ) -> Vec<Reply> {
        let conversations = self.storage.conversations();
        let Some(mut session) = conversations.get_session(chat_id).await else {
            log::debug!("No conversation in chat {}, ignoring {:?}", chat_id, event);
            return Vec::new();
        };
        if !self.storage.users(self.config.admin_id).is_admin(sender.id).await {
            log::warn!(
                "Ignoring {:?} from non-admin user {} in chat {}",
                event,
                sender.id,
                chat_id
            );
            return Vec::new();
        }
        let Some(action) = route(session.state, &event) else {
            log::warn!(
                "Ignoring {:?} in state {:?} for chat {}",
                event,
                session.state,
                chat_id
            );
            return Vec::new();
        };

        let ctx = MenuContext {
            storage: &self.storage,
            config: &self.config,
            sender,
            now,
        };
        let from = session.state;
        let transition = perform(&ctx, &mut session, action).await;
        match transition.next {
            Some(state) => {
                session.enter(state);
                conversations.set_session(chat_id, session).await;
                log::info!("Chat {}: {:?} -> {:?}", chat_id, from, state);
            }
            None => {
                conversations.remove_session(chat_id).await;
                log::info!("Chat {}: {:?} -> ended", chat_id, from);
            }
        }
        transition.replies
    }
}

async fn perform(ctx: &MenuContext<'_>, session: &mut Session, action: Action) -> Transition {
    match action {
        Action::ShowMainMenu => main_menu::show_main_menu(),
        Action::ShowChannelManagement => channels::show_channel_management(ctx).await,
        Action::StartPost => posts::start_post(ctx).await,
        Action::ShowScheduledPosts => posts::show_scheduled_posts(ctx).await,
        Action::DeletePost(id) => posts::delete_post(ctx, &id).await,
        Action::ShowUserManagement => users::show_user_management(ctx).await,
        Action::ShowBotSettings => settings::show_bot_settings(ctx).await,
        Action::ShowBroadcast => broadcast::show_broadcast(ctx, session.audience).await,
        Action::ShowWelcomeMessage => welcome::show_welcome_message(ctx).await,
        Action::ShowFavorites => favorites::show_favorites(ctx).await,

        Action::PromptAddChannel => channels::prompt_add_channel(),
        Action::AddChannel(input) => channels::add_channel(ctx, &input).await,
        Action::RemoveChannel(id) => channels::remove_channel(ctx, &id).await,

        Action::SelectPostChannel(id) => posts::select_channel(ctx, session, &id).await,
        Action::SetPostText(text) => posts::set_text(session, text),
        Action::SetPostTextWithMedia { media, caption } => {
            posts::set_text_with_media(session, media, caption)
        }
        Action::SetPostMedia(media) => posts::set_media(session, media),
        Action::SkipPostMedia => posts::skip_media(session),
        Action::SetPostSchedule(input) => posts::set_schedule(ctx, session, &input).await,
        Action::PublishNow => posts::publish_now(ctx, session).await,
        Action::SetUrlButtons(input) => posts::set_url_buttons(session, &input),
        Action::UseFavoriteButtons => posts::use_favorite_buttons(ctx, session).await,
        Action::SkipUrlButtons => posts::skip_url_buttons(session),
        Action::SetCallbackButtons(input) => posts::set_callback_buttons(ctx, session, &input).await,
        Action::SkipCallbackButtons => posts::skip_callback_buttons(ctx, session).await,

        Action::ListUsers => users::list_users(ctx).await,

        Action::EditSignature => settings::edit_signature(),
        Action::SetSignature(text) => settings::set_signature(ctx, &text).await,
        Action::ClearSignature => settings::clear_signature(ctx).await,
        Action::ToggleSilentPosts => settings::toggle_silent_posts(ctx).await,

        Action::SetBroadcastAudience(audience) => {
            broadcast::set_audience(ctx, session, audience).await
        }
        Action::SendBroadcast(text) => broadcast::send_broadcast(ctx, session.audience, &text).await,

        Action::SetWelcomeMessage(text) => welcome::set_welcome_message(ctx, &text).await,
        Action::ClearWelcomeMessage => welcome::clear_welcome_message(ctx).await,

        Action::ShowFavoriteButtons => favorites::show_favorite_buttons(ctx).await,
        Action::SetFavoriteButtons(input) => favorites::set_favorite_buttons(ctx, &input).await,
        Action::ClearFavoriteButtons => favorites::clear_favorite_buttons(ctx).await,
        Action::ShowFavoriteChannels => favorites::show_favorite_channels(ctx).await,
        Action::ToggleFavoriteChannel(id) => favorites::toggle_favorite_channel(ctx, &id).await,
    }
}

#[cfg(test)]
mod tests {
    use std::{path::PathBuf, time::Duration};

    use teloxide::types::Recipient;

    use super::*;
    use crate::{
        conversation::{Audience, CallbackToken, Destination},
        storages::{PostButton, PostMedia, ScheduledPost},
    };

    const ADMIN: u64 = 42;

    fn machine() -> ConversationMachine {
        let config = Config {
            bot_token: "token".to_string(),
            admin_id: Some(ADMIN),
            data_dir: PathBuf::from("data"),
            dispatch_interval: Duration::from_secs(30),
        };
        ConversationMachine::new(Storage::new(), Arc::new(config))
    }

    fn sender(id: u64, first_name: &str) -> Sender {
        Sender {
            id,
            username: Some(first_name.to_lowercase()),
            first_name: first_name.to_string(),
        }
    }

    fn admin() -> Sender {
        sender(ADMIN, "Alice")
    }

    fn chat() -> ChatId {
        ChatId(ADMIN as i64)
    }

    fn cb(token: CallbackToken) -> Event {
        Event::Callback(token)
    }

    fn text(text: &str) -> Event {
        Event::Text(text.to_string())
    }

    /// The message the user ends up looking at
    fn final_message(reply: &Reply) -> &OutgoingMessage {
        match reply {
            Reply::Message(message) => message,
            Reply::Animation { last, .. } => last,
        }
    }

    fn texts(replies: &[Reply]) -> Vec<String> {
        replies
            .iter()
            .map(|reply| final_message(reply).text.as_str().to_string())
            .collect()
    }

    async fn state(machine: &ConversationMachine) -> Option<State> {
        machine.storage().conversations().get_state(chat()).await
    }

    async fn admin_says(machine: &ConversationMachine, event: Event) -> Vec<Reply> {
        machine.handle(chat(), &admin(), event).await
    }

    #[tokio::test]
    async fn test_non_admin_start_is_rejected() {
        let machine = machine();
        let stranger = sender(7, "Bob");
        let replies = machine.handle(ChatId(7), &stranger, Event::Start).await;

        assert_eq!(replies.len(), 1);
        assert!(texts(&replies)[0].starts_with("🚫 *Unauthorized Access*"));
        assert_eq!(
            machine.storage().conversations().get_state(ChatId(7)).await,
            None
        );

        let users = machine.storage().users(Some(ADMIN)).list_users().await;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, "7");
        assert!(!users[0].is_admin);
    }

    #[tokio::test]
    async fn test_non_admin_sees_welcome_message_first() {
        let machine = machine();
        machine
            .storage()
            .settings()
            .update_settings(|settings| settings.welcome_message = Some("Hi there!".to_string()))
            .await;

        let replies = machine.handle(ChatId(7), &sender(7, "Bob"), Event::Start).await;
        let texts = texts(&replies);
        assert_eq!(texts.len(), 2);
        assert_eq!(texts[0], "Hi there\\!");
        assert!(texts[1].contains("Unauthorized"));
    }

    #[tokio::test]
    async fn test_admin_start_opens_main_menu() {
        let machine = machine();
        let replies = admin_says(&machine, Event::Start).await;

        assert_eq!(replies.len(), 1);
        let Reply::Animation { frames, last } = &replies[0] else {
            panic!("expected the start animation");
        };
        assert!(!frames.is_empty());
        let options: Vec<&str> = last
            .keyboard
            .iter()
            .flatten()
            .flatten()
            .filter_map(|button| button.callback_data())
            .collect();
        let expected: Vec<String> = CallbackToken::MAIN_MENU.iter().map(|t| t.to_string()).collect();
        assert_eq!(options, expected);
        assert_eq!(state(&machine).await, Some(State::MainMenu));

        let users = machine.storage().users(Some(ADMIN));
        assert!(users.is_admin(ADMIN).await);
    }

    #[tokio::test]
    async fn test_cancel_ends_every_state() {
        let machine = machine();
        admin_says(&machine, Event::Start).await;
        for current in State::ALL {
            machine
                .storage()
                .conversations()
                .set_session(chat(), Session::new(current))
                .await;
            let replies = admin_says(&machine, Event::Cancel).await;
            assert_eq!(replies.len(), 1, "{:?}", current);
            assert_eq!(state(&machine).await, None, "{:?}", current);
        }

        assert!(admin_says(&machine, Event::Cancel).await.is_empty());
    }

    #[tokio::test]
    async fn test_unmatched_and_foreign_events_are_ignored() {
        let machine = machine();
        assert!(admin_says(&machine, cb(CallbackToken::CreatePost)).await.is_empty());

        admin_says(&machine, Event::Start).await;
        assert!(admin_says(&machine, text("hello")).await.is_empty());
        assert!(admin_says(&machine, cb(CallbackToken::SkipMedia)).await.is_empty());
        assert_eq!(state(&machine).await, Some(State::MainMenu));

        let stranger = sender(7, "Bob");
        machine.handle(ChatId(7), &stranger, Event::Start).await;
        let replies = machine
            .handle(chat(), &stranger, cb(CallbackToken::BotSettings))
            .await;
        assert!(replies.is_empty());
        assert_eq!(state(&machine).await, Some(State::MainMenu));
    }

    #[tokio::test]
    async fn test_non_admin_cannot_cancel_admin_conversation() {
        let machine = machine();
        admin_says(&machine, Event::Start).await;

        let stranger = sender(7, "Bob");
        machine.handle(ChatId(7), &stranger, Event::Start).await;
        let replies = machine.handle(chat(), &stranger, Event::Cancel).await;
        assert!(replies.is_empty());
        assert_eq!(state(&machine).await, Some(State::MainMenu));

        assert_eq!(admin_says(&machine, Event::Cancel).await.len(), 1);
        assert_eq!(state(&machine).await, None);
    }

    #[tokio::test]
    async fn test_channel_management() {
        let machine = machine();
        admin_says(&machine, Event::Start).await;
        admin_says(&machine, cb(CallbackToken::ChannelManagement)).await;
        assert_eq!(state(&machine).await, Some(State::ChannelManagement));

        let replies = admin_says(&machine, text("not a channel!")).await;
        assert!(texts(&replies)[0].starts_with("❌"));

        admin_says(&machine, text("@news_feed News Feed")).await;
        admin_says(&machine, text("-1001234567890")).await;
        let channels = machine.storage().channels().list_channels().await;
        assert_eq!(channels.len(), 2);
        let news = channels.iter().find(|c| c.id == "@news_feed").unwrap();
        assert_eq!(news.title, "News Feed");

        let replies = admin_says(&machine, text("@news_feed")).await;
        assert!(texts(&replies)[0].contains("already managed"));

        admin_says(
            &machine,
            cb(CallbackToken::RemoveChannel("-1001234567890".to_string())),
        )
        .await;
        assert_eq!(machine.storage().channels().list_channels().await.len(), 1);
        assert_eq!(state(&machine).await, Some(State::ChannelManagement));

        admin_says(&machine, cb(CallbackToken::MainMenu)).await;
        assert_eq!(state(&machine).await, Some(State::MainMenu));
    }

    #[tokio::test]
    async fn test_post_creation_flow() {
        let machine = machine();
        let storage = machine.storage();
        storage.channels().add_channel("@news_feed", "News").await;
        storage
            .settings()
            .update_settings(|settings| settings.signature = Some("@news_feed".to_string()))
            .await;
        admin_says(&machine, Event::Start).await;

        let steps = [
            (cb(CallbackToken::CreatePost), State::PostChannelSelect),
            (cb(CallbackToken::PostChannel("@news_feed".to_string())), State::PostContent),
            (text("Big news"), State::PostMedia),
            (
                Event::Media {
                    media: PostMedia::Photo {
                        file_id: "AgAC".to_string(),
                    },
                    caption: None,
                },
                State::PostSchedule,
            ),
            (text("yesterday"), State::PostSchedule),
            (text("+2h"), State::PostButtons),
            (text("Site - https://example.com"), State::PostCallback),
            (text("Like | like"), State::MainMenu),
        ];
        for (event, expected) in steps {
            admin_says(&machine, event.clone()).await;
            assert_eq!(state(&machine).await, Some(expected), "after {:?}", event);
        }

        let posts = storage.posts().list_posts().await;
        assert_eq!(posts.len(), 1);
        let post = &posts[0];
        assert_eq!(post.channel_id, "@news_feed");
        assert_eq!(post.text, "Big news\n\n@news_feed");
        assert_eq!(post.media.as_ref().map(|m| m.kind()), Some("photo"));
        assert_eq!(post.buttons.len(), 2);
        assert!(matches!(post.buttons[1], PostButton::Callback { .. }));
        assert!(post.scheduled_at > Utc::now());

        let session = storage.conversations().get_session(chat()).await.unwrap();
        assert!(session.draft.is_none());
    }

    #[tokio::test]
    async fn test_publish_now_with_media_content_and_skips() {
        let machine = machine();
        machine.storage().channels().add_channel("@news_feed", "News").await;
        admin_says(&machine, Event::Start).await;
        admin_says(&machine, cb(CallbackToken::CreatePost)).await;
        admin_says(&machine, cb(CallbackToken::PostChannel("@news_feed".to_string()))).await;
        admin_says(
            &machine,
            Event::Media {
                media: PostMedia::Video {
                    file_id: "BAAC".to_string(),
                },
                caption: Some("Watch this".to_string()),
            },
        )
        .await;
        assert_eq!(state(&machine).await, Some(State::PostSchedule));
        admin_says(&machine, cb(CallbackToken::PublishNow)).await;
        admin_says(&machine, cb(CallbackToken::SkipButtons)).await;
        let replies = admin_says(&machine, cb(CallbackToken::SkipCallback)).await;
        assert_eq!(state(&machine).await, Some(State::MainMenu));

        let preview = final_message(&replies[0]);
        assert_eq!(preview.text.as_str(), "Watch this");
        assert!(preview.media.is_some());

        let due = machine.storage().posts().due_posts(Utc::now()).await;
        assert_eq!(due.len(), 1);
        assert!(due[0].buttons.is_empty());
    }

    #[tokio::test]
    async fn test_leaving_post_flow_drops_draft() {
        let machine = machine();
        machine.storage().channels().add_channel("@news_feed", "News").await;
        admin_says(&machine, Event::Start).await;
        admin_says(&machine, cb(CallbackToken::CreatePost)).await;
        admin_says(&machine, cb(CallbackToken::PostChannel("@news_feed".to_string()))).await;
        admin_says(&machine, cb(CallbackToken::MainMenu)).await;

        let session = machine.storage().conversations().get_session(chat()).await.unwrap();
        assert_eq!(session.state, State::MainMenu);
        assert!(session.draft.is_none());
        assert!(machine.storage().posts().list_posts().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_post_without_channels_stays_in_main_menu() {
        let machine = machine();
        admin_says(&machine, Event::Start).await;
        let replies = admin_says(&machine, cb(CallbackToken::CreatePost)).await;
        assert!(texts(&replies)[0].contains("No channels yet"));
        assert_eq!(state(&machine).await, Some(State::MainMenu));
    }

    #[tokio::test]
    async fn test_broadcast_to_users_and_channels() {
        let machine = machine();
        let storage = machine.storage();
        let users = storage.users(Some(ADMIN));
        users.register(100, Some("bob"), "Bob").await;
        users.register(200, None, "Carol").await;
        storage.channels().add_channel("@news_feed", "News").await;
        admin_says(&machine, Event::Start).await;

        admin_says(&machine, cb(CallbackToken::Broadcast)).await;
        assert_eq!(state(&machine).await, Some(State::Broadcast));
        let replies = admin_says(&machine, text("Hello everyone.")).await;
        let recipients: Vec<&Destination> = replies
            .iter()
            .map(|reply| &final_message(reply).destination)
            .filter(|destination| **destination != Destination::CurrentChat)
            .collect();
        assert_eq!(
            recipients,
            vec![
                &Destination::Recipient(Recipient::Id(ChatId(100))),
                &Destination::Recipient(Recipient::Id(ChatId(200))),
            ]
        );
        assert_eq!(final_message(&replies[0]).text.as_str(), "Hello everyone\\.");
        assert_eq!(state(&machine).await, Some(State::MainMenu));

        admin_says(&machine, cb(CallbackToken::Broadcast)).await;
        admin_says(&machine, cb(CallbackToken::BroadcastTo(Audience::Channels))).await;
        let session = storage.conversations().get_session(chat()).await.unwrap();
        assert_eq!(session.audience, Audience::Channels);
        let replies = admin_says(&machine, text("Channel news")).await;
        assert_eq!(
            final_message(&replies[0]).destination,
            Destination::Recipient(Recipient::ChannelUsername("@news_feed".to_string()))
        );
        let session = storage.conversations().get_session(chat()).await.unwrap();
        assert_eq!(session.audience, Audience::Users);
    }

    #[tokio::test]
    async fn test_settings_welcome_and_favorites() {
        let machine = machine();
        let storage = machine.storage();
        storage.channels().add_channel("@news_feed", "News").await;
        admin_says(&machine, Event::Start).await;

        admin_says(&machine, cb(CallbackToken::BotSettings)).await;
        admin_says(&machine, cb(CallbackToken::EditSignature)).await;
        assert_eq!(state(&machine).await, Some(State::Signature));
        admin_says(&machine, text("  Best regards  ")).await;
        assert_eq!(state(&machine).await, Some(State::BotSettings));
        admin_says(&machine, cb(CallbackToken::ToggleSilentPosts)).await;
        let settings = storage.settings().get_settings().await;
        assert_eq!(settings.signature.as_deref(), Some("Best regards"));
        assert!(settings.silent_posts);

        admin_says(&machine, cb(CallbackToken::MainMenu)).await;
        admin_says(&machine, cb(CallbackToken::WelcomeMessage)).await;
        admin_says(&machine, text("Welcome to the news bot")).await;
        assert_eq!(state(&machine).await, Some(State::WelcomeMessage));
        assert_eq!(
            storage.settings().get_settings().await.welcome_message.as_deref(),
            Some("Welcome to the news bot")
        );

        admin_says(&machine, cb(CallbackToken::MainMenu)).await;
        admin_says(&machine, cb(CallbackToken::Favorites)).await;
        assert_eq!(state(&machine).await, Some(State::MainMenu));
        admin_says(&machine, cb(CallbackToken::FavoriteChannels)).await;
        assert_eq!(state(&machine).await, Some(State::FavoriteChannels));
        admin_says(
            &machine,
            cb(CallbackToken::ToggleFavoriteChannel("@news_feed".to_string())),
        )
        .await;
        admin_says(
            &machine,
            cb(CallbackToken::ToggleFavoriteChannel("@unknown".to_string())),
        )
        .await;
        assert_eq!(
            storage.settings().get_settings().await.favorite_channels,
            vec!["@news_feed".to_string()]
        );

        admin_says(&machine, cb(CallbackToken::Favorites)).await;
        admin_says(&machine, cb(CallbackToken::FavoriteButtons)).await;
        assert_eq!(state(&machine).await, Some(State::FavoriteButtons));
        let replies = admin_says(&machine, text("broken line")).await;
        assert!(texts(&replies)[0].starts_with("❌"));
        admin_says(&machine, text("Site - https://example.com")).await;
        assert_eq!(storage.settings().get_settings().await.favorite_buttons.len(), 1);
    }

    #[tokio::test]
    async fn test_scheduled_posts_can_be_deleted() {
        let machine = machine();
        let storage = machine.storage();
        let now = Utc::now();
        storage
            .posts()
            .add_post(&ScheduledPost {
                id: "p1".to_string(),
                channel_id: "@news_feed".to_string(),
                text: "Tomorrow's digest".to_string(),
                media: None,
                buttons: vec![],
                scheduled_at: now + chrono::Duration::days(1),
                created_at: now,
            })
            .await;
        admin_says(&machine, Event::Start).await;

        let replies = admin_says(&machine, cb(CallbackToken::ViewScheduledPosts)).await;
        assert!(texts(&replies)[0].contains("Tomorrow's digest"));
        assert_eq!(state(&machine).await, Some(State::MainMenu));

        let replies = admin_says(&machine, cb(CallbackToken::DeletePost("p1".to_string()))).await;
        let deleted = texts(&replies);
        assert_eq!(deleted[0], "🗑 Post deleted\\.");
        assert!(deleted[1].contains("Nothing is scheduled"));
        assert!(storage.posts().list_posts().await.is_empty());

        let replies = admin_says(&machine, cb(CallbackToken::DeletePost("p1".to_string()))).await;
        assert!(texts(&replies)[0].starts_with("⚠️"));
    }

    #[tokio::test]
    async fn test_user_management_lists_registered_users() {
        let machine = machine();
        machine.handle(ChatId(7), &sender(7, "Bob"), Event::Start).await;
        admin_says(&machine, Event::Start).await;

        let replies = admin_says(&machine, cb(CallbackToken::UserManagement)).await;
        assert_eq!(state(&machine).await, Some(State::UserManagement));
        let summary = &texts(&replies)[0];
        assert!(summary.contains("Registered users: *2*"));
        assert!(summary.contains("Administrators: *1*"));

        let replies = admin_says(&machine, cb(CallbackToken::ListUsers)).await;
        let listing = &texts(&replies)[0];
        assert!(listing.contains("Alice @alice `42` 👑"));
        assert!(listing.contains("Bob @bob `7`"));
        assert_eq!(state(&machine).await, Some(State::UserManagement));
    }
}
