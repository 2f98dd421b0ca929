use std::{fmt, str::FromStr};

use crate::{conversation::state::Audience, storages::PostMedia};

/// Inbound update, already stripped of everything Telegram specific
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// `/start` command, the only entry into a conversation
    Start,
    /// `/cancel` command, valid in every state
    Cancel,
    /// Inline button press
    Callback(CallbackToken),
    /// Plain text message
    Text(String),
    /// Photo, video or document, with its caption
    Media {
        media: PostMedia,
        caption: Option<String>,
    },
}

/// Callback data of every button the menus render.
///
/// The textual form (`Display`/`FromStr`) is what travels in the button's callback data;
/// tokens with an argument use `name:argument`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackToken {
    MainMenu,
    ChannelManagement,
    CreatePost,
    ViewScheduledPosts,
    UserManagement,
    BotSettings,
    Broadcast,
    WelcomeMessage,
    Favorites,

    AddChannel,
    RemoveChannel(String),

    PostChannel(String),
    SkipMedia,
    PublishNow,
    SkipButtons,
    UseFavoriteButtons,
    SkipCallback,
    DeletePost(String),

    ListUsers,

    EditSignature,
    ClearSignature,
    ToggleSilentPosts,

    BroadcastTo(Audience),

    ClearWelcome,

    FavoriteButtons,
    FavoriteChannels,
    ClearFavoriteButtons,
    ToggleFavoriteChannel(String),
}

impl CallbackToken {
    /// Top-level options of the main menu, in display order
    pub const MAIN_MENU: [CallbackToken; 8] = [
        CallbackToken::ChannelManagement,
        CallbackToken::CreatePost,
        CallbackToken::ViewScheduledPosts,
        CallbackToken::Broadcast,
        CallbackToken::UserManagement,
        CallbackToken::BotSettings,
        CallbackToken::WelcomeMessage,
        CallbackToken::Favorites,
    ];
}

impl fmt::Display for CallbackToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackToken::MainMenu => write!(f, "main_menu"),
            CallbackToken::ChannelManagement => write!(f, "channel_management"),
            CallbackToken::CreatePost => write!(f, "create_post"),
            CallbackToken::ViewScheduledPosts => write!(f, "view_scheduled_posts"),
            CallbackToken::UserManagement => write!(f, "user_management"),
            CallbackToken::BotSettings => write!(f, "bot_settings"),
            CallbackToken::Broadcast => write!(f, "broadcast"),
            CallbackToken::WelcomeMessage => write!(f, "welcome_message"),
            CallbackToken::Favorites => write!(f, "favorites"),
            CallbackToken::AddChannel => write!(f, "add_channel"),
            CallbackToken::RemoveChannel(id) => write!(f, "remove_channel:{}", id),
            CallbackToken::PostChannel(id) => write!(f, "post_channel:{}", id),
            CallbackToken::SkipMedia => write!(f, "skip_media"),
            CallbackToken::PublishNow => write!(f, "publish_now"),
            CallbackToken::SkipButtons => write!(f, "skip_buttons"),
            CallbackToken::UseFavoriteButtons => write!(f, "use_favorite_buttons"),
            CallbackToken::SkipCallback => write!(f, "skip_callback"),
            CallbackToken::DeletePost(id) => write!(f, "delete_post:{}", id),
            CallbackToken::ListUsers => write!(f, "list_users"),
            CallbackToken::EditSignature => write!(f, "edit_signature"),
            CallbackToken::ClearSignature => write!(f, "clear_signature"),
            CallbackToken::ToggleSilentPosts => write!(f, "toggle_silent_posts"),
            CallbackToken::BroadcastTo(audience) => write!(f, "broadcast_to:{}", audience),
            CallbackToken::ClearWelcome => write!(f, "clear_welcome"),
            CallbackToken::FavoriteButtons => write!(f, "favorite_buttons"),
            CallbackToken::FavoriteChannels => write!(f, "favorite_channels"),
            CallbackToken::ClearFavoriteButtons => write!(f, "clear_favorite_buttons"),
            CallbackToken::ToggleFavoriteChannel(id) => {
                write!(f, "toggle_favorite_channel:{}", id)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown callback token {0:?}")]
pub struct UnknownToken(pub String);

impl FromStr for CallbackToken {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownToken(s.to_string());
        let token = match s.split_once(':') {
            None => match s {
                "main_menu" => CallbackToken::MainMenu,
                "channel_management" => CallbackToken::ChannelManagement,
                "create_post" => CallbackToken::CreatePost,
                "view_scheduled_posts" => CallbackToken::ViewScheduledPosts,
                "user_management" => CallbackToken::UserManagement,
                "bot_settings" => CallbackToken::BotSettings,
                "broadcast" => CallbackToken::Broadcast,
                "welcome_message" => CallbackToken::WelcomeMessage,
                "favorites" => CallbackToken::Favorites,
                "add_channel" => CallbackToken::AddChannel,
                "skip_media" => CallbackToken::SkipMedia,
                "publish_now" => CallbackToken::PublishNow,
                "skip_buttons" => CallbackToken::SkipButtons,
                "use_favorite_buttons" => CallbackToken::UseFavoriteButtons,
                "skip_callback" => CallbackToken::SkipCallback,
                "list_users" => CallbackToken::ListUsers,
                "edit_signature" => CallbackToken::EditSignature,
                "clear_signature" => CallbackToken::ClearSignature,
                "toggle_silent_posts" => CallbackToken::ToggleSilentPosts,
                "clear_welcome" => CallbackToken::ClearWelcome,
                "favorite_buttons" => CallbackToken::FavoriteButtons,
                "favorite_channels" => CallbackToken::FavoriteChannels,
                "clear_favorite_buttons" => CallbackToken::ClearFavoriteButtons,
                _ => return Err(unknown()),
            },
            Some((_, "")) => return Err(unknown()),
            Some((name, argument)) => {
                let argument = argument.to_string();
                match name {
                    "remove_channel" => CallbackToken::RemoveChannel(argument),
                    "post_channel" => CallbackToken::PostChannel(argument),
                    "delete_post" => CallbackToken::DeletePost(argument),
                    "toggle_favorite_channel" => CallbackToken::ToggleFavoriteChannel(argument),
                    "broadcast_to" => {
                        CallbackToken::BroadcastTo(argument.parse().map_err(|_| unknown())?)
                    }
                    _ => return Err(unknown()),
                }
            }
        };
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_level_tokens() {
        let names: Vec<String> = CallbackToken::MAIN_MENU.iter().map(|t| t.to_string()).collect();
        assert_eq!(
            names,
            vec![
                "channel_management",
                "create_post",
                "view_scheduled_posts",
                "broadcast",
                "user_management",
                "bot_settings",
                "welcome_message",
                "favorites",
            ]
        );
    }

    #[test]
    fn test_tokens_with_arguments() {
        assert_eq!(
            "remove_channel:-1001234567890".parse::<CallbackToken>(),
            Ok(CallbackToken::RemoveChannel("-1001234567890".to_string()))
        );
        assert_eq!(
            "broadcast_to:channels".parse::<CallbackToken>(),
            Ok(CallbackToken::BroadcastTo(Audience::Channels))
        );
        assert_eq!(
            CallbackToken::ToggleFavoriteChannel("@news_feed".to_string()).to_string(),
            "toggle_favorite_channel:@news_feed"
        );
    }

    #[test]
    fn test_unknown_tokens() {
        for data in ["", "start", "remove_channel:", "broadcast_to:everyone", "like", "cb:1:2"] {
            assert!(data.parse::<CallbackToken>().is_err(), "{:?} should not parse", data);
        }
        let error = "like".parse::<CallbackToken>().unwrap_err();
        assert_eq!(error.to_string(), "unknown callback token \"like\"");
    }
}
