use crate::{
    conversation::{
        event::{CallbackToken, Event},
        state::{Audience, State},
    },
    storages::PostMedia,
};

/// Handler selected for an event
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ShowMainMenu,
    ShowChannelManagement,
    StartPost,
    ShowScheduledPosts,
    DeletePost(String),
    ShowUserManagement,
    ShowBotSettings,
    ShowBroadcast,
    ShowWelcomeMessage,
    ShowFavorites,

    PromptAddChannel,
    AddChannel(String),
    RemoveChannel(String),

    SelectPostChannel(String),
    SetPostText(String),
    SetPostTextWithMedia { media: PostMedia, caption: String },
    SetPostMedia(PostMedia),
    SkipPostMedia,
    SetPostSchedule(String),
    PublishNow,
    SetUrlButtons(String),
    UseFavoriteButtons,
    SkipUrlButtons,
    SetCallbackButtons(String),
    SkipCallbackButtons,

    ListUsers,

    EditSignature,
    SetSignature(String),
    ClearSignature,
    ToggleSilentPosts,

    SetBroadcastAudience(Audience),
    SendBroadcast(String),

    SetWelcomeMessage(String),
    ClearWelcomeMessage,

    ShowFavoriteButtons,
    SetFavoriteButtons(String),
    ClearFavoriteButtons,
    ShowFavoriteChannels,
    ToggleFavoriteChannel(String),
}

/// Routing table: which events each state accepts.
///
/// `Start` and `Cancel` are global and never routed here. `main_menu` leads back from every
/// state; anything else not listed for a state yields `None`.
pub fn route(state: State, event: &Event) -> Option<Action> {
    use CallbackToken as T;

    let token = match event {
        Event::Callback(token) => Some(token),
        _ => None,
    };
    if token == Some(&T::MainMenu) {
        return Some(Action::ShowMainMenu);
    }

    let action = match (state, event) {
        (State::MainMenu, Event::Callback(token)) => match token {
            T::ChannelManagement => Action::ShowChannelManagement,
            T::CreatePost => Action::StartPost,
            T::ViewScheduledPosts => Action::ShowScheduledPosts,
            T::UserManagement => Action::ShowUserManagement,
            T::BotSettings => Action::ShowBotSettings,
            T::Broadcast => Action::ShowBroadcast,
            T::WelcomeMessage => Action::ShowWelcomeMessage,
            T::Favorites => Action::ShowFavorites,
            T::DeletePost(id) => Action::DeletePost(id.clone()),
            T::FavoriteButtons => Action::ShowFavoriteButtons,
            T::FavoriteChannels => Action::ShowFavoriteChannels,
            _ => return None,
        },

        (State::ChannelManagement, Event::Callback(T::AddChannel)) => Action::PromptAddChannel,
        (State::ChannelManagement, Event::Callback(T::ChannelManagement)) => {
            Action::ShowChannelManagement
        }
        (State::ChannelManagement, Event::Callback(T::RemoveChannel(id))) => {
            Action::RemoveChannel(id.clone())
        }
        (State::ChannelManagement, Event::Text(text)) => Action::AddChannel(text.clone()),

        (State::PostChannelSelect, Event::Callback(T::PostChannel(id))) => {
            Action::SelectPostChannel(id.clone())
        }

        (State::PostContent, Event::Text(text)) => Action::SetPostText(text.clone()),
        (State::PostContent, Event::Media { media, caption }) => Action::SetPostTextWithMedia {
            media: media.clone(),
            caption: caption.clone().unwrap_or_default(),
        },

        (State::PostMedia, Event::Media { media, .. }) => Action::SetPostMedia(media.clone()),
        (State::PostMedia, Event::Callback(T::SkipMedia)) => Action::SkipPostMedia,

        (State::PostSchedule, Event::Text(text)) => Action::SetPostSchedule(text.clone()),
        (State::PostSchedule, Event::Callback(T::PublishNow)) => Action::PublishNow,

        (State::PostButtons, Event::Text(text)) => Action::SetUrlButtons(text.clone()),
        (State::PostButtons, Event::Callback(T::UseFavoriteButtons)) => Action::UseFavoriteButtons,
        (State::PostButtons, Event::Callback(T::SkipButtons)) => Action::SkipUrlButtons,

        (State::PostCallback, Event::Text(text)) => Action::SetCallbackButtons(text.clone()),
        (State::PostCallback, Event::Callback(T::SkipCallback)) => Action::SkipCallbackButtons,

        (State::UserManagement, Event::Callback(T::ListUsers)) => Action::ListUsers,

        (State::BotSettings, Event::Callback(T::EditSignature)) => Action::EditSignature,
        (State::BotSettings | State::Signature, Event::Callback(T::ClearSignature)) => {
            Action::ClearSignature
        }
        (State::BotSettings, Event::Callback(T::ToggleSilentPosts)) => Action::ToggleSilentPosts,

        (State::Signature, Event::Text(text)) => Action::SetSignature(text.clone()),
        (State::Signature, Event::Callback(T::BotSettings)) => Action::ShowBotSettings,

        (State::Broadcast, Event::Callback(T::BroadcastTo(audience))) => {
            Action::SetBroadcastAudience(*audience)
        }
        (State::Broadcast, Event::Text(text)) => Action::SendBroadcast(text.clone()),

        (State::WelcomeMessage, Event::Text(text)) => Action::SetWelcomeMessage(text.clone()),
        (State::WelcomeMessage, Event::Callback(T::ClearWelcome)) => Action::ClearWelcomeMessage,

        (State::FavoriteButtons, Event::Text(text)) => Action::SetFavoriteButtons(text.clone()),
        (State::FavoriteButtons, Event::Callback(T::ClearFavoriteButtons)) => {
            Action::ClearFavoriteButtons
        }
        (State::FavoriteButtons | State::FavoriteChannels, Event::Callback(T::Favorites)) => {
            Action::ShowFavorites
        }

        (State::FavoriteChannels, Event::Callback(T::ToggleFavoriteChannel(id))) => {
            Action::ToggleFavoriteChannel(id.clone())
        }

        (
            State::MainMenu
            | State::ChannelManagement
            | State::PostChannelSelect
            | State::PostContent
            | State::PostMedia
            | State::PostSchedule
            | State::PostButtons
            | State::PostCallback
            | State::UserManagement
            | State::BotSettings
            | State::Signature
            | State::Broadcast
            | State::WelcomeMessage
            | State::FavoriteButtons
            | State::FavoriteChannels,
            _,
        ) => return None,
    };
    Some(action)
}
