use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};

use crate::storages::{PostButton, PostMedia};

/// Menu states of an admin conversation. A chat without a session is in the ended state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    MainMenu,
    ChannelManagement,
    PostChannelSelect,
    PostContent,
    PostMedia,
    PostSchedule,
    PostButtons,
    PostCallback,
    UserManagement,
    BotSettings,
    Broadcast,
    WelcomeMessage,
    FavoriteButtons,
    FavoriteChannels,
    Signature,
}

impl State {
    pub const ALL: [State; 15] = [
        State::MainMenu,
        State::ChannelManagement,
        State::PostChannelSelect,
        State::PostContent,
        State::PostMedia,
        State::PostSchedule,
        State::PostButtons,
        State::PostCallback,
        State::UserManagement,
        State::BotSettings,
        State::Broadcast,
        State::WelcomeMessage,
        State::FavoriteButtons,
        State::FavoriteChannels,
        State::Signature,
    ];

    /// States that work on a post draft
    pub fn is_post_flow(self) -> bool {
        matches!(
            self,
            State::PostChannelSelect
                | State::PostContent
                | State::PostMedia
                | State::PostSchedule
                | State::PostButtons
                | State::PostCallback
        )
    }
}

/// Who receives a broadcast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Audience {
    #[default]
    Users,
    Channels,
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Audience::Users => write!(f, "users"),
            Audience::Channels => write!(f, "channels"),
        }
    }
}

impl FromStr for Audience {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "users" => Ok(Audience::Users),
            "channels" => Ok(Audience::Channels),
            _ => Err(()),
        }
    }
}

/// Post being composed through the Post* states
#[derive(Debug, Clone, PartialEq)]
pub struct PostDraft {
    pub channel_id: String,
    pub text: Option<String>,
    pub media: Option<PostMedia>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub buttons: Vec<PostButton>,
}

impl PostDraft {
    pub fn new(channel_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            text: None,
            media: None,
            scheduled_at: None,
            buttons: Vec::new(),
        }
    }
}

/// Per-chat conversation data
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub state: State,
    pub draft: Option<PostDraft>,
    pub audience: Audience,
}

impl Session {
    pub fn new(state: State) -> Self {
        Self {
            state,
            draft: None,
            audience: Audience::default(),
        }
    }

    /// Move to another state; leaving the post flow drops the draft
    pub fn enter(&mut self, state: State) {
        if !state.is_post_flow() {
            self.draft = None;
        }
        if state != State::Broadcast {
            self.audience = Audience::default();
        }
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaving_post_flow_drops_draft() {
        let mut session = Session::new(State::PostChannelSelect);
        session.draft = Some(PostDraft::new("@news_feed"));

        session.enter(State::PostContent);
        assert!(session.draft.is_some());

        session.enter(State::MainMenu);
        assert_eq!(session.state, State::MainMenu);
        assert!(session.draft.is_none());
    }

    #[test]
    fn test_audience_resets_outside_broadcast() {
        let mut session = Session::new(State::Broadcast);
        session.audience = Audience::Channels;
        session.enter(State::Broadcast);
        assert_eq!(session.audience, Audience::Channels);
        session.enter(State::MainMenu);
        assert_eq!(session.audience, Audience::Users);
    }

    #[test]
    fn test_fifteen_states() {
        assert_eq!(State::ALL.len(), 15);
        assert_eq!(State::ALL.iter().filter(|s| s.is_post_flow()).count(), 6);
    }
}
