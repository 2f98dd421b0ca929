use teloxide::types::Recipient;
use yoroolbot::{keyboard::Keyboard, markdown::MarkdownString};

use crate::{conversation::state::State, storages::PostMedia};

/// Where an outgoing message goes
#[derive(Debug, Clone, PartialEq)]
pub enum Destination {
    /// The chat the event came from
    CurrentChat,
    Recipient(Recipient),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMessage {
    pub destination: Destination,
    pub text: MarkdownString,
    pub media: Option<PostMedia>,
    pub keyboard: Option<Keyboard>,
    pub silent: bool,
}

impl OutgoingMessage {
    pub fn new(text: MarkdownString) -> Self {
        Self {
            destination: Destination::CurrentChat,
            text,
            media: None,
            keyboard: None,
            silent: false,
        }
    }

    pub fn keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }

    pub fn to(mut self, recipient: Recipient) -> Self {
        self.destination = Destination::Recipient(recipient);
        self
    }

    pub fn media(mut self, media: Option<PostMedia>) -> Self {
        self.media = media;
        self
    }

    /// Deliver without a notification sound
    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }
}

/// Something the adapter has to render
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Message(OutgoingMessage),
    /// One message edited through `frames` with a typing indicator in between, ending as `last`
    Animation {
        frames: Vec<MarkdownString>,
        last: OutgoingMessage,
    },
}

impl From<OutgoingMessage> for Reply {
    fn from(message: OutgoingMessage) -> Self {
        Reply::Message(message)
    }
}

/// Result of a handler: what to send and where the conversation goes next
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub replies: Vec<Reply>,
    /// `None` ends the conversation
    pub next: Option<State>,
}

impl Transition {
    pub fn to(state: State) -> Self {
        Self {
            replies: Vec::new(),
            next: Some(state),
        }
    }

    pub fn reply(mut self, reply: impl Into<Reply>) -> Self {
        self.replies.push(reply.into());
        self
    }
}
