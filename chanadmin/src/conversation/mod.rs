//! Admin conversation: menu states, the routing table and the machine driving them

mod event;
mod machine;
mod reply;
mod router;
mod state;

pub use event::{CallbackToken, Event};
pub use machine::ConversationMachine;
pub use reply::{Destination, OutgoingMessage, Reply, Transition};
pub use state::{Audience, PostDraft, Session, State};

/// Telegram user an event came from
#[derive(Debug, Clone, PartialEq)]
pub struct Sender {
    pub id: u64,
    pub username: Option<String>,
    pub first_name: String,
}
