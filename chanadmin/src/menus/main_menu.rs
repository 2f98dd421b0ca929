use yoroolbot::{keyboard::Keyboard, markdown::MarkdownString, markdown_format, markdown_string};

use crate::{
    conversation::{CallbackToken, OutgoingMessage, Reply, State, Transition},
    menus::button,
};

/// Number of "Initializing..." edits before the welcome screen
const INITIALIZING_STEPS: usize = 3;

/// Eight top-level options, two per row
pub fn main_menu_keyboard() -> Keyboard {
    let labels = [
        "📢 Manage Channels",
        "📝 Create Post",
        "📅 Scheduled Posts",
        "🌐 Broadcast Message",
        "👥 User Management",
        "⚙️ Bot Settings",
        "🎉 Welcome Message",
        "⭐ Favorites",
    ];
    labels
        .into_iter()
        .zip(CallbackToken::MAIN_MENU)
        .map(|(label, token)| button(label, token))
        .collect::<Vec<_>>()
        .chunks(2)
        .map(|row| row.to_vec())
        .collect()
}

fn initializing_frame(step: usize) -> MarkdownString {
    markdown_format!(
        "🤖 Initializing Advanced Multi\\-Channel Telegram Bot{}",
        MarkdownString::escape(".".repeat(step))
    )
}

fn welcome_screen(first_name: &str) -> MarkdownString {
    markdown_format!(
        "🎉 Welcome, {}\\!\n\n\
         🚀 *Advanced Multi\\-Channel Telegram Bot* at your service\\.\n\n\
         🔧 *Features*:\n   \
         • Multi\\-channel management\n   \
         • Advanced post scheduling\n   \
         • Rich media support\n   \
         • User management\n   \
         • Customizable settings\n   \
         • Welcome messages\n   \
         • Favorite buttons and channels\n\n\
         Please select an option from the menu below:",
        first_name
    )
}

/// Start screen for the admin: a message edited through the initializing frames into the
/// welcome text with the main menu
pub fn start_screen(first_name: &str) -> Reply {
    Reply::Animation {
        frames: (0..=INITIALIZING_STEPS).map(initializing_frame).collect(),
        last: OutgoingMessage::new(welcome_screen(first_name)).keyboard(main_menu_keyboard()),
    }
}

pub fn show_main_menu() -> Transition {
    Transition::to(State::MainMenu).reply(
        OutgoingMessage::new(markdown_string!(
            "🏠 *Main Menu*\n\nPlease select an option from the menu below:"
        ))
        .keyboard(main_menu_keyboard()),
    )
}
