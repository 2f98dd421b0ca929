use yoroolbot::{keyboard::Keyboard, markdown::MarkdownString, markdown_format, markdown_string};

use crate::{
    conversation::{CallbackToken, State, Transition},
    menus::{MenuContext, button, menu},
    storages::User,
};

/// Longest user list sent in one message
const MAX_LISTED_USERS: usize = 50;

fn keyboard() -> Keyboard {
    vec![vec![button("📋 List Users", CallbackToken::ListUsers)]]
}

pub async fn show_user_management(ctx: &MenuContext<'_>) -> Transition {
    let users = ctx.users().list_users().await;
    let admins = users.iter().filter(|user| user.is_admin).count();
    let text = markdown_format!(
        "👥 *User Management*\n\nRegistered users: *{}*\nAdministrators: *{}*",
        users.len(),
        admins
    );
    Transition::to(State::UserManagement).reply(menu(text, keyboard()))
}

fn user_line(user: &User) -> MarkdownString {
    let username = user
        .username
        .as_deref()
        .map(|name| format!(" @{}", name))
        .unwrap_or_default();
    let badge = if user.is_admin {
        markdown_string!(" 👑")
    } else {
        MarkdownString::new()
    };
    markdown_format!(
        "• {}{} `{}`{}\n  joined {}",
        &user.first_name,
        username,
        &user.id,
        badge,
        user.joined_at.format("%Y-%m-%d").to_string()
    )
}

pub async fn list_users(ctx: &MenuContext<'_>) -> Transition {
    let users = ctx.users().list_users().await;
    let text = if users.is_empty() {
        markdown_string!("📋 _No users registered yet\\._")
    } else {
        let mut text = markdown_format!(
            "📋 *Users*\n\n{}",
            MarkdownString::join(
                users.iter().take(MAX_LISTED_USERS).map(user_line),
                &markdown_string!("\n")
            )
        );
        if users.len() > MAX_LISTED_USERS {
            text = text
                + markdown_format!("\n\n…and {} more", users.len() - MAX_LISTED_USERS);
        }
        text
    };
    Transition::to(State::UserManagement).reply(menu(text, keyboard()))
}
