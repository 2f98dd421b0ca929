use yoroolbot::{markdown::MarkdownString, markdown_format, markdown_string};

use crate::{
    conversation::{CallbackToken, State, Transition},
    menus::{MenuContext, button, menu, notice, stay},
    storages::PostButton,
    utils::buttons::parse_url_buttons,
};

/// Favorites submenu; it lives in the main menu state
pub async fn show_favorites(ctx: &MenuContext<'_>) -> Transition {
    let settings = ctx.settings().get_settings().await;
    let text = markdown_format!(
        "⭐ *Favorites*\n\n🔘 Favorite buttons: *{}*\n📢 Favorite channels: *{}*",
        settings.favorite_buttons.len(),
        settings.favorite_channels.len()
    );
    let keyboard = vec![vec![
        button("🔘 Favorite Buttons", CallbackToken::FavoriteButtons),
        button("📢 Favorite Channels", CallbackToken::FavoriteChannels),
    ]];
    Transition::to(State::MainMenu).reply(menu(text, keyboard))
}

fn favorite_button_line(button: &PostButton) -> MarkdownString {
    match button {
        PostButton::Url { label, url } => markdown_format!("• {} → `{}`", label, url),
        PostButton::Callback { label, data } => markdown_format!("• {} → callback `{}`", label, data),
    }
}

pub async fn show_favorite_buttons(ctx: &MenuContext<'_>) -> Transition {
    let buttons = ctx.settings().get_settings().await.favorite_buttons;
    let listing = if buttons.is_empty() {
        markdown_string!("_No favorite buttons yet\\._")
    } else {
        MarkdownString::join(buttons.iter().map(favorite_button_line), &markdown_string!("\n"))
    };
    let text = markdown_format!(
        "🔘 *Favorite Buttons*\n\n{}\n\n\
         Send buttons as `Label \\- https://example\\.com`, one per line, to replace the list\\.",
        listing
    );
    let keyboard = vec![vec![
        button("🗑 Clear", CallbackToken::ClearFavoriteButtons),
        button("↩️ Back", CallbackToken::Favorites),
    ]];
    Transition::to(State::FavoriteButtons).reply(menu(text, keyboard))
}

pub async fn set_favorite_buttons(ctx: &MenuContext<'_>, input: &str) -> Transition {
    let buttons = match parse_url_buttons(input) {
        Ok(buttons) => buttons,
        Err(e) => return stay(State::FavoriteButtons, markdown_format!("❌ {}", e.to_string())),
    };
    let count = buttons.len();
    ctx.settings()
        .update_settings(|settings| settings.favorite_buttons = buttons)
        .await;
    notice(
        markdown_format!("✅ Saved {} favorite buttons\\.", count),
        show_favorite_buttons(ctx).await,
    )
}

pub async fn clear_favorite_buttons(ctx: &MenuContext<'_>) -> Transition {
    ctx.settings()
        .update_settings(|settings| settings.favorite_buttons.clear())
        .await;
    notice(
        markdown_string!("🗑 Favorite buttons cleared\\."),
        show_favorite_buttons(ctx).await,
    )
}

pub async fn show_favorite_channels(ctx: &MenuContext<'_>) -> Transition {
    let channels = ctx.channels().list_channels().await;
    let settings = ctx.settings().get_settings().await;
    let text = if channels.is_empty() {
        markdown_string!("📢 *Favorite Channels*\n\n_No channels are managed yet\\._")
    } else {
        markdown_string!(
            "📢 *Favorite Channels*\n\nFavorite channels come first when creating a post\\. \
             Tap a channel to toggle it\\."
        )
    };
    let mut keyboard: Vec<_> = channels
        .iter()
        .map(|channel| {
            let mark = if settings.is_favorite_channel(&channel.id) {
                "⭐"
            } else {
                "☆"
            };
            vec![button(
                format!("{} {}", mark, channel.title),
                CallbackToken::ToggleFavoriteChannel(channel.id.clone()),
            )]
        })
        .collect();
    keyboard.push(vec![button("↩️ Back", CallbackToken::Favorites)]);
    Transition::to(State::FavoriteChannels).reply(menu(text, keyboard))
}

pub async fn toggle_favorite_channel(ctx: &MenuContext<'_>, id: &str) -> Transition {
    let managed = ctx.channels().get_channel(id).await.is_some();
    let mut favorite = false;
    let settings = ctx
        .settings()
        .update_settings(|settings| {
            // A channel that is no longer managed can only leave the favorites
            if managed || settings.is_favorite_channel(id) {
                favorite = settings.toggle_favorite_channel(id);
            }
        })
        .await;
    log::info!(
        "Channel {} favorite: {} ({} favorites)",
        id,
        favorite,
        settings.favorite_channels.len()
    );
    show_favorite_channels(ctx).await
}
