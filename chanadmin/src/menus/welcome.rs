use yoroolbot::{markdown::MarkdownString, markdown_format, markdown_string};

use crate::{
    conversation::{CallbackToken, State, Transition},
    menus::{MenuContext, button, menu, notice},
};

pub async fn show_welcome_message(ctx: &MenuContext<'_>) -> Transition {
    let current = match ctx.settings().get_settings().await.welcome_message {
        Some(message) => MarkdownString::escape(message),
        None => markdown_string!("_not set_"),
    };
    let text = markdown_format!(
        "🎉 *Welcome Message*\n\nShown to everyone else who sends /start\\.\n\nCurrent: {}\n\n\
         Send a new text to replace it\\.",
        current
    );
    Transition::to(State::WelcomeMessage).reply(menu(
        text,
        vec![vec![button("🗑 Clear Welcome Message", CallbackToken::ClearWelcome)]],
    ))
}

pub async fn set_welcome_message(ctx: &MenuContext<'_>, text: &str) -> Transition {
    let text = text.trim().to_string();
    ctx.settings()
        .update_settings(|settings| {
            settings.welcome_message = Some(text).filter(|t| !t.is_empty())
        })
        .await;
    notice(
        markdown_string!("✅ Welcome message saved\\."),
        show_welcome_message(ctx).await,
    )
}

pub async fn clear_welcome_message(ctx: &MenuContext<'_>) -> Transition {
    ctx.settings()
        .update_settings(|settings| settings.welcome_message = None)
        .await;
    notice(
        markdown_string!("🗑 Welcome message cleared\\."),
        show_welcome_message(ctx).await,
    )
}
