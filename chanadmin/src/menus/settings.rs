use yoroolbot::{markdown::MarkdownString, markdown_format, markdown_string};

use crate::{
    conversation::{CallbackToken, State, Transition},
    menus::{MenuContext, button, menu, notice},
};

pub async fn show_bot_settings(ctx: &MenuContext<'_>) -> Transition {
    let settings = ctx.settings().get_settings().await;
    let signature = match settings.signature.as_deref() {
        Some(signature) if !signature.is_empty() => MarkdownString::escape(signature),
        _ => markdown_string!("_not set_"),
    };
    let (silent, silent_label) = if settings.silent_posts {
        ("on", "🔕 Silent Posts: ON")
    } else {
        ("off", "🔔 Silent Posts: OFF")
    };
    let text = markdown_format!(
        "⚙️ *Bot Settings*\n\n✍️ Signature: {}\n🔕 Silent posts: *{}*",
        signature,
        silent
    );
    let keyboard = vec![
        vec![
            button("✍️ Edit Signature", CallbackToken::EditSignature),
            button("🗑 Clear Signature", CallbackToken::ClearSignature),
        ],
        vec![button(silent_label, CallbackToken::ToggleSilentPosts)],
    ];
    Transition::to(State::BotSettings).reply(menu(text, keyboard))
}

pub fn edit_signature() -> Transition {
    Transition::to(State::Signature).reply(menu(
        markdown_string!(
            "✍️ Send the signature to append to every new post, for example `@my_channel`\\."
        ),
        vec![vec![
            button("🗑 Clear Signature", CallbackToken::ClearSignature),
            button("↩️ Back", CallbackToken::BotSettings),
        ]],
    ))
}

pub async fn set_signature(ctx: &MenuContext<'_>, signature: &str) -> Transition {
    let signature = signature.trim().to_string();
    ctx.settings()
        .update_settings(|settings| {
            settings.signature = Some(signature).filter(|s| !s.is_empty())
        })
        .await;
    notice(
        markdown_string!("✅ Signature saved\\."),
        show_bot_settings(ctx).await,
    )
}

pub async fn clear_signature(ctx: &MenuContext<'_>) -> Transition {
    ctx.settings()
        .update_settings(|settings| settings.signature = None)
        .await;
    notice(
        markdown_string!("🗑 Signature cleared\\."),
        show_bot_settings(ctx).await,
    )
}

pub async fn toggle_silent_posts(ctx: &MenuContext<'_>) -> Transition {
    let settings = ctx
        .settings()
        .update_settings(|settings| settings.silent_posts = !settings.silent_posts)
        .await;
    log::info!("Silent posts switched to {}", settings.silent_posts);
    show_bot_settings(ctx).await
}
