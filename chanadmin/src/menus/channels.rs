use yoroolbot::{markdown::MarkdownString, markdown_format, markdown_string};

use crate::{
    conversation::{CallbackToken, OutgoingMessage, State, Transition},
    menus::{MenuContext, button, menu, notice, stay},
    storages::parse_channel_id,
};

pub async fn show_channel_management(ctx: &MenuContext<'_>) -> Transition {
    let channels = ctx.channels().list_channels().await;

    let listing = if channels.is_empty() {
        markdown_string!("_No channels yet\\._")
    } else {
        let lines = channels
            .iter()
            .map(|channel| markdown_format!("• *{}* `{}`", &channel.title, &channel.id));
        MarkdownString::join(lines, &markdown_string!("\n"))
    };
    let text = markdown_format!(
        "📢 *Channel Management*\n\n{}\n\n\
         To add a channel send its @username or numeric id, optionally followed by a title\\. \
         The bot must be an administrator of the channel\\.",
        listing
    );

    let mut keyboard: Vec<_> = channels
        .iter()
        .map(|channel| {
            vec![button(
                format!("❌ Remove {}", channel.title),
                CallbackToken::RemoveChannel(channel.id.clone()),
            )]
        })
        .collect();
    keyboard.push(vec![button("➕ Add Channel", CallbackToken::AddChannel)]);

    Transition::to(State::ChannelManagement).reply(menu(text, keyboard))
}

pub fn prompt_add_channel() -> Transition {
    Transition::to(State::ChannelManagement).reply(menu(
        markdown_string!(
            "➕ Send the channel as `@username`, `https://t\\.me/username` or numeric id \
             like `\\-1001234567890`, optionally followed by a title\\."
        ),
        vec![vec![button("↩️ Back", CallbackToken::ChannelManagement)]],
    ))
}

/// `<channel id> [title]`
pub async fn add_channel(ctx: &MenuContext<'_>, input: &str) -> Transition {
    let mut parts = input.trim().splitn(2, char::is_whitespace);
    let raw_id = parts.next().unwrap_or_default();
    let Some(id) = parse_channel_id(raw_id) else {
        return stay(
            State::ChannelManagement,
            markdown_format!(
                "❌ `{}` is not a channel username or id\\. Try `@my_channel` or `\\-1001234567890`\\.",
                raw_id
            ),
        );
    };
    let title = parts
        .next()
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .unwrap_or(id.as_str())
        .to_string();

    if !ctx.channels().add_channel(&id, &title).await {
        return stay(
            State::ChannelManagement,
            markdown_format!("⚠️ Channel `{}` is already managed\\.", &id),
        );
    }
    log::info!("Channel {} added by {}", id, ctx.sender.id);
    notice(
        markdown_format!("✅ Channel *{}* added\\.", title),
        show_channel_management(ctx).await,
    )
}

pub async fn remove_channel(ctx: &MenuContext<'_>, id: &str) -> Transition {
    if !ctx.channels().remove_channel(id).await {
        return notice(
            markdown_format!("⚠️ Channel `{}` is not managed anymore\\.", id),
            show_channel_management(ctx).await,
        );
    }
    ctx.settings()
        .update_settings(|settings| settings.favorite_channels.retain(|c| c != id))
        .await;
    log::info!("Channel {} removed by {}", id, ctx.sender.id);
    notice(
        markdown_format!("🗑 Channel `{}` removed\\.", id),
        show_channel_management(ctx).await,
    )
}

/// Shown instead of a channel picker while no channel is managed
pub fn no_channels_message() -> OutgoingMessage {
    menu(
        markdown_string!("📭 No channels yet\\. Add one in *Manage Channels* first\\."),
        vec![vec![button("📢 Manage Channels", CallbackToken::ChannelManagement)]],
    )
}
