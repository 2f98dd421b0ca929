use teloxide::types::{ChatId, Recipient};
use yoroolbot::{markdown::MarkdownString, markdown_format};

use crate::{
    conversation::{Audience, CallbackToken, OutgoingMessage, Reply, Session, State, Transition},
    menus::{MenuContext, button, main_menu::show_main_menu, menu, notice},
};

/// Everyone the broadcast goes to; the admin sending it is left out
async fn recipients(ctx: &MenuContext<'_>, audience: Audience) -> Vec<Recipient> {
    match audience {
        Audience::Users => ctx
            .users()
            .list_users()
            .await
            .into_iter()
            .filter_map(|user| user.id.parse::<i64>().ok())
            .filter(|id| *id != ctx.sender.id as i64)
            .map(|id| Recipient::Id(ChatId(id)))
            .collect(),
        Audience::Channels => ctx
            .channels()
            .list_channels()
            .await
            .iter()
            .map(|channel| channel.recipient())
            .collect(),
    }
}

pub async fn show_broadcast(ctx: &MenuContext<'_>, audience: Audience) -> Transition {
    let count = recipients(ctx, audience).await.len();
    let text = markdown_format!(
        "🌐 *Broadcast Message*\n\nAudience: *{}* \\({} recipients\\)\n\n\
         Send the message text to broadcast it\\.",
        audience.to_string(),
        count
    );
    let option = |label: &str, target: Audience| {
        let mark = if target == audience { "✅ " } else { "" };
        button(format!("{}{}", mark, label), CallbackToken::BroadcastTo(target))
    };
    let keyboard = vec![vec![
        option("👥 Users", Audience::Users),
        option("📢 Channels", Audience::Channels),
    ]];
    Transition::to(State::Broadcast).reply(menu(text, keyboard))
}

pub async fn set_audience(
    ctx: &MenuContext<'_>,
    session: &mut Session,
    audience: Audience,
) -> Transition {
    session.audience = audience;
    show_broadcast(ctx, audience).await
}

/// One message per recipient; delivery failures are the adapter's to log
pub async fn send_broadcast(ctx: &MenuContext<'_>, audience: Audience, text: &str) -> Transition {
    let recipients = recipients(ctx, audience).await;
    if recipients.is_empty() {
        return notice(
            markdown_format!("⚠️ There are no {} to broadcast to\\.", audience.to_string()),
            show_main_menu(),
        );
    }
    log::info!(
        "Broadcasting to {} {} on behalf of {}",
        recipients.len(),
        audience,
        ctx.sender.id
    );

    let body = MarkdownString::escape(text);
    let messages: Vec<Reply> = recipients
        .into_iter()
        .map(|recipient| OutgoingMessage::new(body.clone()).to(recipient).into())
        .collect();
    let count = messages.len();
    let mut transition = notice(
        markdown_format!("📣 Broadcasting to {} {}\\.", count, audience.to_string()),
        show_main_menu(),
    );
    let mut replies = messages;
    replies.append(&mut transition.replies);
    transition.replies = replies;
    transition
}
