use uuid::Uuid;
use yoroolbot::{markdown::MarkdownString, markdown_format, markdown_string};

use crate::{
    conversation::{CallbackToken, OutgoingMessage, PostDraft, Session, State, Transition},
    menus::{
        MenuContext, button, channels::no_channels_message, main_menu::show_main_menu, menu,
        notice, stay,
    },
    storages::{PostMedia, ScheduledPost},
    utils::{
        buttons::{parse_callback_buttons, parse_url_buttons, post_keyboard},
        format_timestamp,
        schedule::parse_schedule,
    },
};

/// Characters of post text shown in the scheduled posts list
const PREVIEW_CHARS: usize = 40;

fn draft_lost() -> Transition {
    notice(
        markdown_string!("⚠️ The post draft was lost, please start again\\."),
        show_main_menu(),
    )
}

/// Channel picker, favorite channels first
pub async fn start_post(ctx: &MenuContext<'_>) -> Transition {
    let mut channels = ctx.channels().list_channels().await;
    if channels.is_empty() {
        return Transition::to(State::MainMenu).reply(no_channels_message());
    }
    let settings = ctx.settings().get_settings().await;
    channels.sort_by_key(|channel| !settings.is_favorite_channel(&channel.id));

    let keyboard = channels
        .iter()
        .map(|channel| {
            let mark = if settings.is_favorite_channel(&channel.id) {
                "⭐"
            } else {
                "📢"
            };
            vec![button(
                format!("{} {}", mark, channel.title),
                CallbackToken::PostChannel(channel.id.clone()),
            )]
        })
        .collect();
    Transition::to(State::PostChannelSelect).reply(menu(
        markdown_string!("📝 *Create Post*\n\nSelect the channel to post to:"),
        keyboard,
    ))
}

pub async fn select_channel(ctx: &MenuContext<'_>, session: &mut Session, id: &str) -> Transition {
    if ctx.channels().get_channel(id).await.is_none() {
        return stay(
            State::PostChannelSelect,
            markdown_format!("⚠️ Channel `{}` is not managed anymore, pick another one\\.", id),
        );
    }
    session.draft = Some(PostDraft::new(id));
    Transition::to(State::PostContent).reply(menu(
        markdown_format!(
            "✍️ Posting to `{}`\\.\n\nSend the post text, or a photo, video or document with a caption\\.",
            id
        ),
        vec![],
    ))
}

fn media_prompt() -> Transition {
    Transition::to(State::PostMedia).reply(menu(
        markdown_string!("🖼 Send a photo, video or document to attach, or skip this step\\."),
        vec![vec![button("⏭ Skip Media", CallbackToken::SkipMedia)]],
    ))
}

fn schedule_prompt() -> Transition {
    Transition::to(State::PostSchedule).reply(menu(
        markdown_string!(
            "📅 When should it be published?\n\n\
             Send `YYYY\\-MM\\-DD HH:MM` \\(UTC\\) or an offset like `\\+30m`, `\\+2h`, `\\+1d`\\."
        ),
        vec![vec![button("🚀 Publish Now", CallbackToken::PublishNow)]],
    ))
}

async fn buttons_prompt(ctx: &MenuContext<'_>) -> Transition {
    let favorites = ctx.settings().get_settings().await.favorite_buttons;
    let mut keyboard = Vec::new();
    if !favorites.is_empty() {
        keyboard.push(vec![button(
            format!("⭐ Use Favorite Buttons ({})", favorites.len()),
            CallbackToken::UseFavoriteButtons,
        )]);
    }
    keyboard.push(vec![button("⏭ Skip Buttons", CallbackToken::SkipButtons)]);
    Transition::to(State::PostButtons).reply(menu(
        markdown_string!(
            "🔘 Send link buttons, one per line as `Label \\- https://example\\.com`, or skip\\."
        ),
        keyboard,
    ))
}

fn callback_prompt() -> Transition {
    Transition::to(State::PostCallback).reply(menu(
        markdown_string!(
            "🔁 Send callback buttons, one per line as `Label \\| data` \
             \\(data up to 64 bytes\\), or skip\\."
        ),
        vec![vec![button("⏭ Skip", CallbackToken::SkipCallback)]],
    ))
}

pub fn set_text(session: &mut Session, text: String) -> Transition {
    let Some(draft) = session.draft.as_mut() else {
        return draft_lost();
    };
    draft.text = Some(text);
    media_prompt()
}

/// Media sent as content: the caption becomes the text and the media step is done
pub fn set_text_with_media(session: &mut Session, media: PostMedia, caption: String) -> Transition {
    let Some(draft) = session.draft.as_mut() else {
        return draft_lost();
    };
    draft.text = Some(caption);
    draft.media = Some(media);
    schedule_prompt()
}

pub fn set_media(session: &mut Session, media: PostMedia) -> Transition {
    let Some(draft) = session.draft.as_mut() else {
        return draft_lost();
    };
    draft.media = Some(media);
    schedule_prompt()
}

pub fn skip_media(session: &Session) -> Transition {
    if session.draft.is_none() {
        return draft_lost();
    }
    schedule_prompt()
}

pub async fn set_schedule(ctx: &MenuContext<'_>, session: &mut Session, input: &str) -> Transition {
    let Some(draft) = session.draft.as_mut() else {
        return draft_lost();
    };
    match parse_schedule(input, ctx.now) {
        Ok(scheduled_at) => {
            draft.scheduled_at = Some(scheduled_at);
            buttons_prompt(ctx).await
        }
        Err(e) => stay(State::PostSchedule, markdown_format!("❌ {}", e.to_string())),
    }
}

pub async fn publish_now(ctx: &MenuContext<'_>, session: &mut Session) -> Transition {
    let Some(draft) = session.draft.as_mut() else {
        return draft_lost();
    };
    draft.scheduled_at = Some(ctx.now);
    buttons_prompt(ctx).await
}

pub fn set_url_buttons(session: &mut Session, input: &str) -> Transition {
    let Some(draft) = session.draft.as_mut() else {
        return draft_lost();
    };
    match parse_url_buttons(input) {
        Ok(buttons) => {
            draft.buttons = buttons;
            callback_prompt()
        }
        Err(e) => stay(State::PostButtons, markdown_format!("❌ {}", e.to_string())),
    }
}

pub async fn use_favorite_buttons(ctx: &MenuContext<'_>, session: &mut Session) -> Transition {
    let Some(draft) = session.draft.as_mut() else {
        return draft_lost();
    };
    let favorites = ctx.settings().get_settings().await.favorite_buttons;
    if favorites.is_empty() {
        return stay(
            State::PostButtons,
            markdown_string!("⚠️ No favorite buttons saved yet\\. Send buttons or skip\\."),
        );
    }
    draft.buttons = favorites;
    callback_prompt()
}

pub fn skip_url_buttons(session: &Session) -> Transition {
    if session.draft.is_none() {
        return draft_lost();
    }
    callback_prompt()
}

pub async fn set_callback_buttons(
    ctx: &MenuContext<'_>,
    session: &mut Session,
    input: &str,
) -> Transition {
    let Some(draft) = session.draft.as_mut() else {
        return draft_lost();
    };
    match parse_callback_buttons(input) {
        Ok(buttons) => {
            draft.buttons.extend(buttons);
            finish_post(ctx, session).await
        }
        Err(e) => stay(State::PostCallback, markdown_format!("❌ {}", e.to_string())),
    }
}

pub async fn skip_callback_buttons(ctx: &MenuContext<'_>, session: &mut Session) -> Transition {
    finish_post(ctx, session).await
}

/// Store the draft as a scheduled post, signed, and go back to the main menu
async fn finish_post(ctx: &MenuContext<'_>, session: &mut Session) -> Transition {
    let Some(draft) = session.draft.take() else {
        return draft_lost();
    };
    let Some(channel) = ctx.channels().get_channel(&draft.channel_id).await else {
        return notice(
            markdown_format!("⚠️ Channel `{}` is not managed anymore\\.", &draft.channel_id),
            show_main_menu(),
        );
    };

    let settings = ctx.settings().get_settings().await;
    let post = ScheduledPost {
        id: Uuid::new_v4().to_string(),
        channel_id: channel.id.clone(),
        text: settings.sign(draft.text.as_deref().unwrap_or_default()),
        media: draft.media,
        buttons: draft.buttons,
        scheduled_at: draft.scheduled_at.unwrap_or(ctx.now),
        created_at: ctx.now,
    };
    if !ctx.posts().add_post(&post).await {
        return notice(
            markdown_string!("❌ Could not save the post, see the bot log\\."),
            show_main_menu(),
        );
    }
    log::info!(
        "Post {} for {} scheduled at {}",
        post.id,
        post.channel_id,
        post.scheduled_at
    );

    let mut preview = OutgoingMessage::new(MarkdownString::escape(&post.text)).media(post.media.clone());
    if !post.buttons.is_empty() {
        preview = preview.keyboard(post_keyboard(&post.buttons));
    }
    let confirmation = if post.scheduled_at <= ctx.now {
        markdown_format!(
            "✅ Post queued for *{}*, it goes out within {} seconds\\.",
            &channel.title,
            ctx.config.dispatch_interval.as_secs()
        )
    } else {
        markdown_format!(
            "✅ Post scheduled for *{}* at `{}`\\.",
            &channel.title,
            format_timestamp(post.scheduled_at)
        )
    };

    let mut transition = notice(confirmation, show_main_menu());
    transition.replies.insert(0, preview.into());
    transition
}

pub async fn show_scheduled_posts(ctx: &MenuContext<'_>) -> Transition {
    let posts = ctx.posts().list_posts().await;
    if posts.is_empty() {
        return Transition::to(State::MainMenu).reply(menu(
            markdown_string!("📅 *Scheduled Posts*\n\n_Nothing is scheduled\\._"),
            vec![vec![button("📝 Create Post", CallbackToken::CreatePost)]],
        ));
    }

    let lines = posts.iter().enumerate().map(|(index, post)| {
        let mut preview: String = post.text.chars().take(PREVIEW_CHARS).collect();
        if post.text.chars().count() > PREVIEW_CHARS {
            preview.push('…');
        }
        let media = post
            .media
            .as_ref()
            .map(|media| format!(" [{}]", media.kind()))
            .unwrap_or_default();
        markdown_format!(
            "{}\\. `{}` → `{}`{}\n{}",
            index + 1,
            format_timestamp(post.scheduled_at),
            &post.channel_id,
            media,
            preview
        )
    });
    let text = markdown_format!(
        "📅 *Scheduled Posts* \\({}\\)\n\n{}",
        posts.len(),
        MarkdownString::join(lines, &markdown_string!("\n\n"))
    );
    let keyboard = posts
        .iter()
        .enumerate()
        .map(|(index, post)| {
            vec![button(
                format!("🗑 Delete #{}", index + 1),
                CallbackToken::DeletePost(post.id.clone()),
            )]
        })
        .collect();
    Transition::to(State::MainMenu).reply(menu(text, keyboard))
}

pub async fn delete_post(ctx: &MenuContext<'_>, id: &str) -> Transition {
    let text = if ctx.posts().remove_post(id).await {
        log::info!("Post {} deleted by {}", id, ctx.sender.id);
        markdown_string!("🗑 Post deleted\\.")
    } else {
        markdown_string!("⚠️ The post was already published or deleted\\.")
    };
    notice(text, show_scheduled_posts(ctx).await)
}
