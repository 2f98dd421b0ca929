use url::Url;
use yoroolbot::keyboard::{ButtonData, Keyboard, MAX_CALLBACK_DATA_LEN};

use crate::storages::PostButton;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ButtonParseError {
    #[error("no buttons found")]
    Empty,
    #[error("line {0}: expected `Label - https://link`")]
    UrlLine(usize),
    #[error("line {0}: {1:?} is not an http(s) or t.me link")]
    InvalidUrl(usize, String),
    #[error("line {0}: expected `Label | data`")]
    CallbackLine(usize),
    #[error("line {0}: callback data is longer than 64 bytes")]
    CallbackTooLong(usize),
}

fn numbered_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}

fn parse_link(line: usize, link: &str) -> Result<Url, ButtonParseError> {
    let invalid = || ButtonParseError::InvalidUrl(line, link.to_string());
    let url = Url::parse(link).map_err(|_| invalid())?;
    match url.scheme() {
        "http" | "https" | "tg" => Ok(url),
        _ => Err(invalid()),
    }
}

/// Parse url buttons, one `Label - https://link` per line
pub fn parse_url_buttons(text: &str) -> Result<Vec<PostButton>, ButtonParseError> {
    let mut buttons = Vec::new();
    for (line, content) in numbered_lines(text) {
        let Some((label, link)) = content.rsplit_once(" - ") else {
            return Err(ButtonParseError::UrlLine(line));
        };
        let (label, link) = (label.trim(), link.trim());
        if label.is_empty() || link.is_empty() {
            return Err(ButtonParseError::UrlLine(line));
        }
        let url = parse_link(line, link)?;
        buttons.push(PostButton::Url {
            label: label.to_string(),
            url: url.to_string(),
        });
    }
    if buttons.is_empty() {
        return Err(ButtonParseError::Empty);
    }
    Ok(buttons)
}

/// Parse callback buttons, one `Label | data` per line
pub fn parse_callback_buttons(text: &str) -> Result<Vec<PostButton>, ButtonParseError> {
    let mut buttons = Vec::new();
    for (line, content) in numbered_lines(text) {
        let Some((label, data)) = content.split_once('|') else {
            return Err(ButtonParseError::CallbackLine(line));
        };
        let (label, data) = (label.trim(), data.trim());
        if label.is_empty() || data.is_empty() {
            return Err(ButtonParseError::CallbackLine(line));
        }
        if data.len() > MAX_CALLBACK_DATA_LEN {
            return Err(ButtonParseError::CallbackTooLong(line));
        }
        buttons.push(PostButton::Callback {
            label: label.to_string(),
            data: data.to_string(),
        });
    }
    if buttons.is_empty() {
        return Err(ButtonParseError::Empty);
    }
    Ok(buttons)
}

/// One row per button, in the order they were given
pub fn post_keyboard(buttons: &[PostButton]) -> Keyboard {
    buttons
        .iter()
        .filter_map(|button| match button {
            PostButton::Url { label, url } => match Url::parse(url) {
                Ok(url) => Some(ButtonData::Url(label.clone(), url)),
                Err(e) => {
                    log::warn!("Skipping button {:?} with invalid url {:?}: {}", label, url, e);
                    None
                }
            },
            PostButton::Callback { label, data } => Some(ButtonData::callback(label, data)),
        })
        .map(|button| vec![button])
        .collect()
}
