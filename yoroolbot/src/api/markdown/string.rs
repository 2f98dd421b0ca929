use std::{fmt, ops::Add};

use teloxide::{
    Bot,
    payloads::{EditMessageTextSetters, SendMessage, SendMessageSetters},
    prelude::Requester,
    requests::JsonRequest,
    types::{MessageId, ParseMode, Recipient},
};

/// A wrapper around String that ensures safe MarkdownV2 formatting for Telegram messages.
///
/// Ways to build one:
/// 1. `markdown_string!` macro - literal validated at compile time
/// 2. `markdown_format!` macro - validated template with escaped arguments
/// 3. `escape` constructor or `From`/`Into` - escapes everything in the input
///
/// There is no public constructor taking raw markdown, so every MarkdownString is either
/// validated or escaped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MarkdownString(String);

/// Maximum message length allowed by Telegram Bot API
/// See: https://core.telegram.org/bots/api#sendmessage
pub const TELEGRAM_MAX_MESSAGE_LENGTH: usize = 4096;

const TRUNCATION_MARKER: &str = "\\.\\.\\.";

impl MarkdownString {
    /// Creates a MarkdownString by escaping all markdown special characters in the input.
    ///
    /// # Example
    /// ```rust
    /// use yoroolbot::markdown::MarkdownString;
    ///
    /// let markdown = MarkdownString::escape("Hello! *bold*");
    /// assert_eq!(markdown.as_str(), "Hello\\! \\*bold\\*");
    /// ```
    pub fn escape<T: Into<String>>(input: T) -> Self {
        MarkdownString(teloxide::utils::markdown::escape(&input.into()))
    }

    /// Creates an empty MarkdownString.
    pub fn new() -> Self {
        MarkdownString(String::new())
    }

    /// Constructor used by the macros after compile-time validation.
    #[doc(hidden)]
    pub fn from_validated_string(s: impl Into<String>) -> Self {
        MarkdownString(s.into())
    }

    /// Replaces `{}` placeholders of a validated template one by one with the given arguments.
    /// Placeholders without a matching argument are kept, extra arguments are ignored.
    #[doc(hidden)]
    pub fn substitute(template: &str, args: Vec<MarkdownString>) -> Self {
        let mut result = String::with_capacity(template.len());
        let mut rest = template;
        let mut args = args.into_iter();
        while let Some(pos) = rest.find("{}") {
            result.push_str(&rest[..pos]);
            match args.next() {
                Some(arg) => result.push_str(arg.as_str()),
                None => result.push_str("{}"),
            }
            rest = &rest[pos + 2..];
        }
        result.push_str(rest);
        MarkdownString(result)
    }

    /// Joins MarkdownStrings with a validated separator.
    pub fn join(parts: impl IntoIterator<Item = MarkdownString>, separator: &MarkdownString) -> Self {
        let parts: Vec<String> = parts.into_iter().map(|p| p.0).collect();
        MarkdownString(parts.join(separator.as_str()))
    }

    /// Returns the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the MarkdownString and returns the inner String
    pub fn into_string(self) -> String {
        self.0
    }

    /// Truncates the text to at most `max_length` bytes, appending "..." when something was cut.
    ///
    /// The cut prefers the last line break that fits and never splits a UTF-8 character or an
    /// escape sequence.
    pub fn truncated(self, max_length: usize) -> MarkdownString {
        if self.0.len() <= max_length {
            return self;
        }
        let budget = max_length.saturating_sub(TRUNCATION_MARKER.len());
        let mut cut = budget.min(self.0.len());
        while cut > 0 && !self.0.is_char_boundary(cut) {
            cut -= 1;
        }
        if let Some(newline) = self.0[..cut].rfind('\n') {
            cut = newline;
        }
        let mut head = &self.0[..cut];
        // an odd number of trailing backslashes would escape the marker
        let trailing = head.bytes().rev().take_while(|b| *b == b'\\').count();
        if trailing % 2 == 1 {
            head = &head[..head.len() - 1];
        }
        MarkdownString(format!("{}{}", head, TRUNCATION_MARKER))
    }
}

impl fmt::Display for MarkdownString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for MarkdownString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<MarkdownString> for String {
    fn from(markdown: MarkdownString) -> String {
        markdown.0
    }
}

impl From<&MarkdownString> for MarkdownString {
    fn from(markdown: &MarkdownString) -> Self {
        markdown.clone()
    }
}

impl From<String> for MarkdownString {
    fn from(s: String) -> Self {
        MarkdownString::escape(s)
    }
}

impl From<&String> for MarkdownString {
    fn from(s: &String) -> Self {
        MarkdownString::escape(s.as_str())
    }
}

impl From<&str> for MarkdownString {
    fn from(s: &str) -> Self {
        MarkdownString::escape(s)
    }
}

macro_rules! impl_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for MarkdownString {
                fn from(n: $t) -> Self {
                    MarkdownString::escape(n.to_string())
                }
            }
        )*
    };
}

impl_from_number!(i32, i64, u32, u64, usize);

impl Add for MarkdownString {
    type Output = MarkdownString;

    fn add(self, other: MarkdownString) -> MarkdownString {
        MarkdownString(self.0 + &other.0)
    }
}

impl Add<&MarkdownString> for MarkdownString {
    type Output = MarkdownString;

    fn add(self, other: &MarkdownString) -> MarkdownString {
        MarkdownString(self.0 + &other.0)
    }
}

/// Extension trait for sending MarkdownString messages with parse mode MarkdownV2.
///
/// Text longer than Telegram's 4096 byte limit is truncated with "..." before sending.
pub trait MarkdownStringMessage: Requester {
    fn send_markdown_message<C>(&self, chat_id: C, text: MarkdownString) -> JsonRequest<SendMessage>
    where
        C: Into<Recipient>;

    fn edit_markdown_message_text<C>(
        &self,
        chat_id: C,
        message_id: MessageId,
        text: MarkdownString,
    ) -> <Self as Requester>::EditMessageText
    where
        C: Into<Recipient>;
}

impl MarkdownStringMessage for Bot {
    fn send_markdown_message<C>(&self, chat_id: C, text: MarkdownString) -> JsonRequest<SendMessage>
    where
        C: Into<Recipient>,
    {
        self.send_message(chat_id, text.truncated(TELEGRAM_MAX_MESSAGE_LENGTH))
            .parse_mode(ParseMode::MarkdownV2)
    }

    fn edit_markdown_message_text<C>(
        &self,
        chat_id: C,
        message_id: MessageId,
        text: MarkdownString,
    ) -> <Self as Requester>::EditMessageText
    where
        C: Into<Recipient>,
    {
        self.edit_message_text(chat_id, message_id, text.truncated(TELEGRAM_MAX_MESSAGE_LENGTH))
            .parse_mode(ParseMode::MarkdownV2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{markdown_format, markdown_string};

    #[test]
    fn test_escape_constructor() {
        let markdown = MarkdownString::escape("Hello world");
        assert_eq!(markdown.as_str(), "Hello world");

        let markdown = MarkdownString::escape("Hello! *bold* _italic_ `code`");
        assert_eq!(
            markdown.as_str(),
            "Hello\\! \\*bold\\* \\_italic\\_ \\`code\\`"
        );

        let markdown = MarkdownString::escape("@channel_name -100123");
        assert_eq!(markdown.as_str(), "@channel\\_name \\-100123");
    }

    #[test]
    fn test_markdown_string_macro() {
        let markdown = markdown_string!("🎉 *Welcome*\\!");
        assert_eq!(markdown.as_str(), "🎉 *Welcome*\\!");
    }

    #[test]
    fn test_markdown_format_escapes_plain_arguments() {
        let markdown = markdown_format!("Channel `{}` added\\.", "@news_feed");
        assert_eq!(markdown.as_str(), "Channel `@news\\_feed` added\\.");
    }

    #[test]
    fn test_markdown_format_keeps_markdown_arguments() {
        let bold = markdown_string!("*bold*");
        let markdown = markdown_format!("{} and {}", bold, 42u64);
        assert_eq!(markdown.as_str(), "*bold* and 42");
    }

    #[test]
    fn test_markdown_format_with_template_expression() {
        let template = markdown_string!("User: {} said: {}");
        let result = markdown_format!(template, "Alice*", "hi!");
        assert_eq!(result.as_str(), "User: Alice\\* said: hi\\!");
    }

    #[test]
    fn test_substitute_does_not_reuse_argument_braces() {
        let result = markdown_format!("{} / {}", "{}", "second");
        assert_eq!(result.as_str(), "\\{\\} / second");
    }

    #[test]
    fn test_join() {
        let joined = MarkdownString::join(
            vec![MarkdownString::escape("a.b"), MarkdownString::escape("c")],
            &markdown_string!("\n"),
        );
        assert_eq!(joined.as_str(), "a\\.b\nc");
    }

    #[test]
    fn test_truncated_keeps_short_text() {
        let text = MarkdownString::escape("short");
        assert_eq!(text.clone().truncated(100), text);
    }

    #[test]
    fn test_truncated_cuts_on_line_break() {
        let text = MarkdownString::escape("first line\nsecond line that is long");
        let truncated = text.truncated(20);
        assert_eq!(truncated.as_str(), "first line\\.\\.\\.");
    }

    #[test]
    fn test_truncated_never_splits_escape() {
        let text = MarkdownString::escape("abcdefg!!!!!!!!!!");
        let truncated = text.truncated(16);
        assert!(truncated.as_str().len() <= 16);
        assert!(truncated.as_str().ends_with("\\.\\.\\."));
        let head = truncated.as_str().trim_end_matches("\\.\\.\\.");
        let trailing = head.bytes().rev().take_while(|b| *b == b'\\').count();
        assert_eq!(trailing % 2, 0);
    }

    #[test]
    fn test_add_operation() {
        let combined = MarkdownString::escape("Hello ") + markdown_string!("*world*");
        assert_eq!(combined.as_str(), "Hello *world*");
        let combined = combined + &MarkdownString::escape("!");
        assert_eq!(combined.as_str(), "Hello *world*\\!");
    }
}
