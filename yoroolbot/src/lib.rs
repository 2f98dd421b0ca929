//! Yoroolbot - shared teloxide helpers: MarkdownV2-safe strings and inline keyboards

// Private API modules
pub(crate) mod api;

// Public markdown module with re-exports
pub mod markdown {
    pub use crate::api::markdown::{
        string::{MarkdownString, MarkdownStringMessage, TELEGRAM_MAX_MESSAGE_LENGTH},
        validate::validate_markdownv2_format,
    };
}

// Public keyboard module with re-exports
pub mod keyboard {
    pub use crate::api::keyboard::{
        ButtonData, Keyboard, MAX_CALLBACK_DATA_LEN,
        callback_data_storage::{
            CallbackDataStorage, CallbackDataStorageTrait, pack_keyboard, unpack_callback_data,
        },
    };
}

/// Creates a MarkdownString from a string literal, validated at compile time.
#[macro_export]
macro_rules! markdown_string {
    ($s:literal) => {{
        const _: () = $crate::markdown::validate_markdownv2_format($s);
        $crate::markdown::MarkdownString::from_validated_string($s)
    }};
}

/// Formats a MarkdownString, replacing each `{}` with an argument converted through
/// `Into<MarkdownString>`: plain strings and numbers are escaped, MarkdownStrings are kept as is.
///
/// The template is either a string literal (validated at compile time) or a MarkdownString.
#[macro_export]
macro_rules! markdown_format {
    ($format_str:literal $(, $arg:expr)* $(,)?) => {{
        const _: () = $crate::markdown::validate_markdownv2_format($format_str);
        let args: Vec<$crate::markdown::MarkdownString> = vec![$($arg.into()),*];
        $crate::markdown::MarkdownString::substitute($format_str, args)
    }};
    ($format_markdown:expr $(, $arg:expr)* $(,)?) => {{
        let template: $crate::markdown::MarkdownString = $format_markdown;
        let args: Vec<$crate::markdown::MarkdownString> = vec![$($arg.into()),*];
        $crate::markdown::MarkdownString::substitute(template.as_str(), args)
    }};
}
