pub mod callback_data_storage;

use url::Url;

/// Telegram limit for `callback_data` of an inline button, in bytes
pub const MAX_CALLBACK_DATA_LEN: usize = 64;

/// Represents different types of inline keyboard buttons
#[derive(Debug, Clone, PartialEq)]
pub enum ButtonData {
    /// Callback button with label and callback data
    Callback(String, String),
    /// Link button with label and target url
    Url(String, Url),
}

impl ButtonData {
    pub fn callback(label: impl Into<String>, data: impl ToString) -> Self {
        ButtonData::Callback(label.into(), data.to_string())
    }

    pub fn label(&self) -> &str {
        match self {
            ButtonData::Callback(label, _) | ButtonData::Url(label, _) => label,
        }
    }

    /// Callback data of the button, `None` for link buttons
    pub fn callback_data(&self) -> Option<&str> {
        match self {
            ButtonData::Callback(_, data) => Some(data),
            ButtonData::Url(..) => None,
        }
    }
}

impl From<(String, String)> for ButtonData {
    fn from((label, data): (String, String)) -> Self {
        ButtonData::Callback(label, data)
    }
}

impl From<(&str, &str)> for ButtonData {
    fn from((label, data): (&str, &str)) -> Self {
        ButtonData::Callback(label.to_string(), data.to_string())
    }
}

/// Rows of buttons, rendered top to bottom
pub type Keyboard = Vec<Vec<ButtonData>>;
