//! Screen and action model
//!
//! The navigator emits transport-neutral screen descriptions; the bot
//! converts them to the messaging API's keyboard types at the edge.

use serde::{Deserialize, Serialize};

use crate::payload::CallbackPayload;

/// One inline button: a label plus either a callback payload or a URL
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Button {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Button {
    /// Button that fires a callback payload when pressed
    pub fn callback(text: impl Into<String>, payload: &CallbackPayload) -> Self {
        Self {
            text: text.into(),
            callback_data: Some(payload.encode()),
            url: None,
        }
    }

    /// Button that opens a URL
    pub fn url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: None,
            url: Some(url.into()),
        }
    }
}

/// A rendered screen: message text plus a button grid
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Screen {
    pub text: String,
    pub keyboard: Vec<Vec<Button>>,
}

impl Screen {
    pub fn new(text: impl Into<String>, keyboard: Vec<Vec<Button>>) -> Self {
        Self {
            text: text.into(),
            keyboard,
        }
    }

    /// All callback payload strings on this screen, row by row
    pub fn callback_payloads(&self) -> Vec<&str> {
        self.keyboard
            .iter()
            .flatten()
            .filter_map(|b| b.callback_data.as_deref())
            .collect()
    }
}

/// What the navigator asks the transport to do in response to an event
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Render a screen (sent as a new message or an edit of the
    /// originating one, depending on the event source)
    Show(Screen),
    /// Ephemeral notice; `alert` makes it a blocking popup
    Notice { text: String, alert: bool },
    /// Deliver an audio item, optionally followed by a shortcut screen
    Deliver {
        file_id: String,
        title: String,
        performer: String,
        followup: Option<Screen>,
    },
    /// Acknowledge the press without changing anything
    Nothing,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_button_encodes_payload() {
        let btn = Button::callback("الخطب", &CallbackPayload::Lectures);
        assert_eq!(btn.callback_data.as_deref(), Some("lectures"));
        assert!(btn.url.is_none());
    }

    #[test]
    fn test_url_button_has_no_callback() {
        let btn = Button::url("اشترك في القناة", "https://t.me/quran_voice_1");
        assert!(btn.callback_data.is_none());
        assert_eq!(btn.url.as_deref(), Some("https://t.me/quran_voice_1"));
    }

    #[test]
    fn test_screen_collects_callback_payloads() {
        let screen = Screen::new(
            "اختر",
            vec![
                vec![Button::callback("أ", &CallbackPayload::Lectures)],
                vec![
                    Button::url("رابط", "https://t.me/x"),
                    Button::callback("ب", &CallbackPayload::BackToNarrators),
                ],
            ],
        );
        assert_eq!(screen.callback_payloads(), vec!["lectures", "back_to_sheikhs"]);
    }
}
