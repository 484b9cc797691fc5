//! Request bodies for the notification, app and device endpoints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_LANGUAGE: &str = "en";
pub const ALL_SEGMENT: &str = "All";
pub const PUSH_CHANNEL: &str = "push";

/// Language code to text, as the vendor expects for `headings` and `contents`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<String, String>);

impl LocalizedText {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, language: impl Into<String>, text: impl Into<String>) -> Self {
        self.0.insert(language.into(), text.into());
        self
    }

    #[must_use]
    pub fn get(&self, language: &str) -> Option<&str> {
        self.0.get(language).map(String::as_str)
    }

    /// True when there is no language entry or any entry is blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.is_empty() || self.0.values().any(|text| text.trim().is_empty())
    }
}

impl From<&str> for LocalizedText {
    fn from(text: &str) -> Self {
        Self::new().with(DEFAULT_LANGUAGE, text)
    }
}

impl From<String> for LocalizedText {
    fn from(text: String) -> Self {
        Self::new().with(DEFAULT_LANGUAGE, text)
    }
}

#[allow(clippy::ref_option)]
fn is_absent(value: &Option<Value>) -> bool {
    value.as_ref().is_none_or(Value::is_null)
}

/// Optional fields shared by every send. Unset (or `null`) fields are left
/// out of the payload entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NotificationExtras {
    #[serde(skip_serializing_if = "is_absent")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "is_absent")]
    pub buttons: Option<Value>,
}

impl NotificationExtras {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_buttons(mut self, buttons: Value) -> Self {
        self.buttons = Some(buttons);
        self
    }
}

#[derive(Serialize)]
pub(crate) struct SegmentNotification<'a> {
    pub app_id: &'a str,
    pub included_segments: [&'static str; 1],
    pub headings: LocalizedText,
    pub contents: LocalizedText,
    #[serde(flatten)]
    pub extras: &'a NotificationExtras,
}

#[derive(Serialize)]
pub(crate) struct PlayerNotification<'a> {
    pub app_id: &'a str,
    pub include_player_ids: &'a [String],
    pub headings: &'a LocalizedText,
    pub contents: &'a LocalizedText,
    #[serde(flatten)]
    pub extras: &'a NotificationExtras,
}

#[derive(Serialize)]
pub(crate) struct Aliases<'a> {
    pub external_id: &'a [String],
}

#[derive(Serialize)]
pub(crate) struct Alert<'a> {
    pub title: &'a LocalizedText,
    pub subtitle: &'static str,
    pub body: &'a LocalizedText,
}

#[derive(Serialize)]
pub(crate) struct ExternalUserNotification<'a> {
    pub app_id: &'a str,
    pub include_aliases: Aliases<'a>,
    pub target_channel: &'static str,
    pub headings: &'a LocalizedText,
    pub contents: &'a LocalizedText,
    pub alert: Alert<'a>,
    pub mutable_content: u8,
    #[serde(flatten)]
    pub extras: &'a NotificationExtras,
}

#[derive(Serialize)]
pub(crate) struct OpenedUpdate<'a> {
    pub app_id: &'a str,
    pub opened: bool,
}

/// Merge caller params under explicitly required keys; the required keys win
/// on collision.
pub(crate) fn merge_required<const N: usize>(
    mut params: Map<String, Value>,
    required: [(&str, Value); N],
) -> Map<String, Value> {
    for (key, value) in required {
        params.insert(key.to_owned(), value);
    }
    params
}
