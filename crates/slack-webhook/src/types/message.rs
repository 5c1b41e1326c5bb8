//! Types for posting messages to a Slack incoming webhook.

use serde::{Deserialize, Serialize};

/// A message posted to an incoming webhook.
///
/// `text` is the notification/fallback line; the formatted body travels in a
/// single mrkdwn section block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlackMessage {
    /// Summary line shown in notifications.
    pub text: String,

    /// Layout blocks carrying the message body.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Block>,

    /// Display name of the sender.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Avatar image for the sender.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,

    /// Channel override. If None, the webhook default channel is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,

    /// Color-coded side panels.
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl SlackMessage {
    /// Create a message with a summary line and a mrkdwn body.
    pub fn new(text: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            blocks: vec![Block::markdown(body)],
            username: None,
            icon_url: None,
            channel: None,
            attachments: Vec::new(),
        }
    }

    /// Set the sender display name.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set the sender icon.
    pub fn with_icon_url(mut self, icon_url: impl Into<String>) -> Self {
        self.icon_url = Some(icon_url.into());
        self
    }

    /// Override the target channel. Blank values are ignored.
    pub fn with_channel(mut self, channel: Option<impl Into<String>>) -> Self {
        self.channel = channel.map(Into::into).filter(|c: &String| !c.trim().is_empty());
        self
    }

    /// Add an attachment.
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// The mrkdwn body, if the message has one.
    pub fn body(&self) -> Option<&str> {
        self.blocks.iter().find_map(|block| match block {
            Block::Section { text } => Some(text.text.as_str()),
        })
    }
}

/// A layout block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A section with a text object.
    Section { text: TextObject },
}

impl Block {
    /// A section block with mrkdwn text.
    pub fn markdown(text: impl Into<String>) -> Self {
        Self::Section {
            text: TextObject::markdown(text),
        }
    }
}

/// A text object inside a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextObject {
    /// Either "mrkdwn" or "plain_text".
    #[serde(rename = "type")]
    pub kind: String,
    /// The text content.
    pub text: String,
}

impl TextObject {
    /// A mrkdwn text object.
    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            kind: "mrkdwn".to_string(),
            text: text.into(),
        }
    }
}

/// A color-coded side panel attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Sidebar color as a hex string (e.g., "#e03836").
    pub color: String,
    /// Attachment text (mrkdwn).
    pub text: String,
}

impl Attachment {
    /// Create a new attachment.
    pub fn new(color: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            text: text.into(),
        }
    }
}
