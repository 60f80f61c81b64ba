// Flash messages as they travel between the browser session and the
// remote message store.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use lazy_static::lazy_static;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The fixed set of notice categories understood by the message store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlashCategory {
    Error,
    Success,
    Warn,
    Info,
}

impl FlashCategory {
    pub const ALL: [FlashCategory; 4] = [
        FlashCategory::Error,
        FlashCategory::Success,
        FlashCategory::Warn,
        FlashCategory::Info,
    ];

    /// Wire name, as stored by the remote API.
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashCategory::Error => "ERROR",
            FlashCategory::Success => "SUCCESS",
            FlashCategory::Warn => "WARN",
            FlashCategory::Info => "INFO",
        }
    }

    /// Lowercase name, used as the notice kind in templates.
    pub fn css_class(&self) -> &'static str {
        match self {
            FlashCategory::Error => "error",
            FlashCategory::Success => "success",
            FlashCategory::Warn => "warn",
            FlashCategory::Info => "info",
        }
    }
}

impl fmt::Display for FlashCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlashCategory {
    type Err = anyhow::Error;

    /// Case-insensitive, since stored messages are not always uppercase.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FlashCategory::ALL
            .iter()
            .copied()
            .find(|category| category.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow!("unknown flash category {:?}", s))
    }
}

impl Serialize for FlashCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FlashCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

lazy_static! {
    /// Canned notices queued by the test form, keyed by the exact form value.
    static ref CANNED_MESSAGES: HashMap<&'static str, &'static str> = {
        let mut messages = HashMap::new();
        messages.insert("ERROR", "Mensagem de Erro 😭 ⛔ (Error) ");
        messages.insert("SUCCESS", "Mensagem de Sucesso 🎉 (SUCCESS)");
        messages.insert("WARN", "Mensagem de Alerta ⚠️ (WARNING)");
        messages.insert("INFO", "Mensagem de Informação ℹ️ (INFO)");
        messages
    };
}

/// A one-shot notice. Created from a form post or a remote fetch, read-only
/// afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub category: FlashCategory,
    pub content: String,
}

impl FlashMessage {
    pub fn new(category: FlashCategory, content: impl Into<String>) -> Self {
        FlashMessage {
            category,
            content: content.into(),
        }
    }

    /// Looks up the canned notice for a form `message_type`.
    /// Keys match exactly; `"success"` is not `"SUCCESS"`.
    pub fn canned(message_type: &str) -> Option<FlashMessage> {
        let content = CANNED_MESSAGES.get(message_type)?;
        let category = FlashCategory::ALL
            .iter()
            .copied()
            .find(|category| category.as_str() == message_type)?;
        Some(FlashMessage::new(category, *content))
    }
}
