use serde::{Deserialize, Serialize};

use crate::models::{FlashCategory, FlashMessage};

/// A notice as templates see it: `kind` is the lowercase category, usable as
/// a CSS class.
#[derive(Debug, Deserialize, Serialize)]
struct Notice {
    kind: String,
    message: String,
}

impl From<FlashMessage> for Notice {
    fn from(msg: FlashMessage) -> Self {
        Notice {
            kind: msg.category.css_class().to_string(),
            message: msg.content,
        }
    }
}

pub fn flash_context(notices: Vec<FlashMessage>) -> tera::Context {
    let mut context = tera::Context::new();
    let messages: Vec<Notice> = notices.into_iter().map(Notice::from).collect();
    context.insert("flash_messages", &messages);
    context
}

/// Context for the test form: the notices plus the selectable categories.
pub fn form_context(notices: Vec<FlashMessage>) -> tera::Context {
    let mut context = flash_context(notices);
    let categories: Vec<&str> = FlashCategory::ALL.iter().map(|c| c.as_str()).collect();
    context.insert("categories", &categories);
    context
}
