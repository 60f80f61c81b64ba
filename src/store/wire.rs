//! JSON bodies exchanged with the remote message store.
//!
//! Two layouts are in use. The `plain` one is an array of
//! `{"category", "content"}` objects. The `envelope` one wraps each message
//! as `{"type": "MESSAGE", "content": "<json text>"}`, with the message
//! itself JSON-encoded inside `content`.

use serde::{Deserialize, Serialize};

use crate::models::FlashMessage;

/// Envelope `type` carrying a flash message. Other types are skipped.
pub const MESSAGE_TYPE: &str = "MESSAGE";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WireFormat {
    #[default]
    Plain,
    Envelope,
}

#[derive(Debug, Deserialize, Serialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    content: String,
}

impl WireFormat {
    pub fn decode(&self, body: &[u8]) -> serde_json::Result<Vec<FlashMessage>> {
        match self {
            WireFormat::Plain => serde_json::from_slice(body),
            WireFormat::Envelope => {
                let envelopes: Vec<Envelope> = serde_json::from_slice(body)?;
                envelopes
                    .into_iter()
                    .filter(|envelope| envelope.kind == MESSAGE_TYPE)
                    .map(|envelope| serde_json::from_str(&envelope.content))
                    .collect()
            }
        }
    }

    pub fn encode(&self, messages: &[FlashMessage]) -> serde_json::Result<serde_json::Value> {
        match self {
            WireFormat::Plain => serde_json::to_value(messages),
            WireFormat::Envelope => {
                let envelopes = messages
                    .iter()
                    .map(|message| {
                        Ok(Envelope {
                            kind: MESSAGE_TYPE.to_string(),
                            content: serde_json::to_string(message)?,
                        })
                    })
                    .collect::<serde_json::Result<Vec<_>>>()?;
                serde_json::to_value(envelopes)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FlashCategory;
    use serde_json::json;

    #[test]
    fn plain_decode_accepts_lowercase_categories() {
        let body = br#"[{"category":"success","content":"Saved"},{"category":"ERROR","content":"Nope"}]"#;
        let messages = WireFormat::Plain.decode(body).unwrap();
        assert_eq!(
            messages,
            vec![
                FlashMessage::new(FlashCategory::Success, "Saved"),
                FlashMessage::new(FlashCategory::Error, "Nope"),
            ]
        );
    }

    #[test]
    fn envelope_decode_skips_other_types() {
        let body = json!([
            {"type": "MESSAGE", "content": "{\"category\":\"WARN\",\"content\":\"Careful\"}"},
            {"type": "PING", "content": "not json at all"},
        ]);
        let messages = WireFormat::Envelope
            .decode(body.to_string().as_bytes())
            .unwrap();
        assert_eq!(messages, vec![FlashMessage::new(FlashCategory::Warn, "Careful")]);
    }

    #[test]
    fn envelope_decode_rejects_bad_nested_content() {
        let body = json!([{"type": "MESSAGE", "content": "{\"category\":\"LOUD\"}"}]);
        assert!(WireFormat::Envelope
            .decode(body.to_string().as_bytes())
            .is_err());
    }

    #[test]
    fn plain_decode_rejects_non_array() {
        assert!(WireFormat::Plain.decode(br#"{"error":"nope"}"#).is_err());
    }

    #[test]
    fn envelope_encode_nests_message_text() {
        let encoded = WireFormat::Envelope
            .encode(&[FlashMessage::new(FlashCategory::Info, "Hi")])
            .unwrap();
        assert_eq!(
            encoded,
            json!([{"type": "MESSAGE", "content": "{\"category\":\"INFO\",\"content\":\"Hi\"}"}])
        );
    }

    #[test]
    fn format_names_deserialize_lowercase() {
        let format: WireFormat = serde_json::from_str("\"envelope\"").unwrap();
        assert_eq!(format, WireFormat::Envelope);
    }
}
