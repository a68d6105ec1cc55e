//! Event envelopes pushed over the WebSocket channel.
//!
//! Every frame is a JSON object with a string `type` discriminator. Any such
//! envelope is a liveness signal regardless of what else it carries. Known
//! payloads are decoded on top of that for logging; a payload that does not
//! match its type's shape degrades to [`ChannelEvent::Unknown`].

use serde::Deserialize;
use serde_json::Value;

use sentimon_core::SentimentDistribution;

#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    /// Greeting sent once right after the server accepts the connection.
    Connected {
        message: Option<String>,
        timestamp: Option<String>,
    },
    /// Periodic rolling-window counts.
    MetricsUpdate {
        data: MetricsWindows,
        timestamp: Option<String>,
    },
    /// A freshly analyzed post.
    NewPost { data: LivePost },
    /// An envelope of an unrecognised type, or a known type whose payload
    /// did not decode.
    Unknown { kind: String },
}

/// Only the discriminator; everything else in the frame is optional.
#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum KnownPayload {
    Connected {
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        timestamp: Option<String>,
    },
    MetricsUpdate {
        data: MetricsWindows,
        #[serde(default)]
        timestamp: Option<String>,
    },
    NewPost {
        data: LivePost,
    },
    #[serde(other)]
    Other,
}

impl ChannelEvent {
    /// Decodes one text frame.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the frame is not JSON, is not an
    /// object, or has no string `type`. Payload shape never causes an error.
    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(text)?;
        let Envelope { kind } = Envelope::deserialize(&value)?;

        match KnownPayload::deserialize(value) {
            Ok(KnownPayload::Connected { message, timestamp }) => {
                Ok(ChannelEvent::Connected { message, timestamp })
            }
            Ok(KnownPayload::MetricsUpdate { data, timestamp }) => {
                Ok(ChannelEvent::MetricsUpdate { data, timestamp })
            }
            Ok(KnownPayload::NewPost { data }) => Ok(ChannelEvent::NewPost { data }),
            Ok(KnownPayload::Other) => Ok(ChannelEvent::Unknown { kind }),
            Err(e) => {
                tracing::debug!(%kind, error = %e, "push channel payload did not decode");
                Ok(ChannelEvent::Unknown { kind })
            }
        }
    }

    /// The envelope's `type`.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            ChannelEvent::Connected { .. } => "connected",
            ChannelEvent::MetricsUpdate { .. } => "metrics_update",
            ChannelEvent::NewPost { .. } => "new_post",
            ChannelEvent::Unknown { kind } => kind,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct WindowCounts {
    #[serde(flatten)]
    pub counts: SentimentDistribution,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct MetricsWindows {
    #[serde(default)]
    pub last_minute: WindowCounts,
    #[serde(default)]
    pub last_hour: WindowCounts,
    #[serde(default)]
    pub last_24_hours: WindowCounts,
}

/// Post summary carried by `new_post`. The label is kept as a string because
/// the server sends `unknown` for posts it could not classify.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LivePost {
    pub post_id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub sentiment_label: Option<String>,
    #[serde(default)]
    pub confidence_score: Option<f64>,
    #[serde(default)]
    pub emotion: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_connected_greeting() {
        let event = ChannelEvent::decode(
            r#"{"type":"connected","message":"Connected to sentiment stream","timestamp":"2025-03-01T10:00:00"}"#,
        )
        .unwrap();
        assert_eq!(event.kind(), "connected");
        assert!(matches!(
            event,
            ChannelEvent::Connected { message: Some(ref m), .. } if m == "Connected to sentiment stream"
        ));
    }

    #[test]
    fn decodes_metrics_update() {
        let event = ChannelEvent::decode(
            r#"{
                "type": "metrics_update",
                "data": {
                    "last_minute": {"positive": 1, "negative": 0, "neutral": 2, "total": 3},
                    "last_hour": {"positive": 10, "negative": 4, "neutral": 6, "total": 20},
                    "last_24_hours": {"positive": 45, "negative": 12, "neutral": 20, "total": 77}
                },
                "timestamp": "2025-03-01T10:00:30"
            }"#,
        )
        .unwrap();
        let ChannelEvent::MetricsUpdate { data, .. } = event else {
            panic!("expected metrics_update, got {event:?}");
        };
        assert_eq!(
            data.last_24_hours.counts,
            SentimentDistribution::new(45, 12, 20)
        );
        assert_eq!(data.last_24_hours.total, 77);
        assert_eq!(data.last_minute.counts.neutral, 2);
    }

    #[test]
    fn decodes_new_post_with_unknown_label() {
        let event = ChannelEvent::decode(
            r#"{"type":"new_post","data":{"post_id":"abc","content":"hi","source":"reddit","sentiment_label":"unknown","confidence_score":0}}"#,
        )
        .unwrap();
        let ChannelEvent::NewPost { data } = event else {
            panic!("expected new_post");
        };
        assert_eq!(data.post_id, "abc");
        assert_eq!(data.sentiment_label.as_deref(), Some("unknown"));
    }

    #[test]
    fn unrecognised_type_is_unknown_not_an_error() {
        let event = ChannelEvent::decode(r#"{"type":"heartbeat","data":{}}"#).unwrap();
        assert_eq!(
            event,
            ChannelEvent::Unknown {
                kind: "heartbeat".to_string()
            }
        );
        assert_eq!(event.kind(), "heartbeat");
    }

    #[test]
    fn known_type_with_unexpected_payload_is_still_an_event() {
        for (frame, kind) in [
            (r#"{"type":"new_post","data":{"post_id":42}}"#, "new_post"),
            (r#"{"type":"metrics_update","data":null}"#, "metrics_update"),
            (r#"{"type":"connected","message":{"text":"hi"}}"#, "connected"),
            (r#"{"type":"heartbeat","data":42}"#, "heartbeat"),
        ] {
            let event = ChannelEvent::decode(frame)
                .unwrap_or_else(|e| panic!("{frame} should decode: {e}"));
            assert_eq!(
                event,
                ChannelEvent::Unknown {
                    kind: kind.to_string()
                },
                "frame {frame}"
            );
        }
    }

    #[test]
    fn non_json_is_malformed() {
        assert!(ChannelEvent::decode("hello").is_err());
    }

    #[test]
    fn missing_type_is_malformed() {
        assert!(ChannelEvent::decode(r#"{"data":{}}"#).is_err());
    }

    #[test]
    fn non_string_type_is_malformed() {
        assert!(ChannelEvent::decode(r#"{"type":7,"data":{}}"#).is_err());
        assert!(ChannelEvent::decode(r#"{"type":null}"#).is_err());
    }

    #[test]
    fn non_object_json_is_malformed() {
        assert!(ChannelEvent::decode("[1,2,3]").is_err());
        assert!(ChannelEvent::decode(r#""connected""#).is_err());
    }
}
