//! Command messages
//!
//! Producers build a [`Cmd`] (name + JSON value); the bus delivers a
//! [`Message`] (name + encoded payload bytes). Runnables decode the payload
//! themselves, so a malformed payload is an error of the receiving runnable.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Command built by a producer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cmd {
    /// Command name (e.g. `cmd.say`)
    pub name: String,
    /// Payload value, encoded as JSON on the wire
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl Cmd {
    /// Create a command
    #[must_use]
    pub fn new(name: impl Into<String>, payload: impl Into<serde_json::Value>) -> Self {
        Self {
            name: name.into(),
            payload: payload.into(),
        }
    }
}

/// Message delivered to a runnable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Command name
    pub name: String,
    /// Raw JSON-encoded payload
    #[serde(default)]
    pub payload: Bytes,
}

impl Message {
    /// Create a message from a name and already-encoded payload bytes
    #[must_use]
    pub fn new(name: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            payload: payload.into(),
        }
    }

    /// Decode the payload as JSON
    pub fn decode_payload<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.payload)
    }
}

impl From<Cmd> for Message {
    fn from(cmd: Cmd) -> Self {
        // Value's Display is its compact JSON encoding
        Self {
            name: cmd.name,
            payload: Bytes::from(cmd.payload.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cmd_into_message() {
        let msg = Message::from(Cmd::new("cmd.say", "hi \"there\""));
        assert_eq!(msg.name, "cmd.say");
        assert_eq!(&msg.payload[..], br#""hi \"there\"""#);
        assert_eq!(msg.decode_payload::<String>().unwrap(), "hi \"there\"");
    }

    #[test]
    fn test_decode_wrong_type_fails() {
        let msg = Message::new("cmd.say", "42");
        assert!(msg.decode_payload::<String>().is_err());
        assert_eq!(msg.decode_payload::<u32>().unwrap(), 42);
    }

    #[test]
    fn test_decode_empty_payload_fails() {
        let msg = Message::new("cmd.say", Bytes::new());
        assert!(msg.decode_payload::<String>().is_err());
    }
}
