//! Knack Core - ability runtime vocabulary
//!
//! Shared types used by every knack ability:
//! - [`InstanceId`]: stable opaque identity logged with lifecycle events
//! - [`Status`] / [`StatusSource`] / [`StatusHandle`]: the running gate owned by a supervisor
//! - [`Message`] / [`Cmd`]: named command messages with a JSON payload
//! - [`Runnable`] / [`BaseRunnable`]: the actor abstraction abilities implement
//!
//! # Usage
//!
//! ```rust
//! use knack_core::{Cmd, Message, Status, StatusHandle, StatusSource};
//!
//! let status = StatusHandle::new();
//! assert_eq!(status.status(), Status::Initial);
//! status.start();
//! assert!(status.is_running());
//!
//! let message = Message::from(Cmd::new("cmd.say", "hello"));
//! assert_eq!(message.decode_payload::<String>().unwrap(), "hello");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod id;
pub mod message;
pub mod runnable;
pub mod status;

pub use id::InstanceId;
pub use message::{Cmd, Message};
pub use runnable::{BaseRunnable, Metadata, Runnable};
pub use status::{Status, StatusHandle, StatusSource};
