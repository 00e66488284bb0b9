//! # timebox-notify
//!
//! A notification adapter for Divoom Timebox LED-matrix displays sitting
//! behind an HTTP bridge server.
//!
//! Home-automation hubs emit generic "send notification" calls: a free-text
//! message plus an optional structured payload. This crate turns each call
//! into exactly one device operation against the bridge and reports plain
//! delivered / not-delivered:
//!
//! - **image**: push image bytes, fetched from a link or read from a
//!   configured image directory
//! - **text**: scroll a text message
//! - **brightness**: set display brightness
//! - **time**: switch to the clock channel, optionally syncing the device
//!   clock first
//!
//! ## Bridge protocol
//!
//! The bridge is a black-box HTTP API. Every request carries the device MAC
//! address and answers 200 on success:
//!
//! | Endpoint | Method | Body | Purpose |
//! |----------|--------|------|---------|
//! | `/hello` | GET | — | liveness probe |
//! | `/connect` | POST | mac | device reachability check |
//! | `/image` | POST (multipart) | mac, image | push image to display |
//! | `/text` | POST | mac, text | push text to display |
//! | `/brightness` | POST | mac, brightness | set display brightness |
//! | `/time` | POST | mac, display_type | switch to time channel |
//! | `/datetime` | POST | mac, datetime | set device clock |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use timebox_notify::{Config, NotificationDispatcher};
//!
//! # async fn example() -> Result<(), timebox_notify::Error> {
//! let config = Config::new("http://bridge.local:5555", "11:22:33:44:55:66");
//! let dispatcher = NotificationDispatcher::connect(config).await?;
//!
//! let delivered = dispatcher.send("Dinner is ready", None).await;
//! # Ok(())
//! # }
//! ```
//!
//! Construction fails if the bridge does not answer the probe or the device
//! is not reachable. After that, `send` never fails hard: malformed payloads
//! and transport errors are logged and collapsed to `false`.

mod bridge;
pub mod clock;
mod dispatcher;
mod error;
mod payload;

pub use bridge::BridgeClient;
pub use dispatcher::{Config, NotificationDispatcher};
pub use error::Error;
pub use payload::{ImageSource, Notification, NotificationData};

/// Per-request timeout for bridge calls, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Time-channel layout used when the payload does not name one.
pub const DEFAULT_DISPLAY_TYPE: &str = "fullscreen";
