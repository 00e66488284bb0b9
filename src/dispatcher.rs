//! Notification dispatch: one inbound call, one device operation.

use std::path::{Path, PathBuf};

use crate::bridge::{default_http_client, BridgeClient};
use crate::clock;
use crate::error::Error;
use crate::payload::{ImageSource, Notification, NotificationData};

/// Adapter configuration.
///
/// Replaces the host platform's registration glue with an explicit struct:
/// the bridge URL and device MAC are required, the image directory is only
/// needed for IMAGE-by-file-name notifications.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the bridge server
    pub bridge_url: String,
    /// MAC address of the display device
    pub mac: String,
    /// Root directory for `file-name` image lookups
    pub image_dir: Option<PathBuf>,
}

impl Config {
    /// Create a configuration with the two required fields.
    pub fn new(bridge_url: impl Into<String>, mac: impl Into<String>) -> Self {
        Self {
            bridge_url: bridge_url.into(),
            mac: mac.into(),
            image_dir: None,
        }
    }

    /// Set the image directory root.
    #[must_use]
    pub fn with_image_dir(mut self, image_dir: impl Into<PathBuf>) -> Self {
        self.image_dir = Some(image_dir.into());
        self
    }

    /// Read configuration from `TIMEBOX_BRIDGE_URL`, `TIMEBOX_MAC` and
    /// optionally `TIMEBOX_IMAGE_DIR`.
    ///
    /// Returns `None` if a required variable is not set.
    pub fn from_env() -> Option<Self> {
        let bridge_url = std::env::var("TIMEBOX_BRIDGE_URL").ok()?;
        let mac = std::env::var("TIMEBOX_MAC").ok()?;
        let image_dir = std::env::var("TIMEBOX_IMAGE_DIR").ok().map(PathBuf::from);
        Some(Self {
            bridge_url,
            mac,
            image_dir,
        })
    }
}

/// Translates inbound notification calls into bridge operations.
///
/// Built with [`NotificationDispatcher::connect`], which gates on the bridge
/// probe and the device reachability check. After construction, [`send`]
/// never returns an error: failures are logged and reported as `false`.
///
/// [`send`]: NotificationDispatcher::send
#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
    bridge: BridgeClient,
    http: reqwest::Client,
    image_dir: Option<PathBuf>,
}

impl NotificationDispatcher {
    /// Connect to the bridge and check the device is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the `/hello` probe or the `/connect`
    /// check fails; the adapter must not come up against a dead bridge.
    pub async fn connect(config: Config) -> Result<Self, Error> {
        let bridge = BridgeClient::new(&config.bridge_url, &config.mac);

        bridge.probe().await.map_err(|err| {
            Error::Config(format!("invalid bridge url {:?}: {err}", config.bridge_url))
        })?;
        bridge.check_connected().await.map_err(|err| {
            Error::Config(format!("device {} not reachable: {err}", config.mac))
        })?;

        tracing::info!(
            "connected to bridge {} for device {}",
            bridge.base_url(),
            bridge.mac()
        );
        Ok(Self {
            bridge,
            http: default_http_client(),
            image_dir: config.image_dir,
        })
    }

    /// Get the underlying bridge client.
    pub fn bridge(&self) -> &BridgeClient {
        &self.bridge
    }

    /// Deliver one notification, returning whether it reached the device.
    ///
    /// Resolves the mode from the payload (or the bare message), performs
    /// exactly one device operation, and collapses every failure into
    /// `false` after logging the offending field and value.
    pub async fn send(&self, message: &str, data: Option<&NotificationData>) -> bool {
        match self.dispatch(message, data).await {
            Ok(()) => true,
            Err(err) => {
                tracing::error!("notification not delivered: {err}");
                false
            }
        }
    }

    async fn dispatch(&self, message: &str, data: Option<&NotificationData>) -> Result<(), Error> {
        match Notification::resolve(message, data)? {
            Notification::Image(ImageSource::Link(link)) => {
                let image = self.fetch_image(&link).await?;
                self.bridge.send_image(image).await
            }
            Notification::Image(ImageSource::File(name)) => {
                let image = self.read_image(&name).await?;
                self.bridge.send_image(image).await
            }
            Notification::Text(text) => self.bridge.send_text(&text).await,
            Notification::Brightness(value) => self.bridge.set_brightness(value).await,
            Notification::Time {
                set_datetime,
                offset,
                display_type,
            } => {
                if set_datetime {
                    let stamp = clock::device_timestamp(offset.as_deref())?;
                    // Fire and forget: the clock sync does not decide the
                    // overall outcome, only the channel switch below does.
                    if let Err(err) = self.bridge.set_datetime(&stamp).await {
                        tracing::warn!("failed to set device clock: {err}");
                    }
                }
                self.bridge.set_time_channel(&display_type).await
            }
        }
    }

    /// Fetch image bytes from a link. A non-200 answer fails the
    /// notification without touching the bridge.
    async fn fetch_image(&self, link: &str) -> Result<Vec<u8>, Error> {
        let response = self.http.get(link).send().await?;
        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api { status, body });
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// Read image bytes from the configured image directory.
    async fn read_image(&self, name: &str) -> Result<Vec<u8>, Error> {
        let image_dir = self.image_dir.as_deref().ok_or_else(|| {
            Error::FileAccess(format!("no image directory configured for {name:?}"))
        })?;
        let path = resolve_under(image_dir, name).await?;
        tokio::fs::read(&path)
            .await
            .map_err(|err| Error::FileAccess(format!("failed to read {name:?}: {err}")))
    }
}

/// Resolve `name` under `root`, rejecting anything that escapes it.
///
/// Both sides are canonicalized before the prefix check so `..` segments and
/// symlinks cannot step outside the image directory.
async fn resolve_under(root: &Path, name: &str) -> Result<PathBuf, Error> {
    let relative = Path::new(name);
    if relative.is_absolute() {
        return Err(Error::FileAccess(format!(
            "{name:?} escapes the image directory"
        )));
    }
    let root = tokio::fs::canonicalize(root)
        .await
        .map_err(|err| Error::FileAccess(format!("image directory {}: {err}", root.display())))?;
    let path = tokio::fs::canonicalize(root.join(relative))
        .await
        .map_err(|err| Error::FileAccess(format!("failed to open {name:?}: {err}")))?;
    if !path.starts_with(&root) {
        return Err(Error::FileAccess(format!(
            "{name:?} escapes the image directory"
        )));
    }
    Ok(path)
}
