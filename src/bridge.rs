//! HTTP client for the Timebox bridge server.

use std::time::Duration;

use reqwest::multipart;

use crate::error::Error;
use crate::DEFAULT_TIMEOUT_SECS;

/// Build the shared HTTP client with the fixed per-request timeout.
pub(crate) fn default_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Client for the bridge API controlling a single Timebox device.
///
/// Immutable after construction and cheap to clone; safe to share across
/// tasks. Each operation is one HTTP request with a 15 second timeout and no
/// retries.
///
/// # Example
///
/// ```rust,no_run
/// use timebox_notify::BridgeClient;
///
/// # async fn example() -> Result<(), timebox_notify::Error> {
/// let bridge = BridgeClient::new("http://bridge.local:5555", "11:22:33:44:55:66");
///
/// bridge.probe().await?;
/// bridge.send_text("Hello").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BridgeClient {
    http: reqwest::Client,
    base_url: String,
    mac: String,
}

impl BridgeClient {
    /// Create a new client for the given bridge URL and device MAC address.
    ///
    /// A trailing slash on the URL is stripped so endpoint paths join
    /// cleanly.
    pub fn new(base_url: impl Into<String>, mac: impl Into<String>) -> Self {
        Self {
            http: default_http_client(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            mac: mac.into(),
        }
    }

    /// Set a custom HTTP client.
    #[must_use]
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Get the bridge base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the device MAC address.
    pub fn mac(&self) -> &str {
        &self.mac
    }

    /// Liveness probe: GET `/hello`.
    pub async fn probe(&self) -> Result<(), Error> {
        let url = format!("{}/hello", self.base_url);
        let response = self.http.get(&url).send().await?;
        check_status(response).await
    }

    /// Check the device is reachable from the bridge: POST `/connect`.
    pub async fn check_connected(&self) -> Result<(), Error> {
        self.post_form("/connect", &[("mac", self.mac.as_str())])
            .await
    }

    /// Push raw image bytes to the display: POST `/image` (multipart).
    pub async fn send_image(&self, image: Vec<u8>) -> Result<(), Error> {
        let url = format!("{}/image", self.base_url);
        let form = multipart::Form::new()
            .text("mac", self.mac.clone())
            .part("image", multipart::Part::bytes(image).file_name("image"));
        let response = self.http.post(&url).multipart(form).send().await?;
        check_status(response).await?;
        tracing::debug!("pushed image to display");
        Ok(())
    }

    /// Push a text message to the display: POST `/text`.
    pub async fn send_text(&self, text: &str) -> Result<(), Error> {
        self.post_form("/text", &[("mac", self.mac.as_str()), ("text", text)])
            .await
    }

    /// Set the display brightness: POST `/brightness`.
    pub async fn set_brightness(&self, brightness: i64) -> Result<(), Error> {
        let value = brightness.to_string();
        self.post_form(
            "/brightness",
            &[("mac", self.mac.as_str()), ("brightness", value.as_str())],
        )
        .await
    }

    /// Switch the display to the time channel: POST `/time`.
    pub async fn set_time_channel(&self, display_type: &str) -> Result<(), Error> {
        self.post_form(
            "/time",
            &[("mac", self.mac.as_str()), ("display_type", display_type)],
        )
        .await
    }

    /// Set the device clock: POST `/datetime`.
    ///
    /// The device has no timezone concept, so `datetime` must be a naive
    /// ISO-8601 local timestamp (`YYYY-MM-DDTHH:MM:SS`, no suffix). See
    /// [`crate::clock::device_timestamp`].
    pub async fn set_datetime(&self, datetime: &str) -> Result<(), Error> {
        self.post_form(
            "/datetime",
            &[("mac", self.mac.as_str()), ("datetime", datetime)],
        )
        .await
    }

    async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> Result<(), Error> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.post(&url).form(fields).send().await?;
        check_status(response).await
    }
}

/// Map anything but a 200 to [`Error::Api`], keeping the response body for
/// the log line.
async fn check_status(response: reqwest::Response) -> Result<(), Error> {
    let status = response.status().as_u16();
    if status != 200 {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Api { status, body });
    }
    Ok(())
}
