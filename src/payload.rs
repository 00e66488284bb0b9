//! Inbound notification payloads and mode resolution.
//!
//! Hubs hand the adapter a free-text message plus an optional loosely typed
//! payload. [`Notification::resolve`] validates that pair into a tagged
//! variant carrying only the fields its mode needs, so the dispatcher never
//! sees a "wrong field for mode" combination.

use serde::Deserialize;
use serde_json::Value;

use crate::error::Error;
use crate::DEFAULT_DISPLAY_TYPE;

/// Structured payload attached to a notification call.
///
/// Keys match the wire names the hub sends (`file-name`, `set-datetime`,
/// ...). All fields are optional; which ones are required depends on the
/// resolved mode.
///
/// # Example
///
/// ```
/// use timebox_notify::NotificationData;
///
/// let data: NotificationData = serde_json::from_str(
///     r#"{ "mode": "time", "set-datetime": true, "offset-datetime": "+02:00" }"#,
/// ).unwrap();
/// assert_eq!(data.mode.as_deref(), Some("time"));
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct NotificationData {
    /// Device operation: `image`, `text`, `brightness` or `time`
    pub mode: Option<String>,
    /// IMAGE mode: URL to fetch the image from
    pub link: Option<String>,
    /// IMAGE mode: file name under the configured image directory
    pub file_name: Option<String>,
    /// TEXT mode: text to display (falls back to the message)
    pub text: Option<String>,
    /// BRIGHTNESS mode: integer or numeric string
    pub brightness: Option<Value>,
    /// TIME mode: sync the device clock before switching channels
    pub set_datetime: Option<bool>,
    /// TIME mode: wall-clock offset `[+-]HH:MM` for the clock sync
    pub offset_datetime: Option<String>,
    /// TIME mode: channel layout, defaults to `fullscreen`
    pub display_type: Option<String>,
}

/// Where IMAGE-mode content comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Fetch over HTTP
    Link(String),
    /// Read from the configured image directory
    File(String),
}

/// A validated notification, one variant per device operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Push an image to the display
    Image(ImageSource),
    /// Push a text message to the display
    Text(String),
    /// Set display brightness
    Brightness(i64),
    /// Switch to the time channel, optionally syncing the clock first
    Time {
        /// Sync the device clock before switching
        set_datetime: bool,
        /// Optional `[+-]HH:MM` wall-clock offset for the sync
        offset: Option<String>,
        /// Channel layout
        display_type: String,
    },
}

impl Notification {
    /// Resolve a message / payload pair into a validated notification.
    ///
    /// Mode defaults to `text` when the payload does not name one; a bare
    /// nonempty message with no payload is a text notification. Anything
    /// malformed comes back as [`Error::InvalidRequest`] or [`Error::Parse`]
    /// naming the offending field.
    pub fn resolve(message: &str, data: Option<&NotificationData>) -> Result<Self, Error> {
        let empty = NotificationData::default();
        let (data, mode) = match data {
            Some(data) => (data, data.mode.as_deref().unwrap_or("text")),
            None if !message.is_empty() => (&empty, "text"),
            None => return Err(Error::InvalidRequest("no message type".to_string())),
        };

        match mode {
            "image" => {
                if let Some(link) = nonempty(&data.link) {
                    Ok(Notification::Image(ImageSource::Link(link.to_string())))
                } else if let Some(name) = nonempty(&data.file_name) {
                    Ok(Notification::Image(ImageSource::File(name.to_string())))
                } else {
                    Err(Error::InvalidRequest(
                        "link or file-name must be provided with image mode".to_string(),
                    ))
                }
            }
            "text" => {
                // An explicitly empty payload text does not fall back to the
                // message; only an absent field does.
                let text = data.text.as_deref().unwrap_or(message);
                if text.is_empty() {
                    Err(Error::InvalidRequest(
                        "text or message must be provided with text mode".to_string(),
                    ))
                } else {
                    Ok(Notification::Text(text.to_string()))
                }
            }
            "brightness" => match data.brightness.as_ref().and_then(parse_int) {
                Some(value) => Ok(Notification::Brightness(value)),
                None => Err(Error::Parse(format!(
                    "brightness={}",
                    data.brightness
                        .as_ref()
                        .map_or_else(|| "null".to_string(), Value::to_string)
                ))),
            },
            "time" => Ok(Notification::Time {
                set_datetime: data.set_datetime.unwrap_or(false),
                offset: data.offset_datetime.clone(),
                display_type: data
                    .display_type
                    .clone()
                    .unwrap_or_else(|| DEFAULT_DISPLAY_TYPE.to_string()),
            }),
            other => Err(Error::InvalidRequest(format!("unknown mode {other:?}"))),
        }
    }
}

fn nonempty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

/// Accept anything `i64` can hold: JSON integers and numeric strings.
fn parse_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(raw) => raw.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn data(raw: serde_json::Value) -> NotificationData {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn test_kebab_case_keys() {
        let data = data(json!({
            "mode": "time",
            "file-name": "a.png",
            "set-datetime": true,
            "offset-datetime": "+01:00",
            "display-type": "halfscreen",
        }));
        assert_eq!(data.file_name.as_deref(), Some("a.png"));
        assert_eq!(data.set_datetime, Some(true));
        assert_eq!(data.offset_datetime.as_deref(), Some("+01:00"));
        assert_eq!(data.display_type.as_deref(), Some("halfscreen"));
    }

    #[test]
    fn test_bare_message_is_text() {
        let resolved = Notification::resolve("hello", None).unwrap();
        assert_eq!(resolved, Notification::Text("hello".to_string()));
    }

    #[test]
    fn test_no_message_no_payload_is_invalid() {
        assert!(matches!(
            Notification::resolve("", None),
            Err(Error::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_mode_defaults_to_text() {
        let data = data(json!({ "text": "from payload" }));
        let resolved = Notification::resolve("ignored", Some(&data)).unwrap();
        assert_eq!(resolved, Notification::Text("from payload".to_string()));
    }

    #[test]
    fn test_text_falls_back_to_message() {
        let data = data(json!({ "mode": "text" }));
        let resolved = Notification::resolve("fallback", Some(&data)).unwrap();
        assert_eq!(resolved, Notification::Text("fallback".to_string()));
    }

    #[test]
    fn test_explicit_empty_text_does_not_fall_back() {
        let data = data(json!({ "mode": "text", "text": "" }));
        assert!(matches!(
            Notification::resolve("message", Some(&data)),
            Err(Error::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_text_empty_everywhere_is_invalid() {
        let data = data(json!({ "mode": "text", "text": "" }));
        assert!(matches!(
            Notification::resolve("", Some(&data)),
            Err(Error::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_image_prefers_link_over_file() {
        let data = data(json!({ "mode": "image", "link": "http://x/y.png", "file-name": "y.png" }));
        let resolved = Notification::resolve("", Some(&data)).unwrap();
        assert_eq!(
            resolved,
            Notification::Image(ImageSource::Link("http://x/y.png".to_string()))
        );
    }

    #[test]
    fn test_image_by_file_name() {
        let data = data(json!({ "mode": "image", "file-name": "y.png" }));
        let resolved = Notification::resolve("", Some(&data)).unwrap();
        assert_eq!(
            resolved,
            Notification::Image(ImageSource::File("y.png".to_string()))
        );
    }

    #[test]
    fn test_image_without_source_is_invalid() {
        let data = data(json!({ "mode": "image" }));
        assert!(matches!(
            Notification::resolve("", Some(&data)),
            Err(Error::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_brightness_accepts_int_and_numeric_string() {
        let from_int = data(json!({ "mode": "brightness", "brightness": 50 }));
        assert_eq!(
            Notification::resolve("", Some(&from_int)).unwrap(),
            Notification::Brightness(50)
        );

        let from_str = data(json!({ "mode": "brightness", "brightness": " 75 " }));
        assert_eq!(
            Notification::resolve("", Some(&from_str)).unwrap(),
            Notification::Brightness(75)
        );
    }

    #[test]
    fn test_brightness_rejects_garbage() {
        for raw in [json!("bright"), json!(7.5), json!(null), json!([50])] {
            let data = data(json!({ "mode": "brightness", "brightness": raw.clone() }));
            assert!(
                matches!(Notification::resolve("", Some(&data)), Err(Error::Parse(_))),
                "brightness {raw:?} should not parse"
            );
        }
    }

    #[test]
    fn test_brightness_missing_is_parse_error() {
        let data = data(json!({ "mode": "brightness" }));
        assert!(matches!(
            Notification::resolve("", Some(&data)),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_time_defaults() {
        let data = data(json!({ "mode": "time" }));
        let resolved = Notification::resolve("", Some(&data)).unwrap();
        assert_eq!(
            resolved,
            Notification::Time {
                set_datetime: false,
                offset: None,
                display_type: "fullscreen".to_string(),
            }
        );
    }

    #[test]
    fn test_time_with_clock_sync() {
        let data = data(json!({
            "mode": "time",
            "set-datetime": true,
            "offset-datetime": "+02:30",
            "display-type": "halfscreen",
        }));
        let resolved = Notification::resolve("", Some(&data)).unwrap();
        assert_eq!(
            resolved,
            Notification::Time {
                set_datetime: true,
                offset: Some("+02:30".to_string()),
                display_type: "halfscreen".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_mode_is_invalid() {
        let data = data(json!({ "mode": "sparkle" }));
        assert!(matches!(
            Notification::resolve("", Some(&data)),
            Err(Error::InvalidRequest(_))
        ));
    }
}
