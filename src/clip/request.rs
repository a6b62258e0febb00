//! Clip requests as received from callers.

use super::error::{ClipError, REQUIRED_FIELDS_MESSAGE};
use serde::{Deserialize, Deserializer};

/// JSON body accepted by the clip endpoint.
///
/// Every field is optional at this layer so that missing or mistyped values
/// surface as an `InvalidRequest` with a fixed message rather than a
/// deserializer error. Non-numeric times are read as absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipPayload {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default, deserialize_with = "lenient_number")]
    pub start_time: Option<f64>,

    #[serde(default, deserialize_with = "lenient_number")]
    pub end_time: Option<f64>,

    #[serde(default)]
    pub video_title: Option<String>,
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()))
}

impl ClipPayload {
    /// Convert into a [`ClipRequest`]. Missing times become NaN and a missing
    /// URL becomes empty, both of which fail [`ClipRequest::validate`].
    pub fn into_request(self) -> ClipRequest {
        ClipRequest {
            url: self.url.unwrap_or_default(),
            start_time: self.start_time.unwrap_or(f64::NAN),
            end_time: self.end_time.unwrap_or(f64::NAN),
            title: self.video_title,
        }
    }
}

/// One clip extraction request.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipRequest {
    /// Source page or media URL handed to yt-dlp.
    pub url: String,
    /// Start offset in seconds.
    pub start_time: f64,
    /// End offset in seconds.
    pub end_time: f64,
    /// Title used to name the download.
    pub title: Option<String>,
}

impl ClipRequest {
    pub fn new(url: impl Into<String>, start_time: f64, end_time: f64) -> Self {
        Self {
            url: url.into(),
            start_time,
            end_time,
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Check the request before any side effect happens.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidRequest` [`ClipError`] when the URL is blank, a time
    /// is not finite, the start is negative, or the start is not strictly
    /// before the end.
    pub fn validate(&self) -> Result<(), ClipError> {
        if self.url.trim().is_empty() || !self.start_time.is_finite() || !self.end_time.is_finite()
        {
            return Err(ClipError::invalid_request(REQUIRED_FIELDS_MESSAGE));
        }

        if self.start_time < 0.0 {
            return Err(ClipError::invalid_request("startTime must not be negative"));
        }

        if self.start_time >= self.end_time {
            return Err(ClipError::invalid_request(
                "startTime must be less than endTime",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::FailureKind;

    fn payload(json: serde_json::Value) -> ClipPayload {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_payload_camel_case() {
        let p = payload(serde_json::json!({
            "url": "https://example.com/video",
            "startTime": 65,
            "endTime": 125.5,
            "videoTitle": "My Clip"
        }));
        let req = p.into_request();
        assert_eq!(req.url, "https://example.com/video");
        assert_eq!(req.start_time, 65.0);
        assert_eq!(req.end_time, 125.5);
        assert_eq!(req.title.as_deref(), Some("My Clip"));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_non_numeric_times_are_missing() {
        let p = payload(serde_json::json!({
            "url": "https://example.com/video",
            "startTime": "10",
            "endTime": null
        }));
        assert!(p.start_time.is_none());
        assert!(p.end_time.is_none());

        let err = p.into_request().validate().unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidRequest);
        assert_eq!(err.message, REQUIRED_FIELDS_MESSAGE);
    }

    #[test]
    fn test_empty_url_rejected() {
        let err = ClipRequest::new("", 0.0, 10.0).validate().unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidRequest);
        assert_eq!(err.message, "URL, startTime, and endTime are required");

        assert!(ClipRequest::new("   ", 0.0, 10.0).validate().is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(ClipRequest::new("u", f64::NAN, 10.0).validate().is_err());
        assert!(ClipRequest::new("u", 0.0, f64::INFINITY).validate().is_err());
    }

    #[test]
    fn test_equal_and_reversed_rejected() {
        let err = ClipRequest::new("u", 10.0, 10.0).validate().unwrap_err();
        assert_eq!(err.message, "startTime must be less than endTime");

        let err = ClipRequest::new("u", 20.0, 10.0).validate().unwrap_err();
        assert_eq!(err.message, "startTime must be less than endTime");
    }

    #[test]
    fn test_negative_start_rejected() {
        let err = ClipRequest::new("u", -1.0, 10.0).validate().unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidRequest);
    }

    #[test]
    fn test_zero_start_allowed() {
        assert!(ClipRequest::new("u", 0.0, 0.001).validate().is_ok());
    }
}
