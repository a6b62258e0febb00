//! Path utilities for naming downloaded clips.
//!
//! Clip titles arrive from untrusted callers and end up inside a
//! `Content-Disposition` header, so only a conservative character set is kept.

/// Strip a title down to ASCII letters, digits, hyphen, underscore and whitespace.
///
/// Any whitespace becomes a plain space so the result is always a valid header
/// value. Leading and trailing whitespace is trimmed after stripping. The result may
/// be empty; callers pick their own fallback name.
///
/// # Examples
///
/// ```
/// use clipforged_common::paths::sanitize_title;
///
/// assert_eq!(sanitize_title("My Clip!! 2024"), "My Clip 2024");
/// assert_eq!(sanitize_title("!!!"), "");
/// ```
pub fn sanitize_title(title: &str) -> String {
    let kept: String = title
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ' '))
        .collect();
    kept.trim().to_string()
}

/// Build the download filename for a clip.
///
/// The title is sanitized with [`sanitize_title`]; an absent title or one that
/// sanitizes to nothing is replaced by `fallback`. Start and end are floored
/// to whole seconds.
///
/// # Examples
///
/// ```
/// use clipforged_common::paths::clip_filename;
///
/// assert_eq!(
///     clip_filename(Some("Intro"), "clip", 65.8, 125.2, "mp4"),
///     "Intro_65s-125s.mp4"
/// );
/// assert_eq!(clip_filename(None, "clip", 0.0, 10.0, "mp4"), "clip_0s-10s.mp4");
/// ```
pub fn clip_filename(
    title: Option<&str>,
    fallback: &str,
    start_secs: f64,
    end_secs: f64,
    extension: &str,
) -> String {
    let sanitized = title.map(sanitize_title).unwrap_or_default();
    let base = if sanitized.is_empty() {
        fallback
    } else {
        sanitized.as_str()
    };

    format!(
        "{}_{}s-{}s.{}",
        base,
        start_secs.floor() as u64,
        end_secs.floor() as u64,
        extension
    )
}

/// Get the MIME type served for a clip in the given output container.
///
/// # Examples
///
/// ```
/// use clipforged_common::paths::content_type_for_container;
///
/// assert_eq!(content_type_for_container("mp4"), "video/mp4");
/// assert_eq!(content_type_for_container("xyz"), "application/octet-stream");
/// ```
pub fn content_type_for_container(container: &str) -> &'static str {
    match container.to_lowercase().as_str() {
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "mov" => "video/quicktime",
        "flv" => "video/x-flv",
        "avi" => "video/x-msvideo",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_punctuation() {
        assert_eq!(sanitize_title("My Clip!! 2024"), "My Clip 2024");
        assert_eq!(sanitize_title("a/b\\c\"d"), "abcd");
        assert_eq!(sanitize_title("keep-this_one"), "keep-this_one");
    }

    #[test]
    fn test_sanitize_drops_non_ascii() {
        assert_eq!(sanitize_title("Café «live»"), "Caf live");
    }

    #[test]
    fn test_sanitize_fully_special_is_empty() {
        assert_eq!(sanitize_title("!@#$%^&*()"), "");
        assert_eq!(sanitize_title("   "), "");
    }

    #[test]
    fn test_sanitize_normalizes_whitespace() {
        assert_eq!(sanitize_title("line\none\ttwo"), "line one two");
    }

    #[test]
    fn test_clip_filename_fallbacks() {
        assert_eq!(clip_filename(Some(""), "clip", 1.0, 2.0, "mp4"), "clip_1s-2s.mp4");
        assert_eq!(
            clip_filename(Some("?!*"), "clip", 1.0, 2.0, "mp4"),
            "clip_1s-2s.mp4"
        );
        assert_eq!(clip_filename(None, "video", 1.0, 2.0, "webm"), "video_1s-2s.webm");
    }

    #[test]
    fn test_clip_filename_floors_times() {
        assert_eq!(
            clip_filename(Some("My Clip!! 2024"), "clip", 12.999, 30.5, "mp4"),
            "My Clip 2024_12s-30s.mp4"
        );
    }

    #[test]
    fn test_content_type_case_insensitive() {
        assert_eq!(content_type_for_container("MP4"), "video/mp4");
        assert_eq!(content_type_for_container("webm"), "video/webm");
        assert_eq!(content_type_for_container("mkv"), "video/x-matroska");
    }
}
