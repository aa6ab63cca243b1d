use regex::Regex;

/// Length of a bare YouTube video identifier.
pub const VIDEO_ID_LEN: usize = 11;

lazy_static::lazy_static! {
    /// Tried in order, first match wins.
    static ref VIDEO_ID_PATTERNS: Vec<(&'static str, Regex)> = {
        vec![
            ("watch", r"youtube\.com/watch\?v=([^&\n?#]+)"),
            ("short", r"youtu\.be/([^&\n?#]+)"),
            ("embed", r"youtube\.com/embed/([^&\n?#]+)"),
            ("legacy", r"youtube\.com/v/([^&\n?#]+)"),
            ("user", r"youtube\.com/user/.*#.*/.*/([^&\n?#]+)"),
        ]
        .into_iter()
        .map(|(form, rx)| (form, Regex::new(rx).unwrap()))
        .collect()
    };
}

/// Pulls the video identifier out of a watch, short-link, embed, legacy or user-profile URL.
/// A bare identifier is returned as is.
pub fn extract_video_id(input: &str) -> Option<String> {
    for (form, rx) in VIDEO_ID_PATTERNS.iter() {
        if let Some(id) = rx.captures(input).and_then(|cap| cap.get(1)) {
            tracing::debug!(form, id = id.as_str(), "Matched video id.");
            return Some(id.as_str().to_string());
        }
    }

    if is_bare_id(input) {
        return Some(input.to_string());
    }

    None
}

fn is_bare_id(input: &str) -> bool {
    input.chars().count() == VIDEO_ID_LEN && !input.contains('/') && !input.contains('?')
}

pub fn embed_url(video_id: &str) -> String {
    format!("https://www.youtube.com/embed/{video_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_link() {
        assert_eq!(
            extract_video_id("https://youtu.be/abc12345678").as_deref(),
            Some("abc12345678")
        );
    }

    #[test]
    fn watch_url_stops_at_next_param() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=abc12345678&t=5").as_deref(),
            Some("abc12345678")
        );
    }

    #[test]
    fn embed_and_legacy_paths() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ?autoplay=1").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            extract_video_id("http://www.youtube.com/v/dQw4w9WgXcQ#t=1").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn user_profile_form() {
        assert_eq!(
            extract_video_id("http://www.youtube.com/user/someone#p/a/u/1/dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn bare_id_is_returned_unchanged() {
        assert_eq!(extract_video_id("abc12345678").as_deref(), Some("abc12345678"));
    }

    #[test]
    fn unmatched_input_fails() {
        assert_eq!(extract_video_id("https://vimeo.com/123456"), None);
        assert_eq!(extract_video_id("abc1234567"), None);
        assert_eq!(extract_video_id("abc/1234567"), None);
        assert_eq!(extract_video_id("abc?1234567"), None);
        assert_eq!(extract_video_id(""), None);
    }

    #[test]
    fn embed_url_round_trips_through_extractor() {
        let url = embed_url("abc12345678");
        assert_eq!(extract_video_id(&url).as_deref(), Some("abc12345678"));
    }
}
