use crate::error::{AppError, AppResult};
use regex::Regex;

/// 判断是否为合法的 YouTube 链接
///
/// 允许的域名: youtube.com / www.youtube.com / m.youtube.com / youtu.be，
/// 短链接 youtu.be 的路径必须是单段视频 ID。
pub fn is_valid_youtube_url(url: &str) -> bool {
    let youtube_regex = Regex::new(r"^https?://(www\.|m\.)?youtube\.com(/\S*)?$").unwrap();
    let short_regex = Regex::new(r"^https?://youtu\.be/[A-Za-z0-9_-]+$").unwrap();

    youtube_regex.is_match(url) || short_regex.is_match(url)
}

/// 课时视频链接校验，空值直接放行
pub fn validate_video_url(url: Option<&str>) -> AppResult<()> {
    match url {
        None => Ok(()),
        Some(value) if value.is_empty() => Ok(()),
        Some(value) => {
            if is_valid_youtube_url(value) {
                Ok(())
            } else {
                Err(AppError::ValidationError(
                    "Only YouTube links are allowed (youtube.com)".to_string(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_youtube_urls() {
        assert!(is_valid_youtube_url("https://www.youtube.com/watch?v=abc123"));
        assert!(is_valid_youtube_url("https://youtube.com/watch?v=abc123"));
        assert!(is_valid_youtube_url("https://m.youtube.com/watch?v=abc123"));
        assert!(is_valid_youtube_url("https://www.youtube.com/embed/abc123"));
        assert!(is_valid_youtube_url("https://youtu.be/abc123"));
    }

    #[test]
    fn test_invalid_urls() {
        assert!(!is_valid_youtube_url("https://vimeo.com/123456"));
        assert!(!is_valid_youtube_url("https://example.com/video"));
        assert!(!is_valid_youtube_url("not-a-url"));
        assert!(!is_valid_youtube_url("https://fakeyoutube.com/watch?v=abc"));
        assert!(!is_valid_youtube_url("https://youtu.be/abc/def"));
    }

    #[test]
    fn test_validate_video_url_allows_empty() {
        assert!(validate_video_url(None).is_ok());
        assert!(validate_video_url(Some("")).is_ok());
        assert!(validate_video_url(Some("https://youtu.be/abc123")).is_ok());
        assert!(validate_video_url(Some("https://vimeo.com/123")).is_err());
    }
}
