use chrono::{DateTime, Local, Utc};
use sha2::{Digest, Sha256};

/// Display format for publication and header timestamps.
pub const MINUTE_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub summary: String,
    pub link: String,
    pub source: String,
    pub published: DateTime<Utc>,
    pub fingerprint: String,
}

impl Article {
    pub fn new(
        title: String,
        summary: String,
        link: String,
        source: String,
        published: DateTime<Utc>,
    ) -> Self {
        let fingerprint = fingerprint(&title, &link);
        Self {
            title,
            summary,
            link,
            source,
            published,
            fingerprint,
        }
    }

    /// Local time, minute precision. `published` itself keeps full precision.
    pub fn published_display(&self) -> String {
        self.published.with_timezone(&Local).format(MINUTE_FORMAT).to_string()
    }

    /// Text the keyword filter looks at.
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.title, self.summary)
    }
}

/// Hex SHA-256 over `title` followed by `link`.
pub fn fingerprint(title: &str, link: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    hasher.update(link.as_bytes());
    let bytes = hasher.finalize();
    format!("{bytes:x}")
}

/// Cuts `text` to `max_chars` characters, appending "..." when anything was removed.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fingerprint_is_deterministic() {
        let a = fingerprint("Bitcoin rallies", "https://example.com/a");
        let b = fingerprint("Bitcoin rallies", "https://example.com/a");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn fingerprint_depends_on_title_and_link() {
        let base = fingerprint("Bitcoin rallies", "https://example.com/a");
        assert_ne!(base, fingerprint("Bitcoin rallies", "https://example.com/b"));
        assert_ne!(base, fingerprint("Bitcoin falls", "https://example.com/a"));
    }

    #[test]
    fn published_keeps_seconds_and_displays_minutes() {
        let dt = Utc.with_ymd_and_hms(2026, 3, 1, 12, 34, 56).unwrap();
        let article = Article::new(
            "t".into(),
            String::new(),
            "l".into(),
            "s".into(),
            dt,
        );
        assert_eq!(article.published, dt);
        assert_eq!(
            article.published_display(),
            dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
        );
        assert_eq!(article.published_display().len(), 16);
        assert_eq!(article.fingerprint, fingerprint("t", "l"));
    }

    #[test]
    fn truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("exactly", 7), "exactly");
        assert_eq!(truncate_chars("abcdef", 3), "abc...");
        assert_eq!(truncate_chars("비트코인 급등", 4), "비트코인...");
    }
}
