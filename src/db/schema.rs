pub const SCHEMA: &str = r#"
-- sent_articles table (one row per delivered article)
CREATE TABLE IF NOT EXISTS sent_articles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    article_hash TEXT NOT NULL UNIQUE,
    title TEXT NOT NULL,
    link TEXT NOT NULL,
    sent_time TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_sent_articles_sent_time ON sent_articles(sent_time);
"#;

/// Matches SQLite's `datetime()` output so stored times compare as text.
pub const SENT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
