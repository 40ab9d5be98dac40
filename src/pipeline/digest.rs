use chrono::{DateTime, Local, Utc};
use regex::{Captures, Regex};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{truncate_chars, Article, MINUTE_FORMAT};

const HEADER_LABEL: &str = "Crypto News Alert";

// Longest first so "cryptocurrency" wins over "crypto" and "Ethereum" over "ETH".
const HIGHLIGHT_TERMS: &[&str] = &["cryptocurrency", "Ethereum", "Bitcoin", "crypto", "BTC", "ETH"];

/// A rendered message and the articles that made it into the text.
#[derive(Debug, Clone, Default)]
pub struct Digest {
    pub text: String,
    pub articles: Vec<Article>,
}

impl Digest {
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

/// Renders articles as a Telegram HTML message.
pub struct DigestFormatter {
    title_max_chars: usize,
    message_max_chars: usize,
    highlight: Regex,
}

impl DigestFormatter {
    pub fn new(title_max_chars: usize, message_max_chars: usize) -> Result<Self> {
        let pattern = HIGHLIGHT_TERMS
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");
        let highlight = Regex::new(&format!("(?i){pattern}"))
            .map_err(|e| AppError::Other(e.into()))?;

        Ok(Self {
            title_max_chars,
            message_max_chars,
            highlight,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.title_max_chars, config.message_max_chars)
    }

    /// Header plus one block per article, stopping before the size cap would be exceeded.
    pub fn format(&self, articles: &[Article], now: DateTime<Utc>) -> Digest {
        if articles.is_empty() {
            return Digest::default();
        }

        let mut text = format!(
            "🚀 <b>{}</b> ({})\n\n",
            HEADER_LABEL,
            now.with_timezone(&Local).format(MINUTE_FORMAT)
        );
        let mut length = text.chars().count();
        let mut rendered = Vec::new();

        for article in articles {
            let block = self.render_block(article);
            let block_length = block.chars().count();
            if length + block_length > self.message_max_chars {
                tracing::debug!(
                    "Message size cap reached, dropping {} of {} articles",
                    articles.len() - rendered.len(),
                    articles.len()
                );
                break;
            }
            text.push_str(&block);
            length += block_length;
            rendered.push(article.clone());
        }

        if rendered.is_empty() {
            return Digest::default();
        }

        Digest {
            text,
            articles: rendered,
        }
    }

    fn render_block(&self, article: &Article) -> String {
        let title = truncate_chars(&article.title, self.title_max_chars);
        let title = self.highlight(&escape_html(&title));

        format!(
            "📰 <a href='{}'>{}</a>\n📍 {} | ⏰ {}\n\n",
            escape_html(&article.link),
            title,
            escape_html(&article.source),
            article.published_display()
        )
    }

    /// Wraps each highlight term in `<b>` using its canonical casing.
    pub fn highlight(&self, text: &str) -> String {
        self.highlight
            .replace_all(text, |caps: &Captures| {
                let matched = &caps[0];
                let canonical = HIGHLIGHT_TERMS
                    .iter()
                    .find(|t| t.eq_ignore_ascii_case(matched))
                    .copied()
                    .unwrap_or(matched);
                format!("<b>{canonical}</b>")
            })
            .into_owned()
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
