use std::time::Duration;

use chrono::{DateTime, Utc};
use feed_rs::model::Feed;
use feed_rs::parser;
use reqwest::Client;

use crate::error::Result;
use crate::models::{truncate_chars, Article, FeedOutcome};

use super::source::{resolve_published_time, resolve_source_name};

const HTML_TEXT_WIDTH: usize = 10_000;

pub struct FeedFetcher {
    client: Client,
    summary_max_chars: usize,
}

impl FeedFetcher {
    pub fn new(summary_max_chars: usize) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("crypto-news-bot/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            summary_max_chars,
        })
    }

    /// Fetches and parses one feed. Never fails: errors become `FeedOutcome::Failed`.
    pub async fn fetch(&self, url: &str, now: DateTime<Utc>) -> FeedOutcome {
        match self.fetch_feed(url).await {
            Ok(feed) => {
                let source = resolve_source_name(url, &feed);
                let articles = extract_articles(&feed, &source, self.summary_max_chars, now);
                tracing::debug!("Fetched {} articles from {}", articles.len(), source);
                FeedOutcome::Fetched {
                    url: url.to_string(),
                    source,
                    articles,
                }
            }
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}", url, e);
                FeedOutcome::Failed {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Fetches every feed in order, one at a time.
    pub async fn fetch_all(&self, urls: &[String], now: DateTime<Utc>) -> Vec<FeedOutcome> {
        let mut outcomes = Vec::with_capacity(urls.len());
        for url in urls {
            outcomes.push(self.fetch(url, now).await);
        }
        outcomes
    }

    async fn fetch_feed(&self, url: &str) -> Result<Feed> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("Failed to fetch feed: HTTP {}", response.status()).into());
        }

        let bytes = response.bytes().await?;
        let feed = parser::parse(&bytes[..])?;
        Ok(feed)
    }
}

/// Turns parsed feed entries into articles attributed to `source`.
pub fn extract_articles(
    feed: &Feed,
    source: &str,
    summary_max_chars: usize,
    now: DateTime<Utc>,
) -> Vec<Article> {
    feed.entries
        .iter()
        .map(|entry| {
            let title = entry
                .title
                .as_ref()
                .map(|t| t.content.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "Untitled".to_string());

            let summary = entry
                .summary
                .as_ref()
                .map(|s| html_to_text(&s.content))
                .unwrap_or_default();

            let link = entry
                .links
                .first()
                .map(|l| l.href.clone())
                .unwrap_or_default();

            Article::new(
                title,
                truncate_chars(&summary, summary_max_chars),
                link,
                source.to_string(),
                resolve_published_time(entry, now),
            )
        })
        .collect()
}

fn html_to_text(html: &str) -> String {
    let text = html2text::from_read(html.as_bytes(), HTML_TEXT_WIDTH)
        .unwrap_or_else(|_| html.to_string());
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
