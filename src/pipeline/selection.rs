use std::collections::HashSet;

use chrono::{DateTime, TimeDelta, Utc};

use crate::config::Config;
use crate::db::SentStore;
use crate::error::Result;
use crate::models::Article;

/// Recency window, dedup, ordering and cap applied to one run's candidates.
#[derive(Debug, Clone)]
pub struct SelectionPolicy {
    window: TimeDelta,
    max_articles: usize,
}

impl SelectionPolicy {
    pub fn new(window: TimeDelta, max_articles: usize) -> Self {
        Self {
            window,
            max_articles,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.recency_window(), config.max_articles)
    }

    pub async fn select(
        &self,
        articles: Vec<Article>,
        store: &SentStore,
        now: DateTime<Utc>,
    ) -> Result<Vec<Article>> {
        let cutoff = now - self.window;
        let mut seen = HashSet::new();
        let mut selected = Vec::new();

        for article in articles {
            if article.published <= cutoff {
                continue;
            }
            if !seen.insert(article.fingerprint.clone()) {
                continue;
            }
            if store.contains(&article.fingerprint).await? {
                continue;
            }
            selected.push(article);
        }

        selected.sort_by(|a, b| b.published.cmp(&a.published));
        selected.truncate(self.max_articles);
        Ok(selected)
    }
}
