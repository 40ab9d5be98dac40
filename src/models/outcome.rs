use super::Article;

/// Result of ingesting a single feed source.
#[derive(Debug, Clone)]
pub enum FeedOutcome {
    Fetched {
        url: String,
        source: String,
        articles: Vec<Article>,
    },
    Failed {
        url: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunReport {
    pub feeds_fetched: usize,
    pub feeds_failed: usize,
    pub articles_ingested: usize,
    pub articles_relevant: usize,
    pub articles_selected: usize,
    pub articles_delivered: usize,
    pub delivered: bool,
}
