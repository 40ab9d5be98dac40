mod fetcher;
mod source;

pub use fetcher::{extract_articles, FeedFetcher};
