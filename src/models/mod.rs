mod article;
mod outcome;

pub use article::{truncate_chars, Article, MINUTE_FORMAT};
pub use outcome::{FeedOutcome, RunReport};
