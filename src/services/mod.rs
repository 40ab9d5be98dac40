use std::future::Future;

use crate::error::Result;

mod telegram;

pub use telegram::TelegramClient;

/// Destination for the digest.
pub trait Notifier {
    fn send(&self, text: &str) -> impl Future<Output = Result<()>>;
}
