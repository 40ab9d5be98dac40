use chrono::{DateTime, Utc};
use feed_rs::model::{Entry, Feed};
use url::Url;

const KNOWN_SOURCES: &[(&str, &str)] = &[
    ("cointelegraph.com", "Cointelegraph"),
    ("coindesk.com", "CoinDesk"),
    ("cryptonews.com", "CryptoNews"),
    ("decrypt.co", "Decrypt"),
    ("bitcoinmagazine.com", "Bitcoin Magazine"),
    ("u.today", "U.Today"),
    ("cryptopotato.com", "CryptoPotato"),
    ("crypto-news-flash.com", "Crypto News Flash"),
    ("coinjournal.net", "Coin Journal"),
    ("news.bitcoin.com", "Bitcoin News"),
];

/// Human-readable name for a feed: its own title, then the known-source table,
/// then the title-cased domain.
pub fn resolve_source_name(feed_url: &str, feed: &Feed) -> String {
    if let Some(title) = feed.title.as_ref().map(|t| t.content.trim()) {
        if !title.is_empty() {
            return title.to_string();
        }
    }

    let domain = normalized_domain(feed_url);
    KNOWN_SOURCES
        .iter()
        .find(|(known, _)| *known == domain)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| title_case(&domain))
}

/// Entry's published time, then its updated time, then `now`.
///
/// feed-rs parses the raw RSS/Atom date strings itself, so an entry with an
/// unparseable date simply arrives without one.
pub fn resolve_published_time(entry: &Entry, now: DateTime<Utc>) -> DateTime<Utc> {
    entry.published.or(entry.updated).unwrap_or(now)
}

fn normalized_domain(feed_url: &str) -> String {
    let host = Url::parse(feed_url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
        .unwrap_or_else(|| feed_url.to_lowercase());

    host.strip_prefix("www.").map(str::to_string).unwrap_or(host)
}

/// Uppercases the first letter of every alphabetic run, lowercases the rest.
fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            result.push(c);
            prev_alpha = false;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use feed_rs::parser;

    fn parse(xml: &str) -> Feed {
        parser::parse(xml.as_bytes()).unwrap()
    }

    const UNTITLED_FEED: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <item>
    <title>Dated</title>
    <link>https://example.com/dated</link>
    <pubDate>Tue, 10 Mar 2026 08:15:00 GMT</pubDate>
  </item>
  <item>
    <title>Undated</title>
    <link>https://example.com/undated</link>
  </item>
</channel></rss>"#;

    #[test]
    fn prefers_feed_title() {
        let feed = parse(
            r#"<rss version="2.0"><channel><title>The Daily Hodl</title></channel></rss>"#,
        );
        assert_eq!(
            resolve_source_name("https://www.coindesk.com/rss", &feed),
            "The Daily Hodl"
        );
    }

    #[test]
    fn falls_back_to_known_domain() {
        let feed = parse(UNTITLED_FEED);
        assert_eq!(
            resolve_source_name("https://www.coindesk.com/arc/outboundfeeds/rss/", &feed),
            "CoinDesk"
        );
        assert_eq!(
            resolve_source_name("https://news.bitcoin.com/feed/", &feed),
            "Bitcoin News"
        );
    }

    #[test]
    fn falls_back_to_title_cased_domain() {
        let feed = parse(UNTITLED_FEED);
        assert_eq!(
            resolve_source_name("https://www.the-block.co/rss", &feed),
            "The-Block.Co"
        );
    }

    #[test]
    fn published_time_falls_back_to_now() {
        let feed = parse(UNTITLED_FEED);
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();

        assert_eq!(
            resolve_published_time(&feed.entries[0], now),
            Utc.with_ymd_and_hms(2026, 3, 10, 8, 15, 0).unwrap()
        );
        assert_eq!(resolve_published_time(&feed.entries[1], now), now);
    }

    #[test]
    fn garbled_date_falls_back_to_now() {
        let feed = parse(
            r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <title>CryptoPotato</title>
  <item>
    <title>Bad date</title>
    <link>https://example.com/bad</link>
    <pubDate>not a date</pubDate>
  </item>
  <item>
    <title>Good date</title>
    <link>https://example.com/good</link>
    <pubDate>Tue, 10 Mar 2026 09:00:00 GMT</pubDate>
  </item>
</channel></rss>"#,
        );
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();

        assert_eq!(feed.entries.len(), 2);
        assert_eq!(resolve_published_time(&feed.entries[0], now), now);
        assert_eq!(
            resolve_published_time(&feed.entries[1], now),
            Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap()
        );
    }

    #[test]
    fn atom_updated_is_used_without_published() {
        let feed = parse(
            r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Bitcoin Magazine</title>
  <id>urn:uuid:60a76c80-d399-11d9-b93C-0003939e0af6</id>
  <updated>2026-03-10T10:00:00Z</updated>
  <entry>
    <title>Lightning adoption grows</title>
    <link href="https://example.com/lightning"/>
    <id>urn:uuid:1225c695-cfb8-4ebb-aaaa-80da344efa6a</id>
    <updated>2026-03-10T10:20:30Z</updated>
  </entry>
</feed>"#,
        );
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();

        assert_eq!(feed.entries[0].published, None);
        assert_eq!(
            resolve_published_time(&feed.entries[0], now),
            Utc.with_ymd_and_hms(2026, 3, 10, 10, 20, 30).unwrap()
        );
    }

    #[test]
    fn title_case_handles_separators() {
        assert_eq!(title_case("example.com"), "Example.Com");
        assert_eq!(title_case("u.today"), "U.Today");
    }
}
