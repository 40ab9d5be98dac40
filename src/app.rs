use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::db::SentStore;
use crate::error::Result;
use crate::feed::FeedFetcher;
use crate::models::{FeedOutcome, RunReport};
use crate::pipeline::{Digest, DigestFormatter, KeywordFilter, SelectionPolicy};
use crate::services::Notifier;

pub struct App<N> {
    config: Config,
    store: SentStore,
    fetcher: FeedFetcher,
    filter: KeywordFilter,
    policy: SelectionPolicy,
    formatter: DigestFormatter,
    notifier: N,
}

impl<N: Notifier> App<N> {
    /// Opens the store (pruning expired records) and builds every pipeline stage.
    pub async fn new(config: Config, notifier: N, now: DateTime<Utc>) -> Result<Self> {
        let store = SentStore::open(&config.db_path, now, config.retention()).await?;
        tracing::debug!("{} sent articles on record", store.len().await?);
        let fetcher = FeedFetcher::new(config.summary_max_chars)?;
        let filter = KeywordFilter::new(&config.keywords);
        let policy = SelectionPolicy::from_config(&config);
        let formatter = DigestFormatter::from_config(&config)?;

        Ok(Self {
            config,
            store,
            fetcher,
            filter,
            policy,
            formatter,
            notifier,
        })
    }

    /// Fetches every configured feed and delivers one digest.
    pub async fn run_once(&self, now: DateTime<Utc>) -> Result<RunReport> {
        let outcomes = self.fetcher.fetch_all(&self.config.feeds, now).await;
        self.process(outcomes, now).await
    }

    /// Builds the digest without delivering it or recording anything as sent.
    pub async fn preview(&self, now: DateTime<Utc>) -> Result<Digest> {
        let outcomes = self.fetcher.fetch_all(&self.config.feeds, now).await;
        let mut report = RunReport::default();
        self.build_digest(outcomes, now, &mut report).await
    }

    pub async fn process(
        &self,
        outcomes: Vec<FeedOutcome>,
        now: DateTime<Utc>,
    ) -> Result<RunReport> {
        let mut report = RunReport::default();
        let digest = self.build_digest(outcomes, now, &mut report).await?;

        if digest.is_empty() {
            tracing::info!("No new crypto news to send");
            return Ok(report);
        }

        if let Err(e) = self.notifier.send(&digest.text).await {
            tracing::warn!(
                "Digest delivery failed, articles stay eligible for the next run: {}",
                e
            );
            return Ok(report);
        }

        report.delivered = true;
        for article in &digest.articles {
            if self
                .store
                .insert(&article.fingerprint, &article.title, &article.link)
                .await?
            {
                report.articles_delivered += 1;
            }
        }

        tracing::info!("Sent digest with {} articles", report.articles_delivered);
        Ok(report)
    }

    async fn build_digest(
        &self,
        outcomes: Vec<FeedOutcome>,
        now: DateTime<Utc>,
        report: &mut RunReport,
    ) -> Result<Digest> {
        let mut candidates = Vec::new();
        for outcome in outcomes {
            match outcome {
                FeedOutcome::Failed { url, reason } => {
                    tracing::warn!("Skipping feed {}: {}", url, reason);
                    report.feeds_failed += 1;
                }
                FeedOutcome::Fetched {
                    url,
                    source,
                    articles,
                } => {
                    tracing::debug!("{} ({}): {} entries", source, url, articles.len());
                    report.feeds_fetched += 1;
                    report.articles_ingested += articles.len();
                    candidates.extend(
                        articles
                            .into_iter()
                            .filter(|a| self.filter.is_relevant(&a.searchable_text())),
                    );
                }
            }
        }
        report.articles_relevant = candidates.len();

        let selected = self.policy.select(candidates, &self.store, now).await?;
        report.articles_selected = selected.len();
        tracing::info!(
            "{} of {} articles relevant, {} selected from {} feeds ({} failed)",
            report.articles_relevant,
            report.articles_ingested,
            report.articles_selected,
            report.feeds_fetched,
            report.feeds_failed
        );

        Ok(self.formatter.format(&selected, now))
    }
}
