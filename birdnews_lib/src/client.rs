//! Caching fetcher: day page → parsed sightings, through the day cache.

use std::sync::Arc;
use std::time::Duration;

use birdnews_api::{Client, DayQuery};
use chrono::NaiveDate;
use dashmap::DashMap;
use rand::Rng;
use tokio::sync::Mutex;

use crate::birdlist::BirdList;
use crate::cache::{DayCache, DEFAULT_CACHE_TTL};
use crate::error::BirdNewsError;
use crate::parse::parse_day_page;
use crate::types::Sighting;

/// Site client wrapper that adds the day cache, parsing, and retries.
///
/// Cache hits bypass the network entirely. Concurrent calls for the same
/// day queue on a per-day lock, so an uncached day is fetched once and the
/// waiting callers are served from the cache.
pub struct CachedClient {
    inner: Client,
    cache: DayCache,
    birds: Arc<BirdList>,
    ttl: Duration,
    region: Option<String>,
    retry: RetryConfig,
    in_flight: DashMap<NaiveDate, Arc<Mutex<()>>>,
}

/// Backoff settings for transient fetch failures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryConfig {
    pub max_retries: usize,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay_ms: 1000,
            max_delay_ms: 10000,
        }
    }
}

impl RetryConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_retries: env_usize("BIRDNEWS_RETRY_MAX", defaults.max_retries),
            base_delay_ms: env_u64("BIRDNEWS_RETRY_BASE_MS", defaults.base_delay_ms),
            max_delay_ms: env_u64("BIRDNEWS_RETRY_MAX_MS", defaults.max_delay_ms),
        }
    }

    /// Fail on the first error.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let shift = (attempt.saturating_sub(1)).min(30) as u32;
        let exp = 1u64 << shift;
        let base = self
            .base_delay_ms
            .saturating_mul(exp)
            .min(self.max_delay_ms);
        let jitter = rand::thread_rng().gen_range(0.8..1.2);
        Duration::from_millis((base as f64 * jitter) as u64)
    }
}

impl CachedClient {
    /// Creates a cached client with the default TTL and retry settings from the environment.
    pub fn new(inner: Client, cache: DayCache, birds: Arc<BirdList>) -> Self {
        Self {
            inner,
            cache,
            birds,
            ttl: DEFAULT_CACHE_TTL,
            region: None,
            retry: RetryConfig::from_env(),
            in_flight: DashMap::new(),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_region(mut self, region: &str) -> Self {
        self.region = Some(region.to_string());
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn birds(&self) -> &Arc<BirdList> {
        &self.birds
    }

    /// Sightings for `day`, from the cache when fresh, otherwise fetched,
    /// parsed and cached.
    pub async fn fetch_day(&self, day: NaiveDate) -> Result<Vec<Sighting>, BirdNewsError> {
        let lock = self.day_lock(day);
        let result = {
            let _guard = lock.lock().await;
            self.fetch_day_locked(day).await
        };
        drop(lock);
        self.in_flight
            .remove_if(&day, |_, lock| Arc::strong_count(lock) == 1);
        result
    }

    async fn fetch_day_locked(&self, day: NaiveDate) -> Result<Vec<Sighting>, BirdNewsError> {
        if let Some(cached) = self.cache.get(day)? {
            tracing::info!("{} from cache", day);
            // A persistent cache can outlive the runtime bird list.
            for sighting in &cached {
                self.birds.add_if_absent(&sighting.species);
            }
            return Ok(cached);
        }

        let mut query = DayQuery::new(day);
        if let Some(ref region) = self.region {
            query = query.with_region(region);
        }

        let query = &query;
        let html = self
            .retry_fetch(day, || async { Ok(self.inner.get_day_page(query).await?) })
            .await?;
        let sightings = parse_day_page(&html, &self.birds)?;
        tracing::debug!(%day, count = sightings.len(), "parsed day page");

        self.cache.put(day, &sightings, self.ttl)?;
        Ok(sightings)
    }

    fn day_lock(&self, day: NaiveDate) -> Arc<Mutex<()>> {
        self.in_flight
            .entry(day)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn retry_fetch<T, F, Fut>(&self, day: NaiveDate, mut f: F) -> Result<T, BirdNewsError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, BirdNewsError>>,
    {
        let mut attempt = 0usize;
        loop {
            match f().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    attempt += 1;
                    if attempt > self.retry.max_retries || !is_retryable(&err) {
                        return Err(err);
                    }
                    let delay = self.retry.delay_for_attempt(attempt);
                    tracing::warn!(
                        "{} request failed (attempt {}/{}), retrying in {:.1}s",
                        day,
                        attempt,
                        self.retry.max_retries,
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

fn is_retryable(err: &BirdNewsError) -> bool {
    match err {
        BirdNewsError::Fetch(api_err) => match api_err {
            birdnews_api::Error::RequestFailed | birdnews_api::Error::Timeout => true,
            birdnews_api::Error::HttpStatus { status, .. } => *status == 429 || *status >= 500,
        },
        _ => false,
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(default)
}
