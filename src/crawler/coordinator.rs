//! Crawler coordinator - main crawl orchestration logic
//!
//! This module runs the worker pool that drives a crawl:
//! - Seeding the frontier and spawning a fixed number of workers
//! - The per-URL pipeline (dedup, politeness, fetch, links, classify, index)
//! - Termination on target count, time limit or an exhausted frontier
//! - Periodic and final index export

use crate::classifier::TopicFilter;
use crate::config::Config;
use crate::crawler::frontier::FrontierQueue;
use crate::crawler::{build_http_client, extract_links_in_element, fetch_page, parse_html};
use crate::index::InvertedIndex;
use crate::robots::PolitenessCache;
use crate::state::{CounterSnapshot, CrawlCounters, PageOutcome, RetrievalSlot, VisitedSet};
use crate::storage::ExportRecord;
use crate::url::normalize_url;
use crate::SumiError;
use reqwest::Client;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use url::Url;

/// Shared state handed to every worker
pub struct CrawlContext {
    pub config: Arc<Config>,
    pub frontier: FrontierQueue,
    pub visited: VisitedSet,
    pub counters: CrawlCounters,
    pub politeness: PolitenessCache,
    pub topic: TopicFilter,
    pub index: Arc<InvertedIndex>,
    pub client: Client,
    started: Instant,
}

impl CrawlContext {
    /// Builds the context for a crawl writing into `index`
    pub fn new(config: Config, index: Arc<InvertedIndex>) -> Result<Self, SumiError> {
        let crawler = &config.crawler;
        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(crawler.page_timeout_secs),
        )?;

        let politeness = PolitenessCache::new(
            client.clone(),
            config.user_agent.crawler_name.clone(),
            Duration::from_secs(crawler.robots_timeout_secs),
        );
        let topic = TopicFilter::new(&config.topic.keywords, config.topic.mode);

        Ok(Self {
            config: Arc::new(config),
            frontier: FrontierQueue::new(),
            visited: VisitedSet::new(),
            counters: CrawlCounters::new(),
            politeness,
            topic,
            index,
            client,
            started: Instant::now(),
        })
    }

    fn target_reached(&self) -> bool {
        self.visited.retrieved_count() >= self.config.crawler.target_count
    }

    /// Reserves one of the remaining retrievals toward the target
    ///
    /// Returns `None` while retrieved plus in-flight reserved pages already
    /// cover the target.
    pub fn reserve_slot(&self) -> Option<RetrievalSlot<'_>> {
        self.visited.try_reserve(self.config.crawler.target_count)
    }

    fn log_progress(&self) {
        let snap = self.counters.snapshot();
        let elapsed = self.started.elapsed().as_secs_f64();
        let rate = if elapsed > 0.0 {
            snap.retrieved as f64 / elapsed
        } else {
            0.0
        };

        tracing::info!(
            "Progress: {} dispatched, {} retrieved, {} ignored, {} duplicates, {} failed, {} in frontier, {:.2} pages/sec",
            snap.dispatched,
            snap.retrieved,
            snap.ignored,
            snap.duplicates,
            snap.failed,
            self.frontier.len(),
            rate
        );
    }
}

/// Why a crawl stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    TargetReached,
    TimeLimit,
    FrontierExhausted,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetReached => write!(f, "target reached"),
            Self::TimeLimit => write!(f, "time limit elapsed"),
            Self::FrontierExhausted => write!(f, "frontier exhausted"),
        }
    }
}

/// Summary of a finished crawl
#[derive(Debug)]
pub struct CrawlReport {
    /// Successfully fetched URLs in retrieval order
    pub retrieved: Vec<Url>,
    pub counters: CounterSnapshot,
    pub elapsed: Duration,
    pub reason: StopReason,
    /// URLs still queued when the crawl stopped
    pub frontier_remaining: usize,
    /// Metadata of the final index export
    pub export: ExportRecord,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    ctx: Arc<CrawlContext>,
    seed: Url,
    index_path: PathBuf,
    config_hash: Option<String>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `index` - Index the crawl adds to; it outlives the crawl
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(SumiError)` - Invalid seed or HTTP client setup failure
    pub fn new(config: Config, index: Arc<InvertedIndex>) -> Result<Self, SumiError> {
        let seed = normalize_url(&config.crawler.seed)?;
        let index_path = PathBuf::from(&config.output.index_path);
        let ctx = CrawlContext::new(config, index)?;

        Ok(Self {
            ctx: Arc::new(ctx),
            seed,
            index_path,
            config_hash: None,
        })
    }

    /// Records `hash` with every export made by this crawl
    pub fn with_config_hash(mut self, hash: impl Into<String>) -> Self {
        self.config_hash = Some(hash.into());
        self
    }

    pub fn context(&self) -> &Arc<CrawlContext> {
        &self.ctx
    }

    /// Runs the crawl to completion
    ///
    /// Returns once the target is reached, the time limit elapses or the
    /// frontier is exhausted. The index is exported before returning.
    pub async fn run(self) -> Result<CrawlReport, SumiError> {
        let ctx = self.ctx;
        let crawler = &ctx.config.crawler;

        tracing::info!(
            "Starting crawl from {} with {} workers (target {} pages)",
            self.seed,
            crawler.workers,
            crawler.target_count
        );
        if ctx.topic.is_enabled() {
            tracing::info!(
                "Topic filter: {:?} (match {})",
                ctx.topic.keywords(),
                ctx.topic.mode()
            );
        }

        ctx.frontier.push(self.seed.clone());

        let ticker = match ctx.config.output.export_interval_secs {
            0 => None,
            secs => Some(tokio::spawn(periodic_export(
                Arc::clone(&ctx.index),
                self.index_path.clone(),
                self.config_hash.clone(),
                Duration::from_secs(secs),
            ))),
        };

        let mut workers = JoinSet::new();
        for worker_id in 0..crawler.workers {
            workers.spawn(worker_loop(worker_id, Arc::clone(&ctx)));
        }

        let time_limit = match crawler.time_limit_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        let timed_out = {
            let join_all = join_workers(&mut workers);
            match time_limit {
                Some(limit) => tokio::time::timeout(limit, join_all).await.is_err(),
                None => {
                    join_all.await;
                    false
                }
            }
        };

        if timed_out {
            tracing::warn!("Time limit reached, abandoning in-flight fetches");
            workers.abort_all();
            while workers.join_next().await.is_some() {}
        }

        if let Some(ticker) = ticker {
            ticker.abort();
        }

        let reason = if timed_out {
            StopReason::TimeLimit
        } else if ctx.target_reached() {
            StopReason::TargetReached
        } else {
            StopReason::FrontierExhausted
        };

        let elapsed = ctx.started.elapsed();
        tracing::info!("Crawl stopped ({}) after {:?}", reason, elapsed);

        let export = export_index(
            Arc::clone(&ctx.index),
            self.index_path.clone(),
            self.config_hash.clone(),
        )
        .await?;
        tracing::info!(
            "Exported {} keywords ({} postings) to {}",
            export.keyword_count,
            export.posting_count,
            self.index_path.display()
        );

        Ok(CrawlReport {
            retrieved: ctx.visited.retrieved_urls(),
            counters: ctx.counters.snapshot(),
            elapsed,
            reason,
            frontier_remaining: ctx.frontier.len(),
            export,
        })
    }
}

async fn join_workers(workers: &mut JoinSet<()>) {
    while let Some(result) = workers.join_next().await {
        if let Err(e) = result {
            if e.is_panic() {
                tracing::error!("Crawl worker panicked: {}", e);
            }
        }
    }
}

async fn worker_loop(worker_id: usize, ctx: Arc<CrawlContext>) {
    let backoff = Duration::from_millis(ctx.config.crawler.idle_backoff_ms);

    loop {
        if ctx.target_reached() {
            tracing::debug!("Worker {} stopping: target reached", worker_id);
            break;
        }

        let Some(dispatch) = ctx.frontier.pop_wait(backoff).await else {
            if ctx.frontier.is_exhausted() {
                tracing::debug!("Worker {} stopping: frontier exhausted", worker_id);
                break;
            }
            continue;
        };

        let Some(slot) = ctx.reserve_slot() else {
            // every remaining retrieval is held by an in-flight page
            dispatch.requeue();
            tokio::time::sleep(backoff).await;
            continue;
        };

        let outcome = process_url(&ctx, dispatch.url(), slot).await;
        ctx.counters.record_outcome(outcome);
        // links were pushed before this drop, so exhaustion cannot be observed early
        drop(dispatch);
    }
}

/// Runs one dispatched URL through the crawl pipeline
///
/// `slot` is committed when the page is retrieved and released otherwise.
pub async fn process_url(ctx: &CrawlContext, url: &Url, slot: RetrievalSlot<'_>) -> PageOutcome {
    let dispatched = ctx.counters.record_dispatch();
    if dispatched % ctx.config.crawler.progress_interval.max(1) == 0 {
        ctx.log_progress();
    }

    if !ctx.visited.mark_if_new(url) {
        tracing::trace!("Skipping already visited {}", url);
        return PageOutcome::Duplicate;
    }

    let verdict = ctx.politeness.check(url).await;
    if let Some(e) = &verdict.error {
        tracing::warn!("{} (assuming allowed)", e);
    }
    if !verdict.allowed {
        tracing::debug!("URL {} disallowed by robots.txt", url);
        return PageOutcome::Disallowed;
    }

    let page = match fetch_page(&ctx.client, url).await {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!("Fetch failed: {}", e);
            return PageOutcome::FetchFailed;
        }
    };

    let parsed = parse_html(&page.body, &page.final_url);
    let links = match ctx.config.crawler.link_scope.as_deref() {
        Some(scope) => match extract_links_in_element(&page.body, &page.final_url, scope) {
            Ok(links) => links,
            Err(e) => {
                tracing::warn!("{}", e);
                Vec::new()
            }
        },
        None => parsed.links,
    };

    let mut queued = 0;
    for link in links {
        if !ctx.visited.is_visited(&link) {
            ctx.frontier.push(link);
            queued += 1;
        }
    }

    let indexed = ctx.topic.is_topical(&parsed.text);
    if indexed {
        let postings = ctx.index.index_page(url, &parsed.text);
        tracing::debug!("Indexed {} words from {}", postings, url);
    }

    let count = slot.commit(url.clone());
    tracing::info!(
        "[{}] Retrieved {} ({} links queued{})",
        count,
        url,
        queued,
        if indexed { ", indexed" } else { "" }
    );
    if let Some(title) = parsed.title {
        tracing::debug!("Title of {}: {}", url, title);
    }

    PageOutcome::Retrieved { indexed }
}

async fn export_index(
    index: Arc<InvertedIndex>,
    path: PathBuf,
    config_hash: Option<String>,
) -> Result<ExportRecord, SumiError> {
    let record = tokio::task::spawn_blocking(move || {
        index.export_with_hash(&path, config_hash.as_deref())
    })
    .await
    .map_err(|e| SumiError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))??;

    Ok(record)
}

async fn periodic_export(
    index: Arc<InvertedIndex>,
    path: PathBuf,
    config_hash: Option<String>,
    every: Duration,
) {
    let mut ticker = tokio::time::interval(every);
    // the first tick completes immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;
        match export_index(Arc::clone(&index), path.clone(), config_hash.clone()).await {
            Ok(record) => tracing::info!(
                "Periodic export: {} keywords, {} postings",
                record.keyword_count,
                record.posting_count
            ),
            Err(e) => tracing::warn!("Periodic export failed: {}", e),
        }
    }
}
