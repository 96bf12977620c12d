//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use std::path::Path;
use std::sync::Arc;
use sumi_index::config::{Config, CrawlerConfig, OutputConfig, TopicConfig, UserAgentConfig};
use sumi_index::crawler::{run_crawl, Coordinator, StopReason};
use sumi_index::{search, InvertedIndex, MatchMode};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling from `seed` into `index_path`
fn create_test_config(seed: &str, index_path: &Path) -> Config {
    Config {
        crawler: CrawlerConfig {
            seed: seed.to_string(),
            target_count: 50,
            workers: 4,
            time_limit_secs: 0,
            page_timeout_secs: 5,
            robots_timeout_secs: 2,
            idle_backoff_ms: 50,
            progress_interval: 100,
            link_scope: None,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            index_path: index_path.to_string_lossy().into_owned(),
            export_interval_secs: 0,
        },
        topic: TopicConfig::default(),
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(format!("<html><body>{}</body></html>", body), "text/html")
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

async fn mount_robots(server: &MockServer, rules: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(rules.to_string()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_single_page_target_populates_frontier() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;
    mount_page(
        &server,
        "/",
        r#"welcome <a href="/page1">one</a> <a href="/page2">two</a>"#,
    )
    .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&format!("{}/", server.uri()), &dir.path().join("index.db"));
    config.crawler.target_count = 1;
    config.crawler.workers = 1;

    let index = Arc::new(InvertedIndex::new());
    let report = Coordinator::new(config, Arc::clone(&index))
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.reason, StopReason::TargetReached);
    assert_eq!(report.retrieved.len(), 1);
    assert_eq!(report.retrieved[0].as_str(), format!("{}/", server.uri()));
    assert_eq!(report.frontier_remaining, 2);
    assert_eq!(index.get_items("welcome").len(), 1);
}

/// Mounts a seed page linking to `/item-0` .. `/item-{n-1}`, each a leaf page
async fn mount_wide_site(server: &MockServer, n: usize) {
    let links: String = (0..n)
        .map(|i| format!(r#"<a href="/item-{}">item {}</a> "#, i, i))
        .collect();
    mount_page(server, "/", &format!("index {}", links)).await;

    for i in 0..n {
        mount_page(server, &format!("/item-{}", i), "leaf page").await;
    }
}

#[tokio::test]
async fn test_single_page_target_with_default_pool() {
    let server = MockServer::start().await;
    mount_wide_site(&server, 20).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server.uri(), &dir.path().join("index.db"));
    config.crawler.target_count = 1;
    config.crawler.workers = 40;

    let report = Coordinator::new(config, Arc::new(InvertedIndex::new()))
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.reason, StopReason::TargetReached);
    assert_eq!(report.retrieved.len(), 1);
    assert_eq!(report.counters.retrieved, 1);
    assert_eq!(report.counters.dispatched, 1);
    assert_eq!(report.frontier_remaining, 20);
}

#[tokio::test]
async fn test_target_count_is_exact_with_many_workers() {
    let server = MockServer::start().await;
    mount_wide_site(&server, 20).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server.uri(), &dir.path().join("index.db"));
    config.crawler.target_count = 3;
    config.crawler.workers = 40;

    let index = Arc::new(InvertedIndex::new());
    let report = Coordinator::new(config, Arc::clone(&index))
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.reason, StopReason::TargetReached);
    assert_eq!(report.retrieved.len(), 3);
    assert_eq!(report.counters.retrieved, 3);
    assert_eq!(index.get_items("leaf").len(), 2);
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;
    mount_page(
        &server,
        "/",
        r#"home <a href="/page1">one</a> <a href="/page2">two</a>"#,
    )
    .await;
    mount_page(&server, "/page1", r#"first page <a href="/page3">three</a>"#).await;
    mount_page(&server, "/page2", r#"second page <a href="/">home</a>"#).await;
    mount_page(&server, "/page3", "third page").await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), &dir.path().join("index.db"));

    let index = Arc::new(InvertedIndex::new());
    let report = Coordinator::new(config, Arc::clone(&index))
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.reason, StopReason::FrontierExhausted);
    assert_eq!(report.retrieved.len(), 4);
    assert_eq!(report.counters.retrieved, 4);
    assert_eq!(report.counters.failed, 0);
    assert_eq!(index.get_items("page").len(), 3);

    let mut paths: Vec<String> = report.retrieved.iter().map(|u| u.path().to_string()).collect();
    paths.sort();
    assert_eq!(paths, vec!["/", "/page1", "/page2", "/page3"]);
}

#[tokio::test]
async fn test_robots_disallow_is_respected() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nDisallow: /private/").await;
    mount_page(
        &server,
        "/",
        r#"<a href="/private/secret">secret</a> <a href="/public">public</a>"#,
    )
    .await;
    mount_page(&server, "/public", "public page").await;
    Mock::given(method("GET"))
        .and(path("/private/secret"))
        .respond_with(html("secret page"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), &dir.path().join("index.db"));

    let report = Coordinator::new(config, Arc::new(InvertedIndex::new()))
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.counters.ignored, 1);
    assert_eq!(report.retrieved.len(), 2);
    assert!(report
        .retrieved
        .iter()
        .all(|u| !u.path().starts_with("/private/")));
}

#[tokio::test]
async fn test_unreachable_seed_fails_open_and_finishes() {
    let dir = TempDir::new().unwrap();
    let mut config = create_test_config("http://127.0.0.1:1/", &dir.path().join("index.db"));
    config.crawler.workers = 2;

    let report = Coordinator::new(config, Arc::new(InvertedIndex::new()))
        .unwrap()
        .run()
        .await
        .unwrap();

    // robots.txt failure is not a disallow; the page fetch itself fails
    assert_eq!(report.counters.ignored, 0);
    assert_eq!(report.counters.failed, 1);
    assert!(report.retrieved.is_empty());
    assert_eq!(report.reason, StopReason::FrontierExhausted);
}

#[tokio::test]
async fn test_topic_filter_limits_indexing() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"all about rust <a href="/garden">garden</a> <a href="/tokio">tokio</a>"#,
    )
    .await;
    mount_page(&server, "/garden", "tomatoes and basil").await;
    mount_page(&server, "/tokio", "rust async runtime").await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server.uri(), &dir.path().join("index.db"));
    config.topic = TopicConfig {
        keywords: vec!["Rust".to_string()],
        mode: MatchMode::Any,
    };

    let index = Arc::new(InvertedIndex::new());
    let report = Coordinator::new(config, Arc::clone(&index))
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.counters.retrieved, 3);
    assert_eq!(report.counters.indexed, 2);
    assert!(index.get_items("tomatoes").is_empty());
    assert_eq!(index.get_items("rust").len(), 2);
}

#[tokio::test]
async fn test_crawl_persists_and_reloads_index() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "cat cat dog").await;

    let dir = TempDir::new().unwrap();
    let index_path = dir.path().join("index.db");
    let config = create_test_config(&server.uri(), &index_path);

    let first = run_crawl(config.clone(), Some("hash-1".to_string()), false)
        .await
        .unwrap();
    assert_eq!(first.export.posting_count, 3);
    assert_eq!(first.export.config_hash.as_deref(), Some("hash-1"));

    // a second crawl starts from the saved index and adds to it
    let second = run_crawl(config.clone(), None, false).await.unwrap();
    assert_eq!(second.export.posting_count, 6);

    // --fresh discards it
    let fresh = run_crawl(config, None, true).await.unwrap();
    assert_eq!(fresh.export.posting_count, 3);

    let saved = InvertedIndex::import(&index_path).unwrap();
    let hits = search(&saved, &["cat", "dog"]);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].hits, 3);
}
