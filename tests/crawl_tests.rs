// tests/crawl_tests.rs
// End-to-end crawls against local fixtures and a wiremock server.

use image_spider::{run, CancelFlag, CrawlConfig, CrawlOptions, Location};
use std::collections::HashSet;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(seed: &str, dest: &Path, depth: Option<usize>, scoped: bool) -> CrawlConfig {
    CrawlConfig::new(CrawlOptions {
        recursive: depth.is_some(),
        max_depth: depth,
        scope_to_original_host: scoped,
        dest_dir: dest.to_path_buf(),
        ..CrawlOptions::new(seed)
    })
    .unwrap()
}

async fn page(server: &MockServer, at: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html.as_bytes().to_vec(), "text/html"))
        .mount(server)
        .await;
}

async fn never_requested(server: &MockServer, at: &str) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(server)
        .await;
}

fn names(locations: &[Location]) -> Vec<String> {
    locations.iter().filter_map(|l| l.basename()).collect()
}

#[tokio::test]
async fn test_local_seed_with_child_page() {
    let site = TempDir::new().unwrap();
    std::fs::write(
        site.path().join("seed.html"),
        r#"<a href="child.html">child</a><img src="cat.jpg">"#,
    )
    .unwrap();
    std::fs::write(site.path().join("child.html"), r#"<img src="dog.png">"#).unwrap();
    std::fs::write(site.path().join("cat.jpg"), b"cat bytes").unwrap();
    std::fs::write(site.path().join("dog.png"), b"dog bytes").unwrap();

    let dest = TempDir::new().unwrap();
    let seed = site.path().join("seed.html");
    let config = config(seed.to_str().unwrap(), dest.path(), Some(1), false);

    let report = run(&config, CancelFlag::new()).await.unwrap();

    assert_eq!(names(&report.visited), vec!["seed.html", "child.html"]);
    assert_eq!(names(&report.images), vec!["cat.jpg", "dog.png"]);
    assert_eq!(report.saved(), 2);
    assert!(report.error_entries().is_empty(), "{:?}", report.error_entries());
    assert_eq!(std::fs::read(dest.path().join("0-cat.jpg")).unwrap(), b"cat bytes");
    assert_eq!(std::fs::read(dest.path().join("1-dog.png")).unwrap(), b"dog bytes");
}

#[tokio::test]
async fn test_local_scope_stays_in_directory() {
    let site = TempDir::new().unwrap();
    std::fs::create_dir(site.path().join("nested")).unwrap();
    std::fs::write(
        site.path().join("seed.html"),
        r#"<a href="nested/other.html">x</a><a href="same.html">y</a>"#,
    )
    .unwrap();
    std::fs::write(site.path().join("same.html"), "").unwrap();
    std::fs::write(site.path().join("nested/other.html"), "").unwrap();

    let dest = TempDir::new().unwrap();
    let seed = site.path().join("seed.html");
    let config = config(seed.to_str().unwrap(), dest.path(), Some(2), true);

    let report = run(&config, CancelFlag::new()).await.unwrap();
    assert_eq!(names(&report.visited), vec!["seed.html", "same.html"]);
}

#[tokio::test]
async fn test_seed_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dest = TempDir::new().unwrap();
    let seed = format!("{}/page", server.uri());
    let report = run(&config(&seed, dest.path(), None, false), CancelFlag::new())
        .await
        .unwrap();

    assert_eq!(report.visited.len(), 1);
    assert_eq!(report.visited[0].to_string(), seed);
    assert!(report.images.is_empty());
    assert_eq!(report.error_entries().len(), 1);
    assert_eq!(report.error_entries()[0].cause, "HTTP 404");
}

#[tokio::test]
async fn test_depth_zero_scans_seed_only() {
    let server = MockServer::start().await;
    page(&server, "/", r#"<a href="/child">c</a><img src="/top.png">"#).await;
    never_requested(&server, "/child").await;

    let dest = TempDir::new().unwrap();
    let report = run(&config(&server.uri(), dest.path(), None, false), CancelFlag::new())
        .await
        .unwrap();

    assert_eq!(report.visited.len(), 1);
    assert_eq!(names(&report.images), vec!["top.png"]);
}

#[tokio::test]
async fn test_other_host_not_enqueued_when_scoped() {
    let server = MockServer::start().await;
    page(
        &server,
        "/page",
        r#"<a href="http://b.example/x">b</a><a href="/next">next</a>"#,
    )
    .await;
    page(&server, "/next", "").await;

    let dest = TempDir::new().unwrap();
    let seed = format!("{}/page", server.uri());
    let report = run(&config(&seed, dest.path(), Some(3), true), CancelFlag::new())
        .await
        .unwrap();

    let visited: Vec<String> = report.visited.iter().map(|l| l.to_string()).collect();
    assert_eq!(visited, vec![seed.clone(), format!("{}/next", server.uri())]);
    assert!(report.error_entries().is_empty());
}

#[tokio::test]
async fn test_unscoped_crawl_follows_other_hosts() {
    let server = MockServer::start().await;
    let port = server.address().port();
    page(
        &server,
        "/page",
        &format!(r#"<a href="http://localhost:{}/away">away</a>"#, port),
    )
    .await;
    page(&server, "/away", "").await;

    let dest = TempDir::new().unwrap();
    let seed = format!("http://127.0.0.1:{}/page", port);

    let scoped = run(&config(&seed, dest.path(), Some(1), true), CancelFlag::new())
        .await
        .unwrap();
    assert_eq!(scoped.visited.len(), 1);

    let open = run(&config(&seed, dest.path(), Some(1), false), CancelFlag::new())
        .await
        .unwrap();
    assert_eq!(open.visited.len(), 2);
    assert_eq!(open.visited[1].as_url().and_then(|u| u.host_str()), Some("localhost"));
}

#[tokio::test]
async fn test_seed_redirect_moves_scope() {
    let server = MockServer::start().await;
    let port = server.address().port();
    Mock::given(method("HEAD"))
        .and(path("/start"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", format!("http://localhost:{}/home", port).as_str()),
        )
        .mount(&server)
        .await;
    page(
        &server,
        "/home",
        &format!(
            r#"<a href="/inside">in</a><a href="http://127.0.0.1:{}/outside">out</a>"#,
            port
        ),
    )
    .await;
    page(&server, "/inside", "").await;
    never_requested(&server, "/outside").await;

    let dest = TempDir::new().unwrap();
    let seed = format!("http://127.0.0.1:{}/start", port);
    let report = run(&config(&seed, dest.path(), Some(2), true), CancelFlag::new())
        .await
        .unwrap();

    assert_eq!(report.seed.to_string(), format!("http://localhost:{}/home", port));
    assert_eq!(report.scope.as_deref(), Some("host localhost"));
    assert_eq!(names(&report.visited), vec!["home", "inside"]);
}

#[tokio::test]
async fn test_cycles_are_visited_once() {
    let server = MockServer::start().await;
    page(&server, "/a", r#"<a href="/b">b</a><a href="/a#self">a</a>"#).await;
    // Also answers /b?x=1: the path matcher ignores the query
    page(&server, "/b", r#"<a href="/a">a</a><a href="/b?x=1">b1</a>"#).await;

    let dest = TempDir::new().unwrap();
    let seed = format!("{}/a", server.uri());
    let report = run(&config(&seed, dest.path(), Some(5), true), CancelFlag::new())
        .await
        .unwrap();

    let unique: HashSet<&Location> = report.visited.iter().collect();
    assert_eq!(unique.len(), report.visited.len());
    // /a, /b and /b?x=1: the query string makes a distinct location
    assert_eq!(report.visited.len(), 3);
}

#[tokio::test]
async fn test_failing_page_does_not_stop_the_crawl() {
    let server = MockServer::start().await;
    page(&server, "/", r#"<a href="/broken">x</a><a href="/ok">y</a>"#).await;
    page(&server, "/ok", r#"<img src="/found.gif">"#).await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/found.gif"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"GIF89a".to_vec(), "image/gif"))
        .mount(&server)
        .await;

    let dest = TempDir::new().unwrap();
    let report = run(&config(&server.uri(), dest.path(), Some(1), true), CancelFlag::new())
        .await
        .unwrap();

    assert_eq!(report.visited.len(), 3);
    assert_eq!(report.error_entries().len(), 1);
    assert_eq!(report.error_entries()[0].cause, "HTTP 500");
    assert_eq!(report.saved(), 1);
    assert!(dest.path().join("0-found.gif").is_file());
}

#[tokio::test]
async fn test_linked_image_is_terminal() {
    let server = MockServer::start().await;
    page(&server, "/", r#"<a href="/photo">photo</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/photo"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"BM".to_vec(), "image/bmp"))
        .mount(&server)
        .await;

    let dest = TempDir::new().unwrap();
    let report = run(&config(&server.uri(), dest.path(), Some(1), false), CancelFlag::new())
        .await
        .unwrap();

    assert_eq!(names(&report.images), vec!["photo"]);
    assert_eq!(report.saved(), 1);
    assert!(dest.path().join("0-photo.bmp").is_file());
}

#[tokio::test]
async fn test_cancelled_crawl_reports_partial_state() {
    let server = MockServer::start().await;
    page(&server, "/", r#"<img src="/never.png">"#).await;

    let dest = TempDir::new().unwrap();
    let cancel = CancelFlag::new();
    cancel.cancel();

    let report = run(&config(&server.uri(), dest.path(), Some(2), false), cancel)
        .await
        .unwrap();

    assert!(report.cancelled);
    assert!(report.visited.is_empty());
    assert!(report.images.is_empty());
    assert!(!report.is_clean());
}

#[tokio::test]
async fn test_relative_references_resolve_against_redirect_target() {
    let server = MockServer::start().await;
    page(&server, "/", r#"<a href="/gallery">gallery</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/gallery"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/gallery/"))
        .mount(&server)
        .await;
    page(&server, "/gallery/", r#"<img src="cat.png">"#).await;

    let dest = TempDir::new().unwrap();
    let report = run(&config(&server.uri(), dest.path(), Some(1), false), CancelFlag::new())
        .await
        .unwrap();

    let images: Vec<String> = report.images.iter().map(|l| l.to_string()).collect();
    assert_eq!(images, vec![format!("{}/gallery/cat.png", server.uri())]);
}

#[tokio::test]
async fn test_page_redirected_off_host_is_not_scanned_when_scoped() {
    let server = MockServer::start().await;
    let port = server.address().port();
    page(&server, "/", r#"<a href="/jump">jump</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/jump"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", format!("http://localhost:{}/away", port).as_str()),
        )
        .mount(&server)
        .await;
    page(&server, "/away", r#"<a href="/deeper">d</a><img src="/far.png">"#).await;
    never_requested(&server, "/deeper").await;

    let dest = TempDir::new().unwrap();
    let seed = format!("http://127.0.0.1:{}/", port);
    let report = run(&config(&seed, dest.path(), Some(3), true), CancelFlag::new())
        .await
        .unwrap();

    assert_eq!(names(&report.visited), vec!["jump"]);
    assert!(report.images.is_empty());
    assert!(report.error_entries().is_empty());
}

#[tokio::test]
async fn test_seed_page_is_downloaded_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"<p>hi</p>".to_vec(), "text/html"))
        .expect(1)
        .mount(&server)
        .await;

    let dest = TempDir::new().unwrap();
    let report = run(&config(&server.uri(), dest.path(), None, false), CancelFlag::new())
        .await
        .unwrap();

    assert_eq!(report.visited.len(), 1);
    assert!(report.error_entries().is_empty());
}

#[tokio::test]
async fn test_unreachable_child_is_recorded() {
    // Bind then drop to get a loopback port nothing listens on
    let closed = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = closed.local_addr().unwrap().port();
    drop(closed);

    let server = MockServer::start().await;
    let dead = format!("http://127.0.0.1:{}/x", port);
    page(&server, "/", &format!(r#"<a href="{}">dead</a><a href="/ok">ok</a>"#, dead)).await;
    page(&server, "/ok", "").await;

    let dest = TempDir::new().unwrap();
    let report = run(&config(&server.uri(), dest.path(), Some(1), false), CancelFlag::new())
        .await
        .unwrap();

    assert_eq!(report.visited.len(), 3);
    assert_eq!(report.error_entries().len(), 1);
    let entry = &report.error_entries()[0];
    assert_eq!(entry.context, format!("Error on {}", dead));
    assert!(entry.cause.starts_with("connection failed"), "{}", entry.cause);
}

#[tokio::test]
async fn test_slow_page_times_out_and_crawl_completes() {
    let server = MockServer::start().await;
    page(&server, "/", r#"<a href="/slow">slow</a><img src="/fine.png">"#).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"<p>late</p>".to_vec(), "text/html")
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fine.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"\x89PNG".to_vec(), "image/png"))
        .mount(&server)
        .await;

    let dest = TempDir::new().unwrap();
    let config = CrawlConfig::new(CrawlOptions {
        recursive: true,
        max_depth: Some(1),
        dest_dir: dest.path().to_path_buf(),
        request_timeout: std::time::Duration::from_secs(1),
        ..CrawlOptions::new(server.uri())
    })
    .unwrap();

    let report = run(&config, CancelFlag::new()).await.unwrap();

    assert_eq!(report.visited.len(), 2);
    assert_eq!(report.error_entries().len(), 1);
    assert_eq!(report.error_entries()[0].cause, "request timed out");
    assert_eq!(report.saved(), 1);
}
