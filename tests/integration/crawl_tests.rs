//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end through the real HTTP fetcher.

use site_audit::config::Config;
use site_audit::crawler::{crawl, Coordinator, HttpFetcher};
use site_audit::model::{CrawlReport, Grade, Issue, PageResult};
use site_audit::output::{publish_report, snapshot_dir};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FILLER: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod \
    tempor incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam, quis nostrud \
    exercitation ullamco laboris nisi ut aliquip ex ea commodo consequat.";

/// Creates a test configuration for the mock server with no delay and no artifacts
fn create_test_config(seed_url: &str) -> Config {
    let mut config = Config::for_seed(seed_url);
    config.crawler.delay_ms = 0;
    config.crawler.timeout_secs = 5;
    config.output.save_html = false;
    config.output.render_pdf = false;
    config
}

/// A complete, issue-free page linking to `links`
fn good_page(base_url: &str, page_path: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|l| format!("<a href=\"{}\">link</a>\n", l))
        .collect();
    format!(
        r#"<html><head>
        <title>A well sized page title</title>
        <meta name="description" content="A meta description that is comfortably longer than fifty characters.">
        <link rel="canonical" href="{}{}">
        </head><body>
        <h1>Heading</h1>
        <p>{}</p>
        {}
        </body></html>"#,
        base_url, page_path, FILLER, anchors
    )
}

async fn mount_html(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8"))
        .mount(server)
        .await;
}

async fn run(config: Config) -> CrawlReport {
    let fetcher = HttpFetcher::new(&config).expect("Failed to build HTTP client");
    Coordinator::new(config, fetcher)
        .run()
        .await
        .expect("Crawl failed")
}

fn find<'a>(report: &'a CrawlReport, page_path: &str) -> &'a PageResult {
    report
        .pages
        .iter()
        .find(|p| url::Url::parse(&p.url).map(|u| u.path() == page_path).unwrap_or(false))
        .unwrap_or_else(|| panic!("{} was not crawled", page_path))
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(
        &mock_server,
        "/",
        good_page(
            &base_url,
            "/",
            &[
                "/page1",
                "/page2/",
                "/style.css",
                "https://other.example/",
                "mailto:info@example.com",
                "#top",
            ],
        ),
    )
    .await;
    mount_html(&mock_server, "/page1", good_page(&base_url, "/page1", &["/page2", "/page3"])).await;
    mount_html(&mock_server, "/page2", good_page(&base_url, "/page2", &["/"])).await;
    mount_html(&mock_server, "/page3", good_page(&base_url, "/page3", &[])).await;

    let mut config = create_test_config(&base_url);
    config.crawler.max_depth = 1;
    let report = run(config).await;

    let paths: Vec<String> = report
        .pages
        .iter()
        .map(|p| url::Url::parse(&p.url).unwrap().path().to_string())
        .collect();
    assert_eq!(paths, vec!["/", "/page1", "/page2"]);

    let home = find(&report, "/");
    assert_eq!(home.status_code, Some(200));
    assert_eq!(home.depth, 0);
    assert!(home.indexable);
    assert!(home.issues.is_empty(), "unexpected issues: {:?}", home.issues);
    assert_eq!(home.h1_tags, vec!["Heading"]);
    // off-site links count, assets and non-navigable hrefs do not
    assert_eq!(home.link_count, 3);
    assert_eq!(home.inbound_link_count, 1);

    let page2 = find(&report, "/page2");
    assert_eq!(page2.depth, 1);
    assert_eq!(page2.inbound_link_count, 2);

    // page3 is discovered at depth 2 and never fetched
    assert!(!report.pages.iter().any(|p| p.url.ends_with("/page3")));
    assert_eq!(report.summary.pages_crawled, 3);
    assert!(report.summary.issue_counts.is_empty());
}

#[tokio::test]
async fn test_max_pages_limit() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let links: Vec<String> = (0..10).map(|i| format!("/p{}", i)).collect();
    let links: Vec<&str> = links.iter().map(String::as_str).collect();
    mount_html(&mock_server, "/", good_page(&base_url, "/", &links)).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html><body>x</body></html>", "text/html"))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&base_url);
    config.crawler.max_pages = 4;
    let report = run(config).await;

    assert_eq!(report.pages.len(), 4);
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 4);
}

#[tokio::test]
async fn test_not_found_is_analyzed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(&mock_server, "/", good_page(&base_url, "/", &["/missing"])).await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_raw("<html><body>Not here</body></html>", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let report = run(create_test_config(&base_url)).await;

    let missing = find(&report, "/missing");
    assert_eq!(missing.status_code, Some(404));
    assert_eq!(missing.error, None);
    assert!(!missing.indexable);
    assert_eq!(missing.issues[0], Issue::HttpStatus(404));
    assert!(missing.issues.contains(&Issue::MissingTitle));
    assert!(missing.security.is_some());
    assert_eq!(report.summary.non_200, 1);
    assert_eq!(report.summary.issue_counts["http_status_404"], 1);
}

#[tokio::test]
async fn test_unsupported_encoding_is_request_failure() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(&mock_server, "/", good_page(&base_url, "/", &["/packed"])).await;
    Mock::given(method("GET"))
        .and(path("/packed"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(vec![0x28, 0xb5, 0x2f, 0xfd, 0x00], "text/html")
                .insert_header("content-encoding", "zstd"),
        )
        .mount(&mock_server)
        .await;

    let report = run(create_test_config(&base_url)).await;

    let packed = find(&report, "/packed");
    assert_eq!(packed.status_code, None);
    assert_eq!(packed.issues, vec![Issue::RequestFailed]);
    assert!(packed
        .error
        .as_deref()
        .unwrap_or_default()
        .contains("Unsupported content encoding"));
    assert!(packed.security.is_none());
    assert_eq!(report.security.avg_score, Some(54));
}

#[tokio::test]
async fn test_redirect_reports_final_url() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(&mock_server, "/", good_page(&base_url, "/", &["/old"])).await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/docs/new"))
        .mount(&mock_server)
        .await;
    mount_html(&mock_server, "/docs/new", good_page(&base_url, "/docs/new", &["sub"])).await;
    mount_html(&mock_server, "/sub", good_page(&base_url, "/sub", &[])).await;

    let report = run(create_test_config(&base_url)).await;

    let old = find(&report, "/old");
    assert_eq!(old.status_code, Some(200));
    assert_eq!(old.final_url, format!("{}/docs/new", base_url));
    assert!(old.issues.is_empty(), "unexpected issues: {:?}", old.issues);

    // relative links resolve against the requested URL, not the redirect target
    assert!(report.pages.iter().any(|p| p.url == format!("{}/sub", base_url)));
    assert!(!report.pages.iter().any(|p| p.url.ends_with("/docs/sub")));
}

#[tokio::test]
async fn test_plain_http_security_score() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(&mock_server, "/", good_page(&base_url, "/", &[])).await;

    let report = run(create_test_config(&base_url)).await;

    let security = report.pages[0].security.as_ref().expect("page was analyzed");
    assert_eq!(security.score, 54);
    assert_eq!(security.grade, Grade::F);
    assert!(security.has_finding("non_https"));
    assert!(!security.has_finding("missing_hsts"));
    assert_eq!(report.security.avg_score, Some(54));
    assert_eq!(report.security.min_score, Some(54));
}

#[tokio::test]
async fn test_security_headers_and_cookies() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(
                    format!(
                        r#"<html><body>
                        <form method="post" action="http://login.example/submit">
                          <input type="password" name="pw">
                        </form>
                        <script src="https://cdn.example/lib.js"></script>
                        <p>{}</p></body></html>"#,
                        FILLER
                    ),
                    "text/html",
                )
                .insert_header("content-security-policy", "default-src 'self'; frame-ancestors 'none'")
                .insert_header("x-content-type-options", "nosniff")
                .insert_header("referrer-policy", "no-referrer")
                .insert_header("permissions-policy", "camera=()")
                .insert_header("access-control-allow-origin", "*")
                .insert_header("x-powered-by", "PHP/8.2")
                .insert_header(
                    "set-cookie",
                    "session=abc; Path=/; Expires=Wed, 21 Oct 2026 07:28:00 GMT, \
                     theme=dark; Secure; HttpOnly; SameSite=Lax",
                ),
        )
        .mount(&mock_server)
        .await;

    let report = run(create_test_config(&base_url)).await;
    let security = report.pages[0].security.as_ref().expect("page was analyzed");

    let codes: Vec<String> = security.findings.iter().map(ToString::to_string).collect();
    assert_eq!(
        codes,
        vec![
            "non_https",
            "cors_wildcard",
            "x_powered_by_present",
            "insecure_cookies:1",
            "insecure_password_form_action:1",
            "external_script_missing_sri:1",
        ]
    );
    // 100 - 20 - 5 - 2 - 5 - 10 - 3
    assert_eq!(security.score, 55);
}

#[tokio::test]
async fn test_crawl_saves_snapshots_and_publishes() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let temp = TempDir::new().expect("Failed to create temp dir");

    mount_html(&mock_server, "/", good_page(&base_url, "/", &["/a", "/b"])).await;
    mount_html(&mock_server, "/a", good_page(&base_url, "/a", &[])).await;
    mount_html(&mock_server, "/b", good_page(&base_url, "/b", &[])).await;

    let mut config = create_test_config(&base_url);
    config.output.output_dir = temp.path().to_string_lossy().into_owned();
    config.output.save_html = true;
    config.output.save_html_limit = 2;
    let output = config.output.clone();

    let report = crawl(config).await.expect("Crawl failed");
    assert_eq!(report.pages.len(), 3);

    let snapshots = snapshot_dir(temp.path(), &report.timestamp_id);
    let saved: Vec<_> = std::fs::read_dir(&snapshots)
        .expect("snapshot directory exists")
        .filter_map(Result::ok)
        .collect();
    assert_eq!(saved.len(), 2);
    assert!(saved.iter().all(|e| e.file_name().to_string_lossy().ends_with(".html")));

    let artifacts = publish_report(&report, &output).await;
    let json_path = artifacts.json.expect("JSON report written");
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(json_path).unwrap()).unwrap();
    assert_eq!(json["summary"]["pages_crawled"], 3);
    assert_eq!(json["pages"][0]["security"]["grade"], "F");
    assert!(artifacts.html.is_some());
    assert_eq!(artifacts.pdf, None);
}
