//! Section loading against a live content server

use docshow::loader::{resolve_content, ContentLoader, HttpContentSource};
use docshow::markdown::render_markdown;
use docshow::page::ContentOrigin;
use docshow::store::ContentStore;
use docshow::{Presenter, PresenterConfig, SectionSource};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tiny_http::{Response, Server};

const SHELL: &str = r##"<html><head><title>Loading</title></head><body>
<section id="live"><div class="card"><h2 class="card-title">Live</h2>
  <div id="live-content"><div class="placeholder-text">Loading...</div></div></div></section>
<section id="broken"><div class="card"><h2 class="card-title">Broken</h2>
  <div id="broken-content"><div class="placeholder-text">Loading...</div></div></div></section>
<section id="gone"><div class="card"><h2 class="card-title">Gone</h2>
  <div id="gone-content"><div class="placeholder-text">Loading...</div></div></div></section>
</body></html>"##;

const LIVE_TEXT: &str = "# Live document\n\nServed over HTTP.";
const STORED_TEXT: &str = "# Stored copy\n\nFrom the bundle.";
const SLOW_TEXT: &str = "# Slow document";

const SLOW_DELAY: Duration = Duration::from_millis(1500);

/// Serve `/docs/live.md` at once and `/docs/slow.md` after [`SLOW_DELAY`];
/// everything else fails (`broken.md` with a 500). Each request gets its
/// own thread.
fn start_content_server() -> String {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr();
    std::thread::spawn(move || {
        for request in server.incoming_requests() {
            std::thread::spawn(move || {
                let markdown = "Content-Type: text/markdown; charset=utf-8"
                    .parse::<tiny_http::Header>()
                    .unwrap();
                let response = match request.url() {
                    "/docs/live.md" => Response::from_string(LIVE_TEXT).with_header(markdown),
                    "/docs/slow.md" => {
                        std::thread::sleep(SLOW_DELAY);
                        Response::from_string(SLOW_TEXT).with_header(markdown)
                    }
                    "/docs/broken.md" => Response::from_string("boom").with_status_code(500),
                    _ => Response::from_string("Not Found").with_status_code(404),
                };
                let _ = request.respond(response);
            });
        }
    });
    format!("http://{}/docs/", addr)
}

fn config(base_url: String) -> PresenterConfig {
    PresenterConfig {
        base_url: Some(base_url),
        timeout_ms: 5000,
        sources: vec![
            SectionSource::new("live-content", "live.md"),
            SectionSource::new("broken-content", "broken.md"),
            SectionSource::new("gone-content", "gone.md"),
        ],
        ..Default::default()
    }
}

fn store() -> ContentStore {
    [("live-content", "# Never used"), ("broken-content", STORED_TEXT)]
        .into_iter()
        .collect()
}

#[test]
fn each_section_resolves_independently() {
    let base = start_content_server();
    let presenter = Presenter::new(config(base), SHELL, store()).expect("presenter");
    let reports = presenter.start();
    assert_eq!(reports.len(), 3);

    let page = presenter.page();
    let page = page.lock().unwrap();

    let live = page.area("live-content").unwrap();
    assert_eq!(live.origin, ContentOrigin::Live);
    assert_eq!(live.inner_html, render_markdown(LIVE_TEXT));
    assert_eq!(live.full_content.as_deref(), Some(LIVE_TEXT));

    let broken = page.area("broken-content").unwrap();
    assert_eq!(broken.origin, ContentOrigin::Fallback);
    assert_eq!(broken.inner_html, render_markdown(STORED_TEXT));
    assert!(!broken.has_placeholder());

    let gone = page.area("gone-content").unwrap();
    assert_eq!(gone.origin, ContentOrigin::Unavailable);
    assert!(gone.inner_html.contains("gone.md"));
    assert!(gone.full_content.is_none());
    assert_ne!(gone.inner_html, broken.inner_html);
}

#[test]
fn resolve_reports_http_status_as_fallback() {
    let base = start_content_server();
    let source = HttpContentSource::new(&config(base)).unwrap();
    let r = resolve_content("broken-content", "broken.md", &source, &store()).unwrap();
    assert_eq!(r.origin, ContentOrigin::Fallback);
    assert_eq!(r.text, STORED_TEXT);
}

#[test]
fn reload_overwrites_previous_result() {
    let base = start_content_server();
    let cfg = config(base);
    let loader = ContentLoader::new(Box::new(HttpContentSource::new(&cfg).unwrap()), store());
    let notifier = Arc::new(docshow::launch::LogNotifier);
    let presenter = Presenter::with_loader(cfg, SHELL, loader, notifier).unwrap();

    let first = presenter.load("live-content", "gone.md").unwrap();
    assert_eq!(first.origin, ContentOrigin::Fallback);
    let second = presenter.load("live-content", "live.md").unwrap();
    assert_eq!(second.origin, ContentOrigin::Live);

    assert!(presenter.load("no-such-area", "live.md").is_none());
}

#[test]
fn unreachable_server_uses_store() {
    // Bind and drop to get a port nobody listens on
    let port = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
    let cfg = config(format!("http://127.0.0.1:{}/", port));
    let presenter = Presenter::new(cfg, SHELL, store()).unwrap();
    let origins: Vec<_> = presenter.start().into_iter().map(|r| r.origin).collect();
    assert_eq!(
        origins,
        vec![ContentOrigin::Fallback, ContentOrigin::Fallback, ContentOrigin::Unavailable]
    );
}

#[test]
fn slow_section_does_not_delay_the_others() {
    let base = start_content_server();
    let cfg = PresenterConfig {
        sources: vec![
            SectionSource::new("gone-content", "slow.md"),
            SectionSource::new("live-content", "live.md"),
        ],
        ..config(base)
    };
    let presenter = Presenter::new(cfg, SHELL, store()).unwrap();
    let live = ("live-content".to_string(), ContentOrigin::Live);

    let started = Instant::now();
    let (live_after, reports) = std::thread::scope(|scope| {
        let loading = scope.spawn(|| presenter.start());
        let mut live_after = None;
        while live_after.is_none() && started.elapsed() < SLOW_DELAY * 2 {
            // snapshot() needs the page lock, so this also checks that
            // loading does not hold it across fetches
            if presenter.snapshot().sections.contains(&live) {
                live_after = Some(started.elapsed());
            } else {
                std::thread::sleep(Duration::from_millis(10));
            }
        }
        (live_after, loading.join().unwrap())
    });

    let live_after = live_after.expect("live section never shown");
    assert!(live_after < SLOW_DELAY, "live section shown after {:?}", live_after);
    assert!(started.elapsed() >= SLOW_DELAY);

    let origins: Vec<_> = reports.into_iter().map(|r| r.origin).collect();
    assert_eq!(origins, vec![ContentOrigin::Live, ContentOrigin::Live]);
    let page = presenter.page();
    let page = page.lock().unwrap();
    assert_eq!(page.area("gone-content").unwrap().full_content.as_deref(), Some(SLOW_TEXT));
}
