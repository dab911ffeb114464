//! Navigation tests
//!
//! Drives the navigator against an in-memory document and a scripted
//! fragment source.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use url::Url;

use pageshell::document::{ContainerStyle, Document, MemoryDocument};
use pageshell::fetch::{FetchError, Fetcher, HttpFetcher};
use pageshell::handlers::PageHandlers;
use pageshell::navigator::{Action, Command, LoadOptions, Navigation, Navigator};
use pageshell::transition::TransitionConfig;

/// Serves fixed pages, optionally after a delay. Unknown pages fail.
#[derive(Default)]
struct ScriptedFetcher {
    pages: HashMap<String, (String, Duration)>,
}

impl ScriptedFetcher {
    fn page(mut self, path: &str, html: &str) -> Self {
        self.pages
            .insert(path.to_string(), (html.to_string(), Duration::ZERO));
        self
    }

    fn slow_page(mut self, path: &str, html: &str, delay: Duration) -> Self {
        self.pages.insert(path.to_string(), (html.to_string(), delay));
        self
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch_text(&self, page: &str) -> Result<String, FetchError> {
        match self.pages.get(page) {
            Some((html, delay)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(*delay).await;
                }
                Ok(html.clone())
            }
            None => Err(FetchError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                page.to_string(),
            ))),
        }
    }
}

fn site_fetcher() -> ScriptedFetcher {
    ScriptedFetcher::default()
        .page("pages/about.html", "<h1>About</h1>")
        .page("pages/code.html", "<h1>Code</h1>")
        .page("pages/sport.html", "<h1>Sport</h1><div id=\"records\"></div>")
        .page("pages/books.html", "<h1>Books</h1>")
}

fn composing(fetcher: ScriptedFetcher) -> Navigator<MemoryDocument> {
    Navigator::new(MemoryDocument::composing("/index.html"), Box::new(fetcher))
        .with_transition(TransitionConfig::instant())
}

#[tokio::test]
async fn test_no_container_redirects_immediately() {
    let mut nav = Navigator::new(
        MemoryDocument::standalone("/pages/code-notes.html"),
        Box::new(site_fetcher()),
    );

    let outcome = nav.load_page("pages/about.html", LoadOptions::default()).await;

    assert_eq!(outcome, Navigation::Redirected("pages/about.html".to_string()));
    assert_eq!(nav.document().redirects(), ["pages/about.html"]);
    assert!(nav.history().is_empty());
    assert!(nav.document().styles().is_empty());
}

#[tokio::test]
async fn test_load_swaps_container() {
    let mut nav = composing(site_fetcher());

    let outcome = nav.load_page("pages/code.html", LoadOptions::default()).await;

    assert_eq!(outcome, Navigation::Swapped("pages/code.html".to_string()));
    assert_eq!(nav.document().container_html(), Some("<h1>Code</h1>"));
    assert!(nav.document().redirects().is_empty());
    assert_eq!(nav.history().len(), 1);
}

#[tokio::test]
async fn test_fetch_failure_redirects_to_target() {
    let mut nav = composing(site_fetcher());
    nav.load_page("pages/code.html", LoadOptions::default()).await;

    let outcome = nav.load_page("pages/missing.html", LoadOptions::default()).await;

    assert_eq!(outcome, Navigation::Redirected("pages/missing.html".to_string()));
    assert_eq!(nav.document().last_redirect(), Some("pages/missing.html"));
    assert_eq!(nav.document().container_html(), None);
    assert!(nav.history().is_empty());
}

#[tokio::test]
async fn test_back_after_failed_load_does_not_swap_old_page() {
    let mut nav = composing(site_fetcher());
    nav.load_page("pages/code.html", LoadOptions::default()).await;
    nav.load_page("pages/missing.html", LoadOptions::default()).await;

    assert_eq!(nav.go_back().await, Navigation::BrowserBack);
    assert_eq!(nav.document().location_path(), "/index.html");
    // Back on a freshly loaded composing page.
    assert_eq!(nav.document().container_html(), Some(""));
    assert!(nav.history().is_empty());
}

/// Answer one HTTP request with `response`, returning the server's base URL.
async fn serve_once(response: &'static str) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 2048];
        let _ = socket.read(&mut request).await;
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    });
    Url::parse(&format!("http://{}/", addr)).unwrap()
}

#[tokio::test]
async fn test_http_error_status_redirects() {
    let base = serve_once("HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n").await;
    let fetcher = HttpFetcher::new(base, Duration::from_secs(5)).unwrap();
    let mut nav = Navigator::new(MemoryDocument::composing("/index.html"), Box::new(fetcher))
        .with_transition(TransitionConfig::instant());

    assert_eq!(
        nav.load_page("pages/code.html", LoadOptions::default()).await,
        Navigation::Redirected("pages/code.html".to_string())
    );
    assert_eq!(nav.document().last_redirect(), Some("pages/code.html"));
}

#[tokio::test]
async fn test_back_walks_history_then_falls_back_to_landing() {
    let mut nav = composing(site_fetcher());
    let pages = [
        "pages/about.html",
        "pages/code.html",
        "pages/sport.html",
        "pages/books.html",
    ];
    for page in pages {
        nav.load_page(page, LoadOptions::default()).await;
    }

    for expected in pages.iter().rev().skip(1) {
        assert_eq!(nav.go_back().await, Navigation::Swapped(expected.to_string()));
    }
    assert_eq!(nav.document().container_html(), Some("<h1>About</h1>"));
    assert_eq!(nav.history().len(), 1);

    assert_eq!(
        nav.go_back().await,
        Navigation::Redirected("index.html".to_string())
    );
    assert_eq!(nav.document().last_redirect(), Some("index.html"));
}

#[tokio::test]
async fn test_back_replays_load_options() {
    let loads = Rc::new(Cell::new(0));
    let mut handlers = PageHandlers::new();
    {
        let loads = loads.clone();
        handlers.hook("count", move |_| loads.set(loads.get() + 1));
    }
    let mut nav = composing(site_fetcher()).with_handlers(handlers);

    nav.load_page("pages/code.html", LoadOptions::on_load("count"))
        .await;
    nav.load_page("pages/about.html", LoadOptions::default()).await;
    nav.go_back().await;

    assert_eq!(loads.get(), 2);
    assert_eq!(
        nav.history().current().map(|e| e.options.clone()),
        Some(LoadOptions::on_load("count"))
    );
}

#[tokio::test]
async fn test_back_on_standalone_uses_browser_history() {
    let document = MemoryDocument::standalone("/pages/sport-run.html")
        .with_prior_history(["/pages/sport.html"]);
    let mut nav = Navigator::new(document, Box::new(site_fetcher()));

    assert_eq!(nav.go_back().await, Navigation::BrowserBack);
    assert_eq!(nav.document().location_path(), "/pages/sport.html");
}

#[tokio::test]
async fn test_back_on_standalone_without_history_uses_section_fallback() {
    let cases = [
        ("/site/pages/sport-run-0412.html", "sport.html"),
        ("/site/pages/book-dune.html", "books.html"),
        ("/site/pages/misc.html", "../index.html"),
        ("/site/about.html", "index.html"),
    ];
    for (location, expected) in cases {
        let mut nav = Navigator::new(MemoryDocument::standalone(location), Box::new(site_fetcher()));
        assert_eq!(
            nav.go_back().await,
            Navigation::Redirected(expected.to_string()),
            "back from {}",
            location
        );
    }
}

#[tokio::test]
async fn test_scripts_never_reach_container_and_handlers_run() {
    let fetcher = ScriptedFetcher::default().page(
        "pages/sport.html",
        "<div id=\"records\"></div><script>renderRecords()</script>",
    );
    let mut handlers = PageHandlers::new();
    handlers.on_page("pages/sport.html", |ctx| {
        let html = ctx
            .fragment
            .markup()
            .replace("<div id=\"records\"></div>", "<div id=\"records\"><p>3 runs</p></div>");
        ctx.document.set_container_html(&html);
    });
    let mut nav = composing(fetcher).with_handlers(handlers);

    nav.load_page("pages/sport.html", LoadOptions::default()).await;

    assert_eq!(
        nav.document().container_html(),
        Some("<div id=\"records\"><p>3 runs</p></div>")
    );
}

#[tokio::test]
async fn test_nav_click_and_back_button() {
    let mut nav = composing(site_fetcher());

    assert_eq!(
        nav.click(&Action::Element("nav-code".into())).await,
        Navigation::Swapped("pages/code.html".to_string())
    );
    assert_eq!(
        nav.click(&Action::Element("site-title".into())).await,
        Navigation::Swapped("pages/about.html".to_string())
    );
    assert_eq!(
        nav.click(&Action::Element("footer".into())).await,
        Navigation::Ignored
    );
    assert_eq!(
        nav.click(&Action::Back).await,
        Navigation::Swapped("pages/code.html".to_string())
    );
}

#[tokio::test]
async fn test_transition_wraps_swap() {
    let mut nav = composing(site_fetcher());
    nav.load_page("pages/code.html", LoadOptions::default()).await;

    let steps: Vec<(f32, f32)> = nav
        .document()
        .styles()
        .iter()
        .map(|s| (s.opacity, s.scale))
        .collect();
    assert_eq!(steps, [(1.0, 1.0), (0.0, 0.98), (0.0, 1.02), (1.0, 1.0)]);
}

#[tokio::test(start_paused = true)]
async fn test_newer_navigation_cancels_in_flight_load() {
    let slow_swaps = Rc::new(Cell::new(0));
    let mut handlers = PageHandlers::new();
    {
        let slow_swaps = slow_swaps.clone();
        handlers.on_page("pages/slow.html", move |_| slow_swaps.set(slow_swaps.get() + 1));
    }
    let fetcher = site_fetcher().slow_page("pages/slow.html", "<h1>Slow</h1>", Duration::from_secs(5));
    let mut nav = composing(fetcher).with_handlers(handlers);

    let (tx, rx) = mpsc::channel(8);
    let (reply_tx, reply_rx) = oneshot::channel();
    tx.send(Command::navigate("pages/slow.html")).await.unwrap();
    tx.send(Command::navigate("pages/code.html")).await.unwrap();
    tx.send(Command::Show(reply_tx)).await.unwrap();
    tx.send(Command::Quit).await.unwrap();

    nav.run(rx).await;

    let snapshot = reply_rx.await.unwrap();
    assert_eq!(snapshot.container.as_deref(), Some("<h1>Code</h1>"));
    assert_eq!(slow_swaps.get(), 0);
    assert_eq!(nav.document().container_html(), Some("<h1>Code</h1>"));
}

#[tokio::test(start_paused = true)]
async fn test_unbound_click_does_not_cancel_in_flight_load() {
    let fetcher = site_fetcher().slow_page("pages/slow.html", "<h1>Slow</h1>", Duration::from_secs(5));
    let mut nav = composing(fetcher);

    let (tx, rx) = mpsc::channel(8);
    let (reply_tx, reply_rx) = oneshot::channel();
    tx.send(Command::navigate("pages/slow.html")).await.unwrap();
    tx.send(Command::Click(Action::Element("footer".into())))
        .await
        .unwrap();
    tx.send(Command::Show(reply_tx)).await.unwrap();
    tx.send(Command::Quit).await.unwrap();

    nav.run(rx).await;

    let snapshot = reply_rx.await.unwrap();
    assert_eq!(snapshot.container.as_deref(), Some("<h1>Slow</h1>"));
    assert_eq!(snapshot.pages, ["pages/slow.html"]);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_load_restores_container_style() {
    let fetcher = site_fetcher().slow_page("pages/slow.html", "<h1>Slow</h1>", Duration::from_secs(5));
    let mut nav = composing(fetcher);

    let (tx, rx) = mpsc::channel(8);
    tx.send(Command::navigate("pages/slow.html")).await.unwrap();
    let sender = tokio::spawn(async move {
        // Lands while the slow page is still being fetched.
        tokio::time::sleep(Duration::from_secs(1)).await;
        tx.send(Command::navigate("pages/code.html")).await.unwrap();
        tx.send(Command::Quit).await.unwrap();
    });

    nav.run(rx).await;
    sender.await.unwrap();

    let steps: Vec<(f32, f32)> = nav
        .document()
        .styles()
        .iter()
        .map(|s| (s.opacity, s.scale))
        .collect();
    assert_eq!(
        steps,
        [
            (1.0, 1.0),
            (0.0, 0.98),
            (1.0, 1.0),
            (1.0, 1.0),
            (0.0, 0.98),
            (0.0, 1.02),
            (1.0, 1.0),
        ]
    );
    assert_eq!(
        nav.document().current_style().map(|s| (s.opacity, s.scale)),
        Some((ContainerStyle::default().opacity, ContainerStyle::default().scale))
    );
    assert_eq!(nav.document().container_html(), Some("<h1>Code</h1>"));
}

#[tokio::test(start_paused = true)]
async fn test_show_waits_for_in_flight_load() {
    let fetcher = site_fetcher().slow_page("pages/slow.html", "<h1>Slow</h1>", Duration::from_secs(5));
    let mut nav = composing(fetcher);

    let (tx, rx) = mpsc::channel(8);
    let (reply_tx, reply_rx) = oneshot::channel();
    tx.send(Command::navigate("pages/slow.html")).await.unwrap();
    tx.send(Command::Show(reply_tx)).await.unwrap();
    drop(tx);

    nav.run(rx).await;

    let snapshot = reply_rx.await.unwrap();
    assert_eq!(snapshot.container.as_deref(), Some("<h1>Slow</h1>"));
    assert_eq!(snapshot.pages, ["pages/slow.html"]);
}
