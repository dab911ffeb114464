//! Site entry point tests
//!
//! Records, markdown, and the photo lightbox as fragment content reaches
//! them through `Site`.

use async_trait::async_trait;
use chrono::NaiveDate;

use pageshell::document::{Document, MemoryDocument};
use pageshell::fetch::{FetchError, Fetcher};
use pageshell::navigator::{Action, Navigation, Navigator};
use pageshell::records::{FileStore, MemoryStore, Record, RecordStore};
use pageshell::site::{Site, BACK_BUTTON_HTML};
use pageshell::transition::TransitionConfig;

struct NoPages;

#[async_trait]
impl Fetcher for NoPages {
    async fn fetch_text(&self, page: &str) -> Result<String, FetchError> {
        Err(FetchError::OutsideRoot(page.to_string()))
    }
}

fn new_site<S: pageshell::KeyValueStore>(store: S) -> Site<MemoryDocument, S> {
    let navigator = Navigator::new(MemoryDocument::composing("/index.html"), Box::new(NoPages))
        .with_transition(TransitionConfig::instant());
    Site::new(navigator, RecordStore::new(store))
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

#[test]
fn test_add_then_get_appends_in_insertion_order() {
    let mut site = new_site(MemoryStore::new());
    site.add_record("run", date("2024-04-01"), 30, "easy")
        .unwrap();
    site.add_record("run", date("2024-03-15"), 50, "long")
        .unwrap();

    assert_eq!(
        site.get_records("run"),
        vec![
            Record::new(date("2024-04-01"), 30, "easy"),
            Record::new(date("2024-03-15"), 50, "long"),
        ]
    );
}

#[test]
fn test_get_for_unknown_type_is_empty() {
    let site = new_site(MemoryStore::new());
    assert!(site.get_records("climbing").is_empty());
}

#[test]
fn test_records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    {
        let mut site = new_site(FileStore::new(&path));
        site.add_record("swim", date("2024-06-01"), 40, "")
            .unwrap();
    }
    let mut site = new_site(FileStore::new(&path));
    site.add_record("swim", date("2024-06-03"), 35, "open water")
        .unwrap();

    assert_eq!(
        site.get_records("swim"),
        vec![
            Record::new(date("2024-06-01"), 40, ""),
            Record::new(date("2024-06-03"), 35, "open water"),
        ]
    );

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert!(raw.get("sport_swim").and_then(|v| v.as_str()).is_some());
}

#[test]
fn test_markdown_render_is_idempotent() {
    let mut site = new_site(MemoryStore::new());
    site.navigator_mut()
        .document_mut()
        .set_container_html(r#"<h1>Books</h1><article id="review"></article>"#);
    let md = "## Reading\n\n1. *Dune*\n2. **Solaris**\n";

    assert!(site.render_markdown(md, "review"));
    let first = site.document().container_html().unwrap().to_string();
    assert!(site.render_markdown(md, "review"));
    let second = site.document().container_html().unwrap().to_string();

    assert_eq!(first, second);
    assert!(first.starts_with(
        "<h1>Books</h1><article id=\"review\"><div class=\"markdown-body\"><h2>Reading</h2>"
    ));
}

#[test]
fn test_markdown_renders_on_standalone_page() {
    let document = MemoryDocument::standalone("/pages/writing-spring.html").with_element("article", "");
    let navigator = Navigator::new(document, Box::new(NoPages));
    let mut site = Site::new(navigator, RecordStore::new(MemoryStore::new()));

    assert!(site.render_markdown("Spring *notes*", "article"));
    assert_eq!(
        site.document().element_html("article"),
        Some("<div class=\"markdown-body\"><p>Spring <em>notes</em></p>\n</div>")
    );
    assert!(!site.render_markdown("x", "main-content"));
}

#[tokio::test]
async fn test_photo_modal_closes_on_click() {
    let mut site = new_site(MemoryStore::new());
    let first = site.show_photo_modal("/img/a.jpg", "A");
    let second = site.show_photo_modal("/img/b.jpg", "B");
    assert_eq!(site.document().overlays().len(), 2);

    assert_eq!(
        site.click(&Action::CloseOverlay(first)).await,
        Navigation::OverlayClosed(first)
    );
    assert_eq!(site.click(&Action::CloseOverlay(first)).await, Navigation::Ignored);
    assert_eq!(site.document().overlays().len(), 1);
    assert!(site.document().overlay(second).is_some());
}

#[tokio::test]
async fn test_back_button_and_failed_load() {
    let mut site = new_site(MemoryStore::new());
    assert!(site.render_back_button().contains("data-action=\"back\""));
    assert_eq!(site.render_back_button(), BACK_BUTTON_HTML);

    assert_eq!(
        site.load_page("pages/code.html").await,
        Navigation::Redirected("pages/code.html".to_string())
    );
    // The failed load redirected away from the composing page, so back is
    // the browser's and returns to a fresh composing page.
    assert!(!site.document().has_container());
    assert_eq!(site.go_back().await, Navigation::BrowserBack);
    assert_eq!(site.document().location_path(), "/index.html");
    assert_eq!(site.document().container_html(), Some(""));
}
