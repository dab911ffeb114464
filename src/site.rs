//! Entry points that fragment content and page handlers call into.

use chrono::NaiveDate;

use crate::document::{Document, OverlayId};
use crate::markdown::MarkdownRenderer;
use crate::navigator::{Action, LoadOptions, Navigation, Navigator};
use crate::photo;
use crate::records::{KeyValueStore, Record, RecordError, RecordStore};

/// Markup for the back button. Clicks on it arrive as [`Action::Back`].
pub const BACK_BUTTON_HTML: &str =
    r#"<button data-action="back" class="back-btn"><i class="fa fa-arrow-left"></i></button>"#;

/// The navigator plus the leaf utilities, sharing one document and one store.
pub struct Site<D: Document, S: KeyValueStore> {
    navigator: Navigator<D>,
    markdown: MarkdownRenderer,
    records: RecordStore<S>,
}

impl<D: Document, S: KeyValueStore> Site<D, S> {
    pub fn new(navigator: Navigator<D>, records: RecordStore<S>) -> Self {
        Self {
            navigator,
            markdown: MarkdownRenderer::default(),
            records,
        }
    }

    pub fn with_markdown(mut self, markdown: MarkdownRenderer) -> Self {
        self.markdown = markdown;
        self
    }

    pub fn navigator(&self) -> &Navigator<D> {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut Navigator<D> {
        &mut self.navigator
    }

    pub fn document(&self) -> &D {
        self.navigator.document()
    }

    pub fn records(&self) -> &RecordStore<S> {
        &self.records
    }

    pub fn render_back_button(&self) -> &'static str {
        BACK_BUTTON_HTML
    }

    /// Render markdown into the element with id `target`.
    pub fn render_markdown(&mut self, markdown: &str, target: &str) -> bool {
        self.markdown
            .render_into(markdown, self.navigator.document_mut(), target)
    }

    pub fn show_photo_modal(&mut self, src: &str, title: &str) -> OverlayId {
        photo::show_photo_modal(self.navigator.document_mut(), src, title)
    }

    pub fn add_record(
        &mut self,
        kind: &str,
        date: NaiveDate,
        duration: u32,
        note: &str,
    ) -> Result<(), RecordError> {
        self.records.add(kind, Record::new(date, duration, note))
    }

    pub fn get_records(&self, kind: &str) -> Vec<Record> {
        self.records.get(kind)
    }

    pub async fn load_page(&mut self, page: &str) -> Navigation {
        self.navigator.load_page(page, LoadOptions::default()).await
    }

    pub async fn go_back(&mut self) -> Navigation {
        self.navigator.go_back().await
    }

    pub async fn click(&mut self, action: &Action) -> Navigation {
        self.navigator.click(action).await
    }
}
