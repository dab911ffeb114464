//! Markdown rendering into a page element.

use pulldown_cmark::{html, Options, Parser};

use crate::document::Document;

/// Class on the wrapper element around rendered markdown.
pub const MARKDOWN_CLASS: &str = "markdown-body";

/// Markdown renderer (pulldown-cmark, statically linked).
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    options: Options,
    class: String,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self {
            options: Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TABLES
                | Options::ENABLE_FOOTNOTES
                | Options::ENABLE_TASKLISTS,
            class: MARKDOWN_CLASS.to_string(),
        }
    }
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    /// Render `markdown` to bare HTML.
    pub fn to_html(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);
        html_output
    }

    /// Render `markdown` inside the wrapper element.
    pub fn render(&self, markdown: &str) -> String {
        format!("<div class=\"{}\">{}</div>", self.class, self.to_html(markdown))
    }

    /// Render `markdown` into the element with id `target`.
    /// Returns `false` when the document has no such element.
    pub fn render_into(&self, markdown: &str, document: &mut dyn Document, target: &str) -> bool {
        document.set_element_html(target, &self.render(markdown))
    }
}
