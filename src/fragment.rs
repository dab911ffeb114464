//! Parsing fetched HTML into passive fragment markup.
//!
//! Injected fragments never carry executable content: `<script>` elements are
//! removed before the markup reaches the container, and page behavior runs
//! through [`crate::handlers::PageHandlers`] instead.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::warn;

static SCRIPT: LazyLock<Selector> = LazyLock::new(|| Selector::parse("script").unwrap());
static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());

/// A script element removed from a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedScript {
    /// `src` attribute, for external scripts.
    pub src: Option<String>,
    /// Length of the inline body in bytes.
    pub inline_len: usize,
}

/// Fragment markup ready for injection.
#[derive(Debug, Clone)]
pub struct Fragment {
    markup: String,
    title: Option<String>,
    dropped_scripts: Vec<DroppedScript>,
}

impl Fragment {
    /// Parse `html` the way `innerHTML` assignment would (fragment parsing in
    /// a body context) and strip every script element.
    pub fn parse(html: &str) -> Self {
        let mut document = Html::parse_fragment(html);

        let title = document
            .select(&TITLE)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty());

        let mut dropped_scripts = Vec::new();
        let mut script_ids = Vec::new();
        for script in document.select(&SCRIPT) {
            dropped_scripts.push(DroppedScript {
                src: script.value().attr("src").map(str::to_string),
                inline_len: script.text().map(str::len).sum(),
            });
            script_ids.push(script.id());
        }
        for id in script_ids {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }

        let markup = document.root_element().inner_html();

        Self {
            markup,
            title,
            dropped_scripts,
        }
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Text of the fragment's `<title>`, if any.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn dropped_scripts(&self) -> &[DroppedScript] {
        &self.dropped_scripts
    }

    /// Log each removed script against the page it came from.
    pub fn log_dropped_scripts(&self, page: &str) {
        for script in &self.dropped_scripts {
            match &script.src {
                Some(src) => warn!("{}: dropped external script {}", page, src),
                None => warn!(
                    "{}: dropped inline script ({} bytes); register a page handler instead",
                    page, script.inline_len
                ),
            }
        }
    }
}

/// Replace the children of the element with id `element_id` in `markup` by
/// the nodes of `html`. Returns `None` when there is no such element.
pub fn replace_element_html(markup: &str, element_id: &str, html: &str) -> Option<String> {
    if element_id.is_empty() || element_id.contains(['"', '\\']) {
        return None;
    }
    let selector = Selector::parse(&format!("[id=\"{}\"]", element_id)).ok()?;
    let mut document = Html::parse_fragment(markup);
    let target = document.select(&selector).next()?.id();

    let old_children: Vec<_> = document.tree.get(target)?.children().map(|c| c.id()).collect();
    for child in old_children {
        if let Some(mut node) = document.tree.get_mut(child) {
            node.detach();
        }
    }

    let replacement = Html::parse_fragment(html);
    let mut pending = vec![(replacement.root_element().id(), target)];
    while let Some((source, dest)) = pending.pop() {
        let Some(source) = replacement.tree.get(source) else {
            continue;
        };
        for child in source.children() {
            if let Some(mut parent) = document.tree.get_mut(dest) {
                let copy = parent.append(child.value().clone()).id();
                pending.push((child.id(), copy));
            }
        }
    }

    Some(document.root_element().inner_html())
}
