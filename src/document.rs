//! The document contract the navigator drives.
//!
//! A browser front-end implements [`Document`] over the real DOM. The crate
//! ships [`MemoryDocument`], which records every effect so the CLI can print
//! it and tests can assert on it.

use std::collections::BTreeMap;
use std::fmt;

use crate::fragment::replace_element_html;
use crate::utils::file_name;

/// Visual state of the navigation container.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerStyle {
    pub opacity: f32,
    pub scale: f32,
    /// CSS `transition` value, if one should be set.
    pub transition: Option<String>,
}

impl ContainerStyle {
    pub fn new(opacity: f32, scale: f32) -> Self {
        Self {
            opacity,
            scale,
            transition: None,
        }
    }

    pub fn with_transition(mut self, transition: impl Into<String>) -> Self {
        self.transition = Some(transition.into());
        self
    }
}

impl Default for ContainerStyle {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

/// Handle to an overlay appended to the document body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(pub u64);

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "overlay-{}", self.0)
    }
}

/// An element appended to the document body (e.g. the photo lightbox).
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub id: OverlayId,
    pub class: String,
    pub html: String,
}

/// DOM operations the page layer needs.
///
/// Absence of the navigation container means the current page is a
/// standalone page rather than the composing page.
pub trait Document {
    /// Whether the navigation container exists.
    fn has_container(&self) -> bool;

    /// Current container markup, if the container exists.
    fn container_html(&self) -> Option<&str>;

    /// Replace the container content. Returns `false` if there is no container.
    fn set_container_html(&mut self, html: &str) -> bool;

    fn set_container_style(&mut self, style: &ContainerStyle);

    /// Replace the content of the element with id `id`, inside the container
    /// or anywhere else on the page. Returns `false` if there is no such
    /// element.
    fn set_element_html(&mut self, id: &str, html: &str) -> bool;

    /// Full-page navigation to `location`. The current page, its container
    /// and its overlays are gone afterwards.
    fn redirect(&mut self, location: &str);

    fn append_overlay(&mut self, class: &str, html: String) -> OverlayId;

    /// Remove an overlay. Returns `false` if it was already gone.
    fn remove_overlay(&mut self, id: OverlayId) -> bool;

    /// Number of entries in the browser's own session history.
    fn history_length(&self) -> usize;

    /// Browser-level "back".
    fn history_back(&mut self);

    /// Path of the current location, e.g. `/pages/sport-run.html`.
    fn location_path(&self) -> &str;
}

/// In-memory document.
///
/// Navigating (redirect or browser back) replaces the whole page. Locations
/// whose file name matches the composing page's come back with a fresh empty
/// container; every other location is a standalone page.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    container: Option<String>,
    elements: BTreeMap<String, String>,
    styles: Vec<ContainerStyle>,
    redirects: Vec<String>,
    overlays: Vec<Overlay>,
    next_overlay: u64,
    history: Vec<String>,
    /// File name of the composing page, e.g. `index.html`.
    composing_page: Option<String>,
}

impl MemoryDocument {
    /// The composing page: has an (empty) navigation container.
    pub fn composing(location: impl Into<String>) -> Self {
        let location = location.into();
        let composing_page = Some(file_name(&location).to_string());
        Self::new(location, Some(String::new()), composing_page)
    }

    /// A standalone page without the navigation container.
    pub fn standalone(location: impl Into<String>) -> Self {
        Self::new(location.into(), None, None)
    }

    fn new(location: String, container: Option<String>, composing_page: Option<String>) -> Self {
        Self {
            container,
            elements: BTreeMap::new(),
            styles: Vec::new(),
            redirects: Vec::new(),
            overlays: Vec::new(),
            next_overlay: 0,
            history: vec![location],
            composing_page,
        }
    }

    /// Add an element outside the container, e.g. a standalone page's
    /// article body.
    pub fn with_element(mut self, id: impl Into<String>, html: impl Into<String>) -> Self {
        self.elements.insert(id.into(), html.into());
        self
    }

    /// Content of an element added with [`MemoryDocument::with_element`].
    pub fn element_html(&self, id: &str) -> Option<&str> {
        self.elements.get(id).map(String::as_str)
    }

    /// Show the page at `location` in place of the current one.
    fn enter(&mut self, location: &str) {
        let composing = self
            .composing_page
            .as_deref()
            .is_some_and(|page| page == file_name(location));
        self.container = composing.then(String::new);
        self.elements.clear();
        self.overlays.clear();
    }

    /// Pretend the browser visited `locations` before the current page.
    pub fn with_prior_history<I, S>(mut self, locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let current = self.history.pop();
        self.history.extend(locations.into_iter().map(Into::into));
        self.history.extend(current);
        self
    }

    /// Every style applied to the container, oldest first.
    pub fn styles(&self) -> &[ContainerStyle] {
        &self.styles
    }

    pub fn current_style(&self) -> Option<&ContainerStyle> {
        self.styles.last()
    }

    /// Every full-page redirect, oldest first.
    pub fn redirects(&self) -> &[String] {
        &self.redirects
    }

    pub fn last_redirect(&self) -> Option<&str> {
        self.redirects.last().map(String::as_str)
    }

    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    pub fn overlay(&self, id: OverlayId) -> Option<&Overlay> {
        self.overlays.iter().find(|o| o.id == id)
    }
}

impl Document for MemoryDocument {
    fn has_container(&self) -> bool {
        self.container.is_some()
    }

    fn container_html(&self) -> Option<&str> {
        self.container.as_deref()
    }

    fn set_container_html(&mut self, html: &str) -> bool {
        match self.container.as_mut() {
            Some(content) => {
                *content = html.to_string();
                true
            }
            None => false,
        }
    }

    fn set_container_style(&mut self, style: &ContainerStyle) {
        if self.container.is_some() {
            self.styles.push(style.clone());
        }
    }

    fn set_element_html(&mut self, id: &str, html: &str) -> bool {
        if let Some(content) = self.elements.get_mut(id) {
            *content = html.to_string();
            return true;
        }
        let replaced = self
            .container
            .as_deref()
            .and_then(|container| replace_element_html(container, id, html));
        match replaced {
            Some(markup) => {
                self.container = Some(markup);
                true
            }
            None => false,
        }
    }

    fn redirect(&mut self, location: &str) {
        self.redirects.push(location.to_string());
        self.history.push(location.to_string());
        self.enter(location);
    }

    fn append_overlay(&mut self, class: &str, html: String) -> OverlayId {
        let id = OverlayId(self.next_overlay);
        self.next_overlay += 1;
        self.overlays.push(Overlay {
            id,
            class: class.to_string(),
            html,
        });
        id
    }

    fn remove_overlay(&mut self, id: OverlayId) -> bool {
        let before = self.overlays.len();
        self.overlays.retain(|o| o.id != id);
        self.overlays.len() != before
    }

    fn history_length(&self) -> usize {
        self.history.len()
    }

    fn history_back(&mut self) {
        if self.history.len() > 1 {
            self.history.pop();
            let location = self.location_path().to_string();
            self.enter(&location);
        }
    }

    fn location_path(&self) -> &str {
        self.history.last().map(String::as_str).unwrap_or_default()
    }
}
