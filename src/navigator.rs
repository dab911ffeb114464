//! The page navigator.
//!
//! Loads fragments into the composing page's container, keeps the navigation
//! history, and implements "back". On a page without the container every
//! navigation is a full redirect.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::str::FromStr;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::config::{default_back_fallbacks, default_nav, BackFallback, Config};
use crate::document::{Document, OverlayId};
use crate::fetch::Fetcher;
use crate::fragment::Fragment;
use crate::handlers::{PageContext, PageHandlers};
use crate::history::{NavEntry, NavigationHistory};
use crate::transition::{self, TransitionConfig};
use crate::utils::file_name;

/// Options carried with a navigation and replayed on "back".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Named hook from [`PageHandlers`] to run after the swap.
    pub on_load: Option<String>,
}

impl LoadOptions {
    pub fn on_load(hook: impl Into<String>) -> Self {
        Self {
            on_load: Some(hook.into()),
        }
    }
}

/// What a navigation request ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// The page was swapped into the container.
    Swapped(String),
    /// Full-page redirect to the location.
    Redirected(String),
    /// Browser-level history back.
    BrowserBack,
    OverlayClosed(OverlayId),
    /// Nothing matched the request.
    Ignored,
}

impl fmt::Display for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Navigation::Swapped(page) => write!(f, "loaded {}", page),
            Navigation::Redirected(location) => write!(f, "redirected to {}", location),
            Navigation::BrowserBack => write!(f, "browser back"),
            Navigation::OverlayClosed(id) => write!(f, "closed {}", id),
            Navigation::Ignored => write!(f, "ignored"),
        }
    }
}

/// A click on the composing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Element with this id; nav-bound ids open their page.
    Element(String),
    /// The rendered back button.
    Back,
    /// The close button of an overlay.
    CloseOverlay(OverlayId),
}

impl FromStr for Action {
    type Err = String;

    /// `back`, `close overlay-N`, or an element id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "back" {
            return Ok(Action::Back);
        }
        if let Some(rest) = s.strip_prefix("close ") {
            let rest = rest.trim();
            let n = rest.strip_prefix("overlay-").unwrap_or(rest);
            return n
                .parse()
                .map(|n| Action::CloseOverlay(OverlayId(n)))
                .map_err(|_| format!("invalid overlay id: {}", rest));
        }
        if s.is_empty() || s.contains(char::is_whitespace) {
            return Err(format!("invalid element id: {:?}", s));
        }
        Ok(Action::Element(s.to_string()))
    }
}

/// Requests accepted by [`Navigator::run`].
#[derive(Debug)]
pub enum Command {
    Navigate { page: String, options: LoadOptions },
    Back,
    Click(Action),
    /// Reply with a [`Snapshot`].
    Show(oneshot::Sender<Snapshot>),
    Quit,
}

impl Command {
    pub fn navigate(page: impl Into<String>) -> Self {
        Command::Navigate {
            page: page.into(),
            options: LoadOptions::default(),
        }
    }

    /// Whether this command changes the view (and so cancels a pending one).
    /// Only clicks on elements bound in `nav` navigate.
    pub fn is_navigation(&self, nav: &BTreeMap<String, String>) -> bool {
        match self {
            Command::Navigate { .. } | Command::Back => true,
            Command::Click(Action::Back) => true,
            Command::Click(Action::Element(id)) => nav.contains_key(id),
            Command::Click(Action::CloseOverlay(_)) | Command::Show(_) | Command::Quit => false,
        }
    }
}

/// Where "back" goes when the navigation history cannot serve it.
#[derive(Debug, Clone)]
pub struct BackPolicy {
    pub landing_page: String,
    pub pages_dir: String,
    pub pages_landing: String,
    pub fallbacks: Vec<BackFallback>,
}

impl Default for BackPolicy {
    fn default() -> Self {
        Self {
            landing_page: "index.html".to_string(),
            pages_dir: "pages/".to_string(),
            pages_landing: "../index.html".to_string(),
            fallbacks: default_back_fallbacks(),
        }
    }
}

impl BackPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            landing_page: config.landing_page.clone(),
            pages_dir: config.pages_dir.clone(),
            pages_landing: config.pages_landing.clone(),
            fallbacks: config.back_fallbacks.clone(),
        }
    }

    /// Redirect target for "back" from `location` with no history to use.
    pub fn fallback_for(&self, location: &str) -> &str {
        if !location.contains(&self.pages_dir) {
            return &self.landing_page;
        }
        let name = file_name(location);
        self.fallbacks
            .iter()
            .find(|f| name.contains(&f.contains))
            .map(|f| f.target.as_str())
            .unwrap_or(self.pages_landing.as_str())
    }
}

/// Page navigator over a document and a fragment source.
pub struct Navigator<D: Document> {
    document: D,
    fetcher: Box<dyn Fetcher>,
    history: NavigationHistory,
    handlers: PageHandlers,
    transition: TransitionConfig,
    nav: BTreeMap<String, String>,
    back: BackPolicy,
}

impl<D: Document> Navigator<D> {
    pub fn new(document: D, fetcher: Box<dyn Fetcher>) -> Self {
        Self {
            document,
            fetcher,
            history: NavigationHistory::default(),
            handlers: PageHandlers::default(),
            transition: TransitionConfig::default(),
            nav: default_nav(),
            back: BackPolicy::default(),
        }
    }

    /// Navigator configured from settings.
    pub fn from_config(document: D, fetcher: Box<dyn Fetcher>, config: &Config) -> Self {
        Self::new(document, fetcher)
            .with_history(NavigationHistory::new(config.history_capacity))
            .with_transition(config.transition.clone())
            .with_nav(config.nav.clone())
            .with_back_policy(BackPolicy::from_config(config))
    }

    pub fn with_handlers(mut self, handlers: PageHandlers) -> Self {
        self.handlers = handlers;
        self
    }

    pub fn with_history(mut self, history: NavigationHistory) -> Self {
        self.history = history;
        self
    }

    pub fn with_transition(mut self, transition: TransitionConfig) -> Self {
        self.transition = transition;
        self
    }

    pub fn with_nav(mut self, nav: BTreeMap<String, String>) -> Self {
        self.nav = nav;
        self
    }

    pub fn with_back_policy(mut self, back: BackPolicy) -> Self {
        self.back = back;
        self
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    pub fn handlers_mut(&mut self) -> &mut PageHandlers {
        &mut self.handlers
    }

    pub fn into_document(self) -> D {
        self.document
    }

    /// Load `page` into the container, or redirect to it when there is no
    /// container. Fetch failures degrade to a redirect to the same page.
    pub async fn load_page(&mut self, page: &str, options: LoadOptions) -> Navigation {
        if !self.document.has_container() {
            info!("Not on the composing page; redirecting to {}", page);
            return self.redirect_to(page.to_string());
        }

        self.history.push(NavEntry::new(page, options.clone()));
        transition::fade_out(&self.transition, &mut self.document).await;

        match self.fetcher.fetch_text(page).await {
            Ok(html) => self.swap(page, &html, &options),
            Err(e) => {
                warn!("Failed to load page {}: {}", page, e);
                return self.redirect_to(page.to_string());
            }
        }

        transition::fade_in(&self.transition, &mut self.document).await;
        Navigation::Swapped(page.to_string())
    }

    fn swap(&mut self, page: &str, html: &str, options: &LoadOptions) {
        let fragment = Fragment::parse(html);
        fragment.log_dropped_scripts(page);
        self.document.set_container_html(fragment.markup());
        debug!("Swapped in {} ({} bytes)", page, fragment.markup().len());

        let mut ctx = PageContext {
            page,
            fragment: &fragment,
            document: &mut self.document,
        };
        self.handlers.run_page(&mut ctx);
        if let Some(hook) = &options.on_load {
            self.handlers.run_hook(hook, &mut ctx);
        }
    }

    /// Go back one view.
    ///
    /// On the composing page with more than one history entry the current
    /// entry is dropped and the previous one reloaded. Otherwise the browser's
    /// own history is used, and failing that a fallback location.
    pub async fn go_back(&mut self) -> Navigation {
        if self.document.has_container() && self.history.len() > 1 {
            self.history.pop();
            return match self.history.pop() {
                Some(prev) => self.load_page(&prev.page, prev.options).await,
                None => self.redirect_to(self.back.landing_page.clone()),
            };
        }

        if self.document.history_length() > 1 {
            self.history.clear();
            self.document.history_back();
            return Navigation::BrowserBack;
        }

        let target = self
            .back
            .fallback_for(self.document.location_path())
            .to_string();
        info!("Back: no history, falling back to {}", target);
        self.redirect_to(target)
    }

    /// Full-page navigation. The history belongs to the page being left.
    fn redirect_to(&mut self, location: String) -> Navigation {
        self.history.clear();
        self.document.redirect(&location);
        Navigation::Redirected(location)
    }

    /// Handle a click on the page.
    pub async fn click(&mut self, action: &Action) -> Navigation {
        match action {
            Action::Back => self.go_back().await,
            Action::CloseOverlay(id) => {
                if self.document.remove_overlay(*id) {
                    Navigation::OverlayClosed(*id)
                } else {
                    Navigation::Ignored
                }
            }
            Action::Element(id) => match self.nav.get(id).cloned() {
                Some(page) => self.load_page(&page, LoadOptions::default()).await,
                None => {
                    debug!("No navigation bound to #{}", id);
                    Navigation::Ignored
                }
            },
        }
    }

    /// What the document currently shows.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            container: self.document.container_html().map(str::to_string),
            location: self.document.location_path().to_string(),
            pages: self.history.iter().map(|e| e.page.clone()).collect(),
        }
    }

    async fn dispatch(&mut self, command: Command) -> Navigation {
        match command {
            Command::Navigate { page, options } => self.load_page(&page, options).await,
            Command::Back => self.go_back().await,
            Command::Click(action) => self.click(&action).await,
            Command::Show(_) | Command::Quit => Navigation::Ignored,
        }
    }

    /// Serve commands until the channel closes or `Quit` arrives.
    ///
    /// A navigation command that arrives while another is in flight
    /// supersedes it: the in-flight load is dropped and never swaps its
    /// content in. Other commands wait for the in-flight one to finish.
    pub async fn run(&mut self, mut commands: mpsc::Receiver<Command>) {
        let mut queue: VecDeque<Command> = VecDeque::new();
        let bindings = self.nav.clone();
        loop {
            let command = match queue.pop_front() {
                Some(command) => command,
                None => match commands.recv().await {
                    Some(command) => command,
                    None => break,
                },
            };

            match command {
                Command::Quit => break,
                Command::Show(reply) => {
                    let _ = reply.send(self.snapshot());
                }
                navigation => {
                    let superseded = {
                        let load = self.dispatch(navigation);
                        tokio::pin!(load);
                        loop {
                            tokio::select! {
                                outcome = &mut load => {
                                    info!("{}", outcome);
                                    break None;
                                }
                                Some(newer) = commands.recv() => {
                                    if newer.is_navigation(&bindings) {
                                        break Some(newer);
                                    }
                                    queue.push_back(newer);
                                }
                            }
                        }
                    };
                    if let Some(newer) = superseded {
                        debug!("In-flight navigation superseded by {:?}", newer);
                        transition::restore(&self.transition, &mut self.document);
                        queue.push_back(newer);
                    }
                }
            }
        }
    }
}

/// Point-in-time view of the navigator, for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub container: Option<String>,
    pub location: String,
    /// Navigation history pages, oldest first.
    pub pages: Vec<String>,
}
