//! Page behavior registered ahead of time, keyed by page identifier.
//!
//! Fragments are passive markup. Whatever a fragment's scripts used to do
//! after injection is registered here and runs after every successful swap.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, warn};

use crate::document::Document;
use crate::fragment::Fragment;

/// What a handler can see and touch after a swap.
pub struct PageContext<'a> {
    pub page: &'a str,
    pub fragment: &'a Fragment,
    pub document: &'a mut dyn Document,
}

pub type PageHandler = Box<dyn Fn(&mut PageContext<'_>)>;

/// Registry of per-page handlers and named load hooks.
#[derive(Default)]
pub struct PageHandlers {
    pages: HashMap<String, Vec<PageHandler>>,
    hooks: HashMap<String, PageHandler>,
}

impl PageHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `handler` every time `page` is swapped in. Handlers for the same
    /// page run in registration order.
    pub fn on_page<F>(&mut self, page: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(&mut PageContext<'_>) + 'static,
    {
        self.pages
            .entry(page.into())
            .or_default()
            .push(Box::new(handler));
        self
    }

    /// Register a named hook that load options can ask for.
    pub fn hook<F>(&mut self, name: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(&mut PageContext<'_>) + 'static,
    {
        self.hooks.insert(name.into(), Box::new(handler));
        self
    }

    /// Run the page handlers for `ctx.page`. Returns how many ran.
    pub fn run_page(&self, ctx: &mut PageContext<'_>) -> usize {
        let Some(handlers) = self.pages.get(ctx.page) else {
            return 0;
        };
        debug!("Running {} handler(s) for {}", handlers.len(), ctx.page);
        for handler in handlers {
            handler(ctx);
        }
        handlers.len()
    }

    /// Run the named hook. Unknown names are logged and skipped.
    pub fn run_hook(&self, name: &str, ctx: &mut PageContext<'_>) -> bool {
        match self.hooks.get(name) {
            Some(hook) => {
                hook(ctx);
                true
            }
            None => {
                warn!("No load hook named {:?} (page {})", name, ctx.page);
                false
            }
        }
    }

    pub fn has_page(&self, page: &str) -> bool {
        self.pages.contains_key(page)
    }
}

impl fmt::Debug for PageHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pages: Vec<_> = self.pages.keys().collect();
        pages.sort();
        let mut hooks: Vec<_> = self.hooks.keys().collect();
        hooks.sort();
        f.debug_struct("PageHandlers")
            .field("pages", &pages)
            .field("hooks", &hooks)
            .finish()
    }
}
