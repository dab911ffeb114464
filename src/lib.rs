//! pageshell - page navigation and fragment injection for a personal website.
//!
//! Fetches HTML fragments, swaps them into the composing page's container
//! behind a fade/scale transition, and keeps a navigation history for in-page
//! "back". Small leaf utilities render markdown, show a photo lightbox, and
//! append activity records to a key-value store.

pub mod config;
pub mod document;
pub mod fetch;
pub mod fragment;
pub mod handlers;
pub mod history;
pub mod markdown;
pub mod navigator;
pub mod photo;
pub mod records;
pub mod site;
pub mod transition;
pub mod utils;

pub use document::{ContainerStyle, Document, MemoryDocument, OverlayId};
pub use fetch::{FetchError, Fetcher, FileFetcher, HttpFetcher};
pub use navigator::{Action, Command, LoadOptions, Navigation, Navigator, Snapshot};
pub use records::{FileStore, KeyValueStore, MemoryStore, Record, RecordStore};
pub use site::Site;
