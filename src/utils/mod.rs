//! Shared utility functions.
//!
//! - `html`: escaping for markup built by hand (overlays, buttons)
//! - `path`: page path helpers shared by the navigator and fetchers

mod html;
mod path;

pub use html::html_escape;
pub use path::{file_name, normalize_page_path};
