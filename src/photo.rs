//! Full-screen photo lightbox.
//!
//! The overlay's close button has `data-action="close"`; a click on it is
//! delivered as [`crate::navigator::Action::CloseOverlay`] for the overlay
//! that contains it.

use crate::document::{Document, OverlayId};
use crate::utils::html_escape;

pub const PHOTO_MODAL_CLASS: &str = "photo-modal";

/// Markup inside the lightbox overlay.
pub fn photo_modal_html(src: &str, title: &str) -> String {
    format!(
        concat!(
            "<button class=\"close-btn\" title=\"关闭\" data-action=\"close\">×</button>",
            "<img src=\"{}\" alt=\"photo\">",
            "<div class=\"photo-title\">{}</div>"
        ),
        html_escape(src),
        html_escape(title),
    )
}

/// Show `src` with a caption in a new overlay on the document body.
pub fn show_photo_modal(document: &mut dyn Document, src: &str, title: &str) -> OverlayId {
    document.append_overlay(PHOTO_MODAL_CLASS, photo_modal_html(src, title))
}
