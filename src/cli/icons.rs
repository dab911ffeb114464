//! Console output icons.

use console::{style, StyledObject};

use pageshell::Navigation;

/// Green ✓ for a completed action.
pub fn success() -> StyledObject<&'static str> {
    style("✓").green()
}

/// Cyan → for status lines.
pub fn info() -> StyledObject<&'static str> {
    style("→").cyan()
}

/// Red ✗ for rejected input.
pub fn error() -> StyledObject<&'static str> {
    style("✗").red()
}

/// Dim → for secondary detail.
pub fn dim_arrow() -> StyledObject<&'static str> {
    style("→").dim()
}

/// Icon for a navigation outcome. Leaving the composing page is flagged
/// yellow since the container content is gone after it.
pub fn navigation(outcome: &Navigation) -> StyledObject<&'static str> {
    match outcome {
        Navigation::Swapped(_) | Navigation::OverlayClosed(_) => success(),
        Navigation::Redirected(_) | Navigation::BrowserBack => style("⇢").yellow(),
        Navigation::Ignored => dim_arrow(),
    }
}
