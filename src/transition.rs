//! Fade/scale transition around a container swap.
//!
//! Purely cosmetic: the swap happens regardless of how the styles render.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::document::{ContainerStyle, Document};

fn default_fade_out_ms() -> u64 {
    300
}

fn default_settle_ms() -> u64 {
    60
}

fn default_css() -> String {
    "opacity 0.4s, transform 0.4s".to_string()
}

/// Transition timings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionConfig {
    /// Delay between starting the fade-out and running the swap.
    #[serde(default = "default_fade_out_ms")]
    pub fade_out_ms: u64,
    /// Delay between the swap and restoring full opacity.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    /// CSS `transition` value set on the container.
    #[serde(default = "default_css")]
    pub css: String,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            fade_out_ms: default_fade_out_ms(),
            settle_ms: default_settle_ms(),
            css: default_css(),
        }
    }
}

impl TransitionConfig {
    /// Same styles, no delays.
    pub fn instant() -> Self {
        Self {
            fade_out_ms: 0,
            settle_ms: 0,
            ..Self::default()
        }
    }

    pub fn fade_out(&self) -> Duration {
        Duration::from_millis(self.fade_out_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// Start the transition: fade the container out, then wait for the fade to
/// finish. The caller swaps the content once this returns.
pub async fn fade_out<D: Document + ?Sized>(config: &TransitionConfig, document: &mut D) {
    if !document.has_container() {
        return;
    }
    document.set_container_style(&ContainerStyle::new(1.0, 1.0).with_transition(&config.css));
    document.set_container_style(&ContainerStyle::new(0.0, 0.98).with_transition(&config.css));
    pause(config.fade_out()).await;
}

/// Put the container back at rest after a transition that will not finish,
/// e.g. a load dropped in favor of a newer one.
pub fn restore<D: Document + ?Sized>(config: &TransitionConfig, document: &mut D) {
    if document.has_container() {
        document.set_container_style(&ContainerStyle::default().with_transition(&config.css));
    }
}

/// Finish the transition after the swap: overshoot slightly, settle, and
/// restore full opacity.
pub async fn fade_in<D: Document + ?Sized>(config: &TransitionConfig, document: &mut D) {
    if !document.has_container() {
        return;
    }
    document.set_container_style(&ContainerStyle::new(0.0, 1.02).with_transition(&config.css));
    pause(config.settle()).await;
    document.set_container_style(&ContainerStyle::new(1.0, 1.0).with_transition(&config.css));
}
