//! Viewport proximity events.
//!
//! The list controller does not know how visibility is detected. Whatever
//! renders the list reports when the end-of-list sentinel scrolls into or out
//! of view through a [`ViewportSensor`].

use async_trait::async_trait;
use tokio::sync::mpsc;

/// Visibility change of the end-of-list sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportEvent {
    /// The sentinel is (nearly) on screen; more items are wanted
    SentinelVisible,
    SentinelHidden,
}

/// Source of viewport events.
#[async_trait]
pub trait ViewportSensor: Send {
    /// Next event, or `None` once the view is gone.
    async fn next_event(&mut self) -> Option<ViewportEvent>;
}

#[async_trait]
impl ViewportSensor for mpsc::Receiver<ViewportEvent> {
    async fn next_event(&mut self) -> Option<ViewportEvent> {
        self.recv().await
    }
}

#[async_trait]
impl ViewportSensor for mpsc::UnboundedReceiver<ViewportEvent> {
    async fn next_event(&mut self) -> Option<ViewportEvent> {
        self.recv().await
    }
}
