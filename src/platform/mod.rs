//! Platform abstraction layer
//!
//! Handles host subscriptions for:
//! - Reduced-motion change notifications
//! - Pointer movement over the surface
//! - Viewport resize
//! - The recurring animation frame
//!
//! A `Mount` owns every subscription it made and gives all of them back on
//! `detach`, so unmounting can never leak a listener or a frame callback.

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::error::Result;

/// Everything a mounted field listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventSource {
    MotionChange,
    PointerMove,
    Resize,
    Frame,
}

impl EventSource {
    pub const ALL: [EventSource; 4] = [
        EventSource::MotionChange,
        EventSource::PointerMove,
        EventSource::Resize,
        EventSource::Frame,
    ];
}

/// A host that can register and release event subscriptions
pub trait EventHost {
    type Handle;

    fn subscribe(&mut self, source: EventSource) -> Result<Self::Handle>;

    fn unsubscribe(&mut self, handle: Self::Handle);
}

/// Subscriptions held for one mounted field
pub struct Mount<H: EventHost> {
    handles: Vec<(EventSource, H::Handle)>,
}

impl<H: EventHost> Mount<H> {
    /// Subscribe to every source. On failure, the subscriptions made so far
    /// are released before the error is returned.
    pub fn attach(host: &mut H, sources: &[EventSource]) -> Result<Self> {
        let mut handles = Vec::with_capacity(sources.len());
        for &source in sources {
            match host.subscribe(source) {
                Ok(handle) => handles.push((source, handle)),
                Err(e) => {
                    log::error!("Mount failed at {:?}: {}", source, e);
                    for (_, handle) in handles.into_iter().rev() {
                        host.unsubscribe(handle);
                    }
                    return Err(e);
                }
            }
        }
        log::info!("Mounted ({} subscriptions)", handles.len());
        Ok(Self { handles })
    }

    pub fn sources(&self) -> impl Iterator<Item = EventSource> + '_ {
        self.handles.iter().map(|(source, _)| *source)
    }

    /// Release every subscription exactly once
    pub fn detach(self, host: &mut H) {
        let count = self.handles.len();
        for (_, handle) in self.handles.into_iter().rev() {
            host.unsubscribe(handle);
        }
        log::info!("Unmounted ({} subscriptions released)", count);
    }
}
