//! Session lifecycle: phases, transitions and listener callbacks.
//!
//! The canonical order is start, pause, resume, disconnect, reconnect,
//! finish. A callback that does not apply to the current phase (a second
//! disconnect, a resume while active) is coalesced: nothing happens and the
//! call reports `false`. After finish every call fails with
//! [`Error::SessionClosed`].

use tracing::{debug, info};

use super::Session;
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Built but not yet started.
    #[default]
    Created,
    Active,
    Paused,
    Disconnected,
    Finished,
}

/// A lifecycle callback from the session layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    Start,
    Pause,
    Resume,
    Disconnect,
    Reconnect,
    Finish,
}

impl Phase {
    /// Phase after `event`, or `None` when the event is coalesced.
    pub fn next(self, event: LifecycleEvent) -> Option<Phase> {
        use LifecycleEvent as E;
        match (self, event) {
            (Phase::Finished, _) => None,
            (Phase::Created, E::Start) => Some(Phase::Active),
            (Phase::Active, E::Pause) => Some(Phase::Paused),
            (Phase::Paused, E::Resume) => Some(Phase::Active),
            (Phase::Active | Phase::Paused, E::Disconnect) => Some(Phase::Disconnected),
            (Phase::Disconnected, E::Reconnect) => Some(Phase::Active),
            (_, E::Finish) => Some(Phase::Finished),
            _ => None,
        }
    }

    pub fn is_finished(self) -> bool {
        self == Phase::Finished
    }
}

// ---------------------------------------------------------------------------
// SessionListener
// ---------------------------------------------------------------------------

/// Application hooks for lifecycle changes. All methods default to no-ops.
pub trait SessionListener: Send {
    fn on_start(&mut self, _session: &mut Session) {}
    fn on_pause(&mut self, _session: &mut Session) {}
    fn on_resume(&mut self, _session: &mut Session) {}
    fn on_disconnect(&mut self, _session: &mut Session) {}
    fn on_reconnect(&mut self, _session: &mut Session) {}
    fn on_finish(&mut self, _session: &mut Session) {}
}

// ---------------------------------------------------------------------------
// Session lifecycle
// ---------------------------------------------------------------------------

impl Session {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Install the lifecycle listener, replacing any previous one.
    pub fn set_listener(&mut self, listener: impl SessionListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn start(&mut self) -> Result<bool> {
        self.advance(LifecycleEvent::Start)
    }

    pub fn pause(&mut self) -> Result<bool> {
        self.advance(LifecycleEvent::Pause)
    }

    pub fn resume(&mut self) -> Result<bool> {
        self.advance(LifecycleEvent::Resume)
    }

    pub fn disconnect(&mut self) -> Result<bool> {
        self.advance(LifecycleEvent::Disconnect)
    }

    pub fn reconnect(&mut self) -> Result<bool> {
        self.advance(LifecycleEvent::Reconnect)
    }

    /// Finish the session: run `on_finish`, cancel pending loads and drop
    /// the view tree. Inbound events are rejected from here on.
    pub fn finish(&mut self) -> Result<bool> {
        self.advance(LifecycleEvent::Finish)
    }

    /// Apply a lifecycle callback. Returns whether the phase changed.
    pub fn advance(&mut self, event: LifecycleEvent) -> Result<bool> {
        if self.phase.is_finished() {
            return Err(Error::SessionClosed(self.id()));
        }
        let Some(next) = self.phase.next(event) else {
            debug!(session = self.id(), ?event, phase = ?self.phase, "lifecycle event coalesced");
            return Ok(false);
        };
        info!(session = self.id(), from = ?self.phase, to = ?next, "session lifecycle");
        self.phase = next;

        if let Some(mut listener) = self.listener.take() {
            match event {
                LifecycleEvent::Start => listener.on_start(self),
                LifecycleEvent::Pause => listener.on_pause(self),
                LifecycleEvent::Resume => listener.on_resume(self),
                LifecycleEvent::Disconnect => listener.on_disconnect(self),
                LifecycleEvent::Reconnect => listener.on_reconnect(self),
                LifecycleEvent::Finish => listener.on_finish(self),
            }
            if self.listener.is_none() {
                self.listener = Some(listener);
            }
        }

        if next.is_finished() {
            self.destroy();
        }
        Ok(true)
    }
}
