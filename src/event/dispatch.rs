//! Event dispatch: resolve the target view, update the model, run handlers.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, debug_span, error, warn};

use super::records::{EventPayload, EventTarget, InboundEvent};
use super::tags::{Category, EventTag};
use crate::error::{Error, Result};
use crate::session::Session;
use crate::view::{query, ViewId};

impl Session {
    /// Run every handler registered for `tag` on `view`, in registration
    /// order. Handlers registered while this runs wait for the next event.
    /// A panicking handler is logged and skipped. Returns the number of
    /// handlers that completed.
    pub fn dispatch(&mut self, view: ViewId, tag: EventTag, payload: &EventPayload) -> usize {
        let mut completed = 0;
        for slot in self.handlers.ids(view, tag) {
            let Some(mut handler) = self.handlers.take(view, tag, slot) else {
                continue;
            };
            let result = panic::catch_unwind(AssertUnwindSafe(|| handler.call(self, view, payload)));
            self.handlers.restore(view, tag, slot, handler);
            match result {
                Ok(()) => completed += 1,
                Err(_) => error!(session = self.id(), ?view, event = %tag, "event handler panicked"),
            }
        }
        completed
    }

    /// Resolve an event target to a view.
    pub fn resolve_target(&self, target: &EventTarget) -> Option<ViewId> {
        match target {
            EventTarget::Handle(handle) => self.tree.by_handle(*handle),
            EventTarget::Id(path) => query::view_by_id(self, self.root()?, path),
        }
    }

    /// Handle one renderer event.
    ///
    /// Value-change events first write the reported value into the view's
    /// model property (no mutation is echoed back). Animation events advance
    /// the animation engine; stale ones are dropped. A payload that does not
    /// fit the tag is dropped. Returns the number of handlers run.
    pub fn handle_event(&mut self, event: InboundEvent) -> Result<usize> {
        if self.phase().is_finished() {
            debug!(session = self.id(), event = %event.event, "event for finished session dropped");
            return Err(Error::SessionClosed(self.id()));
        }
        let span = debug_span!("dispatch", session = self.id(), tag = %event.event);
        let _guard = span.enter();

        let InboundEvent { event: tag, target, payload } = event;
        let view = self
            .resolve_target(&target)
            .ok_or_else(|| Error::ViewNotFound(target.to_string()))?;

        if !payload.fits(tag) {
            warn!(
                session = self.id(),
                ?view,
                event = %tag,
                expected = ?tag.payload_shape(),
                found = ?payload.shape(),
                "event payload does not match its tag; dropped"
            );
            return Ok(0);
        }

        if tag.category() == Category::Animation && !self.observe_animation(view, tag, &payload) {
            return Ok(0);
        }

        if let (Some(property), Some(value)) = (tag.model_property(), payload.to_value()) {
            self.sync_model(view, property, &value);
        }

        Ok(self.dispatch(view, tag, &payload))
    }

    /// Write a client-reported value into the model when the view's kind
    /// declares the property.
    fn sync_model(&mut self, view: ViewId, property: &str, value: &crate::value::Value) {
        let Some(base) = self.view(view).map(|d| d.base) else {
            return;
        };
        if crate::property::lookup(base, property).is_none() {
            return;
        }
        if let Err(err) = self.set_from_client(view, property, value) {
            warn!(session = self.id(), ?view, tag = property, error = %err, "client value rejected");
        }
    }

    /// Queue an event for [`process_events`](Self::process_events).
    pub fn enqueue_event(&mut self, event: InboundEvent) {
        self.inbound.push_back(event);
    }

    pub fn pending_events(&self) -> usize {
        self.inbound.len()
    }

    /// Handle queued events in arrival order, including events queued by
    /// handlers while this runs. Failures are logged and do not stop the
    /// queue. Returns the number of events handled.
    pub fn process_events(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.inbound.pop_front() {
            let tag = event.event;
            match self.handle_event(event) {
                Ok(_) => handled += 1,
                Err(Error::SessionClosed(_)) => {
                    self.inbound.clear();
                    break;
                }
                Err(err) => warn!(session = self.id(), event = %tag, error = %err, "event dropped"),
            }
        }
        handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Handler;
    use crate::session::Mutation;
    use crate::value::Value;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    fn session_with_checkbox() -> (Session, ViewId) {
        let mut session = Session::new(1);
        let root = session.create_view("ListLayout").unwrap();
        let check = session.create_view("Checkbox").unwrap();
        session.set(check, "id", "agree").unwrap();
        session.append_view(root, check).unwrap();
        session.set_root(root).unwrap();
        session.take_mutations();
        (session, check)
    }

    // ── Ordering ─────────────────────────────────────────────────────

    #[test]
    fn handlers_run_in_registration_order() {
        let (mut s, v) = session_with_checkbox();
        let log = Arc::new(Mutex::new(Vec::new()));
        for n in 0..3 {
            let log = log.clone();
            s.on(v, EventTag::Click, Handler::bare(move |_| log.lock().unwrap().push(n)));
        }
        s.dispatch(v, EventTag::Click, &EventPayload::None);
        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn handler_added_during_dispatch_waits() {
        let (mut s, v) = session_with_checkbox();
        let count = Arc::new(Mutex::new(0));
        let c = count.clone();
        s.on(
            v,
            EventTag::Click,
            Handler::view(move |session, view| {
                let c = c.clone();
                session.on(view, EventTag::Click, Handler::bare(move |_| *c.lock().unwrap() += 1));
            }),
        );
        assert_eq!(s.dispatch(v, EventTag::Click, &EventPayload::None), 1);
        assert_eq!(*count.lock().unwrap(), 0);
        s.dispatch(v, EventTag::Click, &EventPayload::None);
        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn panicking_handler_is_isolated() {
        let (mut s, v) = session_with_checkbox();
        let ran = Arc::new(Mutex::new(false));
        let r = ran.clone();
        s.on(v, EventTag::Focus, Handler::bare(|_| panic!("boom")));
        s.on(v, EventTag::Focus, Handler::bare(move |_| *r.lock().unwrap() = true));
        assert_eq!(s.dispatch(v, EventTag::Focus, &EventPayload::None), 1);
        assert!(*ran.lock().unwrap());
        assert_eq!(s.handler_count(v, EventTag::Focus), 2);
    }

    // ── Inbound events ───────────────────────────────────────────────

    #[test]
    fn value_change_updates_model_without_echo() {
        let (mut s, v) = session_with_checkbox();
        let seen = Arc::new(Mutex::new(None));
        let log = seen.clone();
        s.on(
            v,
            EventTag::CheckboxChanged,
            Handler::payload(move |_, payload| *log.lock().unwrap() = payload.to_value()),
        );
        let n = s
            .handle_event(InboundEvent::new(EventTag::CheckboxChanged, "agree", EventPayload::Bool(true)))
            .unwrap();
        assert_eq!(n, 1);
        assert_eq!(s.get(v, "checked").unwrap(), Value::Bool(true));
        assert_eq!(*seen.lock().unwrap(), Some(Value::Bool(true)));
        assert!(s.pending_mutations().is_empty());
    }

    #[test]
    fn handler_mutations_reach_outbound_in_order() {
        let (mut s, v) = session_with_checkbox();
        s.on(
            v,
            EventTag::Click,
            Handler::view(|session, view| {
                session.set(view, "opacity", 0.5).unwrap();
                session.set(view, "disabled", true).unwrap();
            }),
        );
        let handle = s.view(v).unwrap().handle;
        let click = EventPayload::Mouse(crate::event::MouseEvent::default());
        assert_eq!(s.handle_event(InboundEvent::new(EventTag::Click, handle, click)).unwrap(), 1);
        let tags: Vec<String> = s
            .take_mutations()
            .into_iter()
            .filter_map(|m| match m {
                Mutation::SetProperty { tag, .. } => Some(tag),
                _ => None,
            })
            .collect();
        assert_eq!(tags, vec!["opacity", "disabled"]);
    }

    #[test]
    fn mismatched_payload_is_dropped() {
        let (mut s, v) = session_with_checkbox();
        s.on(v, EventTag::CheckboxChanged, Handler::bare(|_| panic!("must not run")));
        let n = s
            .handle_event(InboundEvent::new(EventTag::CheckboxChanged, "agree", EventPayload::Text("x".into())))
            .unwrap();
        assert_eq!(n, 0);
        assert_eq!(s.get(v, "checked").unwrap(), Value::Bool(false));
    }

    #[test]
    fn unknown_target() {
        let (mut s, _) = session_with_checkbox();
        let err = s
            .handle_event(InboundEvent::new(EventTag::Click, "ghost", EventPayload::None))
            .unwrap_err();
        assert!(matches!(err, Error::ViewNotFound(_)));
    }

    #[test]
    fn finished_session_drops_events() {
        let (mut s, _) = session_with_checkbox();
        s.start().unwrap();
        s.finish().unwrap();
        let err = s
            .handle_event(InboundEvent::new(EventTag::Click, "agree", EventPayload::None))
            .unwrap_err();
        assert!(matches!(err, Error::SessionClosed(1)));
    }

    // ── Queue ────────────────────────────────────────────────────────

    #[test]
    fn queued_events_process_in_order() {
        let (mut s, v) = session_with_checkbox();
        let log = Arc::new(Mutex::new(Vec::new()));
        let l = log.clone();
        s.on(
            v,
            EventTag::CheckboxChanged,
            Handler::payload(move |_, p| l.lock().unwrap().push(p.to_value())),
        );
        s.enqueue_event(InboundEvent::new(EventTag::CheckboxChanged, "agree", EventPayload::Bool(true)));
        s.enqueue_event(InboundEvent::new(EventTag::Click, "ghost", EventPayload::None));
        s.enqueue_event(InboundEvent::new(EventTag::CheckboxChanged, "agree", EventPayload::Bool(false)));
        assert_eq!(s.pending_events(), 3);
        assert_eq!(s.process_events(), 2);
        assert_eq!(
            *log.lock().unwrap(),
            vec![Some(Value::Bool(true)), Some(Value::Bool(false))]
        );
        assert_eq!(s.pending_events(), 0);
    }
}
