//! Pilot: programmatic interaction with a headless session.
//!
//! The `Pilot` owns a started [`Session`] and plays the renderer's part:
//! it sends events by view identifier, acknowledges animations, resolves
//! resource loads on demand and collects the outbound mutation stream.

use tracing::warn;

use crate::error::{Error, Result};
use crate::event::{EventPayload, EventTag, InboundEvent, MouseEvent};
use crate::geometry::Point;
use crate::session::{Mutation, Session};
use crate::value::{Color, Value};
use crate::view::ViewId;

use super::snapshot::ViewSnapshot;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless session driver for tests.
///
/// # Examples
///
/// ```
/// use rui_core::testing::Pilot;
///
/// let mut pilot = Pilot::from_source("ListLayout { content = Checkbox { id = agree } }").unwrap();
/// pilot.check("agree", true).unwrap();
/// assert_eq!(pilot.get("agree", "checked").unwrap(), true.into());
/// ```
pub struct Pilot {
    session: Session,
}

impl Pilot {
    /// Drive an existing session. The session is started if it was not.
    pub fn new(mut session: Session) -> Self {
        if let Err(err) = session.start() {
            warn!(session = session.id(), error = %err, "pilot could not start session");
        }
        Self { session }
    }

    /// Realize `source` as the root of a fresh session. Property diagnostics
    /// are logged and do not fail the pilot.
    pub fn from_source(source: &str) -> Result<Self> {
        Self::with_source(Session::new(1), source)
    }

    /// Realize `source` as the root of `session`.
    pub fn with_source(mut session: Session, source: &str) -> Result<Self> {
        let realized = session.realize_source(source)?;
        for diagnostic in &realized.diagnostics {
            warn!(session = session.id(), error = %diagnostic, "pilot source diagnostic");
        }
        session.set_root(realized.root)?;
        Ok(Self::new(session))
    }

    // ── Query ────────────────────────────────────────────────────────

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    pub fn root(&self) -> Option<ViewId> {
        self.session.root()
    }

    /// View by identifier path from the root.
    pub fn view(&self, id: &str) -> Result<ViewId> {
        self.session
            .view_by_id(id)
            .ok_or_else(|| Error::ViewNotFound(id.to_owned()))
    }

    /// Read `tag` of the view with identifier `id`.
    pub fn get(&self, id: &str, tag: &str) -> Result<Value> {
        self.session.get(self.view(id)?, tag)
    }

    /// Assign `tag` on the view with identifier `id`.
    pub fn set(&mut self, id: &str, tag: &str, value: impl Into<Value>) -> Result<bool> {
        let view = self.view(id)?;
        self.session.set(view, tag, value)
    }

    /// Snapshot of the whole tree.
    pub fn snapshot(&self) -> Result<ViewSnapshot> {
        let root = self
            .root()
            .ok_or_else(|| Error::ViewNotFound("root".into()))?;
        self.session.snapshot(root)
    }

    // ── Events ───────────────────────────────────────────────────────

    /// Send a renderer event to the view with identifier `id`, then run
    /// queued events. Returns the number of handlers run for this event.
    pub fn emit(&mut self, id: &str, tag: EventTag, payload: EventPayload) -> Result<usize> {
        let ran = self.session.handle_event(InboundEvent::new(tag, id, payload))?;
        self.session.process_events();
        Ok(ran)
    }

    /// Primary-button click at the view's origin.
    pub fn click(&mut self, id: &str) -> Result<usize> {
        let mouse = MouseEvent::at(Point::default());
        self.emit(id, EventTag::Click, EventPayload::Mouse(mouse))
    }

    pub fn check(&mut self, id: &str, checked: bool) -> Result<usize> {
        self.emit(id, EventTag::CheckboxChanged, EventPayload::Bool(checked))
    }

    pub fn type_text(&mut self, id: &str, text: &str) -> Result<usize> {
        self.emit(id, EventTag::EditTextChanged, EventPayload::Text(text.to_owned()))
    }

    /// Choose item `index` of a drop-down list.
    pub fn select(&mut self, id: &str, index: i64) -> Result<usize> {
        self.emit(id, EventTag::DropDownChanged, EventPayload::Index(index))
    }

    pub fn pick_number(&mut self, id: &str, number: f64) -> Result<usize> {
        self.emit(id, EventTag::NumberChanged, EventPayload::Number(number))
    }

    pub fn pick_color(&mut self, id: &str, color: Color) -> Result<usize> {
        self.emit(id, EventTag::ColorChanged, EventPayload::Color(color))
    }

    // ── Animations ───────────────────────────────────────────────────

    /// Report that animation `animation` started on the view `id`.
    pub fn start_animation(&mut self, id: &str, animation: &str) -> Result<usize> {
        self.emit(id, EventTag::AnimationStart, EventPayload::Animation(animation.to_owned()))
    }

    /// Play animation `animation` on view `id` to completion the way a
    /// renderer would: start (if pending), one iteration event per declared
    /// iteration, then end. An infinite animation gets start and end only.
    /// Returns the number of handler runs across all reported events.
    pub fn finish_animation(&mut self, id: &str, animation: &str) -> Result<usize> {
        let view = self.view(id)?;
        let run = self
            .session
            .animation_runs(view)
            .iter()
            .find(|run| run.id() == animation && run.is_active())
            .cloned()
            .ok_or_else(|| Error::ViewNotFound(format!("{id}: animation {animation}")))?;

        let payload = || EventPayload::Animation(animation.to_owned());
        let mut ran = 0;
        if run.state == crate::animation::PlayState::Pending {
            ran += self.emit(id, EventTag::AnimationStart, payload())?;
        }
        if !run.animation.is_infinite() {
            let remaining = run.animation.iteration_count - i64::from(run.iterations);
            for _ in 0..remaining.max(0) {
                ran += self.emit(id, EventTag::AnimationIteration, payload())?;
            }
        }
        ran += self.emit(id, EventTag::AnimationEnd, payload())?;
        Ok(ran)
    }

    // ── Processing ───────────────────────────────────────────────────

    /// Resolve every pending resource load.
    pub fn resolve_loads(&mut self) -> usize {
        self.session.resolve_loads()
    }

    /// Run queued events, then pending loads.
    pub fn process(&mut self) -> usize {
        let events = self.session.process_events();
        events + self.session.resolve_loads()
    }

    /// Take every outbound mutation emitted so far.
    pub fn drain(&mut self) -> Vec<Mutation> {
        self.session.take_mutations()
    }

    /// Operation names of the drained mutations.
    pub fn drain_ops(&mut self) -> Vec<&'static str> {
        self.drain().iter().map(Mutation::op).collect()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Handler;
    use crate::session::{Phase, ResourceLocator, ResourceRegistry};
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    const FORM: &str = "ListLayout { content = [
        Checkbox { id = agree },
        EditView { id = name },
        DropDownList { id = size, items = [small, large] },
        Button { id = ok, content = \"OK\" },
    ] }";

    // ── Construction ─────────────────────────────────────────────────

    #[test]
    fn from_source_starts_live_session() {
        let mut pilot = Pilot::from_source(FORM).unwrap();
        assert_eq!(pilot.session().phase(), Phase::Active);
        let ops = pilot.drain_ops();
        assert_eq!(ops.len(), 6);
        assert!(ops.iter().all(|op| *op == "create-view"));
    }

    #[test]
    fn from_source_rejects_unknown_kind() {
        assert!(matches!(Pilot::from_source("Nope { }"), Err(Error::UnknownKind(_))));
    }

    // ── Events ───────────────────────────────────────────────────────

    #[test]
    fn value_events_update_model() {
        let mut pilot = Pilot::from_source(FORM).unwrap();
        pilot.drain();
        pilot.check("agree", true).unwrap();
        pilot.type_text("name", "Ada").unwrap();
        pilot.select("size", 1).unwrap();
        assert_eq!(pilot.get("agree", "checked").unwrap(), Value::Bool(true));
        assert_eq!(pilot.get("name", "text").unwrap(), Value::Str("Ada".into()));
        assert_eq!(pilot.get("size", "current").unwrap(), Value::Int(1));
        assert!(pilot.drain().is_empty());
    }

    #[test]
    fn click_runs_handlers() {
        let mut pilot = Pilot::from_source(FORM).unwrap();
        let ok = pilot.view("ok").unwrap();
        pilot
            .session_mut()
            .on(ok, EventTag::Click, Handler::view(|s, v| {
                s.set(v, "disabled", true).unwrap();
            }));
        assert_eq!(pilot.click("ok").unwrap(), 1);
        assert_eq!(pilot.get("ok", "disabled").unwrap(), Value::Bool(true));
    }

    #[test]
    fn unknown_id_is_not_found() {
        let mut pilot = Pilot::from_source(FORM).unwrap();
        assert!(matches!(pilot.click("ghost"), Err(Error::ViewNotFound(_))));
    }

    // ── Loads ────────────────────────────────────────────────────────

    #[test]
    fn loads_resolve_on_demand() {
        let registry = Arc::new(ResourceRegistry::new().with("logo.svg", b"<svg/>".to_vec()));
        let session = Session::new(1).with_locator(ResourceLocator::Local(registry));
        let mut pilot = Pilot::with_source(session, "ImageView { id = logo }").unwrap();
        let seen = Arc::new(Mutex::new(None));
        let log = seen.clone();
        pilot.session_mut().load_resource("logo.svg", move |_, result| {
            *log.lock().unwrap() = Some(result.map(|r| r.data.len()).ok());
        });
        assert!(seen.lock().unwrap().is_none());
        assert_eq!(pilot.resolve_loads(), 1);
        assert_eq!(*seen.lock().unwrap(), Some(Some(6)));
    }
}
