//! Animation engine: playback bookkeeping for the `animation` property.
//!
//! Assigning a new animation list records one run per animation and, for
//! live views, tells the renderer to begin playback. The renderer reports
//! start, iteration, end and cancel back as events; the engine advances
//! the matching run and drops reports that no longer match any run.

use slotmap::SecondaryMap;
use tracing::{debug, warn};

use crate::event::{EventPayload, EventTag};
use crate::session::{Mutation, Session};
use crate::value::{Animation, Value};
use crate::view::ViewId;

/// Tag of the animation list property.
pub const ANIMATION_TAG: &str = "animation";
/// Tag of the pause flag.
pub const PAUSED_TAG: &str = "animation-paused";

// ---------------------------------------------------------------------------
// AnimationRun
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayState {
    /// Sent to the renderer, not yet started.
    Pending,
    Running,
    Finished,
    Cancelled,
}

/// Playback state of one assigned animation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationRun {
    pub animation: Animation,
    pub state: PlayState,
    /// Completed iterations reported so far.
    pub iterations: u32,
    pub paused: bool,
}

impl AnimationRun {
    fn new(animation: Animation, paused: bool) -> Self {
        Self {
            animation,
            state: PlayState::Pending,
            iterations: 0,
            paused,
        }
    }

    pub fn id(&self) -> &str {
        &self.animation.id
    }

    /// Pending or running.
    pub fn is_active(&self) -> bool {
        matches!(self.state, PlayState::Pending | PlayState::Running)
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlayState::Running && !self.paused
    }
}

// ---------------------------------------------------------------------------
// AnimationEngine
// ---------------------------------------------------------------------------

/// Runs per view.
#[derive(Debug, Default)]
pub struct AnimationEngine {
    runs: SecondaryMap<ViewId, Vec<AnimationRun>>,
    /// Counter behind the ids of unnamed animations.
    next_id: u64,
}

impl AnimationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn runs(&self, view: ViewId) -> &[AnimationRun] {
        self.runs.get(view).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn active(&self, view: ViewId) -> impl Iterator<Item = &AnimationRun> {
        self.runs(view).iter().filter(|run| run.is_active())
    }

    /// Replace the runs of `view`. Unnamed animations get an id unique to
    /// this engine. Returns the animations that were still active and are
    /// now cancelled.
    pub(crate) fn replace(&mut self, view: ViewId, animations: Vec<Animation>, paused: bool) -> Vec<Animation> {
        let old = self.runs.remove(view).unwrap_or_default();
        let cancelled = old
            .into_iter()
            .filter(AnimationRun::is_active)
            .map(|run| run.animation)
            .collect();
        if !animations.is_empty() {
            let runs = animations
                .into_iter()
                .map(|animation| {
                    let animation = self.name(animation);
                    AnimationRun::new(animation, paused)
                })
                .collect();
            self.runs.insert(view, runs);
        }
        cancelled
    }

    fn name(&mut self, mut animation: Animation) -> Animation {
        if !animation.is_named() {
            self.next_id += 1;
            animation.id = format!("animation{:08}", self.next_id);
        }
        animation
    }

    /// Set the pause flag on every active run. Elapsed progress is kept.
    pub(crate) fn set_paused(&mut self, view: ViewId, paused: bool) -> usize {
        let Some(runs) = self.runs.get_mut(view) else {
            return 0;
        };
        let mut changed = 0;
        for run in runs.iter_mut().filter(|r| r.is_active() && r.paused != paused) {
            run.paused = paused;
            changed += 1;
        }
        changed
    }

    /// Advance the run named by a renderer animation event. Returns `false`
    /// for a stale report (unknown id or a run in the wrong state).
    pub(crate) fn observe(&mut self, view: ViewId, tag: EventTag, id: &str) -> bool {
        let Some(run) = self
            .runs
            .get_mut(view)
            .and_then(|runs| runs.iter_mut().find(|r| r.id() == id && r.is_active()))
        else {
            return false;
        };
        match (tag, run.state) {
            (EventTag::AnimationStart, PlayState::Pending) => run.state = PlayState::Running,
            (EventTag::AnimationIteration, PlayState::Running) => {
                let count = run.animation.iteration_count;
                if !run.animation.is_infinite() && i64::from(run.iterations) >= count {
                    return false;
                }
                run.iterations += 1;
            }
            (EventTag::AnimationEnd, PlayState::Running) => run.state = PlayState::Finished,
            (EventTag::AnimationCancel, _) => run.state = PlayState::Cancelled,
            _ => return false,
        }
        true
    }

    /// Restart active runs from the top (the renderer lost them).
    fn rewind(&mut self, view: ViewId) {
        if let Some(runs) = self.runs.get_mut(view) {
            for run in runs.iter_mut().filter(|r| r.is_active()) {
                run.state = PlayState::Pending;
                run.iterations = 0;
            }
        }
    }

    pub(crate) fn remove_view(&mut self, view: ViewId) {
        self.runs.remove(view);
    }

    pub(crate) fn clear(&mut self) {
        self.runs.clear();
    }
}

// ---------------------------------------------------------------------------
// Session glue
// ---------------------------------------------------------------------------

impl Session {
    /// Playback state of the animations assigned to `view`.
    pub fn animation_runs(&self, view: ViewId) -> &[AnimationRun] {
        self.animations.runs(view)
    }

    /// The `animation` property of `view` changed to `value`.
    pub(crate) fn replace_animations(&mut self, view: ViewId, value: &Value) {
        let animations: Vec<Animation> = value
            .as_list()
            .unwrap_or(&[])
            .iter()
            .filter_map(|item| item.as_animation().cloned())
            .collect();
        let paused = self
            .tree
            .get(view)
            .and_then(|data| data.props.get(PAUSED_TAG))
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let cancelled = self.animations.replace(view, animations, paused);
        let live = self.live_handle(view);
        for animation in cancelled {
            debug!(session = self.id(), ?view, animation = %animation.id, "animation cancelled");
            if let Some(handle) = live {
                self.outbound.push(Mutation::CancelAnimation {
                    view: handle,
                    tag: ANIMATION_TAG.into(),
                    id: animation.id.clone(),
                });
            }
            self.dispatch(view, EventTag::AnimationCancel, &EventPayload::Animation(animation.id));
        }
        self.announce_animations(view);
    }

    pub(crate) fn pause_animations(&mut self, view: ViewId, paused: bool) {
        let changed = self.animations.set_paused(view, paused);
        debug!(session = self.id(), ?view, paused, changed, "animation pause toggled");
    }

    /// Emit `begin-animation` for every active run of a live view.
    pub(crate) fn announce_animations(&mut self, view: ViewId) {
        let Some(handle) = self.live_handle(view) else {
            return;
        };
        self.animations.rewind(view);
        let begins: Vec<Mutation> = self
            .animations
            .active(view)
            .map(|run| Mutation::BeginAnimation {
                view: handle,
                tag: ANIMATION_TAG.into(),
                animation: run.animation.clone(),
            })
            .collect();
        self.outbound.extend(begins);
    }

    /// Apply a renderer animation event. Returns `false` if it was stale.
    pub(crate) fn observe_animation(&mut self, view: ViewId, tag: EventTag, payload: &EventPayload) -> bool {
        let Some(id) = payload.animation_id() else {
            return false;
        };
        let accepted = self.animations.observe(view, tag, id);
        if !accepted {
            warn!(session = self.id(), ?view, event = %tag, animation = id, "stale animation event dropped");
        }
        accepted
    }
}
