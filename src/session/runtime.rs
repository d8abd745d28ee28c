//! The per-client session: view tree, registries and the outbound stream.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::lifecycle::{Phase, SessionListener};
use super::mutation::Mutation;
use super::resources::{PendingLoads, ResourceLocator};
use super::styles::StyleSet;
use crate::animation::AnimationEngine;
use crate::error::{Error, Result};
use crate::event::{EventTag, Handler, HandlerId, HandlerRegistry, InboundEvent};
use crate::property::ListenerRegistry;
use crate::view::{ViewData, ViewFactory, ViewId, ViewTree};

/// What the client reported when it connected.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientInfo {
    pub user_agent: String,
    pub remote_addr: String,
    pub language: String,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Runtime context of one client.
///
/// Owns the view tree and everything keyed by its views. All mutation of a
/// session happens through `&mut self`, one call at a time.
pub struct Session {
    id: u64,
    pub(crate) tree: ViewTree,
    dark_theme: bool,
    client: ClientInfo,
    pub(crate) locator: ResourceLocator,
    pub(crate) factory: Arc<ViewFactory>,
    pub(crate) outbound: Vec<Mutation>,
    pub(crate) handlers: HandlerRegistry,
    pub(crate) listeners: ListenerRegistry,
    pub(crate) styles: StyleSet,
    pub(crate) phase: Phase,
    pub(crate) animations: AnimationEngine,
    pub(crate) loads: PendingLoads,
    pub(crate) inbound: VecDeque<InboundEvent>,
    pub(crate) listener: Option<Box<dyn SessionListener>>,
    next_handle: u64,
}

impl Session {
    /// A session with the built-in kinds and the global resource registry.
    pub fn new(id: u64) -> Self {
        Self {
            id,
            tree: ViewTree::new(),
            dark_theme: false,
            client: ClientInfo::default(),
            locator: ResourceLocator::Global,
            factory: Arc::new(ViewFactory::new()),
            outbound: Vec::new(),
            handlers: HandlerRegistry::new(),
            listeners: ListenerRegistry::new(),
            styles: StyleSet::new(),
            phase: Phase::Created,
            animations: AnimationEngine::new(),
            loads: PendingLoads::default(),
            inbound: VecDeque::new(),
            listener: None,
            next_handle: 1,
        }
    }

    /// Use a shared kind registry (builder).
    pub fn with_factory(mut self, factory: Arc<ViewFactory>) -> Self {
        self.factory = factory;
        self
    }

    pub fn with_locator(mut self, locator: ResourceLocator) -> Self {
        self.locator = locator;
        self
    }

    pub fn with_dark_theme(mut self, dark: bool) -> Self {
        self.dark_theme = dark;
        self
    }

    pub fn with_client(mut self, client: ClientInfo) -> Self {
        self.client = client;
        self
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_dark_theme(&self) -> bool {
        self.dark_theme
    }

    pub fn set_dark_theme(&mut self, dark: bool) {
        self.dark_theme = dark;
    }

    pub fn client(&self) -> &ClientInfo {
        &self.client
    }

    pub fn tree(&self) -> &ViewTree {
        &self.tree
    }

    pub fn factory(&self) -> &ViewFactory {
        &self.factory
    }

    pub fn styles(&self) -> &StyleSet {
        &self.styles
    }

    pub fn styles_mut(&mut self) -> &mut StyleSet {
        &mut self.styles
    }

    pub fn root(&self) -> Option<ViewId> {
        self.tree.root()
    }

    pub fn view(&self, view: ViewId) -> Option<&ViewData> {
        self.tree.get(view)
    }

    pub(crate) fn data(&self, view: ViewId) -> Result<&ViewData> {
        self.tree
            .get(view)
            .ok_or_else(|| Error::ViewNotFound(format!("{view:?}")))
    }

    /// Renderer handle of `view` if the renderer knows it.
    pub(crate) fn live_handle(&self, view: ViewId) -> Option<u64> {
        self.tree.get(view).filter(|d| d.live).map(|d| d.handle)
    }

    // ── Outbound ─────────────────────────────────────────────────────

    /// Mutations not yet taken by the transport.
    pub fn pending_mutations(&self) -> &[Mutation] {
        &self.outbound
    }

    /// Take every pending mutation, in emission order.
    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.outbound)
    }

    // ── Handlers ─────────────────────────────────────────────────────

    /// Register `handler` for `tag` on `view`. Handlers run in registration
    /// order.
    pub fn on(&mut self, view: ViewId, tag: EventTag, handler: Handler) -> HandlerId {
        self.handlers.add(view, tag, handler)
    }

    pub fn off(&mut self, id: HandlerId) -> bool {
        self.handlers.remove(id)
    }

    pub fn handler_count(&self, view: ViewId, tag: EventTag) -> usize {
        self.handlers.count(view, tag)
    }

    // ── Views ────────────────────────────────────────────────────────

    /// Create a detached view of `kind`. Custom-kind defaults are applied;
    /// a default that fails to coerce is logged and skipped.
    pub fn create_view(&mut self, kind: &str) -> Result<ViewId> {
        let (view, defaults) = self.create_bare(kind)?;
        if let Some(defaults) = defaults {
            for attr in &defaults.attrs {
                if let Err(err) = self.set(view, &attr.name, attr.value.clone()) {
                    warn!(session = self.id, kind, error = %err, "custom kind default rejected");
                }
            }
        }
        Ok(view)
    }

    /// Insert an empty view of `kind`; returns its custom defaults, if any.
    pub(crate) fn create_bare(&mut self, kind: &str) -> Result<(ViewId, Option<crate::dsl::Node>)> {
        let resolved = self.factory.resolve(kind)?;
        let data = ViewData::new(resolved.kind, resolved.base.name, resolved.base.container)
            .with_handle(self.next_handle);
        let defaults = resolved.defaults.cloned();
        self.next_handle += 1;
        Ok((self.tree.insert(data), defaults))
    }

    /// Make the detached `view` the root. A previous root is removed.
    pub fn set_root(&mut self, view: ViewId) -> Result<()> {
        self.data(view)?;
        if self.tree.parent(view).is_some() {
            return Err(Error::InvalidTreeOperation(format!(
                "{view:?} is attached and cannot become the root"
            )));
        }
        if let Some(old) = self.tree.root() {
            if old == view {
                return Ok(());
            }
            self.remove_view(old)?;
        }
        self.tree.set_root(view);
        self.go_live(view);
        Ok(())
    }

    /// Append the detached `child` to `parent`.
    pub fn append_view(&mut self, parent: ViewId, child: ViewId) -> Result<usize> {
        self.insert_view(parent, None, child)
    }

    /// Insert the detached `child` into `parent` at `position` (clamped;
    /// `None` appends).
    pub fn insert_view(&mut self, parent: ViewId, position: Option<usize>, child: ViewId) -> Result<usize> {
        if self.tree.root() == Some(child) {
            return Err(Error::InvalidTreeOperation("the root cannot be re-parented".into()));
        }
        let position = self.tree.attach(child, parent, position)?;
        if self.tree.get(parent).is_some_and(|d| d.live) {
            self.go_live(child);
        }
        Ok(position)
    }

    /// Remove `view` and its subtree, with their handlers, listeners and
    /// animations.
    pub fn remove_view(&mut self, view: ViewId) -> Result<()> {
        let handle = self.data(view)?.handle;
        if self.live_handle(view).is_some() {
            self.outbound.push(Mutation::RemoveView { view: handle });
        }
        for (id, data) in self.tree.remove(view) {
            debug!(session = self.id, view = ?id, kind = %data.kind, "view removed");
            self.handlers.remove_view(id);
            self.listeners.remove_view(id);
            self.animations.remove_view(id);
        }
        Ok(())
    }

    /// Move `view` under `new_parent` at `position`. Moving a view into its
    /// own subtree is rejected and leaves the tree unchanged.
    pub fn move_view(&mut self, view: ViewId, new_parent: ViewId, position: Option<usize>) -> Result<usize> {
        if self.tree.root() == Some(view) {
            return Err(Error::InvalidTreeOperation("the root cannot be moved".into()));
        }
        let was_live = self.live_handle(view);
        let position = self.tree.move_to(view, new_parent, position)?;
        let parent_live = self.live_handle(new_parent);
        match (was_live, parent_live) {
            (Some(handle), Some(parent)) => self.outbound.push(Mutation::MoveView {
                view: handle,
                parent,
                position,
            }),
            (Some(handle), None) => {
                self.outbound.push(Mutation::RemoveView { view: handle });
                self.set_live(view, false);
            }
            (None, Some(_)) => self.go_live(view),
            (None, None) => {}
        }
        Ok(position)
    }

    /// Detach `view` from its parent without destroying it.
    pub fn detach_view(&mut self, view: ViewId) -> Result<()> {
        self.data(view)?;
        if let Some(handle) = self.live_handle(view) {
            self.outbound.push(Mutation::RemoveView { view: handle });
            self.set_live(view, false);
        }
        self.tree.detach(view);
        Ok(())
    }

    /// Mark the subtree of `top` live and describe it to the renderer,
    /// parents before children.
    fn go_live(&mut self, top: ViewId) {
        let order = self.tree.walk_depth_first(top);
        for &view in &order {
            let parent = self
                .tree
                .parent(view)
                .and_then(|p| self.tree.get(p))
                .map(|p| p.handle);
            let position = self.tree.position(view).unwrap_or(0);
            let Some(data) = self.tree.get_mut(view) else {
                continue;
            };
            data.live = true;
            self.outbound.push(Mutation::CreateView {
                view: data.handle,
                parent,
                position,
                kind: data.kind.clone(),
                id: data.id.clone(),
                props: data.props.clone(),
            });
        }
        for view in order {
            self.announce_animations(view);
        }
    }

    /// Describe the whole tree again for a renderer that lost its state
    /// (after a reconnect).
    pub fn replay(&mut self) {
        if let Some(root) = self.tree.root() {
            self.go_live(root);
        }
    }

    fn set_live(&mut self, top: ViewId, live: bool) {
        for view in self.tree.walk_depth_first(top) {
            if let Some(data) = self.tree.get_mut(view) {
                data.live = live;
            }
        }
    }

    /// Tear down after finish.
    pub(crate) fn destroy(&mut self) {
        let cancelled = self.cancel_loads();
        debug!(session = self.id, cancelled, "session destroyed");
        self.inbound.clear();
        self.handlers.clear();
        self.listeners.clear();
        self.animations.clear();
        self.tree.clear();
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("phase", &self.phase)
            .field("views", &self.tree.len())
            .field("outbound", &self.outbound.len())
            .finish_non_exhaustive()
    }
}
