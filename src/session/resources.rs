//! Resource registry and per-session resource loads.
//!
//! The process-wide registry is installed once before the first session and
//! never changes afterwards. Sessions resolve names through a
//! [`ResourceLocator`]; loads are queued and completed later, never inside
//! the call that requested them.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::{debug, warn};

use super::Session;
use crate::error::{Error, Result};

static GLOBAL: OnceLock<Arc<ResourceRegistry>> = OnceLock::new();

// ---------------------------------------------------------------------------
// ResourceRegistry
// ---------------------------------------------------------------------------

/// Named binary resources (images, media, fonts).
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    entries: HashMap<String, Arc<[u8]>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource (builder).
    pub fn with(mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.insert(name, data);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.entries.insert(name.into(), Arc::from(data.into()));
    }

    /// Look up by exact name, then by the last path segment
    /// (`"images/logo.png"` also answers `"logo.png"`).
    pub fn get(&self, name: &str) -> Option<Arc<[u8]>> {
        if let Some(data) = self.entries.get(name) {
            return Some(data.clone());
        }
        self.entries
            .iter()
            .find(|(key, _)| key.rsplit('/').next() == Some(name))
            .map(|(_, data)| data.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Publish as the process-wide registry. Fails if one is installed.
    pub fn install(self) -> Result<Arc<ResourceRegistry>> {
        let registry = Arc::new(self);
        GLOBAL
            .set(registry.clone())
            .map_err(|_| Error::Config("resource registry already installed".into()))?;
        debug!(resources = registry.len(), "resource registry installed");
        Ok(registry)
    }

    /// The installed process-wide registry.
    pub fn global() -> Option<Arc<ResourceRegistry>> {
        GLOBAL.get().cloned()
    }
}

// ---------------------------------------------------------------------------
// ResourceLocator
// ---------------------------------------------------------------------------

/// Where a session resolves resource names.
#[derive(Debug, Clone, Default)]
pub enum ResourceLocator {
    /// The process-wide registry.
    #[default]
    Global,
    /// A registry private to the session (tests, embedded hosts).
    Local(Arc<ResourceRegistry>),
}

impl ResourceLocator {
    pub fn resolve(&self, name: &str) -> Result<Resource> {
        let registry = match self {
            ResourceLocator::Global => ResourceRegistry::global().ok_or_else(|| Error::ResourceLoad {
                name: name.to_owned(),
                reason: "no resource registry installed".into(),
            })?,
            ResourceLocator::Local(registry) => registry.clone(),
        };
        let data = registry.get(name).ok_or_else(|| Error::ResourceLoad {
            name: name.to_owned(),
            reason: "not found".into(),
        })?;
        Ok(Resource {
            name: name.to_owned(),
            data,
        })
    }
}

/// A loaded resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub name: String,
    pub data: Arc<[u8]>,
}

// ---------------------------------------------------------------------------
// Pending loads
// ---------------------------------------------------------------------------

type LoadCallback = Box<dyn FnOnce(&mut Session, Result<Resource>) + Send>;

/// Identifies a queued load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadId(u64);

/// Loads waiting for completion, in request order.
#[derive(Default)]
pub(crate) struct PendingLoads {
    next: u64,
    queue: BTreeMap<u64, (String, LoadCallback)>,
}

impl fmt::Debug for PendingLoads {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingLoads")
            .field("pending", &self.queue.len())
            .finish()
    }
}

impl PendingLoads {
    fn push(&mut self, name: String, callback: LoadCallback) -> LoadId {
        self.next += 1;
        self.queue.insert(self.next, (name, callback));
        LoadId(self.next)
    }

    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }
}

impl Session {
    /// Queue a load of `name`. `callback` runs exactly once: with the
    /// resource when the load resolves, or with an error if it fails or the
    /// session ends first.
    pub fn load_resource<F>(&mut self, name: impl Into<String>, callback: F) -> LoadId
    where
        F: FnOnce(&mut Session, Result<Resource>) + Send + 'static,
    {
        let name = name.into();
        debug!(session = self.id(), resource = %name, "resource load queued");
        self.loads.push(name, Box::new(callback))
    }

    pub fn pending_loads(&self) -> usize {
        self.loads.len()
    }

    /// Complete every queued load. Loads queued by the callbacks themselves
    /// wait for the next call. Returns the number completed.
    pub fn resolve_loads(&mut self) -> usize {
        let queue = std::mem::take(&mut self.loads.queue);
        let count = queue.len();
        for (_, (name, callback)) in queue {
            let result = self.locator.resolve(&name);
            if let Err(err) = &result {
                warn!(session = self.id(), resource = %name, error = %err, "resource load failed");
            }
            callback(self, result);
        }
        count
    }

    /// Cancel one queued load; its callback receives a failure.
    pub fn cancel_load(&mut self, id: LoadId) -> bool {
        let Some((name, callback)) = self.loads.queue.remove(&id.0) else {
            return false;
        };
        callback(self, Err(cancelled(name)));
        true
    }

    /// Cancel every queued load. Returns the number cancelled.
    pub fn cancel_loads(&mut self) -> usize {
        let queue = std::mem::take(&mut self.loads.queue);
        let count = queue.len();
        for (_, (name, callback)) in queue {
            callback(self, Err(cancelled(name)));
        }
        count
    }
}

fn cancelled(name: String) -> Error {
    Error::ResourceLoad {
        name,
        reason: "cancelled".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn local_session() -> Session {
        let registry = ResourceRegistry::new()
            .with("images/logo.png", vec![1, 2, 3])
            .with("clip.mp4", vec![9]);
        Session::new(1).with_locator(ResourceLocator::Local(Arc::new(registry)))
    }

    // ── Registry ─────────────────────────────────────────────────────

    #[test]
    fn get_by_name_or_file_name() {
        let registry = ResourceRegistry::new().with("images/logo.png", vec![1]);
        assert!(registry.get("images/logo.png").is_some());
        assert!(registry.get("logo.png").is_some());
        assert!(registry.get("other.png").is_none());
    }

    #[test]
    fn local_locator_reports_missing() {
        let locator = ResourceLocator::Local(Arc::new(ResourceRegistry::new()));
        let err = locator.resolve("x.png").unwrap_err();
        assert!(matches!(err, Error::ResourceLoad { ref reason, .. } if reason == "not found"));
    }

    // ── Loads ────────────────────────────────────────────────────────

    #[test]
    fn loads_complete_on_resolve_not_before() {
        let mut session = local_session();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();
        session.load_resource("logo.png", move |_, result| {
            log.lock().unwrap().push(result.map(|r| r.data.len()).ok());
        });
        assert_eq!(session.pending_loads(), 1);
        assert!(seen.lock().unwrap().is_empty());

        assert_eq!(session.resolve_loads(), 1);
        assert_eq!(*seen.lock().unwrap(), vec![Some(3)]);
        assert_eq!(session.resolve_loads(), 0);
    }

    #[test]
    fn missing_resource_fails_once() {
        let mut session = local_session();
        let calls = Arc::new(Mutex::new(0));
        let counter = calls.clone();
        session.load_resource("nope.png", move |_, result| {
            assert!(result.is_err());
            *counter.lock().unwrap() += 1;
        });
        session.resolve_loads();
        session.resolve_loads();
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[test]
    fn cancel_delivers_failure() {
        let mut session = local_session();
        let seen = Arc::new(Mutex::new(None));
        let log = seen.clone();
        let id = session.load_resource("clip.mp4", move |_, result| {
            *log.lock().unwrap() = Some(result.is_err());
        });
        assert!(session.cancel_load(id));
        assert!(!session.cancel_load(id));
        assert_eq!(*seen.lock().unwrap(), Some(true));
    }

    #[test]
    fn cancel_all() {
        let mut session = local_session();
        session.load_resource("a", |_, _| {});
        session.load_resource("b", |_, _| {});
        assert_eq!(session.cancel_loads(), 2);
        assert_eq!(session.pending_loads(), 0);
    }
}
