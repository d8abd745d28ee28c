//! Process-wide configuration and the multi-session host.
//!
//! [`AppConfig`] carries startup settings. [`SessionHost`] runs every
//! session on its own tokio task: lifecycle commands and renderer events
//! reach the task through an unbounded channel, and outbound mutations
//! leave it through a bounded one. Within a session everything is
//! sequential; sessions run independently of each other.

use std::collections::HashMap;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::event::InboundEvent;
use crate::session::{ClientInfo, Mutation, ResourceLocator, Session};
use crate::view::ViewFactory;

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Startup configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Address the transport listens on.
    pub bind_address: String,
    /// Resource name of the application icon.
    pub icon: Option<String>,
    pub title: Option<String>,
    /// Theme of new sessions.
    pub dark_theme: bool,
    /// Concurrent session limit; 0 means unlimited.
    pub max_sessions: usize,
    /// Outbound mutations buffered per session before the task waits.
    pub outbound_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".into(),
            icon: None,
            title: None,
            dark_theme: false,
            max_sessions: 0,
            outbound_capacity: 1024,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bind address (builder).
    pub fn with_bind_address(mut self, address: impl Into<String>) -> Self {
        self.bind_address = address.into();
        self
    }

    /// Set the icon resource (builder).
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Set the title (builder).
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_dark_theme(mut self, dark: bool) -> Self {
        self.dark_theme = dark;
        self
    }

    pub fn with_max_sessions(mut self, max: usize) -> Self {
        self.max_sessions = max;
        self
    }

    pub fn with_outbound_capacity(mut self, capacity: usize) -> Self {
        self.outbound_capacity = capacity;
        self
    }

    /// Defaults overlaid with `RUI_BIND`, `RUI_ICON`, `RUI_TITLE` and
    /// `RUI_DARK_THEME`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(bind) = lookup("RUI_BIND") {
            config.bind_address = bind;
        }
        if let Some(icon) = lookup("RUI_ICON").filter(|s| !s.is_empty()) {
            config.icon = Some(icon);
        }
        if let Some(title) = lookup("RUI_TITLE") {
            config.title = Some(title);
        }
        if let Some(dark) = lookup("RUI_DARK_THEME") {
            config.dark_theme = parse_flag("RUI_DARK_THEME", &dark)?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the host cannot run with.
    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;
        if self.outbound_capacity == 0 {
            return Err(Error::Config("outbound capacity must be at least 1".into()));
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_address
            .parse()
            .map_err(|err| Error::Config(format!("bind address \"{}\": {err}", self.bind_address)))
    }
}

fn parse_flag(key: &str, text: &str) -> Result<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(Error::Config(format!("{key}: expected a boolean, found \"{other}\""))),
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// A message from the transport to a running session.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Event(InboundEvent),
    Pause,
    Resume,
    Disconnect,
    Reconnect,
    Finish,
}

/// Builds the initial content of a new session.
pub type Setup = Arc<dyn Fn(&mut Session) -> Result<()> + Send + Sync>;

struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
    task: JoinHandle<()>,
}

// ---------------------------------------------------------------------------
// SessionHost
// ---------------------------------------------------------------------------

/// Owns the running sessions of one application.
pub struct SessionHost {
    config: AppConfig,
    factory: Arc<ViewFactory>,
    locator: ResourceLocator,
    setup: Setup,
    sessions: HashMap<u64, SessionHandle>,
    next_id: u64,
}

impl SessionHost {
    /// A host that builds every new session with `setup`.
    pub fn new<F>(config: AppConfig, setup: F) -> Result<Self>
    where
        F: Fn(&mut Session) -> Result<()> + Send + Sync + 'static,
    {
        config.validate()?;
        Ok(Self {
            config,
            factory: Arc::new(ViewFactory::new()),
            locator: ResourceLocator::Global,
            setup: Arc::new(setup),
            sessions: HashMap::new(),
            next_id: 1,
        })
    }

    /// Custom view kinds shared by all sessions (builder).
    pub fn with_factory(mut self, factory: ViewFactory) -> Self {
        self.factory = Arc::new(factory);
        self
    }

    pub fn with_locator(mut self, locator: ResourceLocator) -> Self {
        self.locator = locator;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Sessions whose task is still running.
    pub fn session_count(&self) -> usize {
        self.sessions.values().filter(|h| !h.task.is_finished()).count()
    }

    /// Create, build and start a session on its own task. Returns its id and
    /// the receiving end of its outbound stream. A failing setup destroys
    /// the session before it starts.
    ///
    /// Must be called inside a tokio runtime.
    pub fn open(&mut self, client: ClientInfo) -> Result<(u64, mpsc::Receiver<Mutation>)> {
        self.reap();
        if self.config.max_sessions > 0 && self.sessions.len() >= self.config.max_sessions {
            return Err(Error::Config(format!(
                "session limit of {} reached",
                self.config.max_sessions
            )));
        }

        let id = self.next_id;
        self.next_id += 1;
        let mut session = Session::new(id)
            .with_factory(self.factory.clone())
            .with_locator(self.locator.clone())
            .with_dark_theme(self.config.dark_theme)
            .with_client(client);
        if let Some(icon) = &self.config.icon {
            if let Err(err) = session.locator.resolve(icon) {
                warn!(session = id, error = %err, "application icon unavailable");
            }
        }
        if let Err(err) = (self.setup)(&mut session) {
            warn!(session = id, error = %err, "session setup failed");
            session.destroy();
            return Err(err);
        }
        session.start()?;

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (outbound_tx, outbound_rx) = mpsc::channel(self.config.outbound_capacity);
        let task = tokio::spawn(run_session(session, command_rx, outbound_tx));
        self.sessions.insert(
            id,
            SessionHandle {
                commands: command_tx,
                task,
            },
        );
        info!(session = id, "session opened");
        Ok((id, outbound_rx))
    }

    /// Queue `command` for session `id`.
    pub fn send(&self, id: u64, command: Command) -> Result<()> {
        let handle = self.sessions.get(&id).ok_or(Error::SessionClosed(id))?;
        handle
            .commands
            .send(command)
            .map_err(|_| Error::SessionClosed(id))
    }

    pub fn event(&self, id: u64, event: InboundEvent) -> Result<()> {
        self.send(id, Command::Event(event))
    }

    /// Finish session `id` and wait for its task to end.
    pub async fn finish(&mut self, id: u64) -> Result<()> {
        let handle = self.sessions.remove(&id).ok_or(Error::SessionClosed(id))?;
        // The task may already have ended on its own.
        let _ = handle.commands.send(Command::Finish);
        if let Err(err) = handle.task.await {
            warn!(session = id, error = %err, "session task failed");
        }
        Ok(())
    }

    /// Finish every session.
    pub async fn shutdown(mut self) {
        let ids: Vec<u64> = self.sessions.keys().copied().collect();
        for id in ids {
            let _ = self.finish(id).await;
        }
        info!("host shut down");
    }

    /// Forget sessions whose task has ended.
    fn reap(&mut self) {
        self.sessions.retain(|_, handle| !handle.task.is_finished());
    }
}

/// The task body of one session.
async fn run_session(
    mut session: Session,
    mut commands: mpsc::UnboundedReceiver<Command>,
    outbound: mpsc::Sender<Mutation>,
) {
    let id = session.id();
    flush(&mut session, &outbound).await;
    while let Some(command) = commands.recv().await {
        let result = match command {
            Command::Event(event) => session.handle_event(event).map(|_| ()),
            Command::Pause => session.pause().map(drop),
            Command::Resume => session.resume().map(drop),
            Command::Disconnect => session.disconnect().map(drop),
            Command::Reconnect => session.reconnect().map(|changed| {
                if changed {
                    session.replay();
                }
            }),
            Command::Finish => session.finish().map(drop),
        };
        match result {
            Ok(()) => {}
            Err(Error::SessionClosed(_)) => debug!(session = id, "command for finished session dropped"),
            Err(err) => warn!(session = id, error = %err, "command failed"),
        }
        session.process_events();
        session.resolve_loads();
        flush(&mut session, &outbound).await;
        if session.phase().is_finished() {
            break;
        }
    }
    if !session.phase().is_finished() {
        // Transport dropped its sender without finishing.
        let _ = session.finish();
    }
    info!(session = id, "session closed");
}

async fn flush(session: &mut Session, outbound: &mpsc::Sender<Mutation>) {
    for mutation in session.take_mutations() {
        if outbound.send(mutation).await.is_err() {
            debug!(session = session.id(), "outbound receiver gone; mutations dropped");
            return;
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
