//! Development session: live dev servers and reload coordination.
//!
//! A [`DevSession`] is owned by the invoking command and handed to every
//! factory and hook that needs it. It records which targets run a dev
//! server, publishes their listening URLs, and fans out reload and restart
//! requests when other targets finish rebuilding.
//!
//! Each target name is an independent slot. Registering the same name again
//! (e.g. after a dev-server restart) replaces the previous entry. Entries are
//! never removed; they live as long as the session.

pub mod hooks;

use crate::define::DefineKeySet;
use hooks::{DevServerHandle, HmrPayload};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, Weak};
use std::time::Duration;
use tokio::sync::{broadcast, Notify};
use tracing::{debug, info};

/// Event channel capacity. Slow subscribers observe `Lagged` past this.
const EVENT_CAPACITY: usize = 64;

/// Something that happened in the session, for the host to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A target's dev server started listening.
    ServerListening { target: String, url: String },
    /// A full reload was pushed to this many live servers.
    Reloaded { servers: usize },
    /// The application process should be restarted.
    Restart,
}

/// One registered dev server.
pub struct DevServerEntry {
    pub server: Arc<dyn DevServerHandle>,
    pub port: Option<u16>,
    stopped: bool,
}

impl std::fmt::Debug for DevServerEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DevServerEntry")
            .field("port", &self.port)
            .field("stopped", &self.stopped)
            .finish_non_exhaustive()
    }
}

pub(crate) struct SessionInner {
    servers: RwLock<BTreeMap<String, DevServerEntry>>,
    /// Target name -> listening URL.
    urls: RwLock<BTreeMap<String, String>>,
    listening: Notify,
    events: broadcast::Sender<SessionEvent>,
    mirror_process_env: bool,
}

/// Shared dev-server registry for one build session.
///
/// Cloning is cheap; clones share the same registry.
#[derive(Clone)]
pub struct DevSession {
    inner: Arc<SessionInner>,
}

impl std::fmt::Debug for DevSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DevSession")
            .field("servers", &self.server_names())
            .field("urls", &*self.inner.urls.read().unwrap())
            .field("mirror_process_env", &self.inner.mirror_process_env)
            .finish()
    }
}

impl Default for DevSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DevSession {
    /// A session that keeps published values to itself.
    #[must_use]
    pub fn new() -> Self {
        Self::build(false)
    }

    /// A session that also writes published values into the process
    /// environment, for a main process spawned later by the host.
    #[must_use]
    pub fn with_process_env() -> Self {
        Self::build(true)
    }

    fn build(mirror_process_env: bool) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(SessionInner {
                servers: RwLock::new(BTreeMap::new()),
                urls: RwLock::new(BTreeMap::new()),
                listening: Notify::new(),
                events,
                mirror_process_env,
            }),
        }
    }

    pub(crate) fn downgrade(&self) -> Weak<SessionInner> {
        Arc::downgrade(&self.inner)
    }

    pub(crate) fn upgrade(weak: &Weak<SessionInner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    /// Register (or replace) the dev server for `target`.
    ///
    /// A server that already reports a port is published immediately.
    pub fn register_server(&self, target: &str, server: Arc<dyn DevServerHandle>) {
        let port = server.port();
        self.inner.servers.write().unwrap().insert(
            target.to_string(),
            DevServerEntry {
                server,
                port,
                stopped: false,
            },
        );
        info!(target_name = target, "Registered dev server");

        if let Some(port) = port {
            self.mark_listening(target, port);
        }
    }

    /// Record that `target`'s server listens on `port` and publish its URL.
    pub fn mark_listening(&self, target: &str, port: u16) {
        let url = format!("http://localhost:{port}");

        if let Some(entry) = self.inner.servers.write().unwrap().get_mut(target) {
            entry.port = Some(port);
        }
        self.inner
            .urls
            .write()
            .unwrap()
            .insert(target.to_string(), url.clone());

        if self.inner.mirror_process_env {
            let key = DefineKeySet::for_target(target).dev_server_url;
            std::env::set_var(&key, &url);
            debug!(key = %key, url = %url, "Published dev server URL to process env");
        }

        info!(target_name = target, url = %url, "Dev server listening");
        self.inner.listening.notify_waiters();
        let _ = self.inner.events.send(SessionEvent::ServerListening {
            target: target.to_string(),
            url,
        });
    }

    /// Listening URL of `target`, if any.
    #[must_use]
    pub fn url(&self, target: &str) -> Option<String> {
        self.inner.urls.read().unwrap().get(target).cloned()
    }

    /// Point-in-time copy of the published URLs.
    #[must_use]
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            urls: self.inner.urls.read().unwrap().clone(),
        }
    }

    /// Published values keyed by their environment name
    /// (`<TARGET>_VITE_DEV_SERVER_URL`).
    #[must_use]
    pub fn published_env(&self) -> BTreeMap<String, String> {
        self.inner
            .urls
            .read()
            .unwrap()
            .iter()
            .map(|(name, url)| (DefineKeySet::for_target(name).dev_server_url, url.clone()))
            .collect()
    }

    /// Names of every registered server.
    #[must_use]
    pub fn server_names(&self) -> Vec<String> {
        self.inner.servers.read().unwrap().keys().cloned().collect()
    }

    /// Wait until `target` publishes a URL, up to `timeout`.
    ///
    /// Returns `None` on timeout; callers treat that as "no live server".
    pub async fn wait_for_url(&self, target: &str, timeout: Duration) -> Option<String> {
        let wait = async {
            loop {
                // Created before the check so a publish in between is not missed.
                let notified = self.inner.listening.notified();
                if let Some(url) = self.url(target) {
                    return url;
                }
                notified.await;
            }
        };
        tokio::time::timeout(timeout, wait).await.ok()
    }

    /// Ask every live server to fully reload its clients.
    ///
    /// Returns the number of servers notified.
    pub fn reload_all(&self) -> usize {
        let live: Vec<(String, Arc<dyn DevServerHandle>)> = self
            .inner
            .servers
            .read()
            .unwrap()
            .iter()
            .filter(|(_, e)| !e.stopped)
            .map(|(name, e)| (name.clone(), Arc::clone(&e.server)))
            .collect();

        for (name, server) in &live {
            debug!(target_name = %name, "Sending full reload");
            server.send(&HmrPayload::FullReload);
        }

        info!(servers = live.len(), "Full reload requested");
        let _ = self.inner.events.send(SessionEvent::Reloaded {
            servers: live.len(),
        });
        live.len()
    }

    /// Ask the host to restart the application process.
    pub fn request_restart(&self) {
        info!("Application restart requested");
        let _ = self.inner.events.send(SessionEvent::Restart);
    }

    /// Subscribe to session events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    /// Stop `target`'s dev server.
    ///
    /// Returns `true` if this call stopped it; stopping an unknown or already
    /// stopped target is a no-op returning `false`.
    pub fn stop(&self, target: &str) -> bool {
        let server = {
            let mut servers = self.inner.servers.write().unwrap();
            match servers.get_mut(target) {
                Some(entry) if !entry.stopped => {
                    entry.stopped = true;
                    Arc::clone(&entry.server)
                }
                _ => return false,
            }
        };
        server.close();
        info!(target_name = target, "Stopped dev server");
        true
    }

    /// Stop every registered server. Returns how many were actually stopped.
    pub fn stop_all(&self) -> usize {
        self.server_names()
            .iter()
            .filter(|name| self.stop(name))
            .count()
    }
}

/// Published dev-server URLs at one point in time, keyed by target name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrySnapshot {
    urls: BTreeMap<String, String>,
}

impl RegistrySnapshot {
    pub fn from_urls<I, K, V>(urls: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            urls: urls
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Read published URLs back from the process environment.
    ///
    /// Missing or non-unicode values mean "no live server" for that target.
    pub fn from_env<S: AsRef<str>>(targets: &[S]) -> Self {
        let urls = targets
            .iter()
            .filter_map(|name| {
                let name = name.as_ref();
                let key = DefineKeySet::for_target(name).dev_server_url;
                std::env::var(key).ok().map(|url| (name.to_string(), url))
            })
            .collect();
        Self { urls }
    }

    /// Fill targets missing here from `fallback`.
    #[must_use]
    pub fn with_fallback(mut self, fallback: RegistrySnapshot) -> Self {
        for (name, url) in fallback.urls {
            self.urls.entry(name).or_insert(url);
        }
        self
    }

    #[must_use]
    pub fn url(&self, target: &str) -> Option<&str> {
        self.urls.get(target).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
