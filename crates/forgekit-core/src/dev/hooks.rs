//! Plugin-shaped hooks handed to the bundler.
//!
//! The bundler calls [`BuildHook::configure_server`] when a dev server is
//! created and [`BuildHook::close_bundle`] after a (re)build has been written
//! out. Neither is guaranteed to be called: a plain production build never
//! creates a server, and the hooks must cope with that.

use super::DevSession;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

pub const EXPOSE_RENDERER_HOOK: &str = "forgekit:expose-renderer";
pub const HOT_RELOAD_HOOK: &str = "forgekit:hot-reload";
pub const HOT_RESTART_HOOK: &str = "forgekit:hot-restart";

/// Message pushed to dev-server clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum HmrPayload {
    FullReload,
}

/// The bundler's dev server, as seen by hooks.
pub trait DevServerHandle: Send + Sync {
    /// Bound port, once the server is listening.
    fn port(&self) -> Option<u16>;

    /// Run `callback` with the port once the server starts listening.
    fn on_listening(&self, callback: Box<dyn FnOnce(u16) + Send>);

    /// Push a payload to every connected client.
    fn send(&self, payload: &HmrPayload);

    /// Shut the server down.
    fn close(&self) {}
}

/// A bundler lifecycle hook. Every method defaults to a no-op.
pub trait BuildHook: Send + Sync {
    /// Hook name for debugging and serialized configs.
    fn name(&self) -> &str;

    /// Called once the bundler has created its dev server.
    fn configure_server(&self, _server: Arc<dyn DevServerHandle>) {}

    /// Called after the bundle has been written.
    fn close_bundle(&self) {}
}

/// Shared handle to a hook, storable in a [`ConfigValue`](crate::ConfigValue).
///
/// Two refs are equal only when they point at the same hook instance.
#[derive(Clone)]
pub struct HookRef(Arc<dyn BuildHook>);

impl HookRef {
    pub fn new(hook: impl BuildHook + 'static) -> Self {
        Self(Arc::new(hook))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.0.name()
    }

    pub fn configure_server(&self, server: Arc<dyn DevServerHandle>) {
        self.0.configure_server(server);
    }

    pub fn close_bundle(&self) {
        self.0.close_bundle();
    }
}

impl PartialEq for HookRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::as_ptr(&self.0).cast::<()>() == Arc::as_ptr(&other.0).cast::<()>()
    }
}

impl std::fmt::Debug for HookRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("HookRef").field(&self.name()).finish()
    }
}

/// Registers a renderer's dev server and publishes its URL once listening.
pub struct ExposeRenderer {
    target: String,
    session: DevSession,
}

impl ExposeRenderer {
    pub fn new(target: impl Into<String>, session: DevSession) -> Self {
        Self {
            target: target.into(),
            session,
        }
    }
}

impl BuildHook for ExposeRenderer {
    fn name(&self) -> &str {
        EXPOSE_RENDERER_HOOK
    }

    fn configure_server(&self, server: Arc<dyn DevServerHandle>) {
        self.session.register_server(&self.target, Arc::clone(&server));

        // The session stores the server, so the callback holds the session weakly.
        let session = self.session.downgrade();
        let target = self.target.clone();
        server.on_listening(Box::new(move |port| {
            if let Some(session) = DevSession::upgrade(&session) {
                session.mark_listening(&target, port);
            }
        }));
    }
}

/// What a rebuilt target asks for once its bundle is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildAction {
    /// Fully reload every live page (preload scripts changed).
    Reload,
    /// Restart the application process (main process changed).
    Restart,
}

/// Triggers a reload or restart after each rebuild.
pub struct HotRestart {
    action: RebuildAction,
    session: DevSession,
}

impl HotRestart {
    #[must_use]
    pub fn new(action: RebuildAction, session: DevSession) -> Self {
        Self { action, session }
    }
}

impl BuildHook for HotRestart {
    fn name(&self) -> &str {
        match self.action {
            RebuildAction::Reload => HOT_RELOAD_HOOK,
            RebuildAction::Restart => HOT_RESTART_HOOK,
        }
    }

    fn close_bundle(&self) {
        debug!(action = ?self.action, "Bundle closed");
        match self.action {
            RebuildAction::Reload => {
                self.session.reload_all();
            }
            RebuildAction::Restart => self.session.request_restart(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::tests_support::FakeServer;
    use super::*;
    use crate::dev::SessionEvent;

    #[test]
    fn test_payload_wire_format() {
        assert_eq!(
            serde_json::to_string(&HmrPayload::FullReload).unwrap(),
            r#"{"type":"full-reload"}"#
        );
    }

    #[test]
    fn test_expose_renderer_publishes_on_listening() {
        let session = DevSession::new();
        let hook = HookRef::new(ExposeRenderer::new("main_window", session.clone()));
        let server = FakeServer::new(None);

        hook.configure_server(server.clone());
        assert_eq!(session.server_names(), vec!["main_window"]);
        assert!(session.url("main_window").is_none());

        server.listen(5173);
        assert_eq!(
            session.published_env().get("MAIN_WINDOW_VITE_DEV_SERVER_URL"),
            Some(&"http://localhost:5173".to_string())
        );
    }

    #[test]
    fn test_listening_after_session_dropped_is_ignored() {
        let server = FakeServer::new(None);
        {
            let session = DevSession::new();
            ExposeRenderer::new("renderer", session).configure_server(server.clone());
        }
        server.listen(5173);
    }

    #[test]
    fn test_reload_hook_reloads_servers() {
        let session = DevSession::new();
        let server = FakeServer::new(Some(5173));
        session.register_server("renderer", server.clone());

        let hook = HookRef::new(HotRestart::new(RebuildAction::Reload, session.clone()));
        assert_eq!(hook.name(), HOT_RELOAD_HOOK);
        hook.close_bundle();
        hook.close_bundle();
        assert_eq!(server.reloads(), 2);
    }

    #[test]
    fn test_restart_hook_emits_restart() {
        let session = DevSession::new();
        let mut events = session.subscribe();
        let hook = HookRef::new(HotRestart::new(RebuildAction::Restart, session.clone()));
        assert_eq!(hook.name(), HOT_RESTART_HOOK);
        hook.close_bundle();
        assert_eq!(events.try_recv().unwrap(), SessionEvent::Restart);
    }

    #[test]
    fn test_hook_never_invoked_is_fine() {
        let session = DevSession::new();
        let _hook = HookRef::new(ExposeRenderer::new("renderer", session.clone()));
        assert!(session.server_names().is_empty());
        assert!(session.snapshot().is_empty());
    }

    #[test]
    fn test_hook_ref_identity() {
        let session = DevSession::new();
        let a = HookRef::new(HotRestart::new(RebuildAction::Reload, session.clone()));
        let b = HookRef::new(HotRestart::new(RebuildAction::Reload, session));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
