//! Modules the bundler must leave unresolved.
//!
//! The desktop runtime host, every platform built-in (both `fs` and
//! `node:fs` spellings) and every production dependency are provided at run
//! time, so bundling them would duplicate or break them.

use crate::project::Manifest;
use std::collections::HashSet;

/// The desktop runtime host module.
pub const RUNTIME_HOST: &str = "electron";

/// Prefix callers may use to reference a platform built-in.
pub const BUILTIN_PREFIX: &str = "node:";

/// Platform runtime built-in modules.
pub const BUILTIN_MODULES: &[&str] = &[
    "_http_agent",
    "_http_client",
    "_http_common",
    "_http_incoming",
    "_http_outgoing",
    "_http_server",
    "_stream_duplex",
    "_stream_passthrough",
    "_stream_readable",
    "_stream_transform",
    "_stream_wrap",
    "_stream_writable",
    "_tls_common",
    "_tls_wrap",
    "assert",
    "assert/strict",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "dns/promises",
    "domain",
    "events",
    "fs",
    "fs/promises",
    "http",
    "http2",
    "https",
    "inspector",
    "inspector/promises",
    "module",
    "net",
    "os",
    "path",
    "path/posix",
    "path/win32",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "readline/promises",
    "repl",
    "stream",
    "stream/consumers",
    "stream/promises",
    "stream/web",
    "string_decoder",
    "sys",
    "timers",
    "timers/promises",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "util/types",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

/// Compute the external module identifiers for a manifest.
///
/// Order is stable: runtime host, built-ins (bare then prefixed), then
/// production dependencies in manifest order. Duplicates are dropped.
#[must_use]
pub fn compute_externals(manifest: &Manifest) -> Vec<String> {
    let builtins = BUILTIN_MODULES
        .iter()
        .flat_map(|m| [(*m).to_string(), format!("{BUILTIN_PREFIX}{m}")]);

    let mut seen = HashSet::new();
    std::iter::once(RUNTIME_HOST.to_string())
        .chain(builtins)
        .chain(manifest.dependencies.iter().cloned())
        .filter(|id| seen.insert(id.clone()))
        .collect()
}
