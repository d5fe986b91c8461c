#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]

//! Build-configuration composition for desktop apps with main, preload and
//! renderer targets.
//!
//! Each declared target resolves to one [`ConfigFragment`] for the bundler:
//! framework defaults, then the fragment derived from the target, then the
//! user's override file, combined with [`merge`]. A [`DevSession`] connects
//! the targets during development so the main process learns the renderer
//! dev-server URLs and rebuilt preloads reload every live page.

pub mod config;
pub mod define;
pub mod dev;
pub mod error;
pub mod externals;
pub mod factory;
pub mod fragment;
pub mod loader;
pub mod merge;
pub mod project;
pub mod version;

pub use config::Config;
pub use define::{derive_keys, DefineKeySet};
pub use dev::hooks::{BuildHook, DevServerHandle, HmrPayload, HookRef};
pub use dev::{DevSession, RegistrySnapshot, SessionEvent};
pub use error::{Error, OverrideLoadError};
pub use externals::compute_externals;
pub use factory::{build_config, resolve_all, resolve_target, FactoryContext, ResolvedConfig};
pub use fragment::{ConfigFragment, ConfigValue};
pub use loader::{ConfigEnv, ConfigLoader, FileConfigLoader};
pub use merge::merge;
pub use project::{
    load_project, resolve_inline_config, Command, Entry, Manifest, Mode, ModuleFormat,
    ProjectConfig, ProjectContext, TargetKind, TargetSpec,
};
pub use version::{SCHEMA_VERSION, VERSION};
