//! Seam between the facade and the logging library doing the real work.
//!
//! The facade only ever talks to a [`LoggingBackend`] and the
//! [`LoggerHandle`]s it hands out. [`EnvLoggerBackend`] binds them to the
//! `log` crate with `env_logger` doing filtering and formatting.

mod env;
mod watcher;

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::path::{
    Path,
    PathBuf,
};
use std::sync::Arc;

pub use env::{
    EnvLoggerBackend,
    TargetHandle,
    parse_directives,
};
pub use watcher::ConfigWatcher;

use crate::error::{
    FacadeError,
    FacadeResult,
};
use crate::level::Level;

/// A named logger obtained from the backend.
pub trait LoggerHandle: Send + Sync {
    fn name(&self) -> &str;

    fn is_enabled(&self, level: Level) -> bool;

    /// Emit one record. Callers check [`LoggerHandle::is_enabled`] first.
    fn write(&self, level: Level, message: &str, error: Option<&(dyn StdError + 'static)>);
}

#[cfg_attr(test, mockall::automock)]
pub trait LoggingBackend: Send + Sync {
    /// One-shot configuration.
    fn configure(&self, source: &ConfigSource) -> FacadeResult<()>;

    /// Configure from `path` and keep reconfiguring whenever it changes.
    fn configure_and_watch(&self, path: &Path) -> FacadeResult<()>;

    fn get_logger(&self, name: &str) -> Arc<dyn LoggerHandle>;
}

/// Where the logging configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Embedded(&'static str),
}

impl ConfigSource {
    pub fn is_file(&self) -> bool {
        matches!(self, ConfigSource::File(_))
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::File(path) => Some(path),
            ConfigSource::Embedded(_) => None,
        }
    }

    pub fn read(&self) -> FacadeResult<Cow<'static, str>> {
        match self {
            ConfigSource::File(path) => fs::read_to_string(path)
                .map(Cow::Owned)
                .map_err(|e| FacadeError::io(path, e)),
            ConfigSource::Embedded(text) => Ok(Cow::Borrowed(text)),
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "file {}", path.display()),
            ConfigSource::Embedded(_) => f.write_str("embedded default"),
        }
    }
}
