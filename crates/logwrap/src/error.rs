use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type FacadeResult<T> = Result<T, FacadeError>;

#[derive(Debug, Error)]
pub enum FacadeError {
    #[error("Failed to read logging configuration {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Config watcher error: {0}")]
    Watch(#[from] notify::Error),

    #[error("Cannot watch configuration path: {0:?}")]
    WatchTarget(PathBuf),

    #[error("Failed to install the log dispatcher: {0}")]
    InstallLogger(#[from] log::SetLoggerError),

    #[error("Logging facade is already initialized")]
    AlreadyInitialized,

    #[error("Unable to determine base directory: {0}")]
    BaseDir(String),
}

impl FacadeError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        FacadeError::Io {
            path: path.into(),
            source,
        }
    }
}
