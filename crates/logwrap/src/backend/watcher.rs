use std::ffi::OsString;
use std::path::{
    Path,
    PathBuf,
};
use std::sync::mpsc::{
    self,
    RecvTimeoutError,
};
use std::thread;
use std::time::Duration;

use notify::{
    Event,
    RecommendedWatcher,
    RecursiveMode,
    Watcher,
};

use crate::error::{
    FacadeError,
    FacadeResult,
};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

/// Watches one configuration file and calls back after it settles.
///
/// The parent directory is watched rather than the file so editors that
/// replace the file on save are still picked up. Dropping the watcher stops
/// the debounce thread.
pub struct ConfigWatcher {
    path: PathBuf,
    _watcher: RecommendedWatcher,
}

impl ConfigWatcher {
    pub fn spawn<F>(path: &Path, on_change: F) -> FacadeResult<Self>
    where
        F: Fn(&Path) + Send + 'static,
    {
        Self::with_debounce(path, DEFAULT_DEBOUNCE, on_change)
    }

    pub fn with_debounce<F>(path: &Path, debounce: Duration, on_change: F) -> FacadeResult<Self>
    where
        F: Fn(&Path) + Send + 'static,
    {
        let file_name: OsString = path
            .file_name()
            .ok_or_else(|| FacadeError::WatchTarget(path.to_path_buf()))?
            .to_os_string();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let (tx, rx) = mpsc::channel::<()>();

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            match res {
                Ok(event) => {
                    let relevant = event
                        .paths
                        .iter()
                        .any(|p| p.file_name() == Some(file_name.as_os_str()));

                    if relevant && (event.kind.is_modify() || event.kind.is_create()) {
                        let _ = tx.send(());
                    }
                }
                Err(e) => log::warn!(target: "logwrap", "Config watcher error: {e}"),
            }
        })?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        let target = path.to_path_buf();
        thread::Builder::new()
            .name("logwrap-config-watch".into())
            .spawn(move || {
                while rx.recv().is_ok() {
                    // Drain the burst an editor save produces.
                    loop {
                        match rx.recv_timeout(debounce) {
                            Ok(()) => continue,
                            Err(RecvTimeoutError::Timeout) => break,
                            Err(RecvTimeoutError::Disconnected) => return,
                        }
                    }
                    on_change(&target);
                }
            })
            .map_err(|e| FacadeError::io(path, e))?;

        log::debug!(target: "logwrap", "Watching logging configuration {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            _watcher: watcher,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
