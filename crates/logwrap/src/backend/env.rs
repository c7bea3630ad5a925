use std::error::Error as StdError;
use std::path::Path;
use std::sync::{
    Arc,
    Mutex,
    RwLock,
};

use log::{
    LevelFilter,
    Log,
    Metadata,
    Record,
};
use once_cell::sync::{
    Lazy,
    OnceCell,
};

use super::watcher::ConfigWatcher;
use super::{
    ConfigSource,
    LoggerHandle,
    LoggingBackend,
};
use crate::error::FacadeResult;
use crate::level::Level;

static DISPATCHER: Lazy<ReloadableLogger> = Lazy::new(ReloadableLogger::new);

static INSTALLED: OnceCell<()> = OnceCell::new();

/// The `log` crate accepts one logger per process, so every backend shares
/// this dispatcher and swaps the `env_logger::Logger` behind it.
struct ReloadableLogger {
    active: RwLock<env_logger::Logger>,
}

impl ReloadableLogger {
    fn new() -> Self {
        Self {
            active: RwLock::new(build_logger("")),
        }
    }

    fn install() -> FacadeResult<&'static ReloadableLogger> {
        INSTALLED.get_or_try_init(|| log::set_logger(&*DISPATCHER))?;
        Ok(&DISPATCHER)
    }

    fn replace(&self, logger: env_logger::Logger) {
        let max_level = logger.filter();
        let mut active = self.active.write().unwrap_or_else(|e| e.into_inner());
        *active = logger;
        log::set_max_level(max_level);
    }
}

impl Log for ReloadableLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.active
            .read()
            .map(|logger| logger.enabled(metadata))
            .unwrap_or(false)
    }

    fn log(&self, record: &Record<'_>) {
        if let Ok(logger) = self.active.read() {
            logger.log(record);
        }
    }

    fn flush(&self) {
        if let Ok(logger) = self.active.read() {
            logger.flush();
        }
    }
}

/// Joins configuration lines into one `env_logger` directive string.
///
/// Blank lines and `#` comments are dropped.
pub fn parse_directives(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split(','))
        .map(str::trim)
        .filter(|directive| !directive.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

fn build_logger(text: &str) -> env_logger::Logger {
    let directives = parse_directives(text);
    let mut builder = env_logger::Builder::new();

    if directives.is_empty() {
        builder.filter_level(LevelFilter::Off);
    } else {
        builder.parse_filters(&directives);
    }

    builder.format_timestamp_millis().build()
}

fn apply(dispatcher: &ReloadableLogger, source: &ConfigSource) -> FacadeResult<()> {
    let text = source.read()?;
    dispatcher.replace(build_logger(&text));
    log::debug!(target: "logwrap", "Logging configured from {source}");
    Ok(())
}

pub struct EnvLoggerBackend {
    dispatcher: &'static ReloadableLogger,
    watcher: Mutex<Option<ConfigWatcher>>,
}

impl EnvLoggerBackend {
    pub fn new() -> FacadeResult<Self> {
        Ok(Self {
            dispatcher: ReloadableLogger::install()?,
            watcher: Mutex::new(None),
        })
    }

    pub fn is_watching(&self) -> bool {
        self.watcher
            .lock()
            .map(|watcher| watcher.is_some())
            .unwrap_or(false)
    }
}

impl LoggingBackend for EnvLoggerBackend {
    fn configure(&self, source: &ConfigSource) -> FacadeResult<()> {
        apply(self.dispatcher, source)
    }

    fn configure_and_watch(&self, path: &Path) -> FacadeResult<()> {
        let source = ConfigSource::File(path.to_path_buf());
        apply(self.dispatcher, &source)?;

        let dispatcher = self.dispatcher;
        let watcher = ConfigWatcher::spawn(path, move |changed| {
            let source = ConfigSource::File(changed.to_path_buf());
            match apply(dispatcher, &source) {
                Ok(()) => log::info!(target: "logwrap", "Reloaded logging configuration"),
                Err(e) => log::error!(
                    target: "logwrap",
                    "Failed to reload logging configuration, keeping previous: {e}"
                ),
            }
        })?;

        let mut slot = self.watcher.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(watcher);
        Ok(())
    }

    fn get_logger(&self, name: &str) -> Arc<dyn LoggerHandle> {
        Arc::new(TargetHandle::new(name))
    }
}

/// Handle that logs through the `log` crate with its name as the target.
#[derive(Debug, Clone)]
pub struct TargetHandle {
    target: String,
}

impl TargetHandle {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }
}

impl LoggerHandle for TargetHandle {
    fn name(&self) -> &str {
        &self.target
    }

    fn is_enabled(&self, level: Level) -> bool {
        log::log_enabled!(target: self.target.as_str(), level.to_log_level())
    }

    fn write(&self, level: Level, message: &str, error: Option<&(dyn StdError + 'static)>) {
        let rendered = render(level, message, error);
        log::log!(target: self.target.as_str(), level.to_log_level(), "{rendered}");
    }
}

fn render(level: Level, message: &str, error: Option<&(dyn StdError + 'static)>) -> String {
    let mut rendered = String::new();
    if level == Level::Fatal {
        rendered.push_str("[FATAL] ");
    }
    rendered.push_str(message);

    if let Some(error) = error {
        if !message.is_empty() {
            rendered.push_str(": ");
        }
        rendered.push_str(&error.to_string());

        let mut cause = error.source();
        while let Some(inner) = cause {
            rendered.push_str("\n  caused by: ");
            rendered.push_str(&inner.to_string());
            cause = inner.source();
        }
    }

    rendered
}
