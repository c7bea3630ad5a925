use std::error::Error as StdError;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;
use std::sync::atomic::{
    AtomicBool,
    Ordering,
};
use std::time::Instant;

use crate::backend::{
    ConfigSource,
    EnvLoggerBackend,
    LoggerHandle,
    LoggingBackend,
};
use crate::cache::LoggerCache;
use crate::config::{
    self,
    FacadeConfig,
};
use crate::error::FacadeResult;
use crate::inspector::{
    FrameInspector,
    LocationInspector,
};
use crate::key::{
    LoggerKey,
    TypeKey,
};
use crate::level::Level;
use crate::performance::{
    LogPerformanceTracker,
    PERFORMANCE_LOGGER,
    PerformanceTracker,
};

/// Generates the `debug`/`debug_with`/... family on a type that provides
/// `dispatch`.
macro_rules! level_methods {
    ($($level:ident => $plain:ident, $with:ident;)*) => {
        $(
            #[track_caller]
            pub fn $plain(&self, message: impl fmt::Display) {
                self.dispatch(Level::$level, &message, None);
            }

            #[track_caller]
            pub fn $with(&self, message: impl fmt::Display, error: &(dyn StdError + 'static)) {
                self.dispatch(Level::$level, &message, Some(error));
            }
        )*

        /// Logs `error` at `Error` level with an empty message.
        #[track_caller]
        pub fn error_from(&self, error: &(dyn StdError + 'static)) {
            self.dispatch(Level::Error, &"", Some(error));
        }

        /// Logs `error` at `Fatal` level with an empty message.
        #[track_caller]
        pub fn fatal_from(&self, error: &(dyn StdError + 'static)) {
            self.dispatch(Level::Fatal, &"", Some(error));
        }
    };
}

pub struct LogFacade {
    backend: Arc<dyn LoggingBackend>,
    cache: LoggerCache,
    default_logger: Arc<dyn LoggerHandle>,
    auto_detect: AtomicBool,
    inspector: Arc<dyn FrameInspector>,
    performance: Arc<dyn PerformanceTracker>,
    source: ConfigSource,
}

impl LogFacade {
    pub fn builder(config: FacadeConfig) -> LogFacadeBuilder {
        LogFacadeBuilder::new(config)
    }

    /// Facade over [`EnvLoggerBackend`] configured from the environment.
    pub fn from_env() -> FacadeResult<Self> {
        Self::builder(FacadeConfig::from_env()?).init()
    }

    pub fn default_logger(&self) -> &Arc<dyn LoggerHandle> {
        &self.default_logger
    }

    pub fn config_source(&self) -> &ConfigSource {
        &self.source
    }

    pub fn cached_loggers(&self) -> usize {
        self.cache.len()
    }

    pub fn is_auto_detect(&self) -> bool {
        self.auto_detect.load(Ordering::Relaxed)
    }

    /// Whether calls without a key resolve their logger from the call site.
    pub fn set_auto_detect(&self, enabled: bool) {
        self.auto_detect.store(enabled, Ordering::Relaxed);
    }

    pub fn target(&self, key: LoggerKey) -> LogTarget<'_> {
        LogTarget { facade: self, key }
    }

    pub fn of<T: ?Sized>(&self) -> LogTarget<'_> {
        self.target(LoggerKey::of::<T>())
    }

    pub fn named(&self, key: impl Into<TypeKey>) -> LogTarget<'_> {
        self.target(LoggerKey::Explicit(key.into()))
    }

    /// Resolves the handle for `key`, creating and caching it when needed.
    #[track_caller]
    pub fn logger(&self, key: &LoggerKey) -> Arc<dyn LoggerHandle> {
        match key {
            LoggerKey::UseDefault => self.default_logger.clone(),
            LoggerKey::AutoDetect => {
                let detected = self.inspector.caller_type(Location::caller());
                self.cached(&detected)
            }
            LoggerKey::Explicit(key) => self.cached(key),
        }
    }

    fn cached(&self, key: &TypeKey) -> Arc<dyn LoggerHandle> {
        self.cache
            .get_or_create(key.as_str(), |name| self.backend.get_logger(name))
    }

    #[track_caller]
    pub fn log(
        &self, level: Level, key: &LoggerKey, message: &dyn fmt::Display,
        error: Option<&(dyn StdError + 'static)>,
    ) {
        let handle = self.logger(key);
        if !handle.is_enabled(level) {
            return;
        }

        let message = message.to_string();
        handle.write(level, &message, error);
    }

    #[track_caller]
    fn dispatch(
        &self, level: Level, message: &dyn fmt::Display, error: Option<&(dyn StdError + 'static)>,
    ) {
        let key = LoggerKey::implicit(self.is_auto_detect());
        self.log(level, &key, message, error);
    }

    level_methods! {
        Debug => debug, debug_with;
        Info => info, info_with;
        Warn => warn, warn_with;
        Error => error, error_with;
        Fatal => fatal, fatal_with;
    }

    pub fn performance_start(&self, key: impl fmt::Display) {
        let key = key.to_string();
        if !key.is_empty() {
            self.performance.start_performance(&key);
        }
    }

    pub fn performance_stop(&self, key: impl fmt::Display) {
        let key = key.to_string();
        if !key.is_empty() {
            self.performance.stop_performance(&key);
        }
    }

    /// Starts timing keyed by the calling file and method.
    ///
    /// The duration handed to the tracker covers the caller lookup only, not
    /// the caller's work; the tracker measures the interval itself.
    #[track_caller]
    pub fn performance_start_here(&self) {
        let caller = Location::caller();
        let watch = Instant::now();
        let frame = self.inspector.caller_frame(caller);
        let probe = watch.elapsed();

        self.performance
            .start_performance_at(&frame.file, &frame.method, probe);
    }

    #[track_caller]
    pub fn performance_stop_here(&self) {
        let caller = Location::caller();
        let watch = Instant::now();
        let frame = self.inspector.caller_frame(caller);
        let probe = watch.elapsed();

        self.performance
            .stop_performance_at(&frame.file, &frame.method, probe);
    }
}

impl fmt::Debug for LogFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogFacade")
            .field("source", &self.source)
            .field("auto_detect", &self.is_auto_detect())
            .field("cached_loggers", &self.cache.keys())
            .finish()
    }
}

/// A facade bound to one logger selection.
pub struct LogTarget<'a> {
    facade: &'a LogFacade,
    key: LoggerKey,
}

impl LogTarget<'_> {
    pub fn key(&self) -> &LoggerKey {
        &self.key
    }

    #[track_caller]
    pub fn handle(&self) -> Arc<dyn LoggerHandle> {
        self.facade.logger(&self.key)
    }

    #[track_caller]
    fn dispatch(
        &self, level: Level, message: &dyn fmt::Display, error: Option<&(dyn StdError + 'static)>,
    ) {
        self.facade.log(level, &self.key, message, error);
    }

    level_methods! {
        Debug => debug, debug_with;
        Info => info, info_with;
        Warn => warn, warn_with;
        Error => error, error_with;
        Fatal => fatal, fatal_with;
    }
}

pub struct LogFacadeBuilder {
    config: FacadeConfig,
    backend: Option<Arc<dyn LoggingBackend>>,
    inspector: Option<Arc<dyn FrameInspector>>,
    performance: Option<Arc<dyn PerformanceTracker>>,
}

impl LogFacadeBuilder {
    pub fn new(config: FacadeConfig) -> Self {
        Self {
            config,
            backend: None,
            inspector: None,
            performance: None,
        }
    }

    pub fn backend(mut self, backend: Arc<dyn LoggingBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn inspector(mut self, inspector: Arc<dyn FrameInspector>) -> Self {
        self.inspector = Some(inspector);
        self
    }

    pub fn performance(mut self, performance: Arc<dyn PerformanceTracker>) -> Self {
        self.performance = Some(performance);
        self
    }

    /// Locates and applies the logging configuration, then resolves the
    /// default logger.
    pub fn init(self) -> FacadeResult<LogFacade> {
        let backend: Arc<dyn LoggingBackend> = match self.backend {
            Some(backend) => backend,
            None => Arc::new(EnvLoggerBackend::new()?),
        };

        let source = config::locate(self.config.base_dir());
        match &source {
            ConfigSource::File(path) => backend.configure_and_watch(path)?,
            ConfigSource::Embedded(_) => backend.configure(&source)?,
        }

        let cache = LoggerCache::new();
        let default_logger = backend.get_logger("");

        let performance = match self.performance {
            Some(performance) => performance,
            None => Arc::new(LogPerformanceTracker::new(
                backend.get_logger(PERFORMANCE_LOGGER),
            )),
        };

        log::debug!(target: "logwrap", "Logging facade initialized from {source}");

        Ok(LogFacade {
            backend,
            cache,
            default_logger,
            auto_detect: AtomicBool::new(self.config.auto_detect()),
            inspector: self
                .inspector
                .unwrap_or_else(|| Arc::new(LocationInspector)),
            performance,
            source,
        })
    }
}
