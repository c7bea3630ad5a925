pub mod backend;
mod cache;
pub mod config;
pub mod error;
pub mod facade;
pub mod inspector;
pub mod key;
pub mod level;
mod macros;
pub mod performance;

#[cfg(test)]
mod tests;

use once_cell::sync::OnceCell;

pub use backend::{
    ConfigSource,
    EnvLoggerBackend,
    LoggerHandle,
    LoggingBackend,
};
pub use config::FacadeConfig;
pub use error::{
    FacadeError,
    FacadeResult,
};
pub use facade::{
    LogFacade,
    LogFacadeBuilder,
    LogTarget,
};
pub use inspector::{
    CallerFrame,
    FixedInspector,
    FrameInspector,
    LocationInspector,
};
pub use key::{
    LoggerKey,
    TypeKey,
};
pub use level::Level;
pub use performance::{
    LogPerformanceTracker,
    PerformanceTracker,
};

static GLOBAL_FACADE: OnceCell<LogFacade> = OnceCell::new();

/// Installs the process-wide facade. Fails if one is already installed.
pub fn init(config: FacadeConfig) -> FacadeResult<&'static LogFacade> {
    let mut created = false;
    let facade = GLOBAL_FACADE.get_or_try_init(|| {
        created = true;
        LogFacade::builder(config).init()
    })?;

    if created {
        Ok(facade)
    } else {
        Err(FacadeError::AlreadyInitialized)
    }
}

/// The process-wide facade, initialized from the environment on first use.
pub fn facade() -> FacadeResult<&'static LogFacade> {
    GLOBAL_FACADE.get_or_try_init(LogFacade::from_env)
}

pub fn try_facade() -> Option<&'static LogFacade> {
    GLOBAL_FACADE.get()
}
