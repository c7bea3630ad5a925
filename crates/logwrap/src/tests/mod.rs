mod test_init;

use std::error::Error as StdError;
use std::sync::{
    Arc,
    Mutex,
};

use lazy_static::lazy_static;
use mockall::predicate;
use tempfile::TempDir;

use crate::backend::{
    LoggerHandle,
    MockLoggingBackend,
};
use crate::config::FacadeConfig;
use crate::facade::LogFacade;
use crate::inspector::FrameInspector;
use crate::level::Level;
use crate::performance::MockPerformanceTracker;

lazy_static! {
    /// Serialises tests that reconfigure the process-wide `log` dispatcher.
    pub static ref DISPATCHER_TEST_MUTEX: Mutex<()> = Mutex::new(());
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRecord {
    pub logger: String,
    pub level: Level,
    pub message: String,
    pub error: Option<String>,
}

/// Handle that keeps every write and enables levels at or above `min_level`.
pub struct RecordingHandle {
    name: String,
    min_level: Level,
    writes: Mutex<Vec<WriteRecord>>,
}

impl RecordingHandle {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            min_level: Level::Debug,
            writes: Mutex::new(Vec::new()),
        }
    }

    pub fn with_min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    pub fn writes(&self) -> Vec<WriteRecord> {
        self.writes.lock().unwrap().clone()
    }
}

impl LoggerHandle for RecordingHandle {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }

    fn write(&self, level: Level, message: &str, error: Option<&(dyn StdError + 'static)>) {
        self.writes.lock().unwrap().push(WriteRecord {
            logger: self.name.clone(),
            level,
            message: message.to_string(),
            error: error.map(|e| e.to_string()),
        });
    }
}

/// Backend expecting the one-shot embedded configuration used when the base
/// directory has no config files.
pub fn embedded_backend() -> MockLoggingBackend {
    let mut backend = MockLoggingBackend::new();
    backend.expect_configure().times(1).returning(|_| Ok(()));
    backend.expect_configure_and_watch().times(0);
    backend
}

pub fn expect_logger(backend: &mut MockLoggingBackend, name: &'static str, handle: &Arc<RecordingHandle>) {
    let handle: Arc<dyn LoggerHandle> = handle.clone();
    backend
        .expect_get_logger()
        .with(predicate::eq(name))
        .times(1)
        .returning(move |_| handle.clone());
}

pub fn build_facade(
    backend: MockLoggingBackend, inspector: Option<Arc<dyn FrameInspector>>,
    performance: MockPerformanceTracker,
) -> LogFacade {
    let temp_dir = TempDir::new().unwrap();
    let mut builder = LogFacade::builder(FacadeConfig::new(temp_dir.path().to_path_buf()))
        .backend(Arc::new(backend))
        .performance(Arc::new(performance));
    if let Some(inspector) = inspector {
        builder = builder.inspector(inspector);
    }
    builder.init().unwrap()
}
