use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use mockall::predicate;
use tempfile::TempDir;

use super::{
    DISPATCHER_TEST_MUTEX,
    RecordingHandle,
    expect_logger,
};
use crate::backend::{
    ConfigSource,
    MockLoggingBackend,
};
use crate::config::{
    EMBEDDED_CONFIG,
    FacadeConfig,
};
use crate::error::FacadeError;
use crate::facade::LogFacade;
use crate::level::Level;
use crate::performance::MockPerformanceTracker;

fn write_config(dir: &TempDir, relative: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, contents).unwrap();
    path
}

fn init_with(backend: MockLoggingBackend, config: FacadeConfig) -> Result<LogFacade, FacadeError> {
    LogFacade::builder(config)
        .backend(Arc::new(backend))
        .performance(Arc::new(MockPerformanceTracker::new()))
        .init()
}

#[test]
fn test_config_subfolder_wins_and_is_watched() {
    let temp_dir = TempDir::new().unwrap();
    let preferred = write_config(&temp_dir, "Config/log4net.config", "debug");
    write_config(&temp_dir, "log4net.config", "warn");

    let default = Arc::new(RecordingHandle::new(""));
    let mut backend = MockLoggingBackend::new();
    backend.expect_configure().times(0);
    backend
        .expect_configure_and_watch()
        .with(predicate::eq(preferred.clone()))
        .times(1)
        .returning(|_| Ok(()));
    expect_logger(&mut backend, "", &default);

    let facade = init_with(backend, FacadeConfig::new(temp_dir.path().to_path_buf())).unwrap();

    assert_eq!(facade.config_source(), &ConfigSource::File(preferred));
    assert_eq!(facade.cached_loggers(), 0);
}

#[test]
fn test_base_dir_file_is_watched() {
    let temp_dir = TempDir::new().unwrap();
    let base = write_config(&temp_dir, "log4net.config", "warn");

    let default = Arc::new(RecordingHandle::new(""));
    let mut backend = MockLoggingBackend::new();
    backend.expect_configure().times(0);
    backend
        .expect_configure_and_watch()
        .with(predicate::eq(base.clone()))
        .times(1)
        .returning(|_| Ok(()));
    expect_logger(&mut backend, "", &default);

    let facade = init_with(backend, FacadeConfig::new(temp_dir.path().to_path_buf())).unwrap();
    assert_eq!(facade.config_source(), &ConfigSource::File(base));
}

#[test]
fn test_embedded_default_is_one_shot() {
    let temp_dir = TempDir::new().unwrap();

    let default = Arc::new(RecordingHandle::new(""));
    let mut backend = MockLoggingBackend::new();
    backend
        .expect_configure()
        .with(predicate::eq(ConfigSource::Embedded(EMBEDDED_CONFIG)))
        .times(1)
        .returning(|_| Ok(()));
    backend.expect_configure_and_watch().times(0);
    expect_logger(&mut backend, "", &default);

    let facade = init_with(backend, FacadeConfig::new(temp_dir.path().to_path_buf())).unwrap();
    assert!(!facade.config_source().is_file());
}

#[test]
fn test_configure_error_propagates() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(&temp_dir, "log4net.config", "info");

    let mut backend = MockLoggingBackend::new();
    backend
        .expect_configure_and_watch()
        .times(1)
        .returning(|path| {
            Err(FacadeError::io(
                path,
                io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            ))
        });
    backend.expect_get_logger().times(0);

    let err = init_with(backend, FacadeConfig::new(temp_dir.path().to_path_buf())).unwrap_err();
    match err {
        FacadeError::Io { path: failed, .. } => assert_eq!(failed, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_auto_detect_flag_from_config() {
    let temp_dir = TempDir::new().unwrap();

    let default = Arc::new(RecordingHandle::new(""));
    let mut backend = MockLoggingBackend::new();
    backend.expect_configure().times(1).returning(|_| Ok(()));
    expect_logger(&mut backend, "", &default);

    let config = FacadeConfig::builder()
        .base_dir(temp_dir.path())
        .auto_detect(true)
        .build()
        .unwrap();
    let facade = init_with(backend, config).unwrap();

    assert!(facade.is_auto_detect());
}

#[test]
fn test_default_performance_tracker_uses_performance_logger() {
    let temp_dir = TempDir::new().unwrap();

    let default = Arc::new(RecordingHandle::new(""));
    let perf = Arc::new(RecordingHandle::new("Performance"));
    let mut backend = MockLoggingBackend::new();
    backend.expect_configure().times(1).returning(|_| Ok(()));
    expect_logger(&mut backend, "", &default);
    expect_logger(&mut backend, "Performance", &perf);

    let facade = LogFacade::builder(FacadeConfig::new(temp_dir.path().to_path_buf()))
        .backend(Arc::new(backend))
        .init()
        .unwrap();

    facade.performance_start("rebuild");
    facade.performance_stop("rebuild");

    assert_eq!(facade.cached_loggers(), 0);
    let writes = perf.writes();
    assert_eq!(writes.len(), 1);
    assert!(writes[0].message.starts_with("rebuild took "));
}

#[test]
fn test_end_to_end_with_env_logger_backend() {
    let _guard = DISPATCHER_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let temp_dir = TempDir::new().unwrap();
    let preferred = write_config(&temp_dir, "Config/log4net.config", "warn\napp::db=debug\n");
    write_config(&temp_dir, "log4net.config", "off");

    let facade = LogFacade::builder(FacadeConfig::new(temp_dir.path().to_path_buf()))
        .init()
        .unwrap();

    assert_eq!(facade.config_source(), &ConfigSource::File(preferred));
    assert!(facade.default_logger().is_enabled(Level::Warn));
    assert!(!facade.default_logger().is_enabled(Level::Info));

    let db = facade.named("app::db::Pool").handle();
    assert!(db.is_enabled(Level::Debug));
    facade.named("app::db::Pool").debug("pool warmed");
    facade.warn("end to end");
}
