/// Format-string shorthands over [`LogFacade`](crate::LogFacade) and
/// [`LogTarget`](crate::LogTarget) level methods.
///
/// ```no_run
/// use logwrap::{log_info, log_warn};
///
/// let facade = logwrap::facade().unwrap();
/// log_info!(facade, "listening on {}", 8080);
/// log_warn!(facade.named("app::db"), "slow query: {} ms", 1200);
/// ```
#[macro_export]
macro_rules! log_debug {
    ($target:expr, $($arg:tt)+) => {
        $target.debug(format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_info {
    ($target:expr, $($arg:tt)+) => {
        $target.info(format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($target:expr, $($arg:tt)+) => {
        $target.warn(format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_error {
    ($target:expr, $($arg:tt)+) => {
        $target.error(format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_fatal {
    ($target:expr, $($arg:tt)+) => {
        $target.fatal(format_args!($($arg)+))
    };
}
