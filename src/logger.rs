use std::ffi::CString;
use std::io::{self, Write};
use std::sync::mpsc::Sender;

use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::error::{ServiceError, ServiceResult};

/// Returns `true` when running from a terminal session rather than under a
/// service manager.
pub fn interactive() -> bool {
    // SAFETY: both calls only query process state.
    unsafe { libc::isatty(libc::STDIN_FILENO) == 1 && libc::getppid() != 1 }
}

/// Picks the console logger for interactive sessions and the system log
/// otherwise.
pub fn select_logger(
    name: &str,
    errs: Option<Sender<ServiceError>>,
) -> ServiceResult<Box<dyn Log>> {
    if interactive() {
        return Ok(Box::new(ConsoleLogger::default()));
    }
    Ok(Box::new(SysLogger::new(name, errs)?))
}

/// Writes `LEVEL message` lines to stderr.
#[derive(Debug)]
pub struct ConsoleLogger {
    level: LevelFilter,
}

impl Default for ConsoleLogger {
    fn default() -> Self { ConsoleLogger { level: LevelFilter::Trace } }
}

impl ConsoleLogger {
    pub fn with_level(level: LevelFilter) -> Self { ConsoleLogger { level } }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "{:<5} {}", record.level(), record.args());
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

/// Writes to syslog(3) with the service name as identity.
///
/// Records that syslog cannot take are reported on the error channel, if one
/// was given, instead of being dropped silently.
pub struct SysLogger {
    // openlog(3) keeps the pointer, so the string must outlive the logger.
    _ident: CString,
    errs: Option<Sender<ServiceError>>,
}

impl SysLogger {
    pub fn new(name: &str, errs: Option<Sender<ServiceError>>) -> ServiceResult<Self> {
        let ident = CString::new(name).map_err(|_| {
            ServiceError::InvalidConfig(format!("service name {:?} contains NUL", name))
        })?;
        // SAFETY: `ident` is NUL-terminated and kept alive in `self`.
        unsafe { libc::openlog(ident.as_ptr(), libc::LOG_PID, libc::LOG_DAEMON) };
        Ok(SysLogger { _ident: ident, errs })
    }

    fn report(&self, err: ServiceError) {
        if let Some(tx) = &self.errs {
            let _ = tx.send(err);
        }
    }
}

fn priority(level: Level) -> libc::c_int {
    match level {
        Level::Error => libc::LOG_ERR,
        Level::Warn => libc::LOG_WARNING,
        Level::Info => libc::LOG_INFO,
        Level::Debug | Level::Trace => libc::LOG_DEBUG,
    }
}

impl Log for SysLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let msg = match CString::new(record.args().to_string()) {
            Ok(msg) => msg,
            Err(_) => {
                self.report(ServiceError::Render(
                    "log message contains a NUL byte".into(),
                ));
                return;
            }
        };
        // SAFETY: a constant "%s" format with one NUL-terminated argument.
        unsafe { libc::syslog(priority(record.level()), c"%s".as_ptr(), msg.as_ptr()) };
    }

    fn flush(&self) {}
}

impl Drop for SysLogger {
    fn drop(&mut self) {
        // SAFETY: closelog has no preconditions.
        unsafe { libc::closelog() };
    }
}
