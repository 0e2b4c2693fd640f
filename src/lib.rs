//! # ServiceForge
//!
//! **ServiceForge** installs a Rust program as a native system service, drives it
//! through the service manager (start, stop, restart, uninstall) and runs it in
//! the foreground with signal-driven shutdown.
//!
//! Supervision (restart on crash, rate limiting) is left to the service
//! manager. The only manager supported today is systemd.
//!
//! ```no_run
//! use service_forge::{Program, ProgramResult, Service, ServiceConfig};
//!
//! struct Ticker;
//!
//! impl Program for Ticker {
//!     fn start(&self, _: &dyn Service) -> ProgramResult { Ok(()) }
//!     fn stop(&self, _: &dyn Service) -> ProgramResult { Ok(()) }
//! }
//!
//! let config = ServiceConfig::new("ticker").description("Prints the time");
//! let service = service_forge::new_service(Ticker, config)?;
//! service.install()?;
//! # Ok::<(), service_forge::ServiceError>(())
//! ```

#[cfg(not(unix))]
compile_error!("service_forge is only supported on unix");

mod config;
mod error;
mod escape;
mod logger;
mod render;
mod runner;
mod service;
mod signals;
mod sys;
mod types;

// Re-export public types to keep the API flat
pub use config::ServiceConfig;
pub use error::{ServiceError, ServiceResult};
pub use escape::{escape_arg, escape_value};
pub use logger::{ConsoleLogger, SysLogger, interactive, select_logger};
pub use render::{RESTART_SEC, START_LIMIT_BURST, START_LIMIT_INTERVAL_SEC, render_unit};
pub use runner::{CommandRunner, Systemctl};
pub use service::{Program, ProgramResult, Service};
pub use signals::{SignalSubscription, TERM_SIGNALS, TerminationSignals, run_loop};
pub use sys::systemd::{Systemd, UNIT_DIR};
pub use sys::{is_systemd, new_service};
pub use types::User;
