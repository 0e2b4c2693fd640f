use std::error::Error;
use std::fmt;
use std::sync::mpsc::Sender;

use crate::error::{ServiceError, ServiceResult};

/// Result type of the [`Program`] callbacks.
pub type ProgramResult = Result<(), Box<dyn Error + Send + Sync>>;

/// The program being run as a service.
///
/// `start` must not block: kick off the real work (usually on a thread) and
/// return. `stop` is called once a termination signal arrives and should
/// return once the work has wound down.
pub trait Program {
    fn start(&self, service: &dyn Service) -> ProgramResult;
    fn stop(&self, service: &dyn Service) -> ProgramResult;
}

/// Lifecycle operations of a service, backed by a native service manager.
///
/// One implementation exists per supported manager. The `Display` impl
/// shows the display name, falling back to the service name.
pub trait Service: fmt::Display {
    /// Writes the unit file and registers it with the manager.
    fn install(&self) -> ServiceResult<()>;

    /// Unregisters the service and removes its unit file.
    fn uninstall(&self) -> ServiceResult<()>;

    /// Asks the manager to start the installed service.
    fn start(&self) -> ServiceResult<()>;

    /// Asks the manager to stop the installed service.
    fn stop(&self) -> ServiceResult<()>;

    /// Stops, waits briefly, then starts the service.
    fn restart(&self) -> ServiceResult<()>;

    /// Runs the program in the foreground until SIGTERM or SIGINT arrives.
    fn run(&self) -> ServiceResult<()>;

    /// Console logger when interactive, system log otherwise.
    fn logger(&self, errs: Option<Sender<ServiceError>>) -> ServiceResult<Box<dyn log::Log>>;

    /// Logger writing to the system log under the service name.
    fn system_logger(&self, errs: Option<Sender<ServiceError>>)
    -> ServiceResult<Box<dyn log::Log>>;
}
