use std::path::Path;

use crate::config::ServiceConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::service::{Program, Service};

pub mod systemd;

/// Returns `true` if the host was booted with systemd.
pub fn is_systemd() -> bool {
    Path::new("/run/systemd/system").exists()
}

/// Returns the lifecycle adapter for the service manager running this host.
///
/// The probe runs once here; the returned adapter never re-checks it.
pub fn new_service<P: Program + 'static>(
    program: P,
    config: ServiceConfig,
) -> ServiceResult<Box<dyn Service>> {
    if is_systemd() {
        return Ok(Box::new(systemd::Systemd::new(program, config)?));
    }
    Err(ServiceError::UnsupportedPlatform)
}
