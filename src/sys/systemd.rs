use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use log::{info, warn};

use crate::config::ServiceConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::logger::{SysLogger, select_logger};
use crate::render::render_unit;
use crate::runner::{CommandRunner, Systemctl};
use crate::service::{Program, Service};
use crate::signals::{SignalSubscription, run_loop};

/// Where system unit files are installed.
pub const UNIT_DIR: &str = "/etc/systemd/system";

/// Pause between stop and start in [`Service::restart`]. systemd may report
/// a unit stopped before its sockets and PID are released.
const RESTART_SETTLE: Duration = Duration::from_millis(50);

type ExeResolver = Box<dyn Fn() -> io::Result<PathBuf>>;

/// Lifecycle adapter for systemd.
///
/// Holds nothing but its configuration: every call reads the current state
/// from disk or from `systemctl`.
pub struct Systemd {
    program: Box<dyn Program>,
    config: ServiceConfig,
    unit_dir: PathBuf,
    runner: Box<dyn CommandRunner>,
    resolve_exe: ExeResolver,
}

impl fmt::Debug for Systemd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Systemd")
            .field("config", &self.config)
            .field("unit_dir", &self.unit_dir)
            .finish_non_exhaustive()
    }
}

impl Systemd {
    /// Creates the adapter with the default unit directory, `systemctl` and
    /// `std::env::current_exe`. The configuration is validated here.
    pub fn new<P: Program + 'static>(program: P, config: ServiceConfig) -> ServiceResult<Self> {
        Ok(Systemd {
            program: Box::new(program),
            config: config.build()?,
            unit_dir: PathBuf::from(UNIT_DIR),
            runner: Box::new(Systemctl::new()),
            resolve_exe: Box::new(std::env::current_exe),
        })
    }

    /// Installs unit files into `dir` instead of [`UNIT_DIR`].
    pub fn unit_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self { self.unit_dir = dir.into(); self }

    /// Replaces the `systemctl` runner.
    pub fn runner<R: CommandRunner + 'static>(mut self, runner: R) -> Self {
        self.runner = Box::new(runner);
        self
    }

    /// Replaces the lookup of the executable baked into the unit file.
    pub fn exe_resolver<F>(mut self, resolve: F) -> Self
    where
        F: Fn() -> io::Result<PathBuf> + 'static,
    {
        self.resolve_exe = Box::new(resolve);
        self
    }

    pub fn config(&self) -> &ServiceConfig { &self.config }

    /// Path of the unit file for this service.
    pub fn unit_path(&self) -> ServiceResult<PathBuf> {
        if self.config.user_service {
            return Err(ServiceError::UnsupportedScope);
        }
        Ok(self.unit_dir.join(self.config.unit_name()))
    }

    fn write_unit(&self, path: &Path, unit: &str) -> ServiceResult<()> {
        let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(ServiceError::AlreadyInstalled(path.to_path_buf()));
            }
            Err(e) => return Err(ServiceError::Io(e)),
        };
        file.write_all(unit.as_bytes())?;
        file.sync_all()?;
        Ok(())
    }
}

impl fmt::Display for Systemd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config.display())
    }
}

impl Service for Systemd {
    fn install(&self) -> ServiceResult<()> {
        let path = self.unit_path()?;
        if path.exists() {
            return Err(ServiceError::AlreadyInstalled(path));
        }

        let exe = (self.resolve_exe)().map_err(ServiceError::PathResolution)?;
        let unit = render_unit(&self.config, &exe)?;

        // No rollback past this point: a failing systemctl leaves the file
        // behind and uninstall cleans it up.
        self.write_unit(&path, &unit)?;
        info!("wrote {} for {}", path.display(), exe.display());

        let unit_name = self.config.unit_name();
        self.runner.enable(&unit_name)?;
        self.runner.reload()
    }

    fn uninstall(&self) -> ServiceResult<()> {
        let unit_name = self.config.unit_name();
        if let Err(err) = self.runner.disable(&unit_name) {
            // The file is what makes the service installed; carry on.
            warn!("ignoring failure to disable {}: {}", unit_name, err);
        }

        let path = self.unit_path()?;
        fs::remove_file(&path)?;
        info!("removed {}", path.display());
        Ok(())
    }

    fn start(&self) -> ServiceResult<()> {
        self.runner.start(&self.config.unit_name())
    }

    fn stop(&self) -> ServiceResult<()> {
        self.runner.stop(&self.config.unit_name())
    }

    fn restart(&self) -> ServiceResult<()> {
        self.stop()?;
        thread::sleep(RESTART_SETTLE);
        self.start()
    }

    /// After this returns SIGTERM and SIGINT are ignored, see
    /// [`SignalSubscription`].
    fn run(&self) -> ServiceResult<()> {
        run_loop(self.program.as_ref(), self, SignalSubscription::register)
    }

    fn logger(&self, errs: Option<Sender<ServiceError>>) -> ServiceResult<Box<dyn log::Log>> {
        select_logger(&self.config.name, errs)
    }

    fn system_logger(
        &self,
        errs: Option<Sender<ServiceError>>,
    ) -> ServiceResult<Box<dyn log::Log>> {
        Ok(Box::new(SysLogger::new(&self.config.name, errs)?))
    }
}
