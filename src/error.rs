use std::fmt;
use std::io;
use std::path::PathBuf;

/// Custom error type for ServiceForge.
/// Every lifecycle operation returns the first one of these it runs into.
#[derive(Debug)]
pub enum ServiceError {
    /// A unit file already exists at the target path. Nothing was written.
    AlreadyInstalled(PathBuf),
    /// Per-user services were requested, which this adapter does not support.
    UnsupportedScope,
    /// The path of the running executable could not be resolved.
    PathResolution(io::Error),
    /// Standard IO errors (unit file creation and removal).
    Io(io::Error),
    /// A value could not be placed into the unit file.
    Render(String),
    /// `systemctl` exited non-zero or could not be launched.
    Command {
        command: String,
        /// `None` when the process never ran or was killed by a signal.
        status: Option<i32>,
        output: String,
    },
    /// The service configuration failed validation.
    InvalidConfig(String),
    /// No supported service manager was detected on this host.
    UnsupportedPlatform,
    /// Error returned by the caller's start/stop callbacks.
    Program(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::AlreadyInstalled(path) => {
                write!(f, "Init already exists: {}", path.display())
            }
            ServiceError::UnsupportedScope => {
                write!(f, "User services are not supported on systemd")
            }
            ServiceError::PathResolution(err) => {
                write!(f, "Executable path resolution failed: {}", err)
            }
            ServiceError::Io(err) => write!(f, "IO Error: {}", err),
            ServiceError::Render(msg) => write!(f, "Unit Render Error: {}", msg),
            ServiceError::Command {
                command,
                status,
                output,
            } => {
                match status {
                    Some(code) => write!(f, "'{}' exited with status {}", command, code)?,
                    None => write!(f, "'{}' did not run to completion", command)?,
                }
                let output = output.trim();
                if !output.is_empty() {
                    write!(f, ": {}", output)?;
                }
                Ok(())
            }
            ServiceError::InvalidConfig(msg) => write!(f, "Invalid Config: {}", msg),
            ServiceError::UnsupportedPlatform => {
                write!(f, "No supported service manager detected")
            }
            ServiceError::Program(err) => write!(f, "Program Error: {}", err),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::PathResolution(err) | ServiceError::Io(err) => Some(err),
            ServiceError::Program(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<io::Error> for ServiceError {
    fn from(err: io::Error) -> Self {
        ServiceError::Io(err)
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for ServiceError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        ServiceError::Program(err)
    }
}

/// A specialized Result type for ServiceForge operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
