use std::process::Command;

use log::debug;

use crate::error::{ServiceError, ServiceResult};

/// The service manager actions a lifecycle adapter needs.
///
/// Each call blocks until the manager is done. The real implementation is
/// [`Systemctl`]; tests plug in a recorder instead.
pub trait CommandRunner {
    fn enable(&self, unit: &str) -> ServiceResult<()>;
    fn disable(&self, unit: &str) -> ServiceResult<()>;
    fn start(&self, unit: &str) -> ServiceResult<()>;
    fn stop(&self, unit: &str) -> ServiceResult<()>;
    /// Makes the manager re-read its unit files.
    fn reload(&self) -> ServiceResult<()>;
}

/// Runs the `systemctl` binary.
///
/// No timeout is applied: a hung `systemctl` hangs the caller.
#[derive(Debug, Clone)]
pub struct Systemctl {
    program: String,
}

impl Default for Systemctl {
    fn default() -> Self { Self::new() }
}

impl Systemctl {
    pub fn new() -> Self {
        Systemctl { program: "systemctl".to_owned() }
    }

    /// Uses a different binary, e.g. an absolute path to `systemctl`.
    pub fn with_program(program: &str) -> Self {
        Systemctl { program: program.to_owned() }
    }

    fn run(&self, args: &[&str]) -> ServiceResult<()> {
        let command = format!("{} {}", self.program, args.join(" "));
        debug!("running '{}'", command);

        let output = match Command::new(&self.program).args(args).output() {
            Ok(output) => output,
            Err(err) => {
                return Err(ServiceError::Command {
                    command,
                    status: None,
                    output: err.to_string(),
                });
            }
        };

        if output.status.success() {
            return Ok(());
        }

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        debug!("'{}' failed with {}", command, output.status);

        Err(ServiceError::Command {
            command,
            status: output.status.code(),
            output: combined,
        })
    }
}

impl CommandRunner for Systemctl {
    fn enable(&self, unit: &str) -> ServiceResult<()> { self.run(&["enable", unit]) }
    fn disable(&self, unit: &str) -> ServiceResult<()> { self.run(&["disable", unit]) }
    fn start(&self, unit: &str) -> ServiceResult<()> { self.run(&["start", unit]) }
    fn stop(&self, unit: &str) -> ServiceResult<()> { self.run(&["stop", unit]) }
    fn reload(&self) -> ServiceResult<()> { self.run(&["daemon-reload"]) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_is_a_command_error() {
        let runner = Systemctl::with_program("/nonexistent/systemctl");
        match runner.start("ticker.service") {
            Err(ServiceError::Command { command, status, .. }) => {
                assert_eq!(command, "/nonexistent/systemctl start ticker.service");
                assert_eq!(status, None);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn non_zero_exit_carries_status_and_output() {
        // `false` ignores its arguments and exits 1.
        let runner = Systemctl::with_program("false");
        match runner.reload() {
            Err(ServiceError::Command { status, .. }) => assert_eq!(status, Some(1)),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn zero_exit_is_success() {
        let runner = Systemctl::with_program("true");
        assert!(runner.enable("ticker.service").is_ok());
    }
}
