//! Unit file generation.

use std::path::Path;

use crate::config::ServiceConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::escape::{escape_arg, escape_value};

/// Restart attempts allowed within [`START_LIMIT_INTERVAL_SEC`].
pub const START_LIMIT_BURST: u32 = 10;
/// Window, in seconds, over which restart attempts are counted.
pub const START_LIMIT_INTERVAL_SEC: u32 = 5;
/// Cooldown, in seconds, before systemd restarts a failed service.
pub const RESTART_SEC: u32 = 120;

/// Line-oriented unit file writer. Values must already be escaped.
struct UnitFile {
    buf: String,
}

impl UnitFile {
    fn new() -> Self {
        UnitFile { buf: String::new() }
    }

    fn section(&mut self, name: &str) {
        if !self.buf.is_empty() {
            self.buf.push('\n');
        }
        self.buf.push('[');
        self.buf.push_str(name);
        self.buf.push_str("]\n");
    }

    fn set(&mut self, key: &str, value: &str) {
        self.buf.push_str(key);
        self.buf.push('=');
        self.buf.push_str(value);
        self.buf.push('\n');
    }
}

/// Renders the systemd unit file for `config`, running the executable at `exe`.
///
/// Output depends only on the arguments, so the same inputs always produce
/// the same bytes. Optional settings are left out entirely when unset.
pub fn render_unit(config: &ServiceConfig, exe: &Path) -> ServiceResult<String> {
    if !exe.is_absolute() {
        return Err(ServiceError::Render(format!(
            "executable path {} is not absolute",
            exe.display()
        )));
    }
    let exe = path_str("executable path", exe)?;

    let description = if config.description.is_empty() {
        config.display()
    } else {
        config.description.as_str()
    };

    let mut exec_start = escape_arg(exe);
    for arg in &config.arguments {
        // systemd has no escape for NUL, and argv could not carry one anyway.
        if arg.contains('\0') {
            return Err(ServiceError::Render(format!("argument {:?} contains a NUL byte", arg)));
        }
        exec_start.push(' ');
        exec_start.push_str(&escape_arg(arg));
    }

    let mut unit = UnitFile::new();

    unit.section("Unit");
    unit.set("Description", &escape_value("Description", description)?);
    unit.set(
        "ConditionFileIsExecutable",
        &escape_value("ConditionFileIsExecutable", exe)?,
    );
    unit.set("StartLimitIntervalSec", &START_LIMIT_INTERVAL_SEC.to_string());
    unit.set("StartLimitBurst", &START_LIMIT_BURST.to_string());

    unit.section("Service");
    unit.set("ExecStart", &exec_start);
    if let Some(root) = &config.chroot {
        let root = path_str("RootDirectory", root)?;
        unit.set("RootDirectory", &escape_value("RootDirectory", root)?);
    }
    if let Some(dir) = &config.working_directory {
        let dir = path_str("WorkingDirectory", dir)?;
        unit.set("WorkingDirectory", &escape_value("WorkingDirectory", dir)?);
    }
    if let Some(user) = &config.user {
        unit.set("User", &escape_value("User", user.as_str())?);
    }
    unit.set("Restart", "always");
    unit.set("RestartSec", &RESTART_SEC.to_string());

    unit.section("Install");
    unit.set("WantedBy", "multi-user.target");

    Ok(unit.buf)
}

fn path_str<'a>(field: &str, path: &'a Path) -> ServiceResult<&'a str> {
    path.to_str().ok_or_else(|| {
        ServiceError::Render(format!("{} {} is not valid UTF-8", field, path.display()))
    })
}
